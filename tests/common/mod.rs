#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use tripdeck::{
    ChangeRequest, ItineraryDocument, Point, PointId, PointsModel,
    presenter::{ChangeHandler, EditorAction, KeyOutcome, ListPresenter, Mode},
    render::{Control, RenderTree},
    view::{DatePicker, DatePickerFactory, PickerConfig, PickerOption, StepPicker, ViewServices},
};

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Step pickers that count how many instances are still alive.
#[derive(Default)]
pub struct CountingPickers {
    live: Rc<Cell<usize>>,
    created: Cell<usize>,
}

impl CountingPickers {
    pub fn live(&self) -> usize {
        self.live.get()
    }

    pub fn created(&self) -> usize {
        self.created.get()
    }
}

struct CountedPicker {
    inner: StepPicker,
    live: Rc<Cell<usize>>,
    alive: bool,
}

impl DatePicker for CountedPicker {
    fn handle_key(&mut self, key: &KeyEvent) -> Option<Vec<DateTime<Utc>>> {
        self.inner.handle_key(key)
    }

    fn set(&mut self, option: PickerOption) {
        self.inner.set(option);
    }

    fn selected_dates(&self) -> Vec<DateTime<Utc>> {
        self.inner.selected_dates()
    }

    fn input_value(&self) -> String {
        self.inner.input_value()
    }

    fn destroy(&mut self) {
        if self.alive {
            self.alive = false;
            self.live.set(self.live.get() - 1);
        }
        self.inner.destroy();
    }
}

impl DatePickerFactory for CountingPickers {
    fn create(&self, config: PickerConfig) -> Box<dyn DatePicker> {
        self.live.set(self.live.get() + 1);
        self.created.set(self.created.get() + 1);
        Box::new(CountedPicker {
            inner: StepPicker::new(config),
            live: Rc::clone(&self.live),
            alive: true,
        })
    }
}

/// A list presenter wired to an in-memory store the way the terminal app wires it.
pub struct Harness {
    pub tree: RenderTree,
    pub list: ListPresenter,
    pub model: PointsModel,
    pub pickers: Rc<CountingPickers>,
    pub applied: Vec<ChangeRequest>,
    outbox: Rc<RefCell<VecDeque<ChangeRequest>>>,
}

impl Harness {
    pub fn new(points: Vec<Point>) -> Self {
        let document = ItineraryDocument::demo();
        let pickers = Rc::new(CountingPickers::default());
        let services = ViewServices::new(document.catalog()).with_pickers(pickers.clone());
        let outbox: Rc<RefCell<VecDeque<ChangeRequest>>> = Rc::default();
        let queue = Rc::clone(&outbox);
        let on_change: ChangeHandler = Rc::new(move |request| queue.borrow_mut().push_back(request));

        let mut tree = RenderTree::new();
        let model = PointsModel::new(points).expect("points load");
        let mut list = ListPresenter::new(tree.root(), services, on_change);
        list.init(&mut tree, model.points());
        Self {
            tree,
            list,
            model,
            pickers,
            applied: Vec::new(),
            outbox,
        }
    }

    pub fn demo() -> Self {
        Self::new(ItineraryDocument::demo().points)
    }

    pub fn press(&mut self, code: KeyCode) -> KeyOutcome {
        let outcome = self.list.handle_key(&mut self.tree, &key(code));
        self.drain();
        outcome
    }

    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press(KeyCode::Char(ch));
        }
    }

    pub fn escape(&mut self) -> bool {
        let handled = self
            .list
            .dispatch_document_key(&mut self.tree, &key(KeyCode::Esc));
        self.drain();
        handled
    }

    pub fn action(&mut self, action: EditorAction) -> KeyOutcome {
        let outcome = self.list.handle_action(&mut self.tree, action);
        self.drain();
        outcome
    }

    pub fn open(&mut self, id: &str) {
        self.list.open_editor(&mut self.tree, &PointId::new(id));
    }

    /// Moves form focus with Tab until `control` is focused.
    pub fn focus_control(&mut self, control: Control) {
        for _ in 0..32 {
            if self.tree.focused().map(|(_, focused)| focused) == Some(control) {
                return;
            }
            self.press(KeyCode::Tab);
        }
        panic!("{control:?} never received focus");
    }

    pub fn editors(&self) -> usize {
        let points = self
            .list
            .presenters()
            .filter(|presenter| presenter.mode() == Mode::Editing)
            .count();
        points + usize::from(self.list.creator().is_some())
    }

    pub fn key_listeners(&self) -> usize {
        self.tree.document().key_listener_count()
    }

    /// Value of `control` in the element currently shown for point `id`.
    pub fn shown_value(&self, id: &str, control: Control) -> Option<String> {
        let presenter = self.list.presenter(&PointId::new(id))?;
        let element = presenter.element()?;
        self.tree
            .markup(element)?
            .value(control)
            .map(str::to_string)
    }

    pub fn drain(&mut self) {
        loop {
            let Some(request) = self.outbox.borrow_mut().pop_front() else {
                break;
            };
            self.applied.push(request.clone());
            let event = self
                .model
                .apply(request)
                .expect("store accepts the change");
            let points = self.model.points().to_vec();
            self.list
                .handle_model_event(&mut self.tree, &event, &points);
        }
    }
}
