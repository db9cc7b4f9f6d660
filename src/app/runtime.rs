use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::{debug, warn};

use crate::{
    domain::{Catalog, ChangeRequest, Point, TripSummary, UserAction},
    model::PointsModel,
    presentation::{self, UiContext},
    presenter::{ChangeHandler, EditorAction, ListPresenter},
    render::RenderTree,
    view::ViewServices,
};

use super::{
    input::KeyAction,
    keymap::{self, KeymapContext},
    options::UiOptions,
    status::StatusLine,
    terminal::Screen,
};

type Outbox = Rc<RefCell<VecDeque<ChangeRequest>>>;

pub(crate) struct App {
    tree: RenderTree,
    model: PointsModel,
    list: ListPresenter,
    catalog: Rc<Catalog>,
    outbox: Outbox,
    options: UiOptions,
    status: StatusLine,
    title: String,
    exit_armed: bool,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(
        model: PointsModel,
        catalog: Catalog,
        title: String,
        options: UiOptions,
    ) -> Self {
        let services = ViewServices::new(catalog).with_date_format(&options.date_format);
        let catalog = Rc::clone(&services.catalog);
        let outbox: Outbox = Rc::default();
        let queue = Rc::clone(&outbox);
        let on_change: ChangeHandler = Rc::new(move |request| queue.borrow_mut().push_back(request));

        let mut tree = RenderTree::new();
        let mut list = ListPresenter::new(tree.root(), services, on_change);
        list.init(&mut tree, model.points());

        Self {
            tree,
            model,
            list,
            catalog,
            outbox,
            options,
            status: StatusLine::new(),
            title,
            exit_armed: false,
            should_quit: false,
        }
    }

    pub(crate) fn run(&mut self) -> Result<()> {
        let mut screen = Screen::open()?;
        while !self.should_quit {
            screen.paint(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                Event::Resize(width, height) => {
                    screen.fit(width, height)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub(crate) fn into_points(self) -> Vec<Point> {
        self.model.into_points()
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let help = self.current_help_text();
        let summary = TripSummary::from_points(self.model.points(), &self.catalog);
        presentation::draw(
            frame,
            UiContext {
                title: &self.title,
                tree: &self.tree,
                sort: self.list.sort(),
                points: self.model.len(),
                summary: summary.as_ref(),
                editing: self.list.is_editing(),
                status: &self.status,
                help: help.as_deref(),
            },
        );
    }

    fn context(&self) -> KeymapContext {
        if self.list.is_editing() {
            KeymapContext::Editor
        } else {
            KeymapContext::List
        }
    }

    fn current_help_text(&self) -> Option<String> {
        if !self.options.show_help {
            return None;
        }
        keymap::help_text(self.context())
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        let action = keymap::classify_key(&key, self.context());
        if action != Some(KeyAction::Quit) {
            self.exit_armed = false;
        }
        let tree = &mut self.tree;
        match action {
            Some(KeyAction::Quit) => self.request_quit(),
            Some(KeyAction::CardStep(delta)) => self.list.focus_step(tree, delta),
            Some(KeyAction::NewPoint) => {
                self.list.create_point(tree, Utc::now());
                self.status.editing("a new point");
            }
            Some(KeyAction::CycleSort) => {
                self.list.cycle_sort(tree);
                self.status.sorted(self.list.sort().label());
            }
            Some(KeyAction::Submit) => {
                self.list.handle_action(tree, EditorAction::Submit);
            }
            Some(KeyAction::Close) => {
                self.list.handle_action(tree, EditorAction::Close);
            }
            Some(KeyAction::Delete) => {
                self.list.handle_action(tree, EditorAction::Delete);
            }
            Some(KeyAction::Escape) => {
                if self.list.dispatch_document_key(tree, &key) {
                    self.status.ready();
                }
            }
            None => {
                let was_editing = self.list.editing().cloned();
                self.list.handle_key(tree, &key);
                if was_editing.is_none()
                    && let Some(id) = self.list.editing()
                {
                    self.status.editing(&format!("point {id}"));
                }
            }
        }
        self.drain_changes();
    }

    fn request_quit(&mut self) {
        if self.options.confirm_exit && self.list.is_editing() && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
    }

    /// Applies every queued change request to the store and lets the list react.
    fn drain_changes(&mut self) {
        loop {
            let Some(request) = self.outbox.borrow_mut().pop_front() else {
                break;
            };
            let action = request.action;
            match self.model.apply(request) {
                Ok(event) => {
                    self.list
                        .handle_model_event(&mut self.tree, &event, self.model.points());
                    let label = format!("point {}", event.point.id);
                    match action {
                        UserAction::Delete => self.status.deleted(&label),
                        UserAction::Create | UserAction::Update => self.status.saved(&label),
                    }
                }
                Err(err) => {
                    debug!(?action, "change request dropped by the store");
                    warn!(error = %err, "change rejected");
                    self.status.error(err.to_string());
                }
            }
        }
    }
}
