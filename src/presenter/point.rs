use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::{
    domain::{ChangeRequest, Point, PointId, UpdateType, UserAction},
    render::{Control, KeySubscription, NodeId, RenderTree, View, remove, render, replace},
    view::{EditPointView, PointView, ViewServices},
};

use super::{ChangeHandler, EditorAction, KeyOutcome, PointMessage};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Viewing,
    Editing,
}

/// Owns the card and the edit form of one point and switches between them.
pub struct PointPresenter {
    container: NodeId,
    services: ViewServices,
    on_change: ChangeHandler,
    point: Option<Point>,
    mode: Mode,
    point_view: Option<PointView<PointMessage>>,
    edit_view: Option<EditPointView<PointMessage>>,
    escape: Option<KeySubscription>,
}

impl PointPresenter {
    pub fn new(container: NodeId, services: ViewServices, on_change: ChangeHandler) -> Self {
        Self {
            container,
            services,
            on_change,
            point: None,
            mode: Mode::Viewing,
            point_view: None,
            edit_view: None,
            escape: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn point(&self) -> Option<&Point> {
        self.point.as_ref()
    }

    pub fn id(&self) -> Option<&PointId> {
        self.point.as_ref().map(|point| &point.id)
    }

    pub fn has_escape_listener(&self) -> bool {
        self.escape.is_some()
    }

    /// The element currently shown for this point, if any.
    pub fn element(&self) -> Option<NodeId> {
        match self.mode {
            Mode::Viewing => self.point_view.as_ref().and_then(View::element_id),
            Mode::Editing => self.edit_view.as_ref().and_then(View::element_id),
        }
    }

    pub fn edit_view(&self) -> Option<&EditPointView<PointMessage>> {
        self.edit_view.as_ref()
    }

    /// Builds both views for `point`. The first call mounts the card; later calls swap the visible
    /// view for its rebuilt counterpart in the same mode and drop the previous pair.
    pub fn init(&mut self, tree: &mut RenderTree, point: Point) {
        let mut point_view = PointView::new(point.clone(), self.services.clone());
        point_view.set_click_open_editor_handler(tree, || PointMessage::OpenEditor);

        let mut edit_view = EditPointView::new(&point, self.services.clone());
        edit_view.set_form_submit_handler(tree, PointMessage::Submit);
        edit_view.set_close_click_handler(tree, || PointMessage::Close);
        edit_view.set_delete_click_handler(tree, PointMessage::Delete);

        let previous = (self.point_view.take(), self.edit_view.take());
        self.point = Some(point);

        match previous {
            (Some(mut prev_point), Some(mut prev_edit)) => {
                match self.mode {
                    Mode::Viewing => replace(tree, &mut point_view, &mut prev_point),
                    Mode::Editing => replace(tree, &mut edit_view, &mut prev_edit),
                };
                remove(tree, &mut prev_point);
                remove(tree, &mut prev_edit);
            }
            (prev_point, prev_edit) => {
                for mut view in prev_point {
                    remove(tree, &mut view);
                }
                for mut view in prev_edit {
                    remove(tree, &mut view);
                }
                render(tree, &mut point_view, self.container);
                self.mode = Mode::Viewing;
            }
        }

        self.point_view = Some(point_view);
        self.edit_view = Some(edit_view);
    }

    /// Unmounts both views and releases the escape listener. Safe to call repeatedly.
    pub fn destroy(&mut self, tree: &mut RenderTree) {
        if let Some(view) = self.point_view.as_mut() {
            remove(tree, view);
        }
        if let Some(view) = self.edit_view.as_mut() {
            remove(tree, view);
        }
        self.release_escape(tree);
        self.mode = Mode::Viewing;
    }

    /// Drops the draft and goes back to the card when editing.
    pub fn reset_view(&mut self, tree: &mut RenderTree) {
        if self.mode == Mode::Viewing {
            return;
        }
        self.discard_draft(tree);
        self.replace_form_to_card(tree);
    }

    /// Viewing → Editing. The owner has already reset every other presenter.
    pub fn open_editor(&mut self, tree: &mut RenderTree) {
        if self.mode == Mode::Editing {
            return;
        }
        let (Some(point_view), Some(edit_view)) =
            (self.point_view.as_mut(), self.edit_view.as_mut())
        else {
            return;
        };
        if !replace(tree, edit_view, point_view) {
            return;
        }
        edit_view.focus(tree);
        if self.escape.is_none()
            && let Some(id) = self.id().cloned()
        {
            self.escape = Some(tree.document_mut().add_key_listener(id));
        }
        self.mode = Mode::Editing;
        debug!(id = ?self.id(), "editor opened");
    }

    /// Puts focus on the visible view.
    pub fn focus(&self, tree: &mut RenderTree) {
        match self.mode {
            Mode::Viewing => {
                if let Some(id) = self.element() {
                    tree.focus(id, Control::OpenEditor);
                }
            }
            Mode::Editing => {
                if let Some(view) = self.edit_view.as_ref() {
                    view.focus(tree);
                }
            }
        }
    }

    pub fn handle_key(&mut self, tree: &mut RenderTree, key: &KeyEvent) -> KeyOutcome {
        let message = match self.mode {
            Mode::Viewing => self
                .point_view
                .as_ref()
                .and_then(|view| view.handle_key(tree, key)),
            Mode::Editing => self
                .edit_view
                .as_mut()
                .and_then(|view| view.handle_key(tree, key)),
        };
        match message {
            Some(message) => self.handle_message(tree, message),
            None if self.mode == Mode::Editing => KeyOutcome::Handled,
            None => KeyOutcome::Ignored,
        }
    }

    pub fn handle_action(&mut self, tree: &mut RenderTree, action: EditorAction) -> KeyOutcome {
        if self.mode != Mode::Editing {
            return KeyOutcome::Ignored;
        }
        let Some(view) = self.edit_view.as_ref() else {
            return KeyOutcome::Ignored;
        };
        let message = match action {
            EditorAction::Submit => view.submit(tree),
            EditorAction::Close => view.close(tree),
            EditorAction::Delete => view.delete(tree),
        };
        match message {
            Some(message) => self.handle_message(tree, message),
            None => KeyOutcome::Handled,
        }
    }

    /// Delivered through the document key listener this presenter holds while editing.
    pub fn handle_document_key(&mut self, tree: &mut RenderTree, key: &KeyEvent) -> bool {
        if key.code != KeyCode::Esc || self.escape.is_none() {
            return false;
        }
        debug!(id = ?self.id(), "editor cancelled with escape");
        self.discard_draft(tree);
        self.replace_form_to_card(tree);
        true
    }

    pub fn handle_message(&mut self, tree: &mut RenderTree, message: PointMessage) -> KeyOutcome {
        match message {
            PointMessage::OpenEditor => KeyOutcome::EditRequested,
            PointMessage::Submit(point) => {
                self.emit(UserAction::Update, UpdateType::Minor, point);
                self.replace_form_to_card(tree);
                KeyOutcome::Handled
            }
            PointMessage::Close => {
                self.discard_draft(tree);
                self.replace_form_to_card(tree);
                KeyOutcome::Handled
            }
            PointMessage::Delete(point) => {
                let scope = self.delete_scope(&point);
                self.emit(UserAction::Delete, scope, point);
                KeyOutcome::Handled
            }
        }
    }

    /// `Minor` when the draft moved the start date or changed the price, which affects ordering.
    pub fn delete_scope(&self, draft: &Point) -> UpdateType {
        match &self.point {
            Some(committed)
                if committed.date_from != draft.date_from
                    || committed.base_price != draft.base_price =>
            {
                UpdateType::Minor
            }
            _ => UpdateType::Patch,
        }
    }

    fn emit(&self, action: UserAction, scope: UpdateType, point: Point) {
        debug!(?action, ?scope, id = %point.id, "change requested");
        (self.on_change)(ChangeRequest::new(action, scope, point));
    }

    fn discard_draft(&mut self, tree: &mut RenderTree) {
        if let (Some(view), Some(point)) = (self.edit_view.as_mut(), self.point.as_ref()) {
            view.reset(tree, point);
        }
    }

    fn replace_form_to_card(&mut self, tree: &mut RenderTree) {
        if let (Some(point_view), Some(edit_view)) =
            (self.point_view.as_mut(), self.edit_view.as_mut())
        {
            replace(tree, point_view, edit_view);
        }
        self.release_escape(tree);
        if self.mode == Mode::Editing {
            debug!(id = ?self.id(), "editor closed");
        }
        self.mode = Mode::Viewing;
        self.focus(tree);
    }

    fn release_escape(&mut self, tree: &mut RenderTree) {
        if let Some(subscription) = self.escape.take() {
            tree.document_mut().remove_key_listener(subscription);
        }
    }
}
