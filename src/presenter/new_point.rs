use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::{
    domain::{ChangeRequest, Point, PointId, UpdateType, UserAction},
    render::{KeySubscription, NodeId, RenderPosition, RenderTree, remove, render_at},
    view::{EditPointView, ViewServices},
};

use super::{ChangeHandler, EditorAction, KeyOutcome, PointMessage};

/// Creation form shown at the head of the list. Lives until it submits or is cancelled.
pub struct NewPointPresenter {
    container: NodeId,
    services: ViewServices,
    on_change: ChangeHandler,
    edit_view: Option<EditPointView<PointMessage>>,
    escape: Option<KeySubscription>,
}

impl NewPointPresenter {
    pub fn new(container: NodeId, services: ViewServices, on_change: ChangeHandler) -> Self {
        Self {
            container,
            services,
            on_change,
            edit_view: None,
            escape: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.edit_view.is_some()
    }

    pub fn edit_view(&self) -> Option<&EditPointView<PointMessage>> {
        self.edit_view.as_ref()
    }

    pub fn init(&mut self, tree: &mut RenderTree, now: DateTime<Utc>) {
        if self.edit_view.is_some() {
            return;
        }
        let blank = Point::blank(now);
        let mut view = EditPointView::new(&blank, self.services.clone());
        view.set_form_submit_handler(tree, PointMessage::Submit);
        view.set_delete_click_handler(tree, PointMessage::Delete);
        render_at(tree, &mut view, self.container, RenderPosition::AfterBegin);
        view.focus(tree);
        self.edit_view = Some(view);
        self.escape = Some(
            tree.document_mut()
                .add_key_listener(PointId::unassigned()),
        );
        debug!("creation form opened");
    }

    pub fn destroy(&mut self, tree: &mut RenderTree) {
        let Some(mut view) = self.edit_view.take() else {
            return;
        };
        remove(tree, &mut view);
        if let Some(subscription) = self.escape.take() {
            tree.document_mut().remove_key_listener(subscription);
        }
        debug!("creation form closed");
    }

    pub fn handle_key(&mut self, tree: &mut RenderTree, key: &KeyEvent) -> KeyOutcome {
        let Some(view) = self.edit_view.as_mut() else {
            return KeyOutcome::Ignored;
        };
        match view.handle_key(tree, key) {
            Some(message) => self.handle_message(tree, message),
            None => KeyOutcome::Handled,
        }
    }

    pub fn handle_action(&mut self, tree: &mut RenderTree, action: EditorAction) -> KeyOutcome {
        let Some(view) = self.edit_view.as_ref() else {
            return KeyOutcome::Ignored;
        };
        let message = match action {
            EditorAction::Submit => view.submit(tree),
            EditorAction::Close | EditorAction::Delete => view.delete(tree),
        };
        match message {
            Some(message) => self.handle_message(tree, message),
            None => KeyOutcome::Handled,
        }
    }

    pub fn handle_document_key(&mut self, tree: &mut RenderTree, key: &KeyEvent) -> bool {
        if key.code != KeyCode::Esc || self.escape.is_none() {
            return false;
        }
        self.destroy(tree);
        true
    }

    fn handle_message(&mut self, tree: &mut RenderTree, message: PointMessage) -> KeyOutcome {
        match message {
            PointMessage::Submit(point) => {
                debug!(kind = %point.kind, "point creation requested");
                (self.on_change)(ChangeRequest::new(
                    UserAction::Create,
                    UpdateType::Minor,
                    point,
                ));
                self.destroy(tree);
            }
            PointMessage::Delete(_) => self.destroy(tree),
            PointMessage::OpenEditor | PointMessage::Close => {}
        }
        KeyOutcome::Handled
    }
}
