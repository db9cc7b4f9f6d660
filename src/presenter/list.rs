use chrono::{DateTime, Utc};
use crossterm::event::KeyEvent;
use indexmap::IndexMap;
use tracing::debug;

use crate::{
    domain::{Point, PointId, SortKind, UpdateType, UserAction},
    model::ModelEvent,
    render::{NodeId, RenderPosition, RenderTree, View, remove, render, render_at},
    view::{EmptyListView, SortView, TripListView, ViewServices},
};

use super::{ChangeHandler, EditorAction, KeyOutcome, Mode, NewPointPresenter, PointPresenter};

/// Owns one presenter per point and keeps at most one editor open across the list.
pub struct ListPresenter {
    container: NodeId,
    services: ViewServices,
    on_change: ChangeHandler,
    points: Vec<Point>,
    sort: SortKind,
    presenters: IndexMap<PointId, PointPresenter>,
    creator: Option<NewPointPresenter>,
    sort_view: Option<SortView>,
    list_view: TripListView,
    empty_view: Option<EmptyListView>,
    selected: Option<PointId>,
}

impl ListPresenter {
    pub fn new(container: NodeId, services: ViewServices, on_change: ChangeHandler) -> Self {
        Self {
            container,
            services,
            on_change,
            points: Vec::new(),
            sort: SortKind::default(),
            presenters: IndexMap::new(),
            creator: None,
            sort_view: None,
            list_view: TripListView::new(),
            empty_view: None,
            selected: None,
        }
    }

    /// Takes a snapshot of `points` and renders the board from it.
    pub fn init(&mut self, tree: &mut RenderTree, points: &[Point]) {
        self.points = points.to_vec();
        self.render_board(tree);
    }

    pub fn sort(&self) -> SortKind {
        self.sort
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn presenter(&self, id: &PointId) -> Option<&PointPresenter> {
        self.presenters.get(id)
    }

    pub fn presenters(&self) -> impl Iterator<Item = &PointPresenter> {
        self.presenters.values()
    }

    pub fn creator(&self) -> Option<&NewPointPresenter> {
        self.creator.as_ref()
    }

    pub fn sort_view(&self) -> Option<&SortView> {
        self.sort_view.as_ref()
    }

    pub fn empty_view(&self) -> Option<&EmptyListView> {
        self.empty_view.as_ref()
    }

    pub fn list_element(&self) -> Option<NodeId> {
        self.list_view.element_id()
    }

    pub fn selected(&self) -> Option<&PointId> {
        self.selected.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.creator.is_some() || self.editing().is_some()
    }

    /// The point whose editor is open.
    pub fn editing(&self) -> Option<&PointId> {
        self.presenters
            .iter()
            .find(|(_, presenter)| presenter.mode() == Mode::Editing)
            .map(|(id, _)| id)
    }

    /// Forces every presenter except `keep` back to its card and drops the creation form.
    pub fn handle_mode_change(&mut self, tree: &mut RenderTree, keep: Option<&PointId>) {
        self.close_creator(tree);
        for (id, presenter) in self.presenters.iter_mut() {
            if Some(id) != keep {
                presenter.reset_view(tree);
            }
        }
    }

    /// Opens the editor of `id` after resetting everybody else.
    pub fn open_editor(&mut self, tree: &mut RenderTree, id: &PointId) {
        if !self.presenters.contains_key(id) {
            return;
        }
        self.handle_mode_change(tree, Some(id));
        if let Some(presenter) = self.presenters.get_mut(id) {
            presenter.open_editor(tree);
            self.selected = Some(id.clone());
        }
    }

    /// Moves the card selection; ignored while an editor is open.
    pub fn focus_step(&mut self, tree: &mut RenderTree, delta: i32) {
        if self.is_editing() || self.presenters.is_empty() {
            return;
        }
        let len = self.presenters.len() as i32;
        let current = self
            .selected
            .as_ref()
            .and_then(|id| self.presenters.get_index_of(id))
            .map_or(if delta >= 0 { -1 } else { 0 }, |index| index as i32);
        let next = (current + delta).clamp(0, len - 1) as usize;
        if let Some((id, presenter)) = self.presenters.get_index(next) {
            presenter.focus(tree);
            self.selected = Some(id.clone());
        }
    }

    /// Switches to the next sort and rebuilds the list.
    pub fn cycle_sort(&mut self, tree: &mut RenderTree) {
        if self.points.is_empty() {
            return;
        }
        self.sort = self.sort.next();
        debug!(sort = ?self.sort, "sort changed");
        self.clear_board(tree);
        self.render_board(tree);
    }

    /// Opens the creation form at the head of the list.
    pub fn create_point(&mut self, tree: &mut RenderTree, now: DateTime<Utc>) {
        self.handle_mode_change(tree, None);
        if self.empty_view.is_some() {
            self.clear_board(tree);
            self.render_shell(tree);
        }
        let Some(container) = self.list_view.element_id() else {
            return;
        };
        let mut creator =
            NewPointPresenter::new(container, self.services.clone(), self.on_change.clone());
        creator.init(tree, now);
        self.creator = Some(creator);
    }

    /// Delivers a document key event to every attached key listener, oldest first.
    pub fn dispatch_document_key(&mut self, tree: &mut RenderTree, key: &KeyEvent) -> bool {
        let mut handled = false;
        for owner in tree.document().key_listener_owners() {
            if owner.is_unassigned() {
                if let Some(creator) = self.creator.as_mut() {
                    handled |= creator.handle_document_key(tree, key);
                }
            } else if let Some(presenter) = self.presenters.get_mut(&owner) {
                handled |= presenter.handle_document_key(tree, key);
            }
        }
        self.settle_creator(tree);
        handled
    }

    /// Routes a key to the open form, or to the selected card.
    pub fn handle_key(&mut self, tree: &mut RenderTree, key: &KeyEvent) -> KeyOutcome {
        if let Some(creator) = self.creator.as_mut() {
            let outcome = creator.handle_key(tree, key);
            self.settle_creator(tree);
            return outcome;
        }
        let Some(id) = self.editing().or(self.selected.as_ref()).cloned() else {
            return KeyOutcome::Ignored;
        };
        let Some(presenter) = self.presenters.get_mut(&id) else {
            return KeyOutcome::Ignored;
        };
        let outcome = presenter.handle_key(tree, key);
        if outcome == KeyOutcome::EditRequested {
            self.open_editor(tree, &id);
            return KeyOutcome::Handled;
        }
        outcome
    }

    pub fn handle_action(&mut self, tree: &mut RenderTree, action: EditorAction) -> KeyOutcome {
        if let Some(creator) = self.creator.as_mut() {
            let outcome = creator.handle_action(tree, action);
            self.settle_creator(tree);
            return outcome;
        }
        let Some(id) = self.editing().cloned() else {
            return KeyOutcome::Ignored;
        };
        match self.presenters.get_mut(&id) {
            Some(presenter) => presenter.handle_action(tree, action),
            None => KeyOutcome::Ignored,
        }
    }

    /// Reacts to a change the store accepted. `points` is the store content after the change.
    pub fn handle_model_event(&mut self, tree: &mut RenderTree, event: &ModelEvent, points: &[Point]) {
        match event.scope {
            UpdateType::Patch => self.patch(tree, event, points),
            UpdateType::Minor => {
                self.clear_board(tree);
                self.points = points.to_vec();
                self.render_board(tree);
            }
            UpdateType::Major => {
                self.clear_board(tree);
                self.sort = SortKind::default();
                self.points = points.to_vec();
                self.render_board(tree);
            }
        }
        if event.action == UserAction::Create {
            self.selected = Some(event.point.id.clone());
            self.focus_selected(tree);
        }
    }

    fn patch(&mut self, tree: &mut RenderTree, event: &ModelEvent, points: &[Point]) {
        let id = &event.point.id;
        match event.action {
            UserAction::Delete => {
                if let Some(mut presenter) = self.presenters.shift_remove(id) {
                    presenter.destroy(tree);
                }
                self.points.retain(|point| &point.id != id);
                if self.selected.as_ref() == Some(id) {
                    self.selected = None;
                }
                if self.points.is_empty() {
                    self.clear_board(tree);
                    self.render_board(tree);
                } else {
                    self.focus_step(tree, 0);
                }
            }
            UserAction::Update | UserAction::Create => {
                let Some(point) = points.iter().find(|point| &point.id == id) else {
                    return;
                };
                if let Some(slot) = self.points.iter_mut().find(|slot| &slot.id == id) {
                    *slot = point.clone();
                }
                match self.presenters.get_mut(id) {
                    Some(presenter) => presenter.init(tree, point.clone()),
                    None => {
                        self.clear_board(tree);
                        self.points = points.to_vec();
                        self.render_board(tree);
                    }
                }
            }
        }
    }

    fn render_board(&mut self, tree: &mut RenderTree) {
        if self.points.is_empty() && self.creator.is_none() {
            let mut empty = EmptyListView::new();
            render(tree, &mut empty, self.container);
            self.empty_view = Some(empty);
            return;
        }
        self.render_shell(tree);
        self.sort.apply(&mut self.points, &self.services.catalog);
        let Some(container) = self.list_view.element_id() else {
            return;
        };
        for point in &self.points {
            let mut presenter =
                PointPresenter::new(container, self.services.clone(), self.on_change.clone());
            presenter.init(tree, point.clone());
            self.presenters.insert(point.id.clone(), presenter);
        }
        self.focus_selected(tree);
    }

    fn render_shell(&mut self, tree: &mut RenderTree) {
        let mut sort_view = SortView::new(self.sort);
        render_at(tree, &mut sort_view, self.container, RenderPosition::AfterBegin);
        self.sort_view = Some(sort_view);
        render(tree, &mut self.list_view, self.container);
    }

    fn clear_board(&mut self, tree: &mut RenderTree) {
        self.close_creator(tree);
        for (_, mut presenter) in self.presenters.drain(..) {
            presenter.destroy(tree);
        }
        if let Some(mut view) = self.sort_view.take() {
            remove(tree, &mut view);
        }
        if let Some(mut view) = self.empty_view.take() {
            remove(tree, &mut view);
        }
        remove(tree, &mut self.list_view);
    }

    fn close_creator(&mut self, tree: &mut RenderTree) {
        if let Some(mut creator) = self.creator.take() {
            creator.destroy(tree);
            if self.points.is_empty() && self.empty_view.is_none() {
                self.clear_board(tree);
                self.render_board(tree);
            }
        }
    }

    /// Drops a creation form that closed itself.
    fn settle_creator(&mut self, tree: &mut RenderTree) {
        if self.creator.as_ref().is_some_and(|creator| !creator.is_active()) {
            self.close_creator(tree);
            self.focus_selected(tree);
        }
    }

    fn focus_selected(&mut self, tree: &mut RenderTree) {
        let selected = self
            .selected
            .as_ref()
            .filter(|id| self.presenters.contains_key(*id))
            .cloned()
            .or_else(|| self.presenters.keys().next().cloned());
        if let Some(id) = selected
            && let Some(presenter) = self.presenters.get(&id)
        {
            presenter.focus(tree);
            self.selected = Some(id);
        }
    }
}
