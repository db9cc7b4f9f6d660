use tracing::debug;

use super::{
    markup::Markup,
    tree::{NodeId, RenderTree},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderPosition {
    AfterBegin,
    #[default]
    BeforeEnd,
}

/// A component that renders into one element of the [`RenderTree`].
///
/// The element is created lazily from [`View::template`] the first time it is needed. Views that
/// attach listeners or own widgets do so in [`View::on_create`], which runs for every freshly
/// built element, and release them in [`View::on_remove`].
pub trait View {
    fn template(&self) -> Markup;

    fn element_id(&self) -> Option<NodeId>;

    fn set_element_id(&mut self, id: Option<NodeId>);

    fn on_create(&mut self, tree: &mut RenderTree, id: NodeId) {
        let _ = (tree, id);
    }

    fn on_remove(&mut self, tree: &mut RenderTree) {
        let _ = tree;
    }

    fn element(&mut self, tree: &mut RenderTree) -> NodeId {
        if let Some(id) = self.element_id()
            && tree.contains(id)
        {
            return id;
        }
        let id = tree.create(self.template());
        self.set_element_id(Some(id));
        self.on_create(tree, id);
        id
    }

    fn remove_element(&mut self, tree: &mut RenderTree) {
        if let Some(id) = self.element_id() {
            tree.discard(id);
            self.set_element_id(None);
        }
        self.on_remove(tree);
    }
}

pub fn render<V: View + ?Sized>(tree: &mut RenderTree, view: &mut V, container: NodeId) {
    render_at(tree, view, container, RenderPosition::BeforeEnd);
}

pub fn render_at<V: View + ?Sized>(
    tree: &mut RenderTree,
    view: &mut V,
    container: NodeId,
    position: RenderPosition,
) {
    let id = view.element(tree);
    let attached = match position {
        RenderPosition::AfterBegin => tree.prepend(container, id),
        RenderPosition::BeforeEnd => tree.append(container, id),
    };
    if !attached {
        debug!(?container, "render skipped: container is gone");
    }
}

/// Swaps `new` into the place of `old`. A no-op (returning `false`) unless `old` is attached.
pub fn replace<N, O>(tree: &mut RenderTree, new: &mut N, old: &mut O) -> bool
where
    N: View + ?Sized,
    O: View + ?Sized,
{
    let Some(old_id) = old.element_id().filter(|id| tree.is_attached(*id)) else {
        debug!("replace skipped: old view is not attached");
        return false;
    };
    let new_id = new.element(tree);
    tree.replace_child(new_id, old_id)
}

/// Unmounts the view. Calling it on a view without an element is a no-op.
pub fn remove<V: View + ?Sized>(tree: &mut RenderTree, view: &mut V) {
    if view.element_id().is_none() {
        return;
    }
    view.remove_element(tree);
}

/// Full re-render of a stateful view: the current element is torn down, rebuilt from the current
/// state (which reattaches every listener through [`View::on_create`]) and put back in its slot.
pub fn update_element<V: View + ?Sized>(tree: &mut RenderTree, view: &mut V) {
    let Some(previous) = view.element_id() else {
        return;
    };
    view.on_remove(tree);
    view.set_element_id(None);
    let next = view.element(tree);
    if tree.is_attached(previous) {
        tree.replace_child(next, previous);
    }
    tree.discard(previous);
}
