use std::collections::BTreeSet;

use tracing::debug;

use super::{
    document::Document,
    markup::{Control, Markup},
};

/// Slot plus the generation of the element created in it. Slots are reused once an element is
/// discarded, so a stale id never resolves to the element that took its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    slot: usize,
    generation: u64,
}

/// Event listeners an element can carry. Events only reach a view while the matching listener is
/// attached to its current element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Listener {
    OpenEditor,
    Submit,
    Close,
    Delete,
    TypeChange,
    DestinationChange,
    PriceInput,
    OffersChange,
}

#[derive(Debug)]
struct Node {
    markup: Markup,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: BTreeSet<Listener>,
    generation: u64,
}

#[derive(Debug)]
pub struct RenderTree {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
    generation: u64,
    document: Document,
}

impl Default for RenderTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderTree {
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                slot: 0,
                generation: 0,
            },
            generation: 0,
            document: Document::default(),
        };
        tree.root = tree.create(Markup::new("page"));
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Builds a detached element.
    pub fn create(&mut self, markup: Markup) -> NodeId {
        self.generation += 1;
        let node = Node {
            markup,
            parent: None,
            children: Vec::new(),
            listeners: BTreeSet::new(),
            generation: self.generation,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };
        NodeId {
            slot,
            generation: self.generation,
        }
    }

    /// Number of slots ever allocated, live or free.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|node| node.parent.is_some())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    pub fn markup(&self, id: NodeId) -> Option<&Markup> {
        self.node(id).map(|node| &node.markup)
    }

    /// Creation stamp of the element; a rebuilt element always has a newer one.
    pub fn generation(&self, id: NodeId) -> Option<u64> {
        self.node(id).map(|node| node.generation)
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) -> bool {
        let len = self.children(parent).len();
        self.insert(parent, len, child)
    }

    pub fn prepend(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert(parent, 0, child)
    }

    fn insert(&mut self, parent: NodeId, index: usize, child: NodeId) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            debug!(?parent, ?child, "insert skipped: unknown element");
            return false;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(parent) {
            let index = index.min(node.children.len());
            node.children.insert(index, child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        true
    }

    /// Puts `new` into the slot `old` occupies and detaches `old`. Requires `old` to be attached.
    pub fn replace_child(&mut self, new: NodeId, old: NodeId) -> bool {
        if new == old {
            return self.is_attached(old);
        }
        let Some(parent) = self.parent(old) else {
            debug!(?old, "replace skipped: element is not attached");
            return false;
        };
        if !self.contains(new) {
            debug!(?new, "replace skipped: unknown element");
            return false;
        }
        self.detach(new);
        let Some(index) = self
            .children(parent)
            .iter()
            .position(|child| *child == old)
        else {
            return false;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children[index] = new;
        }
        if let Some(node) = self.node_mut(new) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(old) {
            node.parent = None;
        }
        self.move_focus(old, new);
        true
    }

    /// Detaches and frees an element together with its subtree. Unknown ids are ignored.
    pub fn discard(&mut self, id: NodeId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        self.detach(id);
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if self.node(current).is_none() {
                continue;
            }
            if let Some(node) = self.nodes.get_mut(current.slot).and_then(Option::take) {
                pending.extend(node.children);
                self.free.push(current.slot);
            }
            if self
                .document
                .focus()
                .is_some_and(|(focused, _)| focused == current)
            {
                self.document.set_focus(None);
            }
        }
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|child| *child != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// In-place input update; the element keeps its identity, listeners and generation.
    pub fn set_value(&mut self, id: NodeId, control: Control, value: &str) -> bool {
        self.node_mut(id)
            .is_some_and(|node| node.markup.set_value(control, value))
    }

    pub fn set_checked(&mut self, id: NodeId, control: Control, checked: bool) -> bool {
        self.node_mut(id)
            .is_some_and(|node| node.markup.set_checked(control, checked))
    }

    /// Returns `true` when the listener was not attached before.
    pub fn add_listener(&mut self, id: NodeId, listener: Listener) -> bool {
        self.node_mut(id)
            .is_some_and(|node| node.listeners.insert(listener))
    }

    pub fn has_listener(&self, id: NodeId, listener: Listener) -> bool {
        self.node(id)
            .is_some_and(|node| node.listeners.contains(&listener))
    }

    pub fn listeners(&self, id: NodeId) -> Vec<Listener> {
        self.node(id)
            .map(|node| node.listeners.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn focus(&mut self, id: NodeId, control: Control) {
        if self.markup(id).is_some_and(|markup| markup.has_control(control)) {
            self.document.set_focus(Some((id, control)));
        }
    }

    pub fn focused(&self) -> Option<(NodeId, Control)> {
        self.document.focus()
    }

    pub fn focused_control(&self, id: NodeId) -> Option<Control> {
        self.document
            .focus()
            .and_then(|(node, control)| (node == id).then_some(control))
    }

    /// Focus follows an element into its replacement, keeping the control when it still exists.
    fn move_focus(&mut self, old: NodeId, new: NodeId) {
        let Some(control) = self.focused_control(old) else {
            return;
        };
        let Some(markup) = self.markup(new) else {
            return;
        };
        let target = if markup.has_control(control) {
            Some(control)
        } else {
            markup.controls().first().copied()
        };
        self.document.set_focus(target.map(|control| (new, control)));
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.slot)
            .and_then(Option::as_ref)
            .filter(|node| node.generation == id.generation)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.slot)
            .and_then(Option::as_mut)
            .filter(|node| node.generation == id.generation)
    }
}
