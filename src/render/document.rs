use tracing::trace;

use crate::domain::PointId;

use super::{markup::Control, tree::NodeId};

/// Handle for a document-level key listener. It is not `Clone`: whoever holds it releases it,
/// and releasing consumes it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a key listener stays attached until its subscription is released"]
pub struct KeySubscription {
    id: u64,
}

#[derive(Debug)]
struct KeyListener {
    id: u64,
    owner: PointId,
}

/// Page-wide state: document key listeners and the focused control.
#[derive(Debug, Default)]
pub struct Document {
    key_listeners: Vec<KeyListener>,
    next_listener: u64,
    focus: Option<(NodeId, Control)>,
}

impl Document {
    /// Attaches a key listener for `owner`. Adding twice for the same owner keeps a single
    /// listener attached.
    pub fn add_key_listener(&mut self, owner: PointId) -> KeySubscription {
        if let Some(existing) = self
            .key_listeners
            .iter()
            .find(|listener| listener.owner == owner)
        {
            trace!(%owner, "key listener already attached");
            return KeySubscription { id: existing.id };
        }
        self.next_listener += 1;
        let id = self.next_listener;
        trace!(%owner, id, "key listener attached");
        self.key_listeners.push(KeyListener { id, owner });
        KeySubscription { id }
    }

    /// Detaches the listener behind `subscription`; a listener that is already gone is ignored.
    pub fn remove_key_listener(&mut self, subscription: KeySubscription) {
        let before = self.key_listeners.len();
        self.key_listeners
            .retain(|listener| listener.id != subscription.id);
        if self.key_listeners.len() != before {
            trace!(id = subscription.id, "key listener detached");
        }
    }

    pub fn key_listener_count(&self) -> usize {
        self.key_listeners.len()
    }

    /// Owners in attachment order; key events are delivered to them in that order.
    pub fn key_listener_owners(&self) -> Vec<PointId> {
        self.key_listeners
            .iter()
            .map(|listener| listener.owner.clone())
            .collect()
    }

    pub fn focus(&self) -> Option<(NodeId, Control)> {
        self.focus
    }

    pub(super) fn set_focus(&mut self, focus: Option<(NodeId, Control)>) {
        self.focus = focus;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_twice_keeps_one_listener() {
        let mut document = Document::default();
        let first = document.add_key_listener(PointId::new("1"));
        let second = document.add_key_listener(PointId::new("1"));
        assert_eq!(document.key_listener_count(), 1);
        document.remove_key_listener(first);
        document.remove_key_listener(second);
        assert_eq!(document.key_listener_count(), 0);
    }

    #[test]
    fn removal_only_touches_its_own_listener() {
        let mut document = Document::default();
        let one = document.add_key_listener(PointId::new("1"));
        let _two = document.add_key_listener(PointId::new("2"));
        document.remove_key_listener(one);
        assert_eq!(document.key_listener_owners(), vec![PointId::new("2")]);
    }
}
