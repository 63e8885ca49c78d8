//! "Transform changed" notification
//!
//! Each node carries its own listener list. Listeners are invoked once per
//! clean -> dirty transition of the node's world matrix.

use std::fmt;

use crate::node::NodeId;

/// Event delivered to listeners when a node's world matrix goes stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformChanged {
    /// Node whose world matrix was invalidated
    pub node: NodeId,
}

/// Handle returned on registration, used to remove the listener again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) type Callback = Box<dyn FnMut(&TransformChanged)>;

struct Entry {
    id: ListenerId,
    once: bool,
    callback: Callback,
}

/// Listener registry of a single node
///
/// Ids are allocated by the owning tree, so they are unique across nodes.
#[derive(Default)]
pub(crate) struct Listeners {
    entries: Vec<Entry>,
}

impl Listeners {
    pub(crate) fn add(&mut self, id: ListenerId, once: bool, callback: Callback) {
        self.entries.push(Entry { id, once, callback });
    }

    /// Returns false if no listener had this id
    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Call every listener in registration order, dropping one-shot ones
    pub(crate) fn emit(&mut self, event: &TransformChanged) {
        for entry in &mut self.entries {
            (entry.callback)(event);
        }
        self.entries.retain(|entry| !entry.once);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<NodeId>>>, Callback) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (
            seen,
            Box::new(move |event: &TransformChanged| sink.borrow_mut().push(event.node)),
        )
    }

    #[test]
    fn test_emit_calls_in_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::default();
        for tag in 0..3 {
            let order = Rc::clone(&order);
            listeners.add(
                ListenerId(tag),
                false,
                Box::new(move |_: &TransformChanged| order.borrow_mut().push(tag)),
            );
        }
        listeners.emit(&TransformChanged { node: NodeId(0) });
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_once_listener_fires_once() {
        let (seen, callback) = recorder();
        let mut listeners = Listeners::default();
        listeners.add(ListenerId(0), true, callback);

        listeners.emit(&TransformChanged { node: NodeId(3) });
        listeners.emit(&TransformChanged { node: NodeId(3) });

        assert_eq!(*seen.borrow(), vec![NodeId(3)]);
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn test_remove() {
        let (seen, callback) = recorder();
        let mut listeners = Listeners::default();
        let id = ListenerId(7);
        listeners.add(id, false, callback);

        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));

        listeners.emit(&TransformChanged { node: NodeId(1) });
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_remove_only_matching_id() {
        let mut listeners = Listeners::default();
        listeners.add(ListenerId(1), false, Box::new(|_: &TransformChanged| {}));
        assert!(!listeners.remove(ListenerId(2)));
        assert_eq!(listeners.len(), 1);
    }
}
