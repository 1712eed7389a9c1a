//! Change notifications emitted by the core and consumed by the shell.
//!
//! Each emitting component keeps an explicit FIFO rather than calling into
//! UI code. Mutating a component pushes events in mutation order, and the
//! shell drains them with `take_events()` after each command. Delivery is
//! synchronous and single-threaded — there is no channel and no locking.

use std::collections::VecDeque;

/// Everything a UI collaborator can subscribe to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Document-level state changed: title, description, page list, links.
    DocumentChanged,
    /// A page's own attributes or one of its objects changed.
    PageChanged { page_id: String },
    ObjectAdded { page_id: String, object_id: String },
    ObjectRemoved { page_id: String, object_id: String },
    /// The set of selected objects on a page changed.
    SelectionChanged { page_id: String },
    /// The document's modified flag flipped.
    ModifiedChanged(bool),
    /// A storage operation failed; carries a user-presentable message.
    StorageError(String),
}

/// FIFO buffer of pending [`ChangeEvent`]s.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<ChangeEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ChangeEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Removes and returns all pending events, oldest first.
    pub fn take(&mut self) -> Vec<ChangeEvent> {
        self.events.drain(..).collect()
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = ChangeEvent>) {
        self.events.extend(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_drain_in_order() {
        let mut q = EventQueue::new();
        q.push(ChangeEvent::DocumentChanged);
        q.push(ChangeEvent::ModifiedChanged(true));

        let taken = q.take();
        assert_eq!(
            taken,
            vec![ChangeEvent::DocumentChanged, ChangeEvent::ModifiedChanged(true)]
        );
        assert!(q.is_empty());
        assert!(q.take().is_empty());
    }
}
