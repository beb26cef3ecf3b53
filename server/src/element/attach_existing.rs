use std::collections::HashMap;

use treesync_shared::NodeId;

/// Receives the outcome of a request to attach an existing client element
pub trait ChildElementConsumer {
    /// The client bound the element to the requested node
    fn accept(&mut self, node: NodeId);

    /// The client found no matching element
    fn on_error(&mut self, parent: NodeId, tag: &str, previous_sibling: Option<NodeId>);
}

/// A request waiting for the client's answer
pub struct PendingAttach {
    pub tag: String,
    pub previous_sibling: Option<NodeId>,
    pub id: Option<String>,
    pub consumer: Box<dyn ChildElementConsumer>,
}

/// Pending attach requests issued for children of one node, keyed by the
/// node created for each request. Stored as side data of the parent node.
#[derive(Default)]
pub struct AttachExistingElementFeature {
    pending: HashMap<NodeId, PendingAttach>,
}

impl AttachExistingElementFeature {
    /// # Panics
    ///
    /// Panics if a request is already pending for the node.
    pub fn register(&mut self, requested: NodeId, pending: PendingAttach) {
        if self.pending.contains_key(&requested) {
            panic!("An attach request for node {} is already pending", requested);
        }
        self.pending.insert(requested, pending);
    }

    pub fn unregister(&mut self, requested: &NodeId) -> Option<PendingAttach> {
        self.pending.remove(requested)
    }

    pub fn is_pending(&self, requested: &NodeId) -> bool {
        self.pending.contains_key(requested)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
