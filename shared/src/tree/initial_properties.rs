use std::collections::HashSet;

use crate::tree::node_id::{FeatureId, NodeId};

/// Collaborator notified about nodes created by an incoming change batch.
///
/// Property values of those nodes were just received from the server, so
/// writing them back while the client renders the new nodes would only echo
/// them. The handler decides which outbound property syncs to suppress until
/// it is flushed.
pub trait InitialPropertiesHandler {
    /// A node was registered while a change batch was being applied
    fn node_registered(&mut self, node_id: NodeId);

    /// The nodes of the last batch have been rendered; stop suppressing
    fn flush_property_updates(&mut self);

    /// Returns true if an outbound sync of the given property must not be sent
    fn handle_property_update(
        &mut self,
        node_id: NodeId,
        feature_id: FeatureId,
        property: &str,
    ) -> bool;
}

/// Suppresses outbound property syncs for every node registered since the
/// last flush
#[derive(Default)]
pub struct NewNodeTracker {
    new_nodes: HashSet<NodeId>,
}

impl NewNodeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_new(&self, node_id: &NodeId) -> bool {
        self.new_nodes.contains(node_id)
    }
}

impl InitialPropertiesHandler for NewNodeTracker {
    fn node_registered(&mut self, node_id: NodeId) {
        self.new_nodes.insert(node_id);
    }

    fn flush_property_updates(&mut self) {
        self.new_nodes.clear();
    }

    fn handle_property_update(
        &mut self,
        node_id: NodeId,
        _feature_id: FeatureId,
        _property: &str,
    ) -> bool {
        self.new_nodes.contains(&node_id)
    }
}
