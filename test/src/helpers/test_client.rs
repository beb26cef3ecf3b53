use std::collections::HashSet;

use serde_json::Value;

use treesync_client::{process_json, ServerConnector};
use treesync_shared::{
    features::ELEMENT_PROPERTIES, NodeId, PropertyValue, StateTree,
};

/// Test harness for the client half of a UI: a mirrored tree plus the queue
/// of commands for the server
#[derive(Default)]
pub struct TestClient {
    tree: StateTree,
    connector: ServerConnector,
}

impl TestClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &StateTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut StateTree {
        &mut self.tree
    }

    pub fn connector_mut(&mut self) -> &mut ServerConnector {
        &mut self.connector
    }

    /// Applies a change batch and returns the touched nodes
    ///
    /// # Panics
    ///
    /// Panics if the batch does not decode.
    pub fn receive(&mut self, change_batch: &Value) -> HashSet<NodeId> {
        match process_json(&mut self.tree, change_batch) {
            Ok(touched) => touched,
            Err(err) => panic!("Server sent an undecodable batch: {}", err),
        }
    }

    /// Marks the nodes of the last batch as rendered, so later changes to
    /// their properties are synced back
    pub fn render(&mut self) {
        self.tree.flush_initial_properties();
    }

    /// Changes an element property locally, as user input would, and queues
    /// its sync. Returns whether a sync was queued.
    pub fn input(&mut self, node: NodeId, property: &str, value: Value) -> bool {
        if let Some(state_node) = self.tree.get_node_mut(&node) {
            state_node
                .map_mut(ELEMENT_PROPERTIES)
                .property_mut(property)
                .set_value(PropertyValue::Json(value));
        }
        self.connector.sync_property(&mut self.tree, node, property)
    }

    pub fn property(&self, node: NodeId, feature: u8, key: &str) -> Option<&PropertyValue> {
        self.tree
            .get_node(&node)
            .and_then(|state_node| state_node.map(feature))
            .and_then(|map| map.get_value(key))
    }

    pub fn take_outgoing(&mut self) -> Value {
        self.connector.take_outgoing_json()
    }
}
