use std::collections::VecDeque;

use log::debug;
use serde_json::{json, Map, Value};

use treesync_shared::{
    features::ELEMENT_PROPERTIES,
    protocol::{constants::NODE_REFERENCE_ID, rpc_codec},
    AttachResponse, FeatureId, NavigationTrigger, NodeId, PropertyValue, RpcCommand,
    RpcInvocation, StateTree,
};

/// Queue of client commands waiting to be sent to the server.
///
/// The transport drains the queue with `take_outgoing` or
/// `take_outgoing_json`; commands keep the order they were queued in.
#[derive(Default)]
pub struct ServerConnector {
    outgoing: VecDeque<RpcInvocation>,
}

impl ServerConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a sync of the current value of an element property.
    ///
    /// Returns false without queueing anything if the node is unknown, or if
    /// the initial-properties handler suppresses the update because the value
    /// was just received from the server.
    pub fn sync_property(&mut self, tree: &mut StateTree, node_id: NodeId, property: &str) -> bool {
        self.sync_feature_property(tree, node_id, ELEMENT_PROPERTIES, property)
    }

    pub fn sync_feature_property(
        &mut self,
        tree: &mut StateTree,
        node_id: NodeId,
        feature: FeatureId,
        property: &str,
    ) -> bool {
        let Some(node) = tree.get_node(&node_id) else {
            debug!("Not syncing property {} of unknown node {}", property, node_id);
            return false;
        };
        let value = match node.map(feature).and_then(|map| map.get_value(property)) {
            None => Value::Null,
            Some(PropertyValue::Json(value)) => value.clone(),
            Some(PropertyValue::Node(child)) => json!({ NODE_REFERENCE_ID: child.to_u32() }),
        };

        if tree
            .initial_properties_handler_mut()
            .handle_property_update(node_id, feature, property)
        {
            debug!(
                "Property {} of node {} was set by the server, not syncing",
                property, node_id
            );
            return false;
        }

        self.push(
            node_id,
            RpcCommand::MapSync {
                feature,
                property: property.to_string(),
                value,
            },
        );
        true
    }

    pub fn send_event(&mut self, node_id: NodeId, event_type: &str, data: Option<Map<String, Value>>) {
        self.push(
            node_id,
            RpcCommand::Event {
                event_type: event_type.to_string(),
                data,
            },
        );
    }

    pub fn send_navigation(
        &mut self,
        location: &str,
        state: Option<Value>,
        trigger: NavigationTrigger,
    ) {
        self.push(
            NodeId::ROOT,
            RpcCommand::Navigation {
                location: location.to_string(),
                state,
                trigger,
            },
        );
    }

    /// Answers an attach request for an existing element
    pub fn send_attach_response(&mut self, parent: NodeId, response: AttachResponse) {
        let command = if response.id.is_some() {
            RpcCommand::AttachExistingElementById(response)
        } else {
            RpcCommand::AttachExistingElement(response)
        };
        self.push(parent, command);
    }

    pub fn send_published_event(
        &mut self,
        node_id: NodeId,
        method: &str,
        args: Vec<Value>,
        promise: Option<u32>,
    ) {
        self.push(
            node_id,
            RpcCommand::PublishedEventHandler {
                method: method.to_string(),
                args,
                promise,
            },
        );
    }

    pub fn pending(&self) -> usize {
        self.outgoing.len()
    }

    pub fn take_outgoing(&mut self) -> Vec<RpcInvocation> {
        self.outgoing.drain(..).collect()
    }

    /// Drains the queue as one JSON array
    pub fn take_outgoing_json(&mut self) -> Value {
        rpc_codec::encode_batch(&self.take_outgoing())
    }

    fn push(&mut self, node_id: NodeId, command: RpcCommand) {
        self.outgoing.push_back(RpcInvocation::new(node_id, command));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::process_json;

    use super::*;

    #[test]
    fn property_sync_is_suppressed_until_flush() {
        let mut tree = StateTree::new();
        let mut connector = ServerConnector::new();
        process_json(
            &mut tree,
            &json!([
                { "type": "attach", "node": 2 },
                { "type": "put", "node": 2, "feat": 1, "key": "value", "value": "a" }
            ]),
        )
        .unwrap();

        assert!(!connector.sync_property(&mut tree, NodeId::new(2), "value"));
        assert_eq!(connector.pending(), 0);

        tree.flush_initial_properties();
        assert!(connector.sync_property(&mut tree, NodeId::new(2), "value"));
        assert_eq!(
            connector.take_outgoing_json(),
            json!([{ "type": "mSync", "node": 2, "feature": 1, "property": "value", "value": "a" }])
        );
        assert_eq!(connector.pending(), 0);
    }

    #[test]
    fn node_valued_property_is_sent_as_reference() {
        let mut tree = StateTree::new();
        let child = tree.create_node();
        tree.root_mut()
            .map_mut(ELEMENT_PROPERTIES)
            .property_mut("item")
            .set_value(PropertyValue::Node(child));
        let mut connector = ServerConnector::new();

        assert!(connector.sync_property(&mut tree, NodeId::ROOT, "item"));

        let outgoing = connector.take_outgoing();
        assert!(matches!(
            &outgoing[0].command,
            RpcCommand::MapSync { value, .. } if *value == json!({ "nodeId": child.to_u32() })
        ));
    }

    #[test]
    fn unknown_node_is_not_synced() {
        let mut tree = StateTree::new();
        let mut connector = ServerConnector::new();

        assert!(!connector.sync_property(&mut tree, NodeId::new(40), "value"));
        assert_eq!(connector.pending(), 0);
    }

    #[test]
    fn commands_keep_queue_order() {
        let mut connector = ServerConnector::new();
        connector.send_event(NodeId::new(3), "click", None);
        connector.send_navigation("home", None, NavigationTrigger::Link);

        let outgoing = connector.take_outgoing();
        assert_eq!(outgoing[0].type_name(), "event");
        assert_eq!(outgoing[1].type_name(), "navigation");
        assert_eq!(outgoing[1].node, NodeId::ROOT);
    }
}
