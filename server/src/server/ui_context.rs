use std::{collections::VecDeque, time::Duration};

use log::debug;
use serde_json::Value;

use treesync_shared::{
    features::{element_data, ELEMENT_DATA},
    NodeId, PropertyValue, StateTree,
};

use crate::{
    element::{AttachExistingElementFeature, ChildElementConsumer, PendingAttach},
    published::ComponentRegistry,
    rpc::HistoryChangeHandler,
    server::{ClientInvocation, ServerConfig},
};

/// The server half of one synchronized UI: the authoritative StateTree plus
/// the collaborators client commands are routed to and the queue of calls
/// to be sent to the client.
pub struct UiContext {
    tree: StateTree,
    config: ServerConfig,
    poll_interval: Option<Duration>,
    history_handler: Option<Box<dyn HistoryChangeHandler>>,
    components: ComponentRegistry,
    invocations: VecDeque<ClientInvocation>,
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

impl UiContext {
    pub fn new(config: ServerConfig) -> Self {
        let mut tree = StateTree::new();
        tree.root_mut()
            .map_mut(ELEMENT_DATA)
            .property_mut(element_data::TAG)
            .set_value(PropertyValue::Json(Value::String(config.root_tag.clone())));

        Self {
            tree,
            poll_interval: config.poll_interval,
            config,
            history_handler: None,
            components: ComponentRegistry::new(),
            invocations: VecDeque::new(),
        }
    }

    pub fn tree(&self) -> &StateTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut StateTree {
        &mut self.tree
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    // Polling

    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval
    }

    pub fn set_poll_interval(&mut self, poll_interval: Option<Duration>) {
        self.poll_interval = poll_interval;
    }

    pub fn is_polling(&self) -> bool {
        self.poll_interval.is_some_and(|interval| !interval.is_zero())
    }

    // Collaborators

    pub fn set_history_change_handler(&mut self, handler: Box<dyn HistoryChangeHandler>) {
        self.history_handler = Some(handler);
    }

    pub fn history_change_handler_mut(&mut self) -> Option<&mut (dyn HistoryChangeHandler + 'static)> {
        self.history_handler.as_deref_mut()
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    // Client invocations

    pub fn push_invocation(&mut self, invocation: ClientInvocation) {
        debug!("Queueing client invocation {}", invocation.name());
        self.invocations.push_back(invocation);
    }

    pub fn pending_invocations(&self) -> usize {
        self.invocations.len()
    }

    pub fn take_invocations(&mut self) -> Vec<ClientInvocation> {
        self.invocations.drain(..).collect()
    }

    pub fn take_invocations_json(&mut self) -> Value {
        Value::Array(
            self.take_invocations()
                .iter()
                .map(ClientInvocation::to_json)
                .collect(),
        )
    }

    // Attaching existing client elements

    /// Asks the client to bind an existing child element of `parent`, the
    /// first one with the given tag after `previous_sibling`. Returns the node
    /// created for the element; the consumer learns the outcome once the
    /// client answers.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not registered.
    pub fn attach_existing_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        previous_sibling: Option<NodeId>,
        consumer: Box<dyn ChildElementConsumer>,
    ) -> NodeId {
        let requested = self.register_attach_request(
            parent,
            PendingAttach {
                tag: tag.to_string(),
                previous_sibling,
                id: None,
                consumer,
            },
        );
        self.push_invocation(ClientInvocation::AttachExistingElement {
            parent,
            requested,
            tag: tag.to_string(),
            previous_sibling,
        });
        requested
    }

    /// Like `attach_existing_element`, looking the element up by its id
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not registered.
    pub fn attach_existing_element_by_id(
        &mut self,
        parent: NodeId,
        tag: &str,
        id: &str,
        consumer: Box<dyn ChildElementConsumer>,
    ) -> NodeId {
        let requested = self.register_attach_request(
            parent,
            PendingAttach {
                tag: tag.to_string(),
                previous_sibling: None,
                id: Some(id.to_string()),
                consumer,
            },
        );
        self.push_invocation(ClientInvocation::AttachExistingElementById {
            parent,
            requested,
            tag: tag.to_string(),
            id: id.to_string(),
        });
        requested
    }

    fn register_attach_request(&mut self, parent: NodeId, pending: PendingAttach) -> NodeId {
        if !self.tree.has_node(&parent) {
            panic!("Node {} is not registered", parent);
        }

        let requested = self.tree.create_node();
        if let Some(node) = self.tree.get_node_mut(&requested) {
            node.map_mut(ELEMENT_DATA)
                .property_mut(element_data::TAG)
                .set_value(PropertyValue::Json(Value::String(pending.tag.clone())));
        }
        if let Some(node) = self.tree.get_node_mut(&parent) {
            node.node_data_or_default::<AttachExistingElementFeature>()
                .register(requested, pending);
        }
        requested
    }
}
