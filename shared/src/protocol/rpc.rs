use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::tree::{FeatureId, NodeId};

/// What made the client report a location change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavigationTrigger {
    /// A click on a router link
    Link,
    /// Browser history traversal (back/forward)
    History,
}

/// Client answer to a request to attach an existing client-side element
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachResponse {
    /// Node created for the request on the server
    pub requested: NodeId,
    /// Node the client bound the element to; `None` if no element was found
    pub assigned: Option<NodeId>,
    pub tag: String,
    /// Position of the element among its parent's children
    pub index: Option<usize>,
    /// Element id, only set for by-id requests
    pub id: Option<String>,
}

/// A decoded client command
#[derive(Clone, Debug, PartialEq)]
pub enum RpcCommand {
    Event {
        event_type: String,
        data: Option<Map<String, Value>>,
    },
    MapSync {
        feature: FeatureId,
        property: String,
        value: Value,
    },
    Navigation {
        location: String,
        state: Option<Value>,
        trigger: NavigationTrigger,
    },
    AttachExistingElement(AttachResponse),
    AttachExistingElementById(AttachResponse),
    PublishedEventHandler {
        method: String,
        args: Vec<Value>,
        promise: Option<u32>,
    },
}

impl RpcCommand {
    /// Wire type name of the command
    pub fn type_name(&self) -> &'static str {
        use super::constants::*;
        match self {
            RpcCommand::Event { .. } => RPC_TYPE_EVENT,
            RpcCommand::MapSync { .. } => RPC_TYPE_MAP_SYNC,
            RpcCommand::Navigation { .. } => RPC_TYPE_NAVIGATION,
            RpcCommand::AttachExistingElement(_) => RPC_TYPE_ATTACH_EXISTING_ELEMENT,
            RpcCommand::AttachExistingElementById(_) => RPC_TYPE_ATTACH_EXISTING_ELEMENT_BY_ID,
            RpcCommand::PublishedEventHandler { .. } => RPC_TYPE_PUBLISHED_EVENT_HANDLER,
        }
    }
}

/// One client command addressed to a node, together with the set of keys
/// its wire record carried
#[derive(Clone, Debug, PartialEq)]
pub struct RpcInvocation {
    pub node: NodeId,
    pub command: RpcCommand,
    pub keys: BTreeSet<String>,
}

impl RpcInvocation {
    /// Builds an invocation whose key set is the one its encoding would carry
    pub fn new(node: NodeId, command: RpcCommand) -> Self {
        let mut invocation = Self {
            node,
            command,
            keys: BTreeSet::new(),
        };
        if let Value::Object(object) = super::rpc_codec::to_json(&invocation) {
            invocation.keys = object.keys().cloned().collect();
        }
        invocation
    }

    pub fn type_name(&self) -> &'static str {
        self.command.type_name()
    }
}
