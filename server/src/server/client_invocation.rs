use serde_json::{json, Value};

use treesync_shared::NodeId;

/// A call the server queues for the client to execute
#[derive(Clone, Debug, PartialEq)]
pub enum ClientInvocation {
    /// Completes the client promise of a published method call
    ResolvePromise {
        promise: u32,
        value: Value,
        target: NodeId,
    },
    /// Fails the client promise of a published method call
    RejectPromise { promise: u32, target: NodeId },
    /// Asks the client to bind an existing child element of `parent`
    AttachExistingElement {
        parent: NodeId,
        requested: NodeId,
        tag: String,
        previous_sibling: Option<NodeId>,
    },
    /// Asks the client to bind the element with the given id inside `parent`
    AttachExistingElementById {
        parent: NodeId,
        requested: NodeId,
        tag: String,
        id: String,
    },
}

impl ClientInvocation {
    pub fn name(&self) -> &'static str {
        match self {
            ClientInvocation::ResolvePromise { .. } => "resolvePromise",
            ClientInvocation::RejectPromise { .. } => "rejectPromise",
            ClientInvocation::AttachExistingElement { .. } => "attachExistingElement",
            ClientInvocation::AttachExistingElementById { .. } => "attachExistingElementById",
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ClientInvocation::ResolvePromise {
                promise,
                value,
                target,
            } => json!({
                "type": self.name(),
                "promise": promise,
                "value": value,
                "target": target.to_u32(),
            }),
            ClientInvocation::RejectPromise { promise, target } => json!({
                "type": self.name(),
                "promise": promise,
                "target": target.to_u32(),
            }),
            ClientInvocation::AttachExistingElement {
                parent,
                requested,
                tag,
                previous_sibling,
            } => json!({
                "type": self.name(),
                "parent": parent.to_u32(),
                "requested": requested.to_u32(),
                "tag": tag,
                "previousSibling": previous_sibling.map(|sibling| sibling.to_u32()),
            }),
            ClientInvocation::AttachExistingElementById {
                parent,
                requested,
                tag,
                id,
            } => json!({
                "type": self.name(),
                "parent": parent.to_u32(),
                "requested": requested.to_u32(),
                "tag": tag,
                "id": id,
            }),
        }
    }
}
