use std::collections::BTreeSet;

use log::{debug, warn};
use serde_json::Value;

use treesync_shared::{protocol::rpc_codec, DecodeError, RpcCommand, RpcInvocation};

use crate::{
    element::{is_inert, ElementListenerMap},
    rpc::{
        attach_handler, event_handler, event_handler::POLL_EVENT_TYPE, map_sync_handler,
        navigation_handler, published_handler, RpcError,
    },
    server::UiContext,
};

/// Why a client command was dropped without being applied
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// The target node is not registered
    UnknownNode,
    /// The target node is registered but not connected to the root
    Detached,
    /// The target node or one of its ancestors is hidden
    Inactive,
    /// The target node is inert and the command is not allowed through
    Inert,
    /// The target element is disabled
    Disabled,
    /// Nothing on the server listens for the command
    NoListener,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    Handled,
    Ignored(IgnoreReason),
}

impl DispatchOutcome {
    pub fn is_handled(&self) -> bool {
        *self == DispatchOutcome::Handled
    }
}

/// Routes decoded client commands to their handlers after checking that the
/// target node may receive them.
///
/// Commands for unknown, detached, inactive or inert nodes are ignored and
/// reported as `DispatchOutcome::Ignored`. Commands that break the contract
/// between client and server are reported as `RpcError`.
pub struct RpcDispatcher<'u> {
    ui: &'u mut UiContext,
}

impl<'u> RpcDispatcher<'u> {
    pub fn new(ui: &'u mut UiContext) -> Self {
        Self { ui }
    }

    pub fn dispatch(&mut self, invocation: &RpcInvocation) -> Result<DispatchOutcome, RpcError> {
        let node_id = invocation.node;
        let tree = self.ui.tree();

        if !tree.has_node(&node_id) {
            debug!(
                "Ignored '{}' for unknown node {}",
                invocation.type_name(),
                node_id
            );
            return Ok(DispatchOutcome::Ignored(IgnoreReason::UnknownNode));
        }
        if !tree.is_attached(&node_id) {
            debug!(
                "Ignored '{}' for detached node {}",
                invocation.type_name(),
                node_id
            );
            return Ok(DispatchOutcome::Ignored(IgnoreReason::Detached));
        }
        if !tree.is_active(&node_id) {
            debug!(
                "Ignored '{}' for inactive node {}",
                invocation.type_name(),
                node_id
            );
            return Ok(DispatchOutcome::Ignored(IgnoreReason::Inactive));
        }
        if is_inert(tree, &node_id) && !self.allows_inert(invocation) {
            warn!(
                "Ignored '{}' for inert node {}",
                invocation.type_name(),
                node_id
            );
            return Ok(DispatchOutcome::Ignored(IgnoreReason::Inert));
        }

        match &invocation.command {
            RpcCommand::Event { event_type, data } => {
                event_handler::handle(self.ui, node_id, event_type, data.as_ref())
            }
            RpcCommand::MapSync {
                feature,
                property,
                value,
            } => map_sync_handler::handle(self.ui, node_id, *feature, property, value),
            RpcCommand::Navigation {
                location,
                state,
                trigger,
            } => navigation_handler::handle(self.ui, location, state.as_ref(), *trigger),
            RpcCommand::AttachExistingElement(response) => {
                attach_handler::handle(self.ui, node_id, response, false)
            }
            RpcCommand::AttachExistingElementById(response) => {
                attach_handler::handle(self.ui, node_id, response, true)
            }
            RpcCommand::PublishedEventHandler {
                method,
                args,
                promise,
            } => published_handler::handle(self.ui, node_id, method, args, *promise),
        }
    }

    /// Dispatches the commands in order. A failing command does not stop the
    /// ones after it.
    pub fn dispatch_all(
        &mut self,
        invocations: &[RpcInvocation],
    ) -> Vec<Result<DispatchOutcome, RpcError>> {
        invocations
            .iter()
            .map(|invocation| self.dispatch(invocation))
            .collect()
    }

    /// Decodes a JSON array of commands and dispatches them. Nothing is
    /// dispatched if any command fails to decode.
    pub fn dispatch_json(
        &mut self,
        json: &Value,
    ) -> Result<Vec<Result<DispatchOutcome, RpcError>>, DecodeError> {
        let invocations = rpc_codec::decode_batch(json)?;
        Ok(self.dispatch_all(&invocations))
    }

    fn allows_inert(&self, invocation: &RpcInvocation) -> bool {
        let node_id = invocation.node;
        match &invocation.command {
            RpcCommand::Event { event_type, .. } if event_type == POLL_EVENT_TYPE => {
                self.is_legitimate_poll(invocation)
            }
            RpcCommand::Event { event_type, .. } => self
                .ui
                .tree()
                .get_node(&node_id)
                .and_then(|node| node.node_data::<ElementListenerMap>())
                .is_some_and(|listeners| listeners.allows_inert(event_type)),
            RpcCommand::PublishedEventHandler { method, .. } => self
                .ui
                .components()
                .get(&node_id)
                .and_then(|component| component.resolve(method).ok())
                .is_some_and(|method| method.allows_inert()),
            _ => false,
        }
    }

    /// A poll passes an inert root only if polling is enabled and the record
    /// carries nothing beyond the poll itself
    fn is_legitimate_poll(&self, invocation: &RpcInvocation) -> bool {
        let allowed: BTreeSet<&str> = ["type", "node", "event"].into_iter().collect();
        self.ui.is_polling()
            && invocation.node == self.ui.tree().root_id()
            && invocation
                .keys
                .iter()
                .all(|key| allowed.contains(key.as_str()))
    }
}
