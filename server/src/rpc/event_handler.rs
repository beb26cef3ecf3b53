use log::debug;
use serde_json::{Map, Value};

use treesync_shared::NodeId;

use crate::{
    element::{is_enabled, DomEvent, ElementListenerMap},
    rpc::{DispatchOutcome, IgnoreReason, RpcError},
    server::UiContext,
};

/// Event type of the client's periodic poll
pub const POLL_EVENT_TYPE: &str = "ui-poll";

pub(crate) fn handle(
    ui: &mut UiContext,
    node_id: NodeId,
    event_type: &str,
    data: Option<&Map<String, Value>>,
) -> Result<DispatchOutcome, RpcError> {
    let enabled = is_enabled(ui.tree(), &node_id);
    let event = DomEvent {
        node: node_id,
        event_type: event_type.to_string(),
        data: data.cloned().unwrap_or_default(),
    };

    let listeners = ui
        .tree_mut()
        .get_node_mut(&node_id)
        .and_then(|node| node.node_data_mut::<ElementListenerMap>())
        .filter(|listeners| listeners.has_listener(event_type));
    let Some(listeners) = listeners else {
        debug!("No listener for '{}' event on node {}", event_type, node_id);
        return Ok(DispatchOutcome::Ignored(IgnoreReason::NoListener));
    };

    if listeners.fire(&event, enabled) == 0 {
        debug!("Ignored '{}' event for disabled node {}", event_type, node_id);
        return Ok(DispatchOutcome::Ignored(IgnoreReason::Disabled));
    }
    Ok(DispatchOutcome::Handled)
}
