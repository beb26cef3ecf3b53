use log::warn;
use serde_json::Value;

use treesync_shared::NodeId;

use crate::{
    element::{is_enabled, DisabledUpdateMode},
    published::ComponentLookup,
    rpc::{DispatchOutcome, IgnoreReason, RpcError},
    server::{ClientInvocation, UiContext},
};

pub(crate) fn handle(
    ui: &mut UiContext,
    node_id: NodeId,
    method_name: &str,
    args: &[Value],
    promise: Option<u32>,
) -> Result<DispatchOutcome, RpcError> {
    let enabled = is_enabled(ui.tree(), &node_id);

    let Some(component) = ui.components_mut().component_mut(&node_id) else {
        return Err(RpcError::NoComponent {
            node_id: node_id.to_u32(),
        });
    };
    let method = component.resolve_mut(method_name)?;

    if !enabled && method.disabled_update_mode() != DisabledUpdateMode::Always {
        warn!(
            "Ignored call of method '{}' for disabled node {}",
            method_name, node_id
        );
        return Ok(DispatchOutcome::Ignored(IgnoreReason::Disabled));
    }

    let result = match method.decode_args(args) {
        Ok(decoded) => method
            .invoke(&decoded)
            .map_err(|message| RpcError::MethodFailed {
                method: method_name.to_string(),
                message,
            }),
        Err(err) => Err(err),
    };

    match (result, promise) {
        (Ok(value), Some(promise)) => {
            ui.push_invocation(ClientInvocation::ResolvePromise {
                promise,
                value,
                target: node_id,
            });
            Ok(DispatchOutcome::Handled)
        }
        (Ok(_), None) => Ok(DispatchOutcome::Handled),
        (Err(err), Some(promise)) => {
            ui.push_invocation(ClientInvocation::RejectPromise {
                promise,
                target: node_id,
            });
            Err(err)
        }
        (Err(err), None) => Err(err),
    }
}
