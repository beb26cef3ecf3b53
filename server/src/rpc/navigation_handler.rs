use log::debug;
use serde_json::Value;

use treesync_shared::NavigationTrigger;

use crate::{
    rpc::{DispatchOutcome, IgnoreReason, RpcError},
    server::UiContext,
};

/// A location change reported by the client
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryStateChange {
    pub location: String,
    pub state: Option<Value>,
    pub trigger: NavigationTrigger,
}

/// Receives the client's location changes
pub trait HistoryChangeHandler {
    fn on_history_state_change(&mut self, event: HistoryStateChange);
}

impl<F: FnMut(HistoryStateChange)> HistoryChangeHandler for F {
    fn on_history_state_change(&mut self, event: HistoryStateChange) {
        self(event)
    }
}

pub(crate) fn handle(
    ui: &mut UiContext,
    location: &str,
    state: Option<&Value>,
    trigger: NavigationTrigger,
) -> Result<DispatchOutcome, RpcError> {
    let Some(handler) = ui.history_change_handler_mut() else {
        debug!("No history change handler for navigation to '{}'", location);
        return Ok(DispatchOutcome::Ignored(IgnoreReason::NoListener));
    };

    handler.on_history_state_change(HistoryStateChange {
        location: location.to_string(),
        state: state.cloned(),
        trigger,
    });
    Ok(DispatchOutcome::Handled)
}
