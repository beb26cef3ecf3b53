//! Inbound client commands: gating and the handler of each command kind.

mod attach_handler;
mod dispatcher;
mod error;
mod event_handler;
mod map_sync_handler;
mod navigation_handler;
mod published_handler;

pub use dispatcher::{DispatchOutcome, IgnoreReason, RpcDispatcher};
pub use error::RpcError;
pub use event_handler::POLL_EVENT_TYPE;
pub use navigation_handler::{HistoryChangeHandler, HistoryStateChange};
