//! # Treesync Server
//! Holds the authoritative state tree of a UI and applies the commands its
//! client sends, subject to the attachment, visibility, enablement and
//! inertness of their target nodes.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub use treesync_shared as shared;

pub mod element;
pub mod published;
pub mod rpc;

mod server;

pub use rpc::{
    DispatchOutcome, HistoryChangeHandler, HistoryStateChange, IgnoreReason, RpcDispatcher,
    RpcError,
};
pub use server::{ClientInvocation, ServerConfig, UiContext};
