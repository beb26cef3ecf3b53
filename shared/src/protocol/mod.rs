//! Wire records exchanged between the two halves of a tree and their JSON
//! encodings.

pub mod change_codec;
pub mod constants;
pub mod rpc_codec;

mod change;
mod error;
mod json_reader;
mod rpc;

pub use change::{ChangeRecord, ChangeType, SpliceAdd};
pub use error::DecodeError;
pub use rpc::{AttachResponse, NavigationTrigger, RpcCommand, RpcInvocation};
