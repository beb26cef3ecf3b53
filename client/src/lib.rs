//! # Treesync Client
//! Keeps a mirror of a server-held state tree up to date from change batches
//! and queues client commands to be sent back to the server.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use treesync_shared as shared;

mod change_processor;
mod server_connector;

pub use change_processor::{process_changes, process_json, TreeChangeProcessor};
pub use server_connector::ServerConnector;
