use thiserror::Error;

/// A client command that does not fit the server's contract
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// Property syncs are only accepted for element properties
    #[error("Feature {feature} of node {node_id} does not accept property syncs")]
    UnsupportedFeature { node_id: u32, feature: u8 },

    /// An attach response for a request that was never issued, or was
    /// already answered
    #[error("Node {parent} has no pending attach request for node {requested}")]
    NoPendingAttach { parent: u32, requested: u32 },

    /// An attach response placing the element outside the children list
    #[error("Cannot attach node {requested} at index {index}, node {parent} has {len} children")]
    AttachIndexOutOfBounds {
        parent: u32,
        requested: u32,
        index: usize,
        len: usize,
    },

    #[error("No component is mapped to node {node_id}")]
    NoComponent { node_id: u32 },

    #[error("Component {component} has no published method '{method}'")]
    MethodNotFound { component: String, method: String },

    #[error("Component {component} has {count} published methods named '{method}'")]
    AmbiguousMethod {
        component: String,
        method: String,
        count: usize,
    },

    #[error("Method '{method}' expects {expected} arguments, got {actual}")]
    ArityMismatch {
        method: String,
        expected: String,
        actual: usize,
    },

    #[error("Argument {index} of method '{method}' is invalid: {reason}")]
    InvalidArgument {
        method: String,
        index: usize,
        reason: String,
    },

    /// The method itself reported a failure
    #[error("Method '{method}' failed: {message}")]
    MethodFailed { method: String, message: String },
}
