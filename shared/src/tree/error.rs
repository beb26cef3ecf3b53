use thiserror::Error;

/// Errors reported by the non-panicking `try_*` operations of a StateTree.
///
/// Every variant is a protocol violation between server and client; the
/// panicking counterparts raise the same message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateTreeError {
    /// A node with this id is already registered
    #[error("Node {node_id} is already registered")]
    NodeAlreadyRegistered { node_id: u32 },

    /// The node was unregistered before and can never be registered again
    #[error("Node {node_id} has been unregistered and cannot be registered again")]
    NodeWasUnregistered { node_id: u32 },

    /// No node is registered under this id
    #[error("Node {node_id} is not registered")]
    NodeNotRegistered { node_id: u32 },

    /// The root node is permanent
    #[error("Root node {node_id} cannot be unregistered")]
    RootNodeUnregister { node_id: u32 },

    /// A batch was started while another one is being applied
    #[error("Cannot begin a change batch while another batch is in progress")]
    BatchAlreadyInProgress,

    /// A batch was ended while none is being applied
    #[error("Cannot end a change batch when no batch is in progress")]
    NoBatchInProgress,

    /// Every id up to `u32::MAX` is taken or has been handed out
    #[error("Cannot create a node, all node ids up to {} have been used", u32::MAX)]
    NodeIdsExhausted,

    /// Setting this parent would make the node its own ancestor
    #[error("Node {node_id} cannot become a child of its descendant {parent_id}")]
    ParentCycle { node_id: u32, parent_id: u32 },
}

/// Errors accessing a feature with the wrong container kind
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("Feature {feature_id} of node {node_id} is a {actual} feature, not a {expected} feature")]
    KindMismatch {
        node_id: u32,
        feature_id: u8,
        expected: &'static str,
        actual: &'static str,
    },
}
