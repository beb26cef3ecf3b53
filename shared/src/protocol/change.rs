use serde_json::Value;

use crate::tree::{FeatureId, FeatureKind, NodeId, PropertyValue};

/// Discriminator of a change record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Attach,
    Detach,
    Noop,
    Put,
    Remove,
    Splice,
    Clear,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        use super::constants::*;
        match self {
            ChangeType::Attach => CHANGE_TYPE_ATTACH,
            ChangeType::Detach => CHANGE_TYPE_DETACH,
            ChangeType::Noop => CHANGE_TYPE_NOOP,
            ChangeType::Put => CHANGE_TYPE_PUT,
            ChangeType::Remove => CHANGE_TYPE_REMOVE,
            ChangeType::Splice => CHANGE_TYPE_SPLICE,
            ChangeType::Clear => CHANGE_TYPE_CLEAR,
        }
    }
}

/// Items inserted by a splice. A record carries values or node references,
/// never both; `None` makes the splice a pure removal.
#[derive(Clone, Debug, PartialEq)]
pub enum SpliceAdd {
    None,
    Values(Vec<Value>),
    Nodes(Vec<NodeId>),
}

impl SpliceAdd {
    pub fn len(&self) -> usize {
        match self {
            SpliceAdd::None => 0,
            SpliceAdd::Values(values) => values.len(),
            SpliceAdd::Nodes(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One mutation of a change batch
#[derive(Clone, Debug, PartialEq)]
pub enum ChangeRecord {
    /// Creates and registers a node with the given id
    Attach { node: NodeId },
    /// Unregisters the node and clears its parent
    Detach { node: NodeId },
    /// Makes an empty feature observable
    Noop {
        node: NodeId,
        feature: FeatureId,
        kind: FeatureKind,
    },
    Put {
        node: NodeId,
        feature: FeatureId,
        key: String,
        value: PropertyValue,
    },
    Remove {
        node: NodeId,
        feature: FeatureId,
        key: String,
    },
    Splice {
        node: NodeId,
        feature: FeatureId,
        index: usize,
        remove: usize,
        add: SpliceAdd,
    },
    Clear { node: NodeId, feature: FeatureId },
}

impl ChangeRecord {
    pub fn node(&self) -> NodeId {
        match self {
            ChangeRecord::Attach { node }
            | ChangeRecord::Detach { node }
            | ChangeRecord::Noop { node, .. }
            | ChangeRecord::Put { node, .. }
            | ChangeRecord::Remove { node, .. }
            | ChangeRecord::Splice { node, .. }
            | ChangeRecord::Clear { node, .. } => *node,
        }
    }

    pub fn change_type(&self) -> ChangeType {
        match self {
            ChangeRecord::Attach { .. } => ChangeType::Attach,
            ChangeRecord::Detach { .. } => ChangeType::Detach,
            ChangeRecord::Noop { .. } => ChangeType::Noop,
            ChangeRecord::Put { .. } => ChangeType::Put,
            ChangeRecord::Remove { .. } => ChangeType::Remove,
            ChangeRecord::Splice { .. } => ChangeType::Splice,
            ChangeRecord::Clear { .. } => ChangeType::Clear,
        }
    }

    pub fn is_attach(&self) -> bool {
        matches!(self, ChangeRecord::Attach { .. })
    }

    pub fn log(&self) -> String {
        format!("{} {}", self.change_type().as_str(), self.node())
    }
}
