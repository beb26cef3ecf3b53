use std::fmt;

/// Identifier of a StateNode. Assigned once by the authoritative side and
/// never handed to a different node.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Id of the root node of every StateTree
    pub const ROOT: NodeId = NodeId(1);

    pub const fn new(value: u32) -> Self {
        NodeId(value)
    }

    pub fn to_u32(&self) -> u32 {
        self.0
    }

    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        NodeId(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Small integer key of a feature within a node
pub type FeatureId = u8;
