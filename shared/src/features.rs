//! Well-known feature ids and the property keys stored in them.
//!
//! Any other small integer is a valid, unnamed feature id; these are the
//! ones the tree and the RPC layer interpret.

use crate::tree::FeatureId;

/// Map: tag, visibility, enablement and payload of an element
pub const ELEMENT_DATA: FeatureId = 0;
/// Map: element properties, the target of client property syncs
pub const ELEMENT_PROPERTIES: FeatureId = 1;
/// List: child element nodes in DOM order
pub const ELEMENT_CHILDREN: FeatureId = 2;
/// Map: element attributes
pub const ELEMENT_ATTRIBUTES: FeatureId = 3;
/// Map: DOM event types the client should report
pub const ELEMENT_LISTENERS: FeatureId = 4;
/// List: nodes attached to an existing client element outside the children list
pub const VIRTUAL_CHILDREN: FeatureId = 5;
/// Map: inert state of a node
pub const INERT_DATA: FeatureId = 6;
/// List: model items whose nodes are shared by reference
pub const MODEL_LIST: FeatureId = 7;

pub mod element_data {
    pub const TAG: &str = "tag";
    pub const VISIBLE: &str = "visible";
    pub const ENABLED: &str = "enabled";
    pub const PAYLOAD: &str = "payload";
}

pub mod inert_data {
    pub const INERT_SELF: &str = "inertSelf";
    pub const IGNORE_PARENT_INERT: &str = "ignoreParentInert";
}
