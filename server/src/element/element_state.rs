//! Element state derived from the element data and inert data features.

use serde_json::Value;

use treesync_shared::{
    features::{element_data, inert_data, ELEMENT_DATA, INERT_DATA},
    FeatureId, NodeId, PropertyValue, StateNode, StateTree,
};

fn flag(node: &StateNode, feature: FeatureId, key: &str) -> Option<bool> {
    match node.map(feature)?.get_value(key)? {
        PropertyValue::Json(Value::Bool(value)) => Some(*value),
        _ => None,
    }
}

fn set_flag(tree: &mut StateTree, node_id: &NodeId, feature: FeatureId, key: &str, value: bool) {
    let Some(node) = tree.get_node_mut(node_id) else {
        panic!("Node {} is not registered", node_id);
    };
    node.map_mut(feature)
        .property_mut(key)
        .set_value(PropertyValue::Json(Value::Bool(value)));
}

/// A node is enabled unless it, or any of its ancestors, has its element data
/// `enabled` flag set to false. Unknown nodes are not enabled.
pub fn is_enabled(tree: &StateTree, node_id: &NodeId) -> bool {
    let mut current = Some(*node_id);
    let mut steps = 0;
    while let Some(id) = current {
        let Some(node) = tree.get_node(&id) else {
            return id != *node_id;
        };
        if flag(node, ELEMENT_DATA, element_data::ENABLED) == Some(false) {
            return false;
        }
        steps += 1;
        if steps > tree.node_count() {
            break;
        }
        current = node.parent();
    }
    true
}

/// Sets the node's own enabled flag; descendants inherit a disabled state
pub fn set_enabled(tree: &mut StateTree, node_id: &NodeId, enabled: bool) {
    set_flag(tree, node_id, ELEMENT_DATA, element_data::ENABLED, enabled);
}

/// A node is inert if it is inert itself, or if its parent is inert and the
/// node does not ignore its parent's inert state
pub fn is_inert(tree: &StateTree, node_id: &NodeId) -> bool {
    let mut current = Some(*node_id);
    let mut steps = 0;
    while let Some(id) = current {
        let Some(node) = tree.get_node(&id) else {
            return false;
        };
        if flag(node, INERT_DATA, inert_data::INERT_SELF) == Some(true) {
            return true;
        }
        if flag(node, INERT_DATA, inert_data::IGNORE_PARENT_INERT) == Some(true) {
            return false;
        }
        steps += 1;
        if steps > tree.node_count() {
            break;
        }
        current = node.parent();
    }
    false
}

pub fn set_inert(tree: &mut StateTree, node_id: &NodeId, inert: bool) {
    set_flag(tree, node_id, INERT_DATA, inert_data::INERT_SELF, inert);
}

pub fn set_ignore_parent_inert(tree: &mut StateTree, node_id: &NodeId, ignore: bool) {
    set_flag(tree, node_id, INERT_DATA, inert_data::IGNORE_PARENT_INERT, ignore);
}
