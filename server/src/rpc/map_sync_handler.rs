use log::{debug, warn};
use serde_json::Value;

use treesync_shared::{
    features::ELEMENT_PROPERTIES, protocol::rpc_codec::node_reference, FeatureId, NodeId,
    PropertyValue, StateTree,
};

use crate::{
    element::{is_enabled, DisabledUpdateMode, ElementListenerMap},
    rpc::{DispatchOutcome, IgnoreReason, RpcError},
    server::UiContext,
};

pub(crate) fn handle(
    ui: &mut UiContext,
    node_id: NodeId,
    feature: FeatureId,
    property: &str,
    value: &Value,
) -> Result<DispatchOutcome, RpcError> {
    if feature != ELEMENT_PROPERTIES {
        return Err(RpcError::UnsupportedFeature {
            node_id: node_id.to_u32(),
            feature,
        });
    }

    let tree = ui.tree_mut();
    if !is_enabled(tree, &node_id) && !accepts_disabled_update(tree, &node_id, property) {
        let had_value = tree
            .get_node(&node_id)
            .and_then(|node| node.map(ELEMENT_PROPERTIES))
            .and_then(|properties| properties.get_value(property))
            .is_some();
        if had_value {
            warn!(
                "Ignored sync of property '{}' for disabled node {}, the server keeps its value",
                property, node_id
            );
        } else {
            debug!(
                "Ignored sync of property '{}' for disabled node {}",
                property, node_id
            );
        }
        return Ok(DispatchOutcome::Ignored(IgnoreReason::Disabled));
    }

    let value = resolve_value(tree, &node_id, value);
    if let Some(node) = tree.get_node_mut(&node_id) {
        node.map_mut(ELEMENT_PROPERTIES)
            .property_mut(property)
            .set_value(value);
    }
    Ok(DispatchOutcome::Handled)
}

fn accepts_disabled_update(tree: &StateTree, node_id: &NodeId, property: &str) -> bool {
    tree.get_node(node_id)
        .and_then(|node| node.node_data::<ElementListenerMap>())
        .and_then(|listeners| listeners.property_update_mode(property))
        == Some(DisabledUpdateMode::Always)
}

/// Turns a `{ "nodeId": n }` value into the property value to store. A node
/// held in a list of its parent is copied, a node held as a map property of
/// its parent is stored by reference, anything else is stored as sent.
fn resolve_value(tree: &mut StateTree, target: &NodeId, value: &Value) -> PropertyValue {
    let raw = PropertyValue::Json(value.clone());
    let Some(referenced) = node_reference(value) else {
        return raw;
    };
    let Some(parent) = tree.get_node(&referenced).and_then(|node| node.parent()) else {
        return raw;
    };
    let Some(parent_node) = tree.get_node(&parent) else {
        return raw;
    };

    let in_list = parent_node.features().iter().any(|(_, feature)| {
        feature
            .as_list()
            .is_some_and(|list| list.contains_node(&referenced))
    });
    if in_list {
        return PropertyValue::Node(copy_node(tree, &referenced, target));
    }

    let in_map = parent_node.features().iter().any(|(_, feature)| {
        feature.as_map().is_some_and(|map| {
            map.properties()
                .any(|property| property.node_value() == Some(referenced))
        })
    });
    if in_map {
        return PropertyValue::Node(referenced);
    }

    raw
}

/// Creates a node carrying a copy of the element properties of `original`,
/// parented to `target`.
///
/// Every sync makes a fresh copy. A copy replaced by a later sync stays
/// registered under `target`, the overwritten property does not release it.
fn copy_node(tree: &mut StateTree, original: &NodeId, target: &NodeId) -> NodeId {
    let properties: Vec<(String, PropertyValue)> = tree
        .get_node(original)
        .and_then(|node| node.map(ELEMENT_PROPERTIES))
        .map(|map| {
            map.properties()
                .filter_map(|property| {
                    property
                        .value()
                        .map(|value| (property.name().to_string(), value.clone()))
                })
                .collect()
        })
        .unwrap_or_default();

    let copy = tree.create_node();
    if let Some(node) = tree.get_node_mut(&copy) {
        let map = node.map_mut(ELEMENT_PROPERTIES);
        for (name, value) in properties {
            map.property_mut(&name).set_value(value);
        }
    }
    tree.set_parent(&copy, Some(*target));
    debug!("Copied node {} into node {} for a property sync", original, copy);
    copy
}
