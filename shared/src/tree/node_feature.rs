use std::collections::BTreeMap;

use serde_json::Value;

use crate::tree::node_id::NodeId;

/// The value stored in a map property: either plain JSON data, or an edge to
/// another node of the same tree.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Json(Value),
    Node(NodeId),
}

impl PropertyValue {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            PropertyValue::Json(value) => Some(value),
            PropertyValue::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            PropertyValue::Json(_) => None,
            PropertyValue::Node(node) => Some(*node),
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        PropertyValue::Json(value)
    }
}

impl From<NodeId> for PropertyValue {
    fn from(node: NodeId) -> Self {
        PropertyValue::Node(node)
    }
}

/// One keyed slot of a MapFeature. "No value" and "explicitly null" are
/// distinct: the former is `None`, the latter `Some(Json(Null))`.
#[derive(Clone, Debug, PartialEq)]
pub struct MapProperty {
    name: String,
    value: Option<PropertyValue>,
}

impl MapProperty {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&PropertyValue> {
        self.value.as_ref()
    }

    pub fn json_value(&self) -> Option<&Value> {
        self.value.as_ref().and_then(PropertyValue::as_json)
    }

    pub fn node_value(&self) -> Option<NodeId> {
        self.value.as_ref().and_then(PropertyValue::as_node)
    }

    /// Overwrites any previous value. Nothing referenced by the old value is
    /// detached.
    pub fn set_value(&mut self, value: PropertyValue) -> Option<PropertyValue> {
        self.value.replace(value)
    }

    pub fn remove_value(&mut self) -> Option<PropertyValue> {
        self.value.take()
    }
}

/// String-keyed properties, created lazily on first access
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapFeature {
    properties: BTreeMap<String, MapProperty>,
}

impl MapFeature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn get_property(&self, name: &str) -> Option<&MapProperty> {
        self.properties.get(name)
    }

    /// Returns the property with the given name, creating an empty one if
    /// it has never been accessed
    pub fn property_mut(&mut self, name: &str) -> &mut MapProperty {
        self.properties
            .entry(name.to_string())
            .or_insert_with(|| MapProperty::new(name))
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn properties(&self) -> impl Iterator<Item = &MapProperty> {
        self.properties.values()
    }

    /// Value lookup which does not create the property
    pub fn get_value(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name).and_then(MapProperty::value)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ListItem {
    Value(Value),
    Node(NodeId),
}

impl ListItem {
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            ListItem::Value(_) => None,
            ListItem::Node(node) => Some(*node),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ListItem::Value(value) => Some(value),
            ListItem::Node(_) => None,
        }
    }
}

/// Ordered, index-addressable sequence of values or node references
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListFeature {
    items: Vec<ListItem>,
}

impl ListFeature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ListItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListItem> {
        self.items.iter()
    }

    pub fn contains_node(&self, node: &NodeId) -> bool {
        self.items.iter().any(|item| item.as_node() == Some(*node))
    }

    pub fn index_of_node(&self, node: &NodeId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.as_node() == Some(*node))
    }

    pub fn push(&mut self, item: ListItem) {
        self.items.push(item);
    }

    /// Removes `remove_count` items starting at `index`, then inserts `insert`
    /// at that same index. Returns the removed items.
    ///
    /// # Panics
    ///
    /// Panics if `index + remove_count` exceeds the list length.
    pub fn splice(
        &mut self,
        index: usize,
        remove_count: usize,
        insert: Vec<ListItem>,
    ) -> Vec<ListItem> {
        let end = index.checked_add(remove_count).unwrap_or(usize::MAX);
        if end > self.items.len() {
            panic!(
                "Cannot splice list of length {} at index {} removing {} items",
                self.items.len(),
                index,
                remove_count
            );
        }

        self.items.splice(index..end, insert).collect()
    }

    pub fn clear(&mut self) -> Vec<ListItem> {
        std::mem::take(&mut self.items)
    }

    pub fn child_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().filter_map(ListItem::as_node)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureKind {
    Map,
    List,
}

impl FeatureKind {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureKind::Map => "Map",
            FeatureKind::List => "List",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeFeature {
    Map(MapFeature),
    List(ListFeature),
}

impl NodeFeature {
    pub fn new(kind: FeatureKind) -> Self {
        match kind {
            FeatureKind::Map => NodeFeature::Map(MapFeature::new()),
            FeatureKind::List => NodeFeature::List(ListFeature::new()),
        }
    }

    pub fn kind(&self) -> FeatureKind {
        match self {
            NodeFeature::Map(_) => FeatureKind::Map,
            NodeFeature::List(_) => FeatureKind::List,
        }
    }

    pub fn as_map(&self) -> Option<&MapFeature> {
        match self {
            NodeFeature::Map(map) => Some(map),
            NodeFeature::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListFeature> {
        match self {
            NodeFeature::Map(_) => None,
            NodeFeature::List(list) => Some(list),
        }
    }

    /// Every node referenced by this feature, in storage order
    pub fn child_nodes(&self) -> Vec<NodeId> {
        match self {
            NodeFeature::Map(map) => map
                .properties()
                .filter_map(MapProperty::node_value)
                .collect(),
            NodeFeature::List(list) => list.child_nodes().collect(),
        }
    }
}
