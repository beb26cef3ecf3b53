use serde_json::Value;

use treesync_shared::{
    protocol::change_codec, ChangeRecord, FeatureId, FeatureKind, NodeId, PropertyValue,
    SpliceAdd,
};

/// Fluent builder for change batches, as the server would send them
#[derive(Default)]
pub struct ChangeBatchBuilder {
    records: Vec<ChangeRecord>,
}

impl ChangeBatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(mut self, node: u32) -> Self {
        self.records.push(ChangeRecord::Attach {
            node: NodeId::new(node),
        });
        self
    }

    pub fn detach(mut self, node: u32) -> Self {
        self.records.push(ChangeRecord::Detach {
            node: NodeId::new(node),
        });
        self
    }

    pub fn empty(mut self, node: u32, feature: FeatureId, kind: FeatureKind) -> Self {
        self.records.push(ChangeRecord::Noop {
            node: NodeId::new(node),
            feature,
            kind,
        });
        self
    }

    pub fn put(self, node: u32, feature: FeatureId, key: &str, value: Value) -> Self {
        self.put_property(node, feature, key, PropertyValue::Json(value))
    }

    pub fn put_node(self, node: u32, feature: FeatureId, key: &str, child: u32) -> Self {
        self.put_property(node, feature, key, PropertyValue::Node(NodeId::new(child)))
    }

    pub fn remove(mut self, node: u32, feature: FeatureId, key: &str) -> Self {
        self.records.push(ChangeRecord::Remove {
            node: NodeId::new(node),
            feature,
            key: key.to_string(),
        });
        self
    }

    pub fn splice_values(self, node: u32, feature: FeatureId, index: usize, remove: usize, values: Vec<Value>) -> Self {
        self.splice(node, feature, index, remove, SpliceAdd::Values(values))
    }

    pub fn splice_nodes(self, node: u32, feature: FeatureId, index: usize, remove: usize, children: &[u32]) -> Self {
        let children = children.iter().copied().map(NodeId::new).collect();
        self.splice(node, feature, index, remove, SpliceAdd::Nodes(children))
    }

    pub fn splice_remove(self, node: u32, feature: FeatureId, index: usize, remove: usize) -> Self {
        self.splice(node, feature, index, remove, SpliceAdd::None)
    }

    pub fn clear(mut self, node: u32, feature: FeatureId) -> Self {
        self.records.push(ChangeRecord::Clear {
            node: NodeId::new(node),
            feature,
        });
        self
    }

    pub fn build(self) -> Vec<ChangeRecord> {
        self.records
    }

    /// The batch in its wire form
    pub fn to_json(&self) -> Value {
        change_codec::encode_batch(&self.records)
    }

    fn put_property(mut self, node: u32, feature: FeatureId, key: &str, value: PropertyValue) -> Self {
        self.records.push(ChangeRecord::Put {
            node: NodeId::new(node),
            feature,
            key: key.to_string(),
            value,
        });
        self
    }

    fn splice(mut self, node: u32, feature: FeatureId, index: usize, remove: usize, add: SpliceAdd) -> Self {
        self.records.push(ChangeRecord::Splice {
            node: NodeId::new(node),
            feature,
            index,
            remove,
            add,
        });
        self
    }
}
