use serde_json::Value;

use treesync_server::{DispatchOutcome, RpcDispatcher, RpcError, ServerConfig, UiContext};
use treesync_shared::{
    protocol::change_codec, ChangeRecord, ListItem, NodeFeature, NodeId, SpliceAdd,
};

/// Test harness for the server half of a UI
pub struct TestServer {
    ui: UiContext,
}

impl TestServer {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            ui: UiContext::new(config),
        }
    }

    pub fn ui(&self) -> &UiContext {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut UiContext {
        &mut self.ui
    }

    /// Creates a node and attaches it below `parent`
    pub fn add_child(&mut self, parent: NodeId) -> NodeId {
        let tree = self.ui.tree_mut();
        let child = tree.create_node();
        tree.set_parent(&child, Some(parent));
        child
    }

    /// Dispatches a JSON batch of client commands
    ///
    /// # Panics
    ///
    /// Panics if the batch does not decode.
    pub fn receive(&mut self, rpc_batch: &Value) -> Vec<Result<DispatchOutcome, RpcError>> {
        match RpcDispatcher::new(&mut self.ui).dispatch_json(rpc_batch) {
            Ok(results) => results,
            Err(err) => panic!("Client sent an undecodable batch: {}", err),
        }
    }

    /// A change batch that recreates the whole server tree on a fresh client
    pub fn mirror_batch(&self) -> Value {
        let tree = self.ui.tree();
        let mut records = Vec::new();
        let ids = tree.node_ids();

        for id in ids.iter().filter(|id| !id.is_root()) {
            records.push(ChangeRecord::Attach { node: *id });
        }
        for id in &ids {
            let Some(node) = tree.get_node(id) else {
                continue;
            };
            let mut features: Vec<_> = node.features().iter().collect();
            features.sort_by_key(|(feature, _)| *feature);
            for (feature, contents) in features {
                mirror_feature(&mut records, *id, feature, contents);
            }
        }

        change_codec::encode_batch(&records)
    }
}

fn mirror_feature(records: &mut Vec<ChangeRecord>, node: NodeId, feature: u8, contents: &NodeFeature) {
    match contents {
        NodeFeature::Map(map) => {
            if map.properties().all(|property| !property.has_value()) {
                records.push(ChangeRecord::Noop {
                    node,
                    feature,
                    kind: contents.kind(),
                });
            }
            for property in map.properties() {
                if let Some(value) = property.value() {
                    records.push(ChangeRecord::Put {
                        node,
                        feature,
                        key: property.name().to_string(),
                        value: value.clone(),
                    });
                }
            }
        }
        NodeFeature::List(list) => {
            if list.is_empty() {
                records.push(ChangeRecord::Noop {
                    node,
                    feature,
                    kind: contents.kind(),
                });
            }
            for (index, item) in list.iter().enumerate() {
                let add = match item {
                    ListItem::Value(value) => SpliceAdd::Values(vec![value.clone()]),
                    ListItem::Node(child) => SpliceAdd::Nodes(vec![*child]),
                };
                records.push(ChangeRecord::Splice {
                    node,
                    feature,
                    index,
                    remove: 0,
                    add,
                });
            }
        }
    }
}

impl Default for TestServer {
    fn default() -> Self {
        Self::new()
    }
}
