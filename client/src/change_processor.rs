use std::collections::HashSet;

use log::{debug, trace};
use serde_json::Value;

use treesync_shared::{
    protocol::change_codec, ChangeRecord, DecodeError, ListItem, NodeId, PropertyValue, SpliceAdd,
    StateNode, StateTree,
};

/// Applies one change batch to a mirrored StateTree.
///
/// Every `attach` record of the batch is applied first so that later records
/// may reference nodes attached further down the batch. The remaining
/// records are then applied in their original order.
///
/// Records that reference unknown nodes are protocol violations and panic,
/// unless the tree is resynchronizing, in which case they are skipped.
pub struct TreeChangeProcessor<'t> {
    tree: &'t mut StateTree,
    touched: HashSet<NodeId>,
}

impl<'t> TreeChangeProcessor<'t> {
    pub fn new(tree: &'t mut StateTree) -> Self {
        Self {
            tree,
            touched: HashSet::new(),
        }
    }

    /// Applies the batch and returns every node it touched. Nodes detached by
    /// the batch are not reported.
    ///
    /// # Panics
    ///
    /// Panics if another batch is in progress on the tree, or on any
    /// protocol violation in the batch.
    pub fn process(mut self, changes: &[ChangeRecord]) -> HashSet<NodeId> {
        self.tree.begin_batch();

        for change in changes.iter().filter(|change| change.is_attach()) {
            self.attach(change.node());
        }
        for change in changes.iter().filter(|change| !change.is_attach()) {
            self.apply(change);
        }

        self.tree.set_resync(false);
        self.tree.end_batch();

        trace!(
            "Applied {} changes, {} nodes touched",
            changes.len(),
            self.touched.len()
        );
        self.touched
    }

    fn attach(&mut self, node_id: NodeId) {
        if node_id.is_root() {
            return;
        }
        if self.tree.is_resync() && self.tree.has_node(&node_id) {
            debug!("Node {} already registered during resync", node_id);
            self.touched.insert(node_id);
            return;
        }

        self.tree.register_node(StateNode::new(node_id));
        self.touched.insert(node_id);
    }

    fn apply(&mut self, change: &ChangeRecord) {
        let node_id = change.node();
        if !self.resolve(&node_id, change) {
            return;
        }

        match change {
            ChangeRecord::Attach { .. } => {}
            ChangeRecord::Detach { .. } => {
                self.tree.unregister_node(&node_id);
                self.touched.remove(&node_id);
                return;
            }
            ChangeRecord::Noop { feature, kind, .. } => {
                self.node_mut(&node_id).features_mut().ensure(*feature, *kind);
            }
            ChangeRecord::Put {
                feature, key, value, ..
            } => {
                if let PropertyValue::Node(child) = value {
                    if !self.resolve(child, change) {
                        return;
                    }
                }

                self.node_mut(&node_id)
                    .map_mut(*feature)
                    .property_mut(key)
                    .set_value(value.clone());

                if let PropertyValue::Node(child) = value {
                    self.tree.set_parent(child, Some(node_id));
                }
            }
            ChangeRecord::Remove { feature, key, .. } => {
                self.node_mut(&node_id)
                    .map_mut(*feature)
                    .property_mut(key)
                    .remove_value();
            }
            ChangeRecord::Splice {
                feature,
                index,
                remove,
                add,
                ..
            } => {
                let insert = match add {
                    SpliceAdd::None => Vec::new(),
                    SpliceAdd::Values(values) => values.iter().cloned().map(ListItem::Value).collect(),
                    SpliceAdd::Nodes(children) => {
                        for child in children {
                            if !self.resolve(child, change) {
                                return;
                            }
                        }
                        children.iter().copied().map(ListItem::Node).collect()
                    }
                };

                self.node_mut(&node_id)
                    .list_mut(*feature)
                    .splice(*index, *remove, insert);

                if let SpliceAdd::Nodes(children) = add {
                    for child in children {
                        self.tree.set_parent(child, Some(node_id));
                    }
                }
            }
            ChangeRecord::Clear { feature, .. } => {
                self.node_mut(&node_id).list_mut(*feature).clear();
            }
        }

        self.touched.insert(node_id);
    }

    /// Returns false if the record must be skipped
    fn resolve(&self, node_id: &NodeId, change: &ChangeRecord) -> bool {
        if self.tree.has_node(node_id) {
            return true;
        }
        if self.tree.is_resync() {
            debug!(
                "Skipping change {} during resync, node {} is not registered",
                change.log(),
                node_id
            );
            return false;
        }
        panic!(
            "Change {} references node {} which is not registered",
            change.log(),
            node_id
        );
    }

    fn node_mut(&mut self, node_id: &NodeId) -> &mut StateNode {
        match self.tree.get_node_mut(node_id) {
            Some(node) => node,
            None => panic!("Node {} is not registered", node_id),
        }
    }
}

/// Applies a batch of change records to the tree
pub fn process_changes(tree: &mut StateTree, changes: &[ChangeRecord]) -> HashSet<NodeId> {
    TreeChangeProcessor::new(tree).process(changes)
}

/// Decodes a JSON change batch and applies it to the tree. Nothing is applied
/// if any record fails to decode.
pub fn process_json(tree: &mut StateTree, json: &Value) -> Result<HashSet<NodeId>, DecodeError> {
    let changes = change_codec::decode_batch(json)?;
    Ok(process_changes(tree, &changes))
}
