use log::debug;
use serde_json::Value;

use crate::{
    features::{element_data, ELEMENT_DATA},
    tree::{
        checked_map::CheckedMap,
        error::StateTreeError,
        initial_properties::{InitialPropertiesHandler, NewNodeTracker},
        node_feature::PropertyValue,
        node_id::NodeId,
        state_node::StateNode,
    },
};

/// Registry of every node of one synchronized tree.
///
/// The tree is the sole owner of its nodes. Node identity is mutated only
/// through `register_node`/`unregister_node`, which panic on protocol
/// violations; the `try_*` variants report the same conditions as
/// `StateTreeError`.
pub struct StateTree {
    nodes: CheckedMap<NodeId, StateNode>,
    /// `None` once the id space is used up
    next_id: Option<u32>,
    update_in_progress: bool,
    resync: bool,
    initial_properties: Box<dyn InitialPropertiesHandler>,
}

impl Default for StateTree {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTree {
    pub fn new() -> Self {
        Self::with_initial_properties_handler(Box::new(NewNodeTracker::new()))
    }

    pub fn with_initial_properties_handler(handler: Box<dyn InitialPropertiesHandler>) -> Self {
        let mut nodes = CheckedMap::new();
        nodes.insert(NodeId::ROOT, StateNode::new(NodeId::ROOT));
        Self {
            nodes,
            next_id: NodeId::ROOT.to_u32().checked_add(1),
            update_in_progress: false,
            resync: false,
            initial_properties: handler,
        }
    }

    pub fn root_id(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn root(&self) -> &StateNode {
        match self.nodes.get(&NodeId::ROOT) {
            Some(root) => root,
            None => unreachable!("root node is never unregistered"),
        }
    }

    pub fn root_mut(&mut self) -> &mut StateNode {
        match self.nodes.get_mut(&NodeId::ROOT) {
            Some(root) => root,
            None => unreachable!("root node is never unregistered"),
        }
    }

    // Registry

    /// Allocates an unused id, registers a fresh node under it and returns the
    /// id. Only the authoritative side assigns ids.
    ///
    /// # Panics
    ///
    /// Panics if every id up to `u32::MAX` has been handed out.
    /// Consider using `try_create_node` for non-panicking error handling.
    pub fn create_node(&mut self) -> NodeId {
        match self.try_create_node() {
            Ok(node_id) => node_id,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_create_node(&mut self) -> Result<NodeId, StateTreeError> {
        let Some(mut candidate) = self.next_id else {
            return Err(StateTreeError::NodeIdsExhausted);
        };
        while self.nodes.contains_key(&NodeId::new(candidate)) {
            let Some(next) = candidate.checked_add(1) else {
                self.next_id = None;
                return Err(StateTreeError::NodeIdsExhausted);
            };
            candidate = next;
        }
        self.next_id = Some(candidate);
        let node_id = NodeId::new(candidate);
        self.try_register_node(StateNode::new(node_id))?;
        Ok(node_id)
    }

    /// # Panics
    ///
    /// Panics if a node is already registered under the same id, or if the
    /// node has been unregistered before.
    /// Consider using `try_register_node` for non-panicking error handling.
    pub fn register_node(&mut self, node: StateNode) -> NodeId {
        match self.try_register_node(node) {
            Ok(node_id) => node_id,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_register_node(&mut self, node: StateNode) -> Result<NodeId, StateTreeError> {
        let node_id = node.id();
        if node.is_unregistered() {
            return Err(StateTreeError::NodeWasUnregistered {
                node_id: node_id.to_u32(),
            });
        }
        if self.nodes.contains_key(&node_id) {
            return Err(StateTreeError::NodeAlreadyRegistered {
                node_id: node_id.to_u32(),
            });
        }

        self.nodes.insert(node_id, node);
        if self.next_id.is_some_and(|next_id| node_id.to_u32() >= next_id) {
            self.next_id = node_id.to_u32().checked_add(1);
        }

        if self.update_in_progress {
            self.initial_properties.node_registered(node_id);
        }

        Ok(node_id)
    }

    /// Removes the node from the registry, clears its parent and fires its
    /// unregister listeners. Children are left untouched.
    ///
    /// # Panics
    ///
    /// Panics if nothing is registered under the id, or if it is the root.
    /// Consider using `try_unregister_node` for non-panicking error handling.
    pub fn unregister_node(&mut self, node_id: &NodeId) -> StateNode {
        match self.try_unregister_node(node_id) {
            Ok(node) => node,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_unregister_node(&mut self, node_id: &NodeId) -> Result<StateNode, StateTreeError> {
        if node_id.is_root() {
            return Err(StateTreeError::RootNodeUnregister {
                node_id: node_id.to_u32(),
            });
        }
        if !self.nodes.contains_key(node_id) {
            return Err(StateTreeError::NodeNotRegistered {
                node_id: node_id.to_u32(),
            });
        }

        let mut node = self.nodes.remove(node_id);
        let listeners = node.mark_unregistered();
        for listener in listeners {
            listener(*node_id);
        }

        Ok(node)
    }

    pub fn has_node(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn get_node(&self, node_id: &NodeId) -> Option<&StateNode> {
        self.nodes.get(node_id)
    }

    pub fn get_node_mut(&mut self, node_id: &NodeId) -> Option<&mut StateNode> {
        self.nodes.get_mut(node_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort();
        ids
    }

    // Edges

    /// Outside a change batch, a `parent` that is a descendant of `child` is
    /// rejected. Inside a batch the parent links of nodes moved by earlier
    /// records may still be stale, so only registration is checked.
    ///
    /// # Panics
    ///
    /// Panics if either node is not registered, or on a cycle outside a batch.
    /// Consider using `try_set_parent` for non-panicking error handling.
    pub fn set_parent(&mut self, child: &NodeId, parent: Option<NodeId>) {
        if let Err(err) = self.try_set_parent(child, parent) {
            panic!("{}", err);
        }
    }

    pub fn try_set_parent(
        &mut self,
        child: &NodeId,
        parent: Option<NodeId>,
    ) -> Result<(), StateTreeError> {
        if let Some(parent_id) = parent {
            if !self.nodes.contains_key(&parent_id) {
                return Err(StateTreeError::NodeNotRegistered {
                    node_id: parent_id.to_u32(),
                });
            }
            if !self.update_in_progress && self.is_ancestor_or_self(child, &parent_id) {
                return Err(StateTreeError::ParentCycle {
                    node_id: child.to_u32(),
                    parent_id: parent_id.to_u32(),
                });
            }
        }

        let Some(node) = self.nodes.get_mut(child) else {
            return Err(StateTreeError::NodeNotRegistered {
                node_id: child.to_u32(),
            });
        };
        node.set_parent(parent);

        Ok(())
    }

    fn is_ancestor_or_self(&self, ancestor: &NodeId, node_id: &NodeId) -> bool {
        let mut current = Some(*node_id);
        let mut steps = 0;
        while let Some(id) = current {
            if id == *ancestor {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                return false;
            }
            current = self.nodes.get(&id).and_then(StateNode::parent);
        }
        false
    }

    // Batch state

    /// # Panics
    ///
    /// Panics if a batch is already in progress.
    pub fn begin_batch(&mut self) {
        if let Err(err) = self.try_begin_batch() {
            panic!("{}", err);
        }
    }

    pub fn try_begin_batch(&mut self) -> Result<(), StateTreeError> {
        if self.update_in_progress {
            return Err(StateTreeError::BatchAlreadyInProgress);
        }
        self.update_in_progress = true;
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if no batch is in progress.
    pub fn end_batch(&mut self) {
        if let Err(err) = self.try_end_batch() {
            panic!("{}", err);
        }
    }

    pub fn try_end_batch(&mut self) -> Result<(), StateTreeError> {
        if !self.update_in_progress {
            return Err(StateTreeError::NoBatchInProgress);
        }
        self.update_in_progress = false;
        Ok(())
    }

    pub fn is_update_in_progress(&self) -> bool {
        self.update_in_progress
    }

    /// While set, change records referencing unknown node ids are skipped
    /// instead of treated as protocol violations
    pub fn set_resync(&mut self, resync: bool) {
        if resync {
            debug!("State tree entering resync");
        }
        self.resync = resync;
    }

    pub fn is_resync(&self) -> bool {
        self.resync
    }

    // Initial properties

    pub fn initial_properties_handler_mut(&mut self) -> &mut dyn InitialPropertiesHandler {
        self.initial_properties.as_mut()
    }

    pub fn flush_initial_properties(&mut self) {
        self.initial_properties.flush_property_updates();
    }

    // Derived state

    /// A node is visible unless its element data says `visible: false`
    pub fn is_visible(&self, node_id: &NodeId) -> bool {
        let Some(node) = self.nodes.get(node_id) else {
            return true;
        };
        let Some(element_data) = node.map(ELEMENT_DATA) else {
            return true;
        };
        !matches!(
            element_data.get_value(element_data::VISIBLE),
            Some(PropertyValue::Json(Value::Bool(false)))
        )
    }

    /// A node is active if it and every ancestor is visible. A parent id that
    /// is no longer registered ends the walk like a missing parent.
    pub fn is_active(&self, node_id: &NodeId) -> bool {
        let mut current = Some(*node_id);
        let mut steps = 0;
        while let Some(id) = current {
            if !self.is_visible(&id) {
                return false;
            }
            steps += 1;
            if steps > self.nodes.len() {
                break;
            }
            current = self.nodes.get(&id).and_then(StateNode::parent);
        }
        true
    }

    /// A node is attached if it is registered and its parent chain reaches
    /// the root
    pub fn is_attached(&self, node_id: &NodeId) -> bool {
        let mut current = *node_id;
        let mut steps = 0;
        loop {
            if current.is_root() {
                return true;
            }
            let Some(node) = self.nodes.get(&current) else {
                return false;
            };
            let Some(parent) = node.parent() else {
                return false;
            };
            steps += 1;
            if steps > self.nodes.len() {
                return false;
            }
            current = parent;
        }
    }
}
