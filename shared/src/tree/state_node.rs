use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
};

use crate::tree::{
    feature_store::FeatureStore,
    listener::{BindingListener, ListenerHandle, ListenerSet, UnregisterListener},
    node_feature::{ListFeature, MapFeature},
    node_id::{FeatureId, NodeId},
};

/// A vertex of the synchronized tree.
///
/// The node only knows its parent by id; the owning StateTree is the single
/// owner of every node, and edges are plain id lookups into it.
pub struct StateNode {
    id: NodeId,
    parent: Option<NodeId>,
    features: FeatureStore,
    unregistered: bool,
    binding: Option<Box<dyn Any>>,
    binding_listeners: ListenerSet<BindingListener>,
    unregister_listeners: ListenerSet<UnregisterListener>,
    node_data: HashMap<TypeId, Box<dyn Any>>,
}

impl StateNode {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            parent: None,
            features: FeatureStore::new(id),
            unregistered: false,
            binding: None,
            binding_listeners: ListenerSet::new(),
            unregister_listeners: ListenerSet::new(),
            node_data: HashMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub fn is_unregistered(&self) -> bool {
        self.unregistered
    }

    // Features

    pub fn features(&self) -> &FeatureStore {
        &self.features
    }

    pub fn features_mut(&mut self) -> &mut FeatureStore {
        &mut self.features
    }

    pub fn has_feature(&self, feature_id: FeatureId) -> bool {
        self.features.has_feature(feature_id)
    }

    pub fn map(&self, feature_id: FeatureId) -> Option<&MapFeature> {
        self.features.map(feature_id)
    }

    pub fn map_mut(&mut self, feature_id: FeatureId) -> &mut MapFeature {
        self.features.map_mut(feature_id)
    }

    pub fn list(&self, feature_id: FeatureId) -> Option<&ListFeature> {
        self.features.list(feature_id)
    }

    pub fn list_mut(&mut self, feature_id: FeatureId) -> &mut ListFeature {
        self.features.list_mut(feature_id)
    }

    // Binding

    pub fn has_binding(&self) -> bool {
        self.binding.is_some()
    }

    pub fn binding<T: Any>(&self) -> Option<&T> {
        self.binding.as_ref().and_then(|binding| binding.downcast_ref::<T>())
    }

    /// Sets the external representation of this node and notifies binding
    /// listeners. A binding is established at most once per node.
    ///
    /// # Panics
    ///
    /// Panics if a binding is already present.
    pub fn set_binding(&mut self, binding: Box<dyn Any>) {
        if self.binding.is_some() {
            panic!("Node {} already has a binding", self.id);
        }
        self.binding = Some(binding);
        self.binding_listeners.notify(self.id);
    }

    pub fn add_binding_listener(&mut self, listener: Box<BindingListener>) -> ListenerHandle {
        self.binding_listeners.add(listener)
    }

    pub fn remove_binding_listener(&mut self, handle: &ListenerHandle) -> bool {
        self.binding_listeners.remove(handle)
    }

    // Unregister

    /// # Panics
    ///
    /// Panics if the node has already been unregistered.
    pub fn add_unregister_listener(&mut self, listener: Box<UnregisterListener>) -> ListenerHandle {
        if self.unregistered {
            panic!(
                "Cannot add an unregister listener to node {} which is already unregistered",
                self.id
            );
        }
        self.unregister_listeners.add(listener)
    }

    pub fn remove_unregister_listener(&mut self, handle: &ListenerHandle) -> bool {
        self.unregister_listeners.remove(handle)
    }

    /// Flips the node to unregistered and hands back the listeners to fire
    pub(crate) fn mark_unregistered(&mut self) -> Vec<Box<UnregisterListener>> {
        self.unregistered = true;
        self.parent = None;
        self.unregister_listeners.drain()
    }

    // Side-channel data

    pub fn set_node_data<T: Any>(&mut self, data: T) {
        self.node_data.insert(TypeId::of::<T>(), Box::new(data));
    }

    pub fn node_data<T: Any>(&self) -> Option<&T> {
        self.node_data
            .get(&TypeId::of::<T>())
            .and_then(|data| data.downcast_ref::<T>())
    }

    pub fn node_data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.node_data
            .get_mut(&TypeId::of::<T>())
            .and_then(|data| data.downcast_mut::<T>())
    }

    pub fn node_data_or_default<T: Any + Default>(&mut self) -> &mut T {
        let data = self
            .node_data
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(T::default()));
        match data.downcast_mut::<T>() {
            Some(data) => data,
            None => unreachable!("node data is keyed by its own TypeId"),
        }
    }

    pub fn remove_node_data<T: Any>(&mut self) -> Option<T> {
        self.node_data
            .remove(&TypeId::of::<T>())
            .and_then(|data| data.downcast::<T>().ok())
            .map(|data| *data)
    }
}

impl fmt::Debug for StateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("unregistered", &self.unregistered)
            .field("bound", &self.binding.is_some())
            .field("features", &self.features)
            .finish()
    }
}
