use std::collections::HashMap;

use crate::tree::{
    error::FeatureError,
    node_feature::{FeatureKind, ListFeature, MapFeature, NodeFeature},
    node_id::{FeatureId, NodeId},
};

/// Per-node features keyed by feature id. A feature is created, empty, on
/// first mutable access and lives as long as the node. The kind of a feature
/// is fixed by whichever access created it.
#[derive(Clone, Debug)]
pub struct FeatureStore {
    node_id: NodeId,
    features: HashMap<FeatureId, NodeFeature>,
}

impl FeatureStore {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            features: HashMap::new(),
        }
    }

    pub fn has_feature(&self, feature_id: FeatureId) -> bool {
        self.features.contains_key(&feature_id)
    }

    pub fn get(&self, feature_id: FeatureId) -> Option<&NodeFeature> {
        self.features.get(&feature_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, &NodeFeature)> {
        self.features.iter().map(|(id, feature)| (*id, feature))
    }

    /// Creates the feature with the given kind if it does not exist yet
    pub fn ensure(&mut self, feature_id: FeatureId, kind: FeatureKind) {
        match kind {
            FeatureKind::Map => {
                self.map_mut(feature_id);
            }
            FeatureKind::List => {
                self.list_mut(feature_id);
            }
        }
    }

    /// Map lookup which never creates the feature
    ///
    /// # Panics
    ///
    /// Panics if the feature exists as a list.
    pub fn map(&self, feature_id: FeatureId) -> Option<&MapFeature> {
        let feature = self.features.get(&feature_id)?;
        match feature {
            NodeFeature::Map(map) => Some(map),
            NodeFeature::List(_) => panic!("{}", self.mismatch(feature_id, FeatureKind::Map, FeatureKind::List)),
        }
    }

    /// List lookup which never creates the feature
    ///
    /// # Panics
    ///
    /// Panics if the feature exists as a map.
    pub fn list(&self, feature_id: FeatureId) -> Option<&ListFeature> {
        let feature = self.features.get(&feature_id)?;
        match feature {
            NodeFeature::List(list) => Some(list),
            NodeFeature::Map(_) => panic!("{}", self.mismatch(feature_id, FeatureKind::List, FeatureKind::Map)),
        }
    }

    /// # Panics
    ///
    /// Panics if the feature exists as a list.
    /// Consider using `try_map_mut` for non-panicking error handling.
    pub fn map_mut(&mut self, feature_id: FeatureId) -> &mut MapFeature {
        match self.try_map_mut(feature_id) {
            Ok(map) => map,
            Err(err) => panic!("{}", err),
        }
    }

    /// # Panics
    ///
    /// Panics if the feature exists as a map.
    /// Consider using `try_list_mut` for non-panicking error handling.
    pub fn list_mut(&mut self, feature_id: FeatureId) -> &mut ListFeature {
        match self.try_list_mut(feature_id) {
            Ok(list) => list,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_map_mut(&mut self, feature_id: FeatureId) -> Result<&mut MapFeature, FeatureError> {
        let node_id = self.node_id;
        let feature = self
            .features
            .entry(feature_id)
            .or_insert_with(|| NodeFeature::new(FeatureKind::Map));
        match feature {
            NodeFeature::Map(map) => Ok(map),
            NodeFeature::List(_) => Err(FeatureError::KindMismatch {
                node_id: node_id.to_u32(),
                feature_id,
                expected: FeatureKind::Map.name(),
                actual: FeatureKind::List.name(),
            }),
        }
    }

    pub fn try_list_mut(&mut self, feature_id: FeatureId) -> Result<&mut ListFeature, FeatureError> {
        let node_id = self.node_id;
        let feature = self
            .features
            .entry(feature_id)
            .or_insert_with(|| NodeFeature::new(FeatureKind::List));
        match feature {
            NodeFeature::List(list) => Ok(list),
            NodeFeature::Map(_) => Err(FeatureError::KindMismatch {
                node_id: node_id.to_u32(),
                feature_id,
                expected: FeatureKind::List.name(),
                actual: FeatureKind::Map.name(),
            }),
        }
    }

    /// Every node referenced from any feature of this node
    pub fn child_nodes(&self) -> Vec<NodeId> {
        let mut feature_ids: Vec<&FeatureId> = self.features.keys().collect();
        feature_ids.sort();
        feature_ids
            .into_iter()
            .flat_map(|id| self.features[id].child_nodes())
            .collect()
    }

    fn mismatch(&self, feature_id: FeatureId, expected: FeatureKind, actual: FeatureKind) -> FeatureError {
        FeatureError::KindMismatch {
            node_id: self.node_id.to_u32(),
            feature_id,
            expected: expected.name(),
            actual: actual.name(),
        }
    }
}
