mod checked_map;
mod error;
mod feature_store;
mod initial_properties;
mod listener;
mod node_feature;
mod node_id;
mod state_node;
mod state_tree;

pub use checked_map::CheckedMap;
pub use error::{FeatureError, StateTreeError};
pub use feature_store::FeatureStore;
pub use initial_properties::{InitialPropertiesHandler, NewNodeTracker};
pub use listener::{BindingListener, ListenerHandle, ListenerOutcome, ListenerSet, UnregisterListener};
pub use node_feature::{FeatureKind, ListFeature, ListItem, MapFeature, MapProperty, NodeFeature, PropertyValue};
pub use node_id::{FeatureId, NodeId};
pub use state_node::StateNode;
pub use state_tree::StateTree;
