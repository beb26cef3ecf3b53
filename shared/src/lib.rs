//! # Treesync Shared
//! The synchronized state tree and the wire records shared between
//! treesync-server & treesync-client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub mod features;
pub mod protocol;
pub mod tree;

pub use protocol::{
    AttachResponse, ChangeRecord, ChangeType, DecodeError, NavigationTrigger, RpcCommand,
    RpcInvocation, SpliceAdd,
};
pub use tree::{
    BindingListener, FeatureError, FeatureId, FeatureKind, FeatureStore,
    InitialPropertiesHandler, ListFeature, ListItem, ListenerHandle, ListenerOutcome, MapFeature,
    MapProperty, NewNodeTracker, NodeFeature, NodeId, PropertyValue, StateNode, StateTree,
    StateTreeError, UnregisterListener,
};
