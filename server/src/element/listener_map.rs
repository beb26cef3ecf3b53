use std::collections::HashMap;

use log::debug;
use serde_json::{Map, Value};

use treesync_shared::{features::ELEMENT_LISTENERS, ListenerHandle, NodeId, PropertyValue, StateTree};

/// Whether client updates are accepted while an element is disabled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisabledUpdateMode {
    /// Updates are dropped while the element is disabled
    #[default]
    OnlyWhenEnabled,
    /// Updates are accepted regardless of the enabled state
    Always,
}

/// A DOM event reported by the client
#[derive(Clone, Debug, PartialEq)]
pub struct DomEvent {
    pub node: NodeId,
    pub event_type: String,
    pub data: Map<String, Value>,
}

pub type DomEventListener = dyn FnMut(&DomEvent);

/// How a DOM listener reacts to disabled and inert elements
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DomListenerOptions {
    pub mode: DisabledUpdateMode,
    pub allow_inert: bool,
}

impl DomListenerOptions {
    pub fn always() -> Self {
        Self {
            mode: DisabledUpdateMode::Always,
            allow_inert: false,
        }
    }

    pub fn allow_inert(mut self) -> Self {
        self.allow_inert = true;
        self
    }
}

struct DomListenerRegistration {
    handle: ListenerHandle,
    options: DomListenerOptions,
    listener: Box<DomEventListener>,
}

/// Server side DOM listeners and property update modes of one element,
/// stored as side data of its node
#[derive(Default)]
pub struct ElementListenerMap {
    listeners: HashMap<String, Vec<DomListenerRegistration>>,
    property_modes: HashMap<String, DisabledUpdateMode>,
    next_handle: u32,
}

impl ElementListenerMap {
    pub fn add_listener(
        &mut self,
        event_type: &str,
        options: DomListenerOptions,
        listener: Box<DomEventListener>,
    ) -> ListenerHandle {
        let handle = ListenerHandle::new(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(DomListenerRegistration {
                handle,
                options,
                listener,
            });
        handle
    }

    pub fn remove_listener(&mut self, event_type: &str, handle: &ListenerHandle) -> bool {
        let Some(registrations) = self.listeners.get_mut(event_type) else {
            return false;
        };
        let before = registrations.len();
        registrations.retain(|registration| registration.handle != *handle);
        let removed = registrations.len() != before;
        if registrations.is_empty() {
            self.listeners.remove(event_type);
        }
        removed
    }

    pub fn has_listener(&self, event_type: &str) -> bool {
        self.listeners.contains_key(event_type)
    }

    /// True if some listener of the event type accepts events from an inert
    /// element
    pub fn allows_inert(&self, event_type: &str) -> bool {
        self.listeners
            .get(event_type)
            .is_some_and(|registrations| {
                registrations
                    .iter()
                    .any(|registration| registration.options.allow_inert)
            })
    }

    pub fn set_property_update_mode(&mut self, property: &str, mode: DisabledUpdateMode) {
        self.property_modes.insert(property.to_string(), mode);
    }

    /// The declared mode of a synchronized property, if any
    pub fn property_update_mode(&self, property: &str) -> Option<DisabledUpdateMode> {
        self.property_modes.get(property).copied()
    }

    /// Delivers the event to its listeners and returns how many were invoked.
    /// On a disabled element only listeners with `DisabledUpdateMode::Always`
    /// are invoked.
    pub fn fire(&mut self, event: &DomEvent, enabled: bool) -> usize {
        let Some(registrations) = self.listeners.get_mut(&event.event_type) else {
            return 0;
        };
        let mut fired = 0;
        for registration in registrations.iter_mut() {
            if !enabled && registration.options.mode != DisabledUpdateMode::Always {
                continue;
            }
            (registration.listener)(event);
            fired += 1;
        }
        fired
    }
}

/// Registers a DOM listener on the node and publishes the event type in the
/// node's listeners feature so the client starts reporting it.
///
/// # Panics
///
/// Panics if the node is not registered.
pub fn add_event_listener(
    tree: &mut StateTree,
    node_id: &NodeId,
    event_type: &str,
    options: DomListenerOptions,
    listener: Box<DomEventListener>,
) -> ListenerHandle {
    let Some(node) = tree.get_node_mut(node_id) else {
        panic!("Node {} is not registered", node_id);
    };
    node.map_mut(ELEMENT_LISTENERS)
        .property_mut(event_type)
        .set_value(PropertyValue::Json(Value::Bool(true)));
    node.node_data_or_default::<ElementListenerMap>()
        .add_listener(event_type, options, listener)
}

/// Removes a DOM listener. The event type is withdrawn from the listeners
/// feature once its last listener is gone.
pub fn remove_event_listener(
    tree: &mut StateTree,
    node_id: &NodeId,
    event_type: &str,
    handle: &ListenerHandle,
) -> bool {
    let Some(node) = tree.get_node_mut(node_id) else {
        debug!("Cannot remove listener from unknown node {}", node_id);
        return false;
    };
    let Some(listeners) = node.node_data_mut::<ElementListenerMap>() else {
        return false;
    };
    let removed = listeners.remove_listener(event_type, handle);
    if removed && !listeners.has_listener(event_type) {
        node.map_mut(ELEMENT_LISTENERS)
            .property_mut(event_type)
            .remove_value();
    }
    removed
}

/// Declares how client syncs of an element property are treated while the
/// element is disabled
pub fn set_property_update_mode(
    tree: &mut StateTree,
    node_id: &NodeId,
    property: &str,
    mode: DisabledUpdateMode,
) {
    let Some(node) = tree.get_node_mut(node_id) else {
        panic!("Node {} is not registered", node_id);
    };
    node.node_data_or_default::<ElementListenerMap>()
        .set_property_update_mode(property, mode);
}
