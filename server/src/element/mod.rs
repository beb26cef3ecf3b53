//! Element level state kept alongside the tree: enablement, inertness, DOM
//! listeners and pending attach requests.

mod attach_existing;
mod element_state;
mod listener_map;

pub use attach_existing::{AttachExistingElementFeature, ChildElementConsumer, PendingAttach};
pub use element_state::{is_enabled, is_inert, set_enabled, set_ignore_parent_inert, set_inert};
pub use listener_map::{
    add_event_listener, remove_event_listener, set_property_update_mode, DisabledUpdateMode,
    DomEvent, DomEventListener, DomListenerOptions, ElementListenerMap,
};
