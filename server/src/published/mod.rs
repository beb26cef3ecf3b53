//! Component methods published to the client and the typing of their
//! arguments.

mod component;
mod param_type;

pub use component::{
    ComponentLookup, ComponentRegistry, MethodHandler, MethodTable, PublishedComponent,
    PublishedMethod,
};
pub use param_type::ParamType;
