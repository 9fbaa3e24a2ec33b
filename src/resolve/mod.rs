//! Per-file resolution: variables, tag filtering, overrides and destinations.
//!
//! Everything here is a pure function of the manifests; nothing touches the
//! file system.

pub mod destination;
pub mod overrides;
pub mod schema;
pub mod tags;
pub mod vars;

pub use destination::build_destination;
pub use overrides::{
    destination_override, find_component_override, find_file_override, is_file_skipped,
};
pub use schema::validate_component_schema;
pub use tags::should_include;
pub use vars::{
    component_stack, file_stack, resolve_variables, RequestVars, VarLayer, VarLayerStack,
    VarSource,
};
