//! Type-name resolution for runtime code and declaration metadata
//!
//! Names are resolved through a [`NameResolver`], which borrows the object
//! model, the type registry and the per-type [`EmissionContext`]. Module
//! boundaries crossed while naming are recorded on the context as
//! dependency edges.

pub mod context;
pub mod declaration;
pub mod error;
pub mod options;
pub mod qualify;
pub mod resolver;
pub mod runtime_name;

pub use context::{
    AnonymousTypes, CustomNameProvider, EmissionContext, NameOverrides, NoCustomNames,
    ScriptNameAttribute,
};
pub use error::{EmitSite, NamingError};
pub use options::NameOptions;
pub use qualify::{namespace_and_filename, NamespaceFile};
pub use resolver::NameResolver;
