//! Object model, type registry and naming primitives for nomen

pub mod error;
pub mod model;
pub mod module;
pub mod module_graph;
pub mod naming;
pub mod normalizer;
pub mod registry;
pub mod settings;

pub use error::CoreError;
pub use model::{DefId, DefKind, KnownType, Markers, TypeDef, TypeGraph, TypeId, TypeShape};
pub use module::{Module, ModuleDependency, ModuleKind, TypeInfo};
pub use module_graph::ModuleGraph;
pub use normalizer::NameNormalizer;
pub use registry::{RecordId, TypeRecord, TypeRegistry};
pub use settings::{EmitterSettings, FileNameCasing, OutputBy, OutputGrammar};
