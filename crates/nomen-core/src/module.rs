//! Output modules and per-type compile metadata

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Module system an output unit is emitted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleKind {
    #[default]
    None,
    Umd,
    CommonJs,
    Amd,
    Es6,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKind::None => write!(f, "none"),
            ModuleKind::Umd => write!(f, "umd"),
            ModuleKind::CommonJs => write!(f, "commonjs"),
            ModuleKind::Amd => write!(f, "amd"),
            ModuleKind::Es6 => write!(f, "es6"),
        }
    }
}

/// An output unit with its own export namespace
///
/// Modules are shared by reference (`Arc<Module>`) between every type that
/// belongs to them. Two modules are equal when name and kind match,
/// regardless of which `Arc` wraps them.
#[derive(Debug, Clone, Default, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Module name as used in dependency lists (e.g., "collections")
    pub name: String,
    /// Prefix other modules use to reach this one
    #[serde(default)]
    pub export_as_namespace: String,
    #[serde(default)]
    pub kind: ModuleKind,
    /// Suppress prefixing even though the module exists
    #[serde(default)]
    pub prevent_module_name: bool,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            export_as_namespace: name.clone(),
            name,
            kind: ModuleKind::None,
            prevent_module_name: false,
        }
    }

    pub fn with_export_as(mut self, namespace: impl Into<String>) -> Self {
        self.export_as_namespace = namespace.into();
        self
    }

    pub fn with_kind(mut self, kind: ModuleKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn preventing_name(mut self) -> Self {
        self.prevent_module_name = true;
        self
    }

    /// Value comparison for optional shared modules; `None` never equals a module
    pub fn same(a: Option<&Arc<Module>>, b: Option<&Arc<Module>>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a.as_ref() == b.as_ref(),
            (None, None) => true,
            _ => false,
        }
    }
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

/// Record that the currently emitting type references another output unit
///
/// For module edges `dependency_name` is the module name; for declaration
/// file references it is the target file name and the other fields stay
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModuleDependency {
    pub dependency_name: String,
    #[serde(default)]
    pub variable_name: String,
    #[serde(default)]
    pub kind: ModuleKind,
    #[serde(default)]
    pub prevent_name: bool,
}

impl ModuleDependency {
    /// Edge pointing at `module`
    pub fn on_module(module: &Module) -> Self {
        Self {
            dependency_name: module.name.clone(),
            variable_name: module.export_as_namespace.clone(),
            kind: module.kind,
            prevent_name: module.prevent_module_name,
        }
    }

    /// Edge pointing at another output file
    pub fn on_file(file_name: impl Into<String>) -> Self {
        Self {
            dependency_name: file_name.into(),
            ..Default::default()
        }
    }
}

/// Per-type compile metadata supplied by the build collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Registry key of the type this metadata describes
    pub key: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub module: Option<Arc<Module>>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<ModuleDependency>,
}

impl TypeInfo {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn in_module(mut self, module: Arc<Module>) -> Self {
        self.module = Some(module);
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Namespace part of the key, used when no explicit namespace was given
    pub fn key_namespace(&self) -> &str {
        let name_start = self.key.find('+').unwrap_or(self.key.len());
        match self.key[..name_start].rfind('.') {
            Some(idx) => &self.key[..idx],
            None => "",
        }
    }
}
