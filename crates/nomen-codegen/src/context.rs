//! Emission context: the state accumulated while one output type is emitted

use std::collections::HashMap;
use std::fmt;

use nomen_core::{DefId, EmitterSettings, ModuleDependency, TypeGraph, TypeId, TypeInfo};
use tracing::debug;

use crate::error::EmitSite;

/// Host hook renaming specific types
pub trait CustomNameProvider: fmt::Debug {
    /// Replacement name for `def`; `None` or an empty string keeps the composed name
    fn custom_type_name(&self, graph: &TypeGraph, def: DefId, exclude_namespace: bool) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoCustomNames;

impl CustomNameProvider for NoCustomNames {
    fn custom_type_name(&self, _graph: &TypeGraph, _def: DefId, _exclude_namespace: bool) -> Option<String> {
        None
    }
}

/// Uses the script name declared on the definition itself
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptNameAttribute;

impl CustomNameProvider for ScriptNameAttribute {
    fn custom_type_name(&self, graph: &TypeGraph, def: DefId, exclude_namespace: bool) -> Option<String> {
        let name = graph.definition(def).markers.script_name.as_deref()?;
        if exclude_namespace {
            Some(name.rsplit('.').next().unwrap_or(name).to_string())
        } else {
            Some(name.to_string())
        }
    }
}

/// Explicit renames by registry key, falling back to another provider
#[derive(Debug)]
pub struct NameOverrides {
    names: HashMap<String, String>,
    fallback: Box<dyn CustomNameProvider>,
}

impl NameOverrides {
    pub fn new(fallback: Box<dyn CustomNameProvider>) -> Self {
        Self {
            names: HashMap::new(),
            fallback,
        }
    }

    pub fn rename(mut self, key: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(key.into(), name.into());
        self
    }
}

impl CustomNameProvider for NameOverrides {
    fn custom_type_name(&self, graph: &TypeGraph, def: DefId, exclude_namespace: bool) -> Option<String> {
        match self.names.get(&graph.definition_key(def)) {
            Some(name) => Some(name.clone()),
            None => self.fallback.custom_type_name(graph, def, exclude_namespace),
        }
    }
}

/// Names handed out to anonymous types during the registration pass
#[derive(Debug, Default)]
pub struct AnonymousTypes {
    names: HashMap<TypeId, String>,
    namespace: Option<String>,
}

impl AnonymousTypes {
    pub fn new(namespace: Option<String>) -> Self {
        Self {
            names: HashMap::new(),
            namespace,
        }
    }

    /// Name for `ty`, assigning the next `$AnonymousType$N` on first sight
    pub fn register(&mut self, ty: TypeId) -> &str {
        let next = self.names.len() + 1;
        let namespace = &self.namespace;
        self.names.entry(ty).or_insert_with(|| match namespace {
            Some(ns) if !ns.is_empty() => format!("{}.$AnonymousType${}", ns, next),
            _ => format!("$AnonymousType${}", next),
        })
    }

    pub fn name(&self, ty: TypeId) -> Option<&str> {
        self.names.get(&ty).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug)]
pub struct EmissionContext {
    settings: EmitterSettings,
    current_type: Option<TypeInfo>,
    dependencies: Vec<ModuleDependency>,
    file_references: Vec<ModuleDependency>,
    custom_names: Box<dyn CustomNameProvider>,
    anonymous_types: AnonymousTypes,
    site: EmitSite,
}

impl Default for EmissionContext {
    fn default() -> Self {
        Self::new(EmitterSettings::default())
    }
}

impl EmissionContext {
    pub fn new(settings: EmitterSettings) -> Self {
        let anonymous_types = AnonymousTypes::new(settings.anonymous_namespace.clone());
        Self {
            settings,
            current_type: None,
            dependencies: Vec::new(),
            file_references: Vec::new(),
            custom_names: Box::new(ScriptNameAttribute),
            anonymous_types,
            site: EmitSite::default(),
        }
    }

    pub fn with_custom_names(mut self, provider: Box<dyn CustomNameProvider>) -> Self {
        self.custom_names = provider;
        self
    }

    pub fn settings(&self) -> &EmitterSettings {
        &self.settings
    }

    pub fn custom_names(&self) -> &dyn CustomNameProvider {
        self.custom_names.as_ref()
    }

    pub fn current_type(&self) -> Option<&TypeInfo> {
        self.current_type.as_ref()
    }

    /// Start emitting `current`: installs it and clears both edge lists
    pub fn reset_for(&mut self, current: TypeInfo) {
        self.site = EmitSite::new().in_type(current.key.clone());
        if let Some(module) = &current.module {
            self.site.module = Some(module.name.clone());
        }
        self.current_type = Some(current);
        self.dependencies.clear();
        self.file_references.clear();
    }

    /// Forget the current type; names resolve as seen from outside any module
    pub fn clear(&mut self) {
        self.current_type = None;
        self.site = EmitSite::default();
        self.dependencies.clear();
        self.file_references.clear();
    }

    pub fn site(&self) -> &EmitSite {
        &self.site
    }

    pub fn set_site(&mut self, site: EmitSite) {
        self.site = site;
    }

    /// Module edges recorded for the current type, in first-seen order
    pub fn dependencies(&self) -> &[ModuleDependency] {
        &self.dependencies
    }

    /// File references recorded by the declaration grammar
    pub fn file_references(&self) -> &[ModuleDependency] {
        &self.file_references
    }

    /// Hand the module edges to the writer, leaving the list empty
    pub fn take_dependencies(&mut self) -> Vec<ModuleDependency> {
        std::mem::take(&mut self.dependencies)
    }

    pub fn take_file_references(&mut self) -> Vec<ModuleDependency> {
        std::mem::take(&mut self.file_references)
    }

    pub fn anonymous_types(&self) -> &AnonymousTypes {
        &self.anonymous_types
    }

    pub fn anonymous_types_mut(&mut self) -> &mut AnonymousTypes {
        &mut self.anonymous_types
    }

    /// Append `edge` unless one with the same dependency name exists
    pub(crate) fn add_dependency_once(&mut self, edge: ModuleDependency) -> bool {
        if self
            .dependencies
            .iter()
            .any(|d| d.dependency_name == edge.dependency_name)
        {
            return false;
        }
        debug!("Recording module dependency on '{}'", edge.dependency_name);
        self.dependencies.push(edge);
        true
    }

    pub(crate) fn add_file_reference_once(&mut self, edge: ModuleDependency) -> bool {
        if self
            .file_references
            .iter()
            .any(|d| d.dependency_name == edge.dependency_name)
        {
            return false;
        }
        debug!("Recording file reference to '{}'", edge.dependency_name);
        self.file_references.push(edge);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomen_core::{Module, TypeDef};
    use std::sync::Arc;

    #[test]
    fn test_anonymous_names_are_stable() {
        let mut graph = TypeGraph::with_core_library();
        let int = graph.known(nomen_core::KnownType::Int32).unwrap();
        let first = graph.anonymous(vec![("x".to_string(), int)]);
        let second = graph.anonymous(vec![("y".to_string(), int)]);

        let mut names = AnonymousTypes::new(Some("App".to_string()));
        assert_eq!(names.register(first), "App.$AnonymousType$1");
        assert_eq!(names.register(second), "App.$AnonymousType$2");
        assert_eq!(names.register(first), "App.$AnonymousType$1");
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_script_name_attribute() {
        let mut graph = TypeGraph::new();
        let mut def = TypeDef::class("Demo", "Widget");
        def.markers.script_name = Some("ui.Widget".to_string());
        let id = graph.add_definition(def);

        let provider = ScriptNameAttribute;
        assert_eq!(provider.custom_type_name(&graph, id, false).as_deref(), Some("ui.Widget"));
        assert_eq!(provider.custom_type_name(&graph, id, true).as_deref(), Some("Widget"));
    }

    #[test]
    fn test_overrides_fall_back() {
        let mut graph = TypeGraph::new();
        let renamed = graph.add_definition(TypeDef::class("Demo", "Renamed"));
        let plain = graph.add_definition(TypeDef::class("Demo", "Plain"));

        let provider = NameOverrides::new(Box::new(NoCustomNames)).rename("Demo.Renamed", "R");
        assert_eq!(provider.custom_type_name(&graph, renamed, false).as_deref(), Some("R"));
        assert_eq!(provider.custom_type_name(&graph, plain, false), None);
    }

    #[test]
    fn test_reset_clears_edges() {
        let mut context = EmissionContext::default();
        let module = Module::new("core");
        assert!(context.add_dependency_once(ModuleDependency::on_module(&module)));
        assert!(!context.add_dependency_once(ModuleDependency::on_module(&module)));
        assert!(context.add_file_reference_once(ModuleDependency::on_file("demo.js")));

        context.reset_for(TypeInfo::new("Demo.Next").in_module(Arc::new(Module::new("app"))));
        assert!(context.dependencies().is_empty());
        assert!(context.file_references().is_empty());
        assert_eq!(context.site().to_string(), "app:Demo.Next");
    }
}
