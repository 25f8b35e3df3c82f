//! Shared fixture for building small type graphs and resolving names in them

#![allow(dead_code)]

use std::sync::Arc;

use nomen_codegen::{EmissionContext, NameOptions, NameResolver, NamingError};
use nomen_core::{
    CoreError, DefId, EmitterSettings, KnownType, Module, NameNormalizer, TypeDef, TypeGraph,
    TypeId, TypeInfo, TypeRegistry,
};

pub struct Fixture {
    pub graph: TypeGraph,
    pub registry: TypeRegistry,
    pub context: EmissionContext,
    pub normalizer: NameNormalizer,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_settings(EmitterSettings::default())
    }

    pub fn declaration() -> Self {
        Self::with_settings(EmitterSettings::declaration())
    }

    pub fn with_settings(settings: EmitterSettings) -> Self {
        Self::with_context(EmissionContext::new(settings))
    }

    pub fn with_context(context: EmissionContext) -> Self {
        Self {
            graph: TypeGraph::with_core_library(),
            registry: TypeRegistry::new(),
            context,
            normalizer: NameNormalizer::new(),
        }
    }

    /// Add a definition without registering it
    pub fn add(&mut self, def: TypeDef) -> DefId {
        self.graph.add_definition(def)
    }

    /// Add a definition and register it for output
    pub fn register(&mut self, def: TypeDef) -> Result<DefId, CoreError> {
        let id = self.graph.add_definition(def);
        self.registry.register_definition(&self.graph, id)?;
        Ok(id)
    }

    pub fn ty(&self, def: DefId) -> TypeId {
        self.graph.definition_type(def)
    }

    pub fn known(&self, known: KnownType) -> TypeId {
        self.graph
            .known(known)
            .expect("fixture graph carries the core library")
    }

    /// Start emitting a type with the given key, optionally inside a module
    pub fn emit_from(&mut self, key: &str, module: Option<Arc<Module>>) {
        let mut info = TypeInfo::new(key);
        info.module = module;
        self.context.reset_for(info);
    }

    pub fn emit_info(&mut self, info: TypeInfo) {
        self.context.reset_for(info);
    }

    pub fn resolver(&mut self) -> NameResolver<'_> {
        NameResolver::new(
            &self.graph,
            &mut self.registry,
            &mut self.context,
            &self.normalizer,
        )
    }

    pub fn runtime(&mut self, ty: TypeId) -> Result<String, NamingError> {
        self.runtime_with(ty, NameOptions::default())
    }

    pub fn runtime_with(&mut self, ty: TypeId, options: NameOptions) -> Result<String, NamingError> {
        self.resolver().resolve_runtime_name(ty, options)
    }

    pub fn declaration_name(&mut self, ty: TypeId) -> Result<String, NamingError> {
        self.declaration_with(ty, NameOptions::default())
    }

    pub fn declaration_with(
        &mut self,
        ty: TypeId,
        options: NameOptions,
    ) -> Result<String, NamingError> {
        self.resolver().resolve_declaration_name(ty, options)
    }

    pub fn dependency_names(&self) -> Vec<String> {
        self.context
            .dependencies()
            .iter()
            .map(|d| d.dependency_name.clone())
            .collect()
    }
}

pub fn module(name: &str) -> Arc<Module> {
    Arc::new(Module::new(name))
}
