//! A loaded type graph with its registry and emission context

use anyhow::{Context, Result};
use nomen_codegen::{EmissionContext, NameOptions, NameResolver};
use nomen_core::model::CORE_LIBRARY_ASSEMBLY;
use nomen_core::{
    DefId, EmitterSettings, ModuleGraph, NameNormalizer, TypeGraph, TypeId, TypeInfo,
    TypeRegistry, TypeShape,
};
use serde::Serialize;
use tracing::{debug, info};

/// Name of one registered type and the edges resolving it recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedName {
    pub key: String,
    pub name: String,
    pub dependencies: Vec<String>,
    pub file_references: Vec<String>,
}

pub struct Session {
    graph: TypeGraph,
    registry: TypeRegistry,
    context: EmissionContext,
    normalizer: NameNormalizer,
}

impl Session {
    /// Register every definition outside the core library for output
    pub fn new(graph: TypeGraph, settings: EmitterSettings) -> Result<Self> {
        let mut registry = TypeRegistry::new();
        let outputs: Vec<DefId> = graph
            .definitions()
            .filter(|(_, def)| def.assembly != CORE_LIBRARY_ASSEMBLY)
            .map(|(id, _)| id)
            .collect();
        for def in outputs {
            registry
                .register_definition(&graph, def)
                .with_context(|| format!("Failed to register {}", graph.reflection_name(def)))?;
        }

        let mut context = EmissionContext::new(settings);
        let anonymous: Vec<TypeId> = graph
            .shapes()
            .filter(|(_, shape)| matches!(shape, TypeShape::Anonymous { .. }))
            .map(|(ty, _)| ty)
            .collect();
        for ty in anonymous {
            context.anonymous_types_mut().register(ty);
        }

        info!(
            "Registered {} types and {} anonymous types",
            registry.len(),
            context.anonymous_types().len()
        );

        Ok(Self {
            graph,
            registry,
            context,
            normalizer: NameNormalizer::new(),
        })
    }

    pub fn keys(&self) -> Vec<String> {
        self.registry
            .iter()
            .map(|(_, record)| record.key().to_string())
            .collect()
    }

    /// Make the registered type `key` the one being emitted
    fn emit_from(&mut self, key: &str) -> Result<()> {
        let id = self.registry.get(key)?;
        let record = self.registry.record_mut(id);
        let module = record.target_module(&self.graph);
        let mut info = record
            .compile_info
            .clone()
            .unwrap_or_else(|| TypeInfo::new(key));
        info.module = module;
        self.context.reset_for(info);
        Ok(())
    }

    /// Resolve `key` in the configured grammar, as seen from `from` when given
    pub fn resolve(&mut self, key: &str, from: Option<&str>) -> Result<ResolvedName> {
        match from {
            Some(from) => self.emit_from(from)?,
            None => self.context.clear(),
        }

        let id = self.registry.get(key)?;
        let ty = self.graph.definition_type(self.registry.record(id).definition);
        let name = NameResolver::new(
            &self.graph,
            &mut self.registry,
            &mut self.context,
            &self.normalizer,
        )
        .resolve(ty, NameOptions::default())
        .with_context(|| format!("Failed to resolve {}", key))?;

        Ok(ResolvedName {
            key: key.to_string(),
            name,
            dependencies: self
                .context
                .take_dependencies()
                .into_iter()
                .map(|d| d.dependency_name)
                .collect(),
            file_references: self
                .context
                .take_file_references()
                .into_iter()
                .map(|d| d.dependency_name)
                .collect(),
        })
    }

    /// Modules in emission order, from the types their members reference
    pub fn module_order(&mut self) -> Result<Vec<String>> {
        let mut modules = ModuleGraph::new();
        let records: Vec<(String, DefId)> = self
            .registry
            .iter()
            .map(|(_, record)| (record.key().to_string(), record.definition))
            .collect();

        for (key, def) in records {
            self.emit_from(&key)?;
            let Some(module) = self.context.current_type().and_then(|info| info.module.clone())
            else {
                continue;
            };
            modules.add_module(&module.name);

            for ty in referenced_types(&self.graph, def) {
                NameResolver::new(
                    &self.graph,
                    &mut self.registry,
                    &mut self.context,
                    &self.normalizer,
                )
                .resolve_runtime_name(ty, NameOptions::default())
                .with_context(|| format!("Failed to resolve a member type of {}", key))?;
            }

            let dependencies = self.context.take_dependencies();
            debug!("{} references {} other modules", key, dependencies.len());
            modules.add_edges(&module.name, &dependencies);
        }

        Ok(modules.topological_order()?)
    }
}

/// Types named by a definition's members and delegate signature
fn referenced_types(graph: &TypeGraph, def: DefId) -> Vec<TypeId> {
    let definition = graph.definition(def);
    let mut types: Vec<TypeId> = definition
        .fields
        .iter()
        .chain(definition.properties.iter())
        .map(|member| member.ty)
        .collect();
    if let Some(invoke) = &definition.invoke {
        types.extend(invoke.parameters.iter().map(|p| p.ty));
        types.push(invoke.return_type);
    }
    types
}
