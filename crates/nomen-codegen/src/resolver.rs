//! Name resolution entry point shared by the runtime and declaration grammars
//!
//! A `NameResolver` borrows everything one resolution needs: the object
//! model, the registry (whose caches it fills), the emission context (whose
//! edge lists it appends to) and the shared normalizer. Both grammars run
//! the same nominal driver (`render_nominal`) and differ only in the three
//! `NameGrammar` capabilities.

use nomen_core::normalizer::arity_suffix;
use nomen_core::{
    EmitterSettings, NameNormalizer, OutputGrammar, RecordId, TypeGraph, TypeId,
    TypeRegistry,
};

use crate::context::EmissionContext;
use crate::error::NamingError;
use crate::options::NameOptions;

pub const SYSTEM_OBJECT: &str = "System.Object";
pub const FUNCTION: &str = "Function";
pub const GLOBAL_OBJECT: &str = "Bridge.global";

pub struct NameResolver<'a> {
    pub(crate) graph: &'a TypeGraph,
    pub(crate) registry: &'a mut TypeRegistry,
    pub(crate) context: &'a mut EmissionContext,
    pub(crate) normalizer: &'a NameNormalizer,
}

/// Result of the default composition (namespace, enclosing type, simple name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Composed {
    pub name: String,
    pub record: Option<RecordId>,
    pub is_nested: bool,
}

/// Output-grammar specific steps of nominal type naming
pub(crate) trait NameGrammar {
    /// Qualified name without generic arguments
    fn simple_name(
        &mut self,
        resolver: &mut NameResolver<'_>,
        ty: TypeId,
        options: NameOptions,
    ) -> Result<String, NamingError>;

    /// Append the generic argument list to `name`
    fn type_arguments(
        &mut self,
        resolver: &mut NameResolver<'_>,
        ty: TypeId,
        name: String,
        options: NameOptions,
    ) -> Result<String, NamingError>;

    fn wrap_virtual(&self, resolver: &NameResolver<'_>, ty: TypeId, name: String, options: NameOptions)
        -> String;
}

impl<'a> NameResolver<'a> {
    pub fn new(
        graph: &'a TypeGraph,
        registry: &'a mut TypeRegistry,
        context: &'a mut EmissionContext,
        normalizer: &'a NameNormalizer,
    ) -> Self {
        Self {
            graph,
            registry,
            context,
            normalizer,
        }
    }

    pub fn graph(&self) -> &TypeGraph {
        self.graph
    }

    pub fn context(&self) -> &EmissionContext {
        &*self.context
    }

    pub fn context_mut(&mut self) -> &mut EmissionContext {
        &mut *self.context
    }

    pub(crate) fn settings(&self) -> &EmitterSettings {
        self.context.settings()
    }

    /// Resolve `ty` in the grammar configured on the context
    pub fn resolve(&mut self, ty: TypeId, options: NameOptions) -> Result<String, NamingError> {
        match self.settings().grammar {
            OutputGrammar::Runtime => self.resolve_runtime_name(ty, options),
            OutputGrammar::Declaration => self.resolve_declaration_name(ty, options),
        }
    }

    /// Runtime name of `ty` used as a definition (no generic argument list)
    pub fn resolve_definition_name(
        &mut self,
        ty: TypeId,
        ignore_literal_name: bool,
    ) -> Result<String, NamingError> {
        let mut options = NameOptions::default().definition();
        options.ignore_literal_name = ignore_literal_name;
        self.resolve_runtime_name(ty, options)
    }

    pub(crate) fn render_nominal<G: NameGrammar>(
        &mut self,
        grammar: &mut G,
        ty: TypeId,
        options: NameOptions,
    ) -> Result<String, NamingError> {
        let name = grammar.simple_name(self, ty, options)?;
        let name = grammar.type_arguments(self, ty, name, options)?;
        Ok(grammar.wrap_virtual(self, ty, name, options))
    }

    /// Namespace, enclosing type and normalized simple name of `ty`
    ///
    /// Registered types take their simple name from the reflection name
    /// (`Foo`1` -> `Foo$1`) and resolve their enclosing type through the
    /// runtime grammar; unregistered types use the plain simple name.
    pub(crate) fn compose_base(
        &mut self,
        ty: TypeId,
        options: NameOptions,
    ) -> Result<Composed, NamingError> {
        let graph = self.graph;
        let record = self.registry.get_by_type(graph, ty, true)?;

        let mut name = if options.exclude_namespace {
            String::new()
        } else {
            graph.namespace(ty).to_string()
        };
        let mut is_nested = false;

        let simple = match record {
            Some(id) => {
                let def = self.registry.record(id).definition;
                if let Some(declaring) = graph.definition(def).declaring {
                    if !options.exclude_namespace {
                        name = self.resolve_runtime_name(
                            graph.definition_type(declaring),
                            options.for_declaring(),
                        )?;
                        is_nested = true;
                    }
                }
                self.normalizer
                    .convert(&graph.definition(def).reflection_simple_name())
                    .into_owned()
            }
            None => {
                if let Some(declaring) = graph.declaring_type(ty) {
                    if !options.exclude_namespace {
                        let declaring_options = NameOptions::default().definition().without_virtual();
                        name = self.resolve_runtime_name(declaring, declaring_options)?;
                        is_nested = true;
                    }
                }
                match graph.definition_of(ty) {
                    Some(def) => self.normalizer.convert(&graph.definition(def).name).into_owned(),
                    None => self.normalizer.convert(&graph.simple_name(ty)).into_owned(),
                }
            }
        };

        Ok(Composed {
            name: join_name(&name, &simple),
            record,
            is_nested,
        })
    }

    /// Append the `$N` marker for unregistered generic types
    pub(crate) fn append_arity(&self, ty: TypeId, composed: &Composed, is_custom_name: bool, name: &mut String) {
        let count = self.graph.type_arguments(ty).len();
        if composed.record.is_none() && !is_custom_name && count > 0 {
            name.push_str(&arity_suffix(count));
        }
    }
}

pub(crate) fn join_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomen_core::{KnownType, TypeDef};

    #[test]
    fn test_join_name() {
        assert_eq!(join_name("", "Foo"), "Foo");
        assert_eq!(join_name("Demo", "Foo"), "Demo.Foo");
    }

    #[test]
    fn test_compose_base_registered_uses_reflection_name() -> Result<(), Box<dyn std::error::Error>> {
        let mut graph = TypeGraph::with_core_library();
        let list = graph.add_definition(TypeDef::class("Demo", "List").generic(&["T"]));
        let int = graph.known(KnownType::Int32).unwrap();
        let closed = graph.instantiate(list, vec![int]);

        let mut registry = TypeRegistry::new();
        registry.register_definition(&graph, list)?;
        let mut context = EmissionContext::default();
        let normalizer = NameNormalizer::new();
        let mut resolver = NameResolver::new(&graph, &mut registry, &mut context, &normalizer);

        let composed = resolver.compose_base(closed, NameOptions::default())?;
        assert_eq!(composed.name, "Demo.List$1");
        assert!(composed.record.is_some());
        assert!(!composed.is_nested);
        Ok(())
    }

    #[test]
    fn test_compose_base_unregistered_uses_plain_name() -> Result<(), Box<dyn std::error::Error>> {
        let mut graph = TypeGraph::with_core_library();
        let map = graph.add_definition(TypeDef::class("Demo", "Map").generic(&["K", "V"]));
        let open = graph.definition_type(map);

        let mut registry = TypeRegistry::new();
        let mut context = EmissionContext::default();
        let normalizer = NameNormalizer::new();
        let mut resolver = NameResolver::new(&graph, &mut registry, &mut context, &normalizer);

        let composed = resolver.compose_base(open, NameOptions::default().excluding_namespace())?;
        assert_eq!(composed.name, "Map");
        assert!(composed.record.is_none());
        Ok(())
    }
}
