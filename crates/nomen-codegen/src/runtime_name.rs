//! Runtime-addressable type names
//!
//! Produces the qualified name emitted scripting-runtime code uses to reach
//! a type (`Demo.List$1(System.Int32)`), or its alias form
//! (`Demo$List$1$System$Int32`) when `as_alias` is set.

use nomen_core::model::{ObjectCreateMode, ParamOwner};
use nomen_core::normalizer::arity_suffix;
use nomen_core::{DefId, DefKind, TypeGraph, TypeId, TypeShape};
use tracing::trace;

use crate::error::NamingError;
use crate::options::NameOptions;
use crate::resolver::{NameGrammar, NameResolver, FUNCTION, GLOBAL_OBJECT, SYSTEM_OBJECT};

pub const ARRAY_TYPE: &str = "System.Array.type";
pub const GET_TYPE_ALIAS: &str = "Bridge.getTypeAlias";
pub const GET_CLASS: &str = "GetClass";
pub const GET_INTERFACE: &str = "GetInterface";

impl NameResolver<'_> {
    /// Runtime name of `ty`
    pub fn resolve_runtime_name(
        &mut self,
        ty: TypeId,
        options: NameOptions,
    ) -> Result<String, NamingError> {
        let graph = self.graph;
        let def = graph.definition_of(ty);

        if let Some(def) = def {
            if let Some(target) = global_target(graph, def, options.remove_scope_prefix)? {
                let record = self.registry.get_by_type(graph, ty, true)?;
                return Ok(match record {
                    Some(record) if !options.suppress_module => {
                        self.resolve_qualification(target, record, options.exclude_namespace, false)
                            .0
                    }
                    _ => target,
                });
            }

            if graph.definition(def).markers.non_scriptable {
                return Err(NamingError::NonScriptable {
                    type_name: graph.full_name(ty),
                    site: self.context.site().clone(),
                });
            }
        }

        match graph.shape(ty) {
            TypeShape::Array {
                element,
                dimensions,
            } => {
                let element = self.resolve_runtime_name(*element, options.for_element())?;
                return Ok(array_name(&element, *dimensions, options.as_alias));
            }
            TypeShape::Dynamic => return Ok(SYSTEM_OBJECT.to_string()),
            TypeShape::ByReference { element } => {
                return self.resolve_runtime_name(*element, options.for_element());
            }
            TypeShape::Anonymous { .. } => {
                return Ok(self
                    .context
                    .anonymous_types()
                    .name(ty)
                    .unwrap_or(SYSTEM_OBJECT)
                    .to_string());
            }
            TypeShape::TypeParameter { name, owner } => {
                let erased = match owner {
                    ParamOwner::Method { ignore_generic } => {
                        options.skip_method_type_params || *ignore_generic
                    }
                    ParamOwner::Type { definition } => {
                        graph.definition(*definition).markers.ignore_generic.is_some()
                    }
                };
                return Ok(if erased {
                    SYSTEM_OBJECT.to_string()
                } else {
                    name.clone()
                });
            }
            TypeShape::Definition { .. } | TypeShape::Instantiated { .. } => {}
        }

        if graph.def_kind(ty) == Some(DefKind::Delegate) {
            return Ok(FUNCTION.to_string());
        }

        if options.ignore_literal_name && def.is_some_and(|def| is_plain_literal(graph, def)) {
            return Ok(SYSTEM_OBJECT.to_string());
        }

        self.render_nominal(&mut RuntimeGrammar, ty, options)
    }
}

/// Runtime naming of nominal types
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RuntimeGrammar;

impl NameGrammar for RuntimeGrammar {
    fn simple_name(
        &mut self,
        resolver: &mut NameResolver<'_>,
        ty: TypeId,
        options: NameOptions,
    ) -> Result<String, NamingError> {
        let graph = resolver.graph;
        let composed = resolver.compose_base(ty, options)?;
        trace!("Composed runtime base name {}", composed.name);

        let (mut name, is_custom_name) = match composed.record {
            Some(record) if options.suppress_module => resolver.apply_custom_name(
                composed.name.clone(),
                record,
                options.exclude_namespace,
                composed.is_nested,
                None,
            ),
            Some(record) => resolver.resolve_qualification(
                composed.name.clone(),
                record,
                options.exclude_namespace,
                composed.is_nested,
            ),
            None => (composed.name.clone(), false),
        };

        let home_assembly = resolver.settings().home_assembly.as_str();
        let skip_suffix = graph
            .definition_of(ty)
            .is_some_and(|def| drops_arity_marker(graph, def, home_assembly));
        let count = graph.type_arguments(ty).len();

        if !skip_suffix {
            resolver.append_arity(ty, &composed, is_custom_name, &mut name);
        } else if !is_custom_name && count > 0 {
            if let Some(stripped) = name.strip_suffix(arity_suffix(count).as_str()) {
                name = stripped.to_string();
            }
        }

        if options.as_alias {
            name = resolver.normalizer.interface_alias(&name).into_owned();
        }

        Ok(name)
    }

    fn type_arguments(
        &mut self,
        resolver: &mut NameResolver<'_>,
        ty: TypeId,
        name: String,
        options: NameOptions,
    ) -> Result<String, NamingError> {
        let graph = resolver.graph;
        let arguments = graph.type_arguments(ty);
        let ignore_generic = graph
            .definition_of(ty)
            .is_some_and(|def| graph.definition(def).markers.ignore_generic.is_some());

        if arguments.is_empty() || ignore_generic || options.as_definition {
            return Ok(name);
        }

        if options.as_alias {
            return alias_expression(resolver, name, arguments, options);
        }

        let argument_options = NameOptions {
            skip_method_type_params: options.skip_method_type_params,
            ..Default::default()
        };
        let mut rendered = Vec::with_capacity(arguments.len());
        for &argument in arguments {
            rendered.push(resolver.resolve_runtime_name(argument, argument_options)?);
        }
        Ok(format!("{}({})", name, rendered.join(",")))
    }

    fn wrap_virtual(
        &self,
        resolver: &NameResolver<'_>,
        ty: TypeId,
        name: String,
        options: NameOptions,
    ) -> String {
        if options.ignore_virtual || options.as_alias {
            return name;
        }
        let graph = resolver.graph;
        let Some(def) = graph.definition_of(ty) else {
            return name;
        };
        let def = graph.definition(def);

        if def.markers.is_virtual {
            let wrapper = if def.kind == DefKind::Interface {
                GET_INTERFACE
            } else {
                GET_CLASS
            };
            format!("{}(\"{}\")", wrapper, name)
        } else if def.kind == DefKind::Interface
            && def.markers.external_interface.is_some_and(|ext| ext.is_virtual)
        {
            format!("{}(\"{}\")", GET_INTERFACE, name)
        } else {
            name
        }
    }
}

fn array_name(element: &str, dimensions: u32, as_alias: bool) -> String {
    match (as_alias, dimensions > 1) {
        (true, true) => format!("{}$Array${}", element, dimensions),
        (true, false) => format!("{}$Array", element),
        (false, true) => format!("{}({}, {})", ARRAY_TYPE, element, dimensions),
        (false, false) => format!("{}({})", ARRAY_TYPE, element),
    }
}

fn is_plain_literal(graph: &TypeGraph, def: DefId) -> bool {
    graph.definition(def).markers.object_literal == Some(ObjectCreateMode::Plain)
}

/// External ignore-generic types from foreign assemblies are addressed without `$N`
fn drops_arity_marker(graph: &TypeGraph, def: DefId, home_assembly: &str) -> bool {
    let def = graph.definition(def);
    def.assembly != home_assembly && def.markers.external && def.markers.ignore_generic.is_some()
}

/// Global object or mixin target a type's members live on, if any
fn global_target(
    graph: &TypeGraph,
    def: DefId,
    remove_scope_prefix: bool,
) -> Result<Option<String>, NamingError> {
    let markers = &graph.definition(def).markers;

    if let Some(global) = markers.global_methods {
        let target = if !remove_scope_prefix || global {
            GLOBAL_OBJECT
        } else {
            ""
        };
        return Ok(Some(target.to_string()));
    }

    match &markers.mixin {
        Some(expression) => {
            validate_mixin(expression).map_err(|reason| NamingError::MixinResolution {
                type_name: graph.reflection_name(def),
                reason,
            })?;
            Ok(Some(expression.clone()))
        }
        None => Ok(None),
    }
}

fn validate_mixin(expression: &str) -> Result<(), String> {
    if expression.trim().is_empty() {
        return Err("mixin target is empty".to_string());
    }
    for segment in expression.split('.') {
        let mut chars = segment.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_alphabetic() || first == '_' || first == '$')
                    && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
            }
            None => false,
        };
        if !valid {
            return Err(format!("'{}' is not a dotted identifier", expression));
        }
    }
    Ok(())
}

/// Concatenation expression naming a generic instantiation at runtime
///
/// Closed arguments are inlined as alias text; type parameters become
/// `Bridge.getTypeAlias(T)` calls, which turns the whole name into a
/// quoted string concatenation.
fn alias_expression(
    resolver: &mut NameResolver<'_>,
    name: String,
    arguments: &[TypeId],
    options: NameOptions,
) -> Result<String, NamingError> {
    let graph = resolver.graph;
    let argument_options = NameOptions {
        as_alias: true,
        skip_method_type_params: options.skip_method_type_params,
        ignore_virtual: true,
        ..Default::default()
    };

    let mut buffer = name;
    buffer.push('$');
    let mut in_literal = false;
    let mut needs_separator = false;

    for &argument in arguments {
        if buffer.ends_with(')') {
            buffer.push_str(" + \"");
        }
        if needs_separator && !buffer.ends_with('$') {
            buffer.push('$');
        }
        needs_separator = true;

        let is_parameter = matches!(graph.shape(argument), TypeShape::TypeParameter { .. });
        if is_parameter {
            if !in_literal {
                buffer.insert(0, '"');
                in_literal = true;
            }
            buffer.push_str("\" + ");
            buffer.push_str(GET_TYPE_ALIAS);
            buffer.push('(');
        }

        let argument_name = resolver.resolve_runtime_name(argument, argument_options)?;

        match argument_name.strip_prefix('"') {
            Some(quoted) if !is_parameter => {
                buffer.push_str(quoted.strip_suffix('"').unwrap_or(quoted));
                if !in_literal {
                    buffer.insert(0, '"');
                    in_literal = true;
                }
            }
            _ => buffer.push_str(&argument_name),
        }

        if is_parameter {
            buffer.push(')');
        }
    }

    if in_literal && !buffer.ends_with(')') && !buffer.ends_with('"') {
        buffer.push('"');
    }

    Ok(buffer)
}
