//! Structural declaration-language projection of types
//!
//! Delegates and object literals are expanded inline into structural types
//! (`{(d: Function): void}`, `{x: number}`); everything else is named
//! nominally with `<A,B>` generic argument lists.

use std::iter;

use nomen_core::{DefId, DefKind, KnownType, ModuleDependency, OutputBy, RecordId, TypeId, TypeShape};

use crate::error::NamingError;
use crate::options::NameOptions;
use crate::qualify::namespace_and_filename;
use crate::resolver::{NameGrammar, NameResolver, FUNCTION};

/// Delegate or object literal currently being expanded
///
/// Frames live on the call stack; each points at the frame of the
/// expansion that contains it. `bindings` maps the type parameters of an
/// instantiated delegate or literal to the arguments of this use site.
#[derive(Debug)]
pub(crate) struct Visited<'p> {
    full_name: String,
    bindings: Vec<(TypeId, TypeId)>,
    parent: Option<&'p Visited<'p>>,
}

impl<'p> Visited<'p> {
    fn frames(&self) -> impl Iterator<Item = &Visited<'p>> {
        iter::successors(Some(self), |frame| frame.parent)
    }

    fn contains(&self, full_name: &str) -> bool {
        self.frames().any(|frame| frame.full_name == full_name)
    }

    /// Argument bound to `parameter`, with the scope it was written in
    ///
    /// The argument belongs to the use site that created the binding frame,
    /// so it must be projected against that frame's parent, not the chain
    /// the parameter was found from.
    fn binding(&self, parameter: TypeId) -> Option<(TypeId, Option<&'p Visited<'p>>)> {
        self.frames().find_map(|frame| {
            frame
                .bindings
                .iter()
                .find(|(param, _)| *param == parameter)
                .map(|(_, argument)| (*argument, frame.parent))
        })
    }
}

fn is_number(known: KnownType) -> bool {
    matches!(
        known,
        KnownType::Byte
            | KnownType::Char
            | KnownType::Double
            | KnownType::Int16
            | KnownType::Int32
            | KnownType::SByte
            | KnownType::Single
            | KnownType::UInt16
            | KnownType::UInt32
    )
}

impl NameResolver<'_> {
    /// Declaration-language name of `ty`
    pub fn resolve_declaration_name(
        &mut self,
        ty: TypeId,
        options: NameOptions,
    ) -> Result<String, NamingError> {
        self.project(ty, options, None)
    }

    fn project(
        &mut self,
        ty: TypeId,
        options: NameOptions,
        visited: Option<&Visited<'_>>,
    ) -> Result<String, NamingError> {
        let graph = self.graph;

        match graph.shape(ty) {
            TypeShape::Array { element, .. } => {
                let element_options = NameOptions {
                    as_definition: options.as_definition,
                    exclude_namespace: options.exclude_namespace,
                    ..Default::default()
                };
                let element = self.project(*element, element_options, visited)?;
                return Ok(format!("{}[]", element));
            }
            TypeShape::Dynamic => return Ok("any".to_string()),
            TypeShape::ByReference { element } => {
                return self.project(*element, options, visited);
            }
            TypeShape::TypeParameter { name, .. } => {
                return match visited.and_then(|frame| frame.binding(ty)) {
                    Some((bound, scope)) => self.project(bound, options, scope),
                    None => Ok(name.clone()),
                };
            }
            TypeShape::Anonymous { properties } => {
                let mut members = Vec::with_capacity(properties.len());
                for (name, property) in properties {
                    let rendered = self.project(*property, NameOptions::default(), visited)?;
                    members.push(format!("{}: {}", name, rendered));
                }
                return Ok(format!("{{{}}}", members.join(", ")));
            }
            TypeShape::Definition { .. } | TypeShape::Instantiated { .. } => {}
        }

        let Some(def) = graph.definition_of(ty) else {
            return Ok("any".to_string());
        };
        let definition = graph.definition(def);

        if definition.kind == DefKind::Delegate {
            return self.project_delegate(ty, def, visited);
        }

        if definition.markers.object_literal.is_some() {
            let full_name = graph.full_name(ty);
            if !visited.is_some_and(|frame| frame.contains(&full_name)) {
                return self.project_literal(ty, def, full_name, visited);
            }
        }

        if let Some(known) = definition.known {
            match known {
                KnownType::String => return Ok("string".to_string()),
                KnownType::Boolean => return Ok("boolean".to_string()),
                KnownType::Void => return Ok("void".to_string()),
                KnownType::Array => return Ok("any[]".to_string()),
                KnownType::Object => return Ok("any".to_string()),
                known if is_number(known) => return Ok("number".to_string()),
                _ => {}
            }
        }

        if definition.kind == DefKind::Enum {
            return Ok("number".to_string());
        }

        if let Some(underlying) = graph.nullable_underlying(ty) {
            return self.project(underlying, options, visited);
        }

        self.render_nominal(&mut DeclarationGrammar { visited }, ty, options)
    }

    /// Frame for expanding `def` at the use site `ty`
    fn frame<'p>(&self, ty: TypeId, def: DefId, full_name: String, parent: Option<&'p Visited<'p>>) -> Visited<'p> {
        let graph = self.graph;
        let bindings = graph
            .type_parameter_types(def)
            .iter()
            .copied()
            .zip(graph.type_arguments(ty).iter().copied())
            .filter(|(param, argument)| param != argument)
            .collect();
        Visited {
            full_name,
            bindings,
            parent,
        }
    }

    fn project_delegate(
        &mut self,
        ty: TypeId,
        def: DefId,
        visited: Option<&Visited<'_>>,
    ) -> Result<String, NamingError> {
        let graph = self.graph;
        let full_name = graph.full_name(ty);
        if visited.is_some_and(|frame| frame.contains(&full_name)) {
            return Ok(FUNCTION.to_string());
        }
        let Some(invoke) = &graph.definition(def).invoke else {
            return Ok(FUNCTION.to_string());
        };

        let frame = self.frame(ty, def, full_name, visited);
        let mut parameters = Vec::with_capacity(invoke.parameters.len());
        for parameter in &invoke.parameters {
            let mut rendered = self.project(parameter.ty, NameOptions::default(), Some(&frame))?;
            if parameter.is_out || parameter.is_ref {
                rendered = format!("{{v: {}}}", rendered);
            }
            parameters.push(format!("{}: {}", parameter.name, rendered));
        }
        let return_type = self.project(invoke.return_type, NameOptions::default(), Some(&frame))?;

        Ok(format!("{{({}): {}}}", parameters.join(", "), return_type))
    }

    fn project_literal(
        &mut self,
        ty: TypeId,
        def: DefId,
        full_name: String,
        visited: Option<&Visited<'_>>,
    ) -> Result<String, NamingError> {
        let graph = self.graph;
        let definition = graph.definition(def);
        let frame = self.frame(ty, def, full_name, visited);

        let members = definition
            .fields
            .iter()
            .chain(definition.properties.iter())
            .filter(|member| {
                member.is_public && graph.definition(member.declaring).known != Some(KnownType::Object)
            });

        let mut rendered = Vec::new();
        for member in members {
            let member_type = self.project(member.ty, NameOptions::default(), Some(&frame))?;
            rendered.push(format!("{}: {}", member.name, member_type));
        }

        Ok(format!("{{{}}}", rendered.join(", ")))
    }

    /// Reference the file of another namespace the projection points into
    pub(crate) fn record_file_reference(&mut self, record: RecordId) {
        let settings = self.context.settings();
        if settings.output_by == OutputBy::Project {
            return;
        }
        let Some(target) = &self.registry.record(record).compile_info else {
            return;
        };
        let Some(current) = self.context.current_type() else {
            return;
        };
        if target.namespace == current.namespace {
            return;
        }

        let file_name = namespace_and_filename(target, settings).file_name;
        self.context
            .add_file_reference_once(ModuleDependency::on_file(file_name));
    }
}

/// Declaration naming of nominal types
pub(crate) struct DeclarationGrammar<'v> {
    visited: Option<&'v Visited<'v>>,
}

impl NameGrammar for DeclarationGrammar<'_> {
    fn simple_name(
        &mut self,
        resolver: &mut NameResolver<'_>,
        ty: TypeId,
        options: NameOptions,
    ) -> Result<String, NamingError> {
        let composed = resolver.compose_base(ty, options)?;

        let (mut name, is_custom_name) = match composed.record {
            Some(record) => {
                if !options.ignore_dependency {
                    resolver.record_file_reference(record);
                }
                if options.suppress_module {
                    resolver.apply_custom_name(
                        composed.name.clone(),
                        record,
                        options.exclude_namespace,
                        composed.is_nested,
                        None,
                    )
                } else {
                    resolver.resolve_qualification(
                        composed.name.clone(),
                        record,
                        options.exclude_namespace,
                        composed.is_nested,
                    )
                }
            }
            None => (composed.name.clone(), false),
        };

        resolver.append_arity(ty, &composed, is_custom_name, &mut name);
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
        let suppressed = graph.definition_of(ty).is_some_and(|def| {
            graph
                .definition(def)
                .markers
                .ignore_generic
                .is_some_and(|ignore| !ignore.allow_in_declarations)
        });

        if options.as_definition || arguments.is_empty() || suppressed {
            return Ok(name);
        }

        let argument_options = NameOptions {
            exclude_namespace: options.exclude_namespace,
            ..Default::default()
        };
        let mut rendered = Vec::with_capacity(arguments.len());
        for &argument in arguments {
            rendered.push(resolver.project(argument, argument_options, self.visited)?);
        }
        Ok(format!("{}<{}>", name, rendered.join(",")))
    }

    fn wrap_virtual(
        &self,
        _resolver: &NameResolver<'_>,
        _ty: TypeId,
        name: String,
        _options: NameOptions,
    ) -> String {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visited_walks_parent_frames() {
        let outer = Visited {
            full_name: "Demo.Outer".to_string(),
            bindings: Vec::new(),
            parent: None,
        };
        let inner = Visited {
            full_name: "Demo.Inner".to_string(),
            bindings: Vec::new(),
            parent: Some(&outer),
        };
        assert!(inner.contains("Demo.Outer"));
        assert!(inner.contains("Demo.Inner"));
        assert!(!outer.contains("Demo.Inner"));
    }

    #[test]
    fn test_number_family() {
        assert!(is_number(KnownType::Int32));
        assert!(is_number(KnownType::Char));
        assert!(!is_number(KnownType::Int64));
        assert!(!is_number(KnownType::Decimal));
    }
}
