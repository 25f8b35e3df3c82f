//! Resolved object model consumed by the naming layer
//!
//! The graph is an arena: type definitions live behind `DefId` handles and
//! every type shape (open definitions, instantiations, arrays, by-reference
//! wrappers, type parameters, anonymous types) is interned behind a `TypeId`.
//! Structurally equal shapes always intern to the same `TypeId`, so handle
//! equality is type identity.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::module::Module;

/// Handle to a type definition in a [`TypeGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefId(u32);

impl DefId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to an interned type shape in a [`TypeGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefKind {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
}

/// Well-known core library types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KnownType {
    Void,
    Boolean,
    String,
    Char,
    Byte,
    SByte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    Object,
    Array,
    Nullable,
}

impl KnownType {
    pub const ALL: [KnownType; 18] = [
        KnownType::Void,
        KnownType::Boolean,
        KnownType::String,
        KnownType::Char,
        KnownType::Byte,
        KnownType::SByte,
        KnownType::Int16,
        KnownType::UInt16,
        KnownType::Int32,
        KnownType::UInt32,
        KnownType::Int64,
        KnownType::UInt64,
        KnownType::Single,
        KnownType::Double,
        KnownType::Decimal,
        KnownType::Object,
        KnownType::Array,
        KnownType::Nullable,
    ];

    /// Simple name inside the `System` namespace
    pub fn name(self) -> &'static str {
        match self {
            KnownType::Void => "Void",
            KnownType::Boolean => "Boolean",
            KnownType::String => "String",
            KnownType::Char => "Char",
            KnownType::Byte => "Byte",
            KnownType::SByte => "SByte",
            KnownType::Int16 => "Int16",
            KnownType::UInt16 => "UInt16",
            KnownType::Int32 => "Int32",
            KnownType::UInt32 => "UInt32",
            KnownType::Int64 => "Int64",
            KnownType::UInt64 => "UInt64",
            KnownType::Single => "Single",
            KnownType::Double => "Double",
            KnownType::Decimal => "Decimal",
            KnownType::Object => "Object",
            KnownType::Array => "Array",
            KnownType::Nullable => "Nullable",
        }
    }

    fn kind(self) -> DefKind {
        match self {
            KnownType::String | KnownType::Object | KnownType::Array => DefKind::Class,
            _ => DefKind::Struct,
        }
    }
}

/// How an object-literal type is created at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectCreateMode {
    /// Plain object, no runtime type behind it
    Plain,
    Constructor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IgnoreGeneric {
    /// Keep generic arguments in the declaration grammar
    #[serde(default)]
    pub allow_in_declarations: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExternalInterface {
    #[serde(default)]
    pub is_virtual: bool,
}

/// Attribute markers attached to a type definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Type cannot be referenced from generated code
    pub non_scriptable: bool,
    pub object_literal: Option<ObjectCreateMode>,
    /// Global-methods marker and its value
    pub global_methods: Option<bool>,
    /// Mixin target expression
    pub mixin: Option<String>,
    pub is_virtual: bool,
    pub external_interface: Option<ExternalInterface>,
    pub ignore_generic: Option<IgnoreGeneric>,
    pub external: bool,
    pub module: Option<Arc<Module>>,
    /// User-declared output name
    pub script_name: Option<String>,
}

/// Field or property of a type definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub ty: TypeId,
    /// Definition the member is declared on (may be a base type)
    pub declaring: DefId,
    #[serde(default = "default_true")]
    pub is_public: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeId,
    #[serde(default)]
    pub is_out: bool,
    #[serde(default)]
    pub is_ref: bool,
}

/// Invoke signature of a delegate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signature {
    pub parameters: Vec<Parameter>,
    pub return_type: TypeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDef {
    /// Simple name without arity marker (e.g., "List")
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub kind: DefKind,
    #[serde(default)]
    pub declaring: Option<DefId>,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub assembly: String,
    #[serde(default)]
    pub known: Option<KnownType>,
    #[serde(default)]
    pub markers: Markers,
    #[serde(default)]
    pub fields: Vec<Member>,
    #[serde(default)]
    pub properties: Vec<Member>,
    #[serde(default)]
    pub invoke: Option<Signature>,
}

impl TypeDef {
    pub fn new(kind: DefKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            kind,
            declaring: None,
            type_parameters: Vec::new(),
            assembly: String::new(),
            known: None,
            markers: Markers::default(),
            fields: Vec::new(),
            properties: Vec::new(),
            invoke: None,
        }
    }

    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(DefKind::Class, namespace, name)
    }

    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(DefKind::Interface, namespace, name)
    }

    pub fn delegate(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(DefKind::Delegate, namespace, name)
    }

    pub fn enumeration(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(DefKind::Enum, namespace, name)
    }

    pub fn nested_in(mut self, declaring: DefId) -> Self {
        self.declaring = Some(declaring);
        self
    }

    pub fn generic<S: AsRef<str>>(mut self, parameters: &[S]) -> Self {
        self.type_parameters = parameters.iter().map(|p| p.as_ref().to_string()).collect();
        self
    }

    pub fn in_assembly(mut self, assembly: impl Into<String>) -> Self {
        self.assembly = assembly.into();
        self
    }

    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    pub fn in_module(mut self, module: Arc<Module>) -> Self {
        self.markers.module = Some(module);
        self
    }

    /// Simple name with the arity marker (e.g., "List`1")
    pub fn reflection_simple_name(&self) -> String {
        if self.type_parameters.is_empty() {
            self.name.clone()
        } else {
            format!("{}`{}", self.name, self.type_parameters.len())
        }
    }
}

/// Owner of a type parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "owner", rename_all = "kebab-case")]
pub enum ParamOwner {
    Type { definition: DefId },
    Method { ignore_generic: bool },
}

/// A type as seen at a use site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum TypeShape {
    /// Open definition (non-generic types are always used this way)
    Definition { definition: DefId },
    /// Closed or partially closed generic instantiation
    Instantiated { definition: DefId, arguments: Vec<TypeId> },
    Array { element: TypeId, dimensions: u32 },
    ByReference { element: TypeId },
    TypeParameter { name: String, owner: ParamOwner },
    Anonymous { properties: Vec<(String, TypeId)> },
    Dynamic,
}

/// Arena of type definitions and interned type shapes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GraphParts", into = "GraphParts")]
pub struct TypeGraph {
    definitions: Vec<TypeDef>,
    shapes: Vec<TypeShape>,
    assembly_modules: HashMap<String, Arc<Module>>,
    interned: HashMap<TypeShape, TypeId>,
    def_types: Vec<TypeId>,
    def_params: Vec<Vec<TypeId>>,
    known: HashMap<KnownType, DefId>,
}

/// Serialized form of a [`TypeGraph`]; lookup tables are rebuilt on load
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GraphParts {
    #[serde(default)]
    definitions: Vec<TypeDef>,
    #[serde(default)]
    shapes: Vec<TypeShape>,
    #[serde(default)]
    assembly_modules: HashMap<String, Arc<Module>>,
}

impl From<GraphParts> for TypeGraph {
    fn from(parts: GraphParts) -> Self {
        let mut graph = TypeGraph {
            assembly_modules: parts.assembly_modules,
            ..Default::default()
        };
        for shape in parts.shapes {
            let id = TypeId(graph.shapes.len() as u32);
            graph.interned.entry(shape.clone()).or_insert(id);
            graph.shapes.push(shape);
        }
        for def in parts.definitions {
            graph.push_definition(def);
        }
        graph
    }
}

impl From<TypeGraph> for GraphParts {
    fn from(graph: TypeGraph) -> Self {
        GraphParts {
            definitions: graph.definitions,
            shapes: graph.shapes,
            assembly_modules: graph.assembly_modules,
        }
    }
}

pub const CORE_LIBRARY_ASSEMBLY: &str = "mscorlib";

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph pre-populated with the `System` core library types
    pub fn with_core_library() -> Self {
        let mut graph = Self::new();
        for known in KnownType::ALL {
            let mut def = TypeDef::new(known.kind(), "System", known.name())
                .in_assembly(CORE_LIBRARY_ASSEMBLY);
            def.known = Some(known);
            if known == KnownType::Nullable {
                def.type_parameters = vec!["T".to_string()];
            }
            graph.add_definition(def);
        }
        graph
    }

    pub fn add_definition(&mut self, def: TypeDef) -> DefId {
        self.push_definition(def)
    }

    fn push_definition(&mut self, def: TypeDef) -> DefId {
        let id = DefId(self.definitions.len() as u32);
        if let Some(known) = def.known {
            self.known.insert(known, id);
        }
        let params = def.type_parameters.clone();
        self.definitions.push(def);
        let def_type = self.intern(TypeShape::Definition { definition: id });
        self.def_types.push(def_type);
        let param_types = params
            .into_iter()
            .map(|name| {
                self.intern(TypeShape::TypeParameter {
                    name,
                    owner: ParamOwner::Type { definition: id },
                })
            })
            .collect();
        self.def_params.push(param_types);
        id
    }

    /// Declare the module every type of `assembly` belongs to by default
    pub fn set_assembly_module(&mut self, assembly: impl Into<String>, module: Arc<Module>) {
        self.assembly_modules.insert(assembly.into(), module);
    }

    pub fn intern(&mut self, shape: TypeShape) -> TypeId {
        if let Some(&id) = self.interned.get(&shape) {
            return id;
        }
        let id = TypeId(self.shapes.len() as u32);
        self.shapes.push(shape.clone());
        self.interned.insert(shape, id);
        id
    }

    pub fn instantiate(&mut self, definition: DefId, arguments: Vec<TypeId>) -> TypeId {
        self.intern(TypeShape::Instantiated {
            definition,
            arguments,
        })
    }

    pub fn array(&mut self, element: TypeId, dimensions: u32) -> TypeId {
        self.intern(TypeShape::Array {
            element,
            dimensions: dimensions.max(1),
        })
    }

    pub fn by_reference(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeShape::ByReference { element })
    }

    pub fn method_type_parameter(&mut self, name: impl Into<String>, ignore_generic: bool) -> TypeId {
        self.intern(TypeShape::TypeParameter {
            name: name.into(),
            owner: ParamOwner::Method { ignore_generic },
        })
    }

    pub fn anonymous(&mut self, properties: Vec<(String, TypeId)>) -> TypeId {
        self.intern(TypeShape::Anonymous { properties })
    }

    pub fn dynamic(&mut self) -> TypeId {
        self.intern(TypeShape::Dynamic)
    }

    /// `System.Nullable<inner>`, when the core library is present
    pub fn nullable(&mut self, inner: TypeId) -> Option<TypeId> {
        let def = self.known_definition(KnownType::Nullable)?;
        Some(self.instantiate(def, vec![inner]))
    }

    pub fn definition(&self, id: DefId) -> &TypeDef {
        &self.definitions[id.index()]
    }

    pub fn definition_mut(&mut self, id: DefId) -> &mut TypeDef {
        &mut self.definitions[id.index()]
    }

    pub fn definitions(&self) -> impl Iterator<Item = (DefId, &TypeDef)> {
        self.definitions
            .iter()
            .enumerate()
            .map(|(idx, def)| (DefId(idx as u32), def))
    }

    /// The open-definition shape of `id`
    pub fn definition_type(&self, id: DefId) -> TypeId {
        self.def_types[id.index()]
    }

    /// Type parameters of `id` as type-parameter shapes
    pub fn type_parameter_types(&self, id: DefId) -> &[TypeId] {
        &self.def_params[id.index()]
    }

    pub fn shape(&self, ty: TypeId) -> &TypeShape {
        &self.shapes[ty.index()]
    }

    pub fn shapes(&self) -> impl Iterator<Item = (TypeId, &TypeShape)> {
        self.shapes
            .iter()
            .enumerate()
            .map(|(idx, shape)| (TypeId(idx as u32), shape))
    }

    pub fn known_definition(&self, known: KnownType) -> Option<DefId> {
        self.known.get(&known).copied()
    }

    pub fn known(&self, known: KnownType) -> Option<TypeId> {
        self.known_definition(known).map(|def| self.definition_type(def))
    }

    /// Definition behind a nominal type shape
    pub fn definition_of(&self, ty: TypeId) -> Option<DefId> {
        match self.shape(ty) {
            TypeShape::Definition { definition } | TypeShape::Instantiated { definition, .. } => {
                Some(*definition)
            }
            _ => None,
        }
    }

    pub fn def_kind(&self, ty: TypeId) -> Option<DefKind> {
        self.definition_of(ty).map(|def| self.definition(def).kind)
    }

    pub fn is_known(&self, ty: TypeId, known: KnownType) -> bool {
        self.definition_of(ty)
            .map(|def| self.definition(def).known == Some(known))
            .unwrap_or(false)
    }

    /// Type arguments at this use site; open definitions report their own parameters
    pub fn type_arguments(&self, ty: TypeId) -> &[TypeId] {
        match self.shape(ty) {
            TypeShape::Definition { definition } => self.type_parameter_types(*definition),
            TypeShape::Instantiated { arguments, .. } => arguments,
            _ => &[],
        }
    }

    pub fn declaring_type(&self, ty: TypeId) -> Option<TypeId> {
        let def = self.definition_of(ty)?;
        self.definition(def)
            .declaring
            .map(|declaring| self.definition_type(declaring))
    }

    pub fn namespace(&self, ty: TypeId) -> &str {
        match self.definition_of(ty) {
            Some(def) => &self.definition(def).namespace,
            None => "",
        }
    }

    /// Simple name without arity marker
    pub fn simple_name(&self, ty: TypeId) -> String {
        match self.shape(ty) {
            TypeShape::Definition { definition } | TypeShape::Instantiated { definition, .. } => {
                self.definition(*definition).name.clone()
            }
            TypeShape::TypeParameter { name, .. } => name.clone(),
            TypeShape::Array { element, dimensions } => {
                let commas = ",".repeat((*dimensions as usize).saturating_sub(1));
                format!("{}[{}]", self.simple_name(*element), commas)
            }
            TypeShape::ByReference { element } => format!("{}&", self.simple_name(*element)),
            TypeShape::Anonymous { .. } => "<>AnonymousType".to_string(),
            TypeShape::Dynamic => "dynamic".to_string(),
        }
    }

    /// Dotted full name without arity markers (e.g., "Demo.Outer.Inner")
    pub fn full_name(&self, ty: TypeId) -> String {
        match self.definition_of(ty) {
            Some(def) => {
                let mut segments = vec![self.definition(def).name.as_str()];
                let mut current = self.definition(def).declaring;
                while let Some(parent) = current {
                    segments.push(self.definition(parent).name.as_str());
                    current = self.definition(parent).declaring;
                }
                segments.reverse();
                let namespace = &self.definition(def).namespace;
                if namespace.is_empty() {
                    segments.join(".")
                } else {
                    format!("{}.{}", namespace, segments.join("."))
                }
            }
            None => self.simple_name(ty),
        }
    }

    /// Reflection name of a definition (e.g., "Demo.Outer+Inner`1")
    pub fn reflection_name(&self, def: DefId) -> String {
        let mut segments = vec![self.definition(def).reflection_simple_name()];
        let mut current = self.definition(def).declaring;
        while let Some(parent) = current {
            segments.push(self.definition(parent).reflection_simple_name());
            current = self.definition(parent).declaring;
        }
        segments.reverse();
        let nested = segments.join("+");
        let namespace = &self.definition(def).namespace;
        if namespace.is_empty() {
            nested
        } else {
            format!("{}.{}", namespace, nested)
        }
    }

    /// Registry key of a definition
    pub fn definition_key(&self, def: DefId) -> String {
        self.reflection_name(def).replace('/', "+")
    }

    /// Declared module: the definition's own, else its assembly's default
    pub fn declared_module(&self, def: DefId) -> Option<Arc<Module>> {
        let def = self.definition(def);
        def.markers
            .module
            .clone()
            .or_else(|| self.assembly_modules.get(&def.assembly).cloned())
    }

    /// Underlying type of `System.Nullable<T>`
    pub fn nullable_underlying(&self, ty: TypeId) -> Option<TypeId> {
        match self.shape(ty) {
            TypeShape::Instantiated {
                definition,
                arguments,
            } if self.definition(*definition).known == Some(KnownType::Nullable) => {
                arguments.first().copied()
            }
            _ => None,
        }
    }

    /// Check that every handle in the graph points at an existing entry
    ///
    /// Shapes may only refer to shapes interned before them, each shape
    /// appears once, and no declaring chain revisits a definition.
    pub fn validate(&self) -> Result<(), CoreError> {
        let def_ok = |id: DefId| id.index() < self.definitions.len();
        let ty_ok = |id: TypeId| id.index() < self.shapes.len();

        for def in &self.definitions {
            if def.declaring.is_some_and(|d| !def_ok(d)) {
                return Err(CoreError::InvalidGraph(format!(
                    "definition '{}' has a dangling declaring type",
                    def.name
                )));
            }
        }

        for (id, def) in self.definitions() {
            let mut seen = HashSet::from([id]);
            let mut current = def.declaring;
            while let Some(parent) = current {
                if !seen.insert(parent) {
                    return Err(CoreError::InvalidGraph(format!(
                        "definition '{}' is nested inside itself",
                        def.name
                    )));
                }
                current = self.definition(parent).declaring;
            }
        }

        for (id, def) in self.definitions() {
            let members = def.fields.iter().chain(def.properties.iter());
            for member in members {
                if !ty_ok(member.ty) || !def_ok(member.declaring) {
                    return Err(CoreError::InvalidGraph(format!(
                        "member '{}' of '{}' has a dangling handle",
                        member.name,
                        self.reflection_name(id)
                    )));
                }
            }
            if let Some(invoke) = &def.invoke {
                let dangling = !ty_ok(invoke.return_type)
                    || invoke.parameters.iter().any(|p| !ty_ok(p.ty));
                if dangling {
                    return Err(CoreError::InvalidGraph(format!(
                        "delegate '{}' has a dangling signature",
                        self.reflection_name(id)
                    )));
                }
            }
        }

        for (index, shape) in self.shapes.iter().enumerate() {
            let earlier = |t: &TypeId| t.index() < index;
            let ok = match shape {
                TypeShape::Definition { definition } => def_ok(*definition),
                TypeShape::Instantiated {
                    definition,
                    arguments,
                } => def_ok(*definition) && arguments.iter().all(earlier),
                TypeShape::Array { element, .. } | TypeShape::ByReference { element } => {
                    earlier(element)
                }
                TypeShape::TypeParameter {
                    owner: ParamOwner::Type { definition },
                    ..
                } => def_ok(*definition),
                TypeShape::Anonymous { properties } => properties.iter().all(|(_, t)| earlier(t)),
                TypeShape::TypeParameter { .. } | TypeShape::Dynamic => true,
            };
            if !ok {
                return Err(CoreError::InvalidGraph(format!(
                    "shape {} ({:?}) refers to a missing or later shape",
                    index, shape
                )));
            }
            if self.interned.get(shape).map(|id| id.index()) != Some(index) {
                return Err(CoreError::InvalidGraph(format!(
                    "shape {} ({:?}) duplicates an earlier shape",
                    index, shape
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_is_structural() {
        let mut graph = TypeGraph::with_core_library();
        let int = graph.known(KnownType::Int32).unwrap();
        let a = graph.array(int, 1);
        let b = graph.array(int, 1);
        let c = graph.array(int, 2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_reflection_name_of_nested_generic() {
        let mut graph = TypeGraph::new();
        let outer = graph.add_definition(TypeDef::class("Demo", "Outer").generic(&["K"]));
        let inner = graph.add_definition(
            TypeDef::class("Demo", "Inner")
                .generic(&["T", "U"])
                .nested_in(outer),
        );
        assert_eq!(graph.reflection_name(inner), "Demo.Outer`1+Inner`2");
        assert_eq!(graph.full_name(graph.definition_type(inner)), "Demo.Outer.Inner");
    }

    #[test]
    fn test_open_definition_reports_its_parameters() {
        let mut graph = TypeGraph::new();
        let list = graph.add_definition(TypeDef::class("Demo", "List").generic(&["T"]));
        let open = graph.definition_type(list);
        let args = graph.type_arguments(open);
        assert_eq!(args.len(), 1);
        assert_eq!(graph.simple_name(args[0]), "T");
    }

    #[test]
    fn test_nullable_underlying() {
        let mut graph = TypeGraph::with_core_library();
        let int = graph.known(KnownType::Int32).unwrap();
        let nullable = graph.nullable(int).unwrap();
        assert_eq!(graph.nullable_underlying(nullable), Some(int));
        assert_eq!(graph.nullable_underlying(int), None);
    }

    #[test]
    fn test_serde_rebuilds_lookup_tables() -> Result<(), Box<dyn std::error::Error>> {
        let mut graph = TypeGraph::with_core_library();
        let int = graph.known(KnownType::Int32).unwrap();
        let arr = graph.array(int, 1);

        let json = serde_json::to_string(&graph)?;
        let mut restored: TypeGraph = serde_json::from_str(&json)?;

        assert_eq!(restored.known(KnownType::Int32), Some(int));
        assert_eq!(restored.array(int, 1), arr);
        restored.validate()?;
        Ok(())
    }

    #[test]
    fn test_validate_rejects_dangling_declaring_type() {
        let mut graph = TypeGraph::new();
        graph.add_definition(TypeDef::class("Demo", "Orphan").nested_in(DefId(42)));
        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_declaring_cycle() {
        let mut graph = TypeGraph::new();
        let a = graph.add_definition(TypeDef::class("Demo", "A").nested_in(DefId(1)));
        graph.add_definition(TypeDef::class("Demo", "B").nested_in(a));
        let err = graph.validate().unwrap_err();
        assert!(err.to_string().contains("nested inside itself"));

        let mut graph = TypeGraph::new();
        graph.add_definition(TypeDef::class("Demo", "Loop").nested_in(DefId(0)));
        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_self_referencing_shape() -> Result<(), Box<dyn std::error::Error>> {
        let json = r#"{
            "definitions": [{"name": "Box", "namespace": "Demo", "kind": "class", "type_parameters": ["T"]}],
            "shapes": [{"shape": "instantiated", "definition": 0, "arguments": [0]}]
        }"#;
        let graph: TypeGraph = serde_json::from_str(json)?;
        let err = graph.validate().unwrap_err();
        assert!(err.to_string().contains("missing or later shape"));
        Ok(())
    }

    #[test]
    fn test_validate_rejects_duplicate_shapes() -> Result<(), Box<dyn std::error::Error>> {
        let json = r#"{
            "shapes": [{"shape": "dynamic"}, {"shape": "dynamic"}]
        }"#;
        let graph: TypeGraph = serde_json::from_str(json)?;
        let err = graph.validate().unwrap_err();
        assert!(err.to_string().contains("duplicates an earlier shape"));
        Ok(())
    }

    #[test]
    fn test_validate_accepts_built_graph() -> Result<(), Box<dyn std::error::Error>> {
        let mut graph = TypeGraph::with_core_library();
        let int = graph.known(KnownType::Int32).unwrap();
        let outer = graph.add_definition(TypeDef::class("Demo", "Outer"));
        let list = graph.add_definition(TypeDef::class("Demo", "List").generic(&["T"]).nested_in(outer));
        let ints = graph.instantiate(list, vec![int]);
        let nested = graph.instantiate(list, vec![ints]);
        graph.array(nested, 2);
        graph.anonymous(vec![("x".to_string(), int)]);
        graph.validate()?;

        let restored: TypeGraph = serde_json::from_str(&serde_json::to_string(&graph)?)?;
        restored.validate()?;
        Ok(())
    }
}
