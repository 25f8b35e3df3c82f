//! Registry of the type definitions participating in output
//!
//! Records are kept in insertion order so the linear-scan fallback is
//! deterministic. Two derived caches (by canonical type handle and by
//! compile-info key) bound the scan to one miss per distinct handle shape;
//! they only ever hold what a fresh scan would return.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use crate::error::CoreError;
use crate::model::{DefId, TypeGraph, TypeId, TypeShape};
use crate::module::{Module, TypeInfo};

/// Index of a record inside a [`TypeRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(usize);

impl RecordId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Per-type metadata binding a source definition to its output placement
#[derive(Debug, Clone)]
pub struct TypeRecord {
    key: String,
    /// Definition in the object model this record describes
    pub definition: DefId,
    /// Compile metadata; authoritative over `module` once linked
    pub compile_info: Option<TypeInfo>,
    /// Output module when no compile info is linked
    pub module: Option<Arc<Module>>,
}

impl TypeRecord {
    pub fn new(key: impl Into<String>, definition: DefId) -> Self {
        Self {
            key: key.into(),
            definition,
            compile_info: None,
            module: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Module this record's type is emitted into
    ///
    /// Without linked compile info the module is derived from the
    /// definition's declared module and cached on the record.
    pub fn target_module(&mut self, graph: &TypeGraph) -> Option<Arc<Module>> {
        if let Some(info) = &self.compile_info {
            return info.module.clone();
        }
        if self.module.is_none() {
            self.module = graph.declared_module(self.definition);
        }
        self.module.clone()
    }
}

#[derive(Debug, Default)]
pub struct TypeRegistry {
    records: Vec<TypeRecord>,
    by_key: HashMap<String, RecordId>,
    by_handle: HashMap<TypeId, RecordId>,
    by_compile_info: HashMap<String, RecordId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, record: TypeRecord) -> Result<RecordId, CoreError> {
        if self.by_key.contains_key(record.key()) {
            return Err(CoreError::DuplicateKey(record.key.clone()));
        }
        let id = RecordId(self.records.len());
        self.by_key.insert(record.key.clone(), id);
        self.records.push(record);
        Ok(id)
    }

    /// Register a definition under the key derived from its reflection name
    pub fn register_definition(
        &mut self,
        graph: &TypeGraph,
        definition: DefId,
    ) -> Result<RecordId, CoreError> {
        self.register(TypeRecord::new(graph.definition_key(definition), definition))
    }

    /// Cross-link records with the compile metadata of the same key
    ///
    /// `types` supplies the per-type entries; when `definitions` holds an
    /// entry for the same key its module, file name and dependencies are
    /// copied over. Records without a matching entry are left untouched.
    pub fn link_compile_info(&mut self, types: &[TypeInfo], definitions: &HashMap<String, TypeInfo>) {
        trace!("Linking compile info for {} registered types", self.records.len());

        for record in &mut self.records {
            let Some(info) = types.iter().find(|info| info.key == record.key) else {
                continue;
            };
            let mut info = info.clone();

            if let Some(definition) = definitions.get(&record.key) {
                info.module = definition.module.clone();
                info.file_name = definition.file_name.clone();
                info.dependencies = definition.dependencies.clone();
            }

            record.compile_info = Some(info);
        }

        trace!("Linking compile info done");
    }

    pub fn get(&self, key: &str) -> Result<RecordId, CoreError> {
        self.by_key
            .get(key)
            .copied()
            .ok_or_else(|| CoreError::NotFound(key.to_string()))
    }

    /// Resolve a type handle of any shape to its record
    ///
    /// Instantiations resolve through their open definition and by-reference
    /// wrappers through their element. With `safe` a miss is `Ok(None)`.
    pub fn get_by_type(
        &mut self,
        graph: &TypeGraph,
        ty: TypeId,
        safe: bool,
    ) -> Result<Option<RecordId>, CoreError> {
        if let Some(&id) = self.by_handle.get(&ty) {
            return Ok(Some(id));
        }

        let original = ty;
        let mut ty = ty;
        if let TypeShape::Instantiated { definition, .. } = graph.shape(ty) {
            ty = graph.definition_type(*definition);
        }
        if let TypeShape::ByReference { element } = graph.shape(ty) {
            ty = *element;
        }

        if let Some(&id) = self.by_handle.get(&ty) {
            return Ok(Some(id));
        }

        trace!("Registry cache miss for type {}", graph.full_name(ty));

        let found = self
            .records
            .iter()
            .position(|record| graph.definition_type(record.definition) == ty)
            .map(RecordId);

        match found {
            Some(id) => {
                self.by_handle.insert(ty, id);
                if ty != original {
                    self.by_handle.insert(original, id);
                }
                Ok(Some(id))
            }
            None if safe => Ok(None),
            None => Err(CoreError::NotFound(graph.full_name(ty))),
        }
    }

    /// Resolve compile metadata to its record by reflection-name equality
    pub fn get_by_info(
        &mut self,
        graph: &TypeGraph,
        info: &TypeInfo,
        safe: bool,
    ) -> Result<Option<RecordId>, CoreError> {
        if let Some(&id) = self.by_compile_info.get(&info.key) {
            return Ok(Some(id));
        }

        let found = self
            .records
            .iter()
            .position(|record| graph.reflection_name(record.definition) == info.key)
            .map(RecordId);

        match found {
            Some(id) => {
                self.by_compile_info.insert(info.key.clone(), id);
                Ok(Some(id))
            }
            None if safe => Ok(None),
            None => Err(CoreError::NotFound(info.key.clone())),
        }
    }

    pub fn record(&self, id: RecordId) -> &TypeRecord {
        &self.records[id.0]
    }

    pub fn record_mut(&mut self, id: RecordId) -> &mut TypeRecord {
        &mut self.records[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &TypeRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(idx, record)| (RecordId(idx), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
