//! Module qualification, custom names and dependency recording

use std::sync::Arc;

use nomen_core::naming::apply_file_name_casing;
use nomen_core::{
    EmitterSettings, Module, ModuleDependency, ModuleKind, OutputGrammar, RecordId, TypeInfo,
};
use tracing::debug;

use crate::resolver::NameResolver;

/// Namespace, output file and module of a compiled type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceFile {
    pub namespace: Option<String>,
    pub file_name: String,
    pub module: Option<Arc<Module>>,
}

impl NameResolver<'_> {
    /// Prefix `candidate` with its target module when the boundary is crossed
    ///
    /// Returns the qualified name and whether a custom name replaced the
    /// candidate. Crossing a module boundary also records a dependency edge.
    pub fn resolve_qualification(
        &mut self,
        candidate: String,
        record: RecordId,
        exclude_namespace: bool,
        is_nested: bool,
    ) -> (String, bool) {
        let graph = self.graph;
        let target = self.registry.record_mut(record).target_module(graph);
        let has_compile_info = self.registry.record(record).compile_info.is_some();
        let current = self
            .context
            .current_type()
            .map(|info| (info.key.clone(), info.module.clone()));

        let mut module_name = None;
        if let (Some((current_key, current_module)), Some(target)) = (current, target) {
            let declaration = self.settings().grammar == OutputGrammar::Declaration;
            if !declaration || !Module::same(current_module.as_ref(), Some(&target)) {
                if !target.prevent_module_name || has_compile_info {
                    module_name = Some(target.export_as_namespace.clone());
                }
                self.record_dependency(&current_key, current_module.as_ref(), record, &target);
            }
        }

        self.apply_custom_name(candidate, record, exclude_namespace, is_nested, module_name.as_deref())
    }

    /// Custom-name override followed by optional module prefixing
    pub fn apply_custom_name(
        &self,
        candidate: String,
        record: RecordId,
        exclude_namespace: bool,
        is_nested: bool,
        module_name: Option<&str>,
    ) -> (String, bool) {
        let def = self.registry.record(record).definition;
        let custom = self
            .context
            .custom_names()
            .custom_type_name(self.graph, def, exclude_namespace)
            .filter(|name| !name.is_empty());

        let is_custom_name = custom.is_some();
        let name = custom.unwrap_or(candidate);

        match module_name {
            Some(module) if !module.is_empty() && (!is_nested || is_custom_name) => {
                if name.trim().is_empty() {
                    (module.to_string(), is_custom_name)
                } else {
                    (format!("{}.{}", module, name), is_custom_name)
                }
            }
            _ => (name, is_custom_name),
        }
    }

    fn record_dependency(
        &mut self,
        current_key: &str,
        current_module: Option<&Arc<Module>>,
        record: RecordId,
        target: &Arc<Module>,
    ) {
        if self.settings().disable_dependency_tracking {
            return;
        }
        if current_key == self.registry.record(record).key() {
            return;
        }
        if Module::same(current_module, Some(target)) {
            return;
        }
        if self.context.add_dependency_once(ModuleDependency::on_module(target)) {
            debug!(
                "{} depends on module '{}' through {}",
                current_key,
                target.name,
                self.registry.record(record).key()
            );
        }
    }
}

/// Namespace and output file name of `info` under `settings`
///
/// UMD modules that expose their name fold it into the namespace; a UMD
/// module without an export name is dropped from the result.
pub fn namespace_and_filename(info: &TypeInfo, settings: &EmitterSettings) -> NamespaceFile {
    let mut namespace = info.namespace.clone();
    let file_name = namespace
        .clone()
        .unwrap_or_else(|| info.key_namespace().to_string());
    let mut module = info.module.clone();

    if let Some(umd) = module.clone().filter(|m| m.kind == ModuleKind::Umd) {
        let export = if umd.prevent_module_name {
            ""
        } else {
            umd.export_as_namespace.as_str()
        };

        if export.is_empty() {
            module = None;
        } else {
            namespace = Some(match namespace.as_deref() {
                Some(ns) if !ns.trim().is_empty() => format!("{}.{}", export, ns),
                _ => export.to_string(),
            });
        }
    }

    NamespaceFile {
        namespace,
        file_name: apply_file_name_casing(&file_name, settings.file_name_casing),
        module,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomen_core::FileNameCasing;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filename_follows_namespace_with_casing() {
        let settings = EmitterSettings::default().with_casing(FileNameCasing::CamelCase);
        let info = TypeInfo::new("Demo.IOStreams.Reader").in_namespace("Demo.IOStreams");
        let result = namespace_and_filename(&info, &settings);
        assert_eq!(result.namespace.as_deref(), Some("Demo.IOStreams"));
        assert_eq!(result.file_name, "demo.ioStreams");
        assert_eq!(result.module, None);
    }

    #[test]
    fn test_filename_falls_back_to_key_namespace() {
        let settings = EmitterSettings::default().with_casing(FileNameCasing::Lowercase);
        let info = TypeInfo::new("Demo.Shapes+Circle");
        let result = namespace_and_filename(&info, &settings);
        assert_eq!(result.namespace, None);
        assert_eq!(result.file_name, "demo");
    }

    #[test]
    fn test_umd_module_folds_into_namespace() {
        let settings = EmitterSettings::default();
        let umd = Arc::new(Module::new("shapes").with_export_as("Shp").with_kind(ModuleKind::Umd));
        let info = TypeInfo::new("Demo.Circle")
            .in_namespace("Demo")
            .in_module(umd.clone());

        let result = namespace_and_filename(&info, &settings);
        assert_eq!(result.namespace.as_deref(), Some("Shp.Demo"));
        assert_eq!(result.file_name, "Demo");
        assert_eq!(result.module, Some(umd));
    }

    #[test]
    fn test_umd_module_without_name_is_dropped() {
        let settings = EmitterSettings::default();
        let umd = Arc::new(Module::new("shapes").with_kind(ModuleKind::Umd).preventing_name());
        let info = TypeInfo::new("Demo.Circle").in_namespace("Demo").in_module(umd);

        let result = namespace_and_filename(&info, &settings);
        assert_eq!(result.namespace.as_deref(), Some("Demo"));
        assert_eq!(result.module, None);
    }

    #[test]
    fn test_non_umd_module_is_kept_untouched() {
        let settings = EmitterSettings::default();
        let amd = Arc::new(Module::new("shapes").with_kind(ModuleKind::Amd));
        let info = TypeInfo::new("Demo.Circle").in_namespace("Demo").in_module(amd.clone());

        let result = namespace_and_filename(&info, &settings);
        assert_eq!(result.namespace.as_deref(), Some("Demo"));
        assert_eq!(result.module, Some(amd));
    }
}
