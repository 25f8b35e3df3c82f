//! Global emitter settings supplied by the build configuration

use serde::{Deserialize, Serialize};

/// Output grammar the names are produced for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputGrammar {
    /// Emitted scripting-runtime code
    #[default]
    Runtime,
    /// Structurally-typed declaration metadata
    Declaration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileNameCasing {
    #[default]
    None,
    Lowercase,
    CamelCase,
}

/// How output files are organized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputBy {
    #[default]
    Project,
    Namespace,
    Module,
    ClassPath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterSettings {
    pub disable_dependency_tracking: bool,
    pub grammar: OutputGrammar,
    pub file_name_casing: FileNameCasing,
    pub output_by: OutputBy,
    /// Assembly whose generic types always keep their arity marker
    pub home_assembly: String,
    /// Namespace prefixed to generated anonymous type names
    pub anonymous_namespace: Option<String>,
}

impl Default for EmitterSettings {
    fn default() -> Self {
        Self {
            disable_dependency_tracking: false,
            grammar: OutputGrammar::Runtime,
            file_name_casing: FileNameCasing::None,
            output_by: OutputBy::Project,
            home_assembly: "Bridge".to_string(),
            anonymous_namespace: None,
        }
    }
}

impl EmitterSettings {
    pub fn declaration() -> Self {
        Self {
            grammar: OutputGrammar::Declaration,
            ..Default::default()
        }
    }

    pub fn with_output_by(mut self, output_by: OutputBy) -> Self {
        self.output_by = output_by;
        self
    }

    pub fn with_casing(mut self, casing: FileNameCasing) -> Self {
        self.file_name_casing = casing;
        self
    }

    pub fn without_dependency_tracking(mut self) -> Self {
        self.disable_dependency_tracking = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_deserialize_with_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let settings: EmitterSettings =
            serde_json::from_str(r#"{"grammar": "declaration", "file_name_casing": "camel-case"}"#)?;
        assert_eq!(settings.grammar, OutputGrammar::Declaration);
        assert_eq!(settings.file_name_casing, FileNameCasing::CamelCase);
        assert_eq!(settings.output_by, OutputBy::Project);
        assert_eq!(settings.home_assembly, "Bridge");
        Ok(())
    }
}
