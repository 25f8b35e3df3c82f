//! Error types for name resolution

use std::fmt;

use nomen_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Type {type_name} is marked as not usable from script (at {site})")]
    NonScriptable { type_name: String, site: EmitSite },

    #[error("Cannot resolve mixin target of {type_name}: {reason}")]
    MixinResolution { type_name: String, reason: String },
}

/// Where in the output the failing name was requested
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitSite {
    /// Output module (e.g., "collections")
    pub module: Option<String>,
    /// Type being emitted (e.g., "Demo.Shapes.Circle")
    pub type_name: Option<String>,
    /// Member being emitted (e.g., "Area")
    pub member: Option<String>,
}

impl EmitSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn in_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn in_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }
}

impl fmt::Display for EmitSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.module, &self.type_name, &self.member) {
            (Some(m), Some(t), Some(member)) => write!(f, "{}:{}::{}", m, t, member),
            (Some(m), Some(t), None) => write!(f, "{}:{}", m, t),
            (Some(m), None, Some(member)) => write!(f, "{}::{}", m, member),
            (Some(m), None, None) => write!(f, "{}", m),
            (None, Some(t), Some(member)) => write!(f, "{}::{}", t, member),
            (None, Some(t), None) => write!(f, "{}", t),
            (None, None, Some(member)) => write!(f, "::{}", member),
            (None, None, None) => write!(f, "<unknown location>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_site_display() {
        assert_eq!(EmitSite::new().to_string(), "<unknown location>");
        assert_eq!(
            EmitSite::new().in_module("app").in_type("Demo.Circle").to_string(),
            "app:Demo.Circle"
        );
        assert_eq!(
            EmitSite::new().in_type("Demo.Circle").in_member("Area").to_string(),
            "Demo.Circle::Area"
        );
    }

    #[test]
    fn test_not_found_is_transparent() {
        let err: NamingError = CoreError::NotFound("Demo.Missing".to_string()).into();
        assert_eq!(err.to_string(), "Cannot find type: Demo.Missing");
    }
}
