//! Rewrites source identifier punctuation into output-safe characters
//!
//! The substitution table is compiled once into a single pattern when the
//! normalizer is built; callers construct one `NameNormalizer` per process
//! and pass it by reference.

use std::borrow::Cow;

use regex::{Captures, NoExpand, Regex};

/// Separator used for generic arity markers and alias segments
pub const SEPARATOR: char = '$';

const NAME_PATTERN: &str = r"[`/+\[\]&]";
const INTERFACE_PATTERN: &str = r"[.(),]";

#[derive(Debug, Clone)]
pub struct NameNormalizer {
    name_pattern: Regex,
    interface_pattern: Regex,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl NameNormalizer {
    pub fn new() -> Self {
        Self {
            name_pattern: Regex::new(NAME_PATTERN).expect("name pattern is a valid regex"),
            interface_pattern: Regex::new(INTERFACE_PATTERN)
                .expect("interface pattern is a valid regex"),
        }
    }

    /// Normalize a single, non-qualified name segment
    ///
    /// `` ` `` becomes `$`, `/` and `+` become `.`, `[`, `]` and `&` are
    /// dropped.
    pub fn convert<'a>(&self, name: &'a str) -> Cow<'a, str> {
        self.name_pattern.replace_all(name, |caps: &Captures| {
            match &caps[0] {
                "`" => SEPARATOR.to_string(),
                "/" | "+" => ".".to_string(),
                _ => String::new(),
            }
        })
    }

    /// Collapse a composed name into its alias form (`A.B(C)` -> `A$B$C$`)
    pub fn interface_alias<'a>(&self, name: &'a str) -> Cow<'a, str> {
        self.interface_pattern.replace_all(name, NoExpand("$"))
    }
}

/// `$N` arity marker for `count` type arguments
pub fn arity_suffix(count: usize) -> String {
    format!("{}{}", SEPARATOR, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_convert_replaces_each_marker() {
        let normalizer = NameNormalizer::new();
        assert_eq!(normalizer.convert("List`1"), "List$1");
        assert_eq!(normalizer.convert("Outer+Inner"), "Outer.Inner");
        assert_eq!(normalizer.convert("Outer/Inner"), "Outer.Inner");
        assert_eq!(normalizer.convert("Int32[]"), "Int32");
        assert_eq!(normalizer.convert("Int32&"), "Int32");
        assert_eq!(normalizer.convert("Dictionary`2+Entry[]&"), "Dictionary$2.Entry");
    }

    #[test]
    fn test_convert_borrows_clean_names() {
        let normalizer = NameNormalizer::new();
        assert!(matches!(normalizer.convert("Plain"), Cow::Borrowed("Plain")));
    }

    #[test]
    fn test_interface_alias() {
        let normalizer = NameNormalizer::new();
        assert_eq!(
            normalizer.interface_alias("System.Collections.Generic.IList$1"),
            "System$Collections$Generic$IList$1"
        );
        assert_eq!(normalizer.interface_alias("A(B,C)"), "A$B$C$");
    }

    proptest! {
        #[test]
        fn prop_convert_is_idempotent(name in "[A-Za-z0-9_`+/\\[\\]&]{0,24}") {
            let normalizer = NameNormalizer::new();
            let once = normalizer.convert(&name).into_owned();
            let twice = normalizer.convert(&once).into_owned();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_convert_leaves_no_markers(name in "[A-Za-z0-9_`+/\\[\\]&]{0,24}") {
            let normalizer = NameNormalizer::new();
            let converted = normalizer.convert(&name);
            prop_assert!(!converted.contains(&['`', '/', '+', '[', ']', '&'][..]));
        }
    }
}
