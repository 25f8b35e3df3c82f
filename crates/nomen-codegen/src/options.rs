/// Per-call resolution options, threaded by value through the recursion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameOptions {
    /// Suppress the generic argument list
    pub as_definition: bool,
    pub exclude_namespace: bool,
    /// Produce a runtime type-alias expression instead of a plain name
    pub as_alias: bool,
    /// Collapse method-level type parameters to the generic object type
    pub skip_method_type_params: bool,
    /// Drop the global scope name for types whose global marker is false
    pub remove_scope_prefix: bool,
    pub suppress_module: bool,
    /// Name plain object literals as the generic object type
    pub ignore_literal_name: bool,
    pub ignore_virtual: bool,
    /// Declaration grammar only: do not record file references
    pub ignore_dependency: bool,
}

impl Default for NameOptions {
    fn default() -> Self {
        Self {
            as_definition: false,
            exclude_namespace: false,
            as_alias: false,
            skip_method_type_params: false,
            remove_scope_prefix: true,
            suppress_module: false,
            ignore_literal_name: true,
            ignore_virtual: false,
            ignore_dependency: false,
        }
    }
}

impl NameOptions {
    pub fn definition(mut self) -> Self {
        self.as_definition = true;
        self
    }

    pub fn excluding_namespace(mut self) -> Self {
        self.exclude_namespace = true;
        self
    }

    pub fn alias(mut self) -> Self {
        self.as_alias = true;
        self
    }

    pub fn skipping_method_type_params(mut self) -> Self {
        self.skip_method_type_params = true;
        self
    }

    pub fn keeping_scope_prefix(mut self) -> Self {
        self.remove_scope_prefix = false;
        self
    }

    pub fn without_module(mut self) -> Self {
        self.suppress_module = true;
        self
    }

    pub fn with_literal_name(mut self) -> Self {
        self.ignore_literal_name = false;
        self
    }

    pub fn without_virtual(mut self) -> Self {
        self.ignore_virtual = true;
        self
    }

    pub fn without_dependency(mut self) -> Self {
        self.ignore_dependency = true;
        self
    }

    /// Options for the element of an array or by-reference type
    pub(crate) fn for_element(self) -> Self {
        Self {
            as_definition: self.as_definition,
            exclude_namespace: self.exclude_namespace,
            as_alias: self.as_alias,
            skip_method_type_params: self.skip_method_type_params,
            ..Default::default()
        }
    }

    /// Options for the enclosing type of a nested type
    pub(crate) fn for_declaring(self) -> Self {
        Self {
            as_definition: true,
            ignore_virtual: true,
            suppress_module: self.suppress_module,
            ..Default::default()
        }
    }
}
