/**
Router configuration.

# Defaults

* path prefix: none
* scope separator: none, so `Users` + `Index` composes to `UsersIndex`
* reverse scope naming: disabled, so outer names come first

With the `serde` feature enabled, this can be deserialized from
configuration. Both `path_prefix` and `pathPrefix` spellings are
accepted for each field.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct RouterOptions {
    #[cfg_attr(feature = "serde", serde(alias = "pathPrefix"))]
    path_prefix: String,

    #[cfg_attr(feature = "serde", serde(alias = "scopeSeparator"))]
    scope_separator: String,

    #[cfg_attr(feature = "serde", serde(alias = "reverseScopeNaming"))]
    reverse_scope_naming: bool,
}

impl RouterOptions {
    /// the default options
    pub fn new() -> Self {
        Self::default()
    }

    /// the path every route registered through the root scope starts
    /// with. It is removed from the path seen by matched handlers.
    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// the text placed between composed scope and route names
    pub fn scope_separator(&self) -> &str {
        &self.scope_separator
    }

    /// whether inner names are placed before outer names
    pub fn reverse_scope_naming(&self) -> bool {
        self.reverse_scope_naming
    }

    /// chainable setter for [`RouterOptions::path_prefix`]
    #[must_use]
    pub fn with_path_prefix(mut self, path_prefix: impl Into<String>) -> Self {
        self.path_prefix = path_prefix.into();
        self
    }

    /// chainable setter for [`RouterOptions::scope_separator`]
    #[must_use]
    pub fn with_scope_separator(mut self, scope_separator: impl Into<String>) -> Self {
        self.scope_separator = scope_separator.into();
        self
    }

    /// chainable setter for [`RouterOptions::reverse_scope_naming`]
    #[must_use]
    pub fn with_reverse_scope_naming(mut self, reverse_scope_naming: bool) -> Self {
        self.reverse_scope_naming = reverse_scope_naming;
        self
    }
}
