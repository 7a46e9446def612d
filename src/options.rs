use serde::{Deserialize, Serialize};

/// Nesting limit applied to both parsing and building unless overridden.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Source name used in diagnostics when the caller does not supply one.
pub const DEFAULT_FILE_NAME: &str = "nginx.conf";

/// Settings for [`crate::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Keep `#` comments as nodes. When false they are dropped.
    pub comments: bool,
    /// Directive names to skip entirely, including any block they open.
    pub ignore: Vec<String>,
    pub max_depth: usize,
    /// Name shown in diagnostics.
    pub file_name: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            comments: true,
            ignore: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn without_comments(mut self) -> Self {
        self.comments = false;
        self
    }

    #[must_use]
    pub fn ignore(mut self, directive: impl Into<String>) -> Self {
        self.ignore.push(directive.into());
        self
    }

    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub(crate) fn is_ignored(&self, directive: &str) -> bool {
        self.ignore.iter().any(|name| name == directive)
    }
}

/// Settings for [`crate::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Spaces per nesting level. Ignored when `tabs` is set.
    pub indent: usize,
    pub tabs: bool,
    pub max_depth: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            tabs: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn tabs(mut self, tabs: bool) -> Self {
        self.tabs = tabs;
        self
    }

    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The whitespace prefix for a line at `depth`.
    pub(crate) fn margin(&self, depth: usize) -> String {
        if self.tabs {
            "\t".repeat(depth)
        } else {
            " ".repeat(self.indent * depth)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabs_win_over_indent() {
        let options = BuildOptions::new().indent(2).tabs(true);
        assert_eq!(options.margin(2), "\t\t");
        assert_eq!(BuildOptions::new().indent(2).margin(3), "      ");
    }

    #[test]
    fn test_partial_options_fill_defaults() {
        let options: BuildOptions = serde_json::from_str(r#"{ "tabs": true }"#).unwrap();
        assert!(options.tabs);
        assert_eq!(options.indent, 4);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);

        let options: ParseOptions = serde_yaml::from_str("ignore: [include]\n").unwrap();
        assert!(options.comments);
        assert!(options.is_ignored("include"));
        assert!(!options.is_ignored("listen"));
    }
}
