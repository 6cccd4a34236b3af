//! Compiler configuration.

use serde::Deserialize;

/// How bound scalars are written into the final SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Inline every scalar as literal text (legacy-compatible).
    #[default]
    Literal,
    /// Emit placeholders and hand the scalars over as a parameter list.
    Parameterized,
}

/// Placeholder token used in parameterized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `?` for every parameter (MySQL, SQLite).
    #[default]
    Question,
    /// `$1, $2, ...` (PostgreSQL). Caller `?` placeholders are still
    /// written as `?`; executors in this style reject them.
    Numbered,
}

impl PlaceholderStyle {
    /// Placeholder text for the 1-based parameter `index`.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Numbered => format!("${}", index),
        }
    }
}

/// Configuration for a [`Builder`](crate::Builder).
///
/// Defaults reproduce the classic behavior: values are auto-quoted and inlined
/// as literal text, without escaping.
///
/// # Example
///
/// ```rust
/// use sqlweave::{CompilerConfig, PlaceholderStyle, RenderMode};
///
/// let config = CompilerConfig::new()
///     .render(RenderMode::Parameterized)
///     .placeholder(PlaceholderStyle::Numbered);
/// assert!(config.auto_quote_values);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Quote scalar values automatically.
    pub auto_quote_values: bool,
    /// Literal or parameterized output.
    pub render: RenderMode,
    /// Placeholder style for parameterized output.
    pub placeholder: PlaceholderStyle,
    /// Double embedded single quotes when inlining text literals.
    pub escape_literals: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            auto_quote_values: true,
            render: RenderMode::Literal,
            placeholder: PlaceholderStyle::Question,
            escape_literals: false,
        }
    }
}

impl CompilerConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable automatic value quoting.
    pub fn auto_quote_values(mut self, enabled: bool) -> Self {
        self.auto_quote_values = enabled;
        self
    }

    /// Set the render mode.
    pub fn render(mut self, mode: RenderMode) -> Self {
        self.render = mode;
        self
    }

    /// Set the placeholder style used in parameterized output.
    pub fn placeholder(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder = style;
        self
    }

    /// Enable or disable escaping of inlined text literals.
    pub fn escape_literals(mut self, enabled: bool) -> Self {
        self.escape_literals = enabled;
        self
    }

    /// Shorthand for parameterized output in the given placeholder style.
    pub fn parameterized(style: PlaceholderStyle) -> Self {
        Self::default()
            .render(RenderMode::Parameterized)
            .placeholder(style)
    }
}
