//! Compiled SQL fragments with bind slots.
//!
//! Every piece the compiler produces is an [`Sql`] value: raw text interleaved
//! with bound scalars. Whether a bound scalar ends up inlined as a literal or
//! as a placeholder is decided only when the fragment is rendered, so the same
//! compiled statement can be handed to an executor with native parameter
//! binding or printed as plain text.
//!
//! # Example
//!
//! ```rust
//! use sqlweave::{CompilerConfig, PlaceholderStyle, Scalar, Sql};
//!
//! let mut sql = Sql::new("SELECT * FROM users WHERE id = ");
//! sql.push_bind(Scalar::Int(7));
//! sql.push(" AND status = ").push_bind(Scalar::from("active"));
//!
//! assert_eq!(sql.to_sql(), "SELECT * FROM users WHERE id = 7 AND status = 'active'");
//!
//! let (text, params) = sql.render(&CompilerConfig::parameterized(PlaceholderStyle::Numbered));
//! assert_eq!(text, "SELECT * FROM users WHERE id = $1 AND status = $2");
//! assert_eq!(params.len(), 2);
//! ```

use crate::config::{CompilerConfig, RenderMode};
use crate::value::{PLACEHOLDER, Scalar};

#[derive(Debug, Clone, PartialEq)]
enum SqlPart {
    Raw(String),
    Bind(Scalar),
    /// A `?` written by the caller; its value is supplied outside the compiler.
    Placeholder,
}

/// A SQL fragment made of raw text and bound scalars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sql {
    parts: Vec<SqlPart>,
}

impl Sql {
    /// Create a fragment from an initial piece of raw SQL.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        let mut sql = Self::empty();
        sql.push(&initial_sql.into());
        sql
    }

    /// Create an empty fragment.
    pub fn empty() -> Self {
        Self { parts: Vec::new() }
    }

    /// Append raw SQL.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
        self
    }

    /// Append a bound scalar.
    pub fn push_bind(&mut self, value: Scalar) -> &mut Self {
        self.parts.push(SqlPart::Bind(value));
        self
    }

    /// Append a caller-supplied `?` placeholder.
    pub fn push_placeholder(&mut self) -> &mut Self {
        self.parts.push(SqlPart::Placeholder);
        self
    }

    /// Append another fragment, keeping its bind slots in order.
    pub fn append(&mut self, other: &Sql) -> &mut Self {
        for part in &other.parts {
            match part {
                SqlPart::Raw(text) => {
                    self.push(text);
                }
                SqlPart::Bind(value) => {
                    self.push_bind(value.clone());
                }
                SqlPart::Placeholder => {
                    self.push_placeholder();
                }
            }
        }
        self
    }

    /// Append another fragment wrapped in parentheses.
    pub fn append_parenthesized(&mut self, other: &Sql) -> &mut Self {
        self.push("(");
        self.append(other);
        self.push(")")
    }

    /// Join fragments with a raw separator.
    pub fn join(fragments: &[Sql], separator: &str) -> Sql {
        let mut out = Sql::empty();
        for (i, fragment) in fragments.iter().enumerate() {
            if i > 0 {
                out.push(separator);
            }
            out.append(fragment);
        }
        out
    }

    /// Check whether the fragment renders to nothing.
    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|part| match part {
            SqlPart::Raw(text) => text.is_empty(),
            SqlPart::Bind(_) | SqlPart::Placeholder => false,
        })
    }

    /// Number of bound scalars.
    pub fn bind_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, SqlPart::Bind(_)))
            .count()
    }

    /// Number of caller-supplied `?` placeholders.
    pub fn placeholder_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, SqlPart::Placeholder))
            .count()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.parts.clear();
    }

    /// Render to text plus the parameters that belong to its placeholders.
    ///
    /// In literal mode the parameter list is always empty. Caller placeholders
    /// are always written as `?` and take no entry in the parameter list.
    pub fn render(&self, config: &CompilerConfig) -> (String, Vec<Scalar>) {
        let mut text = String::new();
        let mut params = Vec::new();

        for part in &self.parts {
            match part {
                SqlPart::Raw(raw) => text.push_str(raw),
                SqlPart::Placeholder => text.push_str(PLACEHOLDER),
                SqlPart::Bind(value) => match config.render {
                    RenderMode::Literal => {
                        text.push_str(&quote_literal(value, config.escape_literals));
                    }
                    RenderMode::Parameterized => {
                        params.push(value.clone());
                        text.push_str(&config.placeholder.placeholder(params.len()));
                    }
                },
            }
        }

        (text, params)
    }

    /// Render with the default (literal) configuration.
    pub fn to_sql(&self) -> String {
        self.render(&CompilerConfig::default()).0
    }
}

/// Inline a scalar as SQL literal text.
///
/// Integers stay bare, everything else is wrapped in single quotes. Embedded
/// quotes are doubled only when `escape` is set; otherwise the text is passed
/// through untouched and the caller owns its safety.
pub fn quote_literal(value: &Scalar, escape: bool) -> String {
    match value {
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(f) => format!("'{}'", f),
        Scalar::Text(s) if escape => format!("'{}'", s.replace('\'', "''")),
        Scalar::Text(s) => format!("'{}'", s),
    }
}
