//! Values and the value quoter.
//!
//! A [`Value`] is decided when it is constructed: a scalar, the `?`
//! placeholder, a list (for `IN` / `BETWEEN` / `VALUES`), or an embedded
//! sub-expression. The [`Quoter`] turns values into [`Sql`] fragments.

use crate::config::CompilerConfig;
use crate::sql::Sql;
use serde::Deserialize;
use std::fmt;

/// The reserved placeholder token.
pub const PLACEHOLDER: &str = "?";

/// A single scalar value.
///
/// Bound as a PostgreSQL parameter of whichever numeric or text type the
/// server expects for its placeholder.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! scalar_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(n: $t) -> Self {
                    Scalar::Int(i64::from(n))
                }
            }

            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Scalar(Scalar::from(n))
                }
            }
        )*
    };
}

scalar_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for Scalar {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or_else(|_| Scalar::Text(n.to_string()), Scalar::Int)
    }
}

impl From<u64> for Scalar {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or_else(|_| Scalar::Text(n.to_string()), Scalar::Int)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Float(f64::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<&String> for Scalar {
    fn from(s: &String) -> Self {
        Scalar::Text(s.clone())
    }
}

/// Read-only snapshot of another builder's compiled statement.
///
/// Embedding always parenthesizes the snapshot. The snapshot keeps no link to
/// the builder it was taken from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubQuery {
    sql: Sql,
}

impl SubQuery {
    pub fn new(sql: Sql) -> Self {
        Self { sql }
    }

    /// The embedded fragment, without parentheses.
    pub fn sql(&self) -> &Sql {
        &self.sql
    }

    /// The embedded fragment wrapped in parentheses.
    pub fn parenthesized(&self) -> Sql {
        let mut out = Sql::empty();
        out.append_parenthesized(&self.sql);
        out
    }
}

/// A value referenced by a predicate, an INSERT or a SET clause.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ValueRepr")]
pub enum Value {
    /// A string or number.
    Scalar(Scalar),
    /// The `?` token, never quoted.
    Placeholder,
    /// Several values (IN lists, BETWEEN endpoints, INSERT rows).
    List(Vec<Value>),
    /// Another builder's statement, parenthesized on render.
    SubExpression(SubQuery),
}

impl Value {
    /// Build a list value.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Number of top-level elements (a non-list value counts as one).
    pub fn len(&self) -> usize {
        match self {
            Value::List(items) => items.len(),
            _ => 1,
        }
    }

    /// Check for an empty list.
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::List(items) if items.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Scalar(Scalar),
    List(Vec<ValueRepr>),
}

impl From<ValueRepr> for Value {
    fn from(repr: ValueRepr) -> Self {
        match repr {
            ValueRepr::Scalar(Scalar::Text(s)) if s == PLACEHOLDER => Value::Placeholder,
            ValueRepr::Scalar(scalar) => Value::Scalar(scalar),
            ValueRepr::List(items) => Value::List(items.into_iter().map(Value::from).collect()),
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<SubQuery> for Value {
    fn from(sub: SubQuery) -> Self {
        Value::SubExpression(sub)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Scalar(Scalar::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Scalar(Scalar::from(n))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Scalar(Scalar::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(Scalar::Float(v))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        if s == PLACEHOLDER {
            Value::Placeholder
        } else {
            Value::Scalar(Scalar::from(s))
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::from(s.as_str())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::from(s.as_str())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::list(items)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::list(items)
    }
}

/// Renders values as SQL fragments under a given configuration.
///
/// - With quoting disabled, scalars are written in their plain string form.
/// - With quoting enabled, the placeholder stays bare and scalars become bind
///   slots: inlined (integers bare, everything else single-quoted) or turned
///   into placeholders when the statement is rendered.
/// - Sub-expressions are always parenthesized.
#[derive(Debug, Clone, Copy)]
pub struct Quoter<'a> {
    config: &'a CompilerConfig,
}

impl<'a> Quoter<'a> {
    pub fn new(config: &'a CompilerConfig) -> Self {
        Self { config }
    }

    /// Render every element and join them with commas (IN lists, INSERT values).
    pub fn joined(&self, value: &Value) -> Sql {
        match value {
            Value::SubExpression(sub) => sub.parenthesized(),
            _ => Sql::join(&self.list(value), ","),
        }
    }

    /// Render every element separately (BETWEEN endpoints).
    pub fn list(&self, value: &Value) -> Vec<Sql> {
        match value {
            Value::List(items) => items.iter().map(|item| self.element(item)).collect(),
            other => vec![self.element(other)],
        }
    }

    fn element(&self, value: &Value) -> Sql {
        match value {
            Value::Scalar(scalar) => self.scalar(scalar),
            Value::Placeholder => placeholder(),
            Value::List(_) => Sql::join(&self.list(value), ","),
            Value::SubExpression(sub) => sub.parenthesized(),
        }
    }

    fn scalar(&self, scalar: &Scalar) -> Sql {
        if !self.config.auto_quote_values {
            return Sql::new(scalar.to_string());
        }
        match scalar {
            Scalar::Text(s) if s == PLACEHOLDER => placeholder(),
            _ => {
                let mut sql = Sql::empty();
                sql.push_bind(scalar.clone());
                sql
            }
        }
    }
}

fn placeholder() -> Sql {
    let mut sql = Sql::empty();
    sql.push_placeholder();
    sql
}
