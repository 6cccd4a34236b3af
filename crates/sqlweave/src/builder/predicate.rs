//! Predicate descriptors for WHERE / HAVING.

use crate::error::{SqlError, SqlResult};
use crate::value::Value;
use serde::Deserialize;
use std::fmt;

/// Comparison operator of a predicate.
///
/// Parsing trims and uppercases the input; anything that is not a known
/// operator is kept as [`Operator::Other`] and rendered like `=`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Operator {
    #[default]
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Like,
    NotLike,
    In,
    NotIn,
    Between,
    NotBetween,
    IsNull,
    IsNotNull,
    Other(String),
}

impl Operator {
    /// Parse an operator. An empty string means `=`.
    pub fn parse(op: &str) -> Self {
        let normalized = op.trim().to_uppercase();
        match normalized.as_str() {
            "" | "=" => Operator::Eq,
            "!=" => Operator::Ne,
            "<" => Operator::Lt,
            ">" => Operator::Gt,
            "<=" => Operator::Lte,
            ">=" => Operator::Gte,
            "LIKE" => Operator::Like,
            "NOT LIKE" => Operator::NotLike,
            "IN" => Operator::In,
            "NOT IN" => Operator::NotIn,
            "BETWEEN" => Operator::Between,
            "NOT BETWEEN" => Operator::NotBetween,
            "IS NULL" => Operator::IsNull,
            "IS NOT NULL" => Operator::IsNotNull,
            _ => Operator::Other(normalized),
        }
    }

    /// SQL text of the operator.
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Lte => "<=",
            Operator::Gte => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::Other(op) => op,
        }
    }
}

impl From<String> for Operator {
    fn from(op: String) -> Self {
        Operator::parse(&op)
    }
}

impl From<&str> for Operator {
    fn from(op: &str) -> Self {
        Operator::parse(op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean connector joining a predicate to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    /// Parse `AND` / `OR`, case-insensitively.
    pub fn parse(connector: &str) -> SqlResult<Self> {
        match connector.trim().to_uppercase().as_str() {
            "AND" => Ok(Connector::And),
            "OR" => Ok(Connector::Or),
            _ => Err(SqlError::invalid_argument(format!(
                "predicate connector must be 'AND' or 'OR', got '{}'",
                connector
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// One term of a WHERE or HAVING clause.
///
/// The connector is kept as written and validated when the clause is
/// compiled; it is ignored on the first predicate of a list.
///
/// # Example
///
/// ```rust
/// use sqlweave::Predicate;
///
/// let adults = Predicate::new("age", 18).op(">=");
/// let active = Predicate::new("status", "active").or();
/// # let _ = (adults, active);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Predicate {
    /// Column name or expression on the left-hand side.
    #[serde(alias = "expr")]
    pub expression: String,
    /// Right-hand side value; ignored by `IS NULL` / `IS NOT NULL`.
    #[serde(default = "null_value")]
    pub value: Value,
    #[serde(default)]
    pub operator: Operator,
    #[serde(default)]
    pub connector: Option<String>,
}

fn null_value() -> Value {
    Value::List(Vec::new())
}

impl Predicate {
    /// `expression = value`
    pub fn new(expression: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            expression: expression.into(),
            value: value.into(),
            operator: Operator::Eq,
            connector: None,
        }
    }

    /// `expression IS NULL`
    pub fn is_null(expression: impl Into<String>) -> Self {
        Self::new(expression, null_value()).op(Operator::IsNull)
    }

    /// `expression IS NOT NULL`
    pub fn is_not_null(expression: impl Into<String>) -> Self {
        Self::new(expression, null_value()).op(Operator::IsNotNull)
    }

    /// `expression IN (values...)`
    pub fn in_list<T: Into<Value>>(
        expression: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Self::new(expression, Value::list(values)).op(Operator::In)
    }

    /// `expression NOT IN (values...)`
    pub fn not_in<T: Into<Value>>(
        expression: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Self::new(expression, Value::list(values)).op(Operator::NotIn)
    }

    /// `expression BETWEEN from AND to`
    pub fn between(
        expression: impl Into<String>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        Self::new(expression, Value::List(vec![from.into(), to.into()])).op(Operator::Between)
    }

    /// `expression NOT BETWEEN from AND to`
    pub fn not_between(
        expression: impl Into<String>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        Self::between(expression, from, to).op(Operator::NotBetween)
    }

    /// `expression LIKE pattern`
    pub fn like(expression: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::new(expression, pattern).op(Operator::Like)
    }

    /// Set the operator.
    pub fn op(mut self, operator: impl Into<Operator>) -> Self {
        self.operator = operator.into();
        self
    }

    /// Set the connector as written; validated at compile time.
    pub fn connector(mut self, connector: impl Into<String>) -> Self {
        self.connector = Some(connector.into());
        self
    }

    /// Join to the previous predicate with `AND`.
    pub fn and(self) -> Self {
        self.connector("AND")
    }

    /// Join to the previous predicate with `OR`.
    pub fn or(self) -> Self {
        self.connector("OR")
    }

    /// Resolve the connector; an absent or empty connector means `AND`.
    pub fn resolved_connector(&self) -> SqlResult<Connector> {
        match self.connector.as_deref() {
            None => Ok(Connector::And),
            Some(c) if c.trim().is_empty() => Ok(Connector::And),
            Some(c) => Connector::parse(c),
        }
    }
}
