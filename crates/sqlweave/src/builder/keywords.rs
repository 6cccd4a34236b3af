//! GROUP BY / ORDER BY / LIMIT / OFFSET fragments.

use serde::{Deserialize, Deserializer};

/// Trailing keyword clauses of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    GroupBy,
    OrderBy,
    Limit,
    Offset,
}

impl Keyword {
    pub const fn as_str(self) -> &'static str {
        match self {
            Keyword::GroupBy => "GROUP BY",
            Keyword::OrderBy => "ORDER BY",
            Keyword::Limit => "LIMIT",
            Keyword::Offset => "OFFSET",
        }
    }
}

/// Keyword clause values for a statement; empty entries are skipped.
///
/// # Example
///
/// ```rust
/// use sqlweave::KeywordClauses;
///
/// let kw = KeywordClauses::new()
///     .group_by(["status", "role"])
///     .order_by("created_at DESC")
///     .limit(10);
/// assert_eq!(kw.render(sqlweave::Keyword::GroupBy).as_deref(), Some(" GROUP BY status, role"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KeywordClauses {
    #[serde(default, deserialize_with = "one_or_many")]
    pub group_by: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub order_by: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub limit: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub offset: Vec<String>,
}

impl KeywordClauses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only a LIMIT, as used by UPDATE and DELETE.
    pub fn with_limit(limit: Option<u64>) -> Self {
        let mut kw = Self::default();
        if let Some(limit) = limit {
            kw.limit = vec![limit.to_string()];
        }
        kw
    }

    pub fn group_by(mut self, columns: impl Into<KeywordValue>) -> Self {
        self.group_by = columns.into().0;
        self
    }

    pub fn order_by(mut self, columns: impl Into<KeywordValue>) -> Self {
        self.order_by = columns.into().0;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = vec![limit.to_string()];
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = vec![offset.to_string()];
        self
    }

    fn values(&self, keyword: Keyword) -> &[String] {
        match keyword {
            Keyword::GroupBy => &self.group_by,
            Keyword::OrderBy => &self.order_by,
            Keyword::Limit => &self.limit,
            Keyword::Offset => &self.offset,
        }
    }

    /// Render ` KEYWORD value[, value...]`, or `None` when the entry is empty.
    pub fn render(&self, keyword: Keyword) -> Option<String> {
        let values: Vec<&str> = self
            .values(keyword)
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(format!(" {} {}", keyword.as_str(), values.join(", ")))
    }
}

/// A keyword entry: one expression or an ordered list of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordValue(pub Vec<String>);

impl From<&str> for KeywordValue {
    fn from(value: &str) -> Self {
        KeywordValue(vec![value.to_string()])
    }
}

impl From<String> for KeywordValue {
    fn from(value: String) -> Self {
        KeywordValue(vec![value])
    }
}

impl From<Vec<&str>> for KeywordValue {
    fn from(values: Vec<&str>) -> Self {
        KeywordValue(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for KeywordValue {
    fn from(values: Vec<String>) -> Self {
        KeywordValue(values)
    }
}

impl<const N: usize> From<[&str; N]> for KeywordValue {
    fn from(values: [&str; N]) -> Self {
        KeywordValue(values.iter().map(|v| v.to_string()).collect())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Number(u64),
    Text(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Number(n) => vec![n.to_string()],
        OneOrMany::Text(s) => vec![s],
        OneOrMany::Many(values) => values,
    })
}
