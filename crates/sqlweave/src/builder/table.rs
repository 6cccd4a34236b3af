//! Table references and the FROM / JOIN compiler.

use crate::sql::Sql;
use crate::value::SubQuery;
use serde::Deserialize;

/// Supported join types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Left,
    Right,
    Outer,
    Inner,
    LeftOuter,
    RightOuter,
}

impl JoinType {
    /// Parse a join type, case-insensitively. Unknown types yield `None`.
    pub fn parse(join_type: &str) -> Option<Self> {
        match join_type.trim().to_uppercase().as_str() {
            "LEFT" => Some(JoinType::Left),
            "RIGHT" => Some(JoinType::Right),
            "OUTER" => Some(JoinType::Outer),
            "INNER" => Some(JoinType::Inner),
            "LEFT OUTER" => Some(JoinType::LeftOuter),
            "RIGHT OUTER" => Some(JoinType::RightOuter),
            _ => None,
        }
    }

    /// The SQL keyword for this join type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Outer => "OUTER JOIN",
            JoinType::Inner => "INNER JOIN",
            JoinType::LeftOuter => "LEFT OUTER JOIN",
            JoinType::RightOuter => "RIGHT OUTER JOIN",
        }
    }
}

/// One entry of a FROM list.
///
/// Join metadata is kept as written: an entry whose join type is unknown or
/// whose `ON` condition is missing is rendered as its base table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "TableRepr")]
pub enum TableRef {
    /// `name`
    Plain(String),
    /// `name AS alias`
    Aliased { name: String, alias: String },
    /// `JOINTYPE JOIN base ON condition`
    Joined {
        base: Box<TableRef>,
        join_type: Option<String>,
        on: Option<String>,
    },
    /// `(sub query)` or `(sub query) AS alias`
    SubQuery {
        query: SubQuery,
        alias: Option<String>,
    },
}

impl TableRef {
    pub fn plain(name: impl Into<String>) -> Self {
        TableRef::Plain(name.into())
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        TableRef::Aliased {
            name: name.into(),
            alias: alias.into(),
        }
    }

    /// Embed another builder's statement as a table source.
    pub fn sub(query: impl Into<SubQuery>, alias: impl Into<String>) -> Self {
        TableRef::SubQuery {
            query: query.into(),
            alias: Some(alias.into()),
        }
    }

    /// Join this entry with the given join type and condition.
    pub fn join(self, join_type: impl Into<String>, on: impl Into<String>) -> Self {
        TableRef::Joined {
            base: Box::new(self),
            join_type: Some(join_type.into()),
            on: Some(on.into()),
        }
    }

    pub fn left_join(self, on: impl Into<String>) -> Self {
        self.join("LEFT", on)
    }

    pub fn inner_join(self, on: impl Into<String>) -> Self {
        self.join("INNER", on)
    }

    pub fn right_join(self, on: impl Into<String>) -> Self {
        self.join("RIGHT", on)
    }

    /// The join type, when this entry is a well-formed join.
    pub fn effective_join(&self) -> Option<JoinType> {
        match self {
            TableRef::Joined {
                join_type: Some(join_type),
                on: Some(on),
                ..
            } if !on.trim().is_empty() => JoinType::parse(join_type),
            _ => None,
        }
    }

    fn render(&self) -> Sql {
        match self {
            TableRef::Plain(name) => Sql::new(name),
            TableRef::Aliased { name, alias } => Sql::new(format!("{} AS {}", name, alias)),
            TableRef::SubQuery { query, alias } => {
                let mut sql = query.parenthesized();
                if let Some(alias) = alias {
                    sql.push(" AS ").push(alias);
                }
                sql
            }
            TableRef::Joined { base, on, .. } => match (self.effective_join(), on) {
                (Some(join_type), Some(on)) => {
                    let mut sql = Sql::new(join_type.as_str());
                    sql.push(" ");
                    sql.append(&base.render());
                    sql.push(" ON ").push(on);
                    sql
                }
                _ => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        target: "sqlweave.sql",
                        table = ?base,
                        "join entry without a recognized type or ON condition, rendering as plain table"
                    );
                    base.render()
                }
            },
        }
    }
}

impl From<&str> for TableRef {
    fn from(name: &str) -> Self {
        TableRef::plain(name)
    }
}

impl From<String> for TableRef {
    fn from(name: String) -> Self {
        TableRef::Plain(name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TableRepr {
    Name(String),
    Entry {
        name: String,
        #[serde(rename = "as", default)]
        alias: Option<String>,
        #[serde(default)]
        join: Option<String>,
        #[serde(default)]
        on: Option<String>,
    },
}

impl From<TableRepr> for TableRef {
    fn from(repr: TableRepr) -> Self {
        match repr {
            TableRepr::Name(name) => TableRef::Plain(name),
            TableRepr::Entry {
                name,
                alias,
                join,
                on,
            } => {
                let base = match alias.filter(|a| !a.is_empty()) {
                    Some(alias) => TableRef::aliased(name, alias),
                    None => TableRef::Plain(name),
                };
                if join.is_none() && on.is_none() {
                    base
                } else {
                    TableRef::Joined {
                        base: Box::new(base),
                        join_type: join,
                        on,
                    }
                }
            }
        }
    }
}

/// An ordered FROM list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "TablesRepr")]
pub struct Tables(pub Vec<TableRef>);

impl Tables {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TablesRepr {
    // Tried first: a struct entry would also accept a sequence.
    Many(Vec<TableRef>),
    One(TableRef),
}

impl From<TablesRepr> for Tables {
    fn from(repr: TablesRepr) -> Self {
        match repr {
            TablesRepr::One(table) => Tables(vec![table]),
            TablesRepr::Many(tables) => Tables(tables),
        }
    }
}

impl From<&str> for Tables {
    fn from(name: &str) -> Self {
        Tables(vec![TableRef::from(name)])
    }
}

impl From<String> for Tables {
    fn from(name: String) -> Self {
        Tables(vec![TableRef::from(name)])
    }
}

impl From<TableRef> for Tables {
    fn from(table: TableRef) -> Self {
        Tables(vec![table])
    }
}

impl<T: Into<TableRef>> From<Vec<T>> for Tables {
    fn from(tables: Vec<T>) -> Self {
        Tables(tables.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<TableRef>, const N: usize> From<[T; N]> for Tables {
    fn from(tables: [T; N]) -> Self {
        Tables(tables.into_iter().map(Into::into).collect())
    }
}

/// Compile a FROM list.
///
/// Join entries are separated from what precedes them by a space; plain
/// entries following another entry are separated by a comma, so several
/// plain tables form an implicit cross join.
pub fn compile_tables(tables: &Tables) -> Sql {
    let mut sql = Sql::empty();
    for (i, table) in tables.0.iter().enumerate() {
        if i > 0 {
            sql.push(if table.effective_join().is_some() { " " } else { ", " });
        }
        sql.append(&table.render());
    }
    sql
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(tables: impl Into<Tables>) -> String {
        compile_tables(&tables.into()).to_sql()
    }

    #[test]
    fn test_single_plain_name_passes_through() {
        assert_eq!(compile("users u"), "users u");
    }

    #[test]
    fn test_alias() {
        assert_eq!(compile(TableRef::aliased("users", "u")), "users AS u");
    }

    #[test]
    fn test_join_chain() {
        let tables = vec![
            TableRef::aliased("users", "u"),
            TableRef::aliased("roles", "r").left_join("u.role_id = r.id"),
            TableRef::plain("orders o").join("left outer", "o.user_id = u.id"),
        ];
        assert_eq!(
            compile(tables),
            "users AS u LEFT JOIN roles AS r ON u.role_id = r.id LEFT OUTER JOIN orders o ON o.user_id = u.id"
        );
    }

    #[test]
    fn test_bad_join_downgrades_to_plain() {
        let tables = vec![
            TableRef::plain("users"),
            TableRef::plain("roles").join("SIDEWAYS", "a = b"),
            TableRef::plain("teams").join("INNER", "  "),
        ];
        assert_eq!(compile(tables), "users, roles, teams");
    }

    #[test]
    fn test_plain_entries_are_comma_separated() {
        assert_eq!(compile(["users", "orders"]), "users, orders");
    }

    #[test]
    fn test_sub_query_source() {
        let sub = SubQuery::new(Sql::new("SELECT id FROM users"));
        assert_eq!(compile(TableRef::sub(sub, "t")), "(SELECT id FROM users) AS t");
    }

    #[test]
    fn test_deserialize_name_list() {
        let tables: Tables = serde_json::from_str(r#"["users", "orders"]"#).unwrap();
        assert_eq!(compile(tables), "users, orders");
    }

    #[test]
    fn test_deserialize_descriptors() {
        let tables: Tables = serde_json::from_str(
            r#"["users", {"name": "roles", "as": "r", "join": "inner", "on": "users.role_id = r.id"}]"#,
        )
        .unwrap();
        assert_eq!(compile(tables), "users INNER JOIN roles AS r ON users.role_id = r.id");
    }
}
