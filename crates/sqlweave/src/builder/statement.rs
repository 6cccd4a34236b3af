use super::clause::{ClauseKeyword, render_clause};
use super::keywords::{Keyword, KeywordClauses};
use super::predicate::Predicate;
use super::table::{Tables, compile_tables};
use crate::config::CompilerConfig;
use crate::error::{SqlError, SqlResult};
use crate::sql::Sql;
use crate::value::{Quoter, Scalar, SubQuery, Value};
use std::str::FromStr;

/// Kind of the statement last written to a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Raw,
    Insert,
    Select,
    Update,
    Delete,
}

/// `UNION` or `UNION ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionMode {
    Distinct,
    All,
}

impl UnionMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            UnionMode::Distinct => " UNION ",
            UnionMode::All => " UNION ALL ",
        }
    }
}

/// Conversion into a [`UnionMode`].
///
/// `false` / `None` / `""` / `"distinct"` select `UNION`, `true` / `"all"`
/// select `UNION ALL`; any other string is rejected.
pub trait IntoUnionMode {
    fn into_union_mode(self) -> SqlResult<UnionMode>;
}

impl IntoUnionMode for UnionMode {
    fn into_union_mode(self) -> SqlResult<UnionMode> {
        Ok(self)
    }
}

impl IntoUnionMode for bool {
    fn into_union_mode(self) -> SqlResult<UnionMode> {
        Ok(if self { UnionMode::All } else { UnionMode::Distinct })
    }
}

impl IntoUnionMode for Option<bool> {
    fn into_union_mode(self) -> SqlResult<UnionMode> {
        self.unwrap_or(false).into_union_mode()
    }
}

impl IntoUnionMode for &str {
    fn into_union_mode(self) -> SqlResult<UnionMode> {
        match self.trim().to_lowercase().as_str() {
            "" | "distinct" => Ok(UnionMode::Distinct),
            "all" => Ok(UnionMode::All),
            _ => Err(SqlError::invalid_argument(format!(
                "union mode must be a boolean or 'all', got '{}'",
                self
            ))),
        }
    }
}

/// Object kinds accepted by `DROP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Database,
    Table,
    View,
}

impl DropKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            DropKind::Database => "DATABASE",
            DropKind::Table => "TABLE",
            DropKind::View => "VIEW",
        }
    }
}

impl FromStr for DropKind {
    type Err = SqlError;

    fn from_str(kind: &str) -> SqlResult<Self> {
        match kind.trim().to_lowercase().as_str() {
            "database" => Ok(DropKind::Database),
            "table" => Ok(DropKind::Table),
            "view" => Ok(DropKind::View),
            _ => Err(SqlError::invalid_argument(format!(
                "cannot DROP '{}': expected database, table or view",
                kind
            ))),
        }
    }
}

/// Column list of a SELECT or INSERT, joined with commas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns(pub Vec<String>);

impl Columns {
    /// No column list.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|c| c.trim().is_empty())
    }

    fn render(&self) -> String {
        self.0.join(",")
    }
}

impl From<&str> for Columns {
    fn from(columns: &str) -> Self {
        Columns(vec![columns.to_string()])
    }
}

impl From<String> for Columns {
    fn from(columns: String) -> Self {
        Columns(vec![columns])
    }
}

impl From<Vec<&str>> for Columns {
    fn from(columns: Vec<&str>) -> Self {
        Columns(columns.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Columns {
    fn from(columns: Vec<String>) -> Self {
        Columns(columns)
    }
}

impl<const N: usize> From<[&str; N]> for Columns {
    fn from(columns: [&str; N]) -> Self {
        Columns(columns.iter().map(|c| c.to_string()).collect())
    }
}

/// SET clause of an UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub enum SetClause {
    /// `column=value` pairs, values quoted like any other value.
    Pairs(Vec<(String, Value)>),
    /// Used verbatim (trimmed).
    Raw(String),
}

impl SetClause {
    fn render(&self, quoter: &Quoter<'_>) -> Sql {
        match self {
            SetClause::Pairs(pairs) => {
                let assignments: Vec<Sql> = pairs
                    .iter()
                    .map(|(column, value)| {
                        let mut sql = Sql::new(format!("{}=", column));
                        sql.append(&quoter.joined(value));
                        sql
                    })
                    .collect();
                Sql::join(&assignments, ",")
            }
            SetClause::Raw(raw) => Sql::new(raw.trim()),
        }
    }
}

impl From<&str> for SetClause {
    fn from(raw: &str) -> Self {
        SetClause::Raw(raw.to_string())
    }
}

impl From<String> for SetClause {
    fn from(raw: String) -> Self {
        SetClause::Raw(raw)
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for SetClause {
    fn from(pairs: Vec<(K, V)>) -> Self {
        SetClause::Pairs(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for SetClause {
    fn from(pairs: [(K, V); N]) -> Self {
        SetClause::Pairs(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continuation {
    Union(UnionMode),
    CreateView,
}

/// Statement compiler holding one in-progress SQL statement.
///
/// Each top-level call (`select`, `insert`, `update`, `delete`, `truncate`,
/// `drop`, `create_view`) replaces the accumulated text, unless the previous
/// call was `union` or `create_view`, in which case the new statement is
/// appended. Pending WHERE / HAVING predicates are consumed by the next
/// statement that compiles them.
///
/// # Example
///
/// ```rust
/// use sqlweave::{Builder, KeywordClauses, Predicate};
///
/// let mut qb = Builder::new();
/// qb.filter([Predicate::new("age", 18).op(">="), Predicate::new("status", "active")]);
/// qb.select("users", ["id", "name"], KeywordClauses::new().limit(10))?;
/// assert_eq!(
///     qb.compile(),
///     "SELECT id,name FROM users WHERE age >= 18 AND status = 'active' LIMIT 10"
/// );
/// # Ok::<(), sqlweave::SqlError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    config: CompilerConfig,
    sql: Sql,
    query_type: Option<QueryType>,
    where_predicates: Vec<Predicate>,
    having_predicates: Vec<Predicate>,
    continuation: Option<Continuation>,
    pub(crate) last_sql: Option<String>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CompilerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Turn automatic value quoting on or off for statements built from now on.
    pub fn auto_quote_values(&mut self, enabled: bool) -> &mut Self {
        self.config.auto_quote_values = enabled;
        self
    }

    /// A fresh builder with the same configuration and its own state.
    pub fn sub_query(&self) -> Builder {
        Builder::with_config(self.config)
    }

    // ==================== Pending clauses ====================

    /// Replace the pending WHERE predicates.
    #[doc(alias = "where")]
    pub fn filter(&mut self, predicates: impl IntoIterator<Item = Predicate>) -> &mut Self {
        self.where_predicates = predicates.into_iter().collect();
        self
    }

    /// Replace the pending HAVING predicates.
    pub fn having(&mut self, predicates: impl IntoIterator<Item = Predicate>) -> &mut Self {
        self.having_predicates = predicates.into_iter().collect();
        self
    }

    pub fn pending_where(&self) -> &[Predicate] {
        &self.where_predicates
    }

    pub fn pending_having(&self) -> &[Predicate] {
        &self.having_predicates
    }

    // ==================== Statements ====================

    /// `SELECT columns FROM tables` followed by the WHERE / GROUP BY / HAVING /
    /// ORDER BY / LIMIT / OFFSET tail.
    pub fn select(
        &mut self,
        tables: impl Into<Tables>,
        columns: impl Into<Columns>,
        keywords: KeywordClauses,
    ) -> SqlResult<&mut Self> {
        self.select_internal(tables.into(), columns.into(), &keywords, false)
    }

    /// `SELECT DISTINCT ...`
    pub fn select_distinct(
        &mut self,
        tables: impl Into<Tables>,
        columns: impl Into<Columns>,
        keywords: KeywordClauses,
    ) -> SqlResult<&mut Self> {
        self.select_internal(tables.into(), columns.into(), &keywords, true)
    }

    fn select_internal(
        &mut self,
        tables: Tables,
        columns: Columns,
        keywords: &KeywordClauses,
        distinct: bool,
    ) -> SqlResult<&mut Self> {
        let mut stmt = Sql::new("SELECT ");
        if distinct {
            stmt.push("DISTINCT ");
        }
        if columns.is_empty() {
            stmt.push("*");
        } else {
            stmt.push(&columns.render());
        }
        stmt.push(" FROM ");
        stmt.append(&compile_tables(&tables));
        stmt.append(&self.render_tail(keywords, true)?);

        self.where_predicates.clear();
        self.having_predicates.clear();
        self.commit(QueryType::Select, stmt);
        Ok(self)
    }

    /// `INSERT INTO table(columns) VALUES (values)`; the column list is
    /// omitted when `columns` is empty. A sub-query value produces
    /// `INSERT INTO table(columns) SELECT ...` instead.
    pub fn insert(
        &mut self,
        table: &str,
        values: impl Into<Value>,
        columns: impl Into<Columns>,
    ) -> &mut Self {
        self.insert_internal(table, values.into(), columns.into(), false)
    }

    /// `INSERT IGNORE INTO ...`
    pub fn insert_ignore(
        &mut self,
        table: &str,
        values: impl Into<Value>,
        columns: impl Into<Columns>,
    ) -> &mut Self {
        self.insert_internal(table, values.into(), columns.into(), true)
    }

    fn insert_internal(
        &mut self,
        table: &str,
        values: Value,
        columns: Columns,
        ignore: bool,
    ) -> &mut Self {
        let quoter = Quoter::new(&self.config);
        let mut stmt = Sql::new("INSERT ");
        if ignore {
            stmt.push("IGNORE ");
        }
        stmt.push("INTO ").push(table);
        if !columns.is_empty() {
            stmt.push("(").push(&columns.render()).push(")");
        }
        match &values {
            Value::SubExpression(sub) => {
                stmt.push(" ");
                stmt.append(sub.sql());
            }
            other => {
                stmt.push(" VALUES ");
                stmt.append_parenthesized(&quoter.joined(other));
            }
        }

        self.commit(QueryType::Insert, stmt);
        self
    }

    /// `UPDATE tables SET ...` followed by WHERE and LIMIT.
    pub fn update(
        &mut self,
        tables: impl Into<Tables>,
        set: impl Into<SetClause>,
        limit: Option<u64>,
    ) -> SqlResult<&mut Self> {
        let quoter = Quoter::new(&self.config);
        let mut stmt = Sql::new("UPDATE ");
        stmt.append(&compile_tables(&tables.into()));
        stmt.push(" SET ");
        stmt.append(&set.into().render(&quoter));
        stmt.append(&self.render_tail(&KeywordClauses::with_limit(limit), false)?);

        self.where_predicates.clear();
        self.commit(QueryType::Update, stmt);
        Ok(self)
    }

    /// `DELETE FROM table` followed by WHERE and LIMIT.
    pub fn delete(&mut self, table: &str, limit: Option<u64>) -> SqlResult<&mut Self> {
        let mut stmt = Sql::new(format!("DELETE FROM {}", table));
        stmt.append(&self.render_tail(&KeywordClauses::with_limit(limit), false)?);

        self.where_predicates.clear();
        self.commit(QueryType::Delete, stmt);
        Ok(self)
    }

    /// Remove every row of `table` (`DELETE FROM table`).
    ///
    /// Pending WHERE / HAVING predicates are discarded rather than applied.
    pub fn truncate(&mut self, table: &str) -> &mut Self {
        if !self.where_predicates.is_empty() || !self.having_predicates.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target: "sqlweave.sql",
                table,
                discarded_where = self.where_predicates.len(),
                discarded_having = self.having_predicates.len(),
                "truncate discards pending predicates"
            );
            self.where_predicates.clear();
            self.having_predicates.clear();
        }

        self.commit(QueryType::Delete, Sql::new(format!("DELETE FROM {}", table)));
        self
    }

    /// Append raw SQL text to the accumulated statement.
    ///
    /// A pending `union` or `create_view` continuation is kept, so the next
    /// statement is still appended.
    pub fn raw(&mut self, sql: &str) -> &mut Self {
        self.append_raw(&Sql::new(sql))
    }

    /// Append another builder's statement, unparenthesized.
    pub fn raw_sub(&mut self, other: &Builder) -> &mut Self {
        let sql = other.sql.clone();
        self.append_raw(&sql)
    }

    fn append_raw(&mut self, sql: &Sql) -> &mut Self {
        self.sql.append(sql);
        self.query_type = Some(QueryType::Raw);
        self
    }

    /// `CREATE [OR REPLACE ]VIEW name AS `; the next `select` completes it.
    pub fn create_view(&mut self, name: &str, replace: bool) -> &mut Self {
        let mut stmt = Sql::new("CREATE ");
        if replace {
            stmt.push("OR REPLACE ");
        }
        stmt.push("VIEW ").push(name).push(" AS ");

        self.commit(QueryType::Raw, stmt);
        self.continuation = Some(Continuation::CreateView);
        self
    }

    /// `DROP DATABASE|TABLE|VIEW name`
    pub fn drop(&mut self, name: &str, kind: &str) -> SqlResult<&mut Self> {
        let kind = DropKind::from_str(kind)?;
        self.commit(
            QueryType::Raw,
            Sql::new(format!("DROP {} {}", kind.as_str(), name)),
        );
        Ok(self)
    }

    /// Append `UNION` / `UNION ALL`; the next statement is appended instead of
    /// replacing the accumulated text.
    pub fn union(&mut self, mode: impl IntoUnionMode) -> SqlResult<&mut Self> {
        let mode = mode.into_union_mode()?;
        self.sql.push(mode.as_str());
        self.continuation = Some(Continuation::Union(mode));
        Ok(self)
    }

    // ==================== Output ====================

    /// The statement rendered with this builder's configuration.
    pub fn compile(&self) -> String {
        self.sql.render(&self.config).0
    }

    /// The statement and its bound parameters.
    pub fn build(&self) -> BuiltQuery {
        let (sql, params) = self.sql.render(&self.config);
        BuiltQuery::new(sql, params)
    }

    /// The accumulated fragment.
    pub fn sql(&self) -> &Sql {
        &self.sql
    }

    /// Snapshot of the statement for embedding in another builder.
    pub fn to_sub_query(&self) -> SubQuery {
        SubQuery::new(self.sql.clone())
    }

    pub fn query_type(&self) -> Option<QueryType> {
        self.query_type
    }

    /// SQL of the last statement handed to an executor.
    pub fn last_sql(&self) -> Option<&str> {
        self.last_sql.as_deref()
    }

    /// Whether the next statement will be appended instead of replacing.
    pub fn is_continuation_pending(&self) -> bool {
        self.continuation.is_some()
    }

    /// Drop the accumulated statement and every pending clause.
    pub fn reset(&mut self) -> &mut Self {
        self.sql.clear();
        self.query_type = None;
        self.where_predicates.clear();
        self.having_predicates.clear();
        self.continuation = None;
        self
    }

    // ==================== Internals ====================

    /// WHERE, GROUP BY, HAVING, ORDER BY, LIMIT, OFFSET, in that order.
    /// Predicates are rendered but not consumed.
    fn render_tail(&self, keywords: &KeywordClauses, with_having: bool) -> SqlResult<Sql> {
        let mut tail = render_clause(ClauseKeyword::Where, &self.where_predicates, &self.config)?;

        if let Some(group_by) = keywords.render(Keyword::GroupBy) {
            tail.push(&group_by);
        }
        if with_having {
            tail.append(&render_clause(
                ClauseKeyword::Having,
                &self.having_predicates,
                &self.config,
            )?);
        }
        for keyword in [Keyword::OrderBy, Keyword::Limit, Keyword::Offset] {
            if let Some(fragment) = keywords.render(keyword) {
                tail.push(&fragment);
            }
        }

        Ok(tail)
    }

    fn commit(&mut self, query_type: QueryType, stmt: Sql) {
        if self.continuation.take().is_none() {
            self.sql.clear();
        }
        self.sql.append(&stmt);
        self.query_type = Some(query_type);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlweave.sql",
            query_type = ?query_type,
            param_count = self.sql.bind_count(),
            sql = %self.compile(),
            "statement compiled"
        );
    }
}

impl From<&Builder> for SubQuery {
    fn from(builder: &Builder) -> Self {
        builder.to_sub_query()
    }
}

impl From<&Builder> for Value {
    fn from(builder: &Builder) -> Self {
        Value::SubExpression(builder.to_sub_query())
    }
}

/// A compiled statement with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    sql: String,
    params: Vec<Scalar>,
}

impl BuiltQuery {
    pub(crate) fn new(sql: String, params: Vec<Scalar>) -> Self {
        Self { sql, params }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Scalar] {
        &self.params
    }

    pub fn into_parts(self) -> (String, Vec<Scalar>) {
        (self.sql, self.params)
    }
}
