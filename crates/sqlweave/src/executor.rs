//! Database executor seam.
//!
//! The compiler never talks to a database itself. An [`Executor`] receives
//! the rendered statement plus its parameters; [`Builder::fetch_all`] and
//! [`Builder::execute`] render the accumulated statement in the executor's
//! placeholder style, run it, and reset the builder.

use crate::builder::{Builder, BuiltQuery};
use crate::config::{CompilerConfig, PlaceholderStyle, RenderMode};
use crate::error::{SqlError, SqlResult};
use crate::value::Scalar;

/// Something that can run a rendered statement.
///
/// Implemented for `tokio_postgres::Client` and `tokio_postgres::Transaction`.
pub trait Executor: Send + Sync {
    /// Row type returned by queries.
    type Row: Send;

    /// Placeholder style the backend expects.
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Question
    }

    /// Run a statement and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[Scalar],
    ) -> impl std::future::Future<Output = SqlResult<Vec<Self::Row>>> + Send;

    /// Run a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[Scalar],
    ) -> impl std::future::Future<Output = SqlResult<u64>> + Send;
}

impl Builder {
    /// Run the accumulated statement and return all rows.
    ///
    /// The builder is reset afterwards, whether or not the statement succeeded;
    /// the executed SQL stays available through [`Builder::last_sql`].
    ///
    /// Fails with [`SqlError::InvalidArgument`] before running anything when the
    /// builder is empty, or when the executor uses numbered placeholders and the
    /// statement still contains a caller `?`.
    pub async fn fetch_all<E: Executor>(&mut self, executor: &E) -> SqlResult<Vec<E::Row>> {
        let query = self.prepare_for(executor.placeholder_style())?;
        let result = executor.query(query.sql(), query.params()).await;
        self.reset();
        result
    }

    /// Run the accumulated statement and return the number of affected rows.
    ///
    /// Resets the builder like [`Builder::fetch_all`].
    pub async fn execute<E: Executor>(&mut self, executor: &E) -> SqlResult<u64> {
        let query = self.prepare_for(executor.placeholder_style())?;
        let result = executor.execute(query.sql(), query.params()).await;
        self.reset();
        result
    }

    fn prepare_for(&mut self, style: PlaceholderStyle) -> SqlResult<BuiltQuery> {
        if self.sql().is_empty() {
            return Err(SqlError::invalid_argument("no statement to execute"));
        }
        // Caller `?` slots carry no value and cannot be mixed with `$n`.
        let unbound = self.sql().placeholder_count();
        if style == PlaceholderStyle::Numbered && unbound > 0 {
            return Err(SqlError::invalid_argument(format!(
                "statement has {} '?' placeholder(s) without values; numbered executors need every value bound",
                unbound
            )));
        }

        let config = CompilerConfig {
            render: RenderMode::Parameterized,
            placeholder: style,
            ..*self.config()
        };
        let (sql, params) = self.sql().render(&config);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlweave.sql",
            query_type = ?self.query_type(),
            param_count = params.len(),
            sql = %sql,
            "executing statement"
        );

        self.last_sql = Some(sql.clone());
        Ok(BuiltQuery::new(sql, params))
    }
}

mod postgres {
    use super::Executor;
    use crate::config::PlaceholderStyle;
    use crate::error::SqlResult;
    use crate::value::Scalar;
    use tokio_postgres::Row;
    use tokio_postgres::types::ToSql;

    fn bind_refs(params: &[Scalar]) -> Vec<&(dyn ToSql + Sync)> {
        params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
    }

    impl Executor for tokio_postgres::Client {
        type Row = Row;

        fn placeholder_style(&self) -> PlaceholderStyle {
            PlaceholderStyle::Numbered
        }

        async fn query(&self, sql: &str, params: &[Scalar]) -> SqlResult<Vec<Row>> {
            let refs = bind_refs(params);
            Ok(tokio_postgres::Client::query(self, sql, &refs).await?)
        }

        async fn execute(&self, sql: &str, params: &[Scalar]) -> SqlResult<u64> {
            let refs = bind_refs(params);
            Ok(tokio_postgres::Client::execute(self, sql, &refs).await?)
        }
    }

    impl Executor for tokio_postgres::Transaction<'_> {
        type Row = Row;

        fn placeholder_style(&self) -> PlaceholderStyle {
            PlaceholderStyle::Numbered
        }

        async fn query(&self, sql: &str, params: &[Scalar]) -> SqlResult<Vec<Row>> {
            let refs = bind_refs(params);
            Ok(tokio_postgres::Transaction::query(self, sql, &refs).await?)
        }

        async fn execute(&self, sql: &str, params: &[Scalar]) -> SqlResult<u64> {
            let refs = bind_refs(params);
            Ok(tokio_postgres::Transaction::execute(self, sql, &refs).await?)
        }
    }
}
