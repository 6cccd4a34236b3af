//! # sqlweave
//!
//! A SQL statement compiler: typed descriptors in, SQL text out.
//!
//! ## Features
//!
//! - **One builder, many statements**: SELECT, INSERT, UPDATE, DELETE, UNION,
//!   CREATE VIEW and DROP from plain Rust values or JSON descriptors
//! - **Fixed clause order**: WHERE, GROUP BY, HAVING, ORDER BY, LIMIT, OFFSET
//! - **Sub-queries**: embed another builder's statement in a predicate or a FROM list
//! - **Literal or parameterized output**: the same statement renders as plain
//!   text or as placeholders plus a parameter list
//! - **Executor seam**: run statements through `tokio-postgres`
//!   or any other [`Executor`] implementation
//!
//! ## Example
//!
//! ```rust
//! use sqlweave::{Builder, KeywordClauses, Predicate, TableRef};
//!
//! let mut qb = Builder::new();
//! qb.filter([Predicate::new("u.status", "active"), Predicate::in_list("r.name", ["admin", "owner"])]);
//! qb.select(
//!     vec![
//!         TableRef::aliased("users", "u"),
//!         TableRef::aliased("roles", "r").inner_join("u.role_id = r.id"),
//!     ],
//!     ["u.id", "u.name"],
//!     KeywordClauses::new().order_by("u.id").limit(20),
//! )?;
//!
//! assert_eq!(
//!     qb.compile(),
//!     "SELECT u.id,u.name FROM users AS u INNER JOIN roles AS r ON u.role_id = r.id \
//!      WHERE u.status = 'active' AND r.name IN ('admin','owner') ORDER BY u.id LIMIT 20"
//! );
//! # Ok::<(), sqlweave::SqlError>(())
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod executor;
pub mod sql;
mod types;
pub mod value;

pub use builder::{
    Builder, BuiltQuery, ClauseKeyword, Columns, Connector, DropKind, IntoUnionMode, JoinType,
    Keyword, KeywordClauses, KeywordValue, Operator, Predicate, QueryType, SetClause, TableRef,
    Tables, UnionMode, compile_clause, compile_tables, render_clause,
};
pub use config::{CompilerConfig, PlaceholderStyle, RenderMode};
pub use error::{SqlError, SqlResult};
pub use executor::Executor;
pub use sql::{Sql, quote_literal};
pub use value::{PLACEHOLDER, Quoter, Scalar, SubQuery, Value};
