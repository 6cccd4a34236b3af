//! Statement builders.
//!
//! This module turns typed descriptors into SQL text:
//!
//! - [`table`]: FROM lists, aliases and joins.
//! - [`predicate`] / [`clause`]: WHERE and HAVING predicate lists.
//! - [`keywords`]: GROUP BY / ORDER BY / LIMIT / OFFSET.
//! - [`statement`]: the [`Builder`] that orchestrates them into complete
//!   SELECT / INSERT / UPDATE / DELETE / DDL statements.
//!
//! ## Design
//!
//! - Every fragment is an [`Sql`](crate::Sql) value, so the same statement can
//!   be rendered as literal text or as placeholders plus parameters.
//! - Clause order is fixed: WHERE, GROUP BY, HAVING, ORDER BY, LIMIT, OFFSET.
//! - Pending predicates are consumed by the statement that compiles them.

pub mod clause;
pub mod keywords;
pub mod predicate;
pub mod statement;
pub mod table;

pub use clause::{ClauseKeyword, compile_clause, render_clause};
pub use keywords::{Keyword, KeywordClauses, KeywordValue};
pub use predicate::{Connector, Operator, Predicate};
pub use statement::{
    Builder, BuiltQuery, Columns, DropKind, IntoUnionMode, QueryType, SetClause, UnionMode,
};
pub use table::{JoinType, TableRef, Tables, compile_tables};
