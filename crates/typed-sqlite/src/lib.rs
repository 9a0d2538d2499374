//! # typed-sqlite
//!
//! A fluent SQL statement builder for SQLite. Builders never execute anything:
//! they produce a `(sql, bindings)` pair (or one pair per insert batch) for a
//! parameterized-query executor.
//!
//! ## Features
//!
//! - **Structured conditions**: per-column operators compiled into `WHERE` predicates
//!   with merge optimizations (OR equality into `IN`, bound tightening, `BETWEEN`
//!   widening, `LIKE` subsumption)
//! - **Safe identifiers**: every column and table name is validated and double-quoted
//! - **Checked bindings**: placeholder counts are verified on every fragment and on the
//!   final statement
//! - **Raw escape hatches** for every clause kind
//! - **Upserts** via `ON CONFLICT ... DO NOTHING | DO UPDATE`
//!
//! ```
//! use typed_sqlite::{row, insert_into, select, Operators, WhereCondition};
//!
//! let out = select(["name", "age"])
//!     .from("users")
//!     .and_where(WhereCondition::new().op("age", Operators::new().gte(18)))
//!     .order_by_desc("age")
//!     .limit(10)
//!     .to_sql()
//!     .unwrap();
//! assert_eq!(
//!     out.sql,
//!     r#"SELECT "name", "age" FROM "users" WHERE "age" >= ? ORDER BY "age" DESC LIMIT ?;"#
//! );
//!
//! let batches = insert_into("users")
//!     .values(row! { "name" => "Ann", "age" => 31 })
//!     .to_sql()
//!     .unwrap();
//! assert_eq!(batches[0].sql, r#"INSERT INTO "users" ("age", "name") VALUES (?, ?);"#);
//! ```
//!
//! ## Logging
//!
//! With the default `tracing` feature, finished statements are reported at `debug`
//! level on the `typed_sqlite.sql` target and compiler merges at `trace` level on
//! `typed_sqlite.compiler`.

pub mod bindings;
pub mod clause;
pub mod compiler;
pub mod config;
pub mod error;
pub mod ident;
pub mod query;
pub mod units;
pub mod value;

mod trace;

pub use bindings::validate_bindings;
pub use clause::{
    ConflictResolution, DoUpdate, NullsOrder, Operator, Operators, OrderDirection, OrderRule,
    WhereCondition,
};
pub use compiler::compile;
pub use config::Limits;
pub use error::{QueryError, QueryResult};
pub use ident::quote_ident;
pub use query::{
    DeleteQuery, InsertQuery, QueryBuilder, SelectQuery, ToStatements, UpdateQuery, delete,
    delete_from, insert_into, select, select_all, update,
};
pub use value::{Bindings, Row, SqlWithBindings, Value};
