//! Fluent statement builders.
//!
//! Each builder owns the clause description of one statement. Chained methods only
//! append to it; `to_sql()` runs the clause emitters in a fixed order, skips empty
//! fragments and returns the terminated SQL with its flattened bindings.
//!
//! ```
//! use typed_sqlite::query::{delete, select};
//! use typed_sqlite::clause::{Operators, WhereCondition};
//!
//! let out = select(["name", "age"])
//!     .from("users")
//!     .and_where(WhereCondition::new().op("age", Operators::new().gt(18)))
//!     .to_sql()
//!     .unwrap();
//! assert_eq!(out.sql, r#"SELECT "name", "age" FROM "users" WHERE "age" > ?;"#);
//!
//! let out = delete().from("users").where_eq("id", 1).limit(10).to_sql().unwrap();
//! assert_eq!(out.sql, r#"DELETE FROM "users" WHERE "id" = ? LIMIT ?;"#);
//! ```

mod delete;
mod insert;
mod mixin;
mod select;
mod statement;
mod update;

pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use select::SelectQuery;
pub use update::UpdateQuery;

use crate::config::Limits;
use crate::error::QueryResult;
use crate::value::{Row, SqlWithBindings, Value};

/// Common surface of every builder.
pub trait ToStatements {
    /// All statements this builder produces, in execution order.
    fn to_statements(&self) -> QueryResult<Vec<SqlWithBindings>>;
}

impl ToStatements for SelectQuery {
    fn to_statements(&self) -> QueryResult<Vec<SqlWithBindings>> {
        Ok(vec![self.to_sql()?])
    }
}

impl ToStatements for InsertQuery {
    fn to_statements(&self) -> QueryResult<Vec<SqlWithBindings>> {
        self.to_sql()
    }
}

impl ToStatements for UpdateQuery {
    fn to_statements(&self) -> QueryResult<Vec<SqlWithBindings>> {
        Ok(vec![self.to_sql()?])
    }
}

impl ToStatements for DeleteQuery {
    fn to_statements(&self) -> QueryResult<Vec<SqlWithBindings>> {
        Ok(vec![self.to_sql()?])
    }
}

/// Factory that hands out builders sharing one set of [`Limits`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder {
    limits: Limits,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn select<S: Into<String>>(&self, columns: impl IntoIterator<Item = S>) -> SelectQuery {
        SelectQuery::with_limits(self.limits).columns(columns)
    }

    pub fn select_all(&self) -> SelectQuery {
        SelectQuery::with_limits(self.limits)
    }

    pub fn insert_into(&self, table: impl Into<String>) -> InsertQuery {
        InsertQuery::with_limits(self.limits).insert(table)
    }

    pub fn insert_raw<I, V>(&self, sql: impl Into<String>, bindings: I) -> InsertQuery
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        InsertQuery::with_limits(self.limits).insert_raw(sql, bindings)
    }

    /// Start an `UPDATE table`; assignments are added with `set`.
    pub fn update(&self, table: impl Into<String>) -> UpdateQuery {
        UpdateQuery::with_limits(self.limits).update(table, Row::new())
    }

    pub fn update_raw<I, V>(&self, sql: impl Into<String>, bindings: I) -> UpdateQuery
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        UpdateQuery::with_limits(self.limits).update_raw(sql, bindings)
    }

    /// Start a `DELETE`; the table is given with `from`.
    pub fn delete(&self) -> DeleteQuery {
        DeleteQuery::with_limits(self.limits).delete()
    }

    pub fn delete_from(&self, table: impl Into<String>) -> DeleteQuery {
        self.delete().from(table)
    }
}

/// `SELECT columns` with default limits.
pub fn select<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> SelectQuery {
    QueryBuilder::new().select(columns)
}

/// `SELECT *` with default limits.
pub fn select_all() -> SelectQuery {
    QueryBuilder::new().select_all()
}

pub fn insert_into(table: impl Into<String>) -> InsertQuery {
    QueryBuilder::new().insert_into(table)
}

pub fn update(table: impl Into<String>) -> UpdateQuery {
    QueryBuilder::new().update(table)
}

pub fn delete() -> DeleteQuery {
    QueryBuilder::new().delete()
}

pub fn delete_from(table: impl Into<String>) -> DeleteQuery {
    QueryBuilder::new().delete_from(table)
}
