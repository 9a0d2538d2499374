use super::mixin::{
    from_methods, group_methods, limit_methods, order_methods, where_methods,
};
use super::statement::Statement;
use crate::clause::{Clause, QueryDescription, Raw};
use crate::config::Limits;
use crate::error::{QueryError, QueryResult};
use crate::units::{
    from_unit, group_unit, limit_unit, offset_unit, order_unit, select_unit, where_unit,
};
use crate::value::{SqlWithBindings, Value};

/// SELECT statement builder.
///
/// Clauses are emitted as `SELECT, FROM, WHERE, GROUP BY, ORDER BY, LIMIT, OFFSET`
/// regardless of the order of the chained calls.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    desc: QueryDescription,
    limits: Limits,
    build_error: Option<QueryError>,
}

impl SelectQuery {
    /// Create an empty builder (`SELECT *` until columns are added).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Add one column to the projection.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.desc.select.push(Clause::Rule(column.into()));
        self
    }

    /// Add columns to the projection.
    pub fn columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.desc
            .select
            .extend(columns.into_iter().map(|c| Clause::Rule(c.into())));
        self
    }

    /// Add a raw projection item (`COUNT(*) AS total`, `price * ? AS gross`).
    pub fn select_raw<I, V>(mut self, sql: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.desc.select.push(Clause::Raw(Raw::new(
            sql,
            super::mixin::collect_bindings(bindings),
        )));
        self
    }

    where_methods!();
    from_methods!();
    group_methods!();
    order_methods!();
    limit_methods!();

    /// Must be zero or positive; zero is omitted.
    pub fn offset(mut self, n: i64) -> Self {
        self.desc.offset = Some(n);
        self
    }

    /// 1-based page navigation: `LIMIT per_page OFFSET (page - 1) * per_page`.
    pub fn paginate(self, page: i64, per_page: i64) -> Self {
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        self.limit(per_page).offset(offset)
    }

    /// The accumulated clause IR.
    pub fn description(&self) -> &QueryDescription {
        &self.desc
    }

    /// Build the statement. Does not consume or change the builder.
    pub fn to_sql(&self) -> QueryResult<SqlWithBindings> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        let d = &self.desc;
        let mut stmt = Statement::new("select");
        stmt.push(select_unit(&d.select)?);
        stmt.push(from_unit(&d.from)?);
        stmt.push(where_unit(&d.wheres, &self.limits)?);
        stmt.push(group_unit(&d.group_by)?);
        stmt.push(order_unit(&d.order_by)?);
        stmt.push(limit_unit(d.limit)?);
        stmt.push(offset_unit(d.offset)?);
        stmt.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{NullsOrder, Operators, WhereCondition};


    #[test]
    fn test_description_is_unchanged_by_to_sql() {
        let query = SelectQuery::new().columns(["id"]).from("users").limit(5);
        let before = query.description().clone();
        query.to_sql().unwrap();
        assert_eq!(query.description(), &before);
        assert_eq!(before.select, vec![Clause::Rule(String::from("id"))]);
        assert_eq!(before.from, vec![Clause::Rule(String::from("users"))]);
        assert_eq!(before.limit, Some(5));
        assert!(before.insert.is_empty());
    }

    #[test]
    fn test_simple_select() {
        let out = SelectQuery::new()
            .columns(["name", "age"])
            .from("users")
            .and_where(WhereCondition::new().op("age", Operators::new().gt(18)))
            .to_sql()
            .unwrap();
        assert_eq!(out.sql, r#"SELECT "name", "age" FROM "users" WHERE "age" > ?;"#);
        assert_eq!(out.bindings, vec![Value::from(18)]);
    }

    #[test]
    fn test_select_star_without_where() {
        let out = SelectQuery::new().from("users").to_sql().unwrap();
        assert_eq!(out.sql, r#"SELECT * FROM "users";"#);
        assert!(!out.sql.contains("WHERE"));
    }

    #[test]
    fn test_clause_order_is_fixed() {
        let out = SelectQuery::new()
            .offset(20)
            .limit(10)
            .order_by_desc("created_at")
            .group_by("team")
            .where_eq("active", 1)
            .from("users")
            .column("team")
            .to_sql()
            .unwrap();
        assert_eq!(
            out.sql,
            r#"SELECT "team" FROM "users" WHERE "active" = ? GROUP BY "team" ORDER BY "created_at" DESC LIMIT ? OFFSET ?;"#
        );
        assert_eq!(out.bindings, Vec::<Value>::from([1.into(), 10.into(), 20.into()]));
    }

    #[test]
    fn test_nulls_ordering() {
        let out = SelectQuery::new()
            .from("players")
            .order_by_nulls("score", None, NullsOrder::Last)
            .to_sql()
            .unwrap();
        assert_eq!(out.sql, r#"SELECT * FROM "players" ORDER BY "score" NULLS LAST;"#);
    }

    #[test]
    fn test_order_spec_error_surfaces_at_build() {
        let q = SelectQuery::new().from("t").order_by_spec("a", "upward");
        assert!(matches!(q.to_sql(), Err(QueryError::InvalidOrder(_))));

        let out = SelectQuery::new()
            .from("t")
            .order_by_spec("a", "DESC NULLS FIRST")
            .to_sql()
            .unwrap();
        assert_eq!(out.sql, r#"SELECT * FROM "t" ORDER BY "a" DESC NULLS FIRST;"#);
    }

    #[test]
    fn test_missing_and_multiple_from() {
        assert_eq!(SelectQuery::new().to_sql().unwrap_err(), QueryError::MissingFrom);
        assert_eq!(
            SelectQuery::new().from("a").from("b").to_sql().unwrap_err(),
            QueryError::MultipleFrom
        );
    }

    #[test]
    fn test_paginate() {
        let out = SelectQuery::new().from("t").paginate(3, 25).to_sql().unwrap();
        assert_eq!(out.sql, r#"SELECT * FROM "t" LIMIT ? OFFSET ?;"#);
        assert_eq!(out.bindings, Vec::<Value>::from([25.into(), 50.into()]));

        // first page has no offset
        let out = SelectQuery::new().from("t").paginate(1, 25).to_sql().unwrap();
        assert_eq!(out.sql, r#"SELECT * FROM "t" LIMIT ?;"#);

        assert_eq!(
            SelectQuery::new().from("t").paginate(1, 0).to_sql().unwrap_err(),
            QueryError::InvalidLimit(0)
        );
    }

    #[test]
    fn test_to_sql_is_idempotent() {
        let q = SelectQuery::new()
            .from("users")
            .and_where(WhereCondition::new().op("a", Operators::new().eq(1)))
            .or_where(WhereCondition::new().op("a", Operators::new().eq(2)));
        let first = q.to_sql().unwrap();
        assert_eq!(first, q.to_sql().unwrap());
        assert_eq!(first.sql, r#"SELECT * FROM "users" WHERE "a" IN (?, ?);"#);
    }
}
