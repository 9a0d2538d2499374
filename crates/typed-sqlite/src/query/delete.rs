use super::mixin::{from_methods, limit_methods, returning_methods, where_methods};
use super::statement::Statement;
use crate::clause::QueryDescription;
use crate::config::Limits;
use crate::error::{QueryError, QueryResult};
use crate::units::{from_unit, limit_unit, returning_unit, where_unit};
use crate::value::SqlWithBindings;

/// DELETE statement builder.
///
/// Emits `DELETE, FROM, WHERE, LIMIT, RETURNING`. Nothing is generated until
/// [`delete`](Self::delete) has been called exactly once.
#[derive(Debug, Clone, Default)]
pub struct DeleteQuery {
    desc: QueryDescription,
    limits: Limits,
    build_error: Option<QueryError>,
    delete_called: bool,
}

impl DeleteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Mark this statement as a DELETE. A second call is an error.
    pub fn delete(mut self) -> Self {
        if self.delete_called {
            self.build_error.get_or_insert(QueryError::MultipleDeleteClauses);
        }
        self.delete_called = true;
        self
    }

    where_methods!();
    from_methods!();
    limit_methods!();
    returning_methods!();

    pub fn description(&self) -> &QueryDescription {
        &self.desc
    }

    pub fn to_sql(&self) -> QueryResult<SqlWithBindings> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        if !self.delete_called {
            return Err(QueryError::NoValidSqlGenerated);
        }
        let d = &self.desc;
        let mut stmt = Statement::new("delete");
        stmt.push(SqlWithBindings::sql("DELETE"));
        stmt.push(from_unit(&d.from)?);
        stmt.push(where_unit(&d.wheres, &self.limits)?);
        stmt.push(limit_unit(d.limit)?);
        stmt.push(returning_unit(&d.returning)?);
        stmt.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;


    #[test]
    fn test_description_holds_clauses() {
        use crate::clause::Clause;

        let query = DeleteQuery::new()
            .delete()
            .from("sessions")
            .returning(["id"]);
        let desc = query.description();
        assert_eq!(desc.from, vec![Clause::Rule(String::from("sessions"))]);
        assert_eq!(desc.returning, vec![Clause::Rule(vec![String::from("id")])]);
        assert!(desc.wheres.is_empty());
    }

    #[test]
    fn test_delete_with_limit() {
        let out = DeleteQuery::new()
            .delete()
            .from("users")
            .where_eq("id", 1)
            .limit(10)
            .to_sql()
            .unwrap();
        assert_eq!(out.sql, r#"DELETE FROM "users" WHERE "id" = ? LIMIT ?;"#);
        assert_eq!(out.bindings, vec![Value::from(1), Value::from(10)]);
    }

    #[test]
    fn test_delete_returning() {
        let out = DeleteQuery::new()
            .delete()
            .from("sessions")
            .where_raw("expires_at < ?", ["2024-01-01"])
            .returning(["id"])
            .to_sql()
            .unwrap();
        assert_eq!(
            out.sql,
            r#"DELETE FROM "sessions" WHERE expires_at < ? RETURNING "id";"#
        );
    }

    #[test]
    fn test_delete_guards() {
        assert_eq!(
            DeleteQuery::new().from("users").to_sql().unwrap_err(),
            QueryError::NoValidSqlGenerated
        );
        assert_eq!(
            DeleteQuery::new().delete().delete().from("users").to_sql().unwrap_err(),
            QueryError::MultipleDeleteClauses
        );
        assert_eq!(
            DeleteQuery::new().delete().to_sql().unwrap_err(),
            QueryError::MissingFrom
        );
    }
}
