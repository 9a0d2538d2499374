use super::mixin::{
    from_methods, limit_methods, order_methods, returning_methods, where_methods,
};
use super::statement::Statement;
use crate::clause::{Clause, QueryDescription, Raw, UpdateRule};
use crate::config::Limits;
use crate::error::{QueryError, QueryResult};
use crate::units::{
    from_unit, limit_unit, order_unit, returning_unit, update_unit, where_unit,
};
use crate::value::{Row, SqlWithBindings, Value};

/// UPDATE statement builder.
///
/// Emits `UPDATE ... SET, FROM, WHERE, ORDER BY, LIMIT, RETURNING`; FROM is optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateQuery {
    desc: QueryDescription,
    limits: Limits,
    build_error: Option<QueryError>,
}

impl UpdateQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    fn push_update(mut self, clause: Clause<UpdateRule>) -> Self {
        if !self.desc.update.is_empty() {
            self.build_error.get_or_insert(QueryError::MultipleUpdateClauses);
        }
        self.desc.update.push(clause);
        self
    }

    /// `UPDATE table SET <row>`. A second call is an error.
    pub fn update(self, table: impl Into<String>, set: Row) -> Self {
        self.push_update(Clause::Rule(UpdateRule {
            table: table.into(),
            set,
        }))
    }

    /// Raw `UPDATE ... SET ...` text. A second call is an error.
    pub fn update_raw<I, V>(self, sql: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_update(Clause::Raw(Raw::new(
            sql,
            super::mixin::collect_bindings(bindings),
        )))
    }

    /// Add one assignment to the pending `SET` list.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        match self.desc.update.last_mut() {
            Some(Clause::Rule(rule)) => rule.set.insert(column, value),
            _ => {
                self.build_error.get_or_insert(QueryError::MissingTable("UPDATE"));
            }
        }
        self
    }

    where_methods!();
    from_methods!();
    order_methods!();
    limit_methods!();
    returning_methods!();

    pub fn description(&self) -> &QueryDescription {
        &self.desc
    }

    pub fn to_sql(&self) -> QueryResult<SqlWithBindings> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        let d = &self.desc;
        if d.update.is_empty() {
            return Err(QueryError::NoValidSqlGenerated);
        }
        let mut stmt = Statement::new("update");
        stmt.push(update_unit(&d.update)?);
        if !d.from.is_empty() {
            stmt.push(from_unit(&d.from)?);
        }
        stmt.push(where_unit(&d.wheres, &self.limits)?);
        stmt.push(order_unit(&d.order_by)?);
        stmt.push(limit_unit(d.limit)?);
        stmt.push(returning_unit(&d.returning)?);
        stmt.finish()
    }
}
