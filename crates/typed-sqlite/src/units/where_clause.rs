use crate::bindings::validate_bindings;
use crate::clause::WhereClause;
use crate::compiler::compile;
use crate::config::Limits;
use crate::error::QueryResult;
use crate::value::SqlWithBindings;

/// `WHERE <predicate>`, or the empty fragment when there is nothing to filter on.
pub fn where_unit(clauses: &[WhereClause], limits: &Limits) -> QueryResult<SqlWithBindings> {
    let predicate = compile(clauses, limits)?;
    if predicate.is_empty() {
        return Ok(SqlWithBindings::empty());
    }
    let out = SqlWithBindings::new(format!("WHERE {}", predicate.sql), predicate.bindings);
    validate_bindings(&out.sql, &out.bindings)?;
    Ok(out)
}
