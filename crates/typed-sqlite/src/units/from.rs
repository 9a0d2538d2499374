use super::raw_fragment;
use crate::clause::{Clause, FromClause};
use crate::error::{QueryError, QueryResult};
use crate::ident::quote_ident;
use crate::value::SqlWithBindings;

/// Exactly one FROM source is required.
pub fn from_unit(clauses: &[FromClause]) -> QueryResult<SqlWithBindings> {
    let clause = match clauses {
        [] => return Err(QueryError::MissingFrom),
        [clause] => clause,
        _ => return Err(QueryError::MultipleFrom),
    };
    let source = match clause {
        Clause::Rule(table) => SqlWithBindings::sql(quote_ident(table)?),
        Clause::Raw(raw) => raw_fragment(raw)?,
    };
    Ok(SqlWithBindings::new(
        format!("FROM {}", source.sql),
        source.bindings,
    ))
}
