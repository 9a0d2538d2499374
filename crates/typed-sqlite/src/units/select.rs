use super::{keyword_list, raw_fragment};
use crate::clause::{Clause, SelectClause};
use crate::error::QueryResult;
use crate::ident::quote_ident;
use crate::value::SqlWithBindings;

/// `SELECT *` for no columns, otherwise the quoted column list.
pub fn select_unit(clauses: &[SelectClause]) -> QueryResult<SqlWithBindings> {
    if clauses.is_empty() {
        return Ok(SqlWithBindings::sql("SELECT *"));
    }
    let items = clauses
        .iter()
        .map(|clause| match clause {
            Clause::Rule(column) => quote_ident(column).map(SqlWithBindings::sql),
            Clause::Raw(raw) => raw_fragment(raw),
        })
        .collect::<QueryResult<Vec<_>>>()?;
    Ok(keyword_list("SELECT", items))
}
