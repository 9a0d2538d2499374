use super::{keyword_list, raw_fragment};
use crate::clause::{Clause, GroupByClause};
use crate::error::QueryResult;
use crate::ident::quote_ident;
use crate::value::SqlWithBindings;

pub fn group_unit(clauses: &[GroupByClause]) -> QueryResult<SqlWithBindings> {
    let items = clauses
        .iter()
        .map(|clause| match clause {
            Clause::Rule(column) => quote_ident(column).map(SqlWithBindings::sql),
            Clause::Raw(raw) => raw_fragment(raw),
        })
        .collect::<QueryResult<Vec<_>>>()?;
    Ok(keyword_list("GROUP BY", items))
}
