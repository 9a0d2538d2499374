use super::{keyword_list, raw_fragment};
use crate::clause::{Clause, ReturningClause};
use crate::error::QueryResult;
use crate::ident::quote_ident;
use crate::value::SqlWithBindings;

pub fn returning_unit(clauses: &[ReturningClause]) -> QueryResult<SqlWithBindings> {
    let mut items = Vec::new();
    for clause in clauses {
        match clause {
            Clause::Rule(columns) => {
                for column in columns {
                    items.push(SqlWithBindings::sql(quote_ident(column)?));
                }
            }
            Clause::Raw(raw) => items.push(raw_fragment(raw)?),
        }
    }
    Ok(keyword_list("RETURNING", items))
}
