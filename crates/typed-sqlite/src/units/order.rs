use super::{keyword_list, raw_fragment};
use crate::clause::{Clause, OrderByClause, OrderRule};
use crate::error::QueryResult;
use crate::ident::quote_ident;
use crate::value::SqlWithBindings;

fn order_item(rule: &OrderRule) -> QueryResult<String> {
    let mut sql = quote_ident(&rule.column)?;
    if let Some(direction) = rule.direction {
        sql.push(' ');
        sql.push_str(direction.to_sql());
    }
    if let Some(nulls) = rule.nulls {
        sql.push(' ');
        sql.push_str(nulls.to_sql());
    }
    Ok(sql)
}

pub fn order_unit(clauses: &[OrderByClause]) -> QueryResult<SqlWithBindings> {
    let items = clauses
        .iter()
        .map(|clause| match clause {
            Clause::Rule(rule) => order_item(rule).map(SqlWithBindings::sql),
            Clause::Raw(raw) => raw_fragment(raw),
        })
        .collect::<QueryResult<Vec<_>>>()?;
    Ok(keyword_list("ORDER BY", items))
}
