use super::{bind_or_null, raw_fragment};
use crate::bindings::validate_bindings;
use crate::clause::{Clause, UpdateClause};
use crate::error::{QueryError, QueryResult};
use crate::ident::quote_ident;
use crate::value::{Bindings, SqlWithBindings};

/// `UPDATE "t" SET "a" = ?, ...` with columns in sorted order.
pub fn update_unit(clauses: &[UpdateClause]) -> QueryResult<SqlWithBindings> {
    let clause = match clauses {
        [] => return Ok(SqlWithBindings::empty()),
        [clause] => clause,
        _ => return Err(QueryError::MultipleUpdateClauses),
    };
    let rule = match clause {
        Clause::Raw(raw) => return raw_fragment(raw),
        Clause::Rule(rule) => rule,
    };
    if rule.table.trim().is_empty() {
        return Err(QueryError::MissingTable("UPDATE"));
    }
    if rule.set.is_empty() {
        return Err(QueryError::NoColumns("UPDATE"));
    }

    let mut bindings = Bindings::new();
    let mut sets = Vec::with_capacity(rule.set.len());
    for (column, value) in rule.set.iter() {
        let slot = bind_or_null(value, &mut bindings);
        sets.push(format!("{} = {slot}", quote_ident(column)?));
    }
    let sql = format!("UPDATE {} SET {}", quote_ident(&rule.table)?, sets.join(", "));
    validate_bindings(&sql, &bindings)?;
    Ok(SqlWithBindings::new(sql, bindings))
}
