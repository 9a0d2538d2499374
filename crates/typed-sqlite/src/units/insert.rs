use super::{bind_or_null, raw_fragment};
use crate::bindings::validate_bindings;
use crate::clause::{
    Clause, ConflictAction, ConflictResolution, InsertClause, InsertRule, OnConflict,
};
use crate::config::Limits;
use crate::error::{QueryError, QueryResult};
use crate::ident::{quote_ident, quote_list};
use crate::value::{Bindings, Row, SqlWithBindings};

/// Render the single insert clause of a statement.
///
/// Consecutive rows with the same column set share one multi-row `VALUES` list;
/// every change of column set starts a new statement, so the result holds one
/// entry per homogeneous batch, in row order. A `resolution` turns the verb into
/// `INSERT OR <resolution> INTO`.
pub fn insert_unit(
    clauses: &[InsertClause],
    resolution: Option<ConflictResolution>,
    limits: &Limits,
) -> QueryResult<Vec<SqlWithBindings>> {
    let clause = match clauses {
        [] => return Err(QueryError::NoInsertClause),
        [clause] => clause,
        _ => return Err(QueryError::MultipleInsertClauses),
    };
    match clause {
        Clause::Raw(_) if resolution.is_some() => Err(QueryError::InvalidConflictClause(
            "a conflict resolution needs a structured insert clause",
        )),
        Clause::Raw(raw) => Ok(vec![raw_fragment(raw)?]),
        Clause::Rule(rule) => insert_rule(rule, resolution, limits),
    }
}

fn insert_rule(
    rule: &InsertRule,
    resolution: Option<ConflictResolution>,
    limits: &Limits,
) -> QueryResult<Vec<SqlWithBindings>> {
    if rule.table.trim().is_empty() {
        return Err(QueryError::MissingTable("INSERT"));
    }
    if rule.rows.is_empty() {
        return Err(QueryError::NoValues);
    }
    if rule.rows.len() > limits.max_batch_size {
        return Err(QueryError::BatchSizeExceeded {
            size: rule.rows.len(),
            max: limits.max_batch_size,
        });
    }
    if rule.rows.iter().any(Row::is_empty) {
        return Err(QueryError::NoColumns("INSERT"));
    }

    let verb = match resolution {
        Some(resolution) => format!("INSERT {} INTO", resolution.to_sql()),
        None => String::from("INSERT INTO"),
    };
    let table = quote_ident(&rule.table)?;
    rule.rows
        .chunk_by(|a, b| a.same_columns(b))
        .map(|batch| insert_batch(&verb, &table, batch))
        .collect()
}

fn insert_batch(verb: &str, table: &str, rows: &[Row]) -> QueryResult<SqlWithBindings> {
    let columns: Vec<&str> = rows[0].columns().collect();
    let mut bindings = Bindings::new();
    let mut tuples = Vec::with_capacity(rows.len());
    for row in rows {
        let slots: Vec<&str> = row
            .iter()
            .map(|(_, value)| bind_or_null(value, &mut bindings))
            .collect();
        tuples.push(format!("({})", slots.join(", ")));
    }
    let sql = format!(
        "{verb} {table} ({}) VALUES {}",
        quote_list(&columns)?,
        tuples.join(", ")
    );
    validate_bindings(&sql, &bindings)?;
    Ok(SqlWithBindings::new(sql, bindings))
}

/// `ON CONFLICT [(target)] DO NOTHING | DO UPDATE SET ...`
///
/// A statement-level resolution renders nothing here (see [`insert_unit`]) and
/// takes no target. A clause without an action is an error.
pub fn conflict_unit(conflict: &OnConflict) -> QueryResult<SqlWithBindings> {
    let action = match &conflict.action {
        None => {
            return Err(QueryError::InvalidConflictClause(
                "ON CONFLICT needs DO NOTHING or DO UPDATE",
            ));
        }
        Some(ConflictAction::Resolve(_)) if !conflict.target.is_empty() => {
            return Err(QueryError::InvalidConflictClause(
                "INSERT OR <resolution> does not take a conflict target",
            ));
        }
        Some(ConflictAction::Resolve(_)) => return Ok(SqlWithBindings::empty()),
        Some(action) => action,
    };
    let mut sql = String::from("ON CONFLICT");
    if !conflict.target.is_empty() {
        sql.push_str(&format!(" ({})", quote_list(&conflict.target)?));
    }

    let mut bindings = Bindings::new();
    match action {
        ConflictAction::DoNothing | ConflictAction::Resolve(_) => sql.push_str(" DO NOTHING"),
        ConflictAction::DoUpdate(update) => {
            if update.excluded.is_empty() && update.merge.is_empty() {
                return Err(QueryError::NoColumns("DO UPDATE"));
            }
            if let Some(dup) = update.excluded.iter().find(|c| update.merge.contains(c)) {
                return Err(QueryError::DuplicateConflictColumn(dup.clone()));
            }
            let mut sets = Vec::new();
            for column in &update.excluded {
                let col = quote_ident(column)?;
                sets.push(format!("{col} = excluded.{col}"));
            }
            for (column, value) in update.merge.iter() {
                let slot = bind_or_null(value, &mut bindings);
                sets.push(format!("{} = {slot}", quote_ident(column)?));
            }
            sql.push_str(" DO UPDATE SET ");
            sql.push_str(&sets.join(", "));
        }
    }
    validate_bindings(&sql, &bindings)?;
    Ok(SqlWithBindings::new(sql, bindings))
}
