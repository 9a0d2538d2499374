//! WHERE condition compiler.
//!
//! Compilation runs in two phases:
//!
//! 1. preprocess: every structured condition is routed into a per-column
//!    [`PartItem`] (AND and OR contexts kept apart) while merge optimizations are
//!    applied; raw fragments are collected in order.
//! 2. emit: each column renders its AND fragments joined by `AND` and its OR
//!    fragments joined by `OR`. All AND-side pieces (columns then raw AND fragments)
//!    join with `AND`, all OR-side pieces (columns then raw OR fragments) with `OR`,
//!    and the two sides join with one top-level `OR`.
//!
//! No parentheses are added around per-column groups, so with several OR columns
//! next to AND columns the usual `AND`-binds-tighter precedence applies.

mod like;
mod part;

use std::collections::HashMap;

use crate::bindings::validate_bindings;
use crate::clause::{Clause, ColumnFilter, Combinator, Predicate, Raw, WhereClause};
use crate::config::Limits;
use crate::error::{QueryError, QueryResult};
use crate::ident::quote_ident;
use crate::value::{Bindings, SqlWithBindings, Value};

use part::{Bucket, PartItem};

/// Result of the preprocess phase.
#[derive(Debug, Default)]
struct Preprocessed {
    parts: Vec<PartItem>,
    raw_and: Vec<Raw>,
    raw_or: Vec<Raw>,
}

fn preprocess(clauses: &[WhereClause], limits: &Limits) -> QueryResult<Preprocessed> {
    let mut out = Preprocessed::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for clause in clauses {
        let condition = match &clause.clause {
            Clause::Raw(raw) => {
                validate_bindings(&raw.sql, &raw.bindings)?;
                if !raw.sql.trim().is_empty() {
                    match clause.combinator {
                        Combinator::And => out.raw_and.push(raw.clone()),
                        Combinator::Or => out.raw_or.push(raw.clone()),
                    }
                }
                continue;
            }
            Clause::Rule(condition) => condition,
        };

        for (column, filter) in condition.iter() {
            let slot = *index.entry(column.to_string()).or_insert_with(|| {
                out.parts.push(PartItem::new(column));
                out.parts.len() - 1
            });
            let part = &mut out.parts[slot];
            match filter {
                ColumnFilter::Value(v) => part.route(clause.combinator, Predicate::Eq(v.clone()))?,
                ColumnFilter::Ops(ops) => {
                    for predicate in ops.predicates() {
                        part.route(clause.combinator, predicate)?;
                    }
                }
            }
        }
    }

    if out.parts.len() > limits.max_conditions {
        return Err(QueryError::TooManyConditions {
            count: out.parts.len(),
            max: limits.max_conditions,
        });
    }

    part::fold_lone_equality(&mut out.parts, !out.raw_and.is_empty());
    Ok(out)
}

fn push_compare(out: &mut Vec<SqlWithBindings>, col: &str, op: &str, values: &[Value]) {
    for v in values {
        out.push(SqlWithBindings::new(format!("{col} {op} ?"), vec![v.clone()]));
    }
}

/// `col IN (?, ?)`; an empty list is never true for IN and always true for NOT IN.
fn push_list(out: &mut Vec<SqlWithBindings>, col: &str, negated: bool, values: &[Value]) {
    let fragment = match (values.is_empty(), negated) {
        (true, false) => SqlWithBindings::sql("1=0"),
        (true, true) => SqlWithBindings::sql("1=1"),
        (false, _) => {
            let op = if negated { "NOT IN" } else { "IN" };
            let placeholders = vec!["?"; values.len()].join(", ");
            SqlWithBindings::new(format!("{col} {op} ({placeholders})"), values.to_vec())
        }
    };
    out.push(fragment);
}

/// Append `col OP ...` fragments for every operator in `bucket`, in operator order.
fn emit_bucket(col: &str, bucket: &Bucket, out: &mut Vec<SqlWithBindings>) -> QueryResult<()> {
    push_compare(out, col, "=", &bucket.eq);
    for other in &bucket.eq_column {
        out.push(SqlWithBindings::sql(format!("{col} = {}", quote_ident(other)?)));
    }
    push_compare(out, col, "!=", &bucket.neq);
    push_compare(out, col, ">", &bucket.gt);
    push_compare(out, col, ">=", &bucket.gte);
    push_compare(out, col, "<", &bucket.lt);
    push_compare(out, col, "<=", &bucket.lte);
    push_compare(out, col, "LIKE", &bucket.like);

    if let Some(values) = &bucket.in_list {
        push_list(out, col, false, values);
    }
    if let Some(values) = &bucket.nin {
        push_list(out, col, true, values);
    }

    for is_null in &bucket.null {
        let test = if *is_null { "IS NULL" } else { "IS NOT NULL" };
        out.push(SqlWithBindings::sql(format!("{col} {test}")));
    }

    for (op, ranges) in [("BETWEEN", &bucket.between), ("NOT BETWEEN", &bucket.not_between)] {
        for (low, high) in ranges {
            out.push(SqlWithBindings::new(
                format!("{col} {op} ? AND ?"),
                vec![low.clone(), high.clone()],
            ));
        }
    }
    Ok(())
}

/// Join fragments with `sep`, concatenating their bindings in the same order.
fn join(fragments: Vec<SqlWithBindings>, sep: &str) -> SqlWithBindings {
    let mut sql = String::new();
    let mut bindings = Bindings::new();
    for (i, f) in fragments.into_iter().enumerate() {
        if i > 0 {
            sql.push_str(sep);
        }
        sql.push_str(&f.sql);
        bindings.extend(f.bindings);
    }
    SqlWithBindings::new(sql, bindings)
}

fn emit(pre: Preprocessed) -> QueryResult<SqlWithBindings> {
    let mut and_side = Vec::new();
    let mut or_side = Vec::new();

    for part in &pre.parts {
        let col = quote_ident(&part.column)?;

        let mut fragments = Vec::new();
        emit_bucket(&col, &part.and, &mut fragments)?;
        if !fragments.is_empty() {
            and_side.push(join(fragments, Combinator::And.to_sql()));
        }

        let mut fragments = Vec::new();
        emit_bucket(&col, &part.or, &mut fragments)?;
        if !fragments.is_empty() {
            or_side.push(join(fragments, Combinator::Or.to_sql()));
        }
    }

    let raw_fragment = |raw: Raw| SqlWithBindings::new(raw.sql.trim(), raw.bindings);
    and_side.extend(pre.raw_and.into_iter().map(raw_fragment));
    or_side.extend(pre.raw_or.into_iter().map(raw_fragment));

    let and_side = join(and_side, Combinator::And.to_sql());
    let or_side = join(or_side, Combinator::Or.to_sql());
    Ok(match (and_side.is_empty(), or_side.is_empty()) {
        (true, true) => SqlWithBindings::empty(),
        (false, true) => and_side,
        (true, false) => or_side,
        (false, false) => join(vec![and_side, or_side], Combinator::Or.to_sql()),
    })
}

/// Compile WHERE clauses into one predicate (without the `WHERE` keyword).
///
/// An empty input compiles to the empty fragment.
pub fn compile(clauses: &[WhereClause], limits: &Limits) -> QueryResult<SqlWithBindings> {
    if clauses.is_empty() {
        return Ok(SqlWithBindings::empty());
    }
    let compiled = emit(preprocess(clauses, limits)?)?;
    validate_bindings(&compiled.sql, &compiled.bindings)?;
    Ok(compiled)
}
