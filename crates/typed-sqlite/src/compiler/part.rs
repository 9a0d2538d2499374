//! Per-column accumulation of WHERE conditions.

use std::cmp::Ordering;
use std::mem;

use super::like;
use crate::clause::{Combinator, Operator, Predicate};
use crate::error::{QueryError, QueryResult};
use crate::trace::trace_compiler;
use crate::value::Value;

/// Values collected for each operator in one context (AND or OR).
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Bucket {
    pub eq: Vec<Value>,
    pub eq_column: Vec<String>,
    pub neq: Vec<Value>,
    pub gt: Vec<Value>,
    pub gte: Vec<Value>,
    pub lt: Vec<Value>,
    pub lte: Vec<Value>,
    pub like: Vec<Value>,
    pub in_list: Option<Vec<Value>>,
    pub nin: Option<Vec<Value>>,
    pub null: Vec<bool>,
    pub between: Vec<(Value, Value)>,
    pub not_between: Vec<(Value, Value)>,
}

impl Bucket {
    fn push(&mut self, predicate: Predicate) {
        match predicate {
            Predicate::Eq(v) => self.eq.push(v),
            Predicate::EqColumn(c) => self.eq_column.push(c),
            Predicate::Neq(v) => self.neq.push(v),
            Predicate::Gt(v) => self.gt.push(v),
            Predicate::Gte(v) => self.gte.push(v),
            Predicate::Lt(v) => self.lt.push(v),
            Predicate::Lte(v) => self.lte.push(v),
            Predicate::Like(v) => self.like.push(v),
            Predicate::In(vs) => self.in_list.get_or_insert_with(Vec::new).extend(vs),
            Predicate::Nin(vs) => self.nin.get_or_insert_with(Vec::new).extend(vs),
            Predicate::Null(flag) => self.null.push(flag),
            Predicate::Between(l, h) => self.between.push((l, h)),
            Predicate::NotBetween(l, h) => self.not_between.push((l, h)),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Bucket::default()
    }

    /// Whether the bucket holds exactly one plain equality and nothing else.
    fn is_single_eq(&self) -> bool {
        self.eq.len() == 1
            && Bucket {
                eq: Vec::new(),
                ..self.clone()
            }
            .is_empty()
    }
}

/// All conditions on one column, split by context.
#[derive(Debug, Clone)]
pub(crate) struct PartItem {
    pub column: String,
    pub and: Bucket,
    pub or: Bucket,
    /// First exclusive-family operator seen in AND context.
    exclusive_and: Option<Operator>,
}

impl PartItem {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            and: Bucket::default(),
            or: Bucket::default(),
            exclusive_and: None,
        }
    }

    /// Route one predicate into the bucket for `combinator`, merging where possible.
    pub fn route(&mut self, combinator: Combinator, predicate: Predicate) -> QueryResult<()> {
        if let Predicate::Between(low, high) | Predicate::NotBetween(low, high) = &predicate {
            check_range(&self.column, low, high)?;
        }
        match combinator {
            Combinator::And => self.push_and(predicate),
            Combinator::Or => {
                self.merge_or(predicate);
                Ok(())
            }
        }
    }

    fn push_and(&mut self, predicate: Predicate) -> QueryResult<()> {
        let op = predicate.operator();
        // `IS NULL AND IS NOT NULL` can never match; a repeated test adds nothing.
        if let Predicate::Null(flag) = &predicate {
            match self.and.null.first() {
                Some(held) if held == flag => return Ok(()),
                Some(_) => {
                    return Err(QueryError::ConflictingAndCondition {
                        column: self.column.clone(),
                        operator: op.key().to_string(),
                    });
                }
                None => {}
            }
        }
        if op.is_exclusive() {
            if self.exclusive_and.is_some() {
                return Err(QueryError::ConflictingAndCondition {
                    column: self.column.clone(),
                    operator: op.key().to_string(),
                });
            }
            self.exclusive_and = Some(op);
        }
        self.and.push(predicate);
        Ok(())
    }

    fn merge_or(&mut self, predicate: Predicate) {
        let or = &mut self.or;
        match predicate {
            Predicate::Eq(v) => {
                if let Some(set) = or.in_list.as_mut() {
                    push_unique(set, v);
                } else if !or.eq.is_empty() {
                    let mut set = mem::take(&mut or.eq);
                    set.push(v);
                    or.in_list = Some(dedup(set));
                    trace_compiler!(column = %self.column, "folded OR equalities into IN");
                } else {
                    or.eq.push(v);
                }
            }
            Predicate::In(vs) => {
                let mut set = or.in_list.take().unwrap_or_default();
                set.append(&mut or.eq);
                set.extend(vs);
                or.in_list = Some(dedup(set));
            }
            Predicate::Gt(v) => merge_bound(&mut or.gt, &mut or.gte, v, false, Ordering::Less),
            Predicate::Gte(v) => merge_bound(&mut or.gte, &mut or.gt, v, true, Ordering::Less),
            Predicate::Lt(v) => merge_bound(&mut or.lt, &mut or.lte, v, false, Ordering::Greater),
            Predicate::Lte(v) => merge_bound(&mut or.lte, &mut or.lt, v, true, Ordering::Greater),
            Predicate::Between(low, high) => match or.between.as_mut_slice() {
                [(l, h)] if low.compare(l).is_some() && high.compare(h).is_some() => {
                    if low.compare(l) == Some(Ordering::Less) {
                        *l = low;
                    }
                    if high.compare(h) == Some(Ordering::Greater) {
                        *h = high;
                    }
                    trace_compiler!(column = %self.column, "widened OR BETWEEN range");
                }
                _ => or.between.push((low, high)),
            },
            Predicate::Null(flag) => {
                if !self.and.null.contains(&flag) && !or.null.contains(&flag) {
                    or.null.push(flag);
                }
            }
            Predicate::Like(pattern) => {
                let before = or.like.len() + 1;
                or.like.push(pattern);
                or.like = like::prune(mem::take(&mut or.like));
                if or.like.len() < before {
                    trace_compiler!(column = %self.column, "pruned subsumed LIKE patterns");
                }
            }
            other => or.push(other),
        }
    }
}

/// Merge a bound into an OR-context bound family.
///
/// `same` holds bounds of the incoming operator, `mixed` the inclusive/exclusive
/// counterpart. `weaker` is the ordering of a weaker bound relative to a stronger
/// one (`Less` for lower bounds, `Greater` for upper bounds). When the family holds
/// one comparable bound, only the weaker of the two survives; on equal values the
/// non-inclusive operator wins. Anything else is kept side by side.
fn merge_bound(
    same: &mut Vec<Value>,
    mixed: &mut Vec<Value>,
    value: Value,
    inclusive: bool,
    weaker: Ordering,
) {
    let existing = match (same.as_slice(), mixed.as_slice()) {
        ([v], []) => Some((v, false)),
        ([], [v]) => Some((v, true)),
        _ => None,
    };
    let Some((current, current_is_mixed)) = existing else {
        same.push(value);
        return;
    };
    let Some(ord) = value.compare(current) else {
        same.push(value);
        return;
    };

    let replace = if ord == weaker {
        true
    } else if ord == Ordering::Equal {
        // Same operator: nothing to do. Mixed: keep the non-inclusive side.
        current_is_mixed && !inclusive
    } else {
        false
    };

    if replace {
        same.clear();
        mixed.clear();
        same.push(value);
        trace_compiler!("tightened OR bound");
    }
}

fn check_range(column: &str, low: &Value, high: &Value) -> QueryResult<()> {
    match low.compare(high) {
        Some(Ordering::Less | Ordering::Equal) => Ok(()),
        _ => Err(QueryError::InvalidRange {
            column: column.to_string(),
            low: low.to_string(),
            high: high.to_string(),
        }),
    }
}

fn push_unique(set: &mut Vec<Value>, v: Value) {
    if !set.iter().any(|x| x.same_as(&v)) {
        set.push(v);
    }
}

fn dedup(values: Vec<Value>) -> Vec<Value> {
    let mut out = Vec::with_capacity(values.len());
    for v in values {
        push_unique(&mut out, v);
    }
    out
}

/// Fold a lone AND-context equality into the same column's OR-context IN set.
///
/// Applies only when that equality is the whole AND side of the predicate; the
/// top-level join is then `eq OR (...)`, so moving it into the IN list is exact.
pub(crate) fn fold_lone_equality(parts: &mut [PartItem], has_raw_and: bool) {
    if has_raw_and {
        return;
    }
    let mut with_and = parts.iter_mut().filter(|p| !p.and.is_empty());
    let (Some(part), None) = (with_and.next(), with_and.next()) else {
        return;
    };
    if !part.and.is_single_eq() || (part.or.eq.is_empty() && part.or.in_list.is_none()) {
        return;
    }

    let mut set = mem::take(&mut part.and.eq);
    set.append(&mut part.or.eq);
    set.extend(part.or.in_list.take().unwrap_or_default());
    part.or.in_list = Some(dedup(set));
    part.exclusive_and = None;
    trace_compiler!(column = %part.column, "folded AND equality into OR IN set");
}
