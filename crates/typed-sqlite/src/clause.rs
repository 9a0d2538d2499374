//! Clause IR: plain data describing the pieces of one statement.

use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;
use crate::value::{Bindings, Row, Value};

/// Literal SQL with the bindings for its `?` placeholders.
///
/// Raw text reaches the statement verbatim apart from surrounding whitespace.
/// Only the declared placeholders are parameterized; everything else is the caller's
/// responsibility.
#[derive(Debug, Clone, PartialEq)]
pub struct Raw {
    pub sql: String,
    pub bindings: Bindings,
}

impl Raw {
    pub fn new(sql: impl Into<String>, bindings: Bindings) -> Self {
        Self {
            sql: sql.into(),
            bindings,
        }
    }
}

/// Either a structured rule or a raw SQL fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause<R> {
    Rule(R),
    Raw(Raw),
}

pub type SelectClause = Clause<String>;
pub type FromClause = Clause<String>;
pub type GroupByClause = Clause<String>;
pub type OrderByClause = Clause<OrderRule>;
/// A returning list; `["*"]` returns every column.
pub type ReturningClause = Clause<Vec<String>>;
pub type InsertClause = Clause<InsertRule>;
pub type UpdateClause = Clause<UpdateRule>;

/// How a WHERE clause joins the other top-level clauses of the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub fn to_sql(self) -> &'static str {
        match self {
            Combinator::And => " AND ",
            Combinator::Or => " OR ",
        }
    }
}

/// A structured or raw WHERE clause tagged with its combinator.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub combinator: Combinator,
    pub clause: Clause<WhereCondition>,
}

impl WhereClause {
    pub fn and(condition: WhereCondition) -> Self {
        Self {
            combinator: Combinator::And,
            clause: Clause::Rule(condition),
        }
    }

    pub fn or(condition: WhereCondition) -> Self {
        Self {
            combinator: Combinator::Or,
            clause: Clause::Rule(condition),
        }
    }

    pub fn raw(combinator: Combinator, sql: impl Into<String>, bindings: Bindings) -> Self {
        Self {
            combinator,
            clause: Clause::Raw(Raw::new(sql, bindings)),
        }
    }
}

/// What a column is compared against in a [`WhereCondition`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Implicit equality.
    Value(Value),
    Ops(Operators),
}

/// Column → filter mapping of one WHERE / OR WHERE call.
///
/// Setting the same column twice replaces the earlier filter in place.
///
/// ```ignore
/// let cond = WhereCondition::new()
///     .eq("status", "active")
///     .op("age", Operators::new().gte(18).lte(60));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereCondition {
    entries: Vec<(String, ColumnFilter)>,
}

impl WhereCondition {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = value`
    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, ColumnFilter::Value(value.into()))
    }

    /// Operator object for `column`.
    pub fn op(self, column: impl Into<String>, ops: Operators) -> Self {
        self.filter(column, ColumnFilter::Ops(ops))
    }

    pub fn filter(mut self, column: impl Into<String>, filter: ColumnFilter) -> Self {
        let column = column.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = filter,
            None => self.entries.push((column, filter)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnFilter)> {
        self.entries.iter().map(|(c, f)| (c.as_str(), f))
    }
}

/// The closed set of comparison operators, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    /// Equality against another column (`"a"."x" = "b"."y"`).
    EqColumn,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    In,
    Nin,
    Null,
    Between,
    NotBetween,
}

impl Operator {
    pub const ALL: [Operator; 13] = [
        Operator::Eq,
        Operator::EqColumn,
        Operator::Neq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Like,
        Operator::In,
        Operator::Nin,
        Operator::Null,
        Operator::Between,
        Operator::NotBetween,
    ];

    /// Operator key as written in condition objects.
    pub fn key(self) -> &'static str {
        match self {
            Operator::Eq => "$eq",
            Operator::EqColumn => "$eq($col)",
            Operator::Neq => "$neq",
            Operator::Gt => "$gt",
            Operator::Gte => "$gte",
            Operator::Lt => "$lt",
            Operator::Lte => "$lte",
            Operator::Like => "$like",
            Operator::In => "$in",
            Operator::Nin => "$nin",
            Operator::Null => "$null",
            Operator::Between => "$between",
            Operator::NotBetween => "$notBetween",
        }
    }

    /// Exact-match family: at most one of these per column in AND context.
    pub fn is_exclusive(self) -> bool {
        matches!(
            self,
            Operator::Eq
                | Operator::EqColumn
                | Operator::Neq
                | Operator::Like
                | Operator::In
                | Operator::Between
                | Operator::NotBetween
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One operator with its operand, taken out of an [`Operators`] object.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Predicate {
    Eq(Value),
    EqColumn(String),
    Neq(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    Like(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Null(bool),
    Between(Value, Value),
    NotBetween(Value, Value),
}

impl Predicate {
    pub(crate) fn operator(&self) -> Operator {
        match self {
            Predicate::Eq(_) => Operator::Eq,
            Predicate::EqColumn(_) => Operator::EqColumn,
            Predicate::Neq(_) => Operator::Neq,
            Predicate::Gt(_) => Operator::Gt,
            Predicate::Gte(_) => Operator::Gte,
            Predicate::Lt(_) => Operator::Lt,
            Predicate::Lte(_) => Operator::Lte,
            Predicate::Like(_) => Operator::Like,
            Predicate::In(_) => Operator::In,
            Predicate::Nin(_) => Operator::Nin,
            Predicate::Null(_) => Operator::Null,
            Predicate::Between(..) => Operator::Between,
            Predicate::NotBetween(..) => Operator::NotBetween,
        }
    }
}

/// Operator object: at most one operand per operator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operators {
    pub eq: Option<Value>,
    pub eq_column: Option<String>,
    pub neq: Option<Value>,
    pub gt: Option<Value>,
    pub gte: Option<Value>,
    pub lt: Option<Value>,
    pub lte: Option<Value>,
    pub like: Option<String>,
    pub in_list: Option<Vec<Value>>,
    pub nin: Option<Vec<Value>>,
    pub null: Option<bool>,
    pub between: Option<(Value, Value)>,
    pub not_between: Option<(Value, Value)>,
}

impl Operators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, v: impl Into<Value>) -> Self {
        self.eq = Some(v.into());
        self
    }

    /// Compare against another column instead of a bound value.
    pub fn eq_column(mut self, column: impl Into<String>) -> Self {
        self.eq_column = Some(column.into());
        self
    }

    pub fn neq(mut self, v: impl Into<Value>) -> Self {
        self.neq = Some(v.into());
        self
    }

    pub fn gt(mut self, v: impl Into<Value>) -> Self {
        self.gt = Some(v.into());
        self
    }

    pub fn gte(mut self, v: impl Into<Value>) -> Self {
        self.gte = Some(v.into());
        self
    }

    pub fn lt(mut self, v: impl Into<Value>) -> Self {
        self.lt = Some(v.into());
        self
    }

    pub fn lte(mut self, v: impl Into<Value>) -> Self {
        self.lte = Some(v.into());
        self
    }

    pub fn like(mut self, pattern: impl Into<String>) -> Self {
        self.like = Some(pattern.into());
        self
    }

    pub fn in_list<T: Into<Value>>(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.in_list = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn not_in<T: Into<Value>>(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.nin = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// `IS NULL` when `true`, `IS NOT NULL` when `false`.
    pub fn null(mut self, is_null: bool) -> Self {
        self.null = Some(is_null);
        self
    }

    pub fn is_null(self) -> Self {
        self.null(true)
    }

    pub fn is_not_null(self) -> Self {
        self.null(false)
    }

    pub fn between(mut self, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.between = Some((low.into(), high.into()));
        self
    }

    pub fn not_between(mut self, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.not_between = Some((low.into(), high.into()));
        self
    }

    pub(crate) fn predicate(&self, op: Operator) -> Option<Predicate> {
        match op {
            Operator::Eq => self.eq.clone().map(Predicate::Eq),
            Operator::EqColumn => self.eq_column.clone().map(Predicate::EqColumn),
            Operator::Neq => self.neq.clone().map(Predicate::Neq),
            Operator::Gt => self.gt.clone().map(Predicate::Gt),
            Operator::Gte => self.gte.clone().map(Predicate::Gte),
            Operator::Lt => self.lt.clone().map(Predicate::Lt),
            Operator::Lte => self.lte.clone().map(Predicate::Lte),
            Operator::Like => self.like.clone().map(|p| Predicate::Like(Value::Text(p))),
            Operator::In => self.in_list.clone().map(Predicate::In),
            Operator::Nin => self.nin.clone().map(Predicate::Nin),
            Operator::Null => self.null.map(Predicate::Null),
            Operator::Between => self.between.clone().map(|(l, h)| Predicate::Between(l, h)),
            Operator::NotBetween => self
                .not_between
                .clone()
                .map(|(l, h)| Predicate::NotBetween(l, h)),
        }
    }

    /// Present predicates in emission order.
    pub(crate) fn predicates(&self) -> impl Iterator<Item = Predicate> + '_ {
        Operator::ALL.into_iter().filter_map(|op| self.predicate(op))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn to_sql(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

impl FromStr for OrderDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(OrderDirection::Asc),
            "DESC" => Ok(OrderDirection::Desc),
            _ => Err(QueryError::InvalidOrder(format!(
                "direction must be ASC or DESC, got '{s}'"
            ))),
        }
    }
}

/// NULL placement in ORDER BY
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

impl NullsOrder {
    pub fn to_sql(self) -> &'static str {
        match self {
            NullsOrder::First => "NULLS FIRST",
            NullsOrder::Last => "NULLS LAST",
        }
    }
}

impl FromStr for NullsOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FIRST" | "NULLS FIRST" => Ok(NullsOrder::First),
            "LAST" | "NULLS LAST" => Ok(NullsOrder::Last),
            _ => Err(QueryError::InvalidOrder(format!(
                "nulls order must be FIRST or LAST, got '{s}'"
            ))),
        }
    }
}

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRule {
    pub column: String,
    pub direction: Option<OrderDirection>,
    pub nulls: Option<NullsOrder>,
}

impl OrderRule {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: None,
            nulls: None,
        }
    }

    /// Parse a textual spec such as `"desc"`, `"asc nulls last"` or `"nulls first"`.
    pub fn parse(column: impl Into<String>, spec: &str) -> Result<Self, QueryError> {
        let mut rule = Self::new(column);
        let tokens: Vec<String> = spec
            .split_whitespace()
            .map(str::to_ascii_uppercase)
            .collect();
        let mut rest = tokens.as_slice();

        if let Some(first) = rest.first()
            && first != "NULLS"
        {
            rule.direction = Some(first.parse()?);
            rest = &rest[1..];
        }
        match rest {
            [] => {}
            [nulls, placement] if nulls == "NULLS" => rule.nulls = Some(placement.parse()?),
            _ => return Err(QueryError::InvalidOrder(spec.to_string())),
        }
        Ok(rule)
    }
}

/// `INSERT INTO table` with its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertRule {
    pub table: String,
    pub rows: Vec<Row>,
}

/// `UPDATE table SET ...`
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRule {
    pub table: String,
    pub set: Row,
}

/// Assignments of an upsert's `DO UPDATE SET`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoUpdate {
    /// Columns taken from the rejected row: `"c" = excluded."c"`.
    pub excluded: Vec<String>,
    /// Columns set to explicit values: `"c" = ?`.
    pub merge: Row,
}

impl DoUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn excluded<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.excluded.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn merge(mut self, row: Row) -> Self {
        self.merge = row;
        self
    }
}

/// SQLite's statement-level conflict resolution: `INSERT OR <resolution> INTO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    Rollback,
    Abort,
    Fail,
    Ignore,
    Replace,
}

impl ConflictResolution {
    pub fn to_sql(self) -> &'static str {
        match self {
            ConflictResolution::Rollback => "OR ROLLBACK",
            ConflictResolution::Abort => "OR ABORT",
            ConflictResolution::Fail => "OR FAIL",
            ConflictResolution::Ignore => "OR IGNORE",
            ConflictResolution::Replace => "OR REPLACE",
        }
    }
}

/// What to do when an inserted row violates a uniqueness constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictAction {
    DoNothing,
    DoUpdate(DoUpdate),
    /// Rendered in the INSERT verb rather than as an ON CONFLICT clause.
    Resolve(ConflictResolution),
}

/// `ON CONFLICT (target) DO ...`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnConflict {
    pub target: Vec<String>,
    pub action: Option<ConflictAction>,
}

impl OnConflict {
    /// The `INSERT OR ...` resolution, if that is the chosen action.
    pub fn resolution(&self) -> Option<ConflictResolution> {
        match self.action {
            Some(ConflictAction::Resolve(resolution)) => Some(resolution),
            _ => None,
        }
    }
}

/// The complete accumulated IR of one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDescription {
    pub select: Vec<SelectClause>,
    pub from: Vec<FromClause>,
    pub wheres: Vec<WhereClause>,
    pub order_by: Vec<OrderByClause>,
    pub group_by: Vec<GroupByClause>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub insert: Vec<InsertClause>,
    pub on_conflict: Option<OnConflict>,
    pub update: Vec<UpdateClause>,
    pub returning: Vec<ReturningClause>,
}
