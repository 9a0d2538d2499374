//! Clause concerns shared by several statement builders.
//!
//! Each macro expands, inside a builder's `impl` block, to the chained methods for
//! one concern. Every builder owns a `desc: QueryDescription` and a
//! `build_error: Option<QueryError>`; the generated methods only append to `desc`
//! or record the first error.

use crate::value::{Bindings, Value};

pub(crate) fn collect_bindings<I, V>(bindings: I) -> Bindings
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    bindings.into_iter().map(Into::into).collect()
}

/// WHERE / OR WHERE.
macro_rules! where_methods {
    () => {
        /// Add conditions joined to the rest of the statement with `AND`.
        pub fn and_where(mut self, condition: $crate::clause::WhereCondition) -> Self {
            self.desc
                .wheres
                .push($crate::clause::WhereClause::and(condition));
            self
        }

        /// Add conditions joined to the rest of the statement with `OR`.
        pub fn or_where(mut self, condition: $crate::clause::WhereCondition) -> Self {
            self.desc
                .wheres
                .push($crate::clause::WhereClause::or(condition));
            self
        }

        /// `AND column = value`
        pub fn where_eq(
            self,
            column: impl Into<String>,
            value: impl Into<$crate::value::Value>,
        ) -> Self {
            self.and_where($crate::clause::WhereCondition::new().eq(column, value))
        }

        /// `OR column = value`
        pub fn or_where_eq(
            self,
            column: impl Into<String>,
            value: impl Into<$crate::value::Value>,
        ) -> Self {
            self.or_where($crate::clause::WhereCondition::new().eq(column, value))
        }

        /// `AND <sql>` with bindings for its placeholders.
        pub fn where_raw<I, V>(mut self, sql: impl Into<String>, bindings: I) -> Self
        where
            I: IntoIterator<Item = V>,
            V: Into<$crate::value::Value>,
        {
            self.desc.wheres.push($crate::clause::WhereClause::raw(
                $crate::clause::Combinator::And,
                sql,
                $crate::query::mixin::collect_bindings(bindings),
            ));
            self
        }

        /// `OR <sql>` with bindings for its placeholders.
        pub fn or_where_raw<I, V>(mut self, sql: impl Into<String>, bindings: I) -> Self
        where
            I: IntoIterator<Item = V>,
            V: Into<$crate::value::Value>,
        {
            self.desc.wheres.push($crate::clause::WhereClause::raw(
                $crate::clause::Combinator::Or,
                sql,
                $crate::query::mixin::collect_bindings(bindings),
            ));
            self
        }
    };
}

/// FROM.
macro_rules! from_methods {
    () => {
        pub fn from(mut self, table: impl Into<String>) -> Self {
            self.desc
                .from
                .push($crate::clause::Clause::Rule(table.into()));
            self
        }

        /// Raw FROM source (subquery, join list, table-valued function).
        pub fn from_raw<I, V>(mut self, sql: impl Into<String>, bindings: I) -> Self
        where
            I: IntoIterator<Item = V>,
            V: Into<$crate::value::Value>,
        {
            self.desc
                .from
                .push($crate::clause::Clause::Raw($crate::clause::Raw::new(
                    sql,
                    $crate::query::mixin::collect_bindings(bindings),
                )));
            self
        }
    };
}

/// ORDER BY.
macro_rules! order_methods {
    () => {
        pub fn order_by(self, column: impl Into<String>) -> Self {
            self.order_by_rule($crate::clause::OrderRule::new(column))
        }

        pub fn order_by_asc(self, column: impl Into<String>) -> Self {
            self.order_by_rule($crate::clause::OrderRule {
                direction: Some($crate::clause::OrderDirection::Asc),
                ..$crate::clause::OrderRule::new(column)
            })
        }

        pub fn order_by_desc(self, column: impl Into<String>) -> Self {
            self.order_by_rule($crate::clause::OrderRule {
                direction: Some($crate::clause::OrderDirection::Desc),
                ..$crate::clause::OrderRule::new(column)
            })
        }

        /// Order with explicit NULL placement.
        pub fn order_by_nulls(
            self,
            column: impl Into<String>,
            direction: Option<$crate::clause::OrderDirection>,
            nulls: $crate::clause::NullsOrder,
        ) -> Self {
            self.order_by_rule($crate::clause::OrderRule {
                column: column.into(),
                direction,
                nulls: Some(nulls),
            })
        }

        /// Order using a textual spec such as `"desc nulls last"`.
        ///
        /// An unparseable spec is reported by `to_sql()`.
        pub fn order_by_spec(mut self, column: impl Into<String>, spec: &str) -> Self {
            match $crate::clause::OrderRule::parse(column, spec) {
                Ok(rule) => self.order_by_rule(rule),
                Err(err) => {
                    self.build_error.get_or_insert(err);
                    self
                }
            }
        }

        pub fn order_by_rule(mut self, rule: $crate::clause::OrderRule) -> Self {
            self.desc.order_by.push($crate::clause::Clause::Rule(rule));
            self
        }

        pub fn order_by_raw<I, V>(mut self, sql: impl Into<String>, bindings: I) -> Self
        where
            I: IntoIterator<Item = V>,
            V: Into<$crate::value::Value>,
        {
            self.desc
                .order_by
                .push($crate::clause::Clause::Raw($crate::clause::Raw::new(
                    sql,
                    $crate::query::mixin::collect_bindings(bindings),
                )));
            self
        }
    };
}

/// GROUP BY.
macro_rules! group_methods {
    () => {
        pub fn group_by(mut self, column: impl Into<String>) -> Self {
            self.desc
                .group_by
                .push($crate::clause::Clause::Rule(column.into()));
            self
        }

        pub fn group_by_cols<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
            self.desc.group_by.extend(
                columns
                    .into_iter()
                    .map(|c| $crate::clause::Clause::Rule(c.into())),
            );
            self
        }

        pub fn group_by_raw<I, V>(mut self, sql: impl Into<String>, bindings: I) -> Self
        where
            I: IntoIterator<Item = V>,
            V: Into<$crate::value::Value>,
        {
            self.desc
                .group_by
                .push($crate::clause::Clause::Raw($crate::clause::Raw::new(
                    sql,
                    $crate::query::mixin::collect_bindings(bindings),
                )));
            self
        }
    };
}

/// LIMIT.
macro_rules! limit_methods {
    () => {
        /// Must be positive; checked by `to_sql()`.
        pub fn limit(mut self, n: i64) -> Self {
            self.desc.limit = Some(n);
            self
        }
    };
}

/// RETURNING.
macro_rules! returning_methods {
    () => {
        pub fn returning<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
            self.desc.returning.push($crate::clause::Clause::Rule(
                columns.into_iter().map(Into::into).collect(),
            ));
            self
        }

        pub fn returning_all(self) -> Self {
            self.returning(["*"])
        }

        pub fn returning_raw<I, V>(mut self, sql: impl Into<String>, bindings: I) -> Self
        where
            I: IntoIterator<Item = V>,
            V: Into<$crate::value::Value>,
        {
            self.desc
                .returning
                .push($crate::clause::Clause::Raw($crate::clause::Raw::new(
                    sql,
                    $crate::query::mixin::collect_bindings(bindings),
                )));
            self
        }
    };
}

pub(crate) use from_methods;
pub(crate) use group_methods;
pub(crate) use limit_methods;
pub(crate) use order_methods;
pub(crate) use returning_methods;
pub(crate) use where_methods;
