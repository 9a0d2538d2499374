use super::mixin::returning_methods;
use super::statement::Statement;
use crate::clause::{
    Clause, ConflictAction, ConflictResolution, DoUpdate, InsertRule, OnConflict, QueryDescription, Raw,
};
use crate::config::Limits;
use crate::error::{QueryError, QueryResult};
use crate::units::{conflict_unit, insert_unit, returning_unit};
use crate::value::{Row, SqlWithBindings, Value};

/// INSERT statement builder.
///
/// Produces one statement per run of rows sharing a column set; the ON CONFLICT
/// and RETURNING clauses are appended to each.
#[derive(Debug, Clone, Default)]
pub struct InsertQuery {
    desc: QueryDescription,
    limits: Limits,
    build_error: Option<QueryError>,
}

impl InsertQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    fn push_insert(mut self, clause: Clause<InsertRule>) -> Self {
        if !self.desc.insert.is_empty() {
            self.build_error.get_or_insert(QueryError::MultipleInsertClauses);
        }
        self.desc.insert.push(clause);
        self
    }

    /// Target table. A second call is an error.
    pub fn insert(self, table: impl Into<String>) -> Self {
        self.push_insert(Clause::Rule(InsertRule {
            table: table.into(),
            rows: Vec::new(),
        }))
    }

    /// Raw `INSERT ...` text. A second call is an error.
    pub fn insert_raw<I, V>(self, sql: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_insert(Clause::Raw(Raw::new(
            sql,
            super::mixin::collect_bindings(bindings),
        )))
    }

    /// Append one row.
    pub fn values(self, row: Row) -> Self {
        self.values_many([row])
    }

    /// Append several rows.
    pub fn values_many(mut self, rows: impl IntoIterator<Item = Row>) -> Self {
        match self.desc.insert.last_mut() {
            Some(Clause::Rule(rule)) => rule.rows.extend(rows),
            _ => {
                self.build_error.get_or_insert(QueryError::NoInsertClause);
            }
        }
        self
    }

    /// Conflict target columns. A second call is an error.
    pub fn on_conflict<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        let conflict = self.desc.on_conflict.get_or_insert_with(OnConflict::default);
        if !conflict.target.is_empty() {
            self.build_error.get_or_insert(QueryError::ConflictClauseAlreadySet);
            return self;
        }
        conflict.target = columns.into_iter().map(Into::into).collect();
        self
    }

    fn set_conflict_action(mut self, action: ConflictAction) -> Self {
        let conflict = self.desc.on_conflict.get_or_insert_with(OnConflict::default);
        if conflict.action.is_some() {
            self.build_error.get_or_insert(QueryError::ConflictClauseAlreadySet);
            return self;
        }
        conflict.action = Some(action);
        self
    }

    /// `ON CONFLICT ... DO NOTHING`
    pub fn do_nothing(self) -> Self {
        self.set_conflict_action(ConflictAction::DoNothing)
    }

    /// `ON CONFLICT ... DO UPDATE SET ...`
    pub fn do_update(self, update: DoUpdate) -> Self {
        self.set_conflict_action(ConflictAction::DoUpdate(update))
    }

    /// `INSERT OR ROLLBACK INTO ...`
    pub fn rollback(self) -> Self {
        self.set_conflict_action(ConflictAction::Resolve(ConflictResolution::Rollback))
    }

    /// `INSERT OR ABORT INTO ...`
    pub fn abort(self) -> Self {
        self.set_conflict_action(ConflictAction::Resolve(ConflictResolution::Abort))
    }

    /// `INSERT OR FAIL INTO ...`
    pub fn fail(self) -> Self {
        self.set_conflict_action(ConflictAction::Resolve(ConflictResolution::Fail))
    }

    /// `INSERT OR IGNORE INTO ...`
    pub fn ignore(self) -> Self {
        self.set_conflict_action(ConflictAction::Resolve(ConflictResolution::Ignore))
    }

    /// `INSERT OR REPLACE INTO ...`
    pub fn replace(self) -> Self {
        self.set_conflict_action(ConflictAction::Resolve(ConflictResolution::Replace))
    }

    returning_methods!();

    pub fn description(&self) -> &QueryDescription {
        &self.desc
    }

    /// Build one `(sql, bindings)` pair per homogeneous batch of rows.
    pub fn to_sql(&self) -> QueryResult<Vec<SqlWithBindings>> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        let d = &self.desc;
        let resolution = d.on_conflict.as_ref().and_then(OnConflict::resolution);
        let batches = insert_unit(&d.insert, resolution, &self.limits)?;
        let conflict = match &d.on_conflict {
            Some(conflict) => conflict_unit(conflict)?,
            None => SqlWithBindings::empty(),
        };
        let returning = returning_unit(&d.returning)?;

        batches
            .into_iter()
            .map(|batch| {
                let mut stmt = Statement::new("insert");
                stmt.push(batch);
                stmt.push(conflict.clone());
                stmt.push(returning.clone());
                stmt.finish()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn test_insert_many_rows() {
        let out = InsertQuery::new()
            .insert("users")
            .values(row! { "name" => "John", "age" => 25 })
            .values(row! { "name" => "Jane", "age" => 30 })
            .to_sql()
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0].sql,
            r#"INSERT INTO "users" ("age", "name") VALUES (?, ?), (?, ?);"#
        );
        assert_eq!(
            out[0].bindings,
            Vec::<Value>::from([25.into(), "John".into(), 30.into(), "Jane".into()])
        );
    }

    #[test]
    fn test_insert_heterogeneous_groups() {
        let out = InsertQuery::new()
            .insert("users")
            .values_many([
                row! { "name" => "John", "age" => 25 },
                row! { "name" => "Jane", "age" => 30, "role" => "admin" },
            ])
            .returning(["id", "created_at"])
            .to_sql()
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[0].sql,
            r#"INSERT INTO "users" ("age", "name") VALUES (?, ?) RETURNING "id", "created_at";"#
        );
        assert_eq!(
            out[1].sql,
            r#"INSERT INTO "users" ("age", "name", "role") VALUES (?, ?, ?) RETURNING "id", "created_at";"#
        );
        assert_eq!(out[1].bindings.len(), 3);
    }

    #[test]
    fn test_upsert() {
        let out = InsertQuery::new()
            .insert("users")
            .values(row! { "email" => "a@x.io", "name" => "Ann", "logins" => 1 })
            .on_conflict(["email"])
            .do_update(
                DoUpdate::new()
                    .excluded(["name"])
                    .merge(row! { "logins" => 2 }),
            )
            .to_sql()
            .unwrap();
        assert_eq!(
            out[0].sql,
            r#"INSERT INTO "users" ("email", "logins", "name") VALUES (?, ?, ?) ON CONFLICT ("email") DO UPDATE SET "name" = excluded."name", "logins" = ?;"#
        );
        assert_eq!(
            out[0].bindings,
            Vec::<Value>::from(["a@x.io".into(), 1.into(), "Ann".into(), 2.into()])
        );
    }

    #[test]
    fn test_do_nothing_on_every_batch() {
        let out = InsertQuery::new()
            .insert("tags")
            .values_many([row! { "name" => "a" }, row! { "name" => "b", "color" => "red" }])
            .on_conflict(["name"])
            .do_nothing()
            .to_sql()
            .unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|s| s.sql.ends_with(r#"ON CONFLICT ("name") DO NOTHING;"#)));
    }

    #[test]
    fn test_insert_guards() {
        assert_eq!(
            InsertQuery::new().to_sql().unwrap_err(),
            QueryError::NoInsertClause
        );
        assert_eq!(
            InsertQuery::new().values(row! {"a" => 1}).to_sql().unwrap_err(),
            QueryError::NoInsertClause
        );
        assert_eq!(
            InsertQuery::new().insert("a").insert("b").to_sql().unwrap_err(),
            QueryError::MultipleInsertClauses
        );
        assert_eq!(
            InsertQuery::new().insert("a").to_sql().unwrap_err(),
            QueryError::NoValues
        );
        assert_eq!(
            InsertQuery::new()
                .insert("a")
                .values(row! {"x" => 1})
                .do_nothing()
                .do_nothing()
                .to_sql()
                .unwrap_err(),
            QueryError::ConflictClauseAlreadySet
        );
    }

    #[test]
    fn test_conflict_resolutions() {
        let out = InsertQuery::new()
            .insert("users")
            .values(row! { "email" => "a@x.io" })
            .replace()
            .returning(["id"])
            .to_sql()
            .unwrap();
        assert_eq!(
            out[0].sql,
            r#"INSERT OR REPLACE INTO "users" ("email") VALUES (?) RETURNING "id";"#
        );

        let cases = [
            (InsertQuery::rollback as fn(InsertQuery) -> InsertQuery, "ROLLBACK"),
            (InsertQuery::abort, "ABORT"),
            (InsertQuery::fail, "FAIL"),
            (InsertQuery::ignore, "IGNORE"),
        ];
        for (resolve, keyword) in cases {
            let out = resolve(InsertQuery::new().insert("t").values(row! { "a" => 1 }))
                .to_sql()
                .unwrap();
            assert_eq!(
                out[0].sql,
                format!(r#"INSERT OR {keyword} INTO "t" ("a") VALUES (?);"#)
            );
        }
    }

    #[test]
    fn test_conflict_resolution_guards() {
        let base = || InsertQuery::new().insert("t").values(row! { "a" => 1 });
        assert_eq!(
            base().replace().ignore().to_sql().unwrap_err(),
            QueryError::ConflictClauseAlreadySet
        );
        assert_eq!(
            base().do_nothing().replace().to_sql().unwrap_err(),
            QueryError::ConflictClauseAlreadySet
        );
        assert!(matches!(
            base().on_conflict(["a"]).replace().to_sql(),
            Err(QueryError::InvalidConflictClause(_))
        ));
    }

    #[test]
    fn test_on_conflict_without_action() {
        let query = InsertQuery::new()
            .insert("users")
            .values(row! { "email" => "a@x.io" })
            .on_conflict(["email"]);
        assert_eq!(
            query.to_sql().unwrap_err(),
            QueryError::InvalidConflictClause("ON CONFLICT needs DO NOTHING or DO UPDATE")
        );
        let conflict = query.description().on_conflict.as_ref().unwrap();
        assert_eq!(conflict.target, vec![String::from("email")]);
        assert!(conflict.action.is_none());
    }

    #[test]
    fn test_insert_raw() {
        let out = InsertQuery::new()
            .insert_raw("INSERT INTO logs (msg) VALUES (?)", ["boot"])
            .to_sql()
            .unwrap();
        assert_eq!(out[0].sql, "INSERT INTO logs (msg) VALUES (?);");
        assert_eq!(out[0].bindings, vec![Value::from("boot")]);
    }

    #[test]
    fn test_batch_ceiling_from_limits() {
        let rows = (0..3).map(|i| row! { "n" => i });
        let err = InsertQuery::with_limits(Limits::new().with_max_batch_size(2))
            .insert("t")
            .values_many(rows)
            .to_sql()
            .unwrap_err();
        assert_eq!(err, QueryError::BatchSizeExceeded { size: 3, max: 2 });
    }
}
