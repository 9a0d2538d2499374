//! End-to-end statement generation through the public API.

use typed_sqlite::clause::ColumnFilter;
use typed_sqlite::{
    DoUpdate, Limits, Operators, QueryBuilder, QueryError, Row, SqlWithBindings, ToStatements,
    Value, WhereCondition, delete_from, insert_into, row, select, select_all, update,
};

fn placeholders_match(out: &SqlWithBindings) -> bool {
    typed_sqlite::bindings::count_placeholders(&out.sql) == out.bindings.len()
}

#[test]
fn select_with_mixed_conditions() {
    let out = select(["id", "name"])
        .from("users")
        .and_where(
            WhereCondition::new()
                .op("age", Operators::new().gte(18).lte(60))
                .eq("status", "active"),
        )
        .or_where(WhereCondition::new().op("score", Operators::new().gt(80)))
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        r#"SELECT "id", "name" FROM "users" WHERE "age" >= ? AND "age" <= ? AND "status" = ? OR "score" > ?;"#
    );
    assert_eq!(
        out.bindings,
        vec![
            Value::from(18),
            Value::from(60),
            Value::from("active"),
            Value::from(80)
        ]
    );
    assert!(placeholders_match(&out));
}

#[test]
fn select_or_merges() {
    let out = select_all()
        .from("products")
        .or_where(WhereCondition::new().op("price", Operators::new().lt(10)))
        .or_where(WhereCondition::new().op("price", Operators::new().lt(20)))
        .or_where(WhereCondition::new().op("name", Operators::new().like("Pro%")))
        .or_where(WhereCondition::new().op("name", Operators::new().like("Pro Max%")))
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        r#"SELECT * FROM "products" WHERE "price" < ? OR "name" LIKE ?;"#
    );
    assert_eq!(out.bindings, vec![Value::from(20), Value::from("Pro%")]);
}

#[test]
fn select_with_qualified_columns() {
    let out = select(["u.name", "o.*"])
        .from_raw(r#""users" AS u JOIN "orders" AS o ON o.user_id = u.id"#, Vec::<Value>::new())
        .and_where(WhereCondition::new().filter("o.total", ColumnFilter::Value(Value::from(5))))
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        r#"SELECT "u"."name", "o".* FROM "users" AS u JOIN "orders" AS o ON o.user_id = u.id WHERE "o"."total" = ?;"#
    );
}

#[test]
fn insert_batches_follow_row_order() {
    let rows = vec![
        row! { "name" => "a", "age" => 1 },
        row! { "name" => "b", "age" => 2 },
        row! { "name" => "c" },
        row! { "name" => "d", "age" => 4 },
    ];
    let out = insert_into("people").values_many(rows).to_sql().unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(
        out[0].sql,
        r#"INSERT INTO "people" ("age", "name") VALUES (?, ?), (?, ?);"#
    );
    assert_eq!(out[1].sql, r#"INSERT INTO "people" ("name") VALUES (?);"#);
    assert_eq!(out[2].bindings, vec![Value::from(4), Value::from("d")]);
    assert!(out.iter().all(placeholders_match));
}

#[test]
fn insert_from_json_payload() {
    let payload = serde_json::json!({ "title": "Hello", "views": 3, "draft": false });
    let out = insert_into("posts")
        .values(Row::from_json(payload).unwrap())
        .to_sql()
        .unwrap();
    assert_eq!(
        out[0].sql,
        r#"INSERT INTO "posts" ("draft", "title", "views") VALUES (?, ?, ?);"#
    );
    assert_eq!(
        out[0].bindings,
        vec![Value::from(0), Value::from("Hello"), Value::from(3)]
    );
}

#[test]
fn upsert_merge_bindings_follow_values() {
    let out = insert_into("counters")
        .values(row! { "key" => "hits", "n" => 1 })
        .on_conflict(["key"])
        .do_update(DoUpdate::new().merge(row! { "n" => 100 }))
        .to_sql()
        .unwrap();
    assert_eq!(
        out[0].sql,
        r#"INSERT INTO "counters" ("key", "n") VALUES (?, ?) ON CONFLICT ("key") DO UPDATE SET "n" = ?;"#
    );
    assert_eq!(
        out[0].bindings,
        vec![Value::from("hits"), Value::from(1), Value::from(100)]
    );
}

#[test]
fn upsert_rejects_column_in_both_lists() {
    let err = insert_into("users")
        .values(row! { "email" => "x", "name" => "y" })
        .on_conflict(["email"])
        .do_update(
            DoUpdate::new()
                .excluded(["name"])
                .merge(row! { "name" => "z" }),
        )
        .to_sql()
        .unwrap_err();
    assert_eq!(err, QueryError::DuplicateConflictColumn("name".to_string()));
}

#[test]
fn insert_or_replace() {
    let out = insert_into("users")
        .values_many([
            row! { "id" => 1, "email" => "a@x.io" },
            row! { "id" => 2, "email" => "b@x.io" },
        ])
        .replace()
        .to_statements()
        .unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(
        out[0].sql,
        r#"INSERT OR REPLACE INTO "users" ("email", "id") VALUES (?, ?), (?, ?);"#
    );
    assert!(placeholders_match(&out[0]));
}

#[test]
fn conflict_target_needs_an_action() {
    let err = insert_into("users")
        .values(row! { "email" => "a@x.io" })
        .on_conflict(["email"])
        .to_sql()
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidConflictClause(_)));

    let err = insert_into("users")
        .values(row! { "email" => "a@x.io" })
        .ignore()
        .do_nothing()
        .to_sql()
        .unwrap_err();
    assert_eq!(err, QueryError::ConflictClauseAlreadySet);
}

#[test]
fn update_from_other_table() {
    let out = update("employees")
        .set("salary", 5000)
        .from("salary_updates")
        .and_where(WhereCondition::new().op(
            "employees.id",
            Operators::new().eq_column("salary_updates.employee_id"),
        ))
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        r#"UPDATE "employees" SET "salary" = ? FROM "salary_updates" WHERE "employees"."id" = "salary_updates"."employee_id";"#
    );
    assert_eq!(out.bindings, vec![Value::from(5000)]);
}

#[test]
fn delete_with_returning() {
    let out = delete_from("sessions")
        .and_where(WhereCondition::new().op("user_id", Operators::new().in_list([1, 2])))
        .returning(["id", "created_at"])
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        r#"DELETE FROM "sessions" WHERE "user_id" IN (?, ?) RETURNING "id", "created_at";"#
    );
}

#[test]
fn names_sqlite_accepts_are_quoted() {
    let out = select(["first name"]).from("user-data").to_sql().unwrap();
    assert_eq!(out.sql, r#"SELECT "first name" FROM "user-data";"#);
}

#[test]
fn hostile_names_stay_inside_quotes() {
    let out = select(["name; DROP TABLE users"])
        .from("users")
        .where_eq(r#"id" = 1 OR "1"#, 1)
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        r#"SELECT "name; DROP TABLE users" FROM "users" WHERE "id"" = 1 OR ""1" = ?;"#
    );
    assert!(placeholders_match(&out));

    let err = select(["bad\0name"]).from("users").to_sql().unwrap_err();
    assert!(matches!(err, QueryError::InvalidIdentifier { .. }));
}

#[test]
fn custom_limits() {
    let qb = QueryBuilder::with_limits(Limits::new().with_max_conditions(3));
    assert_eq!(qb.limits().max_conditions, 3);
    assert_eq!(qb.limits().max_batch_size, Limits::default().max_batch_size);
    let mut q = qb.select_all().from("wide");
    for i in 0..4 {
        q = q.where_eq(format!("c{i}"), i);
    }
    assert_eq!(
        q.to_sql().unwrap_err(),
        QueryError::TooManyConditions { count: 4, max: 3 }
    );
}

#[test]
fn limits_from_json_config() {
    let limits: Limits = serde_json::from_str(r#"{ "max_batch_size": 2 }"#).unwrap();
    assert_eq!(limits.max_conditions, 1000);
    let err = QueryBuilder::with_limits(limits)
        .insert_into("t")
        .values_many((0..3).map(|i| row! { "n" => i }))
        .to_statements()
        .unwrap_err();
    assert_eq!(err, QueryError::BatchSizeExceeded { size: 3, max: 2 });
}

#[test]
fn bindings_serialize_as_json() {
    let out = select_all()
        .from("t")
        .where_eq("name", "O'Brien")
        .limit(1)
        .to_sql()
        .unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "sql": r#"SELECT * FROM "t" WHERE "name" = ? LIMIT ?;"#,
            "bindings": ["O'Brien", 1]
        })
    );
}
