//! Bind values, row payloads and finished `(sql, bindings)` pairs.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// A value bound to a `?` placeholder.
///
/// Mirrors SQLite's storage classes minus BLOB. Booleans convert to `0`/`1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

/// Ordered bind values of a fragment or statement.
pub type Bindings = Vec<Value>;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Compare two values when they are mutually comparable.
    ///
    /// Integers and reals compare numerically with each other, text compares with text.
    /// Everything else (including NULL) is incomparable and yields `None`.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Real(b)) => (*a as f64).partial_cmp(b),
            (Value::Real(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Real(a), Value::Real(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Equality used for de-duplicating IN lists (`1` and `1.0` are the same value).
    pub(crate) fn same_as(&self, other: &Value) -> bool {
        match self.compare(other) {
            Some(ord) => ord == Ordering::Equal,
            None => self.is_null() && other.is_null(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "'{v}'"),
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Integer(i64::from(v))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Real(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = QueryError;

    fn try_from(v: serde_json::Value) -> QueryResult<Self> {
        match v {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::from(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Integer(i)),
                None => n
                    .as_f64()
                    .map(Value::Real)
                    .ok_or_else(|| QueryError::invalid_value(format!("unrepresentable number {n}"))),
            },
            serde_json::Value::String(s) => Ok(Value::Text(s)),
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => Err(
                QueryError::invalid_value(format!("cannot bind JSON value {other}")),
            ),
        }
    }
}

/// Column → value payload for INSERT rows and UPDATE sets.
///
/// Columns are kept sorted, so every rendering of a row lists them in the same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value (builder style).
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column value in place, replacing any previous value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column names in sorted order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build a row from a JSON object.
    pub fn from_json(json: serde_json::Value) -> QueryResult<Self> {
        match json {
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| Value::try_from(v).map(|v| (k, v)))
                .collect(),
            other => Err(QueryError::invalid_value(format!(
                "expected a JSON object for a row, got {other}"
            ))),
        }
    }

    /// Whether both rows have exactly the same column set.
    pub(crate) fn same_columns(&self, other: &Row) -> bool {
        self.0.len() == other.0.len() && self.0.keys().eq(other.0.keys())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build a [`Row`] from `column => value` pairs.
///
/// ```ignore
/// let row = typed_sqlite::row! { "name" => "John", "age" => 25 };
/// ```
#[macro_export]
macro_rules! row {
    () => {
        $crate::Row::new()
    };
    ($($col:expr => $val:expr),+ $(,)?) => {{
        let mut row = $crate::Row::new();
        $( row.insert($col, $val); )+
        row
    }};
}

/// A finished statement or fragment: SQL text plus its positional bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SqlWithBindings {
    pub sql: String,
    pub bindings: Bindings,
}

impl SqlWithBindings {
    pub fn new(sql: impl Into<String>, bindings: Bindings) -> Self {
        Self {
            sql: sql.into(),
            bindings,
        }
    }

    /// A fragment without bindings.
    pub fn sql(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }

    /// The empty fragment, skipped during statement assembly.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sql.trim().is_empty()
    }

    pub fn into_parts(self) -> (String, Bindings) {
        (self.sql, self.bindings)
    }
}

impl From<SqlWithBindings> for (String, Bindings) {
    fn from(s: SqlWithBindings) -> Self {
        s.into_parts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_comparison_crosses_integer_and_real() {
        assert_eq!(Value::from(2).compare(&Value::from(2.5)), Some(Ordering::Less));
        assert_eq!(Value::from(3.0).compare(&Value::from(3)), Some(Ordering::Equal));
        assert_eq!(Value::from("a").compare(&Value::from(1)), None);
        assert_eq!(Value::Null.compare(&Value::Null), None);
    }

    #[test]
    fn option_and_bool_conversions() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
        assert_eq!(Value::from(true), Value::Integer(1));
    }

    #[test]
    fn value_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Null,
            Value::from(1),
            Value::from(1.5),
            Value::from("a"),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,1,1.5,"a"]"#);
    }

    #[test]
    fn row_from_json() {
        let row = Row::from_json(serde_json::json!({"name": "John", "age": 25, "active": true}))
            .unwrap();
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["active", "age", "name"]);
        assert_eq!(row.get("active"), Some(&Value::Integer(1)));

        let err = Row::from_json(serde_json::json!({"tags": ["a"]})).unwrap_err();
        assert!(matches!(err, QueryError::InvalidValue(_)));
        assert!(Row::from_json(serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn row_macro_sorts_columns() {
        let row = row! { "b" => 2, "a" => "x" };
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(row.same_columns(&Row::new().set("a", 0).set("b", 0)));
        assert!(!row.same_columns(&Row::new().set("a", 0)));
    }
}
