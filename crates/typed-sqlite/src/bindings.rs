//! Placeholder / binding count validation.

use crate::error::{QueryError, QueryResult};
use crate::value::Value;

/// Count `?` placeholders in `sql`.
///
/// Question marks inside single-quoted string literals and double-quoted
/// identifiers are not placeholders. Doubled quotes inside either are escapes.
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut quote: Option<char> = None;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => {
                if chars.peek() == Some(&q) {
                    chars.next();
                } else {
                    quote = None;
                }
            }
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '?' => count += 1,
                _ => {}
            },
        }
    }
    count
}

/// Fail with [`QueryError::BindingMismatch`] unless `sql` has exactly one
/// placeholder per binding.
pub fn validate_bindings(sql: &str, bindings: &[Value]) -> QueryResult<()> {
    let placeholders = count_placeholders(sql);
    if placeholders == bindings.len() {
        return Ok(());
    }
    let rendered = serde_json::to_string(bindings).unwrap_or_else(|_| format!("{bindings:?}"));
    Err(QueryError::BindingMismatch {
        placeholders,
        bindings: bindings.len(),
        sql: sql.to_string(),
        rendered,
    })
}
