//! Internal logging helpers, compiled out without the `tracing` feature.

/// Longest SQL text (in bytes) included in a statement event.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) const MAX_LOGGED_SQL: usize = 200;

/// Emit a `trace` event on the compiler target.
macro_rules! trace_compiler {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!(target: "typed_sqlite.compiler", $($arg)*);
        }
    };
}

pub(crate) use trace_compiler;

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Emit a `debug` event for a finished statement.
#[cfg(feature = "tracing")]
pub(crate) fn statement_built(kind: &'static str, sql: &str, binding_count: usize) {
    let shown = truncate_sql_bytes(sql, MAX_LOGGED_SQL);
    let truncated = shown.len() < sql.len();
    tracing::debug!(
        target: "typed_sqlite.sql",
        kind,
        binding_count,
        truncated,
        sql = %shown,
        "statement built"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn statement_built(_kind: &'static str, _sql: &str, _binding_count: usize) {}
