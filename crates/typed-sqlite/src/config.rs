use serde::Deserialize;

/// Default ceiling on distinct columns referenced by one statement's WHERE conditions.
pub const DEFAULT_MAX_CONDITIONS: usize = 1000;

/// Default ceiling on rows in one INSERT statement.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10_000;

/// Ceilings enforced while building statements.
///
/// Deserializable so a host application can keep these next to its other
/// settings; missing fields fall back to the defaults.
///
/// ```ignore
/// use typed_sqlite::{Limits, QueryBuilder};
///
/// let qb = QueryBuilder::with_limits(Limits::new().with_max_batch_size(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum number of distinct columns in WHERE / OR WHERE conditions.
    pub max_conditions: usize,
    /// Maximum number of rows a single insert clause may carry.
    pub max_batch_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_conditions: DEFAULT_MAX_CONDITIONS,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl Limits {
    /// Create limits with the default ceilings (1000 columns, 10000 rows).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of distinct WHERE columns.
    pub fn with_max_conditions(mut self, max: usize) -> Self {
        self.max_conditions = max;
        self
    }

    /// Set the maximum number of rows per insert clause.
    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let limits = Limits::new();
        assert_eq!(limits.max_conditions, 1000);
        assert_eq!(limits.max_batch_size, 10_000);
    }

    #[test]
    fn deserialize_partial() {
        let limits: Limits = serde_json::from_str(r#"{"max_batch_size": 50}"#).unwrap();
        assert_eq!(limits.max_batch_size, 50);
        assert_eq!(limits.max_conditions, DEFAULT_MAX_CONDITIONS);
    }
}
