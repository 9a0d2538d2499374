//! Error types for typed-sqlite

use thiserror::Error;

/// Result type alias for statement building
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while compiling conditions or assembling a statement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// More distinct columns were referenced in WHERE than the configured ceiling allows
    #[error("Too many conditions: {count} columns referenced, the maximum is {max}")]
    TooManyConditions { count: usize, max: usize },

    /// A BETWEEN / NOT BETWEEN pair with `low > high` or incomparable bounds
    #[error("Invalid range for column '{column}': {low} > {high}")]
    InvalidRange {
        column: String,
        low: String,
        high: String,
    },

    /// Two equality-like AND conditions on the same column
    #[error(
        "Conflicting AND condition on column '{column}': {operator} cannot be combined with an earlier exact condition"
    )]
    ConflictingAndCondition { column: String, operator: String },

    /// Placeholder count of a fragment differs from the number of bindings supplied
    #[error(
        "SQL binding count mismatch: {placeholders} placeholders but got {bindings} bindings.\nSQL: {sql}\nBindings: {rendered}"
    )]
    BindingMismatch {
        placeholders: usize,
        bindings: usize,
        sql: String,
        rendered: String,
    },

    /// SELECT/DELETE without a FROM clause
    #[error("FROM clause is required")]
    MissingFrom,

    /// More than one FROM clause
    #[error("Multiple FROM clauses are not supported")]
    MultipleFrom,

    /// ORDER BY direction/nulls specification that could not be parsed
    #[error("Invalid order specification: {0}")]
    InvalidOrder(String),

    /// LIMIT must be a positive integer
    #[error("Invalid LIMIT value: {0} (must be a positive integer)")]
    InvalidLimit(i64),

    /// OFFSET must be zero or a positive integer
    #[error("Invalid OFFSET value: {0} (must be a non-negative integer)")]
    InvalidOffset(i64),

    /// Too many rows in one INSERT
    #[error("Batch size {size} exceeds the maximum of {max} rows")]
    BatchSizeExceeded { size: usize, max: usize },

    /// INSERT without any row
    #[error("No values to insert")]
    NoValues,

    /// INSERT row / UPDATE set / DO UPDATE without any column
    #[error("No columns specified for {0}")]
    NoColumns(&'static str),

    /// INSERT statement finished without an insert clause
    #[error("No insert clause specified")]
    NoInsertClause,

    /// More than one insert clause in a statement
    #[error("Multiple INSERT clauses are not supported")]
    MultipleInsertClauses,

    /// More than one update clause in a statement
    #[error("Multiple UPDATE clauses are not supported")]
    MultipleUpdateClauses,

    /// `delete()` called more than once
    #[error("Multiple DELETE clauses are not supported")]
    MultipleDeleteClauses,

    /// Table name missing or empty
    #[error("Table name is required for {0}")]
    MissingTable(&'static str),

    /// A second ON CONFLICT action was set
    #[error("ON CONFLICT action is already set")]
    ConflictClauseAlreadySet,

    /// ON CONFLICT clause that cannot be rendered as given
    #[error("Invalid ON CONFLICT clause: {0}")]
    InvalidConflictClause(&'static str),

    /// Column listed both as excluded and merged in DO UPDATE
    #[error("Column '{0}' cannot be set in both excluded and merge of DO UPDATE")]
    DuplicateConflictColumn(String),

    /// Identifier that cannot be rendered safely
    #[error("Invalid identifier '{ident}': {reason}")]
    InvalidIdentifier { ident: String, reason: String },

    /// Payload value that has no SQLite bind representation
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Builder finished with nothing to emit
    #[error("No valid SQL generated")]
    NoValidSqlGenerated,
}

impl QueryError {
    /// Create an invalid identifier error
    pub fn invalid_identifier(ident: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            ident: ident.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    /// Check if this is a binding count mismatch
    pub fn is_binding_mismatch(&self) -> bool {
        matches!(self, Self::BindingMismatch { .. })
    }

    /// Check if this error comes from the condition compiler
    pub fn is_condition_error(&self) -> bool {
        matches!(
            self,
            Self::TooManyConditions { .. }
                | Self::InvalidRange { .. }
                | Self::ConflictingAndCondition { .. }
        )
    }

    /// Check if this error is about statement shape (missing or repeated clauses)
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MissingFrom
                | Self::MultipleFrom
                | Self::NoInsertClause
                | Self::MultipleInsertClauses
                | Self::MultipleUpdateClauses
                | Self::MultipleDeleteClauses
                | Self::MissingTable(_)
                | Self::ConflictClauseAlreadySet
                | Self::InvalidConflictClause(_)
                | Self::NoValidSqlGenerated
        )
    }
}
