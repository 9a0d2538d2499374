use crate::bindings::validate_bindings;
use crate::error::{QueryError, QueryResult};
use crate::trace;
use crate::value::{Bindings, SqlWithBindings};

/// Concatenates clause fragments into one terminated statement.
#[derive(Debug)]
pub(crate) struct Statement {
    kind: &'static str,
    sql: String,
    bindings: Bindings,
}

impl Statement {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            sql: String::new(),
            bindings: Bindings::new(),
        }
    }

    /// Append a fragment; empty fragments are skipped along with their bindings.
    pub fn push(&mut self, fragment: SqlWithBindings) {
        let sql = fragment.sql.trim();
        if sql.is_empty() {
            return;
        }
        if !self.sql.is_empty() {
            self.sql.push(' ');
        }
        self.sql.push_str(sql);
        self.bindings.extend(fragment.bindings);
    }

    pub fn finish(mut self) -> QueryResult<SqlWithBindings> {
        if self.sql.is_empty() {
            return Err(QueryError::NoValidSqlGenerated);
        }
        self.sql.push(';');
        validate_bindings(&self.sql, &self.bindings)?;
        trace::statement_built(self.kind, &self.sql, self.bindings.len());
        Ok(SqlWithBindings::new(self.sql, self.bindings))
    }
}
