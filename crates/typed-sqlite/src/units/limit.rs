use crate::error::{QueryError, QueryResult};
use crate::value::SqlWithBindings;

/// `LIMIT ?`; the limit must be strictly positive.
pub fn limit_unit(limit: Option<i64>) -> QueryResult<SqlWithBindings> {
    match limit {
        None => Ok(SqlWithBindings::empty()),
        Some(n) if n > 0 => Ok(SqlWithBindings::new("LIMIT ?", vec![n.into()])),
        Some(n) => Err(QueryError::InvalidLimit(n)),
    }
}

/// `OFFSET ?`; zero is the default and is omitted.
pub fn offset_unit(offset: Option<i64>) -> QueryResult<SqlWithBindings> {
    match offset {
        None | Some(0) => Ok(SqlWithBindings::empty()),
        Some(n) if n > 0 => Ok(SqlWithBindings::new("OFFSET ?", vec![n.into()])),
        Some(n) => Err(QueryError::InvalidOffset(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn limit() {
        assert!(limit_unit(None).unwrap().is_empty());
        let out = limit_unit(Some(10)).unwrap();
        assert_eq!(out.sql, "LIMIT ?");
        assert_eq!(out.bindings, Vec::<Value>::from([10.into()]));
        assert_eq!(limit_unit(Some(0)).unwrap_err(), QueryError::InvalidLimit(0));
        assert_eq!(limit_unit(Some(-1)).unwrap_err(), QueryError::InvalidLimit(-1));
    }

    #[test]
    fn offset() {
        assert!(offset_unit(None).unwrap().is_empty());
        assert!(offset_unit(Some(0)).unwrap().is_empty());
        assert_eq!(offset_unit(Some(20)).unwrap().sql, "OFFSET ?");
        assert_eq!(offset_unit(Some(-5)).unwrap_err(), QueryError::InvalidOffset(-5));
    }
}
