//! Clause-unit emitters.
//!
//! One pure function per clause kind, turning accumulated IR into a
//! [`SqlWithBindings`] fragment. An empty fragment means "omit the clause".

mod from;
mod group;
mod insert;
mod limit;
mod order;
mod returning;
mod select;
mod update;
mod where_clause;

pub use from::from_unit;
pub use group::group_unit;
pub use insert::{conflict_unit, insert_unit};
pub use limit::{limit_unit, offset_unit};
pub use order::order_unit;
pub use returning::returning_unit;
pub use select::select_unit;
pub use update::update_unit;
pub use where_clause::where_unit;

use crate::bindings::validate_bindings;
use crate::clause::Raw;
use crate::error::QueryResult;
use crate::value::{Bindings, SqlWithBindings, Value};

/// A raw fragment after checking its bindings against its own placeholders.
pub(crate) fn raw_fragment(raw: &Raw) -> QueryResult<SqlWithBindings> {
    validate_bindings(&raw.sql, &raw.bindings)?;
    Ok(SqlWithBindings::new(raw.sql.trim(), raw.bindings.clone()))
}

/// Join list items with `, ` under `keyword`; no items yields the empty fragment.
pub(crate) fn keyword_list(keyword: &str, items: Vec<SqlWithBindings>) -> SqlWithBindings {
    let items: Vec<_> = items.into_iter().filter(|i| !i.is_empty()).collect();
    if items.is_empty() {
        return SqlWithBindings::empty();
    }
    let mut sql = format!("{keyword} ");
    let mut bindings = Bindings::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&item.sql);
        bindings.extend(item.bindings);
    }
    SqlWithBindings::new(sql, bindings)
}

/// Placeholder for a payload value; NULL is written inline and not bound.
pub(crate) fn bind_or_null(value: &Value, bindings: &mut Bindings) -> &'static str {
    if value.is_null() {
        "NULL"
    } else {
        bindings.push(value.clone());
        "?"
    }
}
