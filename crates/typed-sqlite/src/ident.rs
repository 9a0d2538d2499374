//! Identifier quoting for the SQLite dialect.
//!
//! Every table and column name reaching the output is rendered through [`Ident`]:
//!
//! - dotted names quote each part separately: `employees.id` → `"employees"."id"`
//! - unquoted parts are taken as-is (`first name`, `user-data`) and always quoted,
//!   so any text stays inside one identifier
//! - already-quoted parts (`"Odd Name"`) keep their text
//! - `"` inside a name is rendered as `""`
//! - `*` is allowed as the last part and stays bare: `*`, `users.*`

use crate::error::{QueryError, QueryResult};

/// A part of a dotted identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    Name(String),
    Star,
}

/// A parsed table or column reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

impl Ident {
    /// Parse a possibly dotted, possibly quoted identifier.
    pub fn parse(s: &str) -> QueryResult<Self> {
        let invalid = |reason: &str| QueryError::invalid_identifier(s, reason);

        if s.is_empty() {
            return Err(invalid("identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(invalid("identifier cannot contain NUL"));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            if !parts.is_empty() {
                if matches!(parts.last(), Some(IdentPart::Star)) {
                    return Err(invalid("'*' must be the last part"));
                }
                match chars.next() {
                    Some('.') if chars.peek().is_some() => {}
                    Some('.') => return Err(invalid("trailing '.'")),
                    Some(c) => return Err(invalid(&format!("expected '.', got '{c}'"))),
                    None => break,
                }
            }

            match chars.peek() {
                Some('"') => {
                    chars.next();
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('"') if chars.peek() == Some(&'"') => {
                                chars.next();
                                name.push('"');
                            }
                            Some('"') => break,
                            Some(c) => name.push(c),
                            None => return Err(invalid("unclosed quoted identifier")),
                        }
                    }
                    if name.is_empty() {
                        return Err(invalid("empty quoted identifier"));
                    }
                    parts.push(IdentPart::Name(name));
                }
                Some('*') => {
                    chars.next();
                    parts.push(IdentPart::Star);
                }
                _ => {
                    let mut name = String::new();
                    while let Some(&c) = chars.peek() {
                        if c == '.' {
                            break;
                        }
                        name.push(c);
                        chars.next();
                    }
                    if name.is_empty() {
                        return Err(invalid("empty identifier segment"));
                    }
                    parts.push(IdentPart::Name(name));
                }
            }
        }

        Ok(Self { parts })
    }

    /// Render as SQL with every named part double-quoted.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Star => out.push('*'),
                IdentPart::Name(name) => {
                    out.push('"');
                    for ch in name.chars() {
                        if ch == '"' {
                            out.push('"');
                        }
                        out.push(ch);
                    }
                    out.push('"');
                }
            }
        }
    }
}

/// Parse and quote an identifier in one step.
pub fn quote_ident(s: &str) -> QueryResult<String> {
    Ident::parse(s).map(|ident| ident.to_sql())
}

/// Quote a comma separated list of identifiers: `"a", "b"`.
pub(crate) fn quote_list<S: AsRef<str>>(names: &[S]) -> QueryResult<String> {
    let mut out = String::new();
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        Ident::parse(name.as_ref())?.write_sql(&mut out);
    }
    Ok(out)
}
