//! LIKE pattern subsumption.

use regex::Regex;

use crate::value::Value;

/// Stand-ins for the wildcards of the pattern being tested for containment.
const ANY_RUN: char = '\u{E000}';
const ANY_CHAR: char = '\u{E001}';

/// Translate a LIKE pattern into an anchored regex over symbolic patterns.
///
/// `%` becomes `.*`. `_` matches any single symbol except [`ANY_RUN`], since a
/// `%` in the other pattern may stand for zero or several characters.
fn like_regex(pattern: &str) -> Option<Regex> {
    let mut re = String::from("(?s)^");
    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '%' | '_' => {
                re.push_str(&regex::escape(&literal));
                literal.clear();
                if c == '%' {
                    re.push_str(".*");
                } else {
                    re.push_str(&format!("[^{ANY_RUN}]"));
                }
            }
            _ => literal.push(c),
        }
    }
    re.push_str(&regex::escape(&literal));
    re.push('$');
    Regex::new(&re).ok()
}

/// Replace the wildcards of `pattern` with their stand-in symbols.
fn symbolic(pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '%' => ANY_RUN,
            '_' => ANY_CHAR,
            other => other,
        })
        .collect()
}

/// Whether every string matched by `specific` is also matched by `general`.
///
/// `general` is run against `specific` with its wildcards replaced by stand-ins:
/// a literal only matches itself, `_` matches a literal or a `_`, and `%` matches
/// anything. Patterns already containing a stand-in are only equal to themselves.
pub(crate) fn covers(general: &str, specific: &str) -> bool {
    if general == specific {
        return true;
    }
    let reserved = |p: &str| p.contains([ANY_RUN, ANY_CHAR]);
    if reserved(general) || reserved(specific) {
        return false;
    }
    like_regex(general).is_some_and(|re| re.is_match(&symbolic(specific)))
}

/// Drop duplicate and subsumed patterns, keeping first-seen order.
///
/// When two patterns cover each other the earlier one is kept.
pub(crate) fn prune(patterns: Vec<Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::with_capacity(patterns.len());
    for p in patterns {
        if !unique.contains(&p) {
            unique.push(p);
        }
    }

    let text = |v: &Value| match v {
        Value::Text(s) => Some(s.clone()),
        _ => None,
    };

    let kept: Vec<bool> = unique
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let Some(p) = text(p) else {
                return true;
            };
            !unique.iter().enumerate().any(|(j, q)| {
                if i == j {
                    return false;
                }
                let Some(q) = text(q) else {
                    return false;
                };
                covers(&q, &p) && (j < i || !covers(&p, &q))
            })
        })
        .collect();

    unique
        .into_iter()
        .zip(kept)
        .filter_map(|(p, keep)| keep.then_some(p))
        .collect()
}
