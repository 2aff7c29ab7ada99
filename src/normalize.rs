//! Turns free text from the search form into an FTS5 query expression.
//!
//! Plain words are quoted so FTS5 syntax characters in them are matched
//! literally. Quoted phrases pass through, as do the boolean operators and
//! the `*` wildcard, so users can still write `ergens AND zijn`.

use lazy_static::lazy_static;
use regex::Regex;

/// Left unquoted so the full-text engine reads them as operators.
pub const OPERATORS: [&str; 4] = ["AND", "OR", "NOT", "*"];

lazy_static! {
    // A quoted phrase may span lines.
    static ref SEPARATOR: Regex = Regex::new(r#"\s+|("(?s:.*?)")"#).unwrap();
}

/// Normalize a free-text query. Total over all inputs; an input without any
/// token yields the empty string.
pub fn normalize(query: &str) -> String {
    let mut query = query.to_string();
    if query.matches('"').count() % 2 == 1 {
        query.push('"');
    }
    tokens(&query)
        .into_iter()
        .filter(|t| !t.is_empty() && *t != "\"\"")
        .map(|t| {
            if t.starts_with('"') || OPERATORS.contains(&t) {
                t.to_string()
            } else {
                format!("\"{t}\"")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// Split on whitespace, keeping quoted phrases as tokens of their own.
fn tokens(query: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut last = 0;
    for captures in SEPARATOR.captures_iter(query) {
        let Some(whole) = captures.get(0) else { continue };
        parts.push(&query[last..whole.start()]);
        if let Some(phrase) = captures.get(1) {
            parts.push(phrase.as_str());
        }
        last = whole.end();
    }
    parts.push(&query[last..]);
    parts
}
