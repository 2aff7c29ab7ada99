//! Presentation helpers for search results.

use std::collections::HashMap;

use crate::query::SearchCriteria;

/// Readable form of a grammaticality judgment code, `None` for unknown codes.
pub fn grammaticality_text(code: &str) -> Option<&'static str> {
    match code {
        "ok" => Some("Mostly acceptable"),
        "?" => Some("Moderately acceptable"),
        "%" => Some("Acceptability varies by speaker"),
        "?*" => Some("Barely acceptable"),
        "*" => Some("Mostly not acceptable"),
        "Unknown" => Some("Unknown"),
        _ => None,
    }
}

/// Pairs every word of the original sentence with its gloss. Words are
/// separated by single spaces; surplus words on either side are dropped.
pub fn interlinear(original: &str, gloss: &str) -> Vec<(String, String)> {
    original
        .split(' ')
        .zip(gloss.split(' '))
        .map(|(o, g)| (o.to_string(), g.to_string()))
        .collect()
}

/// Label shown for a form field: the non-empty parts joined with `": "`.
pub fn label(group_entity: Option<&str>, group_label: Option<&str>, question_statement: Option<&str>) -> String {
    [group_entity, group_label, question_statement]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(": ")
}

/// What was searched for, as `(label, value)` pairs in submission order.
/// Fields without a label are shown under their own name.
pub fn criteria_display(criteria: &SearchCriteria, labels: &HashMap<String, String>) -> Vec<(String, String)> {
    criteria
        .iter()
        .map(|criterion| {
            let label = labels.get(&criterion.name).cloned().unwrap_or_else(|| criterion.name.clone());
            (label, criterion.values.join(", "))
        })
        .collect()
}
