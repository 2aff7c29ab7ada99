//! Search query assembly.
//!
//! All criteria are folded into one conjunctive WHERE expression, which fills
//! the single slot of one of three fixed templates. The anonymous `?` markers
//! of the clauses are then renumbered to `?1`, `?2`, ... so every bind value
//! has a stable index.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{self, Category};
use crate::clause::{self, PLACEHOLDER};
use crate::error::{DaddiError, Result};

const WHERE_SLOT: &str = "{where}";

// Table "strategy" holds the idioms, therefore alias "i".
const IDIOM_QUERY: &str = "SELECT ROW_NUMBER() OVER (ORDER BY strategy_answerset_id ASC, strategy_name ASC) AS row_num,
 strategy_id, strategy_name, strategy_description, strategy_answerset_id
FROM strategy i
LEFT JOIN sentence s ON s.sentence_strategy_id = i.strategy_id
WHERE {where}
GROUP BY strategy_id, strategy_name, strategy_description
ORDER BY strategy_answerset_id ASC, strategy_name ASC;";

const SENTENCE_QUERY: &str = "SELECT ROW_NUMBER() OVER (ORDER BY i.strategy_id, s.sentence_id ASC) AS row_num,
 sentence_id, original, gloss, translation, convert_gramm(grammaticality) AS grammaticality,
 strategy_id, strategy_name, strategy_answerset_id, sentence_answerset_id
FROM sentence s
JOIN strategy i ON s.sentence_strategy_id = i.strategy_id
WHERE {where}
ORDER BY i.strategy_id, s.sentence_id ASC;";

const DIALECT_QUERY: &str = "SELECT ROW_NUMBER() OVER (ORDER BY strategy_answerset_id ASC, strategy_name ASC) AS row_num,
 strategy_answerset_id, answerset_name, answerset_description
FROM strategy i
LEFT JOIN sentence s ON s.sentence_strategy_id = i.strategy_id
JOIN answerset a ON i.strategy_answerset_id = a.answerset_id
WHERE {where}
GROUP BY answerset_name
ORDER BY strategy_answerset_id ASC, strategy_name ASC;";

/// The three result sets a search can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Idiom,
    Sentence,
    Dialect,
}

impl ResultKind {
    pub const ALL: [ResultKind; 3] = [ResultKind::Idiom, ResultKind::Sentence, ResultKind::Dialect];

    pub fn template(&self) -> &'static str {
        match self {
            ResultKind::Idiom => IDIOM_QUERY,
            ResultKind::Sentence => SENTENCE_QUERY,
            ResultKind::Dialect => DIALECT_QUERY,
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultKind::Idiom => write!(f, "idiom"),
            ResultKind::Sentence => write!(f, "sentence"),
            ResultKind::Dialect => write!(f, "dialect"),
        }
    }
}

impl FromStr for ResultKind {
    type Err = DaddiError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "idiom" => Ok(ResultKind::Idiom),
            "sentence" => Ok(ResultKind::Sentence),
            "dialect" => Ok(ResultKind::Dialect),
            other => Err(DaddiError::UnknownResultKind(other.to_string())),
        }
    }
}

/// One form field and what was submitted for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchCriterion {
    pub name: String,
    pub values: Vec<String>,
}

/// Criteria in submission order. Order only affects the order of the
/// conditions in the generated SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchCriteria(Vec<SearchCriterion>);

impl SearchCriteria {
    pub fn new() -> Self {
        Self(Vec::new())
    }
    /// Adds a value, appending to an existing criterion of the same name.
    pub fn push(&mut self, name: &str, value: impl Into<String>) {
        match self.0.iter_mut().find(|c| c.name == name) {
            Some(criterion) => criterion.values.push(value.into()),
            None => self.0.push(SearchCriterion { name: name.to_string(), values: vec![value.into()] }),
        }
    }
    pub fn iter(&self) -> impl Iterator<Item = &SearchCriterion> {
        self.0.iter()
    }
    pub fn get(&self, name: &str) -> Option<&SearchCriterion> {
        self.0.iter().find(|c| c.name == name)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for SearchCriteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut criteria = SearchCriteria::new();
        for (name, value) in pairs {
            criteria.push(name.as_ref(), value);
        }
        criteria
    }
}

/// Keep only recognized fields with a usable value: the first trimmed value
/// of text and identifier fields, all non-empty values of select lists.
pub fn filter_search_criteria<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> SearchCriteria
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let raw: SearchCriteria = pairs
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
        .collect();
    let mut filtered = SearchCriteria::new();
    for criterion in raw.iter() {
        let Some(category) = catalog::classify(&criterion.name) else {
            continue;
        };
        match category {
            Category::SelectList => {
                for value in criterion.values.iter().filter(|v| !v.is_empty()) {
                    filtered.push(&criterion.name, value.as_str());
                }
            }
            Category::TextParam | Category::TextMain | Category::Identifier => {
                if let Some(first) = criterion.values.first().map(|v| v.trim()) {
                    if !first.is_empty() {
                        filtered.push(&criterion.name, first);
                    }
                }
            }
        }
    }
    filtered
}

/// A ready-to-run search: SQL with numbered placeholders and the value bound
/// to each number.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledQuery {
    pub kind: ResultKind,
    pub sql: String,
    pub binds: BTreeMap<usize, Value>,
}

/// Fold all criteria into the template selected by `kind`.
pub fn assemble(criteria: &SearchCriteria, kind: ResultKind) -> AssembledQuery {
    let mut conditions = Vec::new();
    let mut values = Vec::new();
    for criterion in criteria.iter() {
        for clause in clause::build(&criterion.name, &criterion.values) {
            let (condition, binds) = clause.into_parts();
            conditions.push(condition);
            values.extend(binds);
        }
    }
    if conditions.is_empty() {
        // unconstrained, but the template still needs a valid WHERE
        conditions.push("1".to_string());
    }
    let joined = conditions.join("\n AND ");
    let numbered = renumber(&joined);
    let sql = kind.template().replacen(WHERE_SLOT, &numbered, 1);
    let binds: BTreeMap<usize, Value> = values.into_iter().enumerate().map(|(i, v)| (i + 1, v)).collect();
    debug!(%kind, conditions = conditions.len(), binds = binds.len(), "assembled search query");
    AssembledQuery { kind, sql, binds }
}

// `?` becomes `?1`, `?2`, ... in order of appearance.
fn renumber(conditions: &str) -> String {
    let mut numbered = String::with_capacity(conditions.len() + 8);
    let mut n = 0;
    for c in conditions.chars() {
        numbered.push(c);
        if c == PLACEHOLDER {
            n += 1;
            numbered.push_str(&n.to_string());
        }
    }
    numbered
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use regex::Regex;

    lazy_static! {
        static ref NUMBERED: Regex = Regex::new(r"\?(\d+)").unwrap();
    }

    fn numbers(sql: &str) -> Vec<usize> {
        NUMBERED
            .captures_iter(sql)
            .filter_map(|c| c.get(1).and_then(|m| m.as_str().parse().ok()))
            .collect()
    }

    fn criteria(pairs: &[(&str, &str)]) -> SearchCriteria {
        pairs.iter().copied().collect()
    }

    #[test]
    fn no_criteria_is_unconstrained() {
        let q = assemble(&SearchCriteria::new(), ResultKind::Idiom);
        assert!(q.sql.contains("WHERE 1\n"));
        assert!(q.binds.is_empty());
        assert!(!q.sql.contains(WHERE_SLOT));
    }

    #[test]
    fn every_kind_has_its_own_template() {
        let c = criteria(&[("Voice", "Active")]);
        let idiom = assemble(&c, ResultKind::Idiom);
        let sentence = assemble(&c, ResultKind::Sentence);
        let dialect = assemble(&c, ResultKind::Dialect);
        assert!(idiom.sql.contains("GROUP BY strategy_id"));
        assert!(sentence.sql.contains("convert_gramm(grammaticality)"));
        assert!(dialect.sql.contains("JOIN answerset a"));
        assert_eq!(idiom.binds, sentence.binds);
        assert_eq!(idiom.binds, dialect.binds);
    }

    #[test]
    fn conditions_are_conjunctive_and_numbered() {
        let c = criteria(&[
            ("Dialect", "Dendermonds"),
            ("Dialect", "Drents"),
            ("Dialect", "Gronings"),
            ("OpenAnimacy", "Animate"),
            ("OpenAnimacy", "Inanimate"),
            ("ManipulatedProperty", "DefiniteDeterminer"),
        ]);
        let q = assemble(&c, ResultKind::Idiom);
        assert_eq!(q.sql.matches("\n AND EXISTS").count(), 2);
        assert!(!q.sql.contains(" OR "));
        assert_eq!(numbers(&q.sql), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(q.binds.len(), 6);
        assert_eq!(q.binds.get(&1), Some(&Value::Text("Dendermonds".into())));
        assert_eq!(q.binds.get(&6), Some(&Value::Text("DefiniteDeterminer".into())));
        assert!(q.sql.contains("strategy_answerset_id IN (?1,?2,?3)"));
    }

    #[test]
    fn empty_select_list_equals_omission() {
        let with_empty = assemble(&criteria(&[("Voice", ""), ("Idiom", "pijp")]), ResultKind::Idiom);
        let without = assemble(&criteria(&[("Idiom", "pijp")]), ResultKind::Idiom);
        assert_eq!(with_empty, without);
    }

    #[test]
    fn unknown_fields_add_nothing() {
        let q = assemble(&criteria(&[("Colour", "red"), ("_search", "x")]), ResultKind::Sentence);
        assert_eq!(q, assemble(&SearchCriteria::new(), ResultKind::Sentence));
    }

    #[test]
    fn bind_count_matches_placeholders() {
        let c = criteria(&[
            ("SentenceID", "12"),
            ("Idiom", "ergens AND zijn"),
            ("Judgments", "\"heel raar"),
            ("Tense", "Present"),
            ("Tense", "Past"),
            ("Gloss", ""),
        ]);
        for kind in ResultKind::ALL {
            let q = assemble(&c, kind);
            assert_eq!(numbers(&q.sql).len(), q.binds.len());
            assert_eq!(q.sql.matches(PLACEHOLDER).count(), q.binds.len());
        }
    }

    #[test]
    fn boolean_text_keeps_operator() {
        let q = assemble(&criteria(&[("Idiom", "ergens AND zijn")]), ResultKind::Idiom);
        assert_eq!(q.binds.get(&1), Some(&Value::Text(r#""ergens" AND "zijn""#.into())));
    }

    #[test]
    fn result_kind_round_trips_through_text() {
        for kind in ResultKind::ALL {
            assert_eq!(kind.to_string().parse::<ResultKind>().ok(), Some(kind));
        }
        assert!(matches!("idioms".parse::<ResultKind>(), Err(DaddiError::UnknownResultKind(_))));
    }

    #[test]
    fn filter_keeps_usable_values_only() {
        let pairs = vec![
            ("Voice", ""),
            ("Dialect", "Drents"),
            ("Dialect", ""),
            ("Idiom", "  pijp  "),
            ("Idiom", "ignored second value"),
            ("Meaning", "   "),
            ("SentenceID", " 7 "),
            ("page", "2"),
        ];
        let filtered = filter_search_criteria(pairs);
        let names: Vec<&str> = filtered.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Dialect", "Idiom", "SentenceID"]);
        assert_eq!(filtered.get("Dialect").map(|c| c.values.clone()), Some(vec!["Drents".to_string()]));
        assert_eq!(filtered.get("Idiom").map(|c| c.values.clone()), Some(vec!["pijp".to_string()]));
        assert_eq!(filtered.get("SentenceID").map(|c| c.values.clone()), Some(vec!["7".to_string()]));
    }
}
