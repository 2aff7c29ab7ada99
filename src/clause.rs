//! Per-parameter WHERE conditions.
//!
//! A [`Clause`] is one SQL condition with anonymous `?` placeholders and the
//! values to bind to them, in order. Parameter ids and column names come from
//! the static catalog and are written into the SQL; user input only ever
//! travels as a bind value.

use rusqlite::types::Value;

use crate::catalog::{self, Category, Entity, ParameterDefinition, Target};
use crate::normalize::normalize;

/// The marker written for every bind value.
pub const PLACEHOLDER: char = '?';

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    condition: String,
    binds: Vec<Value>,
}

impl Clause {
    fn new(condition: String, binds: Vec<Value>) -> Self {
        debug_assert_eq!(condition.matches(PLACEHOLDER).count(), binds.len());
        Self { condition, binds }
    }
    pub fn condition(&self) -> &str {
        &self.condition
    }
    pub fn binds(&self) -> &[Value] {
        &self.binds
    }
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.condition, self.binds)
    }
}

/// Build the conditions for one form field. Unknown fields and fields without
/// a usable value yield nothing.
pub fn build(name: &str, values: &[String]) -> Vec<Clause> {
    let Some(definition) = catalog::definition(name) else {
        return Vec::new();
    };
    let clause = match definition.category {
        Category::SelectList => select_list(definition, values),
        Category::TextParam | Category::TextMain => text(definition, values),
        Category::Identifier => identifier(definition, values),
    };
    clause.into_iter().collect()
}

fn placeholders(n: usize) -> String {
    vec![PLACEHOLDER.to_string(); n].join(",")
}

fn select_list(definition: &ParameterDefinition, values: &[String]) -> Option<Clause> {
    let values: Vec<&String> = values.iter().filter(|v| !v.is_empty()).collect();
    if values.is_empty() {
        return None;
    }
    let list = placeholders(values.len());
    let condition = match definition.target {
        Target::Column(column) => format!("{column} IN ({list})"),
        Target::Parameter(id) => parameter_exists(definition.entity, id, &format!("COLLATE NOCASE IN ({list})")),
    };
    let binds = values.into_iter().map(|v| Value::Text(v.clone())).collect();
    Some(Clause::new(condition, binds))
}

fn text(definition: &ParameterDefinition, values: &[String]) -> Option<Clause> {
    let raw = values.first()?.trim();
    if raw.is_empty() {
        return None;
    }
    let search = normalize(raw);
    // nothing but empty phrases, e.g. `""`
    if search.is_empty() {
        return None;
    }
    let table = definition.entity.table();
    let condition = match definition.target {
        Target::Parameter(id) => {
            let index = format!("{table}_data_fts");
            format!(
                "{table}_id IN (\n    SELECT {table}_id FROM {index}\n    WHERE {index}.parameter_definition_id = '{id}'\n     AND {index}.parameter_value MATCH ?\n )"
            )
        }
        Target::Column(column) => {
            format!("{table}_id IN (\n    SELECT {table}_id FROM {table}_fts\n    WHERE {table}_fts.{column} MATCH ?\n )")
        }
    };
    Some(Clause::new(condition, vec![Value::Text(search)]))
}

fn identifier(definition: &ParameterDefinition, values: &[String]) -> Option<Clause> {
    let raw = values.first()?.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // digits only, so the parse can only fail on overflow
    let id: i64 = raw.parse().ok()?;
    let column = match definition.target {
        Target::Column(column) | Target::Parameter(column) => column,
    };
    Some(Clause::new(format!("{column} = ?"), vec![Value::Integer(id)]))
}

// Existence check against the `*_data_all` view, which reports '0' for
// parameters without a recorded value.
fn parameter_exists(entity: Entity, id: &str, criterion: &str) -> String {
    let table = entity.table();
    let alias = entity.alias();
    format!(
        "EXISTS (\n    SELECT 1 FROM {table}_data_all sda\n    WHERE sda.{table}_id = {alias}.{table}_id\n     AND sda.parameter_definition_id = '{id}'\n     AND sda.parameter_value {criterion}\n )"
    )
}
