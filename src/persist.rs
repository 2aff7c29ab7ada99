// used for persistence
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OpenFlags};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::display::{grammaticality_text, label};
use crate::error::{DaddiError, Result};
use crate::query::AssembledQuery;
use crate::settings::Settings;

/// Rows produced by one search.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub row_count: usize,
}

impl ResultSet {
    /// Value of a named column in a row.
    pub fn value(&self, row: usize, column: &str) -> Option<&serde_json::Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index)
    }
}

/// Open the idioms database described by the settings.
pub fn open(settings: &Settings) -> Result<Connection> {
    let mut flags = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    if settings.read_only {
        flags |= OpenFlags::SQLITE_OPEN_READ_ONLY;
    } else {
        flags |= OpenFlags::SQLITE_OPEN_READ_WRITE;
    }
    let connection = Connection::open_with_flags(&settings.database, flags)?;
    prepare_connection(&connection)?;
    info!(database = %settings.database.display(), read_only = settings.read_only, "database opened");
    Ok(connection)
}

/// Register the SQL functions the query templates rely on.
pub fn prepare_connection(connection: &Connection) -> Result<()> {
    connection.create_scalar_function(
        "convert_gramm",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let code: Option<String> = ctx.get(0)?;
            match code {
                None => Ok(None),
                Some(code) => match grammaticality_text(&code) {
                    Some(text) => Ok(Some(text)),
                    None => Err(rusqlite::Error::UserFunctionError(Box::new(DaddiError::Query(format!(
                        "unknown grammaticality judgment '{code}'"
                    ))))),
                },
            }
        },
    )?;
    Ok(())
}

/// Run an assembled search. Any failure reported by SQLite comes back as
/// [`DaddiError::Query`] carrying the driver's message; nothing is retried.
pub fn execute(connection: &Connection, query: &AssembledQuery) -> Result<ResultSet> {
    run(connection, query).map_err(|e| {
        warn!(kind = %query.kind, error = %e, "search query failed");
        DaddiError::Query(e.to_string())
    })
}

fn run(connection: &Connection, query: &AssembledQuery) -> rusqlite::Result<ResultSet> {
    let mut statement = connection.prepare(&query.sql)?;
    let columns: Vec<String> = statement.column_names().into_iter().map(String::from).collect();
    let width = columns.len();
    let mut rows = Vec::new();
    let mut cursor = statement.query(params_from_iter(query.binds.values()))?;
    while let Some(row) = cursor.next()? {
        let mut values = Vec::with_capacity(width);
        for i in 0..width {
            values.push(json(row.get_ref(i)?));
        }
        rows.push(values);
    }
    let row_count = rows.len();
    debug!(kind = %query.kind, rows = row_count, "search query executed");
    Ok(ResultSet { columns, rows, row_count })
}

fn json(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Value::from(f),
        ValueRef::Text(t) | ValueRef::Blob(t) => serde_json::Value::from(String::from_utf8_lossy(t).into_owned()),
    }
}

/// Display labels of the form fields, keyed by field name.
pub fn parameter_labels(connection: &Connection) -> Result<HashMap<String, String>> {
    let mut statement = connection.prepare(
        "
        select param_get, group_entity, group_label, question_statement
            from parameter_labels
    ",
    )?;
    let labels = statement
        .query_map([], |row| {
            let name: String = row.get(0)?;
            let group_entity: Option<String> = row.get(1)?;
            let group_label: Option<String> = row.get(2)?;
            let question_statement: Option<String> = row.get(3)?;
            Ok((
                name,
                label(group_entity.as_deref(), group_label.as_deref(), question_statement.as_deref()),
            ))
        })?
        .collect::<rusqlite::Result<HashMap<_, _>>>()?;
    Ok(labels)
}
