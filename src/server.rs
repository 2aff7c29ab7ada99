use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use rusqlite::types::Value;
use rusqlite::Connection;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::display::{criteria_display, interlinear};
use crate::error::DaddiError;
use crate::persist::{self, ResultSet};
use crate::query::{assemble, filter_search_criteria, ResultKind};

/// Shared by all requests. SQLite connections are not `Sync`, so requests take
/// turns on the one connection. Field labels are read once, at startup.
pub struct AppState {
    connection: Mutex<Connection>,
    labels: HashMap<String, String>,
}

impl AppState {
    pub fn new(connection: Connection) -> Self {
        let labels = load_labels(&connection);
        Self { connection: Mutex::new(connection), labels }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub status: String,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ResultKind>,
    pub criteria: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Vec<serde_json::Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binds: Option<BTreeMap<usize, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interlinear: Option<Vec<Vec<(String, String)>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    fn failed(started: Instant, criteria: Vec<(String, String)>, error: &DaddiError) -> Self {
        Self {
            status: "error".into(),
            elapsed_ms: elapsed_ms(started),
            kind: None,
            criteria,
            result_count: None,
            columns: None,
            rows: None,
            query: None,
            binds: None,
            interlinear: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CriteriaResponse {
    pub criteria: Vec<(String, String)>,
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

pub fn status_of(error: &DaddiError) -> StatusCode {
    match error {
        DaddiError::Query(_) => StatusCode::BAD_REQUEST,
        DaddiError::UnknownResultKind(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn bind_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Real(f) => serde_json::Value::from(*f),
        Value::Text(t) => serde_json::Value::from(t.as_str()),
        Value::Blob(b) => serde_json::Value::from(String::from_utf8_lossy(b).into_owned()),
    }
}

fn sentence_interlinear(result: &ResultSet) -> Vec<Vec<(String, String)>> {
    (0..result.row_count)
        .map(|row| {
            let original = result.value(row, "original").and_then(|v| v.as_str()).unwrap_or_default();
            let gloss = result.value(row, "gloss").and_then(|v| v.as_str()).unwrap_or_default();
            interlinear(original, gloss)
        })
        .collect()
}

/// Display labels of the form fields. Labels are cosmetic; when they cannot be
/// read the map is empty and the raw field names are shown.
pub fn load_labels(connection: &Connection) -> HashMap<String, String> {
    persist::parameter_labels(connection).unwrap_or_else(|e| {
        warn!(error = %e, "parameter labels unavailable");
        HashMap::new()
    })
}

/// Run one search request against `connection`: filter the raw query-string
/// pairs, build the query for `kind` and execute it.
pub fn search(
    connection: &Connection,
    labels: &HashMap<String, String>,
    kind: &str,
    pairs: &[(String, String)],
) -> (StatusCode, SearchResponse) {
    let started = Instant::now();
    let criteria = filter_search_criteria(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let shown = criteria_display(&criteria, labels);
    let kind: ResultKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => return (status_of(&e), SearchResponse::failed(started, shown, &e)),
    };
    let query = assemble(&criteria, kind);
    match persist::execute(connection, &query) {
        Ok(result) => {
            let interlinear = (kind == ResultKind::Sentence).then(|| sentence_interlinear(&result));
            let body = SearchResponse {
                status: "ok".into(),
                elapsed_ms: elapsed_ms(started),
                kind: Some(kind),
                criteria: shown,
                result_count: Some(result.row_count),
                binds: Some(query.binds.iter().map(|(i, v)| (*i, bind_json(v))).collect()),
                query: Some(query.sql),
                columns: Some(result.columns),
                rows: Some(result.rows),
                interlinear,
                error: None,
            };
            info!(%kind, ms = body.elapsed_ms, rows = result.row_count, "search complete");
            (StatusCode::OK, body)
        }
        Err(e) => {
            let status = status_of(&e);
            warn!(%kind, msg = %e, code = %status.as_u16(), "search error");
            (status, SearchResponse::failed(started, shown, &e))
        }
    }
}

fn locked<'a>(state: &'a AppState) -> Result<std::sync::MutexGuard<'a, Connection>, DaddiError> {
    state.connection.lock().map_err(|e| DaddiError::Lock(e.to_string()))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);
    Router::new()
        .route("/search/:kind", get(search_handler))
        .route("/criteria", get(criteria_handler))
        .layer(cors)
        .with_state(state)
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> (StatusCode, Json<SearchResponse>) {
    let started = Instant::now();
    // rusqlite is synchronous, so the search runs on a blocking thread
    let outcome = tokio::task::spawn_blocking(move || {
        let connection = locked(&state)?;
        Ok::<_, DaddiError>(search(&connection, &state.labels, &kind, &pairs))
    })
    .await;
    match outcome {
        Ok(Ok((status, body))) => (status, Json(body)),
        Ok(Err(e)) => {
            warn!(error = %e, "search unavailable");
            (status_of(&e), Json(SearchResponse::failed(started, Vec::new(), &e)))
        }
        Err(e) => {
            warn!(error = %e, "Join error");
            let e = DaddiError::Task(e.to_string());
            (StatusCode::INTERNAL_SERVER_ERROR, Json(SearchResponse::failed(started, Vec::new(), &e)))
        }
    }
}

async fn criteria_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<CriteriaResponse> {
    let criteria = filter_search_criteria(pairs);
    Json(CriteriaResponse { criteria: criteria_display(&criteria, &state.labels) })
}
