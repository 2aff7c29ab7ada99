use thiserror::Error;

#[derive(Error, Debug)]
pub enum DaddiError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Unknown result kind: {0}")]
    UnknownResultKind(String),
    #[error("Task failed: {0}")]
    Task(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DaddiError>;

// Helper conversions
impl From<rusqlite::Error> for DaddiError {
    fn from(e: rusqlite::Error) -> Self { Self::Database(e.to_string()) }
}

impl From<config::ConfigError> for DaddiError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
