//! Layered configuration: built-in defaults, then an optional TOML file,
//! then `DADDI_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{DaddiError, Result};

pub const DEFAULT_FILE: &str = "daddi.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// SQLite file holding the idioms.
    pub database: PathBuf,
    /// Address the HTTP server binds to.
    pub listen: String,
    /// Log filter used when `RUST_LOG` is not set.
    pub log: String,
    pub read_only: bool,
}

impl Settings {
    /// Load settings, reading `file` if it exists.
    pub fn load(file: &str) -> Result<Self> {
        Self::load_from(file, Environment::with_prefix("DADDI"))
    }

    fn load_from(file: &str, environment: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("database", "idioms.db")?
            .set_default("listen", "127.0.0.1:8001")?
            .set_default("log", "info")?
            .set_default("read_only", true)?
            .add_source(File::with_name(file).required(false))
            .add_source(environment)
            .build()?;
        Ok(settings.try_deserialize::<Settings>()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| DaddiError::Config(format!("invalid listen address '{}': {e}", self.listen)))
    }
}
