//! Daddi – search over the Database of Dutch Dialect Idioms.
//!
//! The database records idioms (table `strategy`), example sentences that
//! illustrate them, and the dialect answer sets they were collected in. Each
//! idiom and sentence carries linguistic parameters (Voice, Tense, ...).
//!
//! A search is a flat set of form fields, as submitted by the search page.
//! This crate turns such a set into one parameterized SQL query and runs it:
//! * [`catalog`] – which form fields exist and what they search in.
//! * [`normalize`] – free text to a safe FTS5 query expression.
//! * [`clause`] – the WHERE condition(s) for a single field.
//! * [`query`] – criteria filtering, the three fixed result templates
//!   (idiom, sentence, dialect) and assembly into one query.
//! * [`persist`] – opening the database and executing assembled queries.
//! * [`display`] – grammaticality text, interlinear glosses, field labels.
//! * [`server`] – the HTTP endpoints.
//!
//! All criteria are combined with AND. A user who wants OR writes it inside a
//! single free-text field, where it reaches the full-text engine unquoted.
//!
//! ## Quick Start
//! ```
//! use daddi::query::{assemble, filter_search_criteria, ResultKind};
//! let criteria = filter_search_criteria([("Idiom", "ergens AND zijn"), ("Voice", "")]);
//! let query = assemble(&criteria, ResultKind::Idiom);
//! assert_eq!(query.binds.len(), 1);
//! assert!(query.sql.contains("strategy_fts.strategy_name MATCH ?1"));
//! ```

pub mod catalog;
pub mod clause;
pub mod display;
pub mod error;
pub mod normalize;
pub mod persist;
pub mod query;
pub mod server;
pub mod settings;

pub use error::{DaddiError, Result};
