//! Core domain logic for the personal roster screen.
//! This crate is the single source of truth for roster invariants.

pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use form::{EditSession, FieldText, FormOutcome, IgnoreReason, RosterForm};
pub use logging::{default_log_level, init_logging, LogConfig};
pub use model::person::{Person, PersonId, PersonInput, PersonValidationError};
pub use repo::person_repo::{PersonRepository, RepoError, RepoResult, SqlitePersonRepository};
pub use service::person_service::{PersonService, PersonServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
