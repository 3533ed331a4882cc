//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the roster data access contract.
//! - Isolate SQLite query details from service and presentation layers.
//!
//! # Invariants
//! - Writes accept only validated `PersonInput`.
//! - Update/delete on a missing id are silent no-ops, not errors.

pub mod person_repo;
