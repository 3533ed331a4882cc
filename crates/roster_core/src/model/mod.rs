//! Domain model for the personal roster.
//!
//! # Responsibility
//! - Define the persisted `Person` record and its validated write input.
//!
//! # Invariants
//! - Every stored person is identified by a store-assigned `PersonId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod person;
