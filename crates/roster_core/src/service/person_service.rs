//! Roster use-case service.
//!
//! # Responsibility
//! - Provide the create/list/update/delete entry points for core callers.
//! - Accept raw form text and validate it before persistence.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::person::{Person, PersonId, PersonInput, PersonValidationError};
use crate::repo::person_repo::{PersonRepository, RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error for use-cases that take unvalidated text.
#[derive(Debug)]
pub enum PersonServiceError {
    /// Input was rejected before reaching the store.
    Validation(PersonValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for PersonServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersonServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<PersonValidationError> for PersonServiceError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for PersonServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service wrapper for roster operations.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists the whole roster sorted by name.
    pub fn list_people(&self) -> RepoResult<Vec<Person>> {
        self.repo.list_people()
    }

    /// Gets one person by id.
    pub fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        self.repo.get_person(id)
    }

    /// Number of people currently stored.
    pub fn count_people(&self) -> RepoResult<u64> {
        self.repo.count_people()
    }

    /// Creates a person from validated input.
    pub fn create_person(&self, input: &PersonInput) -> RepoResult<PersonId> {
        self.repo.create_person(input)
    }

    /// Validates raw form text, then creates a person.
    pub fn add_person(
        &self,
        raw_name: &str,
        raw_age: &str,
    ) -> Result<PersonId, PersonServiceError> {
        let input = PersonInput::parse(raw_name, raw_age)?;
        Ok(self.repo.create_person(&input)?)
    }

    /// Overwrites name/age of an existing person; missing ids are ignored.
    pub fn update_person(&self, id: PersonId, input: &PersonInput) -> RepoResult<()> {
        self.repo.update_person(id, input)
    }

    /// Validates raw form text, then updates the person.
    pub fn edit_person(
        &self,
        id: PersonId,
        raw_name: &str,
        raw_age: &str,
    ) -> Result<(), PersonServiceError> {
        let input = PersonInput::parse(raw_name, raw_age)?;
        Ok(self.repo.update_person(id, &input)?)
    }

    /// Deletes a person; missing ids are ignored.
    pub fn delete_person(&self, id: PersonId) -> RepoResult<()> {
        self.repo.delete_person(id)
    }
}
