//! Presentation state for the roster screen.
//!
//! # Responsibility
//! - Hold transient UI state: the add draft, the edit session and the
//!   latest list snapshot.
//! - Drive the roster service and re-list after every write.
//!
//! # Invariants
//! - Invalid input never reaches the store; the action is ignored and the
//!   fields keep their text.
//! - The snapshot is replaced after each successful write.
//! - Storage faults are returned to the caller, never swallowed.

use crate::model::person::{Person, PersonId, PersonInput, PersonValidationError};
use crate::repo::person_repo::{PersonRepository, RepoResult};
use crate::service::person_service::PersonService;
use log::debug;

/// Raw text typed into the name/age fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldText {
    pub name: String,
    pub age: String,
}

impl FieldText {
    fn clear(&mut self) {
        self.name.clear();
        self.age.clear();
    }
}

/// Which row is being edited and its in-progress field text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: PersonId,
    pub fields: FieldText,
}

/// Why a form action did nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    Invalid(PersonValidationError),
    UnknownPerson(PersonId),
    NoEditSession,
}

impl IgnoreReason {
    /// Stable label for diagnostics; never includes field text.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invalid(PersonValidationError::EmptyName) => "empty_name",
            Self::Invalid(PersonValidationError::InvalidAge(_)) => "invalid_age",
            Self::UnknownPerson(_) => "unknown_person",
            Self::NoEditSession => "no_edit_session",
        }
    }
}

/// Result of a form action that did not fail at the storage level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Applied,
    Ignored(IgnoreReason),
}

/// Roster screen state bound to an explicitly provided service.
pub struct RosterForm<R: PersonRepository> {
    service: PersonService<R>,
    people: Vec<Person>,
    draft: FieldText,
    editing: Option<EditSession>,
}

impl<R: PersonRepository> RosterForm<R> {
    /// Builds the form and loads the initial snapshot.
    pub fn load(service: PersonService<R>) -> RepoResult<Self> {
        let mut form = Self {
            service,
            people: Vec::new(),
            draft: FieldText::default(),
            editing: None,
        };
        form.refresh()?;
        Ok(form)
    }

    /// Re-lists the roster into the snapshot.
    pub fn refresh(&mut self) -> RepoResult<()> {
        self.people = self.service.list_people()?;
        Ok(())
    }

    /// Snapshot as of the last refresh, sorted by name.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// "Total People" figure for the current snapshot.
    pub fn total(&self) -> usize {
        self.people.len()
    }

    pub fn draft(&self) -> &FieldText {
        &self.draft
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn set_draft_name(&mut self, text: impl Into<String>) {
        self.draft.name = text.into();
    }

    pub fn set_draft_age(&mut self, text: impl Into<String>) {
        self.draft.age = text.into();
    }

    /// Adds the drafted person, then clears the draft.
    pub fn submit_draft(&mut self) -> RepoResult<FormOutcome> {
        let input = match PersonInput::parse(&self.draft.name, &self.draft.age) {
            Ok(input) => input,
            Err(err) => return Ok(ignored(IgnoreReason::Invalid(err))),
        };

        self.service.create_person(&input)?;
        self.draft.clear();
        self.refresh()?;
        Ok(FormOutcome::Applied)
    }

    /// Opens an edit session prefilled from the snapshot row.
    pub fn start_editing(&mut self, id: PersonId) -> FormOutcome {
        let Some(person) = self.people.iter().find(|person| person.id == id) else {
            return ignored(IgnoreReason::UnknownPerson(id));
        };

        self.editing = Some(EditSession {
            id,
            fields: FieldText {
                name: person.name.clone(),
                age: person.age.to_string(),
            },
        });
        FormOutcome::Applied
    }

    pub fn set_edit_name(&mut self, text: impl Into<String>) -> FormOutcome {
        match self.editing.as_mut() {
            Some(session) => {
                session.fields.name = text.into();
                FormOutcome::Applied
            }
            None => ignored(IgnoreReason::NoEditSession),
        }
    }

    pub fn set_edit_age(&mut self, text: impl Into<String>) -> FormOutcome {
        match self.editing.as_mut() {
            Some(session) => {
                session.fields.age = text.into();
                FormOutcome::Applied
            }
            None => ignored(IgnoreReason::NoEditSession),
        }
    }

    /// Saves the edit session; invalid text keeps the session open.
    pub fn save_edit(&mut self) -> RepoResult<FormOutcome> {
        let Some(session) = self.editing.as_ref() else {
            return Ok(ignored(IgnoreReason::NoEditSession));
        };

        let input = match PersonInput::parse(&session.fields.name, &session.fields.age) {
            Ok(input) => input,
            Err(err) => return Ok(ignored(IgnoreReason::Invalid(err))),
        };

        self.service.update_person(session.id, &input)?;
        self.editing = None;
        self.refresh()?;
        Ok(FormOutcome::Applied)
    }

    /// Drops the edit session without touching the store.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Deletes a row and ends its edit session if one was open.
    pub fn delete(&mut self, id: PersonId) -> RepoResult<()> {
        self.service.delete_person(id)?;
        if self.editing.as_ref().is_some_and(|session| session.id == id) {
            self.editing = None;
        }
        self.refresh()
    }
}

fn ignored(reason: IgnoreReason) -> FormOutcome {
    debug!("event=form_action module=form status=ignored reason={}", reason.code());
    FormOutcome::Ignored(reason)
}
