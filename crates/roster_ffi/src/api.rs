//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the roster screen's list/add/edit/delete calls to Dart via FRB.
//! - Translate core results into plain response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call opens the database, runs one use-case, and closes it again;
//!   no handle outlives a call.

use log::warn;
use roster_core::db::{close_db, open_db};
use roster_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Person, PersonService, PersonServiceError, SqlitePersonRepository,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const ROSTER_DB_FILE_NAME: &str = "peoplelist.db";
static ROSTER_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One roster row as rendered by the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonItem {
    pub id: i64,
    pub name: String,
    pub age: i64,
}

/// List response envelope for the roster screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeopleListResponse {
    /// Rows sorted by name ascending.
    pub items: Vec<PersonItem>,
    /// "Total People" figure; equals `items.len()`.
    pub total: u32,
    /// Human-readable message for diagnostics.
    pub message: String,
}

/// Generic action response envelope for write calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterActionResponse {
    /// Whether the write was applied.
    pub ok: bool,
    /// Created person id (add only).
    pub person_id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl RosterActionResponse {
    fn success(message: impl Into<String>, person_id: Option<i64>) -> Self {
        Self {
            ok: true,
            person_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            person_id: None,
            message: message.into(),
        }
    }
}

/// Lists the whole roster sorted by name.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; storage faults yield an empty list and an error message.
#[flutter_rust_bridge::frb(sync)]
pub fn people_list() -> PeopleListResponse {
    match with_person_service(|service| service.list_people().map_err(PersonServiceError::from)) {
        Ok(people) => {
            let items = people.into_iter().map(to_person_item).collect::<Vec<_>>();
            let total = u32::try_from(items.len()).unwrap_or(u32::MAX);
            PeopleListResponse {
                message: format!("Total People: {total}"),
                items,
                total,
            }
        }
        Err(err) => PeopleListResponse {
            items: Vec::new(),
            total: 0,
            message: format!("people_list failed: {err}"),
        },
    }
}

/// Adds a person from raw form text.
///
/// # FFI contract
/// - Name is trimmed; empty names and non-integer ages return `ok=false`
///   without touching the store.
/// - Returns the created person id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn people_add(name: String, age: String) -> RosterActionResponse {
    match with_person_service(|service| service.add_person(&name, &age)) {
        Ok(person_id) => RosterActionResponse::success("Person added.", Some(person_id)),
        Err(err) => RosterActionResponse::failure(format!("people_add failed: {err}")),
    }
}

/// Overwrites name/age of one person from raw form text.
///
/// # FFI contract
/// - Same validation as `people_add`.
/// - A missing `id` is a silent no-op and still reports `ok=true`.
#[flutter_rust_bridge::frb(sync)]
pub fn people_update(id: i64, name: String, age: String) -> RosterActionResponse {
    match with_person_service(|service| service.edit_person(id, &name, &age)) {
        Ok(()) => RosterActionResponse::success("Person saved.", None),
        Err(err) => RosterActionResponse::failure(format!("people_update failed: {err}")),
    }
}

/// Deletes one person.
///
/// # FFI contract
/// - A missing `id` is a silent no-op and still reports `ok=true`.
#[flutter_rust_bridge::frb(sync)]
pub fn people_delete(id: i64) -> RosterActionResponse {
    match with_person_service(|service| {
        service
            .delete_person(id)
            .map_err(PersonServiceError::from)
    }) {
        Ok(()) => RosterActionResponse::success("Person deleted.", None),
        Err(err) => RosterActionResponse::failure(format!("people_delete failed: {err}")),
    }
}

fn resolve_roster_db_path() -> PathBuf {
    ROSTER_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("ROSTER_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(ROSTER_DB_FILE_NAME)
        })
        .clone()
}

fn with_person_service<T>(
    f: impl FnOnce(&PersonService<SqlitePersonRepository<'_>>) -> Result<T, PersonServiceError>,
) -> Result<T, String> {
    let db_path = resolve_roster_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("roster DB open failed: {err}"))?;
    let outcome = {
        let repo = SqlitePersonRepository::try_new(&conn)
            .map_err(|err| format!("roster repo init failed: {err}"))?;
        let service = PersonService::new(repo);
        f(&service).map_err(|err| err.to_string())
    };

    if let Err(err) = close_db(conn) {
        warn!("event=ffi_call module=ffi status=close_failed error={err}");
    }
    outcome
}

fn to_person_item(person: Person) -> PersonItem {
    PersonItem {
        id: person.id,
        name: person.name,
        age: person.age,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, people_add, people_delete, people_list, people_update, ping,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn people_add_then_list_contains_row() {
        let name = unique_token("ffi-add");
        let added = people_add(format!("  {name}  "), "30".to_string());
        assert!(added.ok, "{}", added.message);
        let id = added.person_id.expect("add should return person_id");

        let listed = people_list();
        assert_eq!(listed.total as usize, listed.items.len());
        let row = listed
            .items
            .iter()
            .find(|item| item.id == id)
            .expect("created row should be listed");
        assert_eq!(row.name, name);
        assert_eq!(row.age, 30);
        for pair in listed.items.windows(2) {
            assert!(pair[0].name <= pair[1].name);
        }

        assert!(people_delete(id).ok);
    }

    #[test]
    fn people_add_rejects_invalid_input() {
        let empty_name = people_add("   ".to_string(), "30".to_string());
        assert!(!empty_name.ok);
        assert!(empty_name.message.contains("name"));

        let bad_age = people_add(unique_token("ffi-bad-age"), "old".to_string());
        assert!(!bad_age.ok);
        assert!(bad_age.message.contains("age"));
    }

    #[test]
    fn people_update_and_delete_round_trip() {
        let name = unique_token("ffi-edit");
        let id = people_add(name, "20".to_string()).person_id.unwrap();

        let renamed = unique_token("ffi-edit-renamed-O'Brien");
        let updated = people_update(id, renamed.clone(), "21".to_string());
        assert!(updated.ok, "{}", updated.message);

        let row = people_list()
            .items
            .into_iter()
            .find(|item| item.id == id)
            .unwrap();
        assert_eq!(row.name, renamed);
        assert_eq!(row.age, 21);

        assert!(people_delete(id).ok);
        assert!(people_list().items.iter().all(|item| item.id != id));
    }

    #[test]
    fn update_and_delete_of_missing_id_are_noops() {
        assert!(people_update(-42, "Nobody".to_string(), "1".to_string()).ok);
        assert!(people_delete(-42).ok);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
