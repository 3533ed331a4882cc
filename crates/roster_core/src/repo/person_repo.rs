//! Person repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/update/delete over the `people` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - User values are always bound as statement parameters.
//! - `list_people` orders by `name ASC, id ASC`.
//! - Every operation is a single statement; writes are visible to the
//!   next read on the same connection.
//! - Legacy rows that cannot be decoded are skipped by reads, never fatal.

use crate::db::DbError;
use crate::model::person::{parse_age, Person, PersonId, PersonInput};
use log::{debug, warn};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PEOPLE_TABLE: &str = "people";

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    name,
    age
FROM people";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for roster persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection was not initialized; the named table is absent.
    MissingTable(&'static str),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingTable(table) => {
                write!(f, "table `{table}` is missing; initialize the database first")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted person data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingTable(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Engine(value))
    }
}

/// Storage contract for the roster.
pub trait PersonRepository {
    /// Inserts one row and returns its freshly assigned id.
    fn create_person(&self, input: &PersonInput) -> RepoResult<PersonId>;
    /// Returns all readable rows sorted by name ascending.
    fn list_people(&self) -> RepoResult<Vec<Person>>;
    /// Gets one row by id.
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    /// Overwrites name/age of the matching row; no-op when absent.
    fn update_person(&self, id: PersonId, input: &PersonInput) -> RepoResult<()>;
    /// Removes the matching row; no-op when absent.
    fn delete_person(&self, id: PersonId) -> RepoResult<()>;
    /// Returns the number of stored rows, readable or not.
    fn count_people(&self) -> RepoResult<u64>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Constructs a repository from an initialized connection.
    ///
    /// # Errors
    /// - `RepoError::MissingTable` when `people` does not exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_exists(conn, PEOPLE_TABLE)?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&self, input: &PersonInput) -> RepoResult<PersonId> {
        self.conn.execute(
            "INSERT INTO people (name, age) VALUES (?1, ?2);",
            params![input.name(), input.age()],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=person_create module=repo status=ok person_id={id}");
        Ok(id)
    }

    fn list_people(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY name ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut people = Vec::new();

        while let Some(row) = rows.next()? {
            if let Some(person) = decode_person_row(row)? {
                people.push(person);
            }
        }

        Ok(people)
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return decode_person_row(row);
        }

        Ok(None)
    }

    fn update_person(&self, id: PersonId, input: &PersonInput) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE people SET name = ?1, age = ?2 WHERE id = ?3;",
            params![input.name(), input.age(), id],
        )?;

        if changed == 0 {
            debug!("event=person_update module=repo status=noop person_id={id}");
        }
        Ok(())
    }

    fn delete_person(&self, id: PersonId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM people WHERE id = ?1;", [id])?;

        if changed == 0 {
            debug!("event=person_delete module=repo status=noop person_id={id}");
        }
        Ok(())
    }

    fn count_people(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

/// Decodes one row, or `None` when it cannot be shown as a person.
///
/// Unversioned roster files may hold NULLs, REAL ages (`1e+20`) or numeric
/// text in `age`. Recoverable values are coerced; anything else skips the
/// row so one bad row never hides the rest of the roster.
fn decode_person_row(row: &Row<'_>) -> RepoResult<Option<Person>> {
    let id: PersonId = row.get("id")?;

    let Some(name) = decode_name(row.get_ref("name")?) else {
        warn!("event=person_decode module=repo status=skipped person_id={id} column=name");
        return Ok(None);
    };
    let Some(age) = decode_age(row.get_ref("age")?) else {
        warn!("event=person_decode module=repo status=skipped person_id={id} column=age");
        return Ok(None);
    };

    Ok(Some(Person { id, name, age }))
}

fn decode_name(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
        ValueRef::Integer(number) => Some(number.to_string()),
        ValueRef::Real(number) => Some(number.to_string()),
    }
}

fn decode_age(value: ValueRef<'_>) -> Option<i64> {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(age) => Some(age),
        // `as` truncates toward zero, saturates at the i64 bounds, maps NaN to 0.
        ValueRef::Real(age) => Some(age as i64),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| parse_age(text).ok()),
    }
}

fn ensure_table_exists(conn: &Connection, table: &'static str) -> RepoResult<()> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;

    match found {
        Some(_) => Ok(()),
        None => Err(RepoError::MissingTable(table)),
    }
}
