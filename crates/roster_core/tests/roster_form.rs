use roster_core::db::open_db_in_memory;
use roster_core::{
    FieldText, FormOutcome, IgnoreReason, PersonRepository, PersonService, PersonValidationError,
    RosterForm, SqlitePersonRepository,
};
use rusqlite::Connection;

fn load_form(conn: &Connection) -> RosterForm<SqlitePersonRepository<'_>> {
    let repo = SqlitePersonRepository::try_new(conn).unwrap();
    RosterForm::load(PersonService::new(repo)).unwrap()
}

fn add(form: &mut RosterForm<SqlitePersonRepository<'_>>, name: &str, age: &str) -> FormOutcome {
    form.set_draft_name(name);
    form.set_draft_age(age);
    form.submit_draft().unwrap()
}

#[test]
fn load_reads_existing_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO people (name, age) VALUES ('Existing', 50);",
        [],
    )
    .unwrap();

    let form = load_form(&conn);
    assert_eq!(form.total(), 1);
    assert_eq!(form.people()[0].name, "Existing");
    assert!(form.editing().is_none());
}

#[test]
fn load_survives_rows_with_unreadable_values() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO people (name, age) VALUES ('Real', 1e+20);
         INSERT INTO people (name, age) VALUES (NULL, 3);
         INSERT INTO people (name, age) VALUES ('Plain', 4);",
    )
    .unwrap();

    let form = load_form(&conn);
    let rows: Vec<_> = form
        .people()
        .iter()
        .map(|p| (p.name.as_str(), p.age))
        .collect();
    assert_eq!(rows, vec![("Plain", 4), ("Real", i64::MAX)]);
    assert_eq!(form.total(), 2);
}

#[test]
fn valid_submit_stores_person_and_clears_draft() {
    let conn = open_db_in_memory().unwrap();
    let mut form = load_form(&conn);

    assert_eq!(add(&mut form, "  Bob ", "25"), FormOutcome::Applied);
    assert_eq!(add(&mut form, "Alice", "30"), FormOutcome::Applied);

    assert_eq!(form.draft(), &FieldText::default());
    assert_eq!(form.total(), 2);
    let names: Vec<_> = form.people().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
}

#[test]
fn invalid_submit_is_ignored_and_keeps_draft_text() {
    let conn = open_db_in_memory().unwrap();
    let mut form = load_form(&conn);

    let outcome = add(&mut form, "   ", "30");
    assert_eq!(
        outcome,
        FormOutcome::Ignored(IgnoreReason::Invalid(PersonValidationError::EmptyName))
    );
    assert_eq!(form.draft().name, "   ");

    let outcome = add(&mut form, "Carol", "abc");
    assert!(matches!(
        outcome,
        FormOutcome::Ignored(IgnoreReason::Invalid(PersonValidationError::InvalidAge(_)))
    ));
    assert_eq!(form.draft().age, "abc");

    assert_eq!(form.total(), 0);
    let stored = SqlitePersonRepository::try_new(&conn)
        .unwrap()
        .count_people()
        .unwrap();
    assert_eq!(stored, 0);
}

#[test]
fn edit_session_prefills_and_saves() {
    let conn = open_db_in_memory().unwrap();
    let mut form = load_form(&conn);
    add(&mut form, "Alice", "30");
    add(&mut form, "Bob", "25");
    let alice_id = form.people()[0].id;

    assert_eq!(form.start_editing(alice_id), FormOutcome::Applied);
    let session = form.editing().unwrap();
    assert_eq!(session.id, alice_id);
    assert_eq!(session.fields.name, "Alice");
    assert_eq!(session.fields.age, "30");

    form.set_edit_name("Alicia");
    form.set_edit_age("31");
    assert_eq!(form.save_edit().unwrap(), FormOutcome::Applied);

    assert!(form.editing().is_none());
    let rows: Vec<_> = form
        .people()
        .iter()
        .map(|p| (p.id, p.name.as_str(), p.age))
        .collect();
    assert_eq!(rows[0], (alice_id, "Alicia", 31));
    assert_eq!(rows[1].1, "Bob");
}

#[test]
fn invalid_save_keeps_session_and_row() {
    let conn = open_db_in_memory().unwrap();
    let mut form = load_form(&conn);
    add(&mut form, "Alice", "30");
    let id = form.people()[0].id;

    form.start_editing(id);
    form.set_edit_age("not a number");
    let outcome = form.save_edit().unwrap();

    assert!(matches!(outcome, FormOutcome::Ignored(IgnoreReason::Invalid(_))));
    assert_eq!(form.editing().unwrap().fields.age, "not a number");
    assert_eq!(form.people()[0].age, 30);
}

#[test]
fn cancel_edit_discards_changes() {
    let conn = open_db_in_memory().unwrap();
    let mut form = load_form(&conn);
    add(&mut form, "Alice", "30");
    let id = form.people()[0].id;

    form.start_editing(id);
    form.set_edit_name("Changed");
    form.cancel_edit();

    assert!(form.editing().is_none());
    assert_eq!(form.save_edit().unwrap(), FormOutcome::Ignored(IgnoreReason::NoEditSession));
    assert_eq!(
        form.set_edit_name("late"),
        FormOutcome::Ignored(IgnoreReason::NoEditSession)
    );
    form.refresh().unwrap();
    assert_eq!(form.people()[0].name, "Alice");
}

#[test]
fn start_editing_unknown_id_is_ignored() {
    let conn = open_db_in_memory().unwrap();
    let mut form = load_form(&conn);

    assert_eq!(
        form.start_editing(77),
        FormOutcome::Ignored(IgnoreReason::UnknownPerson(77))
    );
    assert!(form.editing().is_none());
}

#[test]
fn deleting_edited_row_ends_session() {
    let conn = open_db_in_memory().unwrap();
    let mut form = load_form(&conn);
    add(&mut form, "Alice", "30");
    add(&mut form, "Bob", "25");
    let alice_id = form.people()[0].id;
    let bob_id = form.people()[1].id;

    form.start_editing(bob_id);
    form.delete(alice_id).unwrap();
    assert_eq!(form.editing().map(|session| session.id), Some(bob_id));
    assert_eq!(form.total(), 1);

    form.delete(bob_id).unwrap();
    assert!(form.editing().is_none());
    assert_eq!(form.total(), 0);
}

#[test]
fn saving_after_row_vanished_is_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut form = load_form(&conn);
    add(&mut form, "Alice", "30");
    let id = form.people()[0].id;
    form.start_editing(id);

    conn.execute("DELETE FROM people WHERE id = ?1;", [id]).unwrap();

    assert_eq!(form.save_edit().unwrap(), FormOutcome::Applied);
    assert_eq!(form.total(), 0);
    assert!(form.editing().is_none());
}
