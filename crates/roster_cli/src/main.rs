//! Terminal front end for the roster core.
//!
//! # Responsibility
//! - Offer the roster screen's actions as subcommands.
//! - Stay a thin caller: validation and storage live in `roster_core`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use roster_core::db::{close_db, open_db};
use roster_core::{
    default_log_level, init_logging, FormOutcome, IgnoreReason, Person, PersonId, PersonService,
    RosterForm, SqlitePersonRepository,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roster")]
#[command(version)]
#[command(about = "Keep a small personal roster of people and their ages")]
struct Cli {
    /// Path to the roster database file
    #[arg(long, global = true, env = "ROSTER_DB_PATH", default_value = "peoplelist.db")]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error); defaults by build mode
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "ROSTER_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List everyone, sorted by name
    List,

    /// Print how many people are stored
    Count,

    /// Add a person
    Add {
        /// Name (surrounding whitespace is trimmed)
        name: String,
        /// Age as an integer
        #[arg(allow_hyphen_values = true)]
        age: String,
    },

    /// Overwrite name and age of an existing person
    Edit {
        /// Id shown by `list`
        #[arg(allow_negative_numbers = true)]
        id: PersonId,
        /// New name
        name: String,
        /// New age
        #[arg(allow_hyphen_values = true)]
        age: String,
    },

    /// Delete a person
    Delete {
        /// Id shown by `list`
        #[arg(allow_negative_numbers = true)]
        id: PersonId,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy()).map_err(anyhow::Error::msg)?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open roster database {}", cli.db.display()))?;
    {
        let repo = SqlitePersonRepository::try_new(&conn)?;
        let mut form = RosterForm::load(PersonService::new(repo))?;
        run(&mut form, cli.command)?;
    }
    close_db(conn)?;
    Ok(())
}

fn run(form: &mut RosterForm<SqlitePersonRepository<'_>>, command: Commands) -> Result<()> {
    match command {
        Commands::List => print_people(form.people()),
        Commands::Count => println!("Total People: {}", form.total()),
        Commands::Add { name, age } => {
            form.set_draft_name(name);
            form.set_draft_age(age);
            report(form.submit_draft()?, "added");
            print_people(form.people());
        }
        Commands::Edit { id, name, age } => {
            let outcome = match form.start_editing(id) {
                FormOutcome::Applied => {
                    form.set_edit_name(name);
                    form.set_edit_age(age);
                    form.save_edit()?
                }
                ignored => ignored,
            };
            report(outcome, "saved");
            print_people(form.people());
        }
        Commands::Delete { id } => {
            form.delete(id)?;
            info!("event=cli_delete module=cli status=ok person_id={id}");
            print_people(form.people());
        }
    }
    Ok(())
}

fn report(outcome: FormOutcome, applied: &str) {
    match outcome {
        FormOutcome::Applied => println!("{applied}"),
        FormOutcome::Ignored(IgnoreReason::Invalid(err)) => println!("nothing {applied}: {err}"),
        FormOutcome::Ignored(IgnoreReason::UnknownPerson(id)) => {
            println!("nothing {applied}: no person with id {id}")
        }
        FormOutcome::Ignored(IgnoreReason::NoEditSession) => println!("nothing {applied}"),
    }
}

fn print_people(people: &[Person]) {
    println!("Total People: {}", people.len());
    for person in people {
        println!("{:>5}  {} - Age: {}", person.id, person.name, person.age);
    }
}
