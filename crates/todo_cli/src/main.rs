//! Command-line probe over the todo action layer.
//!
//! # Responsibility
//! - Resolve configuration from env, overridden by flags.
//! - Run one action per invocation and print its envelope as JSON.
//!
//! Exit status is non-zero when the envelope reports a failure.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use todo_actions::{
    ActionResult, AppConfig, CreateTaskInput, SharedStore, StoreLocation, TodoActions,
};
use todo_core::{Priority, TaskId, TaskPatch};

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Single-user todo list backed by SQLite")]
struct Cli {
    /// Path to the `SQLite` database (overrides TODO_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory for rolling log files (overrides TODO_LOG_DIR).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level filter (overrides TODO_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a task.
    Add {
        title: String,
        #[arg(long)]
        category: Option<String>,
        /// One of low, medium, high.
        #[arg(long)]
        priority: Option<String>,
    },
    /// List tasks, optionally restricted to one category (`all` lists everything).
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Set the completion state of a task.
    Toggle {
        id: TaskId,
        /// Mark the task as not completed instead.
        #[arg(long)]
        undo: bool,
    },
    /// Change fields of a task. At least one field is required.
    Edit {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a task.
    Delete { id: TaskId },
    /// Search titles for an exact substring.
    Search { query: String },
    /// Show categories with task counts.
    Categories,
    /// Show task totals.
    Stats,
}

fn parse_priority(raw: &str) -> Result<Priority, String> {
    raw.parse::<Priority>().map_err(|err| err.to_string())
}

impl Cli {
    fn config(&self) -> AppConfig {
        let mut config = AppConfig::from_env();
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_dir = Some(log_dir.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.config();
    if let Err(err) = config.init_logging() {
        eprintln!("logging disabled: {err}");
    }

    let actions = TodoActions::new(SharedStore::new(StoreLocation::File(config.db_path)));
    let exit = run(&actions, cli.command);
    if let Err(err) = actions.store().close() {
        eprintln!("failed to close store: {err}");
    }
    exit
}

fn run(actions: &TodoActions, command: Command) -> ExitCode {
    match command {
        Command::Add {
            title,
            category,
            priority,
        } => {
            let mut input = CreateTaskInput::new(title);
            if let Some(category) = category {
                input = input.category(category);
            }
            if let Some(priority) = priority {
                input = input.priority(priority);
            }
            emit(&actions.create_task(&input))
        }
        Command::List { category } => match category {
            Some(name) => emit(&actions.list_tasks_by_category(&name)),
            None => emit(&actions.list_tasks()),
        },
        Command::Toggle { id, undo } => emit(&actions.toggle_task(id, !undo)),
        Command::Edit {
            id,
            title,
            category,
            priority,
            completed,
        } => {
            let patch = TaskPatch {
                title,
                completed,
                category,
                priority,
            };
            emit(&actions.update_task(id, &patch))
        }
        Command::Delete { id } => emit(&actions.delete_task(id)),
        Command::Search { query } => emit(&actions.search_tasks(&query)),
        Command::Categories => emit(&actions.categories_with_counts()),
        Command::Stats => emit(&actions.task_stats()),
    }
}

fn emit<T: Serialize>(result: &ActionResult<T>) -> ExitCode {
    match result.to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("failed to encode result: {err}");
            return ExitCode::FAILURE;
        }
    }
    if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
