// CLI surface and command handlers

use crate::models::Task;
use crate::store::TaskStore;
use clap::{Parser, Subcommand};
use eyre::{Result, bail};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "todocli")]
#[command(about = "A todo list CLI application")]
#[command(version)]
pub struct Cli {
    /// Root directory for the task store (default: home directory)
    #[arg(short, long, global = true)]
    pub store_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task to the list
    #[command(visible_alias = "a")]
    Add {
        /// Name of the task
        #[arg(short, long)]
        name: Option<String>,

        /// Label of the task
        #[arg(short, long)]
        label: Option<String>,

        /// Task name as a positional argument
        #[arg(value_name = "NAME")]
        task: Option<String>,
    },

    /// Remove a task from the list by its ID
    #[command(visible_alias = "r")]
    Remove {
        /// Task ID, or "all" to remove every task
        #[arg(value_name = "ID")]
        id: Option<String>,
    },

    /// List all tasks
    #[command(visible_alias = "l")]
    List,
}

/// Dispatch a parsed command against the store
///
/// User-input errors carry their exact CLI message; the caller prints it
/// and exits nonzero.
pub fn run(store: &TaskStore, command: Commands) -> Result<()> {
    match command {
        Commands::Add { name, label, task } => add(store, name, label, task),
        Commands::Remove { id } => remove(store, id),
        Commands::List => list(store),
    }
}

fn add(
    store: &TaskStore,
    name: Option<String>,
    label: Option<String>,
    task: Option<String>,
) -> Result<()> {
    // The flag wins; an empty flag falls through to the positional
    let name = name
        .filter(|name| !name.is_empty())
        .or_else(|| task.filter(|name| !name.is_empty()));

    let Some(name) = name else {
        bail!("No task provided");
    };

    let id = store.count() as i64 + 1;
    store.add(Task::new(id, name, label.unwrap_or_default()))?;

    Ok(())
}

fn remove(store: &TaskStore, id: Option<String>) -> Result<()> {
    let Some(raw) = id else {
        bail!("No task ID provided");
    };

    if raw == "all" {
        return store.remove_all();
    }

    let id: i64 = match raw.parse() {
        Ok(id) => id,
        Err(_) => bail!("Invalid task ID provided"),
    };

    if !store.exists(id) {
        bail!("Task does not exist");
    }

    if let Err(err) = store.remove(id) {
        debug!(id, error = ?err, "Delete failed");
        bail!("Error deleting task");
    }

    println!("Task {id} has been deleted");
    Ok(())
}

fn list(store: &TaskStore) -> Result<()> {
    let list = store.load();

    if list.is_empty() {
        bail!("No tasks found, use 'add' command to start creating tasks");
    }

    for task in &list.tasks {
        println!("{}", task_line(task));
    }

    Ok(())
}

fn task_line(task: &Task) -> String {
    format!("{}\t{} - {}", task.id, task.checkbox(), task.name)
}
