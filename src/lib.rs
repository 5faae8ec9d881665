// todocli - personal todo list backed by a single JSON file

pub mod cli;
pub mod models;
pub mod store;

// Re-export main types for convenience
pub use models::{Task, TaskList};
pub use store::TaskStore;
