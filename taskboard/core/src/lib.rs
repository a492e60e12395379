//! Core domain models and validation rules for Taskboard.
//!
//! Shared by the API server, which is the authority on what gets stored, and by
//! the client, which runs the same checks before sending anything.
pub mod task;
pub mod validation;

#[cfg(feature = "serde")]
mod json;

pub use task::{CreateTaskInput, Task, TaskFilter, TaskPriority, TaskStatus, UnknownVariant, UpdateTaskInput};
pub use validation::ValidationErrors;
