//! Client side of the task board: an HTTP API client, a per-filter cache, the
//! board state machine driving the views, and terminal rendering.
pub mod api;
pub mod board;
pub mod cache;
pub mod config;
pub mod form;
pub mod render;

pub use api::{ApiError, HttpTaskApi, TaskApi};
pub use board::{BoardError, FormMode, ListState, TaskBoard};
pub use form::TaskForm;
