//! Saved projects.

pub mod model;
pub mod repository;

pub use model::{ChatMessage, ChatRole, ProjectRecord, ProjectSnapshot, project_name};
pub use repository::ProjectRepository;
