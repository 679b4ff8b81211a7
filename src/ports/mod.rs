//! Persistence ports consumed by the service layer.
//!
//! Each port is an async trait over domain aggregates; adapters translate
//! backend failures into the shared [`crate::error::RepositoryError`]
//! taxonomy so services stay storage-agnostic.

mod project;
mod task;

pub use project::{ProjectFilter, ProjectRecord, ProjectRepository};
pub use task::{TaskFilter, TaskRepository, TaskSort};

#[cfg(test)]
pub use project::MockProjectRepository;
#[cfg(test)]
pub use task::MockTaskRepository;

/// Default page size applied when a list filter does not set one.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Largest page size a list filter may request.
pub const MAX_PAGE_LIMIT: u32 = 100;
