//! `PostgreSQL` adapters for project and task persistence.
//!
//! The schema enforces the invariants the services rely on: a
//! case-insensitive unique index on project names and a cascading foreign
//! key from tasks to their owning project. Queries run on the blocking
//! thread pool via [`tokio::task::spawn_blocking`].

mod models;
mod project;
mod schema;
mod support;
mod task;

pub use project::PostgresProjectRepository;
pub use support::{PgPool, build_pool};
pub use task::PostgresTaskRepository;
