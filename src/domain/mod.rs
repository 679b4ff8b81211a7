//! Domain model for project and task management.
//!
//! The domain models project ownership of tasks, workflow status, and
//! deadline semantics while keeping all infrastructure concerns outside of
//! the domain boundary. Input validation lives in the scalar constructors so
//! no aggregate can hold an out-of-range value.

mod ids;
mod project;
mod task;

pub use ids::{ProjectId, ProjectName, TaskId, TaskTitle, normalize_description};
pub use project::{PersistedProjectData, Project};
pub use task::{
    NewTaskData, ParseTaskStatusError, PersistedTaskData, Task, TaskStatus, parse_deadline,
};
