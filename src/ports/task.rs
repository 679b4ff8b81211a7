//! Repository port for task persistence, lookup, and overdue processing.

use super::DEFAULT_PAGE_LIMIT;
use crate::domain::{ProjectId, Task, TaskId, TaskStatus};
use crate::error::RepositoryResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::automock;

/// Sort key for task list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    /// Order by creation time ascending.
    #[default]
    CreatedAt,
    /// Order by deadline ascending, tasks without a deadline last.
    Deadline,
}

/// Query parameters for listing tasks within a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    status: Option<TaskStatus>,
    due_before: Option<DateTime<Utc>>,
    due_after: Option<DateTime<Utc>>,
    search: Option<String>,
    sort: TaskSort,
    limit: u32,
    offset: u32,
}

impl TaskFilter {
    /// Creates a filter with the default page size and no constraints.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: None,
            due_before: None,
            due_after: None,
            search: None,
            sort: TaskSort::CreatedAt,
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }

    /// Restricts results to tasks in the given status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts results to tasks due at or before the instant (inclusive).
    #[must_use]
    pub const fn with_due_before(mut self, instant: DateTime<Utc>) -> Self {
        self.due_before = Some(instant);
        self
    }

    /// Restricts results to tasks due at or after the instant (inclusive).
    #[must_use]
    pub const fn with_due_after(mut self, instant: DateTime<Utc>) -> Self {
        self.due_after = Some(instant);
        self
    }

    /// Restricts results to tasks whose title or description contains the
    /// term, case-insensitively.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the sort key.
    #[must_use]
    pub const fn sort_by(mut self, sort: TaskSort) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the number of leading results to skip.
    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Returns the status constraint, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the inclusive upper deadline bound, if any.
    #[must_use]
    pub const fn due_before(&self) -> Option<DateTime<Utc>> {
        self.due_before
    }

    /// Returns the inclusive lower deadline bound, if any.
    #[must_use]
    pub const fn due_after(&self) -> Option<DateTime<Utc>> {
        self.due_after
    }

    /// Returns the search term, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns the sort key.
    #[must_use]
    pub const fn sort(&self) -> TaskSort {
        self.sort
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the number of leading results to skip.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Task persistence contract.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns a foreign-key-violation operation error when the owning
    /// project does not exist.
    async fn insert(&self, task: &Task) -> RepositoryResult<()>;

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when no task has
    /// the identifier.
    async fn get(&self, id: TaskId) -> RepositoryResult<Task>;

    /// Lists tasks owned by the project, constrained and ordered by the
    /// filter.
    async fn list(&self, project_id: ProjectId, filter: &TaskFilter) -> RepositoryResult<Vec<Task>>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the task
    /// does not exist.
    async fn update(&self, task: &Task) -> RepositoryResult<()>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the task
    /// does not exist.
    async fn delete(&self, id: TaskId) -> RepositoryResult<()>;

    /// Returns every task whose deadline lies strictly before `now` and
    /// whose status is non-terminal, ordered by deadline ascending.
    async fn list_overdue(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<Task>>;

    /// Moves a task to `cancelled` if and only if it is currently
    /// non-terminal, setting `updated_at` to `closed_at`.
    ///
    /// Returns whether a row actually changed; a missing or already
    /// terminal task yields `false`. Guard and write happen in a single
    /// statement so a task completed concurrently is never reopened.
    async fn mark_closed(&self, id: TaskId, closed_at: DateTime<Utc>) -> RepositoryResult<bool>;
}
