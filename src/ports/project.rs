//! Repository port for project persistence, lookup, and cascade deletion.

use super::DEFAULT_PAGE_LIMIT;
use crate::domain::{Project, ProjectId};
use crate::error::RepositoryResult;
use async_trait::async_trait;
use serde::Serialize;

#[cfg(test)]
use mockall::automock;

/// Query parameters for listing projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFilter {
    search: Option<String>,
    limit: u32,
    offset: u32,
}

impl ProjectFilter {
    /// Creates a filter with the default page size and no search term.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            search: None,
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }

    /// Restricts results to projects whose name or description contains the
    /// term, case-insensitively.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
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

    /// Returns the search term, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
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

impl Default for ProjectFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// A project joined with the number of tasks it currently owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRecord {
    /// The project aggregate.
    pub project: Project,
    /// Number of tasks owned by the project.
    pub task_count: u64,
}

/// Project persistence contract.
///
/// Implementations own the authoritative uniqueness guard for project names
/// (case-insensitive); [`ProjectRepository::exists_by_name`] is only an
/// advisory pre-check used for friendlier error messages.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns a unique-violation operation error when another project
    /// already uses the name (compared case-insensitively).
    async fn insert(&self, project: &Project) -> RepositoryResult<()>;

    /// Retrieves a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when no project
    /// has the identifier.
    async fn get(&self, id: ProjectId) -> RepositoryResult<Project>;

    /// Lists projects matching the filter, each joined with its task count,
    /// ordered by creation time ascending.
    async fn list(&self, filter: &ProjectFilter) -> RepositoryResult<Vec<ProjectRecord>>;

    /// Persists changes to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the project
    /// does not exist, or a unique-violation operation error when the new
    /// name collides with another project.
    async fn update(&self, project: &Project) -> RepositoryResult<()>;

    /// Deletes a project and every task it owns in one transactional scope.
    ///
    /// Returns the number of tasks removed by the cascade.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the project
    /// does not exist; in that case nothing is deleted.
    async fn delete(&self, id: ProjectId) -> RepositoryResult<u64>;

    /// Returns the total number of projects.
    async fn count(&self) -> RepositoryResult<u64>;

    /// Reports whether a project with the given name exists, compared
    /// case-insensitively. `exclude` omits one project from the check so a
    /// rename to the same name does not collide with itself.
    async fn exists_by_name(
        &self,
        name: &str,
        exclude: Option<ProjectId>,
    ) -> RepositoryResult<bool>;
}
