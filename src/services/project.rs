//! Service layer for project management.

use crate::config::Limits;
use crate::domain::{Project, ProjectId, ProjectName, normalize_description};
use crate::error::{EntityKind, ServiceError, ServiceResult};
use crate::ports::{ProjectFilter, ProjectRecord, ProjectRepository};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: Option<String>,
}

impl CreateProjectRequest {
    /// Creates a request with the required project name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for updating a project. Unset fields are left unchanged;
/// a whitespace-only description clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateProjectRequest {
    name: Option<String>,
    description: Option<String>,
}

impl UpdateProjectRequest {
    /// Creates an empty update request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the project name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Project management service.
///
/// Enforces the project ceiling and name uniqueness on top of the
/// repository port. Name uniqueness is pre-checked for a friendly error,
/// but the storage-level unique index stays authoritative in the window
/// between check and write.
#[derive(Clone)]
pub struct ProjectService<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    limits: Limits,
}

impl<R, C> ProjectService<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>, limits: Limits) -> Self {
        Self {
            repository,
            clock,
            limits,
        }
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for an empty or over-long name
    /// or description, [`ServiceError::LimitExceeded`] when the project
    /// ceiling is reached, [`ServiceError::Duplicate`] when the name is
    /// already in use (compared case-insensitively), and
    /// [`ServiceError::Repository`] for storage failures.
    pub async fn create(&self, request: CreateProjectRequest) -> ServiceResult<Project> {
        let name = ProjectName::new(request.name, self.limits.max_project_name_chars)?;
        let description =
            normalize_description(request.description, self.limits.max_description_chars)?;

        let current = self.repository.count().await?;
        if current >= self.limits.max_projects {
            return Err(ServiceError::limit_exceeded(
                "projects",
                self.limits.max_projects,
                current,
            ));
        }

        if self.repository.exists_by_name(name.as_str(), None).await? {
            return Err(ServiceError::duplicate(
                EntityKind::Project,
                "name",
                name.as_str(),
            ));
        }

        let project = Project::new(name, description, &*self.clock);
        match self.repository.insert(&project).await {
            Ok(()) => {
                tracing::info!("created project {} ({})", project.id(), project.name());
                Ok(project)
            }
            // Lost the race with a concurrent create; report it the same
            // way as the pre-check.
            Err(err) if err.is_unique_violation() => Err(ServiceError::duplicate(
                EntityKind::Project,
                "name",
                project.name().as_str(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    /// Retrieves a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] wrapping a not-found error when
    /// the project does not exist.
    pub async fn get(&self, id: ProjectId) -> ServiceResult<Project> {
        Ok(self.repository.get(id).await?)
    }

    /// Lists projects with their task counts.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the filter's page size is
    /// outside the accepted range, and [`ServiceError::Repository`] for
    /// storage failures.
    pub async fn list(&self, filter: &ProjectFilter) -> ServiceResult<Vec<ProjectRecord>> {
        super::validate_page_limit(filter.limit())?;
        Ok(self.repository.list(filter).await?)
    }

    /// Applies a partial update to a project.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] wrapping a not-found error when
    /// the project does not exist, [`ServiceError::Validation`] for invalid
    /// fields, and [`ServiceError::Duplicate`] when renaming to a name
    /// another project already uses.
    pub async fn update(
        &self,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> ServiceResult<Project> {
        let mut project = self.repository.get(id).await?;

        if let Some(raw) = request.name {
            let name = ProjectName::new(raw, self.limits.max_project_name_chars)?;
            if self
                .repository
                .exists_by_name(name.as_str(), Some(id))
                .await?
            {
                return Err(ServiceError::duplicate(
                    EntityKind::Project,
                    "name",
                    name.as_str(),
                ));
            }
            project.rename(name, &*self.clock);
        }
        if let Some(raw) = request.description {
            let description =
                normalize_description(Some(raw), self.limits.max_description_chars)?;
            project.set_description(description, &*self.clock);
        }

        match self.repository.update(&project).await {
            Ok(()) => {
                tracing::info!("updated project {}", project.id());
                Ok(project)
            }
            Err(err) if err.is_unique_violation() => Err(ServiceError::duplicate(
                EntityKind::Project,
                "name",
                project.name().as_str(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a project together with every task it owns.
    ///
    /// The cascade is unconditional: open tasks do not block deletion.
    /// Returns the number of tasks removed.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] wrapping a not-found error when
    /// the project does not exist; nothing is deleted in that case.
    pub async fn delete(&self, id: ProjectId) -> ServiceResult<u64> {
        let removed_tasks = self.repository.delete(id).await?;
        tracing::info!("deleted project {id} and {removed_tasks} of its tasks");
        Ok(removed_tasks)
    }
}
