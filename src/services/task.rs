//! Service layer for task management within a project.

use crate::config::Limits;
use crate::domain::{
    NewTaskData, ProjectId, Task, TaskId, TaskStatus, TaskTitle, normalize_description,
    parse_deadline,
};
use crate::error::{EntityKind, RepositoryError, ServiceError, ServiceResult};
use crate::ports::{ProjectRepository, TaskFilter, TaskRepository};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    status: Option<String>,
    deadline: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: None,
            deadline: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status; defaults to `to-do` when unset.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the deadline as RFC 3339 or `YYYY-MM-DD`.
    #[must_use]
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }
}

/// Request payload for updating a task. Unset fields are left unchanged;
/// an empty deadline string clears the deadline and a whitespace-only
/// description clears the description.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    deadline: Option<String>,
}

impl UpdateTaskRequest {
    /// Creates an empty update request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the task title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the task status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Replaces the deadline; an empty string clears it.
    #[must_use]
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }
}

/// Task management service scoped to a parent project.
#[derive(Clone)]
pub struct TaskService<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    tasks: Arc<T>,
    clock: Arc<C>,
    limits: Limits,
}

/// A task reached through the wrong project reads as missing rather than
/// misfiled, so probing one project cannot reveal another's tasks.
fn ensure_membership(project_id: ProjectId, task: &Task) -> ServiceResult<()> {
    if task.project_id() != project_id {
        return Err(ServiceError::Repository(
            RepositoryError::not_found_described(
                EntityKind::Task,
                format!("id: {}, project: {project_id}", task.id()),
            ),
        ));
    }
    Ok(())
}

fn parse_status(raw: &str) -> ServiceResult<TaskStatus> {
    TaskStatus::try_from(raw).map_err(|err| ServiceError::validation("status", err.to_string()))
}

impl<P, T, C> TaskService<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(projects: Arc<P>, tasks: Arc<T>, clock: Arc<C>, limits: Limits) -> Self {
        Self {
            projects,
            tasks,
            clock,
            limits,
        }
    }

    /// Creates a task under the given project.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] wrapping a not-found error when
    /// the project does not exist (also when it vanishes between the
    /// existence check and the insert), and [`ServiceError::Validation`]
    /// for an invalid title, description, status, or deadline.
    pub async fn create(
        &self,
        project_id: ProjectId,
        request: CreateTaskRequest,
    ) -> ServiceResult<Task> {
        self.projects.get(project_id).await?;

        let title = TaskTitle::new(request.title, self.limits.max_task_title_chars)?;
        let description =
            normalize_description(request.description, self.limits.max_description_chars)?;
        let status = match request.status {
            Some(raw) => parse_status(&raw)?,
            None => TaskStatus::default(),
        };
        let deadline = match request.deadline {
            Some(raw) => Some(parse_deadline(&raw)?),
            None => None,
        };

        let task = Task::new(
            NewTaskData {
                project_id,
                title,
                description,
                status,
                deadline,
            },
            &*self.clock,
        );
        match self.tasks.insert(&task).await {
            Ok(()) => {
                tracing::info!("created task {} in project {project_id}", task.id());
                Ok(task)
            }
            // The parent passed the existence check but was deleted before
            // the insert landed; the foreign key caught it.
            Err(err) if err.is_foreign_key_violation() => Err(ServiceError::Repository(
                RepositoryError::not_found(EntityKind::Project, project_id),
            )),
            Err(err) => Err(err.into()),
        }
    }

    /// Retrieves a task, verifying it belongs to the given project.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] wrapping a not-found error when
    /// the project or task does not exist, or when the task belongs to a
    /// different project.
    pub async fn get(&self, project_id: ProjectId, task_id: TaskId) -> ServiceResult<Task> {
        self.projects.get(project_id).await?;
        let task = self.tasks.get(task_id).await?;
        ensure_membership(project_id, &task)?;
        Ok(task)
    }

    /// Lists tasks owned by the project, constrained by the filter.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the filter's page size is
    /// outside the accepted range, and [`ServiceError::Repository`]
    /// wrapping a not-found error when the project does not exist.
    pub async fn list(&self, project_id: ProjectId, filter: &TaskFilter) -> ServiceResult<Vec<Task>> {
        super::validate_page_limit(filter.limit())?;
        self.projects.get(project_id).await?;
        Ok(self.tasks.list(project_id, filter).await?)
    }

    /// Applies a partial update to a task.
    ///
    /// Status may move freely, including back out of a terminal status;
    /// interactive edits are authoritative over batch decisions.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] wrapping a not-found error when
    /// the project or task does not exist or the task belongs to a
    /// different project, and [`ServiceError::Validation`] for invalid
    /// fields.
    pub async fn update(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        request: UpdateTaskRequest,
    ) -> ServiceResult<Task> {
        self.projects.get(project_id).await?;
        let mut task = self.tasks.get(task_id).await?;
        ensure_membership(project_id, &task)?;

        if let Some(raw) = request.title {
            let title = TaskTitle::new(raw, self.limits.max_task_title_chars)?;
            task.retitle(title, &*self.clock);
        }
        if let Some(raw) = request.description {
            let description = normalize_description(Some(raw), self.limits.max_description_chars)?;
            task.set_description(description, &*self.clock);
        }
        if let Some(raw) = request.status {
            task.set_status(parse_status(&raw)?, &*self.clock);
        }
        if let Some(raw) = request.deadline {
            let deadline = if raw.trim().is_empty() {
                None
            } else {
                Some(parse_deadline(&raw)?)
            };
            task.set_deadline(deadline, &*self.clock);
        }

        self.tasks.update(&task).await?;
        tracing::info!(
            "updated task {} in project {project_id} (status: {})",
            task.id(),
            task.status(),
        );
        Ok(task)
    }

    /// Deletes a task, verifying it belongs to the given project.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] wrapping a not-found error when
    /// the project or task does not exist, or when the task belongs to a
    /// different project.
    pub async fn delete(&self, project_id: ProjectId, task_id: TaskId) -> ServiceResult<()> {
        self.projects.get(project_id).await?;
        let task = self.tasks.get(task_id).await?;
        ensure_membership(project_id, &task)?;
        self.tasks.delete(task_id).await?;
        tracing::info!("deleted task {task_id} from project {project_id}");
        Ok(())
    }
}
