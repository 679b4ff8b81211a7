//! In-memory implementation of the project and task repository ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::adapters::row_count;
use crate::domain::{Project, ProjectId, Task, TaskId};
use crate::error::{DbOp, EntityKind, OpErrorKind, RepositoryError, RepositoryResult};
use crate::ports::{
    ProjectFilter, ProjectRecord, ProjectRepository, TaskFilter, TaskRepository, TaskSort,
};

/// Thread-safe in-memory store backing both repository ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    projects: HashMap<ProjectId, Project>,
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> RepositoryResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|err| RepositoryError::connection(format!("store lock poisoned: {err}")))
    }

    fn write_state(&self) -> RepositoryResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|err| RepositoryError::connection(format!("store lock poisoned: {err}")))
    }
}

/// Case-insensitive equality used for the project-name uniqueness guard,
/// matching the `LOWER(name)` unique index in the `PostgreSQL` schema.
fn name_taken(state: &StoreState, name: &str, exclude: Option<ProjectId>) -> bool {
    let needle = name.to_lowercase();
    state.projects.values().any(|project| {
        exclude != Some(project.id()) && project.name().as_str().to_lowercase() == needle
    })
}

fn contains_ci(haystack: Option<&str>, needle_lower: &str) -> bool {
    haystack.is_some_and(|text| text.to_lowercase().contains(needle_lower))
}

fn matches_project(project: &Project, filter: &ProjectFilter) -> bool {
    filter.search().is_none_or(|term| {
        let needle = term.to_lowercase();
        contains_ci(Some(project.name().as_str()), &needle)
            || contains_ci(project.description(), &needle)
    })
}

fn matches_task(task: &Task, filter: &TaskFilter) -> bool {
    if filter.status().is_some_and(|status| task.status() != status) {
        return false;
    }
    if filter
        .due_before()
        .is_some_and(|bound| !task.deadline().is_some_and(|deadline| deadline <= bound))
    {
        return false;
    }
    if filter
        .due_after()
        .is_some_and(|bound| !task.deadline().is_some_and(|deadline| deadline >= bound))
    {
        return false;
    }
    filter.search().is_none_or(|term| {
        let needle = term.to_lowercase();
        contains_ci(Some(task.title().as_str()), &needle)
            || contains_ci(task.description(), &needle)
    })
}

/// Sort key placing absent deadlines after every concrete one.
fn deadline_key(task: &Task) -> DateTime<Utc> {
    task.deadline().unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn page<T>(items: Vec<T>, limit: u32, offset: u32) -> Vec<T> {
    let skip = usize::try_from(offset).unwrap_or(usize::MAX);
    let take = usize::try_from(limit).unwrap_or(usize::MAX);
    items.into_iter().skip(skip).take(take).collect()
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn insert(&self, project: &Project) -> RepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.projects.contains_key(&project.id()) {
            return Err(RepositoryError::operation(
                DbOp::Insert,
                OpErrorKind::UniqueViolation,
                format!("duplicate project id: {}", project.id()),
            ));
        }
        if name_taken(&state, project.name().as_str(), None) {
            return Err(RepositoryError::operation(
                DbOp::Insert,
                OpErrorKind::UniqueViolation,
                format!("project name already in use: {}", project.name()),
            ));
        }
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn get(&self, id: ProjectId) -> RepositoryResult<Project> {
        let state = self.read_state()?;
        state
            .projects
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Project, id))
    }

    async fn list(&self, filter: &ProjectFilter) -> RepositoryResult<Vec<ProjectRecord>> {
        let state = self.read_state()?;
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|project| matches_project(project, filter))
            .cloned()
            .collect();
        projects.sort_by_key(|project| (project.created_at(), project.id().into_inner()));
        let records = page(projects, filter.limit(), filter.offset())
            .into_iter()
            .map(|project| {
                let task_count = state
                    .tasks
                    .values()
                    .filter(|task| task.project_id() == project.id())
                    .count();
                ProjectRecord {
                    project,
                    task_count: row_count(task_count),
                }
            })
            .collect();
        Ok(records)
    }

    async fn update(&self, project: &Project) -> RepositoryResult<()> {
        let mut state = self.write_state()?;
        if !state.projects.contains_key(&project.id()) {
            return Err(RepositoryError::not_found(EntityKind::Project, project.id()));
        }
        if name_taken(&state, project.name().as_str(), Some(project.id())) {
            return Err(RepositoryError::operation(
                DbOp::Update,
                OpErrorKind::UniqueViolation,
                format!("project name already in use: {}", project.name()),
            ));
        }
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn delete(&self, id: ProjectId) -> RepositoryResult<u64> {
        let mut state = self.write_state()?;
        if state.projects.remove(&id).is_none() {
            return Err(RepositoryError::not_found(EntityKind::Project, id));
        }
        let before = state.tasks.len();
        state.tasks.retain(|_, task| task.project_id() != id);
        Ok(row_count(before - state.tasks.len()))
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let state = self.read_state()?;
        Ok(row_count(state.projects.len()))
    }

    async fn exists_by_name(
        &self,
        name: &str,
        exclude: Option<ProjectId>,
    ) -> RepositoryResult<bool> {
        let state = self.read_state()?;
        Ok(name_taken(&state, name, exclude))
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn insert(&self, task: &Task) -> RepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(RepositoryError::operation(
                DbOp::Insert,
                OpErrorKind::UniqueViolation,
                format!("duplicate task id: {}", task.id()),
            ));
        }
        if !state.projects.contains_key(&task.project_id()) {
            return Err(RepositoryError::operation(
                DbOp::Insert,
                OpErrorKind::ForeignKeyViolation,
                format!("no project with id: {}", task.project_id()),
            ));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn get(&self, id: TaskId) -> RepositoryResult<Task> {
        let state = self.read_state()?;
        state
            .tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Task, id))
    }

    async fn list(
        &self,
        project_id: ProjectId,
        filter: &TaskFilter,
    ) -> RepositoryResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.project_id() == project_id && matches_task(task, filter))
            .cloned()
            .collect();
        match filter.sort() {
            TaskSort::CreatedAt => {
                tasks.sort_by_key(|task| (task.created_at(), task.id().into_inner()));
            }
            TaskSort::Deadline => {
                tasks.sort_by_key(|task| {
                    (deadline_key(task), task.created_at(), task.id().into_inner())
                });
            }
        }
        Ok(page(tasks, filter.limit(), filter.offset()))
    }

    async fn update(&self, task: &Task) -> RepositoryResult<()> {
        let mut state = self.write_state()?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(RepositoryError::not_found(EntityKind::Task, task.id()));
        }
        if !state.projects.contains_key(&task.project_id()) {
            return Err(RepositoryError::operation(
                DbOp::Update,
                OpErrorKind::ForeignKeyViolation,
                format!("no project with id: {}", task.project_id()),
            ));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> RepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.tasks.remove(&id).is_none() {
            return Err(RepositoryError::not_found(EntityKind::Task, id));
        }
        Ok(())
    }

    async fn list_overdue(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut overdue: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.is_overdue(now))
            .cloned()
            .collect();
        overdue.sort_by_key(|task| (deadline_key(task), task.id().into_inner()));
        Ok(overdue)
    }

    async fn mark_closed(&self, id: TaskId, closed_at: DateTime<Utc>) -> RepositoryResult<bool> {
        let mut state = self.write_state()?;
        Ok(state
            .tasks
            .get_mut(&id)
            .is_some_and(|task| task.close(closed_at)))
    }
}
