//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
    support::{PgPool, like_pattern, map_diesel, run_blocking},
};
use crate::domain::{PersistedTaskData, ProjectId, Task, TaskId, TaskStatus, TaskTitle};
use crate::error::{DbOp, EntityKind, OpErrorKind, RepositoryError, RepositoryResult};
use crate::ports::{TaskFilter, TaskRepository, TaskSort};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Canonical strings of the terminal statuses, for SQL-side guards.
const TERMINAL_STATUSES: [&str; 2] = [TaskStatus::Done.as_str(), TaskStatus::Cancelled.as_str()];

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        project_id: task.project_id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        deadline: task.deadline(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> RepositoryResult<Task> {
    let status = TaskStatus::try_from(row.status.as_str()).map_err(|err| {
        RepositoryError::operation(DbOp::Select, OpErrorKind::Other, err.to_string())
    })?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        title: TaskTitle::from_stored(row.title),
        description: row.description,
        status,
        deadline: row.deadline,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &Task) -> RepositoryResult<()> {
        let new_row = to_new_row(task);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_diesel(DbOp::Insert, err))?;
            Ok(())
        })
        .await
    }

    async fn get(&self, id: TaskId) -> RepositoryResult<Task> {
        run_blocking(&self.pool, move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(|err| map_diesel(DbOp::Select, err))?;
            row.map(row_to_task)
                .transpose()?
                .ok_or_else(|| RepositoryError::not_found(EntityKind::Task, id))
        })
        .await
    }

    async fn list(
        &self,
        project_id: ProjectId,
        filter: &TaskFilter,
    ) -> RepositoryResult<Vec<Task>> {
        let status = filter.status();
        let due_before = filter.due_before();
        let due_after = filter.due_after();
        let search = filter.search().map(str::to_owned);
        let sort = filter.sort();
        let limit = i64::from(filter.limit());
        let offset = i64::from(filter.offset());
        run_blocking(&self.pool, move |connection| {
            let mut query = tasks::table
                .filter(tasks::project_id.eq(project_id.into_inner()))
                .select(TaskRow::as_select())
                .into_boxed();
            if let Some(wanted) = status {
                query = query.filter(tasks::status.eq(wanted.as_str()));
            }
            if let Some(bound) = due_before {
                query = query.filter(tasks::deadline.le(Some(bound)));
            }
            if let Some(bound) = due_after {
                query = query.filter(tasks::deadline.ge(Some(bound)));
            }
            if let Some(term) = search {
                let pattern = like_pattern(&term);
                query = query.filter(
                    tasks::title
                        .ilike(pattern.clone())
                        .or(tasks::description.ilike(pattern)),
                );
            }
            // PostgreSQL sorts ASC with NULLS LAST by default, which is the
            // documented placement for deadline-less tasks.
            query = match sort {
                TaskSort::CreatedAt => query.order((tasks::created_at.asc(), tasks::id.asc())),
                TaskSort::Deadline => query.order((
                    tasks::deadline.asc(),
                    tasks::created_at.asc(),
                    tasks::id.asc(),
                )),
            };
            let rows: Vec<TaskRow> = query
                .limit(limit)
                .offset(offset)
                .load(connection)
                .map_err(|err| map_diesel(DbOp::Select, err))?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn update(&self, task: &Task) -> RepositoryResult<()> {
        let id = task.id();
        let title = task.title().as_str().to_owned();
        let description = task.description().map(str::to_owned);
        let status = task.status();
        let deadline = task.deadline();
        let updated_at = task.updated_at();
        run_blocking(&self.pool, move |connection| {
            let changed = diesel::update(tasks::table.find(id.into_inner()))
                .set((
                    tasks::title.eq(title),
                    tasks::description.eq(description),
                    tasks::status.eq(status.as_str()),
                    tasks::deadline.eq(deadline),
                    tasks::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(|err| map_diesel(DbOp::Update, err))?;
            if changed == 0 {
                return Err(RepositoryError::not_found(EntityKind::Task, id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> RepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let removed = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(|err| map_diesel(DbOp::Delete, err))?;
            if removed == 0 {
                return Err(RepositoryError::not_found(EntityKind::Task, id));
            }
            Ok(())
        })
        .await
    }

    async fn list_overdue(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<Task>> {
        run_blocking(&self.pool, move |connection| {
            let rows: Vec<TaskRow> = tasks::table
                .filter(tasks::deadline.lt(Some(now)))
                .filter(tasks::status.ne_all(TERMINAL_STATUSES))
                .order((tasks::deadline.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load(connection)
                .map_err(|err| map_diesel(DbOp::Select, err))?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn mark_closed(&self, id: TaskId, closed_at: DateTime<Utc>) -> RepositoryResult<bool> {
        run_blocking(&self.pool, move |connection| {
            // Guard and write are one statement, so a task completed by a
            // concurrent interactive update is filtered out, never reopened.
            let changed = diesel::update(
                tasks::table
                    .find(id.into_inner())
                    .filter(tasks::status.ne_all(TERMINAL_STATUSES)),
            )
            .set((
                tasks::status.eq(TaskStatus::Cancelled.as_str()),
                tasks::updated_at.eq(closed_at),
            ))
            .execute(connection)
            .map_err(|err| map_diesel(DbOp::Update, err))?;
            Ok(changed > 0)
        })
        .await
    }
}
