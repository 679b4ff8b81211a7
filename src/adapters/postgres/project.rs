//! `PostgreSQL` repository implementation for project storage.

use super::{
    models::{NewProjectRow, ProjectRow},
    schema::{projects, tasks},
    support::{PgPool, like_pattern, lower, map_diesel, run_blocking, sql_count},
};
use crate::adapters::row_count;
use crate::domain::{PersistedProjectData, Project, ProjectId, ProjectName};
use crate::error::{DbOp, EntityKind, OpErrorKind, RepositoryError, RepositoryResult};
use crate::ports::{ProjectFilter, ProjectRecord, ProjectRepository};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;
use uuid::Uuid;

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_new_row(project: &Project) -> NewProjectRow {
    NewProjectRow {
        id: project.id().into_inner(),
        name: project.name().as_str().to_owned(),
        description: project.description().map(str::to_owned),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

fn row_to_project(row: ProjectRow) -> Project {
    Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        name: ProjectName::from_stored(row.name),
        description: row.description,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn is_name_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "projects_name_lower_idx")
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn insert(&self, project: &Project) -> RepositoryResult<()> {
        let new_row = to_new_row(project);
        let name = project.name().to_string();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_name_unique_violation(info.as_ref()) =>
                    {
                        RepositoryError::operation(
                            DbOp::Insert,
                            OpErrorKind::UniqueViolation,
                            format!("project name already in use: {name}"),
                        )
                    }
                    other => map_diesel(DbOp::Insert, other),
                })?;
            Ok(())
        })
        .await
    }

    async fn get(&self, id: ProjectId) -> RepositoryResult<Project> {
        run_blocking(&self.pool, move |connection| {
            let row = projects::table
                .find(id.into_inner())
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(|err| map_diesel(DbOp::Select, err))?;
            row.map(row_to_project)
                .ok_or_else(|| RepositoryError::not_found(EntityKind::Project, id))
        })
        .await
    }

    async fn list(&self, filter: &ProjectFilter) -> RepositoryResult<Vec<ProjectRecord>> {
        let search = filter.search().map(str::to_owned);
        let limit = i64::from(filter.limit());
        let offset = i64::from(filter.offset());
        run_blocking(&self.pool, move |connection| {
            let mut query = projects::table
                .select(ProjectRow::as_select())
                .into_boxed();
            if let Some(term) = search {
                let pattern = like_pattern(&term);
                query = query.filter(
                    projects::name
                        .ilike(pattern.clone())
                        .or(projects::description.ilike(pattern)),
                );
            }
            let rows: Vec<ProjectRow> = query
                .order((projects::created_at.asc(), projects::id.asc()))
                .limit(limit)
                .offset(offset)
                .load(connection)
                .map_err(|err| map_diesel(DbOp::Select, err))?;

            let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
            let counts: Vec<(Uuid, i64)> = tasks::table
                .filter(tasks::project_id.eq_any(ids))
                .group_by(tasks::project_id)
                .select((tasks::project_id, diesel::dsl::count_star()))
                .load(connection)
                .map_err(|err| map_diesel(DbOp::Select, err))?;
            let count_by_project: HashMap<Uuid, i64> = counts.into_iter().collect();

            Ok(rows
                .into_iter()
                .map(|row| {
                    let task_count = count_by_project.get(&row.id).copied().unwrap_or(0);
                    ProjectRecord {
                        project: row_to_project(row),
                        task_count: sql_count(task_count),
                    }
                })
                .collect())
        })
        .await
    }

    async fn update(&self, project: &Project) -> RepositoryResult<()> {
        let id = project.id();
        let name = project.name().to_string();
        let description = project.description().map(str::to_owned);
        let updated_at = project.updated_at();
        run_blocking(&self.pool, move |connection| {
            let changed = diesel::update(projects::table.find(id.into_inner()))
                .set((
                    projects::name.eq(name.clone()),
                    projects::description.eq(description),
                    projects::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_name_unique_violation(info.as_ref()) =>
                    {
                        RepositoryError::operation(
                            DbOp::Update,
                            OpErrorKind::UniqueViolation,
                            format!("project name already in use: {name}"),
                        )
                    }
                    other => map_diesel(DbOp::Update, other),
                })?;
            if changed == 0 {
                return Err(RepositoryError::not_found(EntityKind::Project, id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> RepositoryResult<u64> {
        run_blocking(&self.pool, move |connection| {
            // Tasks are removed explicitly (rather than relying on the FK
            // cascade alone) so the removed-row count can be reported.
            // Any error, including the missing-project sentinel, rolls the
            // whole transaction back.
            let outcome: Result<usize, DieselError> = connection.transaction(|tx| {
                let removed_tasks =
                    diesel::delete(tasks::table.filter(tasks::project_id.eq(id.into_inner())))
                        .execute(tx)?;
                let removed_projects =
                    diesel::delete(projects::table.find(id.into_inner())).execute(tx)?;
                if removed_projects == 0 {
                    return Err(DieselError::NotFound);
                }
                Ok(removed_tasks)
            });
            match outcome {
                Ok(removed) => Ok(row_count(removed)),
                Err(DieselError::NotFound) => {
                    Err(RepositoryError::not_found(EntityKind::Project, id))
                }
                Err(err) => Err(map_diesel(DbOp::Delete, err)),
            }
        })
        .await
    }

    async fn count(&self) -> RepositoryResult<u64> {
        run_blocking(&self.pool, move |connection| {
            let total: i64 = projects::table
                .count()
                .get_result(connection)
                .map_err(|err| map_diesel(DbOp::Select, err))?;
            Ok(sql_count(total))
        })
        .await
    }

    async fn exists_by_name(
        &self,
        name: &str,
        exclude: Option<ProjectId>,
    ) -> RepositoryResult<bool> {
        let needle = name.to_lowercase();
        run_blocking(&self.pool, move |connection| {
            let matches: i64 = match exclude {
                Some(excluded) => projects::table
                    .filter(lower(projects::name).eq(needle))
                    .filter(projects::id.ne(excluded.into_inner()))
                    .count()
                    .get_result(connection),
                None => projects::table
                    .filter(lower(projects::name).eq(needle))
                    .count()
                    .get_result(connection),
            }
            .map_err(|err| map_diesel(DbOp::Select, err))?;
            Ok(matches > 0)
        })
        .await
    }
}
