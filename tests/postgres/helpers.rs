//! Shared test helpers for `PostgreSQL` integration tests.

pub use super::cluster::{BoxError, PostgresCluster, TemporaryDatabase};
use super::cluster::shared_cluster;
use chrono::{DateTime, Utc};
use diesel::Connection;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Once;
use taskforge::adapters::postgres::{
    PostgresProjectRepository, PostgresTaskRepository, build_pool,
};
use taskforge::domain::{NewTaskData, Project, ProjectName, Task, TaskStatus, TaskTitle};

/// SQL to create the base schema for tests.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-08-17-000000_create_projects_and_tasks/up.sql");

/// Routes `tracing` output through the test harness, once per process.
fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        drop(tracing_subscriber::fmt().with_test_writer().try_init());
    });
}

/// Applies the schema migration to the database at the given URL.
///
/// This is a blocking operation that should be called from `spawn_blocking`
/// or a synchronous context.
fn apply_migrations(url: &str) -> Result<(), BoxError> {
    let mut conn = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
    conn.batch_execute(CREATE_SCHEMA_SQL)
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok(())
}

/// Prepared repository context for tests that need database access.
pub struct PreparedRepos {
    /// Migrated per-test database backing the repositories.
    pub db: TemporaryDatabase,
    /// Project repository bound to the database.
    pub projects: PostgresProjectRepository,
    /// Task repository sharing the same pool.
    pub tasks: PostgresTaskRepository,
}

/// Creates a migrated per-test database with both repositories over one pool.
///
/// # Errors
///
/// Returns an error if cluster startup, database creation, migration, or
/// pool construction fails.
#[fixture]
pub async fn prepared_repos() -> Result<PreparedRepos, BoxError> {
    init_tracing();
    let cluster = shared_cluster().await?;
    let db = cluster.create_temporary_database().await?;
    tracing::debug!("prepared test database {}", db.name());
    let url = db.url().to_owned();
    tokio::task::spawn_blocking(move || apply_migrations(&url))
        .await
        .map_err(|err| Box::new(err) as BoxError)??;
    let pool = build_pool(db.url(), 2).map_err(|err| Box::new(err) as BoxError)?;
    Ok(PreparedRepos {
        db,
        projects: PostgresProjectRepository::new(pool.clone()),
        tasks: PostgresTaskRepository::new(pool),
    })
}

/// Builds a project aggregate for insertion.
///
/// # Errors
///
/// Returns an error if the name fails validation.
pub fn sample_project(name: &str) -> Result<Project, BoxError> {
    Ok(Project::new(
        ProjectName::new(name, 100)?,
        None,
        &DefaultClock,
    ))
}

/// Builds a task aggregate owned by the given project.
///
/// # Errors
///
/// Returns an error if the title fails validation.
pub fn sample_task(
    project: &Project,
    title: &str,
    status: TaskStatus,
    deadline: Option<DateTime<Utc>>,
) -> Result<Task, BoxError> {
    Ok(Task::new(
        NewTaskData {
            project_id: project.id(),
            title: TaskTitle::new(title, 255)?,
            description: None,
            status,
            deadline,
        },
        &DefaultClock,
    ))
}
