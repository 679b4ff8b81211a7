//! Shared test helpers for in-memory service integration tests.

use std::sync::{Arc, Once};

use mockable::DefaultClock;
use rstest::fixture;
use taskforge::adapters::memory::InMemoryStore;
use taskforge::config::Limits;
use taskforge::domain::{Project, Task};
use taskforge::error::ServiceError;
use taskforge::services::{
    AutoCloseJob, CreateProjectRequest, CreateTaskRequest, ProjectService, TaskService,
};

/// Boxed error type shared by the integration tests.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Full service stack wired over one shared in-memory store.
pub struct Services {
    /// The backing store, shared by every service below.
    pub store: InMemoryStore,
    /// Project management service.
    pub projects: ProjectService<InMemoryStore, DefaultClock>,
    /// Task management service.
    pub tasks: TaskService<InMemoryStore, InMemoryStore, DefaultClock>,
    /// Overdue-task sweep job.
    pub autoclose: AutoCloseJob<InMemoryStore, DefaultClock>,
}

/// Routes `tracing` output through the test harness, once per process.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        drop(tracing_subscriber::fmt().with_test_writer().try_init());
    });
}

/// Builds the service stack over a fresh store with the given limits.
#[must_use]
pub fn services_with_limits(limits: Limits) -> Services {
    init_tracing();
    let store = InMemoryStore::new();
    let clock = Arc::new(DefaultClock);
    let projects = ProjectService::new(Arc::new(store.clone()), Arc::clone(&clock), limits);
    let tasks = TaskService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::clone(&clock),
        limits,
    );
    let autoclose = AutoCloseJob::new(Arc::new(store.clone()), clock);
    Services {
        store,
        projects,
        tasks,
        autoclose,
    }
}

/// Provides the full service stack over a fresh store.
#[fixture]
pub fn services() -> Services {
    services_with_limits(Limits::default())
}

/// Creates a project through the service layer.
///
/// # Errors
///
/// Returns an error if the creation is rejected.
pub async fn create_project(services: &Services, name: &str) -> Result<Project, ServiceError> {
    services
        .projects
        .create(CreateProjectRequest::new(name))
        .await
}

/// Creates a task with a deadline through the service layer.
///
/// # Errors
///
/// Returns an error if the creation is rejected.
pub async fn create_deadlined_task(
    services: &Services,
    project: &Project,
    title: &str,
    deadline: &str,
) -> Result<Task, ServiceError> {
    services
        .tasks
        .create(
            project.id(),
            CreateTaskRequest::new(title).with_deadline(deadline),
        )
        .await
}
