//! Shared world state for auto-close BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskforge::adapters::memory::InMemoryStore;
use taskforge::config::Limits;
use taskforge::domain::{Project, Task};
use taskforge::services::{AutoCloseJob, AutoCloseReport, ProjectService, TaskService};

/// Service types used by the BDD world.
pub type TestProjectService = ProjectService<InMemoryStore, DefaultClock>;
pub type TestTaskService = TaskService<InMemoryStore, InMemoryStore, DefaultClock>;
pub type TestAutoCloseJob = AutoCloseJob<InMemoryStore, DefaultClock>;

/// Scenario world for auto-close behaviour tests.
pub struct AutoCloseWorld {
    pub projects: TestProjectService,
    pub tasks: TestTaskService,
    pub job: TestAutoCloseJob,
    pub project: Option<Project>,
    pub known_tasks: Vec<Task>,
    pub last_report: Option<AutoCloseReport>,
}

impl AutoCloseWorld {
    /// Creates a world whose services share one in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(DefaultClock);
        let limits = Limits::default();

        let projects = ProjectService::new(Arc::clone(&store), Arc::clone(&clock), limits);
        let tasks = TaskService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&clock),
            limits,
        );
        let job = AutoCloseJob::new(store, clock);

        Self {
            projects,
            tasks,
            job,
            project: None,
            known_tasks: Vec::new(),
            last_report: None,
        }
    }

    /// Returns the task recorded under `title` during setup.
    pub fn task_named(&self, title: &str) -> Result<&Task, eyre::Report> {
        self.known_tasks
            .iter()
            .find(|task| task.title().as_str() == title)
            .ok_or_else(|| eyre::eyre!("unknown task in scenario world: {title}"))
    }

    /// Replaces the recorded copy of a task after an update.
    pub fn remember_task(&mut self, updated: Task) {
        if let Some(slot) = self
            .known_tasks
            .iter_mut()
            .find(|task| task.id() == updated.id())
        {
            *slot = updated;
        } else {
            self.known_tasks.push(updated);
        }
    }
}

impl Default for AutoCloseWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> AutoCloseWorld {
    AutoCloseWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
