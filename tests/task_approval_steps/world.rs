//! Shared world state for task approval BDD scenarios.

use std::sync::Arc;

use foreman::org::{adapters::memory::InMemoryUserDirectory, domain::Actor};
use foreman::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::Task,
    services::{TaskLifecycleService, TaskServiceError},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTaskService =
    TaskLifecycleService<InMemoryUserDirectory, InMemoryTaskRepository, DefaultClock>;

/// Scenario world for task approval behaviour tests.
pub struct TaskApprovalWorld {
    pub directory: Arc<InMemoryUserDirectory>,
    pub service: TestTaskService,
    pub admin: Option<Actor>,
    pub manager: Option<Actor>,
    pub member: Option<Actor>,
    pub task: Option<Task>,
    pub last_decision: Option<Result<Task, TaskServiceError>>,
    pub last_update: Option<Result<Task, TaskServiceError>>,
}

impl TaskApprovalWorld {
    /// Creates a world with an empty organization and task store.
    #[must_use]
    pub fn new() -> Self {
        let directory = Arc::new(InMemoryUserDirectory::new());
        let service = TaskLifecycleService::new(
            Arc::clone(&directory),
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(DefaultClock),
        );

        Self {
            directory,
            service,
            admin: None,
            manager: None,
            member: None,
            task: None,
            last_decision: None,
            last_update: None,
        }
    }

    /// Returns the created task, or an error when a step ran too early.
    pub fn current_task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

/// Returns a seeded actor, or an error when a step ran too early.
pub fn seeded(actor: Option<Actor>, name: &str) -> Result<Actor, eyre::Report> {
    actor.ok_or_else(|| eyre::eyre!("missing {name} in scenario world"))
}

impl Default for TaskApprovalWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskApprovalWorld {
    TaskApprovalWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
