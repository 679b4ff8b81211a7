//! Service layer orchestrating validation, business rules, and persistence.

mod autoclose;
mod project;
mod task;

pub use autoclose::{AutoCloseJob, AutoCloseReport, DEFAULT_RUN_INTERVAL};
pub use project::{CreateProjectRequest, ProjectService, UpdateProjectRequest};
pub use task::{CreateTaskRequest, TaskService, UpdateTaskRequest};

use crate::error::{ServiceError, ServiceResult};
use crate::ports::MAX_PAGE_LIMIT;

/// Rejects page sizes outside `1..=MAX_PAGE_LIMIT`.
pub(super) fn validate_page_limit(limit: u32) -> ServiceResult<()> {
    if limit == 0 || limit > MAX_PAGE_LIMIT {
        return Err(ServiceError::validation(
            "limit",
            format!("limit must be between 1 and {MAX_PAGE_LIMIT}"),
        ));
    }
    Ok(())
}
