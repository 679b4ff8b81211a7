//! Task aggregate root and status/deadline types.

use super::{ProjectId, TaskId, TaskTitle};
use crate::error::{ServiceError, ServiceResult};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Task workflow status.
///
/// `Done` and `Cancelled` are terminal: the auto-close batch never touches
/// tasks in either, and only an explicit update moves a task back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Work has not started.
    #[serde(rename = "to-do")]
    Todo,
    /// Work is underway.
    #[serde(rename = "in-progress")]
    InProgress,
    /// Work finished successfully.
    #[serde(rename = "done")]
    Done,
    /// Work was abandoned or missed.
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "to-do",
            Self::InProgress => "in-progress",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` when the status is `Done` or `Cancelled`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task status '{0}'; expected one of: to-do, doing, in-progress, done, cancelled")]
pub struct ParseTaskStatusError(pub String);

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    /// Parses a status string, tolerating surrounding whitespace and case.
    ///
    /// `doing` is accepted as a legacy alias for `in-progress`.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "to-do" => Ok(Self::Todo),
            "in-progress" | "doing" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Parses a deadline string into a UTC timestamp.
///
/// Accepts RFC 3339 (offset preserved, converted to UTC) or a bare
/// `YYYY-MM-DD` date, which is interpreted as midnight UTC.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] when the value is empty or matches
/// neither format.
pub fn parse_deadline(value: &str) -> ServiceResult<DateTime<Utc>> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(ServiceError::validation(
            "deadline",
            "deadline cannot be empty",
        ));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(normalized) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(normalized, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(ServiceError::validation(
        "deadline",
        format!("invalid deadline '{normalized}'; expected RFC 3339 or YYYY-MM-DD"),
    ))
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    title: TaskTitle,
    description: Option<String>,
    status: TaskStatus,
    deadline: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Identifier of the owning project.
    pub project_id: ProjectId,
    /// Persisted task title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted workflow status.
    pub status: TaskStatus,
    /// Persisted deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Parameter object for creating a new task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Identifier of the owning project.
    pub project_id: ProjectId,
    /// Validated task title.
    pub title: TaskTitle,
    /// Normalized description, if any.
    pub description: Option<String>,
    /// Initial workflow status.
    pub status: TaskStatus,
    /// Deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new task with a fresh identifier and clock-sourced
    /// timestamps.
    #[must_use]
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            deadline: data.deadline,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            deadline: data.deadline,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the identifier of the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the deadline lies strictly before `now` and the
    /// status is non-terminal.
    ///
    /// A task with no deadline is never overdue.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_terminal() && self.deadline.is_some_and(|deadline| deadline < now)
    }

    /// Replaces the title.
    pub fn retitle(&mut self, title: TaskTitle, clock: &impl Clock) {
        self.title = title;
        self.touch(clock);
    }

    /// Replaces the description. `None` clears it.
    pub fn set_description(&mut self, description: Option<String>, clock: &impl Clock) {
        self.description = description;
        self.touch(clock);
    }

    /// Moves the task to the given status.
    ///
    /// Any transition is permitted here, including out of a terminal status;
    /// interactive edits are authoritative over batch decisions.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Replaces the deadline. `None` clears it.
    pub fn set_deadline(&mut self, deadline: Option<DateTime<Utc>>, clock: &impl Clock) {
        self.deadline = deadline;
        self.touch(clock);
    }

    /// Closes the task as missed, moving it to [`TaskStatus::Cancelled`].
    ///
    /// Returns `false` without touching the task when it is already
    /// terminal, which makes repeated close attempts idempotent.
    #[must_use]
    pub fn close(&mut self, closed_at: DateTime<Utc>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = TaskStatus::Cancelled;
        self.updated_at = closed_at;
        true
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
