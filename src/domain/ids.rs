//! Identifier and validated scalar types for the project/task domain.

use crate::error::{ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a project record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Creates a new random project identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a project identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for ProjectId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a task record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new random task identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a task identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for TaskId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated, trimmed project name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Creates a validated project name.
    ///
    /// Leading and trailing whitespace is removed before validation; length
    /// is measured in characters, not bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the trimmed value is empty
    /// or longer than `max_chars`.
    pub fn new(value: impl Into<String>, max_chars: usize) -> ServiceResult<Self> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(ServiceError::validation("name", "name cannot be empty"));
        }
        if normalized.chars().count() > max_chars {
            return Err(ServiceError::validation(
                "name",
                format!("name cannot exceed {max_chars} characters"),
            ));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Rehydrates a name from storage without re-validating.
    ///
    /// Persisted rows may predate a later tightening of the length limit;
    /// rejecting them on read would make existing data unreachable.
    #[must_use]
    pub const fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated, trimmed task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated task title.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the trimmed value is empty
    /// or longer than `max_chars`.
    pub fn new(value: impl Into<String>, max_chars: usize) -> ServiceResult<Self> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(ServiceError::validation("title", "title cannot be empty"));
        }
        if normalized.chars().count() > max_chars {
            return Err(ServiceError::validation(
                "title",
                format!("title cannot exceed {max_chars} characters"),
            ));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Rehydrates a title from storage without re-validating.
    #[must_use]
    pub const fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the title, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalizes an optional free-text description.
///
/// Trims the value and maps whitespace-only input to `None`, so "no
/// description" has a single representation in storage.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] when the trimmed value is longer
/// than `max_chars`.
pub fn normalize_description<S: Into<String>>(
    value: Option<S>,
    max_chars: usize,
) -> ServiceResult<Option<String>> {
    let Some(inner) = value else {
        return Ok(None);
    };
    let raw = inner.into();
    let normalized = raw.trim();
    if normalized.is_empty() {
        return Ok(None);
    }
    if normalized.chars().count() > max_chars {
        return Err(ServiceError::validation(
            "description",
            format!("description cannot exceed {max_chars} characters"),
        ));
    }
    Ok(Some(normalized.to_owned()))
}
