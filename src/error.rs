//! Shared error taxonomy for the repository and service layers.
//!
//! Two branches cover the whole crate: [`RepositoryError`] for persistence
//! failures and [`ServiceError`] for business-rule failures. Every leaf
//! carries a stable [machine-readable code](ServiceError::error_code) and can
//! be flattened into an [`ErrorRecord`] envelope for logging or transport.
//! Service methods return [`ServiceError`], which wraps repository failures
//! transparently so callers match on a single type.

use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Entity kinds referenced by errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A project aggregate.
    Project,
    /// A task aggregate.
    Task,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => f.write_str("Project"),
            Self::Task => f.write_str("Task"),
        }
    }
}

/// Database operation kinds used to tag operation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOp {
    /// Row insertion.
    Insert,
    /// Row update.
    Update,
    /// Row deletion.
    Delete,
    /// Row retrieval.
    Select,
}

impl std::fmt::Display for DbOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Insert => f.write_str("INSERT"),
            Self::Update => f.write_str("UPDATE"),
            Self::Delete => f.write_str("DELETE"),
            Self::Select => f.write_str("SELECT"),
        }
    }
}

/// Classification of a failed database operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpErrorKind {
    /// A unique constraint rejected the statement.
    UniqueViolation,
    /// A foreign-key constraint rejected the statement.
    ForeignKeyViolation,
    /// Any other statement-level failure.
    Other,
}

impl std::fmt::Display for OpErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UniqueViolation => f.write_str("unique_violation"),
            Self::ForeignKeyViolation => f.write_str("foreign_key_violation"),
            Self::Other => f.write_str("other"),
        }
    }
}

/// Errors returned by repository implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The requested entity does not exist.
    #[error("{entity} not found ({identifier})")]
    NotFound {
        /// Kind of entity looked up.
        entity: EntityKind,
        /// Description of what was searched for, e.g. `id: <uuid>`.
        identifier: String,
    },

    /// The storage backend is unreachable or the connection was lost.
    #[error("failed to connect to database: {message}")]
    Connection {
        /// Backend-supplied connection failure description.
        message: String,
    },

    /// A statement-level failure such as a constraint violation.
    #[error("database {op} operation failed: {message}")]
    Operation {
        /// The operation that failed.
        op: DbOp,
        /// Classification of the failure.
        kind: OpErrorKind,
        /// Backend-supplied failure description.
        message: String,
    },
}

impl RepositoryError {
    /// Creates a not-found error for an entity looked up by identifier.
    #[must_use]
    pub fn not_found(entity: EntityKind, identifier: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            identifier: format!("id: {identifier}"),
        }
    }

    /// Creates a not-found error with a caller-supplied identifier description.
    #[must_use]
    pub fn not_found_described(entity: EntityKind, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            identifier: identifier.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates an operation error.
    #[must_use]
    pub fn operation(op: DbOp, kind: OpErrorKind, message: impl Into<String>) -> Self {
        Self::Operation {
            op,
            kind,
            message: message.into(),
        }
    }

    /// Returns `true` when the error is a unique-constraint violation.
    #[must_use]
    pub const fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::Operation {
                kind: OpErrorKind::UniqueViolation,
                ..
            }
        )
    }

    /// Returns `true` when the error is a foreign-key violation.
    #[must_use]
    pub const fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            Self::Operation {
                kind: OpErrorKind::ForeignKeyViolation,
                ..
            }
        )
    }

    /// Returns `true` when the storage backend is unreachable.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Returns `true` when the error is a missing-entity lookup.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Connection { .. } => "DATABASE_CONNECTION_ERROR",
            Self::Operation { .. } => "DATABASE_OPERATION_ERROR",
        }
    }

    /// Flattens the error into a serializable envelope.
    #[must_use]
    pub fn to_record(&self) -> ErrorRecord {
        let (error_type, details) = match self {
            Self::NotFound { entity, identifier } => (
                "NotFoundError",
                json!({
                    "entity_type": entity.to_string(),
                    "identifier": identifier,
                }),
            ),
            Self::Connection { .. } => ("DatabaseConnectionError", json!({})),
            Self::Operation { op, kind, .. } => (
                "DatabaseOperationError",
                json!({
                    "operation": op.to_string(),
                    "kind": kind.to_string(),
                }),
            ),
        };
        ErrorRecord {
            error_type,
            error_code: self.error_code(),
            message: self.to_string(),
            details,
        }
    }
}

/// Errors returned by service operations.
///
/// Repository failures pass through [`ServiceError::Repository`] unchanged,
/// so a caller can still distinguish a missing row from a broken connection
/// after the service layer has run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// An input failed validation before any storage access.
    #[error("{message}")]
    Validation {
        /// The offending field, when one can be named.
        field: Option<&'static str>,
        /// Description of the validation failure.
        message: String,
    },

    /// Creating or renaming would collide with an existing entity.
    #[error("{entity} with {field} '{value}' already exists")]
    Duplicate {
        /// Kind of entity that already exists.
        entity: EntityKind,
        /// The uniquely-constrained field.
        field: &'static str,
        /// The conflicting value.
        value: String,
    },

    /// A configured resource ceiling was reached.
    #[error("maximum number of {resource} ({limit}) reached, current count is {current}")]
    LimitExceeded {
        /// Name of the limited resource.
        resource: &'static str,
        /// Maximum allowed quantity.
        limit: u64,
        /// Quantity at the time of the attempt.
        current: u64,
    },

    /// The operation is not valid for the entity's current state.
    #[error("cannot {operation} {entity} {entity_id}: {reason}")]
    InvalidState {
        /// Kind of entity involved.
        entity: EntityKind,
        /// Identifier of the entity involved.
        entity_id: String,
        /// The operation that was attempted.
        operation: String,
        /// Why the operation is invalid in the current state.
        reason: String,
    },

    /// A repository failure propagated unchanged.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Creates a validation error for a named field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field),
            message: message.into(),
        }
    }

    /// Creates a validation error with no associated field.
    #[must_use]
    pub fn validation_bare(message: impl Into<String>) -> Self {
        Self::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a duplicate-entity error.
    #[must_use]
    pub fn duplicate(entity: EntityKind, field: &'static str, value: impl Into<String>) -> Self {
        Self::Duplicate {
            entity,
            field,
            value: value.into(),
        }
    }

    /// Creates a limit-exceeded error.
    #[must_use]
    pub const fn limit_exceeded(resource: &'static str, limit: u64, current: u64) -> Self {
        Self::LimitExceeded {
            resource,
            limit,
            current,
        }
    }

    /// Creates an invalid-state error.
    #[must_use]
    pub fn invalid_state(
        entity: EntityKind,
        entity_id: impl std::fmt::Display,
        operation: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidState {
            entity,
            entity_id: entity_id.to_string(),
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` when the error is a missing-entity lookup.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::NotFound { .. }))
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Duplicate { .. } => "DUPLICATE_ENTITY",
            Self::LimitExceeded { .. } => "LIMIT_EXCEEDED",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::Repository(inner) => inner.error_code(),
        }
    }

    /// Flattens the error into a serializable envelope.
    #[must_use]
    pub fn to_record(&self) -> ErrorRecord {
        let (error_type, details) = match self {
            Self::Validation { field, .. } => (
                "ValidationError",
                field.map_or_else(|| json!({}), |name| json!({ "field_name": name })),
            ),
            Self::Duplicate {
                entity,
                field,
                value,
            } => (
                "DuplicateEntityError",
                json!({
                    "entity_type": entity.to_string(),
                    "field_name": field,
                    "field_value": value,
                }),
            ),
            Self::LimitExceeded {
                resource,
                limit,
                current,
            } => (
                "LimitExceededError",
                json!({
                    "resource_name": resource,
                    "limit": limit,
                    "current": current,
                }),
            ),
            Self::InvalidState {
                entity,
                entity_id,
                operation,
                reason,
            } => (
                "InvalidStateError",
                json!({
                    "entity_type": entity.to_string(),
                    "entity_id": entity_id,
                    "operation": operation,
                    "reason": reason,
                }),
            ),
            Self::Repository(inner) => return inner.to_record(),
        };
        ErrorRecord {
            error_type,
            error_code: self.error_code(),
            message: self.to_string(),
            details,
        }
    }
}

/// Flattened error envelope for logging and API responses.
///
/// Field names match the wire contract consumed by downstream clients:
/// `error_type`, `error_code`, `message`, and a `details` object whose keys
/// depend on the error kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    /// Name of the error class, e.g. `NotFoundError`.
    pub error_type: &'static str,
    /// Stable machine-readable code, e.g. `NOT_FOUND`.
    pub error_code: &'static str,
    /// Human-readable description.
    pub message: String,
    /// Structured context for the error.
    pub details: serde_json::Value,
}
