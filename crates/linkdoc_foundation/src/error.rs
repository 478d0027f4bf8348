//! Error types for linkdoc.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! A delete blocked by incoming links is not an error; it is reported as a
//! normal outcome by the engine. Errors here are either caller contract
//! violations or infrastructure failures.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityRef;
use crate::link::Link;

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for linkdoc operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a malformed link error.
    #[must_use]
    pub fn malformed_link(entity: EntityRef, link: Link) -> Self {
        Self::new(ErrorKind::MalformedLink {
            entity,
            link: Box::new(link),
        })
    }

    /// Creates an invalid entity reference error.
    #[must_use]
    pub fn invalid_entity_ref(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidEntityRef(reason.into()))
    }

    /// Creates an unknown delete policy error.
    #[must_use]
    pub fn unknown_delete_policy(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownDeletePolicy(name.into()))
    }

    /// Creates a backend failure error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Backend(message.into()))
    }

    /// Creates a commit conflict error.
    #[must_use]
    pub fn commit_conflict(entity: EntityRef, attempts: usize) -> Self {
        Self::new(ErrorKind::CommitConflict { entity, attempts })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if repeating the same call may succeed.
    ///
    /// Both create-or-overwrite and delete are idempotent, so retrying them
    /// after a retryable error is safe.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Backend(_) | ErrorKind::CommitConflict { .. }
        )
    }

    /// Returns true if the caller broke the call contract.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MalformedLink { .. }
                | ErrorKind::InvalidEntityRef(_)
                | ErrorKind::UnknownDeletePolicy(_)
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A supplied link does not originate from the entity being written.
    #[error("malformed link for {entity}: {link} does not originate from it")]
    MalformedLink {
        /// The entity being written.
        entity: EntityRef,
        /// The offending link.
        link: Box<Link>,
    },

    /// An entity reference had an empty component.
    #[error("invalid entity reference: {0}")]
    InvalidEntityRef(String),

    /// A delete policy name was not recognised.
    #[error("unknown delete policy: {0}")]
    UnknownDeletePolicy(String),

    /// The storage substrate failed.
    #[error("backend failure: {0}")]
    Backend(String),

    /// Optimistic commit kept conflicting with concurrent writers.
    #[error("commit conflict on {entity} after {attempts} attempts")]
    CommitConflict {
        /// The entity whose commit was rejected.
        entity: EntityRef,
        /// Number of attempts made.
        attempts: usize,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that failed, e.g. `delete`.
    pub operation: Option<String>,
    /// The entity the operation targeted.
    pub entity: Option<EntityRef>,
    /// Attempt number when the failure happened.
    pub attempt: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the target entity.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityRef) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Sets the attempt number.
    #[must_use]
    pub fn with_attempt(mut self, attempt: usize) -> Self {
        self.attempt = Some(attempt);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "in {operation}")?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " on {entity}")?;
        }
        if let Some(attempt) = self.attempt {
            write!(f, " (attempt {attempt})")?;
        }
        Ok(())
    }
}
