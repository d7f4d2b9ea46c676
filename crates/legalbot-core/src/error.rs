//! Domain-level error types.

use std::time::Duration;

use thiserror::Error;

use crate::ports::DeliveryError;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

/// A collaborator call that was cut short before it produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("Deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Call cancelled")]
    Cancelled,
}

/// Errors returned by the command orchestrator to its caller.
///
/// Everything else (provider and storage failures) is absorbed into a
/// user-facing notice and never reaches this type.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Message too long: {len} bytes (max {max})")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Failed to deliver reply: {0}")]
    Delivery(#[from] DeliveryError),
}

impl CommandError {
    /// Whether the caller supplied bad input (as opposed to a delivery failure).
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::PayloadTooLarge { .. })
    }
}
