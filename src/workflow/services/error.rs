//! Error types for workflow dispatch.

use crate::github::ports::HostError;
use thiserror::Error;

/// Errors raised while expanding `%name%` variables.
#[derive(Debug, Clone, Error)]
pub enum InterpolationError {
    /// A list-valued variable was used inside running text.
    #[error("variable '{token}' expands to a list and cannot be embedded in text")]
    ListValued {
        /// Offending token including its delimiters.
        token: String,
    },

    /// Resolving the variable required a host read that failed.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Errors raised while dispatching an event through a workflow.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// A host call failed.
    #[error(transparent)]
    Host(#[from] HostError),

    /// A template could not be expanded.
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    /// A label action names a group the workflow does not define.
    #[error("label group '{0}' is not defined")]
    UnknownLabelGroup(String),
}

/// Result type for workflow dispatch.
pub type DispatchResult<T> = Result<T, DispatchError>;
