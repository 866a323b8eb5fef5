use crate::dispatch::op::{ExecutionMode, Op};

/// Convenience result type used across the paint engine.
pub type PaintResult<T> = Result<T, PaintError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Callers are expected to tell the classes apart: resource exhaustion is never retried
/// internally, and a not-implemented entry is a terminal signal that a caller may answer with a
/// fallback path.
#[derive(thiserror::Error, Debug)]
pub enum PaintError {
    /// The command arena (or an allocation it depends on) could not grow.
    #[error("out of memory: {what}")]
    OutOfMemory {
        /// What was being allocated.
        what: &'static str,
    },

    /// The dispatch table of the active execution mode has no entry for this operation.
    #[error("operation {op:?} is not implemented in {mode:?} mode")]
    NotImplemented {
        /// Execution mode the call was routed through.
        mode: ExecutionMode,
        /// The unavailable operation.
        op: Op,
    },

    /// Malformed user-provided data (mode selectors, options, patterns, images).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested transition is illegal in the current engine state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// `restore_mask` was called with no saved mask.
    #[error("mask stack underflow")]
    MaskUnderflow,

    /// Errors raised while executing a recorded command sequence.
    #[error("execution error: {0}")]
    Execution(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PaintError {
    /// Build a [`PaintError::OutOfMemory`] value.
    pub fn out_of_memory(what: &'static str) -> Self {
        Self::OutOfMemory { what }
    }

    /// Build a [`PaintError::NotImplemented`] value.
    pub fn not_implemented(mode: ExecutionMode, op: Op) -> Self {
        Self::NotImplemented { mode, op }
    }

    /// Build a [`PaintError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`PaintError::InvalidState`] value.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Build a [`PaintError::Execution`] value.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// `true` for the feature-unavailable class.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }

    /// `true` for the resource-exhaustion class.
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
