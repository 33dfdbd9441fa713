use std::path::PathBuf;

use propagator_sdk::PayloadError;

use super::workflow::{WorkflowEvent, WorkflowState};

/// First failed write of a propagation run.
///
/// Files listed in `written` were updated before the failure and are left in place.
#[derive(Debug, thiserror::Error)]
#[error("Failed to write config for '{instance}' at {}: {source}", .target.display())]
pub struct PropagationError {
    /// Display name of the instance whose write failed.
    pub instance: String,
    pub target: PathBuf,
    pub written: Vec<PathBuf>,
    #[source]
    pub source: PayloadError,
}

/// Errors surfaced by the selection workflow
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Event {event:?} is not allowed in state {from:?}")]
    IllegalTransition {
        from: WorkflowState,
        event: WorkflowEvent,
    },

    #[error("No local service instances were found; proceeding is disabled")]
    ProceedDisabled,

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error(transparent)]
    Propagation(#[from] PropagationError),
}
