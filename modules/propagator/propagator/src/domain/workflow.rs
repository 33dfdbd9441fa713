//! Discover → select → (install only) collect parameters → propagate.
//!
//! All transitions go through [`WorkflowState::next`]; [`Workflow::run`] drives one
//! pass from `Discovering` to a `Closed` state using the host's UI collaborators.

use std::collections::HashSet;

use propagator_sdk::{
    OperatingMode, ParameterDialog, SelectionDecision, SelectionUi, ServiceInstance,
};

use super::discovery::{DiscoveryReport, InstanceDiscoverer};
use super::error::WorkflowError;
use super::propagation::{ConfigPropagator, PropagationReport};
use crate::config::PropagationConfig;

pub const NO_LOCAL_INSTANCES_MESSAGE: &str = "No local service instances found on this node";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Accepted,
    Cancelled,
    /// Propagation stopped at a failed write.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Discovering,
    AwaitingSelection,
    CollectingParameters,
    Propagating,
    Closed(CloseReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    DiscoveryCompleted,
    SelectionAccepted,
    SelectionCancelled,
    ParametersCollected,
    ParametersCancelled,
    PropagationSucceeded,
    PropagationFailed,
}

impl WorkflowState {
    /// Apply `event` in `mode`.
    ///
    /// # Errors
    /// Returns `WorkflowError::IllegalTransition` when `event` is not valid in this state.
    pub fn next(self, mode: OperatingMode, event: WorkflowEvent) -> Result<Self, WorkflowError> {
        use WorkflowEvent as E;
        use WorkflowState as S;

        let next = match (self, event) {
            (S::Discovering, E::DiscoveryCompleted) => S::AwaitingSelection,
            (S::AwaitingSelection, E::SelectionCancelled)
            | (S::CollectingParameters, E::ParametersCancelled) => {
                S::Closed(CloseReason::Cancelled)
            }
            (S::AwaitingSelection, E::SelectionAccepted) => match mode {
                OperatingMode::Install => S::CollectingParameters,
                OperatingMode::Edit => S::Closed(CloseReason::Accepted),
            },
            (S::CollectingParameters, E::ParametersCollected) => S::Propagating,
            (S::Propagating, E::PropagationSucceeded) => S::Closed(CloseReason::Accepted),
            (S::Propagating, E::PropagationFailed) => S::Closed(CloseReason::Failed),
            (from, event) => return Err(WorkflowError::IllegalTransition { from, event }),
        };
        Ok(next)
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed(_))
    }
}

/// Result of a workflow run that did not fail.
#[derive(Debug)]
pub struct WorkflowOutcome {
    pub close_reason: CloseReason,
    pub discovery: DiscoveryReport,
    /// Accepted instances in selection order; empty when cancelled.
    pub selected: Vec<ServiceInstance>,
    /// Present only when an install run reached propagation.
    pub propagation: Option<PropagationReport>,
}

/// One pass of the instance selection workflow.
pub struct Workflow {
    mode: OperatingMode,
    propagator: ConfigPropagator,
    state: WorkflowState,
    history: Vec<WorkflowState>,
}

impl Workflow {
    #[must_use]
    pub fn new(mode: OperatingMode, propagation: PropagationConfig) -> Self {
        Self {
            mode,
            propagator: ConfigPropagator::new(propagation),
            state: WorkflowState::Discovering,
            history: vec![WorkflowState::Discovering],
        }
    }

    #[must_use]
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    #[must_use]
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Every state entered so far, starting with `Discovering`.
    #[must_use]
    pub fn history(&self) -> &[WorkflowState] {
        &self.history
    }

    /// Drive the workflow to a closed state.
    ///
    /// # Errors
    /// - `ProceedDisabled` if the UI accepts although discovery found nothing
    /// - `InvalidSelection` for out-of-range or repeated indices, or an empty install selection
    /// - `Propagation` when a config write fails (the workflow closes as `Failed`)
    /// - `IllegalTransition` when the workflow was already run
    pub fn run<U, D>(
        &mut self,
        current_node_name: &str,
        discoverer: &InstanceDiscoverer<'_>,
        ui: &mut U,
        dialog: &mut D,
    ) -> Result<WorkflowOutcome, WorkflowError>
    where
        U: SelectionUi + ?Sized,
        D: ParameterDialog + ?Sized,
    {
        if self.state != WorkflowState::Discovering {
            return Err(WorkflowError::IllegalTransition {
                from: self.state,
                event: WorkflowEvent::DiscoveryCompleted,
            });
        }

        let discovery = discoverer.discover(current_node_name);
        self.advance(WorkflowEvent::DiscoveryCompleted)?;

        let proceed_enabled = !discovery.is_empty();
        ui.present(self.mode, &discovery.instances);
        if !proceed_enabled {
            ui.warn_no_local_instances(NO_LOCAL_INSTANCES_MESSAGE);
        }
        ui.set_proceed_enabled(proceed_enabled);

        let indices = match ui.decide() {
            SelectionDecision::Cancel => {
                self.advance(WorkflowEvent::SelectionCancelled)?;
                return Ok(Self::closed(CloseReason::Cancelled, discovery, Vec::new(), None));
            }
            SelectionDecision::Accept(indices) => indices,
        };

        if !proceed_enabled {
            self.advance(WorkflowEvent::SelectionCancelled)?;
            return Err(WorkflowError::ProceedDisabled);
        }

        let selected = match self.resolve_selection(&discovery.instances, &indices) {
            Ok(selected) => selected,
            Err(e) => {
                self.advance(WorkflowEvent::SelectionCancelled)?;
                return Err(e);
            }
        };

        self.advance(WorkflowEvent::SelectionAccepted)?;
        if !self.mode.collects_parameters() {
            return Ok(Self::closed(CloseReason::Accepted, discovery, selected, None));
        }

        let Some(payload) = dialog.collect() else {
            tracing::info!("Parameter collection cancelled");
            self.advance(WorkflowEvent::ParametersCancelled)?;
            return Ok(Self::closed(CloseReason::Cancelled, discovery, Vec::new(), None));
        };
        self.advance(WorkflowEvent::ParametersCollected)?;

        match self
            .propagator
            .propagate(&selected, &payload, self.mode.apply_mode())
        {
            Ok(report) => {
                self.advance(WorkflowEvent::PropagationSucceeded)?;
                Ok(Self::closed(
                    CloseReason::Accepted,
                    discovery,
                    selected,
                    Some(report),
                ))
            }
            Err(e) => {
                self.advance(WorkflowEvent::PropagationFailed)?;
                Err(e.into())
            }
        }
    }

    fn advance(&mut self, event: WorkflowEvent) -> Result<(), WorkflowError> {
        let next = self.state.next(self.mode, event)?;
        tracing::debug!(from = ?self.state, to = ?next, event = ?event, "Workflow transition");
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    fn resolve_selection(
        &self,
        instances: &[ServiceInstance],
        indices: &[usize],
    ) -> Result<Vec<ServiceInstance>, WorkflowError> {
        if indices.is_empty() && self.mode.collects_parameters() {
            return Err(WorkflowError::InvalidSelection(
                "at least one instance must be selected".to_owned(),
            ));
        }

        let mut seen = HashSet::with_capacity(indices.len());
        indices
            .iter()
            .map(|&idx| {
                if !seen.insert(idx) {
                    return Err(WorkflowError::InvalidSelection(format!(
                        "instance {idx} selected more than once"
                    )));
                }
                instances.get(idx).cloned().ok_or_else(|| {
                    WorkflowError::InvalidSelection(format!(
                        "instance {idx} is out of range (found {})",
                        instances.len()
                    ))
                })
            })
            .collect()
    }

    fn closed(
        close_reason: CloseReason,
        discovery: DiscoveryReport,
        selected: Vec<ServiceInstance>,
        propagation: Option<PropagationReport>,
    ) -> WorkflowOutcome {
        WorkflowOutcome {
            close_reason,
            discovery,
            selected,
            propagation,
        }
    }
}
