//! Collaborator traits the propagator depends on.
//!
//! The propagator never talks to a farm, a filesystem format or a screen directly;
//! hosts supply implementations of these traits.

use std::path::Path;

use crate::errors::{DirectoryError, PayloadError};
use crate::models::{ApplyMode, OperatingMode, SelectionDecision, ServiceInstance};

/// One entry returned by a directory query.
///
/// A failed entry is skipped by discovery without aborting the enumeration.
pub type Candidate = Result<ServiceInstance, DirectoryError>;

/// Read-only query over a logical directory of service instances.
pub trait InstanceDirectory: Send + Sync {
    /// Enumerate candidate instances in directory order.
    ///
    /// # Errors
    /// Returns `DirectoryError` if the directory cannot be enumerated at all.
    fn candidates(&self) -> Result<Vec<Candidate>, DirectoryError>;
}

/// Decides whether a content-directory instance is hosted on the current node.
pub trait LocalityPredicate: Send + Sync {
    /// # Errors
    /// Returns `DirectoryError` if locality cannot be determined for this instance.
    fn is_local(&self, instance: &ServiceInstance) -> Result<bool, DirectoryError>;
}

impl<F> LocalityPredicate for F
where
    F: Fn(&ServiceInstance) -> Result<bool, DirectoryError> + Send + Sync,
{
    fn is_local(&self, instance: &ServiceInstance) -> Result<bool, DirectoryError> {
        self(instance)
    }
}

/// Opaque settings object applied to an instance's config file.
pub trait ConfigurationPayload: Send + Sync {
    /// Write the subset selected by `mode` to `target`.
    ///
    /// # Errors
    /// Returns `PayloadError` if `target` exists and `overwrite` is false, or the write fails.
    fn write_to(&self, target: &Path, overwrite: bool, mode: ApplyMode) -> Result<(), PayloadError>;
}

/// Presentation side of the instance selection step.
pub trait SelectionUi {
    /// Render the discovered instances.
    fn present(&mut self, mode: OperatingMode, instances: &[ServiceInstance]);

    /// Show the "nothing found" warning.
    fn warn_no_local_instances(&mut self, message: &str);

    fn set_proceed_enabled(&mut self, enabled: bool);

    /// Block until the user accepts a selection or cancels.
    fn decide(&mut self) -> SelectionDecision;
}

/// Collects install parameters after a selection was accepted.
pub trait ParameterDialog {
    type Payload: ConfigurationPayload;

    /// Returns `None` when the user cancels.
    fn collect(&mut self) -> Option<Self::Payload>;
}
