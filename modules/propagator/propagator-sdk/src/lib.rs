//! Propagator SDK
//!
//! This crate provides the public contract of the propagator module:
//! - Collaborator traits (`InstanceDirectory`, `LocalityPredicate`, `ConfigurationPayload`,
//!   `SelectionUi`, `ParameterDialog`)
//! - Model types (`ServiceInstance`, `EndpointAlias`, `OperatingMode`, `ApplyMode`)
//! - Error types (`DirectoryError`, `PayloadError`)
//!
//! Hosts implement the traits and hand them to the propagator workflow:
//! ```ignore
//! let discoverer = InstanceDiscoverer::new(&management, &content, &locality);
//! let mut workflow = Workflow::new(OperatingMode::Install, propagation_config);
//! let outcome = workflow.run(&node_name, &discoverer, &mut ui, &mut dialog)?;
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::{
    Candidate, ConfigurationPayload, InstanceDirectory, LocalityPredicate, ParameterDialog,
    SelectionUi,
};
pub use errors::{DirectoryError, PayloadError};
pub use models::{
    ApplyMode, DirectoryKind, EndpointAlias, OperatingMode, SelectionDecision, ServiceInstance,
};
