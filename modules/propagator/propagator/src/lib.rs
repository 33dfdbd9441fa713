#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Propagator module
//!
//! Discovers the service instances hosted on the current farm node and writes a
//! configuration payload into each selected instance's config file.
//!
//! - [`domain`]: locality matching, discovery, propagation and the workflow state machine
//! - [`infra`]: file-backed directories, locality predicates and the `appSettings` payload
//! - [`config`]: serde configuration sections consumed by hosts

pub mod config;
pub mod domain;
pub mod infra;

pub use config::{
    ContentLocality, DiscoveryConfig, NodeConfig, PathStyle, PayloadConfig, PropagationConfig,
    SettingEntry,
};
pub use domain::discovery::{CandidateFailure, DiscoveryReport, DiscoverySignal, InstanceDiscoverer};
pub use domain::error::{PropagationError, WorkflowError};
pub use domain::locality::LocalityMatcher;
pub use domain::propagation::{ConfigPropagator, PropagationReport, config_file_path};
pub use domain::workflow::{
    CloseReason, NO_LOCAL_INSTANCES_MESSAGE, Workflow, WorkflowEvent, WorkflowOutcome,
    WorkflowState,
};
