#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Node Identity Library
//!
//! Resolves the identity of the node the code is executed on:
//! - the OS hostname and its short (first label) form
//! - the primary local IP address, when one can be detected
//!
//! Discovery compares endpoint aliases against the short name, so callers
//! normally want [`Node::short_name`].

pub mod error;
pub mod model;

mod collector;

pub use collector::{NodeInfoCollector, short_host_name};
pub use error::NodeInfoError;
pub use model::Node;
