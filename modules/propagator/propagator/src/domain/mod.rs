pub mod discovery;
pub mod error;
pub mod locality;
pub mod propagation;
pub mod workflow;
