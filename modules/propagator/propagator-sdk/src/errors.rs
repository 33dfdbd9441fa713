//! Error types for the propagator SDK.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    #[error("Candidate '{candidate}' could not be read: {message}")]
    Candidate { candidate: String, message: String },

    #[error("Locality check failed for '{candidate}': {message}")]
    Locality { candidate: String, message: String },
}

impl DirectoryError {
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    #[must_use]
    pub fn candidate(candidate: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Candidate {
            candidate: candidate.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn locality(candidate: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Locality {
            candidate: candidate.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Failed to write config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid payload: {0}")]
    Invalid(String),
}

impl PayloadError {
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
