//! Fail-fast propagation of a configuration payload.
//!
//! Instances are written in selection order. The first failed write stops the run;
//! files written before it are not rolled back.

use std::path::PathBuf;

use propagator_sdk::{ApplyMode, ConfigurationPayload, ServiceInstance};

use super::error::PropagationError;
use crate::config::{PathStyle, PropagationConfig};

/// Join `base_path` and `file_name`, adding a separator only when `base_path` lacks one.
#[must_use]
pub fn config_file_path(base_path: &str, file_name: &str, style: PathStyle) -> PathBuf {
    let mut target = String::with_capacity(base_path.len() + file_name.len() + 1);
    target.push_str(base_path);
    if !base_path.ends_with(|c: char| style.is_separator(c)) {
        target.push(style.separator());
    }
    target.push_str(file_name);
    PathBuf::from(target)
}

/// Paths written by a successful run, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationReport {
    pub written: Vec<PathBuf>,
}

/// Writes a payload into the config file of each selected instance
#[derive(Debug, Clone, Default)]
pub struct ConfigPropagator {
    config: PropagationConfig,
}

impl ConfigPropagator {
    #[must_use]
    pub fn new(config: PropagationConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn target_path(&self, instance: &ServiceInstance) -> PathBuf {
        config_file_path(
            &instance.base_path,
            &self.config.config_file_name,
            self.config.path_style,
        )
    }

    /// Write `payload` to every instance in `selected`, stopping at the first failure.
    ///
    /// # Errors
    /// Returns `PropagationError` for the first failed write. Remaining instances are
    /// not attempted and earlier writes stay on disk.
    pub fn propagate<P>(
        &self,
        selected: &[ServiceInstance],
        payload: &P,
        mode: ApplyMode,
    ) -> Result<PropagationReport, PropagationError>
    where
        P: ConfigurationPayload + ?Sized,
    {
        let mut written = Vec::with_capacity(selected.len());

        for instance in selected {
            let target = self.target_path(instance);

            if let Err(source) = payload.write_to(&target, self.config.overwrite, mode) {
                tracing::error!(
                    instance = %instance.display_name(),
                    path = %target.display(),
                    written = written.len(),
                    error = %source,
                    "Config propagation aborted"
                );
                return Err(PropagationError {
                    instance: instance.display_name().to_owned(),
                    target,
                    written,
                    source,
                });
            }

            tracing::info!(
                instance = %instance.display_name(),
                path = %target.display(),
                mode = ?mode,
                "Config file written"
            );
            written.push(target);
        }

        Ok(PropagationReport { written })
    }
}
