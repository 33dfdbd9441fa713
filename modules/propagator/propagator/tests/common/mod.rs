#![allow(dead_code)]

//! Fake collaborators shared by the integration tests.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use propagator_sdk::{
    ApplyMode, Candidate, ConfigurationPayload, DirectoryError, EndpointAlias, InstanceDirectory,
    OperatingMode, ParameterDialog, PayloadError, SelectionDecision, SelectionUi, ServiceInstance,
};

/// Directory serving a fixed candidate list; `None` entries fail on read.
pub struct FakeDirectory {
    entries: Vec<Option<ServiceInstance>>,
    unavailable: bool,
}

impl FakeDirectory {
    pub fn new(instances: Vec<ServiceInstance>) -> Self {
        Self {
            entries: instances.into_iter().map(Some).collect(),
            unavailable: false,
        }
    }

    pub fn with_entries(entries: Vec<Option<ServiceInstance>>) -> Self {
        Self {
            entries,
            unavailable: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn unavailable() -> Self {
        Self {
            entries: Vec::new(),
            unavailable: true,
        }
    }
}

impl InstanceDirectory for FakeDirectory {
    fn candidates(&self) -> Result<Vec<Candidate>, DirectoryError> {
        if self.unavailable {
            return Err(DirectoryError::unavailable("directory offline"));
        }
        Ok(self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                entry
                    .clone()
                    .ok_or_else(|| DirectoryError::candidate(format!("entry-{idx}"), "access denied"))
            })
            .collect())
    }
}

pub fn instance(name: &str, base_path: &str, hosts: &[&str]) -> ServiceInstance {
    ServiceInstance {
        name: Some(name.to_owned()),
        description: format!("{name} (description)"),
        base_path: base_path.to_owned(),
        is_management_instance: false,
        endpoint_aliases: Some(
            hosts
                .iter()
                .map(|h| EndpointAlias::new(*h, format!("http://{h}")))
                .collect(),
        ),
    }
}

pub fn management(name: &str, base_path: &str, hosts: &[&str]) -> ServiceInstance {
    ServiceInstance {
        is_management_instance: true,
        ..instance(name, base_path, hosts)
    }
}

/// Payload that records every write and fails on the configured attempt (1-based).
#[derive(Default)]
pub struct RecordingPayload {
    pub attempts: Mutex<Vec<(PathBuf, bool, ApplyMode)>>,
    pub fail_on_attempt: Option<usize>,
}

impl RecordingPayload {
    pub fn failing_on(attempt: usize) -> Self {
        Self {
            attempts: Mutex::new(Vec::new()),
            fail_on_attempt: Some(attempt),
        }
    }

    pub fn attempted_paths(&self) -> Vec<PathBuf> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _, _)| path.clone())
            .collect()
    }
}

impl ConfigurationPayload for RecordingPayload {
    fn write_to(&self, target: &Path, overwrite: bool, mode: ApplyMode) -> Result<(), PayloadError> {
        let mut attempts = self.attempts.lock().unwrap();
        attempts.push((target.to_path_buf(), overwrite, mode));
        if Some(attempts.len()) == self.fail_on_attempt {
            return Err(PayloadError::io(
                target,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ));
        }
        Ok(())
    }
}

impl ConfigurationPayload for &RecordingPayload {
    fn write_to(&self, target: &Path, overwrite: bool, mode: ApplyMode) -> Result<(), PayloadError> {
        (**self).write_to(target, overwrite, mode)
    }
}

/// UI that replays a scripted decision and records what it was shown.
pub struct ScriptedUi {
    pub decision: SelectionDecision,
    pub presented: RefCell<Vec<String>>,
    pub warnings: Vec<String>,
    pub proceed_enabled: Option<bool>,
}

impl ScriptedUi {
    pub fn deciding(decision: SelectionDecision) -> Self {
        Self {
            decision,
            presented: RefCell::new(Vec::new()),
            warnings: Vec::new(),
            proceed_enabled: None,
        }
    }
}

impl SelectionUi for ScriptedUi {
    fn present(&mut self, _mode: OperatingMode, instances: &[ServiceInstance]) {
        self.presented
            .borrow_mut()
            .extend(instances.iter().map(|i| i.display_name().to_owned()));
    }

    fn warn_no_local_instances(&mut self, message: &str) {
        self.warnings.push(message.to_owned());
    }

    fn set_proceed_enabled(&mut self, enabled: bool) {
        self.proceed_enabled = Some(enabled);
    }

    fn decide(&mut self) -> SelectionDecision {
        self.decision.clone()
    }
}

/// Dialog returning a borrowed payload, or cancelling.
pub struct ScriptedDialog<'a> {
    pub payload: Option<&'a RecordingPayload>,
    pub calls: usize,
}

impl<'a> ScriptedDialog<'a> {
    pub fn returning(payload: &'a RecordingPayload) -> Self {
        Self {
            payload: Some(payload),
            calls: 0,
        }
    }

    pub fn cancelling() -> Self {
        Self {
            payload: None,
            calls: 0,
        }
    }
}

impl<'a> ParameterDialog for ScriptedDialog<'a> {
    type Payload = &'a RecordingPayload;

    fn collect(&mut self) -> Option<Self::Payload> {
        self.calls += 1;
        self.payload
    }
}
