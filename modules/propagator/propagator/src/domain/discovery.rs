//! Local instance discovery.
//!
//! Discovery is best-effort: a candidate that cannot be read or tested is recorded
//! as a [`CandidateFailure`] and skipped, and the remaining candidates are still examined.
//! Only an empty result reaches the workflow, as [`DiscoverySignal::NoLocalInstances`].

use std::collections::HashSet;

use propagator_sdk::{
    Candidate, DirectoryError, DirectoryKind, InstanceDirectory, LocalityPredicate,
    ServiceInstance,
};

use super::locality::LocalityMatcher;

/// A candidate (or a whole directory) that discovery had to skip.
#[derive(Debug)]
pub struct CandidateFailure {
    pub directory: DirectoryKind,
    /// Position of the candidate in directory order; `None` when the directory itself failed.
    pub position: Option<usize>,
    pub error: DirectoryError,
}

/// Aggregate outcome of a discovery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverySignal {
    LocalInstancesFound(usize),
    NoLocalInstances,
}

/// Ordered local instances plus diagnostics for everything that was skipped.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// Management matches first, then content matches, each in directory order.
    pub instances: Vec<ServiceInstance>,
    pub failures: Vec<CandidateFailure>,
}

impl DiscoveryReport {
    #[must_use]
    pub fn signal(&self) -> DiscoverySignal {
        if self.instances.is_empty() {
            DiscoverySignal::NoLocalInstances
        } else {
            DiscoverySignal::LocalInstancesFound(self.instances.len())
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn record_failure(&mut self, directory: DirectoryKind, position: Option<usize>, error: DirectoryError) {
        tracing::warn!(
            directory = %directory,
            position = ?position,
            error = %error,
            "Skipping candidate during discovery"
        );
        self.failures.push(CandidateFailure {
            directory,
            position,
            error,
        });
    }
}

/// Finds the instances of both directories that are hosted on the current node.
pub struct InstanceDiscoverer<'a> {
    management: &'a dyn InstanceDirectory,
    content: &'a dyn InstanceDirectory,
    content_locality: &'a dyn LocalityPredicate,
}

impl<'a> InstanceDiscoverer<'a> {
    #[must_use]
    pub fn new(
        management: &'a dyn InstanceDirectory,
        content: &'a dyn InstanceDirectory,
        content_locality: &'a dyn LocalityPredicate,
    ) -> Self {
        Self {
            management,
            content,
            content_locality,
        }
    }

    /// Run discovery for `current_node_name`.
    ///
    /// Never fails; see [`DiscoveryReport::failures`] for what was skipped.
    #[must_use]
    pub fn discover(&self, current_node_name: &str) -> DiscoveryReport {
        let mut report = DiscoveryReport::default();

        self.collect_management(&LocalityMatcher::new(current_node_name), &mut report);
        self.collect_content(&mut report);

        let mut seen = HashSet::new();
        for inst in &report.instances {
            if !seen.insert(inst.base_path.as_str()) {
                tracing::debug!(base_path = %inst.base_path, "Instance reported by more than one directory");
            }
        }

        tracing::info!(
            node = %current_node_name,
            found = report.instances.len(),
            skipped = report.failures.len(),
            "Discovery finished"
        );
        report
    }

    fn collect_management(&self, matcher: &LocalityMatcher<'_>, report: &mut DiscoveryReport) {
        let Some(candidates) = Self::enumerate(self.management, DirectoryKind::Management, report)
        else {
            return;
        };

        for (position, candidate) in candidates.into_iter().enumerate() {
            let inst = match candidate {
                Ok(inst) => inst,
                Err(e) => {
                    report.record_failure(DirectoryKind::Management, Some(position), e);
                    continue;
                }
            };

            if inst.endpoint_aliases.is_none() {
                tracing::debug!(
                    instance = %inst.display_name(),
                    "Management instance exposes no alias collection"
                );
                continue;
            }

            // First matching alias wins; the instance is added at most once.
            if let Some(alias) = matcher.first_match(inst.aliases()) {
                tracing::debug!(
                    instance = %inst.display_name(),
                    alias = %alias.uri,
                    "Management instance is local"
                );
                report.instances.push(inst);
            }
        }
    }

    fn collect_content(&self, report: &mut DiscoveryReport) {
        let Some(candidates) = Self::enumerate(self.content, DirectoryKind::Content, report) else {
            return;
        };

        for (position, candidate) in candidates.into_iter().enumerate() {
            let verdict = candidate.and_then(|inst| {
                self.content_locality
                    .is_local(&inst)
                    .map(|local| local.then_some(inst))
            });

            match verdict {
                Ok(Some(inst)) => {
                    tracing::debug!(instance = %inst.display_name(), "Content instance is local");
                    report.instances.push(inst);
                }
                Ok(None) => {}
                Err(e) => report.record_failure(DirectoryKind::Content, Some(position), e),
            }
        }
    }

    fn enumerate(
        directory: &dyn InstanceDirectory,
        kind: DirectoryKind,
        report: &mut DiscoveryReport,
    ) -> Option<Vec<Candidate>> {
        match directory.candidates() {
            Ok(candidates) => Some(candidates),
            Err(e) => {
                report.record_failure(kind, None, e);
                None
            }
        }
    }
}
