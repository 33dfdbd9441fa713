//! Locality predicates for content-directory instances.

use std::io::ErrorKind;
use std::path::Path;

use propagator_sdk::{DirectoryError, LocalityPredicate, ServiceInstance};

use crate::config::ContentLocality;
use crate::domain::locality::LocalityMatcher;

/// Local when any endpoint alias names the current node.
#[derive(Debug, Clone)]
pub struct AliasLocality {
    node_name: String,
}

impl AliasLocality {
    #[must_use]
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
        }
    }
}

impl LocalityPredicate for AliasLocality {
    fn is_local(&self, instance: &ServiceInstance) -> Result<bool, DirectoryError> {
        let matcher = LocalityMatcher::new(&self.node_name);
        Ok(matcher.first_match(instance.aliases()).is_some())
    }
}

/// Local when the instance's base path is an existing directory on this node.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasePathLocality;

impl LocalityPredicate for BasePathLocality {
    fn is_local(&self, instance: &ServiceInstance) -> Result<bool, DirectoryError> {
        match std::fs::metadata(Path::new(&instance.base_path)) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DirectoryError::locality(
                instance.display_name(),
                e.to_string(),
            )),
        }
    }
}

/// Local when any inner predicate says so.
///
/// Predicates run in order and stop at the first positive answer. An error is
/// returned only if no predicate answered positively.
pub struct AnyOf(Vec<Box<dyn LocalityPredicate>>);

impl AnyOf {
    #[must_use]
    pub fn new(predicates: Vec<Box<dyn LocalityPredicate>>) -> Self {
        Self(predicates)
    }
}

impl LocalityPredicate for AnyOf {
    fn is_local(&self, instance: &ServiceInstance) -> Result<bool, DirectoryError> {
        let mut first_error = None;
        for predicate in &self.0 {
            match predicate.is_local(instance) {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(false), Err)
    }
}

/// Build the configured content locality predicate for `node_name`.
#[must_use]
pub fn content_locality(kind: ContentLocality, node_name: &str) -> Box<dyn LocalityPredicate> {
    match kind {
        ContentLocality::Aliases => Box::new(AliasLocality::new(node_name)),
        ContentLocality::BasePath => Box::new(BasePathLocality),
        ContentLocality::Either => {
            let predicates: Vec<Box<dyn LocalityPredicate>> =
                vec![Box::new(AliasLocality::new(node_name)), Box::new(BasePathLocality)];
            Box::new(AnyOf::new(predicates))
        }
    }
}
