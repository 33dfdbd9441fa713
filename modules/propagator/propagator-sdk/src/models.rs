//! Instance and mode models shared between the propagator and its hosts.

use std::fmt;

/// A registered network name through which a service instance may be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointAlias {
    pub host: Option<String>,
    pub uri: String,
}

impl EndpointAlias {
    #[must_use]
    pub fn new(host: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            uri: uri.into(),
        }
    }

    /// Build an alias from a raw URI, deriving `host` from it.
    ///
    /// A value without `://` is also read as `host[:port][/path]`, so `srv01` and
    /// `srv01.corp:80` name their host. Anything else that carries no host yields an
    /// alias without a host, which never matches any node.
    #[must_use]
    pub fn from_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let host = host_of(&uri).or_else(|| {
            if uri.contains("://") {
                None
            } else {
                host_of(&format!("http://{uri}"))
            }
        });
        Self { host, uri }
    }
}

fn host_of(uri: &str) -> Option<String> {
    url::Url::parse(uri)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_owned))
}

/// A deployable unit in the farm with a root filesystem path.
///
/// Identity is `base_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInstance {
    pub name: Option<String>,
    pub description: String,
    pub base_path: String,
    pub is_management_instance: bool,
    /// `None` when the directory exposes no alias collection for the instance.
    pub endpoint_aliases: Option<Vec<EndpointAlias>>,
}

impl ServiceInstance {
    /// Name shown to users: `name` when it has non-blank content, otherwise `description`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.description,
        }
    }

    #[must_use]
    pub fn aliases(&self) -> &[EndpointAlias] {
        self.endpoint_aliases.as_deref().unwrap_or_default()
    }
}

/// Which logical directory a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryKind {
    Management,
    Content,
}

impl fmt::Display for DirectoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Management => f.write_str("management"),
            Self::Content => f.write_str("content"),
        }
    }
}

/// Subset of the configuration a payload writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Full configuration, as applied on first installation.
    Install,
    /// Only the settings that may be edited after installation.
    Edit,
}

/// How the workflow was started by its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    /// Accepting a selection collects parameters and propagates them.
    Install,
    /// Accepting a selection closes the workflow; per-instance editing happens elsewhere.
    Edit,
}

impl OperatingMode {
    #[must_use]
    pub fn apply_mode(self) -> ApplyMode {
        match self {
            Self::Install => ApplyMode::Install,
            Self::Edit => ApplyMode::Edit,
        }
    }

    #[must_use]
    pub fn collects_parameters(self) -> bool {
        matches!(self, Self::Install)
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => f.write_str("install"),
            Self::Edit => f.write_str("edit"),
        }
    }
}

/// The user's answer to the instance list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionDecision {
    /// Proceed with the instances at these positions of the presented list, in this order.
    Accept(Vec<usize>),
    Cancel,
}
