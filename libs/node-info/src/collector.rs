use crate::error::NodeInfoError;
use crate::model::Node;

/// Return the first dot-separated label of a host name.
///
/// `"SRV01.corp.local"` becomes `"SRV01"`; a name without dots is returned as is.
#[must_use]
pub fn short_host_name(host: &str) -> &str {
    host.split('.').next().unwrap_or(host)
}

/// Resolves the identity of the current node
#[derive(Debug, Clone, Default)]
pub struct NodeInfoCollector {
    name_override: Option<String>,
}

impl NodeInfoCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `name` instead of the OS hostname.
    ///
    /// Blank values are ignored so an empty config entry falls back to the OS.
    #[must_use]
    pub fn with_name_override(mut self, name: Option<String>) -> Self {
        self.name_override = name.filter(|n| !n.trim().is_empty());
        self
    }

    /// Create a Node for the current machine
    ///
    /// # Errors
    /// Returns `NodeInfoError` if the OS hostname cannot be read or decoded
    /// and no override was configured.
    pub fn create_current_node(&self) -> Result<Node, NodeInfoError> {
        let hostname = match &self.name_override {
            Some(name) => {
                tracing::debug!(node_name = %name, "Using configured node name");
                name.trim().to_owned()
            }
            None => Self::os_hostname()?,
        };

        let short_name = short_host_name(&hostname).to_owned();
        if short_name.is_empty() {
            return Err(NodeInfoError::EmptyNodeName);
        }

        Ok(Node {
            ip_address: Self::detect_local_ip(),
            hostname,
            short_name,
        })
    }

    fn os_hostname() -> Result<String, NodeInfoError> {
        let raw = hostname::get().map_err(|e| NodeInfoError::HostnameUnavailable(e.to_string()))?;
        raw.into_string()
            .map_err(|raw| NodeInfoError::InvalidHostname(raw.to_string_lossy().into_owned()))
    }

    /// Detect the local IP address used for the default route.
    fn detect_local_ip() -> Option<String> {
        match local_ip_address::local_ip() {
            Ok(ip) => {
                let ip_str = ip.to_string();
                tracing::debug!(ip = %ip_str, "Detected local IP address");
                Some(ip_str)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to detect local IP address");
                None
            }
        }
    }
}
