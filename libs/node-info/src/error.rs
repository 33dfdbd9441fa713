/// Errors for node identity resolution
#[derive(Debug, thiserror::Error)]
pub enum NodeInfoError {
    #[error("Hostname lookup failed: {0}")]
    HostnameUnavailable(String),

    #[error("Hostname is not valid UTF-8: {0}")]
    InvalidHostname(String),

    #[error("Node name must not be empty")]
    EmptyNodeName,
}
