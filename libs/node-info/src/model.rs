/// Node represents the farm member this process is running on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Hostname as reported by the OS, or the configured override.
    pub hostname: String,
    /// First dot-separated label of `hostname`.
    pub short_name: String,
    pub ip_address: Option<String>,
}
