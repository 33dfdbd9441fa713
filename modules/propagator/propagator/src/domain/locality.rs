use farmconf_node_info::short_host_name;
use propagator_sdk::EndpointAlias;

/// Decides whether an endpoint alias identifies the current node.
///
/// Only the leftmost label of the alias host is considered and the comparison
/// ignores case, so `SRV01.corp.local` matches node `srv01`.
#[derive(Debug, Clone, Copy)]
pub struct LocalityMatcher<'a> {
    node_name: &'a str,
}

impl<'a> LocalityMatcher<'a> {
    #[must_use]
    pub fn new(node_name: &'a str) -> Self {
        Self { node_name }
    }

    #[must_use]
    pub fn node_name(&self) -> &'a str {
        self.node_name
    }

    /// Returns false for a missing alias, an alias without host, or an empty node name.
    #[must_use]
    pub fn matches(&self, alias: Option<&EndpointAlias>) -> bool {
        let Some(host) = alias.and_then(|a| a.host.as_deref()) else {
            return false;
        };
        if self.node_name.is_empty() {
            return false;
        }
        short_host_name(host).to_lowercase() == self.node_name.to_lowercase()
    }

    /// First alias that names this node, if any.
    #[must_use]
    pub fn first_match<'b>(&self, aliases: &'b [EndpointAlias]) -> Option<&'b EndpointAlias> {
        aliases.iter().find(|alias| self.matches(Some(*alias)))
    }
}
