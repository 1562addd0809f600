//! Narrowing remotes to supported hosting domains.

use crate::model::RemoteInfo;

/// Prefix a domain must start with to be treated as a GitLab host.
pub const SUPPORTED_DOMAIN_PREFIX: &str = "gitlab";

/// Check whether a domain belongs to a supported hosting platform.
pub fn is_supported_domain(domain: &str) -> bool {
    domain.starts_with(SUPPORTED_DOMAIN_PREFIX)
}

/// Keep only remotes on a supported domain, preserving order.
///
/// Remotes on other hosts are dropped silently; this is a filter, not a
/// validator.
pub fn filter_supported(remotes: &[RemoteInfo]) -> Vec<RemoteInfo> {
    remotes
        .iter()
        .filter(|remote| is_supported_domain(&remote.domain))
        .cloned()
        .collect()
}
