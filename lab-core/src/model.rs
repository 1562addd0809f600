//! Domain model types for lab.
//!
//! This module defines the types shared by the resolution pipeline:
//! - [`Protocol`] - Transport a remote was configured with
//! - [`RemoteInfo`] - One configured remote pointing at a hosting domain
//! - [`Token`] - An access credential that never shows up in logs

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// API prefix appended to a domain's base URL.
const API_PATH: &str = "api/v4";

/// Transport used by a configured remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Https,
    Http,
    Ssh,
}

impl Protocol {
    /// Web scheme used to reach the host behind this remote.
    ///
    /// SSH remotes are served over HTTPS on the web side.
    pub fn web_scheme(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https | Self::Ssh => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Https => "https",
            Self::Http => "http",
            Self::Ssh => "ssh",
        };
        write!(f, "{}", name)
    }
}

/// A configured remote of the local repository.
///
/// Carries enough structure to build the API and web URLs of the project
/// it points at.
///
/// # Supported URL formats
///
/// - `https://<host>/<namespace>/<repo>.git`
/// - `http://<host>/<namespace>/<repo>.git`
/// - `ssh://[user@]<host>[:port]/<namespace>/<repo>.git`
/// - `[user@]<host>:<namespace>/<repo>.git`
///
/// The namespace may span several segments (`group/subgroup`).
///
/// # Examples
///
/// ```
/// use lab_core::RemoteInfo;
///
/// let remote = RemoteInfo::parse("origin", "git@gitlab.example.com:group/sub/app.git").unwrap();
/// assert_eq!(remote.domain, "gitlab.example.com");
/// assert_eq!(remote.project_path(), "group/sub/app");
/// assert_eq!(remote.api_url(), "https://gitlab.example.com/api/v4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteInfo {
    /// Name of the remote (e.g., "origin").
    pub name: String,

    /// Transport of the configured URL.
    pub protocol: Protocol,

    /// Host the remote points at.
    pub domain: String,

    /// Group path, possibly nested.
    pub namespace: String,

    /// Repository name without the `.git` suffix.
    pub repository: String,
}

impl RemoteInfo {
    /// Create a remote from already split components.
    pub fn new(
        name: impl Into<String>,
        protocol: Protocol,
        domain: impl Into<String>,
        namespace: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            protocol,
            domain: domain.into(),
            namespace: namespace.into(),
            repository: repository.into(),
        }
    }

    /// Build a remote for `domain` from a `namespace/project` path.
    ///
    /// Returns `None` when the path has no namespace part.
    pub fn from_project_path(name: impl Into<String>, domain: &str, project: &str) -> Option<Self> {
        let (namespace, repository) = split_project_path(project)?;
        Some(Self::new(name, Protocol::Https, domain, namespace, repository))
    }

    /// Parse a remote URL as printed by `git remote -v`.
    ///
    /// Returns `None` for local paths, unsupported schemes, and URLs that
    /// lack either a namespace or a repository segment.
    pub fn parse(name: impl Into<String>, url: &str) -> Option<Self> {
        let url = url.trim();

        let (protocol, domain, path) = if url.contains("://") {
            let parsed = Url::parse(url).ok()?;
            let protocol = match parsed.scheme() {
                "https" => Protocol::Https,
                "http" => Protocol::Http,
                "ssh" | "git+ssh" => Protocol::Ssh,
                _ => return None,
            };
            let host = parsed.host_str()?.to_string();
            (protocol, host, parsed.path().to_string())
        } else {
            // scp-like syntax: [user@]host:path
            let without_user = url.rsplit_once('@').map(|(_, rest)| rest).unwrap_or(url);
            let (host, path) = without_user.split_once(':')?;
            if host.contains('/') {
                return None;
            }
            (Protocol::Ssh, host.to_string(), path.to_string())
        };

        if domain.is_empty() {
            return None;
        }

        let path = path.trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let (namespace, repository) = split_project_path(path)?;

        Some(Self::new(name, protocol, domain, namespace, repository))
    }

    /// Base web URL of the hosting domain.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.protocol.web_scheme(), self.domain)
    }

    /// REST API endpoint of the hosting domain.
    pub fn api_url(&self) -> String {
        format!("{}/{}", self.base_url(), API_PATH)
    }

    /// Web page of the project.
    pub fn web_url(&self) -> String {
        format!("{}/{}", self.base_url(), self.project_path())
    }

    /// Web page of a project sub-page such as `issues` or `pipelines`.
    pub fn subpage_url(&self, page: &str) -> String {
        format!("{}/{}", self.web_url(), page.trim_matches('/'))
    }

    /// Canonical `namespace/project` identifier.
    pub fn project_path(&self) -> String {
        format!("{}/{}", self.namespace, self.repository)
    }

    /// Replace the namespace and repository with those of `project`.
    ///
    /// Returns `None` and leaves `self` untouched when the path has no
    /// namespace part.
    pub fn with_project_path(mut self, project: &str) -> Option<Self> {
        let (namespace, repository) = split_project_path(project)?;
        self.namespace = namespace.to_string();
        self.repository = repository.to_string();
        Some(self)
    }
}

/// Split `a/b/c` into `("a/b", "c")`, rejecting empty halves.
fn split_project_path(path: &str) -> Option<(&str, &str)> {
    let (namespace, repository) = path.trim_matches('/').rsplit_once('/')?;
    if namespace.is_empty() || repository.is_empty() {
        return None;
    }
    Some((namespace, repository))
}

/// An access credential for a hosting domain.
///
/// The inner value is only accessible via [`expose()`](Token::expose).
/// Debug and Display implementations show `[REDACTED]` instead of the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wrap a credential string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the credential.
    ///
    /// Use sparingly and never log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token([REDACTED])")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}
