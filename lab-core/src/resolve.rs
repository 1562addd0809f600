//! End-to-end target resolution.
//!
//! This module provides:
//! - [`RemoteCatalog`] - Source of the configured remotes
//! - [`TargetRequest`] - Explicit project/domain overrides from the caller
//! - [`ResolvedTarget`] - Domain, token and remote handed to API clients
//! - [`resolve_target`] - Catalog → domain filter → remote selection → token

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::filter::{filter_supported, is_supported_domain};
use crate::model::{RemoteInfo, Token};
use crate::prompt::UserPrompt;
use crate::select::{SelectError, select_remote};
use crate::store::PreferenceStore;
use crate::token::{TokenError, resolve_token};

/// Error type for target resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The remote list could not be read.
    #[error("failed to read remotes: {message}")]
    Catalog { message: String },

    /// Choosing among several remotes failed.
    #[error("failed to select remote repository: {0}")]
    Select(#[from] SelectError),

    /// No usable token for the chosen domain.
    #[error("failed to get private token: {0}")]
    Token(#[from] TokenError),

    /// A domain was requested that no remote points at.
    #[error("no remote points at domain {domain}; pass a project as well")]
    UnknownDomain { domain: String },

    /// A domain was requested that is not a GitLab host.
    #[error("domain {domain} is not a GitLab host")]
    UnsupportedDomain { domain: String },

    /// The requested project is not a `namespace/project` path.
    #[error("invalid project path '{project}': expected namespace/project")]
    InvalidProject { project: String },
}

/// Source of the remotes configured for the current directory.
pub trait RemoteCatalog {
    /// List remotes in their configured order.
    ///
    /// Returns an empty list outside a repository.
    fn remotes(&self) -> Result<Vec<RemoteInfo>, ResolveError>;
}

/// Catalog over a fixed list of remotes.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog(pub Vec<RemoteInfo>);

impl RemoteCatalog for StaticCatalog {
    fn remotes(&self) -> Result<Vec<RemoteInfo>, ResolveError> {
        Ok(self.0.clone())
    }
}

/// Caller-supplied overrides.
#[derive(Debug, Clone, Default)]
pub struct TargetRequest {
    /// Use this domain instead of choosing among remotes.
    pub domain: Option<String>,

    /// Use this `namespace/project` instead of the remote's.
    pub project: Option<String>,
}

impl TargetRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }
}

/// Everything an API client needs for one invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedTarget {
    pub domain: String,
    #[serde(skip)]
    pub token: Token,
    pub remote: RemoteInfo,
}

impl ResolvedTarget {
    pub fn api_url(&self) -> String {
        self.remote.api_url()
    }

    pub fn web_url(&self) -> String {
        self.remote.web_url()
    }

    pub fn project_path(&self) -> String {
        self.remote.project_path()
    }
}

/// Name given to remotes built from explicit overrides.
const OVERRIDE_REMOTE_NAME: &str = "override";

/// Resolve the domain, token and project to operate on.
///
/// Returns `Ok(None)` when no supported remote exists and the request
/// does not name both a domain and a project.
pub fn resolve_target(
    catalog: &dyn RemoteCatalog,
    prefs: &mut PreferenceStore,
    prompt: &mut dyn UserPrompt,
    request: &TargetRequest,
) -> Result<Option<ResolvedTarget>, ResolveError> {
    let Some(remote) = choose_remote(catalog, prefs, prompt, request)? else {
        debug!("No GitLab remote in current directory");
        return Ok(None);
    };

    let remote = match &request.project {
        Some(project) => remote
            .with_project_path(project)
            .ok_or_else(|| ResolveError::InvalidProject {
                project: project.clone(),
            })?,
        None => remote,
    };

    let token = resolve_token(&remote.domain, prefs, prompt)?;

    Ok(Some(ResolvedTarget {
        domain: remote.domain.clone(),
        token,
        remote,
    }))
}

fn choose_remote(
    catalog: &dyn RemoteCatalog,
    prefs: &mut PreferenceStore,
    prompt: &mut dyn UserPrompt,
    request: &TargetRequest,
) -> Result<Option<RemoteInfo>, ResolveError> {
    let Some(domain) = &request.domain else {
        let candidates = filter_supported(&catalog.remotes()?);
        debug!(count = candidates.len(), "Collected GitLab remotes");
        return Ok(select_remote(candidates, prefs, prompt)?);
    };

    if !is_supported_domain(domain) {
        return Err(ResolveError::UnsupportedDomain {
            domain: domain.clone(),
        });
    }

    if let Some(project) = &request.project {
        debug!(%domain, "Using explicit domain and project");
        return RemoteInfo::from_project_path(OVERRIDE_REMOTE_NAME, domain, project)
            .map(Some)
            .ok_or_else(|| ResolveError::InvalidProject {
                project: project.clone(),
            });
    }

    catalog
        .remotes()?
        .into_iter()
        .find(|remote| &remote.domain == domain)
        .map(Some)
        .ok_or_else(|| ResolveError::UnknownDomain {
            domain: domain.clone(),
        })
}
