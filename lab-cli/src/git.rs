//! Remote discovery through the `git` command line.

use std::path::{Path, PathBuf};
use std::process::Command;

use lab_core::{RemoteCatalog, RemoteInfo, ResolveError};
use tracing::debug;

/// Reads remotes with `git remote -v` in a working directory.
#[derive(Debug, Clone)]
pub struct GitRemoteCatalog {
    dir: PathBuf,
}

impl GitRemoteCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RemoteCatalog for GitRemoteCatalog {
    fn remotes(&self) -> Result<Vec<RemoteInfo>, ResolveError> {
        let output = Command::new("git")
            .args(["remote", "-v"])
            .current_dir(&self.dir)
            .output()
            .map_err(|e| ResolveError::Catalog {
                message: format!("failed to run git: {}", e),
            })?;

        if !output.status.success() {
            // Not a repository, or no readable config.
            debug!(
                status = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git remote failed"
            );
            return Ok(Vec::new());
        }

        Ok(parse_remote_lines(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse `git remote -v` output.
///
/// Uses the fetch URL of each remote, keeps the first entry per remote
/// name, and skips URLs that are not host/namespace/repository shaped.
pub fn parse_remote_lines(output: &str) -> Vec<RemoteInfo> {
    let mut remotes: Vec<RemoteInfo> = Vec::new();

    for line in output.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(url), Some("(fetch)")) = (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };

        if remotes.iter().any(|r| r.name == name) {
            continue;
        }

        match RemoteInfo::parse(name, url) {
            Some(remote) => remotes.push(remote),
            None => debug!(name, url, "Skipping unrecognized remote URL"),
        }
    }

    remotes
}
