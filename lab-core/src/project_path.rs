//! Extracting `namespace/project` from GitLab web URLs.
//!
//! The project path is everything between the host and the `-`
//! separator or the last sub-page marker, so nested groups survive:
//!
//! ```
//! use lab_core::parse_project_path;
//!
//! let path = parse_project_path("https://gitlab.example.com/group/sub/app/merge_requests/3").unwrap();
//! assert_eq!(path, "group/sub/app");
//! ```

use thiserror::Error;

/// Path segments that start a project sub-page.
const SUBPAGE_MARKERS: &[&str] = &["issues", "merge_requests", "pipelines"];

/// Separator GitLab puts between the project path and its sub-pages.
const SUBPAGE_SEPARATOR: &str = "-";

/// Scheme, empty segment, host, namespace, project.
const MIN_SEGMENTS: usize = 5;

/// Error parsing a project path from a web URL.
#[derive(Debug, Error)]
pub enum ProjectPathError {
    #[error("malformed project URL '{url}': expected at least 5 path segments, got {segments}")]
    TooFewSegments { url: String, segments: usize },

    #[error("malformed project URL '{url}': no project path before the sub-page")]
    EmptyPath { url: String },
}

/// Parse the `namespace/project` identifier out of a project web URL.
///
/// Any `?query` or `#fragment` is dropped, then the URL is split on `/`
/// and the scheme, empty and host segments are skipped. The path ends at
/// the first `-` separator, else before the last `issues`,
/// `merge_requests` or `pipelines` segment. A URL with neither is taken
/// to be the project page itself.
pub fn parse_project_path(url: &str) -> Result<String, ProjectPathError> {
    let location = url.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = location.split('/').collect();
    if segments.len() < MIN_SEGMENTS {
        return Err(ProjectPathError::TooFewSegments {
            url: url.to_string(),
            segments: segments.len(),
        });
    }

    let path = &segments[3..];
    let end = path
        .iter()
        .position(|segment| *segment == SUBPAGE_SEPARATOR)
        .or_else(|| {
            path.iter()
                .rposition(|segment| SUBPAGE_MARKERS.contains(segment))
        })
        .unwrap_or(path.len());

    let mut project = &path[..end];
    while let [rest @ .., ""] = project {
        project = rest;
    }

    if project.is_empty() {
        return Err(ProjectPathError::EmptyPath {
            url: url.to_string(),
        });
    }

    Ok(project.join("/"))
}
