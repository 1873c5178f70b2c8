//! Reference classification and local path resolution.
//!
//! Classification order: a string beginning with the remote URL scheme is
//! a remote URL; else a string containing a colon after its first path
//! separator is a remote short-form reference; else it is a local path.

use std::path::{Path, PathBuf};

use redraft_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const URL_SCHEME: &str = "https://";
const BLOB_MARKER: &str = "blob";

/// Coordinates of a file in a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRef {
    /// Repository owner (user or organization)
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// Branch the file lives on
    pub branch: String,

    /// Path of the file inside the repository
    pub path: String,
}

/// A classified source reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// A path on the local filesystem
    Local(PathBuf),

    /// A file inside a remote repository
    Remote(RemoteRef),
}

impl SourceRef {
    /// Classify an opaque reference string.
    pub fn classify(reference: &str) -> AppResult<Self> {
        if reference.starts_with(URL_SCHEME) {
            return parse_url(reference).map(Self::Remote);
        }

        if is_short_form(reference) {
            return parse_short_form(reference).map(Self::Remote);
        }

        Ok(Self::Local(PathBuf::from(reference)))
    }
}

/// A short-form remote reference contains a colon somewhere after its
/// first path separator (`owner/repo/branch:path`). Windows drive paths
/// (`C:\...`) have no `/` before the colon and stay local.
fn is_short_form(reference: &str) -> bool {
    match reference.find('/') {
        Some(slash) => reference[slash..].contains(':'),
        None => false,
    }
}

fn parse_short_form(reference: &str) -> AppResult<RemoteRef> {
    let invalid = || {
        AppError::Usage(format!(
            "Invalid remote reference '{}'; expected owner/repo/branch:path",
            reference
        ))
    };

    let colon = reference.find(':').ok_or_else(invalid)?;
    let (coords, path) = (&reference[..colon], &reference[colon + 1..]);

    let mut parts = coords.splitn(3, '/');
    let owner = parts.next().unwrap_or_default();
    let repo = parts.next().unwrap_or_default();
    let branch = parts.next().unwrap_or_default();

    if owner.is_empty() || repo.is_empty() || branch.is_empty() || path.is_empty() {
        return Err(invalid());
    }

    Ok(RemoteRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
        branch: branch.to_string(),
        path: path.to_string(),
    })
}

fn parse_url(reference: &str) -> AppResult<RemoteRef> {
    let invalid = || {
        AppError::Usage(format!(
            "Invalid remote URL '{}'; expected https://host/owner/repo/blob/branch/path",
            reference
        ))
    };

    let rest = reference.strip_prefix(URL_SCHEME).ok_or_else(invalid)?;
    let parts: Vec<&str> = rest.split('/').collect();

    // host / owner / repo / blob / branch / path...
    if parts.len() < 6 || parts[3] != BLOB_MARKER {
        return Err(invalid());
    }

    let (owner, repo, branch) = (parts[1], parts[2], parts[4]);
    let path = parts[5..].join("/");

    if owner.is_empty() || repo.is_empty() || branch.is_empty() || path.is_empty() {
        return Err(invalid());
    }

    Ok(RemoteRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
        branch: branch.to_string(),
        path,
    })
}

/// Resolve a local path to an absolute path, failing before any read if
/// the file does not exist.
pub fn resolve_local(path: &Path) -> AppResult<PathBuf> {
    if !path.exists() {
        return Err(AppError::Usage(format!(
            "file not found: {}",
            path.display()
        )));
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    Ok(absolute)
}
