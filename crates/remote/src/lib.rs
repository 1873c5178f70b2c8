//! Source location and remote publication for the Redraft CLI.
//!
//! This crate resolves an opaque file reference into a concrete location:
//! - Local filesystem paths
//! - Remote short-form references (`owner/repo/branch:path`)
//! - Remote blob URLs (`https://host/owner/repo/blob/branch/path`)
//!
//! Remote acquisition (clone + checkout) and publication (commit, push,
//! pull request) sit behind the narrow two-call `RemoteHost` interface so
//! the chunk/rewrite core never depends on version-control specifics.

pub mod host;
pub mod locator;

pub use host::{Checkout, GitHubHost, RemoteHost};
pub use locator::{resolve_local, RemoteRef, SourceRef};
