//! Version resolution: plan entry → concrete release tag.
//!
//! There is no constraint solving here. An entry is either pinned to an
//! exact tag or resolves to the latest published release of its repository.

use crate::github::{GithubClient, HttpError};
use crate::registry::Extension;
use crate::resolve::PlanEntry;

/// A plan entry with its concrete, immutable tag decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub name: String,
    /// Git tag to fetch, e.g. `v0.1.0`.
    pub tag: String,
    /// Version string shown to the user. Currently always equal to the tag.
    pub display_version: String,
    pub is_dependency: bool,
}

/// Ensure a version string carries a `v` prefix for tag lookup. Idempotent.
pub fn normalize_tag(version: &str) -> String {
    if version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{version}")
    }
}

/// Decide the tag for one plan entry.
///
/// A pinned version is normalized and used as-is, with no existence check
/// against the remote: a bad pin only surfaces when the fetch 404s. An
/// unpinned entry queries its repository's latest release, once per entry.
pub fn resolve_version(
    entry: &PlanEntry,
    descriptor: &Extension,
    client: &GithubClient,
) -> Result<ResolvedEntry, HttpError> {
    let tag = match &entry.pinned {
        Some(pinned) => normalize_tag(pinned),
        None => client.latest_tag(&descriptor.repo)?,
    };

    Ok(ResolvedEntry {
        name: entry.name.clone(),
        display_version: tag.clone(),
        tag,
        is_dependency: entry.is_dependency,
    })
}
