//! Dependency resolution and compatibility checking.
//!
//! Expands a list of requests into an ordered, deduplicated install plan:
//! for each request in input order, its not-yet-seen dependencies come first
//! (unpinned, tagged as dependencies), then the request itself. Expansion is
//! exactly one level deep: an extension pulled in as a dependency is never
//! expanded for its own dependencies.
//!
//! Resolution failures are typed so the CLI can abort before any fetch
//! happens. No partial plan is ever acted upon.

use std::collections::HashSet;

use thiserror::Error;

use crate::registry::Registry;
use crate::request::Request;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown extension '{name}'\n  Available: {}", .available.join(", "))]
    UnknownExtension {
        name: String,
        /// All valid registry names, sorted.
        available: Vec<String>,
    },

    #[error("extension '{name}' depends on '{dependency}', which is not in the registry")]
    MissingDependency { name: String, dependency: String },

    #[error(
        "extensions '{a}' and '{b}' are incompatible\n  \
         Use --ignore-compatibility-errors {a} to override"
    )]
    Incompatible { a: String, b: String },
}

/// One entry of the install plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub name: String,
    /// Pinned version carried over from the request. Dependencies are never
    /// pinned; they always resolve to latest.
    pub pinned: Option<String>,
    /// True when this entry was pulled in by another extension's `depends`
    /// list rather than requested directly.
    pub is_dependency: bool,
}

/// Expand requests into an ordered, deduplicated install plan.
///
/// The seen set is seeded empty per call, so repeated runs over the same
/// inputs produce identical plans. A name already in the plan is never
/// re-emitted or re-classified; in particular, if the same name is requested
/// twice with different pins, the first pin wins and the second is dropped.
pub fn resolve(requests: &[Request], registry: &Registry) -> Result<Vec<PlanEntry>, ResolveError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut plan = Vec::new();

    for request in requests {
        let Some(entry) = registry.get(&request.name) else {
            return Err(ResolveError::UnknownExtension {
                name: request.name.clone(),
                available: registry.names().iter().map(|s| s.to_string()).collect(),
            });
        };

        // Dependencies first, in declaration order, unpinned.
        for dep in &entry.depends {
            if seen.contains(dep.as_str()) {
                continue;
            }
            if !registry.contains(dep) {
                return Err(ResolveError::MissingDependency {
                    name: request.name.clone(),
                    dependency: dep.clone(),
                });
            }
            seen.insert(dep.as_str());
            plan.push(PlanEntry {
                name: dep.clone(),
                pinned: None,
                is_dependency: true,
            });
        }

        if seen.insert(request.name.as_str()) {
            plan.push(PlanEntry {
                name: request.name.clone(),
                pinned: request.pinned.clone(),
                is_dependency: false,
            });
        }
    }

    Ok(plan)
}

/// Check the plan against declared incompatibility pairs.
///
/// The check is symmetric through plan membership: it is enough for one side
/// to declare the pair, whichever side that is. Extensions named in `ignored`
/// have their conflicts bypassed in both directions. Must run on the full
/// plan so dependency-pulled entries are covered too.
pub fn check_incompatible(
    plan: &[PlanEntry],
    registry: &Registry,
    ignored: &HashSet<String>,
) -> Result<(), ResolveError> {
    let members: HashSet<&str> = plan.iter().map(|e| e.name.as_str()).collect();

    for entry in plan {
        let Some(descriptor) = registry.get(&entry.name) else {
            continue;
        };
        for other in &descriptor.incompatible {
            if members.contains(other.as_str())
                && !ignored.contains(&entry.name)
                && !ignored.contains(other)
            {
                return Err(ResolveError::Incompatible {
                    a: entry.name.clone(),
                    b: other.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Names of requested extensions that pulled `name` in through `depends`.
/// Used for progress display only.
pub fn find_dependents(name: &str, requests: &[Request], registry: &Registry) -> Vec<String> {
    requests
        .iter()
        .filter(|req| {
            registry
                .get(&req.name)
                .is_some_and(|e| e.depends.iter().any(|d| d == name))
        })
        .map(|req| req.name.clone())
        .collect()
}
