//! Info mode: show registry metadata instead of installing.

use owo_colors::OwoColorize;

use anyhow::Result;

use crate::github::GithubClient;
use crate::request::Request;
use crate::resolve;

/// Display info about extensions from the registry.
///
/// With names, the plan is resolved first so dependencies are shown too and
/// unknown names fail the same way an install would. Without names, every
/// registry entry is shown in sorted order.
pub fn show(names: &[String], client: &GithubClient) -> Result<()> {
    let registry = client.fetch_registry()?;

    let show: Vec<String> = if names.is_empty() {
        registry.names().iter().map(|s| s.to_string()).collect()
    } else {
        let requests = Request::parse_all(names);
        let plan = resolve::resolve(&requests, &registry)?;
        plan.into_iter().map(|e| e.name).collect()
    };

    for name in &show {
        let Some(entry) = registry.get(name) else {
            continue;
        };

        println!("{}", name.bold());
        if entry.description.is_empty() {
            println!("  (no description)");
        } else {
            println!("  {}", entry.description);
        }
        println!("  repo: {}", entry.repo);

        // Best effort: a failed lookup is not fatal in info mode.
        match client.latest_tag(&entry.repo) {
            Ok(tag) => println!("  latest: {tag}"),
            Err(_) => println!("  latest: (could not fetch)"),
        }

        if !entry.depends.is_empty() {
            println!("  depends: {}", entry.depends.join(", "));
        }
        if !entry.incompatible.is_empty() {
            println!("  incompatible: {}", entry.incompatible.join(", "));
        }
        println!();
    }

    Ok(())
}
