//! Install orchestration: fetch h2c-core and extensions into the install dir.
//!
//! All resolution (registry fetch, dependency expansion, compatibility
//! check) happens before the first byte of any artifact is downloaded, so a
//! bad request never leaves a partial install behind. Cache reuse via
//! `--no-reinstall` trusts existing files without any version comparison.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{CONFIG_FILE, Config};
use crate::github::GithubClient;
use crate::output;
use crate::registry::Registry;
use crate::request::Request;
use crate::requirements;
use crate::resolve::{self, PlanEntry};
use crate::version::{normalize_tag, resolve_version};

/// Repository publishing h2c-core release assets.
pub const CORE_REPO: &str = "helmfile2compose/h2c-core";

/// Main file of h2c-core, both the release asset name and the local name.
pub const CORE_FILE: &str = "helmfile2compose.py";

/// Options for one install run.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Core version pin from the command line. Falls back to the config
    /// file's `core_version`, then to the latest release.
    pub core_version: Option<String>,
    /// Extension arguments. `None` means "none given", which falls back to
    /// the config file's `depends` list.
    pub extensions: Option<Vec<String>>,
    /// Where to write h2c-core; extensions go in an `extensions/` subdir.
    pub install_dir: PathBuf,
    /// Keep existing files as-is and only download what is missing.
    pub no_reinstall: bool,
    /// Extensions whose incompatibility checks are bypassed.
    pub ignored: HashSet<String>,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            core_version: None,
            extensions: None,
            install_dir: PathBuf::from(".h2c"),
            no_reinstall: false,
            ignored: HashSet::new(),
        }
    }
}

/// Install h2c-core and the requested extensions.
pub fn install(opts: &InstallOptions, client: &GithubClient) -> Result<()> {
    let config = Config::load(CONFIG_FILE)?;

    let mut ext_args = opts.extensions.clone().unwrap_or_default();
    if ext_args.is_empty() && !config.depends.is_empty() {
        output::info(&format!(
            "Reading extensions from {}: {}",
            CONFIG_FILE,
            config.depends.join(", ")
        ));
        ext_args = config.depends.clone();
    }

    let requests = Request::parse_all(&ext_args);
    // Resolve before downloading the core so we fail fast on bad input.
    let validated = validate_extensions(&requests, client, &opts.ignored)?;

    install_core(opts, &config, client)?;

    let mut checks = vec![("h2c-core".to_string(), vec!["pyyaml".to_string()])];
    if let Some((registry, plan)) = &validated {
        let extensions_dir = opts.install_dir.join("extensions");
        checks.extend(install_extensions(
            &extensions_dir,
            registry,
            plan,
            &requests,
            opts.no_reinstall,
            client,
        )?);
    }

    report_missing_requirements(&checks);
    Ok(())
}

/// Fetch the registry and turn requests into a validated install plan.
///
/// Returns `None` when nothing was requested (the registry is not fetched
/// at all in that case).
fn validate_extensions(
    requests: &[Request],
    client: &GithubClient,
    ignored: &HashSet<String>,
) -> Result<Option<(Registry, Vec<PlanEntry>)>> {
    if requests.is_empty() {
        return Ok(None);
    }
    let registry = client.fetch_registry()?;
    let plan = resolve::resolve(requests, &registry)?;
    resolve::check_incompatible(&plan, &registry, ignored)?;
    Ok(Some((registry, plan)))
}

/// Download h2c-core into the install dir. Skips when cached and asked to.
fn install_core(opts: &InstallOptions, config: &Config, client: &GithubClient) -> Result<()> {
    let core_path = opts.install_dir.join(CORE_FILE);
    if opts.no_reinstall && core_path.is_file() {
        output::skip(&format!("Cached {}", core_path.display()));
        return Ok(());
    }

    let core_tag = if let Some(version) = &opts.core_version {
        normalize_tag(version)
    } else if let Some(version) = &config.core_version {
        let tag = normalize_tag(version);
        output::info(&format!("Core version from {CONFIG_FILE}: {tag}"));
        tag
    } else {
        client.latest_tag(CORE_REPO)?
    };

    let url = client.release_asset_url(CORE_REPO, &core_tag, CORE_FILE);
    fetch_file(client, &url, &core_path, &format!("h2c-core {core_tag}"))
}

/// Download extensions in plan order.
///
/// Returns `(name, requirement_lines)` for every newly downloaded extension
/// that publishes a `requirements.txt`. Cached extensions are skipped
/// entirely, requirements included.
fn install_extensions(
    extensions_dir: &Path,
    registry: &Registry,
    plan: &[PlanEntry],
    requests: &[Request],
    no_reinstall: bool,
    client: &GithubClient,
) -> Result<Vec<(String, Vec<String>)>> {
    let mut with_requirements = Vec::new();

    for entry in plan {
        let descriptor = registry
            .get(&entry.name)
            .with_context(|| format!("extension '{}' missing from registry", entry.name))?;

        let local_name = Path::new(&descriptor.file)
            .file_name()
            .with_context(|| format!("invalid artifact path '{}'", descriptor.file))?;
        let ext_path = extensions_dir.join(local_name);

        if no_reinstall && ext_path.is_file() {
            output::skip(&format!("Cached {}", ext_path.display()));
            continue;
        }

        let resolved = resolve_version(entry, descriptor, client)?;

        let mut label = format!("extension {} {}", entry.name, resolved.display_version);
        if entry.is_dependency {
            let dependents = resolve::find_dependents(&entry.name, requests, registry);
            if !dependents.is_empty() {
                label.push_str(&format!(" (dependency of {})", dependents.join(", ")));
            }
        }

        let file_url = client.raw_url(&descriptor.repo, &resolved.tag, &descriptor.file);
        fetch_file(client, &file_url, &ext_path, &label)?;

        let reqs_url = client.raw_url(&descriptor.repo, &resolved.tag, "requirements.txt");
        if let Some(data) = client.download(&reqs_url)? {
            let lines = String::from_utf8_lossy(&data)
                .lines()
                .map(|l| l.to_string())
                .collect();
            with_requirements.push((entry.name.clone(), lines));
        }
    }

    Ok(with_requirements)
}

/// Download a URL into a local file, creating parent directories.
fn fetch_file(client: &GithubClient, url: &str, path: &Path, label: &str) -> Result<()> {
    output::action(&format!("Fetching {label}..."));
    let pb = output::spinner(url);
    let content = client.download_required(url);
    output::spinner_done(pb);

    write_file(path, &content?)?;
    output::detail(&format!("Wrote {}", path.display()));
    Ok(())
}

/// Write bytes to a file, creating parent directories as needed.
fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Warn about Python packages the fetched components need but the local
/// environment lacks.
fn report_missing_requirements(checks: &[(String, Vec<String>)]) {
    let missing = requirements::missing_requirements(checks);
    if missing.is_empty() {
        return;
    }

    eprintln!();
    output::warning("Missing Python dependencies:");
    for (component, line) in &missing {
        eprintln!("  {component}: {line}");
    }
    eprintln!("\nInstall with: {}\n", requirements::pip_hint(&missing));
}
