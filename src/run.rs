//! Run mode: install, then hand off to helmfile2compose.
//!
//! `h2c run [args…]` performs a normal install into `.h2c` (extensions come
//! from the config file) and then invokes the downloaded
//! `helmfile2compose.py` with smart defaults. Any default already present in
//! the passthrough args is left to the user's value.

use std::collections::HashSet;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

use crate::config::CONFIG_FILE;
use crate::github::GithubClient;
use crate::install::{self, CORE_FILE, InstallOptions};
use crate::output;

/// Options carried over from the CLI into run mode.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub no_reinstall: bool,
    pub core_version: Option<String>,
    pub ignored: HashSet<String>,
}

/// Install into `.h2c`, then run helmfile2compose with `extra_args`.
///
/// Returns the child's exit code.
pub fn run(extra_args: &[String], opts: &RunOptions, client: &GithubClient) -> Result<i32> {
    if !Path::new(CONFIG_FILE).is_file() {
        output::info(&format!("No {CONFIG_FILE} found, installing h2c-core only"));
    }

    install::install(
        &InstallOptions {
            core_version: opts.core_version.clone(),
            no_reinstall: opts.no_reinstall,
            ignored: opts.ignored.clone(),
            ..InstallOptions::default()
        },
        client,
    )?;
    println!();

    let core = Path::new(".h2c").join(CORE_FILE);
    let extensions_dir = Path::new(".h2c").join("extensions");
    let args = downstream_args(extra_args, extensions_dir.is_dir());

    let status = Command::new("python3")
        .arg(&core)
        .args(&args)
        .status()
        .with_context(|| format!("Failed to run python3 {}", core.display()))?;

    Ok(status.code().unwrap_or(1))
}

/// Build the downstream argument list: defaults first, user args last.
///
/// Defaults are suppressed when the user already passed the flag
/// (`--helmfile-dir` also defers to `--from-dir`).
fn downstream_args(extra_args: &[String], have_extensions_dir: bool) -> Vec<String> {
    let has = |flag: &str| extra_args.iter().any(|a| a == flag);

    let mut args = Vec::new();
    if have_extensions_dir && !has("--extensions-dir") {
        args.push("--extensions-dir".to_string());
        args.push(".h2c/extensions".to_string());
    }
    if !has("--output-dir") {
        args.push("--output-dir".to_string());
        args.push(".".to_string());
    }
    if !has("--helmfile-dir") && !has("--from-dir") {
        args.push("--helmfile-dir".to_string());
        args.push(".".to_string());
    }
    args.extend(extra_args.iter().cloned());
    args
}
