//! Project configuration from `helmfile2compose.yaml`.
//!
//! Only two keys matter to the manager: a `depends:` block list of default
//! extensions and an optional `core_version:` pin. The file is read with a
//! small line parser rather than a YAML crate — the downstream tool owns the
//! full document, we only skim our keys off it. Inline `depends: [a, b]`
//! lists are not supported.

use std::path::Path;

use anyhow::{Context, Result};

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "helmfile2compose.yaml";

/// Manager-relevant settings from `helmfile2compose.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Extensions to install when none are given on the command line.
    pub depends: Vec<String>,
    /// Default core version pin, overridden by `--core-version`.
    pub core_version: Option<String>,
}

impl Config {
    /// Load the config from `path`. A missing file is an empty config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    /// Parse the manager's keys out of the document text.
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();
        let mut in_depends = false;

        for line in content.lines() {
            let stripped = line.trim();

            if let Some(value) = stripped.strip_prefix("core_version:") {
                let value = unquote(value);
                if !value.is_empty() {
                    config.core_version = Some(value.to_string());
                }
                in_depends = false;
                continue;
            }

            if stripped.starts_with("depends:") {
                // Inline list not supported; the block form starts here.
                in_depends = !stripped.contains('[');
                continue;
            }

            if in_depends {
                if let Some(item) = stripped.strip_prefix("- ") {
                    let item = unquote(item);
                    if !item.is_empty() {
                        config.depends.push(item.to_string());
                    }
                } else if stripped.is_empty() || stripped.starts_with('#') {
                    continue;
                } else {
                    // Next top-level key ends the depends block.
                    in_depends = false;
                }
            }
        }

        config
    }
}

/// Trim whitespace and a surrounding quote pair.
fn unquote(value: &str) -> &str {
    value.trim().trim_matches(|c| c == '\'' || c == '"')
}
