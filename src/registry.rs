//! Extension registry model.
//!
//! The registry is a single `extensions.json` document published on the
//! h2c-manager main branch. It maps extension names to descriptors telling
//! us where each extension lives and what it declares about its neighbors.
//! The manager only ever consumes it: fetch once per invocation, then read.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Descriptor for one extension, as published in `extensions.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Extension {
    /// GitHub repository in `owner/repo` form.
    pub repo: String,
    /// Path of the extension's main file within the repository.
    pub file: String,
    /// Names of extensions that must be installed alongside this one.
    /// Expanded one level deep at resolve time, never transitively.
    #[serde(default)]
    pub depends: Vec<String>,
    /// Names of extensions this one cannot coexist with.
    #[serde(default)]
    pub incompatible: Vec<String>,
    /// Human-readable description for `--info`.
    #[serde(default)]
    pub description: String,
}

/// Immutable name → descriptor mapping for one resolution run.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    extensions: BTreeMap<String, Extension>,
}

/// Wire shape of `extensions.json`.
#[derive(Deserialize)]
struct RegistryFile {
    #[serde(default)]
    extensions: BTreeMap<String, Extension>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry from the raw `extensions.json` bytes.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let file: RegistryFile =
            serde_json::from_slice(data).context("Failed to parse extension registry")?;
        Ok(Self {
            extensions: file.extensions,
        })
    }

    /// Add or replace a descriptor.
    pub fn insert(&mut self, name: impl Into<String>, extension: Extension) {
        self.extensions.insert(name.into(), extension);
    }

    /// Look up a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&Extension> {
        self.extensions.get(name)
    }

    /// Check whether an extension is known.
    pub fn contains(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }

    /// All extension names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.extensions.keys().map(|s| s.as_str()).collect()
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registry_json() {
        let data = br#"{
            "extensions": {
                "keycloak": {
                    "repo": "helmfile2compose/h2c-keycloak",
                    "file": "extensions/keycloak.py",
                    "depends": ["cert-manager"],
                    "incompatible": ["zitadel"],
                    "description": "Keycloak operator support"
                }
            }
        }"#;

        let registry = Registry::from_json(data).unwrap();
        assert_eq!(registry.len(), 1);

        let entry = registry.get("keycloak").unwrap();
        assert_eq!(entry.repo, "helmfile2compose/h2c-keycloak");
        assert_eq!(entry.file, "extensions/keycloak.py");
        assert_eq!(entry.depends, vec!["cert-manager"]);
        assert_eq!(entry.incompatible, vec!["zitadel"]);
    }

    #[test]
    fn test_optional_fields_default_empty() {
        let data = br#"{
            "extensions": {
                "nginx": { "repo": "helmfile2compose/h2c-nginx", "file": "nginx.py" }
            }
        }"#;

        let registry = Registry::from_json(data).unwrap();
        let entry = registry.get("nginx").unwrap();
        assert!(entry.depends.is_empty());
        assert!(entry.incompatible.is_empty());
        assert!(entry.description.is_empty());
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = Registry::new();
        for name in ["traefik", "keycloak", "nginx"] {
            registry.insert(
                name,
                Extension {
                    repo: format!("helmfile2compose/h2c-{name}"),
                    file: format!("{name}.py"),
                    depends: vec![],
                    incompatible: vec![],
                    description: String::new(),
                },
            );
        }
        assert_eq!(registry.names(), vec!["keycloak", "nginx", "traefik"]);
    }

    #[test]
    fn test_missing_extensions_key_is_empty() {
        let registry = Registry::from_json(b"{}").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Registry::from_json(b"not json").is_err());
    }
}
