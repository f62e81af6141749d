//! Python runtime-dependency checks for fetched components.
//!
//! h2c-core and its extensions are Python; each may publish a
//! `requirements.txt` next to its artifact. After installing we probe the
//! local Python environment for each named package and report what is
//! missing, with a combined `pip install` hint. Missing packages are a
//! warning, never a failure — the user may be installing into a container.

use std::process::Command;

/// Extract the package name from one requirements line.
///
/// Returns `None` for blank lines and comments. A version specifier
/// (`>=`, `<=`, `==`, `!=`, `~=`, `>`, `<`) and anything after it is
/// stripped.
pub fn package_name(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let end = line
        .find(['>', '<', '=', '!', '~'])
        .unwrap_or(line.len());
    let name = line[..end].trim();
    if name.is_empty() { None } else { Some(name) }
}

/// Probe the local Python environment for an installed distribution.
fn python_has_package(package: &str) -> bool {
    Command::new("python3")
        .arg("-c")
        .arg("import importlib.metadata, sys; importlib.metadata.version(sys.argv[1])")
        .arg(package)
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Check requirement lines per component against the local environment.
///
/// `checks` pairs a component name with its requirement lines. Returns
/// `(component, requirement_line)` for every requirement whose package is
/// not installed.
pub fn missing_requirements(checks: &[(String, Vec<String>)]) -> Vec<(String, String)> {
    missing_requirements_with(checks, python_has_package)
}

/// Internal: check with a configurable probe (for testing).
fn missing_requirements_with(
    checks: &[(String, Vec<String>)],
    installed: impl Fn(&str) -> bool,
) -> Vec<(String, String)> {
    let mut missing = Vec::new();
    for (component, requirements) in checks {
        for line in requirements {
            if let Some(package) = package_name(line) {
                if !installed(package) {
                    missing.push((component.clone(), line.trim().to_string()));
                }
            }
        }
    }
    missing
}

/// Format the `pip install` hint for a set of missing requirements,
/// deduplicated and sorted.
pub fn pip_hint(missing: &[(String, String)]) -> String {
    let mut reqs: Vec<&str> = missing.iter().map(|(_, line)| line.as_str()).collect();
    reqs.sort_unstable();
    reqs.dedup();
    format!("pip install {}", reqs.join(" "))
}
