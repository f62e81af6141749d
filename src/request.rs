//! Parsing of extension arguments into requests.
//!
//! An argument is either a bare name (`keycloak`) or a pinned form
//! (`keycloak==0.1.0`). Nothing is validated here; unknown names surface
//! later when the resolver checks them against the registry, and duplicate
//! requests are deduplicated at plan-build time, not here.

/// One user-requested extension, possibly pinned to a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub name: String,
    /// Version the user pinned with `==`, if any. Absent means "latest".
    pub pinned: Option<String>,
}

impl Request {
    /// Parse `name` or `name==version`, splitting on the first `==`.
    pub fn parse(arg: &str) -> Self {
        match arg.split_once("==") {
            Some((name, version)) => Self {
                name: name.trim().to_string(),
                pinned: Some(version.trim().to_string()),
            },
            None => Self {
                name: arg.trim().to_string(),
                pinned: None,
            },
        }
    }

    /// Parse a whole argument list, preserving order and duplicates.
    pub fn parse_all<S: AsRef<str>>(args: &[S]) -> Vec<Self> {
        args.iter().map(|a| Self::parse(a.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name() {
        let req = Request::parse("keycloak");
        assert_eq!(req.name, "keycloak");
        assert_eq!(req.pinned, None);
    }

    #[test]
    fn test_pinned_version() {
        let req = Request::parse("keycloak==0.1.0");
        assert_eq!(req.name, "keycloak");
        assert_eq!(req.pinned.as_deref(), Some("0.1.0"));
    }

    #[test]
    fn test_splits_on_first_separator() {
        // Everything after the first == belongs to the version.
        let req = Request::parse("foo==1.0==beta");
        assert_eq!(req.name, "foo");
        assert_eq!(req.pinned.as_deref(), Some("1.0==beta"));
    }

    #[test]
    fn test_whitespace_trimmed() {
        let req = Request::parse("  nginx == 1.2.3 ");
        assert_eq!(req.name, "nginx");
        assert_eq!(req.pinned.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn test_parse_all_keeps_order_and_duplicates() {
        let reqs = Request::parse_all(&["b", "a", "b==2.0"]);
        assert_eq!(reqs.len(), 3);
        assert_eq!(reqs[0].name, "b");
        assert_eq!(reqs[1].name, "a");
        assert_eq!(reqs[2].pinned.as_deref(), Some("2.0"));
    }
}
