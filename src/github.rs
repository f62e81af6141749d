//! GitHub transport for registry, release, and raw-file fetches.
//!
//! Blocking HTTP via ureq. Every call goes through one [`GithubClient`] so
//! the API, raw-file, and release-asset base URLs can be pointed at a mock
//! server in tests.
//!
//! ## Authentication
//!
//! Set `GITHUB_TOKEN` to raise the API rate limit from 60/hr to 5000/hr:
//! ```bash
//! export GITHUB_TOKEN="ghp_xxxxxxxxxxxxxxxxxxxx"
//! ```

use std::io::Read;
use std::sync::OnceLock;
use std::time::Duration;

use thiserror::Error;

use crate::registry::Registry;

/// Default GitHub API base URL.
const GITHUB_API_BASE: &str = "https://api.github.com";

/// Default base URL for raw file contents.
const RAW_BASE: &str = "https://raw.githubusercontent.com";

/// Default base URL for release asset downloads.
const RELEASE_BASE: &str = "https://github.com";

/// Repository hosting the `extensions.json` registry on its main branch.
const MANAGER_REPO: &str = "helmfile2compose/h2c-manager";

/// Default HTTP timeout in seconds.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("file not found\n  URL: {url}")]
    NotFound { url: String },

    #[error("no releases found for {repo}\n  URL: {url}")]
    NoReleases { repo: String, url: String },

    #[error("GitHub API rate limit exceeded. Try again later or set GITHUB_TOKEN.\n  URL: {url}")]
    RateLimited { url: String },

    #[error("request failed: {source}\n  URL: {url}")]
    Request {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },
}

/// Get HTTP timeout from environment variable or use default.
/// Cached for performance (only reads env var once).
fn http_timeout() -> Duration {
    static TIMEOUT: OnceLock<Duration> = OnceLock::new();
    *TIMEOUT.get_or_init(|| {
        let secs = std::env::var("H2C_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        // Clamp to reasonable range (5-300 seconds)
        Duration::from_secs(secs.clamp(5, 300))
    })
}

/// GitHub token from the environment, if set.
fn github_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok()
}

/// HTTP client bound to a set of GitHub base URLs.
pub struct GithubClient {
    agent: ureq::Agent,
    api_base: String,
    raw_base: String,
    release_base: String,
}

impl Default for GithubClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GithubClient {
    /// Client against the real GitHub endpoints.
    pub fn new() -> Self {
        Self::with_bases(GITHUB_API_BASE, RAW_BASE, RELEASE_BASE)
    }

    /// Client with explicit base URLs (for testing against a mock server).
    pub fn with_bases(
        api_base: impl Into<String>,
        raw_base: impl Into<String>,
        release_base: impl Into<String>,
    ) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(http_timeout()).build(),
            api_base: api_base.into(),
            raw_base: raw_base.into(),
            release_base: release_base.into(),
        }
    }

    /// Build a GET request with GitHub headers and optional bearer auth.
    fn request(&self, url: &str) -> ureq::Request {
        let mut request = self
            .agent
            .get(url)
            .set("Accept", "application/vnd.github.v3+json")
            .set("User-Agent", "h2c-manager");

        if let Some(token) = github_token() {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        request
    }

    /// GET a URL, returning the response body. 404 and 403 are mapped to
    /// their dedicated variants; any other failure propagates as transport.
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let response = self.request(url).call().map_err(|e| match e {
            ureq::Error::Status(404, _) => HttpError::NotFound {
                url: url.to_string(),
            },
            ureq::Error::Status(403, _) => HttpError::RateLimited {
                url: url.to_string(),
            },
            other => HttpError::Request {
                url: url.to_string(),
                source: Box::new(other),
            },
        })?;

        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| HttpError::InvalidResponse {
                url: url.to_string(),
                reason: format!("failed to read body: {e}"),
            })?;
        Ok(body)
    }

    /// GET a URL and parse the body as JSON.
    fn get_json(&self, url: &str) -> Result<serde_json::Value, HttpError> {
        let body = self.get(url)?;
        serde_json::from_slice(&body).map_err(|e| HttpError::InvalidResponse {
            url: url.to_string(),
            reason: format!("failed to parse JSON: {e}"),
        })
    }

    /// Resolve the latest release tag of a repository.
    ///
    /// The tag is used verbatim; a missing release (404) is a hard
    /// [`HttpError::NoReleases`].
    pub fn latest_tag(&self, repo: &str) -> Result<String, HttpError> {
        let url = format!("{}/repos/{}/releases/latest", self.api_base, repo);
        let json = self.get_json(&url).map_err(|e| match e {
            HttpError::NotFound { url } => HttpError::NoReleases {
                repo: repo.to_string(),
                url,
            },
            other => other,
        })?;

        json.get("tag_name")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| HttpError::InvalidResponse {
                url,
                reason: "no tag_name in release".to_string(),
            })
    }

    /// URL of a file within a repository at a given tag.
    pub fn raw_url(&self, repo: &str, tag: &str, path: &str) -> String {
        format!("{}/{}/refs/tags/{}/{}", self.raw_base, repo, tag, path)
    }

    /// URL of a release asset.
    pub fn release_asset_url(&self, repo: &str, tag: &str, filename: &str) -> String {
        format!(
            "{}/{}/releases/download/{}/{}",
            self.release_base, repo, tag, filename
        )
    }

    /// Download a URL. `Ok(None)` on 404 — for optional files such as an
    /// extension's `requirements.txt`.
    pub fn download(&self, url: &str) -> Result<Option<Vec<u8>>, HttpError> {
        match self.get(url) {
            Ok(body) => Ok(Some(body)),
            Err(HttpError::NotFound { .. }) => Ok(None),
            Err(other) => Err(other),
        }
    }

    /// Download a URL that must exist. 404 is an error carrying the URL.
    pub fn download_required(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.get(url)
    }

    /// Fetch and parse the extension registry.
    pub fn fetch_registry(&self) -> Result<Registry, HttpError> {
        let url = format!("{}/{}/main/extensions.json", self.raw_base, MANAGER_REPO);
        let body = self.get(&url).map_err(|e| match e {
            HttpError::NotFound { url } => HttpError::InvalidResponse {
                url,
                reason: "extension registry not found".to_string(),
            },
            other => other,
        })?;
        Registry::from_json(&body).map_err(|e| HttpError::InvalidResponse {
            url,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_url_layout() {
        let client = GithubClient::new();
        assert_eq!(
            client.raw_url("helmfile2compose/h2c-keycloak", "v0.1.0", "extensions/keycloak.py"),
            "https://raw.githubusercontent.com/helmfile2compose/h2c-keycloak/refs/tags/v0.1.0/extensions/keycloak.py"
        );
    }

    #[test]
    fn test_release_asset_url_layout() {
        let client = GithubClient::new();
        assert_eq!(
            client.release_asset_url("helmfile2compose/h2c-core", "v2.0.0", "helmfile2compose.py"),
            "https://github.com/helmfile2compose/h2c-core/releases/download/v2.0.0/helmfile2compose.py"
        );
    }

    #[test]
    fn test_timeout_is_reasonable() {
        let t = http_timeout();
        assert!(t >= Duration::from_secs(5));
        assert!(t <= Duration::from_secs(300));
    }

    mod mock_server_tests {
        use super::*;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn client_for(server: &MockServer) -> GithubClient {
            GithubClient::with_bases(server.uri(), server.uri(), server.uri())
        }

        #[tokio::test]
        async fn test_latest_tag_success() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/repos/helmfile2compose/h2c-core/releases/latest"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({
                        "tag_name": "v2.1.0"
                    })),
                )
                .mount(&server)
                .await;

            let tag = client_for(&server)
                .latest_tag("helmfile2compose/h2c-core")
                .unwrap();
            // Tag kept verbatim, v prefix included.
            assert_eq!(tag, "v2.1.0");
        }

        #[tokio::test]
        async fn test_latest_tag_404_is_no_releases() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/repos/acme/empty/releases/latest"))
                .respond_with(ResponseTemplate::new(404))
                .mount(&server)
                .await;

            let err = client_for(&server).latest_tag("acme/empty").unwrap_err();
            assert!(matches!(err, HttpError::NoReleases { ref repo, .. } if repo == "acme/empty"));
            assert!(err.to_string().contains("no releases found"));
        }

        #[tokio::test]
        async fn test_latest_tag_missing_tag_name() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/repos/acme/odd/releases/latest"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
                .mount(&server)
                .await;

            let err = client_for(&server).latest_tag("acme/odd").unwrap_err();
            assert!(matches!(err, HttpError::InvalidResponse { .. }));
        }

        #[tokio::test]
        async fn test_rate_limit_mentions_token() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/repos/acme/busy/releases/latest"))
                .respond_with(ResponseTemplate::new(403))
                .mount(&server)
                .await;

            let err = client_for(&server).latest_tag("acme/busy").unwrap_err();
            assert!(err.to_string().contains("GITHUB_TOKEN"));
        }

        #[tokio::test]
        async fn test_download_optional_404_is_none() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/missing"))
                .respond_with(ResponseTemplate::new(404))
                .mount(&server)
                .await;

            let client = client_for(&server);
            let result = client.download(&format!("{}/missing", server.uri())).unwrap();
            assert!(result.is_none());
        }

        #[tokio::test]
        async fn test_download_required_404_is_error() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/missing"))
                .respond_with(ResponseTemplate::new(404))
                .mount(&server)
                .await;

            let client = client_for(&server);
            let err = client
                .download_required(&format!("{}/missing", server.uri()))
                .unwrap_err();
            assert!(matches!(err, HttpError::NotFound { .. }));
        }

        #[tokio::test]
        async fn test_server_error_is_transport() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/broken"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&server)
                .await;

            let client = client_for(&server);
            let err = client
                .download_required(&format!("{}/broken", server.uri()))
                .unwrap_err();
            assert!(matches!(err, HttpError::Request { .. }));
        }

        #[tokio::test]
        async fn test_fetch_registry() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/helmfile2compose/h2c-manager/main/extensions.json"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({
                        "extensions": {
                            "nginx": { "repo": "helmfile2compose/h2c-nginx", "file": "nginx.py" }
                        }
                    })),
                )
                .mount(&server)
                .await;

            let registry = client_for(&server).fetch_registry().unwrap();
            assert!(registry.contains("nginx"));
        }
    }
}
