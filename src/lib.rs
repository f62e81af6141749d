//! Package manager for h2c-core and helmfile2compose extensions.
//!
//! Given a set of extension requests (`name` or `name==version`) and an
//! optional core version pin, the manager resolves the remote extension
//! registry into an ordered, conflict-free install plan, resolves each entry
//! to a concrete release tag, and downloads the artifacts into a local
//! install directory (default `.h2c/`).
//!
//! # Resolution pipeline
//!
//! ```text
//! arguments -> [request] -> [resolve] -> [version] -> fetch/write
//!                               ^            ^
//!                           [registry]   [github]
//! ```
//!
//! Requests are expanded one dependency level deep, in encounter order and
//! deduplicated; the plan is then checked against declared incompatibility
//! pairs before anything is fetched. A failed resolution never leaves a
//! partial install behind.
//!
//! # Example
//!
//! ```no_run
//! use h2c_manager::github::GithubClient;
//! use h2c_manager::request::Request;
//! use h2c_manager::resolve;
//!
//! let client = GithubClient::new();
//! let registry = client.fetch_registry()?;
//! let requests = Request::parse_all(&["keycloak", "nginx==0.2.0"]);
//! let plan = resolve::resolve(&requests, &registry)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod github;
pub mod info;
pub mod install;
pub mod output;
pub mod registry;
pub mod request;
pub mod requirements;
pub mod resolve;
pub mod run;
pub mod version;

pub use config::Config;
pub use github::{GithubClient, HttpError};
pub use registry::{Extension, Registry};
pub use request::Request;
pub use resolve::{PlanEntry, ResolveError};
pub use version::ResolvedEntry;
