//! Repository side of the pipeline: locator parsing, tree listing and raw-file URLs.

pub mod error;
pub mod github;
pub mod index;
pub mod locator;

pub use error::{ParseError, ResolveError};
pub use github::{GitHubConfig, GitHubIndex};
pub use index::{IndexResponse, IndexService, Resolution, resolve};
pub use locator::parse;

/// Branch whose tree is listed and whose raw files are fetched. The repository's real
/// default branch is not looked up.
pub const DEFAULT_BRANCH: &str = "main";
