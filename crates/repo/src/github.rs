//! GitHub-backed index service (trees API + raw.githubusercontent.com).

use std::time::Duration;

use corelib::RepositoryReference;

use crate::error::ResolveError;
use crate::index::{IndexResponse, IndexService};

/// Endpoints and client settings. Bases carry no trailing slash.
#[derive(Clone, Debug)]
pub struct GitHubConfig {
    pub api_base: String,
    pub raw_base: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            raw_base: "https://raw.githubusercontent.com".to_string(),
            user_agent: concat!("meshview/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GitHubIndex {
    client: reqwest::Client,
    config: GitHubConfig,
}

impl GitHubIndex {
    pub fn new(config: GitHubConfig) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| ResolveError::network(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Trees API URL listing `branch` recursively.
    pub fn tree_url(&self, reference: &RepositoryReference, branch: &str) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/{branch}?recursive=1",
            self.config.api_base,
            reference.owner(),
            reference.name()
        )
    }
}

impl IndexService for GitHubIndex {
    async fn fetch_tree(
        &self,
        reference: &RepositoryReference,
        branch: &str,
    ) -> Result<IndexResponse, ResolveError> {
        let url = self.tree_url(reference, branch);
        log::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| ResolveError::network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ResolveError::network(e.to_string()))?;
        log::debug!("{url} -> {status} ({} bytes)", body.len());

        Ok(IndexResponse {
            status,
            body: body.to_vec(),
        })
    }

    fn raw_url(&self, reference: &RepositoryReference, branch: &str, path: &str) -> String {
        format!(
            "{}/{}/{}/{branch}/{path}",
            self.config.raw_base,
            reference.owner(),
            reference.name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_tree_and_raw_urls() {
        let index = GitHubIndex::new(GitHubConfig::default()).unwrap();
        let reference = RepositoryReference::new("user", "models").unwrap();
        assert_eq!(
            index.tree_url(&reference, "main"),
            "https://api.github.com/repos/user/models/git/trees/main?recursive=1"
        );
        assert_eq!(
            index.raw_url(&reference, "main", "assets/ship.glb"),
            "https://raw.githubusercontent.com/user/models/main/assets/ship.glb"
        );
    }
}
