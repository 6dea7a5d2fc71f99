//! Asset index resolution: one recursive tree listing, filtered down to mesh files.

use std::future::Future;

use corelib::{AssetDescriptor, RepositoryReference, has_supported_extension};
use serde::Deserialize;

use crate::DEFAULT_BRANCH;
use crate::error::ResolveError;

/// Raw answer of the index service, before any classification.
#[derive(Clone, Debug)]
pub struct IndexResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl IndexResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Remote listing of a repository's files.
pub trait IndexService {
    /// List the full recursive tree of `branch`. Errors are reserved for requests that
    /// produced no response at all; HTTP statuses are reported through [`IndexResponse`].
    fn fetch_tree(
        &self,
        reference: &RepositoryReference,
        branch: &str,
    ) -> impl Future<Output = Result<IndexResponse, ResolveError>> + Send;

    /// Absolute URL the raw bytes of `path` are served from.
    fn raw_url(&self, reference: &RepositoryReference, branch: &str, path: &str) -> String;
}

/// Tree listing body, as returned by the index service.
#[derive(Debug, Deserialize)]
pub struct TreeListing {
    #[serde(default)]
    pub truncated: bool,
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TreeEntry {
    fn is_blob(&self) -> bool {
        self.kind == "blob"
    }
}

/// Assets found in one repository, in listing order.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub reference: RepositoryReference,
    pub assets: Vec<AssetDescriptor>,
    /// The listing hit the service's size limit; `assets` may be incomplete.
    pub truncated: bool,
}

/// Resolve `reference` into its loadable mesh assets.
///
/// Issues exactly one listing request and never retries. Order is the service's order.
pub async fn resolve<S: IndexService>(
    service: &S,
    reference: &RepositoryReference,
) -> Result<Resolution, ResolveError> {
    log::info!("Resolving assets of {reference} ({DEFAULT_BRANCH})");
    let response = service.fetch_tree(reference, DEFAULT_BRANCH).await?;

    match response.status {
        404 => return Err(ResolveError::NotFound),
        _ if !response.is_success() => return Err(ResolveError::status(response.status)),
        _ => {}
    }

    let listing: TreeListing = serde_json::from_slice(&response.body)?;
    if listing.truncated {
        log::warn!("File list of {reference} is truncated. Some files may not be shown.");
    }

    let assets: Vec<AssetDescriptor> = listing
        .tree
        .iter()
        .filter(|entry| entry.is_blob() && has_supported_extension(&entry.path))
        .map(|entry| {
            AssetDescriptor::new(
                entry.path.clone(),
                service.raw_url(reference, DEFAULT_BRANCH, &entry.path),
            )
        })
        .collect();

    if assets.is_empty() {
        return Err(ResolveError::NoSupportedAssets);
    }

    log::info!(
        "Found {} mesh file(s) among {} entries of {reference}",
        assets.len(),
        listing.tree.len()
    );
    Ok(Resolution {
        reference: reference.clone(),
        assets,
        truncated: listing.truncated,
    })
}
