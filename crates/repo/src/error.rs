use thiserror::Error;

/// The locator did not contain a recognizable `github.com/owner/name` pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Invalid GitHub repository URL. Please use the HTTPS URL (e.g., https://github.com/user/repo) or SSH format."
)]
pub struct ParseError;

/// Repository-level failures. Each one replaces the whole asset list with its message.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Repository not found. Please check the URL and ensure it is a public repository.")]
    NotFound,
    /// Non-success status, or no response at all when `status` is `None`.
    #[error("Failed to fetch repository data ({}).", describe_transport(.status, .message))]
    Transport {
        status: Option<u16>,
        message: String,
    },
    #[error("Repository listing could not be read: {0}")]
    InvalidListing(#[from] serde_json::Error),
    #[error("No supported mesh files (.obj, .glb, .gltf) found in this repository.")]
    NoSupportedAssets,
}

impl ResolveError {
    pub fn status(status: u16) -> Self {
        Self::Transport {
            status: Some(status),
            message: String::new(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }
}

fn describe_transport(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("status: {code}"),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_messages() {
        assert_eq!(
            ResolveError::status(403).to_string(),
            "Failed to fetch repository data (status: 403)."
        );
        assert_eq!(
            ResolveError::network("connection refused").to_string(),
            "Failed to fetch repository data (connection refused)."
        );
    }
}
