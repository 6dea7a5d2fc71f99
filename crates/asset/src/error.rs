use thiserror::Error;

/// Asset-level failures. They concern one file and never touch the asset list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Unsupported file format: {path}")]
    UnsupportedFormat { path: String },
    #[error("Failed to fetch {url}: {reason}")]
    FetchFailure { url: String, reason: String },
    #[error("Failed to parse {path}: {reason}")]
    ParseFailure { path: String, reason: String },
}

impl LoadError {
    pub fn fetch(url: &str, reason: impl ToString) -> Self {
        Self::FetchFailure {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
