//! Locator parsing: `https://github.com/owner/name[...]` or `git@github.com:owner/name.git`.

use std::sync::LazyLock;

use corelib::RepositoryReference;
use regex::Regex;

use crate::error::ParseError;

/// Host marker, then owner up to the next `/`, then a name that stops at `/`, `.` or
/// whitespace (drops a `.git` suffix and any trailing path).
static LOCATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com[:/]([^/]+)/([^/.\s]+)").expect("locator pattern is valid")
});

/// Extract the repository owner and name from a user-supplied locator.
pub fn parse(locator: &str) -> Result<RepositoryReference, ParseError> {
    let caps = LOCATOR.captures(locator.trim()).ok_or(ParseError)?;
    let owner = caps.get(1).map_or("", |m| m.as_str());
    let name = caps.get(2).map_or("", |m| m.as_str());
    RepositoryReference::new(owner, name).ok_or(ParseError)
}
