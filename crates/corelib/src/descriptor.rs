//! Repository and asset identifiers shared by the resolver, loader and viewer.

use std::fmt;

/// Mesh file extensions the viewer can load (lowercase, with leading dot).
pub const SUPPORTED_EXTENSIONS: [&str; 3] = [".obj", ".glb", ".gltf"];

/// Returns `true` if `path` ends in one of [`SUPPORTED_EXTENSIONS`], ignoring case.
pub fn has_supported_extension(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Owner/name pair of a hosted repository. Both parts are non-empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepositoryReference {
    owner: String,
    name: String,
}

impl RepositoryReference {
    /// Returns `None` if either part is empty.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Option<Self> {
        let owner = owner.into();
        let name = name.into();
        if owner.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self { owner, name })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `owner/name`, as shown above the file list.
    pub fn label(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One loadable mesh file: repository-relative path plus the absolute URL its bytes are
/// fetched from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetDescriptor {
    pub path: String,
    pub fetch_url: String,
}

impl AssetDescriptor {
    pub fn new(path: impl Into<String>, fetch_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            fetch_url: fetch_url.into(),
        }
    }

    /// Lowercase extension without the dot, if the path has one.
    pub fn extension(&self) -> Option<String> {
        let file = self.file_name();
        file.rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// Uppercase extension badge (`OBJ`, `GLB`, ...), empty when there is none.
    pub fn extension_label(&self) -> String {
        self.extension()
            .map(|ext| ext.to_ascii_uppercase())
            .unwrap_or_default()
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_extension_ignores_case() {
        assert!(has_supported_extension("models/Duck.GLB"));
        assert!(has_supported_extension("a.obj"));
        assert!(has_supported_extension("scene.gltf"));
        assert!(!has_supported_extension("texture.png"));
        assert!(!has_supported_extension("mesh.fbx"));
        assert!(!has_supported_extension("obj"));
    }

    #[test]
    fn reference_rejects_empty_parts() {
        assert!(RepositoryReference::new("", "repo").is_none());
        assert!(RepositoryReference::new("user", "").is_none());
        let r = RepositoryReference::new("user", "repo").unwrap();
        assert_eq!(r.label(), "user/repo");
        assert_eq!(r.to_string(), "user/repo");
    }

    #[test]
    fn descriptor_extension_helpers() {
        let d = AssetDescriptor::new("assets/v1.2/Helmet.GlB", "https://example.invalid/x");
        assert_eq!(d.extension().as_deref(), Some("glb"));
        assert_eq!(d.extension_label(), "GLB");
        assert_eq!(d.file_name(), "Helmet.GlB");

        let bare = AssetDescriptor::new("Makefile", "https://example.invalid/y");
        assert_eq!(bare.extension(), None);
        assert_eq!(bare.extension_label(), "");
    }
}
