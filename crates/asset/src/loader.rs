//! Mesh loader: extension-based parser dispatch with a per-URL parse cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use corelib::AssetDescriptor;
use parking_lot::Mutex;

use crate::error::LoadError;
use crate::fetch::AssetFetcher;
use crate::gltf_import::{GltfSource, resolve_uri};
use crate::obj::load_obj_scene;
use crate::scene::{MeshFormat, SceneGraph};

/// Fetches and parses assets, keeping each parse result for later reselection.
///
/// Cached graphs are handed out as `Arc<SceneGraph>` and never modified; callers
/// normalize them into owned copies.
pub struct MeshLoader<F> {
    fetcher: F,
    cache: Mutex<HashMap<String, Arc<SceneGraph>>>,
    parses: AtomicUsize,
}

impl<F: AssetFetcher> MeshLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(HashMap::new()),
            parses: AtomicUsize::new(0),
        }
    }

    /// Parsed scene for `descriptor`, from cache when available.
    pub async fn load(&self, descriptor: &AssetDescriptor) -> Result<Arc<SceneGraph>, LoadError> {
        let format = MeshFormat::from_path(&descriptor.path).ok_or_else(|| {
            LoadError::UnsupportedFormat {
                path: descriptor.path.clone(),
            }
        })?;

        if let Some(scene) = self.cached(descriptor) {
            log::debug!("Cache hit for {}", descriptor.path);
            return Ok(scene);
        }

        log::info!("Loading {} ({format:?})", descriptor.path);
        let bytes = self.fetcher.fetch(&descriptor.fetch_url).await?;
        let scene = match format {
            MeshFormat::Wavefront => {
                self.parses.fetch_add(1, Ordering::Relaxed);
                let name = descriptor.path.rsplit('/').next().unwrap_or(&descriptor.path);
                load_obj_scene(&bytes, name).map_err(|e| parse_failure(descriptor, e))?
            }
            MeshFormat::Gltf => self.load_gltf(descriptor, &bytes).await?,
        };
        let scene = Arc::new(scene);
        log::info!(
            "Loaded {}: {} surface(s)",
            descriptor.path,
            scene.surface_count()
        );

        self.cache
            .lock()
            .insert(descriptor.fetch_url.clone(), Arc::clone(&scene));
        Ok(scene)
    }

    pub fn cached(&self, descriptor: &AssetDescriptor) -> Option<Arc<SceneGraph>> {
        self.cache.lock().get(&descriptor.fetch_url).cloned()
    }

    /// Drop every cached parse result.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// How many times a parser has run.
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::Relaxed)
    }

    /// Parse a glTF document, fetching sibling buffer and image files next to it.
    async fn load_gltf(
        &self,
        descriptor: &AssetDescriptor,
        bytes: &[u8],
    ) -> Result<SceneGraph, LoadError> {
        self.parses.fetch_add(1, Ordering::Relaxed);
        let source = GltfSource::parse(bytes).map_err(|e| parse_failure(descriptor, e))?;

        let mut files = HashMap::new();
        for uri in source.buffer_uris() {
            let url = resolve_uri(&descriptor.fetch_url, &uri)
                .ok_or_else(|| LoadError::fetch(&uri, "cannot resolve relative to the asset"))?;
            files.insert(uri, self.fetcher.fetch(&url).await?);
        }
        for uri in source.image_uris() {
            let Some(url) = resolve_uri(&descriptor.fetch_url, &uri) else {
                log::warn!("Cannot resolve image '{uri}' for {}", descriptor.path);
                continue;
            };
            match self.fetcher.fetch(&url).await {
                Ok(image) => {
                    files.insert(uri, image);
                }
                Err(e) => log::warn!("{e}; drawing {} untextured", descriptor.path),
            }
        }

        source.import(&files).map_err(|e| parse_failure(descriptor, e))
    }
}

fn parse_failure(descriptor: &AssetDescriptor, e: anyhow::Error) -> LoadError {
    LoadError::ParseFailure {
        path: descriptor.path.clone(),
        reason: format!("{e:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gltf_import::tests::{
        check_triangle_scene, textured_gltf, triangle_bin, triangle_glb, triangle_gltf,
    };
    use crate::texture::tests::png;

    const TRIANGLE_OBJ: &[u8] = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    /// Serves fixed bytes per URL and counts requests.
    #[derive(Default)]
    struct MemoryFetcher {
        files: HashMap<String, Vec<u8>>,
        requests: AtomicUsize,
    }

    impl MemoryFetcher {
        fn with(mut self, url: &str, bytes: impl Into<Vec<u8>>) -> Self {
            self.files.insert(url.to_string(), bytes.into());
            self
        }

        fn requests(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    impl AssetFetcher for MemoryFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.files
                .get(url)
                .cloned()
                .ok_or_else(|| LoadError::fetch(url, "status 404 Not Found"))
        }
    }

    fn loader() -> MeshLoader<MemoryFetcher> {
        MeshLoader::new(
            MemoryFetcher::default()
                .with("mem://a.obj", TRIANGLE_OBJ)
                .with("mem://b.glb", triangle_glb())
                .with("mem://broken.gltf", "{ nope"),
        )
    }

    #[test]
    fn dispatches_by_extension() {
        let loader = loader();
        let obj = pollster::block_on(loader.load(&AssetDescriptor::new("A.OBJ", "mem://a.obj")));
        assert_eq!(obj.unwrap().format, MeshFormat::Wavefront);

        let glb = pollster::block_on(loader.load(&AssetDescriptor::new("b.glb", "mem://b.glb")));
        assert_eq!(glb.unwrap().format, MeshFormat::Gltf);
    }

    #[test]
    fn reselection_hits_the_cache() {
        let loader = loader();
        let a = AssetDescriptor::new("a.obj", "mem://a.obj");
        let b = AssetDescriptor::new("b.glb", "mem://b.glb");

        let first = pollster::block_on(loader.load(&a)).unwrap();
        pollster::block_on(loader.load(&b)).unwrap();
        let again = pollster::block_on(loader.load(&a)).unwrap();

        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(loader.parse_count(), 2);
        assert_eq!(loader.fetcher.requests(), 2);

        loader.clear();
        pollster::block_on(loader.load(&a)).unwrap();
        assert_eq!(loader.parse_count(), 3);
    }

    #[test]
    fn unsupported_extension_fails_before_fetching() {
        let loader = loader();
        let err = pollster::block_on(loader.load(&AssetDescriptor::new("m.fbx", "mem://m.fbx")))
            .unwrap_err();
        assert_eq!(
            err,
            LoadError::UnsupportedFormat {
                path: "m.fbx".to_string()
            }
        );
        assert_eq!(loader.fetcher.requests(), 0);
        assert_eq!(loader.parse_count(), 0);
    }

    #[test]
    fn fetch_and_parse_failures_are_not_cached() {
        let loader = loader();
        let missing = AssetDescriptor::new("gone.obj", "mem://gone.obj");
        let err = pollster::block_on(loader.load(&missing)).unwrap_err();
        assert!(matches!(err, LoadError::FetchFailure { .. }));

        let broken = AssetDescriptor::new("broken.gltf", "mem://broken.gltf");
        let err = pollster::block_on(loader.load(&broken)).unwrap_err();
        assert!(matches!(err, LoadError::ParseFailure { ref path, .. } if path == "broken.gltf"));
        assert!(loader.cached(&broken).is_none());
    }

    #[test]
    fn latin1_obj_loads() {
        let loader = MeshLoader::new(MemoryFetcher::default().with(
            "mem://a.obj",
            &b"# caf\xe9 export\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n"[..],
        ));
        let scene = pollster::block_on(loader.load(&AssetDescriptor::new("a.obj", "mem://a.obj")))
            .unwrap();
        assert_eq!(scene.surface_count(), 1);
    }

    #[test]
    fn gltf_sibling_buffer_is_fetched() {
        let loader = MeshLoader::new(
            MemoryFetcher::default()
                .with("mem://m/model.gltf", triangle_gltf(Some("model.bin")))
                .with("mem://m/model.bin", triangle_bin()),
        );
        let model = AssetDescriptor::new("m/model.gltf", "mem://m/model.gltf");
        let scene = pollster::block_on(loader.load(&model)).unwrap();
        check_triangle_scene(&scene);
        assert_eq!(loader.fetcher.requests(), 2);
        assert_eq!(loader.parse_count(), 1);
    }

    #[test]
    fn missing_sibling_buffer_is_a_fetch_failure() {
        let loader = MeshLoader::new(
            MemoryFetcher::default().with("mem://m/model.gltf", triangle_gltf(Some("model.bin"))),
        );
        let model = AssetDescriptor::new("m/model.gltf", "mem://m/model.gltf");
        let err = pollster::block_on(loader.load(&model)).unwrap_err();
        assert!(
            matches!(err, LoadError::FetchFailure { ref url, .. } if url == "mem://m/model.bin"),
            "{err}"
        );
        assert!(loader.cached(&model).is_none());
    }

    #[test]
    fn missing_sibling_image_only_drops_the_texture() {
        let textured = AssetDescriptor::new("t.gltf", "mem://t/t.gltf");
        let with_image = MeshLoader::new(
            MemoryFetcher::default()
                .with("mem://t/t.gltf", textured_gltf("img/albedo.png"))
                .with("mem://t/img/albedo.png", png(2, 1, [9, 9, 9, 255])),
        );
        let scene = pollster::block_on(with_image.load(&textured)).unwrap();
        assert_eq!(scene.textures.len(), 1);

        let without = MeshLoader::new(
            MemoryFetcher::default().with("mem://t/t.gltf", textured_gltf("img/albedo.png")),
        );
        let scene = pollster::block_on(without.load(&textured)).unwrap();
        assert!(scene.textures.is_empty());
        assert_eq!(without.fetcher.requests(), 2);
    }
}
