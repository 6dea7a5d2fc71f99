//! glTF 2.0 importer (`.glb` and `.gltf`) producing a [`SceneGraph`].
//!
//! Geometry, materials and base-colour images are taken from the file. Cameras and
//! lights authored in the asset are skipped; the viewer keeps its own. Buffers and images
//! may be embedded (GLB binary chunk, `data:` URI, buffer view) or live in sibling files;
//! the caller fetches sibling files and hands them to [`GltfSource::import`].

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use corelib::{Quat, Transform, Vec3};
use gltf::mesh::Mode;

use crate::material::Material;
use crate::mesh::{MeshData, MeshVertex};
use crate::scene::{MeshFormat, SceneGraph, SceneNode, Surface};
use crate::texture::TextureImage;

/// Parse a self-contained glTF document (GLB container or JSON with `data:` buffers).
pub fn load_gltf_from_bytes(bytes: &[u8]) -> Result<SceneGraph> {
    GltfSource::parse(bytes)?.import(&HashMap::new())
}

/// Absolute URL of `uri` relative to the document at `base`.
pub fn resolve_uri(base: &str, uri: &str) -> Option<String> {
    let base = url::Url::parse(base).ok()?;
    base.join(uri).ok().map(String::from)
}

/// Parsed glTF JSON whose buffers and images are not loaded yet.
pub struct GltfSource {
    gltf: gltf::Gltf,
}

impl GltfSource {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let gltf = gltf::Gltf::from_slice(bytes).context("Failed to read glTF document")?;
        Ok(Self { gltf })
    }

    /// Buffer URIs that point at separate files. Geometry cannot be read without them.
    pub fn buffer_uris(&self) -> Vec<String> {
        let uris = self.gltf.document.buffers().filter_map(|buffer| match buffer.source() {
            gltf::buffer::Source::Uri(uri) => Some(uri),
            gltf::buffer::Source::Bin => None,
        });
        external(uris)
    }

    /// Image URIs that point at separate files. Missing images only lose their texture.
    pub fn image_uris(&self) -> Vec<String> {
        let uris = self.gltf.document.images().filter_map(|image| match image.source() {
            gltf::image::Source::Uri { uri, .. } => Some(uri),
            gltf::image::Source::View { .. } => None,
        });
        external(uris)
    }

    /// Build the scene. `files` maps the URIs listed by [`Self::buffer_uris`] and
    /// [`Self::image_uris`] to their contents.
    pub fn import(self, files: &HashMap<String, Vec<u8>>) -> Result<SceneGraph> {
        let gltf::Gltf { document, blob } = self.gltf;
        let buffers = load_buffers(&document, blob, files)?;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| anyhow!("glTF document has no scenes"))?;

        let mut importer = Importer {
            buffers: &buffers,
            files,
            materials: HashMap::new(),
            meshes: HashMap::new(),
            images: HashMap::new(),
            textures: Vec::new(),
            skipped_cameras: 0,
            skipped_lights: 0,
        };
        let roots = scene
            .nodes()
            .map(|node| importer.node(&node))
            .collect::<Result<Vec<_>>>()?;

        if importer.skipped_cameras > 0 || importer.skipped_lights > 0 {
            log::debug!(
                "Ignored {} embedded camera(s) and {} light(s)",
                importer.skipped_cameras,
                importer.skipped_lights
            );
        }

        let graph = SceneGraph::new(MeshFormat::Gltf, roots).with_textures(importer.textures);
        if graph.surface_count() == 0 {
            bail!("glTF scene contains no triangle meshes");
        }
        Ok(graph)
    }
}

fn external<'a>(uris: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = uris
        .filter(|uri| !uri.starts_with("data:"))
        .map(str::to_string)
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Payload of a base64 `data:` URI, or `None` if `uri` is not a data URI.
fn decode_data_uri(uri: &str) -> Result<Option<Vec<u8>>> {
    let Some(rest) = uri.strip_prefix("data:") else {
        return Ok(None);
    };
    let (media, payload) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("malformed data URI"))?;
    if !media.ends_with(";base64") {
        bail!("only base64 data URIs are supported");
    }
    let bytes = STANDARD.decode(payload).context("invalid base64 in data URI")?;
    Ok(Some(bytes))
}

fn uri_bytes(uri: &str, files: &HashMap<String, Vec<u8>>) -> Result<Vec<u8>> {
    if let Some(bytes) = decode_data_uri(uri)? {
        return Ok(bytes);
    }
    files
        .get(uri)
        .cloned()
        .ok_or_else(|| anyhow!("external file '{uri}' was not provided"))
}

fn load_buffers(
    document: &gltf::Document,
    mut blob: Option<Vec<u8>>,
    files: &HashMap<String, Vec<u8>>,
) -> Result<Vec<Vec<u8>>> {
    let mut buffers = Vec::new();
    for buffer in document.buffers() {
        let mut data = match buffer.source() {
            gltf::buffer::Source::Bin => blob
                .take()
                .ok_or_else(|| anyhow!("GLB binary chunk is missing"))?,
            gltf::buffer::Source::Uri(uri) => uri_bytes(uri, files)
                .with_context(|| format!("Failed to load buffer {}", buffer.index()))?,
        };
        if data.len() < buffer.length() {
            bail!(
                "buffer {} holds {} bytes, {} declared",
                buffer.index(),
                data.len(),
                buffer.length()
            );
        }
        while data.len() % 4 != 0 {
            data.push(0);
        }
        buffers.push(data);
    }
    Ok(buffers)
}

/// Triangle list for `indices` drawn with `mode`. Modes that are not triangles yield nothing.
fn triangulate(mode: Mode, mut indices: Vec<u32>) -> Vec<u32> {
    match mode {
        Mode::Triangles => {
            indices.truncate(indices.len() - indices.len() % 3);
            indices
        }
        // Every other strip triangle is flipped to keep a consistent winding.
        Mode::TriangleStrip => (0..indices.len().saturating_sub(2))
            .flat_map(|i| match i % 2 {
                0 => [indices[i], indices[i + 1], indices[i + 2]],
                _ => [indices[i + 1], indices[i], indices[i + 2]],
            })
            .collect(),
        Mode::TriangleFan => (1..indices.len().saturating_sub(1))
            .flat_map(|i| [indices[0], indices[i], indices[i + 1]])
            .collect(),
        _ => Vec::new(),
    }
}

fn draws_triangles(mode: Mode) -> bool {
    matches!(mode, Mode::Triangles | Mode::TriangleStrip | Mode::TriangleFan)
}

struct Importer<'a> {
    buffers: &'a [Vec<u8>],
    files: &'a HashMap<String, Vec<u8>>,
    /// Keyed by material index; `None` is the glTF default material.
    materials: HashMap<Option<usize>, Arc<Material>>,
    /// Surfaces per mesh index, so instanced meshes share geometry and materials.
    meshes: HashMap<usize, Vec<Surface>>,
    /// glTF image index to slot in `textures`; `None` if it failed to load.
    images: HashMap<usize, Option<usize>>,
    textures: Vec<Arc<TextureImage>>,
    skipped_cameras: usize,
    skipped_lights: usize,
}

impl Importer<'_> {
    fn node(&mut self, node: &gltf::Node<'_>) -> Result<SceneNode> {
        let (translation, rotation, scale) = node.transform().decomposed();
        if node.camera().is_some() {
            self.skipped_cameras += 1;
        }
        if node.light().is_some() {
            self.skipped_lights += 1;
        }

        let surfaces = match node.mesh() {
            Some(mesh) => self.mesh(&mesh)?,
            None => Vec::new(),
        };
        let children = node
            .children()
            .map(|child| self.node(&child))
            .collect::<Result<Vec<_>>>()?;

        Ok(SceneNode {
            name: node.name().map(str::to_string),
            transform: Transform::from_trs(
                Vec3::from(translation),
                Quat::from_array(rotation),
                Vec3::from(scale),
            ),
            surfaces,
            children,
        })
    }

    fn mesh(&mut self, mesh: &gltf::Mesh<'_>) -> Result<Vec<Surface>> {
        if let Some(surfaces) = self.meshes.get(&mesh.index()) {
            return Ok(surfaces.clone());
        }

        let mut surfaces = Vec::new();
        for primitive in mesh.primitives() {
            if !draws_triangles(primitive.mode()) {
                log::warn!(
                    "Skipping {:?} primitive in mesh {:?}",
                    primitive.mode(),
                    mesh.name()
                );
                continue;
            }
            let geometry = self.primitive(&primitive).with_context(|| {
                format!("Failed to read primitive {} of mesh {:?}", primitive.index(), mesh.name())
            })?;
            let material = self.material(&primitive.material());
            surfaces.push(Surface::new(Arc::new(geometry), material));
        }

        self.meshes.insert(mesh.index(), surfaces.clone());
        Ok(surfaces)
    }

    fn primitive(&self, primitive: &gltf::Primitive<'_>) -> Result<MeshData> {
        let reader = primitive.reader(|buffer| self.buffers.get(buffer.index()).map(Vec::as_slice));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .ok_or_else(|| anyhow!("primitive has no POSITION attribute"))?
            .collect();
        let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(Iterator::collect);
        let uvs: Option<Vec<[f32; 2]>> = reader
            .read_tex_coords(0)
            .map(|tc| tc.into_f32().collect());

        let count = u32::try_from(positions.len())
            .map_err(|_| anyhow!("{} vertices exceed the index range", positions.len()))?;
        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..count).collect(),
        };
        let indices = triangulate(primitive.mode(), indices);
        if let Some(bad) = indices.iter().find(|&&i| i >= count) {
            bail!("index {bad} out of bounds (vertices={count})");
        }

        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, position)| {
                let normal = normals
                    .as_ref()
                    .and_then(|n| n.get(i).copied())
                    .unwrap_or([0.0, 1.0, 0.0]);
                let uv = uvs.as_ref().and_then(|t| t.get(i).copied()).unwrap_or([0.0, 0.0]);
                MeshVertex::new(*position, normal, uv)
            })
            .collect();

        let mut data = MeshData::new(vertices, indices);
        if !data.is_valid() {
            bail!("primitive has no triangles");
        }
        if normals.is_none() {
            data.recompute_normals();
        }
        Ok(data)
    }

    fn material(&mut self, material: &gltf::Material<'_>) -> Arc<Material> {
        if let Some(existing) = self.materials.get(&material.index()) {
            return Arc::clone(existing);
        }
        let pbr = material.pbr_metallic_roughness();
        let texture = pbr.base_color_texture().and_then(|info| {
            if info.tex_coord() != 0 {
                log::debug!("Ignoring base colour texture on TEXCOORD_{}", info.tex_coord());
                return None;
            }
            self.image(&info.texture().source())
        });
        let converted = Arc::new(Material {
            name: material.name().map(str::to_string),
            base_color: pbr.base_color_factor(),
            metalness: pbr.metallic_factor(),
            roughness: pbr.roughness_factor(),
            emissive: material.emissive_factor(),
            base_color_texture: texture,
            double_sided: material.double_sided(),
            wireframe: false,
        });
        self.materials.insert(material.index(), Arc::clone(&converted));
        converted
    }

    /// Slot of the decoded image in `textures`. Failures drop the texture, not the asset.
    fn image(&mut self, image: &gltf::Image<'_>) -> Option<usize> {
        if let Some(slot) = self.images.get(&image.index()) {
            return *slot;
        }
        let decoded = self.image_bytes(image).and_then(|bytes| TextureImage::decode(&bytes));
        let slot = match decoded {
            Ok(texture) => {
                self.textures.push(Arc::new(texture));
                Some(self.textures.len() - 1)
            }
            Err(e) => {
                log::warn!("Skipping image {} ({:?}): {e:#}", image.index(), image.name());
                None
            }
        };
        self.images.insert(image.index(), slot);
        slot
    }

    fn image_bytes(&self, image: &gltf::Image<'_>) -> Result<Vec<u8>> {
        match image.source() {
            gltf::image::Source::Uri { uri, .. } => uri_bytes(uri, self.files),
            gltf::image::Source::View { view, .. } => {
                let buffer = self
                    .buffers
                    .get(view.buffer().index())
                    .ok_or_else(|| anyhow!("image buffer {} missing", view.buffer().index()))?;
                buffer
                    .get(view.offset()..view.offset() + view.length())
                    .map(<[u8]>::to_vec)
                    .ok_or_else(|| anyhow!("image buffer view out of range"))
            }
        }
    }
}
