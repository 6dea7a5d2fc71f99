//! Scene graph produced by the mesh parsers.

use std::sync::Arc;

use corelib::{Mat4, Transform, Vec3};

use crate::material::Material;
use crate::mesh::MeshData;
use crate::texture::TextureImage;

/// Parser family, chosen from the file extension alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// Wavefront `.obj`.
    Wavefront,
    /// glTF 2.0, binary `.glb` or JSON `.gltf`.
    Gltf,
}

impl MeshFormat {
    /// Case-insensitive match on the path suffix.
    pub fn from_path(path: &str) -> Option<Self> {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".obj") {
            Some(Self::Wavefront)
        } else if lower.ends_with(".glb") || lower.ends_with(".gltf") {
            Some(Self::Gltf)
        } else {
            None
        }
    }
}

/// One drawable piece of geometry with its material and shadow flags.
#[derive(Clone, Debug)]
pub struct Surface {
    pub geometry: Arc<MeshData>,
    pub material: Arc<Material>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Surface {
    pub fn new(geometry: Arc<MeshData>, material: Arc<Material>) -> Self {
        Self {
            geometry,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SceneNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub surfaces: Vec<Surface>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    fn visit<'a>(&'a self, parent: Mat4, f: &mut impl FnMut(Mat4, &'a Surface)) {
        let world = parent * self.transform.matrix();
        for surface in &self.surfaces {
            f(world, surface);
        }
        for child in &self.children {
            child.visit(world, f);
        }
    }
}

/// Parsed asset: a forest of nodes plus the format it came from.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    pub format: MeshFormat,
    pub roots: Vec<SceneNode>,
    /// Images referenced by [`Material::base_color_texture`].
    pub textures: Vec<Arc<TextureImage>>,
}

impl SceneGraph {
    pub fn new(format: MeshFormat, roots: Vec<SceneNode>) -> Self {
        Self {
            format,
            roots,
            textures: Vec::new(),
        }
    }

    pub fn with_textures(mut self, textures: Vec<Arc<TextureImage>>) -> Self {
        self.textures = textures;
        self
    }

    /// Call `f` with the world matrix of every surface, depth-first.
    pub fn for_each_surface<'a>(&'a self, mut f: impl FnMut(Mat4, &'a Surface)) {
        for root in &self.roots {
            root.visit(Mat4::IDENTITY, &mut f);
        }
    }

    pub fn surface_count(&self) -> usize {
        let mut count = 0;
        self.for_each_surface(|_, _| count += 1);
        count
    }

    /// World-space axis-aligned bounds of all geometry.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut acc: Option<(Vec3, Vec3)> = None;
        self.for_each_surface(|world, surface| {
            if let Some((min, max)) = surface.geometry.bounds(world) {
                acc = Some(match acc {
                    Some((amin, amax)) => (amin.min(min), amax.max(max)),
                    None => (min, max),
                });
            }
        });
        acc
    }
}
