//! Flattening of a normalized scene graph into GPU-ready buffers.
//!
//! Surfaces are baked into world space with their material folded into the vertices, so
//! the whole model draws with one vertex buffer and a few index lists: triangles for solid
//! surfaces (grouped by base-colour texture), edge pairs for wireframe ones and the
//! triangles of shadow-casting surfaces for the light pass.

use std::collections::BTreeMap;
use std::ops::Range;

use asset::{Material, SceneGraph};
use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};
use wgpu::{VertexBufferLayout, VertexStepMode};

/// Mesh vertex as seen by `shaders/mesh.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
    pub emissive: [f32; 3],
    /// Metalness, roughness, receives shadows (0/1), double sided (0/1).
    pub surface: [f32; 4],
}

impl GpuVertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<GpuVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x2,
            3 => Float32x4,
            4 => Float32x3,
            5 => Float32x4
        ],
    };
}

/// Run of `solid_indices` sampling one base-colour texture (`None` draws untextured).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexBatch {
    pub texture: Option<usize>,
    pub range: Range<u32>,
}

#[derive(Clone, Debug, Default)]
pub struct SceneMesh {
    pub vertices: Vec<GpuVertex>,
    /// Triangle list for surfaces drawn solid, ordered by `batches`.
    pub solid_indices: Vec<u32>,
    pub batches: Vec<IndexBatch>,
    /// Line list (three edges per triangle) for surfaces drawn as wireframe.
    pub wire_indices: Vec<u32>,
    /// Solid triangles of shadow-casting surfaces.
    pub shadow_indices: Vec<u32>,
    /// World-space bounds after framing.
    pub bounds: Option<(Vec3, Vec3)>,
}

impl SceneMesh {
    pub fn is_empty(&self) -> bool {
        self.solid_indices.is_empty() && self.wire_indices.is_empty()
    }
}

/// Translation that centres `bounds` on x/z and rests its bottom on y = 0.
pub fn framing_offset(bounds: Option<(Vec3, Vec3)>) -> Vec3 {
    match bounds {
        Some((min, max)) => {
            let center = (min + max) * 0.5;
            Vec3::new(-center.x, -min.y, -center.z)
        }
        None => Vec3::ZERO,
    }
}

/// First index of `added` vertices appended after `existing` ones, if all of them stay
/// addressable with `u32` indices.
fn vertex_base(existing: usize, added: usize) -> Option<u32> {
    u32::try_from(existing.checked_add(added)?).ok()?;
    u32::try_from(existing).ok()
}

fn flag(on: bool) -> f32 {
    if on { 1.0 } else { 0.0 }
}

pub fn build_scene_mesh(scene: &SceneGraph) -> SceneMesh {
    let offset = Mat4::from_translation(framing_offset(scene.bounds()));
    let mut mesh = SceneMesh::default();
    let mut solid: BTreeMap<Option<usize>, Vec<u32>> = BTreeMap::new();

    scene.for_each_surface(|world, surface| {
        let geometry = &surface.geometry;
        if !geometry.is_valid() {
            return;
        }
        let Some(base) = vertex_base(mesh.vertices.len(), geometry.vertices.len()) else {
            log::warn!(
                "Skipping surface with {} vertices: scene exceeds the u32 index range",
                geometry.vertices.len()
            );
            return;
        };
        let world = offset * world;
        let normal_matrix = normal_matrix(world);
        let material: &Material = &surface.material;
        let texture = material
            .base_color_texture
            .filter(|&t| t < scene.textures.len());

        mesh.vertices.extend(geometry.vertices.iter().map(|v| {
            let pos = world.transform_point3(Vec3::from(v.position));
            let normal = (normal_matrix * Vec3::from(v.normal))
                .try_normalize()
                .unwrap_or(Vec3::Y);
            GpuVertex {
                pos: pos.to_array(),
                normal: normal.to_array(),
                uv: v.uv,
                color: material.base_color,
                emissive: material.emissive,
                surface: [
                    material.metalness,
                    material.roughness,
                    flag(surface.receive_shadow),
                    flag(material.double_sided),
                ],
            }
        }));

        let vertex_count = geometry.vertices.len();
        for tri in geometry.indices.chunks_exact(3) {
            if tri.iter().any(|&i| i as usize >= vertex_count) {
                continue;
            }
            let [a, b, c] = [base + tri[0], base + tri[1], base + tri[2]];
            if material.wireframe {
                mesh.wire_indices.extend_from_slice(&[a, b, b, c, c, a]);
                continue;
            }
            solid.entry(texture).or_default().extend_from_slice(&[a, b, c]);
            if surface.cast_shadow {
                mesh.shadow_indices.extend_from_slice(&[a, b, c]);
            }
        }
    });

    for (texture, indices) in solid {
        let start = mesh.solid_indices.len() as u32;
        mesh.solid_indices.extend(indices);
        mesh.batches.push(IndexBatch {
            texture,
            range: start..mesh.solid_indices.len() as u32,
        });
    }

    mesh.bounds = mesh.vertices.iter().fold(None, |acc, v| {
        let p = Vec3::from(v.pos);
        Some(match acc {
            Some((min, max)) => (p.min(min), p.max(max)),
            None => (p, p),
        })
    });
    log::debug!(
        "Scene mesh: {} vertices, {} solid ({} batch(es)) / {} wire / {} shadow indices",
        mesh.vertices.len(),
        mesh.solid_indices.len(),
        mesh.batches.len(),
        mesh.wire_indices.len(),
        mesh.shadow_indices.len()
    );
    mesh
}

/// Inverse-transpose of the upper 3x3; identity for degenerate transforms.
fn normal_matrix(world: Mat4) -> Mat3 {
    let m = Mat3::from_mat4(world);
    if m.determinant().abs() <= f32::EPSILON {
        Mat3::IDENTITY
    } else {
        m.inverse().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset::{MeshData, MeshFormat, MeshVertex, SceneNode, Surface, TextureImage, normalize};
    use corelib::{Quat, Transform};
    use std::sync::Arc;

    fn quad() -> Arc<MeshData> {
        let v = |x: f32, y: f32| MeshVertex::new([x, y, 0.0], [0.0, 0.0, 1.0], [x / 2.0, y / 2.0]);
        Arc::new(MeshData::new(
            vec![v(0.0, 0.0), v(2.0, 0.0), v(2.0, 2.0), v(0.0, 2.0)],
            vec![0, 1, 2, 0, 2, 3],
        ))
    }

    fn quad_scene(translation: Vec3) -> SceneGraph {
        let node = SceneNode {
            transform: Transform::from_trs(translation, Quat::IDENTITY, Vec3::ONE),
            surfaces: vec![Surface::new(quad(), Arc::new(Material::default()))],
            ..SceneNode::default()
        };
        SceneGraph::new(MeshFormat::Wavefront, vec![node])
    }

    /// Two quads: the first samples texture 0, the second is untextured.
    fn textured_scene() -> SceneGraph {
        let textured = Material {
            base_color_texture: Some(0),
            double_sided: true,
            ..Material::default()
        };
        let node = SceneNode {
            surfaces: vec![
                Surface::new(quad(), Arc::new(Material::default())),
                Surface::new(quad(), Arc::new(textured)),
            ],
            ..SceneNode::default()
        };
        SceneGraph::new(MeshFormat::Gltf, vec![node])
            .with_textures(vec![Arc::new(TextureImage::solid([255; 4]))])
    }

    #[test]
    fn model_is_centred_and_rests_on_the_floor() {
        let mesh = build_scene_mesh(&quad_scene(Vec3::new(10.0, 5.0, -3.0)));
        let (min, max) = mesh.bounds.unwrap();
        assert!(min.y.abs() < 1e-5);
        assert!((max.y - 2.0).abs() < 1e-5);
        assert!((min.x + max.x).abs() < 1e-5);
        assert!((min.z + max.z).abs() < 1e-5);
    }

    #[test]
    fn wireframe_surfaces_become_edge_lists() {
        let raw = quad_scene(Vec3::ZERO);
        let solid = build_scene_mesh(&normalize(&raw, false));
        assert_eq!(solid.solid_indices.len(), 6);
        assert!(solid.wire_indices.is_empty());

        let wire = build_scene_mesh(&normalize(&raw, true));
        assert!(wire.solid_indices.is_empty());
        assert!(wire.batches.is_empty());
        assert_eq!(wire.wire_indices.len(), 12);
        assert_eq!(&wire.wire_indices[..6], &[0, 1, 1, 2, 2, 0]);
    }

    #[test]
    fn material_and_shadow_flags_are_baked_into_vertices() {
        let mesh = build_scene_mesh(&normalize(&quad_scene(Vec3::ZERO), false));
        let neutral = Material::neutral(false);
        assert!(mesh.vertices.iter().all(|v| v.color == neutral.base_color));
        assert!(mesh.vertices.iter().all(|v| v.surface == [0.6, 0.4, 1.0, 0.0]));
        assert_eq!(mesh.vertices[2].uv, [1.0, 1.0]);

        // Parsed surfaces have not been through normalization and receive nothing.
        let raw = build_scene_mesh(&quad_scene(Vec3::ZERO));
        assert!(raw.vertices.iter().all(|v| v.surface[2] == 0.0));
    }

    #[test]
    fn only_casting_surfaces_reach_the_shadow_pass() {
        let raw = quad_scene(Vec3::ZERO);
        assert!(build_scene_mesh(&raw).shadow_indices.is_empty());

        let lit = build_scene_mesh(&normalize(&raw, false));
        assert_eq!(lit.shadow_indices, lit.solid_indices);
        assert!(build_scene_mesh(&normalize(&raw, true)).shadow_indices.is_empty());
    }

    #[test]
    fn solid_triangles_are_batched_by_texture() {
        let mesh = build_scene_mesh(&normalize(&textured_scene(), false));
        assert_eq!(
            mesh.batches,
            vec![
                IndexBatch { texture: None, range: 0..6 },
                IndexBatch { texture: Some(0), range: 6..12 },
            ]
        );
        // The textured quad is the second surface, so its vertices start at 4.
        assert!(mesh.solid_indices[6..].iter().all(|&i| i >= 4));
        assert_eq!(mesh.vertices[4].surface[3], 1.0);
        assert_eq!(mesh.vertices[0].surface[3], 0.0);
    }

    #[test]
    fn dangling_texture_index_draws_untextured() {
        let mut scene = textured_scene();
        scene.textures.clear();
        let mesh = build_scene_mesh(&scene);
        assert_eq!(mesh.batches, vec![IndexBatch { texture: None, range: 0..12 }]);
    }

    #[test]
    fn out_of_range_triangles_are_skipped() {
        let mesh = MeshData::new(vec![MeshVertex::default(); 3], vec![0, 1, 2, 0, 1, 9]);
        let node = SceneNode {
            surfaces: vec![Surface::new(Arc::new(mesh), Arc::new(Material::default()))],
            ..SceneNode::default()
        };
        let scene = build_scene_mesh(&SceneGraph::new(MeshFormat::Gltf, vec![node]));
        assert_eq!(scene.solid_indices, vec![0, 1, 2]);
    }

    #[test]
    fn vertex_base_stays_in_u32_range() {
        assert_eq!(vertex_base(10, 5), Some(10));
        assert_eq!(vertex_base(u32::MAX as usize - 3, 3), Some(u32::MAX - 3));
        assert_eq!(vertex_base(u32::MAX as usize - 2, 3), None);
        assert_eq!(vertex_base(usize::MAX, 1), None);
    }

    #[test]
    fn empty_scene_has_no_framing() {
        let scene = SceneGraph::new(MeshFormat::Gltf, Vec::new());
        let mesh = build_scene_mesh(&scene);
        assert!(mesh.is_empty());
        assert_eq!(mesh.bounds, None);
        assert_eq!(framing_offset(None), Vec3::ZERO);
    }
}
