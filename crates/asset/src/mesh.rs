//! CPU-side mesh representation used by loaders.

use corelib::{Mat4, Vec3};

/// Vertex with position/normal/uv. Values are in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle mesh with tightly-packed vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Replace every normal with the area-weighted average of its adjacent faces.
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if a >= accum.len() || b >= accum.len() || c >= accum.len() {
                continue;
            }
            let pa = Vec3::from(self.vertices[a].position);
            let pb = Vec3::from(self.vertices[b].position);
            let pc = Vec3::from(self.vertices[c].position);
            let face = (pb - pa).cross(pc - pa);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }
        for (vertex, n) in self.vertices.iter_mut().zip(accum) {
            vertex.normal = n.try_normalize().unwrap_or(Vec3::Y).to_array();
        }
    }

    /// Axis-aligned bounds of the positions after applying `transform`.
    pub fn bounds(&self, transform: Mat4) -> Option<(Vec3, Vec3)> {
        let mut points = self
            .vertices
            .iter()
            .map(|v| transform.transform_point3(Vec3::from(v.position)));
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_data_validity() {
        let data = MeshData::new(vec![MeshVertex::default()], vec![0]);
        assert!(data.is_valid());
        assert!(!MeshData::default().is_valid());
    }

    #[test]
    fn recomputed_normals_face_the_winding() {
        let mut data = MeshData::new(
            vec![
                MeshVertex::new([0.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
                MeshVertex::new([1.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
                MeshVertex::new([0.0, 1.0, 0.0], [0.0; 3], [0.0; 2]),
            ],
            vec![0, 1, 2],
        );
        data.recompute_normals();
        for v in &data.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn bounds_follow_transform() {
        let data = MeshData::new(
            vec![
                MeshVertex::new([-1.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
                MeshVertex::new([1.0, 2.0, 3.0], [0.0; 3], [0.0; 2]),
            ],
            vec![0, 1, 0],
        );
        let (min, max) = data
            .bounds(Mat4::from_translation(Vec3::new(0.0, 10.0, 0.0)))
            .unwrap();
        assert_eq!(min, Vec3::new(-1.0, 10.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, 12.0, 3.0));
        assert!(MeshData::default().bounds(Mat4::IDENTITY).is_none());
    }
}
