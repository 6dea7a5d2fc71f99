//! Wavefront OBJ reader: positions, texture coordinates, normals and polygon faces.
//!
//! The file is decoded leniently: bytes that are not UTF-8 (exporter comments and group
//! names in Latin-1 are common) become replacement characters instead of failing the
//! load. Groups, objects and material libraries are ignored, so the whole file becomes
//! one mesh on one node.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};

use crate::material::Material;
use crate::mesh::{MeshData, MeshVertex};
use crate::scene::{MeshFormat, SceneGraph, SceneNode, Surface};

/// Parse an OBJ file into a single-node scene. The material is a placeholder that the
/// normalizer replaces.
pub fn load_obj_scene(bytes: &[u8], name: &str) -> Result<SceneGraph> {
    let mesh = load_obj_from_bytes(bytes)?;
    log::debug!(
        "OBJ {name}: {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    let node = SceneNode {
        name: Some(name.to_string()),
        surfaces: vec![Surface::new(Arc::new(mesh), Arc::new(Material::default()))],
        ..SceneNode::default()
    };
    Ok(SceneGraph::new(MeshFormat::Wavefront, vec![node]))
}

pub fn load_obj_from_bytes(bytes: &[u8]) -> Result<MeshData> {
    load_obj_from_str(&String::from_utf8_lossy(bytes))
}

pub fn load_obj_from_str(contents: &str) -> Result<MeshData> {
    let mut parser = ObjParser::default();
    for (i, line) in contents.lines().enumerate() {
        parser
            .line(line)
            .with_context(|| format!("OBJ line {}: '{}'", i + 1, line.trim()))?;
    }
    parser.finish()
}

/// Corner of a face: position, texcoord and normal slots, all zero-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Corner {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

#[derive(Default)]
struct ObjParser {
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    /// Each distinct corner becomes one output vertex.
    corners: HashMap<Corner, u32>,
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

impl ObjParser {
    fn line(&mut self, line: &str) -> Result<()> {
        let line = line.split('#').next().unwrap_or_default();
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(());
        };
        match keyword {
            // Extra components (vertex colours, w) are ignored.
            "v" => self.positions.push(floats::<3>(&mut tokens, 3)?),
            "vn" => self.normals.push(floats::<3>(&mut tokens, 3)?),
            // `v` is optional for 1D texture coordinates.
            "vt" => self.uvs.push(floats::<2>(&mut tokens, 1)?),
            "f" => self.face(tokens)?,
            _ => {}
        }
        Ok(())
    }

    fn face<'a>(&mut self, tokens: impl Iterator<Item = &'a str>) -> Result<()> {
        let polygon = tokens
            .map(|token| self.corner(token))
            .collect::<Result<Vec<u32>>>()?;
        if polygon.len() < 3 {
            log::debug!("Skipping face with {} corner(s)", polygon.len());
            return Ok(());
        }
        for pair in polygon[1..].windows(2) {
            self.indices.extend_from_slice(&[polygon[0], pair[0], pair[1]]);
        }
        Ok(())
    }

    /// Output vertex index for a `p`, `p/t`, `p//n` or `p/t/n` token.
    fn corner(&mut self, token: &str) -> Result<u32> {
        let mut slots = token.split('/');
        let position = slot(slots.next(), self.positions.len())?
            .ok_or_else(|| anyhow!("face corner '{token}' has no position"))?;
        let corner = Corner {
            position,
            uv: slot(slots.next(), self.uvs.len())?,
            normal: slot(slots.next(), self.normals.len())?,
        };
        if let Some(&index) = self.corners.get(&corner) {
            return Ok(index);
        }

        let index = u32::try_from(self.vertices.len())
            .map_err(|_| anyhow!("more than {} vertices", u32::MAX))?;
        self.vertices.push(MeshVertex::new(
            self.positions[corner.position],
            corner.normal.map_or([0.0, 0.0, 1.0], |n| self.normals[n]),
            corner.uv.map_or([0.0, 0.0], |t| self.uvs[t]),
        ));
        self.corners.insert(corner, index);
        Ok(index)
    }

    fn finish(self) -> Result<MeshData> {
        if self.indices.is_empty() {
            bail!("OBJ contained no faces");
        }
        let has_normals = !self.normals.is_empty();
        let mut mesh = MeshData::new(self.vertices, self.indices);
        if !has_normals {
            mesh.recompute_normals();
        }
        Ok(mesh)
    }
}

/// First `N` numbers of a directive; at least `required` must be present, the rest
/// default to zero.
fn floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
    required: usize,
) -> Result<[f32; N]> {
    let mut out = [0.0; N];
    for (i, value) in out.iter_mut().enumerate() {
        match tokens.next() {
            Some(token) => {
                *value = token
                    .parse()
                    .with_context(|| format!("'{token}' is not a number"))?
            }
            None if i < required => bail!("expected {required} numbers, found {i}"),
            None => break,
        }
    }
    Ok(out)
}

/// Resolve a 1-based (or negative, relative to the end) reference into `0..len`.
/// Empty slots, as in `p//n`, are `None`.
fn slot(token: Option<&str>, len: usize) -> Result<Option<usize>> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let raw: i64 = token
        .parse()
        .with_context(|| format!("'{token}' is not an index"))?;
    let resolved = match raw {
        0 => bail!("OBJ indices start at 1"),
        r if r > 0 => r - 1,
        r => len as i64 + r,
    };
    if resolved < 0 || resolved >= len as i64 {
        bail!("index {raw} out of range ({len} defined so far)");
    }
    Ok(Some(resolved as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn shared_corners_are_deduplicated() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
f 3/3/1 2/2/1 1/1/1
";
        let mesh = load_obj_from_str(src).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2, 2, 1, 0]);
        assert_eq!(mesh.vertices[1].uv, [1.0, 0.0]);
    }

    #[test]
    fn polygons_are_fanned_and_normals_generated() {
        let src = b"o quad\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nusemtl none\nf 1 2 3 4\n";
        let mesh = load_obj_from_bytes(src).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn non_utf8_bytes_are_tolerated() {
        let src = b"# caf\xe9 export\ng pi\xe8ce\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = load_obj_from_bytes(src).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn lenient_syntax() {
        // CRLF endings, trailing comments, vertex colours, 1D texcoords, `p//n` corners.
        let src = "v 0 0 0 1 0 0\r\nv 1 0 0 # corner\r\nv 0 1 0\r\nvt 0.5\r\nvn 0 0 1\r\nf 1/1 2//1 -1\r\n";
        let mesh = load_obj_from_str(src).unwrap();
        assert_eq!(mesh.vertices[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[0].uv, [0.5, 0.0]);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn degenerate_faces_are_skipped() {
        let src = format!("{TRIANGLE}f 1 2\n");
        assert_eq!(load_obj_from_str(&src).unwrap().triangle_count(), 1);
    }

    #[test]
    fn errors_name_the_line() {
        let err = load_obj_from_str("v 0 0 0\nv 1 x 0\n").unwrap_err();
        assert!(format!("{err:#}").contains("OBJ line 2"), "{err:#}");

        let err = load_obj_from_str("v 0 0 0\nf 1 2 3\n").unwrap_err();
        assert!(format!("{err:#}").contains("out of range"), "{err:#}");

        assert!(load_obj_from_str("f 0 1 2\n").is_err());
        assert!(load_obj_from_str("# only a comment\nv 0 0 0\n").is_err());
    }

    #[test]
    fn scene_is_one_named_wavefront_node() {
        let scene = load_obj_scene(TRIANGLE.as_bytes(), "tri.obj").unwrap();
        assert_eq!(scene.format, MeshFormat::Wavefront);
        assert_eq!(scene.roots.len(), 1);
        assert_eq!(scene.roots[0].name.as_deref(), Some("tri.obj"));
        assert_eq!(scene.surface_count(), 1);
        assert!(scene.textures.is_empty());
    }
}
