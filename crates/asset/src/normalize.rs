//! Post-parse pass giving every format the same shadow and material behaviour.
//!
//! The input is the cached parse result and is only read. Every call returns a fresh
//! graph whose materials are new allocations, so a wireframe change on one normalized
//! instance can never leak into the cache or into another instance.

use std::sync::Arc;

use crate::material::Material;
use crate::scene::{MeshFormat, SceneGraph, SceneNode, Surface};

/// Render-ready copy of `raw` with shadows enabled and the wireframe flag applied.
pub fn normalize(raw: &SceneGraph, wireframe: bool) -> SceneGraph {
    let roots = raw
        .roots
        .iter()
        .map(|node| normalize_node(node, raw.format, wireframe))
        .collect();
    SceneGraph::new(raw.format, roots).with_textures(raw.textures.clone())
}

fn normalize_node(node: &SceneNode, format: MeshFormat, wireframe: bool) -> SceneNode {
    SceneNode {
        name: node.name.clone(),
        transform: node.transform,
        surfaces: node
            .surfaces
            .iter()
            .map(|surface| normalize_surface(surface, format, wireframe))
            .collect(),
        children: node
            .children
            .iter()
            .map(|child| normalize_node(child, format, wireframe))
            .collect(),
    }
}

fn normalize_surface(surface: &Surface, format: MeshFormat, wireframe: bool) -> Surface {
    let material = match format {
        // OBJ files carry no usable material.
        MeshFormat::Wavefront => Material::neutral(wireframe),
        MeshFormat::Gltf => surface.material.with_wireframe(wireframe),
    };
    Surface {
        geometry: Arc::clone(&surface.geometry),
        material: Arc::new(material),
        cast_shadow: true,
        receive_shadow: true,
    }
}
