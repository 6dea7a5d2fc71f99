//! Asset loading/parsers: OBJ and glTF into a scene graph (with decoded base-colour
//! textures), plus the normalization pass and the caching loader that sits in front of them.

pub mod error;
pub mod fetch;
pub mod gltf_import;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod normalize;
pub mod obj;
pub mod scene;
pub mod texture;

pub use error::LoadError;
pub use fetch::{AssetFetcher, HttpFetcher};
pub use loader::MeshLoader;
pub use material::Material;
pub use mesh::{MeshData, MeshVertex};
pub use normalize::normalize;
pub use scene::{MeshFormat, SceneGraph, SceneNode, Surface};
pub use texture::TextureImage;
