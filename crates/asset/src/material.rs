//! Surface materials (metallic-roughness).

/// Metallic-roughness material. Colours are linear RGB(A).
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    pub base_color: [f32; 4],
    pub metalness: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],
    /// Index into the owning scene's `textures`.
    pub base_color_texture: Option<usize>,
    pub double_sided: bool,
    pub wireframe: bool,
}

impl Material {
    /// Light-gray, moderately metallic look given to meshes that carry no usable material.
    pub fn neutral(wireframe: bool) -> Self {
        Self {
            name: Some("neutral".to_string()),
            base_color: srgb_hex(0xcccccc),
            metalness: 0.6,
            roughness: 0.4,
            wireframe,
            ..Self::default()
        }
    }

    /// Copy of `self` with only the wireframe flag changed.
    pub fn with_wireframe(&self, wireframe: bool) -> Self {
        Self {
            wireframe,
            ..self.clone()
        }
    }
}

impl Default for Material {
    /// glTF default material: white, fully metallic, fully rough.
    fn default() -> Self {
        Self {
            name: None,
            base_color: [1.0, 1.0, 1.0, 1.0],
            metalness: 1.0,
            roughness: 1.0,
            emissive: [0.0, 0.0, 0.0],
            base_color_texture: None,
            double_sided: false,
            wireframe: false,
        }
    }
}

/// `0xRRGGBB` in sRGB to linear RGBA.
fn srgb_hex(hex: u32) -> [f32; 4] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0), 1.0]
}
