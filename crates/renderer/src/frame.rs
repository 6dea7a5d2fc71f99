//! Per-frame inputs and the uniform block built from them.

use bytemuck::{Pod, Zeroable};
use corelib::{Camera, CameraPose};
use glam::{Mat4, Vec3};
use viewer::{EnvironmentPreset, Lighting};

/// Everything the renderer needs from the view session for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameView {
    pub camera: CameraPose,
    pub show_grid: bool,
    pub environment: EnvironmentPreset,
}

impl Default for FrameView {
    fn default() -> Self {
        Self {
            camera: CameraPose::DEFAULT,
            show_grid: true,
            environment: EnvironmentPreset::default(),
        }
    }
}

/// Key light direction (towards the light), fixed above and in front of the model.
const KEY_LIGHT_DIR: Vec3 = Vec3::new(0.4, 1.0, 0.6);

/// Side of the square shadow map, in texels.
pub const SHADOW_MAP_SIZE: u32 = 2048;
/// Depth offset (light clip space) subtracted before the shadow comparison.
const SHADOW_BIAS: f32 = 0.002;
/// Darkness of the contact shadow on the floor where the model fully blocks the light.
const GROUND_SHADOW_OPACITY: f32 = 0.45;

/// Uniform block of `shaders/mesh.wgsl` (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    /// World to key-light clip space, used by the shadow pass and the lookups into it.
    pub light_view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub light_dir: [f32; 4],
    /// Key light rgb pre-multiplied by intensity.
    pub key: [f32; 4],
    /// Ambient rgb pre-multiplied by intensity.
    pub ambient: [f32; 4],
    /// Shadow texel size, depth bias, floor half extent, floor shadow opacity.
    pub shadow: [f32; 4],
}

impl Globals {
    /// `bounds` are the framed model bounds; the shadow frustum is fitted to them.
    pub fn new(view: &FrameView, aspect: f32, bounds: Option<(Vec3, Vec3)>) -> Self {
        let camera = Camera::from_pose(&view.camera, aspect);
        let Lighting {
            ambient,
            ambient_intensity,
            key_color,
            key_intensity,
            ..
        } = view.environment.lighting();
        Self {
            view_proj: camera.proj_view().to_cols_array_2d(),
            light_view_proj: light_view_proj(bounds).to_cols_array_2d(),
            camera_pos: camera.eye.extend(1.0).to_array(),
            light_dir: KEY_LIGHT_DIR.normalize().extend(0.0).to_array(),
            key: scaled(key_color, key_intensity),
            ambient: scaled(ambient, ambient_intensity),
            shadow: [
                1.0 / SHADOW_MAP_SIZE as f32,
                SHADOW_BIAS,
                3.0 * shadow_radius(bounds),
                GROUND_SHADOW_OPACITY,
            ],
        }
    }
}

/// Radius of the sphere enclosing `bounds` (at least 1).
fn shadow_radius(bounds: Option<(Vec3, Vec3)>) -> f32 {
    bounds
        .map(|(min, max)| (max - min).length() * 0.5)
        .unwrap_or(0.0)
        .max(1.0)
}

/// Orthographic key-light projection covering `bounds` and the floor area its shadow
/// can fall on.
pub fn light_view_proj(bounds: Option<(Vec3, Vec3)>) -> Mat4 {
    let center = bounds.map_or(Vec3::ZERO, |(min, max)| (min + max) * 0.5);
    let radius = shadow_radius(bounds);
    let dir = KEY_LIGHT_DIR.normalize();
    let eye = center + dir * (2.0 * radius);
    let view = Mat4::look_at_rh(eye, center, Vec3::Y);
    // Shadows reach the floor at most radius + 2 * radius / dir.y behind the centre.
    let far = 2.0 * radius + radius + 2.0 * radius / dir.y;
    let proj = Mat4::orthographic_rh(-radius, radius, -radius, radius, 0.0, far);
    proj * view
}

fn scaled(rgb: [f32; 3], intensity: f32) -> [f32; 4] {
    [rgb[0] * intensity, rgb[1] * intensity, rgb[2] * intensity, 1.0]
}

/// Clear colour for the preset background.
pub fn clear_color(environment: EnvironmentPreset) -> wgpu::Color {
    let [r, g, b] = environment.lighting().background;
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}
