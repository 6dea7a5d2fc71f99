//! Reference grid on the y = 0 floor.

use bytemuck::{Pod, Zeroable};
use wgpu::{VertexBufferLayout, VertexStepMode};

/// Line vertex: position + color.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub pos: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<LineVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
    };
}

pub const GRID_HALF_EXTENT: i32 = 10;
/// Every n-th line is drawn brighter.
pub const GRID_SECTION_EVERY: i32 = 5;

const CELL_COLOR: [f32; 3] = [0.22, 0.22, 0.25];
const SECTION_COLOR: [f32; 3] = [0.45, 0.45, 0.52];

/// Line list for a square grid of unit cells spanning `-half..=half` on x and z.
pub fn grid_lines(half: i32, section_every: i32) -> Vec<LineVertex> {
    let extent = half as f32;
    let mut out = Vec::with_capacity(((2 * half + 1) * 4) as usize);
    for i in -half..=half {
        let color = if section_every > 0 && i % section_every == 0 {
            SECTION_COLOR
        } else {
            CELL_COLOR
        };
        let t = i as f32;
        out.push(LineVertex { pos: [t, 0.0, -extent], color });
        out.push(LineVertex { pos: [t, 0.0, extent], color });
        out.push(LineVertex { pos: [-extent, 0.0, t], color });
        out.push(LineVertex { pos: [extent, 0.0, t], color });
    }
    out
}
