//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Neon palette
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.015, 0.05, 1.0];
    /// Player cyan
    pub const PLAYER: [f32; 4] = [0.0, 0.82, 0.86, 1.0];
    pub const GROUND: [f32; 4] = [0.0, 0.42, 0.47, 1.0];
    pub const GRID: [f32; 4] = [0.0, 0.42, 0.47, 0.3];
    pub const SPIKE: [f32; 4] = [0.92, 0.12, 0.32, 1.0];
    /// Block magenta
    pub const BLOCK: [f32; 4] = [0.95, 0.2, 0.78, 1.0];

    /// Same color at a different opacity
    pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }
}
