//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const PADDLE: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const BALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BRICK_SOLID: [f32; 4] = [0.55, 0.55, 0.6, 1.0];
    pub const SPARK: [f32; 4] = [0.9, 0.95, 1.0, 1.0];

    /// Per-row brick colors, top row first
    pub const BRICK_ROWS: [[f32; 4]; 6] = [
        [0.95, 0.26, 0.21, 1.0], // Red
        [1.0, 0.6, 0.0, 1.0],    // Orange
        [1.0, 0.92, 0.23, 1.0],  // Yellow
        [0.3, 0.85, 0.39, 1.0],  // Green
        [0.25, 0.55, 1.0, 1.0],  // Blue
        [0.61, 0.35, 0.9, 1.0],  // Violet
    ];
}
