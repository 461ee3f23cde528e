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

/// Colors for scene elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.07, 0.05, 0.09, 1.0];
    pub const SHAKER_BODY: [f32; 4] = [0.72, 0.74, 0.78, 1.0];
    pub const SHAKER_CAP: [f32; 4] = [0.55, 0.57, 0.62, 1.0];
    pub const GLASS: [f32; 4] = [0.65, 0.78, 0.85, 0.25];
    /// Slightly translucent cocktail pink
    pub const LIQUID: [f32; 4] = [1.0, 0.43, 0.67, 0.78];
    pub const STREAM: [f32; 4] = [1.0, 0.50, 0.72, 0.9];
    pub const SPILL: [f32; 4] = [1.0, 0.43, 0.67, 0.7];
    pub const SPLASH: [f32; 4] = [1.0, 0.55, 0.75, 0.9];
}
