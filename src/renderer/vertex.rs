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

    /// Byte stride of one vertex in an upload buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// View a vertex slice as raw bytes for a host-side buffer upload
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Colors for runtime overlays
pub mod colors {
    use crate::Color;

    pub const BACKGROUND: Color = Color::rgb(0.02, 0.02, 0.05);
    pub const OVERLAY: Color = Color::rgba(0.0, 0.0, 0.0, 0.6);
    pub const TEXT: Color = Color::WHITE;
    pub const ACCENT: Color = Color::YELLOW;
    pub const WARNING: Color = Color::RED;
    pub const PROGRESS_TRACK: Color = Color::rgb(0.2, 0.2, 0.25);
    pub const PROGRESS_FILL: Color = Color::rgb(0.2, 0.8, 0.4);
    pub const INPUT_BAR: Color = Color::rgb(0.08, 0.08, 0.12);
    pub const JOYSTICK_BASE: Color = Color::rgba(1.0, 1.0, 1.0, 0.15);
    pub const JOYSTICK_KNOB: Color = Color::rgba(1.0, 1.0, 1.0, 0.5);
    pub const BUTTON_A: Color = Color::rgba(1.0, 0.3, 0.3, 0.6);
    pub const BUTTON_B: Color = Color::rgba(0.3, 0.5, 1.0, 0.6);
}
