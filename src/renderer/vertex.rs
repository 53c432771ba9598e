//! Vertex types and colors for 2D rendering

use bytemuck::{Pod, Zeroable};

/// RGBA, each channel in [0, 1]
pub type Color = [f32; 4];

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Color,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// `0xRRGGBB` -> opaque color
pub const fn rgb(hex: u32) -> Color {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
        1.0,
    ]
}

/// CSS `rgba()` string for canvas-style backends
pub fn css_color(color: Color) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3]
    )
}

/// Colors for wheel elements
pub mod colors {
    use super::{Color, rgb};

    /// Sector fills, cycled by position
    pub const PALETTE: [Color; 6] = [
        rgb(0xFF6B6B), // coral
        rgb(0x4ECDC4), // teal
        rgb(0x45B7D1), // sky
        rgb(0xFFA07A), // salmon
        rgb(0x98D8C8), // mint
        rgb(0xF7DC6F), // sand
    ];
    pub const SECTOR_STROKE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const LABEL: Color = [1.0, 1.0, 1.0, 1.0];
    pub const LABEL_SHADOW: Color = [0.0, 0.0, 0.0, 0.3];
}
