//! CPU tessellation backend
//!
//! Turns wheel primitives into a triangle list ready for upload, and keeps
//! label text aside for a separate text pass.

use glam::Vec2;

use super::shapes;
use super::vertex::{Color, Vertex};
use super::{Label, Surface};
use crate::polar_to_cartesian;

/// Label to be drawn by a text pass
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Anchor (text center) in surface pixels
    pub position: Vec2,
    /// Baseline rotation (radians)
    pub angle: f32,
    pub font_px: f32,
    pub font_family: String,
    pub color: Color,
}

/// Surface that records geometry instead of rasterizing it
#[derive(Debug, Clone)]
pub struct MeshSurface {
    size: Vec2,
    segments_per_radian: f32,
    vertices: Vec<Vertex>,
    text_runs: Vec<TextRun>,
}

impl MeshSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            segments_per_radian: 24.0,
            vertices: Vec::new(),
            text_runs: Vec::new(),
        }
    }

    /// Arc smoothness (segments per radian of sweep)
    pub fn with_segments_per_radian(mut self, segments_per_radian: f32) -> Self {
        self.segments_per_radian = segments_per_radian.max(1.0);
        self
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Raw vertex bytes for a GPU buffer
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn text_runs(&self) -> &[TextRun] {
        &self.text_runs
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

impl Surface for MeshSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.text_runs.clear();
    }

    fn fill_sector(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color) {
        self.vertices.extend(shapes::sector_wedge(
            center,
            radius,
            start,
            end,
            color,
            self.segments_per_radian,
        ));
    }

    fn stroke_sector(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        color: Color,
        width: f32,
    ) {
        if width <= 0.0 {
            return;
        }
        self.vertices.extend(shapes::sector_outline(
            center,
            radius,
            start,
            end,
            color,
            width,
            self.segments_per_radian,
        ));
    }

    fn fill_text_rotated(&mut self, center: Vec2, label: &Label<'_>) {
        let placement = label.placement;
        self.text_runs.push(TextRun {
            text: label.text.to_string(),
            position: center + polar_to_cartesian(placement.distance, placement.angle),
            angle: placement.angle,
            font_px: placement.font_px,
            font_family: label.font_family.to_string(),
            color: label.color,
        });
    }
}
