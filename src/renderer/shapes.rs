//! Shape generation for wheel primitives
//!
//! Angles here are surface angles (screen space, y down).

use glam::Vec2;

use super::vertex::{Color, Vertex};
use crate::polar_to_cartesian;

fn segment_count(span: f32, segments_per_radian: f32) -> u32 {
    ((span.abs() * segments_per_radian) as u32).max(2)
}

/// Generate vertices for a filled wedge (triangle fan from the center)
pub fn sector_wedge(
    center: Vec2,
    radius: f32,
    start: f32,
    end: f32,
    color: Color,
    segments_per_radian: f32,
) -> Vec<Vertex> {
    let span = end - start;
    let num_segments = segment_count(span, segments_per_radian);
    let mut vertices = Vec::with_capacity((num_segments * 3) as usize);

    for i in 0..num_segments {
        let theta1 = start + span * (i as f32 / num_segments as f32);
        let theta2 = start + span * ((i + 1) as f32 / num_segments as f32);
        let p1 = center + polar_to_cartesian(radius, theta1);
        let p2 = center + polar_to_cartesian(radius, theta2);

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Generate vertices for a thick line between two points
pub fn line(a: Vec2, b: Vec2, width: f32, color: Color) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Generate vertices for an arc band of the given width centred on `radius`
pub fn arc_band(
    center: Vec2,
    radius: f32,
    width: f32,
    start: f32,
    end: f32,
    color: Color,
    segments_per_radian: f32,
) -> Vec<Vertex> {
    let span = end - start;
    let num_segments = segment_count(span, segments_per_radian);
    let inner_r = (radius - width / 2.0).max(0.0);
    let outer_r = radius + width / 2.0;

    let mut vertices = Vec::with_capacity((num_segments * 6) as usize);

    for i in 0..num_segments {
        let theta1 = start + span * (i as f32 / num_segments as f32);
        let theta2 = start + span * ((i + 1) as f32 / num_segments as f32);

        let inner1 = center + polar_to_cartesian(inner_r, theta1);
        let outer1 = center + polar_to_cartesian(outer_r, theta1);
        let inner2 = center + polar_to_cartesian(inner_r, theta2);
        let outer2 = center + polar_to_cartesian(outer_r, theta2);

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Outline of a wedge: both radial edges plus the rim
pub fn sector_outline(
    center: Vec2,
    radius: f32,
    start: f32,
    end: f32,
    color: Color,
    width: f32,
    segments_per_radian: f32,
) -> Vec<Vertex> {
    let mut vertices = line(
        center,
        center + polar_to_cartesian(radius, start),
        width,
        color,
    );
    vertices.extend(line(
        center,
        center + polar_to_cartesian(radius, end),
        width,
        color,
    ));
    vertices.extend(arc_band(
        center,
        radius,
        width,
        start,
        end,
        color,
        segments_per_radian,
    ));
    vertices
}
