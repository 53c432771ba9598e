//! Wheel rendering
//!
//! `paint` walks the layout and issues primitive calls against a `Surface`.
//! Backends: `MeshSurface` (CPU triangles, any platform) and the canvas
//! backend in `web` (wasm32).

pub mod mesh;
pub mod shapes;
pub mod vertex;

pub use mesh::{MeshSurface, TextRun};
pub use vertex::{Color, Vertex, colors};

use glam::Vec2;

use crate::settings::{LabelStyle, WheelSettings};
use crate::wheel::sector::{LaidOutSector, SectorLayout};

/// Where and how big a sector label is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    /// Surface angle of the sector bisector; text runs outward along it
    pub angle: f32,
    /// Distance of the text anchor from the wheel center
    pub distance: f32,
    pub font_px: f32,
}

/// A label ready for a surface
#[derive(Debug, Clone, Copy)]
pub struct Label<'a> {
    pub text: &'a str,
    pub placement: LabelPlacement,
    pub font_family: &'a str,
    pub color: Color,
    pub shadow: Color,
}

/// 2D drawing target with arc fill, stroke and rotated text
pub trait Surface {
    /// Surface dimensions in pixels
    fn size(&self) -> Vec2;

    fn clear(&mut self);

    /// Filled wedge from `center` spanning surface angles `start..end`
    fn fill_sector(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color);

    /// Outline of the same wedge
    fn stroke_sector(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        color: Color,
        width: f32,
    );

    /// Text centred on the anchor, rotated to `label.placement.angle`
    fn fill_text_rotated(&mut self, center: Vec2, label: &Label<'_>);
}

/// Palette slot for a sector position
#[inline]
pub fn sector_color(index: usize) -> Color {
    colors::PALETTE[index % colors::PALETTE.len()]
}

/// Label placement for one sector.
///
/// Narrow sectors pull the label toward the hub so it does not collide with
/// the rim stroke. Font size steps down with the sweep; the per-tier override
/// table wins over the buckets.
pub fn label_placement(sector: &LaidOutSector, style: &LabelStyle, radius: f32) -> LabelPlacement {
    let sweep_deg = sector.sweep_degrees();

    let distance = if sweep_deg < style.narrow_sweep_deg {
        style.narrow_distance
    } else {
        style.wide_distance
    } * radius;

    let font_px = style
        .font_overrides
        .get(sector.spec.tier.as_str())
        .copied()
        .or_else(|| {
            style
                .font_buckets
                .iter()
                .find(|b| sweep_deg < b.below_sweep_deg)
                .map(|b| b.font_px)
        })
        .unwrap_or(style.default_font_px);

    LabelPlacement {
        angle: SectorLayout::surface_angle(sector.mid_angle()),
        distance,
        font_px,
    }
}

/// Paint the whole wheel, centred on the surface
pub fn paint(layout: &SectorLayout, surface: &mut dyn Surface, settings: &WheelSettings) {
    let center = surface.size() / 2.0;
    let radius = settings.radius;

    surface.clear();

    for sector in layout.sectors() {
        let start = SectorLayout::surface_angle(sector.start_angle);
        let end = SectorLayout::surface_angle(sector.end_angle());

        surface.fill_sector(center, radius, start, end, sector_color(sector.index));
        surface.stroke_sector(
            center,
            radius,
            start,
            end,
            colors::SECTOR_STROKE,
            settings.stroke_width,
        );

        let label = Label {
            text: &sector.spec.label,
            placement: label_placement(sector, &settings.labels, radius),
            font_family: &settings.labels.font_family,
            color: colors::LABEL,
            shadow: colors::LABEL_SHADOW,
        };
        surface.fill_text_rotated(center, &label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::sector::SectorSpec;

    /// Records primitive calls in order
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        fills: Vec<(f32, f32, Color)>,
        labels: Vec<(String, LabelPlacement)>,
    }

    impl Surface for Recorder {
        fn size(&self) -> Vec2 {
            Vec2::new(500.0, 500.0)
        }

        fn clear(&mut self) {
            self.calls.push("clear".into());
        }

        fn fill_sector(&mut self, _center: Vec2, _radius: f32, start: f32, end: f32, color: Color) {
            self.calls.push("fill".into());
            self.fills.push((start, end, color));
        }

        fn stroke_sector(
            &mut self,
            _center: Vec2,
            _radius: f32,
            _start: f32,
            _end: f32,
            _color: Color,
            width: f32,
        ) {
            assert_eq!(width, 3.0);
            self.calls.push("stroke".into());
        }

        fn fill_text_rotated(&mut self, _center: Vec2, label: &Label<'_>) {
            self.calls.push("text".into());
            self.labels.push((label.text.to_string(), label.placement));
        }
    }

    fn seven_sectors() -> SectorLayout {
        SectorLayout::build(vec![
            SectorSpec::new("10000x", 1, "jackpot"),
            SectorSpec::new("5000x", 4, "major"),
            SectorSpec::new("1000x", 5, "minor"),
            SectorSpec::new("500x", 10, "small"),
            SectorSpec::new("200x", 20, "tiny"),
            SectorSpec::new("100x", 30, "common"),
            SectorSpec::new("50x", 30, "basic"),
        ])
        .unwrap()
    }

    #[test]
    fn test_paint_order_and_palette_cycling() {
        let layout = seven_sectors();
        let mut recorder = Recorder::default();
        paint(&layout, &mut recorder, &WheelSettings::default());

        assert_eq!(recorder.calls[0], "clear");
        assert_eq!(&recorder.calls[1..4], ["fill", "stroke", "text"]);
        assert_eq!(recorder.fills.len(), 7);
        // Seventh sector wraps to the first palette slot
        assert_eq!(recorder.fills[6].2, colors::PALETTE[0]);
        assert_ne!(recorder.fills[5].2, recorder.fills[6].2);
        assert_eq!(recorder.labels[0].0, "10000x");
        assert_eq!(recorder.labels[0].1.font_px, 14.0);
    }

    #[test]
    fn test_paint_starts_at_top_and_is_contiguous() {
        let layout = seven_sectors();
        let mut recorder = Recorder::default();
        paint(&layout, &mut recorder, &WheelSettings::default());

        assert!((recorder.fills[0].0 - crate::wheel::sector::REFERENCE_ANGLE).abs() < 1e-6);
        for pair in recorder.fills.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        let last_end = recorder.fills.last().unwrap().1;
        assert!((last_end - (crate::wheel::sector::REFERENCE_ANGLE + std::f32::consts::TAU)).abs() < 1e-5);
    }

    #[test]
    fn test_label_rules() {
        let layout = seven_sectors();
        let style = LabelStyle::default();
        let placements: Vec<LabelPlacement> = layout
            .sectors()
            .iter()
            .map(|s| label_placement(s, &style, 240.0))
            .collect();

        // Override beats the narrow bucket
        assert_eq!(placements[0].font_px, 14.0);
        assert_eq!(placements[0].distance, 120.0);
        // 4% -> narrow
        assert_eq!(placements[1].font_px, 16.0);
        assert_eq!(placements[1].distance, 120.0);
        // 5% is exactly on the threshold -> wide, middle bucket
        assert_eq!(placements[2].font_px, 20.0);
        assert!((placements[2].distance - 156.0).abs() < 1e-3);
        // 10% and up -> largest font
        assert_eq!(placements[3].font_px, 24.0);
        assert_eq!(placements[6].font_px, 24.0);
    }

    #[test]
    fn test_label_on_bisector() {
        let layout = SectorLayout::build(vec![
            SectorSpec::new("L", 50, "l"),
            SectorSpec::new("R", 50, "r"),
        ])
        .unwrap();
        let p = label_placement(&layout.sectors()[0], &LabelStyle::default(), 240.0);
        // First half's bisector points to 3 o'clock
        assert!(p.angle.abs() < 1e-5);
    }
}
