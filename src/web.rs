//! Browser backends: 2D canvas surface and CSS spin transform

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::renderer::vertex::css_color;
use crate::renderer::{Color, Label, Surface};
use crate::wheel::Trajectory;

/// `Surface` over a `<canvas>` 2D context
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    size: Vec2,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            size: Vec2::new(canvas.width() as f32, canvas.height() as f32),
        })
    }

    fn wedge_path(&self, center: Vec2, radius: f32, start: f32, end: f32) {
        self.ctx.begin_path();
        self.ctx.move_to(center.x as f64, center.y as f64);
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius as f64,
            start as f64,
            end as f64,
        );
        self.ctx.close_path();
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);
    }

    fn fill_sector(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color) {
        self.wedge_path(center, radius, start, end);
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.fill();
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
        self.wedge_path(center, radius, start, end);
        self.ctx.set_stroke_style_str(&css_color(color));
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }

    fn fill_text_rotated(&mut self, center: Vec2, label: &Label<'_>) {
        let ctx = &self.ctx;
        ctx.save();
        let _ = ctx.translate(center.x as f64, center.y as f64);
        let _ = ctx.rotate(label.placement.angle as f64);

        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_fill_style_str(&css_color(label.color));
        ctx.set_shadow_color(&css_color(label.shadow));
        ctx.set_shadow_blur(4.0);
        ctx.set_shadow_offset_x(1.0);
        ctx.set_shadow_offset_y(1.0);
        ctx.set_font(&format!(
            "bold {}px {}",
            label.placement.font_px, label.font_family
        ));
        let _ = ctx.fill_text(label.text, label.placement.distance as f64, 0.0);

        ctx.restore();
    }
}

/// Start the eased CSS rotation for a trajectory
pub fn apply_spin(canvas: &HtmlCanvasElement, trajectory: &Trajectory) -> Result<(), JsValue> {
    let style = canvas.style();
    style.set_property(
        "transition",
        &format!(
            "transform {}ms {}",
            trajectory.duration_ms,
            trajectory.easing.css()
        ),
    )?;
    style.set_property(
        "transform",
        &format!("rotate({}deg)", trajectory.total_rotation_degrees),
    )
}

/// Snap to the rest angle without animating
pub fn apply_rest(canvas: &HtmlCanvasElement, rest_degrees: f32) -> Result<(), JsValue> {
    let style = canvas.style();
    style.set_property("transition", "none")?;
    style.set_property("transform", &format!("rotate({rest_degrees}deg)"))
}
