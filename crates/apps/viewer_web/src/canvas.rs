//! 2d canvas contexts as globe layer targets; the browser does the filling.

use foundation::math::Vec2;
use layers::{DrawContext, FillStyle, LayerRole, LayerTargets, PathSink, StrokeStyle};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

pub(crate) struct CanvasLayer {
    role: LayerRole,
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasLayer {
    pub(crate) fn new(
        role: LayerRole,
        ctx: CanvasRenderingContext2d,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            role,
            ctx,
            width: f64::from(width),
            height: f64::from(height),
        }
    }
}

impl PathSink for CanvasLayer {
    fn move_to(&mut self, p: Vec2) {
        self.ctx.move_to(p.x, p.y);
    }

    fn line_to(&mut self, p: Vec2) {
        self.ctx.line_to(p.x, p.y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }
}

impl DrawContext for CanvasLayer {
    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    // Canvas fill() defaults to the nonzero rule.
    fn fill(&mut self, style: &FillStyle) {
        ctx_set_style(&self.ctx, "fillStyle", &style.color.to_css());
        self.ctx.fill();
    }

    fn stroke(&mut self, style: &StrokeStyle) {
        ctx_set_style(&self.ctx, "strokeStyle", &style.color.to_css());
        self.ctx.set_line_width(style.width);
        self.ctx.stroke();
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        self.ctx.begin_path();
    }
}

/// The stacked canvases of one mounted globe, bottom to top.
pub(crate) struct CanvasLayers {
    layers: Vec<CanvasLayer>,
}

impl CanvasLayers {
    pub(crate) fn new(layers: Vec<CanvasLayer>) -> Self {
        Self { layers }
    }
}

impl LayerTargets for CanvasLayers {
    type Context = CanvasLayer;

    fn context(&mut self, role: LayerRole) -> Option<&mut CanvasLayer> {
        self.layers.iter_mut().find(|l| l.role == role)
    }
}

fn ctx_set_style(ctx: &CanvasRenderingContext2d, key: &str, value: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str(key),
        &JsValue::from_str(value),
    );
}
