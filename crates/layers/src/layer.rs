use foundation::math::Vec2;
use vello_cpu::kurbo::BezPath;

use crate::path::{DrawContext, PathSink};
use crate::raster::{Rasterizer, Surface};
use crate::symbology::{FillStyle, StrokeStyle};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

pub trait Layer {
    fn id(&self) -> LayerId;
}

/// Position of a layer in the globe stack, bottom to top.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LayerRole {
    Base,
    Shadow,
    Foreground,
    /// Any layer past the third.
    Overlay,
}

impl LayerRole {
    pub fn for_index(index: usize) -> Self {
        match index {
            0 => LayerRole::Base,
            1 => LayerRole::Shadow,
            2 => LayerRole::Foreground,
            _ => LayerRole::Overlay,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LayerRole::Base => "base",
            LayerRole::Shadow => "shadow",
            LayerRole::Foreground => "foreground",
            LayerRole::Overlay => "overlay",
        }
    }
}

/// Surface-level visual effect, applied when the stack is flattened rather
/// than per shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Effect {
    None,
    Blur { radius: f32 },
}

/// Drawing context of one layer: its pixels plus the path under construction.
#[derive(Debug)]
pub struct LayerContext {
    raster: Rasterizer,
    path: BezPath,
}

impl LayerContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            raster: Rasterizer::new(width, height),
            path: BezPath::new(),
        }
    }

    pub fn path(&self) -> &BezPath {
        &self.path
    }

    pub fn surface(&self) -> &Surface {
        self.raster.surface()
    }
}

impl DrawContext for LayerContext {
    fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    fn fill(&mut self, style: &FillStyle) {
        self.raster.fill_path(&self.path, style);
    }

    fn stroke(&mut self, style: &StrokeStyle) {
        self.raster.stroke_path(&self.path, style);
    }

    /// Clears both the pixels and the pending path.
    fn clear(&mut self) {
        self.raster.clear();
        self.path = BezPath::new();
    }
}

impl PathSink for LayerContext {
    fn move_to(&mut self, p: Vec2) {
        PathSink::move_to(&mut self.path, p);
    }

    fn line_to(&mut self, p: Vec2) {
        PathSink::line_to(&mut self.path, p);
    }

    fn close_path(&mut self) {
        PathSink::close_path(&mut self.path);
    }
}

/// Hands out one drawing context per layer role.
pub trait LayerTargets {
    type Context: DrawContext;

    fn context(&mut self, role: LayerRole) -> Option<&mut Self::Context>;
}

#[derive(Debug)]
pub struct RasterLayer {
    id: LayerId,
    pub role: LayerRole,
    pub effect: Effect,
    context: LayerContext,
}

impl RasterLayer {
    pub fn new(id: u64, role: LayerRole, width: u32, height: u32) -> Self {
        Self {
            id: LayerId(id),
            role,
            effect: Effect::None,
            context: LayerContext::new(width, height),
        }
    }

    pub fn context(&self) -> &LayerContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut LayerContext {
        &mut self.context
    }

    pub fn surface(&self) -> &Surface {
        self.context.surface()
    }

    /// The surface as it appears on screen, with the layer effect applied.
    pub fn rendered(&self) -> Surface {
        match self.effect {
            Effect::None => self.surface().clone(),
            Effect::Blur { radius } => self.surface().blurred(radius),
        }
    }
}

impl Layer for RasterLayer {
    fn id(&self) -> LayerId {
        self.id
    }
}

/// Equal-size layers in paint order; later layers draw over earlier ones.
#[derive(Debug)]
pub struct LayerStack {
    width: u32,
    height: u32,
    layers: Vec<RasterLayer>,
}

impl LayerStack {
    /// Creates `n` transparent layers. The shadow layer (index 1) gets a blur
    /// of `shadow_blur` pixels.
    pub fn create_layers(n: usize, width: u32, height: u32, shadow_blur: f32) -> Self {
        let layers = (0..n)
            .map(|index| {
                let role = LayerRole::for_index(index);
                let mut layer = RasterLayer::new(index as u64, role, width, height);
                if role == LayerRole::Shadow && shadow_blur > 0.0 {
                    layer.effect = Effect::Blur {
                        radius: shadow_blur,
                    };
                }
                layer
            })
            .collect();
        Self {
            width,
            height,
            layers,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer(&self, id: LayerId) -> Option<&RasterLayer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut RasterLayer> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    pub fn by_role(&self, role: LayerRole) -> Option<&RasterLayer> {
        self.layers.iter().find(|l| l.role == role)
    }

    pub fn by_role_mut(&mut self, role: LayerRole) -> Option<&mut RasterLayer> {
        self.layers.iter_mut().find(|l| l.role == role)
    }

    /// Resets a layer to fully transparent. Returns false for unknown ids.
    pub fn clear(&mut self, id: LayerId) -> bool {
        match self.layer_mut(id) {
            Some(layer) => {
                layer.context_mut().clear();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RasterLayer> {
        self.layers.iter()
    }

    /// Flattens all layers back to front onto a transparent surface.
    pub fn composite(&self) -> Surface {
        let mut out = Surface::new(self.width, self.height);
        for layer in &self.layers {
            out.draw_surface(&layer.rendered());
        }
        out
    }
}

impl LayerTargets for LayerStack {
    type Context = LayerContext;

    fn context(&mut self, role: LayerRole) -> Option<&mut LayerContext> {
        self.by_role_mut(role).map(RasterLayer::context_mut)
    }
}
