use foundation::math::{ProjectionFrame, Vec2};
use formats::DEFAULT_LAND_OBJECT;
use layers::{Color, FillStyle, StrokeStyle};
use serde::{Deserialize, Serialize};

use crate::error::GlobeError;

/// Largest width or height a layer surface can have.
pub const MAX_SURFACE_SIDE: u32 = u16::MAX as u32;

/// Scale (as a fraction of the width) and clip angle of one draw.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Scale is `width / scale_divisor`.
    pub scale_divisor: f64,
    /// Degrees from the view center.
    pub clip_angle: f64,
}

impl FrameConfig {
    pub const fn new(scale_divisor: f64, clip_angle: f64) -> Self {
        Self {
            scale_divisor,
            clip_angle,
        }
    }

    pub fn frame(&self, width: u32) -> ProjectionFrame {
        ProjectionFrame::new(f64::from(width) / self.scale_divisor, self.clip_angle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobeConfig {
    pub width: u32,
    pub height: u32,
    /// Maximum chord deviation in pixels when resampling arcs.
    pub precision: f64,
    /// Degrees of spin per millisecond.
    pub rotation_speed: f64,
    pub tilt: f64,

    pub sphere_frame: FrameConfig,
    pub shadow_frame: FrameConfig,
    pub wide_frame: FrameConfig,
    pub narrow_frame: FrameConfig,

    pub sphere_stroke: String,
    pub sphere_stroke_width: f64,
    pub sphere_fill: String,
    pub shadow_fill: String,
    pub grid_stroke: String,
    pub grid_stroke_width: f64,
    pub limb_fill: String,
    pub land_fill: String,
    /// Gaussian blur radius of the shadow layer, in pixels.
    pub shadow_blur: f32,

    /// GeoJSON world dataset; TopoJSON has to be converted beforehand.
    pub dataset_url: String,
    pub land_object: String,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 960,
            precision: 0.5,
            rotation_speed: -0.01,
            tilt: -15.0,
            sphere_frame: FrameConfig::new(2.3, 90.0),
            shadow_frame: FrameConfig::new(2.3, 90.0),
            wide_frame: FrameConfig::new(2.2, 106.3),
            narrow_frame: FrameConfig::new(2.2, 90.0),
            sphere_stroke: "#000".to_string(),
            sphere_stroke_width: 3.0,
            sphere_fill: "#fff".to_string(),
            shadow_fill: "rgba(0,0,0,0.4)".to_string(),
            grid_stroke: "rgba(0,0,0,0.2)".to_string(),
            grid_stroke_width: 0.5,
            limb_fill: "#737368".to_string(),
            land_fill: "#dadac4".to_string(),
            shadow_blur: 6.0,
            dataset_url: "/json/land-110m.geojson".to_string(),
            land_object: DEFAULT_LAND_OBJECT.to_string(),
        }
    }
}

/// Parsed colors and widths for every draw of the globe.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeStyles {
    pub sphere_stroke: StrokeStyle,
    pub sphere_fill: FillStyle,
    pub shadow_fill: FillStyle,
    pub grid_stroke: StrokeStyle,
    pub limb_fill: FillStyle,
    pub land_fill: FillStyle,
}

impl GlobeConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, GlobeError> {
        let config: Self =
            serde_json::from_str(payload).map_err(|e| GlobeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GlobeError> {
        if self.width == 0 || self.height == 0 {
            return Err(GlobeError::Config(format!(
                "surface size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_SURFACE_SIDE || self.height > MAX_SURFACE_SIDE {
            return Err(GlobeError::Config(format!(
                "surface size is limited to {MAX_SURFACE_SIDE} per side, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.precision > 0.0) {
            return Err(GlobeError::Config(format!(
                "precision must be positive, got {}",
                self.precision
            )));
        }
        for (name, frame) in [
            ("sphere_frame", &self.sphere_frame),
            ("shadow_frame", &self.shadow_frame),
            ("wide_frame", &self.wide_frame),
            ("narrow_frame", &self.narrow_frame),
        ] {
            if !(frame.scale_divisor > 0.0) || !frame.clip_angle.is_finite() {
                return Err(GlobeError::Config(format!(
                    "{name} needs a positive scale divisor and a finite clip angle"
                )));
            }
        }
        if !(self.shadow_blur >= 0.0) {
            return Err(GlobeError::Config("shadow_blur must not be negative".to_string()));
        }
        self.styles().map(|_| ())
    }

    pub fn styles(&self) -> Result<GlobeStyles, GlobeError> {
        Ok(GlobeStyles {
            sphere_stroke: StrokeStyle::new(
                parse_color("sphere_stroke", &self.sphere_stroke)?,
                self.sphere_stroke_width,
            ),
            sphere_fill: FillStyle::new(parse_color("sphere_fill", &self.sphere_fill)?),
            shadow_fill: FillStyle::new(parse_color("shadow_fill", &self.shadow_fill)?),
            grid_stroke: StrokeStyle::new(
                parse_color("grid_stroke", &self.grid_stroke)?,
                self.grid_stroke_width,
            ),
            limb_fill: FillStyle::new(parse_color("limb_fill", &self.limb_fill)?),
            land_fill: FillStyle::new(parse_color("land_fill", &self.land_fill)?),
        })
    }

    /// Center of the drawing surface.
    pub fn translate(&self) -> Vec2 {
        Vec2::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

fn parse_color(field: &str, css: &str) -> Result<Color, GlobeError> {
    Color::parse(css)
        .ok_or_else(|| GlobeError::Config(format!("{field}: unsupported color {css:?}")))
}
