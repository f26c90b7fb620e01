//! Orthographic globe projection.
//!
//! The projection keeps only the parameters that are fixed for the lifetime of
//! a globe (translation, precision) plus the current rotation. Scale and clip
//! angle travel separately in a [`ProjectionFrame`] so every draw states the
//! frame it depends on.

use super::{LonLat, Rotation, Vec2, Vec3};

/// Per-draw projection parameters: scale in pixels per unit radius and clip
/// angle in degrees measured from the view center.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionFrame {
    pub scale: f64,
    pub clip_angle: f64,
}

impl ProjectionFrame {
    pub const fn new(scale: f64, clip_angle: f64) -> Self {
        Self { scale, clip_angle }
    }

    /// Cosine of the clip angle; rotated points with `x` above it are kept.
    pub fn clip_cos(&self) -> f64 {
        self.clip_angle.to_radians().cos()
    }

    /// Radius of the cap boundary on the plane of the sphere, in unit radii.
    pub fn clip_radius(&self) -> f64 {
        self.clip_angle.to_radians().sin().abs()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthographicProjection {
    translate: Vec2,
    precision: f64,
    rotation: Rotation,
}

impl OrthographicProjection {
    /// Fixes the screen-space center and the resampling precision (pixels).
    pub fn configure(translate: Vec2, precision: f64) -> Self {
        Self {
            translate,
            precision,
            rotation: Rotation::default(),
        }
    }

    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn rotate(&mut self, spin: f64, tilt: f64) {
        self.rotation = Rotation::new(spin, tilt);
    }

    /// Rotated cartesian point; the viewer sits on the +x axis.
    pub fn view_point(&self, p: LonLat) -> Vec3 {
        self.rotation.apply(p.to_unit())
    }

    /// Geographic coordinates currently at the center of the disc.
    pub fn view_center(&self) -> LonLat {
        LonLat::from_unit(self.rotation.invert(Vec3::X))
    }

    pub fn is_visible(&self, v: Vec3, frame: &ProjectionFrame) -> bool {
        v.x > frame.clip_cos()
    }

    pub fn to_screen(&self, v: Vec3, frame: &ProjectionFrame) -> Vec2 {
        Vec2::new(
            self.translate.x + frame.scale * v.y,
            self.translate.y - frame.scale * v.z,
        )
    }

    pub fn project(&self, p: LonLat, frame: &ProjectionFrame) -> Option<Vec2> {
        let v = self.view_point(p);
        self.is_visible(v, frame)
            .then(|| self.to_screen(v, frame))
    }

    /// Largest angular step (radians) between emitted vertices such that the
    /// straight chord deviates from the true arc by at most `precision` pixels.
    pub fn resample_step(&self, frame: &ProjectionFrame) -> f64 {
        let scale = frame.scale.abs().max(1e-9);
        let precision = self.precision.max(1e-6);
        (8.0 * precision / scale).sqrt().clamp(1e-3, 0.2)
    }
}
