//! CPU drawing surfaces.
//!
//! [`Surface`] is a premultiplied RGBA8 buffer, row-major, origin at the
//! top-left corner. [`Rasterizer`] fills and strokes `kurbo` paths into one
//! through `vello_cpu`; flattening layers and the shadow blur work on the
//! buffers directly.

use std::fmt;

use vello_cpu::kurbo::{BezPath, Stroke};
use vello_cpu::peniko::Fill;
use vello_cpu::{Pixmap, RenderContext};

use crate::symbology::{Color, FillStyle, StrokeStyle};

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Resets every pixel in the full bounds to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn is_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Premultiplied pixel; out-of-bounds reads are transparent.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Straight-alpha color of a pixel.
    pub fn color_at(&self, x: u32, y: u32) -> Color {
        let [r, g, b, a] = self.pixel(x, y);
        if a == 0 {
            return Color::TRANSPARENT;
        }
        let [r, g, b] = [r, g, b].map(|c| unpremultiply(c, a));
        Color::rgba(r, g, b, f32::from(a) / 255.0)
    }

    /// Straight-alpha RGBA8 bytes, as expected by image encoders.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let a = px[3];
            if a == 0 {
                out.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            out.extend(px[..3].iter().map(|&c| unpremultiply(c, a)));
            out.push(a);
        }
        out
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Source-over composite of `src` onto this surface (sizes must match;
    /// any excess is ignored).
    pub fn draw_surface(&mut self, src: &Surface) {
        let w = self.width.min(src.width);
        let h = self.height.min(src.height);
        for y in 0..h {
            for x in 0..w {
                let s = src.pixel(x, y);
                if s[3] == 0 {
                    continue;
                }
                let i = self.index(x, y);
                let inv = 255 - u16::from(s[3]);
                for c in 0..4 {
                    let d = u16::from(self.data[i + c]);
                    self.data[i + c] = (u16::from(s[c]) + (d * inv + 127) / 255).min(255) as u8;
                }
            }
        }
    }

    /// Gaussian-blurred copy with standard deviation `radius` pixels; pixels
    /// outside the bounds count as transparent.
    pub fn blurred(&self, radius: f32) -> Surface {
        if radius <= 0.0 || self.data.is_empty() {
            return self.clone();
        }
        let kernel = gaussian_kernel(radius);
        let w = self.width as usize;
        let h = self.height as usize;
        let src: Vec<f32> = self.data.iter().map(|&c| f32::from(c)).collect();

        let mut tmp = vec![0.0f32; src.len()];
        blur_pass(&src, &mut tmp, w, h, &kernel, true);
        let mut dst = vec![0.0f32; src.len()];
        blur_pass(&tmp, &mut dst, w, h, &kernel, false);

        Surface {
            width: self.width,
            height: self.height,
            data: dst
                .into_iter()
                .map(|v| v.round().clamp(0.0, 255.0) as u8)
                .collect(),
        }
    }
}

fn unpremultiply(c: u8, a: u8) -> u8 {
    ((f32::from(c) * 255.0 / f32::from(a)).round()).min(255.0) as u8
}

/// Vector drawing into a [`Surface`].
///
/// Draw calls accumulate in the `vello_cpu` context until [`Rasterizer::clear`];
/// the surface is re-rendered after each call, so it always shows everything
/// drawn since the last clear, source-over in call order. Sizes are limited
/// to `u16::MAX` per side.
pub struct Rasterizer {
    ctx: RenderContext,
    pixmap: Pixmap,
    surface: Surface,
}

impl fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rasterizer")
            .field("width", &self.surface.width)
            .field("height", &self.surface.height)
            .finish_non_exhaustive()
    }
}

impl Rasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        let w = u16::try_from(width).unwrap_or(u16::MAX);
        let h = u16::try_from(height).unwrap_or(u16::MAX);
        Self {
            ctx: RenderContext::new(w, h),
            pixmap: Pixmap::new(w, h),
            surface: Surface::new(u32::from(w), u32::from(h)),
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Drops every recorded draw and resets the pixels to transparent.
    pub fn clear(&mut self) {
        self.ctx.reset();
        self.surface.clear();
    }

    /// Fills every subpath, implicitly closed, with the nonzero rule.
    pub fn fill_path(&mut self, path: &BezPath, style: &FillStyle) {
        if path.elements().is_empty() || style.color.a <= 0.0 {
            return;
        }
        self.ctx.set_paint(paint(style.color));
        self.ctx.set_fill_rule(Fill::NonZero);
        self.ctx.fill_path(path);
        self.render();
    }

    /// Strokes every subpath centered on its outline.
    pub fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle) {
        if path.elements().is_empty() || style.width <= 0.0 || style.color.a <= 0.0 {
            return;
        }
        self.ctx.set_paint(paint(style.color));
        self.ctx.set_stroke(Stroke::new(style.width));
        self.ctx.stroke_path(path);
        self.render();
    }

    fn render(&mut self) {
        self.ctx.flush();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.surface
            .data
            .copy_from_slice(self.pixmap.data_as_u8_slice());
    }
}

fn paint(color: Color) -> vello_cpu::peniko::Color {
    let a = (color.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, a)
}

fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil() as i32;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f32> = (-radius..=radius)
        .map(|i| {
            let x = i as f32;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

fn blur_pass(src: &[f32], dst: &mut [f32], w: usize, h: usize, k: &[f32], horizontal: bool) {
    let radius = (k.len() / 2) as isize;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let offset = ki as isize - radius;
                let (sx, sy) = if horizontal {
                    (x as isize + offset, y as isize)
                } else {
                    (x as isize, y as isize + offset)
                };
                if sx < 0 || sy < 0 || sx >= w as isize || sy >= h as isize {
                    continue;
                }
                let idx = (sy as usize * w + sx as usize) * 4;
                for c in 0..4 {
                    acc[c] += kw * src[idx + c];
                }
            }
            let out = (y * w + x) * 4;
            dst[out..out + 4].copy_from_slice(&acc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Rasterizer, Surface};
    use crate::path::PathSink;
    use crate::symbology::{Color, FillStyle, StrokeStyle};
    use foundation::math::Vec2;
    use vello_cpu::kurbo::BezPath;

    fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
        let mut path = BezPath::new();
        add_rect(&mut path, [x0, y0, x1, y1], false);
        path
    }

    fn add_rect(path: &mut BezPath, [x0, y0, x1, y1]: [f64; 4], reversed: bool) {
        let mut corners = vec![
            Vec2::new(x0, y0),
            Vec2::new(x1, y0),
            Vec2::new(x1, y1),
            Vec2::new(x0, y1),
        ];
        if reversed {
            corners.reverse();
        }
        PathSink::move_to(path, corners[0]);
        for &c in &corners[1..] {
            PathSink::line_to(path, c);
        }
        PathSink::close_path(path);
    }

    fn filled(width: u32, height: u32, path: &BezPath, color: Color) -> Rasterizer {
        let mut r = Rasterizer::new(width, height);
        r.fill_path(path, &FillStyle::new(color));
        r
    }

    fn assert_near(actual: u8, expected: u8) {
        assert!(actual.abs_diff(expected) <= 1, "{actual} vs {expected}");
    }

    #[test]
    fn fill_covers_pixels_inside() {
        let r = filled(10, 10, &rect_path(2.0, 2.0, 5.0, 4.0), Color::WHITE);
        let s = r.surface();
        assert_eq!(s.pixel(2, 2), [255, 255, 255, 255]);
        assert_eq!(s.pixel(4, 3), [255, 255, 255, 255]);
        assert_eq!(s.pixel(5, 3), [0, 0, 0, 0]);
        assert_eq!(s.pixel(2, 4), [0, 0, 0, 0]);
        assert_eq!(s.pixel(1, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn nonzero_fill_keeps_same_direction_overlap_and_opposite_holes() {
        let mut path = rect_path(0.0, 0.0, 20.0, 20.0);
        add_rect(&mut path, [5.0, 5.0, 10.0, 10.0], true);
        add_rect(&mut path, [12.0, 12.0, 16.0, 16.0], false);
        let r = filled(20, 20, &path, Color::BLACK);
        assert_eq!(r.surface().pixel(7, 7)[3], 0);
        assert_eq!(r.surface().pixel(14, 14)[3], 255);
        assert_eq!(r.surface().pixel(1, 1)[3], 255);
    }

    #[test]
    fn translucent_fill_blends_source_over() {
        let square = rect_path(0.0, 0.0, 4.0, 4.0);
        let mut r = filled(4, 4, &square, Color::WHITE);
        r.fill_path(&square, &FillStyle::new(Color::rgba(0, 0, 0, 0.4)));
        let [red, green, blue, a] = r.surface().pixel(1, 1);
        assert_eq!(a, 255);
        for c in [red, green, blue] {
            assert_near(c, 153);
        }
    }

    #[test]
    fn clear_resets_full_bounds_and_forgets_draws() {
        let mut r = filled(8, 8, &rect_path(0.0, 0.0, 8.0, 8.0), Color::WHITE);
        assert!(!r.surface().is_transparent());
        r.clear();
        assert!(r.surface().is_transparent());
        r.fill_path(&rect_path(0.0, 0.0, 2.0, 2.0), &FillStyle::new(Color::BLACK));
        assert_eq!(r.surface().pixel(6, 6)[3], 0);
    }

    #[test]
    fn stroke_paints_outline_not_interior() {
        let mut r = Rasterizer::new(20, 20);
        r.stroke_path(
            &rect_path(4.0, 4.0, 16.0, 16.0),
            &StrokeStyle::new(Color::BLACK, 3.0),
        );
        let s = r.surface();
        assert_eq!(s.pixel(4, 10)[3], 255);
        assert_eq!(s.pixel(10, 15)[3], 255);
        assert_eq!(s.pixel(10, 10)[3], 0);
        assert_eq!(s.pixel(0, 0)[3], 0);
    }

    #[test]
    fn hairline_stroke_is_faint() {
        let mut path = BezPath::new();
        PathSink::move_to(&mut path, Vec2::new(0.0, 5.5));
        PathSink::line_to(&mut path, Vec2::new(10.0, 5.5));
        let mut r = Rasterizer::new(10, 10);
        r.stroke_path(&path, &StrokeStyle::new(Color::BLACK, 0.5));
        let a = r.surface().pixel(3, 5)[3];
        assert!(a > 0 && a < 200, "alpha {a}");
        assert_eq!(r.surface().pixel(3, 2)[3], 0);
    }

    #[test]
    fn draw_surface_composites_on_top() {
        let mut bottom = filled(4, 4, &rect_path(0.0, 0.0, 4.0, 4.0), Color::WHITE)
            .surface()
            .clone();
        let top = filled(4, 4, &rect_path(0.0, 0.0, 2.0, 4.0), Color::rgb(255, 0, 0));
        bottom.draw_surface(top.surface());
        assert_eq!(bottom.color_at(0, 0), Color::rgb(255, 0, 0));
        assert_eq!(bottom.color_at(3, 0), Color::WHITE);
    }

    #[test]
    fn blur_spreads_and_conserves_interior() {
        let r = filled(31, 31, &rect_path(10.0, 10.0, 21.0, 21.0), Color::BLACK);
        let s = r.surface();
        let b = s.blurred(2.0);
        assert!(b.pixel(8, 15)[3] > 0, "blur reaches outside the square");
        assert!(b.pixel(15, 15)[3] > 240, "center stays nearly opaque");
        assert_eq!(b.pixel(0, 0)[3], 0);
        assert_eq!(&s.blurred(0.0), s);
    }

    #[test]
    fn unpremultiplies_for_export() {
        let r = filled(1, 1, &rect_path(0.0, 0.0, 1.0, 1.0), Color::rgba(255, 0, 0, 0.5));
        let rgba = r.surface().to_rgba8();
        assert_near(rgba[0], 255);
        assert_near(rgba[3], 128);
    }
}
