use foundation::math::Vec2;
use vello_cpu::kurbo::{BezPath, Point};

use crate::symbology::{FillStyle, StrokeStyle};

/// Receiver of path segments in surface pixel coordinates.
pub trait PathSink {
    fn move_to(&mut self, p: Vec2);
    fn line_to(&mut self, p: Vec2);
    fn close_path(&mut self);
}

/// A drawing target in the style of a 2d canvas: build a path through
/// [`PathSink`], then fill or stroke it with an explicit style.
pub trait DrawContext: PathSink {
    /// Starts an empty path.
    fn begin_path(&mut self);
    fn fill(&mut self, style: &FillStyle);
    fn stroke(&mut self, style: &StrokeStyle);
    /// Resets the full bounds to transparent.
    fn clear(&mut self);
}

impl PathSink for BezPath {
    fn move_to(&mut self, p: Vec2) {
        BezPath::move_to(self, Point::new(p.x, p.y));
    }

    fn line_to(&mut self, p: Vec2) {
        BezPath::line_to(self, Point::new(p.x, p.y));
    }

    fn close_path(&mut self) {
        BezPath::close_path(self);
    }
}

#[cfg(test)]
mod tests {
    use super::PathSink;
    use foundation::math::Vec2;
    use vello_cpu::kurbo::{BezPath, PathEl, Point};

    #[test]
    fn sink_writes_kurbo_elements() {
        let mut path = BezPath::new();
        PathSink::move_to(&mut path, Vec2::new(0.0, 0.0));
        PathSink::line_to(&mut path, Vec2::new(1.0, 2.0));
        PathSink::close_path(&mut path);
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(1.0, 2.0)),
                PathEl::ClosePath,
            ]
        );
    }
}
