use foundation::math::{OrthographicProjection, ProjectionFrame};
use layers::{DrawContext, FillStyle, GeoPath, StrokeStyle};
use scene::{Geometry, Sphere};

/// Draws the permanent backdrop: a filled disc with a dark rim.
///
/// The rim is stroked first and the disc filled over it, so only the outer
/// half of the stroke stays visible.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StaticSceneBuilder {
    pub frame: ProjectionFrame,
    pub stroke: StrokeStyle,
    pub fill: FillStyle,
}

impl StaticSceneBuilder {
    pub fn new(frame: ProjectionFrame, stroke: StrokeStyle, fill: FillStyle) -> Self {
        Self {
            frame,
            stroke,
            fill,
        }
    }

    pub fn build<C: DrawContext + ?Sized>(&self, ctx: &mut C, projection: &OrthographicProjection) {
        let sphere = Geometry::from(Sphere);

        ctx.begin_path();
        GeoPath::bind(ctx).draw(projection, &self.frame, &sphere);
        ctx.stroke(&self.stroke);

        ctx.begin_path();
        GeoPath::bind(ctx).draw(projection, &self.frame, &sphere);
        ctx.fill(&self.fill);
    }
}

#[cfg(test)]
mod tests {
    use super::StaticSceneBuilder;
    use foundation::math::{OrthographicProjection, ProjectionFrame, Vec2};
    use layers::{Color, DrawContext, FillStyle, LayerContext, StrokeStyle};

    fn builder() -> StaticSceneBuilder {
        StaticSceneBuilder::new(
            ProjectionFrame::new(40.0, 90.0),
            StrokeStyle::new(Color::BLACK, 3.0),
            FillStyle::new(Color::WHITE),
        )
    }

    #[test]
    fn draws_white_disc_with_black_rim() {
        let projection = OrthographicProjection::configure(Vec2::new(50.0, 50.0), 0.5);
        let mut ctx = LayerContext::new(100, 100);
        builder().build(&mut ctx, &projection);
        let surface = ctx.surface();
        assert_eq!(surface.color_at(50, 50), Color::WHITE);
        assert_eq!(surface.color_at(50 + 35, 50), Color::WHITE);
        // Pixel center 40.5 px from the middle: on the outer half of the rim.
        let rim = surface.pixel(50 + 40, 50);
        assert!(rim[3] > 200 && rim[0] < 10, "{rim:?}");
        assert_eq!(surface.pixel(50 + 45, 50)[3], 0);
    }

    #[test]
    fn building_twice_is_pixel_identical() {
        let projection = OrthographicProjection::configure(Vec2::new(50.0, 50.0), 0.5);
        let mut a = LayerContext::new(100, 100);
        let mut b = LayerContext::new(100, 100);
        builder().build(&mut a, &projection);
        builder().build(&mut b, &projection);
        assert_eq!(a.surface(), b.surface());
    }

    #[test]
    fn rebuilding_after_clear_matches_a_fresh_build() {
        let projection = OrthographicProjection::configure(Vec2::new(50.0, 50.0), 0.5);
        let mut fresh = LayerContext::new(100, 100);
        builder().build(&mut fresh, &projection);
        let mut reused = LayerContext::new(100, 100);
        builder().build(&mut reused, &projection);
        reused.clear();
        builder().build(&mut reused, &projection);
        assert_eq!(fresh.surface(), reused.surface());
    }
}
