//! The animated globe.
//!
//! Three layers, bottom to top: a static base disc, a blurred shadow of the
//! land and the graticule, and a sharp foreground with the land fill. Every
//! tick clears and redraws the two dynamic layers. The foreground gets the
//! land twice: first under a wide clip angle in the limb tone, then under the
//! regular hemisphere in the land tone. What survives of the first fill is a
//! thin shaded band along the rim.

use foundation::math::{OrthographicProjection, ProjectionFrame};
use foundation::time::Timestamp;
use formats::{DatasetError, WorldDataset};
use layers::{
    DrawContext, FillStyle, GeoPath, LayerRole, LayerStack, LayerTargets, StrokeStyle, Surface,
};
use runtime::{
    AnimationClock, EVENT_CLEAR, EVENT_DRAW, EVENT_LIFECYCLE, EVENT_SETUP_FAILURE, EventBus,
    Frame, Lifecycle,
};
use scene::{Geometry, Graticule, LandGeometry};
use tracing::{debug, error, info, trace};

use crate::config::{GlobeConfig, GlobeStyles};
use crate::error::GlobeError;
use crate::static_scene::StaticSceneBuilder;

pub const LAYER_COUNT: usize = 3;

/// The globe state plus the layers it draws into. `T` is the drawing target:
/// the CPU [`LayerStack`] by default, or any host surface set that hands out
/// a [`DrawContext`] per role.
#[derive(Debug)]
pub struct Globe<T: LayerTargets = LayerStack> {
    config: GlobeConfig,
    styles: GlobeStyles,
    projection: OrthographicProjection,
    graticule: Geometry,
    layers: T,
    clock: AnimationClock,
    lifecycle: Lifecycle,
    land: Option<LandGeometry>,
    last_frame: Option<Frame>,
    events: EventBus,
}

impl Globe<LayerStack> {
    /// Sets the globe up on freshly created CPU layers.
    pub fn setup(config: GlobeConfig, start: Timestamp) -> Result<Self, GlobeError> {
        config.validate()?;
        let layers =
            LayerStack::create_layers(LAYER_COUNT, config.width, config.height, config.shadow_blur);
        Self::setup_with(config, start, layers)
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    /// All layers flattened with their effects, as the viewer sees them.
    pub fn composite(&self) -> Surface {
        self.layers.composite()
    }
}

impl<T: LayerTargets> Globe<T> {
    /// Builds projection and graticule, draws the base layer of `layers` once
    /// and waits for the dataset. `start` anchors the spin clock.
    pub fn setup_with(
        config: GlobeConfig,
        start: Timestamp,
        mut layers: T,
    ) -> Result<Self, GlobeError> {
        config.validate()?;
        let styles = config.styles()?;
        let projection = OrthographicProjection::configure(config.translate(), config.precision);

        let base = layer_context(&mut layers, LayerRole::Base)?;
        StaticSceneBuilder::new(
            config.sphere_frame.frame(config.width),
            styles.sphere_stroke,
            styles.sphere_fill,
        )
        .build(base, &projection);

        let mut events = EventBus::new();
        events.emit_at(0, EVENT_DRAW, "base: sphere");
        info!(
            width = config.width,
            height = config.height,
            dataset = %config.dataset_url,
            "globe set up, waiting for land"
        );

        Ok(Self {
            clock: AnimationClock::new(start, config.rotation_speed, config.tilt),
            graticule: Graticule::new().geometry(),
            config,
            styles,
            projection,
            layers,
            lifecycle: Lifecycle::default(),
            land: None,
            last_frame: None,
            events,
        })
    }

    /// Settles the one dataset load. Only the first completion counts; a
    /// failure is reported once and leaves the globe loading for good.
    pub fn dataset_loaded(
        &mut self,
        result: Result<WorldDataset, DatasetError>,
    ) -> Result<(), GlobeError> {
        if !self.lifecycle.is_pending() {
            debug!(state = self.lifecycle.name(), "ignoring repeated dataset completion");
            return Ok(());
        }
        let land = result.and_then(|dataset| dataset.extract(&self.config.land_object));
        match land {
            Ok(land) => {
                info!(
                    polygons = land.polygons().len(),
                    vertices = land.geometry().vertex_count(),
                    "land loaded, globe running"
                );
                self.land = Some(land);
                self.lifecycle.start();
                self.events.emit_at(0, EVENT_LIFECYCLE, self.lifecycle.name());
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "world dataset failed to load");
                self.lifecycle.fail();
                self.events.emit_at(0, EVENT_SETUP_FAILURE, e.to_string());
                Err(GlobeError::Setup(e))
            }
        }
    }

    /// Redraws the dynamic layers for `now`. Outside `Running` nothing is
    /// touched and `NotRunning` is returned.
    pub fn tick(&mut self, now: Timestamp) -> Result<Frame, GlobeError> {
        if !self.lifecycle.is_running() {
            return Err(GlobeError::NotRunning(self.lifecycle));
        }
        let Some(land) = self.land.as_ref() else {
            return Err(GlobeError::NotRunning(self.lifecycle));
        };
        let frame = match self.last_frame {
            Some(previous) => previous.next(now),
            None => Frame::new(0, now),
        };
        let width = self.config.width;

        for role in [LayerRole::Shadow, LayerRole::Foreground] {
            layer_context(&mut self.layers, role)?.clear();
            self.events.emit(frame, EVENT_CLEAR, role.name());
        }

        let rotation = self.clock.rotation_at(now);
        self.projection.rotate(rotation.spin, rotation.tilt);
        let projection = &self.projection;
        let styles = &self.styles;

        let shadow_frame = self.config.shadow_frame.frame(width);
        let shadow = layer_context(&mut self.layers, LayerRole::Shadow)?;
        fill_geometry(shadow, projection, &shadow_frame, land.geometry(), &styles.shadow_fill);
        self.events.emit(frame, EVENT_DRAW, "shadow: land");
        stroke_geometry(shadow, projection, &shadow_frame, &self.graticule, &styles.grid_stroke);
        self.events.emit(frame, EVENT_DRAW, "shadow: graticule");

        let wide_frame = self.config.wide_frame.frame(width);
        let narrow_frame = self.config.narrow_frame.frame(width);
        let foreground = layer_context(&mut self.layers, LayerRole::Foreground)?;
        fill_geometry(foreground, projection, &wide_frame, land.geometry(), &styles.limb_fill);
        self.events.emit(frame, EVENT_DRAW, "foreground: limb");
        fill_geometry(foreground, projection, &narrow_frame, land.geometry(), &styles.land_fill);
        self.events.emit(frame, EVENT_DRAW, "foreground: land");

        trace!(
            frame = frame.index,
            now = now.millis(),
            spin = rotation.spin,
            tilt = rotation.tilt,
            "globe tick"
        );
        self.last_frame = Some(frame);
        Ok(frame)
    }

    /// Height the host should give the outer frame.
    pub fn frame_height(&self) -> u32 {
        self.config.height
    }

    pub fn state(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn projection(&self) -> &OrthographicProjection {
        &self.projection
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn land(&self) -> Option<&LandGeometry> {
        self.land.as_ref()
    }

    pub fn targets(&self) -> &T {
        &self.layers
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }
}

fn layer_context<T: LayerTargets>(
    layers: &mut T,
    role: LayerRole,
) -> Result<&mut T::Context, GlobeError> {
    layers
        .context(role)
        .ok_or(GlobeError::MissingLayer(role.name()))
}

fn fill_geometry<C: DrawContext>(
    ctx: &mut C,
    projection: &OrthographicProjection,
    frame: &ProjectionFrame,
    geometry: &Geometry,
    style: &FillStyle,
) {
    ctx.begin_path();
    GeoPath::bind(ctx).draw(projection, frame, geometry);
    ctx.fill(style);
}

fn stroke_geometry<C: DrawContext>(
    ctx: &mut C,
    projection: &OrthographicProjection,
    frame: &ProjectionFrame,
    geometry: &Geometry,
    style: &StrokeStyle,
) {
    ctx.begin_path();
    GeoPath::bind(ctx).draw(projection, frame, geometry);
    ctx.stroke(style);
}
