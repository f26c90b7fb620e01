//! Geographic path generation.
//!
//! [`GeoPath`] turns a [`Geometry`] into move/line/close commands on whatever
//! [`PathSink`] it is bound to. Edges are walked as great-circle arcs and
//! resampled so the projected chords stay within the projection precision.
//! Anything beyond the frame's clip angle is cut away; polygon pieces are
//! stitched back together along the clip circle so they stay fillable.

use std::f64::consts::TAU;

use foundation::math::{
    LonLat, OrthographicProjection, ProjectionFrame, Vec3, angle_between, interpolate_arc,
};
use scene::{Geometry, Polygon, polygon_contains};

use crate::path::PathSink;

// Entry and exit closer than this (radians along the circle) form a spike
// with no area.
const SPIKE_EPSILON: f64 = 1e-9;

/// Path generator bound to exactly one sink at a time.
pub struct GeoPath<'a, S: PathSink + ?Sized> {
    sink: &'a mut S,
}

impl<'a, S: PathSink + ?Sized> GeoPath<'a, S> {
    pub fn bind(sink: &'a mut S) -> Self {
        Self { sink }
    }

    /// Emits the clipped outline of `geometry` and returns the number of
    /// subpaths written. Never fills or strokes.
    pub fn draw(
        &mut self,
        projection: &OrthographicProjection,
        frame: &ProjectionFrame,
        geometry: &Geometry,
    ) -> usize {
        let cap = Cap::new(projection, frame);
        let mut emitted = 0;
        match geometry {
            Geometry::Sphere => {
                self.emit(projection, frame, &cap.circle(), true);
                emitted += 1;
            }
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    let view: Vec<Vec3> = line.iter().map(|&p| projection.view_point(p)).collect();
                    for run in cap.clip_line(&view) {
                        self.emit(projection, frame, &run, false);
                        emitted += 1;
                    }
                }
            }
            Geometry::MultiPolygon(polygons) => {
                for polygon in polygons {
                    for ring in cap.clip_polygon(projection, polygon) {
                        self.emit(projection, frame, &ring, true);
                        emitted += 1;
                    }
                }
            }
        }
        emitted
    }

    fn emit(
        &mut self,
        projection: &OrthographicProjection,
        frame: &ProjectionFrame,
        points: &[Vec3],
        closed: bool,
    ) {
        let mut iter = points.iter();
        let Some(&first) = iter.next() else {
            return;
        };
        self.sink.move_to(projection.to_screen(first, frame));
        for &p in iter {
            self.sink.line_to(projection.to_screen(p, frame));
        }
        if closed {
            self.sink.close_path();
        }
    }
}

enum RingClip {
    Inside(Vec<Vec3>),
    Outside,
    Crossing(Vec<Vec<Vec3>>),
}

/// Visible cap in view space: points with `x > cos`.
struct Cap {
    cos: f64,
    sin: f64,
    step: f64,
}

impl Cap {
    fn new(projection: &OrthographicProjection, frame: &ProjectionFrame) -> Self {
        let cos = frame.clip_cos();
        Self {
            cos,
            sin: (1.0 - cos * cos).max(0.0).sqrt(),
            step: projection.resample_step(frame),
        }
    }

    fn visible(&self, v: Vec3) -> bool {
        v.x > self.cos
    }

    fn on_circle(&self, theta: f64) -> Vec3 {
        let (sin_t, cos_t) = theta.sin_cos();
        Vec3::new(self.cos, self.sin * cos_t, self.sin * sin_t)
    }

    /// Full clip circle, clockwise as seen from outside the sphere.
    fn circle(&self) -> Vec<Vec3> {
        let n = (TAU / self.step).ceil().max(4.0) as usize;
        (0..n)
            .map(|k| self.on_circle(-TAU * k as f64 / n as f64))
            .collect()
    }

    /// Clockwise arc from `from` to `to`, both ends excluded.
    fn arc(&self, from: f64, to: f64, out: &mut Vec<Vec3>) {
        let sweep = (from - to).rem_euclid(TAU);
        let n = (sweep / self.step).ceil() as usize;
        for k in 1..n {
            out.push(self.on_circle(from - sweep * k as f64 / n as f64));
        }
    }

    /// Point where the arc `a`→`b` meets the clip circle; exactly one of the
    /// two endpoints is visible.
    fn crossing(&self, a: Vec3, b: Vec3) -> Vec3 {
        let fa = a.x - self.cos;
        let fb = b.x - self.cos;
        let t = (fa / (fa - fb)).clamp(0.0, 1.0);
        let q = interpolate_arc(a, b, t);
        let r = (q.y * q.y + q.z * q.z).sqrt();
        if r < 1e-12 {
            return q;
        }
        Vec3::new(self.cos, self.sin * q.y / r, self.sin * q.z / r)
    }

    fn densify(&self, points: &[Vec3], closed: bool) -> Vec<Vec3> {
        let n = points.len();
        let mut out = Vec::with_capacity(n);
        if n == 0 {
            return out;
        }
        let edges = if closed { n } else { n - 1 };
        out.push(points[0]);
        for i in 0..edges {
            let a = points[i];
            let b = points[(i + 1) % n];
            let steps = (angle_between(a, b) / self.step).ceil() as usize;
            for k in 1..steps {
                out.push(interpolate_arc(a, b, k as f64 / steps as f64));
            }
            if i + 1 < n {
                out.push(b);
            }
        }
        out
    }

    fn clip_line(&self, points: &[Vec3]) -> Vec<Vec<Vec3>> {
        let pts = self.densify(points, false);
        let (Some(&first), Some(&last)) = (pts.first(), pts.last()) else {
            return Vec::new();
        };

        let mut runs = Vec::new();
        let mut current = Vec::new();
        if self.visible(first) {
            current.push(first);
        }
        for pair in pts.windows(2) {
            self.advance(pair[0], pair[1], &mut current, &mut runs);
        }
        if !current.is_empty() {
            runs.push(current);
        }

        // A closed line whose seam is visible becomes one run.
        let closed = pts.len() > 2 && angle_between(first, last) < SPIKE_EPSILON;
        if closed && runs.len() > 1 && self.visible(first) && self.visible(last) {
            let head = runs.remove(0);
            if let Some(tail) = runs.last_mut() {
                tail.extend(head.into_iter().skip(1));
            }
        }
        runs.retain(|run| run.len() >= 2);
        runs
    }

    fn clip_ring(&self, points: &[Vec3]) -> RingClip {
        let pts = self.densify(points, true);
        let Some(start) = pts.iter().position(|&p| !self.visible(p)) else {
            return RingClip::Inside(pts);
        };
        if pts.iter().all(|&p| !self.visible(p)) {
            return RingClip::Outside;
        }

        // Starting on a hidden vertex means every run is bounded by crossings.
        let n = pts.len();
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for i in 1..=n {
            let a = pts[(start + i - 1) % n];
            let b = pts[(start + i) % n];
            self.advance(a, b, &mut current, &mut runs);
        }
        RingClip::Crossing(runs)
    }

    fn advance(&self, a: Vec3, b: Vec3, current: &mut Vec<Vec3>, runs: &mut Vec<Vec<Vec3>>) {
        match (self.visible(a), self.visible(b)) {
            (true, true) => current.push(b),
            (false, true) => {
                current.push(self.crossing(a, b));
                current.push(b);
            }
            (true, false) => {
                current.push(self.crossing(a, b));
                runs.push(std::mem::take(current));
            }
            (false, false) => {}
        }
    }

    fn clip_polygon(
        &self,
        projection: &OrthographicProjection,
        polygon: &Polygon,
    ) -> Vec<Vec<Vec3>> {
        let mut rings = Vec::new();
        let mut runs: Vec<Vec<Vec3>> = Vec::new();
        for ring in polygon {
            if ring.len() < 3 {
                continue;
            }
            let view: Vec<Vec3> = ring.iter().map(|&p| projection.view_point(p)).collect();
            match self.clip_ring(&view) {
                RingClip::Inside(points) => rings.push(points),
                RingClip::Outside => {}
                RingClip::Crossing(pieces) => runs.extend(pieces),
            }
        }
        runs.retain(|run| run.len() >= 2 && !self.is_spike(run));

        if runs.is_empty() {
            if self.cap_inside(projection, polygon) {
                rings.insert(0, self.circle());
            }
        } else {
            rings.extend(self.rejoin(&runs));
        }
        rings
    }

    /// A run that leaves the cap where it entered, retracing its own path,
    /// bounds no area.
    fn is_spike(&self, run: &[Vec3]) -> bool {
        let (Some(&a), Some(&b)) = (run.first(), run.last()) else {
            return true;
        };
        angle_between(a, b) < SPIKE_EPSILON && (run.len() <= 3 || is_retraced(run))
    }

    /// Whether the whole cap lies inside a polygon none of whose rings cross
    /// the clip circle.
    fn cap_inside(&self, projection: &OrthographicProjection, polygon: &Polygon) -> bool {
        let rim_point = projection.rotation().invert(self.on_circle(0.0));
        polygon_contains(polygon, LonLat::from_unit(rim_point))
    }

    /// Joins runs into closed rings: from each exit, walk the clip circle
    /// clockwise to the nearest entry that is still open.
    fn rejoin(&self, runs: &[Vec<Vec3>]) -> Vec<Vec<Vec3>> {
        let entries: Vec<f64> = runs.iter().map(|r| circle_angle(r[0])).collect();
        let exits: Vec<f64> = runs.iter().map(|r| circle_angle(r[r.len() - 1])).collect();
        let mut used = vec![false; runs.len()];
        let mut rings = Vec::new();

        for first in 0..runs.len() {
            if used[first] {
                continue;
            }
            let mut ring = Vec::new();
            let mut j = first;
            loop {
                used[j] = true;
                ring.extend_from_slice(&runs[j]);
                let exit = exits[j];
                let next = (0..runs.len())
                    .filter(|&k| k == first || !used[k])
                    .min_by(|&a, &b| {
                        let da = (exit - entries[a]).rem_euclid(TAU);
                        let db = (exit - entries[b]).rem_euclid(TAU);
                        da.total_cmp(&db)
                    });
                let Some(k) = next else {
                    break;
                };
                self.arc(exit, entries[k], &mut ring);
                if k == first {
                    break;
                }
                j = k;
            }
            rings.push(ring);
        }
        rings
    }
}

fn circle_angle(v: Vec3) -> f64 {
    v.z.atan2(v.y)
}

fn is_retraced(run: &[Vec3]) -> bool {
    let n = run.len();
    (0..n / 2).all(|i| angle_between(run[i], run[n - 1 - i]) < 1e-6)
}

#[cfg(test)]
mod tests {
    use super::GeoPath;
    use crate::raster::{Rasterizer, Surface};
    use crate::symbology::{Color, FillStyle};
    use foundation::math::{LonLat, OrthographicProjection, ProjectionFrame, Vec2};
    use scene::Geometry;
    use vello_cpu::kurbo::{BezPath, PathEl};

    const CENTER: Vec2 = Vec2::new(100.0, 100.0);

    fn projection() -> OrthographicProjection {
        OrthographicProjection::configure(CENTER, 0.5)
    }

    // Clockwise in lon/lat with north up.
    fn square(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> Vec<LonLat> {
        vec![
            LonLat::new(lon0, lat0),
            LonLat::new(lon0, lat1),
            LonLat::new(lon1, lat1),
            LonLat::new(lon1, lat0),
        ]
    }

    /// One polyline per subpath, with its closed flag.
    struct Subpath {
        points: Vec<Vec2>,
        closed: bool,
    }

    fn subpaths(path: &BezPath) -> Vec<Subpath> {
        let mut out: Vec<Subpath> = Vec::new();
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => out.push(Subpath {
                    points: vec![Vec2::new(p.x, p.y)],
                    closed: false,
                }),
                PathEl::LineTo(p) => {
                    if let Some(sub) = out.last_mut() {
                        sub.points.push(Vec2::new(p.x, p.y));
                    }
                }
                PathEl::ClosePath => {
                    if let Some(sub) = out.last_mut() {
                        sub.closed = true;
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn draw(
        projection: &OrthographicProjection,
        frame: ProjectionFrame,
        geometry: &Geometry,
    ) -> BezPath {
        let mut path = BezPath::new();
        GeoPath::bind(&mut path).draw(projection, &frame, geometry);
        path
    }

    fn filled(path: &BezPath) -> Surface {
        let mut raster = Rasterizer::new(200, 200);
        raster.fill_path(path, &FillStyle::new(Color::BLACK));
        raster.surface().clone()
    }

    fn max_radius(path: &BezPath) -> f64 {
        subpaths(path)
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|p| p.distance(CENTER))
            .fold(0.0, f64::max)
    }

    #[test]
    fn sphere_is_the_clip_circle() {
        let path = draw(&projection(), ProjectionFrame::new(50.0, 90.0), &Geometry::Sphere);
        let subs = subpaths(&path);
        assert_eq!(subs.len(), 1);
        assert!(subs[0].closed);
        assert!(subs[0].points.len() >= 16);
        for p in &subs[0].points {
            assert!((p.distance(CENTER) - 50.0).abs() < 1e-9);
        }
        let surface = filled(&path);
        assert_eq!(surface.pixel(100, 100)[3], 255);
        assert_eq!(surface.pixel(100, 155)[3], 0);
    }

    #[test]
    fn front_polygon_is_emitted_whole() {
        let geometry = Geometry::MultiPolygon(vec![vec![square(-10.0, -10.0, 10.0, 10.0)]]);
        let path = draw(&projection(), ProjectionFrame::new(50.0, 90.0), &geometry);
        let subs = subpaths(&path);
        assert_eq!(subs.len(), 1);
        assert!(subs[0].closed);
        assert!(max_radius(&path) < 50.0 * 0.25);
        assert_eq!(filled(&path).pixel(100, 100)[3], 255);
    }

    #[test]
    fn back_polygon_is_hidden_unless_clip_reaches_it() {
        let geometry = Geometry::MultiPolygon(vec![vec![square(150.0, -5.0, 160.0, 5.0)]]);
        let p = projection();
        let hidden = draw(&p, ProjectionFrame::new(50.0, 90.0), &geometry);
        assert!(hidden.elements().is_empty());
        let wide = draw(&p, ProjectionFrame::new(50.0, 179.0), &geometry);
        assert_eq!(subpaths(&wide).len(), 1);
    }

    #[test]
    fn limb_crossing_polygon_is_closed_along_the_rim() {
        let geometry = Geometry::MultiPolygon(vec![vec![square(60.0, -10.0, 120.0, 10.0)]]);
        let path = draw(&projection(), ProjectionFrame::new(50.0, 90.0), &geometry);
        let subs = subpaths(&path);
        assert_eq!(subs.len(), 1);
        assert!(subs[0].closed);
        let radius = max_radius(&path);
        assert!((radius - 50.0).abs() < 1e-6, "radius {radius}");

        let surface = filled(&path);
        // lon 80 on the equator projects to x = 100 + 50 sin 80°.
        assert_eq!(surface.pixel(148, 100)[3], 255);
        assert_eq!(surface.pixel(130, 100)[3], 0);
        assert_eq!(surface.pixel(100, 100)[3], 0);
    }

    #[test]
    fn polygon_around_the_cap_fills_the_whole_disc() {
        let mut p = projection();
        // Looking straight at the south pole.
        p.rotate(0.0, 90.0);
        let geometry = Geometry::MultiPolygon(vec![vec![vec![
            LonLat::new(-180.0, -60.0),
            LonLat::new(180.0, -60.0),
            LonLat::new(180.0, -90.0),
            LonLat::new(-180.0, -90.0),
        ]]]);
        let frame = ProjectionFrame::new(50.0, 20.0);
        let path = draw(&p, frame, &geometry);
        let subs = subpaths(&path);
        assert_eq!(subs.len(), 1);
        let expected = 50.0 * 20f64.to_radians().sin();
        for point in &subs[0].points {
            assert!((point.distance(CENTER) - expected).abs() < 1e-6);
        }
        assert_eq!(filled(&path).pixel(100, 100)[3], 255);
    }

    #[test]
    fn hole_is_left_unfilled() {
        let mut hole = square(-5.0, -5.0, 5.0, 5.0);
        hole.reverse();
        let geometry = Geometry::MultiPolygon(vec![vec![square(-30.0, -30.0, 30.0, 30.0), hole]]);
        let path = draw(&projection(), ProjectionFrame::new(50.0, 90.0), &geometry);
        let surface = filled(&path);
        assert_eq!(surface.pixel(100, 100)[3], 0);
        assert_eq!(surface.pixel(115, 100)[3], 255);
    }

    #[test]
    fn open_lines_are_cut_at_the_limb() {
        let equator: Vec<LonLat> = (0..=36)
            .map(|i| LonLat::new(-180.0 + 10.0 * i as f64, 0.0))
            .collect();
        let geometry = Geometry::MultiLineString(vec![equator]);

        let path = draw(&projection(), ProjectionFrame::new(50.0, 90.0), &geometry);
        let subs = subpaths(&path);
        assert_eq!(subs.len(), 1);
        assert!(!subs[0].closed);
        let ends = [subs[0].points[0], subs[0].points[subs[0].points.len() - 1]];
        for end in ends {
            assert!((end.distance(CENTER) - 50.0).abs() < 1e-6);
        }

        // With the seam in view, the two visible pieces become one.
        let mut turned = projection();
        turned.rotate(180.0, 0.0);
        let path = draw(&turned, ProjectionFrame::new(50.0, 90.0), &geometry);
        assert_eq!(subpaths(&path).len(), 1);
    }

    #[test]
    fn fully_hidden_line_emits_nothing() {
        let line = vec![LonLat::new(150.0, 0.0), LonLat::new(170.0, 10.0)];
        let geometry = Geometry::MultiLineString(vec![line]);
        let mut path = BezPath::new();
        let count = GeoPath::bind(&mut path).draw(
            &projection(),
            &ProjectionFrame::new(50.0, 90.0),
            &geometry,
        );
        assert_eq!(count, 0);
        assert!(path.elements().is_empty());
    }
}
