use foundation::math::LonLat;

use crate::geometry::{Geometry, Line};

const EPSILON: f64 = 1e-6;

/// Meridian/parallel grid generator.
///
/// Defaults: major lines every 90° of longitude (and only the equator as a
/// major parallel) over latitudes ±90°, minor lines every 10° over ±80°, and
/// parallels sampled every 2.5° of longitude.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Graticule {
    /// `[[lon0, lat0], [lon1, lat1]]`
    pub major_extent: [[f64; 2]; 2],
    pub minor_extent: [[f64; 2]; 2],
    /// `[lon_step, lat_step]`
    pub major_step: [f64; 2],
    pub minor_step: [f64; 2],
    pub precision: f64,
}

impl Default for Graticule {
    fn default() -> Self {
        Self {
            major_extent: [[-180.0, -90.0 + EPSILON], [180.0, 90.0 - EPSILON]],
            minor_extent: [[-180.0, -80.0 - EPSILON], [180.0, 80.0 + EPSILON]],
            major_step: [90.0, 360.0],
            minor_step: [10.0, 10.0],
            precision: 2.5,
        }
    }
}

impl Graticule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid lines in order: major meridians, major parallels, minor meridians,
    /// minor parallels. Minor lines that coincide with a major line are skipped.
    pub fn lines(&self) -> Vec<Line> {
        let [[big_x0, big_y0], [big_x1, big_y1]] = self.major_extent;
        let [[x0, y0], [x1, y1]] = self.minor_extent;
        let [big_dx, big_dy] = self.major_step;
        let [dx, dy] = self.minor_step;

        let mut out = Vec::new();
        for lon in range((big_x0 / big_dx).ceil() * big_dx, big_x1, big_dx) {
            out.push(meridian(lon, big_y0, big_y1));
        }
        for lat in range((big_y0 / big_dy).ceil() * big_dy, big_y1, big_dy) {
            out.push(parallel(lat, big_x0, big_x1, self.precision));
        }
        for lon in range((x0 / dx).ceil() * dx, x1, dx) {
            if (lon % big_dx).abs() > EPSILON {
                out.push(meridian(lon, y0, y1));
            }
        }
        for lat in range((y0 / dy).ceil() * dy, y1, dy) {
            if (lat % big_dy).abs() > EPSILON {
                out.push(parallel(lat, x0, x1, self.precision));
            }
        }
        out
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::MultiLineString(self.lines())
    }
}

/// `start, start + step, ...` strictly below `stop`.
fn range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let mut out = Vec::new();
    if step <= 0.0 {
        return out;
    }
    let mut i = 0u32;
    loop {
        let v = start + step * f64::from(i);
        if v >= stop {
            break;
        }
        out.push(v);
        i += 1;
    }
    out
}

// Meridians are great circles, so sparse vertices suffice; the path
// rasterizer resamples them along the arc.
fn meridian(lon: f64, lat0: f64, lat1: f64) -> Line {
    let mut lats = range(lat0, lat1 - EPSILON, 90.0);
    lats.push(lat1);
    lats.into_iter().map(|lat| LonLat::new(lon, lat)).collect()
}

fn parallel(lat: f64, lon0: f64, lon1: f64, precision: f64) -> Line {
    let mut lons = range(lon0, lon1 - EPSILON, precision);
    lons.push(lon1);
    lons.into_iter().map(|lon| LonLat::new(lon, lat)).collect()
}
