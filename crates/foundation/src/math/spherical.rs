use super::Vec3;

/// Geographic coordinates in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Cartesian point on the unit sphere: x toward (0°, 0°), z toward the north pole.
    pub fn to_unit(self) -> Vec3 {
        let (sin_lat, cos_lat) = self.lat.to_radians().sin_cos();
        let (sin_lon, cos_lon) = self.lon.to_radians().sin_cos();
        Vec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    pub fn from_unit(v: Vec3) -> Self {
        let lon = v.y.atan2(v.x).to_degrees();
        let lat = v.z.clamp(-1.0, 1.0).asin().to_degrees();
        Self::new(lon, lat)
    }
}

/// Great-circle angle between two unit vectors, in radians.
pub fn angle_between(a: Vec3, b: Vec3) -> f64 {
    // atan2 of |a×b| and a·b stays accurate for tiny and near-antipodal angles.
    a.cross(b).length().atan2(a.dot(b))
}

/// Point at fraction `t` along the great-circle arc from `a` to `b`.
pub fn interpolate_arc(a: Vec3, b: Vec3, t: f64) -> Vec3 {
    let omega = angle_between(a, b);
    if omega < 1e-9 {
        return (a + (b - a) * t).normalize();
    }
    let sin_omega = omega.sin();
    if sin_omega.abs() < 1e-12 {
        // Antipodal endpoints: any great circle works, fall back to a chord.
        return (a + (b - a) * t).normalize();
    }
    let wa = ((1.0 - t) * omega).sin() / sin_omega;
    let wb = (t * omega).sin() / sin_omega;
    a * wa + b * wb
}

/// View rotation in degrees, applied as `rotate([spin, tilt])`:
/// longitudes are shifted by `spin`, then the sphere is pitched by `tilt`
/// about the y axis.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rotation {
    pub spin: f64,
    pub tilt: f64,
}

impl Rotation {
    pub const fn new(spin: f64, tilt: f64) -> Self {
        Self { spin, tilt }
    }

    pub fn apply(&self, v: Vec3) -> Vec3 {
        let (sin_s, cos_s) = self.spin.to_radians().sin_cos();
        let (sin_t, cos_t) = self.tilt.to_radians().sin_cos();
        let x = v.x * cos_s - v.y * sin_s;
        let y = v.x * sin_s + v.y * cos_s;
        let z = v.z;
        Vec3::new(x * cos_t - z * sin_t, y, z * cos_t + x * sin_t)
    }

    pub fn invert(&self, v: Vec3) -> Vec3 {
        let (sin_s, cos_s) = self.spin.to_radians().sin_cos();
        let (sin_t, cos_t) = self.tilt.to_radians().sin_cos();
        let x = v.x * cos_t + v.z * sin_t;
        let z = v.z * cos_t - v.x * sin_t;
        let y = v.y;
        Vec3::new(x * cos_s + y * sin_s, y * cos_s - x * sin_s, z)
    }
}
