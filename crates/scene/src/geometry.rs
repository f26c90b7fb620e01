use foundation::math::LonLat;

/// Open polyline of geographic positions.
pub type Line = Vec<LonLat>;
/// Closed ring; the closing vertex is implied, not repeated.
pub type Ring = Vec<LonLat>;
/// Exterior ring followed by holes. Exterior rings run clockwise when seen
/// from outside the sphere.
pub type Polygon = Vec<Ring>;

/// The whole globe outline. Has no parameters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Sphere;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Sphere,
    Line,
    Area,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere,
    MultiLineString(Vec<Line>),
    MultiPolygon(Vec<Polygon>),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Sphere => GeometryKind::Sphere,
            Geometry::MultiLineString(_) => GeometryKind::Line,
            Geometry::MultiPolygon(_) => GeometryKind::Area,
        }
    }

    pub fn vertex_count(&self) -> usize {
        match self {
            Geometry::Sphere => 0,
            Geometry::MultiLineString(lines) => lines.iter().map(Vec::len).sum(),
            Geometry::MultiPolygon(polygons) => polygons
                .iter()
                .flat_map(|rings| rings.iter())
                .map(Vec::len)
                .sum(),
        }
    }
}

impl From<Sphere> for Geometry {
    fn from(_: Sphere) -> Self {
        Geometry::Sphere
    }
}

/// Removes a trailing vertex equal to the first one (GeoJSON ring closure).
pub fn drop_closing_duplicate(points: &mut Vec<LonLat>) {
    if points.len() >= 2 {
        let first = points[0];
        let last = points[points.len() - 1];
        if (first.lon - last.lon).abs() < 1e-9 && (first.lat - last.lat).abs() < 1e-9 {
            points.pop();
        }
    }
}

/// Signed shoelace area in lon/lat degrees; positive when counterclockwise
/// with north up.
pub fn planar_area(ring: &[LonLat]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut j = n - 1;
    for i in 0..n {
        sum += ring[j].lon * ring[i].lat - ring[i].lon * ring[j].lat;
        j = i;
    }
    sum / 2.0
}

/// Reverses `ring` if needed so it runs clockwise (north up) when
/// `clockwise` is set, counterclockwise otherwise.
pub fn orient_ring(ring: &mut [LonLat], clockwise: bool) {
    let area = planar_area(ring);
    if (clockwise && area > 0.0) || (!clockwise && area < 0.0) {
        ring.reverse();
    }
}

/// Even-odd containment in plain lon/lat space, holes included.
///
/// Rings are treated as planar polygons in degrees, which matches how land
/// datasets cut polygons at the antimeridian and run polar rings along ±90°.
pub fn polygon_contains(polygon: &Polygon, p: LonLat) -> bool {
    let p = LonLat::new(wrap_longitude(p.lon), p.lat);
    let mut inside = false;
    for ring in polygon {
        if ring_crossings(ring, p) % 2 == 1 {
            inside = !inside;
        }
    }
    inside
}

fn ring_crossings(ring: &[LonLat], p: LonLat) -> usize {
    let n = ring.len();
    if n < 3 {
        return 0;
    }
    let mut crossings = 0;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.lat > p.lat) != (b.lat > p.lat) {
            let lon_at = a.lon + (p.lat - a.lat) / (b.lat - a.lat) * (b.lon - a.lon);
            if p.lon < lon_at {
                crossings += 1;
            }
        }
        j = i;
    }
    crossings
}

fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 { 180.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::{
        Geometry, GeometryKind, Sphere, drop_closing_duplicate, orient_ring, planar_area,
        polygon_contains,
    };
    use foundation::math::LonLat;

    fn square(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> Vec<LonLat> {
        vec![
            LonLat::new(lon0, lat0),
            LonLat::new(lon0, lat1),
            LonLat::new(lon1, lat1),
            LonLat::new(lon1, lat0),
        ]
    }

    #[test]
    fn sphere_converts_to_geometry() {
        let g: Geometry = Sphere.into();
        assert_eq!(g.kind(), GeometryKind::Sphere);
        assert_eq!(g.vertex_count(), 0);
    }

    #[test]
    fn drops_repeated_first_vertex() {
        let mut ring = square(0.0, 0.0, 1.0, 1.0);
        ring.push(LonLat::new(0.0, 0.0));
        drop_closing_duplicate(&mut ring);
        assert_eq!(ring.len(), 4);
        drop_closing_duplicate(&mut ring);
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn contains_respects_holes() {
        let polygon = vec![square(-10.0, -10.0, 10.0, 10.0), square(-2.0, -2.0, 2.0, 2.0)];
        assert!(polygon_contains(&polygon, LonLat::new(5.0, 5.0)));
        assert!(!polygon_contains(&polygon, LonLat::new(0.0, 0.0)));
        assert!(!polygon_contains(&polygon, LonLat::new(20.0, 0.0)));
    }

    #[test]
    fn contains_wraps_longitude() {
        let polygon = vec![square(170.0, -5.0, 180.0, 5.0)];
        assert!(polygon_contains(&polygon, LonLat::new(-185.0, 0.0)));
    }

    #[test]
    fn orients_rings_by_planar_area() {
        let mut ring = square(0.0, 0.0, 2.0, 2.0);
        assert_eq!(planar_area(&ring), -4.0);
        orient_ring(&mut ring, true);
        assert_eq!(ring[1], LonLat::new(0.0, 2.0));
        orient_ring(&mut ring, false);
        assert_eq!(planar_area(&ring), 4.0);
    }
}
