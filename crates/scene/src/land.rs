use foundation::math::LonLat;

use crate::geometry::{Geometry, Polygon, drop_closing_duplicate, orient_ring, polygon_contains};

/// Landmass boundary extracted once from the world dataset.
///
/// Always holds a `Geometry::MultiPolygon`; degenerate rings (fewer than three
/// distinct vertices) are dropped at construction, and a polygon whose
/// exterior is degenerate is dropped with its holes. Exterior rings are turned
/// clockwise and holes counterclockwise, so data wound either way fills the
/// same under the nonzero rule.
#[derive(Debug, Clone, PartialEq)]
pub struct LandGeometry {
    geometry: Geometry,
}

impl LandGeometry {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let polygons = polygons
            .into_iter()
            .filter_map(|rings| {
                let mut rings = rings.into_iter().map(|mut ring| {
                    drop_closing_duplicate(&mut ring);
                    ring
                });
                // Holes mean nothing without their exterior.
                let mut exterior = rings.next().filter(|ring| ring.len() >= 3)?;
                orient_ring(&mut exterior, true);
                let mut polygon: Polygon = vec![exterior];
                polygon.extend(rings.filter(|ring| ring.len() >= 3).map(|mut hole| {
                    orient_ring(&mut hole, false);
                    hole
                }));
                Some(polygon)
            })
            .collect();
        Self {
            geometry: Geometry::MultiPolygon(polygons),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn polygons(&self) -> &[Polygon] {
        match &self.geometry {
            Geometry::MultiPolygon(polygons) => polygons,
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons().is_empty()
    }

    pub fn contains(&self, p: LonLat) -> bool {
        self.polygons().iter().any(|polygon| polygon_contains(polygon, p))
    }
}

#[cfg(test)]
mod tests {
    use super::LandGeometry;
    use crate::geometry::{GeometryKind, planar_area};
    use foundation::math::LonLat;

    #[test]
    fn strips_closure_and_degenerate_rings() {
        let land = LandGeometry::new(vec![
            vec![vec![
                LonLat::new(0.0, 0.0),
                LonLat::new(0.0, 10.0),
                LonLat::new(10.0, 10.0),
                LonLat::new(10.0, 0.0),
                LonLat::new(0.0, 0.0),
            ]],
            vec![vec![LonLat::new(50.0, 50.0), LonLat::new(51.0, 50.0)]],
        ]);
        assert_eq!(land.polygons().len(), 1);
        assert_eq!(land.polygons()[0][0].len(), 4);
        assert_eq!(land.geometry().kind(), GeometryKind::Area);
    }

    #[test]
    fn contains_checks_every_polygon() {
        let land = LandGeometry::new(vec![vec![vec![
            LonLat::new(-5.0, -5.0),
            LonLat::new(-5.0, 5.0),
            LonLat::new(5.0, 5.0),
            LonLat::new(5.0, -5.0),
        ]]]);
        assert!(land.contains(LonLat::new(0.0, 0.0)));
        assert!(!land.contains(LonLat::new(90.0, 0.0)));
        assert!(LandGeometry::new(Vec::new()).is_empty());
    }

    #[test]
    fn normalizes_winding() {
        // Counterclockwise exterior with a clockwise hole, as RFC 7946 writes them.
        let land = LandGeometry::new(vec![vec![
            vec![
                LonLat::new(0.0, 0.0),
                LonLat::new(10.0, 0.0),
                LonLat::new(10.0, 10.0),
                LonLat::new(0.0, 10.0),
            ],
            vec![
                LonLat::new(4.0, 4.0),
                LonLat::new(4.0, 6.0),
                LonLat::new(6.0, 6.0),
                LonLat::new(6.0, 4.0),
            ],
        ]]);
        let polygon = &land.polygons()[0];
        assert!(planar_area(&polygon[0]) < 0.0);
        assert!(planar_area(&polygon[1]) > 0.0);
    }

    #[test]
    fn degenerate_exterior_drops_its_holes() {
        let land = LandGeometry::new(vec![
            vec![
                vec![LonLat::new(0.0, 0.0), LonLat::new(10.0, 0.0), LonLat::new(0.0, 0.0)],
                vec![
                    LonLat::new(4.0, 4.0),
                    LonLat::new(4.0, 6.0),
                    LonLat::new(6.0, 6.0),
                    LonLat::new(6.0, 4.0),
                ],
            ],
            vec![vec![
                LonLat::new(20.0, 0.0),
                LonLat::new(20.0, 5.0),
                LonLat::new(25.0, 5.0),
                LonLat::new(25.0, 0.0),
            ]],
        ]);
        assert_eq!(land.polygons().len(), 1);
        assert_eq!(land.polygons()[0].len(), 1);
        assert!(!land.contains(LonLat::new(5.0, 5.0)));
        assert!(land.contains(LonLat::new(22.0, 2.0)));
    }
}
