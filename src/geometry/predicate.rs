use super::Geometry;
use crate::core::{GeomResult, GeometryError};
use crate::dimension::Dimension;
use crate::matrix::IntersectionMatrix;
use crate::ops;
use crate::relate::{self, RelateEngine};

impl Geometry {
    /// DE-9IM matrix of this geometry against `other`
    pub fn relate(&self, other: &Geometry) -> GeomResult<IntersectionMatrix> {
        relate::relate(self, other)
    }

    /// DE-9IM matrix computed by a caller supplied engine
    pub fn relate_with(&self, other: &Geometry, engine: &dyn RelateEngine) -> GeomResult<IntersectionMatrix> {
        relate::relate_with(self, other, engine)
    }

    /// True if the matrix against `other` matches a 9 character pattern
    pub fn relate_pattern(&self, other: &Geometry, pattern: &str) -> GeomResult<bool> {
        self.relate(other)?.matches(pattern)
    }

    /// True if the geometries share at least one point.
    ///
    /// Generic collections are handled element by element, so unlike the other predicates
    /// this one accepts them.
    pub fn intersects(&self, other: &Geometry) -> GeomResult<bool> {
        if !self.envelope_internal().intersects(&other.envelope_internal()) {
            return Ok(false);
        }
        if self.is_rectangle() {
            return Ok(ops::rectangle_intersects(self, other));
        }
        if other.is_rectangle() {
            return Ok(ops::rectangle_intersects(other, self));
        }
        if self.is_geometry_collection() || other.is_geometry_collection() {
            for a in elements(self) {
                for b in elements(other) {
                    if a.intersects(b)? {
                        return Ok(true);
                    }
                }
            }
            return Ok(false);
        }
        Ok(self.relate(other)?.is_intersects())
    }

    pub fn disjoint(&self, other: &Geometry) -> GeomResult<bool> {
        Ok(!self.intersects(other)?)
    }

    /// True if no point of `other` lies in the exterior of this geometry and the interiors
    /// meet
    pub fn contains(&self, other: &Geometry) -> GeomResult<bool> {
        // a lower dimension geometry has no interior to hold a higher one
        if other.dimension() == Dimension::A && self.dimension() < Dimension::A {
            return Ok(false);
        }
        if other.dimension() == Dimension::L
            && self.dimension() < Dimension::L
            && other.length() > 0.0
        {
            return Ok(false);
        }
        if !self.envelope_internal().contains(&other.envelope_internal()) {
            return Ok(false);
        }
        if self.is_rectangle() {
            return Ok(ops::rectangle_contains(self, other));
        }
        Ok(self.relate(other)?.is_contains())
    }

    pub fn within(&self, other: &Geometry) -> GeomResult<bool> {
        other.contains(self)
    }

    /// True if no point of `other` lies in the exterior of this geometry
    pub fn covers(&self, other: &Geometry) -> GeomResult<bool> {
        if other.dimension() == Dimension::A && self.dimension() < Dimension::A {
            return Ok(false);
        }
        if other.dimension() == Dimension::L
            && self.dimension() < Dimension::L
            && other.length() > 0.0
        {
            return Ok(false);
        }
        if !self.envelope_internal().covers(&other.envelope_internal()) {
            return Ok(false);
        }
        if self.is_rectangle() {
            return Ok(true);
        }
        Ok(self.relate(other)?.is_covers())
    }

    pub fn covered_by(&self, other: &Geometry) -> GeomResult<bool> {
        other.covers(self)
    }

    /// True if the geometries meet only on their boundaries
    pub fn touches(&self, other: &Geometry) -> GeomResult<bool> {
        if !self.envelope_internal().intersects(&other.envelope_internal()) {
            return Ok(false);
        }
        Ok(self
            .relate(other)?
            .is_touches(self.dimension(), other.dimension()))
    }

    pub fn crosses(&self, other: &Geometry) -> GeomResult<bool> {
        if !self.envelope_internal().intersects(&other.envelope_internal()) {
            return Ok(false);
        }
        Ok(self
            .relate(other)?
            .is_crosses(self.dimension(), other.dimension()))
    }

    pub fn overlaps(&self, other: &Geometry) -> GeomResult<bool> {
        if !self.envelope_internal().intersects(&other.envelope_internal()) {
            return Ok(false);
        }
        Ok(self
            .relate(other)?
            .is_overlaps(self.dimension(), other.dimension()))
    }

    /// Point set equality
    pub fn equals_topo(&self, other: &Geometry) -> GeomResult<bool> {
        if self.envelope_internal() != other.envelope_internal() {
            return Ok(false);
        }
        Ok(self
            .relate(other)?
            .is_equals(self.dimension(), other.dimension()))
    }

    /// Minimum distance to `other`; 0 when either is empty
    pub fn distance(&self, other: &Geometry) -> f64 {
        ops::distance(self, other)
    }

    pub fn is_within_distance(&self, other: &Geometry, distance: f64) -> GeomResult<bool> {
        if distance < 0.0 {
            return Err(GeometryError::InvalidArgument(format!(
                "distance must be non-negative, got {distance}"
            )));
        }
        if self.envelope_internal().distance(&other.envelope_internal()) > distance {
            return Ok(false);
        }
        Ok(self.distance(other) <= distance)
    }
}

// Elements of a collection, or the geometry itself
fn elements(geom: &Geometry) -> Vec<&Geometry> {
    if geom.is_geometry_collection() {
        geom.geometries().iter().collect()
    } else {
        vec![geom]
    }
}

#[cfg(test)]
mod tests {
    use crate::core::GeometryError;
    use crate::factory::GeometryFactory;
    use crate::geometry::Geometry;
    use crate::serialization::parse_wkt;
    use rand::{Rng, rng};

    fn geom(wkt: &str) -> Geometry {
        parse_wkt(wkt, &GeometryFactory::default_shared()).unwrap()
    }

    #[test]
    fn test_intersects_and_disjoint() {
        let poly = geom("POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0))");
        assert!(poly.intersects(&geom("POINT (5 5)")).unwrap());
        assert!(poly.intersects(&geom("POINT (10 5)")).unwrap());
        assert!(poly.disjoint(&geom("POINT (11 5)")).unwrap());
        assert!(poly.intersects(&geom("LINESTRING (-5 5, 15 5)")).unwrap());

        let tri = geom("POLYGON ((0 0, 0 10, 10 0, 0 0))");
        assert!(!tri.intersects(&geom("POINT (8 8)")).unwrap());
        assert!(tri.intersects(&geom("LINESTRING (0 5, 5 5)")).unwrap());
    }

    #[test]
    fn test_intersects_collection() {
        let gc = geom("GEOMETRYCOLLECTION (POINT (50 50), LINESTRING (0 0, 1 1))");
        let tri = geom("POLYGON ((0 0, 0 10, 10 0, 0 0))");
        assert!(gc.intersects(&tri).unwrap());
        assert!(tri.intersects(&gc).unwrap());
        assert!(!gc.intersects(&geom("POINT (20 20)")).unwrap());
        assert!(matches!(
            gc.contains(&geom("POINT (0.5 0.5)")),
            Err(GeometryError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_contains_and_covers() {
        let square = geom("POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0))");
        let edge = geom("LINESTRING (0 0, 0 10)");
        assert!(!square.contains(&edge).unwrap());
        assert!(square.covers(&edge).unwrap());
        assert!(edge.covered_by(&square).unwrap());
        assert!(square.contains(&geom("POINT (1 1)")).unwrap());
        assert!(geom("POINT (1 1)").within(&square).unwrap());

        let tri = geom("POLYGON ((0 0, 0 10, 10 0, 0 0))");
        assert!(!tri.contains(&geom("LINESTRING (0 0, 0 10)")).unwrap());
        assert!(tri.covers(&geom("LINESTRING (0 0, 0 10)")).unwrap());
        assert!(tri.contains(&geom("POINT (1 1)")).unwrap());

        // dimension shortcut
        assert!(!geom("LINESTRING (0 0, 10 10)").contains(&square).unwrap());
        assert!(!geom("POINT (0 0)").covers(&geom("LINESTRING (0 0, 1 1)")).unwrap());
    }

    #[test]
    fn test_touches_crosses_overlaps() {
        let a = geom("POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0))");
        let b = geom("POLYGON ((10 0, 10 10, 20 10, 20 0, 10 0))");
        let c = geom("POLYGON ((5 5, 5 15, 15 15, 15 5, 5 5))");
        assert!(a.touches(&b).unwrap());
        assert!(!a.overlaps(&b).unwrap());
        assert!(a.overlaps(&c).unwrap());
        assert!(!a.touches(&c).unwrap());

        let l1 = geom("LINESTRING (0 0, 2 2)");
        let l2 = geom("LINESTRING (0 2, 2 0)");
        assert!(l1.crosses(&l2).unwrap());
        assert!(geom("LINESTRING (-5 5, 15 5)").crosses(&a).unwrap());
        assert!(!l1.touches(&l2).unwrap());
    }

    #[test]
    fn test_equals_topo() {
        let a = geom("LINESTRING (0 0, 2 2)");
        let b = geom("LINESTRING (2 2, 1 1, 0 0)");
        assert!(a.equals_topo(&b).unwrap());
        assert!(!a.equals_exact(&b));
        let p1 = geom("POLYGON ((0 0, 0 1, 1 1, 1 0, 0 0))");
        let p2 = geom("POLYGON ((1 1, 1 0, 0 0, 0 1, 1 1))");
        assert!(p1.equals_topo(&p2).unwrap());
        assert!(!p1.equals_topo(&geom("POLYGON ((0 0, 0 2, 2 2, 2 0, 0 0))")).unwrap());
    }

    #[test]
    fn test_relate_pattern() {
        let a = geom("POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0))");
        let b = geom("POINT (5 5)");
        assert!(a.relate_pattern(&b, "T*****FF*").unwrap());
        assert!(!a.relate_pattern(&b, "FF*FF****").unwrap());
        assert!(a.relate_pattern(&b, "T*").is_err());
    }

    #[test]
    fn test_distance() {
        let a = geom("POINT (0 0)");
        let b = geom("LINESTRING (3 4, 10 4)");
        assert_eq!(a.distance(&b), 5.0);
        assert!(a.is_within_distance(&b, 5.0).unwrap());
        assert!(!a.is_within_distance(&b, 4.9).unwrap());
        assert!(a.is_within_distance(&b, -1.0).is_err());
        assert_eq!(a.distance(&geom("POINT EMPTY")), 0.0);
        let poly = geom("POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0))");
        assert_eq!(poly.distance(&geom("POINT (5 5)")), 0.0);
    }

    #[test]
    fn test_random_points_in_rectangle() {
        let rect = geom("POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0))");
        let poly = geom("POLYGON ((0 0, 0 10, 10 10, 10 0, 5 -0.0000001, 0 0))");
        let mut r = rng();
        let factory = GeometryFactory::default_shared();
        for _ in 0..200 {
            let (x, y) = (r.random_range(-5.0..15.0), r.random_range(-5.0..15.0));
            let pt = factory.create_point(&crate::coordinate::Coordinate::new(x, y));
            let inside = (0.0..=10.0).contains(&x) && (0.0..=10.0).contains(&y);
            assert_eq!(rect.intersects(&pt).unwrap(), inside);
            assert_eq!(rect.intersects(&pt).unwrap(), poly.intersects(&pt).unwrap());
        }
    }
}
