use std::cmp::Ordering;

use super::{Geometry, GeometryKind};
use crate::coordinate::Coordinate;
use crate::coordinate_arrays;
use crate::ops;
use crate::sequence::{CoordinateSequence, CoordinateSequenceComparator};

impl Geometry {
    /// Structural equality: same type and identical vertices in stored order
    pub fn equals_exact(&self, other: &Geometry) -> bool {
        std::ptr::eq(self, other) || self.equals_exact_tolerance(other, 0.0)
    }

    /// Structural equality allowing each vertex pair to be up to `tolerance` apart
    pub fn equals_exact_tolerance(&self, other: &Geometry, tolerance: f64) -> bool {
        if self.geometry_type() != other.geometry_type() {
            return false;
        }
        match (&self.kind, &other.kind) {
            (GeometryKind::Point(a), GeometryKind::Point(b))
            | (GeometryKind::LineString(a), GeometryKind::LineString(b))
            | (GeometryKind::LinearRing(a), GeometryKind::LinearRing(b)) => {
                sequences_equal(a.as_ref(), b.as_ref(), tolerance)
            }
            (
                GeometryKind::Polygon { shell, holes },
                GeometryKind::Polygon {
                    shell: other_shell,
                    holes: other_holes,
                },
            ) => {
                shell.equals_exact_tolerance(other_shell, tolerance)
                    && holes.len() == other_holes.len()
                    && holes
                        .iter()
                        .zip(other_holes)
                        .all(|(a, b)| a.equals_exact_tolerance(b, tolerance))
            }
            _ => {
                let (mine, theirs) = (self.geometries(), other.geometries());
                mine.len() == theirs.len()
                    && mine
                        .iter()
                        .zip(theirs)
                        .all(|(a, b)| a.equals_exact_tolerance(b, tolerance))
            }
        }
    }

    /// Structural equality after normalizing both geometries
    pub fn equals_norm(&self, other: &Geometry) -> bool {
        self.norm().equals_exact(&other.norm())
    }

    /// Normalized copy
    pub fn norm(&self) -> Geometry {
        let mut copy = self.copy();
        copy.normalize();
        copy
    }

    /// Rewrite into canonical form: open lines start at their smaller end, rings start at
    /// their smallest vertex with shells clockwise and holes counter-clockwise, and the
    /// elements of collections and the holes of polygons are sorted.
    pub fn normalize(&mut self) {
        let factory = self.factory.clone();
        match &mut self.kind {
            GeometryKind::Point(_) => {}
            GeometryKind::LineString(seq) => {
                let mut coords = seq.to_coordinate_array();
                if is_closed(&coords) {
                    normalize_ring(&mut coords, true);
                } else if coordinate_arrays::increasing_direction(&coords) < 0 {
                    coordinate_arrays::reverse(&mut coords);
                }
                *seq = factory.sequence_factory().create(&coords);
            }
            GeometryKind::LinearRing(seq) => {
                let mut coords = seq.to_coordinate_array();
                normalize_ring(&mut coords, true);
                *seq = factory.sequence_factory().create(&coords);
            }
            GeometryKind::Polygon { shell, holes } => {
                normalize_ring_geometry(shell, true);
                for hole in holes.iter_mut() {
                    normalize_ring_geometry(hole, false);
                }
                holes.sort_by(|a, b| a.compare_to(b));
            }
            GeometryKind::MultiPoint(elems)
            | GeometryKind::MultiLineString(elems)
            | GeometryKind::MultiPolygon(elems)
            | GeometryKind::GeometryCollection(elems) => {
                elems.iter_mut().for_each(Geometry::normalize);
                elems.sort_by(|a, b| a.compare_to(b));
            }
        }
        self.geometry_changed();
    }

    /// Total order over all geometries: type rank first, empty before non-empty, then the
    /// vertices in X and Y.
    pub fn compare_to(&self, other: &Geometry) -> Ordering {
        self.compare_to_with(other, &CoordinateSequenceComparator::with_dimension_limit(2))
    }

    /// Same as [`Geometry::compare_to`], comparing coordinate sequences with `comparator`
    pub fn compare_to_with(&self, other: &Geometry, comparator: &CoordinateSequenceComparator) -> Ordering {
        let rank = self
            .geometry_type()
            .sort_index()
            .cmp(&other.geometry_type().sort_index());
        if rank != Ordering::Equal {
            return rank;
        }
        match (self.is_empty(), other.is_empty()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        match (self.sequence(), other.sequence()) {
            (Some(a), Some(b)) => comparator.compare(a, b),
            _ => match (&self.kind, &other.kind) {
                (
                    GeometryKind::Polygon { shell, holes },
                    GeometryKind::Polygon {
                        shell: other_shell,
                        holes: other_holes,
                    },
                ) => {
                    let shell_cmp = shell.compare_to_with(other_shell, comparator);
                    if shell_cmp != Ordering::Equal {
                        return shell_cmp;
                    }
                    compare_lists(holes, other_holes, |a, b| a.compare_to_with(b, comparator))
                }
                _ => compare_lists(self.geometries(), other.geometries(), |a, b| {
                    a.compare_to_with(b, comparator)
                }),
            },
        }
    }
}

impl PartialEq for Geometry {
    fn eq(&self, other: &Self) -> bool {
        self.equals_exact(other)
    }
}

fn compare_lists<F>(a: &[Geometry], b: &[Geometry], mut cmp: F) -> Ordering
where
    F: FnMut(&Geometry, &Geometry) -> Ordering,
{
    for (ga, gb) in a.iter().zip(b) {
        let comp = cmp(ga, gb);
        if comp != Ordering::Equal {
            return comp;
        }
    }
    a.len().cmp(&b.len())
}

fn sequences_equal(a: &dyn CoordinateSequence, b: &dyn CoordinateSequence, tolerance: f64) -> bool {
    if a.size() != b.size() {
        return false;
    }
    (0..a.size()).all(|i| match (a.get_coordinate(i), b.get_coordinate(i)) {
        (Ok(ca), Ok(cb)) => {
            if tolerance == 0.0 {
                ca.equals_2d(&cb)
            } else {
                ca.distance(&cb) <= tolerance
            }
        }
        _ => false,
    })
}

fn is_closed(coords: &[Coordinate]) -> bool {
    match (coords.first(), coords.last()) {
        (Some(first), Some(last)) => coords.len() > 1 && first.equals_2d(last),
        _ => false,
    }
}

fn normalize_ring_geometry(ring: &mut Geometry, clockwise: bool) {
    let factory = ring.factory.clone();
    if let GeometryKind::LinearRing(seq) = &mut ring.kind {
        let mut coords = seq.to_coordinate_array();
        normalize_ring(&mut coords, clockwise);
        *seq = factory.sequence_factory().create(&coords);
    }
    ring.geometry_changed();
}

// Start the ring at its smallest vertex and orient it
fn normalize_ring(coords: &mut Vec<Coordinate>, clockwise: bool) {
    if coords.len() < 4 {
        return;
    }
    coords.pop();
    if let Some(min) = coordinate_arrays::min_coordinate(coords).copied() {
        coordinate_arrays::scroll(coords, &min);
    }
    coords.push(coords[0]);
    if ops::is_ccw(coords) == clockwise {
        coordinate_arrays::reverse(coords);
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use crate::factory::GeometryFactory;
    use crate::geometry::Geometry;
    use crate::sequence::CoordinateSequenceComparator;
    use crate::serialization::parse_wkt;

    fn geom(wkt: &str) -> Geometry {
        parse_wkt(wkt, &GeometryFactory::default_shared()).unwrap()
    }

    #[test]
    fn test_equals_exact() {
        let a = geom("LINESTRING (0 0, 1 1, 2 0)");
        assert!(a.equals_exact(&a));
        assert!(a.equals_exact(&a.copy()));
        assert!(!a.equals_exact(&a.reverse().unwrap()));
        assert!(!a.equals_exact(&geom("LINEARRING (0 0, 1 1, 2 0, 0 0)")));
        assert!(a.equals_exact_tolerance(&geom("LINESTRING (0 0, 1 1.05, 2 0)"), 0.1));
        assert!(!a.equals_exact_tolerance(&geom("LINESTRING (0 0, 1 1.5, 2 0)"), 0.1));
        assert_eq!(a, a.copy());
    }

    #[test]
    fn test_normalize() {
        let line = geom("LINESTRING (2 0, 1 1, 0 0)");
        assert_eq!(line.norm().to_string(), "LINESTRING (0 0, 1 1, 2 0)");

        let poly = geom("POLYGON ((1 1, 0 0, 0 1, 1 1))");
        assert_eq!(poly.norm().to_string(), "POLYGON ((0 0, 0 1, 1 1, 0 0))");

        let mp = geom("MULTIPOINT ((3 3), (1 1), (2 2))");
        assert_eq!(mp.norm().to_string(), "MULTIPOINT ((1 1), (2 2), (3 3))");
    }

    #[test]
    fn test_equals_norm() {
        let a = geom("POLYGON ((0 0, 0 1, 1 1, 1 0, 0 0))");
        let b = geom("POLYGON ((1 1, 1 0, 0 0, 0 1, 1 1))");
        let c = geom("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))");
        assert!(!a.equals_exact(&b));
        assert!(a.equals_norm(&b));
        assert!(a.equals_norm(&c));
    }

    #[test]
    fn test_compare_to() {
        let pt = geom("POINT (5 5)");
        let line = geom("LINESTRING (0 0, 1 1)");
        let poly = geom("POLYGON ((0 0, 0 1, 1 1, 0 0))");
        assert_eq!(pt.compare_to(&line), Ordering::Less);
        assert_eq!(poly.compare_to(&line), Ordering::Greater);
        assert_eq!(geom("POINT EMPTY").compare_to(&pt), Ordering::Less);
        assert_eq!(geom("POINT (1 1)").compare_to(&pt), Ordering::Less);
        assert_eq!(line.compare_to(&line.copy()), Ordering::Equal);
        assert_eq!(
            geom("LINESTRING (0 0, 1 1, 2 2)").compare_to(&line),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_to_with_comparator() {
        let a = geom("LINESTRING Z (0 0 5, 1 1 5)");
        let b = geom("LINESTRING Z (0 0 1, 1 1 1)");
        assert_eq!(a.compare_to(&b), Ordering::Equal);
        assert_eq!(
            a.compare_to_with(&b, &CoordinateSequenceComparator::new()),
            Ordering::Greater
        );
        assert_eq!(
            a.compare_to_with(&b, &CoordinateSequenceComparator::with_dimension_limit(2)),
            Ordering::Equal
        );
    }
}
