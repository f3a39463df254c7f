use std::fmt;

use super::coordinate::Coordinate;
use super::geometry::{Geometry, GeometryKind};
use super::matrix::Location;
use super::ops;
use super::relate;

/// A validity problem and where it was found
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub message: &'static str,
    pub location: Option<Coordinate>,
}

impl ValidationError {
    fn at(message: &'static str, location: Coordinate) -> Self {
        Self {
            message,
            location: Some(location),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(c) => write!(f, "{} at or near point ({} {})", self.message, c.x, c.y),
            None => write!(f, "{}", self.message),
        }
    }
}

type Check = Result<(), ValidationError>;

/// First validity problem of a geometry, if any.
///
/// Checked in order: finite coordinates, enough distinct points per line, closed rings of at
/// least 4 points, ring self-intersection (a ring touching itself at a vertex counts),
/// rings of a polygon crossing each other, holes outside their shell or nested in another
/// hole, and polygons of a multi polygon sharing interior.
pub fn check(geom: &Geometry) -> Check {
    for c in geom.coordinates() {
        if !(c.x.is_finite() && c.y.is_finite()) {
            return Err(ValidationError::at("Invalid Coordinate", c));
        }
    }
    check_component(geom)
}

/// First validity problem as a message
pub fn validation_error(geom: &Geometry) -> Option<String> {
    check(geom).err().map(|err| err.to_string())
}

fn check_component(geom: &Geometry) -> Check {
    match geom.kind() {
        GeometryKind::Point(_) => Ok(()),
        GeometryKind::LineString(_) => check_line(geom),
        GeometryKind::LinearRing(_) => check_ring(geom),
        GeometryKind::Polygon { .. } => check_polygon(geom),
        GeometryKind::MultiPolygon(elems) => {
            elems.iter().try_for_each(check_polygon)?;
            check_disjoint_interiors(elems)
        }
        GeometryKind::MultiPoint(elems)
        | GeometryKind::MultiLineString(elems)
        | GeometryKind::GeometryCollection(elems) => elems.iter().try_for_each(check_component),
    }
}

fn check_line(line: &Geometry) -> Check {
    let coords = distinct_consecutive(&line.coordinates());
    if coords.len() == 1 {
        return Err(ValidationError::at(
            "Too few distinct points in geometry component",
            coords[0],
        ));
    }
    Ok(())
}

fn check_ring(ring: &Geometry) -> Check {
    let raw = ring.coordinates();
    let Some(first) = raw.first().copied() else {
        return Ok(());
    };
    if !ring.is_closed() {
        return Err(ValidationError::at("Ring is not closed", first));
    }
    if raw.len() < 4 {
        return Err(ValidationError::at(
            "Invalid number of points in LinearRing, must be 0 or >= 4",
            first,
        ));
    }
    let coords = distinct_consecutive(&raw);
    if coords.len() < 4 {
        return Err(ValidationError::at(
            "Too few distinct points in geometry component",
            first,
        ));
    }
    match self_intersection(&coords, true) {
        Some(loc) => Err(ValidationError::at("Ring Self-intersection", loc)),
        None => Ok(()),
    }
}

fn check_polygon(poly: &Geometry) -> Check {
    let Some(shell) = poly.exterior_ring() else {
        return Ok(());
    };
    if shell.is_empty() {
        return Ok(());
    }
    check_ring(shell)?;
    for hole in poly.interior_rings() {
        check_ring(hole)?;
    }

    let shell_coords = shell.coordinates();
    let holes: Vec<Vec<Coordinate>> = poly
        .interior_rings()
        .iter()
        .filter(|h| !h.is_empty())
        .map(Geometry::coordinates)
        .collect();

    let rings: Vec<&[Coordinate]> = std::iter::once(shell_coords.as_slice())
        .chain(holes.iter().map(Vec::as_slice))
        .collect();
    for i in 0..rings.len() {
        for j in i + 1..rings.len() {
            if let Some(loc) = rings_cross(rings[i], rings[j]) {
                return Err(ValidationError::at("Self-intersection", loc));
            }
        }
    }

    for (i, hole) in holes.iter().enumerate() {
        let Some(sample) = vertex_off_ring(hole, &shell_coords) else {
            continue;
        };
        if ops::locate_in_ring(&sample, &shell_coords) != Location::Interior {
            return Err(ValidationError::at("Hole lies outside shell", sample));
        }
        for (j, other) in holes.iter().enumerate() {
            if i == j {
                continue;
            }
            if let Some(p) = vertex_off_ring(hole, other) {
                if ops::locate_in_ring(&p, other) == Location::Interior {
                    return Err(ValidationError::at("Holes are nested", p));
                }
            }
        }
    }
    Ok(())
}

fn check_disjoint_interiors(polys: &[Geometry]) -> Check {
    let non_empty: Vec<&Geometry> = polys.iter().filter(|p| !p.is_empty()).collect();
    for i in 0..non_empty.len() {
        for j in i + 1..non_empty.len() {
            let (a, b) = (non_empty[i], non_empty[j]);
            if !a.envelope_internal().intersects(&b.envelope_internal()) {
                continue;
            }
            let shares_interior = relate::relate(a, b)
                .map(|m| m.get(Location::Interior, Location::Interior).is_non_empty())
                .unwrap_or(true);
            if shares_interior {
                let loc = b.coordinate().or_else(|| a.coordinate());
                return Err(ValidationError {
                    message: "Nested or overlapping shells",
                    location: loc,
                });
            }
        }
    }
    Ok(())
}

/// True if the geometry has no anomalous points: lines do not cross or touch themselves except
/// at a closing end point, points of a multi point are distinct, and lines of a multi line
/// string meet only at end points.
pub fn is_simple(geom: &Geometry) -> bool {
    if geom.is_empty() {
        return true;
    }
    match geom.kind() {
        GeometryKind::Point(_) => true,
        GeometryKind::LineString(_) | GeometryKind::LinearRing(_) => {
            let coords = distinct_consecutive(&geom.coordinates());
            self_intersection(&coords, geom.is_closed()).is_none()
        }
        GeometryKind::Polygon { shell, holes } => std::iter::once(shell.as_ref())
            .chain(holes.iter())
            .all(is_simple),
        GeometryKind::MultiPoint(elems) => {
            let mut coords: Vec<Coordinate> = elems.iter().filter_map(Geometry::coordinate).collect();
            coords.sort_by(|a, b| a.compare_to(b));
            coords.windows(2).all(|w| !w[0].equals_2d(&w[1]))
        }
        GeometryKind::MultiLineString(elems) => {
            elems.iter().all(is_simple) && lines_meet_at_ends(elems)
        }
        GeometryKind::MultiPolygon(elems) | GeometryKind::GeometryCollection(elems) => {
            elems.iter().all(is_simple)
        }
    }
}

fn lines_meet_at_ends(lines: &[Geometry]) -> bool {
    let lines: Vec<Vec<Coordinate>> = lines
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| distinct_consecutive(&l.coordinates()))
        .collect();
    for i in 0..lines.len() {
        for j in i + 1..lines.len() {
            let (a, b) = (&lines[i], &lines[j]);
            let is_end = |c: &Coordinate, line: &[Coordinate]| {
                line.first().is_some_and(|f| f.equals_2d(c)) || line.last().is_some_and(|l| l.equals_2d(c))
            };
            for sa in a.windows(2) {
                for sb in b.windows(2) {
                    if !ops::segments_intersect((&sa[0], &sa[1]), (&sb[0], &sb[1])) {
                        continue;
                    }
                    match touch_point((&sa[0], &sa[1]), (&sb[0], &sb[1])) {
                        Some(p) if is_end(&p, a) && is_end(&p, b) => {}
                        _ => return false,
                    }
                }
            }
        }
    }
    true
}

fn distinct_consecutive(coords: &[Coordinate]) -> Vec<Coordinate> {
    let mut out = coords.to_vec();
    out.dedup_by(|a, b| a.equals_2d(b));
    out
}

/// Point where a line meets itself somewhere other than between neighbouring segments, or
/// where neighbouring segments fold back onto each other.
fn self_intersection(coords: &[Coordinate], closed: bool) -> Option<Coordinate> {
    let m = coords.len().saturating_sub(1);
    for i in 0..m {
        let si = (&coords[i], &coords[i + 1]);
        for j in i + 1..m {
            let sj = (&coords[j], &coords[j + 1]);
            if j == i + 1 {
                if ops::point_on_segment(si.0, sj.0, sj.1) || ops::point_on_segment(sj.1, si.0, si.1) {
                    return Some(*si.1);
                }
                continue;
            }
            if closed && i == 0 && j == m - 1 {
                // neighbours through the closing vertex
                if ops::point_on_segment(si.1, sj.0, sj.1) || ops::point_on_segment(sj.0, si.0, si.1) {
                    return Some(*si.0);
                }
                continue;
            }
            if ops::segments_intersect(si, sj) {
                return touch_point(si, sj).or(Some(*si.0));
            }
        }
    }
    None
}

// A point shared by two intersecting segments
fn touch_point(s1: (&Coordinate, &Coordinate), s2: (&Coordinate, &Coordinate)) -> Option<Coordinate> {
    for p in [s1.0, s1.1] {
        if ops::point_on_segment(p, s2.0, s2.1) {
            return Some(*p);
        }
    }
    for p in [s2.0, s2.1] {
        if ops::point_on_segment(p, s1.0, s1.1) {
            return Some(*p);
        }
    }
    ops::intersection_point(s1, s2)
}

// Two rings may touch at isolated points but not cross or share an edge
fn rings_cross(a: &[Coordinate], b: &[Coordinate]) -> Option<Coordinate> {
    for sa in a.windows(2) {
        for sb in b.windows(2) {
            let (s1, s2) = ((&sa[0], &sa[1]), (&sb[0], &sb[1]));
            if crosses_properly(s1, s2) {
                return ops::intersection_point(s1, s2).or(Some(sa[0]));
            }
            if collinear_overlap(s1, s2) {
                return Some(sa[0]);
            }
        }
    }
    None
}

fn orientation(a: &Coordinate, b: &Coordinate, c: &Coordinate) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn crosses_properly(s1: (&Coordinate, &Coordinate), s2: (&Coordinate, &Coordinate)) -> bool {
    let (a, b) = s1;
    let (c, d) = s2;
    let (d1, d2) = (orientation(c, d, a), orientation(c, d, b));
    let (d3, d4) = (orientation(a, b, c), orientation(a, b, d));
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

fn collinear_overlap(s1: (&Coordinate, &Coordinate), s2: (&Coordinate, &Coordinate)) -> bool {
    let (a, b) = s1;
    let (c, d) = s2;
    if orientation(a, b, c) != 0.0 || orientation(a, b, d) != 0.0 {
        return false;
    }
    let project = |p: &Coordinate| {
        if (b.x - a.x).abs() >= (b.y - a.y).abs() { p.x } else { p.y }
    };
    let (a0, a1) = (project(a).min(project(b)), project(a).max(project(b)));
    let (b0, b1) = (project(c).min(project(d)), project(c).max(project(d)));
    a1.min(b1) - a0.max(b0) > 0.0
}

// A vertex of `ring` not lying on `other`
fn vertex_off_ring(ring: &[Coordinate], other: &[Coordinate]) -> Option<Coordinate> {
    ring.iter()
        .find(|p| ops::locate_in_ring(p, other) != Location::Boundary)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::GeometryFactory;
    use crate::serialization::parse_wkt;

    fn geom(wkt: &str) -> Geometry {
        parse_wkt(wkt, &GeometryFactory::default_shared()).unwrap()
    }

    fn error(wkt: &str) -> Option<&'static str> {
        check(&geom(wkt)).err().map(|e| e.message)
    }

    #[test]
    fn test_valid_geometries() {
        for wkt in [
            "POINT (1 1)",
            "POINT EMPTY",
            "LINESTRING (0 0, 1 1, 0 1, 1 0)",
            "POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0), (1 1, 2 1, 2 2, 1 2, 1 1))",
            "POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0), (0 0, 2 1, 1 2, 0 0))",
            "MULTIPOLYGON (((0 0, 0 1, 1 1, 1 0, 0 0)), ((1 0, 1 1, 2 1, 2 0, 1 0)))",
            "GEOMETRYCOLLECTION (POINT (0 0), LINESTRING (0 0, 1 1))",
        ] {
            assert!(geom(wkt).is_valid(), "{wkt}: {:?}", geom(wkt).validation_error());
        }
    }

    #[test]
    fn test_invalid_geometries() {
        assert_eq!(
            error("LINESTRING (1 1, 1 1)"),
            Some("Too few distinct points in geometry component")
        );
        assert_eq!(
            error("POLYGON ((0 0, 2 2, 0 2, 2 0, 0 0))"),
            Some("Ring Self-intersection")
        );
        assert_eq!(
            error("POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0), (20 20, 21 20, 21 21, 20 20))"),
            Some("Hole lies outside shell")
        );
        assert_eq!(
            error("POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0), (5 5, 15 5, 15 6, 5 5))"),
            Some("Self-intersection")
        );
        assert_eq!(
            error(
                "POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0), (1 1, 8 1, 8 8, 1 8, 1 1), \
                 (2 2, 3 2, 3 3, 2 2))"
            ),
            Some("Holes are nested")
        );
        assert_eq!(
            error("MULTIPOLYGON (((0 0, 0 2, 2 2, 2 0, 0 0)), ((1 1, 1 3, 3 3, 3 1, 1 1)))"),
            Some("Nested or overlapping shells")
        );
    }

    #[test]
    fn test_ring_self_touch() {
        // the ring returns to (0 0) half way round
        let wkt = "POLYGON ((0 0, 2 2, 4 0, 2 -2, 0 0, -2 2, -4 0, -2 -2, 0 0))";
        assert_eq!(error(wkt), Some("Ring Self-intersection"));
        let msg = geom(wkt).validation_error().unwrap();
        assert_eq!(msg, "Ring Self-intersection at or near point (0 0)");
    }

    #[test]
    fn test_non_finite() {
        let factory = GeometryFactory::default_shared();
        let pt = factory.create_point(&Coordinate::new(f64::NAN, 1.0));
        assert_eq!(check(&pt).err().map(|e| e.message), Some("Invalid Coordinate"));
    }

    #[test]
    fn test_is_simple() {
        assert!(geom("LINESTRING (0 0, 1 1, 2 0)").is_simple());
        assert!(!geom("LINESTRING (0 0, 2 2, 0 2, 2 0)").is_simple());
        assert!(geom("LINESTRING (0 0, 0 1, 1 1, 0 0)").is_simple());
        assert!(!geom("LINESTRING (0 0, 2 0, 1 0)").is_simple());
        assert!(geom("MULTIPOINT ((0 0), (1 1))").is_simple());
        assert!(!geom("MULTIPOINT ((0 0), (1 1), (0 0))").is_simple());
        assert!(geom("MULTILINESTRING ((0 0, 1 1), (1 1, 2 0))").is_simple());
        assert!(!geom("MULTILINESTRING ((0 0, 2 2), (0 2, 2 0))").is_simple());
        assert!(geom("POLYGON ((0 0, 0 1, 1 1, 0 0))").is_simple());
        assert!(geom("GEOMETRYCOLLECTION EMPTY").is_simple());
    }

    #[test]
    fn test_is_ring() {
        assert!(geom("LINESTRING (0 0, 0 1, 1 1, 0 0)").is_ring());
        assert!(!geom("LINESTRING (0 0, 0 1, 1 1)").is_ring());
        assert!(!geom("LINESTRING (0 0, 2 2, 0 2, 2 0, 0 0)").is_ring());
    }
}
