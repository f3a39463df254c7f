use std::slice::Iter;
use std::sync::Arc;

use geo::{Centroid, InteriorPoint};
use log;

use super::coordinate::{self, Coordinate};
use super::core::{self, GeomResult, GeometryError};
use super::envelope::Envelope;
use super::factory::GeometryFactory;
use super::geometry::{Geometry, GeometryKind};
use super::matrix::Location;
use super::sequence::CoordinateSequence;

/// Line segment between two coordinates
pub type Segment<'a> = (&'a Coordinate, &'a Coordinate);

/// Represents the direction of a turn defined by a sequence of 3 points on the plane
#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub enum Turn {
    Right,
    Left,
    InLine,
}

/// Determine the turn direction defined by three successive points
pub fn direction(p1: &Coordinate, p2: &Coordinate, p3: &Coordinate) -> Turn {
    let det = cross(p1, p2, p3);
    if core::approx(det, 0.0) {
        Turn::InLine
    } else if det < 0.0 {
        Turn::Right
    } else {
        Turn::Left
    }
}

// Twice the signed area of the triangle p1, p2, p3; positive for a left turn
fn cross(p1: &Coordinate, p2: &Coordinate, p3: &Coordinate) -> f64 {
    (p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x)
}

/// Sort a vector of coordinates lexicographically
pub fn sort_lex(mut pts: Vec<Coordinate>) -> Vec<Coordinate> {
    coordinate::quick_sort(&mut pts);
    pts
}

/// Compute the convex hull of a set of coordinates.
///
/// The result has the lowest dimension that covers the hull: an empty collection for no input,
/// a point when all coordinates coincide, a line string when they are collinear and a polygon
/// otherwise. The polygon shell runs clockwise from the lexicographically smallest vertex.
///
/// Examples
/// ```rust
/// use geomlib::{ops, Coordinate, GeometryFactory};
///
/// let factory = GeometryFactory::default_shared();
/// let points = vec![
///    Coordinate::new(0.05, 0.75),
///    Coordinate::new(0.0, 0.0),
///    Coordinate::new(1.0, 1.0),
///    Coordinate::new(1.0, 0.0),
///    Coordinate::new(0.0, 1.0),
///    Coordinate::new(0.5, 0.5),
/// ];
/// let square = ops::convex_hull(&factory, &points).unwrap();
/// assert_eq!(square.area(), 1.0);
/// ```
pub fn convex_hull(factory: &Arc<GeometryFactory>, points: &[Coordinate]) -> GeomResult<Geometry> {
    let mut source_points = sort_lex(points.to_vec());
    source_points.dedup_by(|a, b| a.equals_2d(b));

    match source_points.len() {
        0 => return Ok(factory.create_geometry_collection(Vec::new())),
        1 => return Ok(factory.create_point(&source_points[0])),
        _ => {}
    }

    let mut hull = half_hull(source_points.iter());
    hull.pop(); // Pop element - it will be the first in the lower hull

    source_points.reverse();
    let mut lower_hull = half_hull(source_points.iter());
    hull.append(&mut lower_hull);

    if hull.len() < 4 {
        // collinear input: the hull is the segment between the extreme points
        let (first, last) = (source_points[source_points.len() - 1], source_points[0]);
        return factory.create_line_string(&[first, last]);
    }
    factory.create_polygon_from_coords(&hull).inspect_err(|err| {
        log::debug!("Failed to instantiate convex hull polygon: {err}");
    })
}

// Compute half a convex hull from a lexicographically sorted run of points
fn half_hull(points: Iter<Coordinate>) -> Vec<Coordinate> {
    let mut hull: Vec<Coordinate> = Vec::with_capacity(points.len());

    for (i, pt) in points.enumerate() {
        if i < 2 {
            hull.push(*pt);
            continue;
        }

        while hull.len() > 1
            && direction(&hull[hull.len() - 2], &hull[hull.len() - 1], pt) != Turn::Right
        {
            hull.pop();
        }
        hull.push(*pt);
    }
    hull
}

/// Compute the intersection of two line segments.
///
/// Returns None if the segments do not intersect or are parallel. The segments are written as
/// `start + t * (end - start)` and the parameters `t` give the intersection point.
///
/// Examples
/// ```rust
/// use geomlib::{ops, Coordinate};
/// let (start1, end1) = (Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0));
/// let (start2, end2) = (Coordinate::new(1.0, 0.0), Coordinate::new(0.0, 1.0));
///
/// let inter = ops::intersection_point((&start1, &end1), (&start2, &end2)).unwrap();
/// assert!(inter.is_close(&Coordinate::new(0.5, 0.5)));
/// ```
pub fn intersection_point(s1: Segment, s2: Segment) -> Option<Coordinate> {
    intersection_with_line(s1, s2, true)
}

/// Determine whether a segment intersects with a line defined by another segment.
///
/// Computes the intersection point of `seg` with the line defined by `line`. Returns None
/// if the segment does not intersect with the line. If `in_bounds` is true, this will also
/// return None if the intersection not between the points in `line`.
pub fn intersection_with_line(line: Segment, seg: Segment, in_bounds: bool) -> Option<Coordinate> {
    let (a, b) = line;
    let (c, d) = seg;

    let det = (b.x - a.x) * (c.y - d.y) - (b.y - a.y) * (c.x - d.x);
    if core::approx(det, 0.0) {
        // Parallel segments
        return None;
    }

    let t1 = ((c.y - d.y) * (c.x - a.x) + (d.x - c.x) * (c.y - a.y)) / det;
    let t2 = ((a.y - b.y) * (c.x - a.x) + (b.x - a.x) * (c.y - a.y)) / det;

    if !(0.0..=1.0).contains(&t2) {
        // Does not intersect seg
        return None;
    }

    if !in_bounds || (0.0..=1.0).contains(&t1) {
        Some(Coordinate::new(
            t1 * b.x + (1.0 - t1) * a.x,
            t1 * b.y + (1.0 - t1) * a.y,
        ))
    } else {
        None
    }
}

/// True if `p` lies on the closed segment `a`-`b`
pub fn point_on_segment(p: &Coordinate, a: &Coordinate, b: &Coordinate) -> bool {
    cross(a, b, p) == 0.0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

/// True if the closed segments share at least one point
pub fn segments_intersect(s1: Segment, s2: Segment) -> bool {
    let (a, b) = s1;
    let (c, d) = s2;
    let (d1, d2) = (cross(c, d, a), cross(c, d, b));
    let (d3, d4) = (cross(a, b, c), cross(a, b, d));
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    point_on_segment(a, c, d)
        || point_on_segment(b, c, d)
        || point_on_segment(c, a, b)
        || point_on_segment(d, a, b)
}

/// Distance from `p` to the closed segment `a`-`b`
pub fn distance_point_segment(p: &Coordinate, a: &Coordinate, b: &Coordinate) -> f64 {
    if a.equals_2d(b) {
        return p.distance(a);
    }
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / (dx * dx + dy * dy)).clamp(0.0, 1.0);
    let proj = Coordinate::new(a.x + t * dx, a.y + t * dy);
    p.distance(&proj)
}

/// Distance between two closed segments
pub fn distance_segment_segment(s1: Segment, s2: Segment) -> f64 {
    if segments_intersect(s1, s2) {
        return 0.0;
    }
    let (a, b) = s1;
    let (c, d) = s2;
    distance_point_segment(a, c, d)
        .min(distance_point_segment(b, c, d))
        .min(distance_point_segment(c, a, b))
        .min(distance_point_segment(d, a, b))
}

/// Signed area of a ring; positive when the ring runs counter-clockwise
pub fn signed_area(seq: &dyn CoordinateSequence) -> f64 {
    signed_area_coords(&seq.to_coordinate_array())
}

pub fn signed_area_coords(ring: &[Coordinate]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let twice: f64 = ring
        .windows(2)
        .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
        .sum();
    twice / 2.0
}

/// True if the closed ring runs counter-clockwise
pub fn is_ccw(ring: &[Coordinate]) -> bool {
    signed_area_coords(ring) > 0.0
}

/// Total length of the segments of a sequence
pub fn length(seq: &dyn CoordinateSequence) -> f64 {
    let coords = seq.to_coordinate_array();
    coords.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Locate a point relative to a closed ring, using ray casting.
pub fn locate_in_ring(pt: &Coordinate, ring: &[Coordinate]) -> Location {
    let mut total_intersects: u32 = 0;
    for seg in ring.windows(2) {
        let (st, e) = (&seg[0], &seg[1]);
        if point_on_segment(pt, st, e) {
            return Location::Boundary;
        }
        if (st.y > pt.y) != (e.y > pt.y) {
            let x_cross = st.x + (pt.y - st.y) * (e.x - st.x) / (e.y - st.y);
            if pt.x < x_cross {
                // Horizontal ray to the right intersects edge
                total_intersects += 1;
            }
        }
    }
    if total_intersects % 2 != 0 {
        Location::Interior
    } else {
        Location::Exterior
    }
}

/// Locate a point relative to a polygon geometry
pub fn locate_in_polygon(pt: &Coordinate, poly: &Geometry) -> Location {
    let Some(shell) = poly.exterior_ring() else {
        return Location::Exterior;
    };
    if shell.is_empty() || !poly.envelope_internal().intersects_coordinate(pt) {
        return Location::Exterior;
    }
    match locate_in_ring(pt, &shell.coordinates()) {
        Location::Interior => {}
        loc => return loc,
    }
    for hole in poly.interior_rings() {
        match locate_in_ring(pt, &hole.coordinates()) {
            Location::Interior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Exterior => {}
        }
    }
    Location::Interior
}

/// Locate a point relative to any geometry.
///
/// Curve end points follow the Mod-2 rule: a point ending an odd number of curves is on the
/// boundary, an even number puts it in the interior.
pub fn locate(pt: &Coordinate, geom: &Geometry) -> Location {
    if geom.is_empty() || !geom.envelope_internal().intersects_coordinate(pt) {
        return Location::Exterior;
    }
    let mut is_in = false;
    let mut boundaries = 0;
    for comp in atomic_components(geom) {
        match comp.kind() {
            GeometryKind::Point(_) => {
                if comp.coordinate().is_some_and(|c| c.equals_2d(pt)) {
                    is_in = true;
                }
            }
            GeometryKind::LineString(seq) | GeometryKind::LinearRing(seq) => {
                let coords = seq.to_coordinate_array();
                let closed = comp.is_closed();
                let is_end = coords.first().is_some_and(|c| c.equals_2d(pt))
                    || coords.last().is_some_and(|c| c.equals_2d(pt));
                if !closed && is_end {
                    boundaries += 1;
                } else if coords.windows(2).any(|w| point_on_segment(pt, &w[0], &w[1])) {
                    is_in = true;
                }
            }
            GeometryKind::Polygon { .. } => match locate_in_polygon(pt, comp) {
                Location::Interior => is_in = true,
                Location::Boundary => boundaries += 1,
                Location::Exterior => {}
            },
            _ => {}
        }
    }
    if boundaries % 2 == 1 {
        Location::Boundary
    } else if is_in || boundaries > 0 {
        Location::Interior
    } else {
        Location::Exterior
    }
}

/// Non-empty atomic elements of a geometry, flattening collections
pub fn atomic_components(geom: &Geometry) -> Vec<&Geometry> {
    let mut out = Vec::new();
    collect_atomic(geom, &mut out);
    out
}

fn collect_atomic<'a>(geom: &'a Geometry, out: &mut Vec<&'a Geometry>) {
    if geom.geometry_type().is_collection() {
        for g in geom.geometries() {
            collect_atomic(g, out);
        }
    } else if !geom.is_empty() {
        out.push(geom);
    }
}

/// Segments of a component; a point gives a single degenerate segment
fn segments(geom: &Geometry) -> Vec<(Coordinate, Coordinate)> {
    let rings: Vec<Vec<Coordinate>> = match geom.kind() {
        GeometryKind::Polygon { shell, holes } => std::iter::once(shell.as_ref())
            .chain(holes.iter())
            .map(Geometry::coordinates)
            .collect(),
        _ => vec![geom.coordinates()],
    };
    let mut out = Vec::new();
    for coords in rings {
        if coords.len() == 1 {
            out.push((coords[0], coords[0]));
        }
        out.extend(coords.windows(2).map(|w| (w[0], w[1])));
    }
    out
}

/// Minimum distance between two geometries; 0 when either is empty
pub fn distance(a: &Geometry, b: &Geometry) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let mut min = f64::INFINITY;
    for ga in atomic_components(a) {
        for gb in atomic_components(b) {
            min = min.min(component_distance(ga, gb));
            if min == 0.0 {
                return 0.0;
            }
        }
    }
    min
}

fn component_distance(a: &Geometry, b: &Geometry) -> f64 {
    for (area, other) in [(a, b), (b, a)] {
        if matches!(area.kind(), GeometryKind::Polygon { .. })
            && other
                .coordinates()
                .iter()
                .any(|c| locate_in_polygon(c, area) != Location::Exterior)
        {
            return 0.0;
        }
    }
    let (sa, sb) = (segments(a), segments(b));
    let mut min = f64::INFINITY;
    for (a0, a1) in &sa {
        for (b0, b1) in &sb {
            min = min.min(distance_segment_segment((a0, a1), (b0, b1)));
        }
    }
    min
}

/// Intersects test of an axis aligned rectangle polygon against any geometry
pub fn rectangle_intersects(rect: &Geometry, geom: &Geometry) -> bool {
    let env = rect.envelope_internal();
    if !env.intersects(&geom.envelope_internal()) {
        return false;
    }
    let components = atomic_components(geom);

    // a connected element whose X or Y range lies within the rectangle's must cross it
    for comp in &components {
        let e = comp.envelope_internal();
        if env.covers(&e)
            || (e.min_x() >= env.min_x() && e.max_x() <= env.max_x() && env.intersects(&e))
            || (e.min_y() >= env.min_y() && e.max_y() <= env.max_y() && env.intersects(&e))
        {
            return true;
        }
    }

    let corners = [
        Coordinate::new(env.min_x(), env.min_y()),
        Coordinate::new(env.min_x(), env.max_y()),
        Coordinate::new(env.max_x(), env.max_y()),
        Coordinate::new(env.max_x(), env.min_y()),
    ];
    for comp in &components {
        if matches!(comp.kind(), GeometryKind::Polygon { .. })
            && corners
                .iter()
                .any(|c| locate_in_polygon(c, comp) != Location::Exterior)
        {
            return true;
        }
    }

    let edges = [
        (corners[0], corners[1]),
        (corners[1], corners[2]),
        (corners[2], corners[3]),
        (corners[3], corners[0]),
    ];
    components.iter().any(|comp| {
        segments(comp).iter().any(|(s0, s1)| {
            edges
                .iter()
                .any(|(e0, e1)| segments_intersect((s0, s1), (e0, e1)))
        })
    })
}

/// Contains test of an axis aligned rectangle polygon against any geometry
pub fn rectangle_contains(rect: &Geometry, geom: &Geometry) -> bool {
    let env = rect.envelope_internal();
    if !env.covers(&geom.envelope_internal()) {
        return false;
    }
    // a geometry lying entirely in the rectangle boundary is not contained
    !contained_in_boundary(&env, geom)
}

fn contained_in_boundary(env: &Envelope, geom: &Geometry) -> bool {
    let on_boundary = |c: &Coordinate| {
        c.x == env.min_x() || c.x == env.max_x() || c.y == env.min_y() || c.y == env.max_y()
    };
    match geom.kind() {
        GeometryKind::Polygon { .. } => false,
        GeometryKind::Point(_) => geom.coordinate().is_some_and(|c| on_boundary(&c)),
        GeometryKind::LineString(_) | GeometryKind::LinearRing(_) => {
            geom.coordinates().windows(2).all(|w| {
                let (p0, p1) = (&w[0], &w[1]);
                if p0.equals_2d(p1) {
                    on_boundary(p0)
                } else if p0.x == p1.x {
                    p0.x == env.min_x() || p0.x == env.max_x()
                } else if p0.y == p1.y {
                    p0.y == env.min_y() || p0.y == env.max_y()
                } else {
                    false
                }
            })
        }
        _ => geom
            .geometries()
            .iter()
            .all(|g| contained_in_boundary(env, g)),
    }
}

/// Centre of mass of the highest dimension components
pub fn centroid(geom: &Geometry) -> Option<Coordinate> {
    let pt = to_geo(geom).centroid()?;
    Some(Coordinate::new(pt.x(), pt.y()))
}

/// A point inside the geometry, as central as practical
pub fn interior_point(geom: &Geometry) -> Option<Coordinate> {
    let pt = to_geo(geom).interior_point()?;
    Some(Coordinate::new(pt.x(), pt.y()))
}

fn to_geo_coords(coords: &[Coordinate]) -> geo::LineString<f64> {
    geo::LineString::new(
        coords
            .iter()
            .map(|c| geo::Coord { x: c.x, y: c.y })
            .collect(),
    )
}

/// Polygon as a `geo` polygon; `None` when empty
pub(crate) fn to_geo_polygon(geom: &Geometry) -> Option<geo::Polygon<f64>> {
    let shell = geom.exterior_ring()?;
    if shell.is_empty() {
        return None;
    }
    Some(geo::Polygon::new(
        to_geo_coords(&shell.coordinates()),
        geom.interior_rings()
            .iter()
            .map(|h| to_geo_coords(&h.coordinates()))
            .collect(),
    ))
}

/// Every non-empty polygon of a geometry
pub(crate) fn to_geo_multi_polygon(geom: &Geometry) -> geo::MultiPolygon<f64> {
    geo::MultiPolygon::new(
        atomic_components(geom)
            .into_iter()
            .filter_map(to_geo_polygon)
            .collect(),
    )
}

/// Every non-empty curve of a geometry
pub(crate) fn to_geo_multi_line_string(geom: &Geometry) -> geo::MultiLineString<f64> {
    geo::MultiLineString::new(
        atomic_components(geom)
            .into_iter()
            .filter(|g| g.sequence().is_some() && g.dimension() == super::dimension::Dimension::L)
            .map(|g| to_geo_coords(&g.coordinates()))
            .collect(),
    )
}

/// Convert to the `geo` model. Empty atomic geometries become empty multi geometries.
pub(crate) fn to_geo(geom: &Geometry) -> geo::Geometry<f64> {
    match geom.kind() {
        GeometryKind::Point(_) => match geom.coordinate() {
            Some(c) => geo::Geometry::Point(geo::Point::new(c.x, c.y)),
            None => geo::Geometry::MultiPoint(geo::MultiPoint::new(Vec::new())),
        },
        GeometryKind::LineString(_) | GeometryKind::LinearRing(_) => {
            if geom.is_empty() {
                geo::Geometry::MultiLineString(geo::MultiLineString::new(Vec::new()))
            } else {
                geo::Geometry::LineString(to_geo_coords(&geom.coordinates()))
            }
        }
        GeometryKind::Polygon { .. } => match to_geo_polygon(geom) {
            Some(poly) => geo::Geometry::Polygon(poly),
            None => geo::Geometry::MultiPolygon(geo::MultiPolygon::new(Vec::new())),
        },
        GeometryKind::MultiPoint(elems) => geo::Geometry::MultiPoint(geo::MultiPoint::new(
            elems
                .iter()
                .filter_map(Geometry::coordinate)
                .map(|c| geo::Point::new(c.x, c.y))
                .collect(),
        )),
        GeometryKind::MultiLineString(_) => {
            geo::Geometry::MultiLineString(to_geo_multi_line_string(geom))
        }
        GeometryKind::MultiPolygon(_) => geo::Geometry::MultiPolygon(to_geo_multi_polygon(geom)),
        GeometryKind::GeometryCollection(elems) => geo::Geometry::GeometryCollection(
            geo::GeometryCollection::new_from(elems.iter().map(to_geo).collect()),
        ),
    }
}

fn from_geo_ring(
    factory: &Arc<GeometryFactory>,
    ring: &geo::LineString<f64>,
) -> GeomResult<Option<Geometry>> {
    let coords = from_geo_coords(ring)?;
    if coords.len() < 4 {
        // collapsed ring
        return Ok(None);
    }
    factory.create_linear_ring(&coords).map(Some)
}

/// Coordinates of a `geo` line, rejecting non-finite values
pub(crate) fn from_geo_coords(line: &geo::LineString<f64>) -> GeomResult<Vec<Coordinate>> {
    line.coords()
        .map(|c| {
            if c.x.is_finite() && c.y.is_finite() {
                Ok(Coordinate::new(c.x, c.y))
            } else {
                Err(GeometryError::Topology {
                    message: String::from("non-finite coordinate in computed result"),
                    location: None,
                })
            }
        })
        .collect()
}

/// Polygons built from a `geo` multi polygon, dropping collapsed rings
pub(crate) fn from_geo_multi_polygon(
    factory: &Arc<GeometryFactory>,
    mp: &geo::MultiPolygon<f64>,
) -> GeomResult<Vec<Geometry>> {
    let mut polys = Vec::with_capacity(mp.0.len());
    for poly in mp.iter() {
        let Some(shell) = from_geo_ring(factory, poly.exterior())? else {
            continue;
        };
        let mut holes = Vec::with_capacity(poly.interiors().len());
        for interior in poly.interiors() {
            if let Some(hole) = from_geo_ring(factory, interior)? {
                holes.push(hole);
            }
        }
        polys.push(factory.create_polygon(shell, holes)?);
    }
    Ok(polys)
}
