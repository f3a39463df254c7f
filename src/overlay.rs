use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use geo::BooleanOps;
use log;

use super::coordinate::Coordinate;
use super::core::{GeomResult, GeometryError};
use super::dimension::Dimension;
use super::factory::GeometryFactory;
use super::geometry::{Geometry, GeometryKind};
use super::matrix::Location;
use super::ops;
use super::precision::PrecisionModel;

/// Boolean set operation between two geometries
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OverlayOp {
    Intersection,
    Union,
    Difference,
    SymDifference,
}

impl fmt::Display for OverlayOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OverlayOp::Intersection => "intersection",
            OverlayOp::Union => "union",
            OverlayOp::Difference => "difference",
            OverlayOp::SymDifference => "symdifference",
        };
        write!(f, "{name}")
    }
}

impl OverlayOp {
    /// Dimension of the result of `op` on inputs of the given dimensions
    pub fn result_dimension(&self, dim0: Dimension, dim1: Dimension) -> Dimension {
        match self {
            OverlayOp::Intersection => dim0.min(dim1),
            OverlayOp::Union | OverlayOp::SymDifference => dim0.max(dim1),
            OverlayOp::Difference => dim0,
        }
    }
}

/// Empty geometry of the dimension `op` would produce; an empty collection when that
/// dimension is unknown.
pub fn create_empty_result(
    op: OverlayOp,
    a: &Geometry,
    b: &Geometry,
    factory: &Arc<GeometryFactory>,
) -> Geometry {
    factory.create_empty(op.result_dimension(a.dimension(), b.dimension()))
}

/// Computes the overlay of two non-empty geometries, neither a generic collection.
pub trait OverlayEngine {
    fn overlay(&self, a: &Geometry, b: &Geometry, op: OverlayOp) -> GeomResult<Geometry>;
}

/// Overlay using the `geo` crate for areas and a segment noder for lines.
///
/// Polygonal parts come from `geo`'s boolean operations. Lines are noded against each other
/// and against the area boundaries, so an intersection also keeps the edges and points where
/// the inputs only touch.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoOverlay;

impl OverlayEngine for GeoOverlay {
    fn overlay(&self, a: &Geometry, b: &Geometry, op: OverlayOp) -> GeomResult<Geometry> {
        let factory = a.factory();
        let (pa, pb) = (Parts::of(a), Parts::of(b));

        let areas = area_overlay(&pa.areas, &pb.areas, op)?;

        let mut lines = Vec::new();
        let mut points = Vec::new();
        let (noded_a, nodes) = node_lines(&pa.lines, &pb.lines);
        let (noded_b, _) = node_lines(&pb.lines, &pa.lines);
        match op {
            OverlayOp::Intersection => {
                let mut contacts = nodes;
                lines.extend(noded_a.into_iter().filter(|p| p.covered).map(|p| p.coords));
                for (own, other_areas) in [(&pa.lines, &pb.areas), (&pb.lines, &pa.areas)] {
                    let (inside, touches) = split_by_areas(own, other_areas, false);
                    lines.extend(inside);
                    contacts.extend(touches);
                }
                // boundaries shared by the two areas
                if !pa.areas.0.is_empty() && !pb.areas.0.is_empty() {
                    let (pieces, touches) = node_lines(&area_rings(&pa.areas), &area_rings(&pb.areas));
                    lines.extend(pieces.into_iter().filter(|p| p.covered).map(|p| p.coords));
                    contacts.extend(touches);
                }
                for c in contacts {
                    push_unique(&mut points, c);
                }
                for p in pa.points.iter().filter(|p| ops::locate(p, b) != Location::Exterior) {
                    push_unique(&mut points, *p);
                }
                for p in pb.points.iter().filter(|p| ops::locate(p, a) != Location::Exterior) {
                    push_unique(&mut points, *p);
                }
            }
            OverlayOp::Union => {
                let mut noded: Vec<Vec<Coordinate>> = noded_a.into_iter().map(|p| p.coords).collect();
                noded.extend(noded_b.into_iter().filter(|p| !p.covered).map(|p| p.coords));
                lines.extend(split_by_areas(&noded, &areas, true).0);
                for p in pa.points.iter().chain(&pb.points) {
                    push_unique(&mut points, *p);
                }
            }
            OverlayOp::Difference => {
                let remaining: Vec<Vec<Coordinate>> = noded_a
                    .into_iter()
                    .filter(|p| !p.covered)
                    .map(|p| p.coords)
                    .collect();
                lines.extend(split_by_areas(&remaining, &pb.areas, true).0);
                for p in pa.points.iter().filter(|p| ops::locate(p, b) == Location::Exterior) {
                    push_unique(&mut points, *p);
                }
            }
            OverlayOp::SymDifference => {
                let only_a: Vec<Vec<Coordinate>> = noded_a
                    .into_iter()
                    .filter(|p| !p.covered)
                    .map(|p| p.coords)
                    .collect();
                let only_b: Vec<Vec<Coordinate>> = noded_b
                    .into_iter()
                    .filter(|p| !p.covered)
                    .map(|p| p.coords)
                    .collect();
                lines.extend(split_by_areas(&only_a, &pb.areas, true).0);
                lines.extend(split_by_areas(&only_b, &pa.areas, true).0);
                let outside_a = pa.points.iter().filter(|p| ops::locate(p, b) == Location::Exterior);
                let outside_b = pb.points.iter().filter(|p| ops::locate(p, a) == Location::Exterior);
                for p in outside_a.chain(outside_b) {
                    push_unique(&mut points, *p);
                }
            }
        }
        if matches!(op, OverlayOp::Intersection | OverlayOp::Union) {
            // parts absorbed by higher dimension parts of the result
            let rings = area_rings(&areas);
            lines.retain(|l| area_location(&midpoint(&l[0], &l[1]), &areas, &rings) == Location::Exterior);
            points.retain(|p| {
                !on_lines(p, &lines) && area_location(p, &areas, &rings) == Location::Exterior
            });
        }

        assemble(factory, op, a, b, &areas, lines, points)
    }
}

// Input split by dimension
struct Parts {
    points: Vec<Coordinate>,
    lines: Vec<Vec<Coordinate>>,
    areas: geo::MultiPolygon<f64>,
}

impl Parts {
    fn of(geom: &Geometry) -> Self {
        let mut points = Vec::new();
        let mut lines = Vec::new();
        for comp in ops::atomic_components(geom) {
            match comp.kind() {
                GeometryKind::Point(_) => points.extend(comp.coordinate()),
                GeometryKind::LineString(_) | GeometryKind::LinearRing(_) if comp.num_points() > 1 => {
                    lines.push(comp.coordinates())
                }
                _ => {}
            }
        }
        Self {
            points,
            lines,
            areas: ops::to_geo_multi_polygon(geom),
        }
    }
}

fn area_overlay(
    a: &geo::MultiPolygon<f64>,
    b: &geo::MultiPolygon<f64>,
    op: OverlayOp,
) -> GeomResult<geo::MultiPolygon<f64>> {
    let empty = || geo::MultiPolygon::new(Vec::new());
    match (a.0.is_empty(), b.0.is_empty()) {
        (true, true) => return Ok(empty()),
        (false, true) => {
            return Ok(match op {
                OverlayOp::Intersection => empty(),
                _ => a.clone(),
            });
        }
        (true, false) => {
            return Ok(match op {
                OverlayOp::Union | OverlayOp::SymDifference => b.clone(),
                _ => empty(),
            });
        }
        (false, false) => {}
    }
    let mut result = panic::catch_unwind(AssertUnwindSafe(|| match op {
        OverlayOp::Intersection => a.intersection(b),
        OverlayOp::Union => a.union(b),
        OverlayOp::Difference => a.difference(b),
        OverlayOp::SymDifference => a.xor(b),
    }))
    .map_err(|_| {
        log::debug!("area {op} aborted");
        GeometryError::Topology {
            message: format!("area {op} failed"),
            location: None,
        }
    })?;
    // touching inputs can leave zero-area slivers
    result.0.retain(|poly| ops::signed_area_coords(&ring_coordinates(poly.exterior())) != 0.0);
    Ok(result)
}

/// Split `lines` at the boundaries of `areas` and keep the pieces lying in the closed areas,
/// or outside them when `outside` is set. Also returns the points where the lines meet a
/// boundary.
fn split_by_areas(
    lines: &[Vec<Coordinate>],
    areas: &geo::MultiPolygon<f64>,
    outside: bool,
) -> (Vec<Vec<Coordinate>>, Vec<Coordinate>) {
    if areas.0.is_empty() || lines.is_empty() {
        let kept = if outside { lines.to_vec() } else { Vec::new() };
        return (kept, Vec::new());
    }
    let rings = area_rings(areas);
    let (pieces, touches) = node_lines(lines, &rings);
    let kept = pieces
        .into_iter()
        .filter(|p| {
            let inside = p.covered
                || area_location(&midpoint(&p.coords[0], &p.coords[1]), areas, &rings)
                    != Location::Exterior;
            inside != outside
        })
        .map(|p| p.coords)
        .collect();
    (kept, touches)
}

fn ring_coordinates(ls: &geo::LineString<f64>) -> Vec<Coordinate> {
    ls.coords().map(|c| Coordinate::new(c.x, c.y)).collect()
}

// Every shell and hole of the areas
fn area_rings(areas: &geo::MultiPolygon<f64>) -> Vec<Vec<Coordinate>> {
    areas
        .iter()
        .flat_map(|poly| std::iter::once(poly.exterior()).chain(poly.interiors()))
        .map(ring_coordinates)
        .collect()
}

// Location in the closed areas; points within tolerance of a ring are on the boundary
fn area_location(pt: &Coordinate, areas: &geo::MultiPolygon<f64>, rings: &[Vec<Coordinate>]) -> Location {
    if on_lines(pt, rings) {
        return Location::Boundary;
    }
    if areas
        .iter()
        .any(|poly| geo_polygon_location(pt, poly) != Location::Exterior)
    {
        return Location::Interior;
    }
    Location::Exterior
}

fn midpoint(p: &Coordinate, q: &Coordinate) -> Coordinate {
    Coordinate::new((p.x + q.x) / 2.0, (p.y + q.y) / 2.0)
}

fn geo_polygon_location(pt: &Coordinate, poly: &geo::Polygon<f64>) -> Location {
    match ops::locate_in_ring(pt, &ring_coordinates(poly.exterior())) {
        Location::Interior => {}
        loc => return loc,
    }
    for hole in poly.interiors() {
        match ops::locate_in_ring(pt, &ring_coordinates(hole)) {
            Location::Interior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Exterior => {}
        }
    }
    Location::Interior
}

/// A run of noded segments from one input line
#[derive(Debug, Clone)]
struct Piece {
    coords: Vec<Coordinate>,
    /// Whether the piece lies on the other input
    covered: bool,
}

/// Split `lines` wherever they meet `other` and classify each piece by whether it lies on
/// `other`. Also returns the meeting points.
fn node_lines(lines: &[Vec<Coordinate>], other: &[Vec<Coordinate>]) -> (Vec<Piece>, Vec<Coordinate>) {
    let other_segs: Vec<(Coordinate, Coordinate)> = other
        .iter()
        .flat_map(|l| l.windows(2).map(|w| (w[0], w[1])))
        .collect();
    let tol = tolerance(lines.iter().chain(other).flatten());

    let mut pieces = Vec::new();
    let mut nodes: Vec<Coordinate> = Vec::new();

    for line in lines {
        // noded vertices, each flagged as a node or an ordinary vertex
        let mut vertices: Vec<(Coordinate, bool)> = Vec::new();
        for (i, seg) in line.windows(2).enumerate() {
            let (p, q) = (seg[0], seg[1]);
            if i == 0 {
                let is_node = other_segs.iter().any(|(r, s)| ops::point_on_segment(&p, r, s));
                if is_node {
                    push_unique(&mut nodes, p);
                }
                vertices.push((p, is_node));
            }

            let mut splits: Vec<Coordinate> = Vec::new();
            for (r, s) in &other_segs {
                if let Some(x) = ops::intersection_point((&p, &q), (r, s)) {
                    splits.push(x);
                }
                for end in [r, s] {
                    if ops::point_on_segment(end, &p, &q) {
                        splits.push(*end);
                    }
                }
            }
            for x in &splits {
                push_unique(&mut nodes, *x);
            }
            splits.retain(|x| !x.equals_2d(&p) && !x.equals_2d(&q));
            splits.sort_by(|x, y| p.distance(x).total_cmp(&p.distance(y)));
            splits.dedup_by(|x, y| x.equals_2d(y));
            vertices.extend(splits.into_iter().map(|x| (x, true)));

            let q_is_node = other_segs.iter().any(|(r, s)| ops::point_on_segment(&q, r, s));
            if q_is_node {
                push_unique(&mut nodes, q);
            }
            vertices.push((q, q_is_node));
        }

        let mut current: Vec<Coordinate> = Vec::new();
        let mut current_covered = false;
        for (k, (v, is_node)) in vertices.iter().enumerate() {
            if k > 0 {
                let prev = vertices[k - 1].0;
                if prev.equals_2d(v) {
                    continue;
                }
                let mid = midpoint(&prev, v);
                let covered = other_segs
                    .iter()
                    .any(|(r, s)| ops::distance_point_segment(&mid, r, s) <= tol);
                if current.len() > 1 && covered != current_covered {
                    pieces.push(Piece {
                        coords: std::mem::replace(&mut current, vec![prev]),
                        covered: current_covered,
                    });
                }
                current_covered = covered;
            }
            current.push(*v);
            if *is_node && current.len() > 1 {
                pieces.push(Piece {
                    coords: std::mem::replace(&mut current, vec![*v]),
                    covered: current_covered,
                });
            }
        }
        if current.len() > 1 {
            pieces.push(Piece {
                coords: current,
                covered: current_covered,
            });
        }
    }
    (pieces, nodes)
}

/// Split a line wherever it crosses or touches itself
fn self_node(line: &[Coordinate]) -> Vec<Vec<Coordinate>> {
    let segs: Vec<(Coordinate, Coordinate)> = line.windows(2).map(|w| (w[0], w[1])).collect();
    let n = segs.len();
    let closed = n > 1 && line[0].equals_2d(&line[line.len() - 1]);
    let adjacent = |i: usize, j: usize| i.abs_diff(j) == 1 || (closed && i.abs_diff(j) == n - 1);

    let mut nodes: Vec<Coordinate> = Vec::new();
    let mut splits: Vec<Vec<Coordinate>> = vec![Vec::new(); n];
    for (i, (p, q)) in segs.iter().enumerate() {
        for (j, (r, s)) in segs.iter().enumerate() {
            if i == j || adjacent(i, j) {
                continue;
            }
            let mut found: Vec<Coordinate> = ops::intersection_point((p, q), (r, s)).into_iter().collect();
            found.extend([r, s].into_iter().filter(|end| ops::point_on_segment(end, p, q)).copied());
            for x in found {
                push_unique(&mut nodes, x);
                if !x.equals_2d(p) && !x.equals_2d(q) {
                    splits[i].push(x);
                }
            }
        }
    }
    if nodes.is_empty() {
        return vec![line.to_vec()];
    }

    let mut pieces = Vec::new();
    let mut current = vec![line[0]];
    for ((p, q), mut xs) in segs.iter().zip(splits) {
        xs.sort_by(|x, y| p.distance(x).total_cmp(&p.distance(y)));
        xs.dedup_by(|x, y| x.equals_2d(y));
        for v in xs.into_iter().chain(std::iter::once(*q)) {
            if current.last().is_some_and(|last| last.equals_2d(&v)) {
                continue;
            }
            current.push(v);
            if nodes.iter().any(|node| node.equals_2d(&v)) {
                pieces.push(std::mem::replace(&mut current, vec![v]));
            }
        }
    }
    if current.len() > 1 {
        pieces.push(current);
    }
    pieces
}

fn push_unique(coords: &mut Vec<Coordinate>, c: Coordinate) {
    if !coords.iter().any(|n| n.equals_2d(&c)) {
        coords.push(c);
    }
}

// Absolute tolerance for classifying computed points against segments
fn tolerance<'a>(coords: impl Iterator<Item = &'a Coordinate>) -> f64 {
    let magnitude = coords.fold(1.0_f64, |m, c| m.max(c.x.abs()).max(c.y.abs()));
    magnitude * 1e-10
}

fn on_lines(pt: &Coordinate, lines: &[Vec<Coordinate>]) -> bool {
    let tol = tolerance(lines.iter().flatten().chain(std::iter::once(pt)));
    lines.iter().any(|l| {
        l.windows(2)
            .any(|w| ops::distance_point_segment(pt, &w[0], &w[1]) <= tol)
    })
}

fn assemble(
    factory: &Arc<GeometryFactory>,
    op: OverlayOp,
    a: &Geometry,
    b: &Geometry,
    areas: &geo::MultiPolygon<f64>,
    lines: Vec<Vec<Coordinate>>,
    points: Vec<Coordinate>,
) -> GeomResult<Geometry> {
    let pm = factory.precision_model();
    let areas = if pm.is_floating() {
        areas.clone()
    } else {
        snap_areas(areas, pm)?
    };

    let mut parts = ops::from_geo_multi_polygon(factory, &areas)?;
    for mut line in lines {
        snap_coordinates(&mut line, pm)?;
        line.dedup_by(|x, y| x.equals_2d(y));
        if line.len() > 1 {
            parts.push(factory.create_line_string(&line)?);
        }
    }
    let mut snapped_points = points;
    snap_coordinates(&mut snapped_points, pm)?;
    for p in snapped_points {
        parts.push(factory.create_point(&p));
    }

    if parts.is_empty() {
        return Ok(create_empty_result(op, a, b, factory));
    }
    Ok(factory.build_geometry(parts))
}

fn snap_coordinates(coords: &mut [Coordinate], pm: &PrecisionModel) -> GeomResult<()> {
    for c in coords.iter_mut() {
        if !(c.x.is_finite() && c.y.is_finite()) {
            return Err(GeometryError::Topology {
                message: String::from("non-finite coordinate in computed result"),
                location: None,
            });
        }
        pm.make_precise_coordinate(c);
    }
    Ok(())
}

// Round area results onto the grid; a ring collapsing under rounding is a topology failure
fn snap_areas(
    areas: &geo::MultiPolygon<f64>,
    pm: &PrecisionModel,
) -> GeomResult<geo::MultiPolygon<f64>> {
    let snap_ring = |ls: &geo::LineString<f64>| -> GeomResult<geo::LineString<f64>> {
        let mut coords: Vec<Coordinate> = ls.coords().map(|c| Coordinate::new(c.x, c.y)).collect();
        snap_coordinates(&mut coords, pm)?;
        coords.dedup_by(|x, y| x.equals_2d(y));
        if coords.len() < 4 || ops::signed_area_coords(&coords) == 0.0 {
            return Err(GeometryError::Topology {
                message: String::from("ring collapsed under precision reduction"),
                location: coords.first().copied(),
            });
        }
        Ok(geo::LineString::new(
            coords.iter().map(|c| geo::Coord { x: c.x, y: c.y }).collect(),
        ))
    };

    let mut polys = Vec::with_capacity(areas.0.len());
    for poly in areas.iter() {
        let shell = snap_ring(poly.exterior())?;
        let holes = poly
            .interiors()
            .iter()
            .map(|h| snap_ring(h))
            .collect::<GeomResult<Vec<_>>>()?;
        polys.push(geo::Polygon::new(shell, holes));
    }
    Ok(geo::MultiPolygon::new(polys))
}

/// Union of all components of one geometry: areas merged, lines noded against each other and
/// trimmed by the areas, points kept only where nothing else covers them.
pub fn unary_union(geom: &Geometry) -> GeomResult<Geometry> {
    let factory = geom.factory();
    if geom.is_empty() {
        return Ok(factory.create_empty(geom.dimension()));
    }
    let parts = Parts::of(geom);

    let mut areas = geo::MultiPolygon::new(Vec::new());
    for poly in parts.areas.iter() {
        let single = geo::MultiPolygon::new(vec![poly.clone()]);
        areas = area_overlay(&areas, &single, OverlayOp::Union)?;
    }

    let mut lines: Vec<Vec<Coordinate>> = Vec::new();
    for line in parts.lines.iter().flat_map(|l| self_node(l)) {
        let (noded_existing, _) = node_lines(&lines, std::slice::from_ref(&line));
        let (noded_new, _) = node_lines(std::slice::from_ref(&line), &lines);
        lines = noded_existing.into_iter().map(|p| p.coords).collect();
        lines.extend(noded_new.into_iter().filter(|p| !p.covered).map(|p| p.coords));
    }
    let lines = split_by_areas(&lines, &areas, true).0;

    let rings = area_rings(&areas);
    let mut points: Vec<Coordinate> = Vec::new();
    for p in &parts.points {
        if !on_lines(p, &lines) && area_location(p, &areas, &rings) == Location::Exterior {
            push_unique(&mut points, *p);
        }
    }

    assemble(factory, OverlayOp::Union, geom, geom, &areas, lines, points)
}
