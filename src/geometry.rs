use std::any::Any;
use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

use super::coordinate::Coordinate;
use super::core::{GeomResult, GeometricObject, GeometryError, display_for_geom};
use super::dimension::Dimension;
use super::envelope::Envelope;
use super::factory::GeometryFactory;
use super::ops;
use super::precision::PrecisionModel;
use super::sequence::{self, CoordinateSequence};
use super::serialization;
use super::valid;

mod compare;
mod filter;
mod predicate;
mod setop;

pub use filter::{
    CoordinateArrayFilter, CoordinateCountFilter, CoordinateFilter, CoordinateSequenceFilter,
    GeometryComponentFilter, GeometryFilter, GeometryMut,
};

/// Opaque value attached to a geometry by the caller
pub type UserData = Arc<dyn Any + Send + Sync>;

/// The concrete shape of a [`Geometry`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Point,
    MultiPoint,
    LineString,
    LinearRing,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    /// Rank used to order geometries of different types
    pub fn sort_index(&self) -> u8 {
        match self {
            GeometryType::Point => 0,
            GeometryType::MultiPoint => 1,
            GeometryType::LineString => 2,
            GeometryType::LinearRing => 3,
            GeometryType::MultiLineString => 4,
            GeometryType::Polygon => 5,
            GeometryType::MultiPolygon => 6,
            GeometryType::GeometryCollection => 7,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::LineString => "LineString",
            GeometryType::LinearRing => "LinearRing",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }

    /// True for the multi geometries and the generic collection
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            GeometryType::MultiPoint
                | GeometryType::MultiLineString
                | GeometryType::MultiPolygon
                | GeometryType::GeometryCollection
        )
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Shape specific content of a geometry
#[derive(Debug, Clone)]
pub enum GeometryKind {
    Point(Box<dyn CoordinateSequence>),
    LineString(Box<dyn CoordinateSequence>),
    LinearRing(Box<dyn CoordinateSequence>),
    Polygon {
        shell: Box<Geometry>,
        holes: Vec<Geometry>,
    },
    MultiPoint(Vec<Geometry>),
    MultiLineString(Vec<Geometry>),
    MultiPolygon(Vec<Geometry>),
    GeometryCollection(Vec<Geometry>),
}

/// A planar geometry: a point, curve, surface or collection of them.
///
/// Geometries are created through a [`GeometryFactory`] and keep a shared reference to it. The
/// envelope is computed lazily and cached; the cache lives in a [`OnceCell`], so a geometry
/// can be read from one thread at a time and coordinate changes need `&mut` access, through
/// [`Geometry::mutate`] or a [`CoordinateSequenceFilter`]. Both invalidate the cache.
///
/// Examples
/// ```rust
/// use geomlib::{GeometryFactory, Coordinate};
///
/// let factory = GeometryFactory::default_shared();
/// let square = factory
///     .create_polygon_from_coords(&[
///         Coordinate::new(0.0, 0.0),
///         Coordinate::new(0.0, 2.0),
///         Coordinate::new(2.0, 2.0),
///         Coordinate::new(2.0, 0.0),
///         Coordinate::new(0.0, 0.0),
///     ])
///     .unwrap();
/// let pt = factory.create_point(&Coordinate::new(1.0, 1.0));
/// assert!(square.contains(&pt).unwrap());
/// assert_eq!(square.area(), 4.0);
/// ```
#[derive(Clone)]
pub struct Geometry {
    kind: GeometryKind,
    factory: Arc<GeometryFactory>,
    srid: i32,
    envelope: OnceCell<Envelope>,
    user_data: Option<UserData>,
}

impl Geometry {
    pub(crate) fn new(kind: GeometryKind, factory: Arc<GeometryFactory>) -> Self {
        let srid = factory.srid();
        Self {
            kind,
            factory,
            srid,
            envelope: OnceCell::new(),
            user_data: None,
        }
    }

    pub fn kind(&self) -> &GeometryKind {
        &self.kind
    }

    pub fn geometry_type(&self) -> GeometryType {
        match &self.kind {
            GeometryKind::Point(_) => GeometryType::Point,
            GeometryKind::LineString(_) => GeometryType::LineString,
            GeometryKind::LinearRing(_) => GeometryType::LinearRing,
            GeometryKind::Polygon { .. } => GeometryType::Polygon,
            GeometryKind::MultiPoint(_) => GeometryType::MultiPoint,
            GeometryKind::MultiLineString(_) => GeometryType::MultiLineString,
            GeometryKind::MultiPolygon(_) => GeometryType::MultiPolygon,
            GeometryKind::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    /// True only for the generic collection, not for the multi geometries
    pub fn is_geometry_collection(&self) -> bool {
        matches!(self.kind, GeometryKind::GeometryCollection(_))
    }

    pub fn factory(&self) -> &Arc<GeometryFactory> {
        &self.factory
    }

    pub fn precision_model(&self) -> &PrecisionModel {
        self.factory.precision_model()
    }

    /// Spatial reference id. Set from the factory at construction, independent of it afterwards.
    pub fn srid(&self) -> i32 {
        self.srid
    }

    pub fn set_srid(&mut self, srid: i32) {
        self.srid = srid;
    }

    pub fn user_data(&self) -> Option<&UserData> {
        self.user_data.as_ref()
    }

    pub fn set_user_data(&mut self, user_data: Option<UserData>) {
        self.user_data = user_data;
    }

    /// Coordinates of a point, line string or linear ring
    pub fn sequence(&self) -> Option<&dyn CoordinateSequence> {
        match &self.kind {
            GeometryKind::Point(seq) | GeometryKind::LineString(seq) | GeometryKind::LinearRing(seq) => {
                Some(seq.as_ref())
            }
            _ => None,
        }
    }

    /// Elements of a collection; empty for atomic geometries
    pub fn geometries(&self) -> &[Geometry] {
        match &self.kind {
            GeometryKind::MultiPoint(elems)
            | GeometryKind::MultiLineString(elems)
            | GeometryKind::MultiPolygon(elems)
            | GeometryKind::GeometryCollection(elems) => elems,
            _ => &[],
        }
    }

    /// Number of elements; 1 for atomic geometries
    pub fn num_geometries(&self) -> usize {
        if self.geometry_type().is_collection() {
            self.geometries().len()
        } else {
            1
        }
    }

    /// Element `n` of a collection, or the geometry itself for `n == 0` when atomic
    pub fn geometry_n(&self, n: usize) -> Option<&Geometry> {
        if self.geometry_type().is_collection() {
            self.geometries().get(n)
        } else if n == 0 {
            Some(self)
        } else {
            None
        }
    }

    pub fn exterior_ring(&self) -> Option<&Geometry> {
        match &self.kind {
            GeometryKind::Polygon { shell, .. } => Some(shell),
            _ => None,
        }
    }

    pub fn interior_rings(&self) -> &[Geometry] {
        match &self.kind {
            GeometryKind::Polygon { holes, .. } => holes,
            _ => &[],
        }
    }

    pub fn num_interior_rings(&self) -> usize {
        self.interior_rings().len()
    }

    pub fn is_empty(&self) -> bool {
        match &self.kind {
            GeometryKind::Point(seq) | GeometryKind::LineString(seq) | GeometryKind::LinearRing(seq) => {
                seq.is_empty()
            }
            GeometryKind::Polygon { shell, .. } => shell.is_empty(),
            _ => self.geometries().iter().all(Geometry::is_empty),
        }
    }

    /// Topological dimension: P, L or A; `False` for an empty generic collection
    pub fn dimension(&self) -> Dimension {
        match &self.kind {
            GeometryKind::Point(_) | GeometryKind::MultiPoint(_) => Dimension::P,
            GeometryKind::LineString(_)
            | GeometryKind::LinearRing(_)
            | GeometryKind::MultiLineString(_) => Dimension::L,
            GeometryKind::Polygon { .. } | GeometryKind::MultiPolygon(_) => Dimension::A,
            GeometryKind::GeometryCollection(elems) => elems
                .iter()
                .map(Geometry::dimension)
                .fold(Dimension::False, Dimension::max),
        }
    }

    /// Dimension of the boundary; `False` when the boundary is empty
    pub fn boundary_dimension(&self) -> Dimension {
        match &self.kind {
            GeometryKind::Point(_) | GeometryKind::MultiPoint(_) | GeometryKind::LinearRing(_) => {
                Dimension::False
            }
            GeometryKind::LineString(_) | GeometryKind::MultiLineString(_) => {
                if self.is_closed() {
                    Dimension::False
                } else {
                    Dimension::P
                }
            }
            GeometryKind::Polygon { .. } | GeometryKind::MultiPolygon(_) => Dimension::L,
            GeometryKind::GeometryCollection(elems) => elems
                .iter()
                .map(Geometry::boundary_dimension)
                .fold(Dimension::False, Dimension::max),
        }
    }

    /// True for a non-empty curve whose ends meet, or a non-empty multi line string made only of
    /// such curves
    pub fn is_closed(&self) -> bool {
        match &self.kind {
            GeometryKind::LineString(seq) | GeometryKind::LinearRing(seq) => {
                let n = seq.size();
                n > 0
                    && seq.ordinate(0, 0) == seq.ordinate(n - 1, 0)
                    && seq.ordinate(0, 1) == seq.ordinate(n - 1, 1)
            }
            GeometryKind::MultiLineString(elems) => {
                !elems.is_empty() && elems.iter().all(Geometry::is_closed)
            }
            _ => false,
        }
    }

    /// True for a closed and simple curve
    pub fn is_ring(&self) -> bool {
        match &self.kind {
            GeometryKind::LineString(_) | GeometryKind::LinearRing(_) => {
                self.is_closed() && self.is_simple()
            }
            _ => false,
        }
    }

    /// Combinatorial boundary.
    ///
    /// Curves use the Mod-2 rule: an end point is on the boundary if it ends an odd number of
    /// component curves. Not defined for generic collections.
    pub fn boundary(&self) -> GeomResult<Geometry> {
        let factory = &self.factory;
        match &self.kind {
            GeometryKind::Point(_) | GeometryKind::MultiPoint(_) => {
                Ok(factory.create_geometry_collection(Vec::new()))
            }
            GeometryKind::LinearRing(_) => factory.create_multi_point(Vec::new()),
            GeometryKind::LineString(_) | GeometryKind::MultiLineString(_) => {
                let points = mod2_boundary_points(self)
                    .iter()
                    .map(|c| factory.create_point(c))
                    .collect();
                factory.create_multi_point(points)
            }
            GeometryKind::Polygon { shell, holes } => {
                if self.is_empty() {
                    return factory.create_multi_line_string(Vec::new());
                }
                if holes.is_empty() {
                    return Ok(shell.copy());
                }
                let rings = std::iter::once(shell.as_ref())
                    .chain(holes.iter())
                    .map(Geometry::copy)
                    .collect();
                factory.create_multi_line_string(rings)
            }
            GeometryKind::MultiPolygon(elems) => {
                let rings = elems
                    .iter()
                    .flat_map(|p| p.exterior_ring().into_iter().chain(p.interior_rings()))
                    .filter(|r| !r.is_empty())
                    .map(Geometry::copy)
                    .collect();
                factory.create_multi_line_string(rings)
            }
            GeometryKind::GeometryCollection(_) => Err(GeometryError::collection_not_supported()),
        }
    }

    /// Bounding box, computed on first use and cached until the geometry changes
    pub fn envelope_internal(&self) -> Envelope {
        *self.envelope.get_or_init(|| self.compute_envelope())
    }

    fn compute_envelope(&self) -> Envelope {
        let mut env = Envelope::null();
        match &self.kind {
            GeometryKind::Point(seq) | GeometryKind::LineString(seq) | GeometryKind::LinearRing(seq) => {
                seq.expand_envelope(&mut env);
            }
            GeometryKind::Polygon { shell, .. } => env = shell.envelope_internal(),
            _ => {
                for g in self.geometries() {
                    env.expand_to_include_envelope(&g.envelope_internal());
                }
            }
        }
        env
    }

    /// Bounding box as a geometry (see [`GeometryFactory::to_geometry`])
    pub fn envelope(&self) -> GeomResult<Geometry> {
        self.factory.to_geometry(&self.envelope_internal())
    }

    /// Drop cached values of this geometry and all of its components
    pub fn geometry_changed(&mut self) {
        self.envelope.take();
        match &mut self.kind {
            GeometryKind::Polygon { shell, holes } => {
                shell.geometry_changed();
                holes.iter_mut().for_each(Geometry::geometry_changed);
            }
            GeometryKind::MultiPoint(elems)
            | GeometryKind::MultiLineString(elems)
            | GeometryKind::MultiPolygon(elems)
            | GeometryKind::GeometryCollection(elems) => {
                elems.iter_mut().for_each(Geometry::geometry_changed);
            }
            _ => {}
        }
    }

    /// First vertex, if any
    pub fn coordinate(&self) -> Option<Coordinate> {
        match &self.kind {
            GeometryKind::Point(seq) | GeometryKind::LineString(seq) | GeometryKind::LinearRing(seq) => {
                seq.get_coordinate(0).ok()
            }
            GeometryKind::Polygon { shell, .. } => shell.coordinate(),
            _ => self.geometries().iter().find_map(Geometry::coordinate),
        }
    }

    /// Every vertex, in component order
    pub fn coordinates(&self) -> Vec<Coordinate> {
        let mut filter = CoordinateArrayFilter::with_capacity(self.num_points());
        self.apply_coordinate_filter(&mut filter);
        filter.into_coordinates()
    }

    pub fn num_points(&self) -> usize {
        let mut filter = CoordinateCountFilter::default();
        self.apply_coordinate_filter(&mut filter);
        filter.count()
    }

    /// Area of the surfaces; 0 for points and curves
    pub fn area(&self) -> f64 {
        match &self.kind {
            GeometryKind::Polygon { shell, holes } => {
                let ring_area = |r: &Geometry| r.sequence().map_or(0.0, |s| ops::signed_area(s).abs());
                ring_area(shell) - holes.iter().map(ring_area).sum::<f64>()
            }
            GeometryKind::Point(_) | GeometryKind::LineString(_) | GeometryKind::LinearRing(_) => 0.0,
            _ => self.geometries().iter().map(Geometry::area).sum(),
        }
    }

    /// Length of the curves, or perimeter of the surfaces
    pub fn length(&self) -> f64 {
        match &self.kind {
            GeometryKind::Point(_) => 0.0,
            GeometryKind::LineString(seq) | GeometryKind::LinearRing(seq) => ops::length(seq.as_ref()),
            GeometryKind::Polygon { shell, holes } => {
                shell.length() + holes.iter().map(Geometry::length).sum::<f64>()
            }
            _ => self.geometries().iter().map(Geometry::length).sum(),
        }
    }

    /// True for a polygon whose only ring is an axis aligned rectangle
    pub fn is_rectangle(&self) -> bool {
        let GeometryKind::Polygon { shell, holes } = &self.kind else {
            return false;
        };
        let Some(seq) = shell.sequence() else {
            return false;
        };
        if !holes.is_empty() || seq.size() != 5 {
            return false;
        }

        let env = self.envelope_internal();
        for i in 0..5 {
            let (x, y) = (seq.ordinate(i, 0), seq.ordinate(i, 1));
            if !(x == env.min_x() || x == env.max_x()) || !(y == env.min_y() || y == env.max_y()) {
                return false;
            }
        }

        // each edge must be axis parallel, changing exactly one ordinate
        let (mut prev_x, mut prev_y) = (seq.ordinate(0, 0), seq.ordinate(0, 1));
        for i in 1..5 {
            let (x, y) = (seq.ordinate(i, 0), seq.ordinate(i, 1));
            if (x != prev_x) == (y != prev_y) {
                return false;
            }
            prev_x = x;
            prev_y = y;
        }
        true
    }

    /// Deep copy. SRID and the user data reference are kept.
    pub fn copy(&self) -> Geometry {
        self.clone()
    }

    /// Copy with every curve and ring running in the opposite direction
    pub fn reverse(&self) -> GeomResult<Geometry> {
        let mut rev = self.copy();
        rev.reverse_in_place()?;
        Ok(rev)
    }

    fn reverse_in_place(&mut self) -> GeomResult<()> {
        match &mut self.kind {
            GeometryKind::Point(_) => {}
            GeometryKind::LineString(seq) | GeometryKind::LinearRing(seq) => {
                sequence::ops::reverse(seq.as_mut())?;
            }
            GeometryKind::Polygon { shell, holes } => {
                shell.reverse_in_place()?;
                for hole in holes.iter_mut() {
                    hole.reverse_in_place()?;
                }
            }
            GeometryKind::MultiPoint(elems)
            | GeometryKind::MultiLineString(elems)
            | GeometryKind::MultiPolygon(elems)
            | GeometryKind::GeometryCollection(elems) => {
                for g in elems.iter_mut() {
                    g.reverse_in_place()?;
                }
            }
        }
        self.geometry_changed();
        Ok(())
    }

    /// Centre of mass of the highest dimension components, snapped to the precision model
    pub fn centroid(&self) -> Geometry {
        match ops::centroid(self) {
            Some(mut c) => {
                self.precision_model().make_precise_coordinate(&mut c);
                self.factory.create_point(&c)
            }
            None => self.factory.create_point_empty(),
        }
    }

    /// A point guaranteed to lie in the interior (or on a point/curve for lower dimensions),
    /// snapped to the precision model
    pub fn interior_point(&self) -> Geometry {
        match ops::interior_point(self) {
            Some(mut c) => {
                self.precision_model().make_precise_coordinate(&mut c);
                self.factory.create_point(&c)
            }
            None => self.factory.create_point_empty(),
        }
    }

    /// Smallest convex geometry containing every vertex
    pub fn convex_hull(&self) -> GeomResult<Geometry> {
        ops::convex_hull(&self.factory, &self.coordinates())
    }

    pub fn is_valid(&self) -> bool {
        valid::validation_error(self).is_none()
    }

    /// First validity problem found, as a message
    pub fn validation_error(&self) -> Option<String> {
        valid::validation_error(self)
    }

    pub fn is_simple(&self) -> bool {
        valid::is_simple(self)
    }

    /// Well-known text form
    pub fn to_text(&self) -> String {
        self.wkt()
    }
}

// End points that occur an odd number of times among the curves, in coordinate order
fn mod2_boundary_points(geom: &Geometry) -> Vec<Coordinate> {
    let mut ends: Vec<(Coordinate, usize)> = Vec::new();
    let curves: Vec<&Geometry> = match geom.kind() {
        GeometryKind::MultiLineString(elems) => elems.iter().collect(),
        _ => vec![geom],
    };
    for curve in curves {
        let Some(seq) = curve.sequence() else {
            continue;
        };
        if seq.is_empty() {
            continue;
        }
        for i in [0, seq.size() - 1] {
            if let Ok(c) = seq.get_coordinate(i) {
                match ends.iter_mut().find(|(e, _)| e.equals_2d(&c)) {
                    Some((_, count)) => *count += 1,
                    None => ends.push((c, 1)),
                }
            }
        }
    }
    let mut boundary: Vec<Coordinate> = ends
        .into_iter()
        .filter(|(_, count)| count % 2 == 1)
        .map(|(c, _)| c)
        .collect();
    boundary.sort_by(|a, b| a.compare_to(b));
    boundary
}

impl GeometricObject for Geometry {
    fn wkt(&self) -> String {
        serialization::write_wkt(self)
    }
}

display_for_geom!(Geometry);

impl fmt::Debug for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Geometry")
            .field("kind", &self.kind)
            .field("srid", &self.srid)
            .field("has_user_data", &self.user_data.is_some())
            .finish()
    }
}
