use std::sync::Arc;

use super::coordinate::Coordinate;
use super::core::{GeomResult, GeometryError};
use super::dimension::Dimension;
use super::envelope::Envelope;
use super::geometry::{Geometry, GeometryKind, GeometryType};
use super::precision::PrecisionModel;
use super::sequence::{
    CoordinateArraySequenceFactory, CoordinateSequence, CoordinateSequenceFactory,
};

/// Builds geometries that share a precision model, SRID and coordinate storage.
///
/// A factory is immutable and is shared through an `Arc` by every geometry it creates.
///
/// Examples
/// ```rust
/// use geomlib::{Coordinate, GeometryFactory};
///
/// let factory = GeometryFactory::default_shared();
/// let line = factory
///     .create_line_string(&[Coordinate::new(0.0, 0.0), Coordinate::new(3.0, 4.0)])
///     .unwrap();
/// assert_eq!(line.length(), 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct GeometryFactory {
    precision_model: PrecisionModel,
    srid: i32,
    sequence_factory: Arc<dyn CoordinateSequenceFactory>,
}

impl GeometryFactory {
    pub fn new(
        precision_model: PrecisionModel,
        srid: i32,
        sequence_factory: Arc<dyn CoordinateSequenceFactory>,
    ) -> Arc<Self> {
        Arc::new(Self {
            precision_model,
            srid,
            sequence_factory,
        })
    }

    /// Floating precision, SRID 0, array-backed sequences
    pub fn default_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_precision_model(precision_model: PrecisionModel) -> Arc<Self> {
        Self::new(
            precision_model,
            0,
            Arc::new(CoordinateArraySequenceFactory),
        )
    }

    pub fn precision_model(&self) -> &PrecisionModel {
        &self.precision_model
    }

    pub fn srid(&self) -> i32 {
        self.srid
    }

    pub fn sequence_factory(&self) -> &dyn CoordinateSequenceFactory {
        self.sequence_factory.as_ref()
    }

    pub fn create_point_empty(self: &Arc<Self>) -> Geometry {
        let seq = self.sequence_factory.create(&[]);
        Geometry::new(GeometryKind::Point(seq), self.clone())
    }

    pub fn create_point(self: &Arc<Self>, coordinate: &Coordinate) -> Geometry {
        let seq = self.sequence_factory.create(std::slice::from_ref(coordinate));
        Geometry::new(GeometryKind::Point(seq), self.clone())
    }

    /// Point over a sequence of zero or one coordinates
    pub fn create_point_from_sequence(
        self: &Arc<Self>,
        seq: Box<dyn CoordinateSequence>,
    ) -> GeomResult<Geometry> {
        if seq.size() > 1 {
            return Err(GeometryError::InvalidArgument(format!(
                "Point coordinate list must contain a single element, found {}",
                seq.size()
            )));
        }
        Ok(Geometry::new(GeometryKind::Point(seq), self.clone()))
    }

    pub fn create_line_string(self: &Arc<Self>, coordinates: &[Coordinate]) -> GeomResult<Geometry> {
        self.create_line_string_from_sequence(self.sequence_factory.create(coordinates))
    }

    /// Line string over zero or at least two coordinates
    pub fn create_line_string_from_sequence(
        self: &Arc<Self>,
        seq: Box<dyn CoordinateSequence>,
    ) -> GeomResult<Geometry> {
        if seq.size() == 1 {
            return Err(GeometryError::InvalidArgument(String::from(
                "Invalid number of points in LineString (found 1 - must be 0 or >= 2)",
            )));
        }
        Ok(Geometry::new(GeometryKind::LineString(seq), self.clone()))
    }

    pub fn create_linear_ring(self: &Arc<Self>, coordinates: &[Coordinate]) -> GeomResult<Geometry> {
        self.create_linear_ring_from_sequence(self.sequence_factory.create(coordinates))
    }

    /// Linear ring over a closed sequence of zero or at least four coordinates
    pub fn create_linear_ring_from_sequence(
        self: &Arc<Self>,
        seq: Box<dyn CoordinateSequence>,
    ) -> GeomResult<Geometry> {
        let n = seq.size();
        if n > 0 {
            let first = seq.get_coordinate(0)?;
            let last = seq.get_coordinate(n - 1)?;
            if !first.equals_2d(&last) {
                return Err(GeometryError::InvalidArgument(String::from(
                    "Points of LinearRing do not form a closed linestring",
                )));
            }
            if n < 4 {
                return Err(GeometryError::InvalidArgument(format!(
                    "Invalid number of points in LinearRing (found {n} - must be 0 or >= 4)"
                )));
            }
        }
        Ok(Geometry::new(GeometryKind::LinearRing(seq), self.clone()))
    }

    /// Polygon bounded by `shell` with optional `holes`; all rings must be linear rings.
    pub fn create_polygon(
        self: &Arc<Self>,
        shell: Geometry,
        holes: Vec<Geometry>,
    ) -> GeomResult<Geometry> {
        if shell.geometry_type() != GeometryType::LinearRing
            || holes
                .iter()
                .any(|h| h.geometry_type() != GeometryType::LinearRing)
        {
            return Err(GeometryError::InvalidArgument(String::from(
                "Polygon rings must be LinearRings",
            )));
        }
        if shell.is_empty() && holes.iter().any(|h| !h.is_empty()) {
            return Err(GeometryError::InvalidArgument(String::from(
                "shell is empty but holes are not",
            )));
        }
        Ok(Geometry::new(
            GeometryKind::Polygon {
                shell: Box::new(shell),
                holes,
            },
            self.clone(),
        ))
    }

    /// Polygon without holes from the shell coordinates
    pub fn create_polygon_from_coords(self: &Arc<Self>, shell: &[Coordinate]) -> GeomResult<Geometry> {
        let ring = self.create_linear_ring(shell)?;
        self.create_polygon(ring, Vec::new())
    }

    pub fn create_polygon_empty(self: &Arc<Self>) -> Geometry {
        let ring = Geometry::new(
            GeometryKind::LinearRing(self.sequence_factory.create(&[])),
            self.clone(),
        );
        Geometry::new(
            GeometryKind::Polygon {
                shell: Box::new(ring),
                holes: Vec::new(),
            },
            self.clone(),
        )
    }

    pub fn create_multi_point(self: &Arc<Self>, points: Vec<Geometry>) -> GeomResult<Geometry> {
        check_elements(&points, &[GeometryType::Point], "MultiPoint")?;
        Ok(Geometry::new(GeometryKind::MultiPoint(points), self.clone()))
    }

    pub fn create_multi_point_from_coords(self: &Arc<Self>, coordinates: &[Coordinate]) -> Geometry {
        let points = coordinates.iter().map(|c| self.create_point(c)).collect();
        Geometry::new(GeometryKind::MultiPoint(points), self.clone())
    }

    /// Line strings or linear rings
    pub fn create_multi_line_string(self: &Arc<Self>, lines: Vec<Geometry>) -> GeomResult<Geometry> {
        check_elements(
            &lines,
            &[GeometryType::LineString, GeometryType::LinearRing],
            "MultiLineString",
        )?;
        Ok(Geometry::new(GeometryKind::MultiLineString(lines), self.clone()))
    }

    pub fn create_multi_polygon(self: &Arc<Self>, polygons: Vec<Geometry>) -> GeomResult<Geometry> {
        check_elements(&polygons, &[GeometryType::Polygon], "MultiPolygon")?;
        Ok(Geometry::new(GeometryKind::MultiPolygon(polygons), self.clone()))
    }

    pub fn create_geometry_collection(self: &Arc<Self>, geometries: Vec<Geometry>) -> Geometry {
        Geometry::new(GeometryKind::GeometryCollection(geometries), self.clone())
    }

    /// Empty atomic geometry of the given dimension; an empty collection for anything else.
    pub fn create_empty(self: &Arc<Self>, dimension: Dimension) -> Geometry {
        match dimension {
            Dimension::P => self.create_point_empty(),
            Dimension::L => Geometry::new(
                GeometryKind::LineString(self.sequence_factory.create(&[])),
                self.clone(),
            ),
            Dimension::A => self.create_polygon_empty(),
            _ => self.create_geometry_collection(Vec::new()),
        }
    }

    /// Most specific geometry holding `geometries`.
    ///
    /// No elements gives an empty collection and a single element is returned as is. Elements
    /// of one atomic type become the matching multi geometry (rings become a multi line
    /// string); anything else becomes a geometry collection.
    pub fn build_geometry(self: &Arc<Self>, mut geometries: Vec<Geometry>) -> Geometry {
        if geometries.is_empty() {
            return self.create_geometry_collection(geometries);
        }
        let first_type = geometries[0].geometry_type();
        let homogeneous = geometries.iter().all(|g| g.geometry_type() == first_type);
        if !homogeneous || first_type.is_collection() {
            return self.create_geometry_collection(geometries);
        }
        if geometries.len() == 1 {
            if let Some(only) = geometries.pop() {
                return only;
            }
        }
        let kind = match first_type {
            GeometryType::Point => GeometryKind::MultiPoint(geometries),
            GeometryType::LineString | GeometryType::LinearRing => {
                GeometryKind::MultiLineString(geometries)
            }
            GeometryType::Polygon => GeometryKind::MultiPolygon(geometries),
            _ => GeometryKind::GeometryCollection(geometries),
        };
        Geometry::new(kind, self.clone())
    }

    /// The smallest geometry covering an envelope: an empty point, a point, a line or a
    /// polygon running `(minx miny, minx maxy, maxx maxy, maxx miny, minx miny)`.
    pub fn to_geometry(self: &Arc<Self>, env: &Envelope) -> GeomResult<Geometry> {
        if env.is_null() {
            return Ok(self.create_point_empty());
        }
        let (min_x, max_x, min_y, max_y) = (env.min_x(), env.max_x(), env.min_y(), env.max_y());
        if min_x == max_x && min_y == max_y {
            return Ok(self.create_point(&Coordinate::new(min_x, min_y)));
        }
        if min_x == max_x || min_y == max_y {
            return self.create_line_string(&[
                Coordinate::new(min_x, min_y),
                Coordinate::new(max_x, max_y),
            ]);
        }
        self.create_polygon_from_coords(&[
            Coordinate::new(min_x, min_y),
            Coordinate::new(min_x, max_y),
            Coordinate::new(max_x, max_y),
            Coordinate::new(max_x, min_y),
            Coordinate::new(min_x, min_y),
        ])
    }

    /// Copy of `geom` rebuilt with this factory's coordinate storage
    pub fn create_geometry(self: &Arc<Self>, geom: &Geometry) -> Geometry {
        let kind = match geom.kind() {
            GeometryKind::Point(seq) => GeometryKind::Point(self.convert(seq.as_ref())),
            GeometryKind::LineString(seq) => GeometryKind::LineString(self.convert(seq.as_ref())),
            GeometryKind::LinearRing(seq) => GeometryKind::LinearRing(self.convert(seq.as_ref())),
            GeometryKind::Polygon { shell, holes } => GeometryKind::Polygon {
                shell: Box::new(self.create_geometry(shell)),
                holes: holes.iter().map(|h| self.create_geometry(h)).collect(),
            },
            GeometryKind::MultiPoint(elems) => GeometryKind::MultiPoint(self.convert_all(elems)),
            GeometryKind::MultiLineString(elems) => {
                GeometryKind::MultiLineString(self.convert_all(elems))
            }
            GeometryKind::MultiPolygon(elems) => {
                GeometryKind::MultiPolygon(self.convert_all(elems))
            }
            GeometryKind::GeometryCollection(elems) => {
                GeometryKind::GeometryCollection(self.convert_all(elems))
            }
        };
        Geometry::new(kind, self.clone())
    }

    fn convert(&self, seq: &dyn CoordinateSequence) -> Box<dyn CoordinateSequence> {
        self.sequence_factory.create_from_sequence(seq)
    }

    fn convert_all(self: &Arc<Self>, geoms: &[Geometry]) -> Vec<Geometry> {
        geoms.iter().map(|g| self.create_geometry(g)).collect()
    }
}

impl Default for GeometryFactory {
    fn default() -> Self {
        Self {
            precision_model: PrecisionModel::Floating,
            srid: 0,
            sequence_factory: Arc::new(CoordinateArraySequenceFactory),
        }
    }
}

fn check_elements(geoms: &[Geometry], allowed: &[GeometryType], target: &str) -> GeomResult<()> {
    match geoms.iter().find(|g| !allowed.contains(&g.geometry_type())) {
        Some(bad) => Err(GeometryError::InvalidArgument(format!(
            "{target} cannot contain a {}",
            bad.geometry_type()
        ))),
        None => Ok(()),
    }
}
