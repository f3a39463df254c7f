use std::ops::{Deref, DerefMut};

use super::{Geometry, GeometryKind};
use crate::coordinate::Coordinate;
use crate::sequence::CoordinateSequence;

/// Visits every vertex of a geometry, read-only
pub trait CoordinateFilter {
    fn filter(&mut self, coord: &Coordinate);
}

impl<F: FnMut(&Coordinate)> CoordinateFilter for F {
    fn filter(&mut self, coord: &Coordinate) {
        self(coord)
    }
}

/// Visits every vertex of a geometry through its coordinate sequence, possibly writing
/// ordinates in place.
pub trait CoordinateSequenceFilter {
    fn filter(&mut self, seq: &mut dyn CoordinateSequence, index: usize);

    /// Stop visiting further vertices
    fn is_done(&self) -> bool {
        false
    }

    /// Whether the filter wrote ordinates; cached values are dropped when it did
    fn is_geometry_changed(&self) -> bool {
        true
    }
}

impl<F: FnMut(&mut dyn CoordinateSequence, usize)> CoordinateSequenceFilter for F {
    fn filter(&mut self, seq: &mut dyn CoordinateSequence, index: usize) {
        self(seq, index)
    }
}

/// Visits a geometry and every element of its collections
pub trait GeometryFilter {
    fn filter(&mut self, geom: &Geometry);
}

impl<F: FnMut(&Geometry)> GeometryFilter for F {
    fn filter(&mut self, geom: &Geometry) {
        self(geom)
    }
}

/// Visits a geometry and every component down to its rings
pub trait GeometryComponentFilter {
    fn filter(&mut self, geom: &Geometry);
}

impl<F: FnMut(&Geometry)> GeometryComponentFilter for F {
    fn filter(&mut self, geom: &Geometry) {
        self(geom)
    }
}

/// Collects every vertex
#[derive(Debug, Default, Clone)]
pub struct CoordinateArrayFilter {
    coords: Vec<Coordinate>,
}

impl CoordinateArrayFilter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            coords: Vec::with_capacity(capacity),
        }
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coords
    }

    pub fn into_coordinates(self) -> Vec<Coordinate> {
        self.coords
    }
}

impl CoordinateFilter for CoordinateArrayFilter {
    fn filter(&mut self, coord: &Coordinate) {
        self.coords.push(*coord);
    }
}

/// Counts vertices
#[derive(Debug, Default, Clone, Copy)]
pub struct CoordinateCountFilter {
    n: usize,
}

impl CoordinateCountFilter {
    pub fn count(&self) -> usize {
        self.n
    }
}

impl CoordinateFilter for CoordinateCountFilter {
    fn filter(&mut self, _coord: &Coordinate) {
        self.n += 1;
    }
}

impl Geometry {
    pub fn apply_coordinate_filter<F: CoordinateFilter + ?Sized>(&self, filter: &mut F) {
        match &self.kind {
            GeometryKind::Point(seq) | GeometryKind::LineString(seq) | GeometryKind::LinearRing(seq) => {
                for i in 0..seq.size() {
                    if let Ok(c) = seq.get_coordinate(i) {
                        filter.filter(&c);
                    }
                }
            }
            GeometryKind::Polygon { shell, holes } => {
                shell.apply_coordinate_filter(filter);
                for hole in holes {
                    hole.apply_coordinate_filter(filter);
                }
            }
            _ => {
                for g in self.geometries() {
                    g.apply_coordinate_filter(filter);
                }
            }
        }
    }

    /// Run `filter` over every vertex until it reports done, then drop cached values if it
    /// reports a change.
    pub fn apply_sequence_filter<F: CoordinateSequenceFilter + ?Sized>(&mut self, filter: &mut F) {
        match &mut self.kind {
            GeometryKind::Point(seq) | GeometryKind::LineString(seq) | GeometryKind::LinearRing(seq) => {
                for i in 0..seq.size() {
                    filter.filter(seq.as_mut(), i);
                    if filter.is_done() {
                        break;
                    }
                }
            }
            GeometryKind::Polygon { shell, holes } => {
                shell.apply_sequence_filter(filter);
                for hole in holes.iter_mut() {
                    if filter.is_done() {
                        break;
                    }
                    hole.apply_sequence_filter(filter);
                }
            }
            GeometryKind::MultiPoint(elems)
            | GeometryKind::MultiLineString(elems)
            | GeometryKind::MultiPolygon(elems)
            | GeometryKind::GeometryCollection(elems) => {
                for g in elems.iter_mut() {
                    g.apply_sequence_filter(filter);
                    if filter.is_done() {
                        break;
                    }
                }
            }
        }
        if filter.is_geometry_changed() {
            self.geometry_changed();
        }
    }

    /// Visit this geometry, then each collection element; polygon rings are not visited.
    pub fn apply_geometry_filter<F: GeometryFilter + ?Sized>(&self, filter: &mut F) {
        filter.filter(self);
        for g in self.geometries() {
            g.apply_geometry_filter(filter);
        }
    }

    /// Visit this geometry and all of its components, including polygon rings.
    pub fn apply_component_filter<F: GeometryComponentFilter + ?Sized>(&self, filter: &mut F) {
        filter.filter(self);
        match &self.kind {
            GeometryKind::Polygon { shell, holes } => {
                shell.apply_component_filter(filter);
                for hole in holes {
                    hole.apply_component_filter(filter);
                }
            }
            _ => {
                for g in self.geometries() {
                    g.apply_component_filter(filter);
                }
            }
        }
    }

    /// Mutable access to the coordinates. Cached values are dropped when the guard goes out of
    /// scope.
    ///
    /// Examples
    /// ```rust
    /// use geomlib::{Coordinate, GeometryFactory};
    ///
    /// let factory = GeometryFactory::default_shared();
    /// let mut line = factory
    ///     .create_line_string(&[Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)])
    ///     .unwrap();
    /// assert_eq!(line.envelope_internal().max_x(), 1.0);
    /// {
    ///     let mut guard = line.mutate();
    ///     for seq in guard.sequences() {
    ///         seq.set_ordinate(1, 0, 5.0).unwrap();
    ///     }
    /// }
    /// assert_eq!(line.envelope_internal().max_x(), 5.0);
    /// ```
    pub fn mutate(&mut self) -> GeometryMut<'_> {
        GeometryMut { geom: self }
    }

    fn collect_sequences<'a>(&'a mut self, out: &mut Vec<&'a mut dyn CoordinateSequence>) {
        match &mut self.kind {
            GeometryKind::Point(seq) | GeometryKind::LineString(seq) | GeometryKind::LinearRing(seq) => {
                out.push(seq.as_mut());
            }
            GeometryKind::Polygon { shell, holes } => {
                shell.collect_sequences(out);
                for hole in holes.iter_mut() {
                    hole.collect_sequences(out);
                }
            }
            GeometryKind::MultiPoint(elems)
            | GeometryKind::MultiLineString(elems)
            | GeometryKind::MultiPolygon(elems)
            | GeometryKind::GeometryCollection(elems) => {
                for g in elems.iter_mut() {
                    g.collect_sequences(out);
                }
            }
        }
    }
}

/// Scoped mutable view of a geometry returned by [`Geometry::mutate`]
pub struct GeometryMut<'a> {
    geom: &'a mut Geometry,
}

impl GeometryMut<'_> {
    /// Every coordinate sequence of the geometry, in component order
    pub fn sequences(&mut self) -> Vec<&mut dyn CoordinateSequence> {
        let mut out = Vec::new();
        self.geom.collect_sequences(&mut out);
        out
    }
}

impl Deref for GeometryMut<'_> {
    type Target = Geometry;

    fn deref(&self) -> &Geometry {
        self.geom
    }
}

impl DerefMut for GeometryMut<'_> {
    fn deref_mut(&mut self) -> &mut Geometry {
        self.geom
    }
}

impl Drop for GeometryMut<'_> {
    fn drop(&mut self) {
        self.geom.geometry_changed();
    }
}
