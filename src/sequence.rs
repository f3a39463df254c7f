use std::cmp::Ordering;
use std::fmt;

use super::coordinate::{Coordinate, CoordinateLayout, NULL_ORDINATE, X, Y, Z};
use super::core::{self, GeomResult, GeometryError};
use super::envelope::Envelope;

mod array;
pub mod ops;
mod packed;

pub use array::{CoordinateArraySequence, CoordinateArraySequenceFactory};
pub use packed::{PackedCoordinateSequence, PackedCoordinateSequenceFactory};

/// An ordered, indexable, mutable run of coordinates with a fixed ordinate layout.
///
/// `dimension` is the number of ordinates per coordinate (2 to 4) and `measures` tells how
/// many of the trailing ordinates are measures rather than spatial values (0 or 1).
/// Ordinate indexes run from 0 to `dimension - 1`: X, Y, then Z (if spatial dimension is 3),
/// then M.
///
/// Storage is up to the implementation, so `get_coordinate` always returns a copy.
pub trait CoordinateSequence: fmt::Debug + Send + Sync {
    fn size(&self) -> usize;

    fn dimension(&self) -> usize;

    fn measures(&self) -> usize {
        0
    }

    fn has_z(&self) -> bool {
        self.dimension() - self.measures() > 2
    }

    fn has_m(&self) -> bool {
        self.measures() > 0
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Layout of the coordinates this sequence hands out
    fn layout(&self) -> CoordinateLayout {
        CoordinateLayout::from_dimension(self.dimension(), self.measures())
    }

    /// A blank coordinate matching this sequence's layout
    fn create_coordinate(&self) -> Coordinate {
        Coordinate::with_layout(self.layout())
    }

    /// Ordinate value; fails for an index outside the sequence or an ordinate outside the
    /// dimension.
    fn get_ordinate(&self, index: usize, ordinate: usize) -> GeomResult<f64>;

    fn set_ordinate(&mut self, index: usize, ordinate: usize, value: f64) -> GeomResult<()>;

    /// Lenient ordinate access returning NaN for anything out of range.
    fn ordinate(&self, index: usize, ordinate: usize) -> f64 {
        self.get_ordinate(index, ordinate).unwrap_or(NULL_ORDINATE)
    }

    fn get_x(&self, index: usize) -> GeomResult<f64> {
        self.get_ordinate(index, X)
    }

    fn get_y(&self, index: usize) -> GeomResult<f64> {
        self.get_ordinate(index, Y)
    }

    /// Z value, or NaN when the sequence has no Z ordinate
    fn get_z(&self, index: usize) -> GeomResult<f64> {
        if self.has_z() {
            self.get_ordinate(index, Z)
        } else {
            check_index(index, self.size()).map(|_| NULL_ORDINATE)
        }
    }

    /// M value, or NaN when the sequence has no measure
    fn get_m(&self, index: usize) -> GeomResult<f64> {
        if self.has_m() {
            self.get_ordinate(index, self.dimension() - self.measures())
        } else {
            check_index(index, self.size()).map(|_| NULL_ORDINATE)
        }
    }

    /// Coordinate at `index`. Never a view into storage.
    fn get_coordinate(&self, index: usize) -> GeomResult<Coordinate> {
        check_index(index, self.size())?;
        let mut coord = self.create_coordinate();
        for ordinate in 0..self.dimension() {
            coord.set_ordinate(ordinate, self.get_ordinate(index, ordinate)?)?;
        }
        Ok(coord)
    }

    /// Explicitly requested copy of the coordinate at `index`
    fn get_coordinate_copy(&self, index: usize) -> GeomResult<Coordinate> {
        self.get_coordinate(index)
    }

    fn to_coordinate_array(&self) -> Vec<Coordinate> {
        (0..self.size())
            .filter_map(|i| self.get_coordinate(i).ok())
            .collect()
    }

    /// Grow `env` to include every coordinate, without materializing coordinates.
    fn expand_envelope(&self, env: &mut Envelope);

    /// Deep copy
    fn copy(&self) -> Box<dyn CoordinateSequence>;
}

impl Clone for Box<dyn CoordinateSequence> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

/// Creates coordinate sequences of one storage kind.
///
/// Factories never fail: empty input gives an empty sequence and unsupported
/// dimension/measures requests are clamped to the closest supported layout.
pub trait CoordinateSequenceFactory: fmt::Debug + Send + Sync {
    /// Sequence holding copies of `coordinates`; the layout is the richest one among them.
    fn create(&self, coordinates: &[Coordinate]) -> Box<dyn CoordinateSequence>;

    /// Copy of another sequence, converted to this factory's storage
    fn create_from_sequence(&self, seq: &dyn CoordinateSequence) -> Box<dyn CoordinateSequence>;

    /// Sequence of `size` blank coordinates
    fn create_with_size(
        &self,
        size: usize,
        dimension: usize,
        measures: usize,
    ) -> Box<dyn CoordinateSequence>;
}

pub(crate) fn check_index(index: usize, size: usize) -> GeomResult<()> {
    if index >= size {
        return Err(GeometryError::IndexOutOfRange { index, size });
    }
    Ok(())
}

pub(crate) fn check_ordinate(ordinate: usize, dimension: usize) -> GeomResult<()> {
    if ordinate >= dimension {
        return Err(GeometryError::invalid_ordinate(ordinate));
    }
    Ok(())
}

/// Clamp a requested layout to spatial dimension 2..=3 and at most one measure.
pub(crate) fn clamp_dimensions(dimension: usize, measures: usize) -> (usize, usize) {
    let clamped_measures = measures.min(1);
    let spatial = dimension.saturating_sub(measures).clamp(2, 3);
    let clamped = (spatial + clamped_measures, clamped_measures);
    if clamped != (dimension, measures) {
        log::warn!(
            "unsupported coordinate layout (dimension {dimension}, measures {measures}), using {clamped:?}"
        );
    }
    clamped
}

/// Lexicographic ordering of coordinate sequences.
///
/// Coordinates compare ordinate by ordinate (NaN before numbers). Without a dimension limit a
/// lower-dimension sequence sorts first; with a limit only the first `limit` ordinates count.
#[derive(Debug, Copy, Clone)]
pub struct CoordinateSequenceComparator {
    dimension_limit: usize,
}

impl CoordinateSequenceComparator {
    pub fn new() -> Self {
        Self {
            dimension_limit: usize::MAX,
        }
    }

    pub fn with_dimension_limit(dimension_limit: usize) -> Self {
        Self { dimension_limit }
    }

    pub fn compare(&self, s1: &dyn CoordinateSequence, s2: &dyn CoordinateSequence) -> Ordering {
        let (dim1, dim2) = (s1.dimension(), s2.dimension());
        let mut min_dim = dim1.min(dim2);

        let dim_limited = self.dimension_limit <= min_dim;
        if dim_limited {
            min_dim = self.dimension_limit;
        } else if dim1 != dim2 {
            return dim1.cmp(&dim2);
        }

        let common = s1.size().min(s2.size());
        for i in 0..common {
            let comp = self.compare_coordinate(s1, s2, i, min_dim);
            if comp != Ordering::Equal {
                return comp;
            }
        }
        s1.size().cmp(&s2.size())
    }

    /// Compare the coordinates at index `i` of both sequences over `dimension` ordinates
    pub fn compare_coordinate(
        &self,
        s1: &dyn CoordinateSequence,
        s2: &dyn CoordinateSequence,
        i: usize,
        dimension: usize,
    ) -> Ordering {
        for d in 0..dimension {
            let comp = core::compare_ordinates(s1.ordinate(i, d), s2.ordinate(i, d));
            if comp != Ordering::Equal {
                return comp;
            }
        }
        Ordering::Equal
    }
}

impl Default for CoordinateSequenceComparator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(factory: &dyn CoordinateSequenceFactory, pts: &[(f64, f64)]) -> Box<dyn CoordinateSequence> {
        let coords: Vec<Coordinate> = pts.iter().map(|&(x, y)| Coordinate::new_xy(x, y)).collect();
        factory.create(&coords)
    }

    #[test]
    fn test_clamp_dimensions() {
        assert_eq!(clamp_dimensions(2, 0), (2, 0));
        assert_eq!(clamp_dimensions(4, 1), (4, 1));
        assert_eq!(clamp_dimensions(4, 0), (3, 0));
        assert_eq!(clamp_dimensions(2, 1), (3, 1));
        assert_eq!(clamp_dimensions(7, 3), (4, 1));
        assert_eq!(clamp_dimensions(0, 0), (2, 0));
    }

    #[test]
    fn test_comparator_lexicographic() {
        let factories: [&dyn CoordinateSequenceFactory; 2] = [
            &CoordinateArraySequenceFactory,
            &PackedCoordinateSequenceFactory,
        ];
        for factory in factories {
            let cmp = CoordinateSequenceComparator::new();
            let a = seq(factory, &[(0.0, 0.0), (1.0, 1.0)]);
            let b = seq(factory, &[(0.0, 0.0), (1.0, 2.0)]);
            let c = seq(factory, &[(0.0, 0.0)]);

            assert_eq!(cmp.compare(a.as_ref(), b.as_ref()), Ordering::Less);
            assert_eq!(cmp.compare(b.as_ref(), a.as_ref()), Ordering::Greater);
            assert_eq!(cmp.compare(c.as_ref(), a.as_ref()), Ordering::Less);
            assert_eq!(cmp.compare(a.as_ref(), a.as_ref()), Ordering::Equal);
        }
    }

    #[test]
    fn test_comparator_dimension() {
        let xy = CoordinateArraySequenceFactory.create(&[Coordinate::new_xy(5.0, 5.0)]);
        let xyz = CoordinateArraySequenceFactory.create(&[Coordinate::new_xyz(0.0, 0.0, 1.0)]);

        assert_eq!(
            CoordinateSequenceComparator::new().compare(xy.as_ref(), xyz.as_ref()),
            Ordering::Less
        );
        assert_eq!(
            CoordinateSequenceComparator::with_dimension_limit(2).compare(xy.as_ref(), xyz.as_ref()),
            Ordering::Greater
        );
    }

    #[test]
    fn test_get_z_and_m_defaults() {
        let s = CoordinateArraySequenceFactory.create(&[Coordinate::new_xy(1.0, 2.0)]);
        assert!(s.get_z(0).unwrap().is_nan());
        assert!(s.get_m(0).unwrap().is_nan());
        assert!(matches!(
            s.get_z(3),
            Err(GeometryError::IndexOutOfRange { index: 3, size: 1 })
        ));

        let s = PackedCoordinateSequenceFactory.create(&[Coordinate::new_xym(1.0, 2.0, 9.0)]);
        assert!(s.has_m());
        assert!(!s.has_z());
        assert_eq!(s.get_m(0).unwrap(), 9.0);
    }
}
