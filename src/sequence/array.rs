use super::{
    CoordinateSequence, CoordinateSequenceFactory, check_index, check_ordinate, clamp_dimensions,
};
use crate::coordinate::{Coordinate, CoordinateLayout};
use crate::coordinate_arrays;
use crate::core::GeomResult;
use crate::envelope::Envelope;

/// Coordinate sequence backed by a vector of [`Coordinate`] values.
///
/// Every stored coordinate carries the sequence layout.
#[derive(Debug, Clone)]
pub struct CoordinateArraySequence {
    coordinates: Vec<Coordinate>,
    dimension: usize,
    measures: usize,
}

impl CoordinateArraySequence {
    /// Sequence over `coordinates`, using the richest layout among them (XYZ when empty).
    pub fn new(coordinates: Vec<Coordinate>) -> Self {
        let dimension = coordinate_arrays::dimension(&coordinates);
        let measures = coordinate_arrays::measures(&coordinates);
        Self::with_dimension(coordinates, dimension, measures)
    }

    /// Sequence over `coordinates` converted to the given layout
    pub fn with_dimension(coordinates: Vec<Coordinate>, dimension: usize, measures: usize) -> Self {
        let (dimension, measures) = clamp_dimensions(dimension, measures);
        let layout = CoordinateLayout::from_dimension(dimension, measures);
        let coordinates = coordinates
            .into_iter()
            .map(|c| {
                if c.layout() == layout {
                    c
                } else {
                    c.to_layout(layout)
                }
            })
            .collect();
        Self {
            coordinates,
            dimension,
            measures,
        }
    }

    /// `size` blank coordinates
    pub fn with_size(size: usize, dimension: usize, measures: usize) -> Self {
        let (dimension, measures) = clamp_dimensions(dimension, measures);
        let blank = Coordinate::with_layout(CoordinateLayout::from_dimension(dimension, measures));
        Self {
            coordinates: vec![blank; size],
            dimension,
            measures,
        }
    }

    /// Copy of any other sequence
    pub fn from_sequence(seq: &dyn CoordinateSequence) -> Self {
        Self {
            coordinates: seq.to_coordinate_array(),
            dimension: seq.dimension(),
            measures: seq.measures(),
        }
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }
}

impl CoordinateSequence for CoordinateArraySequence {
    fn size(&self) -> usize {
        self.coordinates.len()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn measures(&self) -> usize {
        self.measures
    }

    fn get_ordinate(&self, index: usize, ordinate: usize) -> GeomResult<f64> {
        check_index(index, self.size())?;
        check_ordinate(ordinate, self.dimension)?;
        self.coordinates[index].get_ordinate(ordinate)
    }

    fn set_ordinate(&mut self, index: usize, ordinate: usize, value: f64) -> GeomResult<()> {
        check_index(index, self.size())?;
        check_ordinate(ordinate, self.dimension)?;
        self.coordinates[index].set_ordinate(ordinate, value)
    }

    fn get_coordinate(&self, index: usize) -> GeomResult<Coordinate> {
        check_index(index, self.size())?;
        Ok(self.coordinates[index])
    }

    fn to_coordinate_array(&self) -> Vec<Coordinate> {
        self.coordinates.clone()
    }

    fn expand_envelope(&self, env: &mut Envelope) {
        for c in &self.coordinates {
            env.expand_to_include(c);
        }
    }

    fn copy(&self) -> Box<dyn CoordinateSequence> {
        Box::new(self.clone())
    }
}

/// Factory for [`CoordinateArraySequence`]; the default storage of a geometry factory.
#[derive(Debug, Copy, Clone, Default)]
pub struct CoordinateArraySequenceFactory;

impl CoordinateSequenceFactory for CoordinateArraySequenceFactory {
    fn create(&self, coordinates: &[Coordinate]) -> Box<dyn CoordinateSequence> {
        Box::new(CoordinateArraySequence::new(coordinates.to_vec()))
    }

    fn create_from_sequence(&self, seq: &dyn CoordinateSequence) -> Box<dyn CoordinateSequence> {
        Box::new(CoordinateArraySequence::from_sequence(seq))
    }

    fn create_with_size(
        &self,
        size: usize,
        dimension: usize,
        measures: usize,
    ) -> Box<dyn CoordinateSequence> {
        Box::new(CoordinateArraySequence::with_size(size, dimension, measures))
    }
}
