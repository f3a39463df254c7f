use super::{
    CoordinateSequence, CoordinateSequenceFactory, check_index, check_ordinate, clamp_dimensions,
};
use crate::coordinate::Coordinate;
use crate::coordinate_arrays;
use crate::core::GeomResult;
use crate::envelope::Envelope;

/// Coordinate sequence storing all ordinates in one flat buffer, `dimension` values per point.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedCoordinateSequence {
    ordinates: Vec<f64>,
    dimension: usize,
    measures: usize,
}

impl PackedCoordinateSequence {
    /// Wrap a flat ordinate buffer. Trailing values that do not fill a whole coordinate are
    /// dropped.
    pub fn new(mut ordinates: Vec<f64>, dimension: usize, measures: usize) -> Self {
        let (dimension, measures) = clamp_dimensions(dimension, measures);
        let whole = ordinates.len() / dimension * dimension;
        if whole != ordinates.len() {
            log::warn!(
                "dropping {} trailing ordinates from packed sequence",
                ordinates.len() - whole
            );
            ordinates.truncate(whole);
        }
        Self {
            ordinates,
            dimension,
            measures,
        }
    }

    pub fn from_coordinates(coordinates: &[Coordinate]) -> Self {
        let dimension = coordinate_arrays::dimension(coordinates);
        let measures = coordinate_arrays::measures(coordinates);
        Self::from_coordinates_with_dimension(coordinates, dimension, measures)
    }

    pub fn from_coordinates_with_dimension(
        coordinates: &[Coordinate],
        dimension: usize,
        measures: usize,
    ) -> Self {
        let mut seq = Self::with_size(coordinates.len(), dimension, measures);
        let layout = seq.layout();
        for (i, c) in coordinates.iter().enumerate() {
            let c = c.to_layout(layout);
            for d in 0..seq.dimension {
                seq.ordinates[i * seq.dimension + d] = c.get_ordinate(d).unwrap_or(f64::NAN);
            }
        }
        seq
    }

    /// `size` coordinates with all ordinates zero
    pub fn with_size(size: usize, dimension: usize, measures: usize) -> Self {
        let (dimension, measures) = clamp_dimensions(dimension, measures);
        Self {
            ordinates: vec![0.0; size * dimension],
            dimension,
            measures,
        }
    }

    pub fn from_sequence(seq: &dyn CoordinateSequence) -> Self {
        let mut packed = Self::with_size(seq.size(), seq.dimension(), seq.measures());
        for i in 0..packed.size() {
            for d in 0..packed.dimension {
                packed.ordinates[i * packed.dimension + d] = seq.ordinate(i, d);
            }
        }
        packed
    }

    /// Raw ordinate buffer
    pub fn raw_ordinates(&self) -> &[f64] {
        &self.ordinates
    }
}

impl CoordinateSequence for PackedCoordinateSequence {
    fn size(&self) -> usize {
        self.ordinates.len() / self.dimension
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
        Ok(self.ordinates[index * self.dimension + ordinate])
    }

    fn set_ordinate(&mut self, index: usize, ordinate: usize, value: f64) -> GeomResult<()> {
        check_index(index, self.size())?;
        check_ordinate(ordinate, self.dimension)?;
        self.ordinates[index * self.dimension + ordinate] = value;
        Ok(())
    }

    fn expand_envelope(&self, env: &mut Envelope) {
        for point in self.ordinates.chunks_exact(self.dimension) {
            env.expand_to_include_xy(point[0], point[1]);
        }
    }

    fn copy(&self) -> Box<dyn CoordinateSequence> {
        Box::new(self.clone())
    }
}

/// Factory for [`PackedCoordinateSequence`]
#[derive(Debug, Copy, Clone, Default)]
pub struct PackedCoordinateSequenceFactory;

impl CoordinateSequenceFactory for PackedCoordinateSequenceFactory {
    fn create(&self, coordinates: &[Coordinate]) -> Box<dyn CoordinateSequence> {
        Box::new(PackedCoordinateSequence::from_coordinates(coordinates))
    }

    fn create_from_sequence(&self, seq: &dyn CoordinateSequence) -> Box<dyn CoordinateSequence> {
        Box::new(PackedCoordinateSequence::from_sequence(seq))
    }

    fn create_with_size(
        &self,
        size: usize,
        dimension: usize,
        measures: usize,
    ) -> Box<dyn CoordinateSequence> {
        Box::new(PackedCoordinateSequence::with_size(size, dimension, measures))
    }
}
