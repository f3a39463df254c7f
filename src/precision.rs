use std::cmp::Ordering;
use std::fmt;

use super::coordinate::Coordinate;
use super::core::{GeomResult, GeometryError};

/// The grid that computed coordinates are snapped to.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum PrecisionModel {
    /// Full double precision
    #[default]
    Floating,
    /// Single precision
    FloatingSingle,
    /// A fixed grid with `scale` cells per unit, e.g. 1000 keeps three decimals
    Fixed { scale: f64 },
}

impl PrecisionModel {
    /// Fixed model; the scale must be positive and finite
    pub fn fixed(scale: f64) -> GeomResult<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(GeometryError::InvalidArgument(format!(
                "Invalid precision model scale: {scale}"
            )));
        }
        Ok(PrecisionModel::Fixed { scale })
    }

    pub fn is_floating(&self) -> bool {
        !matches!(self, PrecisionModel::Fixed { .. })
    }

    /// Grid scale, 0 for the floating models
    pub fn scale(&self) -> f64 {
        match self {
            PrecisionModel::Fixed { scale } => *scale,
            _ => 0.0,
        }
    }

    /// Size of a grid cell, 0 for the floating models
    pub fn grid_size(&self) -> f64 {
        match self {
            PrecisionModel::Fixed { scale } => 1.0 / scale,
            _ => 0.0,
        }
    }

    /// Number of significant decimal digits the model can represent
    pub fn maximum_significant_digits(&self) -> i32 {
        match self {
            PrecisionModel::Floating => 16,
            PrecisionModel::FloatingSingle => 6,
            PrecisionModel::Fixed { scale } => 1 + scale.log10().ceil() as i32,
        }
    }

    /// Round a value onto the grid. NaN and infinities pass through.
    pub fn make_precise(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        match self {
            PrecisionModel::Floating => value,
            PrecisionModel::FloatingSingle => value as f32 as f64,
            PrecisionModel::Fixed { scale } => (value * scale + 0.5).floor() / scale,
        }
    }

    /// Round X and Y of a coordinate onto the grid; Z and M are left untouched
    pub fn make_precise_coordinate(&self, coord: &mut Coordinate) {
        if *self == PrecisionModel::Floating {
            return;
        }
        coord.x = self.make_precise(coord.x);
        coord.y = self.make_precise(coord.y);
    }

    /// Order by the number of significant digits
    pub fn compare(&self, other: &PrecisionModel) -> Ordering {
        self.maximum_significant_digits()
            .cmp(&other.maximum_significant_digits())
    }
}

impl fmt::Display for PrecisionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecisionModel::Floating => write!(f, "Floating"),
            PrecisionModel::FloatingSingle => write!(f, "Floating-Single"),
            PrecisionModel::Fixed { scale } => write!(f, "Fixed (Scale={scale})"),
        }
    }
}
