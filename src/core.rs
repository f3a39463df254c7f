use thiserror::Error;

use crate::coordinate::Coordinate;

const ATOL: f64 = 1e-12;
const RTOL: f64 = 1e-9;

/// Errors raised by geometry construction, access and operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// Malformed input: bad ordinate index, unclosed ring, unknown dimension symbol, ...
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A GeometryCollection was passed where the operation does not accept one
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
    /// Numerical robustness failure while computing an overlay
    #[error("topology error: {message}{}", .location.as_ref().map(|c| format!(" at {c}")).unwrap_or_default())]
    Topology {
        message: String,
        location: Option<Coordinate>,
    },
    /// Sequence or array index outside `[0, size)`
    #[error("index {index} out of range for size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    /// WKT input could not be parsed
    #[error("failed to parse: {0}")]
    ParsingError(String),
}

pub type GeomResult<T> = Result<T, GeometryError>;

impl GeometryError {
    pub(crate) fn collection_not_supported() -> Self {
        GeometryError::UnsupportedOperation(String::from(
            "Operation does not support GeometryCollection arguments",
        ))
    }

    pub(crate) fn invalid_ordinate(index: usize) -> Self {
        GeometryError::InvalidArgument(format!("Invalid ordinate index: {index}"))
    }
}

/// Trait with common functionality for all geometric objects
pub trait GeometricObject {
    fn wkt(&self) -> String;
}

/// Macro to implement the Display trait for Geometric Object types
macro_rules! display_for_geom {
    ($type:ty) => {
        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.wkt())
            }
        }
    };
}

pub(crate) use display_for_geom;

/// Return whether two numbers are approximately equal.
///
/// Determines if the given numbers are close with the given absolute and relative tolerances.
///
/// Examples:
/// ```rust
/// use geomlib;
///
/// println!("Close: {}", geomlib::is_close(0.0, 0.0, 1e-10, 1e-10));
/// ```
pub fn is_close(a: f64, b: f64, rtol: f64, atol: f64) -> bool {
    assert!(rtol >= 0.0 && atol >= 0.0);
    let scale = a.abs().max(b.abs());
    (a - b).abs() < (atol + rtol * scale)
}

/// Determine if two values are approximately equal to one another.
///
/// Determine if two floating point values are approximately equal. This is equivalent to calling
/// `is_close` with relative tolerance of `1e-9` and absolute tolerance of `1e-12`.
///
/// Example:
/// ```rust
/// use geomlib;
/// let x1 = 0.123;
/// let x2 = 0.123 + 1e-14;
///
/// assert!(geomlib::approx(x1, x2));
/// ```
pub fn approx(a: f64, b: f64) -> bool {
    is_close(a, b, RTOL, ATOL)
}

/// Equality of two ordinates within an absolute tolerance.
///
/// A zero tolerance means exact comparison; two NaN values are never equal.
pub fn equals_with_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Three-way comparison of ordinates in which NaN sorts before every number and equals NaN.
pub fn compare_ordinates(a: f64, b: f64) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    if a < b {
        return Ordering::Less;
    }
    if a > b {
        return Ordering::Greater;
    }
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}
