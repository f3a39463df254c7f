use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::core::{self, GeomResult, GeometryError};

/// Ordinate index of the X value
pub const X: usize = 0;
/// Ordinate index of the Y value
pub const Y: usize = 1;
/// Ordinate index of the Z value in a sequence or XYZ/XYZM coordinate
pub const Z: usize = 2;
/// Ordinate index of the M value in a four-ordinate sequence or coordinate
pub const M: usize = 3;

/// Value used for absent ordinates
pub const NULL_ORDINATE: f64 = f64::NAN;

/// Ordinates carried by a [`Coordinate`].
///
/// Ordinate indexes follow the layout: `XYM` stores the measure at index 2, `XYZM` at index 3.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CoordinateLayout {
    XY,
    #[default]
    XYZ,
    XYM,
    XYZM,
}

impl CoordinateLayout {
    /// Select the layout for a `dimension`/`measures` pair, defaulting to `XYZ` for unknown pairs.
    pub fn from_dimension(dimension: usize, measures: usize) -> Self {
        match (dimension, measures) {
            (2, _) => CoordinateLayout::XY,
            (3, 0) => CoordinateLayout::XYZ,
            (3, 1) => CoordinateLayout::XYM,
            (4, 1) => CoordinateLayout::XYZM,
            _ => CoordinateLayout::XYZ,
        }
    }

    /// Number of ordinates
    pub fn dimension(&self) -> usize {
        match self {
            CoordinateLayout::XY => 2,
            CoordinateLayout::XYZ | CoordinateLayout::XYM => 3,
            CoordinateLayout::XYZM => 4,
        }
    }

    /// Number of measure ordinates
    pub fn measures(&self) -> usize {
        match self {
            CoordinateLayout::XY | CoordinateLayout::XYZ => 0,
            CoordinateLayout::XYM | CoordinateLayout::XYZM => 1,
        }
    }

    pub fn has_z(&self) -> bool {
        matches!(self, CoordinateLayout::XYZ | CoordinateLayout::XYZM)
    }

    pub fn has_m(&self) -> bool {
        self.measures() > 0
    }

    // Index of the measure ordinate in this layout, if any
    fn m_index(&self) -> Option<usize> {
        match self {
            CoordinateLayout::XYM => Some(2),
            CoordinateLayout::XYZM => Some(3),
            _ => None,
        }
    }
}

/// A location on the plane with optional elevation (Z) and measure (M).
///
/// Equality and hashing only look at X and Y. Lexicographic ordering (`compare_to`) does not
/// handle NaN ordinates: a NaN is neither less nor greater than anything, so it is skipped. Use
/// [`DimensionalComparator`] when NaN needs a defined place in the order.
///
/// Examples
/// ```rust
/// use geomlib::{Coordinate, coordinate};
/// let c = Coordinate::new(1.0, 2.0);
/// assert!(c.get_ordinate(coordinate::Z).unwrap().is_nan());
/// assert!(Coordinate::new_xy(1.0, 2.0).get_ordinate(coordinate::Z).is_err());
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    z: f64,
    m: f64,
    layout: CoordinateLayout,
}

impl Coordinate {
    /// Create an XYZ coordinate with absent (NaN) Z
    pub fn new(x: f64, y: f64) -> Self {
        Self::new_xyz(x, y, NULL_ORDINATE)
    }

    pub fn new_xy(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: NULL_ORDINATE,
            m: NULL_ORDINATE,
            layout: CoordinateLayout::XY,
        }
    }

    pub fn new_xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            m: NULL_ORDINATE,
            layout: CoordinateLayout::XYZ,
        }
    }

    pub fn new_xym(x: f64, y: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z: NULL_ORDINATE,
            m,
            layout: CoordinateLayout::XYM,
        }
    }

    pub fn new_xyzm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z,
            m,
            layout: CoordinateLayout::XYZM,
        }
    }

    /// Create a zeroed coordinate with the given layout. Measures start at 0, Z at NaN.
    pub fn with_layout(layout: CoordinateLayout) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: NULL_ORDINATE,
            m: if layout.has_m() { 0.0 } else { NULL_ORDINATE },
            layout,
        }
    }

    /// Convert to another layout, dropping ordinates the target cannot hold.
    pub fn to_layout(&self, layout: CoordinateLayout) -> Self {
        let mut out = Self::with_layout(layout);
        out.set_coordinate(self);
        out
    }

    pub fn layout(&self) -> CoordinateLayout {
        self.layout
    }

    pub fn dimension(&self) -> usize {
        self.layout.dimension()
    }

    pub fn measures(&self) -> usize {
        self.layout.measures()
    }

    /// Z value, NaN when absent or unsupported
    pub fn z(&self) -> f64 {
        if self.layout.has_z() {
            self.z
        } else {
            NULL_ORDINATE
        }
    }

    /// M value, NaN when the layout carries no measure
    pub fn m(&self) -> f64 {
        if self.layout.has_m() {
            self.m
        } else {
            NULL_ORDINATE
        }
    }

    pub fn set_z(&mut self, z: f64) -> GeomResult<()> {
        if !self.layout.has_z() {
            return Err(GeometryError::InvalidArgument(format!(
                "{:?} coordinate does not support z-ordinate",
                self.layout
            )));
        }
        self.z = z;
        Ok(())
    }

    pub fn set_m(&mut self, m: f64) -> GeomResult<()> {
        if !self.layout.has_m() {
            return Err(GeometryError::invalid_ordinate(M));
        }
        self.m = m;
        Ok(())
    }

    /// Copy the ordinates of `other` that this layout supports; Z is carried when both have it.
    pub fn set_coordinate(&mut self, other: &Coordinate) {
        self.x = other.x;
        self.y = other.y;
        if self.layout.has_z() {
            self.z = other.z();
        }
        if self.layout.has_m() {
            self.m = other.m();
        }
    }

    /// Value of the ordinate at the layout-relative index.
    pub fn get_ordinate(&self, index: usize) -> GeomResult<f64> {
        match index {
            X => Ok(self.x),
            Y => Ok(self.y),
            Z if self.layout.has_z() => Ok(self.z),
            _ if self.layout.m_index() == Some(index) => Ok(self.m),
            _ => Err(GeometryError::invalid_ordinate(index)),
        }
    }

    pub fn set_ordinate(&mut self, index: usize, value: f64) -> GeomResult<()> {
        match index {
            X => self.x = value,
            Y => self.y = value,
            Z if self.layout.has_z() => self.z = value,
            _ if self.layout.m_index() == Some(index) => self.m = value,
            _ => return Err(GeometryError::invalid_ordinate(index)),
        }
        Ok(())
    }

    pub fn equals_2d(&self, other: &Coordinate) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Planar equality within an absolute tolerance
    pub fn equals_2d_with_tolerance(&self, other: &Coordinate, tolerance: f64) -> bool {
        core::equals_with_tolerance(self.x, other.x, tolerance)
            && core::equals_with_tolerance(self.y, other.y, tolerance)
    }

    /// Equality in X, Y and Z. Two absent Z values are equal.
    pub fn equals_3d(&self, other: &Coordinate) -> bool {
        let (z1, z2) = (self.z(), other.z());
        self.equals_2d(other) && (z1 == z2 || (z1.is_nan() && z2.is_nan()))
    }

    pub fn equal_in_z(&self, other: &Coordinate, tolerance: f64) -> bool {
        core::equals_with_tolerance(self.z(), other.z(), tolerance)
    }

    /// Return true if the coordinate is approximately equal to other in X and Y.
    pub fn is_close(&self, other: &Coordinate) -> bool {
        core::approx(self.x, other.x) && core::approx(self.y, other.y)
    }

    /// Lexicographic comparison on (X, Y).
    pub fn compare_to(&self, other: &Coordinate) -> Ordering {
        if self.x < other.x {
            return Ordering::Less;
        }
        if self.x > other.x {
            return Ordering::Greater;
        }
        if self.y < other.y {
            return Ordering::Less;
        }
        if self.y > other.y {
            return Ordering::Greater;
        }
        Ordering::Equal
    }

    /// Return the L2 (Euclidean) distance to another coordinate
    pub fn distance(&self, other: &Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;

        (dx * dx + dy * dy).sqrt()
    }

    /// Euclidean distance including Z; NaN when either Z is absent
    pub fn distance_3d(&self, other: &Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z() - other.z();

        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Deep copy; coordinates are plain values so this is equivalent to `clone`
    pub fn copy(&self) -> Self {
        *self
    }

    /// Hash code combining the bit patterns of X and Y
    pub fn hash_code(&self) -> i32 {
        let mut result: i32 = 17;
        result = result.wrapping_mul(37).wrapping_add(ordinate_hash(self.x));
        result = result.wrapping_mul(37).wrapping_add(ordinate_hash(self.y));
        result
    }
}

fn ordinate_hash(value: f64) -> i32 {
    let bits = value.to_bits();
    (bits ^ (bits >> 32)) as i32
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.equals_2d(other)
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.layout {
            CoordinateLayout::XY => write!(f, "({}, {})", self.x, self.y),
            CoordinateLayout::XYZ => write!(f, "({}, {}, {})", self.x, self.y, self.z),
            CoordinateLayout::XYM => write!(f, "({}, {} m={})", self.x, self.y, self.m),
            CoordinateLayout::XYZM => {
                write!(f, "({}, {}, {} m={})", self.x, self.y, self.z, self.m)
            }
        }
    }
}

/// Orders coordinates in 2 or 3 dimensions, placing NaN before any number.
#[derive(Copy, Clone, Debug)]
pub struct DimensionalComparator {
    dimensions_to_test: usize,
}

impl DimensionalComparator {
    /// Create a comparator over 2 or 3 dimensions
    pub fn new(dimensions_to_test: usize) -> GeomResult<Self> {
        if dimensions_to_test != 2 && dimensions_to_test != 3 {
            return Err(GeometryError::InvalidArgument(String::from(
                "only 2 or 3 dimensions may be specified",
            )));
        }
        Ok(Self { dimensions_to_test })
    }

    pub fn compare(&self, c1: &Coordinate, c2: &Coordinate) -> Ordering {
        core::compare_ordinates(c1.x, c2.x)
            .then_with(|| core::compare_ordinates(c1.y, c2.y))
            .then_with(|| {
                if self.dimensions_to_test <= 2 {
                    Ordering::Equal
                } else {
                    core::compare_ordinates(c1.z(), c2.z())
                }
            })
    }
}

impl Default for DimensionalComparator {
    fn default() -> Self {
        Self {
            dimensions_to_test: 2,
        }
    }
}

/// Quick-sort a slice of coordinates in-place lexicographically
pub fn quick_sort(pts: &mut [Coordinate]) {
    if pts.len() <= 1 {
        return;
    }

    let li = pts.len() - 1;

    // Choose middle element as pivot and move to end as placeholder
    pts.swap(pts.len() / 2, li);

    // Partition
    let mut nxt_pivot = 0;
    for i in 0..li {
        if pts[i].compare_to(&pts[li]) == Ordering::Less {
            pts.swap(i, nxt_pivot);
            nxt_pivot += 1;
        }
    }
    pts.swap(li, nxt_pivot);

    quick_sort(&mut pts[0..nxt_pivot]);

    if nxt_pivot < li {
        quick_sort(&mut pts[nxt_pivot + 1..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rng;
    use rand::seq::SliceRandom;
    use std::collections::HashSet;

    #[test]
    fn test_lex_comparison() {
        let p1 = Coordinate::new(0.5, 1.2);
        let p2 = Coordinate::new(0.2, 1.2);

        assert_eq!(p1.compare_to(&p2), Ordering::Greater);
        assert_eq!(p2.compare_to(&p1), Ordering::Less);

        let p3 = Coordinate::new(-0.1, 0.1);
        let p4 = Coordinate::new(-0.1, 0.4);

        assert_eq!(p3.compare_to(&p4), Ordering::Less);
        assert_eq!(p3.compare_to(&p3), Ordering::Equal);
    }

    #[test]
    fn test_nan_compare_is_unordered() {
        let p1 = Coordinate::new(f64::NAN, 1.0);
        let p2 = Coordinate::new(0.0, 5.0);
        // X is skipped as neither less nor greater, so Y decides
        assert_eq!(p1.compare_to(&p2), Ordering::Less);

        let p3 = Coordinate::new(f64::NAN, f64::NAN);
        assert_eq!(p3.compare_to(&p2), Ordering::Equal);
    }

    #[test]
    fn test_ordinates_by_layout() {
        let xyz = Coordinate::new(1.0, 2.0);
        assert!(xyz.get_ordinate(Z).unwrap().is_nan());
        assert!(xyz.get_ordinate(M).is_err());

        let mut xy = Coordinate::new_xy(1.0, 2.0);
        assert!(matches!(
            xy.get_ordinate(Z),
            Err(GeometryError::InvalidArgument(_))
        ));
        assert!(xy.set_z(3.0).is_err());
        assert!(xy.set_ordinate(Z, 3.0).is_err());
        assert!(xy.z().is_nan());

        let mut xym = Coordinate::new_xym(1.0, 2.0, 7.0);
        assert_eq!(xym.get_ordinate(2).unwrap(), 7.0);
        assert!(xym.set_z(1.0).is_err());
        xym.set_m(8.0).unwrap();
        assert_eq!(xym.m(), 8.0);

        let mut xyzm = Coordinate::new_xyzm(1.0, 2.0, 3.0, 4.0);
        assert_eq!(xyzm.get_ordinate(Z).unwrap(), 3.0);
        assert_eq!(xyzm.get_ordinate(M).unwrap(), 4.0);
        xyzm.set_ordinate(M, 5.0).unwrap();
        assert_eq!(xyzm.m(), 5.0);
        assert!(xyzm.get_ordinate(4).is_err());
    }

    #[test]
    fn test_equality() {
        let c1 = Coordinate::new_xyz(1.0, 2.0, 3.0);
        let c2 = Coordinate::new_xyz(1.0, 2.0, 9.0);
        assert!(c1.equals_2d(&c1));
        assert!(c1.equals_2d(&c2));
        assert!(!c1.equals_3d(&c2));
        assert_eq!(c1, c2);

        let nan_z = Coordinate::new(1.0, 2.0);
        assert!(nan_z.equals_3d(&nan_z));
        assert!(nan_z.equals_3d(&Coordinate::new(1.0, 2.0)));

        assert!(c1.equals_2d_with_tolerance(&Coordinate::new(1.05, 1.98), 0.1));
        assert!(c1.equal_in_z(&Coordinate::new_xyz(0.0, 0.0, 3.05), 0.1));
    }

    #[test]
    fn test_hash_ignores_z() {
        let mut set = HashSet::new();
        set.insert(Coordinate::new_xyz(1.0, 2.0, 3.0));
        assert!(set.contains(&Coordinate::new_xyzm(1.0, 2.0, 4.0, 5.0)));
        assert_eq!(
            Coordinate::new_xyz(1.0, 2.0, 3.0).hash_code(),
            Coordinate::new_xy(1.0, 2.0).hash_code()
        );
    }

    #[test]
    fn test_distance() {
        let c1 = Coordinate::new_xyz(0.0, 0.0, 0.0);
        let c2 = Coordinate::new_xyz(3.0, 4.0, 12.0);
        assert_eq!(c1.distance(&c2), 5.0);
        assert_eq!(c1.distance_3d(&c2), 13.0);
        assert!(Coordinate::new(0.0, 0.0).distance_3d(&c2).is_nan());
    }

    #[test]
    fn test_layout_conversion() {
        let c = Coordinate::new_xyzm(1.0, 2.0, 3.0, 4.0);
        let xym = c.to_layout(CoordinateLayout::XYM);
        assert_eq!(xym.m(), 4.0);
        assert!(xym.z().is_nan());
        assert_eq!(CoordinateLayout::from_dimension(3, 1), CoordinateLayout::XYM);
        assert_eq!(CoordinateLayout::from_dimension(5, 3), CoordinateLayout::XYZ);
        assert_eq!(Coordinate::with_layout(CoordinateLayout::XYM).m(), 0.0);
    }

    #[test]
    fn test_dimensional_comparator() {
        assert!(DimensionalComparator::new(4).is_err());
        let cmp2 = DimensionalComparator::default();
        let cmp3 = DimensionalComparator::new(3).unwrap();

        let a = Coordinate::new_xyz(1.0, 1.0, 1.0);
        let b = Coordinate::new_xyz(1.0, 1.0, 2.0);
        assert_eq!(cmp2.compare(&a, &b), Ordering::Equal);
        assert_eq!(cmp3.compare(&a, &b), Ordering::Less);

        let nan = Coordinate::new(f64::NAN, 0.0);
        assert_eq!(cmp2.compare(&nan, &a), Ordering::Less);
        assert_eq!(cmp2.compare(&nan, &nan), Ordering::Equal);
        assert_eq!(cmp3.compare(&Coordinate::new(1.0, 1.0), &a), Ordering::Less);
    }

    #[test]
    fn test_display() {
        assert_eq!(Coordinate::new_xy(1.0, 2.5).to_string(), "(1, 2.5)");
        assert_eq!(Coordinate::new_xym(1.0, 2.0, 3.0).to_string(), "(1, 2 m=3)");
    }

    #[test]
    fn test_sort_coordinates() {
        let mut random = rng();
        let mut pts = Vec::new();
        for i in 0..4 {
            for j in 4..8 {
                pts.push(Coordinate::new(i as f64, j as f64));
            }
        }
        pts.shuffle(&mut random);

        quick_sort(&mut pts);
        for (i, pt) in pts.iter().enumerate() {
            let x = (i / 4) as f64;
            let y = (i % 4 + 4) as f64;

            assert_eq!((x, y), (pt.x, pt.y));
        }
    }
}
