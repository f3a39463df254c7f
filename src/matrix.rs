use std::fmt;
use std::str::FromStr;

use super::core::{GeomResult, GeometryError};
use super::dimension::Dimension;

/// Topological position of a point relative to a geometry; also the row/column index of an
/// [`IntersectionMatrix`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    Interior = 0,
    Boundary = 1,
    Exterior = 2,
}

impl Location {
    pub const ALL: [Location; 3] = [Location::Interior, Location::Boundary, Location::Exterior];
}

/// A DE-9IM matrix: the dimension of the intersection of the interior, boundary and exterior
/// of geometry A (rows) with those of geometry B (columns).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntersectionMatrix {
    entries: [[Dimension; 3]; 3],
}

impl IntersectionMatrix {
    /// A matrix with every entry `F`
    pub fn new() -> Self {
        Self {
            entries: [[Dimension::False; 3]; 3],
        }
    }

    /// Build from a nine character string in row-major order
    pub fn from_pattern(pattern: &str) -> GeomResult<Self> {
        let mut matrix = Self::new();
        matrix.set_pattern(pattern)?;
        Ok(matrix)
    }

    pub fn get(&self, row: Location, col: Location) -> Dimension {
        self.entries[row as usize][col as usize]
    }

    pub fn set(&mut self, row: Location, col: Location, dim: Dimension) {
        self.entries[row as usize][col as usize] = dim;
    }

    /// Set every entry from a nine character pattern
    pub fn set_pattern(&mut self, pattern: &str) -> GeomResult<()> {
        let symbols = pattern_symbols(pattern)?;
        for (i, symbol) in symbols.iter().enumerate() {
            self.entries[i / 3][i % 3] = Dimension::from_symbol(*symbol)?;
        }
        Ok(())
    }

    pub fn set_all(&mut self, dim: Dimension) {
        self.entries = [[dim; 3]; 3];
    }

    /// Raise an entry to `dim` if it is currently lower
    pub fn set_at_least(&mut self, row: Location, col: Location, dim: Dimension) {
        let entry = &mut self.entries[row as usize][col as usize];
        if *entry < dim {
            *entry = dim;
        }
    }

    /// Raise entries to the dimensions in `pattern`; `*`, `T` and `F` entries are ignored.
    pub fn set_at_least_pattern(&mut self, pattern: &str) -> GeomResult<()> {
        let symbols = pattern_symbols(pattern)?;
        for (i, symbol) in symbols.iter().enumerate() {
            let dim = Dimension::from_symbol(*symbol)?;
            if dim.is_non_empty() {
                self.set_at_least(Location::ALL[i / 3], Location::ALL[i % 3], dim);
            }
        }
        Ok(())
    }

    /// Raise every entry to at least the entry of `other`
    pub fn add(&mut self, other: &IntersectionMatrix) {
        for row in Location::ALL {
            for col in Location::ALL {
                self.set_at_least(row, col, other.get(row, col));
            }
        }
    }

    /// Swap the roles of A and B
    pub fn transpose(&self) -> Self {
        let mut out = *self;
        for row in 0..3 {
            for col in 0..3 {
                out.entries[row][col] = self.entries[col][row];
            }
        }
        out
    }

    /// True if `actual` satisfies the pattern symbol
    pub fn matches_dimension(actual: Dimension, symbol: char) -> GeomResult<bool> {
        Ok(match Dimension::from_symbol(symbol)? {
            Dimension::DontCare => true,
            Dimension::True => actual.is_non_empty() || actual == Dimension::True,
            expected => actual == expected,
        })
    }

    /// True if every entry satisfies the nine character pattern
    pub fn matches(&self, pattern: &str) -> GeomResult<bool> {
        let symbols = pattern_symbols(pattern)?;
        for (i, symbol) in symbols.iter().enumerate() {
            if !Self::matches_dimension(self.entries[i / 3][i % 3], *symbol)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn non_empty(&self, row: Location, col: Location) -> bool {
        self.get(row, col).is_non_empty()
    }

    fn empty(&self, row: Location, col: Location) -> bool {
        self.get(row, col) == Dimension::False
    }

    /// `FF*FF****`
    pub fn is_disjoint(&self) -> bool {
        use Location::*;
        self.empty(Interior, Interior)
            && self.empty(Interior, Boundary)
            && self.empty(Boundary, Interior)
            && self.empty(Boundary, Boundary)
    }

    pub fn is_intersects(&self) -> bool {
        !self.is_disjoint()
    }

    /// `FT*******`, `F**T*****` or `F***T****`, for every dimension pair except P/P
    pub fn is_touches(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Location::*;
        if dim_a > dim_b {
            return self.is_touches(dim_b, dim_a);
        }
        let applies = matches!(
            (dim_a, dim_b),
            (Dimension::A, Dimension::A)
                | (Dimension::L, Dimension::L)
                | (Dimension::L, Dimension::A)
                | (Dimension::P, Dimension::A)
                | (Dimension::P, Dimension::L)
        );
        applies
            && self.empty(Interior, Interior)
            && (self.non_empty(Interior, Boundary)
                || self.non_empty(Boundary, Interior)
                || self.non_empty(Boundary, Boundary))
    }

    /// `T*T******` for P/L, P/A, L/A; `T*****T**` for L/P, A/P, A/L; `0********` for L/L
    pub fn is_crosses(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Dimension::*;
        use Location::*;
        match (dim_a, dim_b) {
            (P, L) | (P, A) | (L, A) => {
                self.non_empty(Interior, Interior) && self.non_empty(Interior, Exterior)
            }
            (L, P) | (A, P) | (A, L) => {
                self.non_empty(Interior, Interior) && self.non_empty(Exterior, Interior)
            }
            (L, L) => self.get(Interior, Interior) == P,
            _ => false,
        }
    }

    /// `T*F**F***`
    pub fn is_within(&self) -> bool {
        use Location::*;
        self.non_empty(Interior, Interior)
            && self.empty(Interior, Exterior)
            && self.empty(Boundary, Exterior)
    }

    /// `T*****FF*`
    pub fn is_contains(&self) -> bool {
        use Location::*;
        self.non_empty(Interior, Interior)
            && self.empty(Exterior, Interior)
            && self.empty(Exterior, Boundary)
    }

    /// `T*****FF*`, `*T****FF*`, `***T**FF*` or `****T*FF*`
    pub fn is_covers(&self) -> bool {
        use Location::*;
        self.has_point_in_common() && self.empty(Exterior, Interior) && self.empty(Exterior, Boundary)
    }

    /// `T*F**F***`, `*TF**F***`, `**FT*F***` or `**F*TF***`
    pub fn is_covered_by(&self) -> bool {
        use Location::*;
        self.has_point_in_common() && self.empty(Interior, Exterior) && self.empty(Boundary, Exterior)
    }

    fn has_point_in_common(&self) -> bool {
        use Location::*;
        self.non_empty(Interior, Interior)
            || self.non_empty(Interior, Boundary)
            || self.non_empty(Boundary, Interior)
            || self.non_empty(Boundary, Boundary)
    }

    /// `T*F**FFF*` for geometries of the same dimension
    pub fn is_equals(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Location::*;
        dim_a == dim_b
            && self.non_empty(Interior, Interior)
            && self.empty(Interior, Exterior)
            && self.empty(Boundary, Exterior)
            && self.empty(Exterior, Interior)
            && self.empty(Exterior, Boundary)
    }

    /// `T*T***T**` for P/P and A/A; `1*T***T**` for L/L
    pub fn is_overlaps(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Location::*;
        let sides = self.non_empty(Interior, Exterior) && self.non_empty(Exterior, Interior);
        match (dim_a, dim_b) {
            (Dimension::P, Dimension::P) | (Dimension::A, Dimension::A) => {
                self.non_empty(Interior, Interior) && sides
            }
            (Dimension::L, Dimension::L) => self.get(Interior, Interior) == Dimension::L && sides,
            _ => false,
        }
    }
}

fn pattern_symbols(pattern: &str) -> GeomResult<Vec<char>> {
    let symbols: Vec<char> = pattern.chars().collect();
    if symbols.len() != 9 {
        return Err(GeometryError::InvalidArgument(format!(
            "Should be length 9: {pattern}"
        )));
    }
    Ok(symbols)
}

impl Default for IntersectionMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for IntersectionMatrix {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_pattern(s)
    }
}

impl fmt::Display for IntersectionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.entries {
            for dim in row {
                write!(f, "{}", dim.symbol())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_round_trip() {
        let m = IntersectionMatrix::from_pattern("212101212").unwrap();
        assert_eq!(m.to_string(), "212101212");
        assert_eq!(m.get(Location::Interior, Location::Boundary), Dimension::L);
        assert_eq!(m.transpose().to_string(), "212101212");
        assert!(IntersectionMatrix::from_pattern("2121").is_err());
        assert!(IntersectionMatrix::from_pattern("21210121x").is_err());
    }

    #[test]
    fn test_matches() {
        let m: IntersectionMatrix = "2FF1FF212".parse().unwrap();
        assert!(m.matches("T*F**F***").unwrap());
        assert!(m.matches("*********").unwrap());
        assert!(!m.matches("F********").unwrap());
        assert!(m.matches("2ff1ff212").unwrap());
        assert!(m.matches("TTT").is_err());
    }

    #[test]
    fn test_named_predicates() {
        // polygon inside a larger polygon
        let within: IntersectionMatrix = "2FF1FF212".parse().unwrap();
        assert!(within.is_within());
        assert!(within.is_covered_by());
        assert!(!within.is_contains());
        assert!(within.transpose().is_contains());
        assert!(within.transpose().is_covers());
        assert!(within.is_intersects());
        assert!(!within.is_overlaps(Dimension::A, Dimension::A));

        // polygons sharing an edge
        let touch: IntersectionMatrix = "FF2F11212".parse().unwrap();
        assert!(touch.is_touches(Dimension::A, Dimension::A));
        assert!(!touch.is_disjoint());

        // crossing lines
        let cross: IntersectionMatrix = "0F1FF0102".parse().unwrap();
        assert!(cross.is_crosses(Dimension::L, Dimension::L));
        assert!(!cross.is_touches(Dimension::L, Dimension::L));

        let equal: IntersectionMatrix = "2FFF1FFF2".parse().unwrap();
        assert!(equal.is_equals(Dimension::A, Dimension::A));
        assert!(!equal.is_equals(Dimension::A, Dimension::L));

        let disjoint: IntersectionMatrix = "FF2FF1212".parse().unwrap();
        assert!(disjoint.is_disjoint());
        assert!(!disjoint.is_covers());
    }

    #[test]
    fn test_set_at_least() {
        let mut m = IntersectionMatrix::new();
        m.set_at_least(Location::Interior, Location::Interior, Dimension::L);
        m.set_at_least(Location::Interior, Location::Interior, Dimension::P);
        assert_eq!(m.get(Location::Interior, Location::Interior), Dimension::L);
        m.set_at_least_pattern("2********").unwrap();
        assert_eq!(m.to_string(), "2FFFFFFFF");

        let mut other = IntersectionMatrix::new();
        other.set(Location::Exterior, Location::Exterior, Dimension::A);
        m.add(&other);
        assert_eq!(m.to_string(), "2FFFFFFF2");
    }
}
