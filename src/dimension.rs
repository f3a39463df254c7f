use std::fmt;

use super::core::{GeomResult, GeometryError};

/// Topological dimension of a point set, plus the extra values used in DE-9IM patterns.
///
/// Ordering follows the numeric values: `DontCare < True < False < P < L < A`, so the larger of
/// two matrix entries is the higher dimension.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    /// Any value, `*`
    DontCare,
    /// Non-empty, `T`
    True,
    /// Empty, `F`
    False,
    /// Points, `0`
    P,
    /// Curves, `1`
    L,
    /// Surfaces, `2`
    A,
}

impl Dimension {
    /// Numeric value: P=0, L=1, A=2, False=-1, True=-2, DontCare=-3
    pub fn value(&self) -> i32 {
        match self {
            Dimension::DontCare => -3,
            Dimension::True => -2,
            Dimension::False => -1,
            Dimension::P => 0,
            Dimension::L => 1,
            Dimension::A => 2,
        }
    }

    pub fn from_value(value: i32) -> GeomResult<Self> {
        match value {
            -3 => Ok(Dimension::DontCare),
            -2 => Ok(Dimension::True),
            -1 => Ok(Dimension::False),
            0 => Ok(Dimension::P),
            1 => Ok(Dimension::L),
            2 => Ok(Dimension::A),
            _ => Err(GeometryError::InvalidArgument(format!(
                "Unknown dimension value: {value}"
            ))),
        }
    }

    /// Matrix symbol of this value
    pub fn symbol(&self) -> char {
        match self {
            Dimension::DontCare => '*',
            Dimension::True => 'T',
            Dimension::False => 'F',
            Dimension::P => '0',
            Dimension::L => '1',
            Dimension::A => '2',
        }
    }

    /// Parse a matrix symbol, case-insensitive
    pub fn from_symbol(symbol: char) -> GeomResult<Self> {
        match symbol.to_ascii_uppercase() {
            '*' => Ok(Dimension::DontCare),
            'T' => Ok(Dimension::True),
            'F' => Ok(Dimension::False),
            '0' => Ok(Dimension::P),
            '1' => Ok(Dimension::L),
            '2' => Ok(Dimension::A),
            _ => Err(GeometryError::InvalidArgument(format!(
                "Unknown dimension symbol: {symbol}"
            ))),
        }
    }

    /// True for the dimensions of non-empty point sets (P, L, A)
    pub fn is_non_empty(&self) -> bool {
        self.value() >= 0
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        for dim in [
            Dimension::DontCare,
            Dimension::True,
            Dimension::False,
            Dimension::P,
            Dimension::L,
            Dimension::A,
        ] {
            assert_eq!(Dimension::from_symbol(dim.symbol()).unwrap(), dim);
            assert_eq!(Dimension::from_value(dim.value()).unwrap(), dim);
        }
        assert_eq!(Dimension::from_symbol('t').unwrap(), Dimension::True);
        assert!(matches!(
            Dimension::from_symbol('x'),
            Err(GeometryError::InvalidArgument(_))
        ));
        assert!(Dimension::from_value(3).is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(Dimension::False < Dimension::P);
        assert!(Dimension::L < Dimension::A);
        assert_eq!(Dimension::P.max(Dimension::A), Dimension::A);
        assert!(!Dimension::False.is_non_empty());
    }
}
