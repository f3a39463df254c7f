use std::fmt;

use super::coordinate::Coordinate;

/// Axis-aligned bounding rectangle.
///
/// An envelope that contains nothing is "null"; it intersects, contains and covers nothing.
#[derive(Debug, Copy, Clone)]
pub struct Envelope {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Envelope {
    /// A null envelope
    pub fn null() -> Self {
        Self {
            min_x: 0.0,
            max_x: -1.0,
            min_y: 0.0,
            max_y: -1.0,
        }
    }

    /// Envelope spanning two corner values in any order
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            max_x: x1.max(x2),
            min_y: y1.min(y2),
            max_y: y1.max(y2),
        }
    }

    pub fn from_coordinate(c: &Coordinate) -> Self {
        Self::new(c.x, c.x, c.y, c.y)
    }

    pub fn from_coordinates<'a>(coords: impl IntoIterator<Item = &'a Coordinate>) -> Self {
        let mut env = Self::null();
        for c in coords {
            env.expand_to_include(c);
        }
        env
    }

    pub fn is_null(&self) -> bool {
        self.max_x < self.min_x
    }

    pub fn set_to_null(&mut self) {
        *self = Self::null();
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        if self.is_null() {
            return 0.0;
        }
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        if self.is_null() {
            return 0.0;
        }
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn centre(&self) -> Option<Coordinate> {
        if self.is_null() {
            return None;
        }
        Some(Coordinate::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        ))
    }

    pub fn expand_to_include_xy(&mut self, x: f64, y: f64) {
        if self.is_null() {
            *self = Self::new(x, x, y, y);
            return;
        }
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    pub fn expand_to_include(&mut self, c: &Coordinate) {
        self.expand_to_include_xy(c.x, c.y);
    }

    /// Grow to cover another envelope
    pub fn expand_to_include_envelope(&mut self, other: &Envelope) {
        if other.is_null() {
            return;
        }
        if self.is_null() {
            *self = *other;
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Grow (or shrink, for negative distances) every side by `distance`
    pub fn expand_by(&mut self, distance: f64) {
        if self.is_null() {
            return;
        }
        self.min_x -= distance;
        self.max_x += distance;
        self.min_y -= distance;
        self.max_y += distance;
        if self.min_x > self.max_x || self.min_y > self.max_y {
            self.set_to_null();
        }
    }

    /// Common area of two envelopes; null when they do not intersect
    pub fn intersection(&self, other: &Envelope) -> Envelope {
        if !self.intersects(other) {
            return Self::null();
        }
        Self {
            min_x: self.min_x.max(other.min_x),
            max_x: self.max_x.min(other.max_x),
            min_y: self.min_y.max(other.min_y),
            max_y: self.max_y.min(other.max_y),
        }
    }

    pub fn intersects(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }

    pub fn intersects_coordinate(&self, c: &Coordinate) -> bool {
        self.intersects_xy(c.x, c.y)
    }

    pub fn intersects_xy(&self, x: f64, y: f64) -> bool {
        if self.is_null() {
            return false;
        }
        !(x > self.max_x || x < self.min_x || y > self.max_y || y < self.min_y)
    }

    pub fn disjoint(&self, other: &Envelope) -> bool {
        !self.intersects(other)
    }

    /// True if `other` lies within this envelope. Boundaries count as contained.
    pub fn contains(&self, other: &Envelope) -> bool {
        self.covers(other)
    }

    pub fn covers(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    pub fn covers_coordinate(&self, c: &Coordinate) -> bool {
        self.intersects_coordinate(c)
    }

    /// Distance between the closest points of two envelopes; zero if they intersect
    pub fn distance(&self, other: &Envelope) -> f64 {
        if self.intersects(other) {
            return 0.0;
        }
        let dx = if self.max_x < other.min_x {
            other.min_x - self.max_x
        } else if self.min_x > other.max_x {
            self.min_x - other.max_x
        } else {
            0.0
        };
        let dy = if self.max_y < other.min_y {
            other.min_y - self.max_y
        } else if self.min_y > other.max_y {
            self.min_y - other.max_y
        } else {
            0.0
        };
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::null()
    }
}

impl PartialEq for Envelope {
    fn eq(&self, other: &Self) -> bool {
        if self.is_null() {
            return other.is_null();
        }
        self.min_x == other.min_x
            && self.max_x == other.max_x
            && self.min_y == other.min_y
            && self.max_y == other.max_y
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "Env[null]");
        }
        write!(
            f,
            "Env[{} : {}, {} : {}]",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_envelope() {
        let env = Envelope::null();
        assert!(env.is_null());
        assert_eq!(env.width(), 0.0);
        assert!(!env.intersects(&env));
        assert!(!env.covers(&Envelope::new(0.0, 1.0, 0.0, 1.0)));
        assert_eq!(env, Envelope::default());
        assert!(env.centre().is_none());
    }

    #[test]
    fn test_expand() {
        let mut env = Envelope::null();
        env.expand_to_include(&Coordinate::new(1.0, 2.0));
        assert!(!env.is_null());
        assert_eq!(env.area(), 0.0);
        env.expand_to_include(&Coordinate::new(-1.0, 5.0));
        assert_eq!(env, Envelope::new(-1.0, 1.0, 2.0, 5.0));

        let mut other = Envelope::null();
        other.expand_to_include_envelope(&env);
        assert_eq!(other, env);

        other.expand_by(-10.0);
        assert!(other.is_null());
    }

    #[test]
    fn test_predicates() {
        let a = Envelope::new(0.0, 10.0, 0.0, 10.0);
        let b = Envelope::new(5.0, 15.0, 5.0, 15.0);
        let c = Envelope::new(2.0, 3.0, 2.0, 3.0);
        let d = Envelope::new(20.0, 30.0, 0.0, 1.0);

        assert!(a.intersects(&b));
        assert!(a.covers(&c));
        assert!(!c.covers(&a));
        assert!(a.disjoint(&d));
        assert_eq!(a.intersection(&b), Envelope::new(5.0, 10.0, 5.0, 10.0));
        assert!(a.intersection(&d).is_null());
        assert_eq!(a.distance(&d), 10.0);
        assert!(a.intersects_coordinate(&Coordinate::new(10.0, 0.0)));
    }
}
