use std::ops::Deref;

use super::coordinate::Coordinate;

/// A growable list of coordinates that can suppress consecutive repeated points.
///
/// Examples
/// ```rust
/// use geomlib::{Coordinate, CoordinateList};
///
/// let mut list = CoordinateList::new();
/// list.add(Coordinate::new(0.0, 0.0), false);
/// list.add(Coordinate::new(0.0, 0.0), false);
/// list.add(Coordinate::new(1.0, 0.0), false);
/// list.add(Coordinate::new(1.0, 1.0), false);
/// list.close_ring();
/// assert_eq!(list.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateList {
    coords: Vec<Coordinate>,
}

impl CoordinateList {
    pub fn new() -> Self {
        Self { coords: Vec::new() }
    }

    /// List holding `coords`, dropping consecutive duplicates unless `allow_repeated` is set
    pub fn from_coordinates(coords: &[Coordinate], allow_repeated: bool) -> Self {
        let mut list = Self {
            coords: Vec::with_capacity(coords.len()),
        };
        list.add_all(coords, allow_repeated);
        list
    }

    /// Append a coordinate. When repeats are not allowed it is skipped if equal in 2D to the
    /// current last point.
    pub fn add(&mut self, coord: Coordinate, allow_repeated: bool) {
        if !allow_repeated && self.coords.last().is_some_and(|last| last.equals_2d(&coord)) {
            return;
        }
        self.coords.push(coord);
    }

    /// Insert at position `i`. When repeats are not allowed it is skipped if equal in 2D to
    /// either neighbour.
    pub fn insert(&mut self, i: usize, coord: Coordinate, allow_repeated: bool) {
        if !allow_repeated {
            if i > 0 && self.coords.get(i - 1).is_some_and(|prev| prev.equals_2d(&coord)) {
                return;
            }
            if self.coords.get(i).is_some_and(|next| next.equals_2d(&coord)) {
                return;
            }
        }
        self.coords.insert(i.min(self.coords.len()), coord);
    }

    pub fn add_all(&mut self, coords: &[Coordinate], allow_repeated: bool) {
        for c in coords {
            self.add(*c, allow_repeated);
        }
    }

    /// Append `coords` forwards or backwards
    pub fn add_directed(&mut self, coords: &[Coordinate], allow_repeated: bool, forward: bool) {
        if forward {
            self.add_all(coords, allow_repeated);
        } else {
            for c in coords.iter().rev() {
                self.add(*c, allow_repeated);
            }
        }
    }

    /// Append `coords[start]` up to but excluding `coords[end]`, walking backwards when
    /// `start > end`.
    pub fn add_range(&mut self, coords: &[Coordinate], allow_repeated: bool, start: usize, end: usize) {
        if start <= end {
            for c in &coords[start..end] {
                self.add(*c, allow_repeated);
            }
        } else {
            for c in coords[end + 1..=start].iter().rev() {
                self.add(*c, allow_repeated);
            }
        }
    }

    /// Append the first point if the list is not already closed
    pub fn close_ring(&mut self) {
        if let (Some(first), Some(last)) = (self.coords.first(), self.coords.last()) {
            if !first.equals_2d(last) {
                let first = *first;
                self.coords.push(first);
            }
        }
    }

    pub fn get_coordinate(&self, i: usize) -> Option<&Coordinate> {
        self.coords.get(i)
    }

    pub fn to_coordinate_array(&self) -> Vec<Coordinate> {
        self.coords.clone()
    }

    /// Coordinates in list order, or reversed
    pub fn to_coordinate_array_directed(&self, forward: bool) -> Vec<Coordinate> {
        if forward {
            return self.to_coordinate_array();
        }
        self.coords.iter().rev().copied().collect()
    }

    pub fn into_vec(self) -> Vec<Coordinate> {
        self.coords
    }
}

impl Deref for CoordinateList {
    type Target = [Coordinate];

    fn deref(&self) -> &Self::Target {
        &self.coords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn test_repeated_points() {
        let mut list = CoordinateList::new();
        list.add(c(0.0, 0.0), false);
        list.add(c(0.0, 0.0), false);
        assert_eq!(list.len(), 1);
        list.add(c(0.0, 0.0), true);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_insert_checks_neighbours() {
        let mut list = CoordinateList::from_coordinates(&[c(0.0, 0.0), c(2.0, 2.0)], false);
        list.insert(1, c(2.0, 2.0), false);
        list.insert(1, c(0.0, 0.0), false);
        assert_eq!(list.len(), 2);
        list.insert(1, c(1.0, 1.0), false);
        assert_eq!(list[1], c(1.0, 1.0));
    }

    #[test]
    fn test_ranges_and_direction() {
        let coords = [c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0)];
        let mut list = CoordinateList::new();
        list.add_range(&coords, false, 0, 2);
        assert_eq!(list.to_coordinate_array(), vec![c(0.0, 0.0), c(1.0, 0.0)]);

        let mut list = CoordinateList::new();
        list.add_range(&coords, false, 3, 1);
        assert_eq!(list.to_coordinate_array(), vec![c(3.0, 0.0), c(2.0, 0.0)]);

        let mut list = CoordinateList::new();
        list.add_directed(&coords, false, false);
        assert_eq!(list[0], c(3.0, 0.0));
        assert_eq!(list.to_coordinate_array_directed(false)[0], c(0.0, 0.0));
    }

    #[test]
    fn test_close_ring() {
        let mut list = CoordinateList::from_coordinates(&[c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0)], false);
        list.close_ring();
        assert_eq!(list.len(), 4);
        list.close_ring();
        assert_eq!(list.len(), 4);

        let mut empty = CoordinateList::new();
        empty.close_ring();
        assert!(empty.is_empty());
    }
}
