//! Functions over plain slices of [`Coordinate`].
use std::cmp::Ordering;

use super::coordinate::Coordinate;
use super::coordinate_list::CoordinateList;
use super::core::{GeomResult, GeometryError};
use super::envelope::Envelope;

/// Ordinate dimension of the richest coordinate, 3 for an empty slice
pub fn dimension(pts: &[Coordinate]) -> usize {
    if pts.is_empty() {
        return 3;
    }
    let spatial = pts
        .iter()
        .map(|c| c.dimension() - c.measures())
        .max()
        .unwrap_or(3);
    spatial + measures(pts)
}

/// Measure count of the richest coordinate
pub fn measures(pts: &[Coordinate]) -> usize {
    pts.iter().map(Coordinate::measures).max().unwrap_or(0)
}

/// True if the points form a closed ring of at least 4 points
pub fn is_ring(pts: &[Coordinate]) -> bool {
    if pts.len() < 4 {
        return false;
    }
    pts[0].equals_2d(&pts[pts.len() - 1])
}

/// First point of `test_pts` that does not occur in `pts`.
///
/// Linear scan per test point, intended for small inputs.
pub fn pt_not_in_list<'a>(test_pts: &'a [Coordinate], pts: &[Coordinate]) -> Option<&'a Coordinate> {
    test_pts.iter().find(|test| index_of(test, pts).is_none())
}

/// Lexicographic order of two arrays; on an equal common prefix the shorter one is less.
pub fn compare(pts1: &[Coordinate], pts2: &[Coordinate]) -> Ordering {
    for (p1, p2) in pts1.iter().zip(pts2) {
        let comp = p1.compare_to(p2);
        if comp != Ordering::Equal {
            return comp;
        }
    }
    pts1.len().cmp(&pts2.len())
}

/// Forward direction comparator, the same order as [`compare`]
#[derive(Debug, Copy, Clone, Default)]
pub struct ForwardComparator;

impl ForwardComparator {
    pub fn compare(&self, pts1: &[Coordinate], pts2: &[Coordinate]) -> Ordering {
        compare(pts1, pts2)
    }
}

/// Direction in which the array is increasing: 1 when reading it forwards gives the smaller
/// sequence, -1 when reading it backwards does.
///
/// A palindrome is defined to increase forwards.
pub fn increasing_direction(pts: &[Coordinate]) -> i32 {
    let n = pts.len();
    for i in 0..n / 2 {
        let j = n - 1 - i;
        match pts[i].compare_to(&pts[j]) {
            Ordering::Less => return 1,
            Ordering::Greater => return -1,
            Ordering::Equal => {}
        }
    }
    1
}

/// Compares arrays regardless of direction: an array equals its own reversal.
///
/// Arrays of different length sort by length. Otherwise, if one is the reversal of the other
/// they are equal, and if not they compare forwards.
#[derive(Debug, Copy, Clone, Default)]
pub struct BidirectionalComparator;

impl BidirectionalComparator {
    pub fn compare(&self, pts1: &[Coordinate], pts2: &[Coordinate]) -> Ordering {
        if pts1.len() != pts2.len() {
            return pts1.len().cmp(&pts2.len());
        }
        let forward = compare(pts1, pts2);
        if forward == Ordering::Equal || is_equal_reversed(pts1, pts2) {
            return Ordering::Equal;
        }
        forward
    }
}

/// True if `pts2` read backwards equals `pts1` in 2D
pub fn is_equal_reversed(pts1: &[Coordinate], pts2: &[Coordinate]) -> bool {
    pts1.len() == pts2.len()
        && pts1
            .iter()
            .zip(pts2.iter().rev())
            .all(|(a, b)| a.compare_to(b) == Ordering::Equal)
}

/// Independent copy of every coordinate
pub fn copy_deep(coordinates: &[Coordinate]) -> Vec<Coordinate> {
    coordinates.iter().map(Coordinate::copy).collect()
}

/// Copy `length` coordinates from `src[src_start..]` into `dest[dest_start..]`
pub fn copy_deep_into(
    src: &[Coordinate],
    src_start: usize,
    dest: &mut [Coordinate],
    dest_start: usize,
    length: usize,
) -> GeomResult<()> {
    check_range(src_start, length, src.len())?;
    check_range(dest_start, length, dest.len())?;
    dest[dest_start..dest_start + length].copy_from_slice(&src[src_start..src_start + length]);
    Ok(())
}

fn check_range(start: usize, length: usize, size: usize) -> GeomResult<()> {
    match start.checked_add(length) {
        Some(end) if end <= size => Ok(()),
        _ => Err(GeometryError::IndexOutOfRange {
            index: start.saturating_add(length).saturating_sub(1),
            size,
        }),
    }
}

/// True if two consecutive points are equal in 2D
pub fn has_repeated_points(coords: &[Coordinate]) -> bool {
    coords.windows(2).any(|w| w[0].equals_2d(&w[1]))
}

/// `coords` if it has at least `n` points, otherwise an empty vector
pub fn at_least_n_coordinates_or_nothing(n: usize, coords: &[Coordinate]) -> Vec<Coordinate> {
    if coords.len() >= n {
        coords.to_vec()
    } else {
        Vec::new()
    }
}

/// Drop consecutive duplicates. Points repeated elsewhere in the array are kept.
pub fn remove_repeated_points(coords: &[Coordinate]) -> Vec<Coordinate> {
    if !has_repeated_points(coords) {
        return coords.to_vec();
    }
    CoordinateList::from_coordinates(coords, false).into_vec()
}

pub fn reverse(coords: &mut [Coordinate]) {
    coords.reverse();
}

/// Element-wise 2D equality
pub fn equals(coord1: &[Coordinate], coord2: &[Coordinate]) -> bool {
    coord1.len() == coord2.len() && coord1.iter().zip(coord2).all(|(a, b)| a.equals_2d(b))
}

/// Element-wise equality decided by `comparator`
pub fn equals_with<F>(coord1: &[Coordinate], coord2: &[Coordinate], comparator: F) -> bool
where
    F: Fn(&Coordinate, &Coordinate) -> Ordering,
{
    coord1.len() == coord2.len()
        && coord1
            .iter()
            .zip(coord2)
            .all(|(a, b)| comparator(a, b) == Ordering::Equal)
}

/// Smallest coordinate in (X, Y) order, first occurrence on ties
pub fn min_coordinate(coordinates: &[Coordinate]) -> Option<&Coordinate> {
    let mut min: Option<&Coordinate> = None;
    for c in coordinates {
        if min.is_none_or(|m| c.compare_to(m) == Ordering::Less) {
            min = Some(c);
        }
    }
    min
}

/// Rotate so the first coordinate equal in value to `first` is at index 0. No-op if absent.
pub fn scroll(coordinates: &mut [Coordinate], first: &Coordinate) {
    if let Some(i) = index_of(first, coordinates) {
        coordinates.rotate_left(i);
    }
}

/// Position of the first coordinate equal to `coordinate` in 2D
pub fn index_of(coordinate: &Coordinate, coordinates: &[Coordinate]) -> Option<usize> {
    coordinates.iter().position(|c| c.equals_2d(coordinate))
}

/// Points `start..=end` with both bounds clamped into the array.
///
/// An empty vector comes back when the clamped range is empty.
pub fn extract(pts: &[Coordinate], start: isize, end: isize) -> Vec<Coordinate> {
    if pts.is_empty() {
        return Vec::new();
    }
    let last = pts.len() as isize - 1;
    let start = start.clamp(0, last + 1);
    let end = end.clamp(-1, last);
    if end < start {
        return Vec::new();
    }
    pts[start as usize..=end as usize].to_vec()
}

/// Bounding box of the coordinates
pub fn envelope(coordinates: &[Coordinate]) -> Envelope {
    Envelope::from_coordinates(coordinates)
}

/// Coordinates inside `env`, in order and with repeats kept
pub fn intersection(coordinates: &[Coordinate], env: &Envelope) -> Vec<Coordinate> {
    let mut list = CoordinateList::new();
    for c in coordinates.iter().filter(|c| env.intersects_coordinate(c)) {
        list.add(*c, true);
    }
    list.into_vec()
}
