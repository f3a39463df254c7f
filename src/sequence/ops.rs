//! Utility functions over [`CoordinateSequence`] values.
use std::cmp::Ordering;

use super::{CoordinateSequence, CoordinateSequenceFactory};
use crate::coordinate::Coordinate;
use crate::core::GeomResult;

/// Reverse a sequence in place
pub fn reverse(seq: &mut dyn CoordinateSequence) -> GeomResult<()> {
    let size = seq.size();
    if size <= 1 {
        return Ok(());
    }
    let last = size - 1;
    for i in 0..size / 2 {
        swap(seq, i, last - i)?;
    }
    Ok(())
}

/// Swap the coordinates at two positions
pub fn swap(seq: &mut dyn CoordinateSequence, i: usize, j: usize) -> GeomResult<()> {
    if i == j {
        return Ok(());
    }
    for dim in 0..seq.dimension() {
        let tmp = seq.get_ordinate(i, dim)?;
        let other = seq.get_ordinate(j, dim)?;
        seq.set_ordinate(i, dim, other)?;
        seq.set_ordinate(j, dim, tmp)?;
    }
    Ok(())
}

/// Copy `length` coordinates from `src` starting at `src_pos` into `dest` at `dest_pos`.
///
/// Only the ordinates both sequences have are copied.
pub fn copy(
    src: &dyn CoordinateSequence,
    src_pos: usize,
    dest: &mut dyn CoordinateSequence,
    dest_pos: usize,
    length: usize,
) -> GeomResult<()> {
    for i in 0..length {
        copy_coord(src, src_pos + i, dest, dest_pos + i)?;
    }
    Ok(())
}

/// Copy one coordinate over the common dimension of both sequences.
///
/// Z and M are matched by meaning, so an XYM source never writes its measure into a Z slot.
pub fn copy_coord(
    src: &dyn CoordinateSequence,
    src_pos: usize,
    dest: &mut dyn CoordinateSequence,
    dest_pos: usize,
) -> GeomResult<()> {
    let min_dim = src.dimension().min(dest.dimension());
    if src.has_z() == dest.has_z() && src.has_m() == dest.has_m() {
        for dim in 0..min_dim {
            dest.set_ordinate(dest_pos, dim, src.get_ordinate(src_pos, dim)?)?;
        }
        return Ok(());
    }

    let mut coord = dest.create_coordinate();
    coord.set_coordinate(&src.get_coordinate(src_pos)?);
    for dim in 0..dest.dimension() {
        dest.set_ordinate(dest_pos, dim, coord.get_ordinate(dim)?)?;
    }
    Ok(())
}

/// True if the sequence is a ring: empty, or at least 4 points with first equal to last in 2D.
pub fn is_ring(seq: &dyn CoordinateSequence) -> bool {
    let n = seq.size();
    if n == 0 {
        return true;
    }
    if n <= 3 {
        return false;
    }
    seq.ordinate(0, 0) == seq.ordinate(n - 1, 0) && seq.ordinate(0, 1) == seq.ordinate(n - 1, 1)
}

/// Valid ring built from `seq`.
///
/// An empty or already valid ring is copied unchanged. An unclosed sequence gets its start
/// point appended; a short one is padded with the start point up to 4 points.
pub fn ensure_valid_ring(
    factory: &dyn CoordinateSequenceFactory,
    seq: &dyn CoordinateSequence,
) -> GeomResult<Box<dyn CoordinateSequence>> {
    let n = seq.size();
    if n == 0 {
        return Ok(seq.copy());
    }
    if n <= 3 {
        return create_closed_ring(factory, seq, 4);
    }
    let is_closed =
        seq.ordinate(0, 0) == seq.ordinate(n - 1, 0) && seq.ordinate(0, 1) == seq.ordinate(n - 1, 1);
    if is_closed {
        return Ok(seq.copy());
    }
    create_closed_ring(factory, seq, n + 1)
}

fn create_closed_ring(
    factory: &dyn CoordinateSequenceFactory,
    seq: &dyn CoordinateSequence,
    size: usize,
) -> GeomResult<Box<dyn CoordinateSequence>> {
    let mut new_seq = factory.create_with_size(size, seq.dimension(), seq.measures());
    let n = seq.size();
    copy(seq, 0, new_seq.as_mut(), 0, n)?;
    for i in n..size {
        copy(seq, 0, new_seq.as_mut(), i, 1)?;
    }
    Ok(new_seq)
}

/// Copy of `seq` padded to `size` points by repeating its last point
pub fn extend(
    factory: &dyn CoordinateSequenceFactory,
    seq: &dyn CoordinateSequence,
    size: usize,
) -> GeomResult<Box<dyn CoordinateSequence>> {
    let mut new_seq = factory.create_with_size(size, seq.dimension(), seq.measures());
    let n = seq.size();
    copy(seq, 0, new_seq.as_mut(), 0, n.min(size))?;
    if n > 0 {
        for i in n..size {
            copy(seq, n - 1, new_seq.as_mut(), i, 1)?;
        }
    }
    Ok(new_seq)
}

/// Equal size and equal ordinates over the common dimension. NaN equals NaN.
pub fn is_equal(a: &dyn CoordinateSequence, b: &dyn CoordinateSequence) -> bool {
    if a.size() != b.size() {
        return false;
    }
    let dim = a.dimension().min(b.dimension());
    for i in 0..a.size() {
        for d in 0..dim {
            let (v1, v2) = (a.ordinate(i, d), b.ordinate(i, d));
            if v1 == v2 || (v1.is_nan() && v2.is_nan()) {
                continue;
            }
            return false;
        }
    }
    true
}

/// Compact text form, e.g. `(0 0, 1 2)`
pub fn to_string(seq: &dyn CoordinateSequence) -> String {
    let points: Vec<String> = (0..seq.size())
        .map(|i| {
            (0..seq.dimension())
                .map(|d| seq.ordinate(i, d).to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    format!("({})", points.join(", "))
}

/// Smallest coordinate in (X, Y) order; `None` for an empty sequence
pub fn min_coordinate(seq: &dyn CoordinateSequence) -> Option<Coordinate> {
    min_coordinate_index(seq).and_then(|i| seq.get_coordinate(i).ok())
}

/// Index of the smallest coordinate; ties resolve to the first occurrence
pub fn min_coordinate_index(seq: &dyn CoordinateSequence) -> Option<usize> {
    if seq.is_empty() {
        return None;
    }
    min_coordinate_index_in(seq, 0, seq.size() - 1)
}

/// Index of the smallest coordinate within `from..=to`
pub fn min_coordinate_index_in(
    seq: &dyn CoordinateSequence,
    from: usize,
    to: usize,
) -> Option<usize> {
    let mut min: Option<(usize, Coordinate)> = None;
    for i in from..=to.min(seq.size().saturating_sub(1)) {
        let Ok(c) = seq.get_coordinate(i) else { break };
        match &min {
            Some((_, m)) if c.compare_to(m) != Ordering::Less => {}
            _ => min = Some((i, c)),
        }
    }
    min.map(|(i, _)| i)
}

/// Position of the first coordinate equal to `coordinate` in 2D
pub fn index_of(coordinate: &Coordinate, seq: &dyn CoordinateSequence) -> Option<usize> {
    (0..seq.size()).find(|&i| {
        seq.ordinate(i, 0) == coordinate.x && seq.ordinate(i, 1) == coordinate.y
    })
}

/// Rotate so that the first occurrence of `first` becomes index 0. No-op if absent.
pub fn scroll_to_coordinate(seq: &mut dyn CoordinateSequence, first: &Coordinate) -> GeomResult<()> {
    match index_of(first, seq) {
        Some(i) => scroll(seq, i),
        None => Ok(()),
    }
}

/// Rotate so that `index` becomes the first point; a ring stays closed.
pub fn scroll(seq: &mut dyn CoordinateSequence, index: usize) -> GeomResult<()> {
    let ring = is_ring(seq);
    scroll_ring(seq, index, ring)
}

/// Rotate so that `index` becomes the first point, treating `seq` as a closed ring when
/// `ensure_ring` is set.
pub fn scroll_ring(
    seq: &mut dyn CoordinateSequence,
    index: usize,
    ensure_ring: bool,
) -> GeomResult<()> {
    if seq.is_empty() {
        return Ok(());
    }
    let coords = seq.to_coordinate_array();
    // a ring's closing point is not part of the rotation
    let last = if ensure_ring { coords.len() - 1 } else { coords.len() };
    if last == 0 {
        return Ok(());
    }
    let index = index % last;
    if index == 0 {
        return Ok(());
    }

    for (j, i) in (index..last).chain(0..index).enumerate() {
        write_coordinate(seq, j, &coords[i])?;
    }
    if ensure_ring {
        write_coordinate(seq, last, &coords[index])?;
    }
    Ok(())
}

fn write_coordinate(seq: &mut dyn CoordinateSequence, i: usize, c: &Coordinate) -> GeomResult<()> {
    for d in 0..seq.dimension() {
        seq.set_ordinate(i, d, c.get_ordinate(d)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{CoordinateArraySequenceFactory, PackedCoordinateSequenceFactory};

    fn xy_seq(pts: &[(f64, f64)]) -> Box<dyn CoordinateSequence> {
        let coords: Vec<Coordinate> = pts.iter().map(|&(x, y)| Coordinate::new_xy(x, y)).collect();
        CoordinateArraySequenceFactory.create(&coords)
    }

    fn xy_pairs(seq: &dyn CoordinateSequence) -> Vec<(f64, f64)> {
        seq.to_coordinate_array().iter().map(|c| (c.x, c.y)).collect()
    }

    #[test]
    fn test_is_ring() {
        assert!(is_ring(xy_seq(&[]).as_ref()));
        assert!(!is_ring(xy_seq(&[(0.0, 0.0)]).as_ref()));
        assert!(!is_ring(xy_seq(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]).as_ref()));
        assert!(is_ring(
            xy_seq(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]).as_ref()
        ));
        assert!(!is_ring(
            xy_seq(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]).as_ref()
        ));
    }

    #[test]
    fn test_ensure_valid_ring() {
        let seq = xy_seq(&[(0.0, 0.0), (1.0, 1.0)]);
        let ring = ensure_valid_ring(&CoordinateArraySequenceFactory, seq.as_ref()).unwrap();
        assert_eq!(
            xy_pairs(ring.as_ref()),
            vec![(0.0, 0.0), (1.0, 1.0), (0.0, 0.0), (0.0, 0.0)]
        );

        let open = xy_seq(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let ring = ensure_valid_ring(&PackedCoordinateSequenceFactory, open.as_ref()).unwrap();
        assert_eq!(ring.size(), 5);
        assert!(is_ring(ring.as_ref()));

        let empty = xy_seq(&[]);
        assert!(ensure_valid_ring(&CoordinateArraySequenceFactory, empty.as_ref())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_reverse() {
        let mut seq = xy_seq(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        reverse(seq.as_mut()).unwrap();
        assert_eq!(xy_pairs(seq.as_ref()), vec![(2.0, 2.0), (1.0, 1.0), (0.0, 0.0)]);
    }

    #[test]
    fn test_copy_drops_extra_ordinates() {
        let src = CoordinateArraySequenceFactory.create(&[Coordinate::new_xyzm(1.0, 2.0, 3.0, 4.0)]);
        let mut dest = PackedCoordinateSequenceFactory.create_with_size(1, 3, 1);
        copy(src.as_ref(), 0, dest.as_mut(), 0, 1).unwrap();
        assert_eq!(dest.get_x(0).unwrap(), 1.0);
        assert_eq!(dest.get_m(0).unwrap(), 4.0);

        let mut xy = PackedCoordinateSequenceFactory.create_with_size(1, 2, 0);
        copy_coord(src.as_ref(), 0, xy.as_mut(), 0).unwrap();
        assert_eq!(xy.get_y(0).unwrap(), 2.0);
        assert!(copy_coord(src.as_ref(), 1, xy.as_mut(), 0).is_err());
    }

    #[test]
    fn test_is_equal_nan() {
        let a = CoordinateArraySequenceFactory.create(&[Coordinate::new(1.0, 2.0)]);
        let b = PackedCoordinateSequenceFactory.create(&[Coordinate::new(1.0, 2.0)]);
        assert!(is_equal(a.as_ref(), b.as_ref()));
        assert!(!is_equal(a.as_ref(), xy_seq(&[(1.0, 3.0)]).as_ref()));
    }

    #[test]
    fn test_scroll_ring() {
        let mut seq = xy_seq(&[(1.0, 1.0), (2.0, 0.0), (0.0, 0.0), (1.0, 1.0)]);
        let min = min_coordinate_index(seq.as_ref()).unwrap();
        assert_eq!(min, 2);
        scroll(seq.as_mut(), min).unwrap();
        assert_eq!(
            xy_pairs(seq.as_ref()),
            vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (0.0, 0.0)]
        );
        assert!(is_ring(seq.as_ref()));
    }

    #[test]
    fn test_scroll_ring_wraps_index() {
        let mut seq = xy_seq(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        scroll_ring(seq.as_mut(), 3, true).unwrap();
        assert_eq!(
            xy_pairs(seq.as_ref()),
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]
        );
        scroll_ring(seq.as_mut(), 4, true).unwrap();
        assert_eq!(
            xy_pairs(seq.as_ref()),
            vec![(1.0, 0.0), (1.0, 1.0), (0.0, 0.0), (1.0, 0.0)]
        );
    }

    #[test]
    fn test_scroll_open() {
        let mut seq = xy_seq(&[(1.0, 1.0), (2.0, 0.0), (0.0, 0.0)]);
        scroll_to_coordinate(seq.as_mut(), &Coordinate::new(2.0, 0.0)).unwrap();
        assert_eq!(xy_pairs(seq.as_ref()), vec![(2.0, 0.0), (0.0, 0.0), (1.0, 1.0)]);
        scroll_to_coordinate(seq.as_mut(), &Coordinate::new(9.0, 9.0)).unwrap();
        assert_eq!(seq.get_x(0).unwrap(), 2.0);
    }

    #[test]
    fn test_min_coordinate_ties() {
        let seq = xy_seq(&[(1.0, 0.0), (0.0, 0.0), (0.0, 0.0)]);
        assert_eq!(min_coordinate_index(seq.as_ref()), Some(1));
        assert_eq!(min_coordinate_index_in(seq.as_ref(), 2, 2), Some(2));
        assert_eq!(min_coordinate(xy_seq(&[]).as_ref()), None);
    }

    #[test]
    fn test_extend_and_to_string() {
        let seq = xy_seq(&[(0.0, 0.0), (1.5, 2.0)]);
        let ext = extend(&CoordinateArraySequenceFactory, seq.as_ref(), 4).unwrap();
        assert_eq!(to_string(ext.as_ref()), "(0 0, 1.5 2, 1.5 2, 1.5 2)");
    }
}
