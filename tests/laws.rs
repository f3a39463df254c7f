use std::sync::Arc;

use geomlib::coordinate::{X, Y, Z};
use geomlib::coordinate_arrays::{self, BidirectionalComparator};
use geomlib::sequence::{self, CoordinateArraySequenceFactory, PackedCoordinateSequenceFactory};
use geomlib::serialization::parse_wkt;
use geomlib::{
    Coordinate, CoordinateSequence, CoordinateSequenceFactory, Geometry, GeometryError,
    GeometryFactory,
};
use rand::{Rng, rng};

fn wkt(s: &str) -> Geometry {
    parse_wkt(s, &GeometryFactory::default_shared()).unwrap()
}

fn random_rectangle(random: &mut impl Rng) -> Geometry {
    let x = random.random_range(-20..20) as f64;
    let y = random.random_range(-20..20) as f64;
    let w = random.random_range(1..15) as f64;
    let h = random.random_range(1..15) as f64;
    wkt(&format!(
        "POLYGON (({x} {y}, {x} {}, {} {}, {} {y}, {x} {y}))",
        y + h,
        x + w,
        y + h,
        x + w
    ))
}

fn random_point(random: &mut impl Rng) -> Geometry {
    let x = random.random_range(-25..25) as f64 + 0.5;
    let y = random.random_range(-25..25) as f64 + 0.5;
    wkt(&format!("POINT ({x} {y})"))
}

#[test]
fn coordinate_equality_laws() {
    let mut random = rng();
    for _ in 0..50 {
        let x: f64 = random.random_range(-1e6..1e6);
        let y: f64 = random.random_range(-1e6..1e6);
        let c = Coordinate::new_xyz(x, y, f64::NAN);
        let other = Coordinate::new_xyz(x, y, random.random_range(-10.0..10.0));
        assert!(c.equals_2d(&c));
        assert!(c.equals_3d(&c));
        assert!(c.equals_2d(&other));
        assert!(!c.equals_3d(&other));
    }
}

#[test]
fn ordinate_access_depends_on_layout() {
    let c = Coordinate::new(1.0, 2.0);
    assert!(c.get_ordinate(Z).unwrap().is_nan());
    assert_eq!(c.get_ordinate(X).unwrap(), 1.0);

    let xy = Coordinate::new_xy(1.0, 2.0);
    assert_eq!(xy.get_ordinate(Y).unwrap(), 2.0);
    assert!(matches!(xy.get_ordinate(Z), Err(GeometryError::InvalidArgument(_))));
}

#[test]
fn double_reverse_compares_equal() {
    let mut random = rng();
    for _ in 0..20 {
        let n = random.random_range(0..12);
        let pts: Vec<Coordinate> = (0..n)
            .map(|_| Coordinate::new(random.random_range(-5.0..5.0), random.random_range(-5.0..5.0)))
            .collect();
        let mut twice = pts.clone();
        coordinate_arrays::reverse(&mut twice);
        coordinate_arrays::reverse(&mut twice);
        assert_eq!(coordinate_arrays::compare(&pts, &twice), std::cmp::Ordering::Equal);
    }
}

#[test]
fn bidirectional_comparator_ignores_direction() {
    let pts = [
        Coordinate::new(0.0, 0.0),
        Coordinate::new(1.0, 0.0),
        Coordinate::new(1.0, 1.0),
    ];
    let mut rev = pts;
    rev.reverse();
    assert_eq!(
        BidirectionalComparator.compare(&pts, &rev),
        std::cmp::Ordering::Equal
    );
}

#[test]
fn sequence_ring_rules() {
    let factories: [Arc<dyn CoordinateSequenceFactory>; 2] = [
        Arc::new(CoordinateArraySequenceFactory),
        Arc::new(PackedCoordinateSequenceFactory),
    ];
    let square = [
        Coordinate::new(0.0, 0.0),
        Coordinate::new(0.0, 1.0),
        Coordinate::new(1.0, 1.0),
        Coordinate::new(0.0, 0.0),
    ];
    for factory in factories {
        assert!(sequence::ops::is_ring(factory.create(&[]).as_ref()));
        for n in 1..4 {
            assert!(!sequence::ops::is_ring(factory.create(&square[..n]).as_ref()));
        }
        assert!(sequence::ops::is_ring(factory.create(&square).as_ref()));
        let mut open = square;
        open[3] = Coordinate::new(5.0, 5.0);
        assert!(!sequence::ops::is_ring(factory.create(&open).as_ref()));

        let line = factory.create(&[Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)]);
        let ring = sequence::ops::ensure_valid_ring(factory.as_ref(), line.as_ref()).unwrap();
        let expected = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.0),
        ];
        let got = ring.to_coordinate_array();
        assert_eq!(got.len(), 4);
        for (a, b) in got.iter().zip(expected.iter()) {
            assert!(a.equals_2d(b));
        }
    }
}

#[test]
fn envelope_is_stable_and_refreshed_after_mutation() {
    let mut line = wkt("LINESTRING (0 0, 3 4)");
    let first = line.envelope_internal();
    assert_eq!(first, line.envelope_internal());

    let mut shift = |seq: &mut dyn CoordinateSequence, i: usize| {
        let x = seq.get_ordinate(i, X).unwrap();
        seq.set_ordinate(i, X, x + 10.0).unwrap();
    };
    line.apply_sequence_filter(&mut shift);
    let moved = line.envelope_internal();
    assert_eq!(moved.min_x(), 10.0);
    assert_eq!(moved.max_x(), 13.0);

    {
        let mut guard = line.mutate();
        for seq in guard.sequences() {
            seq.set_ordinate(0, Y, -2.0).unwrap();
        }
    }
    assert_eq!(line.envelope_internal().min_y(), -2.0);
}

#[test]
fn predicate_symmetry_laws() {
    let mut random = rng();
    for _ in 0..40 {
        let a = if random.random_bool(0.5) {
            random_rectangle(&mut random)
        } else {
            random_point(&mut random)
        };
        let b = random_rectangle(&mut random);
        assert_eq!(a.within(&b).unwrap(), b.contains(&a).unwrap());
        assert_eq!(b.within(&a).unwrap(), a.contains(&b).unwrap());
        assert_eq!(a.covered_by(&b).unwrap(), b.covers(&a).unwrap());
        assert_eq!(a.disjoint(&b).unwrap(), !a.intersects(&b).unwrap());
    }
}

#[test]
fn union_with_empty_is_identity() {
    let empty = wkt("POLYGON EMPTY");
    for s in [
        "POLYGON ((0 0, 0 4, 4 4, 4 0, 0 0))",
        "LINESTRING (0 0, 1 1, 2 0)",
        "MULTIPOINT ((1 1), (2 2))",
    ] {
        let a = wkt(s);
        assert!(a.union(&empty).unwrap().equals_exact(&a.copy()));
    }
}

#[test]
fn self_intersection_is_idempotent() {
    let mut random = rng();
    for _ in 0..10 {
        let a = random_rectangle(&mut random);
        assert!(a.intersection(&a).unwrap().equals_topo(&a).unwrap());
    }
    let triangle = wkt("POLYGON ((0 0, 5 8, 10 0, 0 0))");
    assert!(triangle.intersection(&triangle).unwrap().equals_topo(&triangle).unwrap());
    let point = wkt("POINT (3 7)");
    assert!(point.intersection(&point).unwrap().equals_topo(&point).unwrap());
}

#[test]
fn collections_are_rejected_by_relate() {
    let gc = wkt("GEOMETRYCOLLECTION (POINT (0 0), POLYGON ((0 0, 0 1, 1 1, 1 0, 0 0)))");
    let square = wkt("POLYGON ((0 0, 0 1, 1 1, 1 0, 0 0))");
    assert!(matches!(
        gc.relate(&square),
        Err(GeometryError::UnsupportedOperation(_))
    ));
    assert!(matches!(
        square.touches(&gc),
        Err(GeometryError::UnsupportedOperation(_))
    ));
}

#[test]
fn collection_overlays_with_empty_inputs() {
    let gc = wkt("GEOMETRYCOLLECTION (POINT (5 5), LINESTRING (0 0, 1 1))");
    let empty = wkt("POLYGON EMPTY");
    for r in [
        gc.union(&empty),
        empty.union(&gc),
        gc.difference(&empty),
        gc.sym_difference(&empty),
        empty.sym_difference(&gc),
    ] {
        assert!(r.unwrap().equals_exact(&gc));
    }
    assert!(empty.difference(&gc).unwrap().is_empty());

    let square = wkt("POLYGON ((0 0, 0 4, 4 4, 4 0, 0 0))");
    let empty_gc = wkt("GEOMETRYCOLLECTION EMPTY");
    assert!(square.union(&empty_gc).unwrap().equals_exact(&square));
    assert!(empty_gc.union(&square).unwrap().equals_exact(&square));
}

#[test]
fn overlay_results_are_simple() {
    let point = wkt("POINT (3 7)");
    let r = point.intersection(&point).unwrap();
    assert!(r.equals_exact(&point));
    assert!(r.is_simple());

    let mp = wkt("MULTIPOINT ((1 1), (2 2))");
    let r = mp.intersection(&mp).unwrap();
    assert_eq!(r.num_points(), 2);
    assert!(r.is_simple());

    let mut random = rng();
    for _ in 0..10 {
        let a = random_rectangle(&mut random);
        assert!(a.intersection(&a).unwrap().is_simple());
        let p = random_point(&mut random);
        assert!(p.union(&p).unwrap().is_simple());
    }
}

#[test]
fn line_area_boundary_contact() {
    let square = wkt("POLYGON ((0 0, 0 2, 2 2, 2 0, 0 0))");

    let edge = wkt("LINESTRING (0 2, 2 2)");
    assert!(edge.intersection(&square).unwrap().equals_topo(&edge).unwrap());
    assert!(edge.difference(&square).unwrap().is_empty());

    let touching = wkt("LINESTRING (2 1, 3 1)");
    let r = touching.intersection(&square).unwrap();
    assert!(r.equals_topo(&wkt("POINT (2 1)")).unwrap());
    assert_eq!(!r.is_empty(), touching.intersects(&square).unwrap());

    let neighbour = wkt("POLYGON ((2 0, 2 2, 4 2, 4 0, 2 0))");
    let shared = square.intersection(&neighbour).unwrap();
    assert!(shared.equals_topo(&wkt("LINESTRING (2 0, 2 2)")).unwrap());
    assert_eq!(!shared.is_empty(), square.intersects(&neighbour).unwrap());
}

#[test]
fn unary_union_nodes_self_crossing_line() {
    let bowtie = wkt("LINESTRING (0 0, 2 2, 2 0, 0 2)");
    assert!(!bowtie.is_simple());
    let u = bowtie.union_self().unwrap();
    assert!(u.is_simple());
    assert_eq!(u.num_geometries(), 3);
    assert!((u.length() - bowtie.length()).abs() < 1e-9);
}
