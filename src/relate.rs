use std::panic::{self, AssertUnwindSafe};

use geo::Relate;
use log;

use super::core::{GeomResult, GeometryError};
use super::dimension::Dimension;
use super::geometry::Geometry;
use super::matrix::{IntersectionMatrix, Location};
use super::ops;

/// Computes the DE-9IM matrix of two non-empty geometries.
///
/// Implementations only see inputs that passed the generic checks: neither argument is a
/// geometry collection and neither is empty.
pub trait RelateEngine {
    fn relate(&self, a: &Geometry, b: &Geometry) -> GeomResult<IntersectionMatrix>;
}

/// Relate backed by the `geo` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoRelate;

impl RelateEngine for GeoRelate {
    fn relate(&self, a: &Geometry, b: &Geometry) -> GeomResult<IntersectionMatrix> {
        let (ga, gb) = (ops::to_geo(a), ops::to_geo(b));
        let geo_matrix = panic::catch_unwind(AssertUnwindSafe(|| ga.relate(&gb))).map_err(|_| {
            GeometryError::Topology {
                message: String::from("relate computation failed"),
                location: a.coordinate(),
            }
        })?;

        let mut matrix = IntersectionMatrix::new();
        for row in Location::ALL {
            for col in Location::ALL {
                let mut entry = Dimension::False;
                for dim in [Dimension::A, Dimension::L, Dimension::P] {
                    let matched = geo_matrix
                        .matches(&cell_pattern(row, col, dim.symbol()))
                        .map_err(|err| GeometryError::InvalidArgument(format!("{err:?}")))?;
                    if matched {
                        entry = dim;
                        break;
                    }
                }
                matrix.set(row, col, entry);
            }
        }
        Ok(matrix)
    }
}

// Pattern constraining a single matrix entry
fn cell_pattern(row: Location, col: Location, symbol: char) -> String {
    let mut pattern = ['*'; 9];
    pattern[row as usize * 3 + col as usize] = symbol;
    pattern.iter().collect()
}

/// Relate two geometries with `engine`.
///
/// Generic collections are rejected with `UnsupportedOperation`; empty inputs are answered
/// without calling the engine.
pub fn relate_with(
    a: &Geometry,
    b: &Geometry,
    engine: &dyn RelateEngine,
) -> GeomResult<IntersectionMatrix> {
    if a.is_geometry_collection() || b.is_geometry_collection() {
        return Err(GeometryError::collection_not_supported());
    }
    if a.is_empty() || b.is_empty() {
        return Ok(empty_relate(a, b));
    }
    log::trace!("relate {} / {}", a.geometry_type(), b.geometry_type());
    engine.relate(a, b)
}

/// Relate using the default engine
pub fn relate(a: &Geometry, b: &Geometry) -> GeomResult<IntersectionMatrix> {
    relate_with(a, b, &GeoRelate)
}

// Matrix when at least one input is empty: only the exterior of the empty side meets anything
fn empty_relate(a: &Geometry, b: &Geometry) -> IntersectionMatrix {
    let mut matrix = IntersectionMatrix::new();
    matrix.set(Location::Exterior, Location::Exterior, Dimension::A);
    if !a.is_empty() {
        matrix.set(Location::Interior, Location::Exterior, a.dimension());
        matrix.set(Location::Boundary, Location::Exterior, a.boundary_dimension());
    }
    if !b.is_empty() {
        matrix.set(Location::Exterior, Location::Interior, b.dimension());
        matrix.set(Location::Exterior, Location::Boundary, b.boundary_dimension());
    }
    matrix
}
