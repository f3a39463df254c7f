use std::fs::File;
use std::io::Write;
use std::sync::Arc;

use clap::ValueEnum;

use super::factory::GeometryFactory;
use super::geometry::Geometry;
use super::overlay::OverlayOp;
use super::precision::PrecisionModel;
use super::sequence::{CoordinateArraySequenceFactory, PackedCoordinateSequenceFactory};
use super::serialization::parse_wkt;

/// Binary predicates available from the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PredicateName {
    Intersects,
    Disjoint,
    Contains,
    Within,
    Covers,
    CoveredBy,
    Touches,
    Crosses,
    Overlaps,
    Equals,
}

/// Set operations available from the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OverlayName {
    Intersection,
    Union,
    Difference,
    SymDifference,
}

impl From<OverlayName> for OverlayOp {
    fn from(name: OverlayName) -> Self {
        match name {
            OverlayName::Intersection => OverlayOp::Intersection,
            OverlayName::Union => OverlayOp::Union,
            OverlayName::Difference => OverlayOp::Difference,
            OverlayName::SymDifference => OverlayOp::SymDifference,
        }
    }
}

/// Build the factory used to parse command inputs
pub fn build_factory(srid: i32, scale: Option<f64>, packed: bool) -> Result<Arc<GeometryFactory>, String> {
    let precision_model = match scale {
        Some(s) => PrecisionModel::fixed(s).map_err(|e| format!("Invalid scale: {e}"))?,
        None => PrecisionModel::Floating,
    };
    let factory = if packed {
        GeometryFactory::new(precision_model, srid, Arc::new(PackedCoordinateSequenceFactory))
    } else {
        GeometryFactory::new(precision_model, srid, Arc::new(CoordinateArraySequenceFactory))
    };
    Ok(factory)
}

fn parse(input: &str, factory: &Arc<GeometryFactory>) -> Result<Geometry, String> {
    parse_wkt(input, factory).map_err(|e| format!("Failed to parse WKT: {e}"))
}

/// Parse an input string and print some details about the shape
pub fn parse_show_detail(input: &str, factory: &Arc<GeometryFactory>) -> Result<(), String> {
    let geom = parse(input, factory)?;
    println!("Parsed a Geometry of Type {}!", geom.geometry_type());
    println!("Dimension: {}", geom.dimension());
    println!("SRID: {}", geom.srid());
    println!("The geometry contains {} total points.", geom.num_points());
    if !geom.is_empty() {
        let env = geom.envelope_internal();
        println!(
            "Envelope: [{}, {}] x [{}, {}]",
            env.min_x(),
            env.max_x(),
            env.min_y(),
            env.max_y()
        );
    }
    println!("Area: {}", geom.area());
    println!("Length: {}", geom.length());
    match geom.validation_error() {
        None => println!("The geometry is valid"),
        Some(msg) => println!("The geometry is invalid: {msg}"),
    }
    if geom.is_simple() {
        println!("The geometry is simple");
    }
    println!("Normalized: {}", geom.norm());
    Ok(())
}

/// Print the DE-9IM matrix of two geometries, or whether it matches `pattern`
pub fn show_relate(
    a: &str,
    b: &str,
    pattern: Option<&str>,
    factory: &Arc<GeometryFactory>,
) -> Result<(), String> {
    let (ga, gb) = (parse(a, factory)?, parse(b, factory)?);
    let matrix = ga.relate(&gb).map_err(|e| e.to_string())?;
    match pattern {
        None => println!("{matrix}"),
        Some(p) => {
            let matched = matrix.matches(p).map_err(|e| e.to_string())?;
            println!("{matrix} matches {p}: {matched}");
        }
    }
    Ok(())
}

/// Evaluate a named predicate on two geometries
pub fn evaluate_predicate(
    name: PredicateName,
    a: &str,
    b: &str,
    factory: &Arc<GeometryFactory>,
) -> Result<bool, String> {
    let (ga, gb) = (parse(a, factory)?, parse(b, factory)?);
    let result = match name {
        PredicateName::Intersects => ga.intersects(&gb),
        PredicateName::Disjoint => ga.disjoint(&gb),
        PredicateName::Contains => ga.contains(&gb),
        PredicateName::Within => ga.within(&gb),
        PredicateName::Covers => ga.covers(&gb),
        PredicateName::CoveredBy => ga.covered_by(&gb),
        PredicateName::Touches => ga.touches(&gb),
        PredicateName::Crosses => ga.crosses(&gb),
        PredicateName::Overlaps => ga.overlaps(&gb),
        PredicateName::Equals => ga.equals_topo(&gb),
    };
    result.map_err(|e| e.to_string())
}

/// Compute a set operation and print or save the result
pub fn compute_overlay(
    op: OverlayName,
    a: &str,
    b: &str,
    output_path: Option<&str>,
    factory: &Arc<GeometryFactory>,
) -> Result<(), String> {
    let (ga, gb) = (parse(a, factory)?, parse(b, factory)?);
    let result = match OverlayOp::from(op) {
        OverlayOp::Intersection => ga.intersection(&gb),
        OverlayOp::Union => ga.union(&gb),
        OverlayOp::Difference => ga.difference(&gb),
        OverlayOp::SymDifference => ga.sym_difference(&gb),
    }
    .map_err(|e| format!("Overlay failed: {e}"))?;
    emit(&result, output_path)
}

/// Parse the given input string, compute its convex hull, and optionally save the result
pub fn compute_convex_hull(
    input: &str,
    output_path: Option<&str>,
    factory: &Arc<GeometryFactory>,
) -> Result<(), String> {
    let geom = parse(input, factory)?;
    let hull = geom
        .convex_hull()
        .map_err(|e| format!("Unable to compute convex hull: {e}"))?;
    println!("Computed convex hull of the given geometry!");
    emit(&hull, output_path)
}

fn emit(geom: &Geometry, output_path: Option<&str>) -> Result<(), String> {
    match output_path {
        None => {
            println!("{geom}");
            Ok(())
        }
        Some(fp) => {
            let mut file = File::create(fp).map_err(|e| format!("Failed to create file: {e}"))?;
            match file.write_all(geom.to_text().as_bytes()) {
                Err(_) => Err(String::from("Failed to write to file!")),
                Ok(_) => {
                    println!("Geometry saved to file: '{fp}'");
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_factory() {
        let factory = build_factory(4326, Some(100.0), true).unwrap();
        assert_eq!(factory.srid(), 4326);
        assert_eq!(factory.precision_model().scale(), 100.0);
        assert!(build_factory(0, Some(0.0), false).is_err());
    }

    #[test]
    fn test_evaluate_predicate() {
        let factory = build_factory(0, None, false).unwrap();
        let square = "POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0))";
        assert!(evaluate_predicate(PredicateName::Contains, square, "POINT (5 5)", &factory).unwrap());
        assert!(evaluate_predicate(PredicateName::Disjoint, square, "POINT (50 5)", &factory).unwrap());
        assert!(evaluate_predicate(PredicateName::Intersects, square, "NOT WKT", &factory).is_err());
    }

    #[test]
    fn test_commands_run() {
        let factory = build_factory(0, None, true).unwrap();
        let a = "POLYGON ((0 0, 0 2, 2 2, 2 0, 0 0))";
        let b = "POLYGON ((1 1, 1 3, 3 3, 3 1, 1 1))";
        assert!(parse_show_detail(a, &factory).is_ok());
        assert!(show_relate(a, b, Some("2********"), &factory).is_ok());
        assert!(compute_overlay(OverlayName::Union, a, b, None, &factory).is_ok());
        assert!(compute_convex_hull("MULTIPOINT (0 0, 1 1, 1 0)", None, &factory).is_ok());
        assert!(compute_overlay(
            OverlayName::Union,
            "GEOMETRYCOLLECTION (POINT (0 0))",
            b,
            None,
            &factory
        )
        .is_err());
    }
}
