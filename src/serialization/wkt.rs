use super::ParserResult;
use crate::coordinate::{Coordinate, CoordinateLayout};
use crate::core::{GeomResult, GeometryError};
use crate::factory::GeometryFactory;
use crate::geometry::{Geometry, GeometryKind, GeometryType};
use regex::Regex;
use std::sync::{Arc, OnceLock};

const NUMBER: &str = r"^\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?|NaN|[-+]?inf)";
const GEOM_TYPE: &str = r"^\s*([A-Z]+)(?:\s+(ZM|Z|M)\b)?\s*";

static NUMBER_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static GEOM_TYPE_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

#[derive(Debug, PartialEq)]
enum WktType {
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

// Compile a pattern once (thread-safe) and keep the outcome
fn compiled(
    cell: &'static OnceLock<Result<Regex, regex::Error>>,
    pattern: &str,
) -> GeomResult<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|err| GeometryError::ParsingError(format!("Invalid pattern {pattern}: {err}")))
}

fn number_re() -> GeomResult<&'static Regex> {
    compiled(&NUMBER_RE, NUMBER)
}

fn geom_type_re() -> GeomResult<&'static Regex> {
    compiled(&GEOM_TYPE_RE, GEOM_TYPE)
}

/// Parse a WKT string into a geometry built by `factory`.
///
/// Keywords are upper case. Coordinates take 2, 3 or 4 ordinates; without a `Z`, `M` or `ZM`
/// tag a third ordinate is read as Z. Parsed coordinates are snapped to the factory's precision
/// model. Returns an error if parsing failed or characters follow the geometry.
///
/// Examples
/// ```rust
/// use geomlib::serialization;
/// use geomlib::GeometryFactory;
///
/// let factory = GeometryFactory::default_shared();
/// let pt = serialization::parse_wkt("POINT (0 0)", &factory).unwrap();
/// assert_eq!(pt.num_points(), 1);
///
/// match serialization::parse_wkt("POLYGON((0 0, 0 1, 1 1, 0 0))", &factory) {
///     Ok(poly) => println!("I got a polygon! {poly}"),
///     Err(err) => panic!("Failed: {err}"),
/// }
/// ```
pub fn parse_wkt(raw_str: &str, factory: &Arc<GeometryFactory>) -> GeomResult<Geometry> {
    let (geom, trailing) = parse_geometry(raw_str, factory)?;
    if !trailing.trim().is_empty() {
        Err(GeometryError::ParsingError(String::from(
            "Trailing characters after geometry!",
        )))
    } else {
        Ok(geom)
    }
}

fn parse_geometry<'a>(raw_str: &'a str, factory: &Arc<GeometryFactory>) -> ParserResult<'a, Geometry> {
    let ((geom_type, layout), rest) = identify_type(raw_str)?;
    let reader = WktReader { factory, layout };
    match geom_type {
        WktType::Point => reader.parse_point(rest),
        WktType::LineString => reader.parse_line_string(rest),
        WktType::LinearRing => reader.parse_linear_ring(rest),
        WktType::Polygon => reader.parse_polygon(rest),
        WktType::MultiPoint => reader.parse_multi_point(rest),
        WktType::MultiLineString => reader.parse_multi_line_string(rest),
        WktType::MultiPolygon => reader.parse_multi_polygon(rest),
        WktType::GeometryCollection => reader.parse_geometry_collection(rest),
    }
}

/// Identifies the type of geometry and its ordinate tag at the start of a WKT string
fn identify_type<'a>(raw_str: &'a str) -> ParserResult<'a, (WktType, Option<CoordinateLayout>)> {
    let re = geom_type_re()?;
    let Some(cap) = re.captures(raw_str) else {
        return Err(GeometryError::ParsingError(String::from(
            "Could not parse shape type",
        )));
    };
    let name = cap.get(1).map_or("", |m| m.as_str());
    let geom_type = match name {
        "POINT" => WktType::Point,
        "LINESTRING" => WktType::LineString,
        "LINEARRING" => WktType::LinearRing,
        "POLYGON" => WktType::Polygon,
        "MULTIPOINT" => WktType::MultiPoint,
        "MULTILINESTRING" => WktType::MultiLineString,
        "MULTIPOLYGON" => WktType::MultiPolygon,
        "GEOMETRYCOLLECTION" => WktType::GeometryCollection,
        _ => {
            return Err(GeometryError::ParsingError(format!(
                "Unsupported Geometry: {name}"
            )));
        }
    };
    let layout = match cap.get(2).map(|m| m.as_str()) {
        Some("Z") => Some(CoordinateLayout::XYZ),
        Some("M") => Some(CoordinateLayout::XYM),
        Some("ZM") => Some(CoordinateLayout::XYZM),
        _ => None,
    };
    Ok(((geom_type, layout), &raw_str[cap.get_match().end()..]))
}

fn expect<'a>(raw_str: &'a str, token: &str, context: &str) -> GeomResult<&'a str> {
    raw_str
        .trim_start()
        .strip_prefix(token)
        .ok_or_else(|| GeometryError::ParsingError(format!("Expected '{token}' {context}")))
}

fn strip_empty(raw_str: &str) -> Option<&str> {
    raw_str.trim_start().strip_prefix("EMPTY")
}

/// Parse a parenthesized, comma separated list of items
fn parse_list<'a, T, F>(raw_str: &'a str, mut item: F) -> ParserResult<'a, Vec<T>>
where
    F: FnMut(&'a str) -> ParserResult<'a, T>,
{
    let mut rest = expect(raw_str, "(", "to start a list")?;
    let mut items = Vec::new();
    loop {
        let (value, tail) = item(rest)?;
        items.push(value);
        match tail.trim_start().strip_prefix(",") {
            Some(s) => rest = s,
            None => {
                rest = tail;
                break;
            }
        }
    }
    let rest = expect(rest, ")", "to close a list")?;
    Ok((items, rest))
}

// Reads the body of one geometry tagged with an optional ordinate layout
struct WktReader<'f> {
    factory: &'f Arc<GeometryFactory>,
    layout: Option<CoordinateLayout>,
}

impl WktReader<'_> {
    /// Parse one coordinate from the start of a string
    fn parse_coordinate<'a>(&self, raw_str: &'a str) -> ParserResult<'a, Coordinate> {
        let re = number_re()?;
        let mut values: Vec<f64> = Vec::with_capacity(4);
        let mut rest = raw_str;
        while values.len() < 4 {
            let Some(cap) = re.captures(rest) else {
                break;
            };
            let text = cap.get(1).map_or("", |m| m.as_str());
            let value = text.parse::<f64>().map_err(|err| {
                GeometryError::ParsingError(format!("Invalid number {text}: {err}"))
            })?;
            values.push(value);
            rest = &rest[cap.get_match().end()..];
        }

        let mut coord = match (values.as_slice(), self.layout) {
            ([x, y], None) => Coordinate::new(*x, *y),
            ([x, y, z], None | Some(CoordinateLayout::XYZ)) => Coordinate::new_xyz(*x, *y, *z),
            ([x, y, m], Some(CoordinateLayout::XYM)) => Coordinate::new_xym(*x, *y, *m),
            ([x, y, z, m], None | Some(CoordinateLayout::XYZM)) => {
                Coordinate::new_xyzm(*x, *y, *z, *m)
            }
            ([], _) => {
                return Err(GeometryError::ParsingError(String::from(
                    "Could not parse coordinates",
                )));
            }
            (found, layout) => {
                let expected = layout.map_or(2, |l| l.dimension());
                return Err(GeometryError::ParsingError(format!(
                    "Expected {expected} ordinates, found {}",
                    found.len()
                )));
            }
        };
        self.factory.precision_model().make_precise_coordinate(&mut coord);
        Ok((coord, rest))
    }

    /// Parse a list of coordinates, or `EMPTY`
    fn parse_coordinate_list<'a>(&self, raw_str: &'a str) -> ParserResult<'a, Vec<Coordinate>> {
        if let Some(rest) = strip_empty(raw_str) {
            return Ok((Vec::new(), rest));
        }
        parse_list(raw_str, |s| self.parse_coordinate(s))
    }

    fn parse_point<'a>(&self, raw_str: &'a str) -> ParserResult<'a, Geometry> {
        if let Some(rest) = strip_empty(raw_str) {
            return Ok((self.factory.create_point_empty(), rest));
        }
        let trimmed = expect(raw_str, "(", "to introduce coordinates")?;
        let (coord, rest) = self.parse_coordinate(trimmed)?;
        let rest = expect(rest, ")", "to close coordinates")?;
        Ok((self.factory.create_point(&coord), rest))
    }

    fn parse_line_string<'a>(&self, raw_str: &'a str) -> ParserResult<'a, Geometry> {
        let (coords, rest) = self.parse_coordinate_list(raw_str)?;
        Ok((self.factory.create_line_string(&coords)?, rest))
    }

    fn parse_linear_ring<'a>(&self, raw_str: &'a str) -> ParserResult<'a, Geometry> {
        let (coords, rest) = self.parse_coordinate_list(raw_str)?;
        Ok((self.factory.create_linear_ring(&coords)?, rest))
    }

    // Parse a polygon from the given wkt string with type prefix removed
    fn parse_polygon<'a>(&self, raw_str: &'a str) -> ParserResult<'a, Geometry> {
        if let Some(rest) = strip_empty(raw_str) {
            return Ok((self.factory.create_polygon_empty(), rest));
        }
        let (rings, rest) = parse_list(raw_str, |s| self.parse_linear_ring(s))?;
        let mut rings = rings.into_iter();
        let shell = rings.next().ok_or_else(|| {
            GeometryError::ParsingError(String::from("Expected a shell for polygon"))
        })?;
        Ok((self.factory.create_polygon(shell, rings.collect())?, rest))
    }

    /// Parse a list of points. Both `((0 0), (1 1))` and `(0 0, 1 1)` are accepted.
    fn parse_multi_point<'a>(&self, raw_str: &'a str) -> ParserResult<'a, Geometry> {
        if let Some(rest) = strip_empty(raw_str) {
            return Ok((self.factory.create_multi_point(Vec::new())?, rest));
        }
        let (points, rest) = parse_list(raw_str, |s| {
            if s.trim_start().starts_with('(') || strip_empty(s).is_some() {
                self.parse_point(s)
            } else {
                let (coord, tail) = self.parse_coordinate(s)?;
                Ok((self.factory.create_point(&coord), tail))
            }
        })?;
        Ok((self.factory.create_multi_point(points)?, rest))
    }

    fn parse_multi_line_string<'a>(&self, raw_str: &'a str) -> ParserResult<'a, Geometry> {
        if let Some(rest) = strip_empty(raw_str) {
            return Ok((self.factory.create_multi_line_string(Vec::new())?, rest));
        }
        let (lines, rest) = parse_list(raw_str, |s| self.parse_line_string(s))?;
        Ok((self.factory.create_multi_line_string(lines)?, rest))
    }

    fn parse_multi_polygon<'a>(&self, raw_str: &'a str) -> ParserResult<'a, Geometry> {
        if let Some(rest) = strip_empty(raw_str) {
            return Ok((self.factory.create_multi_polygon(Vec::new())?, rest));
        }
        let (polygons, rest) = parse_list(raw_str, |s| self.parse_polygon(s))?;
        Ok((self.factory.create_multi_polygon(polygons)?, rest))
    }

    fn parse_geometry_collection<'a>(&self, raw_str: &'a str) -> ParserResult<'a, Geometry> {
        if let Some(rest) = strip_empty(raw_str) {
            return Ok((self.factory.create_geometry_collection(Vec::new()), rest));
        }
        let (geoms, rest) = parse_list(raw_str, |s| parse_geometry(s, self.factory))?;
        Ok((self.factory.create_geometry_collection(geoms), rest))
    }
}

/// Write a geometry as WKT.
///
/// A `Z` tag is written when some coordinate has a Z value and an `M` tag when some coordinate
/// carries a measure.
pub fn write_wkt(geom: &Geometry) -> String {
    let mut out = String::new();
    write_geometry(geom, &mut out);
    out
}

fn write_geometry(geom: &Geometry, out: &mut String) {
    let coords = geom.coordinates();
    let has_z = coords.iter().any(|c| !c.z().is_nan());
    let has_m = coords.iter().any(|c| c.layout().has_m());

    out.push_str(type_keyword(geom.geometry_type()));
    match (has_z, has_m) {
        (true, true) => out.push_str(" ZM"),
        (true, false) => out.push_str(" Z"),
        (false, true) => out.push_str(" M"),
        (false, false) => {}
    }
    if geom.is_empty() {
        out.push_str(" EMPTY");
        return;
    }
    out.push(' ');
    let ords = Ordinates { has_z, has_m };
    match geom.kind() {
        GeometryKind::GeometryCollection(elems) => {
            out.push('(');
            for (i, g) in elems.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_geometry(g, out);
            }
            out.push(')');
        }
        _ => write_body(geom, &ords, out),
    }
}

struct Ordinates {
    has_z: bool,
    has_m: bool,
}

fn type_keyword(geom_type: GeometryType) -> &'static str {
    match geom_type {
        GeometryType::Point => "POINT",
        GeometryType::LineString => "LINESTRING",
        GeometryType::LinearRing => "LINEARRING",
        GeometryType::Polygon => "POLYGON",
        GeometryType::MultiPoint => "MULTIPOINT",
        GeometryType::MultiLineString => "MULTILINESTRING",
        GeometryType::MultiPolygon => "MULTIPOLYGON",
        GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
    }
}

// Text after the type keyword: EMPTY or the parenthesized coordinates
fn write_body(geom: &Geometry, ords: &Ordinates, out: &mut String) {
    if geom.is_empty() {
        out.push_str("EMPTY");
        return;
    }
    match geom.kind() {
        GeometryKind::Point(_) | GeometryKind::LineString(_) | GeometryKind::LinearRing(_) => {
            write_coordinates(&geom.coordinates(), ords, out);
        }
        GeometryKind::Polygon { shell, holes } => {
            let rings = std::iter::once(shell.as_ref()).chain(holes.iter());
            write_elements(rings, ords, out);
        }
        _ => write_elements(geom.geometries().iter(), ords, out),
    }
}

fn write_elements<'g>(elems: impl Iterator<Item = &'g Geometry>, ords: &Ordinates, out: &mut String) {
    out.push('(');
    for (i, g) in elems.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_body(g, ords, out);
    }
    out.push(')');
}

fn write_coordinates(coords: &[Coordinate], ords: &Ordinates, out: &mut String) {
    out.push('(');
    for (i, c) in coords.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format!("{} {}", c.x, c.y));
        if ords.has_z {
            out.push_str(&format!(" {}", c.z()));
        }
        if ords.has_m {
            out.push_str(&format!(" {}", c.m()));
        }
    }
    out.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::convex_hull;
    use crate::precision::PrecisionModel;
    use rand::{Rng, rng};

    fn factory() -> Arc<GeometryFactory> {
        GeometryFactory::default_shared()
    }

    fn reader(factory: &Arc<GeometryFactory>) -> WktReader<'_> {
        WktReader {
            factory,
            layout: None,
        }
    }

    // Get a vector of random coordinates between 0 and 1
    fn get_random_coordinates(total: usize) -> Vec<Coordinate> {
        let mut random = rng();
        let mut coords = Vec::with_capacity(total);

        for _ in 0..total {
            coords.push(Coordinate::new(random.random(), random.random()));
        }
        coords
    }

    #[test]
    fn test_identify_type_valid() {
        match identify_type("POINT (0 0)") {
            Ok(((WktType::Point, None), rest)) => assert_eq!(rest, "(0 0)"),
            other => panic!("Unexpected result: {other:?}"),
        }

        match identify_type("POLYGON ((0 0, 0 1, 1 1, 1 0, 0 0))") {
            Ok(((WktType::Polygon, None), _)) => (),
            other => panic!("Unexpected result: {other:?}"),
        }

        match identify_type("LINESTRING ZM (0 0 1 2, 1 1 1 2)") {
            Ok(((WktType::LineString, Some(CoordinateLayout::XYZM)), _)) => (),
            other => panic!("Unexpected result: {other:?}"),
        }

        match identify_type("POINT EMPTY") {
            Ok(((WktType::Point, None), rest)) => assert_eq!(rest, "EMPTY"),
            other => panic!("Unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_identify_type_invalid() {
        assert!(identify_type("PoinT(0 1)").is_err(), "capitalization");
        assert!(identify_type("PO INT(0 1)").is_err(), "spacing");
        assert!(identify_type("POlYGon ((0 0, 0 1, 1 1, 1 0, 0 0))").is_err());
        assert!(identify_type("! POLYGON ((0 0, 0 1, 1 1, 1 0, 0 0))").is_err());
        assert!(identify_type("NOTASHAPE ((0 0, 0 1, 1 1, 1 0, 0 0))").is_err());
    }

    #[test]
    fn test_parse_point_valid() {
        let factory = factory();
        let mut random = rng();
        for _ in 0..250 {
            let x = (random.random::<f64>() - 0.5) * 2.0;
            let y = (random.random::<f64>() - 0.5) * 2.0;
            let pt1 = factory.create_point(&Coordinate::new(x, y));
            let pt2 = parse_wkt(&write_wkt(&pt1), &factory).unwrap();
            assert_eq!(pt2.geometry_type(), GeometryType::Point);
            assert!(pt2.coordinate().unwrap().is_close(&pt1.coordinate().unwrap()));
        }
    }

    #[test]
    fn test_parse_point_invalid() {
        let factory = factory();
        for wkt in [
            "POINT(0 1, 2 3)",
            "POINT (0)",
            "POINT(-0.9 1.75 9.0))",
            "POINT(0 1))",
            "POINT((0 1))",
            "-POINT(0 1)",
            "POINT Z (0 1)",
            "POINT M (0 1 2 3)",
        ] {
            if parse_wkt(wkt, &factory).is_ok() {
                panic!("Parsed invalid point {wkt}");
            }
        }
    }

    #[test]
    fn test_parse_coord_list_valid() {
        let factory = factory();
        let reader = reader(&factory);
        let (coords, rest) = reader.parse_coordinate_list("(0 1, 0.9 -2.5, 9 0.001)").unwrap();
        assert_eq!(coords.len(), 3);
        assert!(rest.is_empty());

        let (coords, rest) = reader
            .parse_coordinate_list("(0 1, 0.9 -2.5, 9 0.001))END")
            .unwrap();
        assert_eq!(coords.len(), 3);
        assert_eq!(rest, ")END");
        assert_eq!(coords[1].y, -2.5);

        let (coords, _) = reader.parse_coordinate_list("(1e3 -2.5E-1, .5 +4)").unwrap();
        assert_eq!((coords[0].x, coords[0].y), (1000.0, -0.25));
        assert_eq!((coords[1].x, coords[1].y), (0.5, 4.0));

        let (coords, rest) = reader.parse_coordinate_list(" EMPTY, x").unwrap();
        assert!(coords.is_empty());
        assert_eq!(rest, ", x");
    }

    #[test]
    fn test_parse_coord_list_random() {
        let factory = factory();
        let coords = get_random_coordinates(300);
        let mut formatted = String::from("(");
        for c in &coords {
            formatted.push_str(&format!("{} {},", c.x, c.y));
        }
        let mut formatted = formatted.trim_end_matches(',').to_string();
        formatted.push(')');

        let (coords2, _) = reader(&factory).parse_coordinate_list(&formatted).unwrap();
        assert_eq!(coords.len(), coords2.len());
        for (a, b) in coords.iter().zip(coords2) {
            assert!(a.is_close(&b))
        }
    }

    #[test]
    fn test_parse_coord_list_invalid() {
        let factory = factory();
        let reader = reader(&factory);
        assert!(reader.parse_coordinate_list("(0, 0.0 1.98)").is_err());
        assert!(reader.parse_coordinate_list("(0 -1.0, 0.0 1.98, Q P)").is_err());
        assert!(reader.parse_coordinate_list("(0 -1.0, 0.0 1.98").is_err());
        assert!(reader.parse_coordinate_list("0 -1.0, 0.0 1.98)").is_err());
    }

    #[test]
    fn test_parse_ordinate_tags() {
        let factory = factory();
        let line = parse_wkt("LINESTRING Z (0 0 5, 1 1 6)", &factory).unwrap();
        let c = line.coordinates();
        assert_eq!((c[0].z(), c[1].z()), (5.0, 6.0));

        let pt = parse_wkt("POINT M (1 2 3)", &factory).unwrap();
        let c = pt.coordinate().unwrap();
        assert!(c.z().is_nan());
        assert_eq!(c.m(), 3.0);

        let pt = parse_wkt("POINT (1 2 3 4)", &factory).unwrap();
        let c = pt.coordinate().unwrap();
        assert_eq!((c.z(), c.m()), (3.0, 4.0));
    }

    #[test]
    fn test_parse_polygon_valid() {
        let factory = factory();
        let poly = parse_wkt("POLYGON((0 0, 0 1, 1 1, 1 0, 0 0))", &factory).unwrap();
        let shell = poly.exterior_ring().unwrap().coordinates();
        assert_eq!(shell.len(), 5);
        assert!(shell[0].is_close(&Coordinate::new(0.0, 0.0)));
        assert!(shell[1].is_close(&Coordinate::new(0.0, 1.0)));
        assert!(shell[2].is_close(&Coordinate::new(1.0, 1.0)));
        assert!(shell[3].is_close(&Coordinate::new(1.0, 0.0)));
        assert!(shell[4].is_close(&Coordinate::new(0.0, 0.0)));

        let poly = parse_wkt(
            "POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0), (1 1, 2 1, 2 2, 1 1))",
            &factory,
        )
        .unwrap();
        assert_eq!(poly.num_interior_rings(), 1);
    }

    #[test]
    fn test_parse_polygon_random() {
        let factory = factory();
        let hull = convex_hull(&factory, &get_random_coordinates(750)).unwrap();
        let poly = parse_wkt(&hull.to_text(), &factory).unwrap();
        let shell = poly.exterior_ring().unwrap().coordinates();
        for c in &shell {
            assert!(0.0 <= c.x && c.x <= 1.0);
            assert!(0.0 <= c.y && c.y <= 1.0);
        }
        assert!(shell[0].is_close(&shell[shell.len() - 1]));
        assert!(poly.equals_exact(&hull));
    }

    #[test]
    fn test_parse_polygon_invalid() {
        let factory = factory();
        for wkt in [
            "POLYGON(0 0, 1 0, 1 1, 0 0)",
            "POLYGON((0 0, 1 0, 1 1, 0 1))",
            "POLYGON((0 0, 1 0, 0 0))",
            "POLYGON(0 0, 1 0, 1 1, 0 0))",
            "POLYGON ((0 0, 1 0, 1 1, 0 0)",
        ] {
            if parse_wkt(wkt, &factory).is_ok() {
                panic!("Parsed invalid polygon {wkt}");
            }
        }
    }

    #[test]
    fn test_parse_multipoint() {
        let factory = factory();
        for wkt in [
            "MULTIPOINT(0 0, 1 0, 0.5 0.5, 0 1)",
            "MULTIPOINT ((0 0), (1 0), (0.5 0.5), (0 1))",
        ] {
            let mp = parse_wkt(wkt, &factory).unwrap();
            assert_eq!(mp.num_geometries(), 4);
            assert!(mp.geometry_n(2).unwrap().coordinate().unwrap().is_close(&Coordinate::new(0.5, 0.5)));
        }
        let mp = parse_wkt("MULTIPOINT (EMPTY, (1 1))", &factory).unwrap();
        assert_eq!(mp.num_geometries(), 2);
        assert_eq!(mp.num_points(), 1);

        assert!(parse_wkt("MULTIPOINT((0 0, 1 0, 0.5 0.5, 0 1))", &factory).is_err());
        assert!(parse_wkt("MULTIPOINT(0 0, 1 0, 0.5 0.5, 0 1))", &factory).is_err());
    }

    #[test]
    fn test_parse_collections() {
        let factory = factory();
        let mls = parse_wkt("MULTILINESTRING ((0 0, 1 1), EMPTY, (2 2, 3 3))", &factory).unwrap();
        assert_eq!(mls.num_geometries(), 3);
        let mp = parse_wkt(
            "MULTIPOLYGON (((0 0, 0 1, 1 1, 0 0)), ((5 5, 5 6, 6 6, 5 5), (5.1 5.2, 5.2 5.5, 5.1 5.5, 5.1 5.2)))",
            &factory,
        )
        .unwrap();
        assert_eq!(mp.num_geometries(), 2);
        assert_eq!(mp.geometry_n(1).unwrap().num_interior_rings(), 1);
        let gc = parse_wkt(
            "GEOMETRYCOLLECTION (POINT (1 1), GEOMETRYCOLLECTION (LINESTRING Z (0 0 1, 1 1 1)), POLYGON EMPTY)",
            &factory,
        )
        .unwrap();
        assert_eq!(gc.num_geometries(), 3);
        assert_eq!(gc.geometry_n(1).unwrap().geometry_type(), GeometryType::GeometryCollection);
        assert!(parse_wkt("GEOMETRYCOLLECTION (POINT (1 1)", &factory).is_err());
    }

    #[test]
    fn test_parse_applies_precision() {
        let fixed = GeometryFactory::with_precision_model(PrecisionModel::fixed(10.0).unwrap());
        let pt = parse_wkt("POINT (1.26 -3.04)", &fixed).unwrap();
        let c = pt.coordinate().unwrap();
        assert!(c.is_close(&Coordinate::new(1.3, -3.0)));
    }

    #[test]
    fn test_write_wkt() {
        let factory = factory();
        for wkt in [
            "POINT (1 2)",
            "POINT EMPTY",
            "LINESTRING (0 0, 1.5 1)",
            "LINEARRING (0 0, 0 1, 1 1, 0 0)",
            "POLYGON ((0 0, 0 10, 10 10, 10 0, 0 0), (1 1, 2 1, 2 2, 1 1))",
            "POLYGON EMPTY",
            "MULTIPOINT ((0 0), (2 0))",
            "MULTIPOINT (EMPTY, (2 0))",
            "MULTILINESTRING ((1 1, 0 0), (3 3, 2 2))",
            "MULTIPOLYGON (((0 0, 0 1, 1 1, 0 0)), EMPTY)",
            "GEOMETRYCOLLECTION (POINT (1 1), LINESTRING EMPTY)",
            "GEOMETRYCOLLECTION EMPTY",
            "LINESTRING Z (0 0 5, 1 1 6)",
            "POINT M (1 2 3)",
            "POINT ZM (1 2 3 4)",
        ] {
            assert_eq!(write_wkt(&parse_wkt(wkt, &factory).unwrap()), wkt);
        }
    }
}
