use super::core::GeomResult;
pub mod wkt;

pub use wkt::{parse_wkt, write_wkt};

type ParserResult<'a, T> = GeomResult<(T, &'a str)>;
