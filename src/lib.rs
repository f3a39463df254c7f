pub mod cli_commands;
pub mod coordinate;
pub mod coordinate_arrays;
pub mod coordinate_list;
pub mod core;
pub mod dimension;
pub mod envelope;
pub mod factory;
pub mod geometry;
pub mod io;
pub mod matrix;
pub mod ops;
pub mod overlay;
pub mod precision;
pub mod relate;
pub mod sequence;
pub mod serialization;
pub mod valid;

pub use self::coordinate::{Coordinate, CoordinateLayout};
pub use self::coordinate_list::CoordinateList;
pub use self::dimension::Dimension;
pub use self::envelope::Envelope;
pub use self::factory::GeometryFactory;
pub use self::geometry::{Geometry, GeometryKind, GeometryType};
pub use self::matrix::{IntersectionMatrix, Location};
pub use self::overlay::OverlayOp;
pub use self::precision::PrecisionModel;
pub use self::sequence::{CoordinateSequence, CoordinateSequenceFactory};
pub use self::core::*;
