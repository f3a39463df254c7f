use super::Geometry;
use crate::core::{GeomResult, GeometryError};
use crate::overlay::{self, GeoOverlay, OverlayEngine, OverlayOp};

impl Geometry {
    /// Points shared by both geometries
    ///
    /// Examples
    /// ```rust
    /// use geomlib::{serialization, GeometryFactory};
    ///
    /// let factory = GeometryFactory::default_shared();
    /// let a = serialization::parse_wkt("POLYGON ((0 0, 0 2, 2 2, 2 0, 0 0))", &factory).unwrap();
    /// let b = serialization::parse_wkt("POLYGON ((1 1, 1 3, 3 3, 3 1, 1 1))", &factory).unwrap();
    /// assert_eq!(a.intersection(&b).unwrap().area(), 1.0);
    /// ```
    pub fn intersection(&self, other: &Geometry) -> GeomResult<Geometry> {
        self.overlay_with(other, OverlayOp::Intersection, &GeoOverlay)
    }

    pub fn union(&self, other: &Geometry) -> GeomResult<Geometry> {
        self.overlay_with(other, OverlayOp::Union, &GeoOverlay)
    }

    /// Points of this geometry not in `other`
    pub fn difference(&self, other: &Geometry) -> GeomResult<Geometry> {
        self.overlay_with(other, OverlayOp::Difference, &GeoOverlay)
    }

    /// Points in exactly one of the two geometries
    pub fn sym_difference(&self, other: &Geometry) -> GeomResult<Geometry> {
        self.overlay_with(other, OverlayOp::SymDifference, &GeoOverlay)
    }

    /// Union of the components of this geometry with each other
    pub fn union_self(&self) -> GeomResult<Geometry> {
        overlay::unary_union(self)
    }

    /// Set operation computed by `engine`.
    ///
    /// Empty inputs are answered first, whatever their type. Otherwise an intersection with a
    /// generic collection is computed element by element and every other operation rejects
    /// collections.
    pub fn overlay_with(
        &self,
        other: &Geometry,
        op: OverlayOp,
        engine: &dyn OverlayEngine,
    ) -> GeomResult<Geometry> {
        let empty = || overlay::create_empty_result(op, self, other, &self.factory);
        match (self.is_empty(), other.is_empty(), op) {
            (true, _, OverlayOp::Intersection) | (_, true, OverlayOp::Intersection) => {
                return Ok(empty());
            }
            (true, true, _) => return Ok(empty()),
            (true, false, OverlayOp::Difference) => return Ok(empty()),
            (false, true, _) => return Ok(self.copy()),
            (true, false, _) => return Ok(other.copy()),
            (false, false, _) => {}
        }

        if op == OverlayOp::Intersection
            && (self.is_geometry_collection() || other.is_geometry_collection())
        {
            return self.collection_intersection(other, engine);
        }
        if self.is_geometry_collection() || other.is_geometry_collection() {
            return Err(GeometryError::collection_not_supported());
        }

        log::trace!("{op} of {} and {}", self.geometry_type(), other.geometry_type());
        engine.overlay(self, other, op)
    }

    fn collection_intersection(&self, other: &Geometry, engine: &dyn OverlayEngine) -> GeomResult<Geometry> {
        let mut parts = Vec::new();
        if self.is_geometry_collection() {
            for g in self.geometries() {
                let part = g.overlay_with(other, OverlayOp::Intersection, engine)?;
                if !part.is_empty() {
                    parts.push(part);
                }
            }
        } else {
            for g in other.geometries() {
                let part = self.overlay_with(g, OverlayOp::Intersection, engine)?;
                if !part.is_empty() {
                    parts.push(part);
                }
            }
        }
        Ok(self.factory.build_geometry(parts))
    }
}
