//! Geometry value objects.
//!
//! [`Geometry`] is the closed set of the seven OGC simple-feature types MySQL stores. Each
//! variant wraps its own type, which can also be used on its own wherever the concrete
//! shape is known (a model field declared as `Point`, for instance).

pub(crate) mod collection;
mod geometry_collection;
mod line_string;
mod multi_line_string;
mod multi_point;
mod multi_polygon;
mod point;
mod polygon;

pub use collection::{CollectionItem, PointCollection};
pub use geometry_collection::GeometryCollection;
pub use line_string::LineString;
pub use multi_line_string::MultiLineString;
pub use multi_point::MultiPoint;
pub use multi_polygon::MultiPolygon;
pub use point::Point;
pub use polygon::Polygon;

use crate::result::{Error, Result};
use crate::wkt;
use std::fmt;
use std::str::FromStr;

/// The variant of a [`Geometry`], along with its names in each wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 7] = [
        GeometryKind::Point,
        GeometryKind::LineString,
        GeometryKind::Polygon,
        GeometryKind::MultiPoint,
        GeometryKind::MultiLineString,
        GeometryKind::MultiPolygon,
        GeometryKind::GeometryCollection,
    ];

    /// The type name, which is also the GeoJSON `type` member.
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        }
    }

    pub fn wkt_keyword(&self) -> &'static str {
        match self {
            GeometryKind::Point => "POINT",
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::Polygon => "POLYGON",
            GeometryKind::MultiPoint => "MULTIPOINT",
            GeometryKind::MultiLineString => "MULTILINESTRING",
            GeometryKind::MultiPolygon => "MULTIPOLYGON",
            GeometryKind::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }

    pub fn wkb_code(&self) -> u32 {
        match self {
            GeometryKind::Point => 1,
            GeometryKind::LineString => 2,
            GeometryKind::Polygon => 3,
            GeometryKind::MultiPoint => 4,
            GeometryKind::MultiLineString => 5,
            GeometryKind::MultiPolygon => 6,
            GeometryKind::GeometryCollection => 7,
        }
    }

    /// Look up an upper-cased WKT keyword. MySQL's `GEOMCOLLECTION` spelling is accepted.
    pub fn from_wkt_keyword(keyword: &str) -> Option<GeometryKind> {
        if keyword == "GEOMCOLLECTION" {
            return Some(GeometryKind::GeometryCollection);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.wkt_keyword() == keyword)
    }

    pub fn from_wkb_code(code: u32) -> Option<GeometryKind> {
        Self::ALL.iter().copied().find(|kind| kind.wkb_code() == code)
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any of the supported geometries.
#[derive(Debug, Clone)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

// Expands `$body` once per variant with `$g` bound to the wrapped value.
macro_rules! each_variant {
    ($value:expr, $g:ident => $body:expr) => {
        match $value {
            Geometry::Point($g) => $body,
            Geometry::LineString($g) => $body,
            Geometry::Polygon($g) => $body,
            Geometry::MultiPoint($g) => $body,
            Geometry::MultiLineString($g) => $body,
            Geometry::MultiPolygon($g) => $body,
            Geometry::GeometryCollection($g) => $body,
        }
    };
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    pub fn srid(&self) -> u32 {
        each_variant!(self, g => g.srid())
    }

    pub fn set_srid(&mut self, srid: u32) {
        each_variant!(self, g => g.set_srid(srid))
    }

    pub fn to_wkt(&self) -> String {
        each_variant!(self, g => g.to_wkt())
    }

    /// Parse any WKT geometry, dispatching on its leading keyword.
    pub fn from_wkt(text: &str, srid: u32) -> Result<Geometry> {
        let (keyword, _) = wkt::split_keyword(text)?;
        let kind = GeometryKind::from_wkt_keyword(&keyword)
            .ok_or_else(|| Error::ParseError(format!("unknown WKT geometry type {}", keyword)))?;
        Ok(match kind {
            GeometryKind::Point => Point::from_wkt(text, srid)?.into(),
            GeometryKind::LineString => LineString::from_wkt(text, srid)?.into(),
            GeometryKind::Polygon => Polygon::from_wkt(text, srid)?.into(),
            GeometryKind::MultiPoint => MultiPoint::from_wkt(text, srid)?.into(),
            GeometryKind::MultiLineString => MultiLineString::from_wkt(text, srid)?.into(),
            GeometryKind::MultiPolygon => MultiPolygon::from_wkt(text, srid)?.into(),
            GeometryKind::GeometryCollection => GeometryCollection::from_wkt(text, srid)?.into(),
        })
    }

    /// Structural equality that ignores the SRID.
    pub fn eq_ignoring_srid(&self, other: &Geometry) -> bool {
        match (self, other) {
            (Geometry::Point(a), Geometry::Point(b)) => a.same_shape(b),
            (Geometry::LineString(a), Geometry::LineString(b)) => a.same_items(b),
            (Geometry::Polygon(a), Geometry::Polygon(b)) => a.same_items(b),
            (Geometry::MultiPoint(a), Geometry::MultiPoint(b)) => a.same_items(b),
            (Geometry::MultiLineString(a), Geometry::MultiLineString(b)) => a.same_items(b),
            (Geometry::MultiPolygon(a), Geometry::MultiPolygon(b)) => a.same_items(b),
            (Geometry::GeometryCollection(a), Geometry::GeometryCollection(b)) => a.same_items(b),
            _ => false,
        }
    }
}

impl PartialEq for Geometry {
    fn eq(&self, other: &Self) -> bool {
        self.srid() == other.srid() && self.eq_ignoring_srid(other)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wkt())
    }
}

impl FromStr for Geometry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Geometry::from_wkt(s, 0)
    }
}

impl CollectionItem for Geometry {
    const TYPE_NAME: &'static str = "Geometry";

    fn from_geometry(geometry: Geometry) -> std::result::Result<Self, Geometry> {
        Ok(geometry)
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.eq_ignoring_srid(other)
    }
}

macro_rules! impl_variant_conversions {
    ($($t:ident),*) => {
        $(
            impl From<$t> for Geometry {
                fn from(g: $t) -> Self {
                    Geometry::$t(g)
                }
            }

            impl From<&$t> for Geometry {
                fn from(g: &$t) -> Self {
                    Geometry::$t(g.clone())
                }
            }

            impl TryFrom<Geometry> for $t {
                type Error = Error;

                fn try_from(geometry: Geometry) -> Result<Self> {
                    match geometry {
                        Geometry::$t(g) => Ok(g),
                        other => Err(Error::UnexpectedGeometry {
                            expected: stringify!($t),
                            found: other.kind().name(),
                        }),
                    }
                }
            }

            impl FromStr for $t {
                type Err = Error;

                fn from_str(s: &str) -> Result<Self> {
                    $t::from_wkt(s, 0)
                }
            }
        )*
    };
}

impl_variant_conversions!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_lookups() {
        for kind in GeometryKind::ALL {
            assert_eq!(GeometryKind::from_wkt_keyword(kind.wkt_keyword()), Some(kind));
            assert_eq!(GeometryKind::from_wkb_code(kind.wkb_code()), Some(kind));
        }
        assert_eq!(
            GeometryKind::from_wkt_keyword("GEOMCOLLECTION"),
            Some(GeometryKind::GeometryCollection)
        );
        assert_eq!(GeometryKind::from_wkb_code(0), None);
        assert_eq!(GeometryKind::from_wkb_code(8), None);
    }

    #[test]
    fn from_wkt_dispatches_on_keyword() {
        let cases = [
            ("POINT(1 2)", GeometryKind::Point),
            ("LINESTRING(0 0,1 1)", GeometryKind::LineString),
            ("POLYGON((0 0,1 0,1 1,0 0))", GeometryKind::Polygon),
            ("MULTIPOINT((0 0),(1 1))", GeometryKind::MultiPoint),
            ("MULTILINESTRING((0 0,1 1))", GeometryKind::MultiLineString),
            ("MULTIPOLYGON(((0 0,1 0,1 1,0 0)))", GeometryKind::MultiPolygon),
            ("GEOMETRYCOLLECTION(POINT(1 2))", GeometryKind::GeometryCollection),
        ];
        for (text, kind) in cases {
            let geometry = Geometry::from_wkt(text, 4326).unwrap();
            assert_eq!(geometry.kind(), kind);
            assert_eq!(geometry.srid(), 4326);
            assert_eq!(geometry.to_wkt(), text);
        }
    }

    #[test]
    fn from_wkt_rejects_unknown_keywords() {
        assert!(matches!(
            Geometry::from_wkt("CIRCLE(1 2)", 0).unwrap_err(),
            Error::ParseError(_)
        ));
        assert!("".parse::<Geometry>().is_err());
    }

    #[test]
    fn equality_compares_top_level_srid_only() {
        let a = Geometry::from_wkt("GEOMETRYCOLLECTION(POINT(1 2))", 4326).unwrap();
        let mut b = GeometryCollection::new(vec![Point::with_srid(2.0, 1.0, 3857).into()])
            .unwrap();
        assert_ne!(a, Geometry::from(&b));
        b.set_srid(4326);
        assert_eq!(a, Geometry::from(b));

        let p = Geometry::from(Point::with_srid(2.0, 1.0, 3857));
        assert!(p.eq_ignoring_srid(&Geometry::from(Point::new(2.0, 1.0))));
        assert_ne!(p, Geometry::from(Point::new(2.0, 1.0)));
    }

    #[test]
    fn set_srid_applies_to_wrapped_value() {
        let mut g: Geometry = "LINESTRING(0 0,1 1)".parse().unwrap();
        g.set_srid(27700);
        assert_eq!(g.srid(), 27700);
        assert_eq!(LineString::try_from(g).unwrap().srid(), 27700);
    }

    #[test]
    fn try_from_reports_variant_mismatch() {
        let g = Geometry::from(Point::new(1.0, 1.0));
        assert!(matches!(
            Polygon::try_from(g).unwrap_err(),
            Error::UnexpectedGeometry {
                expected: "Polygon",
                found: "Point"
            }
        ));
    }

    #[test]
    fn display_is_wkt() {
        let g: Geometry = "multipoint(1 2,3 4)".parse().unwrap();
        assert_eq!(g.to_string(), "MULTIPOINT((1 2),(3 4))");
        assert_eq!(Point::new(2.0, 1.0).to_string(), "POINT(1 2)");
    }
}
