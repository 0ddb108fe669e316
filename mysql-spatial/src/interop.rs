//! Conversions to and from [`geo_types`], so values read from MySQL can be handed to the
//! `geo` ecosystem and back.
//!
//! `geo_types` collections have no minimum size, so conversions into this crate's types
//! are fallible. SRIDs are not represented in `geo_types` and are set to 0.

use crate::geometry::{
    Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon,
};
use crate::result::{Error, Result};

impl From<&Point> for geo_types::Point<f64> {
    fn from(p: &Point) -> Self {
        geo_types::Point::new(p.x(), p.y())
    }
}

impl From<geo_types::Point<f64>> for Point {
    fn from(p: geo_types::Point<f64>) -> Self {
        Point::new(p.y(), p.x())
    }
}

impl From<&LineString> for geo_types::LineString<f64> {
    fn from(ls: &LineString) -> Self {
        ls.iter().map(|p| (p.x(), p.y())).collect::<Vec<_>>().into()
    }
}

impl TryFrom<geo_types::LineString<f64>> for LineString {
    type Error = Error;

    fn try_from(ls: geo_types::LineString<f64>) -> Result<Self> {
        LineString::new(ls.coords().map(|c| Point::new(c.y, c.x)).collect())
    }
}

impl TryFrom<geo_types::Line<f64>> for LineString {
    type Error = Error;

    fn try_from(line: geo_types::Line<f64>) -> Result<Self> {
        LineString::new(vec![
            Point::new(line.start.y, line.start.x),
            Point::new(line.end.y, line.end.x),
        ])
    }
}

impl From<&Polygon> for geo_types::Polygon<f64> {
    fn from(polygon: &Polygon) -> Self {
        geo_types::Polygon::new(
            polygon.exterior().into(),
            polygon.interiors().iter().map(|ring| ring.into()).collect(),
        )
    }
}

impl TryFrom<geo_types::Polygon<f64>> for Polygon {
    type Error = Error;

    fn try_from(polygon: geo_types::Polygon<f64>) -> Result<Self> {
        let (exterior, interiors) = polygon.into_inner();
        let mut rings = Vec::with_capacity(interiors.len() + 1);
        rings.push(LineString::try_from(exterior)?);
        for ring in interiors {
            rings.push(LineString::try_from(ring)?);
        }
        Polygon::new(rings)
    }
}

impl TryFrom<geo_types::Rect<f64>> for Polygon {
    type Error = Error;

    fn try_from(rect: geo_types::Rect<f64>) -> Result<Self> {
        Polygon::try_from(rect.to_polygon())
    }
}

impl TryFrom<geo_types::Triangle<f64>> for Polygon {
    type Error = Error;

    fn try_from(triangle: geo_types::Triangle<f64>) -> Result<Self> {
        Polygon::try_from(triangle.to_polygon())
    }
}

impl From<&MultiPoint> for geo_types::MultiPoint<f64> {
    fn from(mp: &MultiPoint) -> Self {
        geo_types::MultiPoint(mp.iter().map(|p| p.into()).collect())
    }
}

impl TryFrom<geo_types::MultiPoint<f64>> for MultiPoint {
    type Error = Error;

    fn try_from(mp: geo_types::MultiPoint<f64>) -> Result<Self> {
        MultiPoint::new(mp.0.into_iter().map(Point::from).collect())
    }
}

impl From<&MultiLineString> for geo_types::MultiLineString<f64> {
    fn from(mls: &MultiLineString) -> Self {
        geo_types::MultiLineString(mls.iter().map(|ls| ls.into()).collect())
    }
}

impl TryFrom<geo_types::MultiLineString<f64>> for MultiLineString {
    type Error = Error;

    fn try_from(mls: geo_types::MultiLineString<f64>) -> Result<Self> {
        MultiLineString::new(
            mls.0
                .into_iter()
                .map(LineString::try_from)
                .collect::<Result<Vec<LineString>>>()?,
        )
    }
}

impl From<&MultiPolygon> for geo_types::MultiPolygon<f64> {
    fn from(mp: &MultiPolygon) -> Self {
        geo_types::MultiPolygon(mp.iter().map(|p| p.into()).collect())
    }
}

impl TryFrom<geo_types::MultiPolygon<f64>> for MultiPolygon {
    type Error = Error;

    fn try_from(mp: geo_types::MultiPolygon<f64>) -> Result<Self> {
        MultiPolygon::new(
            mp.0.into_iter()
                .map(Polygon::try_from)
                .collect::<Result<Vec<Polygon>>>()?,
        )
    }
}

impl From<&GeometryCollection> for geo_types::GeometryCollection<f64> {
    fn from(gc: &GeometryCollection) -> Self {
        geo_types::GeometryCollection(gc.iter().map(|g| g.into()).collect())
    }
}

impl TryFrom<geo_types::GeometryCollection<f64>> for GeometryCollection {
    type Error = Error;

    fn try_from(gc: geo_types::GeometryCollection<f64>) -> Result<Self> {
        GeometryCollection::new(
            gc.0.into_iter()
                .map(Geometry::try_from)
                .collect::<Result<Vec<Geometry>>>()?,
        )
    }
}

impl From<&Geometry> for geo_types::Geometry<f64> {
    fn from(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Point(g) => geo_types::Geometry::Point(g.into()),
            Geometry::LineString(g) => geo_types::Geometry::LineString(g.into()),
            Geometry::Polygon(g) => geo_types::Geometry::Polygon(g.into()),
            Geometry::MultiPoint(g) => geo_types::Geometry::MultiPoint(g.into()),
            Geometry::MultiLineString(g) => geo_types::Geometry::MultiLineString(g.into()),
            Geometry::MultiPolygon(g) => geo_types::Geometry::MultiPolygon(g.into()),
            Geometry::GeometryCollection(g) => geo_types::Geometry::GeometryCollection(g.into()),
        }
    }
}

impl TryFrom<geo_types::Geometry<f64>> for Geometry {
    type Error = Error;

    fn try_from(geometry: geo_types::Geometry<f64>) -> Result<Self> {
        Ok(match geometry {
            geo_types::Geometry::Point(g) => Point::from(g).into(),
            geo_types::Geometry::Line(g) => LineString::try_from(g)?.into(),
            geo_types::Geometry::LineString(g) => LineString::try_from(g)?.into(),
            geo_types::Geometry::Polygon(g) => Polygon::try_from(g)?.into(),
            geo_types::Geometry::MultiPoint(g) => MultiPoint::try_from(g)?.into(),
            geo_types::Geometry::MultiLineString(g) => MultiLineString::try_from(g)?.into(),
            geo_types::Geometry::MultiPolygon(g) => MultiPolygon::try_from(g)?.into(),
            geo_types::Geometry::GeometryCollection(g) => GeometryCollection::try_from(g)?.into(),
            geo_types::Geometry::Rect(g) => Polygon::try_from(g)?.into(),
            geo_types::Geometry::Triangle(g) => Polygon::try_from(g)?.into(),
        })
    }
}

// by value conversions for convenience
macro_rules! impl_into_geo_types {
    ($($t:ident),*) => {
        $(
            impl From<$t> for geo_types::$t<f64> {
                fn from(g: $t) -> Self {
                    (&g).into()
                }
            }
        )*
    };
}

impl_into_geo_types!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    Geometry
);
