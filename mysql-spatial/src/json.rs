//! GeoJSON (RFC 7946) conversions on top of the `geojson` crate.
//!
//! Positions are `[longitude, latitude]`. GeoJSON has no notion of an SRID, so every
//! geometry read from it has an SRID of 0.

use crate::geometry::{
    Geometry, GeometryCollection, GeometryKind, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};
use crate::result::{Error, Result};
use geojson::GeoJson;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

fn position(point: &Point) -> Vec<f64> {
    vec![point.x(), point.y()]
}

fn positions<'a>(points: impl IntoIterator<Item = &'a Point>) -> Vec<Vec<f64>> {
    points.into_iter().map(position).collect()
}

fn point_from_position(position: &[f64]) -> Result<Point> {
    match position {
        [x, y, ..] => Ok(Point::new(*y, *x)),
        _ => Err(Error::InvalidGeoJson(format!(
            "a position needs at least two elements, got {}",
            position.len()
        ))),
    }
}

fn points_from_positions(positions: &[Vec<f64>]) -> Result<Vec<Point>> {
    positions.iter().map(|p| point_from_position(p)).collect()
}

fn line_from_positions(positions: &[Vec<f64>]) -> Result<LineString> {
    LineString::new(points_from_positions(positions)?)
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Result<Polygon> {
    Polygon::new(
        rings
            .iter()
            .map(|ring| line_from_positions(ring))
            .collect::<Result<Vec<LineString>>>()?,
    )
}

fn polygon_rings(polygon: &Polygon) -> Vec<Vec<Vec<f64>>> {
    polygon.iter().map(|ring| positions(ring)).collect()
}

fn value_type_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn geojson_type_name(geojson: &GeoJson) -> &'static str {
    match geojson {
        GeoJson::Geometry(g) => value_type_name(&g.value),
        GeoJson::Feature(_) => "Feature",
        GeoJson::FeatureCollection(_) => "FeatureCollection",
    }
}

// the geometry type a document converts to, None for a Feature without a geometry
fn target_type_name(geojson: &GeoJson) -> Option<&'static str> {
    match geojson {
        GeoJson::Geometry(g) => Some(value_type_name(&g.value)),
        GeoJson::Feature(f) => f.geometry.as_ref().map(|g| value_type_name(&g.value)),
        GeoJson::FeatureCollection(_) => Some("GeometryCollection"),
    }
}

fn from_geojson_geometry(geometry: &geojson::Geometry) -> Result<Geometry> {
    use geojson::Value;
    Ok(match &geometry.value {
        Value::Point(p) => point_from_position(p)?.into(),
        Value::MultiPoint(points) => MultiPoint::new(points_from_positions(points)?)?.into(),
        Value::LineString(points) => line_from_positions(points)?.into(),
        Value::MultiLineString(lines) => MultiLineString::new(
            lines
                .iter()
                .map(|l| line_from_positions(l))
                .collect::<Result<Vec<LineString>>>()?,
        )?
        .into(),
        Value::Polygon(rings) => polygon_from_rings(rings)?.into(),
        Value::MultiPolygon(polygons) => MultiPolygon::new(
            polygons
                .iter()
                .map(|p| polygon_from_rings(p))
                .collect::<Result<Vec<Polygon>>>()?,
        )?
        .into(),
        Value::GeometryCollection(geometries) => GeometryCollection::new(
            geometries
                .iter()
                .map(from_geojson_geometry)
                .collect::<Result<Vec<Geometry>>>()?,
        )?
        .into(),
    })
}

fn from_feature(feature: &geojson::Feature) -> Result<Geometry> {
    feature
        .geometry
        .as_ref()
        .ok_or_else(|| Error::InvalidGeoJson("Feature has no geometry".to_string()))
        .and_then(from_geojson_geometry)
}

fn parse(json: &str) -> Result<GeoJson> {
    json.parse::<GeoJson>()
        .map_err(|e| Error::InvalidGeoJson(e.to_string()))
}

impl Geometry {
    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(self.geojson_value())
    }

    fn geojson_value(&self) -> geojson::Value {
        use geojson::Value;
        match self {
            Geometry::Point(p) => Value::Point(position(p)),
            Geometry::LineString(ls) => Value::LineString(positions(ls)),
            Geometry::Polygon(polygon) => Value::Polygon(polygon_rings(polygon)),
            Geometry::MultiPoint(mp) => Value::MultiPoint(positions(mp)),
            Geometry::MultiLineString(mls) => {
                Value::MultiLineString(mls.iter().map(|ls| positions(ls)).collect())
            }
            Geometry::MultiPolygon(mp) => Value::MultiPolygon(mp.iter().map(polygon_rings).collect()),
            Geometry::GeometryCollection(gc) => {
                Value::GeometryCollection(gc.iter().map(Geometry::to_geojson).collect())
            }
        }
    }

    /// Read a geometry from a GeoJSON geometry, the geometry of a feature, or the
    /// geometries of a feature collection gathered into a [`GeometryCollection`].
    pub fn from_geojson(geojson: &GeoJson) -> Result<Geometry> {
        match geojson {
            GeoJson::Geometry(g) => from_geojson_geometry(g),
            GeoJson::Feature(f) => from_feature(f),
            GeoJson::FeatureCollection(fc) => Ok(GeometryCollection::new(
                fc.features
                    .iter()
                    .map(from_feature)
                    .collect::<Result<Vec<Geometry>>>()?,
            )?
            .into()),
        }
    }

    pub fn from_json(json: &str) -> Result<Geometry> {
        Self::from_geojson(&parse(json)?)
    }

    pub fn to_json(&self) -> String {
        self.to_geojson().to_string()
    }
}

// The concrete types go through Geometry and then check that the GeoJSON had the
// expected shape.
macro_rules! impl_geojson {
    ($($t:ident),*) => {
        $(
            impl $t {
                pub fn to_geojson(&self) -> geojson::Geometry {
                    Geometry::from(self).to_geojson()
                }

                pub fn from_geojson(geojson: &GeoJson) -> Result<Self> {
                    let expected = GeometryKind::$t.name();
                    // the type is checked before any coordinates are read
                    if let Some(target) = target_type_name(geojson) {
                        if target != expected {
                            let found = match geojson {
                                GeoJson::Feature(_) => target,
                                _ => geojson_type_name(geojson),
                            };
                            return Err(Error::InvalidGeoJson(format!(
                                "Expected {}, got {}",
                                expected, found
                            )));
                        }
                    }
                    match Geometry::from_geojson(geojson)? {
                        Geometry::$t(g) => Ok(g),
                        _ => Err(Error::InvalidGeoJson(format!(
                            "Expected {}, got {}",
                            expected,
                            geojson_type_name(geojson)
                        ))),
                    }
                }

                pub fn from_json(json: &str) -> Result<Self> {
                    Self::from_geojson(&parse(json)?)
                }

                pub fn to_json(&self) -> String {
                    self.to_geojson().to_string()
                }
            }

            impl From<&$t> for geojson::Geometry {
                fn from(g: &$t) -> Self {
                    g.to_geojson()
                }
            }
        )*
    };
}

impl_geojson!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);

impl From<&Geometry> for geojson::Geometry {
    fn from(g: &Geometry) -> Self {
        g.to_geojson()
    }
}

macro_rules! impl_serde {
    ($($t:ident),*) => {
        $(
            impl Serialize for $t {
                fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                    self.to_geojson().serialize(serializer)
                }
            }

            impl<'de> Deserialize<'de> for $t {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                    let value = serde_json::Value::deserialize(deserializer)?;
                    let geojson = GeoJson::from_json_value(value).map_err(serde::de::Error::custom)?;
                    $t::from_geojson(&geojson).map_err(serde::de::Error::custom)
                }
            }
        )*
    };
}

impl_serde!(
    Geometry,
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
    use serde_json::json;

    #[test]
    fn point_positions_are_lng_lat() {
        let point = Point::new(2.0, 1.0);
        assert_eq!(
            serde_json::to_value(&point).unwrap(),
            json!({"type": "Point", "coordinates": [1.0, 2.0]})
        );

        let parsed = Point::from_json(r#"{"type":"Point","coordinates":[3.4,1.2]}"#).unwrap();
        assert_eq!(parsed, Point::new(1.2, 3.4));
    }

    #[test]
    fn polygon_to_json() {
        let polygon = Polygon::from_wkt("POLYGON((0 0,1 0,1 1,0 0),(0.2 0.2,0.4 0.2,0.4 0.4,0.2 0.2))", 0)
            .unwrap();
        assert_eq!(
            serde_json::to_value(&polygon).unwrap(),
            json!({
                "type": "Polygon",
                "coordinates": [
                    [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]],
                    [[0.2, 0.2], [0.4, 0.2], [0.4, 0.4], [0.2, 0.2]]
                ]
            })
        );
    }

    #[test]
    fn every_variant_round_trips() {
        let cases = [
            "POINT(1 2)",
            "LINESTRING(0 0,1 1,1 2)",
            "POLYGON((0 0,10 0,10 10,0 10,0 0),(2 2,4 2,4 4,2 2))",
            "MULTIPOINT((0 0),(1 2))",
            "MULTILINESTRING((0 0,1 1,1 2),(2 3,3 2,5 4))",
            "MULTIPOLYGON(((0 10,10 10,10 0,0 0,0 10)),((0 0,0 5,5 5,5 0,0 0)))",
            "GEOMETRYCOLLECTION(POINT(1 2),LINESTRING(0 0,1 1))",
            "GEOMETRYCOLLECTION()",
        ];
        for text in cases {
            let geometry = Geometry::from_wkt(text, 0).unwrap();
            let json = geometry.to_json();
            assert_eq!(Geometry::from_json(&json).unwrap(), geometry, "{}", json);

            let decoded: Geometry = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, geometry);
        }
    }

    #[test]
    fn srid_is_dropped() {
        let point = Point::with_srid(1.0, 2.0, 4326);
        let decoded = Point::from_json(&point.to_json()).unwrap();
        assert_eq!(decoded.srid(), 0);
        assert!(decoded.same_position(&point));
    }

    #[test]
    fn feature_contributes_its_geometry() {
        let json = r#"{"type":"Feature","properties":{"name":"a"},"geometry":{"type":"LineString","coordinates":[[1,2],[3,4]]}}"#;
        let ls = LineString::from_json(json).unwrap();
        assert_eq!(ls.to_wkt(), "LINESTRING(1 2,3 4)");

        let empty = r#"{"type":"Feature","properties":null,"geometry":null}"#;
        assert!(matches!(
            Geometry::from_json(empty).unwrap_err(),
            Error::InvalidGeoJson(_)
        ));
    }

    #[test]
    fn feature_collection_becomes_geometry_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 2]}},
                {"type": "Feature", "properties": {}, "geometry": {"type": "LineString", "coordinates": [[1, 1], [2, 2]]}}
            ]
        }"#;
        let gc = GeometryCollection::from_json(json).unwrap();
        assert_eq!(gc.to_wkt(), "GEOMETRYCOLLECTION(POINT(1 2),LINESTRING(1 1,2 2))");
    }

    #[test]
    fn shape_mismatch() {
        let err = Point::from_json(r#"{"type":"LineString","coordinates":[[1,2],[3,4]]}"#)
            .unwrap_err();
        match err {
            Error::InvalidGeoJson(msg) => assert_eq!(msg, "Expected Point, got LineString"),
            other => panic!("unexpected error {:?}", other),
        }

        assert!(matches!(
            MultiPolygon::from_json(r#"{"type":"FeatureCollection","features":[]}"#).unwrap_err(),
            Error::InvalidGeoJson(_)
        ));

        // coordinates the expected type would reject do not mask the type mismatch
        let err = Polygon::from_json(r#"{"type":"LineString","coordinates":[[1,2]]}"#).unwrap_err();
        match err {
            Error::InvalidGeoJson(msg) => assert_eq!(msg, "Expected Polygon, got LineString"),
            other => panic!("unexpected error {:?}", other),
        }
        let err = Point::from_json(r#"{"type":"MultiPoint","coordinates":[]}"#).unwrap_err();
        match err {
            Error::InvalidGeoJson(msg) => assert_eq!(msg, "Expected Point, got MultiPoint"),
            other => panic!("unexpected error {:?}", other),
        }
        let feature = r#"{"type":"Feature","properties":{},"geometry":{"type":"LineString","coordinates":[[1,2]]}}"#;
        match Point::from_json(feature).unwrap_err() {
            Error::InvalidGeoJson(msg) => assert_eq!(msg, "Expected Point, got LineString"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn invalid_documents() {
        assert!(Geometry::from_json("not json").is_err());
        assert!(Geometry::from_json(r#"{"type":"Point","coordinates":[1]}"#).is_err());
        assert!(LineString::from_json(r#"{"type":"LineString","coordinates":[[1,2]]}"#).is_err());
        assert!(serde_json::from_str::<Point>(r#"{"type":"Circle"}"#).is_err());
    }
}
