use super::{CollectionItem, Geometry};
use crate::result::Result;
use crate::wkt;
use std::fmt;

/// A single position.
///
/// Constructors take `(latitude, longitude)`, while every serialized form (WKT, WKB,
/// GeoJSON) writes `x = longitude` first and `y = latitude` second.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    lat: f64,
    lng: f64,
    srid: u32,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self::with_srid(lat, lng, 0)
    }

    pub fn with_srid(lat: f64, lng: f64, srid: u32) -> Self {
        Point { lat, lng, srid }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn set_lat(&mut self, lat: f64) {
        self.lat = lat;
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn set_lng(&mut self, lng: f64) {
        self.lng = lng;
    }

    /// Longitude.
    pub fn x(&self) -> f64 {
        self.lng
    }

    /// Latitude.
    pub fn y(&self) -> f64 {
        self.lat
    }

    pub fn srid(&self) -> u32 {
        self.srid
    }

    pub fn set_srid(&mut self, srid: u32) {
        self.srid = srid;
    }

    /// The bare `x y` pair used inside the WKT of other geometries.
    pub fn to_pair(&self) -> String {
        format!("{} {}", self.lng, self.lat)
    }

    pub fn from_pair(pair: &str, srid: u32) -> Result<Self> {
        let (x, y) = wkt::parse_pair(pair)?;
        Ok(Point::with_srid(y, x, srid))
    }

    pub fn to_wkt(&self) -> String {
        format!("POINT({})", self.to_pair())
    }

    pub fn from_wkt(text: &str, srid: u32) -> Result<Self> {
        Self::from_pair(wkt::strip_keyword(text, "POINT")?, srid)
    }

    pub(crate) fn same_position(&self, other: &Point) -> bool {
        self.lat == other.lat && self.lng == other.lng
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.srid == other.srid && self.same_position(other)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wkt())
    }
}

impl CollectionItem for Point {
    const TYPE_NAME: &'static str = "Point";

    fn from_geometry(geometry: Geometry) -> std::result::Result<Self, Geometry> {
        match geometry {
            Geometry::Point(p) => Ok(p),
            other => Err(other),
        }
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.same_position(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wkt_is_longitude_first() {
        let point = Point::new(2.0, 1.0);
        assert_eq!(point.to_pair(), "1 2");
        assert_eq!(point.to_wkt(), "POINT(1 2)");
        assert_eq!(point.x(), 1.0);
        assert_eq!(point.y(), 2.0);
    }

    #[test]
    fn from_wkt_swaps_back_to_lat_lng() {
        let point = Point::from_wkt("POINT(1 2)", 4326).unwrap();
        assert_eq!(point.lat(), 2.0);
        assert_eq!(point.lng(), 1.0);
        assert_eq!(point.srid(), 4326);

        let point = Point::from_wkt("point(-73.971732 40.767864)", 0).unwrap();
        assert_eq!(point, Point::new(40.767864, -73.971732));
    }

    #[test]
    fn from_wkt_rejects_other_shapes() {
        assert!(Point::from_wkt("LINESTRING(1 2,3 4)", 0).is_err());
        assert!(Point::from_wkt("POINT(1 2 3)", 0).is_err());
        assert!(Point::from_wkt("POINT(1 2", 0).is_err());
    }

    #[test]
    fn equality_includes_srid() {
        assert_eq!(Point::new(1.0, 2.0), Point::new(1.0, 2.0));
        assert_ne!(Point::new(1.0, 2.0), Point::with_srid(1.0, 2.0, 4326));
        assert!(Point::new(1.0, 2.0).same_shape(&Point::with_srid(1.0, 2.0, 4326)));
    }

    #[test]
    fn round_trips_through_wkt() {
        let point = Point::with_srid(40.767664, -73.971271, 3857);
        assert_eq!(Point::from_wkt(&point.to_wkt(), 3857).unwrap(), point);
    }
}
