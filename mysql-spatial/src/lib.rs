//! Geometry types for MySQL spatial columns.
//!
//! The crate covers the value side and the statement side of working with MySQL
//! spatial data:
//!
//! - [`Geometry`] and its seven concrete types, with WKT, GeoJSON, WKB and the MySQL
//!   internal binary format (a little-endian SRID followed by WKB).
//! - [`query::Builder`], a select/insert/update builder whose spatial scopes emit
//!   `ST_*` calls with the geometry bound through `ST_GeomFromText(?, ?)`.
//! - [`schema::Blueprint`] for spatial column and index DDL.
//! - [`SpatialModel`], derivable, tying a struct to a table and its spatial fields.
//!
//! Geometries convert to and from `geo-types`, and bind to `rusqlite` statements through
//! the internal binary format.
//!
//! ```
//! use mysql_spatial::{Point, Polygon};
//!
//! let point = Point::new(2.0, 1.0);
//! assert_eq!(point.to_wkt(), "POINT(1 2)");
//!
//! let polygon = Polygon::from_wkt("POLYGON((0 0,10 0,10 10,0 0))", 4326).unwrap();
//! assert_eq!(polygon.srid(), 4326);
//! ```

extern crate self as mysql_spatial;

pub mod config;
pub mod geometry;
mod interop;
mod json;
mod model;
pub mod query;
mod result;
pub mod schema;
mod wkb;
mod wkt;

#[cfg(test)]
mod testing;

pub use config::{AxisOrder, SpatialConfig};
pub use geometry::{
    CollectionItem, Geometry, GeometryCollection, GeometryKind, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Point, PointCollection, Polygon,
};
pub use model::SpatialModel;
#[doc(inline)]
pub use mysql_spatial_derive::SpatialModel;
pub use result::{Error, Result};
pub use rusqlite;
pub use wkb::SRID_LENGTH;
