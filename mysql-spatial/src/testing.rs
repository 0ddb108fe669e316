//! SQLite stand-ins for the MySQL spatial functions the builder emits, so statements can be
//! executed in tests.

use crate::geometry::{Geometry, Point};
use crate::query::Grammar;
use crate::schema::{Blueprint, ColumnType};
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::Connection;
use std::path::Path;

// MySQL's default sphere radius for ST_Distance_Sphere, in meters
const EARTH_RADIUS: f64 = 6_370_986.0;

fn user_error(e: crate::Error) -> rusqlite::Error {
    rusqlite::Error::UserFunctionError(e.to_string().into())
}

fn point_arg(ctx: &Context<'_>, idx: usize) -> rusqlite::Result<Option<Point>> {
    let bytes: Option<Vec<u8>> = ctx.get(idx)?;
    bytes
        .map(|b| Point::from_binary(&b).map_err(user_error))
        .transpose()
}

fn planar_distance(a: &Point, b: &Point) -> f64 {
    (a.x() - b.x()).hypot(a.y() - b.y())
}

fn sphere_distance(a: &Point, b: &Point) -> f64 {
    let (lat1, lat2) = (a.lat().to_radians(), b.lat().to_radians());
    let d_lat = lat2 - lat1;
    let d_lng = (b.lng() - a.lng()).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * h.sqrt().asin()
}

fn register_distance(
    conn: &Connection,
    name: &str,
    distance: fn(&Point, &Point) -> f64,
) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        name,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        move |ctx| {
            let a = point_arg(ctx, 0)?;
            let b = point_arg(ctx, 1)?;
            Ok(a.zip(b).map(|(a, b)| distance(&a, &b)))
        },
    )
}

/// `ST_GeomFromText(wkt, srid [, options])` returning the MySQL internal format, and
/// point-only `st_distance` / `st_distance_sphere`.
pub(crate) fn register_spatial_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "ST_GeomFromText",
        -1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let wkt: String = ctx.get(0)?;
            let srid: i64 = if ctx.len() > 1 { ctx.get(1)? } else { 0 };
            Geometry::from_wkt(&wkt, srid as u32)
                .and_then(|g| g.to_binary())
                .map_err(user_error)
        },
    )?;
    register_distance(conn, "st_distance", planar_distance)?;
    register_distance(conn, "st_distance_sphere", sphere_distance)
}

pub(crate) fn open(path: &Path) -> Connection {
    let conn = Connection::open(path).unwrap();
    register_spatial_functions(&conn).unwrap();
    conn
}

/// Create the blueprint's table using SQLite column affinities.
pub(crate) fn create_table(conn: &Connection, blueprint: &Blueprint) {
    let grammar = Grammar::default();
    let columns = blueprint
        .columns()
        .iter()
        .map(|c| {
            let affinity = match c.column_type {
                ColumnType::Increments => "INTEGER PRIMARY KEY",
                ColumnType::Integer | ColumnType::BigInteger | ColumnType::Boolean => "INTEGER",
                ColumnType::Double => "REAL",
                ColumnType::String(_) | ColumnType::Timestamp => "TEXT",
                ColumnType::Spatial { .. } => "BLOB",
            };
            let null = if c.nullable || c.column_type == ColumnType::Increments {
                ""
            } else {
                " NOT NULL"
            };
            format!("{} {}{}", grammar.wrap(&c.name), affinity, null)
        })
        .collect::<Vec<String>>()
        .join(", ");
    let sql = format!(
        "CREATE TABLE {} ({})",
        grammar.wrap(blueprint.table_name()),
        columns
    );
    conn.execute(&sql, []).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_distance_matches_mysql() {
        let a = Point::new(40.767864, -73.971732);
        let b = Point::new(40.767664, -73.971271);
        assert_relative_eq!(sphere_distance(&a, &b), 44.741406484, epsilon = 1e-3);
        assert_relative_eq!(planar_distance(&Point::new(1.0, 1.0), &Point::new(3.0, 3.0)), 8f64.sqrt());
    }

    #[test]
    fn geom_from_text_produces_internal_format() {
        let conn = Connection::open_in_memory().unwrap();
        register_spatial_functions(&conn).unwrap();
        let bytes: Vec<u8> = conn
            .query_row(
                "SELECT ST_GeomFromText(?, ?, 'axis-order=long-lat')",
                rusqlite::params!["POINT(1 2)", 4326],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(&bytes[..4], &4326u32.to_le_bytes());
        assert_eq!(Point::from_binary(&bytes).unwrap(), Point::with_srid(2.0, 1.0, 4326));

        let distance: f64 = conn
            .query_row(
                "SELECT st_distance(ST_GeomFromText('POINT(0 0)', 0), ST_GeomFromText('POINT(3 4)', 0))",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_relative_eq!(distance, 5.0);
    }
}
