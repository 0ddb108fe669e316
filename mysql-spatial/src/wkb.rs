//! The binary geometry buffer MySQL stores internally: a 4 byte little endian SRID
//! followed by an OGC WKB body.
//!
//! Every WKB geometry starts with a byte order flag (0 big endian, 1 little endian) and a
//! `u32` type code. Members of multi geometries and collections are complete WKB
//! geometries with their own header, so the byte order may change from one member to
//! the next. Everything written here is little endian.

use crate::geometry::{
    CollectionItem, Geometry, GeometryCollection, GeometryKind, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon,
};
use crate::result::{Error, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use std::io::{Cursor, Read, Write};

/// Length of the SRID prefix in front of the WKB body.
pub const SRID_LENGTH: usize = 4;

// the payload of a geometry, everything after its byte order flag and type code
trait WkbBody: Sized {
    const KIND: GeometryKind;
    fn write_body(&self, w: &mut impl Write) -> Result<()>;
    fn read_body<T: ByteOrder, U: Read>(r: &mut U) -> Result<Self>;
}

fn write_header(w: &mut impl Write, kind: GeometryKind) -> Result<()> {
    w.write_u8(1)?;
    w.write_u32::<LittleEndian>(kind.wkb_code())?;
    Ok(())
}

fn write_count(w: &mut impl Write, len: usize) -> Result<()> {
    w.write_u32::<LittleEndian>(len as u32)?;
    Ok(())
}

fn write_geometry(w: &mut impl Write, geometry: &Geometry) -> Result<()> {
    write_header(w, geometry.kind())?;
    match geometry {
        Geometry::Point(g) => g.write_body(w),
        Geometry::LineString(g) => g.write_body(w),
        Geometry::Polygon(g) => g.write_body(w),
        Geometry::MultiPoint(g) => g.write_body(w),
        Geometry::MultiLineString(g) => g.write_body(w),
        Geometry::MultiPolygon(g) => g.write_body(w),
        Geometry::GeometryCollection(g) => g.write_body(w),
    }
}

fn read_geometry<U: Read>(r: &mut U) -> Result<Geometry> {
    match r.read_u8()? {
        0 => read_tagged::<BigEndian, _>(r),
        1 => read_tagged::<LittleEndian, _>(r),
        other => Err(Error::ParseError(format!(
            "invalid WKB byte order flag {}",
            other
        ))),
    }
}

fn read_tagged<T: ByteOrder, U: Read>(r: &mut U) -> Result<Geometry> {
    let code = r.read_u32::<T>()?;
    let kind = GeometryKind::from_wkb_code(code)
        .ok_or_else(|| Error::ParseError(format!("unsupported WKB geometry type {}", code)))?;
    Ok(match kind {
        GeometryKind::Point => Point::read_body::<T, _>(r)?.into(),
        GeometryKind::LineString => LineString::read_body::<T, _>(r)?.into(),
        GeometryKind::Polygon => Polygon::read_body::<T, _>(r)?.into(),
        GeometryKind::MultiPoint => MultiPoint::read_body::<T, _>(r)?.into(),
        GeometryKind::MultiLineString => MultiLineString::read_body::<T, _>(r)?.into(),
        GeometryKind::MultiPolygon => MultiPolygon::read_body::<T, _>(r)?.into(),
        GeometryKind::GeometryCollection => GeometryCollection::read_body::<T, _>(r)?.into(),
    })
}

// a member of a multi geometry, which must be a complete WKB geometry of the item type
fn read_member<I: CollectionItem, U: Read>(r: &mut U, parent: GeometryKind) -> Result<I> {
    I::from_geometry(read_geometry(r)?).map_err(|found| {
        Error::ParseError(format!(
            "{} cannot contain a {}",
            parent,
            found.kind().name()
        ))
    })
}

impl WkbBody for Point {
    const KIND: GeometryKind = GeometryKind::Point;

    fn write_body(&self, w: &mut impl Write) -> Result<()> {
        w.write_f64::<LittleEndian>(self.x())?;
        w.write_f64::<LittleEndian>(self.y())?;
        Ok(())
    }

    fn read_body<T: ByteOrder, U: Read>(r: &mut U) -> Result<Self> {
        let x = r.read_f64::<T>()?;
        let y = r.read_f64::<T>()?;
        Ok(Point::new(y, x))
    }
}

impl WkbBody for LineString {
    const KIND: GeometryKind = GeometryKind::LineString;

    fn write_body(&self, w: &mut impl Write) -> Result<()> {
        write_count(w, self.len())?;
        for p in self {
            p.write_body(w)?;
        }
        Ok(())
    }

    fn read_body<T: ByteOrder, U: Read>(r: &mut U) -> Result<Self> {
        let num_points = r.read_u32::<T>()?;
        let mut points = Vec::new();
        for _ in 0..num_points {
            points.push(Point::read_body::<T, _>(r)?);
        }
        LineString::new(points)
    }
}

impl WkbBody for Polygon {
    const KIND: GeometryKind = GeometryKind::Polygon;

    fn write_body(&self, w: &mut impl Write) -> Result<()> {
        write_count(w, self.len())?;
        for ring in self {
            ring.write_body(w)?;
        }
        Ok(())
    }

    fn read_body<T: ByteOrder, U: Read>(r: &mut U) -> Result<Self> {
        let num_rings = r.read_u32::<T>()?;
        let mut rings = Vec::new();
        for _ in 0..num_rings {
            rings.push(LineString::read_body::<T, _>(r)?);
        }
        Polygon::new(rings)
    }
}

// multi geometries are a count followed by complete member geometries
macro_rules! wkb_multi {
    ($t:ident, $item:ident, $kind:expr) => {
        impl WkbBody for $t {
            const KIND: GeometryKind = $kind;

            fn write_body(&self, w: &mut impl Write) -> Result<()> {
                write_count(w, self.len())?;
                for item in self {
                    write_header(w, <$item as WkbBody>::KIND)?;
                    item.write_body(w)?;
                }
                Ok(())
            }

            fn read_body<T: ByteOrder, U: Read>(r: &mut U) -> Result<Self> {
                let num_items = r.read_u32::<T>()?;
                let mut items = Vec::new();
                for _ in 0..num_items {
                    items.push(read_member::<$item, _>(r, $kind)?);
                }
                $t::new(items)
            }
        }
    };
}

wkb_multi!(MultiPoint, Point, GeometryKind::MultiPoint);
wkb_multi!(MultiLineString, LineString, GeometryKind::MultiLineString);
wkb_multi!(MultiPolygon, Polygon, GeometryKind::MultiPolygon);

impl WkbBody for GeometryCollection {
    const KIND: GeometryKind = GeometryKind::GeometryCollection;

    fn write_body(&self, w: &mut impl Write) -> Result<()> {
        write_count(w, self.len())?;
        for geometry in self {
            write_geometry(w, geometry)?;
        }
        Ok(())
    }

    fn read_body<T: ByteOrder, U: Read>(r: &mut U) -> Result<Self> {
        let num_geoms = r.read_u32::<T>()?;
        let mut geometries = Vec::new();
        for _ in 0..num_geoms {
            geometries.push(read_geometry(r)?);
        }
        GeometryCollection::new(geometries)
    }
}

fn decode(bytes: &[u8], srid: u32) -> Result<Geometry> {
    let mut cursor = Cursor::new(bytes);
    let mut geometry = read_geometry(&mut cursor)?;
    let consumed = cursor.position() as usize;
    if consumed != bytes.len() {
        return Err(Error::ParseError(format!(
            "{} trailing bytes after WKB geometry",
            bytes.len() - consumed
        )));
    }
    geometry.set_srid(srid);
    Ok(geometry)
}

impl Geometry {
    /// Decode the SRID prefixed buffer MySQL returns for geometry columns.
    pub fn from_binary(bytes: &[u8]) -> Result<Geometry> {
        if bytes.len() < SRID_LENGTH {
            return Err(Error::ParseError(format!(
                "geometry buffer of {} bytes is too short for an SRID",
                bytes.len()
            )));
        }
        let srid = LittleEndian::read_u32(&bytes[..SRID_LENGTH]);
        let geometry = decode(&bytes[SRID_LENGTH..], srid)?;
        tracing::trace!(srid, kind = %geometry.kind(), "decoded geometry buffer");
        Ok(geometry)
    }

    /// Decode a bare WKB geometry, which carries no SRID.
    pub fn from_wkb(bytes: &[u8]) -> Result<Geometry> {
        decode(bytes, 0)
    }

    pub fn to_wkb(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        write_geometry(&mut buf, self)?;
        Ok(buf)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        buf.write_u32::<LittleEndian>(self.srid())?;
        write_geometry(&mut buf, self)?;
        Ok(buf)
    }
}

// the concrete types encode through their own body and decode through Geometry so that a
// buffer holding a different variant is reported as such
macro_rules! impl_binary {
    ($($t:ident),*) => {
        $(
            impl $t {
                pub fn from_binary(bytes: &[u8]) -> Result<Self> {
                    $t::try_from(Geometry::from_binary(bytes)?)
                }

                pub fn from_wkb(bytes: &[u8]) -> Result<Self> {
                    $t::try_from(Geometry::from_wkb(bytes)?)
                }

                pub fn to_wkb(&self) -> Result<Vec<u8>> {
                    let mut buf = Vec::new();
                    write_header(&mut buf, <$t as WkbBody>::KIND)?;
                    self.write_body(&mut buf)?;
                    Ok(buf)
                }

                pub fn to_binary(&self) -> Result<Vec<u8>> {
                    let mut buf = Vec::new();
                    buf.write_u32::<LittleEndian>(self.srid())?;
                    write_header(&mut buf, <$t as WkbBody>::KIND)?;
                    self.write_body(&mut buf)?;
                    Ok(buf)
                }
            }
        )*
    };
}

impl_binary!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);

// once a type can be written to and read from the binary buffer
// the to/from sql impls are the same for all of them
macro_rules! impl_sql_binary {
    ($($t:ty),*) => {
       $(
            impl ToSql for $t {
                #[inline]
                fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                    Ok(ToSqlOutput::from(self.to_binary().map_err(|e| {
                        rusqlite::Error::ToSqlConversionFailure(Box::new(e))
                    })?))
                }
            }

            impl FromSql for $t {
                #[inline]
                fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                    let decoded = match value {
                        ValueRef::Blob(bytes) => <$t>::from_binary(bytes),
                        ValueRef::Text(text) => std::str::from_utf8(text)
                            .map_err(|e| Error::ParseError(e.to_string()))
                            .and_then(|text| <$t>::from_wkt(text, 0)),
                        _ => return Err(FromSqlError::InvalidType),
                    };
                    decoded.map_err(|e| FromSqlError::Other(Box::new(e)))
                }
            }
       )*
    };
}

impl_sql_binary! {
    Geometry,
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
}
