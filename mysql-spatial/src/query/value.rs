use crate::geometry::{
    Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon,
};
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;

/// A value bound to a `?` placeholder.
///
/// Geometries never appear here, they are sent as WKT plus SRID through `ST_GeomFromText`.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl ToSql for Binding {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(match self {
            Binding::Null => ValueRef::Null,
            Binding::Integer(i) => ValueRef::Integer(*i),
            Binding::Real(r) => ValueRef::Real(*r),
            Binding::Text(s) => ValueRef::Text(s.as_bytes()),
            Binding::Blob(b) => ValueRef::Blob(b),
        }))
    }
}

impl From<i64> for Binding {
    fn from(v: i64) -> Self {
        Binding::Integer(v)
    }
}

impl From<i32> for Binding {
    fn from(v: i32) -> Self {
        Binding::Integer(v as i64)
    }
}

impl From<u32> for Binding {
    fn from(v: u32) -> Self {
        Binding::Integer(v as i64)
    }
}

impl From<bool> for Binding {
    fn from(v: bool) -> Self {
        Binding::Integer(v as i64)
    }
}

impl From<f64> for Binding {
    fn from(v: f64) -> Self {
        Binding::Real(v)
    }
}

impl From<String> for Binding {
    fn from(v: String) -> Self {
        Binding::Text(v)
    }
}

impl From<&str> for Binding {
    fn from(v: &str) -> Self {
        Binding::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Binding {
    fn from(v: Vec<u8>) -> Self {
        Binding::Blob(v)
    }
}

impl<T: Into<Binding>> From<Option<T>> for Binding {
    fn from(v: Option<T>) -> Self {
        v.map_or(Binding::Null, Into::into)
    }
}

/// A value written by an insert or update, or compared by `where_eq`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Compiled to a spatial expression.
    Geometry(Geometry),
    Scalar(Binding),
}

impl From<Binding> for Value {
    fn from(b: Binding) -> Self {
        Value::Scalar(b)
    }
}

impl From<Geometry> for Value {
    fn from(g: Geometry) -> Self {
        Value::Geometry(g)
    }
}

impl From<&Geometry> for Value {
    fn from(g: &Geometry) -> Self {
        Value::Geometry(g.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Scalar(Binding::Null), Into::into)
    }
}

macro_rules! geometry_value {
    ($($t:ident),*) => {
        $(
            impl From<$t> for Value {
                fn from(g: $t) -> Self {
                    Value::Geometry(g.into())
                }
            }

            impl From<&$t> for Value {
                fn from(g: &$t) -> Self {
                    Value::Geometry(g.into())
                }
            }
        )*
    };
}

geometry_value!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);

macro_rules! scalar_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Scalar(v.into())
                }
            }
        )*
    };
}

scalar_value!(i64, i32, u32, bool, f64, String, &str, Vec<u8>);
