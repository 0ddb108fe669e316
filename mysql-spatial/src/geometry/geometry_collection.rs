use super::collection::impl_collection;
use super::Geometry;
use crate::result::{Error, Result};
use crate::wkt;

/// A heterogeneous collection of any geometries, possibly empty.
#[derive(Debug, Clone)]
pub struct GeometryCollection {
    items: Vec<Geometry>,
    srid: u32,
}

impl_collection!(GeometryCollection, Geometry, 0);

impl Default for GeometryCollection {
    fn default() -> Self {
        GeometryCollection {
            items: Vec::new(),
            srid: 0,
        }
    }
}

impl GeometryCollection {
    pub fn geometries(&self) -> &[Geometry] {
        &self.items
    }

    pub fn to_wkt(&self) -> String {
        format!("GEOMETRYCOLLECTION({})", self.wkt_body())
    }

    /// Accepts `GEOMETRYCOLLECTION(...)`, the `GEOMCOLLECTION` alias and `... EMPTY`.
    pub fn from_wkt(text: &str, srid: u32) -> Result<Self> {
        let (keyword, rest) = wkt::split_keyword(text)?;
        if keyword != "GEOMETRYCOLLECTION" && keyword != "GEOMCOLLECTION" {
            return Err(Error::ParseError(format!(
                "expected GEOMETRYCOLLECTION but found {}",
                keyword
            )));
        }
        if rest.eq_ignore_ascii_case("EMPTY") {
            return Self::with_srid(Vec::new(), srid);
        }
        Self::from_wkt_body(wkt::strip_parens(rest)?, srid)
    }

    pub(crate) fn wkt_body(&self) -> String {
        self.items
            .iter()
            .map(Geometry::to_wkt)
            .collect::<Vec<String>>()
            .join(",")
    }

    pub(crate) fn from_wkt_body(body: &str, srid: u32) -> Result<Self> {
        let geometries = wkt::split_top_level(body)?
            .into_iter()
            .map(|item| Geometry::from_wkt(item, 0))
            .collect::<Result<Vec<Geometry>>>()?;
        Self::with_srid(geometries, srid)
    }
}
