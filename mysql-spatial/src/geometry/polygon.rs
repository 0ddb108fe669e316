use super::collection::impl_collection;
use super::{CollectionItem, Geometry, LineString, PointCollection};
use crate::result::Result;
use crate::wkt;

/// One or more rings. The first ring is the exterior boundary, any following ones are holes.
#[derive(Debug, Clone)]
pub struct Polygon {
    items: Vec<LineString>,
    srid: u32,
}

impl_collection!(Polygon, LineString, 1);

impl Polygon {
    pub fn line_strings(&self) -> &[LineString] {
        &self.items
    }

    pub fn exterior(&self) -> &LineString {
        &self.items[0]
    }

    pub fn interiors(&self) -> &[LineString] {
        &self.items[1..]
    }

    pub fn to_wkt(&self) -> String {
        format!("POLYGON({})", self.wkt_body())
    }

    pub fn from_wkt(text: &str, srid: u32) -> Result<Self> {
        Self::from_wkt_body(wkt::strip_keyword(text, "POLYGON")?, srid)
    }

    pub(crate) fn wkt_body(&self) -> String {
        self.items
            .iter()
            .map(|ring| format!("({})", ring.to_pair_list()))
            .collect::<Vec<String>>()
            .join(",")
    }

    pub(crate) fn from_wkt_body(body: &str, srid: u32) -> Result<Self> {
        let rings = wkt::split_top_level(body)?
            .into_iter()
            .map(|ring| LineString::from_wkt_body(wkt::strip_parens(ring)?, 0))
            .collect::<Result<Vec<LineString>>>()?;
        Self::with_srid(rings, srid)
    }
}

impl CollectionItem for Polygon {
    const TYPE_NAME: &'static str = "Polygon";

    fn from_geometry(geometry: Geometry) -> std::result::Result<Self, Geometry> {
        match geometry {
            Geometry::Polygon(p) => Ok(p),
            other => Err(other),
        }
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.same_items(other)
    }
}
