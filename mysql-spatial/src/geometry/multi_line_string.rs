use super::collection::impl_collection;
use super::{LineString, PointCollection};
use crate::result::Result;
use crate::wkt;

#[derive(Debug, Clone)]
pub struct MultiLineString {
    items: Vec<LineString>,
    srid: u32,
}

impl_collection!(MultiLineString, LineString, 1);

impl MultiLineString {
    pub fn line_strings(&self) -> &[LineString] {
        &self.items
    }

    pub fn to_wkt(&self) -> String {
        format!("MULTILINESTRING({})", self.wkt_body())
    }

    pub fn from_wkt(text: &str, srid: u32) -> Result<Self> {
        Self::from_wkt_body(wkt::strip_keyword(text, "MULTILINESTRING")?, srid)
    }

    pub(crate) fn wkt_body(&self) -> String {
        self.items
            .iter()
            .map(|ls| format!("({})", ls.to_pair_list()))
            .collect::<Vec<String>>()
            .join(",")
    }

    pub(crate) fn from_wkt_body(body: &str, srid: u32) -> Result<Self> {
        let lines = wkt::split_top_level(body)?
            .into_iter()
            .map(|item| LineString::from_wkt_body(wkt::strip_parens(item)?, 0))
            .collect::<Result<Vec<LineString>>>()?;
        Self::with_srid(lines, srid)
    }
}
