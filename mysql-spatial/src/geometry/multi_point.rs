use super::collection::{impl_collection, impl_point_collection};
use super::Point;
use crate::result::Result;
use crate::wkt;

#[derive(Debug, Clone)]
pub struct MultiPoint {
    items: Vec<Point>,
    srid: u32,
}

impl_collection!(MultiPoint, Point, 1);
impl_point_collection!(MultiPoint);

impl MultiPoint {
    pub fn to_wkt(&self) -> String {
        format!("MULTIPOINT({})", self.wkt_body())
    }

    pub fn from_wkt(text: &str, srid: u32) -> Result<Self> {
        Self::from_wkt_body(wkt::strip_keyword(text, "MULTIPOINT")?, srid)
    }

    pub(crate) fn wkt_body(&self) -> String {
        self.items
            .iter()
            .map(|p| format!("({})", p.to_pair()))
            .collect::<Vec<String>>()
            .join(",")
    }

    // both `(1 2),(3 4)` and `1 2,3 4` are valid member lists
    pub(crate) fn from_wkt_body(body: &str, srid: u32) -> Result<Self> {
        let points = wkt::split_top_level(body)?
            .into_iter()
            .map(|item| {
                let pair = if item.starts_with('(') {
                    wkt::strip_parens(item)?
                } else {
                    item
                };
                Point::from_pair(pair, 0)
            })
            .collect::<Result<Vec<Point>>>()?;
        Self::with_srid(points, srid)
    }
}
