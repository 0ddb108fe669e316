use super::collection::impl_collection;
use super::Polygon;
use crate::result::Result;
use crate::wkt;

#[derive(Debug, Clone)]
pub struct MultiPolygon {
    items: Vec<Polygon>,
    srid: u32,
}

impl_collection!(MultiPolygon, Polygon, 1);

impl MultiPolygon {
    pub fn polygons(&self) -> &[Polygon] {
        &self.items
    }

    pub fn to_wkt(&self) -> String {
        format!("MULTIPOLYGON({})", self.wkt_body())
    }

    pub fn from_wkt(text: &str, srid: u32) -> Result<Self> {
        Self::from_wkt_body(wkt::strip_keyword(text, "MULTIPOLYGON")?, srid)
    }

    pub(crate) fn wkt_body(&self) -> String {
        self.items
            .iter()
            .map(|polygon| format!("({})", polygon.wkt_body()))
            .collect::<Vec<String>>()
            .join(",")
    }

    pub(crate) fn from_wkt_body(body: &str, srid: u32) -> Result<Self> {
        let polygons = wkt::split_top_level(body)?
            .into_iter()
            .map(|item| Polygon::from_wkt_body(wkt::strip_parens(item)?, 0))
            .collect::<Result<Vec<Polygon>>>()?;
        Self::with_srid(polygons, srid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Error;

    #[test]
    fn round_trips_through_wkt() {
        let text = "MULTIPOLYGON(((0 10,10 10,10 0,0 0,0 10)),((0 0,0 5,5 5,5 0,0 0),(1 1,2 1,2 2,1 1)))";
        let mp = MultiPolygon::from_wkt(text, 0).unwrap();
        assert_eq!(mp.len(), 2);
        assert_eq!(mp.polygons()[1].interiors().len(), 1);
        assert_eq!(mp.to_wkt(), text);
    }

    #[test]
    fn built_from_polygons() {
        let mp = MultiPolygon::new(vec![
            Polygon::from_wkt("POLYGON((0 10,10 10,10 0,0 0,0 10))", 0).unwrap(),
            Polygon::from_wkt("POLYGON((0 0,0 5,5 5,5 0,0 0))", 0).unwrap(),
        ])
        .unwrap();
        assert_eq!(
            mp.to_wkt(),
            "MULTIPOLYGON(((0 10,10 10,10 0,0 0,0 10)),((0 0,0 5,5 5,5 0,0 0)))"
        );
    }

    #[test]
    fn requires_one_polygon() {
        assert!(matches!(
            MultiPolygon::new(vec![]).unwrap_err(),
            Error::InvalidItemCount { minimum: 1, .. }
        ));
    }

    #[test]
    fn wrong_nesting_depth() {
        assert!(MultiPolygon::from_wkt("MULTIPOLYGON((0 0,1 1,1 0,0 0))", 0).is_err());
    }
}
