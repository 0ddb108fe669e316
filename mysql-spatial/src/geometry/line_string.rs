use super::collection::{impl_collection, impl_point_collection};
use super::{CollectionItem, Geometry, Point, PointCollection};
use crate::result::Result;
use crate::wkt;

/// An ordered sequence of at least two points.
#[derive(Debug, Clone)]
pub struct LineString {
    items: Vec<Point>,
    srid: u32,
}

impl_collection!(LineString, Point, 2);
impl_point_collection!(LineString);

impl LineString {
    pub fn to_wkt(&self) -> String {
        format!("LINESTRING({})", self.wkt_body())
    }

    pub fn from_wkt(text: &str, srid: u32) -> Result<Self> {
        Self::from_wkt_body(wkt::strip_keyword(text, "LINESTRING")?, srid)
    }

    pub(crate) fn wkt_body(&self) -> String {
        self.to_pair_list()
    }

    pub(crate) fn from_wkt_body(body: &str, srid: u32) -> Result<Self> {
        let points = wkt::split_top_level(body)?
            .into_iter()
            .map(|pair| Point::from_pair(pair, 0))
            .collect::<Result<Vec<Point>>>()?;
        Self::with_srid(points, srid)
    }

    /// Whether the last point repeats the first one.
    pub fn is_closed(&self) -> bool {
        match (self.items.first(), self.items.last()) {
            (Some(first), Some(last)) => first.same_position(last),
            _ => false,
        }
    }
}

impl CollectionItem for LineString {
    const TYPE_NAME: &'static str = "LineString";

    fn from_geometry(geometry: Geometry) -> std::result::Result<Self, Geometry> {
        match geometry {
            Geometry::LineString(ls) => Ok(ls),
            other => Err(other),
        }
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.same_items(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Error;

    fn line() -> LineString {
        LineString::new(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]).unwrap()
    }

    #[test]
    fn to_wkt() {
        assert_eq!(line().to_wkt(), "LINESTRING(1 1,2 2)");
        let ls = LineString::new(vec![Point::new(2.0, 1.0), Point::new(3.0, 2.0)]).unwrap();
        assert_eq!(ls.to_wkt(), "LINESTRING(1 2,2 3)");
    }

    #[test]
    fn from_wkt() {
        let ls = LineString::from_wkt("LINESTRING(0 0,1 1,1 2)", 0).unwrap();
        assert_eq!(ls.len(), 3);
        assert_eq!(ls[2], Point::new(2.0, 1.0));
        assert_eq!(LineString::from_wkt(&ls.to_wkt(), 0).unwrap(), ls);
    }

    #[test]
    fn requires_two_points() {
        let err = LineString::new(vec![Point::new(1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidItemCount { minimum: 2, .. }));
        assert!(LineString::from_wkt("LINESTRING(1 1)", 0).is_err());
    }

    #[test]
    fn rejects_non_points() {
        let mut ls = line();
        let err = ls.try_push(line()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidItemType {
                expected: "Point",
                found: "LineString",
                ..
            }
        ));
        assert!(ls.set(0, line()).is_err());
        assert_eq!(ls.len(), 2);

        ls.try_push(Point::new(3.0, 3.0)).unwrap();
        assert_eq!(ls.len(), 3);
    }

    #[test]
    fn remove_keeps_minimum() {
        let mut ls = line();
        ls.push(Point::new(3.0, 3.0));
        assert_eq!(ls.remove(0).unwrap(), Point::new(1.0, 1.0));
        assert!(matches!(
            ls.remove(0).unwrap_err(),
            Error::InvalidItemCount { .. }
        ));
        assert!(matches!(
            ls.remove(5).unwrap_err(),
            Error::IndexOutOfBounds { index: 5, len: 2 }
        ));
    }

    #[test]
    fn point_collection_helpers() {
        let mut ls = line();
        ls.prepend_point(Point::new(0.0, 0.0));
        ls.append_point(Point::new(3.0, 3.0));
        ls.insert_point(1, Point::new(0.5, 0.5)).unwrap();
        assert_eq!(ls.to_pair_list(), "0 0,0.5 0.5,1 1,2 2,3 3");
        assert!(ls.insert_point(5, Point::new(9.0, 9.0)).is_err());
        assert_eq!(ls.points().len(), 5);
    }

    #[test]
    fn closed_rings() {
        assert!(!line().is_closed());
        let ring = LineString::from_wkt("LINESTRING(0 0,1 0,1 1,0 0)", 0).unwrap();
        assert!(ring.is_closed());
    }

    #[test]
    fn iteration() {
        let ls = line();
        let lats: Vec<f64> = ls.iter().map(Point::lat).collect();
        assert_eq!(lats, vec![1.0, 2.0]);
        let owned: Vec<Point> = ls.into_iter().collect();
        assert_eq!(owned.len(), 2);
    }
}
