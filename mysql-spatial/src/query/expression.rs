use super::{Binding, Grammar};
use crate::geometry::Geometry;

/// A geometry that is only turned into SQL when the statement is compiled.
///
/// The grammar renders it as `ST_GeomFromText(?, ?)` (plus the configured axis order)
/// and it contributes its WKT and SRID as the two bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialExpression {
    geometry: Geometry,
}

impl SpatialExpression {
    pub fn new(geometry: impl Into<Geometry>) -> Self {
        SpatialExpression {
            geometry: geometry.into(),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn spatial_value(&self) -> String {
        self.geometry.to_wkt()
    }

    pub fn srid(&self) -> u32 {
        self.geometry.srid()
    }

    pub fn bindings(&self) -> [Binding; 2] {
        [
            Binding::Text(self.spatial_value()),
            Binding::from(self.srid()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// SQL text, with a binding for each `?` it contains.
    Raw(String, Vec<Binding>),
    /// An identifier, wrapped by the grammar.
    Column(String),
    /// A single `?`.
    Placeholder(Binding),
    Spatial(SpatialExpression),
}

/// A fragment of SQL built from segments and compiled by a [`Grammar`].
///
/// Bindings are returned in the order their placeholders appear in the text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    segments: Vec<Segment>,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Self::raw_with_bindings(sql, Vec::new())
    }

    pub fn raw_with_bindings(sql: impl Into<String>, bindings: Vec<Binding>) -> Self {
        Expression::new().push_raw_with_bindings(sql, bindings)
    }

    pub fn spatial(geometry: impl Into<Geometry>) -> Self {
        Expression::new().push_spatial(geometry)
    }

    pub fn push_raw(self, sql: impl Into<String>) -> Self {
        self.push_raw_with_bindings(sql, Vec::new())
    }

    pub fn push_raw_with_bindings(mut self, sql: impl Into<String>, bindings: Vec<Binding>) -> Self {
        self.segments.push(Segment::Raw(sql.into(), bindings));
        self
    }

    pub fn push_column(mut self, column: impl Into<String>) -> Self {
        self.segments.push(Segment::Column(column.into()));
        self
    }

    pub fn push_binding(mut self, binding: impl Into<Binding>) -> Self {
        self.segments.push(Segment::Placeholder(binding.into()));
        self
    }

    pub fn push_spatial(mut self, geometry: impl Into<Geometry>) -> Self {
        self.segments
            .push(Segment::Spatial(SpatialExpression::new(geometry)));
        self
    }

    pub fn append(mut self, other: Expression) -> Self {
        self.segments.extend(other.segments);
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether any segment defers a geometry.
    pub fn is_spatial(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Spatial(_)))
    }

    pub fn to_sql(&self, grammar: &Grammar) -> String {
        grammar.compile_expression(self)
    }

    pub fn bindings(&self) -> Vec<Binding> {
        let mut bindings = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::Raw(_, b) => bindings.extend(b.iter().cloned()),
                Segment::Column(_) => {}
                Segment::Placeholder(b) => bindings.push(b.clone()),
                Segment::Spatial(e) => bindings.extend(e.bindings()),
            }
        }
        bindings
    }
}

impl From<&str> for Expression {
    fn from(sql: &str) -> Self {
        Expression::raw(sql)
    }
}

impl From<String> for Expression {
    fn from(sql: String) -> Self {
        Expression::raw(sql)
    }
}

impl From<SpatialExpression> for Expression {
    fn from(e: SpatialExpression) -> Self {
        Expression {
            segments: vec![Segment::Spatial(e)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn spatial_expression_bindings() {
        let e = SpatialExpression::new(Point::with_srid(1.0, 2.0, 4326));
        assert_eq!(e.spatial_value(), "POINT(2 1)");
        assert_eq!(
            e.bindings(),
            [Binding::Text("POINT(2 1)".to_string()), Binding::Integer(4326)]
        );
    }

    #[test]
    fn bindings_follow_text_order() {
        let expression = Expression::raw_with_bindings("a = ? and ", vec![Binding::Integer(1)])
            .push_raw("st_distance(")
            .push_column("point")
            .push_raw(", ")
            .push_spatial(Point::new(1.0, 2.0))
            .push_raw(") <= ")
            .push_binding(10.0);
        assert!(expression.is_spatial());
        assert_eq!(
            expression.bindings(),
            vec![
                Binding::Integer(1),
                Binding::Text("POINT(2 1)".to_string()),
                Binding::Integer(0),
                Binding::Real(10.0),
            ]
        );
        assert_eq!(
            expression.to_sql(&Grammar::default()),
            "a = ? and st_distance(`point`, ST_GeomFromText(?, ?, 'axis-order=long-lat')) <= ?"
        );
    }

    #[test]
    fn raw_text_is_not_spatial() {
        let expression = Expression::from("count(*) as total");
        assert!(!expression.is_spatial());
        assert!(expression.bindings().is_empty());
        assert_eq!(expression.to_sql(&Grammar::default()), "count(*) as total");
    }
}
