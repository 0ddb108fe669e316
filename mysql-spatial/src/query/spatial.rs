//! MySQL spatial scopes for [`Builder`].
//!
//! Every scope checks its column against the model's spatial fields first, then appends
//! a clause that calls an `ST_*` function with the geometry as a deferred
//! `ST_GeomFromText(?, ?)` argument.

use super::builder::{Builder, SpatialGuard};
use super::{Direction, Expression};
use crate::geometry::Geometry;
use crate::result::{Error, Result};

/// `<function>(<column>, ST_GeomFromText(?, ?))`
fn spatial_call(function: &str, column: &str, geometry: Geometry) -> Expression {
    Expression::raw(format!("{}(", function))
        .push_column(column)
        .push_raw(", ")
        .push_spatial(geometry)
        .push_raw(")")
}

impl Builder {
    fn check_spatial_column(&self, column: &str) -> Result<()> {
        match &self.guard {
            SpatialGuard::Any => Ok(()),
            SpatialGuard::Model { name, fields } => {
                if fields.is_empty() {
                    return Err(Error::SpatialFieldsNotDefined { model: *name });
                }
                let field = column.rsplit('.').next().unwrap_or(column);
                if !fields.iter().any(|f| f == field) {
                    return Err(Error::NotASpatialField {
                        model: *name,
                        column: column.to_string(),
                    });
                }
                Ok(())
            }
        }
    }

    /// `st_<relation>(column, geometry)`. The relation is not validated, MySQL rejects
    /// functions it does not know.
    pub fn comparison(
        self,
        column: &str,
        geometry: impl Into<Geometry>,
        relation: &str,
    ) -> Result<Self> {
        self.check_spatial_column(column)?;
        let function = format!("st_{}", relation.to_lowercase());
        Ok(self.where_expression(spatial_call(&function, column, geometry.into())))
    }

    pub fn within(self, column: &str, geometry: impl Into<Geometry>) -> Result<Self> {
        self.comparison(column, geometry, "within")
    }

    pub fn crosses(self, column: &str, geometry: impl Into<Geometry>) -> Result<Self> {
        self.comparison(column, geometry, "crosses")
    }

    pub fn contains(self, column: &str, geometry: impl Into<Geometry>) -> Result<Self> {
        self.comparison(column, geometry, "contains")
    }

    pub fn disjoint(self, column: &str, geometry: impl Into<Geometry>) -> Result<Self> {
        self.comparison(column, geometry, "disjoint")
    }

    pub fn equals(self, column: &str, geometry: impl Into<Geometry>) -> Result<Self> {
        self.comparison(column, geometry, "equals")
    }

    pub fn intersects(self, column: &str, geometry: impl Into<Geometry>) -> Result<Self> {
        self.comparison(column, geometry, "intersects")
    }

    pub fn overlaps(self, column: &str, geometry: impl Into<Geometry>) -> Result<Self> {
        self.comparison(column, geometry, "overlaps")
    }

    pub fn does_touch(self, column: &str, geometry: impl Into<Geometry>) -> Result<Self> {
        self.comparison(column, geometry, "touches")
    }

    fn distance_within(
        self,
        function: &str,
        column: &str,
        geometry: Geometry,
        distance: f64,
        exclude_self: bool,
    ) -> Result<Self> {
        self.check_spatial_column(column)?;
        let within = spatial_call(function, column, geometry.clone())
            .push_raw(" <= ")
            .push_binding(distance);
        let builder = self.where_expression(within);
        if !exclude_self {
            return Ok(builder);
        }
        let not_self = spatial_call(function, column, geometry).push_raw(" != 0");
        Ok(builder.where_expression(not_self))
    }

    /// Rows whose `column` lies within `distance` of `geometry`, in the units of the SRID.
    pub fn distance(self, column: &str, geometry: impl Into<Geometry>, distance: f64) -> Result<Self> {
        self.distance_within("st_distance", column, geometry.into(), distance, false)
    }

    /// As [`Builder::distance`], leaving out rows at distance zero.
    pub fn distance_excluding_self(
        self,
        column: &str,
        geometry: impl Into<Geometry>,
        distance: f64,
    ) -> Result<Self> {
        self.distance_within("st_distance", column, geometry.into(), distance, true)
    }

    /// Rows within `distance` meters on a sphere.
    pub fn distance_sphere(
        self,
        column: &str,
        geometry: impl Into<Geometry>,
        distance: f64,
    ) -> Result<Self> {
        self.distance_within("st_distance_sphere", column, geometry.into(), distance, false)
    }

    pub fn distance_sphere_excluding_self(
        self,
        column: &str,
        geometry: impl Into<Geometry>,
        distance: f64,
    ) -> Result<Self> {
        self.distance_within("st_distance_sphere", column, geometry.into(), distance, true)
    }

    fn select_distance(self, function: &str, column: &str, geometry: Geometry) -> Result<Self> {
        self.check_spatial_column(column)?;
        let expression = spatial_call(function, column, geometry).push_raw(" as distance");
        Ok(self.add_select_raw(expression))
    }

    /// Select `st_distance(column, geometry) as distance` next to the other columns.
    pub fn distance_value(self, column: &str, geometry: impl Into<Geometry>) -> Result<Self> {
        self.select_distance("st_distance", column, geometry.into())
    }

    pub fn distance_sphere_value(self, column: &str, geometry: impl Into<Geometry>) -> Result<Self> {
        self.select_distance("st_distance_sphere", column, geometry.into())
    }

    /// Order by `function(column, geometry)`, where `function` must be one of the
    /// configured ordering functions.
    pub fn order_by_spatial(
        self,
        column: &str,
        geometry: impl Into<Geometry>,
        function: &str,
        direction: Direction,
    ) -> Result<Self> {
        if !self.grammar.config().is_ordering_function(function) {
            return Err(Error::UnknownSpatialFunction(function.to_string()));
        }
        self.check_spatial_column(column)?;
        let expression = spatial_call(&function.to_lowercase(), column, geometry.into())
            .push_raw(format!(" {}", direction));
        Ok(self.order_by_raw(expression))
    }

    pub fn order_by_distance(
        self,
        column: &str,
        geometry: impl Into<Geometry>,
        direction: Direction,
    ) -> Result<Self> {
        self.order_by_spatial(column, geometry, "st_distance", direction)
    }

    pub fn order_by_distance_sphere(
        self,
        column: &str,
        geometry: impl Into<Geometry>,
        direction: Direction,
    ) -> Result<Self> {
        self.order_by_spatial(column, geometry, "st_distance_sphere", direction)
    }
}
