//! Configuration for the spatial SQL grammar.

use crate::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Axis order passed as the third argument of `ST_GeomFromText`.
///
/// MySQL 8 reads geographic SRIDs latitude first unless told otherwise. The WKT bound by
/// this crate is always longitude first, so the only order it can pass is long-lat, and
/// MySQL 5.7 takes no option at all (`axis_order: None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AxisOrder {
    LongLat,
}

impl AxisOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisOrder::LongLat => "long-lat",
        }
    }
}

impl fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AxisOrder {
    type Err = crate::result::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "long-lat" => Ok(AxisOrder::LongLat),
            other => Err(crate::result::Error::ParseError(format!(
                "unsupported axis order {}, geometries are bound as long-lat",
                other
            ))),
        }
    }
}

/// Settings shared by every statement a [`Grammar`](crate::query::Grammar) compiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Axis order option added to `ST_GeomFromText`, `None` leaves it out (MySQL 5.7).
    /// Default: long-lat
    pub axis_order: Option<AxisOrder>,

    /// Functions accepted by `order_by_spatial`, compared case-insensitively.
    /// Default: st_distance, st_distance_sphere
    pub ordering_functions: Vec<String>,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            axis_order: Some(AxisOrder::LongLat),
            ordering_functions: vec!["st_distance".to_string(), "st_distance_sphere".to_string()],
        }
    }
}

impl SpatialConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SpatialConfig = serde_json::from_str(json)?;
        tracing::debug!(
            axis_order = ?config.axis_order,
            functions = config.ordering_functions.len(),
            "loaded spatial config"
        );
        Ok(config)
    }

    pub fn is_ordering_function(&self, function: &str) -> bool {
        self.ordering_functions
            .iter()
            .any(|f| f.eq_ignore_ascii_case(function))
    }
}
