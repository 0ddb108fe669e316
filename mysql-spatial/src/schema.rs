//! Table definitions rendered as MySQL DDL, including spatial columns and indexes.

use crate::geometry::GeometryKind;
use crate::query::Grammar;
use crate::result::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// The MySQL spatial column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialType {
    Geometry,
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl SpatialType {
    pub fn sql_name(&self) -> &'static str {
        match self {
            SpatialType::Geometry => "geometry",
            SpatialType::Point => "point",
            SpatialType::LineString => "linestring",
            SpatialType::Polygon => "polygon",
            SpatialType::MultiPoint => "multipoint",
            SpatialType::MultiLineString => "multilinestring",
            SpatialType::MultiPolygon => "multipolygon",
            SpatialType::GeometryCollection => "geometrycollection",
        }
    }
}

impl From<GeometryKind> for SpatialType {
    fn from(kind: GeometryKind) -> Self {
        match kind {
            GeometryKind::Point => SpatialType::Point,
            GeometryKind::LineString => SpatialType::LineString,
            GeometryKind::Polygon => SpatialType::Polygon,
            GeometryKind::MultiPoint => SpatialType::MultiPoint,
            GeometryKind::MultiLineString => SpatialType::MultiLineString,
            GeometryKind::MultiPolygon => SpatialType::MultiPolygon,
            GeometryKind::GeometryCollection => SpatialType::GeometryCollection,
        }
    }
}

impl fmt::Display for SpatialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// Parses the type names MySQL reports, which spell geometry collections either way
/// depending on the server version.
impl FromStr for SpatialType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "geometry" => Ok(SpatialType::Geometry),
            "point" => Ok(SpatialType::Point),
            "linestring" => Ok(SpatialType::LineString),
            "polygon" => Ok(SpatialType::Polygon),
            "multipoint" => Ok(SpatialType::MultiPoint),
            "multilinestring" => Ok(SpatialType::MultiLineString),
            "multipolygon" => Ok(SpatialType::MultiPolygon),
            "geometrycollection" | "geomcollection" => Ok(SpatialType::GeometryCollection),
            other => Err(Error::ParseError(format!(
                "{} is not a spatial column type",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Auto incrementing unsigned primary key.
    Increments,
    Integer,
    BigInteger,
    Double,
    Boolean,
    String(u32),
    Timestamp,
    Spatial {
        kind: SpatialType,
        srid: Option<u32>,
    },
}

impl ColumnType {
    pub fn is_spatial(&self) -> bool {
        matches!(self, ColumnType::Spatial { .. })
    }

    fn sql(&self) -> String {
        match self {
            ColumnType::Increments => "int unsigned".to_string(),
            ColumnType::Integer => "int".to_string(),
            ColumnType::BigInteger => "bigint".to_string(),
            ColumnType::Double => "double".to_string(),
            ColumnType::Boolean => "tinyint(1)".to_string(),
            ColumnType::String(length) => format!("varchar({})", length),
            ColumnType::Timestamp => "timestamp".to_string(),
            // the versioned comment keeps the DDL valid on servers before 8.0.3
            ColumnType::Spatial {
                kind,
                srid: Some(srid),
            } if *srid != 0 => format!("{} /*!80003 SRID {} */", kind, srid),
            // SRID 0 leaves the column unconstrained
            ColumnType::Spatial { kind, .. } => kind.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Create,
    Alter,
    DropIfExists,
}

/// A table definition, in the manner of a migration.
///
/// ```
/// use mysql_spatial::schema::Blueprint;
/// use mysql_spatial::query::Grammar;
///
/// let mut table = Blueprint::create("geometry");
/// table.increments("id");
/// table.point("location", None);
/// table.polygon("shape", Some(3857)).nullable();
/// table.spatial_index("location");
///
/// let statements = table.to_sql(&Grammar::default());
/// assert_eq!(statements.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    table: String,
    action: Action,
    columns: Vec<ColumnDefinition>,
    spatial_indexes: Vec<String>,
    engine: Option<String>,
}

impl Blueprint {
    fn new(table: impl Into<String>, action: Action) -> Self {
        Blueprint {
            table: table.into(),
            action,
            columns: Vec::new(),
            spatial_indexes: Vec::new(),
            engine: None,
        }
    }

    pub fn create(table: impl Into<String>) -> Self {
        Self::new(table, Action::Create)
    }

    /// Add columns and indexes to an existing table.
    pub fn table(table: impl Into<String>) -> Self {
        Self::new(table, Action::Alter)
    }

    pub fn drop_if_exists(table: impl Into<String>) -> Self {
        Self::new(table, Action::DropIfExists)
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn spatial_indexes(&self) -> &[String] {
        &self.spatial_indexes
    }

    pub fn add_column(&mut self, name: &str, column_type: ColumnType, nullable: bool) -> &mut Self {
        self.columns.push(ColumnDefinition {
            name: name.to_string(),
            column_type,
            nullable,
        });
        self
    }

    /// Make the most recently added column nullable.
    pub fn nullable(&mut self) -> &mut Self {
        if let Some(column) = self.columns.last_mut() {
            column.nullable = true;
        }
        self
    }

    pub fn engine(&mut self, engine: &str) -> &mut Self {
        self.engine = Some(engine.to_string());
        self
    }

    pub fn increments(&mut self, name: &str) -> &mut Self {
        self.add_column(name, ColumnType::Increments, false)
    }

    pub fn integer(&mut self, name: &str) -> &mut Self {
        self.add_column(name, ColumnType::Integer, false)
    }

    pub fn big_integer(&mut self, name: &str) -> &mut Self {
        self.add_column(name, ColumnType::BigInteger, false)
    }

    pub fn double(&mut self, name: &str) -> &mut Self {
        self.add_column(name, ColumnType::Double, false)
    }

    pub fn boolean(&mut self, name: &str) -> &mut Self {
        self.add_column(name, ColumnType::Boolean, false)
    }

    pub fn string(&mut self, name: &str, length: u32) -> &mut Self {
        self.add_column(name, ColumnType::String(length), false)
    }

    /// Nullable `created_at` and `updated_at` columns.
    pub fn timestamps(&mut self) -> &mut Self {
        self.add_column("created_at", ColumnType::Timestamp, true);
        self.add_column("updated_at", ColumnType::Timestamp, true)
    }

    pub fn spatial(&mut self, name: &str, kind: SpatialType, srid: Option<u32>) -> &mut Self {
        self.add_column(name, ColumnType::Spatial { kind, srid }, false)
    }

    pub fn geometry(&mut self, name: &str, srid: Option<u32>) -> &mut Self {
        self.spatial(name, SpatialType::Geometry, srid)
    }

    pub fn point(&mut self, name: &str, srid: Option<u32>) -> &mut Self {
        self.spatial(name, SpatialType::Point, srid)
    }

    pub fn line_string(&mut self, name: &str, srid: Option<u32>) -> &mut Self {
        self.spatial(name, SpatialType::LineString, srid)
    }

    pub fn polygon(&mut self, name: &str, srid: Option<u32>) -> &mut Self {
        self.spatial(name, SpatialType::Polygon, srid)
    }

    pub fn multi_point(&mut self, name: &str, srid: Option<u32>) -> &mut Self {
        self.spatial(name, SpatialType::MultiPoint, srid)
    }

    pub fn multi_line_string(&mut self, name: &str, srid: Option<u32>) -> &mut Self {
        self.spatial(name, SpatialType::MultiLineString, srid)
    }

    pub fn multi_polygon(&mut self, name: &str, srid: Option<u32>) -> &mut Self {
        self.spatial(name, SpatialType::MultiPolygon, srid)
    }

    pub fn geometry_collection(&mut self, name: &str, srid: Option<u32>) -> &mut Self {
        self.spatial(name, SpatialType::GeometryCollection, srid)
    }

    /// Index a spatial column. MySQL requires the column to be `not null`.
    pub fn spatial_index(&mut self, column: &str) -> &mut Self {
        self.spatial_indexes.push(column.to_string());
        self
    }

    fn compile_column(&self, grammar: &Grammar, column: &ColumnDefinition) -> String {
        let mut sql = format!("{} {}", grammar.wrap(&column.name), column.column_type.sql());
        if column.column_type == ColumnType::Increments {
            sql.push_str(" not null auto_increment primary key");
        } else if column.nullable {
            sql.push_str(" null");
        } else {
            sql.push_str(" not null");
        }
        sql
    }

    fn compile_spatial_index(&self, grammar: &Grammar, column: &str) -> String {
        let index = format!("{}_{}_spatialindex", self.table, column).to_lowercase();
        format!(
            "alter table {} add spatial index {}({})",
            grammar.wrap(&self.table),
            grammar.wrap(&index),
            grammar.wrap(column)
        )
    }

    /// The statements that apply this blueprint, in execution order.
    pub fn to_sql(&self, grammar: &Grammar) -> Vec<String> {
        let table = grammar.wrap(&self.table);
        let mut statements = Vec::new();
        match self.action {
            Action::DropIfExists => {
                statements.push(format!("drop table if exists {}", table));
                return statements;
            }
            Action::Create => {
                let columns = self
                    .columns
                    .iter()
                    .map(|c| self.compile_column(grammar, c))
                    .collect::<Vec<String>>()
                    .join(", ");
                let mut sql = format!("create table {} ({})", table, columns);
                if let Some(engine) = &self.engine {
                    sql.push_str(&format!(" engine = {}", engine));
                }
                statements.push(sql);
            }
            Action::Alter => {
                if !self.columns.is_empty() {
                    let columns = self
                        .columns
                        .iter()
                        .map(|c| format!("add {}", self.compile_column(grammar, c)))
                        .collect::<Vec<String>>()
                        .join(", ");
                    statements.push(format!("alter table {} {}", table, columns));
                }
            }
        }
        for column in &self.spatial_indexes {
            statements.push(self.compile_spatial_index(grammar, column));
        }
        tracing::trace!(table = %self.table, statements = statements.len(), "compiled blueprint");
        statements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_table_with_all_spatial_types() {
        let mut table = Blueprint::create("geometry");
        table.increments("id");
        table.geometry("geo", None).nullable();
        table.point("location", None);
        table.line_string("line", None).nullable();
        table.polygon("shape", None).nullable();
        table.multi_point("multi_locations", None).nullable();
        table.multi_line_string("multi_lines", None).nullable();
        table.multi_polygon("multi_shapes", None).nullable();
        table.geometry_collection("multi_geometries", None).nullable();
        table.timestamps();
        table.spatial_index("location");
        table.engine("MyISAM");

        let statements = table.to_sql(&Grammar::default());
        assert_eq!(
            statements,
            vec![
                "create table `geometry` (`id` int unsigned not null auto_increment primary key, \
                 `geo` geometry null, `location` point not null, `line` linestring null, \
                 `shape` polygon null, `multi_locations` multipoint null, \
                 `multi_lines` multilinestring null, `multi_shapes` multipolygon null, \
                 `multi_geometries` geometrycollection null, `created_at` timestamp null, \
                 `updated_at` timestamp null) engine = MyISAM"
                    .to_string(),
                "alter table `geometry` add spatial index `geometry_location_spatialindex`(`location`)"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn create_table_with_srid() {
        let mut table = Blueprint::create("with_srid");
        table.increments("id");
        table.geometry("geo", Some(3857)).nullable();
        table.point("location", Some(3857)).nullable();
        let statements = table.to_sql(&Grammar::default());
        assert_eq!(
            statements[0],
            "create table `with_srid` (`id` int unsigned not null auto_increment primary key, \
             `geo` geometry /*!80003 SRID 3857 */ null, `location` point /*!80003 SRID 3857 */ null)"
        );
        assert_eq!(statements.len(), 1);

        let mut unconstrained = Blueprint::create("t");
        unconstrained.point("p", Some(0));
        unconstrained.polygon("q", None);
        assert_eq!(
            unconstrained.to_sql(&Grammar::default())[0],
            "create table `t` (`p` point not null, `q` polygon not null)"
        );
    }

    #[test]
    fn alter_table() {
        let mut table = Blueprint::table("geometry");
        table.string("name", 255).nullable();
        table.double("score");
        let statements = table.to_sql(&Grammar::default());
        assert_eq!(
            statements,
            vec!["alter table `geometry` add `name` varchar(255) null, add `score` double not null"
                .to_string()]
        );

        let mut index_only = Blueprint::table("geometry");
        index_only.spatial_index("shape");
        assert_eq!(
            index_only.to_sql(&Grammar::default()),
            vec!["alter table `geometry` add spatial index `geometry_shape_spatialindex`(`shape`)"
                .to_string()]
        );
    }

    #[test]
    fn drop_if_exists() {
        assert_eq!(
            Blueprint::drop_if_exists("geometry").to_sql(&Grammar::default()),
            vec!["drop table if exists `geometry`".to_string()]
        );
    }

    #[test]
    fn spatial_type_names() {
        assert_eq!(
            "geomcollection".parse::<SpatialType>().unwrap(),
            SpatialType::GeometryCollection
        );
        assert_eq!(
            "GEOMETRYCOLLECTION".parse::<SpatialType>().unwrap(),
            SpatialType::GeometryCollection
        );
        assert_eq!("point".parse::<SpatialType>().unwrap(), SpatialType::Point);
        assert!("varchar".parse::<SpatialType>().is_err());
        assert_eq!(
            SpatialType::from(GeometryKind::MultiPolygon).sql_name(),
            "multipolygon"
        );
    }

    #[test]
    fn nullable_only_touches_last_column() {
        let mut table = Blueprint::create("t");
        table.integer("a");
        table.boolean("b").nullable();
        assert!(!table.columns()[0].nullable);
        assert!(table.columns()[1].nullable);
        assert!(!table.columns()[0].column_type.is_spatial());
    }
}
