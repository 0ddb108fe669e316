use crate::query::{Builder, CompiledQuery, Value};
use crate::result::{Error, Result};
use crate::schema::Blueprint;
use rusqlite::{Connection, Row};

/// A struct persisted as one row of a table with spatial columns.
///
/// Usually derived with `#[derive(SpatialModel)]`:
///
/// ```ignore
/// #[derive(SpatialModel)]
/// #[table_name = "geometry"]
/// struct GeometryModel {
///     id: Option<i64>,
///     #[spatial_field]
///     location: Point,
///     #[spatial_field(srid = 3857)]
///     shape: Option<Polygon>,
/// }
/// ```
///
/// Queries started from [`SpatialModel::query`] only accept the declared spatial fields
/// in their spatial scopes.
pub trait SpatialModel: Sized {
    const MODEL_NAME: &'static str;
    const TABLE_NAME: &'static str;
    const PRIMARY_KEY: &'static str;
    /// Every column, primary key included.
    const COLUMNS: &'static [&'static str];
    const SPATIAL_FIELDS: &'static [&'static str];

    fn key(&self) -> Option<i64>;

    fn set_key(&mut self, key: i64);

    /// Column values without the primary key, in column order.
    fn attributes(&self) -> Vec<(&'static str, Value)>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn blueprint() -> Blueprint;

    fn spatial_fields() -> Result<&'static [&'static str]> {
        if Self::SPATIAL_FIELDS.is_empty() {
            return Err(Error::SpatialFieldsNotDefined {
                model: Self::MODEL_NAME,
            });
        }
        Ok(Self::SPATIAL_FIELDS)
    }

    fn query() -> Builder {
        Builder::table(Self::TABLE_NAME).for_model(Self::MODEL_NAME, Self::SPATIAL_FIELDS)
    }

    fn insert_query(&self) -> CompiledQuery {
        Builder::table(Self::TABLE_NAME).insert(self.attributes())
    }

    fn update_query(&self) -> Result<CompiledQuery> {
        let key = self
            .key()
            .ok_or(Error::MissingPrimaryKey(Self::MODEL_NAME))?;
        Ok(Builder::table(Self::TABLE_NAME)
            .where_eq(Self::PRIMARY_KEY, key)
            .update(self.attributes()))
    }

    /// Insert the row, or update it when it already has a key.
    fn save(&mut self, conn: &Connection) -> Result<()> {
        match self.key() {
            Some(key) => {
                self.update_query()?.execute(conn)?;
                tracing::debug!(model = Self::MODEL_NAME, key, "updated");
            }
            None => {
                self.insert_query().execute(conn)?;
                let key = conn.last_insert_rowid();
                self.set_key(key);
                tracing::debug!(model = Self::MODEL_NAME, key, "inserted");
            }
        }
        Ok(())
    }

    fn find(conn: &Connection, key: i64) -> Result<Option<Self>> {
        let query = Self::query().where_eq(Self::PRIMARY_KEY, key).limit(1);
        Ok(Self::get(query, conn)?.into_iter().next())
    }

    fn all(conn: &Connection) -> Result<Vec<Self>> {
        Self::get(Self::query(), conn)
    }

    /// Run a query built from [`SpatialModel::query`] and hydrate its rows.
    fn get(query: Builder, conn: &Connection) -> Result<Vec<Self>> {
        Self::spatial_fields()?;
        query.to_sql().query_map(conn, Self::from_row)
    }
}
