use super::{Binding, Expression, Grammar, Value};
use crate::result::{Error, Result};
use rusqlite::{params_from_iter, Connection, Row};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Asc
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(Error::ParseError(format!(
                "unknown order direction {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boolean {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Name(String),
    Raw(Expression),
}

impl PartialEq<&str> for Column {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Column::Name(name) if name == other)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Where {
    pub boolean: Boolean,
    pub expression: Expression,
}

/// Which columns the spatial scopes may be applied to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SpatialGuard {
    /// A builder over a bare table name accepts any column.
    Any,
    Model {
        name: &'static str,
        fields: Vec<String>,
    },
}

/// A compiled statement and its bindings, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub bindings: Vec<Binding>,
}

impl CompiledQuery {
    pub fn execute(&self, conn: &Connection) -> Result<usize> {
        tracing::debug!(sql = %self.sql, bindings = self.bindings.len(), "executing statement");
        Ok(conn.execute(&self.sql, params_from_iter(self.bindings.iter()))?)
    }

    pub fn query_map<T, F>(&self, conn: &Connection, f: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        tracing::debug!(sql = %self.sql, bindings = self.bindings.len(), "running query");
        let mut stmt = conn.prepare(&self.sql)?;
        let rows = stmt.query_map(params_from_iter(self.bindings.iter()), f)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

/// A select statement over a single table, built by chaining.
///
/// The MySQL spatial scopes (`within`, `distance`, `order_by_distance`, ...) live in
/// [`crate::query::spatial`].
#[derive(Debug, Clone, PartialEq)]
pub struct Builder {
    pub(super) grammar: Grammar,
    pub(super) table: String,
    pub(super) columns: Vec<Column>,
    pub(super) wheres: Vec<Where>,
    pub(super) orders: Vec<Expression>,
    pub(super) limit: Option<u64>,
    pub(super) guard: SpatialGuard,
}

impl Builder {
    pub fn table(table: impl Into<String>) -> Self {
        Self::with_grammar(table, Grammar::default())
    }

    pub fn with_grammar(table: impl Into<String>, grammar: Grammar) -> Self {
        Builder {
            grammar,
            table: table.into(),
            columns: Vec::new(),
            wheres: Vec::new(),
            orders: Vec::new(),
            limit: None,
            guard: SpatialGuard::Any,
        }
    }

    /// Restrict the spatial scopes to the declared fields of a model.
    pub fn for_model(mut self, model: &'static str, spatial_fields: &[&str]) -> Self {
        self.guard = SpatialGuard::Model {
            name: model,
            fields: spatial_fields.iter().map(|f| f.to_string()).collect(),
        };
        self
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| Column::Name(c.to_string())).collect();
        self
    }

    /// Append an expression to the select list. An untouched select list becomes `*`
    /// followed by the expression.
    pub fn add_select_raw(mut self, expression: Expression) -> Self {
        if self.columns.is_empty() {
            self.columns.push(Column::Name("*".to_string()));
        }
        self.columns.push(Column::Raw(expression));
        self
    }

    pub fn where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        let expression = Expression::new().push_column(column).push_raw(" = ");
        self.where_expression(push_value(expression, value.into()))
    }

    pub fn where_raw(self, sql: impl Into<String>, bindings: Vec<Binding>) -> Self {
        self.where_expression(Expression::raw_with_bindings(sql, bindings))
    }

    pub fn or_where_raw(mut self, sql: impl Into<String>, bindings: Vec<Binding>) -> Self {
        self.wheres.push(Where {
            boolean: Boolean::Or,
            expression: Expression::raw_with_bindings(sql, bindings),
        });
        self
    }

    pub fn where_expression(mut self, expression: Expression) -> Self {
        self.wheres.push(Where {
            boolean: Boolean::And,
            expression,
        });
        self
    }

    pub fn order_by(self, column: &str, direction: Direction) -> Self {
        let expression = Expression::new()
            .push_column(column)
            .push_raw(format!(" {}", direction));
        self.order_by_raw(expression)
    }

    pub fn order_by_raw(mut self, expression: Expression) -> Self {
        self.orders.push(expression);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn wheres(&self) -> &[Where] {
        &self.wheres
    }

    pub fn orders(&self) -> &[Expression] {
        &self.orders
    }

    pub fn select_bindings(&self) -> Vec<Binding> {
        self.columns
            .iter()
            .flat_map(|c| match c {
                Column::Name(_) => Vec::new(),
                Column::Raw(e) => e.bindings(),
            })
            .collect()
    }

    pub fn where_bindings(&self) -> Vec<Binding> {
        self.wheres
            .iter()
            .flat_map(|w| w.expression.bindings())
            .collect()
    }

    pub fn order_bindings(&self) -> Vec<Binding> {
        self.orders.iter().flat_map(Expression::bindings).collect()
    }

    pub fn to_sql(&self) -> CompiledQuery {
        let sql = self.grammar.compile_select(self);
        let mut bindings = self.select_bindings();
        bindings.extend(self.where_bindings());
        bindings.extend(self.order_bindings());
        tracing::trace!(sql = %sql, "compiled select");
        CompiledQuery { sql, bindings }
    }

    /// Compile an insert of one row. Geometry values are sent through `ST_GeomFromText`.
    pub fn insert<I, K>(&self, values: I) -> CompiledQuery
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let values = assignments(values);
        let sql = self.grammar.compile_insert(&self.table, &values);
        let bindings = values.iter().flat_map(|(_, e)| e.bindings()).collect();
        tracing::trace!(sql = %sql, "compiled insert");
        CompiledQuery { sql, bindings }
    }

    /// Compile an update of the rows matched by the where clauses.
    pub fn update<I, K>(&self, values: I) -> CompiledQuery
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let values = assignments(values);
        let sql = self.grammar.compile_update(self, &values);
        let mut bindings: Vec<Binding> = values.iter().flat_map(|(_, e)| e.bindings()).collect();
        bindings.extend(self.where_bindings());
        tracing::trace!(sql = %sql, "compiled update");
        CompiledQuery { sql, bindings }
    }
}

fn push_value(expression: Expression, value: Value) -> Expression {
    match value {
        Value::Geometry(g) => expression.push_spatial(g),
        Value::Scalar(b) => expression.push_binding(b),
    }
}

fn assignments<I, K>(values: I) -> Vec<(String, Expression)>
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    values
        .into_iter()
        .map(|(column, value)| (column.into(), push_value(Expression::new(), value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LineString, Point};

    #[test]
    fn select_defaults_to_star() {
        let query = Builder::table("test_models").to_sql();
        assert_eq!(query.sql, "select * from `test_models`");
        assert!(query.bindings.is_empty());
    }

    #[test]
    fn select_where_order_limit() {
        let query = Builder::table("test_models")
            .select(&["id", "test_models.name"])
            .where_eq("id", 3i64)
            .where_raw("name like ?", vec!["a%".into()])
            .or_where_raw("name is null", vec![])
            .order_by("id", Direction::Desc)
            .limit(5)
            .to_sql();
        assert_eq!(
            query.sql,
            "select `id`, `test_models`.`name` from `test_models` where `id` = ? and name like ? or name is null order by `id` desc limit 5"
        );
        assert_eq!(
            query.bindings,
            vec![Binding::Integer(3), Binding::Text("a%".to_string())]
        );
    }

    #[test]
    fn insert_sends_geometries_as_wkt() {
        let point = Point::new(1.0, 2.0);
        let query = Builder::table("test_models").insert(vec![
            ("name", Value::from("home")),
            ("point", Value::from(point)),
        ]);
        assert_eq!(
            query.sql,
            "insert into `test_models` (`name`, `point`) values (?, ST_GeomFromText(?, ?, 'axis-order=long-lat'))"
        );
        assert_eq!(
            query.bindings,
            vec![
                Binding::Text("home".to_string()),
                Binding::Text("POINT(2 1)".to_string()),
                Binding::Integer(0),
            ]
        );
    }

    #[test]
    fn update_binds_values_before_wheres() {
        let ls = LineString::new(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]).unwrap();
        let query = Builder::table("test_models")
            .where_eq("id", 7i64)
            .update(vec![("linestring", Value::from(&ls))]);
        assert_eq!(
            query.sql,
            "update `test_models` set `linestring` = ST_GeomFromText(?, ?, 'axis-order=long-lat') where `id` = ?"
        );
        assert_eq!(
            query.bindings,
            vec![
                Binding::Text("LINESTRING(1 1,2 2)".to_string()),
                Binding::Integer(0),
                Binding::Integer(7),
            ]
        );
    }

    #[test]
    fn where_eq_with_geometry() {
        let query = Builder::table("places")
            .where_eq("location", Point::new(1.0, 2.0))
            .to_sql();
        assert_eq!(
            query.sql,
            "select * from `places` where `location` = ST_GeomFromText(?, ?, 'axis-order=long-lat')"
        );
        assert_eq!(query.bindings.len(), 2);
    }

    #[test]
    fn add_select_raw_after_explicit_columns() {
        let builder = Builder::table("t")
            .select(&["some_column"])
            .add_select_raw(Expression::raw("1 as one"));
        assert_eq!(builder.columns()[0], "some_column");
        assert_eq!(builder.to_sql().sql, "select `some_column`, 1 as one from `t`");
    }

    #[test]
    fn direction_parsing() {
        assert_eq!("DESC".parse::<Direction>().unwrap(), Direction::Desc);
        assert_eq!("asc".parse::<Direction>().unwrap(), Direction::Asc);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn executes_against_sqlite() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT)", [])
            .unwrap();
        let insert = Builder::table("items").insert(vec![("name", Value::from("a"))]);
        assert_eq!(insert.execute(&conn).unwrap(), 1);
        Builder::table("items")
            .insert(vec![("name", Value::from("b"))])
            .execute(&conn)
            .unwrap();

        let names = Builder::table("items")
            .select(&["name"])
            .order_by("name", Direction::Desc)
            .to_sql()
            .query_map(&conn, |row| row.get::<_, String>(0))
            .unwrap();
        assert_eq!(names, vec!["b".to_string(), "a".to_string()]);
    }
}
