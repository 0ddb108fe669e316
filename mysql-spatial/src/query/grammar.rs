use super::builder::{Boolean, Builder, Column};
use super::expression::{Expression, Segment, SpatialExpression};
use crate::config::SpatialConfig;

/// The MySQL dialect: backtick quoted identifiers and `ST_GeomFromText` for geometries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grammar {
    config: SpatialConfig,
}

impl Grammar {
    pub fn new(config: SpatialConfig) -> Self {
        Grammar { config }
    }

    pub fn config(&self) -> &SpatialConfig {
        &self.config
    }

    /// Quote an identifier. Dotted names are quoted part by part, `*` is left alone and
    /// `name as alias` quotes both sides.
    pub fn wrap(&self, identifier: &str) -> String {
        let identifier = identifier.trim();
        if let Some(pos) = identifier.to_ascii_lowercase().find(" as ") {
            return format!(
                "{} as {}",
                self.wrap(&identifier[..pos]),
                self.wrap_segment(identifier[pos + 4..].trim())
            );
        }
        identifier
            .split('.')
            .map(|segment| self.wrap_segment(segment))
            .collect::<Vec<String>>()
            .join(".")
    }

    fn wrap_segment(&self, segment: &str) -> String {
        if segment == "*" {
            return segment.to_string();
        }
        format!("`{}`", segment.replace('`', "``"))
    }

    pub fn compile_spatial(&self, _expression: &SpatialExpression) -> String {
        match &self.config.axis_order {
            Some(order) => format!("ST_GeomFromText(?, ?, 'axis-order={}')", order),
            None => "ST_GeomFromText(?, ?)".to_string(),
        }
    }

    pub fn compile_expression(&self, expression: &Expression) -> String {
        let mut sql = String::new();
        for segment in expression.segments() {
            match segment {
                Segment::Raw(text, _) => sql.push_str(text),
                Segment::Column(column) => sql.push_str(&self.wrap(column)),
                Segment::Placeholder(_) => sql.push('?'),
                Segment::Spatial(e) => sql.push_str(&self.compile_spatial(e)),
            }
        }
        sql
    }

    pub(super) fn compile_columns(&self, columns: &[Column]) -> String {
        if columns.is_empty() {
            return "*".to_string();
        }
        columns
            .iter()
            .map(|column| match column {
                Column::Name(name) => self.wrap(name),
                Column::Raw(expression) => self.compile_expression(expression),
            })
            .collect::<Vec<String>>()
            .join(", ")
    }

    pub(super) fn compile_wheres(&self, builder: &Builder) -> String {
        let mut sql = String::new();
        for (i, clause) in builder.wheres.iter().enumerate() {
            if i == 0 {
                sql.push_str(" where ");
            } else {
                sql.push_str(match clause.boolean {
                    Boolean::And => " and ",
                    Boolean::Or => " or ",
                });
            }
            sql.push_str(&self.compile_expression(&clause.expression));
        }
        sql
    }

    pub(super) fn compile_select(&self, builder: &Builder) -> String {
        let mut sql = format!(
            "select {} from {}",
            self.compile_columns(&builder.columns),
            self.wrap(&builder.table)
        );
        sql.push_str(&self.compile_wheres(builder));
        if !builder.orders.is_empty() {
            sql.push_str(" order by ");
            sql.push_str(
                &builder
                    .orders
                    .iter()
                    .map(|order| self.compile_expression(order))
                    .collect::<Vec<String>>()
                    .join(", "),
            );
        }
        if let Some(limit) = builder.limit {
            sql.push_str(&format!(" limit {}", limit));
        }
        sql
    }

    pub(super) fn compile_insert(&self, table: &str, values: &[(String, Expression)]) -> String {
        let columns = values
            .iter()
            .map(|(column, _)| self.wrap(column))
            .collect::<Vec<String>>()
            .join(", ");
        let parameters = values
            .iter()
            .map(|(_, value)| self.compile_expression(value))
            .collect::<Vec<String>>()
            .join(", ");
        format!(
            "insert into {} ({}) values ({})",
            self.wrap(table),
            columns,
            parameters
        )
    }

    pub(super) fn compile_update(&self, builder: &Builder, values: &[(String, Expression)]) -> String {
        let assignments = values
            .iter()
            .map(|(column, value)| format!("{} = {}", self.wrap(column), self.compile_expression(value)))
            .collect::<Vec<String>>()
            .join(", ");
        format!(
            "update {} set {}{}",
            self.wrap(&builder.table),
            assignments,
            self.compile_wheres(builder)
        )
    }
}
