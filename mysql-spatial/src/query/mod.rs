//! SQL generation: a small select/insert/update builder in the MySQL dialect and the
//! spatial scopes that extend it.

mod builder;
mod expression;
mod grammar;
pub mod spatial;
mod value;

pub use builder::{Boolean, Builder, Column, CompiledQuery, Direction, Where};
pub use expression::{Expression, Segment, SpatialExpression};
pub use grammar::Grammar;
pub use value::{Binding, Value};
