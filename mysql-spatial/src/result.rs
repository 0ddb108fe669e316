/// The result returned by many methods within the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed WKT text or binary geometry buffer.
    #[error("Error parsing geometry: {0}")]
    ParseError(String),
    /// A GeoJSON value that does not have the shape the target geometry expects.
    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),
    #[error("{collection} must contain at least {minimum} {}", entries(.minimum))]
    InvalidItemCount {
        collection: &'static str,
        minimum: usize,
    },
    #[error("{collection} must be a collection of {expected}, got {found}")]
    InvalidItemType {
        collection: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Expected a {expected} geometry, found a {found}")]
    UnexpectedGeometry {
        expected: &'static str,
        found: &'static str,
    },
    #[error("Index {index} is out of bounds for a collection of {len} items")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Unknown spatial function: {0}")]
    UnknownSpatialFunction(String),
    #[error("{model} has to define spatial fields")]
    SpatialFieldsNotDefined { model: &'static str },
    #[error("{column} is not a spatial field of {model}")]
    NotASpatialField {
        model: &'static str,
        column: String,
    },
    #[error("{0} has no primary key value, it must be inserted before it can be updated")]
    MissingPrimaryKey(&'static str),
    #[error("Invalid spatial configuration: {0}")]
    ConfigError(#[from] serde_json::Error),
    #[error("Error when accessing the SQLite database")]
    SQLiteError(#[from] rusqlite::Error),
}

fn entries(minimum: &usize) -> &'static str {
    if *minimum == 1 {
        "entry"
    } else {
        "entries"
    }
}

// truncated buffers surface from byteorder as io errors
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::ParseError(format!("unable to read geometry buffer: {}", e))
    }
}
