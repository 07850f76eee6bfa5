use crate::profile::Scale;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Incomplete profile: missing dimension(s) {}", .missing.join(", "))]
    IncompleteProfile { missing: Vec<String> },

    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("Invalid dimension count: expected {expected}, got {actual}")]
    DimensionCount { expected: usize, actual: usize },

    #[error("Non-finite value {value} for dimension {dimension}")]
    NonFiniteValue { dimension: String, value: f64 },

    #[error("Schema mismatch: expected schema v{expected}, got v{actual}")]
    SchemaMismatch { expected: u32, actual: u32 },

    #[error("Scale mismatch: expected {expected} profile, got {actual}")]
    ScaleMismatch { expected: Scale, actual: Scale },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Cannot compute normalization stats over an empty population")]
    EmptyPopulation,

    #[error("Career catalog cannot be empty")]
    EmptyCatalog,

    #[error("Duplicate occupation code: {0}")]
    DuplicateOccupation(String),

    #[error("Invalid career record {code}: {source}")]
    InvalidRecord {
        code: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Occupation not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Attach the occupation code of the record that failed to load.
    pub fn for_record(self, code: impl Into<String>) -> Self {
        Error::InvalidRecord {
            code: code.into(),
            source: Box::new(self),
        }
    }
}
