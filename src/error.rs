//! Domain errors

use thiserror::Error;

/// Result type for histogram and model operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("total population is zero, proportions are undefined")]
    ZeroPopulation,

    #[error("age {age} falls outside the {buckets} buckets of width {width}")]
    AgeOutOfRange { age: u32, width: u32, buckets: usize },

    #[error("malformed count {value:?} in column {column:?}")]
    MalformedCount { column: String, value: String },

    #[error("population count overflows u64 at {0}")]
    CountOverflow(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
