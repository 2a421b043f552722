//! Error types for the ratings pipeline

/// Errors raised while parsing exports or validating pipeline configuration
#[derive(thiserror::Error, Debug)]
pub enum RatingsError {
    /// User rating column is zero or empty (known-bad export rows)
    #[error("rating cannot be zero")]
    ZeroRating,

    /// Row could not be coerced into a record
    #[error("malformed row: {0}")]
    MalformedRow(String),

    /// Sort key names a field that cannot be sorted on
    #[error("unknown sort field: {0}")]
    UnknownSortField(String),

    /// Sort key is missing its `a`/`d` direction prefix
    #[error("invalid sort key '{0}': expected a(scending) or d(escending) prefix")]
    InvalidSortKey(String),

    /// Title type mnemonic not in the mnemonic table
    #[error("unknown title type: {0}")]
    UnknownTitleType(String),

    /// Genre token not in the known genre list
    #[error("unknown genre: {0}")]
    UnknownGenre(String),

    /// Inverted min/max pair
    #[error("invalid bound for {field}: min {min} is greater than max {max}")]
    InvalidBound { field: &'static str, min: String, max: String },

    /// NaN or infinite bound
    #[error("invalid bound for {field}: {value} is not a finite number")]
    InvalidBoundValue { field: &'static str, value: String },

    /// CSV reader/writer error
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// File I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for ratings operations
pub type Result<T> = std::result::Result<T, RatingsError>;
