use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed vendor table: {0}")]
    Csv(#[from] csv::Error),

    #[error("Vendor table is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether this error happened while reading the vendor table.
    /// Load errors are fatal: the service must not start serving.
    pub fn is_load_fault(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Csv(_) | Error::MissingColumns(_))
    }
}
