#[derive(thiserror::Error, Debug)]
pub enum ForecastError {
    #[error("invalid coordinate ({0}, {1}): {2}")]
    InvalidCoordinate(f64, f64, String),
    #[error("failure parsing '{0}': {1}")]
    ParseError(String, String),
    #[error("feature schema mismatch: expected [{expected}], found [{found}]")]
    SchemaMismatch { expected: String, found: String },
    #[error("insufficient training data: {0}")]
    InsufficientData(String),
    #[error("forecast service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("invalid configuration: {0}")]
    ConfigurationError(String),
    #[error(transparent)]
    ConfigSourceError(#[from] config::ConfigError),
    #[error(transparent)]
    CsvError(#[from] csv::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}
