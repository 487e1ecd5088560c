use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeyLibError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Keymap Validation Error: {0}")]
    Validation(String),

    #[error("{kind} index {index} out of range (limit {limit})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        limit: usize,
    },
}

pub type KlResult<T> = Result<T, KeyLibError>;
