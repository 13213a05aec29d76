use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeycraftError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Optimiser Error: {0}")]
    Optimiser(String),
}

pub type KcResult<T> = Result<T, KeycraftError>;
