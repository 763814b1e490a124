use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SoilError>;

#[derive(Error, Debug)]
pub enum SoilError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Shape mismatch in {context}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        context: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Array shape error: {0}")]
    Array(#[from] ndarray::ShapeError),

    #[error("Cannot infer layer index from file name: {0}")]
    LayerIndex(String),

    #[error("Layer {layer} of {name} appears more than once (latest source: {})", .path.display())]
    DuplicateLayer {
        name: String,
        layer: u32,
        path: PathBuf,
    },

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
