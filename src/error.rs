use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropCastError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported crop '{name}'. Supported: {}", supported.join(", "))]
    UnsupportedCrop { name: String, supported: Vec<String> },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, CropCastError>;
