use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] abode_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Record file {path} must contain a JSON object")]
    InvalidRecordFile { path: String },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error(
        "No API base URL configured. Run `abode config init --api-base-url <URL>` or set ABODE_API_BASE_URL."
    )]
    NotConfigured,
}
