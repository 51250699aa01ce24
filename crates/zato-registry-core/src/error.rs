use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid credentials '{input}' - expected user:password")]
    InvalidCredentials { input: String },

    #[error("Authentication rejected by {url} (HTTP {status})")]
    Unauthorized { url: String, status: u16 },

    #[error("Transport error calling {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Remote call {operation} failed: {details}")]
    RemoteCall { operation: String, details: String },

    #[error("Unexpected response from {operation}: {message}")]
    UnexpectedResponse { operation: String, message: String },

    #[error("Channel record is missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid backup file {path}: {message}")]
    InvalidBackup { path: PathBuf, message: String },

    #[error("Config parse error in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value '{value}' for config key {key}")]
    InvalidConfigValue { key: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

impl RegistryError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unauthorized { .. } => 2,
            Self::Transport { .. } => 3,
            Self::RemoteCall { .. } | Self::UnexpectedResponse { .. } => 4,
            Self::MissingField { .. } | Self::InvalidBackup { .. } => 5,
            _ => 1,
        }
    }
}
