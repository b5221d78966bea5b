//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Command `{command}` failed: {message}")]
    CommandExecution { command: String, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error in {context}: {error}")]
    Toml {
        error: toml::de::Error,
        context: String,
    },

    #[error("Invalid version {version}: {message}")]
    InvalidVersion { version: String, message: String },

    #[error("Invalid version range {range}: {message}")]
    InvalidRange { range: String, message: String },

    #[error("Failed to restore manifest from {}: {message}", backup.display())]
    ManifestRestore { backup: PathBuf, message: String },
}

impl Error {
    /// Diagnostic text carried by a failed command, if this is one.
    pub fn command_message(&self) -> Option<&str> {
        match self {
            Error::CommandExecution { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::Toml {
            error,
            context: "asini.toml".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
