//! TOML configuration for the external tools the facades drive.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "asini.toml";

/// Tool settings read from the `[tools]` table of `asini.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Git binary.
    pub git: String,
    /// npm binary used for publishing, dist-tags and scripts.
    pub npm: String,
    /// Client binary used for installs (e.g. `npm` or `yarn`).
    pub npm_client: String,
    /// Remote that branches and tags are pushed to.
    pub remote: String,
    /// Registry URL passed to every npm command, if set.
    pub registry: Option<String>,
    /// Prefix of the temporary manifest backup file name.
    pub backup_prefix: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            npm: "npm".to_string(),
            npm_client: "npm".to_string(),
            remote: "origin".to_string(),
            registry: None,
            backup_prefix: "asini".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    tools: ToolsConfig,
}

impl ToolsConfig {
    /// Parses the `[tools]` table out of an `asini.toml` document.
    ///
    /// A document without a `[tools]` table yields the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.tools)
    }

    /// Reads an explicit config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&content).map_err(|error| Error::Toml {
            error,
            context: path.display().to_string(),
        })?;
        Ok(file.tools)
    }

    /// Finds the nearest `asini.toml` at or above `start`.
    ///
    /// The search stops at the first directory that contains a `.git` entry.
    pub fn find_config_file(start: impl AsRef<Path>) -> Option<PathBuf> {
        let mut current = start.as_ref();

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }

            if current.join(".git").exists() {
                return None;
            }

            match current.parent() {
                Some(parent) if parent != current => current = parent,
                _ => return None,
            }
        }
    }

    /// Loads the nearest config file, or defaults when there is none.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self> {
        match Self::find_config_file(start) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading tools config");
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn with_registry(mut self, registry: Option<String>) -> Self {
        if registry.is_some() {
            self.registry = registry;
        }
        self
    }

    pub fn with_npm_client(mut self, npm_client: Option<String>) -> Self {
        if let Some(client) = npm_client {
            self.npm_client = client;
        }
        self
    }
}
