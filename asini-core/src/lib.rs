//! Git and npm command facades for monorepo management.

pub mod command;
pub mod config;
pub mod error;
pub mod fs;
pub mod git;
pub mod manifest;
pub mod npm;
pub mod runner;
pub mod specifier;
pub mod version_range;

pub use command::{CommandDescriptor, StdioConfig, StdioMode};
pub use config::ToolsConfig;
pub use error::{Error, Result};
pub use fs::{FileStore, OsFileStore};
pub use git::GitUtilities;
pub use manifest::{ManifestBackup, SyntheticManifest};
pub use npm::NpmUtilities;
pub use runner::{ProcessRunner, SystemRunner};
pub use specifier::{split_version, DependencySpecifier};
