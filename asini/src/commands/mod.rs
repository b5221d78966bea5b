//! Command implementations for the CLI.

mod git;
mod npm;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use asini_core::{GitUtilities, NpmUtilities, OsFileStore, SystemRunner, ToolsConfig};

pub use git::{
    cmd_add, cmd_changed, cmd_checkout, cmd_commit, cmd_init, cmd_push, cmd_status, cmd_tag,
    TagAction,
};
pub use npm::{cmd_dist_tag, cmd_exec, cmd_install, cmd_publish, cmd_run, cmd_satisfied, DistTagAction};

/// Facades wired to real processes and the local filesystem.
pub struct Context {
    pub git: GitUtilities,
    pub npm: NpmUtilities,
    base_dir: Option<PathBuf>,
}

impl Context {
    pub fn new(config: &ToolsConfig, base_dir: Option<PathBuf>) -> Self {
        let runner = Arc::new(SystemRunner::new());
        let store = Arc::new(OsFileStore::new());

        let git = GitUtilities::new(runner.clone(), config);
        let git = match &base_dir {
            Some(dir) => git.with_cwd(dir),
            None => git,
        };

        Self {
            git,
            npm: NpmUtilities::new(runner, store, config),
            base_dir,
        }
    }

    /// Resolves a user-supplied directory against `--cwd`, if one was given.
    pub fn resolve(&self, dir: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if dir.is_relative() => base.join(dir),
            _ => dir.to_path_buf(),
        }
    }
}

/// Loads the tools config from `--config` or by discovery.
pub fn load_config(explicit: Option<&Path>, base_dir: Option<&Path>) -> Result<ToolsConfig> {
    let config = match explicit {
        Some(path) => ToolsConfig::load(path)?,
        None => {
            let start = match base_dir {
                Some(dir) => dir.to_path_buf(),
                None => std::env::current_dir()?,
            };
            ToolsConfig::discover(start)?
        }
    };
    Ok(config)
}
