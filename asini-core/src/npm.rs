//! npm command facade and the temporary-manifest install workflow.

use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::command::{shell_word, CommandDescriptor, StdioConfig};
use crate::config::ToolsConfig;
use crate::error::Result;
use crate::fs::FileStore;
use crate::manifest::{read_package_version, ManifestBackup, SyntheticManifest};
use crate::runner::ProcessRunner;
use crate::version_range;

pub use crate::specifier::split_version;

const REGISTRY_ENV: &str = "npm_config_registry";

/// Issues npm commands: installs, dist-tags, scripts and publishing.
pub struct NpmUtilities {
    runner: Arc<dyn ProcessRunner>,
    store: Arc<dyn FileStore>,
    npm: String,
    npm_client: String,
    registry: Option<String>,
    backup_prefix: String,
}

impl NpmUtilities {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        store: Arc<dyn FileStore>,
        config: &ToolsConfig,
    ) -> Self {
        Self {
            runner,
            store,
            npm: config.npm.clone(),
            npm_client: config.npm_client.clone(),
            registry: config.registry.clone(),
            backup_prefix: config.backup_prefix.clone(),
        }
    }

    fn with_registry(&self, cmd: CommandDescriptor) -> CommandDescriptor {
        match &self.registry {
            Some(registry) => cmd.env(REGISTRY_ENV, registry),
            None => cmd,
        }
    }

    fn npm_command<I, S>(&self, args: I) -> CommandDescriptor
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_registry(CommandDescriptor::new(&self.npm).args(args))
    }

    /// Installs `dependencies` into `dir` without touching its real manifest.
    ///
    /// The directory's `package.json` is moved aside, replaced by a manifest
    /// listing only `dependencies`, and put back once the install finishes,
    /// whether it succeeded or not. The first error encountered is returned;
    /// a failed restore is only reported when nothing failed before it.
    ///
    /// An empty `dependencies` slice returns immediately without touching
    /// the filesystem or spawning anything.
    pub async fn install_in_dir<S: AsRef<str>>(&self, dir: &Path, dependencies: &[S]) -> Result<()> {
        if dependencies.is_empty() {
            debug!(dir = %dir.display(), "no dependencies to install");
            return Ok(());
        }

        let backup = ManifestBackup::create(Arc::clone(&self.store), dir, &self.backup_prefix)?;
        let result = self.write_and_install(dir, backup.original_path(), dependencies).await;
        let restored = backup.restore();

        match (result, restored) {
            (Err(e), Err(restore_err)) => {
                warn!(error = %restore_err, "manifest restore failed after install error");
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(()), restored) => restored,
        }
    }

    async fn write_and_install<S: AsRef<str>>(
        &self,
        dir: &Path,
        manifest_path: &Path,
        dependencies: &[S],
    ) -> Result<()> {
        let manifest = SyntheticManifest::from_specifiers(dependencies);
        self.store
            .write_file(manifest_path, &manifest.to_json()?)
            .await?;

        info!(
            dir = %dir.display(),
            count = manifest.dependencies.len(),
            "installing dependencies"
        );

        let cmd = self.with_registry(
            CommandDescriptor::new(&self.npm_client)
                .arg("install")
                .current_dir(dir)
                .stdio(StdioConfig::quiet()),
        );
        self.runner.spawn(&cmd).await
    }

    pub fn add_dist_tag(&self, package: &str, version: &str, tag: &str) -> Result<()> {
        let cmd = self.npm_command([
            "dist-tag".to_string(),
            "add".to_string(),
            format!("{}@{}", package, version),
            tag.to_string(),
        ]);
        self.runner.exec_sync(&cmd)?;
        Ok(())
    }

    pub fn remove_dist_tag(&self, package: &str, tag: &str) -> Result<()> {
        let cmd = self.npm_command(["dist-tag", "rm", package, tag]);
        self.runner.exec_sync(&cmd)?;
        Ok(())
    }

    /// Raw `npm dist-tag ls` output for `package`.
    pub fn list_dist_tags(&self, package: &str) -> Result<String> {
        let cmd = self.npm_command(["dist-tag", "ls", package]);
        self.runner.exec_sync(&cmd)
    }

    /// Returns `true` if a line of the dist-tag listing starts with `<tag>: `.
    ///
    /// A failing listing is treated as an empty one.
    pub fn check_dist_tag(&self, package: &str, tag: &str) -> bool {
        match self.list_dist_tags(package) {
            Ok(listing) => listing_has_tag(&listing, tag),
            Err(e) => {
                debug!(error = %e, package, "dist-tag listing failed, treating as absent");
                false
            }
        }
    }

    /// Runs `npm <subcommand> <args...>` in `dir` and returns its stdout.
    ///
    /// `subcommand` is split on whitespace, so `"run build"` is two arguments.
    pub async fn exec_in_dir<S: AsRef<str>>(
        &self,
        subcommand: &str,
        args: &[S],
        dir: &Path,
    ) -> Result<String> {
        let cmd = self
            .npm_command(subcommand.split_whitespace())
            .args(args.iter().map(|a| a.as_ref().to_string()))
            .current_dir(dir);
        self.runner.exec(&cmd).await
    }

    pub async fn run_script_in_dir<S: AsRef<str>>(
        &self,
        script: &str,
        args: &[S],
        dir: &Path,
    ) -> Result<String> {
        self.exec_in_dir(&format!("run {}", script), args, dir).await
    }

    /// Publishes the package in `dir` under the dist-tag `tag`.
    ///
    /// The directory change is part of the shell command itself; no working
    /// directory is set on the process. The directory, npm binary and tag are
    /// each quoted as one shell word when they contain anything but plain
    /// path characters.
    pub async fn publish_tagged_in_dir(&self, tag: &str, dir: &Path) -> Result<String> {
        let text = format!(
            "cd {} && {} publish --tag {}",
            shell_word(&dir.to_string_lossy()),
            shell_word(&self.npm),
            shell_word(tag)
        );
        let cmd = self.with_registry(CommandDescriptor::shell(text));
        info!(dir = %dir.display(), tag, "publishing");
        self.runner.exec(&cmd).await
    }

    /// Returns `true` if the installed `packages_root/package/package.json`
    /// has a version inside `range`.
    pub fn dependency_is_satisfied(
        &self,
        packages_root: &Path,
        package: &str,
        range: &str,
    ) -> Result<bool> {
        let version = read_package_version(self.store.as_ref(), &packages_root.join(package))?;
        version_range::satisfies(&version, range)
    }
}

fn listing_has_tag(listing: &str, tag: &str) -> bool {
    let pattern = format!("(?m)^{}: ", regex::escape(tag));
    Regex::new(&pattern).map_or(false, |re| re.is_match(listing))
}
