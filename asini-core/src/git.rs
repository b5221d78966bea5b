//! Git command facade.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::command::CommandDescriptor;
use crate::config::ToolsConfig;
use crate::error::Result;
use crate::runner::ProcessRunner;

/// Issues git commands and maps their output to typed values.
///
/// Yes/no queries (`is_initialized`, `has_commit`, `has_tags`) turn a failed
/// command into `false`; everything else propagates the
/// [`Error::CommandExecution`](crate::Error::CommandExecution) unchanged.
pub struct GitUtilities {
    runner: Arc<dyn ProcessRunner>,
    git: String,
    remote: String,
    cwd: Option<PathBuf>,
}

impl GitUtilities {
    pub fn new(runner: Arc<dyn ProcessRunner>, config: &ToolsConfig) -> Self {
        Self {
            runner,
            git: config.git.clone(),
            remote: config.remote.clone(),
            cwd: None,
        }
    }

    /// Runs every command in `dir` instead of the process working directory.
    pub fn with_cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    fn command<I, S>(&self, args: I) -> CommandDescriptor
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cmd = CommandDescriptor::new(&self.git).args(args);
        match &self.cwd {
            Some(dir) => cmd.current_dir(dir),
            None => cmd,
        }
    }

    fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runner.exec_sync(&self.command(args))
    }

    fn succeeds(&self, args: &[&str]) -> bool {
        match self.run(args.iter().copied()) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "git check failed, treating as false");
                false
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.succeeds(&["rev-parse"])
    }

    pub fn add_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_string_lossy().into_owned();
        self.run(["add".to_string(), path])?;
        Ok(())
    }

    /// Commits staged changes.
    ///
    /// The message goes to git as a single argument, so newlines and quotes
    /// reach the commit verbatim.
    pub fn commit(&self, message: &str) -> Result<()> {
        self.run(["commit", "-m", message])?;
        Ok(())
    }

    pub fn add_tag(&self, tag: &str) -> Result<()> {
        self.run(["tag", tag])?;
        Ok(())
    }

    pub fn remove_tag(&self, tag: &str) -> Result<()> {
        self.run(["tag", "-d", tag])?;
        Ok(())
    }

    pub fn has_tags(&self) -> bool {
        match self.run(["tag"]) {
            Ok(out) => !out.trim().is_empty(),
            Err(e) => {
                debug!(error = %e, "git tag failed, treating as no tags");
                false
            }
        }
    }

    /// SHA of the most recently committed tagged commit.
    pub fn last_tagged_commit(&self) -> Result<String> {
        self.run(["rev-list", "--tags", "--max-count=1"])
    }

    /// SHA of the root commit.
    pub fn first_commit(&self) -> Result<String> {
        self.run(["rev-list", "--max-parents=0", "HEAD"])
    }

    /// Pushes the current branch, then all `tags` in one second push.
    ///
    /// With no tags only the branch is pushed.
    pub fn push_with_tags<S: AsRef<str>>(&self, tags: &[S]) -> Result<()> {
        let branch = self.current_branch()?;
        self.run(["push".to_string(), self.remote.clone(), branch])?;

        if tags.is_empty() {
            return Ok(());
        }

        let args = ["push".to_string(), self.remote.clone()]
            .into_iter()
            .chain(tags.iter().map(|t| t.as_ref().to_string()));
        self.run(args)?;
        Ok(())
    }

    pub fn describe_tag(&self, commit: &str) -> Result<String> {
        self.run(["describe", "--tags", commit])
    }

    /// Raw `git diff --name-only` output for `path` since `since`.
    pub fn diff_since_in(&self, since: &str, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref().to_string_lossy().into_owned();
        self.run([
            "diff".to_string(),
            "--name-only".to_string(),
            since.to_string(),
            "--".to_string(),
            path,
        ])
    }

    /// [`diff_since_in`](Self::diff_since_in) split into paths.
    pub fn changed_files_since_in(
        &self,
        since: &str,
        path: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>> {
        let output = self.diff_since_in(since, path)?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect())
    }

    /// The reference changes are measured from: the description of the last
    /// tagged commit, or the root commit when nothing is tagged yet.
    pub fn last_release_ref(&self) -> Result<String> {
        if self.has_tags() {
            let sha = self.last_tagged_commit()?;
            self.describe_tag(&sha)
        } else {
            self.first_commit()
        }
    }

    pub fn current_sha(&self) -> Result<String> {
        self.run(["rev-parse", "HEAD"])
    }

    pub fn top_level_directory(&self) -> Result<PathBuf> {
        self.run(["rev-parse", "--show-toplevel"]).map(PathBuf::from)
    }

    /// Discards working-tree changes matching `pattern`.
    pub fn checkout_changes(&self, pattern: &str) -> Result<()> {
        self.run(["checkout", "--", pattern])?;
        Ok(())
    }

    pub fn current_branch(&self) -> Result<String> {
        self.run(["symbolic-ref", "--short", "HEAD"])
    }

    /// Initialises a repository and returns git's output for logging.
    pub fn init(&self) -> Result<String> {
        self.run(["init"])
    }

    pub fn has_commit(&self) -> bool {
        self.succeeds(&["log"])
    }
}
