//! Command descriptors handed to a [`ProcessRunner`](crate::runner::ProcessRunner).

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// How one standard stream of a child process is wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// Shares the parent's stream.
    Inherit,
    /// Captured by the runner.
    Piped,
    /// Connected to the null device.
    Null,
}

/// Stream configuration for stdin, stdout and stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdioConfig {
    pub stdin: StdioMode,
    pub stdout: StdioMode,
    pub stderr: StdioMode,
}

impl StdioConfig {
    /// Inherited stdin, captured stdout and stderr.
    pub fn piped() -> Self {
        Self {
            stdin: StdioMode::Inherit,
            stdout: StdioMode::Piped,
            stderr: StdioMode::Piped,
        }
    }

    /// No stdin, captured stdout and stderr.
    pub fn quiet() -> Self {
        Self {
            stdin: StdioMode::Null,
            stdout: StdioMode::Piped,
            stderr: StdioMode::Piped,
        }
    }
}

impl Default for StdioConfig {
    fn default() -> Self {
        Self::piped()
    }
}

/// A program, its arguments and the context it runs in.
///
/// Descriptors are built fresh for every call and never mutated once handed
/// to a runner. The ambient environment is always inherited; `env` entries
/// are layered on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    envs: BTreeMap<String, String>,
    stdio: StdioConfig,
}

impl CommandDescriptor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            envs: BTreeMap::new(),
            stdio: StdioConfig::default(),
        }
    }

    /// Runs `text` through the platform shell.
    ///
    /// Only use this where the command text itself must carry shell syntax,
    /// such as `cd dir && ...`.
    pub fn shell(text: impl Into<String>) -> Self {
        if cfg!(windows) {
            Self::new("cmd").arg("/C").arg(text)
        } else {
            Self::new("sh").arg("-c").arg(text)
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.insert(key.into(), value.into());
        self
    }

    pub fn stdio(mut self, stdio: StdioConfig) -> Self {
        self.stdio = stdio;
        self
    }

    #[inline]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[inline]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    #[inline]
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    #[inline]
    pub fn envs(&self) -> &BTreeMap<String, String> {
        &self.envs
    }

    #[inline]
    pub fn stdio_config(&self) -> StdioConfig {
        self.stdio
    }

    /// Arguments as string slices, convenient for assertions and matching.
    pub fn arg_strs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

/// Characters that never need quoting in a POSIX shell word.
fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_-./:=@%+,^".contains(c)
}

fn needs_quoting(arg: &str) -> bool {
    arg.is_empty() || !arg.chars().all(is_shell_safe)
}

fn quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// `arg` as a single POSIX shell word, quoted only when it has to be.
pub(crate) fn shell_word(arg: &str) -> String {
    if needs_quoting(arg) {
        quote(arg)
    } else {
        arg.to_string()
    }
}

impl fmt::Display for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", shell_word(arg))?;
        }
        Ok(())
    }
}
