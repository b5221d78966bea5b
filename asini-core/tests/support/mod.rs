//! Scripted doubles for the process and filesystem ports.
//!
//! Every call is appended to a shared journal so tests can assert the order
//! of filesystem and process operations across both doubles.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use asini_core::{CommandDescriptor, Error, FileStore, ProcessRunner, Result};

pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    ExecSync,
    Exec,
    Spawn,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub command: CommandDescriptor,
}

impl RecordedCall {
    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.command.program().to_string())
            .chain(self.command.arguments().iter().cloned())
            .collect()
    }
}

/// Answers commands from a queue of canned results, in order.
///
/// Panics on a command it has no answer for.
pub struct ScriptedRunner {
    responses: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
    journal: Journal,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::with_journal(journal())
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            journal,
        }
    }

    pub fn returns(self, stdout: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(stdout.to_string()));
        self
    }

    pub fn fails(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.calls().iter().map(RecordedCall::argv).collect()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    fn answer(&self, kind: CallKind, command: &CommandDescriptor) -> Result<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            kind,
            command: command.clone(),
        });
        self.journal
            .lock()
            .unwrap()
            .push(format!("{:?} {}", kind, command));

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected command: {}", command));

        response.map_err(|message| Error::CommandExecution {
            command: command.to_string(),
            message,
        })
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    fn exec_sync(&self, command: &CommandDescriptor) -> Result<String> {
        self.answer(CallKind::ExecSync, command)
    }

    async fn exec(&self, command: &CommandDescriptor) -> Result<String> {
        self.answer(CallKind::Exec, command)
    }

    async fn spawn(&self, command: &CommandDescriptor) -> Result<()> {
        self.answer(CallKind::Spawn, command).map(|_| ())
    }
}

/// In-memory file store that journals every operation.
///
/// Operations named in `fail_on` return an IO error with the given message.
/// With `stall_writes`, async writes are journaled and then never complete.
pub struct ScriptedFileStore {
    files: Mutex<HashMap<PathBuf, String>>,
    failures: Mutex<Vec<Failure>>,
    stall_writes: bool,
    journal: Journal,
}

struct Failure {
    op: &'static str,
    needle: Option<String>,
    message: String,
}

impl ScriptedFileStore {
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            failures: Mutex::new(Vec::new()),
            stall_writes: false,
            journal,
        }
    }

    pub fn with_file(self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), contents.to_string());
        self
    }

    pub fn fail_on(self, op: &'static str, message: &str) -> Self {
        self.failures.lock().unwrap().push(Failure {
            op,
            needle: None,
            message: message.to_string(),
        });
        self
    }

    /// Fails only the rename that moves a backup back into place.
    pub fn fail_on_restore(self, message: &str) -> Self {
        self.failures.lock().unwrap().push(Failure {
            op: "rename_sync",
            needle: Some("_backup -> ".to_string()),
            message: message.to_string(),
        });
        self
    }

    pub fn stall_writes(mut self) -> Self {
        self.stall_writes = true;
        self
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }

    fn record(&self, op: &'static str, detail: String) -> Result<()> {
        let failure = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .find(|f| {
                f.op == op
                    && f.needle
                        .as_deref()
                        .map_or(true, |needle| detail.contains(needle))
            })
            .map(|f| f.message.clone());

        self.journal
            .lock()
            .unwrap()
            .push(format!("{} {}", op, detail));

        match failure {
            Some(message) => Err(Error::Io(io::Error::new(io::ErrorKind::Other, message))),
            None => Ok(()),
        }
    }

    fn do_rename(&self, op: &'static str, from: &Path, to: &Path) -> Result<()> {
        self.record(op, format!("{} -> {}", from.display(), to.display()))?;
        let mut files = self.files.lock().unwrap();
        let contents = files.remove(from).ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", from.display()),
            ))
        })?;
        files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    fn do_write(&self, op: &'static str, path: &Path, contents: &str) -> Result<()> {
        self.record(op, format!("{} {}", path.display(), contents))?;
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

#[async_trait]
impl FileStore for ScriptedFileStore {
    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.do_rename("rename", from, to)
    }

    fn rename_sync(&self, from: &Path, to: &Path) -> Result<()> {
        self.do_rename("rename_sync", from, to)
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        if self.stall_writes {
            self.record("write_file", format!("{} {}", path.display(), contents))?;
            return std::future::pending().await;
        }
        self.do_write("write_file", path, contents)
    }

    fn write_file_sync(&self, path: &Path, contents: &str) -> Result<()> {
        self.do_write("write_file_sync", path, contents)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.record("read", path.display().to_string())?;
        self.file(path).ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ))
        })
    }
}
