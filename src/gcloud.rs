//! The single integration point with the `gcloud` CLI.
//!
//! Every cloud operation goes through [`GcloudRunner::run`], which returns
//! the tool's combined stdout/stderr as text. Parsing is left to callers.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{BotError, CommandError};
use crate::progress;

pub trait GcloudRunner {
    /// Run `gcloud <args>` and capture stdout and stderr as one string.
    ///
    /// On a non-zero exit the captured output travels inside the error.
    fn run(&self, args: &[&str]) -> Result<String, CommandError>;

    /// Run `gcloud <args>` attached to the current terminal.
    fn run_interactive(&self, args: &[&str]) -> Result<(), CommandError>;
}

/// Runs the real `gcloud` binary.
pub struct GcloudCli {
    binary: PathBuf,
    spinner: bool,
}

impl GcloudCli {
    /// `spinner` shows progress on stderr while a command runs; leave it off
    /// when stderr is not a terminal or carries log output.
    pub fn new(binary: PathBuf, spinner: bool) -> Self {
        Self { binary, spinner }
    }

    fn command_line(&self, args: &[&str]) -> String {
        let mut line = self
            .binary
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "gcloud".into());
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    fn capture(&self, args: &[&str]) -> std::io::Result<(ExitStatus, String)> {
        // Both streams share one pipe so output keeps the order gcloud wrote it in.
        let (mut reader, writer) = std::io::pipe()?;
        let mut child = {
            let mut cmd = Command::new(&self.binary);
            cmd.args(args)
                .stdin(Stdio::null())
                .stdout(writer.try_clone()?)
                .stderr(writer);
            cmd.spawn()?
        };

        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        let status = child.wait()?;
        Ok((status, String::from_utf8_lossy(&raw).into_owned()))
    }
}

impl GcloudRunner for GcloudCli {
    fn run(&self, args: &[&str]) -> Result<String, CommandError> {
        let command = self.command_line(args);
        tracing::debug!(%command, "running gcloud");

        let bar = self.spinner.then(|| progress::spinner(&command));
        let result = self.capture(args);
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        match result {
            Ok((status, output)) if status.success() => Ok(output),
            Ok((status, output)) => {
                tracing::debug!(%command, %status, "gcloud failed");
                Err(CommandError {
                    command,
                    reason: format!("exited with {status}"),
                    output,
                })
            }
            Err(e) => Err(CommandError {
                command,
                reason: format!("could not be run: {e}"),
                output: String::new(),
            }),
        }
    }

    fn run_interactive(&self, args: &[&str]) -> Result<(), CommandError> {
        let command = self.command_line(args);
        tracing::debug!(%command, "handing terminal to gcloud");

        let status = Command::new(&self.binary)
            .args(args)
            .status()
            .map_err(|e| CommandError {
                command: command.clone(),
                reason: format!("could not be run: {e}"),
                output: String::new(),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(CommandError {
                command,
                reason: format!("exited with {status}"),
                output: String::new(),
            })
        }
    }
}

/// Resolve `binary` to an executable file.
///
/// Names containing a path separator are checked as given; bare names are
/// searched for in each `PATH` entry.
pub fn locate(binary: &str) -> Result<PathBuf, BotError> {
    let not_found = || BotError::GcloudNotFound {
        binary: binary.to_string(),
    };

    if binary.contains(std::path::MAIN_SEPARATOR) || binary.contains('/') {
        let path = PathBuf::from(binary);
        return if is_executable(&path) {
            Ok(path)
        } else {
            Err(not_found())
        };
    }

    let search = std::env::var_os("PATH").ok_or_else(not_found)?;
    std::env::split_paths(&search)
        .flat_map(|dir| candidates(&dir, binary))
        .find(|p| is_executable(p))
        .inspect(|p| tracing::debug!(path = %p.display(), "found gcloud"))
        .ok_or_else(not_found)
}

#[cfg(windows)]
fn candidates(dir: &Path, binary: &str) -> Vec<PathBuf> {
    ["", ".exe", ".cmd", ".bat"]
        .iter()
        .map(|ext| dir.join(format!("{binary}{ext}")))
        .collect()
}

#[cfg(not(windows))]
fn candidates(dir: &Path, binary: &str) -> Vec<PathBuf> {
    vec![dir.join(binary)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("gcloud");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn run_combines_stdout_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(&dir, "echo out; echo err >&2");
        let out = GcloudCli::new(bin, false).run(&["anything"]).unwrap();
        assert!(out.contains("out"));
        assert!(out.contains("err"));
    }

    #[test]
    fn run_passes_arguments_through() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(&dir, "echo \"$@\"");
        let out = GcloudCli::new(bin, false)
            .run(&["config", "get-value", "compute/zone"])
            .unwrap();
        assert_eq!(out.trim(), "config get-value compute/zone");
    }

    #[test]
    fn run_failure_keeps_output() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(&dir, "echo 'ERROR: quota exceeded'; exit 1");
        let err = GcloudCli::new(bin, false)
            .run(&["compute", "instances", "create", "x"])
            .unwrap_err();
        assert!(err.output.contains("quota exceeded"));
        assert!(err.command.ends_with("compute instances create x"));
    }

    #[test]
    fn run_missing_binary_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GcloudCli::new(dir.path().join("missing"), false)
            .run(&["version"])
            .unwrap_err();
        assert!(err.reason.contains("could not be run"));
    }

    #[test]
    fn locate_accepts_executable_path() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(&dir, "exit 0");
        assert_eq!(locate(bin.to_str().unwrap()).unwrap(), bin);
    }

    #[test]
    fn locate_rejects_missing_path() {
        let err = locate("/nonexistent/dir/gcloud").unwrap_err();
        assert!(matches!(err, BotError::GcloudNotFound { .. }));
    }

    #[test]
    fn locate_rejects_non_executable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gcloud");
        std::fs::write(&path, "not a program").unwrap();
        assert!(locate(path.to_str().unwrap()).is_err());
    }
}
