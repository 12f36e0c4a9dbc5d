// # Command Runner Trait
//
// Seam between the DNS flusher and the operating system. The flusher only
// decides *which* commands to run; a `CommandRunner` decides *how*.
//
// ## Implementations
//
// - [`SystemCommandRunner`]: `PATH` lookup plus `std::process::Command`
// - Test doubles that record invocations (see the crate's contract tests)

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::trace;

/// Runs external programs on behalf of the DNS flusher
///
/// Implementations must be thread-safe: a [`Hosts`](crate::Hosts) document is
/// shared across threads and may flush from any of them.
pub trait CommandRunner: Send + Sync {
    /// True when `program` can be found and executed
    fn is_available(&self, program: &str) -> bool;

    /// Run `program` with `args` to completion
    ///
    /// A non-zero exit status is an error.
    fn run(&self, program: &str, args: &[&str]) -> io::Result<()>;
}

/// [`CommandRunner`] backed by the real process table
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }

    fn find_in_path(program: &str) -> Option<PathBuf> {
        let candidate = Path::new(program);
        if candidate.components().count() > 1 {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }

        let path = std::env::var_os("PATH")?;
        std::env::split_paths(&path).find_map(|dir| {
            let full = dir.join(program);
            if full.is_file() {
                return Some(full);
            }
            let exe = full.with_extension("exe");
            (cfg!(windows) && exe.is_file()).then_some(exe)
        })
    }
}

impl CommandRunner for SystemCommandRunner {
    fn is_available(&self, program: &str) -> bool {
        let found = Self::find_in_path(program);
        trace!("Lookup of {}: {:?}", program, found);
        found.is_some()
    }

    fn run(&self, program: &str, args: &[&str]) -> io::Result<()> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let code = output.status.code().unwrap_or(-1);
        Err(io::Error::other(format!(
            "exited with code {}: {}",
            code,
            stderr.trim()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_program_is_unavailable() {
        let runner = SystemCommandRunner::new();
        assert!(!runner.is_available("definitely-not-a-real-program-4242"));
    }

    #[test]
    fn running_a_missing_program_is_an_io_error() {
        let runner = SystemCommandRunner::new();
        let err = runner
            .run("definitely-not-a-real-program-4242", &[])
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_an_error() {
        let runner = SystemCommandRunner::new();
        assert!(runner.is_available("sh"));
        runner.run("sh", &["-c", "exit 0"]).unwrap();

        let err = runner.run("sh", &["-c", "echo boom >&2; exit 3"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("code 3"), "{msg}");
        assert!(msg.contains("boom"), "{msg}");
    }
}
