// # DNS Cache Flush
//
// Tells the operating system resolver to drop cached answers after the hosts
// file changed. The platform is a runtime value so every branch can be
// exercised from any host with a recording `CommandRunner`.
//
// ## Commands
//
// - Linux: `resolvectl flush-caches`, falling back to
//   `systemd-resolve --flush-caches`
// - macOS: `dscacheutil -flushcache`, then `killall -HUP mDNSResponder`
//   (the second step is best effort)
// - Windows: `ipconfig /flushdns`
//
// Other resolvers (dnsmasq, unbound, nscd) depend on per-site setup and are
// not handled.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::platform::Platform;
use crate::traits::{CommandRunner, SystemCommandRunner};

/// A DNS cache flush failed
#[derive(Debug, Error)]
#[error("failed to flush DNS cache on {platform} ({command}): {reason}")]
pub struct FlushError {
    /// Platform the flush was attempted on
    pub platform: Platform,
    /// Command line that failed, empty when nothing could be run
    pub command: String,
    #[source]
    pub reason: FlushFailure,
}

/// Why a flush failed
#[derive(Debug, Error)]
pub enum FlushFailure {
    #[error("command failed: {0}")]
    Command(#[source] io::Error),

    #[error(
        "systemd-resolved not detected (tried resolvectl, systemd-resolve); \
         without a local DNS cache hosts changes apply immediately"
    )]
    NoResolver,

    #[error("unsupported platform")]
    Unsupported,
}

impl FlushError {
    fn new(platform: Platform, command: impl Into<String>, reason: FlushFailure) -> Self {
        Self {
            platform,
            command: command.into(),
            reason,
        }
    }

    /// True when no flush mechanism exists, as opposed to a command failing
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self.reason,
            FlushFailure::NoResolver | FlushFailure::Unsupported
        )
    }
}

/// Picks and runs the flush commands for one platform
#[derive(Clone)]
pub struct DnsFlusher {
    platform: Platform,
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for DnsFlusher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsFlusher")
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl DnsFlusher {
    pub fn new(platform: Platform, runner: Arc<dyn CommandRunner>) -> Self {
        Self { platform, runner }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Replace the command runner, keeping the platform
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Flush the resolver cache
    ///
    /// # Errors
    ///
    /// [`FlushError`] naming the platform, the failing command and the cause.
    pub fn flush(&self) -> Result<(), FlushError> {
        debug!("Flushing DNS cache on {}", self.platform);
        match self.platform {
            Platform::Linux => self.flush_linux(),
            Platform::MacOs => self.flush_macos(),
            Platform::Windows => self.run_step("ipconfig", &["/flushdns"]),
            Platform::Other(_) => Err(FlushError::new(self.platform, "", FlushFailure::Unsupported)),
        }?;
        info!("DNS cache flushed on {}", self.platform);
        Ok(())
    }

    fn flush_linux(&self) -> Result<(), FlushError> {
        if self.runner.is_available("resolvectl") {
            return self.run_step("resolvectl", &["flush-caches"]);
        }
        if self.runner.is_available("systemd-resolve") {
            return self.run_step("systemd-resolve", &["--flush-caches"]);
        }
        Err(FlushError::new(self.platform, "", FlushFailure::NoResolver))
    }

    fn flush_macos(&self) -> Result<(), FlushError> {
        self.run_step("dscacheutil", &["-flushcache"])?;
        // mDNSResponder may not be running; the cache is already cleared.
        if let Err(e) = self.run_step("killall", &["-HUP", "mDNSResponder"]) {
            warn!("Ignoring mDNSResponder restart failure: {}", e);
        }
        Ok(())
    }

    fn run_step(&self, program: &str, args: &[&str]) -> Result<(), FlushError> {
        self.runner.run(program, args).map_err(|e| {
            FlushError::new(
                self.platform,
                command_line(program, args),
                FlushFailure::Command(e),
            )
        })
    }
}

impl Default for DnsFlusher {
    fn default() -> Self {
        Self::new(Platform::current(), Arc::new(SystemCommandRunner::new()))
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
