//! Runtime platform detection
//!
//! The engine has exactly two platform-dependent behaviours: the default
//! hosts file location and the auto-detected hostnames-per-line cap. The DNS
//! flush collaborator also picks its commands from this value. Everything is
//! decided at runtime so each branch stays testable on any host.

use std::fmt;
use std::path::PathBuf;

/// Default cap on hostnames per line on Windows.
///
/// The Windows resolver silently ignores names past roughly the ninth entry
/// on a single line.
pub const DEFAULT_MAX_HOSTS_PER_LINE_WINDOWS: usize = 9;

const UNIX_HOSTS_PATH: &str = "/etc/hosts";
const WINDOWS_FALLBACK_HOSTS_PATH: &str = r"C:\Windows\System32\drivers\etc\hosts";

/// Operating system family the process runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Linux
    Linux,
    /// macOS
    MacOs,
    /// Windows
    Windows,
    /// Anything else, carrying the `std::env::consts::OS` name
    Other(&'static str),
}

impl Platform {
    /// Detect the current platform
    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` style name to a platform
    pub fn from_os_name(os: &'static str) -> Self {
        match os {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            other => Platform::Other(other),
        }
    }

    /// Short lowercase name used in logs and errors
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::Windows => "windows",
            Platform::Other(name) => name,
        }
    }

    /// Hostnames-per-line cap used when the configuration asks for auto-detection.
    ///
    /// `0` means unlimited.
    pub fn default_max_hosts_per_line(&self) -> usize {
        match self {
            Platform::Windows => DEFAULT_MAX_HOSTS_PER_LINE_WINDOWS,
            _ => 0,
        }
    }

    /// Default hosts file location for this platform.
    ///
    /// On Windows `system_root` is the value of `%SystemRoot%`, if set.
    pub fn default_hosts_path(&self, system_root: Option<&str>) -> PathBuf {
        match self {
            Platform::Windows => match system_root {
                Some(root) if !root.is_empty() => PathBuf::from(root)
                    .join("System32")
                    .join("drivers")
                    .join("etc")
                    .join("hosts"),
                _ => PathBuf::from(WINDOWS_FALLBACK_HOSTS_PATH),
            },
            _ => PathBuf::from(UNIX_HOSTS_PATH),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default hosts file location for the running platform
pub fn default_hosts_path() -> PathBuf {
    let system_root = std::env::var("SystemRoot").ok();
    Platform::current().default_hosts_path(system_root.as_deref())
}
