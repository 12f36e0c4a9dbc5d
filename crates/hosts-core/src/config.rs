//! Configuration for a hosts document
//!
//! A document is backed either by a file (read path plus optional separate
//! write path) or by raw text held in memory. With neither set the platform
//! default hosts file is used.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::engine::PackingPolicy;
use crate::platform::{self, Platform};

/// Options for opening a [`Hosts`](crate::Hosts) document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostsConfig {
    /// File to read; platform default when unset
    #[serde(default)]
    pub read_path: Option<PathBuf>,

    /// File to write; the read path when unset
    #[serde(default)]
    pub write_path: Option<PathBuf>,

    /// In-memory content; a document built from it cannot be saved or reloaded
    #[serde(default)]
    pub raw_text: Option<String>,

    /// Hostnames-per-line cap: positive explicit, negative unlimited, zero auto
    #[serde(default)]
    pub max_hosts_per_line: i64,

    /// Flush the OS DNS cache after every successful save
    #[serde(default)]
    pub auto_flush: bool,

    /// Copy the previous file to `<file>.backup` before overwriting it
    #[serde(default)]
    pub backup: bool,
}

impl HostsConfig {
    /// Configuration for the platform default hosts file
    pub fn new() -> Self {
        Self::default()
    }

    /// Read from (and by default write to) `path`
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            read_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Work on in-memory text only
    pub fn from_raw_text(text: impl Into<String>) -> Self {
        Self {
            raw_text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_write_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.write_path = Some(path.into());
        self
    }

    pub fn with_max_hosts_per_line(mut self, max: i64) -> Self {
        self.max_hosts_per_line = max;
        self
    }

    pub fn with_auto_flush(mut self, enabled: bool) -> Self {
        self.auto_flush = enabled;
        self
    }

    pub fn with_backup(mut self, enabled: bool) -> Self {
        self.backup = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.raw_text.is_some() && (self.read_path.is_some() || self.write_path.is_some()) {
            return Err(crate::Error::config(
                "raw text cannot be combined with a read or write path",
            ));
        }
        if is_blank(self.read_path.as_deref()) {
            return Err(crate::Error::config("read path cannot be empty"));
        }
        if is_blank(self.write_path.as_deref()) {
            return Err(crate::Error::config("write path cannot be empty"));
        }
        Ok(())
    }

    /// True when the document lives in memory only
    pub fn is_raw_text(&self) -> bool {
        self.raw_text.is_some()
    }

    /// Read path with the platform default applied
    pub fn resolved_read_path(&self) -> PathBuf {
        self.read_path
            .clone()
            .unwrap_or_else(platform::default_hosts_path)
    }

    /// Write path, falling back to the resolved read path
    pub fn resolved_write_path(&self) -> PathBuf {
        self.write_path
            .clone()
            .unwrap_or_else(|| self.resolved_read_path())
    }

    /// Packing policy for the running platform
    pub fn packing(&self) -> PackingPolicy {
        PackingPolicy::new(self.max_hosts_per_line, Platform::current())
    }
}

fn is_blank(path: Option<&Path>) -> bool {
    path.is_some_and(|p| p.as_os_str().is_empty())
}
