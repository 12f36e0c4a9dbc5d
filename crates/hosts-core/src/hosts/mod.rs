// # Hosts Document
//
// Thread-safe handle over one hosts file (or an in-memory text). Every
// operation takes the document lock exactly once, so bulk operations are
// atomic with respect to other threads and `save` renders a consistent
// snapshot.
//
// ## Usage
//
// ```rust,no_run
// use hosts_core::{Hosts, HostsConfig};
//
// fn main() -> hosts_core::Result<()> {
//     let hosts = Hosts::new(HostsConfig::from_path("/etc/hosts"))?;
//     hosts.add_host_with_comment("127.0.0.1", "api.local", "dev");
//     hosts.save()?;
//     Ok(())
// }
// ```

mod file;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::config::HostsConfig;
use crate::engine::{HostEntry, HostLocation, HostsTable};
use crate::error::{Error, Result};
use crate::flush::DnsFlusher;
use crate::model::{IpFamily, Line, parse_file};
use crate::traits::CommandRunner;

pub use file::backup_path;

/// Where the document came from and where it goes
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    File { read_path: PathBuf, write_path: PathBuf },
    RawText,
}

/// A hosts document guarded by a single lock
#[derive(Debug)]
pub struct Hosts {
    table: Mutex<HostsTable>,
    config: HostsConfig,
    source: Source,
    flusher: DnsFlusher,
}

impl Hosts {
    /// Open a document from a file or from raw text
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] when raw text is combined with a path
    /// - [`Error::Io`] when the read path cannot be read
    pub fn new(config: HostsConfig) -> Result<Self> {
        config.validate()?;

        let packing = config.packing();
        let (table, source) = match &config.raw_text {
            Some(text) => {
                debug!("Loading hosts document from raw text ({} bytes)", text.len());
                (HostsTable::parse(text, packing), Source::RawText)
            }
            None => {
                let read_path = config.resolved_read_path();
                let write_path = config.resolved_write_path();
                let lines = parse_file(&read_path)?;
                debug!(
                    "Loaded {} ({} lines), writing to {}",
                    read_path.display(),
                    lines.len(),
                    write_path.display()
                );
                (
                    HostsTable::new(lines, packing),
                    Source::File {
                        read_path,
                        write_path,
                    },
                )
            }
        };

        Ok(Self {
            table: Mutex::new(table),
            config,
            source,
            flusher: DnsFlusher::default(),
        })
    }

    /// Use `runner` for DNS cache flushes instead of the system one
    pub fn with_command_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.flusher = self.flusher.with_runner(runner);
        self
    }

    /// Replace the DNS flusher, e.g. to target another platform's commands
    pub fn with_flusher(mut self, flusher: DnsFlusher) -> Self {
        self.flusher = flusher;
        self
    }

    pub fn config(&self) -> &HostsConfig {
        &self.config
    }

    pub fn is_raw_text(&self) -> bool {
        self.source == Source::RawText
    }

    /// File the document was read from; `None` for raw text
    pub fn read_path(&self) -> Option<&Path> {
        match &self.source {
            Source::File { read_path, .. } => Some(read_path),
            Source::RawText => None,
        }
    }

    /// File `save` writes to; `None` for raw text
    pub fn write_path(&self) -> Option<&Path> {
        match &self.source {
            Source::File { write_path, .. } => Some(write_path),
            Source::RawText => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HostsTable> {
        // Every engine operation leaves the table consistent, so a panic in
        // another thread does not invalidate it.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub fn add_host(&self, address: &str, hostname: &str) -> bool {
        self.lock().add_host(address, hostname, "")
    }

    pub fn add_host_with_comment(&self, address: &str, hostname: &str, comment: &str) -> bool {
        self.lock().add_host(address, hostname, comment)
    }

    pub fn add_hosts<S: AsRef<str>>(&self, address: &str, hostnames: &[S]) -> bool {
        self.lock().add_hosts(address, hostnames, "")
    }

    pub fn add_hosts_with_comment<S: AsRef<str>>(
        &self,
        address: &str,
        hostnames: &[S],
        comment: &str,
    ) -> bool {
        self.lock().add_hosts(address, hostnames, comment)
    }

    /// Move hostnames from one address to another, including off loopback
    pub fn reassign_hosts<S: AsRef<str>>(
        &self,
        old_address: &str,
        new_address: &str,
        hostnames: &[S],
        comment: &str,
    ) -> bool {
        self.lock()
            .reassign_hosts(old_address, new_address, hostnames, comment)
    }

    pub fn remove_first_host(&self, hostname: &str) -> bool {
        self.lock().remove_first_host(hostname)
    }

    pub fn remove_host(&self, hostname: &str) -> bool {
        self.lock().remove_host(hostname)
    }

    pub fn remove_hosts<S: AsRef<str>>(&self, hostnames: &[S]) -> bool {
        self.lock().remove_hosts(hostnames)
    }

    pub fn remove_first_address(&self, address: &str) -> bool {
        self.lock().remove_first_address(address)
    }

    pub fn remove_address(&self, address: &str) -> bool {
        self.lock().remove_address(address)
    }

    pub fn remove_addresses<S: AsRef<str>>(&self, addresses: &[S]) -> bool {
        self.lock().remove_addresses(addresses)
    }

    pub fn remove_by_comment(&self, comment: &str) -> bool {
        self.lock().remove_by_comment(comment)
    }

    pub fn remove_by_comments<S: AsRef<str>>(&self, comments: &[S]) -> bool {
        self.lock().remove_by_comments(comments)
    }

    /// Remove every line whose address lies in any of the ranges
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCidr`] if any range is malformed; nothing is removed.
    pub fn remove_cidrs<S: AsRef<str>>(&self, cidrs: &[S]) -> Result<bool> {
        self.lock().remove_cidrs(cidrs)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn lookup(&self, hostname: &str, family: IpFamily) -> Option<HostLocation> {
        self.lock().lookup(hostname, family)
    }

    pub fn list_hosts_by_address(&self, address: &str) -> Vec<String> {
        self.lock().list_hosts_by_address(address)
    }

    pub fn list_addresses_by_host(&self, hostname: &str, exact: bool) -> Vec<HostEntry> {
        self.lock().list_addresses_by_host(hostname, exact)
    }

    pub fn list_hosts_by_cidr(&self, cidr: &str) -> Vec<HostEntry> {
        self.lock().list_hosts_by_cidr(cidr)
    }

    pub fn list_hosts_by_comment(&self, comment: &str) -> Vec<String> {
        self.lock().list_hosts_by_comment(comment)
    }

    /// Copy of the current lines
    pub fn lines(&self) -> Vec<Line> {
        self.lock().lines().to_vec()
    }

    /// Render the document as hosts file text
    pub fn render(&self) -> String {
        self.lock().render()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Discard in-memory changes and re-read the read path
    pub fn reload(&self) -> Result<()> {
        let Source::File { read_path, .. } = &self.source else {
            return Err(Error::raw_text_mode("reload"));
        };

        let lines = parse_file(read_path)?;
        debug!("Reloaded {} ({} lines)", read_path.display(), lines.len());
        self.lock().replace_lines(lines);
        Ok(())
    }

    /// Write the document to its write path
    ///
    /// # Errors
    ///
    /// - [`Error::RawTextMode`] for raw-text documents
    /// - [`Error::Io`] when writing fails
    /// - [`Error::Flush`] when auto flush is on and the flush failed; the
    ///   file has been written in that case
    pub fn save(&self) -> Result<()> {
        let Source::File { write_path, .. } = &self.source else {
            return Err(Error::raw_text_mode("save"));
        };
        self.write_to(write_path)
    }

    /// Write the document to `path` instead of the write path
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        if self.is_raw_text() {
            return Err(Error::raw_text_mode("save"));
        }
        self.write_to(path.as_ref())
    }

    /// Flush the operating system DNS cache
    pub fn flush_dns_cache(&self) -> Result<()> {
        self.flusher.flush()?;
        Ok(())
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        {
            let table = self.lock();
            file::write_atomic(path, &table.render(), self.config.backup)?;
            info!("Saved {} ({} lines)", path.display(), table.lines().len());
        }

        if self.config.auto_flush {
            self.flush_dns_cache()?;
        }
        Ok(())
    }
}
