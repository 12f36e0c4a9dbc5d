//! Mutation engine
//!
//! [`HostsTable`] owns the line list and implements every add, reassign and
//! remove operation on it. It performs no I/O and no locking; the
//! [`Hosts`](crate::Hosts) shell wraps it in a mutex and feeds it from a
//! file or raw text.
//!
//! ## Invariants
//!
//! - every address line keeps at least one hostname; a line emptied by a
//!   removal is deleted
//! - a hostname sits on at most one non-loopback address per IP family
//! - new lines are only ever appended; existing lines are shrunk or removed
//!   in place, so the relative order of untouched lines never changes
//! - lines that already exceed the packing cap are never split

pub mod packing;
mod query;

pub use packing::PackingPolicy;
pub use query::{HostEntry, HostLocation};

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::model::address::{self, IpFamily};
use crate::model::{Line, parse_str, render};

/// Line list plus the packing policy used when adding hostnames
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostsTable {
    lines: Vec<Line>,
    packing: PackingPolicy,
}

impl HostsTable {
    /// Create a table from already parsed lines
    pub fn new(lines: Vec<Line>, packing: PackingPolicy) -> Self {
        Self { lines, packing }
    }

    /// Parse hosts text into a table
    pub fn parse(text: &str, packing: PackingPolicy) -> Self {
        Self::new(parse_str(text), packing)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    pub fn packing(&self) -> PackingPolicy {
        self.packing
    }

    /// Replace every line, keeping the packing policy
    pub fn replace_lines(&mut self, lines: Vec<Line>) {
        self.lines = lines;
    }

    /// Render the table as hosts file text
    pub fn render(&self) -> String {
        render(&self.lines)
    }

    /// Add `hostname` at `address` with an optional grouping comment.
    ///
    /// Returns `true` when the table changed. An address that is not a valid
    /// IPv4/IPv6 literal, or an empty hostname, is a silent no-op.
    pub fn add_host(&mut self, address: &str, hostname: &str, comment: &str) -> bool {
        let address = normalize(address);
        let Some(family) = IpFamily::of(&address) else {
            trace!("Ignoring add of {:?}: {:?} is not an IP address", hostname, address);
            return false;
        };
        let hostname = normalize(hostname);
        if hostname.is_empty() {
            trace!("Ignoring add of an empty hostname at {}", address);
            return false;
        }
        let comment = normalize_comment(comment);

        let detached = self.detach_from_other_addresses(&hostname, &address, family);

        let already_present = self
            .lines
            .iter()
            .filter_map(Line::entry)
            .any(|e| e.address == address && e.has_hostname(&hostname));
        if already_present {
            trace!("{} already maps to {}", hostname, address);
            return detached;
        }

        let packing = self.packing;
        let open_line = self
            .lines
            .iter_mut()
            .filter_map(Line::entry_mut)
            .find(|e| {
                e.address == address && e.comment == comment && packing.has_room(e.hostnames.len())
            });

        match open_line {
            Some(entry) => entry.hostnames.push(hostname.clone()),
            None => self
                .lines
                .push(Line::new_address(address.clone(), vec![hostname.clone()], comment.as_str())),
        }
        debug!("Added {} at {}", hostname, address);
        true
    }

    /// Add several hostnames at one address; `true` if any of them changed the table
    pub fn add_hosts<S: AsRef<str>>(&mut self, address: &str, hostnames: &[S], comment: &str) -> bool {
        hostnames.iter().fold(false, |changed, host| {
            self.add_host(address, host.as_ref(), comment) | changed
        })
    }

    /// Move hostnames from `old_address` to `new_address`.
    ///
    /// Unlike [`add_host`](Self::add_host) this removes the hostnames from
    /// `old_address` even when it is a loopback address. Nothing happens when
    /// `new_address` is not a valid IP literal or equals `old_address`.
    pub fn reassign_hosts<S: AsRef<str>>(
        &mut self,
        old_address: &str,
        new_address: &str,
        hostnames: &[S],
        comment: &str,
    ) -> bool {
        if IpFamily::of(new_address).is_none() {
            trace!("Ignoring reassign to {:?}: not an IP address", new_address);
            return false;
        }
        let old_address = normalize(old_address);
        if old_address == normalize(new_address) {
            trace!("Ignoring reassign of {} to itself", old_address);
            return false;
        }

        let mut mutated = false;
        for host in hostnames {
            let host = normalize(host.as_ref());
            if host.is_empty() {
                continue;
            }
            let mut detached = false;
            for entry in self.lines.iter_mut().filter_map(Line::entry_mut) {
                if entry.address == old_address {
                    let before = entry.hostnames.len();
                    entry.hostnames.retain(|h| *h != host);
                    detached |= entry.hostnames.len() != before;
                }
            }
            if detached {
                self.drop_empty_address_lines();
                debug!("Detached {} from {}", host, old_address);
            }
            mutated |= detached;
            mutated |= self.add_host(new_address, &host, comment);
        }
        mutated
    }

    /// Remove the first occurrence of `hostname`; `true` if one was found
    pub fn remove_first_host(&mut self, hostname: &str) -> bool {
        let hostname = normalize(hostname);

        let found = self.lines.iter().enumerate().find_map(|(line_idx, line)| {
            let entry = line.entry()?;
            let host_idx = entry.hostnames.iter().position(|h| *h == hostname)?;
            Some((line_idx, host_idx))
        });

        let Some((line_idx, host_idx)) = found else {
            return false;
        };

        let now_empty = match self.lines[line_idx].entry_mut() {
            Some(entry) => {
                entry.hostnames.remove(host_idx);
                entry.hostnames.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.lines.remove(line_idx);
        }
        debug!("Removed {} from line {}", hostname, line_idx);
        true
    }

    /// Remove every occurrence of `hostname`
    pub fn remove_host(&mut self, hostname: &str) -> bool {
        let mut removed = false;
        while self.remove_first_host(hostname) {
            removed = true;
        }
        removed
    }

    /// Remove every occurrence of each hostname
    pub fn remove_hosts<S: AsRef<str>>(&mut self, hostnames: &[S]) -> bool {
        hostnames
            .iter()
            .fold(false, |changed, host| self.remove_host(host.as_ref()) | changed)
    }

    /// Remove the first line with exactly this address
    pub fn remove_first_address(&mut self, address: &str) -> bool {
        let address = normalize(address);
        let Some(idx) = self
            .lines
            .iter()
            .position(|l| l.address() == Some(address.as_str()))
        else {
            return false;
        };
        self.lines.remove(idx);
        debug!("Removed line {} for {}", idx, address);
        true
    }

    /// Remove every line with exactly this address
    pub fn remove_address(&mut self, address: &str) -> bool {
        let mut removed = false;
        while self.remove_first_address(address) {
            removed = true;
        }
        removed
    }

    /// Remove every line carrying any of these addresses
    pub fn remove_addresses<S: AsRef<str>>(&mut self, addresses: &[S]) -> bool {
        addresses
            .iter()
            .fold(false, |changed, addr| self.remove_address(addr.as_ref()) | changed)
    }

    /// Remove every address line whose comment equals `comment` after trimming.
    ///
    /// An empty `comment` matches address lines without a comment. Comment,
    /// empty and unknown lines are never touched.
    pub fn remove_by_comment(&mut self, comment: &str) -> bool {
        let comment = normalize_comment(comment);
        let before = self.lines.len();
        self.lines
            .retain(|line| line.entry().is_none_or(|e| e.comment != comment));
        let removed = before - self.lines.len();
        if removed > 0 {
            debug!("Removed {} line(s) with comment {:?}", removed, comment);
        }
        removed > 0
    }

    /// Remove lines for each comment in turn
    pub fn remove_by_comments<S: AsRef<str>>(&mut self, comments: &[S]) -> bool {
        comments
            .iter()
            .fold(false, |changed, c| self.remove_by_comment(c.as_ref()) | changed)
    }

    /// Remove every line whose address falls inside any of the CIDR ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCidr`] without touching the table when any
    /// range fails to parse.
    pub fn remove_cidrs<S: AsRef<str>>(&mut self, cidrs: &[S]) -> Result<bool> {
        let networks = cidrs
            .iter()
            .map(|c| address::parse_cidr(c.as_ref()).map_err(|e| Error::invalid_cidr(c.as_ref(), e)))
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        let doomed: Vec<String> = self
            .lines
            .iter()
            .filter_map(Line::address)
            .filter(|addr| networks.iter().any(|net| address::cidr_contains(net, addr)))
            .filter(|addr| seen.insert(addr.to_string()))
            .map(str::to_string)
            .collect();

        debug!("CIDR removal matched {} address(es)", doomed.len());
        Ok(self.remove_addresses(&doomed))
    }

    /// Strip `hostname` from same-family lines at other, non-loopback addresses
    fn detach_from_other_addresses(&mut self, hostname: &str, address: &str, family: IpFamily) -> bool {
        let mut detached = false;
        for entry in self.lines.iter_mut().filter_map(Line::entry_mut) {
            if entry.address == address || entry.is_loopback() || entry.family() != Some(family) {
                continue;
            }
            let before = entry.hostnames.len();
            entry.hostnames.retain(|h| h != hostname);
            if entry.hostnames.len() != before {
                debug!("Moving {} off {}", hostname, entry.address);
                detached = true;
            }
        }
        if detached {
            self.drop_empty_address_lines();
        }
        detached
    }

    fn drop_empty_address_lines(&mut self) {
        self.lines
            .retain(|line| line.entry().is_none_or(|e| !e.hostnames.is_empty()));
    }
}

/// Trim and lowercase user-supplied addresses and hostnames
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Comments live on a single line: control characters become spaces
fn normalize_comment(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
