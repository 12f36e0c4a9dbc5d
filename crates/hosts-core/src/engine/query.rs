//! Read-only queries over a [`HostsTable`]

use serde::Serialize;

use super::{HostsTable, normalize};
use crate::model::Line;
use crate::model::address::{self, IpFamily};

/// One (address, hostname) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostEntry {
    pub address: String,
    pub hostname: String,
}

/// Where a hostname was found by [`HostsTable::lookup`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostLocation {
    pub address: String,
    /// Index into the current line list
    pub line_index: usize,
}

impl HostsTable {
    /// First line listing `hostname` whose address parses in `family`
    pub fn lookup(&self, hostname: &str, family: IpFamily) -> Option<HostLocation> {
        let hostname = normalize(hostname);
        self.lines().iter().enumerate().find_map(|(line_index, line)| {
            let entry = line.entry()?;
            (entry.family() == Some(family) && entry.has_hostname(&hostname)).then(|| HostLocation {
                address: entry.address.clone(),
                line_index,
            })
        })
    }

    /// Every hostname on lines with exactly this address, in file order
    pub fn list_hosts_by_address(&self, address: &str) -> Vec<String> {
        let address = normalize(address);
        self.lines()
            .iter()
            .filter_map(Line::entry)
            .filter(|e| e.address == address)
            .flat_map(|e| e.hostnames.iter().cloned())
            .collect()
    }

    /// Address/hostname pairs for `hostname`; substring matches unless `exact`
    pub fn list_addresses_by_host(&self, hostname: &str, exact: bool) -> Vec<HostEntry> {
        let needle = normalize(hostname);
        let matches = |candidate: &str| {
            if exact {
                candidate == needle
            } else {
                candidate.contains(needle.as_str())
            }
        };

        self.lines()
            .iter()
            .filter_map(Line::entry)
            .flat_map(|e| {
                e.hostnames
                    .iter()
                    .filter(move |h| matches(h.as_str()))
                    .map(move |h| HostEntry {
                        address: e.address.clone(),
                        hostname: h.clone(),
                    })
            })
            .collect()
    }

    /// Address/hostname pairs for every address inside `cidr`.
    ///
    /// A malformed range yields an empty list.
    pub fn list_hosts_by_cidr(&self, cidr: &str) -> Vec<HostEntry> {
        let Ok(network) = address::parse_cidr(cidr) else {
            return Vec::new();
        };

        self.lines()
            .iter()
            .filter_map(Line::entry)
            .filter(|e| address::cidr_contains(&network, &e.address))
            .flat_map(|e| {
                e.hostnames.iter().map(move |h| HostEntry {
                    address: e.address.clone(),
                    hostname: h.clone(),
                })
            })
            .collect()
    }

    /// Every hostname on lines tagged with `comment`
    pub fn list_hosts_by_comment(&self, comment: &str) -> Vec<String> {
        let comment = super::normalize_comment(comment);
        self.lines()
            .iter()
            .filter_map(Line::entry)
            .filter(|e| e.comment == comment)
            .flat_map(|e| e.hostnames.iter().cloned())
            .collect()
    }
}
