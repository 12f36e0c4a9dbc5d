//! Command handlers
//!
//! Each handler validates its arguments, applies the change through
//! [`hosts_core::Hosts`] and then either saves or, in dry-run mode, prints the
//! resulting file.

use std::io::Write;

use anyhow::{Context, Result};
use hosts_core::Hosts;
use serde::Serialize;
use tracing::{info, warn};

use crate::validation::{validate_all, validate_cidr, validate_hostname, validate_ip};
use crate::{Command, Config, ListQuery, RemoveTarget};

/// Run one command against the hosts file described by `config`
pub fn run(config: &Config, command: &Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Version => {
            writeln!(out, "hostsctl version {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
        Command::Show => {
            let hosts = open(config)?;
            write!(out, "{}", hosts.render())?;
            Ok(())
        }
        Command::Add { ip, hosts, comment } => add(config, ip, hosts, comment, out),
        Command::Update {
            old_ip,
            new_ip,
            hosts,
            comment,
        } => update(config, old_ip, new_ip, hosts, comment, out),
        Command::Remove(target) => remove(config, target, out),
        Command::List(query) => list(config, query, out),
    }
}

fn open(config: &Config) -> Result<Hosts> {
    let hosts_config = config.hosts_config();
    let path = hosts_config.resolved_read_path();
    Hosts::new(hosts_config).with_context(|| format!("could not load {}", path.display()))
}

fn add(
    config: &Config,
    ip: &str,
    hostnames: &[String],
    comment: &str,
    out: &mut dyn Write,
) -> Result<()> {
    validate_ip(ip)?;
    validate_all(hostnames, validate_hostname)?;

    if !config.quiet && !config.dry_run {
        writeln!(
            out,
            "Adding host(s) \"{}\" to IP address {}",
            hostnames.join(" "),
            ip
        )?;
    }

    let hosts = open(config)?;
    hosts.add_hosts_with_comment(ip, hostnames, comment);
    persist(config, &hosts, out)
}

fn update(
    config: &Config,
    old_ip: &str,
    new_ip: &str,
    hostnames: &[String],
    comment: &str,
    out: &mut dyn Write,
) -> Result<()> {
    validate_ip(old_ip)?;
    validate_ip(new_ip)?;
    validate_all(hostnames, validate_hostname)?;

    if !config.quiet && !config.dry_run {
        writeln!(
            out,
            "Updating host(s) \"{}\" from IP address {} to {}",
            hostnames.join(" "),
            old_ip,
            new_ip
        )?;
    }

    let hosts = open(config)?;
    hosts.reassign_hosts(old_ip, new_ip, hostnames, comment);
    persist(config, &hosts, out)
}

fn remove(config: &Config, target: &RemoveTarget, out: &mut dyn Write) -> Result<()> {
    let announce = |out: &mut dyn Write, what: &str, items: &[String]| -> Result<()> {
        if !config.quiet && !config.dry_run {
            writeln!(out, "Removing {} \"{}\"", what, items.join(" "))?;
        }
        Ok(())
    };

    match target {
        RemoveTarget::Host { hosts: names } => {
            validate_all(names, validate_hostname)?;
            announce(out, "host(s)", names)?;
            let hosts = open(config)?;
            hosts.remove_hosts(names);
            persist(config, &hosts, out)
        }
        RemoveTarget::Ip { ips } => {
            validate_all(ips, validate_ip)?;
            announce(out, "ip(s)", ips)?;
            let hosts = open(config)?;
            hosts.remove_addresses(ips);
            persist(config, &hosts, out)
        }
        RemoveTarget::Cidr { cidrs } => {
            validate_all(cidrs, validate_cidr)?;
            announce(out, "ip range(s)", cidrs)?;
            let hosts = open(config)?;
            hosts
                .remove_cidrs(cidrs)
                .context("there was a problem parsing a CIDR")?;
            persist(config, &hosts, out)
        }
        RemoveTarget::Comment { comments } => {
            announce(out, "all hosts with comment(s)", comments)?;
            let hosts = open(config)?;
            hosts.remove_by_comments(comments);
            persist(config, &hosts, out)
        }
    }
}

/// One row of list output
#[derive(Debug, Serialize)]
struct Row<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    address: String,
    hostname: String,
}

fn list(config: &Config, query: &ListQuery, out: &mut dyn Write) -> Result<()> {
    match query {
        ListQuery::Ip { ips } => validate_all(ips, validate_ip)?,
        ListQuery::Cidr { cidrs } => validate_all(cidrs, validate_cidr)?,
        ListQuery::Host { .. } | ListQuery::Comment { .. } => {}
    }

    let hosts = open(config)?;

    if let ListQuery::Comment { comment } = query {
        let names = hosts.list_hosts_by_comment(comment);
        if config.json {
            serde_json::to_writer_pretty(&mut *out, &names)?;
            writeln!(out)?;
        } else {
            for name in names {
                writeln!(out, "{}", name)?;
            }
        }
        return Ok(());
    }

    let rows: Vec<Row<'_>> = match query {
        ListQuery::Ip { ips } => ips
            .iter()
            .flat_map(|ip| {
                hosts
                    .list_hosts_by_address(ip)
                    .into_iter()
                    .map(move |hostname| Row {
                        query: None,
                        address: ip.clone(),
                        hostname,
                    })
            })
            .collect(),
        ListQuery::Host { hosts: names, exact } => names
            .iter()
            .flat_map(|name| hosts.list_addresses_by_host(name, *exact))
            .map(|e| Row {
                query: None,
                address: e.address,
                hostname: e.hostname,
            })
            .collect(),
        ListQuery::Cidr { cidrs } => cidrs
            .iter()
            .flat_map(|cidr| {
                hosts
                    .list_hosts_by_cidr(cidr)
                    .into_iter()
                    .map(move |e| Row {
                        query: Some(cidr.as_str()),
                        address: e.address,
                        hostname: e.hostname,
                    })
            })
            .collect(),
        ListQuery::Comment { .. } => Vec::new(),
    };

    if config.json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }

    for row in rows {
        match row.query {
            Some(q) => writeln!(out, "{} {} {}", q, row.address, row.hostname)?,
            None => writeln!(out, "{} {}", row.address, row.hostname)?,
        }
    }
    Ok(())
}

/// Save, or print the rendered file in dry-run mode.
///
/// A failed DNS flush after a successful write is only a warning.
fn persist(config: &Config, hosts: &Hosts, out: &mut dyn Write) -> Result<()> {
    if config.dry_run {
        write!(out, "{}", hosts.render())?;
        return Ok(());
    }

    match hosts.save() {
        Ok(()) => {
            info!("Saved hosts file");
            if config.flush && !config.quiet {
                writeln!(out, "DNS cache flushed.")?;
            }
            Ok(())
        }
        Err(e) if e.is_flush() => {
            warn!("DNS cache flush failed after save: {}", e);
            eprintln!("Warning: hosts file saved but DNS cache flush failed: {}", e);
            if !config.quiet {
                eprintln!("DNS cache may be stale. You can flush manually.");
            }
            Ok(())
        }
        Err(e) => {
            let path = hosts
                .write_path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            Err(anyhow::Error::new(e).context(format!("could not save {}", path)))
        }
    }
}
