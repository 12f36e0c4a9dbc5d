//! Minimal embedding example for hosts-core
//!
//! Edits a scratch copy of a hosts file from application code, with a custom
//! command runner standing in for the system DNS flush.

use hosts_core::{CommandRunner, Hosts, HostsConfig, IpFamily, Result};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Command runner that prints instead of touching the system resolver
struct LoggingRunner {
    runs: AtomicUsize,
}

impl CommandRunner for LoggingRunner {
    fn is_available(&self, _program: &str) -> bool {
        true
    }

    fn run(&self, program: &str, args: &[&str]) -> io::Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        println!("[Embedded] would run: {} {}", program, args.join(" "));
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(io::stderr)
        .init();

    println!("=== Embedded hosts-core Example ===\n");

    let dir = tempfile::tempdir().map_err(|e| hosts_core::Error::io(std::env::temp_dir(), e))?;
    let path = dir.path().join("hosts");
    std::fs::write(
        &path,
        "# scratch hosts file\n127.0.0.1 localhost\n::1 localhost\n",
    )
    .map_err(|e| hosts_core::Error::io(&path, e))?;

    println!("1. Opening {}", path.display());
    let runner = Arc::new(LoggingRunner {
        runs: AtomicUsize::new(0),
    });
    let hosts = Hosts::new(
        HostsConfig::from_path(&path)
            .with_auto_flush(true)
            .with_backup(true),
    )?
    .with_command_runner(runner.clone());

    println!("2. Adding a dev stack");
    hosts.add_hosts_with_comment("127.0.0.1", &["api.local", "web.local"], "dev stack");
    hosts.add_host("10.0.0.5", "db.local");

    println!("3. Moving db.local to 10.0.0.6");
    hosts.add_host("10.0.0.6", "db.local");

    if let Some(found) = hosts.lookup("db.local", IpFamily::V4) {
        println!("   db.local -> {} (line {})", found.address, found.line_index);
    }

    println!("4. Saving");
    match hosts.save() {
        Ok(()) => {}
        // The platform may have no flush mechanism; the file is written regardless.
        Err(e) if e.is_flush() => println!("   flush skipped: {}", e),
        Err(e) => return Err(e),
    }
    println!("   flush commands run: {}", runner.runs.load(Ordering::SeqCst));

    println!("\n--- {} ---", path.display());
    print!("{}", hosts.render());

    let json = serde_json::to_string_pretty(&hosts.list_addresses_by_host("local", false))
        .unwrap_or_default();
    println!("\n--- entries matching \"local\" ---\n{}", json);

    Ok(())
}
