//! Test doubles and common utilities for hosts-core contract tests

#![allow(dead_code)]

use hosts_core::{CommandRunner, DnsFlusher, Hosts, HostsConfig, Platform};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A CommandRunner that records every invocation instead of spawning processes
pub struct RecordingCommandRunner {
    /// Programs reported as missing by is_available()
    unavailable: Vec<String>,
    /// Error message returned by every run() when set
    failure: Option<String>,
    /// Call counter for run()
    run_call_count: Arc<AtomicUsize>,
    /// Command lines passed to run()
    commands: Arc<Mutex<Vec<String>>>,
}

impl RecordingCommandRunner {
    /// Every program exists and succeeds
    pub fn new() -> Self {
        Self {
            unavailable: Vec::new(),
            failure: None,
            run_call_count: Arc::new(AtomicUsize::new(0)),
            commands: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every run() fails with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Report `programs` as not installed
    pub fn without(mut self, programs: &[&str]) -> Self {
        self.unavailable = programs.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Get the number of times run() was called
    pub fn run_call_count(&self) -> usize {
        self.run_call_count.load(Ordering::SeqCst)
    }

    /// Get the command lines that were run
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    /// Create a new runner that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            unavailable: other.unavailable.clone(),
            failure: other.failure.clone(),
            run_call_count: Arc::clone(&other.run_call_count),
            commands: Arc::clone(&other.commands),
        }
    }
}

impl CommandRunner for RecordingCommandRunner {
    fn is_available(&self, program: &str) -> bool {
        !self.unavailable.iter().any(|p| p == program)
    }

    fn run(&self, program: &str, args: &[&str]) -> io::Result<()> {
        self.run_call_count.fetch_add(1, Ordering::SeqCst);
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.commands.lock().unwrap().push(line);

        match &self.failure {
            Some(msg) => Err(io::Error::other(msg.clone())),
            None => Ok(()),
        }
    }
}

/// Flusher with Linux command selection driven by `runner`
pub fn linux_flusher(runner: &RecordingCommandRunner) -> DnsFlusher {
    DnsFlusher::new(
        Platform::Linux,
        Arc::new(RecordingCommandRunner::sharing_counters_with(runner)),
    )
}

/// Write `content` to `<dir>/hosts` and return the path
pub fn write_hosts(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("hosts");
    std::fs::write(&path, content).expect("write fixture");
    path
}

/// In-memory document without a packing cap
pub fn raw_hosts(text: &str) -> Hosts {
    Hosts::new(HostsConfig::from_raw_text(text).with_max_hosts_per_line(-1))
        .expect("raw text config is valid")
}

/// A realistic hosts file mixing every line kind
pub const SAMPLE_HOSTS: &str = "\
# /etc/hosts: static lookup table
#
127.0.0.1       localhost
127.0.1.1       workstation.lan workstation

# The following lines are desirable for IPv6 capable hosts
::1     ip6-localhost ip6-loopback
fe00::0 ip6-localnet
ff02::1 ip6-allnodes

10.0.0.5        db.internal      # managed
10.0.0.6        cache.internal   # managed
stray-token
";
