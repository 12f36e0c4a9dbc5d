// # hosts-core
//
// Library for reading, editing and writing hosts files while keeping every
// line the caller did not touch byte-for-byte intact.
//
// ## Architecture Overview
//
// - **model**: typed line list, parser and renderer
// - **engine**: `HostsTable`, the lock-free mutation and query engine
// - **hosts**: `Hosts`, the locked document with file/raw-text source and
//   atomic save
// - **flush**: `DnsFlusher`, platform DNS cache flush behind the
//   `CommandRunner` trait
// - **platform**: runtime platform value (default path, packing cap)
//
// ## Design Principles
//
// 1. **Lossless**: comments, blank lines and unrecognised lines survive a
//    load/save cycle unchanged
// 2. **Total parsing**: malformed content never fails a load
// 3. **One lock**: every operation, bulk ones included, holds the document
//    lock once
// 4. **Library-First**: the `hostsctl` CLI is a thin layer over this crate

pub mod config;
pub mod engine;
pub mod error;
pub mod flush;
pub mod hosts;
pub mod model;
pub mod platform;
pub mod traits;

// Re-export core types for convenience
pub use config::HostsConfig;
pub use engine::{HostEntry, HostLocation, HostsTable, PackingPolicy};
pub use error::{Error, Result};
pub use flush::{DnsFlusher, FlushError, FlushFailure};
pub use hosts::{Hosts, backup_path};
pub use model::{AddressEntry, IpFamily, Line, LineKind, parse_file, parse_str, render};
pub use platform::{DEFAULT_MAX_HOSTS_PER_LINE_WINDOWS, Platform, default_hosts_path};
pub use traits::{CommandRunner, SystemCommandRunner};
