// # hostsctl - hosts file editor
//
// This is a THIN layer over hosts-core:
// - parse arguments and environment into a `Config`
// - validate user input (IPs, CIDRs, hostnames)
// - call the library and report the outcome
//
// All editing semantics live in hosts-core.
//
// ## Environment
//
// - `HOSTS_AUTO_FLUSH`: `1`, `true`, `yes` or `on` flushes the DNS cache after every write
// - `HOSTS_LOG_LEVEL`: trace, debug, info, warn (default) or error
//
// ## Example
//
// ```bash
// hostsctl add 127.0.0.1 api.local web.local -c "dev stack"
// hostsctl -d remove comment "dev stack"
// hostsctl --json list cidr 10.0.0.0/8
// ```

mod commands;
mod validation;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

/// Exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostsctlExitCode {
    /// Command completed (including a save whose DNS flush failed)
    Success = 0,
    /// Invalid input, unreadable file or failed save
    Failure = 1,
}

impl From<HostsctlExitCode> for ExitCode {
    fn from(code: HostsctlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "hostsctl")]
#[command(about = "Add, remove and list entries in the hosts file", long_about = None)]
struct Cli {
    /// Hosts file to read (defaults to the system hosts file)
    #[arg(short, long, global = true)]
    read: Option<PathBuf>,

    /// Hosts file to write (defaults to the read path)
    #[arg(short, long, global = true)]
    write: Option<PathBuf>,

    /// Print the resulting file instead of saving it
    #[arg(short = 'd', long = "dryrun", global = true)]
    dry_run: bool,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Flush the DNS cache after writing
    #[arg(short, long, global = true)]
    flush: bool,

    /// Hostnames per line: 0 auto, -1 unlimited, >0 explicit
    #[arg(
        short,
        long,
        global = true,
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    max_hosts_per_line: i64,

    /// Emit JSON from list commands
    #[arg(long, global = true)]
    json: bool,

    /// Log level for diagnostics on stderr
    #[arg(long, global = true, env = "HOSTS_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add hostnames to an IP address
    Add {
        /// IPv4 or IPv6 address
        ip: String,
        /// Hostnames to add
        #[arg(required = true)]
        hosts: Vec<String>,
        /// Comment grouping the entries
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Move hostnames from one IP address to another
    Update {
        /// Current IP address
        old_ip: String,
        /// New IP address
        new_ip: String,
        /// Hostnames to move
        #[arg(required = true)]
        hosts: Vec<String>,
        /// Comment for the new entries
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Remove entries
    #[command(subcommand)]
    Remove(RemoveTarget),
    /// List entries
    #[command(subcommand)]
    List(ListQuery),
    /// Print the hosts file
    Show,
    /// Print the version
    Version,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    /// Remove hostnames wherever they appear
    Host {
        #[arg(required = true)]
        hosts: Vec<String>,
    },
    /// Remove every line for these IP addresses
    Ip {
        #[arg(required = true)]
        ips: Vec<String>,
    },
    /// Remove every line whose address is inside these ranges
    Cidr {
        #[arg(required = true)]
        cidrs: Vec<String>,
    },
    /// Remove every line tagged with these comments
    Comment {
        #[arg(required = true)]
        comments: Vec<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ListQuery {
    /// Hostnames mapped to these IP addresses
    Ip {
        #[arg(required = true)]
        ips: Vec<String>,
    },
    /// Addresses for these hostnames
    Host {
        #[arg(required = true)]
        hosts: Vec<String>,
        /// Only exact matches (default matches substrings)
        #[arg(short, long)]
        exact: bool,
    },
    /// Entries whose address is inside these ranges
    Cidr {
        #[arg(required = true)]
        cidrs: Vec<String>,
    },
    /// Hostnames on lines tagged with this comment
    Comment { comment: String },
}

/// Settings for one invocation, built once from arguments and environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub read_path: Option<PathBuf>,
    pub write_path: Option<PathBuf>,
    pub dry_run: bool,
    pub quiet: bool,
    pub flush: bool,
    pub max_hosts_per_line: i64,
    pub json: bool,
    pub log_level: String,
}

impl Config {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            read_path: cli.read.clone(),
            write_path: cli.write.clone(),
            dry_run: cli.dry_run,
            quiet: cli.quiet,
            flush: cli.flush || env_flag(env::var("HOSTS_AUTO_FLUSH").ok().as_deref()),
            max_hosts_per_line: cli.max_hosts_per_line,
            json: cli.json,
            log_level: cli.log_level.clone(),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        parse_log_level(&self.log_level)?;

        if self.read_path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            anyhow::bail!("--read cannot be empty");
        }
        if self.write_path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            anyhow::bail!("--write cannot be empty");
        }

        Ok(())
    }

    /// Library configuration for this invocation
    fn hosts_config(&self) -> hosts_core::HostsConfig {
        let mut config = match &self.read_path {
            Some(path) => hosts_core::HostsConfig::from_path(path),
            None => hosts_core::HostsConfig::new(),
        };
        if let Some(path) = &self.write_path {
            config = config.with_write_path(path);
        }
        config
            .with_max_hosts_per_line(self.max_hosts_per_line)
            .with_auto_flush(self.flush)
    }
}

/// `1`, `true`, `yes` and `on` (any case) enable a flag
fn env_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn parse_log_level(level: &str) -> Result<Level> {
    Ok(match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => anyhow::bail!(
            "log level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            level
        ),
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return HostsctlExitCode::Failure.into();
    }

    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::WARN);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HostsctlExitCode::Failure.into();
    }

    debug!("Running {:?}", cli.command);

    let mut stdout = std::io::stdout().lock();
    match commands::run(&config, &cli.command, &mut stdout) {
        Ok(()) => HostsctlExitCode::Success.into(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            HostsctlExitCode::Failure.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("hostsctl").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = parse(&["add", "127.0.0.1", "a", "b", "-c", "grp", "-d", "-m", "-1"]);
        assert!(cli.dry_run);
        assert_eq!(cli.max_hosts_per_line, -1);
        assert_eq!(
            cli.command,
            Command::Add {
                ip: "127.0.0.1".into(),
                hosts: vec!["a".into(), "b".into()],
                comment: "grp".into(),
            }
        );
    }

    #[test]
    fn nested_subcommands_parse() {
        let cli = parse(&["-r", "/tmp/hosts", "list", "host", "api", "-e"]);
        assert_eq!(cli.read, Some(PathBuf::from("/tmp/hosts")));
        assert_eq!(
            cli.command,
            Command::List(ListQuery::Host {
                hosts: vec!["api".into()],
                exact: true,
            })
        );

        let cli = parse(&["remove", "cidr", "10.0.0.0/8", "192.168.0.0/16"]);
        assert!(matches!(cli.command, Command::Remove(RemoveTarget::Cidr { ref cidrs }) if cidrs.len() == 2));
    }

    #[test]
    fn add_requires_a_hostname() {
        assert!(Cli::try_parse_from(["hostsctl", "add", "127.0.0.1"]).is_err());
    }

    #[test]
    fn env_flag_values() {
        assert!(env_flag(Some("1")));
        assert!(env_flag(Some("TRUE")));
        assert!(env_flag(Some(" yes ")));
        assert!(!env_flag(Some("0")));
        assert!(!env_flag(Some("")));
        assert!(!env_flag(None));
    }

    #[test]
    fn log_levels() {
        assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
        assert!(parse_log_level("verbose").is_err());
    }

    #[test]
    fn hosts_config_carries_paths_and_flags() {
        let config = Config {
            read_path: Some(PathBuf::from("/tmp/in")),
            write_path: Some(PathBuf::from("/tmp/out")),
            dry_run: false,
            quiet: false,
            flush: true,
            max_hosts_per_line: 5,
            json: false,
            log_level: "warn".into(),
        };
        let hc = config.hosts_config();
        assert_eq!(hc.resolved_read_path(), PathBuf::from("/tmp/in"));
        assert_eq!(hc.resolved_write_path(), PathBuf::from("/tmp/out"));
        assert!(hc.auto_flush);
        assert_eq!(hc.max_hosts_per_line, 5);
    }

    #[test]
    fn empty_paths_fail_validation() {
        let mut config = Config::from_cli(&parse(&["show"]));
        config.read_path = Some(PathBuf::new());
        assert!(config.validate().is_err());
    }
}
