//! Argument validation
//!
//! The library accepts anything and silently ignores what it cannot use.
//! The CLI is stricter so a typo fails loudly instead of doing nothing.

use anyhow::{Result, bail};
use std::net::IpAddr;

/// Maximum total hostname length (RFC 1035)
const MAX_HOSTNAME_LEN: usize = 253;

/// Maximum length of one dot-separated label
const MAX_LABEL_LEN: usize = 63;

/// Validate an IPv4 or IPv6 address literal
pub fn validate_ip(ip: &str) -> Result<()> {
    if ip.parse::<IpAddr>().is_err() {
        bail!("\"{}\" is not a valid IP address", ip);
    }
    Ok(())
}

/// Validate a CIDR range such as `10.0.0.0/24`
pub fn validate_cidr(cidr: &str) -> Result<()> {
    if let Err(e) = cidr.parse::<ipnet::IpNet>() {
        bail!("\"{}\" is not a valid CIDR range: {}", cidr, e);
    }
    Ok(())
}

/// Validate a hostname
///
/// Labels may hold ASCII letters, digits, `-` and `_`. Underscores show up
/// in service names (`_sip._tcp`) and in many container setups.
pub fn validate_hostname(hostname: &str) -> Result<()> {
    if hostname.is_empty() {
        bail!("Hostname cannot be empty");
    }

    if hostname.len() > MAX_HOSTNAME_LEN {
        bail!(
            "\"{}\" is not a valid hostname: {} chars (max {})",
            hostname,
            hostname.len(),
            MAX_HOSTNAME_LEN
        );
    }

    for label in hostname.split('.') {
        if label.is_empty() {
            bail!("\"{}\" is not a valid hostname: empty label", hostname);
        }

        if label.len() > MAX_LABEL_LEN {
            bail!(
                "\"{}\" is not a valid hostname: label '{}' is {} chars (max {})",
                hostname,
                label,
                label.len(),
                MAX_LABEL_LEN
            );
        }

        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            bail!(
                "\"{}\" is not a valid hostname: label '{}' may only contain letters, digits, '-' and '_'",
                hostname,
                label
            );
        }
    }

    Ok(())
}

/// Validate every item, stopping at the first failure
pub fn validate_all<S: AsRef<str>>(items: &[S], check: fn(&str) -> Result<()>) -> Result<()> {
    items.iter().try_for_each(|item| check(item.as_ref()))
}
