//! Error types for the hosts engine
//!
//! Malformed file content never produces an error: parsing is total. Errors
//! only come from I/O, from structured parameters the engine refuses to
//! guess about (CIDRs in removal requests), from illegal mode combinations,
//! and from the DNS flush collaborator.

use std::path::PathBuf;
use thiserror::Error;

use crate::flush::FlushError;

/// Result type alias for hosts operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the hosts engine
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing a hosts file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File the operation targeted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A CIDR passed to a removal request did not parse
    #[error("Invalid CIDR \"{cidr}\": {reason}")]
    InvalidCidr {
        /// The offending input
        cidr: String,
        /// Parser message
        reason: String,
    },

    /// Persist or reload was called on a document built from raw text
    #[error("cannot {operation} a hosts document loaded from raw text; render it instead")]
    RawTextMode {
        /// The refused operation ("save", "reload", ...)
        operation: &'static str,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The hosts file was written but flushing the DNS cache failed
    #[error(transparent)]
    Flush(#[from] FlushError),
}

impl Error {
    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid CIDR error
    pub fn invalid_cidr(cidr: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidCidr {
            cidr: cidr.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a raw text mode error
    pub fn raw_text_mode(operation: &'static str) -> Self {
        Self::RawTextMode { operation }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True when the error is a DNS flush failure reported after a successful save
    pub fn is_flush(&self) -> bool {
        matches!(self, Self::Flush(_))
    }

    /// True when the error came from persisting or reloading a raw text document
    pub fn is_raw_text_mode(&self) -> bool {
        matches!(self, Self::RawTextMode { .. })
    }
}
