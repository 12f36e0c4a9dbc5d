// # Hosts File Lines
//
// A hosts file is modelled as an ordered list of typed lines. Non-address
// lines keep their raw text and are written back untouched; address lines
// are re-rendered from their structured form.

use serde::Serialize;

use super::address::{self, IpFamily};

/// One line of a hosts file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    /// Zero-based position in the source text, `None` for lines the engine created
    pub original_index: Option<usize>,
    /// Text of the line as read, without the line terminator
    pub raw: String,
    /// Classification and, for address lines, the parsed entry
    pub kind: LineKind,
}

/// Classification of a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineKind {
    /// Starts with `#` after trimming
    Comment,
    /// Blank or whitespace only
    Empty,
    /// An address followed by one or more hostnames
    Address(AddressEntry),
    /// Content that is neither of the above, e.g. a lone token
    Unknown,
}

/// Parsed content of an address line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressEntry {
    /// Lowercased address text, not canonicalised
    pub address: String,
    /// Lowercased hostnames in file order; never empty
    pub hostnames: Vec<String>,
    /// Trimmed inline comment, empty when there is none
    pub comment: String,
}

impl AddressEntry {
    /// Family of the address, `None` when it is not a valid IP literal
    pub fn family(&self) -> Option<IpFamily> {
        IpFamily::of(&self.address)
    }

    /// True when the address lies in a loopback range
    pub fn is_loopback(&self) -> bool {
        address::is_loopback(&self.address)
    }

    /// True when `hostname` (already normalised) is listed on this line
    pub fn has_hostname(&self, hostname: &str) -> bool {
        self.hostnames.iter().any(|h| h == hostname)
    }
}

impl Line {
    /// Build an address line that did not come from the source text
    pub fn new_address(
        address: impl Into<String>,
        hostnames: Vec<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            original_index: None,
            raw: String::new(),
            kind: LineKind::Address(AddressEntry {
                address: address.into(),
                hostnames,
                comment: comment.into(),
            }),
        }
    }

    /// The parsed entry of an address line
    pub fn entry(&self) -> Option<&AddressEntry> {
        match &self.kind {
            LineKind::Address(entry) => Some(entry),
            _ => None,
        }
    }

    pub(crate) fn entry_mut(&mut self) -> Option<&mut AddressEntry> {
        match &mut self.kind {
            LineKind::Address(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn is_address(&self) -> bool {
        matches!(self.kind, LineKind::Address(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, LineKind::Comment)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, LineKind::Empty)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, LineKind::Unknown)
    }

    /// Address of an address line
    pub fn address(&self) -> Option<&str> {
        self.entry().map(|e| e.address.as_str())
    }

    /// Hostnames of an address line, empty for other kinds
    pub fn hostnames(&self) -> &[String] {
        self.entry().map(|e| e.hostnames.as_slice()).unwrap_or(&[])
    }

    /// Inline comment of an address line
    pub fn comment(&self) -> Option<&str> {
        self.entry().map(|e| e.comment.as_str())
    }
}
