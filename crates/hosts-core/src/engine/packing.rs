//! Hostnames-per-line packing policy

use crate::platform::Platform;

/// Resolves the configured `max_hosts_per_line` into an effective cap
///
/// - positive: explicit cap
/// - negative: unlimited
/// - zero: platform default (Windows: 9, elsewhere unlimited)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackingPolicy {
    configured: i64,
    platform: Platform,
}

impl PackingPolicy {
    pub fn new(configured: i64, platform: Platform) -> Self {
        Self {
            configured,
            platform,
        }
    }

    /// Policy without a cap
    pub fn unlimited() -> Self {
        Self::new(-1, Platform::current())
    }

    /// Effective cap, `None` when unlimited
    pub fn cap(&self) -> Option<usize> {
        let cap = match self.configured {
            n if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            n if n < 0 => 0,
            _ => self.platform.default_max_hosts_per_line(),
        };
        (cap > 0).then_some(cap)
    }

    /// True when a line holding `len` hostnames can take one more
    pub fn has_room(&self, len: usize) -> bool {
        self.cap().is_none_or(|cap| len < cap)
    }
}

impl Default for PackingPolicy {
    fn default() -> Self {
        Self::new(0, Platform::current())
    }
}
