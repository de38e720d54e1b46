// SPDX-License-Identifier: MIT OR Apache-2.0
//! Schema version tags stored in documents.

use serde::{Deserialize, Serialize};

/// The (major, minor) schema revision that produced a document.
///
/// Tags compare lexicographically and only ever increase across a load.
/// A document written before version tags existed deserializes to the
/// default `(0, 0)`, which makes every migration block run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct VersionTag {
    /// Major schema revision.
    pub major: u16,
    /// Minor schema revision.
    pub minor: u16,
}

impl VersionTag {
    /// Create a version tag.
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Whether this tag is at or above the given revision.
    pub fn at_least(&self, major: u16, minor: u16) -> bool {
        *self >= Self::new(major, minor)
    }
}

impl std::fmt::Display for VersionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
