//! Task priority levels.
//!
//! Priorities run p1 (urgent) to p4 (normal/no priority). The store keeps
//! them as integers 1..=4; the model-facing contract uses the `"p1"`..`"p4"`
//! strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A task priority level, p1 = urgent through p4 = normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    /// Urgent/critical.
    #[serde(rename = "p1")]
    P1,
    /// High/important.
    #[serde(rename = "p2")]
    P2,
    /// Medium.
    #[serde(rename = "p3")]
    P3,
    /// Normal/low — the default when nothing is specified.
    #[serde(rename = "p4")]
    #[default]
    P4,
}

impl Priority {
    /// Store representation: 1 (urgent) through 4 (normal).
    pub fn as_int(self) -> i32 {
        match self {
            Self::P1 => 1,
            Self::P2 => 2,
            Self::P3 => 3,
            Self::P4 => 4,
        }
    }

    /// Convert a store integer back to a priority. Out-of-range values
    /// collapse to [`Priority::P4`].
    pub fn from_int(value: i32) -> Self {
        match value {
            1 => Self::P1,
            2 => Self::P2,
            3 => Self::P3,
            _ => Self::P4,
        }
    }

    /// Lenient parse of a model-produced priority string.
    ///
    /// Anything outside `"p1"`..`"p4"` normalizes to [`Priority::P4`]
    /// rather than rejecting the whole parse.
    pub fn normalize(value: &str) -> Self {
        match value {
            "p1" => Self::P1,
            "p2" => Self::P2,
            "p3" => Self::P3,
            _ => Self::P4,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P1 => write!(f, "p1"),
            Self::P2 => write!(f, "p2"),
            Self::P3 => write!(f, "p3"),
            Self::P4 => write!(f, "p4"),
        }
    }
}
