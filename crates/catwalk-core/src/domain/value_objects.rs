//! Domain value objects: FieldKind, Breakpoint, Limit.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. This
//! file defines the types and their string representations.
//! The merge rules for [`Limit`] live here too because every caller that
//! combines limits must agree on them.

use serde::{Deserialize, Serialize};
use std::fmt;

// ── FieldKind ────────────────────────────────────────────────────────────────

/// The kind of a configuration schema field.
///
/// Only `stream` and `group` carry structural meaning for the core; every
/// other type (`string`, `number`, `media`, ...) is kept verbatim as a scalar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    /// References a stream by id (`"type": "stream"`).
    Stream,
    /// Repeatable list of nested configurations (`"type": "group"`).
    Group,
    /// Any other field type.
    Scalar(String),
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stream => "stream",
            Self::Group => "group",
            Self::Scalar(kind) => kind,
        }
    }

    pub const fn is_stream(&self) -> bool {
        matches!(self, Self::Stream)
    }

    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }
}

impl From<String> for FieldKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "stream" => Self::Stream,
            "group" => Self::Group,
            _ => Self::Scalar(value),
        }
    }
}

impl From<&str> for FieldKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Breakpoint ────────────────────────────────────────────────────────────────

/// Layout breakpoints carried inside every tastic configuration.
///
/// Completion must never overwrite these keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 3] = [Self::Mobile, Self::Tablet, Self::Desktop];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Limit ─────────────────────────────────────────────────────────────────────

/// Result-count limit requested for a stream.
///
/// `Unbounded` is absorbing: once any consumer of a stream asks for all
/// results, no other consumer can narrow the limit again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Limit {
    Bounded(u64),
    Unbounded,
}

impl Limit {
    /// Combine the limits of two consumers of the same stream.
    pub fn merge(self, other: Limit) -> Limit {
        match (self, other) {
            (Self::Bounded(a), Self::Bounded(b)) => Self::Bounded(a.max(b)),
            _ => Self::Unbounded,
        }
    }

    /// Interpret a configured count value.
    ///
    /// Accepts positive integers and strings holding one. Zero, negatives and
    /// anything else mean "no count declared".
    pub fn from_count_value(value: &serde_json::Value) -> Option<u64> {
        let count = match value {
            serde_json::Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f > 0.0).map(|f| f as u64)),
            serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        count.filter(|c| *c > 0)
    }

    pub const fn as_bounded(&self) -> Option<u64> {
        match self {
            Self::Bounded(n) => Some(*n),
            Self::Unbounded => None,
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(n) => write!(f, "{n}"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}
