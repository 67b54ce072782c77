//! Certificate Serial Hash
//!
//! Public identifier printed on a certificate:
//! `UPPER(HEX(SHA-256("{learner}:{course}:{issued_at}")))`, truncated.
//! `issued_at` is RFC 3339 with nanoseconds in UTC.

use chrono::{DateTime, SecondsFormat, Utc};
use kernel::id::{CourseId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerialHash(String);

impl SerialHash {
    pub fn derive(learner: &UserId, course: &CourseId, issued_at: DateTime<Utc>, len: usize) -> Self {
        let input = format!(
            "{}:{}:{}",
            learner,
            course,
            issued_at.to_rfc3339_opts(SecondsFormat::Nanos, true)
        );
        Self(platform::crypto::sha256_hex_upper(input.as_bytes(), len))
    }

    /// Parse a serial presented by a caller
    ///
    /// Lookups are case-insensitive; the stored form is uppercase hex.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value.len() > 64 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(value.to_ascii_uppercase()))
    }

    /// Restore from the store without validation
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
