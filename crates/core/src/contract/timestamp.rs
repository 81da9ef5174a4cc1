//! Microsecond-precision absolute timestamp
//!
//! `Timestamp` is the element type of `Date` lists. It records an absolute
//! point in time as signed microseconds relative to the Unix epoch
//! (1970-01-01 00:00:00 UTC), so dates before 1970 are representable.
//!
//! ## Usage
//!
//! Never expose raw arithmetic. Use explicit constructors:
//!
//! ```
//! use strata_core::Timestamp;
//!
//! let now = Timestamp::now();
//! let later = now.saturating_add_secs(10);
//! assert!(later.is_after(now));
//! assert_eq!(Timestamp::from_secs(0), Timestamp::EPOCH);
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Absolute point in time with microsecond precision
///
/// ## Invariants
///
/// - The zero timestamp is the Unix epoch and is the zero value of `Date` lists
/// - Timestamps are totally ordered by their microsecond offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Earliest representable timestamp
    pub const MIN: Timestamp = Timestamp(i64::MIN);

    /// Latest representable timestamp
    pub const MAX: Timestamp = Timestamp(i64::MAX);

    // =========================================================================
    // Constructors
    // =========================================================================

    /// Timestamp for the current moment
    ///
    /// Returns epoch if the system clock reports a time before the epoch.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(i64::try_from(duration.as_micros()).unwrap_or(i64::MAX))
    }

    /// Create from microseconds relative to epoch
    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Timestamp(micros)
    }

    /// Create from milliseconds relative to epoch
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Timestamp(millis.saturating_mul(1_000))
    }

    /// Create from seconds relative to epoch
    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1_000_000))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Microseconds relative to epoch
    #[inline]
    pub const fn as_micros(&self) -> i64 {
        self.0
    }

    /// Whole seconds relative to epoch (floors toward negative infinity)
    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0.div_euclid(1_000_000)
    }

    /// Offset from epoch in fractional seconds
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    // =========================================================================
    // Arithmetic
    // =========================================================================

    /// Shift by whole seconds, saturating at the representable range
    pub const fn saturating_add_secs(&self, secs: i64) -> Self {
        Timestamp(self.0.saturating_add(secs.saturating_mul(1_000_000)))
    }

    /// Shift by microseconds, saturating at the representable range
    pub const fn saturating_add_micros(&self, micros: i64) -> Self {
        Timestamp(self.0.saturating_add(micros))
    }

    /// Check if this timestamp is before another
    #[inline]
    pub fn is_before(&self, other: Timestamp) -> bool {
        self.0 < other.0
    }

    /// Check if this timestamp is after another
    #[inline]
    pub fn is_after(&self, other: Timestamp) -> bool {
        self.0 > other.0
    }

    /// Convert to a chrono UTC datetime
    ///
    /// Returns `None` when the offset lies outside chrono's supported range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_micros(self.0).single()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::EPOCH
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)),
            None => write!(f, "{}us", self.0),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp(dt.timestamp_micros())
    }
}

impl From<Timestamp> for i64 {
    /// Extract raw microseconds
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
