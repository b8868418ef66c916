//! The availability interval value type.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::projection::{parse_instant, project};
use crate::zone::Zone;

/// One continuous span of absolute time.
///
/// Both endpoints carry the offset they are presented in, but equality only
/// looks at the instants. `start <= end` is expected and not
/// enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(rename = "startTime")]
    pub start: DateTime<FixedOffset>,
    #[serde(rename = "endTime")]
    pub end: DateTime<FixedOffset>,
}

/// A sub-interval of at most one hour confined to a single civil day.
pub type Slot = TimeRange;

impl TimeRange {
    pub const fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    /// Build a range from two RFC 3339 strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(parse_instant(start)?, parse_instant(end)?))
    }

    /// The same range with both endpoints projected onto `zone`.
    #[must_use]
    pub fn localize<Z: Zone + ?Sized>(&self, zone: &Z) -> Self {
        Self::new(project(&self.start, zone), project(&self.end, zone))
    }

    /// Negative for inverted ranges.
    pub fn duration(&self) -> chrono::Duration {
        self.end.signed_duration_since(self.start)
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] Start: {}, [{}] End: {}",
            self.start.format("%a"),
            self.start.format("%Y-%m-%d %H:%M:%S %:z"),
            self.end.format("%a"),
            self.end.format("%Y-%m-%d %H:%M:%S %:z"),
        )
    }
}
