//! A person's declared availability: an ordered list of [`TimeRange`]s.
//!
//! Ranges keep insertion order; overlaps and duplicates are kept as given.
//! Every transform returns a new [`Availability`] and leaves the receiver
//! untouched.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::range::TimeRange;
use crate::zone::{UtcZone, Zone, ZoneResolver};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    #[serde(rename = "timeRanges", default)]
    time_ranges: Vec<TimeRange>,
}

impl Availability {
    pub fn new(time_ranges: Vec<TimeRange>) -> Self {
        Self { time_ranges }
    }

    pub fn time_ranges(&self) -> &[TimeRange] {
        &self.time_ranges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeRange> {
        self.time_ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.time_ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_ranges.is_empty()
    }

    /// Project every range onto `zone`.
    #[must_use]
    pub fn localize<Z: Zone + ?Sized>(&self, zone: &Z) -> Self {
        self.iter().map(|range| range.localize(zone)).collect()
    }

    /// Resolve `timezone` through `resolver`, then [`localize`](Self::localize).
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidTimezone`](crate::SlotError::InvalidTimezone)
    /// if the resolver does not know `timezone`.
    pub fn localize_to<R: ZoneResolver + ?Sized>(
        &self,
        timezone: &str,
        resolver: &R,
    ) -> Result<Self> {
        let zone = resolver.resolve(timezone)?;
        Ok(self.localize(&zone))
    }

    /// The canonical storage form: every endpoint presented in UTC.
    #[must_use]
    pub fn to_utc(&self) -> Self {
        self.localize(&UtcZone)
    }
}

impl From<Vec<TimeRange>> for Availability {
    fn from(time_ranges: Vec<TimeRange>) -> Self {
        Self::new(time_ranges)
    }
}

impl FromIterator<TimeRange> for Availability {
    fn from_iter<I: IntoIterator<Item = TimeRange>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Availability {
    type Item = TimeRange;
    type IntoIter = std::vec::IntoIter<TimeRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.time_ranges.into_iter()
    }
}

impl<'a> IntoIterator for &'a Availability {
    type Item = &'a TimeRange;
    type IntoIter = std::slice::Iter<'a, TimeRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::IanaZones;

    fn lisbon_day() -> Availability {
        Availability::new(vec![
            TimeRange::parse("2024-11-01T09:00:00+00:00", "2024-11-01T12:00:00+00:00").unwrap(),
            TimeRange::parse("2024-11-01T15:00:00+00:00", "2024-11-01T23:00:00+00:00").unwrap(),
        ])
    }

    #[test]
    fn test_to_utc_preserves_order_and_instants() {
        let entered = Availability::new(vec![TimeRange::parse(
            "2024-11-04T09:00:00+13:00",
            "2024-11-04T17:00:00+13:00",
        )
        .unwrap()]);

        let canonical = entered.to_utc();
        assert_eq!(canonical, entered);
        assert_eq!(canonical.time_ranges()[0].start.to_rfc3339(), "2024-11-03T20:00:00+00:00");
        assert_eq!(canonical.time_ranges()[0].end.to_rfc3339(), "2024-11-04T04:00:00+00:00");
        // receiver untouched
        assert_eq!(entered.time_ranges()[0].start.to_rfc3339(), "2024-11-04T09:00:00+13:00");
    }

    #[test]
    fn test_localize_to_shanghai() {
        let local = lisbon_day().localize_to("Asia/Shanghai", &IanaZones).unwrap();
        assert_eq!(local.len(), 2);
        assert_eq!(local.time_ranges()[0].start.to_rfc3339(), "2024-11-01T17:00:00+08:00");
        assert_eq!(local.time_ranges()[1].end.to_rfc3339(), "2024-11-02T07:00:00+08:00");
    }

    #[test]
    fn test_localize_to_invalid_timezone_returns_error() {
        let err = lisbon_day().localize_to("Nowhere/Land", &IanaZones).unwrap_err();
        assert!(err.to_string().contains("Invalid timezone"), "got: {err}");
    }

    #[test]
    fn test_duplicates_and_overlaps_are_kept() {
        let range = lisbon_day().time_ranges()[1];
        let availability: Availability = vec![range, range].into_iter().collect();
        assert_eq!(availability.to_utc().len(), 2);
    }

    #[test]
    fn test_deserialize_payload() {
        let payload = r#"{"timeRanges":[
            {"startTime":"2024-11-01T15:00:00+00:00","endTime":"2024-11-01T23:00:00+00:00"}
        ]}"#;
        let availability: Availability = serde_json::from_str(payload).unwrap();
        assert_eq!(availability.len(), 1);
        assert_eq!(availability.time_ranges()[0], lisbon_day().time_ranges()[1]);

        let empty: Availability = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
