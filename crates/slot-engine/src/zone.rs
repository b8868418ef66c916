//! Timezone resolution as an explicit capability.
//!
//! Nothing in this crate consults a process-wide timezone database on its
//! own. Every operation that needs zone rules takes a [`Zone`] (or a
//! [`ZoneResolver`] plus an identifier), so callers decide where the rules
//! come from:
//!
//! - [`IanaZones`] — the IANA database compiled in by `chrono-tz`
//! - [`FixedZones`] — an in-memory table of fixed offsets, handy for tests
//!   and for embedding a handful of known zones
//! - [`UtcZone`] — the zero-offset zone used for canonical storage

use std::collections::HashMap;

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::{OffsetComponents, Tz};

use crate::error::{Result, SlotError};

/// Offset rules for one timezone.
pub trait Zone {
    /// The identifier this zone was resolved from (e.g. `"Asia/Shanghai"`).
    fn name(&self) -> &str;

    /// The UTC offset in effect at `instant`, DST included.
    fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset;

    /// The standard UTC offset in force on `date`, ignoring any seasonal
    /// adjustment.
    ///
    /// Civil day boundaries are anchored on this offset, so on a date with a
    /// clock change the boundary can be off by the DST delta.
    fn base_offset(&self, date: NaiveDate) -> FixedOffset;
}

/// Looks up [`Zone`]s by identifier.
pub trait ZoneResolver {
    type Zone: Zone;

    /// Resolve `name` to a zone.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidTimezone`] if `name` is not known to this
    /// resolver.
    fn resolve(&self, name: &str) -> Result<Self::Zone>;
}

// ── IANA database ───────────────────────────────────────────────────────────

/// Resolver backed by the IANA timezone database bundled with `chrono-tz`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IanaZones;

/// A zone from the IANA database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IanaZone(pub Tz);

impl ZoneResolver for IanaZones {
    type Zone = IanaZone;

    fn resolve(&self, name: &str) -> Result<IanaZone> {
        name.parse::<Tz>()
            .map(IanaZone)
            .map_err(|_| SlotError::InvalidTimezone(format!("'{}'", name)))
    }
}

impl Zone for IanaZone {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        self.0.offset_from_utc_datetime(&instant.naive_utc()).fix()
    }

    fn base_offset(&self, date: NaiveDate) -> FixedOffset {
        let offset = self.0.offset_from_utc_datetime(&noon_utc(date));

        // Zones modelled with a negative winter DST (Europe/Dublin) report
        // their summer offset as the base; fold the winter shift back in.
        let year = date.year();
        let winter_shift = [NaiveDate::from_yo_opt(year, 1), NaiveDate::from_ymd_opt(year, 7, 1)]
            .into_iter()
            .flatten()
            .map(|probe| self.0.offset_from_utc_datetime(&noon_utc(probe)).dst_offset())
            .chain(std::iter::once(offset.dst_offset()))
            .min()
            .filter(|shift| *shift < chrono::Duration::zero())
            .unwrap_or_else(chrono::Duration::zero);
        let base_seconds = (offset.base_utc_offset() + winter_shift).num_seconds();

        i32::try_from(base_seconds)
            .ok()
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| offset.fix())
    }
}

fn noon_utc(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + chrono::Duration::hours(12)
}

// ── In-memory table ─────────────────────────────────────────────────────────

/// An in-memory table of fixed-offset zones.
///
/// ```
/// use chrono::FixedOffset;
/// use slot_engine::zone::{FixedZones, Zone, ZoneResolver};
///
/// let zones = FixedZones::new().with_zone("Test/Plus8", FixedOffset::east_opt(8 * 3600).unwrap());
/// let zone = zones.resolve("Test/Plus8").unwrap();
/// assert_eq!(zone.name(), "Test/Plus8");
/// assert!(zones.resolve("Test/Missing").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedZones {
    zones: HashMap<String, FixedOffset>,
}

/// A zone whose offset never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedZone {
    name: String,
    offset: FixedOffset,
}

impl FixedZones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a zone in the table.
    #[must_use]
    pub fn with_zone(mut self, name: impl Into<String>, offset: FixedOffset) -> Self {
        self.insert(name, offset);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, offset: FixedOffset) {
        self.zones.insert(name.into(), offset);
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl ZoneResolver for FixedZones {
    type Zone = FixedZone;

    fn resolve(&self, name: &str) -> Result<FixedZone> {
        self.zones
            .get(name)
            .map(|offset| FixedZone::new(name, *offset))
            .ok_or_else(|| SlotError::InvalidTimezone(format!("'{}'", name)))
    }
}

impl FixedZone {
    pub fn new(name: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Zone for FixedZone {
    fn name(&self) -> &str {
        &self.name
    }

    fn offset_at(&self, _instant: &DateTime<Utc>) -> FixedOffset {
        self.offset
    }

    fn base_offset(&self, _date: NaiveDate) -> FixedOffset {
        self.offset
    }
}

// ── UTC ─────────────────────────────────────────────────────────────────────

/// The zero-offset zone. Always available, no lookup needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UtcZone;

impl Zone for UtcZone {
    fn name(&self) -> &str {
        "UTC"
    }

    fn offset_at(&self, _instant: &DateTime<Utc>) -> FixedOffset {
        Utc.fix()
    }

    fn base_offset(&self, _date: NaiveDate) -> FixedOffset {
        Utc.fix()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iana_resolves_known_zone() {
        let zone = IanaZones.resolve("Asia/Shanghai").unwrap();
        assert_eq!(zone.name(), "Asia/Shanghai");
        assert_eq!(zone.0, Tz::Asia__Shanghai);
    }

    #[test]
    fn test_iana_invalid_timezone_returns_error() {
        let err = IanaZones.resolve("Invalid/Zone").unwrap_err();
        assert_eq!(err, SlotError::InvalidTimezone("'Invalid/Zone'".to_string()));
        assert!(err.to_string().contains("Invalid timezone"), "got: {err}");
    }

    #[test]
    fn test_iana_offset_at_follows_dst() {
        let zone = IanaZones.resolve("America/New_York").unwrap();
        let summer = Utc.with_ymd_and_hms(2026, 7, 15, 12, 0, 0).unwrap();
        let winter = Utc.with_ymd_and_hms(2026, 12, 15, 12, 0, 0).unwrap();
        assert_eq!(zone.offset_at(&summer).local_minus_utc(), -4 * 3600);
        assert_eq!(zone.offset_at(&winter).local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_iana_base_offset_ignores_dst() {
        let zone = IanaZones.resolve("America/New_York").unwrap();
        // July is EDT (UTC-4) but the standard offset stays at UTC-5.
        assert_eq!(zone.base_offset(date(2026, 7, 15)).local_minus_utc(), -5 * 3600);
        assert_eq!(zone.base_offset(date(2026, 12, 15)).local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_iana_base_offset_half_hour_zone() {
        let zone = IanaZones.resolve("Asia/Kolkata").unwrap();
        assert_eq!(zone.base_offset(date(2024, 11, 1)).local_minus_utc(), 5 * 3600 + 1800);
    }

    #[test]
    fn test_iana_lisbon_is_zero_in_november() {
        let zone = IanaZones.resolve("Europe/Lisbon").unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 11, 1, 15, 0, 0).unwrap();
        assert_eq!(zone.offset_at(&instant).local_minus_utc(), 0);
        assert_eq!(zone.base_offset(date(2024, 11, 1)).local_minus_utc(), 0);
    }

    #[test]
    fn test_iana_base_offset_negative_winter_dst() {
        // Dublin keeps GMT in winter and IST (+01:00) in summer; the base is GMT
        // on both sides of the year.
        let zone = IanaZones.resolve("Europe/Dublin").unwrap();
        assert_eq!(zone.base_offset(date(2024, 1, 15)).local_minus_utc(), 0);
        assert_eq!(zone.base_offset(date(2024, 7, 15)).local_minus_utc(), 0);

        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 23, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2024, 7, 15, 23, 0, 0).unwrap();
        assert_eq!(zone.offset_at(&winter).local_minus_utc(), 0);
        assert_eq!(zone.offset_at(&summer).local_minus_utc(), 3600);
    }

    #[test]
    fn test_iana_base_offset_southern_hemisphere() {
        // Sydney observes DST over New Year; the base stays at +10:00.
        let zone = IanaZones.resolve("Australia/Sydney").unwrap();
        assert_eq!(zone.base_offset(date(2024, 1, 15)).local_minus_utc(), 10 * 3600);
        assert_eq!(zone.base_offset(date(2024, 7, 15)).local_minus_utc(), 10 * 3600);
    }

    #[test]
    fn test_fixed_zones_lookup() {
        let plus_five_thirty = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let zones = FixedZones::new().with_zone("Test/India", plus_five_thirty);
        assert_eq!(zones.len(), 1);

        let zone = zones.resolve("Test/India").unwrap();
        assert_eq!(zone.name(), "Test/India");
        assert_eq!(zone.offset(), plus_five_thirty);
        assert_eq!(zone.base_offset(date(2024, 6, 1)), plus_five_thirty);
    }

    #[test]
    fn test_fixed_zones_missing_returns_error() {
        let zones = FixedZones::new();
        assert!(zones.is_empty());
        let err = zones.resolve("Europe/Lisbon").unwrap_err();
        assert!(matches!(err, SlotError::InvalidTimezone(_)));
    }

    #[test]
    fn test_utc_zone_has_zero_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 11, 1, 15, 0, 0).unwrap();
        assert_eq!(UtcZone.name(), "UTC");
        assert_eq!(UtcZone.offset_at(&instant).local_minus_utc(), 0);
        assert_eq!(UtcZone.base_offset(date(2024, 11, 1)).local_minus_utc(), 0);
    }
}
