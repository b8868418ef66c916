//! Timezone projection.
//!
//! Projecting an instant re-expresses its wall-clock fields (date, hour,
//! minute, offset) in another zone. The instant itself never moves: a
//! projected `DateTime` compares equal to the one it came from.
//!
//! # Functions
//!
//! - [`project`] — project an instant onto an already resolved [`Zone`]
//! - [`project_to`] — resolve a zone identifier, then project
//! - [`day_start`] — the instant a civil date begins in a zone (base offset)
//! - [`parse_instant`] / [`parse_date`] — RFC 3339 and ISO 8601 input parsing
//! - [`format_utc_offset`] — `"+08:00"`-style offset rendering

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};

use crate::error::{Result, SlotError};
use crate::zone::{Zone, ZoneResolver};

// ── project ─────────────────────────────────────────────────────────────────

/// Project `instant` onto `zone`, attaching the offset in effect at that
/// instant.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use slot_engine::projection::project;
/// use slot_engine::zone::{IanaZones, ZoneResolver};
///
/// let shanghai = IanaZones.resolve("Asia/Shanghai").unwrap();
/// let instant = DateTime::parse_from_rfc3339("2024-11-01T15:00:00Z").unwrap();
/// let local = project(&instant, &shanghai);
///
/// assert_eq!(local.to_rfc3339(), "2024-11-01T23:00:00+08:00");
/// assert_eq!(local, instant);
/// ```
pub fn project<Z: Zone + ?Sized>(
    instant: &DateTime<FixedOffset>,
    zone: &Z,
) -> DateTime<FixedOffset> {
    let utc = instant.with_timezone(&Utc);
    utc.with_timezone(&zone.offset_at(&utc))
}

/// Resolve `timezone` through `resolver`, then [`project`] onto it.
///
/// # Errors
///
/// Returns [`SlotError::InvalidTimezone`] if the resolver does not know
/// `timezone`.
pub fn project_to<R: ZoneResolver + ?Sized>(
    instant: &DateTime<FixedOffset>,
    timezone: &str,
    resolver: &R,
) -> Result<DateTime<FixedOffset>> {
    let zone = resolver.resolve(timezone)?;
    Ok(project(instant, &zone))
}

// ── day_start ───────────────────────────────────────────────────────────────

/// The instant `date` begins (00:00) in `zone`, using the zone's base offset.
///
/// DST is deliberately not consulted here; see [`Zone::base_offset`].
///
/// # Errors
///
/// Returns [`SlotError::InvalidDatetime`] if midnight of `date` cannot be
/// represented at that offset.
pub fn day_start<Z: Zone + ?Sized>(date: NaiveDate, zone: &Z) -> Result<DateTime<FixedOffset>> {
    let offset = zone.base_offset(date);
    date.and_time(NaiveTime::MIN)
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| {
            SlotError::InvalidDatetime(format!(
                "{} 00:00 is not representable at {}",
                date,
                format_utc_offset(offset)
            ))
        })
}

// ── Parsing and formatting ──────────────────────────────────────────────────

/// Parse an RFC 3339 datetime, keeping the offset it was written with.
pub fn parse_instant(s: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map_err(|e| SlotError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| SlotError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Format a UTC offset as a string (e.g., "-05:00", "+09:00").
pub fn format_utc_offset(offset: FixedOffset) -> String {
    let offset_secs = offset.local_minus_utc();
    let sign = if offset_secs >= 0 { "+" } else { "-" };
    let abs_secs = offset_secs.unsigned_abs();
    let hours = abs_secs / 3600;
    let minutes = (abs_secs % 3600) / 60;
    format!("{sign}{hours:02}:{minutes:02}")
}

// ── Tests ───────────────────────────────────────────────────────────────────
