//! Hourly slot generation for one civil day.
//!
//! Given an absolute [`TimeRange`], a calendar date and a timezone, the
//! slotter clips the range to that date's civil day in the zone and walks
//! the clipped span in one-hour steps. Steps are aligned to the clipped
//! start, not to the zone's clock hours: a range starting at 20:30 yields
//! 20:30–21:30, 21:30–22:30, and so on. The last step may be shorter.
//!
//! # Day boundary
//!
//! The day starts at 00:00 of the requested date at the zone's *base*
//! offset ([`Zone::base_offset`]) and lasts exactly 24 hours. On dates
//! where DST is in effect the boundary is therefore shifted by the DST
//! delta.
//!
//! # Midnight
//!
//! A slot never ends on 00:00 of the following date. When a step would,
//! its end is rewritten to 23:59 of the slot's own date (same offset) and
//! generation stops. The rest of the range belongs to the next date's
//! request.
//!
//! # Inverted ranges
//!
//! A range whose start is after its end clips to an empty span and yields
//! no slots.

use std::cmp;
use std::iter::FusedIterator;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use tracing::{debug, trace, warn};

use crate::availability::Availability;
use crate::error::{Result, SlotError};
use crate::projection::day_start;
use crate::range::{Slot, TimeRange};
use crate::zone::{Zone, ZoneResolver};

/// Lazily produces the hourly slots of one range on one civil day.
///
/// Clones continue independently from the point they were taken. Build a
/// fresh one with [`hourly_slots`] to start over.
#[derive(Debug, Clone)]
pub struct HourlySlots {
    cursor: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    finished: bool,
}

impl HourlySlots {
    /// The part of the range that overlaps the requested day, or `None` if
    /// it does not touch the day at all.
    ///
    /// Reflects the remaining span once iteration has started.
    pub fn remaining(&self) -> Option<TimeRange> {
        (!self.finished && self.cursor < self.end).then(|| TimeRange::new(self.cursor, self.end))
    }
}

impl Iterator for HourlySlots {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        if self.finished || self.cursor >= self.end {
            return None;
        }

        let start = self.cursor;
        let slot_end = start
            .checked_add_signed(chrono::Duration::hours(1))
            .map_or(self.end, |next_hour| cmp::min(next_hour, self.end));

        if let Some(last_minute) = last_minute_before_midnight(&start, &slot_end) {
            debug!(%start, %slot_end, %last_minute, "slot reaches next midnight, ending at 23:59");
            self.finished = true;
            return Some(Slot::new(start, last_minute));
        }

        trace!(%start, end = %slot_end, "slot");
        self.cursor = slot_end;
        Some(Slot::new(start, slot_end))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining() {
            None => (0, Some(0)),
            Some(span) => {
                let seconds = span.duration().num_seconds().max(0);
                let hours = usize::try_from((seconds + 3599) / 3600).unwrap_or(usize::MAX);
                (1, Some(hours))
            }
        }
    }
}

impl FusedIterator for HourlySlots {}

/// If `slot_end` is 00:00 of the date after `start`'s date, the replacement
/// end: 23:59 of `start`'s date at `slot_end`'s offset.
fn last_minute_before_midnight(
    start: &DateTime<FixedOffset>,
    slot_end: &DateTime<FixedOffset>,
) -> Option<DateTime<FixedOffset>> {
    if slot_end.time() != NaiveTime::MIN {
        return None;
    }

    let day = start.date_naive();
    if day.succ_opt()? != slot_end.date_naive() {
        return None;
    }

    day.and_hms_opt(23, 59, 0)?
        .and_local_timezone(*slot_end.offset())
        .single()
}

// ── hourly_slots ────────────────────────────────────────────────────────────

/// Slot `range` into the civil day `date` as observed in `zone`.
///
/// # Errors
///
/// Returns [`SlotError::InvalidDatetime`] if the day boundaries of `date`
/// fall outside the representable range.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use slot_engine::range::TimeRange;
/// use slot_engine::slotter::hourly_slots;
/// use slot_engine::zone::{IanaZones, ZoneResolver};
///
/// let range = TimeRange::parse("2024-11-01T15:00:00Z", "2024-11-01T23:00:00Z").unwrap();
/// let shanghai = IanaZones.resolve("Asia/Shanghai").unwrap();
/// let date = NaiveDate::from_ymd_opt(2024, 11, 2).unwrap();
///
/// let slots: Vec<_> = hourly_slots(&range, date, &shanghai).unwrap().collect();
/// assert_eq!(slots.len(), 7);
/// assert_eq!(slots[0].start.to_rfc3339(), "2024-11-02T00:00:00+08:00");
/// assert_eq!(slots[6].end.to_rfc3339(), "2024-11-02T07:00:00+08:00");
/// ```
pub fn hourly_slots<Z: Zone + ?Sized>(
    range: &TimeRange,
    date: NaiveDate,
    zone: &Z,
) -> Result<HourlySlots> {
    if range.is_inverted() {
        warn!(start = %range.start, end = %range.end, "range starts after it ends, no slots");
    }

    let local = range.localize(zone);
    let start_of_day = day_start(date, zone)?;
    let end_of_day = start_of_day
        .checked_add_signed(chrono::Duration::days(1))
        .ok_or_else(|| SlotError::InvalidDatetime(format!("end of {} is out of range", date)))?;

    // On ties the day boundary wins, so its offset is the one presented.
    let clipped_start = cmp::max(local.start, start_of_day);
    let clipped_end = cmp::min(end_of_day, local.end);

    debug!(
        timezone = zone.name(),
        %date,
        %clipped_start,
        %clipped_end,
        overlaps = (clipped_start < clipped_end),
        "clipped range to civil day"
    );

    Ok(HourlySlots {
        cursor: clipped_start,
        end: clipped_end,
        finished: false,
    })
}

/// Resolve `timezone` and collect the slots of `range` on `date`.
///
/// # Errors
///
/// Returns [`SlotError::InvalidTimezone`] if the resolver does not know
/// `timezone`, or [`SlotError::InvalidDatetime`] as for [`hourly_slots`].
pub fn generate_hourly_slots<R: ZoneResolver + ?Sized>(
    range: &TimeRange,
    date: NaiveDate,
    timezone: &str,
    resolver: &R,
) -> Result<Vec<Slot>> {
    let zone = resolver.resolve(timezone)?;
    Ok(hourly_slots(range, date, &zone)?.collect())
}

/// Slot every range of `availability` into `date` in `timezone`.
///
/// Slots are returned range by range in the availability's order; ranges
/// are not merged, so overlapping ranges produce overlapping slots.
///
/// # Errors
///
/// Same as [`generate_hourly_slots`].
pub fn slot_availability<R: ZoneResolver + ?Sized>(
    availability: &Availability,
    date: NaiveDate,
    timezone: &str,
    resolver: &R,
) -> Result<Vec<Slot>> {
    let zone = resolver.resolve(timezone)?;
    let mut slots = Vec::new();
    for range in availability {
        slots.extend(hourly_slots(range, date, &zone)?);
    }
    debug!(
        timezone,
        %date,
        ranges = availability.len(),
        slots = slots.len(),
        "slotted availability"
    );
    Ok(slots)
}

// ── Tests ───────────────────────────────────────────────────────────────────
