//! # slot-engine
//!
//! Hourly availability slots for one civil day, in any timezone.
//!
//! Availability is stored as absolute time ranges. A viewer in another
//! timezone asks for one calendar date; the engine clips each range to that
//! date's civil day as the viewer sees it and cuts the overlap into slots of
//! at most one hour.
//!
//! ## Modules
//!
//! - [`zone`] — timezone resolution: IANA database, fixed-offset tables, UTC
//! - [`projection`] — re-express instants in a zone, civil day boundaries, parsing
//! - [`range`] — the [`TimeRange`] value type and the [`Slot`] alias
//! - [`availability`] — an ordered list of ranges with localization transforms
//! - [`slotter`] — range → hourly slots for one civil day
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use slot_engine::{parse_date, slot_availability, Availability, IanaZones, TimeRange};
//!
//! // Entered in Lisbon, stored in UTC.
//! let availability = Availability::new(vec![
//!     TimeRange::parse("2024-11-01T15:00:00+00:00", "2024-11-01T23:00:00+00:00").unwrap(),
//! ])
//! .to_utc();
//!
//! // Seen from Shanghai, Nov 1 only holds the last hour, cut at 23:59.
//! let date = parse_date("2024-11-01").unwrap();
//! let slots = slot_availability(&availability, date, "Asia/Shanghai", &IanaZones).unwrap();
//! assert_eq!(slots.len(), 1);
//! assert_eq!(slots[0].end.to_rfc3339(), "2024-11-01T23:59:00+08:00");
//! ```

pub mod availability;
pub mod error;
pub mod projection;
pub mod range;
pub mod slotter;
pub mod zone;

pub use availability::Availability;
pub use error::{Result, SlotError};
pub use projection::{day_start, format_utc_offset, parse_date, parse_instant, project, project_to};
pub use range::{Slot, TimeRange};
pub use slotter::{generate_hourly_slots, hourly_slots, slot_availability, HourlySlots};
pub use zone::{FixedZone, FixedZones, IanaZone, IanaZones, UtcZone, Zone, ZoneResolver};
