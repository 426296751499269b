//! # slot-engine
//!
//! Timezone-correct computation of bookable slots for multi-tenant scheduling.
//!
//! Hosts define event types (duration, slot interval, buffers, IANA timezone) and
//! recurring weekly availability windows. Given an event type and a calendar date,
//! the engine produces the ordered, conflict-free list of slots a guest may book,
//! taking existing bookings and external calendar busy ranges into account.
//!
//! ## Modules
//!
//! - [`engine`] — slot computation over the data sources
//! - [`booking`] — write-side re-validation of a requested booking
//! - [`conflict`] — half-open overlap tests and buffer padding
//! - [`zone`] — date parsing and wall-clock → UTC conversion
//! - [`dst`] — DST gap policies
//! - [`weekday`] — the stored Monday = 0 weekday convention
//! - [`source`] — data source traits and in-memory implementations
//! - [`model`] — event types, windows, bookings, slots
//! - [`config`] — TOML configuration
//! - [`error`] — Error types

pub mod booking;
pub mod clock;
pub mod config;
pub mod conflict;
pub mod dst;
pub mod engine;
pub mod error;
pub mod model;
pub mod slug;
pub mod source;
pub mod weekday;
pub mod zone;

pub use booking::{BookingDecision, Rejection};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use conflict::{find_conflicts, overlaps};
pub use dst::DstPolicy;
pub use engine::{generate_slots, AvailabilityEngine};
pub use error::{SlotError, SourceError};
pub use model::{
    AvailabilityResponse, AvailabilityWindow, Booking, BookingStatus, EventType, EventTypeDraft,
    Slot, TimeRange,
};
pub use weekday::IsoWeekday;
