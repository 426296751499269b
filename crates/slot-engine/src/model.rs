//! Tenant scheduling data: event types, recurring windows, bookings, and the
//! time ranges the engine works with.
//!
//! All instants are absolute UTC. Minute offsets on windows are local to the
//! owning event type's timezone and only become instants through [`crate::zone`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Limits;
use crate::error::{Result, SlotError};
use crate::weekday::IsoWeekday;
use crate::zone;

/// Minutes in a calendar day; the upper bound for a window's `end_minute`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A half-open `[start, end)` range of absolute instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Range starting at `start` lasting `minutes`.
    pub fn from_minutes(start: DateTime<Utc>, minutes: u32) -> Self {
        Self {
            start,
            end: start + Duration::minutes(i64::from(minutes)),
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// A bookable slot for a specific date. Ephemeral, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slot {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}

/// A tenant-owned bookable meeting definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventType {
    pub id: String,
    pub host_id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: u32,
    pub slot_interval_min: u32,
    #[serde(default)]
    pub buffer_before_min: u32,
    #[serde(default)]
    pub buffer_after_min: u32,
    /// IANA timezone name, e.g. "Europe/Berlin".
    pub timezone: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Host-supplied fields for a new event type, validated before it is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTypeDraft {
    pub name: String,
    pub duration_minutes: u32,
    pub slot_interval_min: u32,
    #[serde(default)]
    pub buffer_before_min: u32,
    #[serde(default)]
    pub buffer_after_min: u32,
    pub timezone: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl EventTypeDraft {
    /// Check the draft against the configured bounds.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidEventType` naming the first offending field, or
    /// `SlotError::InvalidTimezone` if the zone is not a known IANA identifier.
    pub fn validate(&self, limits: &Limits) -> Result<()> {
        if self.name.trim().chars().count() < 2 {
            return Err(invalid("name", "must be at least 2 characters"));
        }
        if !(limits.min_duration_minutes..=limits.max_duration_minutes)
            .contains(&self.duration_minutes)
        {
            return Err(invalid(
                "duration_minutes",
                format!(
                    "must be between {} and {}",
                    limits.min_duration_minutes, limits.max_duration_minutes
                ),
            ));
        }
        if !(limits.min_interval_minutes..=limits.max_interval_minutes)
            .contains(&self.slot_interval_min)
        {
            return Err(invalid(
                "slot_interval_min",
                format!(
                    "must be between {} and {}",
                    limits.min_interval_minutes, limits.max_interval_minutes
                ),
            ));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > 500 {
                return Err(invalid("description", "must be at most 500 characters"));
            }
        }
        zone::parse_timezone(&self.timezone)?;
        Ok(())
    }

    /// Validate and turn the draft into an active event type.
    pub fn into_event_type(
        self,
        id: impl Into<String>,
        host_id: impl Into<String>,
        slug: impl Into<String>,
        limits: &Limits,
    ) -> Result<EventType> {
        self.validate(limits)?;
        Ok(EventType {
            id: id.into(),
            host_id: host_id.into(),
            name: self.name.trim().to_string(),
            slug: slug.into(),
            description: self.description,
            duration_minutes: self.duration_minutes,
            slot_interval_min: self.slot_interval_min,
            buffer_before_min: self.buffer_before_min,
            buffer_after_min: self.buffer_after_min,
            timezone: self.timezone,
            is_active: true,
        })
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SlotError {
    SlotError::InvalidEventType {
        field,
        reason: reason.into(),
    }
}

/// A recurring weekly interval of open time for a host, in the event type's local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub host_id: String,
    pub day_of_week: IsoWeekday,
    /// Minutes since local midnight.
    pub start_minute: u32,
    /// Minutes since local midnight, exclusive. At most [`MINUTES_PER_DAY`].
    pub end_minute: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl AvailabilityWindow {
    pub fn new(
        host_id: impl Into<String>,
        day_of_week: IsoWeekday,
        start_minute: u32,
        end_minute: u32,
    ) -> Self {
        Self {
            host_id: host_id.into(),
            day_of_week,
            start_minute,
            end_minute,
            is_active: true,
        }
    }

    /// `0 <= start_minute < end_minute <= 1440`.
    pub fn is_valid(&self) -> bool {
        self.start_minute < self.end_minute && self.end_minute <= MINUTES_PER_DAY
    }
}

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Canceled,
}

impl BookingStatus {
    /// Pending and confirmed bookings occupy the host's time.
    pub fn blocks_time(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Validate a lifecycle transition and return the resulting state.
    ///
    /// Pending stays pending when confirmation fails, and re-canceling a
    /// canceled booking is a no-op.
    pub fn transition(self, to: BookingStatus) -> Result<BookingStatus> {
        use BookingStatus::*;
        match (self, to) {
            (Pending, Confirmed)
            | (Pending, Canceled)
            | (Confirmed, Canceled)
            | (Pending, Pending)
            | (Canceled, Canceled) => Ok(to),
            (from, to) => Err(SlotError::InvalidTransition { from, to }),
        }
    }
}

/// A reservation occupying `[start_time, end_time)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub host_id: String,
    pub event_type_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
}

impl Booking {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }

    pub fn confirm(&mut self) -> Result<()> {
        self.status = self.status.transition(BookingStatus::Confirmed)?;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.status = self.status.transition(BookingStatus::Canceled)?;
        Ok(())
    }
}

/// Payload of the public availability endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Timezone name stored on the event type, `None` when the event type is
    /// missing or inactive.
    pub timezone: Option<String>,
    pub slots: Vec<Slot>,
}
