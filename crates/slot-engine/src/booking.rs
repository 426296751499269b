//! Write-side re-validation of a requested booking.
//!
//! Slots are computed from a read snapshot, so two guests can see the same open
//! slot. Before a booking is written, the requested start is checked against a
//! fresh slot computation and then against the live reservation set, using the
//! same half-open overlap rule as the engine.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::conflict::find_conflicts;
use crate::engine::AvailabilityEngine;
use crate::error::Result;
use crate::model::TimeRange;
use crate::zone;

/// Why a requested booking was refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("Event type not found")]
    EventTypeNotFound,

    #[error("Time slot is unavailable")]
    SlotUnavailable,

    #[error("Time slot already booked")]
    AlreadyBooked { conflicting: TimeRange },
}

/// Outcome of [`AvailabilityEngine::check_booking`].
#[derive(Debug, Clone, PartialEq)]
pub enum BookingDecision {
    /// The range the new booking should occupy.
    Accepted(TimeRange),
    Rejected(Rejection),
}

impl BookingDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, BookingDecision::Accepted(_))
    }
}

impl AvailabilityEngine {
    /// Decide whether a booking of `event_type_id` starting at `start` may be written.
    ///
    /// The start must coincide exactly with an advertised slot on its local date
    /// in the event type's zone, and no pending or confirmed booking may overlap
    /// `[start, start + duration)`.
    ///
    /// # Errors
    /// Only store failures are errors; every refusal is a [`BookingDecision::Rejected`].
    pub async fn check_booking(
        &self,
        event_type_id: &str,
        start: DateTime<Utc>,
    ) -> Result<BookingDecision> {
        let event_type = match self.event_types.event_type(event_type_id).await? {
            Some(event_type) if event_type.is_active => event_type,
            _ => return Ok(BookingDecision::Rejected(Rejection::EventTypeNotFound)),
        };
        let Ok(tz) = zone::parse_timezone(&event_type.timezone) else {
            return Ok(BookingDecision::Rejected(Rejection::SlotUnavailable));
        };

        let date = zone::local_date_of(start, tz);
        let slots = self.slots_for(&event_type, date).await?;
        if !slots.iter().any(|slot| slot.start == start) {
            return Ok(BookingDecision::Rejected(Rejection::SlotUnavailable));
        }

        let requested = TimeRange::from_minutes(start, event_type.duration_minutes);
        let existing = self
            .reservations
            .active_bookings(&event_type.host_id, requested)
            .await?;
        if let Some(conflict) = find_conflicts(&[requested], &existing).into_iter().next() {
            tracing::info!(event_type_id, %start, "booking rejected: overlapping reservation");
            return Ok(BookingDecision::Rejected(Rejection::AlreadyBooked {
                conflicting: conflict.busy,
            }));
        }

        Ok(BookingDecision::Accepted(requested))
    }
}
