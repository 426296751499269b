//! Bookable slot computation.
//!
//! For a requested calendar date the engine resolves the weekday in the event
//! type's zone, loads that weekday's recurring windows, fetches the day's
//! bookings and external busy ranges concurrently, and walks each window in
//! steps of the slot interval. A candidate survives when its buffer-padded
//! range overlaps no busy range and it starts strictly after "now".

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::conflict::{conflicts_with_any, pad};
use crate::dst::DstPolicy;
use crate::error::Result;
use crate::model::{AvailabilityResponse, AvailabilityWindow, EventType, Slot, TimeRange};
use crate::source::{EventTypeStore, ExternalCalendar, ReservationStore};
use crate::zone;

/// Computes available slots from the three data sources and a clock.
///
/// Holds no per-request state; one engine can serve concurrent requests.
#[derive(Clone)]
pub struct AvailabilityEngine {
    pub(crate) event_types: Arc<dyn EventTypeStore>,
    pub(crate) reservations: Arc<dyn ReservationStore>,
    calendar: Arc<dyn ExternalCalendar>,
    clock: Arc<dyn Clock>,
    dst_policy: DstPolicy,
}

impl AvailabilityEngine {
    pub fn new(
        event_types: Arc<dyn EventTypeStore>,
        reservations: Arc<dyn ReservationStore>,
        calendar: Arc<dyn ExternalCalendar>,
    ) -> Self {
        Self {
            event_types,
            reservations,
            calendar,
            clock: Arc::new(SystemClock),
            dst_policy: DstPolicy::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_dst_policy(mut self, policy: DstPolicy) -> Self {
        self.dst_policy = policy;
        self
    }

    pub fn with_config(self, config: &EngineConfig) -> Self {
        self.with_dst_policy(config.engine.dst_policy)
    }

    /// Compute the bookable slots of an event type on a `YYYY-MM-DD` date.
    ///
    /// Unknown or inactive event types, days without windows, and an unreachable
    /// external calendar all yield an empty or reduced list rather than an error.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidDate` if `date` is not a valid `YYYY-MM-DD` date,
    /// and `SlotError::Store` if the tenant or reservation store fails.
    pub async fn compute_available_slots(
        &self,
        event_type_id: &str,
        date: &str,
    ) -> Result<Vec<Slot>> {
        let date = zone::parse_date(date)?;

        match self.event_types.event_type(event_type_id).await? {
            Some(event_type) if event_type.is_active => self.slots_for(&event_type, date).await,
            _ => {
                tracing::debug!(event_type_id, "event type missing or inactive; no slots");
                Ok(Vec::new())
            }
        }
    }

    /// Like [`compute_available_slots`](Self::compute_available_slots) but wraps the
    /// slots with the event type's timezone, as served by the public endpoint.
    pub async fn availability(
        &self,
        event_type_id: &str,
        date: &str,
    ) -> Result<AvailabilityResponse> {
        let date = zone::parse_date(date)?;

        match self.event_types.event_type(event_type_id).await? {
            Some(event_type) if event_type.is_active => Ok(AvailabilityResponse {
                slots: self.slots_for(&event_type, date).await?,
                timezone: Some(event_type.timezone),
            }),
            _ => Ok(AvailabilityResponse {
                timezone: None,
                slots: Vec::new(),
            }),
        }
    }

    /// Resolve an active event type by host and slug, then compute its availability.
    ///
    /// Returns `Ok(None)` when no active event type has that slug.
    pub async fn availability_by_slug(
        &self,
        host_id: &str,
        slug: &str,
        date: &str,
    ) -> Result<Option<AvailabilityResponse>> {
        let date = zone::parse_date(date)?;

        let Some(event_type) = self
            .event_types
            .active_event_type_by_slug(host_id, slug)
            .await?
        else {
            return Ok(None);
        };
        let slots = self.slots_for(&event_type, date).await?;
        Ok(Some(AvailabilityResponse {
            timezone: Some(event_type.timezone),
            slots,
        }))
    }

    /// Compute slots for an already-resolved event type on a parsed date.
    pub async fn slots_for(&self, event_type: &EventType, date: NaiveDate) -> Result<Vec<Slot>> {
        let tz = match zone::parse_timezone(&event_type.timezone) {
            Ok(tz) => tz,
            Err(err) => {
                tracing::warn!(
                    event_type_id = %event_type.id,
                    %err,
                    "unusable event type timezone; no slots"
                );
                return Ok(Vec::new());
            }
        };
        if event_type.duration_minutes == 0 || event_type.slot_interval_min == 0 {
            tracing::warn!(
                event_type_id = %event_type.id,
                "event type has zero duration or interval; no slots"
            );
            return Ok(Vec::new());
        }

        let Some(day_start) = zone::local_midnight(date, tz) else {
            tracing::warn!(%date, %tz, "local midnight could not be resolved; no slots");
            return Ok(Vec::new());
        };
        let weekday = zone::weekday_in_zone(day_start, tz);

        let windows = self
            .event_types
            .active_windows(&event_type.host_id, weekday)
            .await?;
        if windows.is_empty() {
            tracing::debug!(host_id = %event_type.host_id, ?weekday, "no active windows; no slots");
            return Ok(Vec::new());
        }

        let lookup = busy_lookup_range(event_type, date, day_start, tz);
        let host_id = event_type.host_id.as_str();
        let (bookings, external) = tokio::join!(
            self.reservations.active_bookings(host_id, lookup),
            self.calendar.busy_ranges(host_id, lookup),
        );

        let mut busy = bookings?;
        match external {
            Ok(ranges) => busy.extend(ranges),
            Err(err) => {
                tracing::warn!(
                    host_id,
                    %err,
                    "external calendar lookup failed; using bookings only"
                );
            }
        }

        let now = self.clock.now();
        let slots = generate_slots(event_type, date, tz, &windows, &busy, now, self.dst_policy);
        tracing::debug!(
            event_type_id = %event_type.id,
            %date,
            count = slots.len(),
            "computed slots"
        );
        Ok(slots)
    }
}

/// The range busy sources are queried over: `[day_start, day_start + 24h)`,
/// stretched to the next local midnight on 25-hour days and widened by the
/// buffers so every padded candidate is covered.
fn busy_lookup_range(
    event_type: &EventType,
    date: NaiveDate,
    day_start: DateTime<Utc>,
    tz: Tz,
) -> TimeRange {
    let mut day_end = day_start + Duration::hours(24);
    if let Some(next_midnight) = date.succ_opt().and_then(|next| zone::local_midnight(next, tz)) {
        day_end = day_end.max(next_midnight);
    }
    TimeRange::new(
        day_start - Duration::minutes(i64::from(event_type.buffer_before_min)),
        day_end + Duration::minutes(i64::from(event_type.buffer_after_min)),
    )
}

/// Walk the windows of one day and keep every candidate that is free and in the future.
///
/// Pure and synchronous: all inputs are already loaded. Candidate starts are
/// wall-clock minutes in `tz`; ends are `start + duration` in absolute time.
/// A slot interval shorter than the duration yields overlapping candidates,
/// each tested on its own. The result is sorted by start with duplicates (from
/// overlapping windows) removed.
pub fn generate_slots(
    event_type: &EventType,
    date: NaiveDate,
    tz: Tz,
    windows: &[AvailabilityWindow],
    busy: &[TimeRange],
    now: DateTime<Utc>,
    policy: DstPolicy,
) -> Vec<Slot> {
    let duration = event_type.duration_minutes;
    let step = event_type.slot_interval_min;
    if duration == 0 || step == 0 {
        return Vec::new();
    }

    let mut slots = Vec::new();

    for window in windows {
        if !window.is_valid() {
            tracing::warn!(
                host_id = %window.host_id,
                start_minute = window.start_minute,
                end_minute = window.end_minute,
                "skipping invalid availability window"
            );
            continue;
        }

        let mut offset = window.start_minute;
        while offset.saturating_add(duration) <= window.end_minute {
            if let Some(raw_start) = zone::local_to_utc(date, offset, tz, policy) {
                let slot = TimeRange::from_minutes(raw_start, duration);
                let protected = pad(
                    &slot,
                    event_type.buffer_before_min,
                    event_type.buffer_after_min,
                );

                if raw_start > now && !conflicts_with_any(&protected, busy) {
                    slots.push(Slot {
                        start: slot.start,
                        end: slot.end,
                    });
                }
            }
            offset = offset.saturating_add(step);
        }
    }

    slots.sort();
    slots.dedup();
    slots
}
