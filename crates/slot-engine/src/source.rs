//! Data sources the engine reads from.
//!
//! Three collaborators sit behind narrow async traits:
//!
//! - [`EventTypeStore`] — event types and recurring weekly windows
//! - [`ReservationStore`] — bookings that currently block time
//! - [`ExternalCalendar`] — busy ranges from a host's connected calendar
//!
//! In-memory implementations back tests and the CLI. [`TimeoutCalendar`] bounds
//! an external lookup with a deadline so the engine itself never has to.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::EngineConfig;
use crate::conflict::overlaps;
use crate::error::{Result, SourceError};
use crate::model::{AvailabilityWindow, Booking, EventType, EventTypeDraft, TimeRange};
use crate::slug::unique_slug;
use crate::weekday::IsoWeekday;

pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Tenant configuration: event types and recurring availability.
#[async_trait]
pub trait EventTypeStore: Send + Sync {
    /// Look up an event type by id, active or not.
    async fn event_type(&self, id: &str) -> SourceResult<Option<EventType>>;

    /// Look up an active event type by its per-host slug.
    async fn active_event_type_by_slug(
        &self,
        host_id: &str,
        slug: &str,
    ) -> SourceResult<Option<EventType>>;

    /// Active windows for a host on one weekday, ordered by `start_minute` ascending.
    async fn active_windows(
        &self,
        host_id: &str,
        day: IsoWeekday,
    ) -> SourceResult<Vec<AvailabilityWindow>>;
}

/// Existing reservations.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Ranges of pending or confirmed bookings for a host overlapping `range`.
    async fn active_bookings(
        &self,
        host_id: &str,
        range: TimeRange,
    ) -> SourceResult<Vec<TimeRange>>;
}

/// A host's connected external calendar. Read-only and best-effort.
#[async_trait]
pub trait ExternalCalendar: Send + Sync {
    /// Busy ranges for a host over `range`.
    async fn busy_ranges(&self, host_id: &str, range: TimeRange) -> SourceResult<Vec<TimeRange>>;
}

// ── In-memory tenant + reservation store ────────────────────────────────────

/// Event types, windows and bookings held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    event_types: Vec<EventType>,
    windows: Vec<AvailabilityWindow>,
    bookings: Vec<Booking>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(
        event_types: Vec<EventType>,
        windows: Vec<AvailabilityWindow>,
        bookings: Vec<Booking>,
    ) -> Self {
        Self {
            event_types,
            windows,
            bookings,
        }
    }

    pub fn insert_event_type(&mut self, event_type: EventType) {
        self.event_types.retain(|e| e.id != event_type.id);
        self.event_types.push(event_type);
    }

    pub fn insert_window(&mut self, window: AvailabilityWindow) {
        self.windows.push(window);
    }

    pub fn insert_booking(&mut self, booking: Booking) {
        self.bookings.retain(|b| b.id != booking.id);
        self.bookings.push(booking);
    }

    pub fn booking(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    pub fn booking_mut(&mut self, id: &str) -> Option<&mut Booking> {
        self.bookings.iter_mut().find(|b| b.id == id)
    }

    /// Windows of any state belonging to `host_id`.
    pub fn host_windows<'a>(
        &'a self,
        host_id: &'a str,
    ) -> impl Iterator<Item = &'a AvailabilityWindow> + 'a {
        self.windows.iter().filter(move |w| w.host_id == host_id)
    }

    /// Smallest `evt_{n}` id above every existing one of that shape and not in use.
    fn next_event_type_id(&self) -> String {
        let highest = self
            .event_types
            .iter()
            .filter_map(|e| e.id.strip_prefix("evt_")?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let mut n = highest.max(self.event_types.len() as u64) + 1;
        while self.event_types.iter().any(|e| e.id == format!("evt_{}", n)) {
            n += 1;
        }
        format!("evt_{}", n)
    }

    /// Validate a draft and create an event type for `host_id`.
    ///
    /// The slug is made unique among the host's event types. If the host has no
    /// availability windows yet, the configured defaults are seeded.
    pub fn create_event_type(
        &mut self,
        host_id: &str,
        draft: EventTypeDraft,
        config: &EngineConfig,
    ) -> Result<EventType> {
        let slug = unique_slug(&draft.name, |candidate| {
            self.event_types
                .iter()
                .any(|e| e.host_id == host_id && e.slug == candidate)
        });
        let id = self.next_event_type_id();
        let event_type = draft.into_event_type(id, host_id, slug, &config.limits)?;

        self.event_types.push(event_type.clone());

        if self.host_windows(host_id).next().is_none() {
            let seeded = config.defaults.windows_for(host_id);
            tracing::debug!(host_id, count = seeded.len(), "seeded default availability windows");
            self.windows.extend(seeded);
        }

        Ok(event_type)
    }
}

#[async_trait]
impl EventTypeStore for InMemoryStore {
    async fn event_type(&self, id: &str) -> SourceResult<Option<EventType>> {
        Ok(self.event_types.iter().find(|e| e.id == id).cloned())
    }

    async fn active_event_type_by_slug(
        &self,
        host_id: &str,
        slug: &str,
    ) -> SourceResult<Option<EventType>> {
        Ok(self
            .event_types
            .iter()
            .find(|e| e.host_id == host_id && e.slug == slug && e.is_active)
            .cloned())
    }

    async fn active_windows(
        &self,
        host_id: &str,
        day: IsoWeekday,
    ) -> SourceResult<Vec<AvailabilityWindow>> {
        let mut windows: Vec<AvailabilityWindow> = self
            .windows
            .iter()
            .filter(|w| w.host_id == host_id && w.day_of_week == day && w.is_active)
            .cloned()
            .collect();
        windows.sort_by_key(|w| w.start_minute);
        Ok(windows)
    }
}

#[async_trait]
impl ReservationStore for InMemoryStore {
    async fn active_bookings(
        &self,
        host_id: &str,
        range: TimeRange,
    ) -> SourceResult<Vec<TimeRange>> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.host_id == host_id && b.status.blocks_time())
            .map(Booking::range)
            .filter(|r| overlaps(r, &range))
            .collect())
    }
}

// ── External calendars ──────────────────────────────────────────────────────

/// Busy ranges per host held in memory. Hosts marked as failing report
/// [`SourceError::Unavailable`], which simulates a provider outage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCalendar {
    busy: HashMap<String, Vec<TimeRange>>,
    failing: HashSet<String>,
}

impl InMemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_busy(&mut self, host_id: impl Into<String>, range: TimeRange) {
        self.busy.entry(host_id.into()).or_default().push(range);
    }

    pub fn fail_for(&mut self, host_id: impl Into<String>) {
        self.failing.insert(host_id.into());
    }
}

#[async_trait]
impl ExternalCalendar for InMemoryCalendar {
    async fn busy_ranges(&self, host_id: &str, range: TimeRange) -> SourceResult<Vec<TimeRange>> {
        if self.failing.contains(host_id) {
            return Err(SourceError::Unavailable(format!(
                "calendar provider unreachable for host {host_id}"
            )));
        }
        Ok(self
            .busy
            .get(host_id)
            .map(|ranges| ranges.iter().filter(|r| overlaps(r, &range)).copied().collect())
            .unwrap_or_default())
    }
}

/// Bounds an inner calendar lookup with a deadline.
///
/// A lookup that does not finish in time reports [`SourceError::Timeout`].
#[derive(Debug, Clone)]
pub struct TimeoutCalendar<C> {
    inner: C,
    timeout: Duration,
}

impl<C: ExternalCalendar> TimeoutCalendar<C> {
    pub fn new(inner: C, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn from_config(inner: C, config: &EngineConfig) -> Self {
        Self::new(inner, Duration::from_millis(config.engine.external_timeout_ms))
    }
}

#[async_trait]
impl<C: ExternalCalendar> ExternalCalendar for TimeoutCalendar<C> {
    async fn busy_ranges(&self, host_id: &str, range: TimeRange) -> SourceResult<Vec<TimeRange>> {
        if self.timeout.is_zero() {
            return self.inner.busy_ranges(host_id, range).await;
        }
        match tokio::time::timeout(self.timeout, self.inner.busy_ranges(host_id, range)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}
