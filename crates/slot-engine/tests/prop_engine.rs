//! Property-based tests for slot generation using proptest.
//!
//! These tests verify invariants that should hold for *any* event type, window
//! layout, busy set and "now", not just the scenarios in `engine_tests.rs`.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use slot_engine::conflict::{overlaps, pad};
use slot_engine::zone::parse_timezone;
use slot_engine::{generate_slots, AvailabilityWindow, DstPolicy, EventType, IsoWeekday, TimeRange};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_timezone() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("UTC".to_string()),
        Just("America/New_York".to_string()),
        Just("America/Los_Angeles".to_string()),
        Just("Europe/London".to_string()),
        Just("Asia/Kolkata".to_string()),
        Just("Pacific/Auckland".to_string()),
    ]
}

/// Any date in 2026, including both DST transition days of each zone.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..365).prop_map(|d| NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + Duration::days(d))
}

fn arb_event_type() -> impl Strategy<Value = EventType> {
    (15u32..=180, 15u32..=120, 0u32..=30, 0u32..=30, arb_timezone()).prop_map(
        |(duration, interval, before, after, tz)| EventType {
            id: "evt".to_string(),
            host_id: "host".to_string(),
            name: "Generated".to_string(),
            slug: "generated".to_string(),
            description: None,
            duration_minutes: duration,
            slot_interval_min: interval,
            buffer_before_min: before,
            buffer_after_min: after,
            timezone: tz,
            is_active: true,
        },
    )
}

fn arb_windows() -> impl Strategy<Value = Vec<AvailabilityWindow>> {
    prop::collection::vec((0u32..1380, 15u32..=600), 0..4).prop_map(|spans| {
        spans
            .into_iter()
            .map(|(start, len)| {
                AvailabilityWindow::new("host", IsoWeekday::Monday, start, (start + len).min(1440))
            })
            .collect()
    })
}

/// Busy ranges as minute offsets from `anchor`, spilling into the neighbouring days.
fn arb_busy(anchor: DateTime<Utc>) -> impl Strategy<Value = Vec<TimeRange>> {
    prop::collection::vec((-720i64..2160, 1i64..=240), 0..6).prop_map(move |ranges| {
        ranges
            .into_iter()
            .map(|(offset, len)| {
                let start = anchor + Duration::minutes(offset);
                TimeRange::new(start, start + Duration::minutes(len))
            })
            .collect()
    })
}

fn anchor(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn slots_satisfy_all_constraints(
        et in arb_event_type(),
        date in arb_date(),
        windows in arb_windows(),
        busy in arb_busy(anchor(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap())),
        now_offset in -1440i64..2880,
        skip_gaps in any::<bool>(),
    ) {
        let tz = parse_timezone(&et.timezone).unwrap();
        // Shift the generated busy set onto the chosen date.
        let shift = anchor(date) - anchor(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        let busy: Vec<TimeRange> = busy
            .into_iter()
            .map(|r| TimeRange::new(r.start + shift, r.end + shift))
            .collect();
        let now = anchor(date) + Duration::minutes(now_offset);
        let policy = if skip_gaps { DstPolicy::Skip } else { DstPolicy::ShiftForward };

        let slots = generate_slots(&et, date, tz, &windows, &busy, now, policy);

        for slot in &slots {
            // Every slot lasts exactly the duration.
            prop_assert_eq!(slot.end - slot.start, Duration::minutes(et.duration_minutes as i64));
            // Every slot starts strictly after now.
            prop_assert!(slot.start > now);
            // No padded slot touches a busy range.
            let padded = pad(&slot.range(), et.buffer_before_min, et.buffer_after_min);
            for b in &busy {
                prop_assert!(!overlaps(&padded, b), "slot {:?} overlaps busy {:?}", slot, b);
            }
        }

        // Strictly ascending starts.
        for pair in slots.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
        }
    }

    #[test]
    fn no_windows_means_no_slots(
        et in arb_event_type(),
        date in arb_date(),
    ) {
        let tz = parse_timezone(&et.timezone).unwrap();
        let slots = generate_slots(&et, date, tz, &[], &[], anchor(date) - Duration::days(30), DstPolicy::default());
        prop_assert!(slots.is_empty());
    }

    #[test]
    fn generation_is_deterministic(
        et in arb_event_type(),
        date in arb_date(),
        windows in arb_windows(),
        busy in arb_busy(anchor(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap())),
    ) {
        let tz = parse_timezone(&et.timezone).unwrap();
        let now = anchor(date) - Duration::days(1);

        let first = generate_slots(&et, date, tz, &windows, &busy, now, DstPolicy::default());
        let second = generate_slots(&et, date, tz, &windows, &busy, now, DstPolicy::default());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn free_day_yields_every_candidate(
        et in arb_event_type(),
        start in 0u32..1380,
        len in 15u32..=600,
    ) {
        // UTC has no DST gaps, so with nothing busy every stepped offset is a slot.
        let date = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
        let end = (start + len).min(1440);
        let windows = vec![AvailabilityWindow::new("host", IsoWeekday::Monday, start, end)];
        let now = anchor(date) - Duration::days(1);

        let slots = generate_slots(&et, date, chrono_tz::UTC, &windows, &[], now, DstPolicy::default());

        let expected = if start + et.duration_minutes <= end {
            ((end - start - et.duration_minutes) / et.slot_interval_min + 1) as usize
        } else {
            0
        };
        prop_assert_eq!(slots.len(), expected);
    }
}
