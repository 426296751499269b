//! Tests for date parsing, weekday mapping, and wall-clock → UTC conversion.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use slot_engine::zone::{
    local_date_of, local_midnight, local_to_utc, parse_date, parse_timezone, weekday_in_zone,
};
use slot_engine::{DstPolicy, IsoWeekday, SlotError};

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Date parsing ────────────────────────────────────────────────────────────

#[test]
fn parses_padded_iso_dates() {
    assert_eq!(parse_date("2026-03-16").unwrap(), date(2026, 3, 16));
    assert_eq!(parse_date("2028-02-29").unwrap(), date(2028, 2, 29));
}

#[test]
fn rejects_malformed_dates() {
    for bad in ["2026-3-16", "2026/03/16", "20260316", "2026-13-01", "2027-02-29", " 2026-03-16"] {
        assert_eq!(parse_date(bad), Err(SlotError::InvalidDate(bad.to_string())));
    }
}

#[test]
fn rejects_unknown_timezones() {
    assert!(parse_timezone("Europe/Berlin").is_ok());
    assert!(matches!(
        parse_timezone("Mars/Olympus_Mons"),
        Err(SlotError::InvalidTimezone(_))
    ));
}

// ── Weekday convention ──────────────────────────────────────────────────────

#[test]
fn stored_weekday_indices_start_at_monday() {
    assert_eq!(IsoWeekday::from(Weekday::Mon).index(), 0);
    assert_eq!(IsoWeekday::from(Weekday::Fri).index(), 4);
    assert_eq!(IsoWeekday::from(Weekday::Sun).index(), 6);
    for day in IsoWeekday::ALL {
        assert_eq!(IsoWeekday::from(Weekday::from(day)), day);
        assert_eq!(IsoWeekday::from_index(day.index()), Some(day));
    }
    assert_eq!(IsoWeekday::from_index(7), None);
}

#[test]
fn weekday_serializes_as_integer() {
    assert_eq!(serde_json::to_string(&IsoWeekday::Wednesday).unwrap(), "2");
    let parsed: IsoWeekday = serde_json::from_str("6").unwrap();
    assert_eq!(parsed, IsoWeekday::Sunday);
    assert!(serde_json::from_str::<IsoWeekday>("7").is_err());
}

#[test]
fn weekday_follows_the_zone_not_utc() {
    // Monday 2026-03-16 11:00 UTC is already Tuesday in Auckland.
    let instant = at("2026-03-16T11:00:00Z");
    let auckland = parse_timezone("Pacific/Auckland").unwrap();
    let los_angeles = parse_timezone("America/Los_Angeles").unwrap();

    assert_eq!(weekday_in_zone(instant, chrono_tz::UTC), IsoWeekday::Monday);
    assert_eq!(weekday_in_zone(instant, auckland), IsoWeekday::Tuesday);
    assert_eq!(local_date_of(instant, auckland), date(2026, 3, 17));

    // Tuesday 2026-03-17 03:00 UTC is still Monday evening in Los Angeles.
    let late = at("2026-03-17T03:00:00Z");
    assert_eq!(weekday_in_zone(late, los_angeles), IsoWeekday::Monday);
}

// ── Wall clock → UTC ────────────────────────────────────────────────────────

#[test]
fn local_midnight_in_zone() {
    let auckland = parse_timezone("Pacific/Auckland").unwrap();
    assert_eq!(
        local_midnight(date(2026, 3, 17), auckland),
        Some(at("2026-03-16T11:00:00Z"))
    );
    assert_eq!(
        local_midnight(date(2026, 3, 16), chrono_tz::UTC),
        Some(at("2026-03-16T00:00:00Z"))
    );
}

#[test]
fn minute_offsets_resolve_in_zone() {
    let berlin = parse_timezone("Europe/Berlin").unwrap();
    // CET (UTC+1): 09:30 local is 08:30 UTC.
    assert_eq!(
        local_to_utc(date(2026, 3, 16), 9 * 60 + 30, berlin, DstPolicy::default()),
        Some(at("2026-03-16T08:30:00Z"))
    );
}

#[test]
fn minute_1440_is_next_local_midnight() {
    let berlin = parse_timezone("Europe/Berlin").unwrap();
    assert_eq!(
        local_to_utc(date(2026, 3, 16), 1440, berlin, DstPolicy::default()),
        local_midnight(date(2026, 3, 17), berlin)
    );
}

#[test]
fn wall_clock_is_kept_across_spring_forward() {
    // New York springs forward at 02:00 on 2026-03-08.
    let ny = parse_timezone("America/New_York").unwrap();
    let day = date(2026, 3, 8);

    // 01:30 is still EST (UTC-5), 09:00 is EDT (UTC-4).
    assert_eq!(
        local_to_utc(day, 90, ny, DstPolicy::default()),
        Some(at("2026-03-08T06:30:00Z"))
    );
    assert_eq!(
        local_to_utc(day, 9 * 60, ny, DstPolicy::default()),
        Some(at("2026-03-08T13:00:00Z"))
    );
}

#[test]
fn gap_minutes_follow_the_policy() {
    let ny = parse_timezone("America/New_York").unwrap();
    let day = date(2026, 3, 8);

    // 02:30 does not exist; shifting reads it with EST and lands on 03:30 EDT.
    assert_eq!(
        local_to_utc(day, 150, ny, DstPolicy::ShiftForward),
        Some(at("2026-03-08T07:30:00Z"))
    );
    assert_eq!(local_to_utc(day, 150, ny, DstPolicy::Skip), None);
    assert_eq!(local_to_utc(day, 120, ny, DstPolicy::Skip), None);
}

#[test]
fn ambiguous_minutes_take_the_earlier_instant() {
    // New York falls back at 02:00 EDT on 2026-11-01; 01:30 happens twice.
    let ny = parse_timezone("America/New_York").unwrap();
    assert_eq!(
        local_to_utc(date(2026, 11, 1), 90, ny, DstPolicy::default()),
        Some(at("2026-11-01T05:30:00Z"))
    );
}
