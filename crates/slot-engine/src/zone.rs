//! Timezone helpers: calendar-date parsing and wall-clock → UTC conversion.
//!
//! Every wall-clock value is interpreted in an IANA zone via `chrono-tz` and then
//! converted to UTC. No arithmetic is ever done on naive local times across a
//! DST boundary.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::weekday::IsoWeekday;

/// Longest DST gap searched backwards for the pre-transition offset.
/// Real-world gaps are 30 or 60 minutes; a few historical ones reach two hours.
const MAX_GAP_MINUTES: i64 = 180;

/// Parse an IANA timezone name.
///
/// # Errors
/// Returns `SlotError::InvalidTimezone` if the name is not a known identifier.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// # Errors
/// Returns `SlotError::InvalidDate` for anything else, including unpadded fields
/// ("2026-3-9") and impossible dates ("2026-02-30").
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let bytes = input.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(SlotError::InvalidDate(input.to_string()));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| SlotError::InvalidDate(input.to_string()))
}

/// Interpret `minute` minutes past local midnight of `date` in `tz` as an
/// absolute instant.
///
/// `minute` may equal 1440, which is local midnight of the following day.
/// Returns `None` only when the wall-clock time falls into a DST gap and the
/// policy is [`DstPolicy::Skip`].
pub fn local_to_utc(
    date: NaiveDate,
    minute: u32,
    tz: Tz,
    policy: DstPolicy,
) -> Option<DateTime<Utc>> {
    let naive = date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minute));
    resolve(naive, tz, policy)
}

/// The instant of local midnight of `date` in `tz`.
///
/// A few zones move their clocks at midnight; in that case midnight is shifted
/// forward regardless of policy, since the day still has a first instant.
pub fn local_midnight(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    local_to_utc(date, 0, tz, DstPolicy::ShiftForward)
}

/// The calendar date `instant` falls on in `tz`.
pub fn local_date_of(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// The stored-convention weekday `instant` falls on in `tz`.
pub fn weekday_in_zone(instant: DateTime<Utc>, tz: Tz) -> IsoWeekday {
    IsoWeekday::from(instant.with_timezone(&tz).weekday())
}

fn resolve(naive: NaiveDateTime, tz: Tz, policy: DstPolicy) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => shift_past_gap(naive, tz),
        },
    }
}

/// Read `naive` with the UTC offset in force just before the gap it falls in.
fn shift_past_gap(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    (1..=MAX_GAP_MINUTES).find_map(|back| {
        let before = naive - Duration::minutes(back);
        let offset = match tz.from_local_datetime(&before) {
            LocalResult::Single(dt) => dt.offset().fix(),
            LocalResult::Ambiguous(_, latest) => latest.offset().fix(),
            LocalResult::None => return None,
        };
        offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    })
}
