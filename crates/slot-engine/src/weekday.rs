//! The stored weekday convention for recurring availability windows.
//!
//! Windows persist their day as an integer with Monday = 0 through Sunday = 6.
//! Both the write side (seeding default windows) and the read side (resolving a
//! requested date) go through [`IsoWeekday`] so the mapping lives in one place.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Day of week as stored on an availability window. Monday = 0 … Sunday = 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum IsoWeekday {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
    Sunday = 6,
}

impl IsoWeekday {
    pub const ALL: [IsoWeekday; 7] = [
        IsoWeekday::Monday,
        IsoWeekday::Tuesday,
        IsoWeekday::Wednesday,
        IsoWeekday::Thursday,
        IsoWeekday::Friday,
        IsoWeekday::Saturday,
        IsoWeekday::Sunday,
    ];

    /// The stored integer for this weekday.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Map a stored integer back to a weekday. Returns `None` outside `0..=6`.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

impl From<Weekday> for IsoWeekday {
    fn from(day: Weekday) -> Self {
        // chrono's num_days_from_monday is already 0-based from Monday.
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

impl From<IsoWeekday> for Weekday {
    fn from(day: IsoWeekday) -> Self {
        match day {
            IsoWeekday::Monday => Weekday::Mon,
            IsoWeekday::Tuesday => Weekday::Tue,
            IsoWeekday::Wednesday => Weekday::Wed,
            IsoWeekday::Thursday => Weekday::Thu,
            IsoWeekday::Friday => Weekday::Fri,
            IsoWeekday::Saturday => Weekday::Sat,
            IsoWeekday::Sunday => Weekday::Sun,
        }
    }
}

impl From<IsoWeekday> for u8 {
    fn from(day: IsoWeekday) -> Self {
        day.index()
    }
}

impl TryFrom<u8> for IsoWeekday {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Self::from_index(value).ok_or_else(|| format!("weekday index out of range: {value}"))
    }
}

