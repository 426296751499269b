//! DST transition policies for wall-clock slot times.

use serde::{Deserialize, Serialize};

/// Policy for wall-clock minutes that do not exist on a given day because the
/// zone springs forward over them (e.g., 02:30 in America/New_York on the
/// second Sunday of March).
///
/// Ambiguous wall-clock times (the repeated hour when clocks fall back) always
/// resolve to the earlier instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Drop candidate slots whose start falls in the gap.
    Skip,
    /// Read the wall-clock time with the offset in force before the gap, which
    /// moves it forward by the gap length (02:30 becomes 03:30).
    #[default]
    ShiftForward,
}
