//! Detect overlaps between candidate slots and busy intervals.
//!
//! All ranges are half-open: two ranges overlap iff `a.start < b.end && b.start < a.end`.
//! Adjacent ranges (where one ends exactly when another starts) are NOT conflicts.

use chrono::Duration;

use crate::model::TimeRange;

/// A detected conflict between a candidate range and a busy range.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub candidate: TimeRange,
    pub busy: TimeRange,
    pub overlap_minutes: i64,
}

/// Half-open overlap test.
pub fn overlaps(a: &TimeRange, b: &TimeRange) -> bool {
    a.start < b.end && b.start < a.end
}

/// Widen `range` by the given buffers on each side.
///
/// Buffers only affect conflict testing; the advertised slot keeps its
/// original bounds.
pub fn pad(range: &TimeRange, before_minutes: u32, after_minutes: u32) -> TimeRange {
    TimeRange {
        start: range.start - Duration::minutes(i64::from(before_minutes)),
        end: range.end + Duration::minutes(i64::from(after_minutes)),
    }
}

/// Whether `candidate` overlaps any interval in `busy`.
pub fn conflicts_with_any(candidate: &TimeRange, busy: &[TimeRange]) -> bool {
    busy.iter().any(|b| overlaps(candidate, b))
}

/// Find all pairwise conflicts between candidates and busy ranges.
///
/// The overlap duration is `min(a.end, b.end) - max(a.start, b.start)`.
pub fn find_conflicts(candidates: &[TimeRange], busy: &[TimeRange]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for a in candidates {
        for b in busy {
            if overlaps(a, b) {
                let overlap_start = a.start.max(b.start);
                let overlap_end = a.end.min(b.end);

                conflicts.push(Conflict {
                    candidate: *a,
                    busy: *b,
                    overlap_minutes: (overlap_end - overlap_start).num_minutes(),
                });
            }
        }
    }

    conflicts
}
