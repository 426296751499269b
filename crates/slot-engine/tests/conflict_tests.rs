//! Tests for half-open overlap detection and buffer padding.

use chrono::{TimeZone, Utc};
use slot_engine::conflict::{conflicts_with_any, pad};
use slot_engine::{find_conflicts, overlaps, TimeRange};

/// Helper to create a TimeRange from hour/minute bounds on 2026-03-16.
fn range(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> TimeRange {
    TimeRange {
        start: Utc
            .with_ymd_and_hms(2026, 3, 16, start_hour, start_min, 0)
            .unwrap(),
        end: Utc
            .with_ymd_and_hms(2026, 3, 16, end_hour, end_min, 0)
            .unwrap(),
    }
}

#[test]
fn partial_overlap_detected_with_minutes() {
    // A: 09:00-10:00, B: 09:30-10:30 → 30-min overlap
    let a = vec![range(9, 0, 10, 0)];
    let b = vec![range(9, 30, 10, 30)];

    let conflicts = find_conflicts(&a, &b);

    assert_eq!(conflicts.len(), 1, "should detect exactly one conflict");
    assert_eq!(conflicts[0].overlap_minutes, 30);
    assert_eq!(conflicts[0].busy, b[0]);
}

#[test]
fn adjacent_ranges_do_not_overlap() {
    // 09:00-10:00 and 10:00-11:00 share only the boundary instant.
    let a = range(9, 0, 10, 0);
    let b = range(10, 0, 11, 0);

    assert!(!overlaps(&a, &b));
    assert!(!overlaps(&b, &a));
    assert!(find_conflicts(&[a], &[b]).is_empty());
}

#[test]
fn containment_is_an_overlap() {
    let outer = range(9, 0, 12, 0);
    let inner = range(10, 0, 10, 15);

    assert!(overlaps(&outer, &inner));
    assert!(overlaps(&inner, &outer));
    assert_eq!(find_conflicts(&[inner], &[outer])[0].overlap_minutes, 15);
}

#[test]
fn every_pair_reported() {
    let candidates = vec![range(9, 0, 10, 0), range(14, 0, 15, 0)];
    let busy = vec![range(9, 30, 10, 30), range(14, 30, 15, 30), range(20, 0, 21, 0)];

    let conflicts = find_conflicts(&candidates, &busy);

    assert_eq!(conflicts.len(), 2);
    assert!(conflicts.iter().all(|c| c.overlap_minutes == 30));
}

#[test]
fn empty_inputs_have_no_conflicts() {
    assert!(find_conflicts(&[], &[range(9, 0, 10, 0)]).is_empty());
    assert!(find_conflicts(&[range(9, 0, 10, 0)], &[]).is_empty());
    assert!(!conflicts_with_any(&range(9, 0, 10, 0), &[]));
}

#[test]
fn padding_widens_both_sides() {
    let slot = range(10, 0, 10, 30);
    let padded = pad(&slot, 10, 5);

    assert_eq!(padded, range(9, 50, 10, 35));
    // The original range is untouched.
    assert_eq!(slot, range(10, 0, 10, 30));
}

#[test]
fn zero_padding_is_identity() {
    let slot = range(10, 0, 10, 30);
    assert_eq!(pad(&slot, 0, 0), slot);
}

#[test]
fn padding_turns_adjacency_into_conflict() {
    let booking = range(10, 0, 10, 30);
    let slot_after = range(10, 30, 11, 0);

    assert!(!conflicts_with_any(&slot_after, &[booking]));
    assert!(conflicts_with_any(&pad(&slot_after, 1, 0), &[booking]));
}
