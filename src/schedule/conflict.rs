use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::model::{DayRange, Interval, IntervalKind, SourceKind};

use super::ScheduleError;

/// Validate a candidate date range before it enters any query or mutation.
/// Endpoints are never silently swapped.
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<DayRange, ScheduleError> {
    if end < start {
        return Err(ScheduleError::InvalidRange { start, end });
    }
    Ok(DayRange::new(start, end))
}

pub(crate) fn validate_window_days(days: u32) -> Result<(), ScheduleError> {
    if days == 0 {
        return Err(ScheduleError::InvalidWindow(days));
    }
    Ok(())
}

/// One committed interval standing in the way of a support assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictInfo {
    pub id: Ulid,
    pub kind: SourceKind,
    pub title: String,
    pub range: DayRange,
}

/// Result of the "can support now" check for one worker and date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub can_support_now: bool,
    pub conflicts: Vec<ConflictInfo>,
}

/// Whether `interval` blocks the worker from supporting during `query`.
///
/// Bookings block. Non-recurring personal tasks block unless declared as
/// support availability. Recurring personal tasks never block — their
/// patterns are informational for this check, not hard commitments.
pub fn blocks_support(interval: &Interval, query: &DayRange) -> bool {
    match &interval.kind {
        IntervalKind::Booking => interval.range.overlaps(query),
        IntervalKind::PersonalTask {
            recurring: Some(_), ..
        } => false,
        IntervalKind::PersonalTask {
            can_support: true, ..
        } => false,
        IntervalKind::PersonalTask { .. } => interval.range.overlaps(query),
    }
}

/// Collect every committed interval that blocks support during `query`.
pub fn support_conflicts<'a>(intervals: &'a [Interval], query: &DayRange) -> Vec<&'a Interval> {
    intervals
        .iter()
        .filter(|iv| blocks_support(iv, query))
        .collect()
}

/// Apply the eligibility ruleset over a worker's committed intervals.
pub fn eligibility(intervals: &[Interval], query: &DayRange) -> Eligibility {
    let conflicts: Vec<ConflictInfo> = support_conflicts(intervals, query)
        .into_iter()
        .map(|iv| ConflictInfo {
            id: iv.id,
            kind: iv.source_kind(),
            title: iv.title.clone(),
            range: iv.range,
        })
        .collect();
    Eligibility {
        can_support_now: conflicts.is_empty(),
        conflicts,
    }
}
