use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::schedule::ScheduleError;
use crate::store::{BookingRecord, PersonalTaskRecord};

/// Inclusive whole-day range `[start, end]`. Time-of-day never enters the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DayRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(end >= start, "DayRange end must not precede start");
        Self { start, end }
    }

    /// One-day range.
    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Closed-interval overlap: two ranges sharing at least one calendar day.
    /// `[1,5]` and `[6,10]` do not overlap; `[1,5]` and `[5,10]` do.
    pub fn overlaps(&self, other: &DayRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Intersection with `window`, or `None` when the ranges share no day.
    pub fn clip(&self, window: &DayRange) -> Option<DayRange> {
        if !self.overlaps(window) {
            return None;
        }
        Some(DayRange::new(
            self.start.max(window.start),
            self.end.min(window.end),
        ))
    }

    /// Shift both endpoints by `days`. `None` on calendar overflow.
    pub fn checked_shift(&self, days: i64) -> Option<DayRange> {
        let delta = chrono::Duration::days(days);
        let start = self.start.checked_add_signed(delta)?;
        let end = self.end.checked_add_signed(delta)?;
        Some(DayRange { start, end })
    }

    /// Days iterator over the range, inclusive.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Set of weekdays, Monday=1 .. Sunday=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Build from raw weekday numbers as stored by the backend (1=Mon .. 7=Sun).
    pub fn from_numbers(numbers: &[u8]) -> Result<Self, ScheduleError> {
        let mut bits = 0u8;
        for &n in numbers {
            if !(1..=7).contains(&n) {
                return Err(ScheduleError::InvalidWeekday(n));
            }
            bits |= 1 << (n - 1);
        }
        Ok(Self(bits))
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << (day.number_from_monday() - 1)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Which source collection an interval came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    PersonalTask,
    Booking,
}

/// What an interval represents. A booking is always committed work, so it
/// structurally has no availability or recurrence parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalKind {
    PersonalTask {
        /// Weekly pattern; the interval's `range` bounds the pattern's validity.
        recurring: Option<WeekdaySet>,
        /// Declared availability for support assignment rather than busy time.
        can_support: bool,
    },
    Booking,
}

/// A time-bounded, ownable activity on a worker's calendar — the unified
/// shape both source collections normalize into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub id: Ulid,
    pub owner_id: Ulid,
    pub kind: IntervalKind,
    pub range: DayRange,
    pub title: String,
    pub description: Option<String>,
    /// Informational only; all intervals occupy whole days.
    pub is_full_day: bool,
    /// Display label ("active", "booked", ...); no scheduling effect.
    pub status: Option<String>,
}

impl Interval {
    pub fn source_kind(&self) -> SourceKind {
        match self.kind {
            IntervalKind::PersonalTask { .. } => SourceKind::PersonalTask,
            IntervalKind::Booking => SourceKind::Booking,
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(
            self.kind,
            IntervalKind::PersonalTask { recurring: Some(_), .. }
        )
    }

    pub fn can_support(&self) -> bool {
        matches!(
            self.kind,
            IntervalKind::PersonalTask { can_support: true, .. }
        )
    }

    // ── Boundary normalization ───────────────────────────────────────

    /// Normalize a raw personal-task row. Rejects inverted ranges and
    /// out-of-range weekday numbers before the record enters the model.
    pub fn from_personal_task(record: PersonalTaskRecord) -> Result<Self, ScheduleError> {
        if record.end_date < record.start_date {
            return Err(ScheduleError::InvalidRange {
                start: record.start_date,
                end: record.end_date,
            });
        }
        let recurring = if record.is_recurring {
            Some(WeekdaySet::from_numbers(&record.recurring_days)?)
        } else {
            None
        };
        Ok(Self {
            id: record.id,
            owner_id: record.user_id,
            kind: IntervalKind::PersonalTask {
                recurring,
                can_support: record.can_support,
            },
            range: DayRange::new(record.start_date, record.end_date),
            title: record.title,
            description: record.description,
            is_full_day: record.is_full_day,
            status: record.status,
        })
    }

    /// Normalize a raw booking + task-join row.
    pub fn from_booking(record: BookingRecord) -> Result<Self, ScheduleError> {
        if record.end_date < record.start_date {
            return Err(ScheduleError::InvalidRange {
                start: record.start_date,
                end: record.end_date,
            });
        }
        Ok(Self {
            id: record.id,
            owner_id: record.user_id,
            kind: IntervalKind::Booking,
            range: DayRange::new(record.start_date, record.end_date),
            title: record.task.title,
            description: record.task.description,
            is_full_day: true,
            status: record.status,
        })
    }
}

/// A concrete materialization of an interval within a display window.
/// `range` is the clipped (or single-day, for recurring patterns) display
/// range; `source_range` is the record's true range, kept for mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub source_id: Ulid,
    pub owner_id: Ulid,
    pub kind: SourceKind,
    pub can_support: bool,
    pub recurring: bool,
    pub range: DayRange,
    pub source_range: DayRange,
    pub title: String,
    pub description: Option<String>,
}

impl Occurrence {
    /// Busy from the worker's point of view: committed work or a personal
    /// block not declared as support availability.
    pub fn is_busy(&self) -> bool {
        !self.can_support
    }
}

/// Expand an interval into its occurrences within `window`. Pure and total:
/// an interval that never touches the window yields nothing.
///
/// Non-recurring intervals emit one occurrence clipped to the window.
/// Recurring intervals emit one single-day occurrence per matching weekday
/// within the intersection of the window and the pattern's validity range.
pub fn expand_occurrences(interval: &Interval, window: &DayRange) -> Vec<Occurrence> {
    let base = |range: DayRange| Occurrence {
        source_id: interval.id,
        owner_id: interval.owner_id,
        kind: interval.source_kind(),
        can_support: interval.can_support(),
        recurring: interval.is_recurring(),
        range,
        source_range: interval.range,
        title: interval.title.clone(),
        description: interval.description.clone(),
    };

    match &interval.kind {
        IntervalKind::PersonalTask {
            recurring: Some(days),
            ..
        } => {
            let Some(valid) = interval.range.clip(window) else {
                return Vec::new();
            };
            valid
                .iter_days()
                .filter(|d| days.contains(d.weekday()))
                .map(|d| base(DayRange::single(d)))
                .collect()
        }
        _ => interval
            .range
            .clip(window)
            .map(|clipped| vec![base(clipped)])
            .unwrap_or_default(),
    }
}
