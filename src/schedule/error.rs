use chrono::NaiveDate;
use ulid::Ulid;

use crate::store::StoreError;

#[derive(Debug)]
pub enum ScheduleError {
    /// `end` precedes `start`; rejected before the range enters the model.
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// Window length must be at least one day.
    InvalidWindow(u32),
    /// Weekday number outside 1..=7.
    InvalidWeekday(u8),
    /// Non-positive pixels-per-day scale for a drag gesture.
    InvalidScale(f64),
    /// Recurring or booking-sourced occurrences are read-only on the timeline.
    NotDraggable(Ulid),
    /// A gesture or commit is already in flight on this session.
    SessionBusy,
    NotFound(Ulid),
    /// A read from the persistence collaborator failed; prior data stands.
    Fetch(String),
    /// A write failed; the optimistic preview is discarded.
    Commit(String),
}

impl ScheduleError {
    pub(crate) fn fetch(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ScheduleError::NotFound(id),
            other => ScheduleError::Fetch(other.to_string()),
        }
    }

    pub(crate) fn commit(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ScheduleError::NotFound(id),
            other => ScheduleError::Commit(other.to_string()),
        }
    }
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::InvalidRange { start, end } => {
                write!(f, "invalid range: {end} precedes {start}")
            }
            ScheduleError::InvalidWindow(days) => {
                write!(f, "invalid window length: {days} days")
            }
            ScheduleError::InvalidWeekday(n) => write!(f, "invalid weekday number: {n}"),
            ScheduleError::InvalidScale(ppd) => {
                write!(f, "invalid pixels-per-day scale: {ppd}")
            }
            ScheduleError::NotDraggable(id) => write!(f, "occurrence not draggable: {id}"),
            ScheduleError::SessionBusy => write!(f, "a gesture or commit is already active"),
            ScheduleError::NotFound(id) => write!(f, "not found: {id}"),
            ScheduleError::Fetch(msg) => write!(f, "fetch failed: {msg}"),
            ScheduleError::Commit(msg) => write!(f, "commit failed: {msg}"),
        }
    }
}

impl std::error::Error for ScheduleError {}
