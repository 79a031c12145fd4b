mod availability;
mod conflict;
mod drag;
mod error;
mod layout;
mod mutations;
mod queries;

pub use availability::{free_windows, merge_busy, subtract_busy};
pub use conflict::{ConflictInfo, Eligibility, eligibility, validate_range};
pub use drag::{DragSession, GestureKind, PendingCommit, ReleaseOutcome};
pub use error::ScheduleError;
pub use layout::{TimelineItem, TrackLayout, lay_out};
pub use mutations::{Assignment, NewPersonalTask};

use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use chrono::NaiveDate;

use crate::model::DayRange;
use crate::store::ScheduleStore;

/// A display window of `days` whole days starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveWindow {
    range: DayRange,
    days: u32,
}

impl ResolveWindow {
    pub fn new(start: NaiveDate, days: u32) -> Result<Self, ScheduleError> {
        conflict::validate_window_days(days)?;
        let end = start
            .checked_add_signed(chrono::Duration::days(i64::from(days) - 1))
            .ok_or(ScheduleError::InvalidWindow(days))?;
        Ok(Self {
            range: DayRange::new(start, end),
            days,
        })
    }

    /// The 14-day window the agenda view uses.
    pub fn fortnight(start: NaiveDate) -> Self {
        Self::new(start, 14).expect("14-day window is always valid")
    }

    pub fn range(&self) -> DayRange {
        self.range
    }

    pub fn days(&self) -> u32 {
        self.days
    }
}

/// Front door of the crate: owns the persistence collaborator and carries
/// the fetch-generation counter used to discard stale resolves. All
/// computation is synchronous; the store calls are the only suspension
/// points.
pub struct Scheduler {
    pub(super) store: Arc<dyn ScheduleStore>,
    pub(super) fetch_seq: AtomicU64,
}

impl Scheduler {
    pub fn new(store: Arc<dyn ScheduleStore>) -> Self {
        Self {
            store,
            fetch_seq: AtomicU64::new(0),
        }
    }
}
