//! Availability, booking-conflict, and timeline-layout core for a
//! workforce task-pool dashboard.
//!
//! The crate normalizes two external record shapes (personal tasks and
//! booking + task joins) into one interval model, resolves a worker's
//! agenda over a date window (expanding weekly recurrences into concrete
//! occurrences), answers the "can support now" eligibility question, lays
//! occurrences out into non-colliding timeline tracks, and runs the
//! optimistic drag/resize editing session that commits date changes back
//! through the persistence boundary.
//!
//! Persistence, authorization, and rendering stay outside: the only
//! collaborator contract is [`store::ScheduleStore`], and every computation
//! is a synchronous pure function over already-fetched data.

pub mod model;
pub mod observability;
pub mod schedule;
pub mod store;

pub use model::{
    DayRange, Interval, IntervalKind, Occurrence, SourceKind, WeekdaySet, expand_occurrences,
};
pub use schedule::{
    Assignment, ConflictInfo, DragSession, Eligibility, GestureKind, NewPersonalTask,
    PendingCommit, ReleaseOutcome, ResolveWindow, ScheduleError, Scheduler, TimelineItem,
    TrackLayout, free_windows, lay_out, validate_range,
};
pub use store::{
    BookingRecord, InMemoryStore, PersonalTaskRecord, ScheduleStore, StoreError, TaskSummary,
    decode_bookings, decode_personal_tasks,
};
