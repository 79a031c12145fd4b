use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::model::DayRange;

/// Raw personal-task row as the backend stores it. Normalized into
/// `model::Interval` at the fetch boundary; never used past that point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalTaskRecord {
    pub id: Ulid,
    pub user_id: Ulid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    /// Weekday numbers 1=Mon .. 7=Sun; meaningful only when `is_recurring`.
    #[serde(default)]
    pub recurring_days: Vec<u8>,
    #[serde(default)]
    pub can_support: bool,
    #[serde(default = "default_full_day")]
    pub is_full_day: bool,
    #[serde(default)]
    pub status: Option<String>,
}

fn default_full_day() -> bool {
    true
}

/// Minimal task fields joined onto a booking row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub priority: Option<u8>,
}

/// Raw booking row joined with its task summary. One row per assigned
/// worker per task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: Ulid,
    pub user_id: Ulid,
    pub task_id: Ulid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: Option<String>,
    pub task: TaskSummary,
}

// ── Errors ───────────────────────────────────────────────────────

#[derive(Debug)]
pub enum StoreError {
    /// Backend request failed (network, rejected write, ...).
    Unavailable(String),
    NotFound(Ulid),
    /// A row could not be decoded into its record shape.
    Malformed(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
            StoreError::NotFound(id) => write!(f, "not found: {id}"),
            StoreError::Malformed(msg) => write!(f, "malformed row: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

// ── Row decoding ─────────────────────────────────────────────────

/// Decode a JSON array of personal-task rows as returned by the backend.
pub fn decode_personal_tasks(json: &str) -> Result<Vec<PersonalTaskRecord>, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::Malformed(e.to_string()))
}

/// Decode a JSON array of booking + task-join rows.
pub fn decode_bookings(json: &str) -> Result<Vec<BookingRecord>, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::Malformed(e.to_string()))
}

// ── Store contract ───────────────────────────────────────────────

/// The persistence collaborator. All operations are request/response; no
/// streaming or subscriptions. Query and authorization semantics beyond
/// these filters belong to the backend.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Personal tasks owned by `worker` whose range overlaps `window`.
    /// Recurring records always surface; expansion bounds them later.
    async fn personal_tasks_for(
        &self,
        worker: Ulid,
        window: &DayRange,
    ) -> Result<Vec<PersonalTaskRecord>, StoreError>;

    /// Bookings assigned to `worker` overlapping `window`, joined with the
    /// minimal task summary.
    async fn bookings_for(
        &self,
        worker: Ulid,
        window: &DayRange,
    ) -> Result<Vec<BookingRecord>, StoreError>;

    async fn insert_personal_task(&self, record: PersonalTaskRecord) -> Result<(), StoreError>;

    async fn update_personal_task_dates(
        &self,
        id: Ulid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), StoreError>;

    async fn delete_personal_task(&self, id: Ulid) -> Result<(), StoreError>;

    /// Recompute a task's assignment set: delete every booking for
    /// `task_id`, then insert `bookings` as the new set.
    async fn replace_task_bookings(
        &self,
        task_id: Ulid,
        bookings: Vec<BookingRecord>,
    ) -> Result<(), StoreError>;
}

// ── In-memory reference implementation ───────────────────────────

/// Dashmap-backed store for tests and embedders without a hosted backend.
#[derive(Default)]
pub struct InMemoryStore {
    personal_tasks: DashMap<Ulid, PersonalTaskRecord>,
    bookings: DashMap<Ulid, BookingRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.len()
    }
}

fn dates_overlap(start: NaiveDate, end: NaiveDate, window: &DayRange) -> bool {
    start <= window.end && end >= window.start
}

#[async_trait]
impl ScheduleStore for InMemoryStore {
    async fn personal_tasks_for(
        &self,
        worker: Ulid,
        window: &DayRange,
    ) -> Result<Vec<PersonalTaskRecord>, StoreError> {
        Ok(self
            .personal_tasks
            .iter()
            .filter(|e| e.value().user_id == worker)
            .filter(|e| {
                let r = e.value();
                r.is_recurring || dates_overlap(r.start_date, r.end_date, window)
            })
            .map(|e| e.value().clone())
            .collect())
    }

    async fn bookings_for(
        &self,
        worker: Ulid,
        window: &DayRange,
    ) -> Result<Vec<BookingRecord>, StoreError> {
        Ok(self
            .bookings
            .iter()
            .filter(|e| {
                let r = e.value();
                r.user_id == worker && dates_overlap(r.start_date, r.end_date, window)
            })
            .map(|e| e.value().clone())
            .collect())
    }

    async fn insert_personal_task(&self, record: PersonalTaskRecord) -> Result<(), StoreError> {
        self.personal_tasks.insert(record.id, record);
        Ok(())
    }

    async fn update_personal_task_dates(
        &self,
        id: Ulid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), StoreError> {
        let mut entry = self
            .personal_tasks
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        entry.start_date = start;
        entry.end_date = end;
        Ok(())
    }

    async fn delete_personal_task(&self, id: Ulid) -> Result<(), StoreError> {
        self.personal_tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn replace_task_bookings(
        &self,
        task_id: Ulid,
        bookings: Vec<BookingRecord>,
    ) -> Result<(), StoreError> {
        self.bookings.retain(|_, b| b.task_id != task_id);
        for booking in bookings {
            self.bookings.insert(booking.id, booking);
        }
        Ok(())
    }
}
