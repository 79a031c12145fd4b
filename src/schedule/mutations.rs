use chrono::NaiveDate;
use ulid::Ulid;

use crate::model::WeekdaySet;
use crate::observability;
use crate::store::{BookingRecord, PersonalTaskRecord, TaskSummary};

use super::conflict::validate_range;
use super::drag::{DragSession, ReleaseOutcome};
use super::{ScheduleError, Scheduler};

/// Input for a new self-declared calendar block.
#[derive(Debug, Clone)]
pub struct NewPersonalTask {
    pub owner_id: Ulid,
    pub title: String,
    pub description: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Weekday numbers 1=Mon .. 7=Sun; `Some` makes the block recurring.
    pub recurring_days: Option<Vec<u8>>,
    pub can_support: bool,
    pub is_full_day: bool,
}

/// One worker-to-task assignment in a recomputed assignment set.
#[derive(Debug, Clone, Copy)]
pub struct Assignment {
    pub worker_id: Ulid,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Scheduler {
    /// Create a personal task. The range and any weekday numbers are
    /// validated before the record reaches the store.
    pub async fn create_personal_task(
        &self,
        task: NewPersonalTask,
    ) -> Result<Ulid, ScheduleError> {
        validate_range(task.start, task.end)?;
        if let Some(ref days) = task.recurring_days {
            WeekdaySet::from_numbers(days)?;
        }
        let id = Ulid::new();
        let record = PersonalTaskRecord {
            id,
            user_id: task.owner_id,
            title: task.title,
            description: task.description,
            start_date: task.start,
            end_date: task.end,
            is_recurring: task.recurring_days.is_some(),
            recurring_days: task.recurring_days.unwrap_or_default(),
            can_support: task.can_support,
            is_full_day: task.is_full_day,
            status: Some("active".into()),
        };
        self.store
            .insert_personal_task(record)
            .await
            .map_err(ScheduleError::commit)?;
        tracing::debug!(%id, "created personal task");
        Ok(id)
    }

    /// Owner/manager date edit of a personal task.
    pub async fn update_personal_task_dates(
        &self,
        id: Ulid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), ScheduleError> {
        validate_range(start, end)?;
        self.store
            .update_personal_task_dates(id, start, end)
            .await
            .map_err(ScheduleError::commit)
    }

    /// Immediate, unconditional delete.
    pub async fn delete_personal_task(&self, id: Ulid) -> Result<(), ScheduleError> {
        self.store
            .delete_personal_task(id)
            .await
            .map_err(ScheduleError::commit)
    }

    /// Recompute a task's assignment set: the task's old bookings are
    /// bulk-deleted and the new set inserted in one store call, one booking
    /// per assigned worker.
    pub async fn assign_workers(
        &self,
        task_id: Ulid,
        task: TaskSummary,
        assignments: Vec<Assignment>,
    ) -> Result<(), ScheduleError> {
        let mut bookings = Vec::with_capacity(assignments.len());
        for a in &assignments {
            validate_range(a.start, a.end)?;
            bookings.push(BookingRecord {
                id: Ulid::new(),
                user_id: a.worker_id,
                task_id,
                start_date: a.start,
                end_date: a.end,
                status: Some("booked".into()),
                task: task.clone(),
            });
        }
        self.store
            .replace_task_bookings(task_id, bookings)
            .await
            .map_err(ScheduleError::commit)?;
        metrics::counter!(observability::ASSIGNMENTS_REPLACED_TOTAL).increment(1);
        tracing::info!(%task_id, workers = assignments.len(), "replaced assignment set");
        Ok(())
    }

    /// Drive a released drag gesture to completion: unchanged gestures are
    /// a no-op; changed ones write the new range through the store. Success
    /// and failure both land the session back in idle — on failure the
    /// optimistic preview is discarded and the last-known-good record
    /// stands until the next resolve.
    pub async fn finish_gesture(&self, session: &mut DragSession) -> Result<(), ScheduleError> {
        match session.pointer_up() {
            ReleaseOutcome::Unchanged => Ok(()),
            ReleaseOutcome::Commit(_) => self.commit_drag(session).await,
        }
    }

    /// Commit the session's pending date change. No-op when nothing is
    /// pending.
    pub async fn commit_drag(&self, session: &mut DragSession) -> Result<(), ScheduleError> {
        let Some(pending) = session.pending_commit().cloned() else {
            return Ok(());
        };
        let result = self
            .store
            .update_personal_task_dates(
                pending.occurrence_id,
                pending.range.start,
                pending.range.end,
            )
            .await;
        session.finish_commit();
        metrics::counter!(observability::COMMITS_TOTAL).increment(1);
        match result {
            Ok(()) => {
                tracing::debug!(id = %pending.occurrence_id, "committed drag edit");
                Ok(())
            }
            Err(err) => {
                metrics::counter!(observability::COMMIT_FAILURES_TOTAL).increment(1);
                tracing::warn!(id = %pending.occurrence_id, error = %err, "drag commit failed");
                Err(ScheduleError::commit(err))
            }
        }
    }
}
