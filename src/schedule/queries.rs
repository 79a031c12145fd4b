use std::sync::atomic::Ordering;
use std::time::Instant;

use chrono::NaiveDate;
use futures::try_join;
use ulid::Ulid;

use crate::model::{DayRange, Interval, Occurrence, expand_occurrences};
use crate::observability;

use super::conflict::{self, Eligibility};
use super::{ResolveWindow, ScheduleError, Scheduler, availability};

impl Scheduler {
    /// Resolve one worker's agenda: fetch both source collections for the
    /// window, normalize, expand recurrences, and merge without
    /// deduplication — a personal task and a booking on the same dates both
    /// surface; flagging that is the conflict checks' concern.
    ///
    /// Output is ordered by occurrence start; ties keep source order
    /// (personal tasks ahead of bookings).
    pub async fn resolve(
        &self,
        worker: Ulid,
        window: &ResolveWindow,
    ) -> Result<Vec<Occurrence>, ScheduleError> {
        let range = window.range();
        let started = Instant::now();
        let (tasks, bookings) = try_join!(
            self.store.personal_tasks_for(worker, &range),
            self.store.bookings_for(worker, &range),
        )
        .map_err(ScheduleError::fetch)?;

        let mut occurrences = Vec::new();
        for record in tasks {
            let interval = Interval::from_personal_task(record)?;
            occurrences.extend(expand_occurrences(&interval, &range));
        }
        for record in bookings {
            let interval = Interval::from_booking(record)?;
            occurrences.extend(expand_occurrences(&interval, &range));
        }
        occurrences.sort_by_key(|o| o.range.start);

        metrics::counter!(observability::RESOLVES_TOTAL).increment(1);
        metrics::histogram!(observability::RESOLVE_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        tracing::debug!(
            %worker,
            days = window.days(),
            occurrences = occurrences.len(),
            "resolved agenda window"
        );
        Ok(occurrences)
    }

    /// `resolve`, with the stale-response discipline: if a newer resolve has
    /// started on this scheduler by the time the fetch lands, the result is
    /// dropped (`Ok(None)`) so rapid window navigation never paints stale
    /// data. Last response wins; nothing is cancelled mid-flight.
    pub async fn resolve_latest(
        &self,
        worker: Ulid,
        window: &ResolveWindow,
    ) -> Result<Option<Vec<Occurrence>>, ScheduleError> {
        let ticket = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let occurrences = self.resolve(worker, window).await?;
        if self.fetch_seq.load(Ordering::SeqCst) != ticket {
            metrics::counter!(observability::RESOLVES_STALE_DROPPED_TOTAL).increment(1);
            tracing::debug!(%worker, "discarding superseded resolve");
            return Ok(None);
        }
        Ok(Some(occurrences))
    }

    /// The "can support now" flag for a candidate worker and date range,
    /// with the conflicting intervals for UI messaging. The query range is
    /// validated, never silently reordered.
    pub async fn support_eligibility(
        &self,
        worker: Ulid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Eligibility, ScheduleError> {
        let query = conflict::validate_range(start, end)?;
        let (tasks, bookings) = try_join!(
            self.store.personal_tasks_for(worker, &query),
            self.store.bookings_for(worker, &query),
        )
        .map_err(ScheduleError::fetch)?;

        let mut intervals = Vec::with_capacity(tasks.len() + bookings.len());
        for record in tasks {
            intervals.push(Interval::from_personal_task(record)?);
        }
        for record in bookings {
            intervals.push(Interval::from_booking(record)?);
        }
        Ok(conflict::eligibility(&intervals, &query))
    }

    /// A worker's free windows within the given display window.
    pub async fn free_windows_for(
        &self,
        worker: Ulid,
        window: &ResolveWindow,
    ) -> Result<Vec<DayRange>, ScheduleError> {
        let occurrences = self.resolve(worker, window).await?;
        Ok(availability::free_windows(&occurrences, &window.range()))
    }
}
