use ulid::Ulid;

use crate::model::{DayRange, Occurrence, SourceKind};

use super::ScheduleError;

/// The three pointer gestures a timeline bar supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Both endpoints shift together.
    Move,
    /// Left edge moves; start can never pass the end.
    ResizeStart,
    /// Right edge moves; end can never precede the start.
    ResizeEnd,
}

/// A date-range change awaiting the store write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommit {
    pub occurrence_id: Ulid,
    pub range: DayRange,
}

/// What a pointer-release resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Dates unchanged (or no gesture was active); no store call happens.
    Unchanged,
    /// Dates changed; the session holds this commit until it is resolved.
    Commit(PendingCommit),
}

#[derive(Debug, Clone, PartialEq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        gesture: GestureKind,
        occurrence_id: Ulid,
        pixels_per_day: f64,
        initial_pointer_x: f64,
        initial: DayRange,
        current: DayRange,
    },
    Committing(PendingCommit),
}

/// Optimistic move/resize editing of one timeline bar. One gesture at a
/// time for the whole timeline; a new gesture cannot start while a commit
/// is in flight. The session only ever mutates its local candidate range —
/// the record changes through the single commit path.
#[derive(Debug, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a gesture on `occurrence`. Only personally-owned, non-recurring
    /// personal-task occurrences are draggable; bookings are read-only.
    pub fn begin(
        &mut self,
        occurrence: &Occurrence,
        gesture: GestureKind,
        pointer_x: f64,
        pixels_per_day: f64,
    ) -> Result<(), ScheduleError> {
        if !matches!(self.state, DragState::Idle) {
            return Err(ScheduleError::SessionBusy);
        }
        if !pixels_per_day.is_finite() || pixels_per_day <= 0.0 {
            return Err(ScheduleError::InvalidScale(pixels_per_day));
        }
        if occurrence.kind == SourceKind::Booking || occurrence.recurring {
            return Err(ScheduleError::NotDraggable(occurrence.source_id));
        }
        self.state = DragState::Dragging {
            gesture,
            occurrence_id: occurrence.source_id,
            pixels_per_day,
            initial_pointer_x: pointer_x,
            initial: occurrence.source_range,
            current: occurrence.source_range,
        };
        Ok(())
    }

    /// Track the pointer and recompute the candidate range. Updates that
    /// would invert the range (or overflow the calendar) are rejected,
    /// leaving the previous candidate in place. No-op outside a gesture.
    pub fn pointer_move(&mut self, pointer_x: f64) {
        let DragState::Dragging {
            gesture,
            pixels_per_day,
            initial_pointer_x,
            initial,
            current,
            ..
        } = &mut self.state
        else {
            return;
        };
        let days_offset = ((pointer_x - *initial_pointer_x) / *pixels_per_day).round() as i64;
        let delta = chrono::Duration::days(days_offset);

        match gesture {
            GestureKind::Move => {
                if let Some(shifted) = initial.checked_shift(days_offset) {
                    *current = shifted;
                }
            }
            GestureKind::ResizeStart => {
                if let Some(start) = initial.start.checked_add_signed(delta)
                    && start <= initial.end
                {
                    *current = DayRange::new(start, initial.end);
                }
            }
            GestureKind::ResizeEnd => {
                if let Some(end) = initial.end.checked_add_signed(delta)
                    && end >= initial.start
                {
                    *current = DayRange::new(initial.start, end);
                }
            }
        }
    }

    /// End the gesture. An unchanged range goes straight back to idle with
    /// no store call; a changed range parks the session in the committing
    /// state until `finish_commit` resolves it.
    pub fn pointer_up(&mut self) -> ReleaseOutcome {
        let DragState::Dragging {
            occurrence_id,
            initial,
            current,
            ..
        } = &self.state
        else {
            return ReleaseOutcome::Unchanged;
        };
        let (occurrence_id, initial, current) = (*occurrence_id, *initial, *current);
        if current == initial {
            self.state = DragState::Idle;
            return ReleaseOutcome::Unchanged;
        }
        // Never submit an inverted range.
        let range = if current.end < current.start {
            DayRange::single(current.start)
        } else {
            current
        };
        let pending = PendingCommit {
            occurrence_id,
            range,
        };
        self.state = DragState::Committing(pending.clone());
        ReleaseOutcome::Commit(pending)
    }

    /// Abandon an active gesture, discarding the candidate range. A commit
    /// already in flight cannot be cancelled.
    pub fn cancel(&mut self) {
        if matches!(self.state, DragState::Dragging { .. }) {
            self.state = DragState::Idle;
        }
    }

    /// Resolve the in-flight commit (success or failure both land in idle;
    /// on failure the last-known-good server state remains authoritative).
    pub fn finish_commit(&mut self) {
        if matches!(self.state, DragState::Committing(_)) {
            self.state = DragState::Idle;
        }
    }

    pub fn pending_commit(&self) -> Option<&PendingCommit> {
        match &self.state {
            DragState::Committing(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    /// Live candidate range for the preview bar, while a gesture is active.
    pub fn preview(&self) -> Option<DayRange> {
        match &self.state {
            DragState::Dragging { current, .. } => Some(*current),
            _ => None,
        }
    }

    pub fn dragged_occurrence(&self) -> Option<Ulid> {
        match &self.state {
            DragState::Dragging { occurrence_id, .. } => Some(*occurrence_id),
            DragState::Committing(pending) => Some(pending.occurrence_id),
            DragState::Idle => None,
        }
    }
}
