use crate::model::{DayRange, Occurrence};

// ── Free/busy summary ────────────────────────────────────────────

/// Compute a worker's free windows: merge the busy occurrences (bookings and
/// non-support personal blocks) into disjoint spans and subtract them from
/// the display window.
pub fn free_windows(occurrences: &[Occurrence], window: &DayRange) -> Vec<DayRange> {
    let mut busy: Vec<DayRange> = occurrences
        .iter()
        .filter(|o| o.is_busy())
        .filter_map(|o| o.range.clip(window))
        .collect();
    busy.sort_by_key(|r| r.start);
    let busy = merge_busy(&busy);
    subtract_busy(&[*window], &busy)
}

/// Merge sorted day ranges into disjoint spans. Overlapping and adjacent
/// ranges (end + one day touches the next start) collapse into one.
pub fn merge_busy(sorted: &[DayRange]) -> Vec<DayRange> {
    let mut merged: Vec<DayRange> = Vec::new();
    for &range in sorted {
        if let Some(last) = merged.last_mut()
            && last.end.succ_opt().is_none_or(|next| range.start <= next)
        {
            last.end = last.end.max(range.end);
            continue;
        }
        merged.push(range);
    }
    merged
}

/// Subtract sorted, disjoint `to_remove` ranges from sorted `base` ranges,
/// inclusive day arithmetic throughout.
pub fn subtract_busy(base: &[DayRange], to_remove: &[DayRange]) -> Vec<DayRange> {
    let mut result = Vec::new();
    let mut ri = 0;

    'base: for &b in base {
        let mut cursor = b.start;
        let end = b.end;

        while ri < to_remove.len() && to_remove[ri].end < cursor {
            ri += 1;
        }

        let mut j = ri;
        while j < to_remove.len() && to_remove[j].start <= end {
            let r = &to_remove[j];
            if r.start > cursor
                && let Some(gap_end) = r.start.pred_opt()
            {
                result.push(DayRange::new(cursor, gap_end));
            }
            match r.end.succ_opt() {
                Some(next) => cursor = cursor.max(next),
                // Busy span reaches the end of the calendar.
                None => continue 'base,
            }
            j += 1;
        }

        if cursor <= end {
            result.push(DayRange::new(cursor, end));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Interval, IntervalKind, expand_occurrences};
    use chrono::NaiveDate;
    use ulid::Ulid;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn r(start: u32, end: u32) -> DayRange {
        DayRange::new(d(start), d(end))
    }

    // ── subtract_busy ────────────────────────────────────

    #[test]
    fn subtract_no_overlap() {
        let base = vec![r(1, 5), r(10, 15)];
        let remove = vec![r(6, 9)];
        assert_eq!(subtract_busy(&base, &remove), base);
    }

    #[test]
    fn subtract_full_overlap() {
        let base = vec![r(5, 10)];
        let remove = vec![r(1, 14)];
        assert!(subtract_busy(&base, &remove).is_empty());
    }

    #[test]
    fn subtract_partial_left() {
        let base = vec![r(5, 15)];
        let remove = vec![r(1, 9)];
        assert_eq!(subtract_busy(&base, &remove), vec![r(10, 15)]);
    }

    #[test]
    fn subtract_partial_right() {
        let base = vec![r(5, 15)];
        let remove = vec![r(12, 20)];
        assert_eq!(subtract_busy(&base, &remove), vec![r(5, 11)]);
    }

    #[test]
    fn subtract_middle_punch() {
        let base = vec![r(1, 20)];
        let remove = vec![r(8, 12)];
        assert_eq!(subtract_busy(&base, &remove), vec![r(1, 7), r(13, 20)]);
    }

    #[test]
    fn subtract_multiple_punches() {
        let base = vec![r(1, 28)];
        let remove = vec![r(3, 4), r(10, 12), r(20, 25)];
        assert_eq!(
            subtract_busy(&base, &remove),
            vec![r(1, 2), r(5, 9), r(13, 19), r(26, 28)]
        );
    }

    #[test]
    fn subtract_single_day_blocks() {
        let base = vec![r(1, 3)];
        let remove = vec![r(1, 1), r(3, 3)];
        assert_eq!(subtract_busy(&base, &remove), vec![r(2, 2)]);
    }

    // ── merge_busy ───────────────────────────────────────

    #[test]
    fn merge_overlapping_ranges() {
        let spans = vec![r(1, 8), r(5, 12), r(20, 22)];
        assert_eq!(merge_busy(&spans), vec![r(1, 12), r(20, 22)]);
    }

    #[test]
    fn merge_adjacent_days() {
        // [1,5] and [6,10] do not overlap but are one contiguous busy block.
        let spans = vec![r(1, 5), r(6, 10)];
        assert_eq!(merge_busy(&spans), vec![r(1, 10)]);
    }

    #[test]
    fn merge_keeps_gap() {
        let spans = vec![r(1, 5), r(7, 10)];
        assert_eq!(merge_busy(&spans), vec![r(1, 5), r(7, 10)]);
    }

    // ── free_windows ─────────────────────────────────────

    fn occ(range: DayRange, can_support: bool) -> Occurrence {
        let iv = Interval {
            id: Ulid::new(),
            owner_id: Ulid::new(),
            kind: IntervalKind::PersonalTask {
                recurring: None,
                can_support,
            },
            range,
            title: "t".into(),
            description: None,
            is_full_day: true,
            status: None,
        };
        expand_occurrences(&iv, &range).remove(0)
    }

    #[test]
    fn free_windows_around_busy_blocks() {
        let window = r(1, 14);
        let occs = vec![occ(r(3, 5), false), occ(r(4, 6), false), occ(r(10, 10), false)];
        assert_eq!(
            free_windows(&occs, &window),
            vec![r(1, 2), r(7, 9), r(11, 14)]
        );
    }

    #[test]
    fn support_blocks_do_not_consume_free_time() {
        let window = r(1, 14);
        let occs = vec![occ(r(1, 14), true)];
        assert_eq!(free_windows(&occs, &window), vec![r(1, 14)]);
    }

    #[test]
    fn fully_booked_window_has_no_free_days() {
        let window = r(1, 7);
        let occs = vec![occ(r(1, 4), false), occ(r(5, 7), false)];
        assert!(free_windows(&occs, &window).is_empty());
    }
}
