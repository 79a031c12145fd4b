use crate::model::{DayRange, Occurrence};

/// One occurrence placed on the timeline, with everything the presentation
/// layer needs to draw its bar.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineItem {
    pub occurrence: Occurrence,
    /// Vertical lane; items sharing a track never overlap in time.
    pub track: usize,
    /// Horizontal position of the clipped range within the window, percent.
    pub left_pct: f64,
    pub width_pct: f64,
    pub has_overlap: bool,
    /// Titles of every other occurrence sharing at least one day, in
    /// timeline order. Independent of track assignment.
    pub overlap_titles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackLayout {
    /// Items in layout order: ascending start, longer items first on ties.
    pub items: Vec<TimelineItem>,
    /// Number of lanes used; determines the canvas height.
    pub track_count: usize,
}

/// Assign each occurrence a track such that no two occurrences on the same
/// track overlap, using first-fit over start-sorted input. Greedy first-fit
/// is optimal on interval graphs: the track count equals the maximum number
/// of simultaneously overlapping occurrences.
pub fn lay_out(occurrences: &[Occurrence], window: &DayRange) -> TrackLayout {
    if occurrences.is_empty() {
        return TrackLayout::default();
    }

    let mut order: Vec<usize> = (0..occurrences.len()).collect();
    order.sort_by(|&a, &b| {
        let (ra, rb) = (&occurrences[a].range, &occurrences[b].range);
        ra.start.cmp(&rb.start).then(rb.days().cmp(&ra.days()))
    });

    // tracks[t] holds indices already placed on lane t.
    let mut tracks: Vec<Vec<usize>> = Vec::new();
    let mut assigned = vec![0usize; occurrences.len()];
    for &idx in &order {
        let range = &occurrences[idx].range;
        let slot = tracks
            .iter()
            .position(|placed| placed.iter().all(|&p| !occurrences[p].range.overlaps(range)));
        match slot {
            Some(t) => {
                tracks[t].push(idx);
                assigned[idx] = t;
            }
            None => {
                assigned[idx] = tracks.len();
                tracks.push(vec![idx]);
            }
        }
    }

    let window_days = window.days() as f64;
    let items = order
        .iter()
        .map(|&idx| {
            let occ = &occurrences[idx];
            let overlap_titles: Vec<String> = order
                .iter()
                .filter(|&&other| other != idx)
                .filter(|&&other| occurrences[other].range.overlaps(&occ.range))
                .map(|&other| occurrences[other].title.clone())
                .collect();
            let offset = (occ.range.start - window.start).num_days() as f64;
            TimelineItem {
                occurrence: occ.clone(),
                track: assigned[idx],
                left_pct: offset * 100.0 / window_days,
                width_pct: occ.range.days() as f64 * 100.0 / window_days,
                has_overlap: !overlap_titles.is_empty(),
                overlap_titles,
            }
        })
        .collect();

    TrackLayout {
        items,
        track_count: tracks.len(),
    }
}
