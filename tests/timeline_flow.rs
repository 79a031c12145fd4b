use std::sync::Arc;

use chrono::NaiveDate;
use ulid::Ulid;

use shiftgrid::{
    Assignment, DayRange, DragSession, GestureKind, InMemoryStore, NewPersonalTask, ResolveWindow,
    Scheduler, TaskSummary, lay_out,
};

// ── Test infrastructure ──────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn scheduler() -> Scheduler {
    Scheduler::new(Arc::new(InMemoryStore::new()))
}

// ── End-to-end agenda flow ───────────────────────────────────

#[tokio::test]
async fn overlapping_sources_land_on_separate_tracks() {
    init_tracing();
    let sched = scheduler();
    let worker = Ulid::new();

    // One personal block 03-03..03-05 and one assigned booking 03-04..03-06:
    // they collide on 03-04/03-05.
    sched
        .create_personal_task(NewPersonalTask {
            owner_id: worker,
            title: "moving day".into(),
            description: None,
            start: march(3),
            end: march(5),
            recurring_days: None,
            can_support: false,
            is_full_day: true,
        })
        .await
        .unwrap();
    sched
        .assign_workers(
            Ulid::new(),
            TaskSummary {
                title: "counter duty".into(),
                description: None,
                department: Some("front desk".into()),
                priority: Some(1),
            },
            vec![Assignment {
                worker_id: worker,
                start: march(4),
                end: march(6),
            }],
        )
        .await
        .unwrap();

    let window = ResolveWindow::fortnight(march(1));
    let occurrences = sched.resolve(worker, &window).await.unwrap();
    assert_eq!(occurrences.len(), 2);

    let layout = lay_out(&occurrences, &window.range());
    assert_eq!(layout.track_count, 2);
    let tracks: Vec<usize> = layout.items.iter().map(|i| i.track).collect();
    assert_ne!(tracks[0], tracks[1]);
    for item in &layout.items {
        assert!(item.has_overlap);
        assert_eq!(item.overlap_titles.len(), 1);
    }
}

#[tokio::test]
async fn eligibility_reflects_assignment_changes() {
    init_tracing();
    let sched = scheduler();
    let worker = Ulid::new();
    let task_id = Ulid::new();
    let summary = TaskSummary {
        title: "night audit".into(),
        description: None,
        department: None,
        priority: None,
    };

    sched
        .assign_workers(
            task_id,
            summary.clone(),
            vec![Assignment {
                worker_id: worker,
                start: march(1),
                end: march(10),
            }],
        )
        .await
        .unwrap();
    let busy = sched
        .support_eligibility(worker, march(5), march(6))
        .await
        .unwrap();
    assert!(!busy.can_support_now);

    // Reassigning the task to nobody frees the worker again.
    sched.assign_workers(task_id, summary, vec![]).await.unwrap();
    let free = sched
        .support_eligibility(worker, march(5), march(6))
        .await
        .unwrap();
    assert!(free.can_support_now);
}

#[tokio::test]
async fn drag_edit_flows_back_into_the_next_resolve() {
    init_tracing();
    let sched = scheduler();
    let worker = Ulid::new();
    sched
        .create_personal_task(NewPersonalTask {
            owner_id: worker,
            title: "errand".into(),
            description: None,
            start: march(8),
            end: march(9),
            recurring_days: None,
            can_support: false,
            is_full_day: true,
        })
        .await
        .unwrap();

    let window = ResolveWindow::fortnight(march(1));
    let occurrences = sched.resolve(worker, &window).await.unwrap();
    let layout = lay_out(&occurrences, &window.range());

    // Resize the bar's right edge two days out at 32 px/day.
    let mut session = DragSession::new();
    session
        .begin(
            &layout.items[0].occurrence,
            GestureKind::ResizeEnd,
            640.0,
            32.0,
        )
        .unwrap();
    session.pointer_move(640.0 + 2.0 * 32.0);
    assert_eq!(session.preview(), Some(DayRange::new(march(8), march(11))));
    sched.finish_gesture(&mut session).await.unwrap();

    let occurrences = sched.resolve(worker, &window).await.unwrap();
    assert_eq!(occurrences[0].range, DayRange::new(march(8), march(11)));

    // Bookings stay read-only end to end.
    sched
        .assign_workers(
            Ulid::new(),
            TaskSummary {
                title: "till cover".into(),
                description: None,
                department: None,
                priority: None,
            },
            vec![Assignment {
                worker_id: worker,
                start: march(1),
                end: march(2),
            }],
        )
        .await
        .unwrap();
    let occurrences = sched.resolve(worker, &window).await.unwrap();
    let booking = occurrences
        .iter()
        .find(|o| o.title == "till cover")
        .unwrap();
    assert!(
        session
            .begin(booking, GestureKind::Move, 0.0, 32.0)
            .is_err()
    );
}

#[tokio::test]
async fn recurring_availability_supports_the_request_builder() {
    init_tracing();
    let sched = scheduler();
    let worker = Ulid::new();

    // Weekly Mon/Fri support availability through March, plus one hard
    // personal block mid-month.
    sched
        .create_personal_task(NewPersonalTask {
            owner_id: worker,
            title: "on call".into(),
            description: None,
            start: march(1),
            end: march(31),
            recurring_days: Some(vec![1, 5]),
            can_support: true,
            is_full_day: true,
        })
        .await
        .unwrap();
    sched
        .create_personal_task(NewPersonalTask {
            owner_id: worker,
            title: "travel".into(),
            description: None,
            start: march(12),
            end: march(13),
            recurring_days: None,
            can_support: false,
            is_full_day: true,
        })
        .await
        .unwrap();

    // The recurring availability never blocks; the travel block does.
    let during_travel = sched
        .support_eligibility(worker, march(11), march(14))
        .await
        .unwrap();
    assert!(!during_travel.can_support_now);
    assert_eq!(during_travel.conflicts.len(), 1);
    assert_eq!(during_travel.conflicts[0].title, "travel");

    let next_week = sched
        .support_eligibility(worker, march(18), march(19))
        .await
        .unwrap();
    assert!(next_week.can_support_now);

    // The agenda still shows the expanded pattern days.
    let window = ResolveWindow::fortnight(march(4));
    let occurrences = sched.resolve(worker, &window).await.unwrap();
    let pattern_days: Vec<NaiveDate> = occurrences
        .iter()
        .filter(|o| o.recurring)
        .map(|o| o.range.start)
        .collect();
    assert_eq!(
        pattern_days,
        vec![march(4), march(8), march(11), march(15)]
    );

    // Free windows exclude only the hard block.
    let free = sched
        .free_windows_for(worker, &ResolveWindow::new(march(10), 7).unwrap())
        .await
        .unwrap();
    assert_eq!(
        free,
        vec![
            DayRange::new(march(10), march(11)),
            DayRange::new(march(14), march(16)),
        ]
    );
}
