//! Integration tests for stage derivation against the shipped treatment plan.

use aligner_core::{
    advisory_message_at, countdown, current_stage_index, current_stage_start_date,
    next_transition_date, sequence_end_date, timeline, AdvisoryBand, Clock, DerivedState,
    Event, FixedClock, Schedule, StageStatus, StageWatcher,
};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

#[test]
fn test_thirty_days_after_anchor() {
    let plan = Schedule::treatment_plan();
    let now = dt(2026, 1, 20, 0);

    assert_eq!(current_stage_index(now, &plan), 4);
    assert_eq!(current_stage_start_date(now, &plan), dt(2026, 1, 20, 0));
    assert_eq!(next_transition_date(now, &plan), Some(dt(2026, 1, 30, 0)));
}

#[test]
fn test_countdown_mid_stage() {
    let plan = Schedule::treatment_plan();
    let now = dt(2026, 1, 25, 12);

    let target = next_transition_date(now, &plan);
    assert_eq!(target, Some(dt(2026, 1, 30, 0)));

    let c = countdown(now, target);
    assert_eq!((c.days, c.hours, c.minutes, c.seconds), (4, 12, 0, 0));
}

#[test]
fn test_at_and_after_sequence_end() {
    let plan = Schedule::treatment_plan();
    let end = sequence_end_date(&plan);

    for now in [end, end + TimeDelta::days(1), end + TimeDelta::days(3650)] {
        assert_eq!(current_stage_index(now, &plan), 35);
        let next = next_transition_date(now, &plan);
        assert_eq!(next, None);
        assert!(countdown(now, next).is_zero());
    }
}

#[test]
fn test_anchor_on_a_later_stage_gives_same_dates() {
    // Same plan described from the day stage 4 was put in.
    let from_stage_four = Schedule::new(35, 10, dt(2026, 1, 20, 0), 4).unwrap();
    let plan = Schedule::treatment_plan();

    for now in [dt(2025, 12, 1, 0), dt(2026, 1, 25, 12), dt(2026, 8, 3, 7)] {
        assert_eq!(
            current_stage_index(now, &from_stage_four),
            current_stage_index(now, &plan)
        );
        assert_eq!(
            next_transition_date(now, &from_stage_four),
            next_transition_date(now, &plan)
        );
    }
    assert_eq!(sequence_end_date(&from_stage_four), sequence_end_date(&plan));
}

#[test]
fn test_three_quarter_boundary_selects_higher_band() {
    assert_eq!(AdvisoryBand::classify(27, 36), AdvisoryBand::ThreeQuarters);
    assert_eq!(
        advisory_message_at(27, 36, 0),
        AdvisoryBand::ThreeQuarters.fixed_message().unwrap()
    );
    assert_ne!(
        advisory_message_at(27, 36, 0),
        AdvisoryBand::Halfway.fixed_message().unwrap()
    );
}

#[test]
fn test_full_refresh_through_clock() {
    let plan = Schedule::treatment_plan();
    let clock = FixedClock(dt(2026, 3, 1, 9));
    let mut rng = Mcg128Xsl64::seed_from_u64(3);

    let state = DerivedState::at(clock.now(), &plan, &mut rng);
    // 2025-12-21 -> 2026-03-01 is 70 days: stage 8 starts that morning.
    assert_eq!(state.current_stage, 8);
    assert_eq!(state.stage_started_at, dt(2026, 3, 1, 0));
    assert_eq!(state.progress_percent, 23);
    assert_eq!(state.next_transition_at, Some(dt(2026, 3, 11, 0)));

    let markers = timeline(clock.now(), &plan);
    let current: Vec<_> = markers
        .iter()
        .filter(|m| m.status == StageStatus::Current)
        .collect();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].stage, state.current_stage);
}

#[test]
fn test_watcher_follows_whole_treatment() {
    let plan = Schedule::treatment_plan();
    let mut now = plan.sequence_start();
    let mut watcher = StageWatcher::new(plan, now);
    let mut advances = 0;
    let mut completed = 0;

    // Poll once every twelve hours until well past the end.
    while now < sequence_end_date(&plan) + TimeDelta::days(5) {
        now += TimeDelta::hours(12);
        match watcher.observe(now) {
            Some(Event::StageAdvanced { from_stage, to_stage, .. }) => {
                assert_eq!(to_stage, from_stage + 1);
                advances += 1;
            }
            Some(Event::TreatmentCompleted { .. }) => completed += 1,
            Some(other) => panic!("unexpected event {other:?}"),
            None => {}
        }
    }

    assert_eq!(advances, 34);
    assert_eq!(completed, 1);
}

#[test]
fn test_snapshot_serializes_with_type_tag() {
    let plan = Schedule::treatment_plan();
    let mut rng = Mcg128Xsl64::seed_from_u64(3);
    let state = DerivedState::at(dt(2026, 1, 20, 0), &plan, &mut rng);
    let json = serde_json::to_value(Event::StateSnapshot(state)).unwrap();
    assert_eq!(json["type"], "StateSnapshot");
    assert_eq!(json["current_stage"], 4);
    assert_eq!(json["next_transition_at"], "2026-01-30T00:00:00");
}
