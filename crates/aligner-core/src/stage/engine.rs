//! Stage derivation engine.
//!
//! Every query is a pure function of `now` and a [`Schedule`]. Nothing here
//! reads the clock; callers sample it once (see [`crate::clock`]) and pass
//! the instant in, so repeated calls with the same inputs agree.
//!
//! ```text
//! sequence_start          stage k start                      sequence_end
//!      |-----|-----|  ...  |=====now=====|  ...  |-----|-----|
//!                          ^ current      ^ next transition
//! ```
//!
//! Instants before the sequence start clamp to stage 1 and instants past the
//! end clamp to the final stage, so every query is total.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::countdown::Countdown;
use super::schedule::{Schedule, MS_PER_DAY};
use crate::advisory::advisory_message;

/// 1-based index of the stage active at `now`, clamped to
/// `1..=total_stages`.
pub fn current_stage_index(now: NaiveDateTime, schedule: &Schedule) -> u32 {
    let elapsed_ms = (now - schedule.sequence_start()).num_milliseconds();
    let elapsed_days = elapsed_ms.div_euclid(MS_PER_DAY);
    let stage_offset = elapsed_days.div_euclid(i64::from(schedule.stage_duration_days()));
    let stage = stage_offset
        .saturating_add(1)
        .clamp(1, i64::from(schedule.total_stages()));
    // Clamped into the u32 range above.
    stage as u32
}

/// When the stage active at `now` began.
pub fn current_stage_start_date(now: NaiveDateTime, schedule: &Schedule) -> NaiveDateTime {
    schedule.stage_start(current_stage_index(now, schedule))
}

/// When the stage active at `now` hands over to the next one.
///
/// `None` once the final stage is active: there is no further transition.
pub fn next_transition_date(now: NaiveDateTime, schedule: &Schedule) -> Option<NaiveDateTime> {
    let stage = current_stage_index(now, schedule);
    if stage >= schedule.total_stages() {
        return None;
    }
    Some(schedule.after_stages(stage))
}

/// When the final stage ends.
pub fn sequence_end_date(schedule: &Schedule) -> NaiveDateTime {
    schedule.after_stages(schedule.total_stages())
}

/// Everything the presentation layer shows, derived for one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedState {
    pub at: NaiveDateTime,
    pub current_stage: u32,
    pub total_stages: u32,
    pub stage_started_at: NaiveDateTime,
    pub next_transition_at: Option<NaiveDateTime>,
    pub sequence_end_at: NaiveDateTime,
    pub countdown: Countdown,
    pub completed_stages: u32,
    pub remaining_stages: u32,
    pub total_days: u64,
    /// `current_stage / total_stages` as a rounded percentage.
    pub progress_percent: u32,
    pub advisory: String,
    /// True once `now` has reached the end of the final stage.
    pub complete: bool,
}

impl DerivedState {
    /// Derive the full state at `now`. `rng` only feeds the advisory pick.
    pub fn at<R: Rng>(now: NaiveDateTime, schedule: &Schedule, rng: &mut R) -> Self {
        let current_stage = current_stage_index(now, schedule);
        let total_stages = schedule.total_stages();
        let next_transition_at = next_transition_date(now, schedule);
        let sequence_end_at = sequence_end_date(schedule);

        tracing::debug!(
            %now,
            current_stage,
            total_stages,
            "derived stage state"
        );

        Self {
            at: now,
            current_stage,
            total_stages,
            stage_started_at: schedule.stage_start(current_stage),
            next_transition_at,
            sequence_end_at,
            countdown: Countdown::until(now, next_transition_at),
            completed_stages: current_stage - 1,
            remaining_stages: total_stages - current_stage,
            total_days: schedule.total_days(),
            progress_percent: progress_percent(current_stage, total_stages),
            advisory: advisory_message(current_stage, total_stages, rng).to_string(),
            complete: now >= sequence_end_at,
        }
    }
}

/// Rounded percentage of stages reached (the current one counts).
pub fn progress_percent(current_stage: u32, total_stages: u32) -> u32 {
    if total_stages == 0 {
        return 0;
    }
    let stage = u64::from(current_stage.min(total_stages));
    let total = u64::from(total_stages);
    // Round half up in integer arithmetic.
    ((stage * 200 + total) / (total * 2)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn thirty_days_in_is_stage_four() {
        let s = Schedule::treatment_plan();
        let now = dt(2026, 1, 20, 0);
        assert_eq!(current_stage_index(now, &s), 4);
        assert_eq!(current_stage_start_date(now, &s), dt(2026, 1, 20, 0));
        assert_eq!(next_transition_date(now, &s), Some(dt(2026, 1, 30, 0)));
    }

    #[test]
    fn last_instant_of_a_stage_stays_in_it() {
        let s = Schedule::treatment_plan();
        let now = dt(2026, 1, 20, 0) - TimeDelta::milliseconds(1);
        assert_eq!(current_stage_index(now, &s), 3);
    }

    #[test]
    fn before_start_clamps_to_first_stage() {
        let s = Schedule::treatment_plan();
        let now = dt(2025, 6, 1, 0);
        assert_eq!(current_stage_index(now, &s), 1);
        assert_eq!(current_stage_start_date(now, &s), s.sequence_start());
        assert_eq!(next_transition_date(now, &s), Some(dt(2025, 12, 31, 0)));
    }

    #[test]
    fn after_end_clamps_to_last_stage() {
        let s = Schedule::treatment_plan();
        let end = sequence_end_date(&s);
        assert_eq!(end, dt(2026, 12, 6, 0));
        for now in [end, end + TimeDelta::days(400)] {
            assert_eq!(current_stage_index(now, &s), 35);
            assert_eq!(next_transition_date(now, &s), None);
        }
    }

    #[test]
    fn final_stage_has_no_transition_even_before_end() {
        let s = Schedule::treatment_plan();
        let now = s.stage_start(35) + TimeDelta::hours(1);
        assert_eq!(current_stage_index(now, &s), 35);
        assert_eq!(next_transition_date(now, &s), None);
    }

    #[test]
    fn extreme_instants_do_not_overflow() {
        let s = Schedule::treatment_plan();
        assert_eq!(current_stage_index(NaiveDateTime::MIN, &s), 1);
        assert_eq!(current_stage_index(NaiveDateTime::MAX, &s), 35);
    }

    #[test]
    fn progress_percent_rounds() {
        assert_eq!(progress_percent(4, 35), 11);
        assert_eq!(progress_percent(1, 2), 50);
        assert_eq!(progress_percent(35, 35), 100);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
    }

    #[test]
    fn derived_state_is_consistent() {
        let s = Schedule::treatment_plan();
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let state = DerivedState::at(dt(2026, 1, 25, 12), &s, &mut rng);
        assert_eq!(state.current_stage, 4);
        assert_eq!(state.completed_stages, 3);
        assert_eq!(state.remaining_stages, 31);
        assert_eq!(state.total_days, 350);
        assert_eq!(state.countdown.days, 4);
        assert_eq!(state.countdown.hours, 12);
        assert!(!state.complete);
    }

    #[test]
    fn derived_state_after_end_is_complete() {
        let s = Schedule::treatment_plan();
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let state = DerivedState::at(dt(2027, 1, 1, 0), &s, &mut rng);
        assert!(state.complete);
        assert_eq!(state.next_transition_at, None);
        assert!(state.countdown.is_zero());
        assert_eq!(state.remaining_stages, 0);
    }
}
