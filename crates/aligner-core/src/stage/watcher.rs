//! Stage watcher.
//!
//! Remembers the stage seen on the previous observation so a polling front
//! end can react to transitions. It holds no timer: the caller decides how
//! often to call [`StageWatcher::observe`] and which instant to pass.
//!
//! ## Usage
//!
//! ```ignore
//! let mut watcher = StageWatcher::new(schedule, clock.now());
//! // On every refresh:
//! if let Some(event) = watcher.observe(clock.now()) { /* repaint */ }
//! ```

use chrono::NaiveDateTime;

use super::engine::{current_stage_index, sequence_end_date};
use super::schedule::Schedule;
use crate::events::Event;

#[derive(Debug, Clone)]
pub struct StageWatcher {
    schedule: Schedule,
    last_stage: u32,
    completion_reported: bool,
}

impl StageWatcher {
    /// Start watching from the state at `now`.
    ///
    /// A treatment that is already over when watching starts is not
    /// reported again.
    pub fn new(schedule: Schedule, now: NaiveDateTime) -> Self {
        Self {
            last_stage: current_stage_index(now, &schedule),
            completion_reported: now >= sequence_end_date(&schedule),
            schedule,
        }
    }

    pub fn last_stage(&self) -> u32 {
        self.last_stage
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Re-derive the stage at `now`.
    ///
    /// Returns `StageAdvanced` when the stage is later than the last
    /// observation, otherwise `TreatmentCompleted` the first time `now`
    /// reaches the sequence end. A clock set back moves the remembered
    /// stage back without an event.
    pub fn observe(&mut self, now: NaiveDateTime) -> Option<Event> {
        let stage = current_stage_index(now, &self.schedule);
        if stage < self.last_stage {
            tracing::debug!(from = self.last_stage, to = stage, "clock moved back a stage");
            self.last_stage = stage;
            return None;
        }
        if stage > self.last_stage {
            let from = self.last_stage;
            self.last_stage = stage;
            tracing::info!(from, to = stage, "aligner stage changed");
            return Some(Event::StageAdvanced {
                from_stage: from,
                to_stage: stage,
                stage_started_at: self.schedule.stage_start(stage),
                at: now,
            });
        }

        if !self.completion_reported && now >= sequence_end_date(&self.schedule) {
            self.completion_reported = true;
            tracing::info!(total_stages = self.schedule.total_stages(), "treatment completed");
            return Some(Event::TreatmentCompleted {
                total_stages: self.schedule.total_stages(),
                at: now,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn no_event_within_a_stage() {
        let s = Schedule::treatment_plan();
        let start = s.stage_start(4);
        let mut w = StageWatcher::new(s, start);
        assert_eq!(w.observe(start + TimeDelta::days(3)), None);
        assert_eq!(w.last_stage(), 4);
    }

    #[test]
    fn crossing_a_transition_reports_advance() {
        let s = Schedule::treatment_plan();
        let mut w = StageWatcher::new(s, s.stage_start(5) - TimeDelta::seconds(1));
        match w.observe(s.stage_start(5)) {
            Some(Event::StageAdvanced {
                from_stage,
                to_stage,
                stage_started_at,
                ..
            }) => {
                assert_eq!(from_stage, 4);
                assert_eq!(to_stage, 5);
                assert_eq!(stage_started_at, s.stage_start(5));
            }
            other => panic!("Expected StageAdvanced, got {other:?}"),
        }
        assert_eq!(w.observe(s.stage_start(5)), None);
    }

    #[test]
    fn clock_set_back_is_quiet() {
        let s = Schedule::treatment_plan();
        let mut w = StageWatcher::new(s, s.stage_start(5));
        assert_eq!(w.observe(s.stage_start(4)), None);
        assert_eq!(w.last_stage(), 4);

        // Moving forward again reports the advance from where the clock is.
        assert!(matches!(
            w.observe(s.stage_start(5)),
            Some(Event::StageAdvanced { from_stage: 4, to_stage: 5, .. })
        ));
    }

    #[test]
    fn completion_reported_once() {
        let s = Schedule::treatment_plan();
        let end = sequence_end_date(&s);
        let mut w = StageWatcher::new(s, end - TimeDelta::seconds(1));
        assert!(matches!(
            w.observe(end),
            Some(Event::TreatmentCompleted { total_stages: 35, .. })
        ));
        assert_eq!(w.observe(end + TimeDelta::days(1)), None);
    }

    #[test]
    fn already_finished_treatment_is_quiet() {
        let s = Schedule::treatment_plan();
        let later = sequence_end_date(&s) + TimeDelta::days(30);
        let mut w = StageWatcher::new(s, later);
        assert_eq!(w.observe(later + TimeDelta::days(1)), None);
    }
}
