//! Per-stage timeline and the before/after comparison scale.
//!
//! Both are derived on demand from the stage engine; neither keeps state.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::stage::{current_stage_index, Schedule};

/// Where a stage stands relative to the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Completed,
    Current,
    Upcoming,
}

/// One marker on the timeline strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub stage: u32,
    pub status: StageStatus,
    pub starts_at: NaiveDateTime,
}

/// One entry per stage, classified against the stage active at `now`.
pub fn timeline(now: NaiveDateTime, schedule: &Schedule) -> Vec<TimelineEntry> {
    let current = current_stage_index(now, schedule);
    (1..=schedule.total_stages())
        .map(|stage| TimelineEntry {
            stage,
            status: match stage.cmp(&current) {
                std::cmp::Ordering::Less => StageStatus::Completed,
                std::cmp::Ordering::Equal => StageStatus::Current,
                std::cmp::Ordering::Greater => StageStatus::Upcoming,
            },
            starts_at: schedule.stage_start(stage),
        })
        .collect()
}

/// Position of `stage` on a 0.0 ..= 1.0 before/after scale.
///
/// Stage 1 is 0.0 and the final stage is 1.0; a single-stage plan is
/// already at 1.0. Out-of-range stages are clamped.
pub fn comparison_progress(stage: u32, total_stages: u32) -> f64 {
    if total_stages <= 1 {
        return 1.0;
    }
    let stage = stage.clamp(1, total_stages);
    f64::from(stage - 1) / f64::from(total_stages - 1)
}
