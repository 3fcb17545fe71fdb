use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Wall-clock instant the built-in plan's first stage began.
const PLAN_ANCHOR: NaiveDateTime = match NaiveDate::from_ymd_opt(2025, 12, 21) {
    Some(date) => date.and_time(NaiveTime::MIN),
    None => panic!("invalid plan anchor date"),
};
const PLAN_TOTAL_STAGES: u32 = 35;
const PLAN_STAGE_DURATION_DAYS: u32 = 10;

/// Immutable treatment schedule.
///
/// Fields are private: a `Schedule` can only be obtained through
/// [`Schedule::new`] (or deserialization, which runs the same checks), so
/// every value in circulation is valid and read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleFields", into = "ScheduleFields")]
pub struct Schedule {
    total_stages: u32,
    stage_duration_days: u32,
    anchor_date: NaiveDateTime,
    anchor_stage_index: u32,
    sequence_start: NaiveDateTime,
}

/// Wire shape of a schedule: the four constructor arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScheduleFields {
    total_stages: u32,
    stage_duration_days: u32,
    anchor_date: NaiveDateTime,
    anchor_stage_index: u32,
}

impl Schedule {
    /// Build a schedule, rejecting configurations that cannot be queried.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when `total_stages` or
    /// `stage_duration_days` is zero, when `anchor_stage_index` is outside
    /// `1..=total_stages`, or when the sequence start/end would fall outside
    /// the representable calendar.
    pub fn new(
        total_stages: u32,
        stage_duration_days: u32,
        anchor_date: NaiveDateTime,
        anchor_stage_index: u32,
    ) -> Result<Self, ValidationError> {
        let result = Self::validate(total_stages, stage_duration_days, anchor_date, anchor_stage_index);
        if let Err(ref e) = result {
            tracing::warn!(
                total_stages,
                stage_duration_days,
                anchor_stage_index,
                error = %e,
                "rejected treatment schedule"
            );
        }
        result
    }

    fn validate(
        total_stages: u32,
        stage_duration_days: u32,
        anchor_date: NaiveDateTime,
        anchor_stage_index: u32,
    ) -> Result<Self, ValidationError> {
        if total_stages == 0 {
            return Err(ValidationError::NoStages);
        }
        if stage_duration_days == 0 {
            return Err(ValidationError::ZeroStageDuration);
        }
        if anchor_stage_index == 0 || anchor_stage_index > total_stages {
            return Err(ValidationError::AnchorOutOfRange {
                index: anchor_stage_index,
                total: total_stages,
            });
        }

        let lead_in = span_days(anchor_stage_index - 1, stage_duration_days)
            .ok_or(ValidationError::DateOutOfRange)?;
        let sequence_start = anchor_date
            .checked_sub_signed(lead_in)
            .ok_or(ValidationError::DateOutOfRange)?;
        span_days(total_stages, stage_duration_days)
            .and_then(|span| sequence_start.checked_add_signed(span))
            .ok_or(ValidationError::DateOutOfRange)?;

        Ok(Self {
            total_stages,
            stage_duration_days,
            anchor_date,
            anchor_stage_index,
            sequence_start,
        })
    }

    /// The treatment plan this tracker ships with: 35 aligners, ten days
    /// each, the first one worn from 21 December 2025.
    pub fn treatment_plan() -> Self {
        Self {
            total_stages: PLAN_TOTAL_STAGES,
            stage_duration_days: PLAN_STAGE_DURATION_DAYS,
            anchor_date: PLAN_ANCHOR,
            anchor_stage_index: 1,
            sequence_start: PLAN_ANCHOR,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn total_stages(&self) -> u32 {
        self.total_stages
    }

    pub fn stage_duration_days(&self) -> u32 {
        self.stage_duration_days
    }

    pub fn anchor_date(&self) -> NaiveDateTime {
        self.anchor_date
    }

    pub fn anchor_stage_index(&self) -> u32 {
        self.anchor_stage_index
    }

    /// Date stage 1 began (or would have begun), derived from the anchor.
    pub fn sequence_start(&self) -> NaiveDateTime {
        self.sequence_start
    }

    /// Length of the whole treatment in days.
    pub fn total_days(&self) -> u64 {
        u64::from(self.total_stages) * u64::from(self.stage_duration_days)
    }

    /// Start of `stage` (1-based). Out-of-range stages are clamped.
    pub fn stage_start(&self, stage: u32) -> NaiveDateTime {
        let stage = stage.clamp(1, self.total_stages);
        self.after_stages(stage - 1)
    }

    /// Instant `stages` whole stages after the sequence start.
    ///
    /// Callers pass at most `total_stages`, which `new` has already proven
    /// representable.
    pub(crate) fn after_stages(&self, stages: u32) -> NaiveDateTime {
        let stages = stages.min(self.total_stages);
        span_days(stages, self.stage_duration_days)
            .and_then(|span| self.sequence_start.checked_add_signed(span))
            .unwrap_or(NaiveDateTime::MAX)
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::treatment_plan()
    }
}

impl TryFrom<ScheduleFields> for Schedule {
    type Error = ValidationError;

    fn try_from(fields: ScheduleFields) -> Result<Self, Self::Error> {
        Schedule::new(
            fields.total_stages,
            fields.stage_duration_days,
            fields.anchor_date,
            fields.anchor_stage_index,
        )
    }
}

impl From<Schedule> for ScheduleFields {
    fn from(schedule: Schedule) -> Self {
        Self {
            total_stages: schedule.total_stages,
            stage_duration_days: schedule.stage_duration_days,
            anchor_date: schedule.anchor_date,
            anchor_stage_index: schedule.anchor_stage_index,
        }
    }
}

pub(crate) const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

fn span_days(stages: u32, stage_duration_days: u32) -> Option<TimeDelta> {
    let days = i64::try_from(u64::from(stages) * u64::from(stage_duration_days)).ok()?;
    TimeDelta::try_days(days)
}
