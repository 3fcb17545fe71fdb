use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::stage::DerivedState;

/// Observable changes in treatment progress.
/// The CLI prints them; a GUI would poll for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Full derived state at one instant.
    StateSnapshot(DerivedState),
    /// The active stage changed since the last observation.
    StageAdvanced {
        from_stage: u32,
        to_stage: u32,
        stage_started_at: NaiveDateTime,
        at: NaiveDateTime,
    },
    /// The final stage ran out.
    TreatmentCompleted {
        total_stages: u32,
        at: NaiveDateTime,
    },
}
