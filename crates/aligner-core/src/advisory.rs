//! Progress-banded advisory messages.
//!
//! The band is chosen from `current_stage / total_stages`, highest threshold
//! first. Only the lowest band draws from a pool, and the draw comes from a
//! caller-supplied RNG so tests and seeded configs stay reproducible.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Progress band, ordered from the start of treatment to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryBand {
    /// Below 25%
    Early,
    /// 25% or more
    Quarter,
    /// 50% or more
    Halfway,
    /// 75% or more
    ThreeQuarters,
    /// 90% or more
    FinalStretch,
}

/// Pool for the [`AdvisoryBand::Early`] band.
pub const EARLY_MESSAGES: [&str; 5] = [
    "You're doing great! Every day brings you a step closer to a perfect smile.",
    "Patience and determination! The result is going to be amazing.",
    "Every aligner is an important step in transforming your smile!",
    "You're well on your way, keep it up!",
    "Keep smiling, it's going really well!",
];

impl AdvisoryBand {
    /// Classify a stage against the plan length.
    ///
    /// Ratios are compared by cross-multiplying so that exact boundaries
    /// (27 of 36 is exactly 0.75) land in the higher band.
    pub fn classify(current_stage: u32, total_stages: u32) -> Self {
        let stage = u64::from(current_stage);
        let total = u64::from(total_stages);
        if stage * 10 >= total * 9 {
            AdvisoryBand::FinalStretch
        } else if stage * 4 >= total * 3 {
            AdvisoryBand::ThreeQuarters
        } else if stage * 2 >= total {
            AdvisoryBand::Halfway
        } else if stage * 4 >= total {
            AdvisoryBand::Quarter
        } else {
            AdvisoryBand::Early
        }
    }

    /// Fixed message for the band, `None` for the pooled early band.
    pub fn fixed_message(&self) -> Option<&'static str> {
        match self {
            AdvisoryBand::FinalStretch => {
                Some("Final stretch! Your perfect smile is almost here.")
            }
            AdvisoryBand::ThreeQuarters => {
                Some("You've completed 75% of your treatment! Great work.")
            }
            AdvisoryBand::Halfway => Some("Past the halfway mark! Keep going with patience."),
            AdvisoryBand::Quarter => {
                Some("A quarter done! Every day brings you a step closer.")
            }
            AdvisoryBand::Early => None,
        }
    }
}

/// Advisory message for a stage, drawing early-band picks from `rng`.
pub fn advisory_message<R: Rng>(
    current_stage: u32,
    total_stages: u32,
    rng: &mut R,
) -> &'static str {
    let band = AdvisoryBand::classify(current_stage, total_stages);
    match band.fixed_message() {
        Some(message) => message,
        None => EARLY_MESSAGES[rng.gen_range(0..EARLY_MESSAGES.len())],
    }
}

/// Deterministic variant: `pick` selects from the early pool, wrapping.
pub fn advisory_message_at(current_stage: u32, total_stages: u32, pick: usize) -> &'static str {
    let band = AdvisoryBand::classify(current_stage, total_stages);
    band.fixed_message()
        .unwrap_or(EARLY_MESSAGES[pick % EARLY_MESSAGES.len()])
}
