//! # Aligner Tracker Core Library
//!
//! This library derives treatment progress for a fixed sequence of clear
//! aligners, each worn for the same number of days. It follows a CLI-first
//! design: every query is available through the `aligner` binary, and any
//! richer front end is a thin layer over the same functions.
//!
//! ## Architecture
//!
//! - **Schedule**: immutable, validated plan (stage count, stage length,
//!   anchor date and stage)
//! - **Stage engine**: pure functions of `now` and a schedule: current
//!   stage, stage start, next transition, sequence end, countdown
//! - **Advisory**: progress-banded encouragement text
//! - **Timeline**: per-stage markers and the before/after comparison scale
//! - **Clock**: the single injectable source of "now"
//! - **Storage**: TOML-based display configuration
//!
//! ## Key Components
//!
//! - [`Schedule`]: the treatment plan
//! - [`DerivedState`]: everything a front end paints, for one instant
//! - [`StageWatcher`]: turns periodic polling into transition events
//! - [`Config`]: display preferences

pub mod advisory;
pub mod clock;
pub mod error;
pub mod events;
pub mod stage;
pub mod storage;
pub mod timeline;

pub use advisory::{advisory_message, advisory_message_at, AdvisoryBand};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use stage::{
    countdown, current_stage_index, current_stage_start_date, next_transition_date,
    sequence_end_date, Countdown, DerivedState, Schedule, StageWatcher,
};
pub use storage::Config;
pub use timeline::{comparison_progress, timeline, StageStatus, TimelineEntry};
