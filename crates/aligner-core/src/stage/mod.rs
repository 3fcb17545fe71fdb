mod countdown;
mod engine;
mod schedule;
mod watcher;

pub use countdown::{countdown, Countdown};
pub use engine::{
    current_stage_index, current_stage_start_date, next_transition_date, progress_percent,
    sequence_end_date, DerivedState,
};
pub use schedule::Schedule;
pub use watcher::StageWatcher;
