//! One-shot queries: status, countdown, timeline, compare, message.

use aligner_core::{
    advisory_message, comparison_progress, countdown as countdown_until, current_stage_index,
    next_transition_date, timeline as stage_timeline, AdvisoryBand, Clock, Config, DerivedState,
    Schedule, StageStatus,
};
use serde_json::json;

use crate::common::{self, AtArg};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn load(json: bool) -> (Config, bool) {
    let config = Config::load_or_default();
    let json = json || config.display.json;
    (config, json)
}

pub fn status(at: AtArg, json: bool) -> CmdResult {
    let (config, json) = load(json);
    let plan = Schedule::treatment_plan();
    let mut rng = common::advisory_rng(&config);
    let state = DerivedState::at(at.clock().now(), &plan, &mut rng);

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    println!(
        "Aligner {} of {} ({}%)",
        state.current_stage, state.total_stages, state.progress_percent
    );
    println!("Started:         {}", common::format_date(&config, state.stage_started_at));
    match state.next_transition_at {
        Some(next) => println!(
            "Next change:     {} (in {})",
            common::format_date(&config, next),
            state.countdown
        ),
        None => println!("Next change:     treatment complete"),
    }
    println!("Treatment ends:  {}", common::format_date(&config, state.sequence_end_at));
    println!(
        "Completed: {}   Remaining: {}   Total days: {}",
        state.completed_stages, state.remaining_stages, state.total_days
    );
    println!();
    println!("{}", state.advisory);
    Ok(())
}

pub fn countdown(at: AtArg, json: bool) -> CmdResult {
    let (_, json) = load(json);
    let plan = Schedule::treatment_plan();
    let now = at.clock().now();
    let next = next_transition_date(now, &plan);
    let remaining = countdown_until(now, next);

    if json {
        let out = json!({
            "next_transition_at": next,
            "countdown": remaining,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if next.is_none() {
        println!("Treatment complete, no further changes.");
    } else {
        println!("{remaining}");
    }
    Ok(())
}

pub fn timeline(at: AtArg, json: bool) -> CmdResult {
    let (config, json) = load(json);
    let plan = Schedule::treatment_plan();
    let entries = stage_timeline(at.clock().now(), &plan);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in entries {
        let marker = match entry.status {
            StageStatus::Completed => "[x]",
            StageStatus::Current => "[>]",
            StageStatus::Upcoming => "[ ]",
        };
        println!(
            "{marker} {:>3}  {}",
            entry.stage,
            common::format_date(&config, entry.starts_at)
        );
    }
    Ok(())
}

pub fn compare(stage: Option<u32>, at: AtArg, json: bool) -> CmdResult {
    let (_, json) = load(json);
    let plan = Schedule::treatment_plan();
    let stage = resolve_stage(stage, at, &plan)?;
    let progress = comparison_progress(stage, plan.total_stages());
    let percent = (progress * 100.0).round() as u32;

    if json {
        let out = json!({ "stage": stage, "progress": progress, "percent": percent });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Aligner {stage} - {percent}% complete");
    }
    Ok(())
}

pub fn message(stage: Option<u32>, at: AtArg, json: bool) -> CmdResult {
    let (config, json) = load(json);
    let plan = Schedule::treatment_plan();
    let stage = resolve_stage(stage, at, &plan)?;
    let mut rng = common::advisory_rng(&config);
    let text = advisory_message(stage, plan.total_stages(), &mut rng);

    if json {
        let out = json!({
            "stage": stage,
            "band": AdvisoryBand::classify(stage, plan.total_stages()),
            "message": text,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{text}");
    }
    Ok(())
}

/// Explicit stage if given (must exist in the plan), else the current one.
fn resolve_stage(
    stage: Option<u32>,
    at: AtArg,
    plan: &Schedule,
) -> Result<u32, Box<dyn std::error::Error>> {
    match stage {
        Some(stage) if (1..=plan.total_stages()).contains(&stage) => Ok(stage),
        Some(stage) => Err(format!(
            "aligner {stage} is outside 1..={}",
            plan.total_stages()
        )
        .into()),
        None => Ok(current_stage_index(at.clock().now(), plan)),
    }
}
