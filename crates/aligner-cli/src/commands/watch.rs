//! Live view: a countdown repainted every tick and a full refresh on a
//! slower cadence. Both cadences come from `[display]` in the config.

use std::io::Write;
use std::time::Duration;

use aligner_core::{
    countdown, next_transition_date, sequence_end_date, Clock, Config, DerivedState, Event,
    Schedule, StageWatcher, SystemClock,
};
use rand_pcg::Mcg128Xsl64;
use tokio::time::{interval, MissedTickBehavior};

use crate::common;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let json = json || config.display.json;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch(config, json))
}

async fn watch(config: Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let clock = SystemClock;
    let plan = Schedule::treatment_plan();
    let mut rng = common::advisory_rng(&config);
    let mut watcher = StageWatcher::new(plan, clock.now());

    tracing::info!(
        total_stages = plan.total_stages(),
        stage_duration_days = plan.stage_duration_days(),
        starts = %common::format_date(&config, plan.sequence_start()),
        ends = %common::format_date(&config, sequence_end_date(&plan)),
        "watching aligner treatment"
    );

    let mut tick = interval(Duration::from_secs(config.display.tick_secs));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut refresh = interval(Duration::from_secs(config.display.refresh_secs));
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                if !json {
                    println!();
                }
                tracing::debug!("watch interrupted");
                return Ok(());
            }
            _ = refresh.tick() => {
                let now = clock.now();
                if let Some(event) = watcher.observe(now) {
                    print_event(&event, json)?;
                }
                print_state(&config, &plan, now, &mut rng, json)?;
            }
            _ = tick.tick() => {
                print_countdown(&plan, clock.now(), json)?;
            }
        }
    }
}

fn print_event(event: &Event, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        Event::StageAdvanced { to_stage, .. } => {
            println!("\nTime to switch to aligner {to_stage}!");
        }
        Event::TreatmentCompleted { .. } => println!("\nTreatment complete!"),
        Event::StateSnapshot(_) => {}
    }
    Ok(())
}

fn print_state(
    config: &Config,
    plan: &Schedule,
    now: chrono::NaiveDateTime,
    rng: &mut Mcg128Xsl64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = DerivedState::at(now, plan, rng);
    if json {
        println!("{}", serde_json::to_string(&Event::StateSnapshot(state))?);
        return Ok(());
    }
    println!(
        "\nAligner {} of {} ({}%) - {}",
        state.current_stage, state.total_stages, state.progress_percent, state.advisory
    );
    if let Some(next) = state.next_transition_at {
        println!("Next change: {}", common::format_date(config, next));
    }
    Ok(())
}

fn print_countdown(
    plan: &Schedule,
    now: chrono::NaiveDateTime,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let next = next_transition_date(now, plan);
    let remaining = countdown(now, next);
    if json {
        println!("{}", serde_json::to_string(&remaining)?);
        return Ok(());
    }
    let mut stdout = std::io::stdout().lock();
    if next.is_some() {
        write!(stdout, "\rNext aligner in {remaining}   ")?;
    } else {
        write!(stdout, "\rNo further changes   ")?;
    }
    stdout.flush()?;
    Ok(())
}
