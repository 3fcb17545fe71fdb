use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "aligner", version, about = "Aligner treatment tracker")]
struct Cli {
    /// Output as JSON
    #[arg(long, short = 'j', global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current aligner, next change and overall progress
    Status {
        #[command(flatten)]
        at: common::AtArg,
    },
    /// Time left until the next aligner change
    Countdown {
        #[command(flatten)]
        at: common::AtArg,
    },
    /// One marker per aligner: completed, current or upcoming
    Timeline {
        #[command(flatten)]
        at: common::AtArg,
    },
    /// Before/after comparison position for an aligner
    Compare {
        /// Aligner number (defaults to the current one)
        stage: Option<u32>,
        #[command(flatten)]
        at: common::AtArg,
    },
    /// Encouragement for the current progress
    Message {
        /// Aligner number (defaults to the current one)
        #[arg(long)]
        stage: Option<u32>,
        #[command(flatten)]
        at: common::AtArg,
    },
    /// Live countdown, refreshed until interrupted
    Watch,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    let result = match cli.command {
        Commands::Status { at } => commands::status::status(at, json),
        Commands::Countdown { at } => commands::status::countdown(at, json),
        Commands::Timeline { at } => commands::status::timeline(at, json),
        Commands::Compare { stage, at } => commands::status::compare(stage, at, json),
        Commands::Message { stage, at } => commands::status::message(stage, at, json),
        Commands::Watch => commands::watch::run(json),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
