//! Helpers shared by the CLI commands.

use aligner_core::{Clock, Config, FixedClock, SystemClock};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Args;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

/// Evaluate at a simulated instant instead of the system clock.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct AtArg {
    /// Local date/time to evaluate at (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<NaiveDateTime>,
}

impl AtArg {
    pub fn clock(&self) -> Box<dyn Clock> {
        match self.at {
            Some(at) => Box::new(FixedClock(at)),
            None => Box::new(SystemClock),
        }
    }
}

/// Parse a local wall-clock instant; a bare date means midnight.
pub fn parse_instant(s: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];
    for fmt in FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(at);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| format!("cannot parse '{s}' as YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS"))
}

/// RNG for advisory picks: seeded from config when a seed is set.
pub fn advisory_rng(config: &Config) -> Mcg128Xsl64 {
    match config.advisory.seed {
        Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
        None => Mcg128Xsl64::from_entropy(),
    }
}

pub fn format_date(config: &Config, at: NaiveDateTime) -> String {
    config.display.format_date(at)
}
