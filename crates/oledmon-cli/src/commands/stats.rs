//! The `stats` subcommand: one telemetry snapshot as JSON on stdout.

use std::thread;
use std::time::Duration;

use crate::error::Error;
use crate::stats::{Sampler, SamplerConfig};

const SETTLE: Duration = Duration::from_millis(500);

pub fn run(config: SamplerConfig) -> Result<(), Error> {
    let mut sampler = Sampler::new(config);

    sampler.sample()?;
    thread::sleep(SETTLE);
    let stats = sampler.sample()?;

    let json = serde_json::to_string_pretty(&stats).map_err(Error::Json)?;
    println!("{json}");
    Ok(())
}
