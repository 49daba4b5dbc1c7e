//! The `run` subcommand: the actual monitor loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::dashboard::Dashboard;
use crate::error::Error;
use crate::serial::Display;
use crate::stats::{Sampler, SamplerConfig};

pub struct RunConfig {
    pub device: PathBuf,
    pub baud: u32,
    pub glyphs: PathBuf,
    pub interval: f64,
    pub sampler: SamplerConfig,
}

/// Sleep until `deadline`. Arriving at or past the deadline means the
/// previous frame took longer than the tick, which is fatal: a dashboard
/// that silently falls behind is worse than one that visibly dies.
fn sleep_until(deadline: Instant) -> Result<(), Error> {
    let now = Instant::now();
    if now >= deadline {
        return Err(Error::DeadlineMissed);
    }
    thread::sleep(deadline - now);
    Ok(())
}

pub fn run(config: RunConfig) -> Result<(), Error> {
    let mut dashboard = Dashboard::new(&config.glyphs)?;
    let mut sampler = Sampler::new(config.sampler);
    let mut display = Display::open(&config.device, config.baud)?;

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::SeqCst);
    })
    .map_err(Error::Signal)?;

    // The first reading only establishes counter baselines; its rates are
    // garbage and must never reach the panel.
    sampler.sample()?;

    let interval = Duration::from_secs_f64(config.interval);
    let mut next_frame = Instant::now() + interval;
    info!("entering render loop at {:.2}s per frame", config.interval);

    while running.load(Ordering::SeqCst) {
        sleep_until(next_frame)?;
        next_frame += interval;

        let stats = sampler.sample()?;
        dashboard.update(&stats)?;
        display.send(&dashboard.frame())?;
        debug!("frame sent");
    }

    info!("interrupted, shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn past_deadline_is_fatal() {
        let deadline = Instant::now() - Duration::from_millis(1);
        assert!(matches!(sleep_until(deadline), Err(Error::DeadlineMissed)));
    }

    #[test]
    fn future_deadline_is_waited_out() {
        let deadline = Instant::now() + Duration::from_millis(5);
        sleep_until(deadline).unwrap();
        assert!(Instant::now() >= deadline);
    }
}
