//! The `preview` subcommand: render one frame as ASCII art on stdout.
//!
//! Useful when tweaking the template or glyphs without a panel attached.
//! Every pixel becomes two characters so the aspect ratio roughly survives a
//! terminal's tall cells.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use oledmon_core::Canvas;

use crate::dashboard::Dashboard;
use crate::error::Error;
use crate::stats::{Sampler, SamplerConfig};

/// Counter-settling window between the baseline reading and the real one.
const SETTLE: Duration = Duration::from_millis(500);

fn ascii_frame(canvas: &Canvas) -> String {
    let view = canvas.root();
    let mut out = String::new();
    out.push('+');
    out.push_str(&"--".repeat(canvas.width()));
    out.push_str("+\n");
    for y in 0..canvas.height() {
        out.push('|');
        for x in 0..canvas.width() {
            out.push_str(if canvas.get(view, x, y) { "##" } else { "  " });
        }
        out.push_str("|\n");
    }
    out.push('+');
    out.push_str(&"--".repeat(canvas.width()));
    out.push_str("+\n");
    out
}

pub fn run(glyphs: PathBuf, sampler: SamplerConfig) -> Result<(), Error> {
    let mut dashboard = Dashboard::new(&glyphs)?;
    let mut sampler = Sampler::new(sampler);

    sampler.sample()?;
    thread::sleep(SETTLE);
    let stats = sampler.sample()?;

    dashboard.update(&stats)?;
    print!("{}", ascii_frame(dashboard.canvas()));
    Ok(())
}
