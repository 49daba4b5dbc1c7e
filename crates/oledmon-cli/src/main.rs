//! CLI for oledmon — Linux system telemetry on a 1-bit serial OLED.

mod commands;
mod dashboard;
mod error;
mod serial;
mod stats;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::Error;
use crate::stats::SamplerConfig;

#[derive(Parser)]
#[command(name = "oledmon")]
#[command(about = "oledmon — Linux system telemetry on a 1-bit serial OLED")]
#[command(version = oledmon_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SamplingArgs {
    /// Network interface whose rx/tx byte counters are monitored
    #[arg(long, default_value = "enp4s0")]
    net_iface: String,

    /// Block device(s) whose throughput is summed (repeatable)
    #[arg(long = "disk", default_values_t = [String::from("sda"), String::from("sdb")])]
    disks: Vec<String>,

    /// hwmon input file for the CPU temperature
    #[arg(long, default_value = "/sys/class/hwmon/hwmon0/temp3_input")]
    cpu_temp: PathBuf,

    /// hwmon input file for the RAM temperature
    #[arg(long, default_value = "/sys/class/hwmon/hwmon1/temp1_input")]
    ram_temp: PathBuf,

    /// hwmon directory holding fan1_input through fan3_input
    #[arg(long, default_value = "/sys/class/hwmon/hwmon2")]
    fan_hwmon: PathBuf,
}

impl From<SamplingArgs> for SamplerConfig {
    fn from(args: SamplingArgs) -> SamplerConfig {
        SamplerConfig {
            net_iface: args.net_iface,
            disks: args.disks,
            cpu_temp: args.cpu_temp,
            ram_temp: args.ram_temp,
            fan_hwmon: args.fan_hwmon,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the display until interrupted
    Run {
        /// Serial device of the display bridge
        #[arg(long, default_value = "/dev/ttyUSB0")]
        device: PathBuf,

        /// Baud rate of the display bridge
        #[arg(long, default_value = "666666")]
        baud: u32,

        /// Directory holding the glyph and template PBM assets
        #[arg(long, default_value = "glyphs")]
        glyphs: PathBuf,

        /// Seconds between frames
        #[arg(long, default_value = "1.0")]
        interval: f64,

        #[command(flatten)]
        sampling: SamplingArgs,
    },

    /// Render one frame as ASCII art on stdout, no display needed
    Preview {
        /// Directory holding the glyph and template PBM assets
        #[arg(long, default_value = "glyphs")]
        glyphs: PathBuf,

        #[command(flatten)]
        sampling: SamplingArgs,
    },

    /// Print one telemetry snapshot as JSON
    Stats {
        #[command(flatten)]
        sampling: SamplingArgs,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<(), Error> = match cli.command {
        Commands::Run {
            device,
            baud,
            glyphs,
            interval,
            sampling,
        } => commands::run::run(commands::run::RunConfig {
            device,
            baud,
            glyphs,
            interval,
            sampler: sampling.into(),
        }),
        Commands::Preview { glyphs, sampling } => commands::preview::run(glyphs, sampling.into()),
        Commands::Stats { sampling } => commands::stats::run(sampling.into()),
    };

    if let Err(e) = result {
        eprintln!("oledmon: {e}");
        std::process::exit(1);
    }
}
