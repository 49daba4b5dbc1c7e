//! One module per subcommand, each exposing a `run` entry point.

pub mod preview;
pub mod run;
pub mod stats;
