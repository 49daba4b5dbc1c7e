//! Binary-level error type.
//!
//! Everything the collaborators around the rendering core can trip over —
//! unreadable pseudo-files, a mute or complaining display bridge, a missed
//! frame deadline — funnels into this one enum, and `main` is the single
//! place that prints it and exits non-zero. There is no recovery path by
//! design; a supervisor restarts the process.

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    /// A fault from the rendering core (assets, value ranges).
    Core(oledmon_core::Error),
    /// Reading or writing a device/pseudo-file failed.
    Io { path: PathBuf, source: io::Error },
    /// A pseudo-file was readable but not in the expected shape.
    Parse { path: PathBuf },
    /// A frame was not ready before its deadline.
    DeadlineMissed,
    /// The display bridge reported a fault over the serial line.
    Device { message: String },
    /// Installing the shutdown signal handler failed.
    Signal(ctrlc::Error),
    /// Encoding the telemetry snapshot failed.
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core(e) => write!(f, "{e}"),
            Self::Io { path, source } => {
                write!(f, "failed to access `{}`: {}", path.display(), source)
            }
            Self::Parse { path } => write!(f, "failed to parse `{}`", path.display()),
            Self::DeadlineMissed => write!(f, "failed to render frame in time"),
            Self::Device { message } => {
                write!(f, "display failed with the message `{message}`")
            }
            Self::Signal(e) => write!(f, "failed to install signal handler: {e}"),
            Self::Json(e) => write!(f, "failed to encode snapshot: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Core(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            Self::Signal(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<oledmon_core::Error> for Error {
    fn from(e: oledmon_core::Error) -> Self {
        Self::Core(e)
    }
}
