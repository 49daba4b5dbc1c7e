//! Crate-wide error type.
//!
//! Only faults that can come from the outside world (asset files, telemetry
//! values) are represented here. Geometry and bounds violations are
//! programming errors and panic at the offending call site instead.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// A fault detected while loading assets or rendering externally supplied
/// values. Every variant names enough context to make the diagnostic
/// actionable on its own; the process exits after printing it.
#[derive(Debug)]
pub enum Error {
    /// Reading an asset file failed.
    Io { path: PathBuf, source: io::Error },
    /// A bitmap file does not start with a valid `P1` header.
    BadHeader { path: PathBuf },
    /// A bitmap data section contains a byte that is not `0`, `1`, or whitespace.
    BadPixel { path: PathBuf },
    /// A bitmap file ended before `width * height` pixel tokens were read.
    TruncatedData { path: PathBuf },
    /// A bitmap decoded fine but is not the size the caller expected.
    SizeMismatch {
        path: PathBuf,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// A value does not fit in the digit slots of its target view.
    ScalarOverflow { value: u64, digits: u32 },
    /// A value exceeds what the largest binary prefix can express.
    PrefixOverflow { value: u64 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {}", path.display(), source)
            }
            Self::BadHeader { path } => {
                write!(f, "failed to parse header of `{}`", path.display())
            }
            Self::BadPixel { path } => {
                write!(f, "failed to parse data of `{}`", path.display())
            }
            Self::TruncatedData { path } => {
                write!(f, "data of `{}` ended unexpectedly", path.display())
            }
            Self::SizeMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "image `{}` is {}x{}, while expecting {}x{}",
                path.display(),
                actual.0,
                actual.1,
                expected.0,
                expected.1
            ),
            Self::ScalarOverflow { value, digits } => {
                write!(f, "value {value} does not fit in {digits} digit(s)")
            }
            Self::PrefixOverflow { value } => {
                write!(f, "value {value} is too large for any binary prefix")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
