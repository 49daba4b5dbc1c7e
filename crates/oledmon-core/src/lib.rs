//! # oledmon-core
//!
//! Pixel-buffer compositing and rendering for 1-bit displays.
//!
//! The crate owns everything between "here are this tick's numbers" and
//! "here is the finished frame": an addressable monochrome [`Canvas`] with
//! rectangular [`View`] windows, a fixed-capacity [`Ring`] of recent samples
//! per plotted metric, a [`GlyphStore`] of tiny digit and unit-prefix bitmaps
//! loaded once at startup, and the [`render`] functions that paint scalars
//! and time-series plots into views.
//!
//! ## Quick start
//!
//! ```no_run
//! use oledmon_core::{Canvas, GlyphStore, Ring, render};
//!
//! let glyphs = GlyphStore::load("glyphs".as_ref()).unwrap();
//! let mut canvas = Canvas::new(128, 64);
//! let root = canvas.root();
//!
//! let field = root.subview(49, 6, 11, 4);
//! render::render_scalar(&mut canvas, field, &glyphs, 42).unwrap();
//!
//! let plot = root.subview(0, 0, 38, 10);
//! let mut history = Ring::new(38);
//! history.push(0.25);
//! render::render_plot(&mut canvas, plot, &history);
//!
//! let frame = canvas.pack(); // ready for the display transport
//! ```
//!
//! ## Failure policy
//!
//! Geometry violations (out-of-bounds pixel access, subviews escaping their
//! parent, view/glyph dimension mismatches) are defects in the caller's own
//! constants and panic. Malformed assets and out-of-range values come from
//! the outside world and surface as [`Error`] results; the binary prints the
//! diagnostic and exits non-zero. Nothing is recovered or retried in between.

pub mod canvas;
pub mod error;
pub mod glyphs;
pub mod pbm;
pub mod render;
pub mod ring;

pub use canvas::{Canvas, View};
pub use error::Error;
pub use glyphs::GlyphStore;
pub use pbm::Bitmap;
pub use ring::Ring;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
