//! The process-wide glyph set: ten digits and four binary unit prefixes.
//!
//! Loaded once at startup from a directory of PBM assets with a fixed
//! filename and size convention, then treated as read-only for the rest of
//! the process lifetime. The store is an owned value handed to the renderer
//! by reference; there is no global state and no reload path.

use std::path::Path;

use log::debug;

use crate::error::Error;
use crate::pbm::{self, Bitmap};

/// Width of every digit glyph in pixels.
pub const DIGIT_WIDTH: usize = 3;
/// Height of every glyph, digit or prefix, in pixels.
pub const GLYPH_HEIGHT: usize = 4;
/// Widths of the unit-prefix glyphs: plain bytes, Ki, Mi, Gi.
pub const PREFIX_WIDTHS: [usize; 4] = [9, 15, 17, 15];

/// Prefix asset filenames, matching [`PREFIX_WIDTHS`] by index.
const PREFIX_FILES: [&str; 4] = ["bs.pbm", "kibs.pbm", "mibs.pbm", "gibs.pbm"];

/// The loaded glyph set. Glyphs are addressed by value (digit 0–9, prefix
/// scale 0–3), never by name, after initialization.
#[derive(Debug)]
pub struct GlyphStore {
    digits: Vec<Bitmap>,
    prefixes: Vec<Bitmap>,
}

impl GlyphStore {
    /// Load the full glyph set from `dir`.
    ///
    /// The directory must contain `0.pbm` … `9.pbm` (each 3x4) and
    /// `bs.pbm` / `kibs.pbm` / `mibs.pbm` / `gibs.pbm` (9/15/17/15 pixels
    /// wide, 4 tall). A missing or missized asset is fatal; there is no
    /// degraded rendering mode.
    pub fn load(dir: &Path) -> Result<GlyphStore, Error> {
        let mut digits = Vec::with_capacity(10);
        for digit in 0..10 {
            let path = dir.join(format!("{digit}.pbm"));
            debug!("loading digit glyph `{}`", path.display());
            digits.push(pbm::load(&path, DIGIT_WIDTH, GLYPH_HEIGHT)?);
        }

        let mut prefixes = Vec::with_capacity(PREFIX_FILES.len());
        for (name, width) in PREFIX_FILES.iter().zip(PREFIX_WIDTHS) {
            let path = dir.join(name);
            debug!("loading prefix glyph `{}`", path.display());
            prefixes.push(pbm::load(&path, width, GLYPH_HEIGHT)?);
        }

        Ok(GlyphStore { digits, prefixes })
    }

    /// The glyph for one decimal digit. Panics when `digit > 9`.
    pub fn digit(&self, digit: usize) -> &Bitmap {
        &self.digits[digit]
    }

    /// The glyph for one binary prefix scale (0 = plain bytes, 1 = Ki,
    /// 2 = Mi, 3 = Gi). Panics when `scale > 3`.
    pub fn prefix(&self, scale: usize) -> &Bitmap {
        &self.prefixes[scale]
    }
}
