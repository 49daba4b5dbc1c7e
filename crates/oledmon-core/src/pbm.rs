//! Plain-text PBM (P1) decoding for glyph assets.
//!
//! Format reference: <https://netpbm.sourceforge.net/doc/pbm.html>
//!
//! One deliberate deviation from the published convention: a `0` token
//! decodes to a *lit* pixel and `1` to an unlit one. Every shipped glyph
//! asset is drawn against this inverted mapping, so changing it would
//! silently corrupt all of them. Do not "fix" it.

use std::fs;
use std::path::Path;

use crate::error::Error;

/// An immutable rectangular pixel grid decoded from a PBM file.
#[derive(Debug, Clone)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl Bitmap {
    /// Bitmap width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Bitmap height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read one pixel. Panics on out-of-bounds access.
    pub fn get(&self, x: usize, y: usize) -> bool {
        assert!(x < self.width, "x out of bitmap bounds");
        assert!(y < self.height, "y out of bitmap bounds");
        self.pixels[y * self.width + x]
    }
}

/// Drop everything from each `#` up to (not including) the next line
/// terminator. Comments are only legal in the header, but stripping them
/// from the whole buffer is harmless: a stray `#` inside the data section
/// would have failed token parsing anyway.
fn strip_comments(bytes: &[u8]) -> Vec<u8> {
    let mut clean = Vec::with_capacity(bytes.len());
    let mut in_comment = false;
    for &byte in bytes {
        if in_comment {
            if byte == b'\r' || byte == b'\n' {
                in_comment = false;
                clean.push(byte);
            }
        } else if byte == b'#' {
            in_comment = true;
        } else {
            clean.push(byte);
        }
    }
    clean
}

/// Parse a whitespace-preceded, non-zero, overflow-checked decimal integer
/// starting at `*pos`. Advances `*pos` past the digits on success.
fn parse_dimension(bytes: &[u8], pos: &mut usize) -> Option<usize> {
    while bytes.get(*pos).is_some_and(|b| b.is_ascii_whitespace()) {
        *pos += 1;
    }

    let mut value: usize = 0;
    let mut digits = 0;
    while let Some(&byte) = bytes.get(*pos) {
        if !byte.is_ascii_digit() {
            break;
        }
        value = value
            .checked_mul(10)?
            .checked_add((byte - b'0') as usize)?;
        digits += 1;
        *pos += 1;
    }

    if digits == 0 || value == 0 {
        return None;
    }
    Some(value)
}

/// Decode a P1 bitmap from raw file bytes. `origin` is only used to name the
/// offending file in errors.
pub fn parse(bytes: &[u8], origin: &Path) -> Result<Bitmap, Error> {
    let bad_header = || Error::BadHeader {
        path: origin.to_path_buf(),
    };

    let bytes = strip_comments(bytes);
    if bytes.len() < 2 || &bytes[..2] != b"P1" {
        return Err(bad_header());
    }

    let mut pos = 2;
    let width = parse_dimension(&bytes, &mut pos).ok_or_else(bad_header)?;
    let height = parse_dimension(&bytes, &mut pos).ok_or_else(bad_header)?;
    let count = width.checked_mul(height).ok_or_else(bad_header)?;

    // Exactly one whitespace byte separates the header from the data.
    match bytes.get(pos) {
        Some(b) if b.is_ascii_whitespace() => pos += 1,
        _ => return Err(bad_header()),
    }

    // Tokens may be separated by arbitrary whitespace, including none at
    // all; `0` is lit, `1` is unlit (the inverted mapping documented above).
    // Anything after the last expected token is ignored.
    let mut pixels = Vec::with_capacity(count);
    while pixels.len() < count {
        while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
            pos += 1;
        }
        match bytes.get(pos) {
            Some(b'0') => pixels.push(true),
            Some(b'1') => pixels.push(false),
            Some(_) => {
                return Err(Error::BadPixel {
                    path: origin.to_path_buf(),
                });
            }
            None => {
                return Err(Error::TruncatedData {
                    path: origin.to_path_buf(),
                });
            }
        }
        pos += 1;
    }

    Ok(Bitmap {
        width,
        height,
        pixels,
    })
}

/// Load a P1 bitmap whose dimensions are known up front. A decoded size
/// other than `expected_width x expected_height` is a fatal asset error.
pub fn load(path: &Path, expected_width: usize, expected_height: usize) -> Result<Bitmap, Error> {
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let bitmap = parse(&bytes, path)?;
    if bitmap.width != expected_width || bitmap.height != expected_height {
        return Err(Error::SizeMismatch {
            path: path.to_path_buf(),
            expected: (expected_width, expected_height),
            actual: (bitmap.width, bitmap.height),
        });
    }
    Ok(bitmap)
}
