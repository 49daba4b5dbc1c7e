//! Painting glyphs, scalars, and time-series plots into canvas views.
//!
//! Every function here is a synchronous, in-memory computation: it reads the
//! glyph store and/or a history ring and writes pixels through a view. View
//! geometry that does not match what an operation needs is a caller defect
//! and panics; values too large for their target field are external input
//! and come back as [`Error`]s.

use crate::canvas::{Canvas, View};
use crate::error::Error;
use crate::glyphs::{DIGIT_WIDTH, GLYPH_HEIGHT, GlyphStore};
use crate::pbm::Bitmap;
use crate::ring::Ring;

/// Digit slot pitch: a 3-pixel glyph plus a 1-pixel gap.
const DIGIT_PITCH: usize = DIGIT_WIDTH + 1;

/// Width of a prefixed-scalar view: 15-pixel mantissa, gap, widest prefix.
pub const PREFIXED_WIDTH: usize = 33;
/// Width of the mantissa field inside a prefixed-scalar view (4 digits).
const MANTISSA_WIDTH: usize = 15;
/// X offset of the prefix glyph inside a prefixed-scalar view.
const PREFIX_X: usize = 16;

/// Copy a bitmap into a view of exactly the same size, every pixel verbatim.
pub fn render_bitmap(canvas: &mut Canvas, view: View, bitmap: &Bitmap) {
    assert_eq!(view.width(), bitmap.width(), "view/bitmap width mismatch");
    assert_eq!(view.height(), bitmap.height(), "view/bitmap height mismatch");

    for y in 0..view.height() {
        for x in 0..view.width() {
            canvas.set(view, x, y, bitmap.get(x, y));
        }
    }
}

/// Paint an unsigned decimal number right-aligned into a digit field.
///
/// The view must be 4 pixels tall and `4n - 1` wide for its digit count `n`
/// (n glyphs of 3 pixels with 1-pixel gaps). Digits are painted from the
/// rightmost slot leftwards; leading slots stay cleared, so there are never
/// leading zeros, and the value `0` is a single `0` glyph in the rightmost
/// slot. A value needing more than `n` digits is refused.
pub fn render_scalar(
    canvas: &mut Canvas,
    view: View,
    glyphs: &GlyphStore,
    value: u64,
) -> Result<(), Error> {
    assert_eq!(
        (view.width() + 1) % DIGIT_PITCH,
        0,
        "scalar view must be 4n-1 wide"
    );
    assert_eq!(view.height(), GLYPH_HEIGHT, "scalar view must be 4 tall");

    let slots = (view.width() + 1) / DIGIT_PITCH;
    // When 10^slots overflows u64 every representable value fits.
    if 10u64
        .checked_pow(slots as u32)
        .is_some_and(|limit| value >= limit)
    {
        return Err(Error::ScalarOverflow {
            value,
            digits: slots as u32,
        });
    }

    canvas.clear(view);

    if value == 0 {
        let slot = view.subview(view.width() - DIGIT_WIDTH, 0, DIGIT_WIDTH, GLYPH_HEIGHT);
        render_bitmap(canvas, slot, glyphs.digit(0));
        return Ok(());
    }

    let mut rest = value;
    for slot_index in (0..slots).rev() {
        if rest == 0 {
            break;
        }
        let slot = view.subview(slot_index * DIGIT_PITCH, 0, DIGIT_WIDTH, GLYPH_HEIGHT);
        render_bitmap(canvas, slot, glyphs.digit((rest % 10) as usize));
        rest /= 10;
    }
    Ok(())
}

/// Paint a byte-rate with a binary prefix (none/Ki/Mi/Gi) into a 33x4 view.
///
/// The value is divided by 1024 while it stays above 1024 (exactly 1024 is
/// rendered unscaled — a long-standing quirk the glyph layout depends on),
/// so the mantissa always fits the 4-digit field. Values that would need a
/// prefix beyond Gi are refused.
pub fn render_scalar_prefixed(
    canvas: &mut Canvas,
    view: View,
    glyphs: &GlyphStore,
    value: u64,
) -> Result<(), Error> {
    assert_eq!(view.width(), PREFIXED_WIDTH, "prefixed view must be 33 wide");
    assert_eq!(view.height(), GLYPH_HEIGHT, "prefixed view must be 4 tall");

    canvas.clear(view);

    let mut mantissa = value;
    let mut scale = 0usize;
    while mantissa > 1024 {
        mantissa /= 1024;
        scale += 1;
    }
    if scale > 3 {
        return Err(Error::PrefixOverflow { value });
    }

    let mantissa_view = view.subview(0, 0, MANTISSA_WIDTH, GLYPH_HEIGHT);
    render_scalar(canvas, mantissa_view, glyphs, mantissa)?;

    let glyph = glyphs.prefix(scale);
    let prefix_view = view.subview(PREFIX_X, 0, glyph.width(), GLYPH_HEIGHT);
    render_bitmap(canvas, prefix_view, glyph);
    Ok(())
}

/// Paint a time-series as filled bars, newest sample in the rightmost
/// column.
///
/// The ring's capacity must equal the view width (one column per slot), and
/// every retained sample must already be normalized into `[0, 1]`. A bar
/// covers the bottom row up to and including row `floor(value * height)`,
/// clamped to the top row for a full-scale sample — so every retained
/// sample lights at least the bottom pixel of its column.
pub fn render_plot(canvas: &mut Canvas, view: View, ring: &Ring) {
    assert_eq!(
        ring.capacity(),
        view.width(),
        "ring capacity must match plot width"
    );

    canvas.clear(view);
    for i in 0..ring.len() {
        // Newest first, filling columns right to left.
        let value = ring.get(ring.len() - 1 - i);
        assert!(
            (0.0..=1.0).contains(&value),
            "plot samples must be normalized to [0, 1]"
        );

        let mut level = (value * view.height() as f64) as usize;
        if level == view.height() {
            level -= 1;
        }

        let x = view.width() - 1 - i;
        for h in 0..=level {
            canvas.set(view, x, view.height() - 1 - h, true);
        }
    }
}

/// Like [`render_plot`], but rescales the series against `[0, max]` first,
/// so the tallest bar always reaches full height. An empty or all-zero
/// series maps to zero everywhere. The ring is left unmodified.
pub fn render_plot_norm(canvas: &mut Canvas, view: View, ring: &Ring) {
    let mut max = 0.0f64;
    for value in ring.iter() {
        assert!(value >= 0.0, "plot samples must be non-negative");
        if value > max {
            max = value;
        }
    }

    let mut normalized = Ring::new(ring.capacity());
    for value in ring.iter() {
        normalized.push(if max > 0.0 { value / max } else { 0.0 });
    }
    render_plot(canvas, view, &normalized);
}

/// Like [`render_plot`], but rescales against the observed `[min, max]`
/// range, emphasizing fluctuation over absolute magnitude. A series whose
/// samples are all equal (or empty) maps to zero everywhere. The ring is
/// left unmodified.
pub fn render_plot_fluct(canvas: &mut Canvas, view: View, ring: &Ring) {
    let mut min = f64::INFINITY;
    let mut max = 0.0f64;
    for value in ring.iter() {
        assert!(value >= 0.0, "plot samples must be non-negative");
        if value > max {
            max = value;
        }
        if value < min {
            min = value;
        }
    }

    let span = max - min;
    let mut normalized = Ring::new(ring.capacity());
    for value in ring.iter() {
        normalized.push(if span > 0.0 { (value - min) / span } else { 0.0 });
    }
    render_plot(canvas, view, &normalized);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::test_assets::{pattern, write_glyph_dir};

    fn store() -> GlyphStore {
        let dir = tempfile::tempdir().unwrap();
        write_glyph_dir(dir.path());
        GlyphStore::load(dir.path()).unwrap()
    }

    /// Does the 3x4 region at `(x0, y0)` hold the digit glyph for `d`?
    /// (Digit `d` is written with test pattern id `d + 1`.)
    fn region_is_digit(canvas: &Canvas, x0: usize, y0: usize, d: usize) -> bool {
        let root = canvas.root();
        (0..GLYPH_HEIGHT).all(|y| {
            (0..DIGIT_WIDTH).all(|x| canvas.get(root, x0 + x, y0 + y) == pattern(d + 1, x, y))
        })
    }

    fn region_is_clear(canvas: &Canvas, x0: usize, y0: usize, w: usize, h: usize) -> bool {
        let root = canvas.root();
        (0..h).all(|y| (0..w).all(|x| !canvas.get(root, x0 + x, y0 + y)))
    }

    #[test]
    fn render_bitmap_copies_verbatim() {
        let glyphs = store();
        let mut canvas = Canvas::new(10, 6);
        let view = canvas.root().subview(4, 1, 3, 4);

        render_bitmap(&mut canvas, view, glyphs.digit(7));
        assert!(region_is_digit(&canvas, 4, 1, 7));
    }

    #[test]
    #[should_panic(expected = "width mismatch")]
    fn render_bitmap_rejects_wrong_geometry() {
        let glyphs = store();
        let mut canvas = Canvas::new(10, 6);
        let view = canvas.root().subview(0, 0, 4, 4);
        render_bitmap(&mut canvas, view, glyphs.digit(0));
    }

    #[test]
    fn scalar_42_lands_in_the_two_rightmost_slots() {
        let glyphs = store();
        let mut canvas = Canvas::new(15, 4);
        let view = canvas.root(); // 15 wide = 4 digit slots

        render_scalar(&mut canvas, view, &glyphs, 42).unwrap();

        // Slots sit at x = 0, 4, 8, 12; the first two stay cleared.
        assert!(region_is_clear(&canvas, 0, 0, 7, 4));
        assert!(region_is_digit(&canvas, 8, 0, 4));
        assert!(region_is_digit(&canvas, 12, 0, 2));
        // Gap columns between slots stay cleared too.
        assert!(region_is_clear(&canvas, 11, 0, 1, 4));
    }

    #[test]
    fn scalar_zero_is_one_glyph_in_the_rightmost_slot() {
        let glyphs = store();
        let mut canvas = Canvas::new(11, 4);
        let view = canvas.root(); // 3 slots

        render_scalar(&mut canvas, view, &glyphs, 0).unwrap();

        assert!(region_is_clear(&canvas, 0, 0, 8, 4));
        assert!(region_is_digit(&canvas, 8, 0, 0));
    }

    #[test]
    fn scalar_rendering_is_idempotent() {
        let glyphs = store();
        let mut canvas = Canvas::new(15, 8);
        let view = canvas.root().subview(0, 2, 15, 4);

        render_scalar(&mut canvas, view, &glyphs, 307).unwrap();
        let first = canvas.pack();

        render_scalar(&mut canvas, view, &glyphs, 307).unwrap();
        assert_eq!(canvas.pack(), first);
    }

    #[test]
    fn scalar_overwrites_previous_contents() {
        let glyphs = store();
        let mut canvas = Canvas::new(11, 4);
        let view = canvas.root();
        canvas.fill(view);

        render_scalar(&mut canvas, view, &glyphs, 5).unwrap();
        assert!(region_is_clear(&canvas, 0, 0, 8, 4));
        assert!(region_is_digit(&canvas, 8, 0, 5));
    }

    #[test]
    fn scalar_too_wide_for_its_field_is_refused() {
        let glyphs = store();
        let mut canvas = Canvas::new(11, 4);
        let view = canvas.root(); // 3 slots

        assert!(render_scalar(&mut canvas, view, &glyphs, 999).is_ok());
        assert!(matches!(
            render_scalar(&mut canvas, view, &glyphs, 1000),
            Err(Error::ScalarOverflow { value: 1000, digits: 3 })
        ));
    }

    #[test]
    fn two_mebi_selects_the_mi_prefix_with_mantissa_two() {
        let glyphs = store();
        let mut canvas = Canvas::new(33, 4);
        let view = canvas.root();

        render_scalar_prefixed(&mut canvas, view, &glyphs, 2 * 1024 * 1024).unwrap();

        // Mantissa `2` right-aligned in the 15-pixel field.
        assert!(region_is_clear(&canvas, 0, 0, 11, 4));
        assert!(region_is_digit(&canvas, 12, 0, 2));

        // Mi prefix glyph (pattern id 13) at x = 16, 17 wide.
        let root = canvas.root();
        for y in 0..4 {
            for x in 0..17 {
                assert_eq!(canvas.get(root, 16 + x, y), pattern(13, x, y));
            }
        }
    }

    #[test]
    fn exactly_1024_stays_unscaled() {
        let glyphs = store();
        let mut canvas = Canvas::new(33, 4);
        let view = canvas.root();

        render_scalar_prefixed(&mut canvas, view, &glyphs, 1024).unwrap();

        // 1024 renders as four digits with the plain-bytes prefix (id 11).
        assert!(region_is_digit(&canvas, 0, 0, 1));
        assert!(region_is_digit(&canvas, 4, 0, 0));
        assert!(region_is_digit(&canvas, 8, 0, 2));
        assert!(region_is_digit(&canvas, 12, 0, 4));
        let root = canvas.root();
        for y in 0..4 {
            for x in 0..9 {
                assert_eq!(canvas.get(root, 16 + x, y), pattern(11, x, y));
            }
        }
    }

    #[test]
    fn beyond_gi_is_refused() {
        let glyphs = store();
        let mut canvas = Canvas::new(33, 4);
        let view = canvas.root();

        let too_big = 2 * 1024u64.pow(4);
        assert!(matches!(
            render_scalar_prefixed(&mut canvas, view, &glyphs, too_big),
            Err(Error::PrefixOverflow { .. })
        ));
    }

    fn column_height(canvas: &Canvas, view: View, x: usize) -> usize {
        (0..view.height())
            .filter(|&y| canvas.get(view, x, y))
            .count()
    }

    #[test]
    fn plot_fills_bars_right_to_left() {
        let mut canvas = Canvas::new(4, 8);
        let view = canvas.root();
        let mut ring = Ring::new(4);
        ring.push(0.0);
        ring.push(0.5);
        ring.push(1.0);

        render_plot(&mut canvas, view, &ring);

        // Newest (1.0) rightmost; the leftmost column has no sample yet.
        assert_eq!(column_height(&canvas, view, 3), 8);
        assert_eq!(column_height(&canvas, view, 2), 5);
        assert_eq!(column_height(&canvas, view, 1), 1);
        assert_eq!(column_height(&canvas, view, 0), 0);

        // Bars grow from the bottom row.
        assert!(canvas.get(view, 1, 7));
        assert!(!canvas.get(view, 1, 6));
    }

    #[test]
    fn full_scale_sample_is_clamped_to_the_top_row() {
        let mut canvas = Canvas::new(1, 5);
        let view = canvas.root();
        let mut ring = Ring::new(1);
        ring.push(1.0);

        render_plot(&mut canvas, view, &ring);
        assert_eq!(column_height(&canvas, view, 0), 5);
        assert!(canvas.get(view, 0, 0));
    }

    #[test]
    fn norm_plot_scales_the_maximum_to_full_height() {
        let mut canvas = Canvas::new(3, 10);
        let view = canvas.root();
        let mut ring = Ring::new(3);
        ring.push(25.0);
        ring.push(100.0);
        ring.push(50.0);

        render_plot_norm(&mut canvas, view, &ring);

        assert_eq!(column_height(&canvas, view, 1), 10); // the max
        assert_eq!(column_height(&canvas, view, 2), 6); // 0.5 * 10 + bottom row
        assert_eq!(column_height(&canvas, view, 0), 3); // 0.25 * 10 + bottom row

        // The source ring is untouched.
        assert_eq!(ring.get(0), 25.0);
        assert_eq!(ring.get(1), 100.0);
        assert_eq!(ring.get(2), 50.0);
    }

    #[test]
    fn norm_plot_with_all_zero_series_draws_baseline_only() {
        let mut canvas = Canvas::new(2, 6);
        let view = canvas.root();
        let mut ring = Ring::new(2);
        ring.push(0.0);
        ring.push(0.0);

        render_plot_norm(&mut canvas, view, &ring);
        assert_eq!(column_height(&canvas, view, 0), 1);
        assert_eq!(column_height(&canvas, view, 1), 1);
    }

    #[test]
    fn fluct_plot_flattens_an_all_equal_series() {
        let mut canvas = Canvas::new(3, 10);
        let view = canvas.root();
        let mut ring = Ring::new(3);
        for _ in 0..3 {
            ring.push(47.0);
        }

        render_plot_fluct(&mut canvas, view, &ring);
        for x in 0..3 {
            assert_eq!(column_height(&canvas, view, x), 1);
        }
        assert_eq!(ring.get(0), 47.0);
    }

    #[test]
    fn fluct_plot_spreads_the_observed_range() {
        let mut canvas = Canvas::new(3, 10);
        let view = canvas.root();
        let mut ring = Ring::new(3);
        ring.push(40.0);
        ring.push(45.0);
        ring.push(50.0);

        render_plot_fluct(&mut canvas, view, &ring);

        assert_eq!(column_height(&canvas, view, 0), 1); // min -> 0
        assert_eq!(column_height(&canvas, view, 1), 6); // midpoint -> 0.5
        assert_eq!(column_height(&canvas, view, 2), 10); // max -> full
    }

    #[test]
    fn plots_on_an_empty_ring_render_nothing() {
        let mut canvas = Canvas::new(4, 6);
        let view = canvas.root();
        canvas.fill(view);
        let ring = Ring::new(4);

        render_plot_fluct(&mut canvas, view, &ring);
        for x in 0..4 {
            assert_eq!(column_height(&canvas, view, x), 0);
        }
    }

    #[test]
    #[should_panic(expected = "ring capacity must match plot width")]
    fn plot_geometry_mismatch_panics() {
        let mut canvas = Canvas::new(4, 6);
        let view = canvas.root();
        let ring = Ring::new(5);
        render_plot(&mut canvas, view, &ring);
    }
}
