//! Owned 1-bit frame buffer and non-owning rectangular views into it.
//!
//! A [`Canvas`] owns the pixel storage for one frame. A [`View`] is a plain
//! `(x_offset, y_offset, width, height)` window — it never owns pixels and
//! carries no reference, so views are `Copy` and can be carved up freely at
//! startup and reused every tick. All pixel access goes through the canvas
//! with a view for coordinate translation; the canvas always outlives the
//! views the caller derives from it, so no shared-ownership scheme is needed.
//!
//! Views may alias overlapping regions of the same canvas. Callers are
//! expected to keep application-level views disjoint, but nothing here
//! enforces that.

/// The full-resolution pixel buffer for one rendered frame. `true` is lit.
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

/// A rectangular coordinate window onto a [`Canvas`].
///
/// Constructed from [`Canvas::root`] or [`View::subview`]; offsets compose
/// additively, so a subview of a subview still addresses canvas storage
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    x_offset: usize,
    y_offset: usize,
    width: usize,
    height: usize,
}

impl View {
    /// Window width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Window height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Carve a smaller window out of this one.
    ///
    /// Panics if the new window does not fit inside `self`; that can only
    /// happen through broken layout constants, never through external input.
    pub fn subview(&self, x_offset: usize, y_offset: usize, width: usize, height: usize) -> View {
        assert!(
            x_offset + width <= self.width,
            "subview exceeds parent width"
        );
        assert!(
            y_offset + height <= self.height,
            "subview exceeds parent height"
        );

        View {
            x_offset: self.x_offset + x_offset,
            y_offset: self.y_offset + y_offset,
            width,
            height,
        }
    }
}

impl Canvas {
    /// Allocate a canvas with every pixel cleared.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The view covering the whole canvas.
    pub fn root(&self) -> View {
        View {
            x_offset: 0,
            y_offset: 0,
            width: self.width,
            height: self.height,
        }
    }

    /// Write one pixel at view-local coordinates. Panics on out-of-view access.
    pub fn set(&mut self, view: View, x: usize, y: usize, value: bool) {
        assert!(x < view.width, "x out of view bounds");
        assert!(y < view.height, "y out of view bounds");
        let index = (view.y_offset + y) * self.width + view.x_offset + x;
        self.pixels[index] = value;
    }

    /// Read one pixel at view-local coordinates. Panics on out-of-view access.
    pub fn get(&self, view: View, x: usize, y: usize) -> bool {
        assert!(x < view.width, "x out of view bounds");
        assert!(y < view.height, "y out of view bounds");
        self.pixels[(view.y_offset + y) * self.width + view.x_offset + x]
    }

    /// Set every pixel in the view's rectangle to unlit.
    pub fn clear(&mut self, view: View) {
        for y in 0..view.height {
            for x in 0..view.width {
                self.set(view, x, y, false);
            }
        }
    }

    /// Set every pixel in the view's rectangle to lit.
    pub fn fill(&mut self, view: View) {
        for y in 0..view.height {
            for x in 0..view.width {
                self.set(view, x, y, true);
            }
        }
    }

    /// Pack the frame into the display's wire format: one byte per 8
    /// vertically stacked pixels, LSB topmost, pages top to bottom and
    /// columns left to right within a page.
    ///
    /// The format only exists for heights that divide into whole pages.
    pub fn pack(&self) -> Vec<u8> {
        assert!(self.height % 8 == 0, "canvas height must be a multiple of 8");

        let root = self.root();
        let mut frame = vec![0u8; self.width * self.height / 8];
        for (i, byte) in frame.iter_mut().enumerate() {
            let x = i % self.width;
            let page = i / self.width;
            for bit in 0..8 {
                if self.get(root, x, page * 8 + bit) {
                    *byte |= 1 << bit;
                }
            }
        }
        frame
    }
}
