//! Canvas: An RGBA pixel grid, the raster target of draw commands.
//!
//! Pixels are stored contiguously in row-major order. A canvas covers an
//! arbitrary `bounds` rectangle, so its origin need not be (0, 0): layer
//! rasters and sub-surfaces share the coordinate space of the surface they
//! are composited into.

use super::color::Rgba;
use crate::layout::{Point, Rect};

/// A grid of pixels covering a rectangle of surface coordinates.
///
/// Every write is clipped to the canvas bounds and, while one is active, to
/// the clip rectangle installed by [`Canvas::with_clip`].
#[derive(Clone)]
pub struct Canvas {
    /// Contiguous pixel storage (row-major order).
    pixels: Vec<Rgba>,
    /// Area covered by the canvas.
    bounds: Rect,
    /// Active clip rectangle, if any.
    clip: Option<Rect>,
}

impl Canvas {
    /// Create a fully transparent canvas covering `bounds`.
    ///
    /// An empty `bounds` yields a canvas with no pixels.
    pub fn new(bounds: Rect) -> Self {
        let bounds = if bounds.is_empty() { Rect::ZERO } else { bounds };
        let size = usize::try_from(bounds.area()).unwrap_or(0);
        Self {
            pixels: vec![Rgba::TRANSPARENT; size],
            bounds,
            clip: None,
        }
    }

    /// Create a canvas filled with a single color.
    pub fn filled(bounds: Rect, color: Rgba) -> Self {
        let mut canvas = Self::new(bounds);
        canvas.pixels.fill(color);
        canvas
    }

    /// Area covered by the canvas.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Area writes are currently allowed to touch.
    #[inline]
    pub fn writable(&self) -> Rect {
        self.clip
            .map_or(self.bounds, |clip| clip.intersection(&self.bounds))
    }

    /// Get the raw pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Convert a point to a linear index.
    ///
    /// Returns `None` if the point is outside the canvas.
    #[inline]
    fn index_of(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        let col = (p.x - self.bounds.x) as usize;
        let row = (p.y - self.bounds.y) as usize;
        Some(row * (self.bounds.width as usize) + col)
    }

    /// Get the pixel at `p`.
    #[inline]
    pub fn get(&self, p: Point) -> Option<Rgba> {
        self.index_of(p).map(|i| self.pixels[i])
    }

    /// Set the pixel at `p`.
    ///
    /// Returns `false` if the point is outside the writable area.
    #[inline]
    pub fn set(&mut self, p: Point, color: Rgba) -> bool {
        if !self.writable().contains(p) {
            return false;
        }
        match self.index_of(p) {
            Some(idx) => {
                self.pixels[idx] = color;
                true
            }
            None => false,
        }
    }

    /// Fill a rectangle with a color, replacing what was there.
    ///
    /// Returns the rectangle actually written.
    pub fn fill(&mut self, rect: Rect, color: Rgba) -> Rect {
        let target = rect.intersection(&self.writable());
        for y in target.y..target.bottom() {
            let start = self.row_index(target.x, y);
            self.pixels[start..start + target.width as usize].fill(color);
        }
        target
    }

    /// Clear a rectangle to transparent.
    pub fn clear(&mut self, rect: Rect) -> Rect {
        self.fill(rect, Rgba::TRANSPARENT)
    }

    /// Composite the pixels of `src` within `rect` over this canvas.
    ///
    /// Returns the rectangle actually written.
    pub fn blend_from(&mut self, src: &Self, rect: Rect) -> Rect {
        let target = rect
            .intersection(&self.writable())
            .intersection(&src.bounds);
        for y in target.y..target.bottom() {
            let dst_start = self.row_index(target.x, y);
            let src_start = src.row_index(target.x, y);
            let len = target.width as usize;
            let dst_row = &mut self.pixels[dst_start..dst_start + len];
            let src_row = &src.pixels[src_start..src_start + len];
            for (d, s) in dst_row.iter_mut().zip(src_row) {
                *d = s.over(*d);
            }
        }
        target
    }

    /// Copy the pixels of `src` within `rect` onto this canvas, replacing
    /// what was there.
    pub fn copy_from(&mut self, src: &Self, rect: Rect) -> Rect {
        let target = rect
            .intersection(&self.writable())
            .intersection(&src.bounds);
        for y in target.y..target.bottom() {
            let dst_start = self.row_index(target.x, y);
            let src_start = src.row_index(target.x, y);
            let len = target.width as usize;
            self.pixels[dst_start..dst_start + len]
                .copy_from_slice(&src.pixels[src_start..src_start + len]);
        }
        target
    }

    /// Copy out the pixels within `rect` as a new canvas.
    pub fn crop(&self, rect: Rect) -> Self {
        let target = rect.intersection(&self.bounds);
        let mut out = Self::new(target);
        out.copy_from(self, target);
        out
    }

    /// Reallocate the canvas to cover `bounds`, preserving pixels in the
    /// overlapping area. New pixels are transparent.
    #[must_use]
    pub fn resized(&self, bounds: Rect) -> Self {
        let mut out = Self::new(bounds);
        out.copy_from(self, self.bounds);
        out
    }

    /// Run `f` with every write restricted to `clip`.
    ///
    /// Clips nest: the effective clip is the intersection with any clip
    /// already active. The previous clip is restored afterwards.
    pub fn with_clip<R>(&mut self, clip: Rect, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.clip;
        let effective = previous.map_or(clip, |prev| prev.intersection(&clip));
        self.clip = Some(effective);
        let result = f(self);
        self.clip = previous;
        result
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgba]> {
        self.pixels.chunks(self.bounds.width.max(1) as usize)
    }

    #[inline]
    fn row_index(&self, x: i32, y: i32) -> usize {
        let col = (x - self.bounds.x) as usize;
        let row = (y - self.bounds.y) as usize;
        row * (self.bounds.width as usize) + col
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("bounds", &self.bounds)
            .field("clip", &self.clip)
            .finish()
    }
}
