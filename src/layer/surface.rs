//! Backing surfaces a layer list composites into.

use crate::buffer::Canvas;
use crate::env::DrawSender;
use crate::layout::Rect;
use tracing::debug;

/// A raster that can push regions of itself somewhere visible.
pub trait Surface: Send {
    /// The raster.
    fn canvas(&mut self) -> &mut Canvas;

    /// Make the pixels within `dirty` visible.
    fn flush(&mut self, dirty: Rect);

    /// Reallocate the raster to `bounds`, keeping overlapping pixels.
    fn resize(&mut self, bounds: Rect) {
        let resized = self.canvas().resized(bounds);
        *self.canvas() = resized;
    }
}

/// A [`Surface`] whose flushes are draw commands sent to an environment.
///
/// Each flush copies the dirty region out and submits it, blocking until the
/// environment's host takes it.
pub struct EnvSurface {
    draw: DrawSender,
    canvas: Canvas,
    closed: bool,
}

impl EnvSurface {
    /// A transparent surface of `bounds` flushing into `draw`.
    pub fn new(draw: DrawSender, bounds: Rect) -> Self {
        Self {
            draw,
            canvas: Canvas::new(bounds),
            closed: false,
        }
    }

    /// Whether a flush has found the environment gone.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the draw sink.
    pub fn close(self) {
        self.draw.close();
    }
}

impl Surface for EnvSurface {
    fn canvas(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    fn flush(&mut self, dirty: Rect) {
        if self.closed {
            return;
        }
        let patch = self.canvas.crop(dirty);
        let area = patch.bounds();
        if self
            .draw
            .send(move |target: &mut Canvas| target.copy_from(&patch, area))
            .is_err()
        {
            debug!(?dirty, "environment closed, dropping flushes");
            self.closed = true;
        }
    }
}

impl std::fmt::Debug for EnvSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSurface")
            .field("bounds", &self.canvas.bounds())
            .field("closed", &self.closed)
            .finish()
    }
}
