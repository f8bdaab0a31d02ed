//! `OutputBuffer`: ANSI output for one flush, written in a single syscall.

use crate::buffer::{Canvas, Rgba};
use crate::layout::{Point, Rect};
use std::io::Write;

/// Color a cell takes when its pixel is (partly) transparent.
const BACKDROP: Rgba = Rgba::BLACK;

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// All output for a dirty rectangle is accumulated here, then flushed at
/// once to prevent flickering.
pub struct OutputBuffer {
    data: Vec<u8>,
    /// Background color last emitted, to skip redundant SGR sequences.
    bg: Option<Rgba>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            bg: None,
        }
    }

    /// Create a buffer sized for a typical terminal.
    pub fn new() -> Self {
        Self::with_capacity(64 * 1024)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
        self.bg = None;
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Move cursor to (x, y) position (1-indexed for ANSI).
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        // CSI row ; col H
        let _ = write!(self.data, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1);
    }

    /// Hide cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25l");
    }

    /// Set background color (true color), unless it is already set.
    #[inline]
    pub fn set_bg(&mut self, color: Rgba) {
        if self.bg == Some(color) {
            return;
        }
        let _ = write!(self.data, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
        self.bg = Some(color);
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
        self.bg = None;
    }

    /// Paint the pixels of `canvas` within `rect` as background-colored
    /// cells, one pixel per cell.
    ///
    /// Cells outside the `u16` screen coordinate range are skipped.
    pub fn paint(&mut self, canvas: &Canvas, rect: Rect) {
        let target = rect.intersection(&canvas.bounds());
        for y in target.y..target.bottom() {
            let (Ok(row), Ok(col)) = (u16::try_from(y), u16::try_from(target.x.max(0))) else {
                continue;
            };
            self.cursor_move(col, row);
            for x in target.x.max(0)..target.right() {
                let pixel = canvas.get(Point::new(x, y)).unwrap_or(Rgba::TRANSPARENT);
                self.set_bg(pixel.over(BACKDROP));
                self.data.push(b' ');
            }
        }
        self.reset_attrs();
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_move_is_one_indexed() {
        let mut out = OutputBuffer::with_capacity(16);
        out.cursor_move(0, 0);
        assert_eq!(out.as_bytes(), b"\x1b[1;1H");
    }

    #[test]
    fn test_paint_elides_repeated_colors() {
        let mut canvas = Canvas::new(Rect::from_size(3, 1));
        canvas.fill(Rect::from_size(2, 1), Rgba::rgb(1, 2, 3));
        let mut out = OutputBuffer::new();
        out.paint(&canvas, Rect::from_size(3, 1));
        let expected = "\x1b[1;1H\x1b[48;2;1;2;3m  \x1b[48;2;0;0;0m \x1b[0m";
        assert_eq!(std::str::from_utf8(out.as_bytes()).unwrap(), expected);
    }

    #[test]
    fn test_paint_clips_to_canvas() {
        let canvas = Canvas::filled(Rect::from_size(1, 1), Rgba::WHITE);
        let mut out = OutputBuffer::new();
        out.paint(&canvas, Rect::new(0, 0, 5, 5));
        let text = std::str::from_utf8(out.as_bytes()).unwrap();
        assert_eq!(text.matches(' ').count(), 1);
    }

    #[test]
    fn test_flush_to_writer() {
        let mut out = OutputBuffer::new();
        out.cursor_hide();
        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"\x1b[?25l");
    }
}
