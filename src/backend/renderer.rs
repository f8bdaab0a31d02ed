//! Render actor: applies draw commands and paints dirty cells.
//!
//! This actor owns the root canvas, one pixel per terminal cell. Each draw
//! command from the root environment mutates the canvas; the dirty
//! rectangle it reports is painted as background-colored cells in a single
//! write.

use super::output::OutputBuffer;
use crate::buffer::Canvas;
use crate::env::{DrawCommand, DrawReceiver};
use crate::layout::Rect;
use crossbeam_channel::{select, Receiver};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error};

/// How often the loop checks its shutdown flag while idle.
const IDLE_TICK: Duration = Duration::from_millis(16);

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Draw commands applied.
    pub draws: u64,
    /// Cells painted across all draws.
    pub cells_painted: u64,
    /// Total bytes written to the terminal.
    pub bytes_written: u64,
}

/// Canvas plus output, generic over the writer so it can be tested
/// without a terminal.
pub struct Renderer<W: Write> {
    canvas: Canvas,
    output: OutputBuffer,
    writer: W,
    stats: RenderStats,
}

impl<W: Write> Renderer<W> {
    /// A transparent canvas of `bounds` painting into `writer`.
    pub fn new(bounds: Rect, writer: W) -> Self {
        Self {
            canvas: Canvas::new(bounds),
            output: OutputBuffer::new(),
            writer,
            stats: RenderStats::default(),
        }
    }

    /// Run one draw command and paint what it changed.
    pub fn apply(&mut self, draw: DrawCommand) -> io::Result<Rect> {
        let dirty = draw(&mut self.canvas).intersection(&self.canvas.bounds());
        self.paint(dirty)?;
        Ok(dirty)
    }

    /// Track a new screen size. Pixels in the overlap are kept.
    pub fn resize(&mut self, bounds: Rect) {
        self.canvas = self.canvas.resized(bounds);
    }

    fn paint(&mut self, dirty: Rect) -> io::Result<()> {
        if dirty.is_empty() {
            return Ok(());
        }
        self.output.clear();
        self.output.paint(&self.canvas, dirty);
        self.output.flush_to(&mut self.writer)?;

        self.stats.draws += 1;
        self.stats.cells_painted += u64::try_from(dirty.area()).unwrap_or(0);
        self.stats.bytes_written += self.output.as_bytes().len() as u64;
        Ok(())
    }

    /// The root canvas.
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Statistics so far.
    pub const fn stats(&self) -> RenderStats {
        self.stats
    }

    /// The underlying writer.
    pub const fn writer(&self) -> &W {
        &self.writer
    }
}

/// Renderer actor that handles terminal output.
pub struct RenderActor {
    /// Handle to the render thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl RenderActor {
    /// Spawn the renderer actor thread.
    ///
    /// When the root draw sink closes, the actor sets `input_shutdown` so
    /// the input actor closes the root event stream.
    pub fn spawn(
        draws: DrawReceiver,
        resizes: Receiver<Rect>,
        bounds: Rect,
        input_shutdown: Arc<AtomicBool>,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("panemux-render".to_string())
            .spawn(move || {
                let mut renderer = Renderer::new(bounds, io::stdout());
                if let Err(err) = Self::run_loop(&mut renderer, &draws, &resizes, &shutdown_clone) {
                    error!(%err, "render thread failed");
                }
                debug!(stats = ?renderer.stats(), "render thread stopped");
                input_shutdown.store(true, Ordering::Relaxed);
            })
            .expect("Failed to spawn render thread");

        Self {
            handle: Some(handle),
            shutdown,
        }
    }

    /// Signal the render thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the render thread to finish.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main render loop. Returns when the root draw sink closes.
    fn run_loop<W: Write>(
        renderer: &mut Renderer<W>,
        draws: &DrawReceiver,
        resizes: &Receiver<Rect>,
        shutdown: &AtomicBool,
    ) -> io::Result<()> {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                return Ok(());
            }
            select! {
                recv(draws.inner()) -> draw => match draw {
                    Ok(draw) => {
                        renderer.apply(draw)?;
                    }
                    Err(_) => return Ok(()),
                },
                recv(resizes) -> bounds => {
                    if let Ok(bounds) = bounds {
                        renderer.resize(bounds);
                    }
                },
                default(IDLE_TICK) => {}
            }
        }
    }
}

impl Drop for RenderActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
