//! Terminal backend: a root environment backed by crossterm.
//!
//! ```text
//!  ┌──────────────┐  Event (unbounded)   ┌─────────────┐
//!  │ panemux-input│ ───────────────────▶ │             │
//!  └──────┬───────┘                      │  root Env   │
//!         │ resizes                      │  (widgets,  │
//!  ┌──────▼────────┐  DrawCommand        │   muxes)    │
//!  │ panemux-render│ ◀─────────────────── │             │
//!  └───────────────┘   (rendezvous)      └─────────────┘
//! ```
//!
//! Each terminal cell is one pixel; draws are shown as background colors.
//! The first event on the root environment is a resize to the screen size.

mod input;
mod output;
mod renderer;

pub use input::{convert_event, is_interrupt, InputActor};
pub use output::OutputBuffer;
pub use renderer::{RenderActor, RenderStats, Renderer};

use crate::env::{self, Env, Host};
use crate::event::Event;
use crate::layout::Rect;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for the terminal backend.
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Input poll timeout.
    pub input_poll_timeout: Duration,
    /// Whether to enable mouse capture.
    pub enable_mouse: bool,
    /// Whether to use alternate screen buffer.
    pub alternate_screen: bool,
    /// Turn Ctrl+C into a window-close event.
    pub close_on_interrupt: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            input_poll_timeout: Duration::from_millis(10),
            enable_mouse: true,
            alternate_screen: true,
            close_on_interrupt: true,
        }
    }
}

/// Open the terminal with the default configuration.
///
/// # Errors
///
/// Returns an error if terminal setup fails (raw mode, alternate screen, etc.).
pub fn open_default() -> io::Result<(Env, Terminal)> {
    open(TerminalConfig::default())
}

/// Put the terminal in raw mode and return the root environment.
///
/// # Errors
///
/// Returns an error if terminal setup fails.
pub fn open(config: TerminalConfig) -> io::Result<(Env, Terminal)> {
    let (width, height) = terminal::size()?;

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    if config.alternate_screen {
        execute!(stdout, EnterAlternateScreen)?;
    }
    if config.enable_mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    execute!(stdout, cursor::Hide)?;

    let bounds = Rect::from_size(i32::from(width), i32::from(height));
    let (root, Host { events, draws }) = env::pair();
    // Every environment starts with a resize.
    let _ = events.send(Event::Resize(bounds));

    let (resize_tx, resize_rx) = crossbeam_channel::unbounded();
    let input = InputActor::spawn(
        events,
        resize_tx,
        config.input_poll_timeout,
        config.close_on_interrupt,
    );
    let renderer = RenderActor::spawn(draws, resize_rx, bounds, input.shutdown_flag());
    info!(width, height, "terminal opened");

    Ok((
        root,
        Terminal {
            config,
            input: Some(input),
            renderer: Some(renderer),
            restored: false,
        },
    ))
}

/// The running terminal backend.
///
/// Dropping it restores the terminal.
pub struct Terminal {
    config: TerminalConfig,
    input: Option<InputActor>,
    renderer: Option<RenderActor>,
    restored: bool,
}

impl Terminal {
    /// Wait until the root environment closes its draw sink, then restore
    /// the terminal.
    pub fn wait(mut self) {
        if let Some(renderer) = self.renderer.take() {
            renderer.join();
        }
        if let Some(input) = self.input.take() {
            input.join();
        }
        self.restore();
    }

    /// Restore the terminal state.
    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        let mut stdout = io::stdout();
        let mut result = execute!(stdout, cursor::Show);
        if self.config.enable_mouse {
            result = result.and(execute!(stdout, DisableMouseCapture));
        }
        if self.config.alternate_screen {
            result = result.and(execute!(stdout, LeaveAlternateScreen));
        }
        result = result.and(terminal::disable_raw_mode());
        if let Err(err) = result {
            warn!(%err, "failed to restore terminal");
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Some(input) = &self.input {
            input.shutdown();
        }
        if let Some(renderer) = &self.renderer {
            renderer.shutdown();
        }
        self.restore();
    }
}

impl std::fmt::Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("config", &self.config)
            .field("running", &self.renderer.is_some())
            .finish_non_exhaustive()
    }
}
