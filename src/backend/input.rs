//! Input actor: polls the terminal and feeds the root event stream.
//!
//! Runs on its own thread using crossterm's event polling, so a widget busy
//! redrawing never delays input. Terminal resizes are also passed to the
//! render actor so its canvas tracks the screen.

use crate::event::{Event, EventSender, Key, Modifiers, MouseButton};
use crate::layout::{Point, Rect};
use crossbeam_channel::Sender;
use crossterm::event::{self as term, KeyEventKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error};

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// Events go to `events`; resizes are also sent on `resizes`. When
    /// `close_on_interrupt` is set, Ctrl+C becomes [`Event::WindowClose`].
    /// Dropping `events` on exit closes the root event stream.
    pub fn spawn(
        events: EventSender,
        resizes: Sender<Rect>,
        poll_timeout: Duration,
        close_on_interrupt: bool,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("panemux-input".to_string())
            .spawn(move || {
                Self::run_loop(&events, &resizes, &shutdown_clone, poll_timeout, close_on_interrupt);
                events.close();
            })
            .expect("Failed to spawn input thread");

        Self {
            handle: Some(handle),
            shutdown,
        }
    }

    /// A flag that stops the input thread when set.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input polling loop.
    fn run_loop(
        events: &EventSender,
        resizes: &Sender<Rect>,
        shutdown: &AtomicBool,
        poll_timeout: Duration,
        close_on_interrupt: bool,
    ) {
        while !shutdown.load(Ordering::Relaxed) {
            match term::poll(poll_timeout) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    error!(%err, "terminal poll failed");
                    break;
                }
            }
            let raw = match term::read() {
                Ok(raw) => raw,
                Err(err) => {
                    error!(%err, "terminal read failed");
                    break;
                }
            };

            for event in convert_event(raw) {
                let event = if close_on_interrupt && is_interrupt(&event) {
                    Event::WindowClose
                } else {
                    event
                };
                if let Event::Resize(r) = event {
                    let _ = resizes.send(r);
                }
                if events.send(event).is_err() {
                    debug!("root environment stopped listening");
                    return;
                }
            }
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Whether `event` is a Ctrl+C press.
pub fn is_interrupt(event: &Event) -> bool {
    matches!(
        event,
        Event::KeyDown { key: Key::Char('c'), modifiers } if modifiers.contains(Modifiers::CONTROL)
    )
}

/// Convert a crossterm event to zero or more events.
///
/// A character key press yields both a typed character and a key-down.
pub fn convert_event(event: term::Event) -> Vec<Event> {
    match event {
        term::Event::Key(key) => convert_key(key),
        term::Event::Mouse(mouse) => vec![convert_mouse(mouse)],
        term::Event::Resize(width, height) => {
            vec![Event::Resize(Rect::from_size(i32::from(width), i32::from(height)))]
        }
        term::Event::FocusGained => vec![Event::WindowRefresh],
        term::Event::FocusLost => Vec::new(),
        term::Event::Paste(text) => text.chars().map(Event::KeyType).collect(),
    }
}

fn convert_key(event: term::KeyEvent) -> Vec<Event> {
    let Some(key) = convert_key_code(event.code) else {
        return Vec::new();
    };
    let modifiers = convert_modifiers(event.modifiers);
    match event.kind {
        KeyEventKind::Press => {
            let mut out = Vec::with_capacity(2);
            if let term::KeyCode::Char(c) = event.code {
                if !modifiers.intersects(Modifiers::CONTROL | Modifiers::ALT) {
                    out.push(Event::KeyType(c));
                }
            }
            out.push(Event::KeyDown { key, modifiers });
            out
        }
        KeyEventKind::Repeat => vec![Event::KeyRepeat { key, modifiers }],
        KeyEventKind::Release => vec![Event::KeyUp { key, modifiers }],
    }
}

/// Convert a crossterm key code.
fn convert_key_code(code: term::KeyCode) -> Option<Key> {
    Some(match code {
        term::KeyCode::Char(' ') => Key::Space,
        term::KeyCode::Char(c) => Key::Char(c),
        term::KeyCode::F(n) => Key::F(n),
        term::KeyCode::Backspace => Key::Backspace,
        term::KeyCode::Enter => Key::Enter,
        term::KeyCode::Left => Key::Left,
        term::KeyCode::Right => Key::Right,
        term::KeyCode::Up => Key::Up,
        term::KeyCode::Down => Key::Down,
        term::KeyCode::Home => Key::Home,
        term::KeyCode::End => Key::End,
        term::KeyCode::PageUp => Key::PageUp,
        term::KeyCode::PageDown => Key::PageDown,
        term::KeyCode::Tab | term::KeyCode::BackTab => Key::Tab,
        term::KeyCode::Delete => Key::Delete,
        term::KeyCode::Insert => Key::Insert,
        term::KeyCode::Esc => Key::Escape,
        _ => return None,
    })
}

/// Convert crossterm modifiers.
fn convert_modifiers(mods: term::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    out.set(Modifiers::SHIFT, mods.contains(term::KeyModifiers::SHIFT));
    out.set(Modifiers::CONTROL, mods.contains(term::KeyModifiers::CONTROL));
    out.set(Modifiers::ALT, mods.contains(term::KeyModifiers::ALT));
    out.set(Modifiers::SUPER, mods.contains(term::KeyModifiers::SUPER));
    out
}

fn convert_mouse(mouse: term::MouseEvent) -> Event {
    let at = Point::new(i32::from(mouse.column), i32::from(mouse.row));
    let scroll = |dx, dy| Event::MouseScroll {
        at,
        delta: Point::new(dx, dy),
    };
    match mouse.kind {
        term::MouseEventKind::Down(button) => Event::MouseDown {
            at,
            button: convert_mouse_button(button),
        },
        term::MouseEventKind::Up(button) => Event::MouseUp {
            at,
            button: convert_mouse_button(button),
        },
        term::MouseEventKind::Moved | term::MouseEventKind::Drag(_) => Event::MouseMove(at),
        term::MouseEventKind::ScrollUp => scroll(0, 1),
        term::MouseEventKind::ScrollDown => scroll(0, -1),
        term::MouseEventKind::ScrollLeft => scroll(-1, 0),
        term::MouseEventKind::ScrollRight => scroll(1, 0),
    }
}

const fn convert_mouse_button(button: term::MouseButton) -> MouseButton {
    match button {
        term::MouseButton::Left => MouseButton::Left,
        term::MouseButton::Right => MouseButton::Right,
        term::MouseButton::Middle => MouseButton::Middle,
    }
}
