//! Environments: an event stream paired with a draw sink.
//!
//! An [`Env`] is what a widget owns. The matching [`Host`] is what a backend
//! (or a [`Mux`](crate::mux::Mux)) owns: it produces the events and consumes
//! the draws.
//!
//! # Closing protocol
//!
//! ```text
//!            events (unbounded)
//!   Host ───────────────────────▶ Env
//!        ◀───────────────────────
//!            draws (rendezvous)
//! ```
//!
//! - Closing the draw sink is the only teardown trigger. The host must react
//!   by closing the event stream.
//! - When the event stream closes, the env owner finishes in-flight work and
//!   then closes its draw sink.
//!
//! Every env delivers a [`Event::Resize`](crate::event::Event::Resize) first.

mod draw;

pub use draw::{channel as draw_channel, DrawCommand, DrawReceiver, DrawSender};

use crate::buffer::Canvas;
use crate::error::EnvError;
use crate::event::{self, Event, EventReceiver, EventSender};
use crate::layout::Rect;

/// Create a connected environment pair.
pub fn pair() -> (Env, Host) {
    let (events_rx, events_tx) = event::channel();
    let (draw_tx, draw_rx) = draw::channel();
    (
        Env {
            events: events_rx,
            draw: draw_tx,
        },
        Host {
            events: events_tx,
            draws: draw_rx,
        },
    )
}

/// An interactive graphical environment, as seen by its user.
#[derive(Debug)]
pub struct Env {
    events: EventReceiver,
    draw: DrawSender,
}

impl Env {
    /// Assemble an environment from its two halves.
    pub const fn new(events: EventReceiver, draw: DrawSender) -> Self {
        Self { events, draw }
    }

    /// The event stream.
    pub const fn events(&self) -> &EventReceiver {
        &self.events
    }

    /// The draw sink.
    pub const fn draw_sender(&self) -> &DrawSender {
        &self.draw
    }

    /// Submit a draw command.
    pub fn draw<F>(&self, draw: F) -> Result<(), EnvError>
    where
        F: FnOnce(&mut Canvas) -> Rect + Send + 'static,
    {
        self.draw.send(draw)
    }

    /// Wait for the next event. `None` means the stream closed.
    pub fn next_event(&self) -> Option<Event> {
        self.events.recv()
    }

    /// Split into the event stream and the draw sink.
    pub fn into_parts(self) -> (EventReceiver, DrawSender) {
        (self.events, self.draw)
    }

    /// Close the environment: stop listening and close the draw sink.
    pub fn close(self) {
        let (events, draw) = self.into_parts();
        draw.close();
        events.close();
    }
}

/// The producing side of an environment.
#[derive(Debug)]
pub struct Host {
    /// Sends events to the environment.
    pub events: EventSender,
    /// Receives the environment's draw commands.
    pub draws: DrawReceiver,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgba;
    use crate::layout::Point;
    use std::thread;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(2);

    #[test]
    fn test_pair_delivers_events_and_draws() {
        let (env, host) = pair();
        host.events.send(Event::Resize(Rect::from_size(4, 4))).unwrap();
        assert_eq!(env.next_event(), Some(Event::Resize(Rect::from_size(4, 4))));

        let widget = thread::spawn(move || {
            env.draw(|canvas| canvas.fill(Rect::new(1, 1, 2, 2), Rgba::WHITE))
                .unwrap();
            env.close();
        });

        let mut canvas = Canvas::new(Rect::from_size(4, 4));
        let draw = host.draws.recv_timeout(TIMEOUT).unwrap();
        assert_eq!(draw(&mut canvas), Rect::new(1, 1, 2, 2));
        assert_eq!(canvas.get(Point::new(2, 2)), Some(Rgba::WHITE));

        widget.join().unwrap();
        // The draw sink is closed, so the host must close the events.
        assert!(host.draws.recv().is_none());
        assert_eq!(host.events.send(Event::WindowClose), Err(EnvError::Closed));
    }

    #[test]
    fn test_draw_after_host_gone() {
        let (env, host) = pair();
        drop(host);
        assert_eq!(env.draw(|_| Rect::ZERO), Err(EnvError::Closed));
        assert_eq!(env.next_event(), None);
    }
}
