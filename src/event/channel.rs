//! Unbounded event channel.
//!
//! Event producers (input threads, muxes) must never block on a consumer
//! that is busy redrawing, and events must never be dropped: a lost release
//! desynchronizes press/release pairs. The channel is backed by crossbeam's
//! unbounded queue, a growable FIFO, so `send` always returns immediately.
//!
//! Closing the sender lets the receiver drain everything still queued, in
//! order, before it observes the end of the stream.

use super::Event;
use crate::error::EnvError;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// Create an unbounded event channel.
pub fn channel() -> (EventReceiver, EventSender) {
    let (tx, rx) = unbounded();
    (EventReceiver { rx }, EventSender { tx })
}

/// Sending end of an event channel.
///
/// Not `Clone`: there is exactly one owner, and [`EventSender::close`]
/// consumes it, so a sink cannot be closed twice.
#[derive(Debug)]
pub struct EventSender {
    tx: Sender<Event>,
}

impl EventSender {
    /// Queue an event. Never blocks.
    ///
    /// Fails only when the receiving end has been dropped.
    #[inline]
    pub fn send(&self, event: Event) -> Result<(), EnvError> {
        self.tx.send(event).map_err(|_| EnvError::Closed)
    }

    /// Number of events queued and not yet received.
    pub fn pending(&self) -> usize {
        self.tx.len()
    }

    /// Close the stream. Queued events are still delivered.
    pub fn close(self) {
        drop(self);
    }
}

/// Receiving end of an event channel.
#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<Event>,
}

impl EventReceiver {
    /// Wait for the next event.
    ///
    /// Returns `None` once the sender is closed and the queue is drained.
    pub fn recv(&self) -> Option<Event> {
        self.rx.recv().ok()
    }

    /// Take the next event if one is queued.
    pub fn try_recv(&self) -> Result<Event, TryRecvError> {
        self.rx.try_recv()
    }

    /// Wait for the next event with a timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Event, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Iterate over events until the stream closes.
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.rx.iter()
    }

    /// Drain all currently queued events.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }

    /// The underlying receiver, for use with `crossbeam_channel::select!`.
    pub const fn inner(&self) -> &Receiver<Event> {
        &self.rx
    }

    /// Stop receiving. Subsequent sends fail with [`EnvError::Closed`].
    pub fn close(self) {
        drop(self);
    }
}

impl IntoIterator for EventReceiver {
    type Item = Event;
    type IntoIter = crossbeam_channel::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.rx.into_iter()
    }
}
