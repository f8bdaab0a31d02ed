//! Draw commands and the synchronous channel that carries them.

use crate::buffer::Canvas;
use crate::error::EnvError;
use crate::layout::Rect;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// A drawing operation: mutates the target canvas and returns the rectangle
/// it modified (the dirty rectangle).
pub type DrawCommand = Box<dyn FnOnce(&mut Canvas) -> Rect + Send>;

/// Create a draw channel.
///
/// The channel is a rendezvous: a submission suspends until the receiving
/// side takes it, so drawing is paced by the consumer.
pub fn channel() -> (DrawSender, DrawReceiver) {
    let (tx, rx) = bounded(0);
    (DrawSender { tx }, DrawReceiver { rx })
}

/// Sending end of a draw channel.
///
/// Not `Clone`; closing it is the "I am done" signal of an environment.
pub struct DrawSender {
    tx: Sender<DrawCommand>,
}

impl DrawSender {
    /// Submit a draw command, waiting until the receiver takes it.
    pub fn send<F>(&self, draw: F) -> Result<(), EnvError>
    where
        F: FnOnce(&mut Canvas) -> Rect + Send + 'static,
    {
        self.send_boxed(Box::new(draw))
    }

    /// Submit an already boxed draw command.
    pub fn send_boxed(&self, draw: DrawCommand) -> Result<(), EnvError> {
        self.tx.send(draw).map_err(|_| EnvError::Closed)
    }

    /// Close the draw sink.
    pub fn close(self) {
        drop(self);
    }
}

impl std::fmt::Debug for DrawSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawSender").finish_non_exhaustive()
    }
}

/// Receiving end of a draw channel.
pub struct DrawReceiver {
    rx: Receiver<DrawCommand>,
}

impl DrawReceiver {
    /// Wait for the next draw command.
    ///
    /// Returns `None` once the sender is closed.
    pub fn recv(&self) -> Option<DrawCommand> {
        self.rx.recv().ok()
    }

    /// Take a draw command if one is being offered.
    pub fn try_recv(&self) -> Result<DrawCommand, TryRecvError> {
        self.rx.try_recv()
    }

    /// Wait for the next draw command with a timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<DrawCommand, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Iterate over draw commands until the sink closes.
    pub fn iter(&self) -> impl Iterator<Item = DrawCommand> + '_ {
        self.rx.iter()
    }

    /// The underlying receiver, for use with `crossbeam_channel::select!`.
    pub const fn inner(&self) -> &Receiver<DrawCommand> {
        &self.rx
    }
}

impl std::fmt::Debug for DrawReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawReceiver").finish_non_exhaustive()
    }
}
