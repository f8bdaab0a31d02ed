//! Shared mux state: the child set, the cached resize and the fan-in sink.
//!
//! The child set is the only lock-guarded state of a mux. Event sends under
//! the lock never block (event channels are unbounded); draw submissions
//! never happen under it.

use crate::buffer::Canvas;
use crate::env::DrawCommand;
use crate::error::EnvError;
use crate::event::{Event, EventSender};
use crate::layout::Rect;
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, warn};

/// Identifies a child environment within its mux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChildId(pub u64);

impl std::fmt::Display for ChildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which environment of the mux a relay serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Slot {
    /// The master: closing it tears down the whole mux.
    Master,
    /// An ordinary child.
    Child(ChildId),
}

/// A registered child event sink.
struct Child {
    id: ChildId,
    events: EventSender,
}

/// Mutable state behind the lock.
struct State {
    /// Event sink of the master environment.
    master: Option<EventSender>,
    /// Child event sinks, in creation order.
    children: Vec<Child>,
    /// Last resize seen from the parent, replayed to late joiners.
    last_resize: Option<Rect>,
    /// Last successful partition (layout-aware muxes only).
    partition: Vec<Rect>,
    /// Dropping this stops the fan-in worker.
    shutdown: Option<Sender<()>>,
    /// Set once the parent's event stream ended.
    streams_closed: bool,
}

/// State shared between the mux handle and its workers.
pub(super) struct Shared {
    /// Name used for worker threads and log fields.
    pub(super) name: String,
    /// Whether resizes are partitioned by a layout.
    layout_aware: bool,
    /// Whether child drawing is clipped to the last resize rectangle.
    clips_children: bool,
    /// Set once the master closed; checked before every fan-in send.
    closed: AtomicBool,
    /// Shared fan-in channel, drained into the parent's draw sink.
    fan_in: Sender<DrawCommand>,
    next_id: AtomicU64,
    state: Mutex<State>,
}

impl Shared {
    pub(super) fn new(
        name: String,
        fan_in: Sender<DrawCommand>,
        shutdown: Sender<()>,
        layout_aware: bool,
        clips_children: bool,
    ) -> Self {
        Self {
            name,
            layout_aware,
            clips_children,
            closed: AtomicBool::new(false),
            fan_in,
            next_id: AtomicU64::new(1),
            state: Mutex::new(State {
                master: None,
                children: Vec::new(),
                last_resize: None,
                partition: Vec::new(),
                shutdown: Some(shutdown),
                streams_closed: false,
            }),
        }
    }

    /// Whether the master has closed.
    pub(super) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of registered children, master excluded.
    pub(super) fn child_count(&self) -> usize {
        self.state.lock().children.len()
    }

    /// The rectangle of the last resize, or [`Rect::ZERO`] before the first.
    pub(super) fn last_resize(&self) -> Rect {
        self.state.lock().last_resize.unwrap_or(Rect::ZERO)
    }

    /// Register the master's event sink.
    pub(super) fn register_master(&self, events: EventSender) {
        let mut state = self.state.lock();
        if self.is_closed() {
            events.close();
            return;
        }
        if let Some(r) = state.last_resize {
            let _ = events.send(Event::Resize(r));
        }
        if state.streams_closed {
            events.close();
            return;
        }
        state.master = Some(events);
    }

    /// Register a child's event sink, replaying the cached resize so that
    /// a resize is still the first event it sees.
    pub(super) fn register_child(&self, events: EventSender) -> ChildId {
        let id = ChildId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut state = self.state.lock();
        if self.is_closed() {
            events.close();
            return id;
        }

        let index = state.children.len();
        let replay = if self.layout_aware {
            let slot = state.partition.get(index).copied();
            if slot.is_none() && state.last_resize.is_some() {
                warn!(mux = %self.name, child = %id, index, "no layout slot for late child, waiting for next resize");
            }
            slot
        } else {
            state.last_resize
        };
        if let Some(r) = replay {
            let _ = events.send(Event::Resize(r));
        }
        // Nobody is left to close a sink registered now.
        if state.streams_closed {
            events.close();
            return id;
        }

        state.children.push(Child { id, events });
        id
    }

    /// Send an event to the master and every child.
    pub(super) fn broadcast(&self, event: &Event) {
        let mut state = self.state.lock();
        if let Event::Resize(r) = event {
            state.last_resize = Some(*r);
        }
        if let Some(master) = &state.master {
            let _ = master.send(event.clone());
        }
        for child in &state.children {
            let _ = child.events.send(event.clone());
        }
    }

    /// Send an event to the master only.
    pub(super) fn send_master(&self, event: &Event) {
        let mut state = self.state.lock();
        if let Event::Resize(r) = event {
            state.last_resize = Some(*r);
        }
        if let Some(master) = &state.master {
            let _ = master.send(event.clone());
        }
    }

    /// Send an event to every child, master excluded.
    pub(super) fn send_children(&self, event: &Event) {
        let state = self.state.lock();
        for child in &state.children {
            let _ = child.events.send(event.clone());
        }
    }

    /// Hand each child its rectangle, in creation order.
    ///
    /// Returns the number of registered children if there are more of them
    /// than rectangles. In that case the new partition is dropped and the
    /// children holding a slot of the previous one get it again, so they
    /// repaint over the background already drawn.
    pub(super) fn distribute(&self, rects: Vec<Rect>) -> Result<(), usize> {
        let mut state = self.state.lock();
        if rects.len() < state.children.len() {
            for (child, r) in state.children.iter().zip(&state.partition) {
                let _ = child.events.send(Event::Resize(*r));
            }
            return Err(state.children.len());
        }
        for (child, r) in state.children.iter().zip(&rects) {
            let _ = child.events.send(Event::Resize(*r));
        }
        state.partition = rects;
        Ok(())
    }

    /// Forward a draw command into the shared fan-in channel.
    ///
    /// Fails once the mux is closed; the caller discards the command.
    pub(super) fn submit(&self, draw: DrawCommand) -> Result<(), EnvError> {
        if self.is_closed() {
            return Err(EnvError::Closed);
        }
        self.fan_in.send(draw).map_err(|_| EnvError::Closed)
    }

    /// Restrict a child's draw command to this mux's area, if the layout
    /// asks for it.
    pub(super) fn clip(&self, draw: DrawCommand) -> DrawCommand {
        if !self.clips_children {
            return draw;
        }
        let area = self.last_resize();
        Box::new(move |canvas: &mut Canvas| canvas.with_clip(area, draw).intersection(&area))
    }

    /// Drop a child that closed its draw sink, and close its events.
    pub(super) fn remove(&self, id: ChildId) {
        let mut state = self.state.lock();
        if let Some(pos) = state.children.iter().position(|c| c.id == id) {
            let child = state.children.remove(pos);
            child.events.close();
            debug!(mux = %self.name, child = %id, left = state.children.len(), "child closed");
        }
    }

    /// The parent's event stream ended: close every event stream.
    pub(super) fn close_streams(&self) {
        let mut state = self.state.lock();
        state.streams_closed = true;
        if let Some(master) = state.master.take() {
            master.close();
        }
        for child in state.children.drain(..) {
            child.events.close();
        }
        debug!(mux = %self.name, "parent events closed");
    }

    /// The master closed its draw sink: close everything, exactly once.
    pub(super) fn teardown(&self) {
        let mut state = self.state.lock();
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(master) = state.master.take() {
            master.close();
        }
        let closed = state.children.len();
        for child in state.children.drain(..) {
            child.events.close();
        }
        // Stops the fan-in worker, which then closes the parent's draw sink.
        state.shutdown.take();
        debug!(mux = %self.name, children = closed, "mux torn down");
    }
}
