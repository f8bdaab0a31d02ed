//! Mux worker threads: fan-out, fan-in and one draw relay per environment.
//!
//! ```text
//!                 ┌──────────── fan-out ────────────┐
//!   parent events │  master ◀─ raw events            │
//!   ─────────────▶│  child i ◀─ Resize(partition[i])│
//!                 └─────────────────────────────────┘
//!   child draws ─▶ relay ─┐
//!   child draws ─▶ relay ─┼─▶ fan-in ─▶ parent draw sink
//!   master draws ▶ relay ─┘
//! ```
//!
//! Workers are detached; each one ends when its input channel closes.

use super::state::{Shared, Slot};
use crate::env::{DrawCommand, DrawReceiver, DrawSender};
use crate::event::{Event, EventReceiver};
use crate::layout::{Layout, Rect};
use crossbeam_channel::{select, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, trace, warn};

/// Spawn a named, detached worker thread.
///
/// # Panics
///
/// Panics if the OS fails to spawn the thread.
fn spawn_named(name: String, f: impl FnOnce() + Send + 'static) {
    thread::Builder::new()
        .name(name)
        .spawn(f)
        .expect("Failed to spawn mux thread");
}

/// Spawn the fan-out worker, reading the parent's events.
pub(super) fn spawn_fan_out(shared: Arc<Shared>, events: EventReceiver, layout: Option<Box<dyn Layout>>) {
    let name = format!("{}-fan-out", shared.name);
    spawn_named(name, move || run_fan_out(&shared, &events, layout));
}

/// Spawn the fan-in worker, forwarding merged draws to the parent.
pub(super) fn spawn_fan_in(
    name: &str,
    draws: Receiver<DrawCommand>,
    shutdown: Receiver<()>,
    parent: DrawSender,
) {
    let mux = name.to_string();
    spawn_named(format!("{name}-fan-in"), move || {
        run_fan_in(&mux, &draws, &shutdown, parent);
    });
}

/// Spawn the relay for one environment's draw sink.
pub(super) fn spawn_relay(shared: Arc<Shared>, slot: Slot, draws: DrawReceiver) {
    let name = match slot {
        Slot::Master => format!("{}-master", shared.name),
        Slot::Child(id) => format!("{}-relay-{id}", shared.name),
    };
    spawn_named(name, move || run_relay(&shared, slot, &draws));
}

fn run_fan_out(shared: &Shared, events: &EventReceiver, mut layout: Option<Box<dyn Layout>>) {
    for event in events.iter() {
        trace!(mux = %shared.name, %event, "fan-out");
        let Some(layout) = layout.as_deref_mut() else {
            shared.broadcast(&event);
            continue;
        };

        shared.send_master(&event);
        if let Event::Resize(bounds) = event {
            relayout(shared, layout, bounds);
        } else {
            let bounds = shared.last_resize();
            if layout.handle_event(&event, bounds) {
                relayout(shared, layout, bounds);
            }
            shared.send_children(&event);
        }
    }
    shared.close_streams();
}

/// Partition `bounds`, paint the background, then resize every child.
///
/// Any failure skips the whole step: children keep their previous sizes.
fn relayout(shared: &Shared, layout: &dyn Layout, bounds: Rect) {
    let rects = match layout.partition(bounds) {
        Ok(rects) => rects,
        Err(err) => {
            error!(mux = %shared.name, %err, ?bounds, "layout failed, children keep their sizes");
            return;
        }
    };
    let registered = shared.child_count();
    if rects.len() < registered {
        warn!(mux = %shared.name, slots = rects.len(), registered, "too few layout slots, skipping resize");
        return;
    }

    if shared.submit(layout.background(bounds)).is_err() {
        debug!(mux = %shared.name, "background dropped, mux closed");
    }
    if let Err(registered) = shared.distribute(rects) {
        warn!(mux = %shared.name, registered, "children joined during layout, replaying previous slots");
    }
}

fn run_relay(shared: &Shared, slot: Slot, draws: &DrawReceiver) {
    let mut detached = false;
    for draw in draws.iter() {
        // Keep draining so the child never blocks on a dead mux.
        if detached {
            continue;
        }
        let draw = match slot {
            Slot::Master => draw,
            Slot::Child(_) => shared.clip(draw),
        };
        if shared.submit(draw).is_err() {
            debug!(mux = %shared.name, ?slot, "mux closed, discarding draws");
            detached = true;
        }
    }
    match slot {
        Slot::Master => shared.teardown(),
        Slot::Child(id) => shared.remove(id),
    }
}

fn run_fan_in(name: &str, draws: &Receiver<DrawCommand>, shutdown: &Receiver<()>, parent: DrawSender) {
    let mut parent_gone = false;
    loop {
        select! {
            recv(draws) -> draw => {
                let Ok(draw) = draw else { break };
                if parent_gone {
                    continue;
                }
                if parent.send_boxed(draw).is_err() {
                    debug!(mux = %name, "parent draw sink gone, discarding draws");
                    parent_gone = true;
                }
            }
            recv(shutdown) -> _ => break,
        }
    }
    parent.close();
    debug!(mux = %name, "fan-in stopped");
}
