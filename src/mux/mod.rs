//! Mux: one parent environment shared by many children.
//!
//! A mux reads the parent's events and copies each one to every child
//! (fan-out), and merges every child's draw commands into the parent's draw
//! sink (fan-in). The first environment it hands out is the master: closing
//! the master's draw sink closes the whole mux, while closing any other
//! child only removes that child.
//!
//! A layout-aware mux additionally partitions each parent resize with a
//! [`Layout`] and gives every child its own rectangle. See
//! [`layout::mount`](crate::layout::mount).

mod state;
mod workers;

pub use state::ChildId;

use crate::env::{self, Env, Host};
use crate::layout::Layout;
use crossbeam_channel::bounded;
use state::{Shared, Slot};
use std::sync::Arc;
use tracing::debug;

/// Mux configuration.
#[derive(Debug, Clone)]
pub struct MuxConfig {
    /// Name for the mux's worker threads and log records.
    pub name: String,
}

impl Default for MuxConfig {
    fn default() -> Self {
        Self {
            name: "mux".to_string(),
        }
    }
}

/// Handle to a running mux.
///
/// Cheap to clone. Dropping every handle does not stop the mux; it lives
/// until the master closes or the parent's events end.
#[derive(Clone)]
pub struct Mux {
    shared: Arc<Shared>,
}

impl Mux {
    /// Multiplex `parent`, broadcasting every event to every child.
    ///
    /// Returns the handle and the master environment.
    pub fn new(parent: Env) -> (Self, Env) {
        Self::with_config(parent, None, MuxConfig::default())
    }

    /// Multiplex `parent`, partitioning resizes with `layout`.
    ///
    /// Children made with [`Mux::make_env`] take the layout's slots in
    /// creation order.
    pub fn with_layout<L: Layout>(parent: Env, layout: L) -> (Self, Env) {
        Self::with_config(parent, Some(Box::new(layout)), MuxConfig::default())
    }

    /// Multiplex `parent` with an optional layout and explicit configuration.
    pub fn with_config(parent: Env, layout: Option<Box<dyn Layout>>, config: MuxConfig) -> (Self, Env) {
        let (mux, master, _) = Self::build(parent, layout, config, 0);
        (mux, master)
    }

    /// Start the mux with `children` environments registered before the
    /// first parent event is read.
    pub(crate) fn build(
        parent: Env,
        layout: Option<Box<dyn Layout>>,
        config: MuxConfig,
        children: usize,
    ) -> (Self, Env, Vec<Env>) {
        let (parent_events, parent_draw) = parent.into_parts();
        let (fan_in_tx, fan_in_rx) = bounded(0);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let clips = layout.as_ref().is_some_and(|l| l.clips_children());
        let shared = Arc::new(Shared::new(
            config.name,
            fan_in_tx,
            shutdown_tx,
            layout.is_some(),
            clips,
        ));
        let mux = Self { shared };

        let master = mux.attach(true);
        let envs = (0..children).map(|_| mux.make_env()).collect();

        workers::spawn_fan_in(&mux.shared.name, fan_in_rx, shutdown_rx, parent_draw);
        workers::spawn_fan_out(Arc::clone(&mux.shared), parent_events, layout);
        debug!(mux = %mux.shared.name, children, "mux started");

        (mux, master, envs)
    }

    /// Create a new child environment.
    ///
    /// If the mux has already seen a resize, the child's first event is a
    /// replay of it (its own slot, for a layout-aware mux). After the master
    /// has closed, the returned environment's events are already closed.
    pub fn make_env(&self) -> Env {
        self.attach(false)
    }

    fn attach(&self, master: bool) -> Env {
        let (env, Host { events, draws }) = env::pair();
        let slot = if master {
            self.shared.register_master(events);
            Slot::Master
        } else {
            Slot::Child(self.shared.register_child(events))
        };
        workers::spawn_relay(Arc::clone(&self.shared), slot, draws);
        env
    }

    /// Number of live children, master excluded.
    pub fn child_count(&self) -> usize {
        self.shared.child_count()
    }

    /// Whether the master has closed.
    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// The configured name.
    pub fn name(&self) -> &str {
        &self.shared.name
    }
}

impl std::fmt::Debug for Mux {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mux")
            .field("name", &self.shared.name)
            .field("children", &self.child_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}
