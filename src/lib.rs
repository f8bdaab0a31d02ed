//! # Panemux
//!
//! Event fan-out, draw fan-in and layout partitioning for multiplexed
//! graphical environments.
//!
//! An [`Env`] is a widget's view of the world: a stream of [`Event`]s in,
//! a sink of draw commands out. A [`Mux`] turns one environment into many,
//! and a [`Layout`] decides which part of the parent each child gets.
//!
//! ## Core Concepts
//!
//! - **Unbounded events**: producers never block on a busy consumer
//! - **Rendezvous draws**: drawing is paced by whoever applies the commands
//! - **Closing handshake**: closing a draw sink is the only teardown signal
//! - **Pattern dispatch**: path-shaped events routed through a handler trie
//!
//! ```text
//!            ┌──────────── backend ────────────┐
//!            │  input actor     render actor   │
//!            └──────┬─────────────────▲────────┘
//!             events│                 │draws
//!            ┌──────▼─────────────────┴────────┐
//!            │         Mux + Layout             │
//!            └──┬──────────┬──────────┬────────┘
//!            master     child 0    child 1 ...
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use panemux::{backend, layout, Event, Grid, Rgba};
//!
//! let (root, terminal) = backend::open_default()?;
//! let (master, children) = layout::mount(root, Grid::with_rows(vec![2, 1]));
//! for child in children {
//!     std::thread::spawn(move || {
//!         while let Some(event) = child.next_event() {
//!             if let Event::Resize(r) = event {
//!                 let _ = child.draw(move |canvas| canvas.fill(r, Rgba::WHITE));
//!             }
//!         }
//!     });
//! }
//! // ... wait for a close event on `master`, then:
//! master.close();
//! terminal.wait();
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod backend;
pub mod buffer;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod event;
pub mod layer;
pub mod layout;
pub mod mux;

// Re-exports for convenience
pub use buffer::{Canvas, Rgba};
pub use dispatch::Dispatch;
pub use env::{DrawCommand, Env, Host};
pub use error::{DispatchError, EnvError, LayerError, LayoutError};
pub use event::{Event, Key, Modifiers, MouseButton};
pub use layer::{EnvSurface, LayerId, LayerList, Surface};
pub use layout::{even_split, BoxLayout, Grid, Layout, Point, Rect, Scroller};
pub use mux::{Mux, MuxConfig};
