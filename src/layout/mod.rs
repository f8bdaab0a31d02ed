//! Layout module: partitioning a rectangle among child environments.
//!
//! A [`Layout`] is a pure function from the available rectangle to one
//! sub-rectangle per child, plus a background redraw that paints the gaps
//! and frames. A layout-aware [`Mux`](crate::mux::Mux) drives it: every
//! resize it receives is partitioned and each child gets its own share.
//!
//! Two families are provided:
//! - Flow: [`BoxLayout`] (one row or column) and [`Grid`] (rows of columns),
//!   dividing space with a pluggable [`SplitFn`].
//! - Scrolling: [`Scroller`], a fixed-pitch stack moved by the wheel.

mod flow;
mod rect;
mod scroller;
mod split;

pub use flow::{BoxLayout, Grid};
pub use rect::{Point, Rect};
pub use scroller::Scroller;
pub use split::{even_split, SplitFn};

use crate::buffer::Canvas;
use crate::env::{DrawCommand, Env};
use crate::error::LayoutError;
use crate::event::Event;
use crate::mux::{Mux, MuxConfig};

/// Divides a rectangle among a fixed number of children.
pub trait Layout: Send + 'static {
    /// Number of children this layout places.
    fn child_count(&self) -> usize;

    /// Split `bounds` into one rectangle per child, in child order.
    ///
    /// Returns an error when gaps, margins or borders leave no room.
    fn partition(&self, bounds: Rect) -> Result<Vec<Rect>, LayoutError>;

    /// Paint the background (gaps, frame) over `bounds`.
    fn redraw(&self, canvas: &mut Canvas, bounds: Rect);

    /// An owned draw command running [`Layout::redraw`] over `bounds`.
    fn background(&self, bounds: Rect) -> DrawCommand;

    /// Offer a non-resize event to the layout.
    ///
    /// `bounds` is the rectangle the layout was last given. Returning `true`
    /// asks the mux to lay its children out again with the same bounds.
    fn handle_event(&mut self, _event: &Event, _bounds: Rect) -> bool {
        false
    }

    /// Whether the children's drawing is clipped to the layout's bounds.
    fn clips_children(&self) -> bool {
        false
    }
}

/// Build a [`Layout::background`] command from a cloneable layout.
pub fn background_of<L: Layout + Clone>(layout: &L, bounds: Rect) -> DrawCommand {
    let layout = layout.clone();
    Box::new(move |canvas: &mut Canvas| {
        layout.redraw(canvas, bounds);
        bounds
    })
}

/// Lay out `parent` with `layout`.
///
/// Returns the master environment, which receives the parent's events
/// unchanged and tears everything down when its draw sink closes, and one
/// environment per child, in partition order.
pub fn mount<L: Layout>(parent: Env, layout: L) -> (Env, Vec<Env>) {
    mount_with_config(parent, layout, MuxConfig::default())
}

/// [`mount`] with an explicit mux configuration.
pub fn mount_with_config<L: Layout>(parent: Env, layout: L, config: MuxConfig) -> (Env, Vec<Env>) {
    let children = layout.child_count();
    let (_mux, master, envs) = Mux::build(parent, Some(Box::new(layout)), config, children);
    (master, envs)
}
