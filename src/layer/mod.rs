//! Layers: z-ordered rasters composited into one surface.
//!
//! A [`LayerList`] stacks transparent, full-size layers. Each layer has its
//! own [`Dispatch`](crate::dispatch::Dispatch) trie so overlays (menus,
//! dialogs, tooltips) can take input before what lies beneath them.
//!
//! ```text
//!   happen ──▶ list trie ──▶ top layer ──▶ ... ──▶ bottom layer
//!   flush  ◀── bottom layer ◀── ... ◀── top layer   (source-over)
//! ```

mod list;
mod surface;

pub use list::{Layer, LayerId, LayerList};
pub use surface::{EnvSurface, Surface};
