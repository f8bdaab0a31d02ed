//! Events and the unbounded channel that carries them.

mod channel;
#[allow(clippy::module_inception)]
mod event;

pub use channel::{channel, EventReceiver, EventSender};
pub use event::{join_path, Event, Key, Modifiers, MouseButton};
