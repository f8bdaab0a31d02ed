//! Error types for the environment engine.

use crate::layer::LayerId;
use thiserror::Error;

/// Errors from sending into an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnvError {
    /// The other side of the channel has gone away.
    #[error("environment closed")]
    Closed,
}

/// Axis along which a layout ran out of space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// Layout configuration errors, surfaced instead of clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Gaps, margins and borders leave no room for the children.
    #[error("no space left along {axis} after gaps and margins ({available})")]
    NonPositiveSpace {
        /// Axis that ran out.
        axis: Axis,
        /// Length left over for the children.
        available: i32,
    },

    /// A scroller was configured with a child length below one.
    #[error("child length must be positive, got {0}")]
    NonPositiveChildLength(i32),
}

impl LayoutError {
    /// Creates a space error.
    pub const fn space(axis: Axis, available: i32) -> Self {
        Self::NonPositiveSpace { axis, available }
    }
}

/// Errors from parsing the remaining segments of an event path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A segment did not parse as the requested type.
    #[error("bad field {index} in event path: {field:?}")]
    BadField {
        /// Position of the segment.
        index: usize,
        /// The offending segment.
        field: String,
    },
}

/// Errors from addressing layers in a [`LayerList`](crate::layer::LayerList).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayerError {
    /// No layer with this id is in the list.
    #[error("unknown layer {0}")]
    Unknown(LayerId),
}
