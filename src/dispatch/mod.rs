//! Pattern dispatch: routing event paths through a trie of handlers.
//!
//! Every [`Event`](crate::event::Event) renders to a path whose segments go
//! from general to specific:
//!
//! ```text
//! mo/down/12/7/left
//! └┬┘ └┬─┘ └──┬────┘
//!  │   │      └ fields, parsed with `fields`
//!  │   └ kind
//!  └ category
//! ```
//!
//! A handler registered on `mo/down` sees `12/7/left`; one on `mo` sees
//! `down/12/7/left`. Shallower handlers run first.

mod trie;

pub use trie::{Dispatch, Handler};

use crate::error::DispatchError;
use std::str::FromStr;

/// Path segment separator.
pub const SEP: char = '/';

/// Parse every remaining path segment as a `T`.
///
/// An empty path yields no fields.
pub fn fields<T: FromStr>(rest: &str) -> Result<Vec<T>, DispatchError> {
    if rest.is_empty() {
        return Ok(Vec::new());
    }
    rest.split(SEP)
        .enumerate()
        .map(|(index, field)| {
            field.parse().map_err(|_| DispatchError::BadField {
                index,
                field: field.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_parse() {
        assert_eq!(fields::<i32>("10/-20/30/40"), Ok(vec![10, -20, 30, 40]));
        assert_eq!(fields::<i32>(""), Ok(Vec::new()));
    }

    #[test]
    fn test_fields_report_bad_segment() {
        assert_eq!(
            fields::<i32>("1/left"),
            Err(DispatchError::BadField {
                index: 1,
                field: "left".to_string(),
            })
        );
    }
}
