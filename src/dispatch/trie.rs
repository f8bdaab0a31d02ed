//! The dispatch trie.

use super::SEP;
use crate::event::Event;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// A registered handler. Receives the path below its node and returns
/// whether it consumed the event.
pub type Handler = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Default)]
struct Node {
    handlers: Vec<Handler>,
    /// Created on first registration below this node.
    children: Option<HashMap<String, Arc<Dispatch>>>,
}

/// Routes path-shaped events to handlers registered by pattern.
///
/// Handlers on a node run in registration order before dispatch descends to
/// the child matching the next segment. The first handler to return `true`
/// stops everything.
///
/// Each node has its own lock. Handler lists are copied out before running,
/// so a handler may register more handlers.
#[derive(Default)]
pub struct Dispatch {
    node: Mutex<Node>,
}

impl Dispatch {
    /// An empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events whose path starts with `pattern`.
    ///
    /// An empty pattern registers at the root: the handler sees every event.
    pub fn on<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.register(pattern, Arc::new(handler));
    }

    fn register(&self, pattern: &str, handler: Handler) {
        if pattern.is_empty() {
            self.node.lock().handlers.push(handler);
            return;
        }
        let (head, tail) = pattern.split_once(SEP).unwrap_or((pattern, ""));
        let next = {
            let mut node = self.node.lock();
            let children = node.children.get_or_insert_with(HashMap::new);
            Arc::clone(children.entry(head.to_string()).or_default())
        };
        next.register(tail, handler);
    }

    /// Deliver an event path. Returns whether a handler consumed it.
    pub fn happen(&self, path: &str) -> bool {
        let handlers = self.node.lock().handlers.clone();
        if handlers.iter().any(|handler| handler(path)) {
            return true;
        }
        if path.is_empty() {
            return false;
        }

        let (head, tail) = path.split_once(SEP).unwrap_or((path, ""));
        let next = self
            .node
            .lock()
            .children
            .as_ref()
            .and_then(|children| children.get(head))
            .map(Arc::clone);
        next.is_some_and(|next| next.happen(tail))
    }

    /// Deliver a typed event by its path.
    pub fn happen_event(&self, event: &Event) -> bool {
        self.happen(&event.path())
    }

    /// Whether no handler is registered anywhere in the trie.
    pub fn is_empty(&self) -> bool {
        let node = self.node.lock();
        node.handlers.is_empty()
            && node
                .children
                .as_ref()
                .map_or(true, |children| children.values().all(|c| c.is_empty()))
    }
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.node.lock();
        let mut keys: Vec<&String> = node.children.iter().flat_map(HashMap::keys).collect();
        keys.sort();
        f.debug_struct("Dispatch")
            .field("handlers", &node.handlers.len())
            .field("children", &keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MouseButton;
    use crate::layout::Point;

    /// Records which handlers ran, in order.
    fn recorder() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn record(log: &Arc<Mutex<Vec<String>>>, tag: &'static str, consume: bool) -> impl Fn(&str) -> bool {
        let log = Arc::clone(log);
        move |rest: &str| {
            log.lock().push(format!("{tag}:{rest}"));
            consume
        }
    }

    #[test]
    fn test_shallower_runs_first_then_descends() {
        let d = Dispatch::new();
        let log = recorder();
        d.on("a/b", record(&log, "ab", false));
        d.on("a", record(&log, "a", false));
        d.on("", record(&log, "root", false));

        assert!(!d.happen("a/b/c"));
        assert_eq!(*log.lock(), vec!["root:a/b/c", "a:b/c", "ab:c"]);
    }

    #[test]
    fn test_consumed_stops_everything() {
        let d = Dispatch::new();
        let log = recorder();
        d.on("a/b", record(&log, "first", true));
        d.on("a/b", record(&log, "second", false));
        d.on("a/b/c", record(&log, "deeper", false));

        assert!(d.happen("a/b/c"));
        assert_eq!(*log.lock(), vec!["first:c"]);
    }

    #[test]
    fn test_missing_edge_stops() {
        let d = Dispatch::new();
        let log = recorder();
        d.on("mo/down", record(&log, "down", true));
        assert!(!d.happen("mo/up/1/2/left"));
        assert!(!d.happen(""));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_handler_may_register_while_running() {
        let d = Arc::new(Dispatch::new());
        let inner = Arc::clone(&d);
        d.on("kb", move |_| {
            inner.on("kb/down", |_| true);
            false
        });
        assert!(!d.happen("kb/up/a"));
        assert!(d.happen("kb/down/a"));
    }

    #[test]
    fn test_typed_event_path() {
        let d = Dispatch::new();
        let log = recorder();
        d.on("mo/down", record(&log, "down", true));
        let ev = Event::MouseDown {
            at: Point::new(3, 4),
            button: MouseButton::Left,
        };
        assert!(d.happen_event(&ev));
        assert_eq!(*log.lock(), vec!["down:3/4/left"]);
    }

    #[test]
    fn test_is_empty() {
        let d = Dispatch::new();
        assert!(d.is_empty());
        d.on("a/b", |_| false);
        assert!(!d.is_empty());
    }
}
