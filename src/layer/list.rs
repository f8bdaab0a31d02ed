//! Z-ordered layers over one destination surface.

use super::surface::Surface;
use crate::buffer::Canvas;
use crate::dispatch::{self, Dispatch, SEP};
use crate::error::LayerError;
use crate::event::Event;
use crate::layout::Rect;
use tracing::warn;

/// Identifies a layer within its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u64);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One layer: a full-size transparent raster with its own dispatch trie.
#[derive(Debug)]
pub struct Layer {
    id: LayerId,
    dispatch: Dispatch,
    canvas: Canvas,
}

impl Layer {
    /// The layer's id.
    pub const fn id(&self) -> LayerId {
        self.id
    }

    /// The layer's handlers.
    pub const fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// The layer's raster.
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The layer's raster, for drawing.
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }
}

/// Layers stacked over a destination surface.
///
/// Events go to the list's own handlers first, then to the layers from the
/// top down; the first consumer wins. A `resize/x0/y0/x1/y1` path also
/// reallocates the destination and every layer before any handler runs.
/// Flushing composites the layers from the bottom up.
pub struct LayerList {
    dispatch: Dispatch,
    /// Bottom to top.
    layers: Vec<Layer>,
    destination: Option<Box<dyn Surface>>,
    bounds: Rect,
    next_id: u64,
}

impl Default for LayerList {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerList {
    /// An empty list with no destination.
    pub fn new() -> Self {
        Self {
            dispatch: Dispatch::new(),
            layers: Vec::new(),
            destination: None,
            bounds: Rect::ZERO,
            next_id: 1,
        }
    }

    /// An empty list flushing into `destination`.
    pub fn with_destination(destination: Box<dyn Surface>) -> Self {
        let mut list = Self::new();
        list.set_destination(destination);
        list
    }

    /// Replace the destination, reallocating every layer to its bounds.
    pub fn set_destination(&mut self, mut destination: Box<dyn Surface>) {
        let bounds = destination.canvas().bounds();
        self.destination = Some(destination);
        self.reallocate(bounds);
    }

    /// The destination surface, if set.
    pub fn destination_mut(&mut self) -> Option<&mut (dyn Surface + 'static)> {
        self.destination.as_deref_mut()
    }

    /// Resize the destination and every layer, keeping overlapping pixels.
    pub fn resize(&mut self, bounds: Rect) {
        if let Some(destination) = self.destination.as_deref_mut() {
            destination.resize(bounds);
        }
        self.reallocate(bounds);
    }

    fn reallocate(&mut self, bounds: Rect) {
        self.bounds = bounds;
        for layer in &mut self.layers {
            layer.canvas = layer.canvas.resized(bounds);
        }
    }

    /// Area covered by every layer.
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the list has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer ids from the top down.
    pub fn ids(&self) -> Vec<LayerId> {
        self.layers.iter().rev().map(Layer::id).collect()
    }

    /// Add a transparent layer on top.
    pub fn push(&mut self) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.push(Layer {
            id,
            dispatch: Dispatch::new(),
            canvas: Canvas::new(self.bounds),
        });
        id
    }

    fn position(&self, id: LayerId) -> Result<usize, LayerError> {
        self.layers
            .iter()
            .position(|layer| layer.id == id)
            .ok_or(LayerError::Unknown(id))
    }

    /// Take a layer out of the list.
    pub fn remove(&mut self, id: LayerId) -> Result<Layer, LayerError> {
        let pos = self.position(id)?;
        Ok(self.layers.remove(pos))
    }

    /// Move a layer to the top.
    pub fn raise(&mut self, id: LayerId) -> Result<(), LayerError> {
        let pos = self.position(id)?;
        let layer = self.layers.remove(pos);
        self.layers.push(layer);
        Ok(())
    }

    /// Look up a layer.
    pub fn layer(&self, id: LayerId) -> Result<&Layer, LayerError> {
        let pos = self.position(id)?;
        Ok(&self.layers[pos])
    }

    /// Look up a layer for drawing.
    pub fn layer_mut(&mut self, id: LayerId) -> Result<&mut Layer, LayerError> {
        let pos = self.position(id)?;
        Ok(&mut self.layers[pos])
    }

    /// The list's own handlers, consulted before any layer's.
    pub const fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Deliver an event path. Returns whether anything consumed it.
    pub fn happen(&mut self, path: &str) -> bool {
        if let Some(rest) = path.strip_prefix("resize").and_then(|r| r.strip_prefix(SEP)) {
            match dispatch::fields::<i32>(rest).as_deref() {
                Ok(&[x0, y0, x1, y1]) => self.resize(Rect::from_corners(x0, y0, x1, y1)),
                Ok(other) => warn!(fields = other.len(), "resize path needs four fields"),
                Err(err) => warn!(%err, path, "bad resize path"),
            }
        }
        self.dispatch.happen(path) || self.layers.iter().rev().any(|layer| layer.dispatch.happen(path))
    }

    /// Deliver a typed event.
    pub fn happen_event(&mut self, event: &Event) -> bool {
        self.happen(&event.path())
    }

    /// Composite every layer within `dirty` into the destination and flush it.
    ///
    /// # Panics
    ///
    /// Panics if no destination is set.
    pub fn flush(&mut self, dirty: Rect) {
        let Some(destination) = self.destination.as_deref_mut() else {
            panic!("layer list flushed without a destination");
        };
        let canvas = destination.canvas();
        canvas.clear(dirty);
        for layer in &self.layers {
            canvas.blend_from(&layer.canvas, dirty);
        }
        destination.flush(dirty);
    }
}

impl std::fmt::Debug for LayerList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerList")
            .field("bounds", &self.bounds)
            .field("layers", &self.ids())
            .field("has_destination", &self.destination.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgba;
    use crate::layout::Point;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// A surface that records its flushes.
    struct Recording {
        canvas: Canvas,
        flushed: Arc<Mutex<Vec<Rect>>>,
    }

    impl Surface for Recording {
        fn canvas(&mut self) -> &mut Canvas {
            &mut self.canvas
        }

        fn flush(&mut self, dirty: Rect) {
            self.flushed.lock().push(dirty);
        }
    }

    fn list(bounds: Rect) -> (LayerList, Arc<Mutex<Vec<Rect>>>) {
        let flushed = Arc::new(Mutex::new(Vec::new()));
        let surface = Recording {
            canvas: Canvas::filled(bounds, Rgba::rgb(9, 9, 9)),
            flushed: Arc::clone(&flushed),
        };
        (LayerList::with_destination(Box::new(surface)), flushed)
    }

    fn pixel(list: &mut LayerList, p: Point) -> Option<Rgba> {
        list.destination_mut().and_then(|d| d.canvas().get(p))
    }

    #[test]
    fn test_flush_composites_bottom_to_top() {
        let bounds = Rect::from_size(4, 4);
        let (mut layers, flushed) = list(bounds);
        let bottom = layers.push();
        let top = layers.push();
        layers.layer_mut(bottom).unwrap().canvas_mut().fill(bounds, Rgba::rgb(255, 0, 0));
        layers
            .layer_mut(top)
            .unwrap()
            .canvas_mut()
            .fill(Rect::new(0, 0, 2, 2), Rgba::rgb(0, 0, 255));

        let dirty = Rect::new(0, 0, 3, 3);
        layers.flush(dirty);
        assert_eq!(*flushed.lock(), vec![dirty]);
        assert_eq!(pixel(&mut layers, Point::new(1, 1)), Some(Rgba::rgb(0, 0, 255)));
        assert_eq!(pixel(&mut layers, Point::new(2, 2)), Some(Rgba::rgb(255, 0, 0)));
        // Outside the dirty rectangle the destination is untouched.
        assert_eq!(pixel(&mut layers, Point::new(3, 3)), Some(Rgba::rgb(9, 9, 9)));

        layers.raise(bottom).unwrap();
        layers.flush(dirty);
        assert_eq!(pixel(&mut layers, Point::new(1, 1)), Some(Rgba::rgb(255, 0, 0)));
    }

    #[test]
    fn test_flush_clears_dirty_first() {
        let bounds = Rect::from_size(2, 2);
        let (mut layers, _) = list(bounds);
        layers.flush(bounds);
        assert_eq!(pixel(&mut layers, Point::new(0, 0)), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_happen_list_first_then_top_down() {
        let (mut layers, _) = list(Rect::from_size(2, 2));
        let log = Arc::new(Mutex::new(Vec::new()));
        let bottom = layers.push();
        let top = layers.push();

        for (id, tag, consume) in [(bottom, "bottom", true), (top, "top", false)] {
            let log = Arc::clone(&log);
            layers.layer(id).unwrap().dispatch().on("mo", move |_| {
                log.lock().push(tag);
                consume
            });
        }
        {
            let log = Arc::clone(&log);
            layers.dispatch().on("", move |_| {
                log.lock().push("list");
                false
            });
        }

        assert!(layers.happen("mo/down/1/1/left"));
        assert_eq!(*log.lock(), vec!["list", "top", "bottom"]);

        log.lock().clear();
        assert!(!layers.happen("kb/type/97"));
        assert_eq!(*log.lock(), vec!["list"]);
    }

    #[test]
    fn test_resize_event_reallocates_every_layer() {
        let (mut layers, _) = list(Rect::from_size(4, 4));
        let ids = [layers.push(), layers.push()];
        layers.layer_mut(ids[0]).unwrap().canvas_mut().set(Point::new(1, 1), Rgba::WHITE);

        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            layers.dispatch().on("resize", move |rest| {
                seen.lock().push(rest.to_string());
                false
            });
        }

        assert!(!layers.happen("resize/0/0/9/6"));
        let bounds = Rect::from_corners(0, 0, 9, 6);
        assert_eq!(layers.bounds(), bounds);
        for id in ids {
            assert_eq!(layers.layer(id).unwrap().canvas().bounds(), bounds);
        }
        assert_eq!(layers.layer(ids[0]).unwrap().canvas().get(Point::new(1, 1)), Some(Rgba::WHITE));
        assert_eq!(layers.destination_mut().unwrap().canvas().bounds(), bounds);
        assert_eq!(*seen.lock(), vec!["0/0/9/6".to_string()]);

        let r = Rect::new(2, 3, 5, 5);
        assert!(!layers.happen_event(&Event::Resize(r)));
        assert_eq!(layers.layer(ids[1]).unwrap().canvas().bounds(), r);

        // Malformed paths still reach handlers but leave the sizes alone.
        assert!(!layers.happen("resize/1/2"));
        assert_eq!(layers.bounds(), r);
    }

    #[test]
    fn test_unknown_layer() {
        let (mut layers, _) = list(Rect::from_size(2, 2));
        let id = layers.push();
        layers.remove(id).unwrap();
        assert_eq!(layers.raise(id), Err(LayerError::Unknown(id)));
        assert!(layers.layer(id).is_err());
        assert!(layers.is_empty());
    }

    #[test]
    fn test_new_destination_reallocates_layers() {
        let mut layers = LayerList::new();
        let id = layers.push();
        assert_eq!(layers.layer(id).unwrap().canvas().bounds(), Rect::ZERO);

        let flushed = Arc::new(Mutex::new(Vec::new()));
        layers.set_destination(Box::new(Recording {
            canvas: Canvas::new(Rect::from_size(5, 2)),
            flushed,
        }));
        assert_eq!(layers.layer(id).unwrap().canvas().bounds(), Rect::from_size(5, 2));

        layers.layer_mut(id).unwrap().canvas_mut().set(Point::new(1, 1), Rgba::WHITE);
        layers.resize(Rect::from_size(8, 8));
        let canvas = layers.layer(id).unwrap().canvas();
        assert_eq!(canvas.bounds(), Rect::from_size(8, 8));
        assert_eq!(canvas.get(Point::new(1, 1)), Some(Rgba::WHITE));
    }

    #[test]
    #[should_panic(expected = "without a destination")]
    fn test_flush_without_destination_panics() {
        let mut layers = LayerList::new();
        layers.push();
        layers.flush(Rect::from_size(1, 1));
    }
}
