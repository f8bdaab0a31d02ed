//! Scroller: a virtual stack of fixed-length children behind a viewport.

use super::rect::Rect;
use super::{background_of, Layout};
use crate::buffer::{Canvas, Rgba};
use crate::env::DrawCommand;
use crate::error::{Axis, LayoutError};
use crate::event::Event;

/// Children stacked along one axis, each `child_length` long, scrolled by
/// the mouse wheel.
///
/// The offset stays within `[min(0, viewport - content), 0]`. Children
/// outside the viewport still get rectangles; their drawing is clipped to
/// the scroller's area.
#[derive(Debug, Clone)]
pub struct Scroller {
    /// Number of children.
    pub children: usize,
    /// Background color.
    pub background: Rgba,
    /// Length of each child along the scroll axis.
    pub child_length: i32,
    /// Gap between children and around the edges.
    pub gap: i32,
    /// Scroll left/right instead of up/down.
    pub horizontal: bool,
    /// Current scroll offset (zero or negative).
    pub offset: i32,
    /// Distance moved per wheel step.
    pub scroll_step: i32,
}

impl Default for Scroller {
    fn default() -> Self {
        Self {
            children: 0,
            background: Rgba::BLACK,
            child_length: 1,
            gap: 0,
            horizontal: false,
            offset: 0,
            scroll_step: 16,
        }
    }
}

impl Scroller {
    /// A vertical scroller with `children` children of `child_length` each.
    pub fn new(children: usize, child_length: i32) -> Self {
        Self {
            children,
            child_length,
            ..Self::default()
        }
    }

    /// Total length of the stacked children, gaps included.
    pub fn content_length(&self) -> i32 {
        let n = i32::try_from(self.children).unwrap_or(i32::MAX);
        n.saturating_mul(self.child_length)
            .saturating_add((n + 1).saturating_mul(self.gap))
    }

    /// Length of the viewport along the scroll axis.
    const fn viewport_length(&self, bounds: Rect) -> i32 {
        if self.horizontal {
            bounds.width
        } else {
            bounds.height
        }
    }

    /// `offset` clamped to what the viewport allows.
    pub fn clamp_offset(&self, offset: i32, bounds: Rect) -> i32 {
        let lowest = (self.viewport_length(bounds) - self.content_length()).min(0);
        offset.clamp(lowest, 0)
    }
}

impl Layout for Scroller {
    fn child_count(&self) -> usize {
        self.children
    }

    fn partition(&self, bounds: Rect) -> Result<Vec<Rect>, LayoutError> {
        if self.child_length <= 0 {
            return Err(LayoutError::NonPositiveChildLength(self.child_length));
        }
        if self.children == 0 {
            return Ok(Vec::new());
        }
        let gap = self.gap;
        let (cross_axis, cross_len) = if self.horizontal {
            (Axis::Y, bounds.height)
        } else {
            (Axis::X, bounds.width)
        };
        let cross = cross_len - 2 * gap;
        if cross <= 0 {
            return Err(LayoutError::space(cross_axis, cross));
        }

        let offset = self.clamp_offset(self.offset, bounds);
        let mut ret = Vec::with_capacity(self.children);
        if self.horizontal {
            let mut x = bounds.x + offset + gap;
            for _ in 0..self.children {
                ret.push(Rect::new(x, bounds.y + gap, self.child_length, cross));
                x += self.child_length + gap;
            }
        } else {
            let mut y = bounds.y + offset + gap;
            for _ in 0..self.children {
                ret.push(Rect::new(bounds.x + gap, y, cross, self.child_length));
                y += self.child_length + gap;
            }
        }
        Ok(ret)
    }

    fn redraw(&self, canvas: &mut Canvas, bounds: Rect) {
        canvas.fill(bounds, self.background);
    }

    fn background(&self, bounds: Rect) -> DrawCommand {
        background_of(self, bounds)
    }

    fn handle_event(&mut self, event: &Event, bounds: Rect) -> bool {
        let Event::MouseScroll { at, delta } = event else {
            return false;
        };
        if !bounds.contains(*at) {
            return false;
        }
        let amount = if self.horizontal { delta.x } else { delta.y };
        let old = self.offset;
        self.offset = self.clamp_offset(
            self.offset.saturating_add(amount.saturating_mul(self.scroll_step)),
            bounds,
        );
        self.offset != old
    }

    fn clips_children(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Point;

    fn scroll(at: Point, dy: i32) -> Event {
        Event::MouseScroll {
            at,
            delta: Point::new(0, dy),
        }
    }

    #[test]
    fn test_partition_stacks_children() {
        let s = Scroller {
            gap: 2,
            ..Scroller::new(3, 10)
        };
        assert_eq!(s.content_length(), 38);
        let rects = s.partition(Rect::from_size(20, 100)).unwrap();
        assert_eq!(
            rects,
            vec![
                Rect::new(2, 2, 16, 10),
                Rect::new(2, 14, 16, 10),
                Rect::new(2, 26, 16, 10),
            ]
        );
    }

    #[test]
    fn test_wheel_inside_scrolls_and_clamps() {
        let mut s = Scroller {
            scroll_step: 10,
            ..Scroller::new(10, 10)
        };
        let bounds = Rect::from_size(20, 30);
        // Content is 100 long, viewport 30: offset lives in [-70, 0].
        assert!(!s.handle_event(&scroll(Point::new(5, 5), 1), bounds));
        assert_eq!(s.offset, 0);

        assert!(s.handle_event(&scroll(Point::new(5, 5), -3), bounds));
        assert_eq!(s.offset, -30);
        assert_eq!(s.partition(bounds).unwrap()[0], Rect::new(0, -30, 20, 10));

        assert!(s.handle_event(&scroll(Point::new(5, 5), -100), bounds));
        assert_eq!(s.offset, -70);
    }

    #[test]
    fn test_wheel_outside_is_ignored() {
        let mut s = Scroller::new(10, 10);
        let bounds = Rect::new(0, 0, 20, 30);
        assert!(!s.handle_event(&scroll(Point::new(25, 5), -1), bounds));
        assert!(!s.handle_event(&Event::WindowClose, bounds));
        assert_eq!(s.offset, 0);
    }

    #[test]
    fn test_short_content_never_scrolls() {
        let mut s = Scroller::new(2, 5);
        let bounds = Rect::from_size(10, 50);
        assert!(!s.handle_event(&scroll(Point::new(1, 1), -5), bounds));
        assert_eq!(s.offset, 0);
    }

    #[test]
    fn test_offset_reclamped_for_larger_viewport() {
        let s = Scroller {
            offset: -70,
            ..Scroller::new(10, 10)
        };
        // Viewport of 90 only allows -10.
        let rects = s.partition(Rect::from_size(20, 90)).unwrap();
        assert_eq!(rects[0].y, -10);
    }

    #[test]
    fn test_bad_configuration_is_surfaced() {
        let s = Scroller::new(3, 0);
        assert_eq!(
            s.partition(Rect::from_size(10, 10)),
            Err(LayoutError::NonPositiveChildLength(0))
        );
        let s = Scroller {
            gap: 5,
            ..Scroller::new(3, 4)
        };
        assert_eq!(
            s.partition(Rect::from_size(10, 10)),
            Err(LayoutError::space(Axis::X, 0))
        );
    }
}
