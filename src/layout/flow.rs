//! Flow layouts: a single row ([`BoxLayout`]) and rows of columns ([`Grid`]).

use super::rect::Rect;
use super::split::{even_split, SplitFn};
use super::{background_of, Layout};
use crate::buffer::{Canvas, Rgba};
use crate::env::DrawCommand;
use crate::error::{Axis, LayoutError};
use tracing::warn;

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Children laid out one after another along a single axis.
#[derive(Debug, Clone)]
pub struct BoxLayout {
    /// Number of children.
    pub children: usize,
    /// Background color, painted over the whole box.
    pub background: Rgba,
    /// How the main axis is divided among the children.
    pub split: SplitFn,
    /// Gap between children and around the edges.
    pub gap: i32,
    /// Stack children top to bottom instead of left to right.
    pub vertical: bool,
}

impl Default for BoxLayout {
    fn default() -> Self {
        Self {
            children: 0,
            background: Rgba::BLACK,
            split: even_split,
            gap: 0,
            vertical: false,
        }
    }
}

impl BoxLayout {
    /// A horizontal box with `children` children.
    pub fn row(children: usize) -> Self {
        Self {
            children,
            ..Self::default()
        }
    }

    /// A vertical box with `children` children.
    pub fn column(children: usize) -> Self {
        Self {
            children,
            vertical: true,
            ..Self::default()
        }
    }
}

impl Layout for BoxLayout {
    fn child_count(&self) -> usize {
        self.children
    }

    fn partition(&self, bounds: Rect) -> Result<Vec<Rect>, LayoutError> {
        let k = self.children;
        if k == 0 {
            return Ok(Vec::new());
        }
        let gap = self.gap;
        let (main_axis, cross_axis, main_len, cross_len) = if self.vertical {
            (Axis::Y, Axis::X, bounds.height, bounds.width)
        } else {
            (Axis::X, Axis::Y, bounds.width, bounds.height)
        };

        let available = main_len - gap * (count(k) + 1);
        if available <= 0 {
            return Err(LayoutError::space(main_axis, available));
        }
        let cross = cross_len - 2 * gap;
        if cross <= 0 {
            return Err(LayoutError::space(cross_axis, cross));
        }

        let mut ret = Vec::with_capacity(k);
        if self.vertical {
            let mut y = bounds.y + gap;
            for len in (self.split)(k, available) {
                ret.push(Rect::new(bounds.x + gap, y, cross, len));
                y += len + gap;
            }
        } else {
            let mut x = bounds.x + gap;
            for len in (self.split)(k, available) {
                ret.push(Rect::new(x, bounds.y + gap, len, cross));
                x += len + gap;
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
}

/// A grid of rows, each row with its own number of columns.
///
/// Rows are spread along Y and columns along X; `flip` swaps the axes.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Number of children in each row.
    pub rows: Vec<usize>,
    /// Background color.
    pub background: Rgba,
    /// Gap between cells and around the edges.
    pub gap: i32,
    /// How each row's length is divided among its columns.
    pub split: SplitFn,
    /// How the grid's length is divided among the rows.
    pub split_rows: SplitFn,
    /// Extra space around the whole grid.
    pub margin: i32,
    /// Width of the frame painted around the grid.
    pub border: i32,
    /// Frame color.
    pub border_color: Rgba,
    /// Spread rows along X and columns along Y.
    pub flip: bool,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            background: Rgba::BLACK,
            gap: 0,
            split: even_split,
            split_rows: even_split,
            margin: 0,
            border: 0,
            border_color: Rgba::BLACK,
            flip: false,
        }
    }
}

impl Grid {
    /// A grid with the given row shape and default styling.
    pub fn with_rows(rows: Vec<usize>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }
}

impl Layout for Grid {
    fn child_count(&self) -> usize {
        self.rows.iter().sum()
    }

    fn partition(&self, bounds: Rect) -> Result<Vec<Rect>, LayoutError> {
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }
        let gap = self.gap;
        let margin = self.margin;
        if margin + gap < self.border {
            warn!(border = self.border, "grid border overlaps its children");
        }

        let (row_axis, col_axis, width, height, min_x, min_y) = if self.flip {
            (Axis::X, Axis::Y, bounds.height, bounds.width, bounds.y, bounds.x)
        } else {
            (Axis::Y, Axis::X, bounds.width, bounds.height, bounds.x, bounds.y)
        };

        let available_rows = height - gap * (count(self.rows.len()) + 1) - margin * 2;
        if available_rows <= 0 {
            return Err(LayoutError::space(row_axis, available_rows));
        }
        let heights = (self.split_rows)(self.rows.len(), available_rows);

        let mut ret = Vec::with_capacity(self.child_count());
        let mut y = min_y + margin + gap;
        for (&cols, h) in self.rows.iter().zip(heights) {
            if cols > 0 {
                let available_cols = width - gap * (count(cols) + 1) - margin * 2;
                if available_cols <= 0 {
                    return Err(LayoutError::space(col_axis, available_cols));
                }
                let mut x = min_x + margin + gap;
                for w in (self.split)(cols, available_cols) {
                    ret.push(if self.flip {
                        Rect::new(y, x, h, w)
                    } else {
                        Rect::new(x, y, w, h)
                    });
                    x += w + gap;
                }
            }
            y += h + gap;
        }
        Ok(ret)
    }

    fn redraw(&self, canvas: &mut Canvas, bounds: Rect) {
        if self.border > 0 {
            canvas.fill(bounds, self.border_color);
        }
        canvas.fill(bounds.inset(self.border.max(0)), self.background);
    }

    fn background(&self, bounds: Rect) -> DrawCommand {
        background_of(self, bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Point;

    #[test]
    fn test_single_cell_grid_is_identity() {
        let r = Rect::new(7, 3, 120, 45);
        let grid = Grid::with_rows(vec![1]);
        assert_eq!(grid.partition(r).unwrap(), vec![r]);
    }

    #[test]
    fn test_grid_rows_of_different_lengths() {
        let grid = Grid {
            rows: vec![1, 2],
            gap: 2,
            ..Grid::default()
        };
        assert_eq!(grid.child_count(), 3);
        let rects = grid.partition(Rect::from_size(20, 12)).unwrap();
        // Rows get (12 - 3*2) = 6 split as [3, 3].
        assert_eq!(rects[0], Rect::new(2, 2, 16, 3));
        // Second row: 20 - 3*2 = 14 split as [7, 7].
        assert_eq!(rects[1], Rect::new(2, 7, 7, 3));
        assert_eq!(rects[2], Rect::new(11, 7, 7, 3));
    }

    #[test]
    fn test_grid_flip_swaps_axes() {
        let grid = Grid {
            rows: vec![2],
            flip: true,
            ..Grid::default()
        };
        let rects = grid.partition(Rect::from_size(10, 8)).unwrap();
        assert_eq!(rects, vec![Rect::new(0, 0, 10, 4), Rect::new(0, 4, 10, 4)]);
    }

    #[test]
    fn test_grid_margin() {
        let grid = Grid {
            rows: vec![1],
            margin: 3,
            ..Grid::default()
        };
        let rects = grid.partition(Rect::from_size(10, 10)).unwrap();
        assert_eq!(rects, vec![Rect::new(3, 3, 4, 4)]);
    }

    #[test]
    fn test_grid_without_space_is_an_error() {
        let grid = Grid {
            rows: vec![3],
            gap: 5,
            ..Grid::default()
        };
        assert_eq!(
            grid.partition(Rect::from_size(18, 100)),
            Err(LayoutError::space(Axis::X, -2))
        );
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::default();
        assert_eq!(grid.child_count(), 0);
        assert!(grid.partition(Rect::from_size(10, 10)).unwrap().is_empty());
    }

    #[test]
    fn test_grid_redraw_paints_border_then_background() {
        let grid = Grid {
            rows: vec![1],
            border: 1,
            border_color: Rgba::WHITE,
            background: Rgba::rgb(1, 2, 3),
            ..Grid::default()
        };
        let bounds = Rect::from_size(4, 4);
        let mut canvas = Canvas::new(bounds);
        let dirty = grid.background(bounds)(&mut canvas);
        assert_eq!(dirty, bounds);
        assert_eq!(canvas.get(Point::new(0, 0)), Some(Rgba::WHITE));
        assert_eq!(canvas.get(Point::new(1, 1)), Some(Rgba::rgb(1, 2, 3)));
    }

    #[test]
    fn test_box_row() {
        let b = BoxLayout {
            gap: 1,
            ..BoxLayout::row(3)
        };
        let rects = b.partition(Rect::from_size(14, 5)).unwrap();
        // 14 - 4 = 10 -> [4, 3, 3]
        assert_eq!(
            rects,
            vec![
                Rect::new(1, 1, 4, 3),
                Rect::new(6, 1, 3, 3),
                Rect::new(10, 1, 3, 3),
            ]
        );
    }

    #[test]
    fn test_box_column() {
        let b = BoxLayout::column(2);
        let rects = b.partition(Rect::new(5, 5, 4, 9)).unwrap();
        assert_eq!(rects, vec![Rect::new(5, 5, 4, 5), Rect::new(5, 10, 4, 4)]);
    }

    #[test]
    fn test_box_zero_children() {
        let b = BoxLayout::row(0);
        assert!(b.partition(Rect::ZERO).unwrap().is_empty());
    }

    #[test]
    fn test_box_gap_consumes_everything() {
        let b = BoxLayout {
            gap: 5,
            ..BoxLayout::row(1)
        };
        assert_eq!(
            b.partition(Rect::from_size(10, 20)),
            Err(LayoutError::space(Axis::X, 0))
        );
    }

    #[test]
    fn test_custom_split() {
        fn first_takes_all(k: usize, len: i32) -> Vec<i32> {
            let mut v = vec![0; k];
            if let Some(first) = v.first_mut() {
                *first = len;
            }
            v
        }
        let b = BoxLayout {
            split: first_takes_all,
            ..BoxLayout::row(2)
        };
        let rects = b.partition(Rect::from_size(10, 2)).unwrap();
        assert_eq!(rects[0], Rect::new(0, 0, 10, 2));
        assert_eq!(rects[1].width, 0);
    }
}
