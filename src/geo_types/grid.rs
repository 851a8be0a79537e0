use crate::errors::{HatchError, Result};
use geo_types::{coord, Coord, Polygon, Rect};

/// Index of a cell corner. Corners are enumerated counter-clockwise starting
/// at the bottom-left, the same order the cell polygon's exterior ring uses.
pub const BOTTOM_LEFT: usize = 0;
pub const BOTTOM_RIGHT: usize = 1;
pub const TOP_RIGHT: usize = 2;
pub const TOP_LEFT: usize = 3;

/// One square cell of a [`SquareGrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub column: usize,
    pub row: usize,
    pub corners: [Coord<f64>; 4],
}

impl Cell {
    pub fn corner(&self, index: usize) -> Coord<f64> {
        self.corners[index % 4]
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        let mut ring = self.corners.to_vec();
        ring.push(self.corners[BOTTOM_LEFT]);
        Polygon::new(ring.into(), vec![])
    }
}

/// # SquareGrid
/// A regular grid of square cells with side `scale`, anchored at the minimum
/// corner of a bounding box and extended until it covers the whole box. Always
/// at least one cell in each direction, even for a zero-width box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareGrid {
    origin: Coord<f64>,
    scale: f64,
    columns: usize,
    rows: usize,
}

impl SquareGrid {
    pub fn covering(bbox: &Rect<f64>, scale: f64) -> Result<SquareGrid> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(HatchError::InvalidScale(scale));
        }
        let min = bbox.min();
        if !min.x.is_finite() || !min.y.is_finite() {
            return Err(HatchError::EmptyRegion);
        }
        let span = |extent: f64| ((extent / scale).ceil() as usize).max(1);
        Ok(SquareGrid {
            origin: min,
            scale,
            columns: span(bbox.width()),
            rows: span(bbox.height()),
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    /// The area actually covered by the grid, which may overhang the box it
    /// was built for on the top and right.
    pub fn extent(&self) -> Rect<f64> {
        Rect::new(
            self.origin,
            coord! {
                x: self.origin.x + self.columns as f64 * self.scale,
                y: self.origin.y + self.rows as f64 * self.scale,
            },
        )
    }

    pub fn cell(&self, column: usize, row: usize) -> Cell {
        // Multiply rather than accumulate so neighbouring cells share exact corners.
        let x0 = self.origin.x + column as f64 * self.scale;
        let x1 = self.origin.x + (column + 1) as f64 * self.scale;
        let y0 = self.origin.y + row as f64 * self.scale;
        let y1 = self.origin.y + (row + 1) as f64 * self.scale;
        Cell {
            column,
            row,
            corners: [
                coord! {x: x0, y: y0},
                coord! {x: x1, y: y0},
                coord! {x: x1, y: y1},
                coord! {x: x0, y: y1},
            ],
        }
    }

    /// Cells in row-major order, bottom row first.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |column| self.cell(column, row)))
    }
}
