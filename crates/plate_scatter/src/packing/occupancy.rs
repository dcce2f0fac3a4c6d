//! Overlap queries for disc placement.
//!
//! Two strategies implement [`OccupancyIndex`]:
//! - [`GridOccupancy`] marks the cells touched by each disc's bounding box and rejects any
//!   candidate whose box touches a marked cell. It may reject discs that would fit, but never
//!   accepts one that overlaps.
//! - [`ExactOccupancy`] keeps every placed disc and runs the exact pairwise distance test.
use crate::packing::{discs_overlap, PackedSet};

/// Answers "is this disc free?" and records it when it is.
pub trait OccupancyIndex: Send {
    /// Records the disc and returns `true` iff it overlaps no previously reserved disc.
    /// Records nothing when it returns `false`.
    fn try_reserve(&mut self, x: i32, y: i32, radius: u32) -> bool;

    /// Number of reserved discs.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Selects an [`OccupancyIndex`] implementation by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OccupancyStrategy {
    /// Conservative cell grid with the given cell size in pixels.
    Grid { cell_size: u32 },
    /// Exact pairwise distance test.
    Exact,
}

impl Default for OccupancyStrategy {
    fn default() -> Self {
        OccupancyStrategy::Grid {
            cell_size: GridOccupancy::DEFAULT_CELL_SIZE,
        }
    }
}

impl OccupancyStrategy {
    /// Builds an empty index for a square canvas of `side` pixels.
    pub fn build(&self, side: u32) -> Box<dyn OccupancyIndex> {
        match *self {
            OccupancyStrategy::Grid { cell_size } => Box::new(GridOccupancy::new(side, cell_size)),
            OccupancyStrategy::Exact => Box::new(ExactOccupancy::new()),
        }
    }

    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            OccupancyStrategy::Grid { .. } => "grid",
            OccupancyStrategy::Exact => "exact",
        }
    }
}

/// Cell grid over the canvas. A cell is marked once any reserved disc's bounding box
/// touches it.
#[derive(Debug, Clone)]
pub struct GridOccupancy {
    cell_size: u32,
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
    reserved: usize,
}

impl GridOccupancy {
    /// Matches the smallest default radius class.
    pub const DEFAULT_CELL_SIZE: u32 = 5;

    /// Creates an empty grid covering a `side` × `side` canvas. A `cell_size` of zero is
    /// treated as one pixel.
    pub fn new(side: u32, cell_size: u32) -> Self {
        let cell_size = cell_size.max(1);
        let cols = side.div_ceil(cell_size) as usize;
        Self {
            cell_size,
            cols,
            rows: cols,
            cells: vec![false; cols * cols],
            reserved: 0,
        }
    }

    /// Rebuilds the grid from already placed discs.
    pub fn rebuild(side: u32, cell_size: u32, discs: &PackedSet) -> Self {
        let mut grid = Self::new(side, cell_size);
        for d in discs {
            grid.mark(d.x, d.y, d.radius);
            grid.reserved += 1;
        }
        grid
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Grid size as `(cols, rows)`.
    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Returns whether the cell at `(col, row)` is marked. Out-of-range cells read as free.
    pub fn is_marked(&self, col: usize, row: usize) -> bool {
        if col >= self.cols || row >= self.rows {
            return false;
        }
        self.cells[row * self.cols + col]
    }

    /// Inclusive cell ranges touched by the disc's bounding box, clipped to the grid.
    fn span(&self, x: i32, y: i32, radius: u32) -> Option<(usize, usize, usize, usize)> {
        let u = self.cell_size as i64;
        let r = radius as i64;
        let clip = |lo: i64, hi: i64, n: usize| -> Option<(usize, usize)> {
            let lo = lo.div_euclid(u).max(0);
            let hi = hi.div_euclid(u).min(n as i64 - 1);
            (lo <= hi).then_some((lo as usize, hi as usize))
        };
        let (x0, x1) = clip(x as i64 - r, x as i64 + r, self.cols)?;
        let (y0, y1) = clip(y as i64 - r, y as i64 + r, self.rows)?;
        Some((x0, x1, y0, y1))
    }

    fn is_free(&self, x: i32, y: i32, radius: u32) -> bool {
        let Some((x0, x1, y0, y1)) = self.span(x, y, radius) else {
            return true;
        };
        (y0..=y1).all(|row| {
            let base = row * self.cols;
            self.cells[base + x0..=base + x1].iter().all(|c| !*c)
        })
    }

    fn mark(&mut self, x: i32, y: i32, radius: u32) {
        let Some((x0, x1, y0, y1)) = self.span(x, y, radius) else {
            return;
        };
        for row in y0..=y1 {
            let base = row * self.cols;
            self.cells[base + x0..=base + x1].fill(true);
        }
    }
}

impl OccupancyIndex for GridOccupancy {
    fn try_reserve(&mut self, x: i32, y: i32, radius: u32) -> bool {
        if !self.is_free(x, y, radius) {
            return false;
        }
        self.mark(x, y, radius);
        self.reserved += 1;
        true
    }

    fn len(&self) -> usize {
        self.reserved
    }
}

/// Literal list of reserved discs with an exact overlap test. Linear per query.
#[derive(Debug, Clone, Default)]
pub struct ExactOccupancy {
    discs: Vec<(i32, i32, u32)>,
}

impl ExactOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the index from already placed discs.
    pub fn rebuild(discs: &PackedSet) -> Self {
        Self {
            discs: discs.iter().map(|d| (d.x, d.y, d.radius)).collect(),
        }
    }
}

impl OccupancyIndex for ExactOccupancy {
    fn try_reserve(&mut self, x: i32, y: i32, radius: u32) -> bool {
        let candidate = (x, y, radius);
        if self.discs.iter().any(|d| discs_overlap(*d, candidate)) {
            return false;
        }
        self.discs.push(candidate);
        true
    }

    fn len(&self) -> usize {
        self.discs.len()
    }
}
