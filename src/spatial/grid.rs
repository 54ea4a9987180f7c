//! Binary grid validation and the active-cell mask
//!
//! A [`Grid`] is an immutable H×W matrix of 0/1 values. [`GridMask`] flattens
//! its active cells into a bitset indexed by `row * cols + col` so that tile
//! footprints can be tested cell by cell.

use ndarray::Array2;

use crate::algorithm::bitset::IndexBitset;
use crate::io::configuration::MAX_GRID_DIMENSION;
use crate::io::error::{Result, invalid_grid};

/// Validated binary grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Array2<u8>,
}

impl Grid {
    /// Build a grid from row vectors
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are empty, ragged, exceed the dimension
    /// limit, or contain values other than 0 and 1
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(invalid_grid(&format!(
                "row {index} has {} cells, expected {width}",
                row.len()
            )));
        }

        let flat: Vec<u8> = rows.iter().flat_map(|row| row.iter().copied()).collect();
        let cells = Array2::from_shape_vec((height, width), flat)
            .map_err(|e| invalid_grid(&format!("cannot shape {height}x{width} grid: {e}")))?;

        Self::from_array(cells)
    }

    /// Wrap an existing matrix after validating it
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is empty, exceeds the dimension limit,
    /// or contains values other than 0 and 1
    pub fn from_array(cells: Array2<u8>) -> Result<Self> {
        let (rows, cols) = cells.dim();
        if rows == 0 || cols == 0 {
            return Err(invalid_grid(&format!(
                "grid must have at least one cell, got {rows}x{cols}"
            )));
        }
        if rows > MAX_GRID_DIMENSION || cols > MAX_GRID_DIMENSION {
            return Err(invalid_grid(&format!(
                "grid {rows}x{cols} exceeds the {MAX_GRID_DIMENSION} cell dimension limit"
            )));
        }
        if let Some(((row, col), value)) = cells.indexed_iter().find(|(_, v)| **v > 1) {
            return Err(invalid_grid(&format!(
                "cell ({row}, {col}) has value {value}, expected 0 or 1"
            )));
        }

        Ok(Self { cells })
    }

    /// Number of rows (H)
    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of columns (W)
    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// Whether the cell at (row, col) is active; out-of-bounds cells are not
    pub fn is_active(&self, row: usize, col: usize) -> bool {
        self.cells.get([row, col]).copied() == Some(1)
    }
}

/// Active cells of a grid as a flat bitset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMask {
    rows: usize,
    cols: usize,
    active: IndexBitset,
}

impl GridMask {
    /// Build the active-cell mask of a grid
    pub fn new(grid: &Grid) -> Self {
        let (rows, cols) = (grid.rows(), grid.cols());
        let mut active = IndexBitset::new(rows * cols);
        for row in 0..rows {
            for col in (0..cols).filter(|&col| grid.is_active(row, col)) {
                active.insert(row * cols + col);
            }
        }

        Self { rows, cols, active }
    }

    /// Number of rows
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Flat bit index of a cell
    pub const fn cell_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// All active cells
    pub const fn active(&self) -> &IndexBitset {
        &self.active
    }

    /// Total number of active cells
    pub fn active_count(&self) -> usize {
        self.active.count()
    }

    /// Cells covered by a `size`×`size` square anchored at (row, col)
    ///
    /// Returns `None` when the square leaves the grid.
    pub fn footprint(&self, row: usize, col: usize, size: usize) -> Option<IndexBitset> {
        if size == 0 || row + size > self.rows || col + size > self.cols {
            return None;
        }

        let mut mask = IndexBitset::new(self.rows * self.cols);
        for r in row..row + size {
            for c in col..col + size {
                mask.insert(self.cell_index(r, c));
            }
        }
        Some(mask)
    }

    /// Whether every cell of the square anchored at (row, col) is active
    pub fn is_square_active(&self, row: usize, col: usize, size: usize) -> bool {
        if size == 0 || row + size > self.rows || col + size > self.cols {
            return false;
        }

        (row..row + size)
            .all(|r| (col..col + size).all(|c| self.active.contains(self.cell_index(r, c))))
    }

    /// Whether any `size`×`size` square of the grid is fully active
    pub fn has_active_square(&self, size: usize) -> bool {
        if size == 0 || size > self.rows || size > self.cols {
            return false;
        }

        (0..=self.rows - size)
            .any(|row| (0..=self.cols - size).any(|col| self.is_square_active(row, col, size)))
    }
}
