//! Tile anchors, placements and the placement enumerator
//!
//! Slides a k×k window across the grid and keeps every anchor whose
//! footprint is fully active. Placements may overlap one another; the
//! ordering layer decides which subset is visited.

use std::fmt;

use tracing::{debug, warn};

use crate::algorithm::bitset::IndexBitset;
use crate::io::configuration::{MAX_TILE_SIZE, MIN_TILE_SIZE};
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::grid::{Grid, GridMask};

/// Top-left anchor of a square tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile {
    /// Anchor row
    pub row: usize,
    /// Anchor column
    pub col: usize,
}

impl Tile {
    /// Create a tile anchor
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Signed (row, col) offset from `self` to `other`
    pub const fn offset_to(self, other: Self) -> (i64, i64) {
        (
            other.row as i64 - self.row as i64,
            other.col as i64 - self.col as i64,
        )
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Validated tile edge length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSize(usize);

impl TileSize {
    /// Validate a tile edge length
    ///
    /// # Errors
    ///
    /// Returns an error if `k` is outside the supported range
    pub fn new(k: usize) -> Result<Self> {
        if (MIN_TILE_SIZE..=MAX_TILE_SIZE).contains(&k) {
            Ok(Self(k))
        } else {
            Err(invalid_parameter(
                "tile_size",
                &k,
                &format!("must be between {MIN_TILE_SIZE} and {MAX_TILE_SIZE}"),
            ))
        }
    }

    /// Edge length in cells
    pub const fn get(self) -> usize {
        self.0
    }
}

/// A tile together with the grid cells it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Anchor of the placement
    pub tile: Tile,
    /// Covered cells, indexed `row * cols + col`
    pub mask: IndexBitset,
}

/// Every valid placement of one tile size on one grid
///
/// Read-only after enumeration, so it can be shared by several sessions.
#[derive(Debug, Clone)]
pub struct PlacementSet {
    placements: Vec<Placement>,
    tiles: Vec<Tile>,
    // Placement index per anchor cell, indexed like the grid mask
    by_anchor: Vec<Option<usize>>,
    tile_size: TileSize,
    grid_mask: GridMask,
}

impl PlacementSet {
    /// Enumerate all fully-active placements in row-major anchor order
    pub fn enumerate(grid: &Grid, tile_size: TileSize) -> Self {
        let grid_mask = GridMask::new(grid);
        let k = tile_size.get();

        let mut placements = Vec::new();
        if grid_mask.has_active_square(k) {
            for row in 0..=grid.rows() - k {
                for col in 0..=grid.cols() - k {
                    if !grid_mask.is_square_active(row, col, k) {
                        continue;
                    }
                    if let Some(mask) = grid_mask.footprint(row, col, k) {
                        placements.push(Placement {
                            tile: Tile::new(row, col),
                            mask,
                        });
                    }
                }
            }
        }

        if placements.is_empty() {
            warn!(
                tile_size = k,
                active_cells = grid_mask.active_count(),
                "no fully active {k}x{k} placements found"
            );
        } else {
            debug!(
                tile_size = k,
                placements = placements.len(),
                active_cells = grid_mask.active_count(),
                "enumerated placements"
            );
        }

        let tiles: Vec<Tile> = placements.iter().map(|p| p.tile).collect();
        let mut by_anchor = vec![None; grid_mask.rows() * grid_mask.cols()];
        for (index, tile) in tiles.iter().enumerate() {
            if let Some(slot) = by_anchor.get_mut(grid_mask.cell_index(tile.row, tile.col)) {
                *slot = Some(index);
            }
        }

        Self {
            placements,
            tiles,
            by_anchor,
            tile_size,
            grid_mask,
        }
    }

    /// All placements in enumeration order
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Anchors of all placements, index-aligned with [`Self::placements`]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Placement at an index
    pub fn get(&self, index: usize) -> Option<&Placement> {
        self.placements.get(index)
    }

    /// Index of the placement anchored at `tile`
    pub fn index_of(&self, tile: Tile) -> Option<usize> {
        if tile.row >= self.grid_mask.rows() || tile.col >= self.grid_mask.cols() {
            return None;
        }
        self.by_anchor
            .get(self.grid_mask.cell_index(tile.row, tile.col))
            .copied()
            .flatten()
    }

    /// Indices of every placement sharing a cell with placement `index`,
    /// itself included
    ///
    /// Two k×k squares overlap exactly when their anchors are less than k
    /// apart on both axes, so at most (2k-1)² anchors are looked up.
    pub fn overlapping(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let reach = self.tile_size.get() - 1;
        let anchor = self.tiles.get(index).copied();
        anchor.into_iter().flat_map(move |tile| {
            (tile.row.saturating_sub(reach)..=tile.row + reach).flat_map(move |row| {
                (tile.col.saturating_sub(reach)..=tile.col + reach)
                    .filter_map(move |col| self.index_of(Tile::new(row, col)))
            })
        })
    }

    /// Grid cell indices covered by placement `index`
    pub fn cells(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let k = self.tile_size.get();
        let anchor = self.tiles.get(index).copied();
        anchor.into_iter().flat_map(move |tile| {
            (tile.row..tile.row + k).flat_map(move |row| {
                (tile.col..tile.col + k).map(move |col| self.grid_mask.cell_index(row, col))
            })
        })
    }

    /// Number of placements
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether no placement was found
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Tile size the set was enumerated with
    pub const fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    /// Active-cell mask of the source grid
    pub const fn grid_mask(&self) -> &GridMask {
        &self.grid_mask
    }

    /// Total active cells in the source grid
    pub fn active_cells(&self) -> usize {
        self.grid_mask.active_count()
    }
}

/// Validate raw rows and tile size, then enumerate placements
///
/// # Errors
///
/// Returns an error if the grid is malformed or `k` is unsupported
pub fn enumerate_placements(rows: &[Vec<u8>], k: usize) -> Result<PlacementSet> {
    let tile_size = TileSize::new(k)?;
    let grid = Grid::from_rows(rows)?;
    Ok(PlacementSet::enumerate(&grid, tile_size))
}
