//! Tests for tile anchors, tile size validation and placement enumeration

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use tiletour::spatial::grid::Grid;
    use tiletour::spatial::tiles::{PlacementSet, Tile, TileSize, enumerate_placements};

    use crate::{placements, rows};

    #[test]
    fn test_tile_basics() {
        let a = Tile::new(2, 5);
        let b = Tile::new(4, 1);
        assert_eq!(a.offset_to(b), (2, -4));
        assert_eq!(b.offset_to(a), (-2, 4));
        assert_eq!(a.to_string(), "(2, 5)");
        assert!(Tile::new(0, 9) < Tile::new(1, 0));
    }

    // Tests only the supported tile sizes are accepted
    // Verified by widening the accepted range by one on each side
    #[test]
    fn test_tile_size_bounds() {
        assert!(TileSize::new(1).is_err());
        assert!(TileSize::new(4).is_err());

        let two = TileSize::new(2).expect("2 is supported");
        let three = TileSize::new(3).expect("3 is supported");
        assert_eq!(two.get(), 2);
        assert_eq!(three.get(), 3);
    }

    // Tests anchors are listed in row-major order with their footprints
    // Verified by iterating columns in the outer loop
    #[test]
    fn test_enumerate_full_grid() {
        let set = placements(&["111", "111", "111"], 2);

        assert_eq!(
            set.tiles(),
            &[
                Tile::new(0, 0),
                Tile::new(0, 1),
                Tile::new(1, 0),
                Tile::new(1, 1),
            ]
        );
        assert_eq!(set.len(), 4);
        assert_eq!(set.active_cells(), 9);
        assert_eq!(set.tile_size().get(), 2);
        assert_eq!(
            set.get(3).map(|p| p.mask.to_vec()),
            Some(vec![4, 5, 7, 8])
        );
        assert_eq!(set.index_of(Tile::new(1, 0)), Some(2));
        assert_eq!(set.index_of(Tile::new(2, 2)), None);
    }

    // Tests anchor lookup ignores anchors outside the grid or without a placement
    #[test]
    fn test_index_of_bounds() {
        let set = placements(&["1111", "1101", "1111"], 2);
        assert_eq!(set.index_of(Tile::new(0, 0)), Some(0));
        assert_eq!(set.index_of(Tile::new(1, 0)), Some(1));
        assert_eq!(set.index_of(Tile::new(0, 1)), None);
        assert_eq!(set.index_of(Tile::new(0, 4)), None);
        assert_eq!(set.index_of(Tile::new(9, 9)), None);
    }

    // Tests overlap lookup finds exactly the placements sharing a cell
    // Verified by scanning a reach of k instead of k - 1
    #[test]
    fn test_overlapping_matches_footprints() {
        for k in [2, 3] {
            let set = placements(&["111111", "111111", "111011", "111111", "111111"], k);
            for index in 0..set.len() {
                let mut found: Vec<usize> = set.overlapping(index).collect();
                found.sort_unstable();

                let footprint = set.get(index).map(|p| p.mask.to_vec()).unwrap_or_default();
                let expected: Vec<usize> = set
                    .placements()
                    .iter()
                    .enumerate()
                    .filter(|(_, other)| footprint.iter().any(|&cell| other.mask.contains(cell)))
                    .map(|(other, _)| other)
                    .collect();
                assert_eq!(found, expected, "k={k} index={index}");
            }
            assert_eq!(set.overlapping(set.len()).count(), 0);
        }
    }

    // Tests covered cells agree with the stored footprint
    #[test]
    fn test_cells_match_mask() {
        let set = placements(&["1111", "1111", "1111"], 3);
        for (index, placement) in set.placements().iter().enumerate() {
            assert_eq!(set.cells(index).collect::<Vec<_>>(), placement.mask.to_vec());
        }
        assert_eq!(set.cells(set.len()).count(), 0);
    }

    // Tests a single inactive cell removes every window that covers it
    #[test]
    fn test_enumerate_skips_inactive_cells() {
        let set = placements(&["1111", "1101", "1111"], 2);
        // (1,2) is inactive, ruling out anchors (0,1), (0,2), (1,1) and (1,2)
        assert_eq!(
            set.tiles(),
            &[Tile::new(0, 0), Tile::new(1, 0)]
        );
    }

    // Tests grids without a full window give an empty set
    #[test]
    fn test_enumerate_empty() {
        assert!(placements(&["1"], 2).is_empty());
        assert!(placements(&["10", "01"], 2).is_empty());
        assert!(placements(&["111", "111"], 3).is_empty());
    }

    #[test]
    fn test_enumerate_placements_validates() {
        assert!(enumerate_placements(&rows(&["11", "11"]), 5).is_err());
        assert!(enumerate_placements(&[vec![1, 1], vec![1]], 2).is_err());
    }

    // Tests every footprint on random grids is fully active with k² cells
    // Verified by building footprints one cell short
    #[test]
    fn test_random_grid_footprints() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..25 {
            let cells: Vec<Vec<u8>> = (0..9)
                .map(|_| (0..11).map(|_| u8::from(rng.random_bool(0.75))).collect())
                .collect();
            let grid = Grid::from_rows(&cells).expect("grid should be valid");

            for k in [2, 3] {
                let tile_size = TileSize::new(k).expect("size is supported");
                let set = PlacementSet::enumerate(&grid, tile_size);
                let mask = set.grid_mask();

                let unique: HashSet<Tile> = set.tiles().iter().copied().collect();
                assert_eq!(unique.len(), set.len());

                for placement in set.placements() {
                    assert_eq!(placement.mask.count(), k * k);
                    assert!(placement.mask.iter().all(|cell| mask.active().contains(cell)));
                    assert!(placement.tile.row + k <= grid.rows());
                    assert!(placement.tile.col + k <= grid.cols());
                }

                let expected = (0..=grid.rows() - k)
                    .flat_map(|row| (0..=grid.cols() - k).map(move |col| (row, col)))
                    .filter(|&(row, col)| mask.is_square_active(row, col, k))
                    .count();
                assert_eq!(set.len(), expected);
            }
        }
    }
}
