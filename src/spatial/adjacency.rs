//! Overlap and touch predicates between equally sized square tiles
//!
//! Both predicates only look at the anchor offset, so they are O(1) and
//! symmetric in their arguments.

use crate::spatial::tiles::Tile;

/// Whether the two `k`×`k` squares share at least one cell
///
/// A tile always overlaps itself.
pub const fn overlaps(a: Tile, b: Tile, k: usize) -> bool {
    let (dr, dc) = a.offset_to(b);
    let k = k as i64;
    dr.abs() < k && dc.abs() < k
}

/// Whether a path may step directly between the two squares
///
/// True when the squares abut along an edge with overlapping row or column
/// ranges, or when their anchors differ by exactly `(±k, ±k)` so that they
/// meet at a single corner.
pub const fn touches(a: Tile, b: Tile, k: usize) -> bool {
    let (dr, dc) = a.offset_to(b);
    let (dr, dc, k) = (dr.abs(), dc.abs(), k as i64);

    let shares_edge = (dr == k && dc < k) || (dc == k && dr < k);
    let shares_corner = dr == k && dc == k;
    shares_edge || shares_corner
}
