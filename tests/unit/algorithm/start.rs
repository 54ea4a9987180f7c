//! Tests for start rule resolution

#[cfg(test)]
mod tests {
    use tiletour::algorithm::start::{StartRule, StartSelector};
    use tiletour::spatial::tiles::{PlacementSet, Tile};

    use crate::{full_placements, placements};

    fn resolved(rule: &StartRule, set: &PlacementSet) -> Option<Tile> {
        rule.resolve(set)
            .and_then(|index| set.tiles().get(index).copied())
    }

    fn islands() -> PlacementSet {
        placements(&["0011", "0011", "1100", "1100"], 2)
    }

    fn last_placement(set: &PlacementSet) -> Option<usize> {
        set.len().checked_sub(1)
    }

    fn out_of_range(set: &PlacementSet) -> Option<usize> {
        Some(set.len() + 5)
    }

    fn nothing(_set: &PlacementSet) -> Option<usize> {
        None
    }

    // Tests the corner rules on a full grid
    #[test]
    fn test_top_left_and_top_right() {
        let set = full_placements(6, 2);
        assert_eq!(resolved(&StartRule::default(), &set), Some(Tile::new(0, 0)));
        assert_eq!(resolved(&StartRule::TopRight, &set), Some(Tile::new(0, 4)));
    }

    // Tests row takes precedence over column
    // Verified by ordering anchors by (col, row)
    #[test]
    fn test_topmost_row_wins() {
        let set = islands();
        assert_eq!(resolved(&StartRule::TopLeft, &set), Some(Tile::new(0, 2)));
        assert_eq!(resolved(&StartRule::TopRight, &set), Some(Tile::new(0, 2)));
    }

    // Tests a custom anchor is used directly or replaced by the nearest placement
    // Verified by substituting the first placement instead of the nearest
    #[test]
    fn test_custom_tile() {
        let set = islands();
        assert_eq!(
            resolved(&StartRule::Custom(Tile::new(2, 0)), &set),
            Some(Tile::new(2, 0))
        );
        assert_eq!(
            resolved(&StartRule::Custom(Tile::new(2, 1)), &set),
            Some(Tile::new(2, 0))
        );
        assert!(resolved(&StartRule::Custom(Tile::new(40, 40)), &set).is_some());
    }

    // Tests invalid selector answers fall back to top-left
    // Verified by passing the selector's answer through unchecked
    #[test]
    fn test_selector_with_fallback() {
        let set = islands();
        assert_eq!(
            resolved(&StartRule::Selector(StartSelector::new(last_placement)), &set),
            Some(Tile::new(2, 0))
        );
        assert_eq!(
            resolved(&StartRule::Selector(StartSelector::new(out_of_range)), &set),
            Some(Tile::new(0, 2))
        );
        assert_eq!(
            resolved(&StartRule::Selector(StartSelector::new(nothing)), &set),
            Some(Tile::new(0, 2))
        );
    }

    // Tests every rule gives up on an empty placement set
    #[test]
    fn test_empty_set() {
        let set = placements(&["10", "01"], 2);
        assert!(set.is_empty());

        for rule in [
            StartRule::TopLeft,
            StartRule::TopRight,
            StartRule::Custom(Tile::new(0, 0)),
            StartRule::Selector(StartSelector::new(last_placement)),
        ] {
            assert_eq!(rule.resolve(&set), None);
        }
    }

    // Tests a selector closure can carry caller state
    // Verified by ignoring the captured anchor and returning the first index
    #[test]
    fn test_selector_closure_captures_state() {
        let set = full_placements(6, 2);
        let wanted = Tile::new(2, 3);
        let rule = StartRule::Selector(StartSelector::new(move |candidates: &PlacementSet| {
            candidates.index_of(wanted)
        }));

        assert_eq!(resolved(&rule, &set), Some(wanted));
        assert_eq!(resolved(&rule.clone(), &set), Some(wanted));
        assert_eq!(format!("{rule:?}"), "Selector(StartSelector(..))");
    }
}
