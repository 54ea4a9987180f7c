//! Tests for argument parsing, interactive input and report formatting

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use clap::Parser;
    use tiletour::algorithm::interactive::{CandidateSelector, InteractiveSession, Selection};
    use tiletour::algorithm::ordering::{OrderingOptions, PathOrderer};
    use tiletour::algorithm::start::StartRule;
    use tiletour::algorithm::strategy::NextTileStrategy;
    use tiletour::io::cli::{
        Cli, FileProcessor, LineSelector, StartArg, StrategyArg, format_report, is_grid_file,
        parse_selection, parse_tile,
    };
    use tiletour::spatial::tiles::Tile;
    use tracing::level_filters::LevelFilter;

    use crate::placements;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tiletour").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["grid.txt"]);
        assert_eq!(cli.tile_size, 2);
        assert_eq!(cli.strategy, StrategyArg::Weighted);
        assert_eq!(cli.start, StartArg::TopLeft);
        assert!(cli.start_tile.is_none());
        assert!(cli.fixed.is_empty());
        assert!(cli.relax.is_empty());
        assert!(cli.should_show_progress());
        assert_eq!(cli.log_level(), LevelFilter::WARN);
    }

    // Tests every option is wired to its field
    #[test]
    fn test_all_options() {
        let cli = parse(&[
            "maps",
            "-k",
            "3",
            "-s",
            "min-turn",
            "--start",
            "top-right",
            "--fixed",
            "1,2;3,4",
            "-a",
            "30",
            "--relax",
            "45,90",
            "-v",
        ]);

        assert_eq!(cli.tile_size, 3);
        assert_eq!(cli.strategy, StrategyArg::MinTurn);
        assert_eq!(cli.start, StartArg::TopRight);
        assert_eq!(cli.fixed, vec![Tile::new(1, 2), Tile::new(3, 4)]);
        assert_eq!(cli.max_angle, Some(30.0));
        assert_eq!(cli.relax, vec![45.0, 90.0]);
        assert_eq!(cli.log_level(), LevelFilter::DEBUG);

        let options = cli.ordering_options().expect("options should be valid");
        assert_eq!(options.strategy, NextTileStrategy::MinimumTurn);
        assert!(matches!(options.start, StartRule::TopRight));
        assert_eq!(options.max_angle_diff, Some(30.0));
        assert_eq!(options.fixed_tiles.len(), 2);
    }

    // Tests an explicit start tile overrides the start rule
    #[test]
    fn test_start_tile_overrides_rule() {
        let cli = parse(&["g.txt", "--start", "top-right", "--start-tile", "4, 6"]);
        let options = cli.ordering_options().expect("options should be valid");
        assert!(matches!(options.start, StartRule::Custom(tile) if tile == Tile::new(4, 6)));
    }

    // Tests invalid values surface as errors instead of defaults
    // Verified by clamping negative tolerances to zero
    #[test]
    fn test_invalid_values() {
        assert!(Cli::try_parse_from(["tiletour", "g.txt", "--start-tile", "4"]).is_err());
        assert!(Cli::try_parse_from(["tiletour", "g.txt", "-s", "spiral"]).is_err());

        let negative_angle = parse(&["g.txt", "--max-angle=-5"]);
        assert!(negative_angle.ordering_options().is_err());

        let negative_weight = parse(&["g.txt", "--distance-weight=-1"]);
        assert!(negative_weight.next_tile_strategy().is_err());

        let quiet = parse(&["g.txt", "-q", "-v"]);
        assert!(!quiet.should_show_progress());
        assert_eq!(quiet.log_level(), LevelFilter::ERROR);
    }

    #[test]
    fn test_parse_tile() {
        assert_eq!(parse_tile("3,7"), Ok(Tile::new(3, 7)));
        assert_eq!(parse_tile(" 0 , 12 "), Ok(Tile::new(0, 12)));
        assert!(parse_tile("3").is_err());
        assert!(parse_tile("-1,2").is_err());
        assert!(parse_tile("a,b").is_err());
    }

    // Tests interactive commands, numbers and unknown input
    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("2\n"), Selection::Candidate(2));
        assert_eq!(parse_selection(" STOP "), Selection::Stop);
        assert_eq!(parse_selection("q"), Selection::Stop);
        assert_eq!(parse_selection("undo 3"), Selection::TruncateAt(3));
        assert_eq!(parse_selection("truncate 1"), Selection::TruncateAt(1));
        assert_eq!(
            parse_selection("left"),
            Selection::Unrecognized("left".to_string())
        );
        assert_eq!(
            parse_selection("undo"),
            Selection::Unrecognized("undo".to_string())
        );
    }

    // Tests the line selector prompts with the offer and reads one answer
    #[test]
    fn test_line_selector() {
        let set = placements(&["111111", "111111"], 2);
        let session =
            InteractiveSession::new(&set, OrderingOptions::default()).expect("options are valid");
        let candidates = session.candidates();

        let mut prompt: Vec<u8> = Vec::new();
        let mut selector = LineSelector::new(Cursor::new("0\n"), &mut prompt);
        let first = selector
            .select(&session.tour(), &candidates)
            .expect("in-memory input cannot fail");
        let second = selector
            .select(&session.tour(), &candidates)
            .expect("in-memory input cannot fail");

        assert_eq!(first, Selection::Candidate(0));
        assert_eq!(second, Selection::Stop);

        let shown = String::from_utf8(prompt).expect("prompt is UTF-8");
        assert!(shown.contains("at (0, 0) after 1 tiles"));
        assert!(shown.contains("[0] (0, 2)"));
    }

    // Tests the report header, tour line and summary
    #[test]
    fn test_format_report() {
        let set = placements(&["111111", "111111"], 2);
        let options = OrderingOptions::default().with_strategy(NextTileStrategy::NearestNeighbor);
        let report = PathOrderer::new(&set, options)
            .expect("options should be valid")
            .run();

        let lines = format_report("corridor", &report, 2);
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines.first().map(String::as_str),
            Some("corridor: 5 placements (k=2), 12 active cells")
        );
        assert_eq!(
            lines.get(1).map(String::as_str),
            Some("tour (3 tiles): (0, 0) -> (0, 2) -> (0, 4)")
        );
        assert_eq!(
            lines.last().map(String::as_str),
            Some("status: completed, visited 3, remaining 0, coverage 100.0%")
        );
        assert!(lines.iter().all(|line| !line.contains("-0.0")), "{lines:?}");
    }

    #[test]
    fn test_is_grid_file() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        for name in ["a.txt", "b.PNG", "c.csv"] {
            std::fs::write(dir.path().join(name), "1").expect("file should be written");
        }
        std::fs::create_dir(dir.path().join("d.txt")).expect("dir should be created");

        assert!(is_grid_file(&dir.path().join("a.txt")));
        assert!(is_grid_file(&dir.path().join("b.PNG")));
        assert!(!is_grid_file(&dir.path().join("c.csv")));
        assert!(!is_grid_file(&dir.path().join("d.txt")));
        assert!(!is_grid_file(&dir.path().join("missing.txt")));
    }

    // Tests a directory batch runs end to end, including tolerance relaxation
    #[test]
    fn test_process_directory() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        std::fs::write(dir.path().join("a.txt"), "1111\n1111\n").expect("grid should be written");
        std::fs::write(dir.path().join("b.txt"), "111\n111\n111\n")
            .expect("grid should be written");
        std::fs::write(dir.path().join("notes.md"), "ignored").expect("file should be written");

        let target = dir.path().to_string_lossy().to_string();
        let cli = parse(&[target.as_str(), "-q", "-s", "nearest", "-a", "0", "--relax", "90"]);
        assert!(FileProcessor::new(cli).process().is_ok());
    }

    // Tests a rejected grid is skipped in a batch but fails a single-file run
    // Verified by propagating every error from the batch loop
    #[test]
    fn test_process_skips_rejected_grid_in_batch() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        std::fs::write(dir.path().join("good.txt"), "1111\n1111\n")
            .expect("grid should be written");
        let bad = dir.path().join("ragged.txt");
        std::fs::write(&bad, "111\n11\n").expect("grid should be written");

        let target = dir.path().to_string_lossy().to_string();
        assert!(FileProcessor::new(parse(&[target.as_str(), "-q"])).process().is_ok());

        let single = bad.to_string_lossy().to_string();
        assert!(FileProcessor::new(parse(&[single.as_str(), "-q"])).process().is_err());

        let negative = parse(&[target.as_str(), "-q", "--relax=-5"]);
        assert!(FileProcessor::new(negative).process().is_err());
    }

    #[test]
    fn test_process_rejects_bad_target() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let missing = dir.path().join("nowhere").to_string_lossy().to_string();
        assert!(
            FileProcessor::new(parse(&[missing.as_str(), "-q"]))
                .process()
                .is_err()
        );

        let grid = dir.path().join("g.txt");
        std::fs::write(&grid, "11\n11\n").expect("grid should be written");
        let grid_arg = grid.to_string_lossy().to_string();
        let bad_size = parse(&[grid_arg.as_str(), "-q", "-k", "7"]);
        assert!(FileProcessor::new(bad_size).process().is_err());
    }
}
