//! Command-line interface for enumerating placements and ordering tours

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing::level_filters::LevelFilter;
use tracing::warn;

use crate::algorithm::candidates::Candidate;
use crate::algorithm::interactive::{CandidateSelector, InteractiveSession, Selection};
use crate::algorithm::ordering::{OrderingOptions, PathOrderer, TourReport, TourStatus};
use crate::algorithm::start::StartRule;
use crate::algorithm::state::validate_max_angle;
use crate::algorithm::strategy::{NextTileStrategy, ScoreWeights};
use crate::io::configuration::{
    DEFAULT_DISTANCE_WEIGHT, DEFAULT_MAX_REACH, DEFAULT_TILE_SIZE, DEFAULT_TURN_WEIGHT,
    GRID_FILE_EXTENSIONS,
};
use crate::io::error::{Result, TourError, invalid_parameter};
use crate::io::grid_file::load_grid;
use crate::io::progress::ProgressManager;
use crate::spatial::tiles::{PlacementSet, Tile, TileSize};

/// Next-tile strategy names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Closest open tile
    Nearest,
    /// Smallest turn
    MinTurn,
    /// Weighted distance and turn among touching tiles
    Weighted,
    /// Smallest turn among touching tiles within one diagonal step
    PreferSmallTurn,
}

/// Built-in start rules accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StartArg {
    /// Topmost row, leftmost column
    TopLeft,
    /// Topmost row, rightmost column
    TopRight,
}

#[derive(Parser)]
#[command(name = "tiletour")]
#[command(
    author,
    version,
    about = "Enumerate fully active square tiles on a binary grid and order them into a tour"
)]
/// Command-line arguments for the tour tool
// Mode switches are independent flags
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Grid file (.txt or .png) or directory of grid files
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Tile edge length (2 or 3)
    #[arg(short = 'k', long, default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: usize,

    /// Next-tile strategy
    #[arg(short, long, value_enum, default_value_t = StrategyArg::Weighted)]
    pub strategy: StrategyArg,

    /// Start rule, ignored when --start-tile or --fixed is given
    #[arg(long, value_enum, default_value_t = StartArg::TopLeft)]
    pub start: StartArg,

    /// Start at this anchor ("row,col"), or at the nearest placement to it
    #[arg(long, value_parser = parse_tile)]
    pub start_tile: Option<Tile>,

    /// Opening tiles ("row,col;row,col;..."), overriding the start rule
    #[arg(long, value_parser = parse_tile, value_delimiter = ';')]
    pub fixed: Vec<Tile>,

    /// Maximum turn between consecutive moves, in degrees
    #[arg(short = 'a', long)]
    pub max_angle: Option<f64>,

    /// Tolerances to retry with, in order, whenever the tour stalls
    #[arg(long, value_delimiter = ',')]
    pub relax: Vec<f64>,

    /// Weighted strategy: cost per tile width of distance
    #[arg(long, default_value_t = DEFAULT_DISTANCE_WEIGHT)]
    pub distance_weight: f64,

    /// Weighted strategy: cost per degree of turn
    #[arg(long, default_value_t = DEFAULT_TURN_WEIGHT)]
    pub turn_weight: f64,

    /// Weighted strategy: maximum reach in tile widths
    #[arg(long, default_value_t = DEFAULT_MAX_REACH)]
    pub max_reach: f64,

    /// Choose every next tile from stdin instead of using the strategy
    #[arg(short, long)]
    pub interactive: bool,

    /// Suppress progress output and warnings
    #[arg(short, long)]
    pub quiet: bool,

    /// Log every step
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level implied by the verbosity flags
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::ERROR
        } else if self.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::WARN
        }
    }

    /// Install a stderr log subscriber; a subscriber set earlier wins
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_max_level(self.log_level())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Strategy described by the arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the weighted strategy's parameters are invalid
    pub fn next_tile_strategy(&self) -> Result<NextTileStrategy> {
        Ok(match self.strategy {
            StrategyArg::Nearest => NextTileStrategy::NearestNeighbor,
            StrategyArg::MinTurn => NextTileStrategy::MinimumTurn,
            StrategyArg::Weighted => NextTileStrategy::Weighted(ScoreWeights::new(
                self.distance_weight,
                self.turn_weight,
                self.max_reach,
            )?),
            StrategyArg::PreferSmallTurn => NextTileStrategy::PreferSmallTurn,
        })
    }

    /// Ordering options described by the arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the strategy parameters or angle tolerance are invalid
    pub fn ordering_options(&self) -> Result<OrderingOptions> {
        let start = match (self.start_tile, self.start) {
            (Some(tile), _) => StartRule::Custom(tile),
            (None, StartArg::TopLeft) => StartRule::TopLeft,
            (None, StartArg::TopRight) => StartRule::TopRight,
        };

        OrderingOptions::default()
            .with_start(start)
            .with_strategy(self.next_tile_strategy()?)
            .with_fixed_tiles(self.fixed.clone())
            .with_max_angle_diff(self.max_angle)
    }
}

/// Parse an anchor written as `row,col`
///
/// # Errors
///
/// Returns a message if the text is not two comma-separated integers
pub fn parse_tile(text: &str) -> std::result::Result<Tile, String> {
    let (row, col) = text
        .split_once(',')
        .ok_or_else(|| format!("expected 'row,col', got '{text}'"))?;
    let row = row
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid row '{row}': {e}"))?;
    let col = col
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid column '{col}': {e}"))?;
    Ok(Tile::new(row, col))
}

/// Interpret one line of interactive input
///
/// A number picks a candidate, `undo N` truncates the tour at index N,
/// `stop`/`q` ends the tour.
pub fn parse_selection(input: &str) -> Selection {
    let trimmed = input.trim();
    let lowered = trimmed.to_ascii_lowercase();

    if matches!(lowered.as_str(), "stop" | "q" | "quit") {
        return Selection::Stop;
    }
    if let Ok(position) = lowered.parse::<usize>() {
        return Selection::Candidate(position);
    }
    if let Some(rest) = lowered
        .strip_prefix("undo")
        .or_else(|| lowered.strip_prefix("truncate"))
    {
        if let Ok(index) = rest.trim().parse::<usize>() {
            return Selection::TruncateAt(index);
        }
    }
    Selection::Unrecognized(trimmed.to_string())
}

/// Line-based selector prompting on one stream and reading from another
///
/// End of input counts as `stop`.
pub struct LineSelector<R, W> {
    input: R,
    prompt: W,
}

impl<R: BufRead, W: Write> LineSelector<R, W> {
    /// Create a selector over the given streams
    pub const fn new(input: R, prompt: W) -> Self {
        Self { input, prompt }
    }

    fn write_offer(&mut self, tour: &[Tile], candidates: &[Candidate]) -> std::io::Result<()> {
        if let Some(current) = tour.last() {
            writeln!(self.prompt, "at {current} after {} tiles", tour.len())?;
        }
        for (position, candidate) in candidates.iter().enumerate() {
            writeln!(
                self.prompt,
                "  [{position}] {} {:>6.1}° {:<2} dist {:.2} turn {:.1}°",
                candidate.tile,
                candidate.bearing,
                candidate.compass(),
                candidate.distance,
                candidate.turn
            )?;
        }
        write!(self.prompt, "choose index, 'undo N' or 'stop': ")?;
        self.prompt.flush()
    }
}

impl<R: BufRead, W: Write> CandidateSelector for LineSelector<R, W> {
    fn select(&mut self, tour: &[Tile], candidates: &[Candidate]) -> Result<Selection> {
        self.write_offer(tour, candidates)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Ok(Selection::Stop);
        }
        Ok(parse_selection(&line))
    }
}

/// Render a report as display lines
pub fn format_report(name: &str, report: &TourReport, tile_size: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "{name}: {} placements (k={tile_size}), {} active cells",
        report.placements, report.active_cells
    )];

    let tour = report
        .tour
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ");
    lines.push(format!("tour ({} tiles): {tour}", report.visited));

    for (index, step) in report.steps.iter().enumerate() {
        let turn = step
            .turn
            .map_or_else(|| "-".to_string(), |turn| format!("{turn:.1}°"));
        let flag = if step.exceeds_tolerance { " !" } else { "" };
        lines.push(format!(
            "  {:>3}: {} -> {} bearing {:>5.1}° {:<2} turn {turn}{flag}",
            index + 1,
            step.from,
            step.to,
            step.bearing,
            step.compass
        ));
    }

    lines.push(format!(
        "status: {}, visited {}, remaining {}, coverage {:.1}%",
        report.status,
        report.visited,
        report.remaining,
        report.coverage() * 100.0
    ));
    lines
}

/// Runs the tour tool over one grid file or a directory of them
pub struct FileProcessor {
    cli: Cli,
    progress_manager: ProgressManager,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self {
            cli,
            progress_manager: ProgressManager::new(),
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the target or options are invalid, or a grid fails
    /// to load or order. In a batch of several files, grids that are
    /// themselves rejected are skipped with a warning.
    pub fn process(&mut self) -> Result<()> {
        let tile_size = TileSize::new(self.cli.tile_size)?;
        let options = self.cli.ordering_options()?;
        for &tolerance in &self.cli.relax {
            validate_max_angle(Some(tolerance))?;
        }
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if self.cli.should_show_progress() && !self.cli.interactive {
            self.progress_manager.initialize(files.len());
        }

        for file in &files {
            self.progress_manager.start_file(file);
            let report = match self.process_file(file, tile_size, &options) {
                Ok(report) => report,
                Err(error) if files.len() > 1 && error.is_configuration_error() => {
                    warn!(file = %file.display(), %error, "skipping grid");
                    self.progress_manager.complete_file();
                    continue;
                }
                Err(error) => return Err(error),
            };
            let name = file.file_name().unwrap_or_default().to_string_lossy();
            for line in format_report(&name, &report, tile_size.get()) {
                self.progress_manager.println(&line);
            }
            self.progress_manager.complete_file();
        }

        self.progress_manager.finish();
        Ok(())
    }

    fn process_file(
        &self,
        path: &Path,
        tile_size: TileSize,
        options: &OrderingOptions,
    ) -> Result<TourReport> {
        let grid = load_grid(path)?;
        let placements = PlacementSet::enumerate(&grid, tile_size);

        if self.cli.interactive {
            let mut session = InteractiveSession::new(&placements, options.clone())?;
            let stdin = std::io::stdin();
            let mut selector = LineSelector::new(stdin.lock(), std::io::stderr());
            return session.run(&mut selector);
        }

        let mut orderer = PathOrderer::new(&placements, options.clone())?;
        let mut report = orderer.run();
        for &tolerance in &self.cli.relax {
            if !matches!(report.status, TourStatus::Stalled(_)) {
                break;
            }
            report = orderer.resume(Some(tolerance))?;
        }
        Ok(report)
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            return Ok(vec![target.clone()]);
        }
        if !target.is_dir() {
            return Err(invalid_parameter(
                "target",
                &target.display(),
                &"must be a grid file or a directory",
            ));
        }

        let entries = std::fs::read_dir(target).map_err(|e| TourError::FileSystem {
            path: target.clone(),
            operation: "read directory",
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if is_grid_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Whether a path has a grid file extension
pub fn is_grid_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                GRID_FILE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
}
