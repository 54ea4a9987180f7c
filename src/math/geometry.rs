//! Tile-center geometry, bearings and turn angles
//!
//! Centers live in (x = column, y = row) space. Bearings follow the
//! mathematical convention with the row axis flipped so that "up" on the
//! grid is +y: 0° is east, 90° is north (decreasing row).

use std::fmt;

use crate::spatial::tiles::Tile;

/// A point in (x = column, y = row) grid space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal coordinate (column axis)
    pub x: f64,
    /// Vertical coordinate (row axis, increasing downward)
    pub y: f64,
}

impl Point {
    /// Create a point from raw coordinates
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Center of a `tile_size`×`tile_size` tile anchored at `tile`
pub fn center(tile: Tile, tile_size: usize) -> Point {
    let half = (tile_size as f64 - 1.0) / 2.0;
    Point::new(tile.col as f64 + half, tile.row as f64 + half)
}

/// Bearing in degrees from `from` to `to`, normalized to [0, 360)
pub fn bearing(from: Point, to: Point) -> f64 {
    // Row axis points down, so flip dy to measure counter-clockwise from east
    let degrees = (-(to.y - from.y)).atan2(to.x - from.x).to_degrees();
    normalize_degrees(degrees)
}

/// Wrap an angle into [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0 and keeps -0.0
    if wrapped >= 360.0 || wrapped == 0.0 {
        0.0
    } else {
        wrapped
    }
}

/// Unsigned circular difference between two bearings, in [0, 180]
pub fn turn_angle(first: f64, second: f64) -> f64 {
    let diff = (second - first).abs().rem_euclid(360.0);
    diff.min(360.0 - diff)
}

/// Eight-way compass direction, for labelling only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compass {
    /// 0°
    East,
    /// 45°
    NorthEast,
    /// 90°
    North,
    /// 135°
    NorthWest,
    /// 180°
    West,
    /// 225°
    SouthWest,
    /// 270°
    South,
    /// 315°
    SouthEast,
}

impl Compass {
    const ALL: [Self; 8] = [
        Self::East,
        Self::NorthEast,
        Self::North,
        Self::NorthWest,
        Self::West,
        Self::SouthWest,
        Self::South,
        Self::SouthEast,
    ];

    /// Nearest compass direction to a bearing
    pub fn from_bearing(degrees: f64) -> Self {
        let sector = (normalize_degrees(degrees) / 45.0).round() as usize % 8;
        Self::ALL.get(sector).copied().unwrap_or(Self::East)
    }

    /// Short label such as `"NE"`
    pub const fn label(self) -> &'static str {
        match self {
            Self::East => "E",
            Self::NorthEast => "NE",
            Self::North => "N",
            Self::NorthWest => "NW",
            Self::West => "W",
            Self::SouthWest => "SW",
            Self::South => "S",
            Self::SouthEast => "SE",
        }
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Nearest compass direction to a bearing
pub fn compass(degrees: f64) -> Compass {
    Compass::from_bearing(degrees)
}
