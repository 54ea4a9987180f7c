//! Grid loading from text files and one-pixel-per-cell PNG masks

use std::path::Path;

use ndarray::Array2;

use crate::io::configuration::{ACTIVE_CHAR, COMMENT_CHAR, INACTIVE_CHAR};
use crate::io::error::{Result, TourError};
use crate::spatial::grid::Grid;

/// Load a grid, choosing the format by file extension
///
/// `.png` files are read as masks, anything else as text.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not describe a valid grid
pub fn load_grid(path: &Path) -> Result<Grid> {
    let is_png = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

    if is_png {
        load_png_mask(path)
    } else {
        let text = std::fs::read_to_string(path).map_err(|e| TourError::FileSystem {
            path: path.to_path_buf(),
            operation: "read grid",
            source: e,
        })?;
        parse_grid_text(&text, path)
    }
}

/// Parse a text grid
///
/// One row per line using `1` for active and `0` for inactive cells.
/// Whitespace and commas between cells are ignored, as are blank lines and
/// lines starting with `#`.
///
/// # Errors
///
/// Returns an error on unexpected characters, ragged rows, or an empty grid
pub fn parse_grid_text(text: &str, path: &Path) -> Result<Grid> {
    let mut rows: Vec<Vec<u8>> = Vec::new();
    let mut width: Option<usize> = None;

    for (line_index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_CHAR) {
            continue;
        }

        let parse_error = |reason: String| TourError::GridParse {
            path: path.to_path_buf(),
            line: line_index + 1,
            reason,
        };

        let mut row = Vec::with_capacity(trimmed.len());
        for ch in trimmed.chars() {
            match ch {
                ACTIVE_CHAR => row.push(1),
                INACTIVE_CHAR => row.push(0),
                ',' => {}
                c if c.is_whitespace() => {}
                other => {
                    return Err(parse_error(format!(
                        "unexpected character '{other}', expected '{ACTIVE_CHAR}' or '{INACTIVE_CHAR}'"
                    )));
                }
            }
        }

        match width {
            None => width = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(parse_error(format!(
                    "row has {} cells, expected {expected}",
                    row.len()
                )));
            }
            Some(_) => {}
        }
        rows.push(row);
    }

    Grid::from_rows(&rows)
}

/// Read a PNG where each pixel is one cell
///
/// A pixel is active when it is mostly opaque and brighter than mid-gray.
///
/// # Errors
///
/// Returns an error if the image cannot be decoded or is empty
pub fn load_png_mask(path: &Path) -> Result<Grid> {
    let img = image::open(path).map_err(|e| TourError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut cells = Array2::<u8>::zeros((height as usize, width as usize));

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let brightness = (u16::from(r) + u16::from(g) + u16::from(b)) / 3;
        if a >= 128 && brightness >= 128 {
            if let Some(cell) = cells.get_mut([y as usize, x as usize]) {
                *cell = 1;
            }
        }
    }

    Grid::from_array(cells)
}
