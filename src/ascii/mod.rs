//! ASCII rendering of camera frames for the terminal preview.
//!
//! Each character cell takes the average color of the pixels it covers;
//! the cell's luma picks the glyph from a [`CharSet`] ramp and the color is
//! kept for true-color output.

mod charset;
mod dimensions;
mod downsample;
mod mapping;

pub use charset::{CharSet, BLOCKS_CHARSET, MINIMAL_CHARSET, STANDARD_CHARSET};
pub use dimensions::{calculate_dimensions, DEFAULT_CHAR_ASPECT_RATIO};
pub use downsample::{downsample_colors_into, CellColor};
pub use mapping::map_to_char;

use crate::camera::Frame;
use crate::detect::luma;
use crate::terminal::AsciiFrame;

/// Render `frame` into a `cols` x `rows` character grid.
///
/// `cells` is scratch space reused between calls.
pub fn render(
    frame: &Frame,
    cols: u16,
    rows: u16,
    charset: CharSet,
    invert: bool,
    cells: &mut Vec<CellColor>,
) -> AsciiFrame {
    downsample_colors_into(frame, cols, rows, cells);
    let chars = cells
        .iter()
        .map(|c| map_to_char(luma(c.r, c.g, c.b), charset.chars(), invert))
        .collect();
    AsciiFrame::from_chars_colored(chars, cells.clone(), cols, rows)
}
