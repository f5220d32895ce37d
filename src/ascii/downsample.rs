//! Averaging frame pixels into character cells.

use crate::camera::Frame;

/// Average color of one character cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl CellColor {
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
        }
    }
}

/// Average the frame's colors over a `cols` x `rows` grid, row-major.
///
/// `buffer` is cleared and reused so the per-frame path does not allocate.
pub fn downsample_colors_into(frame: &Frame, cols: u16, rows: u16, buffer: &mut Vec<CellColor>) {
    buffer.clear();
    if cols == 0 || rows == 0 || frame.width() == 0 || frame.height() == 0 {
        return;
    }
    buffer.reserve(cols as usize * rows as usize);

    let cell_w = frame.width() as f32 / cols as f32;
    let cell_h = frame.height() as f32 / rows as f32;

    for cy in 0..rows {
        let start_y = (cy as f32 * cell_h) as u32;
        let end_y = (((cy + 1) as f32 * cell_h) as u32).max(start_y + 1).min(frame.height());
        for cx in 0..cols {
            let start_x = (cx as f32 * cell_w) as u32;
            let end_x = (((cx + 1) as f32 * cell_w) as u32).max(start_x + 1).min(frame.width());

            let (mut r, mut g, mut b, mut count) = (0u32, 0u32, 0u32, 0u32);
            for py in start_y..end_y {
                for px in start_x..end_x {
                    if let Some([pr, pg, pb]) = frame.pixel(px, py) {
                        r += pr as u32;
                        g += pg as u32;
                        b += pb as u32;
                        count += 1;
                    }
                }
            }

            buffer.push(if count > 0 {
                CellColor {
                    r: (r / count) as u8,
                    g: (g / count) as u8,
                    b: (b / count) as u8,
                }
            } else {
                CellColor::default()
            });
        }
    }
}
