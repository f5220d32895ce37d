//! Fitting an image into a character grid without distorting it.

/// Terminal cells are roughly twice as tall as they are wide.
pub const DEFAULT_CHAR_ASPECT_RATIO: f32 = 2.0;

/// Largest (columns, rows) that fits `max_cols` x `max_rows` and shows an
/// `img_width` x `img_height` image with its aspect ratio intact.
///
/// Returns (0, 0) when any input dimension is zero.
pub fn calculate_dimensions(img_width: u32, img_height: u32, max_cols: u16, max_rows: u16) -> (u16, u16) {
    if img_width == 0 || img_height == 0 || max_cols == 0 || max_rows == 0 {
        return (0, 0);
    }

    // A square image needs half as many rows as columns.
    let target = (img_width as f32 / img_height as f32) * DEFAULT_CHAR_ASPECT_RATIO;

    let rows = (max_cols as f32 / target).round() as u16;
    if rows <= max_rows && rows > 0 {
        return (max_cols, rows);
    }

    let cols = ((max_rows as f32 * target).round() as u16).min(max_cols);
    (cols.max(1), max_rows)
}
