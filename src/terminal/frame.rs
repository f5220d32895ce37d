//! Character grid produced by the ASCII renderer.

use crate::ascii::CellColor;

/// A rendered frame: one glyph and optionally one color per cell, row-major.
#[derive(Debug, Clone, Default)]
pub struct AsciiFrame {
    pub chars: Vec<char>,
    pub colors: Option<Vec<CellColor>>,
    pub width: u16,
    pub height: u16,
}

impl AsciiFrame {
    /// A blank frame of the given size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            chars: vec![' '; width as usize * height as usize],
            colors: None,
            width,
            height,
        }
    }

    pub fn from_chars_colored(chars: Vec<char>, colors: Vec<CellColor>, width: u16, height: u16) -> Self {
        Self {
            chars,
            colors: Some(colors),
            width,
            height,
        }
    }

    /// Write `text` starting at (`col`, `row`), clipped at the right edge.
    ///
    /// On a colored frame the overwritten cells take `color`.
    pub fn overlay_text(&mut self, col: u16, row: u16, text: &str, color: CellColor) {
        if row >= self.height || col >= self.width {
            return;
        }
        let row_start = row as usize * self.width as usize;
        let room = (self.width - col) as usize;
        for (i, ch) in text.chars().take(room).enumerate() {
            let idx = row_start + col as usize + i;
            self.chars[idx] = ch;
            if let Some(colors) = self.colors.as_mut() {
                colors[idx] = color;
            }
        }
    }

    /// Rows joined by newlines, without color.
    pub fn to_string_display(&self) -> String {
        if self.width == 0 || self.height == 0 {
            return String::new();
        }
        self.chars
            .chunks(self.width as usize)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
