//! The display window: an ASCII rendering of the annotated frame.

use std::io::{self, Stdout, Write};
use std::sync::atomic::Ordering;

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, queue};

use super::raw_mode::{install_panic_hook, ALTERNATE_SCREEN_ACTIVE};
use super::status_bar::StatusLine;
use crate::alarm::Label;
use crate::ascii::{self, CellColor, CharSet};
use crate::camera::Frame;

/// Everything needed to draw one iteration's output.
#[derive(Debug, Clone, Copy)]
pub struct PreviewFrame<'a> {
    pub frame: &'a Frame,
    pub labels: &'a [Label],
    pub status: &'a StatusLine,
}

/// Where annotated frames are shown.
pub trait Preview {
    /// Show a frame, opening the display on first use.
    fn show(&mut self, view: &PreviewFrame<'_>) -> io::Result<()>;

    /// Close the display. Safe to call when nothing is open.
    fn close(&mut self) -> io::Result<()>;
}

impl<T: Preview + ?Sized> Preview for Box<T> {
    fn show(&mut self, view: &PreviewFrame<'_>) -> io::Result<()> {
        (**self).show(view)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Discards frames. Used with `--headless`.
#[derive(Debug, Default)]
pub struct NullPreview;

impl Preview for NullPreview {
    fn show(&mut self, _view: &PreviewFrame<'_>) -> io::Result<()> {
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Draws frames as colored ASCII on the terminal's alternate screen.
pub struct TerminalPreview<W: Write = Stdout> {
    out: W,
    charset: CharSet,
    invert: bool,
    /// Fixed size; `None` asks the terminal every frame
    size: Option<(u16, u16)>,
    open: bool,
    cells: Vec<CellColor>,
}

impl TerminalPreview<Stdout> {
    pub fn stdout(charset: CharSet, invert: bool) -> Self {
        Self::new(io::stdout(), charset, invert)
    }
}

impl<W: Write> TerminalPreview<W> {
    pub fn new(out: W, charset: CharSet, invert: bool) -> Self {
        Self {
            out,
            charset,
            invert,
            size: None,
            open: false,
            cells: Vec::new(),
        }
    }

    /// Render into a fixed `cols` x `rows` area instead of the terminal size.
    pub fn with_size(mut self, cols: u16, rows: u16) -> Self {
        self.size = Some((cols, rows));
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn terminal_size(&self) -> (u16, u16) {
        self.size
            .unwrap_or_else(|| crossterm::terminal::size().unwrap_or((80, 24)))
    }

    fn open_screen(&mut self) -> io::Result<()> {
        if !self.open {
            install_panic_hook();
            queue!(self.out, EnterAlternateScreen, cursor::Hide)?;
            self.open = true;
            ALTERNATE_SCREEN_ACTIVE.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl<W: Write> Preview for TerminalPreview<W> {
    fn show(&mut self, view: &PreviewFrame<'_>) -> io::Result<()> {
        self.open_screen()?;

        let (term_cols, term_rows) = self.terminal_size();
        // Bottom row is the status line
        let (cols, rows) = ascii::calculate_dimensions(
            view.frame.width(),
            view.frame.height(),
            term_cols,
            term_rows.saturating_sub(1),
        );

        let mut grid = ascii::render(view.frame, cols, rows, self.charset, self.invert, &mut self.cells);
        if cols > 0 && rows > 0 {
            for label in view.labels {
                let col = (label.x as u64 * cols as u64 / view.frame.width() as u64) as u16;
                let row = (label.y as u64 * rows as u64 / view.frame.height() as u64) as u16;
                grid.overlay_text(col, row, &label.text, CellColor::from_rgb(label.color));
            }
        }

        queue!(self.out, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
        let mut current: Option<CellColor> = None;
        for (row, line) in grid.chars.chunks(cols.max(1) as usize).enumerate() {
            queue!(self.out, cursor::MoveTo(0, row as u16))?;
            for (col, &ch) in line.iter().enumerate() {
                if let Some(colors) = grid.colors.as_ref() {
                    let color = colors[row * cols as usize + col];
                    if current != Some(color) {
                        queue!(
                            self.out,
                            SetForegroundColor(Color::Rgb {
                                r: color.r,
                                g: color.g,
                                b: color.b,
                            })
                        )?;
                        current = Some(color);
                    }
                }
                queue!(self.out, Print(ch))?;
            }
        }

        let status: String = view
            .status
            .format()
            .chars()
            .take(term_cols as usize)
            .collect();
        queue!(
            self.out,
            ResetColor,
            cursor::MoveTo(0, term_rows.saturating_sub(1)),
            Print(status),
        )?;
        self.out.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        if self.open {
            self.open = false;
            ALTERNATE_SCREEN_ACTIVE.store(false, Ordering::SeqCst);
            queue!(self.out, ResetColor, cursor::Show, LeaveAlternateScreen)?;
            self.out.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> Drop for TerminalPreview<W> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
