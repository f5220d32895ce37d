//! Terminal output: raw mode, the ASCII preview and its status line.

mod frame;
mod preview;
mod raw_mode;
mod status_bar;

pub use frame::AsciiFrame;
pub use preview::{NullPreview, Preview, PreviewFrame, TerminalPreview};
pub use raw_mode::{restore_terminal, RawModeGuard};
pub use status_bar::StatusLine;
