//! Keyboard commands for the session loop.
//!
//! `q` quits, `c` toggles the camera. Everything else is ignored.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::shutdown;
use crate::terminal::RawModeGuard;

/// A key press the session acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    ToggleCamera,
}

/// Translate a key event into a command.
///
/// Ctrl+C quits too, since raw mode keeps it from raising SIGINT.
pub fn key_command(event: KeyEvent) -> Option<KeyCommand> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Some(KeyCommand::Quit),
        KeyCode::Char('q') => Some(KeyCommand::Quit),
        KeyCode::Char('c') => Some(KeyCommand::ToggleCamera),
        _ => None,
    }
}

/// Source of key commands, polled once per loop iteration.
pub trait KeySource {
    /// Wait up to `timeout` for a command. `Ok(None)` means nothing relevant
    /// was pressed.
    fn poll_command(&mut self, timeout: Duration) -> io::Result<Option<KeyCommand>>;
}

impl<T: KeySource + ?Sized> KeySource for Box<T> {
    fn poll_command(&mut self, timeout: Duration) -> io::Result<Option<KeyCommand>> {
        (**self).poll_command(timeout)
    }
}

/// Reads single key presses from the terminal in raw mode.
pub struct TerminalKeys {
    _raw_mode: RawModeGuard,
}

impl TerminalKeys {
    /// Put the terminal into raw mode; it is restored when this is dropped.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            _raw_mode: RawModeGuard::enter()?,
        })
    }
}

impl KeySource for TerminalKeys {
    fn poll_command(&mut self, timeout: Duration) -> io::Result<Option<KeyCommand>> {
        if shutdown::interrupted() {
            return Ok(Some(KeyCommand::Quit));
        }
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) => Ok(key_command(key)),
            _ => Ok(None),
        }
    }
}

/// No keyboard: waits out the timeout and quits on SIGINT.
#[derive(Debug, Default)]
pub struct HeadlessKeys;

impl KeySource for HeadlessKeys {
    fn poll_command(&mut self, timeout: Duration) -> io::Result<Option<KeyCommand>> {
        if shutdown::interrupted() {
            return Ok(Some(KeyCommand::Quit));
        }
        std::thread::sleep(timeout);
        Ok(None)
    }
}
