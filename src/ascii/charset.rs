//! Character ramps for the ASCII preview.

use std::str::FromStr;

/// 10 levels, darkest (space) to brightest (@). Reads well on dark terminals.
pub const STANDARD_CHARSET: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// 5 levels of Unicode shade blocks.
pub const BLOCKS_CHARSET: &[char] = &[' ', '░', '▒', '▓', '█'];

/// 4 levels, less noisy.
pub const MINIMAL_CHARSET: &[char] = &[' ', '.', ':', '#'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    #[default]
    Standard,
    Blocks,
    Minimal,
}

impl CharSet {
    /// Characters ordered from darkest to brightest.
    pub fn chars(&self) -> &'static [char] {
        match self {
            CharSet::Standard => STANDARD_CHARSET,
            CharSet::Blocks => BLOCKS_CHARSET,
            CharSet::Minimal => MINIMAL_CHARSET,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Standard => "standard",
            CharSet::Blocks => "blocks",
            CharSet::Minimal => "minimal",
        }
    }
}

impl FromStr for CharSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(CharSet::Standard),
            "blocks" => Ok(CharSet::Blocks),
            "minimal" => Ok(CharSet::Minimal),
            other => Err(format!(
                "Unknown charset '{}'. Available: standard, blocks, minimal",
                other
            )),
        }
    }
}
