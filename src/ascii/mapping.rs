//! Brightness to character mapping.

/// Map a brightness value (0-255) to a character of `charset`.
///
/// `charset` runs from darkest to brightest; `invert` flips the ramp for
/// light terminal themes. An empty charset maps everything to a space.
#[inline]
pub fn map_to_char(brightness: u8, charset: &[char], invert: bool) -> char {
    if charset.is_empty() {
        return ' ';
    }
    let b = if invert { 255 - brightness } else { brightness };
    charset[(b as usize * (charset.len() - 1)) / 255]
}
