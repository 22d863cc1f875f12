// this_file: backends/midashi-core/src/utils.rs

//! Utility functions for the midashi renderer.

use crate::types::{Color, MAX_TEXT_LEN, MIN_TEXT_LEN};
use crate::{MidashiError, Result};

/// Number of characters (Unicode scalar values) in `text`.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Reject text outside [`MIN_TEXT_LEN`, `MAX_TEXT_LEN`] characters.
pub fn validate_text(text: &str) -> Result<usize> {
    let len = char_count(text);
    if !(MIN_TEXT_LEN..=MAX_TEXT_LEN).contains(&len) {
        return Err(MidashiError::InvalidLength { len });
    }
    Ok(len)
}

/// Parse a colour: `#RRGGBB`, `#RRGGBBAA`, `transparent`, or a few names.
pub fn parse_color(color: &str) -> Result<Color> {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(|| MidashiError::invalid_request(format!("bad colour '#{hex}'")))
        };
        return match hex.len() {
            6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Color::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(MidashiError::invalid_request(format!(
                "bad colour '#{hex}': expected 6 or 8 hex digits"
            ))),
        };
    }

    match color.to_ascii_lowercase().as_str() {
        "transparent" => Ok(Color::TRANSPARENT),
        "black" => Ok(Color::BLACK),
        "gray" | "grey" => Ok(Color::GRAY),
        "white" => Ok(Color::WHITE),
        other => Err(MidashiError::invalid_request(format!(
            "unknown colour '{other}'"
        ))),
    }
}
