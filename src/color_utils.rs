//diynews/src/color_utils.rs

// Hex colour parsing and terminal styling of badges and calendar dots.
use crossterm::style::{Color, Stylize};

/// Parse a hex color string like "#RRGGBB" or "RRGGBB" into u8 tuple.
pub fn parse_hex_to_u8(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() < 6 || !hex.is_char_boundary(6) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Determines if text on top of this color should be black or white.
/// Input components are expected in [0.0, 1.0] range.
pub fn is_dark(r: f32, g: f32, b: f32) -> bool {
    // Perceptual luminance approximation
    let brightness = 0.299 * r + 0.587 * g + 0.114 * b;
    brightness < 0.5
}

/// Truecolor terminal colour for `hex`.
pub fn hex_to_color(hex: &str) -> Option<Color> {
    parse_hex_to_u8(hex).map(|(r, g, b)| Color::Rgb { r, g, b })
}

/// Background and readable foreground for a badge on `hex`.
pub fn badge_colors(hex: &str) -> Option<(Color, Color)> {
    let (r, g, b) = parse_hex_to_u8(hex)?;
    let label = if is_dark(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0) {
        Color::White
    } else {
        Color::Black
    };
    Some((Color::Rgb { r, g, b }, label))
}

/// `text` in the foreground colour `hex`. Invalid hex leaves the text plain.
pub fn fg(hex: &str, text: &str) -> String {
    match hex_to_color(hex) {
        Some(color) => text.with(color).to_string(),
        None => text.to_string(),
    }
}

/// `text` on a `hex` background with black or white foreground for contrast.
pub fn badge(hex: &str, text: &str) -> String {
    match badge_colors(hex) {
        Some((bg, label)) => format!(" {} ", text).with(label).on(bg).to_string(),
        None => format!("[{}]", text),
    }
}

/// A coloured bullet, as used for the calendar day dots.
pub fn dot(hex: &str) -> String {
    fg(hex, "●")
}
