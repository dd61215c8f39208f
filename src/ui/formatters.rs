/// SI prefixes used for byte counts and rates.
const PREFIXES: [&str; 9] = ["", "k", "M", "G", "T", "P", "E", "Z", "Y"];
const BASE: f64 = 1000.0;

/// Color markers understood by the statuscolors bar patch.
///
/// The byte value selects a scheme from the bar's color table; `Norm`
/// switches back to the default scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Norm,
    Sel,
    Blue,
    Green,
    Orange,
    Red,
    Yellow,
    Magenta,
    Cyan,
}

impl Color {
    pub fn marker(self) -> &'static str {
        match self {
            Color::Norm => "\x01",
            Color::Sel => "\x02",
            Color::Blue => "\x03",
            Color::Green => "\x04",
            Color::Orange => "\x05",
            Color::Red => "\x06",
            Color::Yellow => "\x07",
            Color::Magenta => "\x08",
            Color::Cyan => "\x09",
        }
    }
}

/// Wrap `text` in a color marker, resetting to the normal scheme afterwards.
pub fn paint(color: Color, text: &str) -> String {
    format!("{}{}{}", color.marker(), text, Color::Norm.marker())
}

/// Remove color markers, e.g. for terminal output.
pub fn strip_markers(text: &str) -> String {
    text.chars().filter(|c| !('\x01'..='\x09').contains(c)).collect()
}

/// Format a quantity with an SI prefix and one decimal (`1.5k`, `3.2G`).
pub fn format_si(value: f64) -> String {
    let mut value = value;
    let mut i = 0;
    while i < PREFIXES.len() - 1 && value >= BASE {
        value /= BASE;
        i += 1;
    }
    format!("{:.1}{}", value, PREFIXES[i])
}

/// Largest prefix of `text` that fits in `max` bytes without splitting a character.
pub fn truncate_utf8(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
