//! Status icons
//!
//! Nerd Font glyphs used by the built-in providers. They are spelled as
//! escapes because most editors cannot show private-use code points.

pub const MUSIC_PLAY: &str = "\u{f04b}";
pub const MUSIC_PAUSE: &str = "\u{f04c}";

pub const TEMP_FIRE: &str = "\u{f0238}";
pub const TEMP: &str = "\u{f2c9}";

pub const CPU: &str = "\u{f0ee0}";
pub const RAM: &str = "\u{f035b}";

pub const WIFI_DOWN: &str = "\u{f092f}";
pub const WIFI_FULL: &str = "\u{f0928}";
pub const WIFI_AVG: &str = "\u{f0922}";
pub const WIFI_BAD: &str = "\u{f091f}";

pub const ARROW_UP: &str = "\u{f062}";
pub const ARROW_DOWN: &str = "\u{f063}";

pub const NETWORK: &str = "\u{f06f3}";
pub const PERSON: &str = "\u{f415}";

pub const VOL_MUTE: &str = "\u{f075f}";
pub const VOL_ON: &str = "\u{f057e}";

pub const MIC_OFF: &str = "\u{f036d}";
pub const MIC_ON: &str = "\u{f036c}";

pub const NEWSPAPER: &str = "\u{1f4f0}";
pub const TOUCHGRASS: &str = "\u{f038f}";
pub const CALENDAR: &str = "\u{f073}";
pub const CLOCK: &str = "\u{f0954}";

pub const BATTERY_FULL_CHARGED: &str = "\u{f0085}";

/// Battery levels 0%..100% in steps of ten, discharging then charging.
pub const BATTERY: [&str; 22] = [
    "\u{f008e}", "\u{f007a}", "\u{f007b}", "\u{f007c}", "\u{f007d}", "\u{f007e}",
    "\u{f007f}", "\u{f0080}", "\u{f0081}", "\u{f0082}", "\u{f0079}",
    "\u{f089f}", "\u{f089c}", "\u{f0086}", "\u{f0087}", "\u{f0088}", "\u{f089d}",
    "\u{f0089}", "\u{f089e}", "\u{f008a}", "\u{f008b}", "\u{f0085}",
];
