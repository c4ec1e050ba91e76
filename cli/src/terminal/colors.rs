use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightCyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const IPV4_ADDR: Color = Color::BrightBlue;
pub const HOSTNAME: Color = Color::BrightMagenta;
pub const UNKNOWN: Color = Color::BrightBlack;
pub const LATENCY: Color = Color::Yellow;
pub const UNREACHABLE: Color = Color::Red;
