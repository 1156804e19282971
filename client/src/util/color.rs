//! Design tokens and color helpers.
//!
//! Palette, breakpoints and shadows match the web stylesheet.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use crate::state::appointments::AppointmentStatus;

pub const BLUE_PRIMARY: &str = "#0118D8";
pub const BLUE_SECONDARY: &str = "#1B56FD";
pub const BEIGE: &str = "#E9DFC3";
pub const OFFWHITE: &str = "#FFF8F8";

/// Named palette entries, in stylesheet order.
pub const PALETTE: [(&str, &str); 4] = [
    ("blue-primary", BLUE_PRIMARY),
    ("blue-secondary", BLUE_SECONDARY),
    ("beige", BEIGE),
    ("offwhite", OFFWHITE),
];

/// Extra-small breakpoint, in CSS pixels.
pub const BREAKPOINT_XS_PX: u32 = 475;
pub const BACKDROP_BLUR_XS_PX: u32 = 2;

pub const SHADOW_2XL: &str = "0 25px 50px -12px rgba(0, 0, 0, 0.1)";
pub const SHADOW_INNER_LG: &str = "inset 0 2px 10px rgba(0, 0, 0, 0.05)";

pub const BADGE_COMPLETED: &str = "bg-green-100 text-green-800";
pub const BADGE_CANCELLED: &str = "bg-red-100 text-red-800";
pub const BADGE_NO_SHOW: &str = "bg-gray-100 text-gray-800";
pub const BADGE_DEFAULT: &str = "bg-blue-100 text-blue-800";

/// Look up a palette color by name.
pub fn palette_color(name: &str) -> Option<&'static str> {
    PALETTE.iter().find(|(n, _)| *n == name).map(|(_, hex)| *hex)
}

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some((r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

/// CSS `rgba(r, g, b, a)` for a hex color, or `None` if the hex is invalid.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Option<String> {
    let (r, g, b) = parse_hex_rgb(hex)?;
    let alpha = alpha.clamp(0.0, 1.0);
    Some(format!("rgba({r}, {g}, {b}, {alpha})"))
}

/// Badge classes for an appointment status.
pub fn status_badge(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Completed => BADGE_COMPLETED,
        AppointmentStatus::Cancelled => BADGE_CANCELLED,
        AppointmentStatus::NoShow => BADGE_NO_SHOW,
    }
}

/// Same as [`status_badge`] for a raw status string; unknown values get the
/// neutral badge.
pub fn status_badge_str(raw: &str) -> &'static str {
    raw.parse::<AppointmentStatus>().map_or(BADGE_DEFAULT, status_badge)
}
