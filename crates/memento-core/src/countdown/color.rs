//! Accent color policy.
//!
//! Maps the elapsed ratio to an accent color through four linearly
//! interpolated bands over the *remaining* ratio. The concrete hex values
//! and glow/gradient strings are presentation configuration, isolated in
//! [`ColorPalette`] so the calculator core carries no cosmetic constants.

use serde::{Deserialize, Serialize};

/// Accent colors for one countdown frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accent {
    /// Primary accent, hex RGB.
    pub color: String,
    /// CSS rgba() halo behind the main number.
    pub glow: String,
    /// CSS linear-gradient for filled surfaces.
    pub gradient: String,
}

/// Band endpoints and decoration strings.
///
/// `Default` carries the original palette; drivers may substitute their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorPalette {
    pub cyan: String,
    pub cyan_deep: String,
    pub green: String,
    pub green_deep: String,
    pub orange: String,
    pub orange_deep: String,
    pub red: String,
    pub red_deep: String,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            cyan: "#00d4ff".into(),
            cyan_deep: "#0099ff".into(),
            green: "#a0d911".into(),
            green_deep: "#52c41a".into(),
            orange: "#ff9500".into(),
            orange_deep: "#ff6a00".into(),
            red: "#ff3b5c".into(),
            red_deep: "#ff1744".into(),
        }
    }
}

impl ColorPalette {
    /// Accent for an elapsed ratio in [0, 1].
    ///
    /// Bands over remaining = 1 - elapsed_ratio:
    /// (0.8, 1.0] fixed cyan; (0.5, 0.8] green-to-cyan; (0.2, 0.5]
    /// orange-to-green; [0, 0.2] red-to-orange.
    pub fn accent_for_ratio(&self, elapsed_ratio: f64) -> Accent {
        let remaining = 1.0 - elapsed_ratio;

        if remaining > 0.8 {
            Accent {
                color: self.cyan.clone(),
                glow: "rgba(0, 212, 255, 0.15)".to_string(),
                gradient: gradient(&self.cyan, &self.cyan_deep),
            }
        } else if remaining > 0.5 {
            let t = (remaining - 0.5) / 0.3;
            Accent {
                color: lerp_hex(&self.green, &self.cyan, t),
                glow: "rgba(160, 217, 17, 0.15)".to_string(),
                gradient: gradient(&self.green, &self.green_deep),
            }
        } else if remaining > 0.2 {
            let t = (remaining - 0.2) / 0.3;
            Accent {
                color: lerp_hex(&self.orange, &self.green, t),
                glow: "rgba(255, 149, 0, 0.15)".to_string(),
                gradient: gradient(&self.orange, &self.orange_deep),
            }
        } else {
            let t = remaining / 0.2;
            Accent {
                color: lerp_hex(&self.red, &self.orange, t),
                glow: "rgba(255, 59, 92, 0.2)".to_string(),
                gradient: gradient(&self.red, &self.red_deep),
            }
        }
    }
}

/// Accent for an elapsed ratio using the default palette.
pub fn color_for_ratio(elapsed_ratio: f64) -> Accent {
    ColorPalette::default().accent_for_ratio(elapsed_ratio)
}

fn gradient(from: &str, to: &str) -> String {
    format!("linear-gradient(135deg, {from}, {to})")
}

/// Per-channel linear blend of two hex RGB colors, rounded to the nearest
/// integer and re-encoded as lowercase hex.
fn lerp_hex(from: &str, to: &str, t: f64) -> String {
    let (fr, fg, fb) = parse_hex(from);
    let (tr, tg, tb) = parse_hex(to);
    let mix = |a: u8, b: u8| -> u32 { (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u32 };
    format!("#{:06x}", (mix(fr, tr) << 16) | (mix(fg, tg) << 8) | mix(fb, tb))
}

fn parse_hex(hex: &str) -> (u8, u8, u8) {
    let value = u32::from_str_radix(hex.trim_start_matches('#'), 16).unwrap_or(0);
    (
        ((value >> 16) & 0xff) as u8,
        ((value >> 8) & 0xff) as u8,
        (value & 0xff) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_window_is_cyan() {
        assert_eq!(color_for_ratio(0.0).color, "#00d4ff");
    }

    #[test]
    fn exhausted_window_is_red() {
        assert_eq!(color_for_ratio(1.0).color, "#ff3b5c");
    }

    #[test]
    fn band_top_edges_meet_their_endpoints() {
        // remaining just above 0.8 stays fixed cyan.
        assert_eq!(color_for_ratio(0.19).color, "#00d4ff");
        // remaining = 0.8 enters the green band at t = 1, i.e. cyan.
        assert_eq!(color_for_ratio(0.2).color, "#00d4ff");
        // remaining = 0.5 enters the orange band at t = 1, i.e. green.
        assert_eq!(color_for_ratio(0.5).color, "#a0d911");
        // remaining = 0.2 enters the red band at t = 1, i.e. orange.
        assert_eq!(color_for_ratio(0.8).color, "#ff9500");
    }

    #[test]
    fn lerp_midpoint_rounds_per_channel() {
        // #000000 -> #0000ff at t = 0.5 rounds 127.5 up to 128.
        assert_eq!(lerp_hex("#000000", "#0000ff", 0.5), "#000080");
        assert_eq!(lerp_hex("#ff0000", "#00ff00", 0.0), "#ff0000");
        assert_eq!(lerp_hex("#ff0000", "#00ff00", 1.0), "#00ff00");
    }

    #[test]
    fn gradient_and_glow_follow_the_band() {
        let accent = color_for_ratio(0.95);
        assert!(accent.glow.starts_with("rgba(255, 59, 92"));
        assert!(accent.gradient.contains("#ff3b5c"));
    }
}
