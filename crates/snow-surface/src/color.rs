use serde::{Deserialize, Serialize};

/// RGBA color in linear space with values in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub const fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Convert sRGB color (0-255) to linear space
    #[inline]
    pub const fn from_srgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        const fn srgb_to_linear(c: u8) -> f32 {
            let x = c as f32 / 255.0;
            if x <= 0.04045 {
                x / 12.92
            } else {
                // Polynomial approximation of ((x + 0.055) / 1.055)^2.4
                let t = (x + 0.055) / 1.055;
                t * t * (0.5870 * t + 0.4130)
            }
        }

        Self::new(
            srgb_to_linear(r),
            srgb_to_linear(g),
            srgb_to_linear(b),
            a as f32 / 255.0,
        )
    }

    /// Same color with the alpha channel replaced
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }
}

/// Named snow tints used by the built-in palettes
pub mod snow {
    use super::Color;

    pub const WHITE: Color = Color::from_srgba(255, 255, 255, 255);
    pub const ALICE_BLUE: Color = Color::from_srgba(240, 248, 255, 255);
    pub const LIGHT_BLUE: Color = Color::from_srgba(173, 216, 230, 255);
    pub const LIGHT_SKY_BLUE: Color = Color::from_srgba(135, 206, 250, 255);
    pub const PERIWINKLE: Color = Color::from_srgba(200, 220, 255, 255);
    pub const ORCHID_MIST: Color = Color::from_srgba(255, 200, 255, 255);
    pub const THISTLE: Color = Color::from_srgba(216, 191, 216, 255);
    pub const PLUM: Color = Color::from_srgba(221, 160, 221, 255);
    pub const GOLD: Color = Color::from_srgba(255, 215, 0, 255);
    pub const CORNSILK: Color = Color::from_srgba(255, 248, 220, 255);
    pub const PINK: Color = Color::from_srgba(255, 192, 203, 255);
    pub const LIGHT_GREEN: Color = Color::from_srgba(144, 238, 144, 255);
    pub const LIGHT_YELLOW: Color = Color::from_srgba(255, 255, 224, 255);
}

/// Catppuccin Mocha, used for the demo scene
pub mod mocha {
    use super::Color;

    pub const BLUE: Color = Color::from_srgba(137, 180, 250, 255);
    pub const LAVENDER: Color = Color::from_srgba(180, 190, 254, 255);
    pub const MAUVE: Color = Color::from_srgba(203, 166, 247, 255);
    pub const TEAL: Color = Color::from_srgba(148, 226, 213, 255);
    pub const SURFACE2: Color = Color::from_srgba(88, 91, 112, 255);
    pub const SURFACE1: Color = Color::from_srgba(69, 71, 90, 255);
    pub const SURFACE0: Color = Color::from_srgba(49, 50, 68, 255);
    pub const BASE: Color = Color::from_srgba(30, 30, 46, 255);
    pub const MANTLE: Color = Color::from_srgba(24, 24, 37, 255);
    pub const CRUST: Color = Color::from_srgba(17, 17, 27, 255);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_extremes() {
        let white = snow::WHITE;
        assert!((white.r - 1.0).abs() < 1e-3);
        assert!((white.b - 1.0).abs() < 1e-3);
        assert_eq!(white.a, 1.0);
        assert_eq!(Color::from_srgba(0, 0, 0, 0), Color::transparent());
    }

    #[test]
    fn test_with_alpha_clamps() {
        assert_eq!(snow::WHITE.with_alpha(1.7).a, 1.0);
        assert_eq!(snow::WHITE.with_alpha(-0.2).a, 0.0);
        assert_eq!(snow::WHITE.with_alpha(0.4).a, 0.4);
    }
}
