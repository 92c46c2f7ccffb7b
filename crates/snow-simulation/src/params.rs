//! Snowfall configuration and presets
//!
//! [`SnowConfig`] is the immutable snapshot the engine reads every tick.
//! Partial updates go through [`SnowConfigPatch`], which is also what named
//! presets store.

use serde::{Deserialize, Serialize};
use snow_physics::{Millis, Shape};
use snow_surface::{snow, Color};

/// Inclusive range flake sizes are drawn from
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f32,
    pub max: f32,
}

impl SizeRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Rendering quality tier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    Low,
    #[default]
    Medium,
    High,
}

impl PerformanceTier {
    /// Segments used to approximate round flakes
    pub fn circle_segments(self) -> u32 {
        match self {
            PerformanceTier::Low => 8,
            PerformanceTier::Medium => 16,
            PerformanceTier::High => 32,
        }
    }
}

/// Missing fields deserialize to their defaults
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnowConfig {
    /// Target number of falling particles
    pub intensity: u32,
    /// Scale of the horizontal drift given to new particles
    pub wind_strength: f32,
    pub size: SizeRange,
    /// Colors picked per draw; alpha is replaced by the particle's opacity
    pub palette: Vec<Color>,
    pub shapes: Vec<Shape>,
    /// Whether particles stick to registered regions
    pub accumulation: bool,
    /// Time a stuck particle stays fully visible before fading
    pub fade_delay_ms: Millis,
    pub fade_duration_ms: Millis,
    /// Per-region cap on stuck particles
    pub max_stuck: usize,
    pub interactive: bool,
    pub performance: PerformanceTier,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            intensity: 100,
            wind_strength: 1.0,
            size: SizeRange::new(2.0, 6.0),
            palette: vec![snow::WHITE, snow::ALICE_BLUE],
            shapes: Shape::ALL.to_vec(),
            accumulation: true,
            fade_delay_ms: 5000,
            fade_duration_ms: 2000,
            max_stuck: 50,
            interactive: true,
            performance: PerformanceTier::Medium,
        }
    }
}

impl SnowConfig {
    /// Apply every field present in `patch`
    pub fn merge(&mut self, patch: &SnowConfigPatch) {
        if let Some(v) = patch.intensity {
            self.intensity = v;
        }
        if let Some(v) = patch.wind_strength {
            self.wind_strength = v;
        }
        if let Some(v) = patch.size {
            self.size = v;
        }
        if let Some(v) = &patch.palette {
            self.palette = v.clone();
        }
        if let Some(v) = &patch.shapes {
            self.shapes = v.clone();
        }
        if let Some(v) = patch.accumulation {
            self.accumulation = v;
        }
        if let Some(v) = patch.fade_delay_ms {
            self.fade_delay_ms = v;
        }
        if let Some(v) = patch.fade_duration_ms {
            self.fade_duration_ms = v;
        }
        if let Some(v) = patch.max_stuck {
            self.max_stuck = v;
        }
        if let Some(v) = patch.interactive {
            self.interactive = v;
        }
        if let Some(v) = patch.performance {
            self.performance = v;
        }
    }

    /// A copy with `patch` applied
    pub fn merged(&self, patch: &SnowConfigPatch) -> Self {
        let mut config = self.clone();
        config.merge(patch);
        config
    }
}

/// Partial configuration: `None` fields leave the current value alone
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnowConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_strength: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<Vec<Color>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shapes: Option<Vec<Shape>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accumulation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_delay_ms: Option<Millis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_duration_ms: Option<Millis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_stuck: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceTier>,
}

impl SnowConfigPatch {
    pub fn with_intensity(mut self, intensity: u32) -> Self {
        self.intensity = Some(intensity);
        self
    }

    pub fn with_wind_strength(mut self, wind_strength: f32) -> Self {
        self.wind_strength = Some(wind_strength);
        self
    }

    pub fn with_size(mut self, min: f32, max: f32) -> Self {
        self.size = Some(SizeRange::new(min, max));
        self
    }

    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn with_shapes(mut self, shapes: Vec<Shape>) -> Self {
        self.shapes = Some(shapes);
        self
    }

    pub fn with_accumulation(mut self, accumulation: bool) -> Self {
        self.accumulation = Some(accumulation);
        self
    }

    pub fn with_fade(mut self, delay_ms: Millis, duration_ms: Millis) -> Self {
        self.fade_delay_ms = Some(delay_ms);
        self.fade_duration_ms = Some(duration_ms);
        self
    }

    pub fn with_max_stuck(mut self, max_stuck: usize) -> Self {
        self.max_stuck = Some(max_stuck);
        self
    }

    pub fn with_performance(mut self, performance: PerformanceTier) -> Self {
        self.performance = Some(performance);
        self
    }
}

/// A named, user-manageable configuration patch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnowPreset {
    pub name: String,
    pub config: SnowConfigPatch,
}

impl SnowPreset {
    pub fn new(name: impl Into<String>, config: SnowConfigPatch) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Presets a fresh store starts with
pub fn default_presets() -> Vec<SnowPreset> {
    vec![
        SnowPreset::new(
            "Light Snow",
            SnowConfigPatch::default()
                .with_intensity(50)
                .with_wind_strength(0.5),
        ),
        SnowPreset::new(
            "Blizzard",
            SnowConfigPatch::default()
                .with_intensity(300)
                .with_wind_strength(2.0)
                .with_size(3.0, 8.0),
        ),
        SnowPreset::new(
            "Magic",
            SnowConfigPatch::default()
                .with_palette(vec![snow::WHITE, snow::PERIWINKLE, snow::ORCHID_MIST])
                .with_shapes(vec![Shape::Star, Shape::Cross]),
        ),
    ]
}

/// Built-in intensity levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Light,
    Medium,
    Heavy,
    Blizzard,
}

impl Intensity {
    pub const ALL: [Intensity; 4] = [
        Intensity::Light,
        Intensity::Medium,
        Intensity::Heavy,
        Intensity::Blizzard,
    ];

    pub fn patch(self) -> SnowConfigPatch {
        let (intensity, wind) = match self {
            Intensity::Light => (50, 0.5),
            Intensity::Medium => (100, 1.0),
            Intensity::Heavy => (200, 1.5),
            Intensity::Blizzard => (300, 2.0),
        };
        SnowConfigPatch::default()
            .with_intensity(intensity)
            .with_wind_strength(wind)
    }
}

/// Built-in color themes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Default,
    Blue,
    Purple,
    Gold,
    Rainbow,
    Pastel,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Default,
        Theme::Blue,
        Theme::Purple,
        Theme::Gold,
        Theme::Rainbow,
        Theme::Pastel,
    ];

    pub fn palette(self) -> Vec<Color> {
        match self {
            Theme::Default => vec![snow::WHITE],
            Theme::Blue => vec![snow::WHITE, snow::LIGHT_BLUE, snow::LIGHT_SKY_BLUE],
            Theme::Purple => vec![snow::WHITE, snow::THISTLE, snow::PLUM],
            Theme::Gold => vec![snow::WHITE, snow::GOLD, snow::CORNSILK],
            // Rainbow and pastel ship the same colors
            Theme::Rainbow | Theme::Pastel => vec![
                snow::WHITE,
                snow::PINK,
                snow::LIGHT_BLUE,
                snow::LIGHT_GREEN,
                snow::LIGHT_YELLOW,
            ],
        }
    }

    pub fn patch(self) -> SnowConfigPatch {
        SnowConfigPatch::default().with_palette(self.palette())
    }

    pub fn next(self) -> Theme {
        let i = Theme::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Theme::ALL[(i + 1) % Theme::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_only_touches_present_fields() {
        let mut config = SnowConfig::default();
        config.merge(&SnowConfigPatch::default().with_intensity(300));

        assert_eq!(config.intensity, 300);
        assert_eq!(config.wind_strength, 1.0);
        assert_eq!(config.fade_delay_ms, 5000);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: SnowConfig =
            serde_json::from_str(r#"{"intensity": 7, "performance": "high"}"#).unwrap();

        assert_eq!(config.intensity, 7);
        assert_eq!(config.performance, PerformanceTier::High);
        assert_eq!(config.max_stuck, 50);
        assert_eq!(config.palette, SnowConfig::default().palette);
    }

    #[test]
    fn test_intensity_presets() {
        let config = SnowConfig::default().merged(&Intensity::Heavy.patch());
        assert_eq!(config.intensity, 200);
        assert_eq!(config.wind_strength, 1.5);
    }

    #[test]
    fn test_theme_cycle_wraps() {
        assert_eq!(Theme::Pastel.next(), Theme::Default);
        assert_eq!(Theme::Default.next(), Theme::Blue);
    }

    #[test]
    fn test_patch_json_omits_missing_fields() {
        let patch = SnowConfigPatch::default().with_intensity(50);
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"intensity":50}"#);

        let back: SnowConfigPatch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, patch);
    }

    #[test]
    fn test_shapes_accept_circle_alias() {
        let shapes: Vec<Shape> = serde_json::from_str(r#"["circle","star","cross"]"#).unwrap();
        assert_eq!(shapes, Shape::ALL.to_vec());
    }

    #[test]
    fn test_performance_tier_segments() {
        assert!(PerformanceTier::Low.circle_segments() < PerformanceTier::High.circle_segments());
        assert_eq!(SnowConfig::default().performance.circle_segments(), 16);
    }
}
