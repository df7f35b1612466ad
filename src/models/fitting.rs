use serde::{Deserialize, Serialize};

/// Output aspect ratios accepted by the photoshoot pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    StandardPortrait,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::StandardPortrait => "3:4",
            AspectRatio::Standard => "4:3",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Landscape => "16:9",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1:1" => Some(AspectRatio::Square),
            "3:4" => Some(AspectRatio::StandardPortrait),
            "4:3" => Some(AspectRatio::Standard),
            "9:16" => Some(AspectRatio::Portrait),
            "16:9" => Some(AspectRatio::Landscape),
            _ => None,
        }
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        AspectRatio::StandardPortrait
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Preset options offered by the fitting controls. The configuration
/// accepts free strings, so these are a convenience, not a validation set.
pub const MODEL_TYPES: &[&str] = &["female", "male", "androgynous"];

pub const MODEL_RACES: &[&str] = &[
    "Diverse",
    "Black African",
    "East Asian",
    "South Asian",
    "Latina",
    "Middle Eastern",
    "White",
];

pub const POSES: &[&str] = &[
    "Shop Display",
    "Walking",
    "Editorial",
    "Seated",
    "Leaning",
];

pub const BACKGROUNDS: &[&str] = &[
    "Clean",
    "Studio Grey",
    "Urban Street",
    "Golden Hour Outdoors",
    "Botanical",
];

/// Presentation parameters controlling the generated photoshoot's style.
///
/// Immutable per generation call; replace it wholesale between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittingConfig {
    pub model_type: String,
    pub model_race: String,
    pub pose: String,
    pub background: String,
    pub aspect_ratio: AspectRatio,
    pub custom_instructions: Option<String>,
}

impl Default for FittingConfig {
    fn default() -> Self {
        FittingConfig {
            model_type: "female".to_string(),
            model_race: "Diverse".to_string(),
            pose: "Shop Display".to_string(),
            background: "Clean".to_string(),
            aspect_ratio: AspectRatio::StandardPortrait,
            custom_instructions: None,
        }
    }
}

impl FittingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model_type(mut self, model_type: impl Into<String>) -> Self {
        self.model_type = model_type.into();
        self
    }

    pub fn with_model_race(mut self, model_race: impl Into<String>) -> Self {
        self.model_race = model_race.into();
        self
    }

    pub fn with_pose(mut self, pose: impl Into<String>) -> Self {
        self.pose = pose.into();
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_custom_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = Some(instructions.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_round_trips_as_str() {
        for ratio in [
            AspectRatio::Square,
            AspectRatio::StandardPortrait,
            AspectRatio::Standard,
            AspectRatio::Portrait,
            AspectRatio::Landscape,
        ] {
            assert_eq!(AspectRatio::from_str(ratio.as_str()), Some(ratio));
        }
        assert_eq!(AspectRatio::from_str("2:1"), None);
    }

    #[test]
    fn aspect_ratio_serializes_as_ratio_string() {
        let json = serde_json::to_string(&AspectRatio::StandardPortrait).unwrap();
        assert_eq!(json, "\"3:4\"");
    }

    #[test]
    fn default_config_matches_studio_presets() {
        let config = FittingConfig::default();
        assert_eq!(config.model_type, "female");
        assert_eq!(config.model_race, "Diverse");
        assert_eq!(config.pose, "Shop Display");
        assert_eq!(config.background, "Clean");
        assert_eq!(config.aspect_ratio, AspectRatio::StandardPortrait);
        assert!(config.custom_instructions.is_none());
    }

    #[test]
    fn builder_setters_chain() {
        let config = FittingConfig::new()
            .with_model_type("male")
            .with_pose("Walking")
            .with_aspect_ratio(AspectRatio::Landscape)
            .with_custom_instructions("warm tones");
        assert_eq!(config.model_type, "male");
        assert_eq!(config.pose, "Walking");
        assert_eq!(config.aspect_ratio, AspectRatio::Landscape);
        assert_eq!(config.custom_instructions.as_deref(), Some("warm tones"));
    }
}
