//! Prompt form catalog: the option lists the frontend renders in the
//! submission form, plus the aspect ratio wire type shared with the
//! generation client.

use serde::{Deserialize, Serialize};

pub const IMAGE_STYLES: &[&str] = &[
    "Photographic",
    "Anime",
    "Fantasy",
    "Cyberpunk",
    "Minimalist",
    "Abstract",
    "Impressionistic",
    "Pop Art",
    "Steampunk",
];

pub const IMAGE_MOODS: &[&str] = &[
    "Dramatic",
    "Cheerful",
    "Calm",
    "Mysterious",
    "Energetic",
    "Romantic",
    "Gloomy",
    "Whimsical",
];

pub const IMAGE_QUALITIES: &[&str] = &["Standard", "High", "Ultra"];

/// Aspect ratio hint for a generation request.
///
/// The model has no structured aspect-ratio parameter, so this only ever
/// reaches the provider as a textual suffix on the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "3:4")]
    Tall,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Tall => "3:4",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Square => "Square (1:1)",
            AspectRatio::Widescreen => "Widescreen (16:9)",
            AspectRatio::Portrait => "Portrait (9:16)",
            AspectRatio::Landscape => "Landscape (4:3)",
            AspectRatio::Tall => "Tall (3:4)",
        }
    }

    pub fn all() -> &'static [AspectRatio] {
        &[
            AspectRatio::Square,
            AspectRatio::Widescreen,
            AspectRatio::Portrait,
            AspectRatio::Landscape,
            AspectRatio::Tall,
        ]
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        AspectRatio::Square
    }
}

/// One labeled aspect ratio entry for the frontend selector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectRatioOption {
    pub label: String,
    pub value: AspectRatio,
}

/// All form option lists, fetched once by the frontend on startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptOptions {
    pub styles: Vec<String>,
    pub moods: Vec<String>,
    pub qualities: Vec<String>,
    pub aspect_ratios: Vec<AspectRatioOption>,
}

pub fn prompt_options() -> PromptOptions {
    PromptOptions {
        styles: IMAGE_STYLES.iter().map(|s| s.to_string()).collect(),
        moods: IMAGE_MOODS.iter().map(|s| s.to_string()).collect(),
        qualities: IMAGE_QUALITIES.iter().map(|s| s.to_string()).collect(),
        aspect_ratios: AspectRatio::all()
            .iter()
            .map(|r| AspectRatioOption {
                label: r.label().to_string(),
                value: *r,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_wire_format() {
        let json = serde_json::to_string(&AspectRatio::Widescreen).unwrap();
        assert_eq!(json, "\"16:9\"");

        let parsed: AspectRatio = serde_json::from_str("\"9:16\"").unwrap();
        assert_eq!(parsed, AspectRatio::Portrait);
    }

    #[test]
    fn test_aspect_ratio_rejects_unknown_value() {
        let result: Result<AspectRatio, _> = serde_json::from_str("\"2:1\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_prompt_options_complete() {
        let options = prompt_options();
        assert_eq!(options.styles.len(), 9);
        assert_eq!(options.moods.len(), 8);
        assert_eq!(options.qualities, vec!["Standard", "High", "Ultra"]);
        assert_eq!(options.aspect_ratios.len(), 5);
        assert_eq!(options.aspect_ratios[0].label, "Square (1:1)");
    }
}
