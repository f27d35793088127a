use serde::{Deserialize, Serialize};

/// Presentation-wide settings. Constructed programmatically; the defaults
/// target right-to-left Hebrew documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Language tag applied to text boxes.
    pub language: String,
    /// Font size for depth-1 title slides.
    pub title_font_size: u32,
    /// Font size for depth-2 section title slides.
    pub section_font_size: u32,
    /// Font face for fenced code blocks.
    pub monospace_face: String,
    /// Section name used before the first depth-2 heading.
    pub default_section: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        DeckConfig {
            language: "he".to_string(),
            title_font_size: 40,
            section_font_size: 30,
            monospace_face: "Courier New".to_string(),
            default_section: "(Default)".to_string(),
        }
    }
}
