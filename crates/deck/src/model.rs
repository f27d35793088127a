use serde::{Deserialize, Serialize};

/// One styled run of text. Runs are appended in document order; the only
/// post-hoc adjustment is the trailing `break_after` flag on the last run of
/// a block-level subtree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub strike: Option<Strike>,
    pub rtl: bool,
    pub font_face: Option<String>,
    pub bullet: Option<Bullet>,
    pub indent_level: Option<u32>,
    /// The line break follows the run's own text.
    pub break_after: bool,
}

impl TextRun {
    /// A run with the given text and no styling.
    pub fn plain(text: impl Into<String>) -> Self {
        TextRun {
            text: text.into(),
            ..TextRun::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strike {
    Single,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bullet {
    /// Plain bullet glyph.
    Marker,
    /// Numbered bullet carrying the list's declared start number.
    Numbered { start_at: u64 },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub runs: Vec<TextRun>,
}

/// Rectangular cell matrix: one header row followed by the body rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideTable {
    pub rows: Vec<Vec<TableCell>>,
}

impl SlideTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Top,
    Middle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextBoxStyle {
    pub font_size: Option<u32>,
    pub align: Align,
    pub anchor: Anchor,
    pub bold: bool,
    pub rtl: bool,
    pub lang: String,
}

impl TextBoxStyle {
    /// Centered bold box used by title slides.
    pub fn title(font_size: u32, lang: impl Into<String>) -> Self {
        TextBoxStyle {
            font_size: Some(font_size),
            align: Align::Center,
            anchor: Anchor::Middle,
            bold: true,
            rtl: true,
            lang: lang.into(),
        }
    }

    /// Right-aligned, top-anchored box used for body content.
    pub fn body(lang: impl Into<String>) -> Self {
        TextBoxStyle {
            font_size: None,
            align: Align::Right,
            anchor: Anchor::Top,
            bold: false,
            rtl: true,
            lang: lang.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub runs: Vec<TextRun>,
    pub style: TextBoxStyle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Text(TextBox),
    Table(SlideTable),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Name of the deck section this slide belongs to.
    pub section: String,
    pub shapes: Vec<Shape>,
}

impl Slide {
    pub fn new(section: impl Into<String>) -> Self {
        Slide {
            section: section.into(),
            shapes: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Running document title, taken from the latest depth-1 heading.
    pub title: Option<String>,
    pub slides: Vec<Slide>,
}

#[cfg(test)]
mod tests {
    use super::{Bullet, Deck, Shape, Slide, TextBox, TextBoxStyle, TextRun};

    #[test]
    fn deck_round_trips_through_json() {
        let deck = Deck {
            title: Some("Talk".to_string()),
            slides: vec![Slide {
                section: "(Default)".to_string(),
                shapes: vec![Shape::Text(TextBox {
                    runs: vec![TextRun {
                        text: "hello".to_string(),
                        bullet: Some(Bullet::Numbered { start_at: 3 }),
                        break_after: true,
                        ..TextRun::default()
                    }],
                    style: TextBoxStyle::body("he"),
                })],
            }],
        };

        let json = serde_json::to_string(&deck).unwrap();
        let back: Deck = serde_json::from_str(&json).unwrap();
        assert_eq!(deck, back);
    }
}
