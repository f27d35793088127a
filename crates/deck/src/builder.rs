use deck_parser::ast::{plain_text, Ast, Block, Inline, Style};

use crate::config::DeckConfig;
use crate::error::DeckError;
use crate::flatten::{FlattenElement, Flattener};
use crate::model::{Deck, Shape, Slide, TextBox, TextBoxStyle, TextRun};
use crate::state::StyleState;

/// Scans a document's top-level blocks once, left to right, and assembles
/// the slide sequence: headings open slides, tables attach directly to the
/// current slide, and everything else accumulates into a pending text box
/// that is flushed at every slide boundary and at end of document.
pub struct DeckBuilder {
    config: DeckConfig,
    flattener: Flattener,
    deck: Deck,
    section: String,
    pending: Vec<TextRun>,
    has_open_slide: bool,
}

impl DeckBuilder {
    pub fn new(config: DeckConfig) -> Self {
        let flattener = Flattener::new(config.monospace_face.clone());
        let section = config.default_section.clone();
        DeckBuilder {
            config,
            flattener,
            deck: Deck::default(),
            section,
            pending: Vec::new(),
            has_open_slide: false,
        }
    }

    pub fn build(mut self, ast: &Ast) -> Result<Deck, DeckError> {
        for block in &ast.blocks {
            self.push_block(block)?;
        }
        self.flush_pending();
        // a boundary heading opens a slide even when nothing lands on it;
        // drop the blanks
        self.deck.slides.retain(|slide| !slide.shapes.is_empty());
        Ok(self.deck)
    }

    fn push_block(&mut self, block: &Block) -> Result<(), DeckError> {
        match block {
            Block::Heading { lvl, inner } => self.push_heading(block, *lvl, inner),
            Block::Table(table) => {
                let table = self.flattener.extract_table(table)?;
                self.ensure_slide().shapes.push(Shape::Table(table));
                Ok(())
            }
            other => self
                .flattener
                .flatten(other, StyleState::default(), &mut self.pending),
        }
    }

    /// Headings up to depth 3 are slide boundaries; depths 1 and 2 add a
    /// dedicated title slide before the content slide. A depth-1 heading
    /// contributes no body runs; every other heading renders bold into the
    /// body stream.
    fn push_heading(&mut self, block: &Block, lvl: u8, inner: &[Inline]) -> Result<(), DeckError> {
        if lvl <= 3 {
            self.flush_pending();
            if lvl <= 2 {
                self.push_title_slide(lvl, inner)?;
            }
            self.open_slide();
        }
        if lvl == 1 {
            self.deck.title = Some(plain_text(inner));
            return Ok(());
        }
        let state = StyleState::default().styled(Style::Strong);
        self.flattener.flatten(block, state, &mut self.pending)
    }

    fn push_title_slide(&mut self, lvl: u8, inner: &[Inline]) -> Result<(), DeckError> {
        let font_size = if lvl == 1 {
            self.config.title_font_size
        } else {
            self.section = plain_text(inner);
            self.config.section_font_size
        };

        // the heading text itself renders unstyled; the box is bold and
        // centered
        let mut runs = Vec::new();
        for item in inner {
            self.flattener
                .flatten(item, StyleState::default(), &mut runs)?;
        }
        if let Some(last) = runs.last_mut() {
            last.break_after = true;
        }

        let style = TextBoxStyle::title(font_size, self.config.language.clone());
        self.deck.slides.push(Slide {
            section: self.section.clone(),
            shapes: vec![Shape::Text(TextBox { runs, style })],
        });
        Ok(())
    }

    fn open_slide(&mut self) {
        self.deck.slides.push(Slide::new(self.section.clone()));
        self.has_open_slide = true;
    }

    fn ensure_slide(&mut self) -> &mut Slide {
        if !self.has_open_slide {
            self.open_slide();
        }
        self.deck.slides.last_mut().expect("a slide is open")
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let runs = std::mem::take(&mut self.pending);
        let style = TextBoxStyle::body(self.config.language.clone());
        self.ensure_slide()
            .shapes
            .push(Shape::Text(TextBox { runs, style }));
    }
}

/// Image-to-slide conversion. Unfinished: invoking it is an error by
/// contract rather than a silent drop.
pub fn image_shape(_url: &str, _alt: &str) -> Result<Shape, DeckError> {
    Err(DeckError::NotImplemented)
}
