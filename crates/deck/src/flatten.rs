use deck_parser::ast::{Block, Inline, Table};

use crate::error::DeckError;
use crate::model::{Bullet, SlideTable, Strike, TableCell, TextRun};
use crate::state::StyleState;

type Result<T> = std::result::Result<T, DeckError>;

/// Converts token subtrees into flat sequences of [`TextRun`].
#[derive(Clone, Debug)]
pub struct Flattener {
    monospace_face: String,
}

impl Default for Flattener {
    fn default() -> Self {
        Flattener::new("Courier New")
    }
}

/// Per-element flattening, implemented for blocks, inlines and vectors of
/// either.
pub trait FlattenElement<T> {
    /// Append the runs for `elem` and its subtree to `out`, given the style
    /// state inherited from its ancestors.
    fn flatten(&self, elem: &T, state: StyleState, out: &mut Vec<TextRun>) -> Result<()>;
}

/// Implementation for vectors of elements. Automatically implemented for any
/// type that implements the trait.
impl<T: FlattenElement<R>, R> FlattenElement<Vec<R>> for T {
    fn flatten(&self, elems: &Vec<R>, state: StyleState, out: &mut Vec<TextRun>) -> Result<()> {
        elems.iter().try_for_each(|e| self.flatten(e, state, out))
    }
}

impl Flattener {
    pub fn new(monospace_face: impl Into<String>) -> Self {
        Flattener {
            monospace_face: monospace_face.into(),
        }
    }

    /// Flatten a block-level container's children, then force a trailing
    /// line break on the last run this subtree appended. Block boundaries
    /// always terminate with a break; inline containers do not.
    fn flatten_boundary<T>(
        &self,
        elems: &Vec<T>,
        state: StyleState,
        out: &mut Vec<TextRun>,
    ) -> Result<()>
    where
        Self: FlattenElement<Vec<T>>,
    {
        let before = out.len();
        self.flatten(elems, state, out)?;
        if out.len() > before {
            if let Some(last) = out.last_mut() {
                last.break_after = true;
            }
        }
        Ok(())
    }

    fn flatten_list(
        &self,
        start: Option<u64>,
        items: &[Block],
        state: StyleState,
        out: &mut Vec<TextRun>,
    ) -> Result<()> {
        let bullet = match start {
            Some(start_at) => Bullet::Numbered { start_at },
            None => Bullet::Marker,
        };
        let state = state.enter_list();

        for item in items {
            // Each item flattens into its own sequence so that exactly one
            // run carries the bullet and exactly one run ends the line, no
            // matter how many inline runs the item expands to.
            let mut item_runs = Vec::new();
            self.flatten(item, state, &mut item_runs)?;
            let last = item_runs.len().saturating_sub(1);
            for (idx, run) in item_runs.iter_mut().enumerate() {
                if idx == 0 {
                    run.bullet = Some(bullet);
                    run.indent_level = state.indent();
                }
                run.break_after = idx == last;
            }
            out.append(&mut item_runs);
        }
        Ok(())
    }

    /// Flatten one table into its cell matrix. Every cell is flattened from
    /// the default style state; cells do not inherit surrounding styling.
    pub fn extract_table(&self, table: &Table) -> Result<SlideTable> {
        let rows = std::iter::once(&table.header)
            .chain(table.rows.iter())
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let mut runs = Vec::new();
                        self.flatten(cell, StyleState::default(), &mut runs)?;
                        Ok(TableCell { runs })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(SlideTable { rows })
    }
}

impl FlattenElement<Block> for Flattener {
    fn flatten(&self, elem: &Block, state: StyleState, out: &mut Vec<TextRun>) -> Result<()> {
        match elem {
            Block::Heading { inner, .. } => self.flatten_boundary(inner, state, out),
            Block::Paragraph(inner) => self.flatten_boundary(inner, state, out),
            Block::Plain(inner) => self.flatten(inner, state, out),
            Block::BlockQuote(blocks) => self.flatten_boundary(blocks, state, out),
            Block::ListItem(blocks) => self.flatten_boundary(blocks, state, out),
            Block::List(start, items) => self.flatten_list(*start, items, state, out),
            Block::Table(_) => Err(DeckError::UnsupportedToken { kind: "table" }),
            Block::FootnoteDefinition(_) => Err(DeckError::UnsupportedToken {
                kind: "footnote definition",
            }),
        }
    }
}

impl FlattenElement<Inline> for Flattener {
    fn flatten(&self, elem: &Inline, state: StyleState, out: &mut Vec<TextRun>) -> Result<()> {
        match elem {
            Inline::Text(s) => {
                out.push(styled_run(s, state, true));
                Ok(())
            }
            // Inline code keeps the ancestor styling but is always
            // left-to-right.
            Inline::Code(s) => {
                out.push(styled_run(s, state, false));
                Ok(())
            }
            Inline::CodeBlock { source, .. } => {
                out.push(TextRun {
                    text: source.to_string(),
                    rtl: false,
                    font_face: Some(self.monospace_face.clone()),
                    ..TextRun::default()
                });
                Ok(())
            }
            Inline::SoftBreak => {
                out.push(styled_run(" ", state, true));
                Ok(())
            }
            Inline::HardBreak => {
                out.push(TextRun::plain("\n"));
                Ok(())
            }
            Inline::Html(src) => {
                if src.trim() == "<br/>" {
                    out.push(TextRun::plain("\n"));
                    Ok(())
                } else {
                    Err(DeckError::UnsupportedMarkup(src.to_string()))
                }
            }
            Inline::Styled(inner, style) => self.flatten(inner, state.styled(*style), out),
            Inline::Link(_, _, _, inner) => self.flatten(inner, state, out),
            Inline::Image(_, _, _, _) => Err(DeckError::UnsupportedToken { kind: "image" }),
            Inline::Rule => Err(DeckError::UnsupportedToken {
                kind: "thematic break",
            }),
            Inline::FootnoteReference(_) => Err(DeckError::UnsupportedToken {
                kind: "footnote reference",
            }),
        }
    }
}

fn styled_run(text: &str, state: StyleState, rtl: bool) -> TextRun {
    TextRun {
        text: text.to_string(),
        bold: state.bold(),
        italic: state.italic(),
        strike: state.struck().then_some(Strike::Single),
        rtl,
        ..TextRun::default()
    }
}
