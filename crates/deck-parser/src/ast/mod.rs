pub mod parser;

use cowstr::CowStr;
use serde::{Deserialize, Serialize};

pub use pulldown_cmark::LinkType;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ast {
    pub blocks: Vec<Block>,
    pub source: CowStr,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Heading {
        lvl: u8,
        inner: Vec<Inline>,
    },
    /// Inline content without paragraph semantics (tight list items,
    /// top-level leaf tokens).
    Plain(Vec<Inline>),
    Paragraph(Vec<Inline>),
    BlockQuote(Vec<Block>),
    /// A list - ordered (with its start number) or unordered.
    List(Option<u64>, Vec<Block>),
    ListItem(Vec<Block>),
    Table(Table),
    FootnoteDefinition(Vec<Block>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Inline {
    /// Plain text
    Text(CowStr),
    Styled(Vec<Inline>, Style),
    /// Inline code
    Code(CowStr),
    /// A fenced or indented code block.
    CodeBlock {
        lang: Option<CowStr>,
        source: CowStr,
    },
    SoftBreak,
    HardBreak,
    /// Horizontal rule
    Rule,
    /// An inline image: link type, url, title, alt content.
    Image(LinkType, CowStr, CowStr, Vec<Inline>),
    /// An inline link: link type, url, title, link content.
    Link(LinkType, CowStr, CowStr, Vec<Inline>),
    /// Unescaped html.
    Html(CowStr),
    FootnoteReference(CowStr),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    Emphasis,
    Strong,
    Strikethrough,
}

/// One table cell's inline content.
pub type TableCell = Vec<Inline>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub header: Vec<TableCell>,
    pub rows: Vec<Vec<TableCell>>,
}

/// Concatenated literal text of an inline subtree. Used for section names
/// and the deck title, where styling is irrelevant.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    collect_plain_text(inlines, &mut out);
    out
}

fn collect_plain_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(s) | Inline::Code(s) => out.push_str(s),
            Inline::Styled(inner, _) => collect_plain_text(inner, out),
            Inline::Link(_, _, _, inner) => collect_plain_text(inner, out),
            Inline::SoftBreak | Inline::HardBreak => out.push(' '),
            _ => {}
        }
    }
}
