use crate::ast::*;

use cowstr::ToCowStr;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser as MdParser, Tag};

/// Partially assembled content for one open container on the event stack.
pub(crate) enum InnerContent {
    Blocks(Vec<Block>),
    Inlines(Vec<Inline>),
    Cells(Vec<TableCell>),
    Table(Table),
}

impl InnerContent {
    fn into_blocks(self) -> Vec<Block> {
        if let InnerContent::Blocks(b) = self {
            b
        } else {
            panic!("expected block content")
        }
    }

    fn into_inlines(self) -> Vec<Inline> {
        if let InnerContent::Inlines(i) = self {
            i
        } else {
            panic!("expected inline content")
        }
    }

    fn into_cells(self) -> Vec<TableCell> {
        if let InnerContent::Cells(c) = self {
            c
        } else {
            panic!("expected table row content")
        }
    }

    fn blocks_mut(&mut self) -> &mut Vec<Block> {
        if let InnerContent::Blocks(b) = self {
            b
        } else {
            panic!("expected block content")
        }
    }

    fn cells_mut(&mut self) -> &mut Vec<TableCell> {
        if let InnerContent::Cells(c) = self {
            c
        } else {
            panic!("expected table row content")
        }
    }

    fn table_mut(&mut self) -> &mut Table {
        if let InnerContent::Table(t) = self {
            t
        } else {
            panic!("expected table content")
        }
    }

    fn push_inline(&mut self, item: Inline) {
        match self {
            InnerContent::Blocks(b) => b.push(Block::Plain(vec![item])),
            InnerContent::Inlines(i) => i.push(item),
            _ => panic!("inline content outside a table cell"),
        }
    }
}

/// Parse a Markdown document into its token tree.
pub fn parse(source: &str) -> Ast {
    Ast {
        blocks: parse_blocks(source),
        source: source.into(),
    }
}

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

fn parse_blocks(source: &str) -> Vec<Block> {
    let parser = MdParser::new_ext(source, parser_options());

    let mut inners = vec![InnerContent::Blocks(Vec::new())];

    for event in parser {
        match event {
            Event::Start(t) => match t {
                Tag::Paragraph
                | Tag::Heading(_, _, _)
                | Tag::CodeBlock(_)
                | Tag::TableCell
                | Tag::Emphasis
                | Tag::Strong
                | Tag::Strikethrough
                | Tag::Link(_, _, _)
                | Tag::Image(_, _, _) => inners.push(InnerContent::Inlines(Vec::new())),
                Tag::BlockQuote | Tag::List(_) | Tag::Item | Tag::FootnoteDefinition(_) => {
                    inners.push(InnerContent::Blocks(Vec::new()))
                }
                Tag::Table(_) => inners.push(InnerContent::Table(Table::default())),
                Tag::TableHead | Tag::TableRow => inners.push(InnerContent::Cells(Vec::new())),
            },
            Event::End(t) => {
                let inner = inners.pop().expect("no inner content");
                let outer = inners.last_mut().expect("no outer content");
                match t {
                    Tag::Paragraph => outer
                        .blocks_mut()
                        .push(Block::Paragraph(inner.into_inlines())),
                    Tag::Heading(lvl, _, _) => outer.blocks_mut().push(Block::Heading {
                        lvl: heading_to_lvl(lvl),
                        inner: inner.into_inlines(),
                    }),
                    Tag::BlockQuote => outer
                        .blocks_mut()
                        .push(Block::BlockQuote(inner.into_blocks())),
                    Tag::List(idx) => outer
                        .blocks_mut()
                        .push(Block::List(idx, inner.into_blocks())),
                    Tag::Item => outer.blocks_mut().push(Block::ListItem(inner.into_blocks())),
                    Tag::FootnoteDefinition(_) => outer
                        .blocks_mut()
                        .push(Block::FootnoteDefinition(inner.into_blocks())),
                    Tag::CodeBlock(kind) => {
                        let lang = match kind {
                            CodeBlockKind::Fenced(info) if !info.is_empty() => {
                                Some(info.to_cowstr())
                            }
                            _ => None,
                        };
                        let mut source = String::new();
                        for item in inner.into_inlines() {
                            if let Inline::Text(s) = item {
                                source.push_str(&s);
                            }
                        }
                        outer.push_inline(Inline::CodeBlock {
                            lang,
                            source: source.into(),
                        });
                    }
                    Tag::Table(_) => {
                        let table = match inner {
                            InnerContent::Table(t) => t,
                            _ => panic!("expected table content"),
                        };
                        outer.blocks_mut().push(Block::Table(table));
                    }
                    Tag::TableHead => outer.table_mut().header = inner.into_cells(),
                    Tag::TableRow => {
                        let row = inner.into_cells();
                        outer.table_mut().rows.push(row);
                    }
                    Tag::TableCell => outer.cells_mut().push(inner.into_inlines()),
                    Tag::Emphasis => {
                        outer.push_inline(Inline::Styled(inner.into_inlines(), Style::Emphasis))
                    }
                    Tag::Strong => {
                        outer.push_inline(Inline::Styled(inner.into_inlines(), Style::Strong))
                    }
                    Tag::Strikethrough => outer.push_inline(Inline::Styled(
                        inner.into_inlines(),
                        Style::Strikethrough,
                    )),
                    Tag::Link(tp, url, title) => outer.push_inline(Inline::Link(
                        tp,
                        url.to_cowstr(),
                        title.to_cowstr(),
                        inner.into_inlines(),
                    )),
                    Tag::Image(tp, url, title) => outer.push_inline(Inline::Image(
                        tp,
                        url.to_cowstr(),
                        title.to_cowstr(),
                        inner.into_inlines(),
                    )),
                }
            }
            Event::Html(src) => inners
                .last_mut()
                .expect("no inner content")
                .push_inline(Inline::Html(src.to_cowstr())),
            Event::FootnoteReference(name) => inners
                .last_mut()
                .expect("no inner content")
                .push_inline(Inline::FootnoteReference(name.to_cowstr())),
            other => {
                let inner = match other {
                    Event::Text(s) => Inline::Text(s.to_cowstr()),
                    Event::Code(s) => Inline::Code(s.to_cowstr()),
                    Event::SoftBreak => Inline::SoftBreak,
                    Event::HardBreak => Inline::HardBreak,
                    Event::Rule => Inline::Rule,
                    _ => unreachable!(),
                };

                inners
                    .last_mut()
                    .expect("no inner content")
                    .push_inline(inner);
            }
        }
    }

    inners.remove(0).into_blocks()
}

fn heading_to_lvl(value: HeadingLevel) -> u8 {
    match value {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Block::ListItem;
    use crate::ast::{parser::parse, plain_text, Block, Inline, Style, Table};

    use pulldown_cmark::LinkType;

    #[test]
    fn markdown_elements() {
        let input = "# Heading\n\n## Subheading\n\n- unordered list\n- item 2\n\n3. ordered list\n4. item 2\n";
        let doc = parse(input);

        let expected = vec![
            Block::Heading {
                lvl: 1,
                inner: vec![Inline::Text("Heading".into())],
            },
            Block::Heading {
                lvl: 2,
                inner: vec![Inline::Text("Subheading".into())],
            },
            Block::List(
                None,
                vec![
                    ListItem(vec![Block::Plain(vec![Inline::Text(
                        "unordered list".into(),
                    )])]),
                    ListItem(vec![Block::Plain(vec![Inline::Text("item 2".into())])]),
                ],
            ),
            Block::List(
                Some(3),
                vec![
                    ListItem(vec![Block::Plain(vec![Inline::Text(
                        "ordered list".into(),
                    )])]),
                    ListItem(vec![Block::Plain(vec![Inline::Text("item 2".into())])]),
                ],
            ),
        ];

        assert_eq!(expected, doc.blocks);
    }

    #[test]
    fn styled_inlines() {
        let doc = parse("Some **bold** and *italic* and ~~gone~~\n");

        let expected = vec![Block::Paragraph(vec![
            Inline::Text("Some ".into()),
            Inline::Styled(vec![Inline::Text("bold".into())], Style::Strong),
            Inline::Text(" and ".into()),
            Inline::Styled(vec![Inline::Text("italic".into())], Style::Emphasis),
            Inline::Text(" and ".into()),
            Inline::Styled(vec![Inline::Text("gone".into())], Style::Strikethrough),
        ])];

        assert_eq!(expected, doc.blocks);
    }

    #[test]
    fn code_blocks_and_spans() {
        let doc = parse("`code inline`\n\n```rust\nfn main() {}\n```\n");

        let expected = vec![
            Block::Paragraph(vec![Inline::Code("code inline".into())]),
            Block::Plain(vec![Inline::CodeBlock {
                lang: Some("rust".into()),
                source: "fn main() {}\n".into(),
            }]),
        ];

        assert_eq!(expected, doc.blocks);
    }

    #[test]
    fn links_and_line_breaks() {
        let doc = parse("[link](path/is/here)<br/>after\n");

        let expected = vec![Block::Paragraph(vec![
            Inline::Link(
                LinkType::Inline,
                "path/is/here".into(),
                "".into(),
                vec![Inline::Text("link".into())],
            ),
            Inline::Html("<br/>".into()),
            Inline::Text("after".into()),
        ])];

        assert_eq!(expected, doc.blocks);
    }

    #[test]
    fn block_quotes_nest_blocks() {
        let doc = parse("> quoted text\n");

        let expected = vec![Block::BlockQuote(vec![Block::Paragraph(vec![
            Inline::Text("quoted text".into()),
        ])])];

        assert_eq!(expected, doc.blocks);
    }

    #[test]
    fn tables() {
        let doc = parse("| a | b |\n| - | - |\n| 1 | 2 |\n");

        let expected = vec![Block::Table(Table {
            header: vec![
                vec![Inline::Text("a".into())],
                vec![Inline::Text("b".into())],
            ],
            rows: vec![vec![
                vec![Inline::Text("1".into())],
                vec![Inline::Text("2".into())],
            ]],
        })];

        assert_eq!(expected, doc.blocks);
    }

    #[test]
    fn footnotes_surface_in_the_tree() {
        let doc = parse("text[^1]\n\n[^1]: note\n");

        let expected = vec![
            Block::Paragraph(vec![
                Inline::Text("text".into()),
                Inline::FootnoteReference("1".into()),
            ]),
            Block::FootnoteDefinition(vec![Block::Paragraph(vec![Inline::Text("note".into())])]),
        ];

        assert_eq!(expected, doc.blocks);
    }

    #[test]
    fn plain_text_strips_styling() {
        let doc = parse("## A **bold** `title`\n");

        let Block::Heading { inner, .. } = &doc.blocks[0] else {
            panic!("expected heading");
        };
        assert_eq!("A bold title", plain_text(inner));
    }
}
