//! deckdown converts Markdown documents into PowerPoint presentations:
//! headings become title and section slides, paragraphs and lists become
//! styled text boxes, and tables become slide tables.

pub mod pipeline;
