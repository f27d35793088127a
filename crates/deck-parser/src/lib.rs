//! Parses Markdown source into the token tree that the deck crate turns into
//! slides. The tree is a closed sum type so consumers can dispatch
//! exhaustively on node kind.

pub mod ast;

pub use ast::parser::parse;
