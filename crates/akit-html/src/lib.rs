//! anatomykit HTML Parser
//!
//! html5ever front end that produces `akit_dom::Document`s, used to build
//! widget markup for tests and embedders.

mod parser;

use akit_dom::{Document, DomError, NodeId};

pub use parser::HtmlParser;

/// Parse a full HTML document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse a fragment; returns the document and the fragment's first element
pub fn parse_fragment(html: &str) -> Result<(Document, NodeId), ParseError> {
    HtmlParser::new().parse_fragment(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read markup: {0}")]
    Io(#[from] std::io::Error),

    #[error("fragment contains no element")]
    EmptyFragment,

    #[error(transparent)]
    Dom(#[from] DomError),
}
