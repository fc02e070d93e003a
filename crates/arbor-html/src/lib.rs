//! HTML tokenizer and tree builder for the arbor parser.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - All tokenization states, including script data and CDATA sections
//!   - DOCTYPE, comment, and character reference handling
//!   - An insertion point for `document.write`
//!
//! - **HTML Parser / Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes and the rules for foreign content
//!   - The stack of open elements and the list of active formatting elements
//!   - The adoption agency algorithm and foster parenting
//!   - Template contents, form owners and quirks mode
//!   - Fragment parsing ([§ 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments))
//!
//! # Example
//!
//! ```
//! use arbor_html::{dump_tree, parse_document};
//!
//! let (tree, issues) = parse_document("<p>Hello");
//! assert!(issues.iter().any(|issue| issue.message == "missing-doctype"));
//! assert_eq!(
//!     dump_tree(&tree),
//!     "| <html>\n|   <head>\n|   <body>\n|     <p>\n|       \"Hello\"\n"
//! );
//! ```

/// Errors returned by the public parsing API.
pub mod error;
/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

use arbor_dom::DomTree;

pub use error::HtmlError;
pub use parser::{
    DocumentFragment, HTMLParser, InsertionMode, ParseIssue, dump_fragment, dump_tree,
    parse_fragment, parse_fragment_with_context_tag, print_tree,
};
pub use tokenizer::{Attribute, HTMLTokenizer, LexerState, Token, TokenSource};

/// Parse a complete document with scripting disabled.
///
/// Returns the tree and every parse error recorded along the way.
#[must_use]
pub fn parse_document(html: &str) -> (DomTree, Vec<ParseIssue>) {
    HTMLParser::from_html(html).run_with_issues()
}
