//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! The tree builder consumes tokens from a [`TokenSource`](crate::tokenizer::TokenSource)
//! and drives an insertion-mode state machine that writes nodes into a
//! [`DomTree`](arbor_dom::DomTree).

mod algorithms;
mod core;
mod dump;
mod elements;
mod foreign_content;
mod formatting;
mod fragment;
mod insertion;
mod insertion_mode;
mod modes;
mod open_elements;
mod quirks;
mod scripting;

pub use algorithms::{ADOPTION_AGENCY_OUTER_LOOP_LIMIT, AdoptionOutcome};
pub use core::{HTMLParser, ParseIssue};
pub use dump::{dump_fragment, dump_tree, print_tree};
pub use foreign_content::{ForeignAttribute, foreign_attribute};
pub use formatting::{ActiveFormattingElement, ActiveFormattingElements};
pub use fragment::{
    DocumentFragment, parse_fragment, parse_fragment_with_context_tag, split_context_tag,
};
pub use insertion_mode::InsertionMode;
pub use open_elements::{OpenElements, Scope};
pub use quirks::quirks_mode_for_doctype;
pub use scripting::{
    AbortHandle, BlockingPoint, DocumentReadiness, MAX_SCRIPT_NESTING_LEVEL, NoScripting,
    ScriptHost,
};
