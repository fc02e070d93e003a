//! The seam between tree construction and the tokenizer.
//!
//! [§ 13.2.1 Overview of the parsing model](https://html.spec.whatwg.org/multipage/parsing.html#overview-of-the-parsing-model)
//!
//! "The output of the tokenization step is a series of zero or more of the
//! following tokens... When a token is emitted, it must immediately be handled
//! by the tree construction stage. The tree construction stage can affect the
//! state of the tokenization stage, and can insert additional characters into
//! the stream."

use strum_macros::Display;

use super::token::Token;

/// The tokenizer states the tree construction stage is allowed to switch to.
///
/// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LexerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// "Switch the tokenizer to the RCDATA state." (title, textarea)
    RCDATA,
    /// "Switch the tokenizer to the RAWTEXT state." (style, xmp, iframe, noembed, noframes)
    RAWTEXT,
    /// "Switch the tokenizer to the script data state."
    ScriptData,
    /// "Switch the tokenizer to the PLAINTEXT state."
    PLAINTEXT,
}

/// A stream of tokens the tree builder pulls from, plus the controls the tree
/// builder needs over that stream.
///
/// [`HTMLTokenizer`](super::HTMLTokenizer) is the implementation used by
/// [`HTMLParser`](crate::HTMLParser); tests may drive the tree builder with
/// their own source.
pub trait TokenSource {
    /// Run the state machine until a token is available.
    ///
    /// Returns `None` when no token can be produced right now: the end-of-file
    /// token was already handed out, the source is blocked, or the insertion
    /// point has been reached.
    fn next_token(&mut self) -> Option<Token>;

    /// Switch the lexical state, e.g. to RCDATA after a `title` start tag.
    fn switch_to(&mut self, state: LexerState);

    /// Override the name used for "appropriate end tag" checks. Fragment
    /// parsing seeds it with the context element's tag name.
    fn set_last_start_tag(&mut self, name: Option<&str>);

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "If there is an adjusted current node and it is not an element in the
    /// HTML namespace, then switch to the CDATA section state."
    fn set_allow_cdata(&mut self, allow: bool);

    /// Save the current insertion point ("let the old insertion point have
    /// the same value as the current insertion point").
    fn store_insertion_point(&mut self);

    /// "Let the insertion point have the value of the old insertion point."
    fn restore_insertion_point(&mut self);

    /// "Let the insertion point be just before the next input character."
    fn mark_insertion_point(&mut self);

    /// "Set the insertion point to undefined."
    fn clear_insertion_point(&mut self);

    /// Whether an insertion point is currently defined.
    fn is_insertion_point_defined(&self) -> bool;

    /// Whether every character before the insertion point has been consumed
    /// and no tokens are pending.
    fn is_insertion_point_reached(&self) -> bool;

    /// [§ 8.4.3 document.write()](https://html.spec.whatwg.org/multipage/dynamic-markup-insertion.html#document.write())
    ///
    /// "Insert input into the input stream just before the insertion point."
    /// The insertion point moves to just after the inserted text.
    fn insert_at_insertion_point(&mut self, text: &str);

    /// Stop (or resume) producing tokens while a script blocks the parser.
    fn set_blocked(&mut self, blocked: bool);

    /// Whether the source is currently blocked.
    fn is_blocked(&self) -> bool;

    /// Parse errors the tokenizer has detected since the last call, as their
    /// standard error codes (e.g. `unexpected-null-character`).
    fn take_parse_errors(&mut self) -> Vec<&'static str> {
        Vec::new()
    }
}
