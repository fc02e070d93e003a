//! [§ 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
//!
//! One `handle_*_mode` method per insertion mode, grouped by the part of the
//! document they build.

mod after;
mod body;
mod head;
mod initial;
mod select;
mod table;
mod template;
mod text;

use arbor_common::infra::is_ascii_whitespace;

use crate::tokenizer::Token;

/// "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE
/// FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020
/// SPACE"
pub(crate) const fn is_whitespace_token(token: &Token) -> bool {
    matches!(token, Token::Character { data } if is_ascii_whitespace(*data))
}
