use crate::parser::core::HTMLParser;
use crate::parser::insertion_mode::InsertionMode;
use crate::tokenizer::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(crate) fn handle_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token"
            // "Insert the token's character."
            // NOTE: "This can never be a U+0000 NULL character; the tokenizer
            // converts those to U+FFFD REPLACEMENT CHARACTER characters."
            Token::Character { data } => self.insert_character(*data),

            // "An end-of-file token"
            // "Parse error."
            // "If the current node is a script element, then set its already
            // started to true."
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode and
            // reprocess the token."
            Token::EndOfFile => {
                self.parse_error("eof-in-element-that-can-contain-only-text");
                let _ = self.open_elements.pop();
                self.leave_text_mode();
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is "script""
            Token::EndTag { name, .. } if name == "script" => self.handle_script_end_tag(),

            // "Any other end tag"
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode."
            Token::EndTag { .. } => {
                let _ = self.open_elements.pop();
                self.leave_text_mode();
            }

            // The tokenizer only emits characters, end tags and end-of-file
            // while in a text-only state.
            Token::StartTag { .. } | Token::Comment { .. } | Token::Doctype { .. } => {
                log::debug!("[Parser] unexpected {token} in text mode");
            }
        }
    }

    fn leave_text_mode(&mut self) {
        self.insertion_mode = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody);
    }
}
