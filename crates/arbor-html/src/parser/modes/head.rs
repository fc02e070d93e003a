use arbor_dom::Namespace;

use super::is_whitespace_token;
use crate::parser::core::HTMLParser;
use crate::parser::insertion_mode::InsertionMode;
use crate::tokenizer::{LexerState, Token};

impl HTMLParser {
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(crate) fn handle_in_head_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } if is_whitespace_token(token) => {
                self.insert_character(*data);
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error("unexpected-doctype"),

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "html""
                // "Process the token using the rules for the "in body" insertion mode."
                "html" => self.process_using_rules_for(InsertionMode::InBody, token),

                // "A start tag whose tag name is one of: "base", "basefont", "bgsound", "link""
                // "Insert an HTML element for the token. Immediately pop the current
                // node off the stack of open elements."
                // "Acknowledge the token's self-closing flag, if it is set."
                //
                // "A start tag whose tag name is "meta""
                // The same, plus encoding sniffing which does not apply to
                // already-decoded input.
                "base" | "basefont" | "bgsound" | "link" | "meta" => {
                    let _ = self.insert_html_element(token);
                    let _ = self.open_elements.pop();
                    self.acknowledge_self_closing_flag();
                }

                // "A start tag whose tag name is "title""
                // "Follow the generic RCDATA element parsing algorithm."
                "title" => self.parse_text_element(token, LexerState::RCDATA),

                // "A start tag whose tag name is "noscript", if the scripting flag is enabled"
                // "A start tag whose tag name is one of: "noframes", "style""
                // "Follow the generic raw text element parsing algorithm."
                "noscript" if self.scripting => {
                    self.parse_text_element(token, LexerState::RAWTEXT);
                }
                "noframes" | "style" => self.parse_text_element(token, LexerState::RAWTEXT),

                // "A start tag whose tag name is "noscript", if the scripting flag is disabled"
                // "Insert an HTML element for the token."
                // "Switch the insertion mode to "in head noscript"."
                "noscript" => {
                    let _ = self.insert_html_element(token);
                    self.insertion_mode = InsertionMode::InHeadNoscript;
                }

                // "A start tag whose tag name is "script""
                "script" => self.insert_script_element(token),

                // "A start tag whose tag name is "template""
                "template" => self.insert_template_element(token),

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => self.parse_error("unexpected-start-tag-head"),

                _ => self.handle_in_head_anything_else(token),
            },

            // "An end tag whose tag name is "head""
            // "Pop the current node (which will be the head element) off the stack of open elements."
            // "Switch the insertion mode to "after head"."
            Token::EndTag { name, .. } if name == "head" => {
                let _ = self.open_elements.pop();
                self.insertion_mode = InsertionMode::AfterHead;
            }

            // "An end tag whose tag name is one of: "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. } if matches!(name.as_str(), "body" | "html" | "br") => {
                self.handle_in_head_anything_else(token);
            }

            // "An end tag whose tag name is "template""
            Token::EndTag { name, .. } if name == "template" => self.close_template_element(),

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => self.parse_error("unexpected-end-tag-in-head"),

            // "Anything else"
            _ => self.handle_in_head_anything_else(token),
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode - Anything else](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements. Switch the insertion mode to "after head". Reprocess the
    /// token."
    fn handle_in_head_anything_else(&mut self, token: &Token) {
        let _ = self.open_elements.pop();
        self.insertion_mode = InsertionMode::AfterHead;
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// "A start tag whose tag name is "script""
    fn insert_script_element(&mut self, token: &Token) {
        // STEP 1: "Let the adjusted insertion location be the appropriate place
        // for inserting a node."
        let location = self.appropriate_place_for_inserting(None);

        // STEP 2: "Create an element for the token in the HTML namespace, with
        // the intended parent being the element in which the adjusted insertion
        // location finds itself."
        let script = self.create_element_for_token(token, Namespace::Html, location.parent);

        // STEP 3-4: The "parser document", "force async" and "already started"
        // flags belong to the script host.

        // STEP 5: "Insert the newly created element at the adjusted insertion location."
        self.insert_node_at(location, script);

        // STEP 6: "Push the element onto the stack of open elements so that it
        // is the new current node."
        self.open_elements.push(script);

        // STEP 7: "Switch the tokenizer to the script data state."
        self.tokenizer.switch_to(LexerState::ScriptData);

        // STEP 8: "Set the original insertion mode to the current insertion mode."
        // STEP 9: "Switch the insertion mode to "text"."
        self.enter_text_mode();
    }

    /// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// "A start tag whose tag name is "template""
    fn insert_template_element(&mut self, token: &Token) {
        // STEP 1: "Insert a marker at the end of the list of active formatting elements."
        self.active_formatting_elements.push_marker();

        // STEP 2: "Set the frameset-ok flag to "not ok"."
        self.frameset_ok = false;

        // STEP 3: "Switch the insertion mode to "in template"."
        self.insertion_mode = InsertionMode::InTemplate;

        // STEP 4: "Push "in template" onto the stack of template insertion modes
        // so that it is the new current template insertion mode."
        self.template_insertion_modes.push(InsertionMode::InTemplate);

        // STEP 5-6: Declarative shadow roots are not modeled, so the element is
        // always inserted as an ordinary template.
        // "Otherwise, insert an HTML element for template start tag."
        let _ = self.insert_html_element(token);
    }

    /// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// "An end tag whose tag name is "template""
    pub(crate) fn close_template_element(&mut self) {
        // "If there is no template element on the stack of open elements, then
        // this is a parse error; ignore the token."
        if !self.open_elements.contains_tag(&self.tree, "template") {
            self.parse_error("unexpected-end-tag-template");
            return;
        }

        // STEP 1: "Generate all implied end tags thoroughly."
        self.generate_all_implied_end_tags_thoroughly();

        // STEP 2: "If the current node is not a template element, then this is a parse error."
        if !self.current_node_is("template") {
            self.parse_error("template-end-tag-with-open-elements");
        }

        // STEP 3: "Pop elements from the stack of open elements until a template
        // element has been popped from the stack."
        self.pop_until_tag("template");

        // STEP 4: "Clear the list of active formatting elements up to the last marker."
        self.active_formatting_elements.clear_to_last_marker();

        // STEP 5: "Pop the current template insertion mode off the stack of
        // template insertion modes."
        let _ = self.template_insertion_modes.pop();

        // STEP 6: "Reset the insertion mode appropriately."
        self.reset_insertion_mode_appropriately();
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(crate) fn handle_in_head_noscript_mode(&mut self, token: &Token) {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error("unexpected-doctype"),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from the
            // stack of open elements; the new current node will be a head element."
            // "Switch the insertion mode to "in head"."
            Token::EndTag { name, .. } if name == "noscript" => {
                let _ = self.open_elements.pop();
                self.insertion_mode = InsertionMode::InHead;
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "A comment token"
            // "A start tag whose tag name is one of: "basefont", "bgsound", "link",
            // "meta", "noframes", "style""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::Comment { .. } => self.process_using_rules_for(InsertionMode::InHead, token),
            _ if is_whitespace_token(token)
                || token.is_start_tag_named(&[
                    "basefont", "bgsound", "link", "meta", "noframes", "style",
                ]) =>
            {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "An end tag whose tag name is "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. } if name == "br" => {
                self.handle_in_head_noscript_anything_else(token);
            }

            // "A start tag whose tag name is one of: "head", "noscript""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "head" | "noscript") => {
                self.parse_error("unexpected-start-tag-in-head-noscript");
            }
            Token::EndTag { .. } => self.parse_error("unexpected-end-tag-in-head-noscript"),

            // "Anything else"
            _ => self.handle_in_head_noscript_anything_else(token),
        }
    }

    /// "Parse error. Pop the current node (which will be a noscript element)
    /// from the stack of open elements; the new current node will be a head
    /// element. Switch the insertion mode to "in head". Reprocess the token."
    fn handle_in_head_noscript_anything_else(&mut self, token: &Token) {
        self.parse_error("unexpected-token-in-head-noscript");
        let _ = self.open_elements.pop();
        self.insertion_mode = InsertionMode::InHead;
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(crate) fn handle_after_head_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } if is_whitespace_token(token) => {
                self.insert_character(*data);
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error("unexpected-doctype"),

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "html""
                // "Process the token using the rules for the "in body" insertion mode."
                "html" => self.process_using_rules_for(InsertionMode::InBody, token),

                // "A start tag whose tag name is "body""
                // "Insert an HTML element for the token."
                // "Set the frameset-ok flag to "not ok"."
                // "Switch the insertion mode to "in body"."
                "body" => {
                    let _ = self.insert_html_element(token);
                    self.frameset_ok = false;
                    self.insertion_mode = InsertionMode::InBody;
                }

                // "A start tag whose tag name is "frameset""
                // "Insert an HTML element for the token."
                // "Switch the insertion mode to "in frameset"."
                "frameset" => {
                    let _ = self.insert_html_element(token);
                    self.insertion_mode = InsertionMode::InFrameset;
                }

                // "A start tag whose tag name is one of: "base", "basefont", "bgsound",
                // "link", "meta", "noframes", "script", "style", "template", "title""
                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                | "style" | "template" | "title" => {
                    // STEP 1: "Parse error."
                    self.parse_error("unexpected-start-tag-after-head");
                    // STEP 2: "Push the node pointed to by the head element pointer
                    // onto the stack of open elements."
                    let Some(head) = self.head_element_pointer else {
                        self.process_using_rules_for(InsertionMode::InHead, token);
                        return;
                    };
                    self.open_elements.push(head);
                    // STEP 3: "Process the token using the rules for the "in head"
                    // insertion mode."
                    self.process_using_rules_for(InsertionMode::InHead, token);
                    // STEP 4: "Remove the node pointed to by the head element
                    // pointer from the stack of open elements. (It might not be
                    // the current node at this point.)"
                    self.open_elements.remove(head);
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => self.parse_error("unexpected-start-tag-head"),

                _ => self.handle_after_head_anything_else(token),
            },

            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::EndTag { name, .. } if name == "template" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "An end tag whose tag name is one of: "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. } if matches!(name.as_str(), "body" | "html" | "br") => {
                self.handle_after_head_anything_else(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => self.parse_error("unexpected-end-tag-after-head"),

            // "Anything else"
            _ => self.handle_after_head_anything_else(token),
        }
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode - Anything else](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    ///
    /// "Insert an HTML element for a "body" start tag token with no attributes.
    /// Switch the insertion mode to "in body". Reprocess the current token."
    fn handle_after_head_anything_else(&mut self, token: &Token) {
        let _ = self.insert_html_element_named("body");
        self.insertion_mode = InsertionMode::InBody;
        self.reprocess_token(token);
    }
}
