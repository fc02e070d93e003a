//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

use arbor_common::infra::ascii_case_insensitive_eq;
use arbor_dom::{Namespace, QuirksMode};

use super::is_whitespace_token;
use crate::parser::algorithms::AdoptionOutcome;
use crate::parser::core::HTMLParser;
use crate::parser::elements::{is_formatting_tag, is_special};
use crate::parser::foreign_content::{adjust_mathml_attributes, adjust_svg_attributes};
use crate::parser::insertion_mode::InsertionMode;
use crate::parser::open_elements::Scope;
use crate::tokenizer::{LexerState, Token};

/// Elements that may stay open at the end of the body without a parse error.
const ALLOWED_UNCLOSED_AT_END: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td", "tfoot",
    "th", "thead", "tr", "body", "html",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// "A start tag whose tag name is one of: "address", "article", ..."
const BLOCK_START_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "center",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "search",
    "section",
    "summary",
    "ul",
];

/// "An end tag whose tag name is one of: "address", "article", ..."
const BLOCK_END_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "button",
    "center",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "listing",
    "main",
    "menu",
    "nav",
    "ol",
    "pre",
    "search",
    "section",
    "summary",
    "ul",
];

impl HTMLParser {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(crate) fn handle_in_body_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => self.parse_error("unexpected-null-character"),

            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Reconstruct the active formatting elements, if any."
            // "Insert the token's character."
            Token::Character { data } if is_whitespace_token(token) => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
            }

            // "Any other character token"
            // "Reconstruct the active formatting elements, if any."
            // "Insert the token's character."
            // "Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
                self.frameset_ok = false;
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error("unexpected-doctype"),

            Token::StartTag { name, .. } => self.handle_in_body_start_tag(name, token),

            Token::EndTag { name, .. } => self.handle_in_body_end_tag(name, token),

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If the stack of template insertion modes is not empty, then
                // process the token using the rules for the "in template"
                // insertion mode."
                if !self.template_insertion_modes.is_empty() {
                    self.process_using_rules_for(InsertionMode::InTemplate, token);
                    return;
                }
                // "Otherwise, follow these steps: If there is a node in the stack
                // of open elements that is not either a dd element, ... or an
                // html element, then this is a parse error."
                self.check_for_unclosed_elements("eof-with-unclosed-elements");
                // "Stop parsing."
                self.stop_parsing();
            }
        }
    }

    fn handle_in_body_start_tag(&mut self, name: &str, token: &Token) {
        match name {
            // "A start tag whose tag name is "html""
            "html" => {
                // "Parse error."
                self.parse_error("unexpected-start-tag-html");
                // "If there is a template element on the stack of open elements,
                // then ignore the token."
                if self.open_elements.contains_tag(&self.tree, "template") {
                    return;
                }
                // "Otherwise, for each attribute on the token, check to see if the
                // attribute is already present on the top element of the stack of
                // open elements. If it is not, add the attribute and its
                // corresponding value to that element."
                if let Some(html) = self.open_elements.first() {
                    self.merge_attributes_into(html, token);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont", "bgsound",
            // "link", "meta", "noframes", "script", "style", "template", "title""
            // "Process the token using the rules for the "in head" insertion mode."
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
            | "style" | "template" | "title" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "A start tag whose tag name is "body""
            "body" => {
                // "Parse error."
                self.parse_error("unexpected-start-tag-body");
                // "If the stack of open elements has only one node on it, if the
                // second element on the stack of open elements is not a body
                // element, or if there is a template element on the stack of open
                // elements, then ignore the token. (fragment case or there is a
                // template element on the stack)"
                let Some(body) = self
                    .open_elements
                    .get(1)
                    .filter(|&node| self.is_html_element(node, "body"))
                else {
                    return;
                };
                if self.open_elements.contains_tag(&self.tree, "template") {
                    return;
                }
                // "Otherwise, set the frameset-ok flag to "not ok"; then, for each
                // attribute on the token, check to see if the attribute is already
                // present on the body element (the second element) on the stack of
                // open elements, and if it is not, add the attribute and its
                // corresponding value to that element."
                self.frameset_ok = false;
                self.merge_attributes_into(body, token);
            }

            // "A start tag whose tag name is "frameset""
            "frameset" => {
                // "Parse error."
                self.parse_error("unexpected-start-tag-frameset");
                // "If the stack of open elements has only one node on it, or if the
                // second element on the stack of open elements is not a body
                // element, then ignore the token. (fragment case or there is a
                // template element on the stack)"
                let Some(body) = self
                    .open_elements
                    .get(1)
                    .filter(|&node| self.is_html_element(node, "body"))
                else {
                    return;
                };
                // "If the frameset-ok flag is set to "not ok", ignore the token."
                if !self.frameset_ok {
                    return;
                }
                // "Otherwise, run the following steps:"
                // STEP 1: "Remove the second element on the stack of open elements
                // from its parent node, if it has one."
                self.flush_pending_text();
                self.tree.detach(body);
                // STEP 2: "Pop all the nodes from the bottom of the stack of open
                // elements, from the current node up to, but not including, the
                // root html element."
                self.open_elements.truncate(1);
                // STEP 3: "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);
                // STEP 4: "Switch the insertion mode to "in frameset"."
                self.insertion_mode = InsertionMode::InFrameset;
            }

            // "A start tag whose tag name is one of: "address", "article", "aside",
            // "blockquote", "center", "details", "dialog", "dir", "div", "dl",
            // "fieldset", "figcaption", "figure", "footer", "header", "hgroup",
            // "main", "menu", "nav", "ol", "p", "search", "section", "summary", "ul""
            // "If the stack of open elements has a p element in button scope, then
            // close a p element."
            // "Insert an HTML element for the token."
            _ if BLOCK_START_TAGS.contains(&name) => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            _ if HEADINGS.contains(&name) => {
                // "If the stack of open elements has a p element in button scope,
                // then close a p element."
                self.close_p_element_in_button_scope();
                // "If the current node is an HTML element whose tag name is one of
                // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                // error; pop the current node off the stack of open elements."
                if self.current_node_is_one_of(HEADINGS) {
                    self.parse_error("unexpected-nested-heading");
                    let _ = self.open_elements.pop();
                }
                // "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            // "If the stack of open elements has a p element in button scope, then
            // close a p element."
            // "Insert an HTML element for the token."
            // "If the next token is a U+000A LINE FEED (LF) character token, then
            // ignore that token and move on to the next one. (Newlines at the start
            // of pre blocks are ignored as an authoring convenience.)"
            // "Set the frameset-ok flag to "not ok"."
            "pre" | "listing" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
                self.ignore_next_line_feed = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            "form" => {
                let template_open = self.open_elements.contains_tag(&self.tree, "template");
                // "If the form element pointer is not null, and there is no
                // template element on the stack of open elements, then this is a
                // parse error; ignore the token."
                if self.form_element_pointer.is_some() && !template_open {
                    self.parse_error("unexpected-start-tag-form");
                    return;
                }
                // "Otherwise: If the stack of open elements has a p element in
                // button scope, then close a p element."
                self.close_p_element_in_button_scope();
                // "Insert an HTML element for the token, and, if there is no
                // template element on the stack of open elements, set the form
                // element pointer to point to the element created."
                let form = self.insert_html_element(token);
                if !template_open {
                    self.form_element_pointer = Some(form);
                }
            }

            // "A start tag whose tag name is "li""
            "li" => {
                // STEP 1: "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
                // STEP 2-5
                self.close_open_list_item(&["li"]);
                // STEP 6 (Done): "If the stack of open elements has a p element in
                // button scope, then close a p element."
                self.close_p_element_in_button_scope();
                // STEP 7: "Finally, insert an HTML element for the token."
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                self.frameset_ok = false;
                self.close_open_list_item(&["dd", "dt"]);
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is "plaintext""
            // "If the stack of open elements has a p element in button scope, then
            // close a p element."
            // "Insert an HTML element for the token."
            // "Switch the tokenizer to the PLAINTEXT state."
            "plaintext" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
                self.tokenizer.switch_to(LexerState::PLAINTEXT);
            }

            // "A start tag whose tag name is "button""
            "button" => {
                // STEP 1: "If the stack of open elements has a button element in
                // scope, then run these substeps: Parse error. Generate implied end
                // tags. Pop elements from the stack of open elements until a button
                // element has been popped from the stack."
                if self.open_elements.has_in_scope(&self.tree, "button") {
                    self.parse_error("unexpected-start-tag-button");
                    self.generate_implied_end_tags();
                    self.pop_until_tag("button");
                }
                // STEP 2: "Reconstruct the active formatting elements, if any."
                self.reconstruct_active_formatting_elements();
                // STEP 3: "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);
                // STEP 4: "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "a""
            "a" => {
                // "If the list of active formatting elements contains an a element
                // between the end of the list and the last marker on the list (or
                // the start of the list if there is no marker on the list), then
                // this is a parse error; run the adoption agency algorithm for the
                // token, then remove that element from the list of active
                // formatting elements and the stack of open elements if the
                // adoption agency algorithm didn't already remove it (it might not
                // have if the element is not in table scope)."
                if let Some(existing) = self
                    .active_formatting_elements
                    .last_element_with_tag_after_marker("a")
                {
                    self.parse_error("unexpected-start-tag-a-in-a");
                    let _ = self.run_adoption_agency(token);
                    self.active_formatting_elements.remove(existing);
                    self.open_elements.remove(existing);
                }
                // "Reconstruct the active formatting elements, if any."
                // "Insert an HTML element for the token. Push onto the list of
                // active formatting elements that element."
                self.insert_formatting_element(token);
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            // "font", "i", "s", "small", "strike", "strong", "tt", "u""
            "b" | "big" | "code" | "em" | "font" | "i" | "s" | "small" | "strike" | "strong"
            | "tt" | "u" => self.insert_formatting_element(token),

            // "A start tag whose tag name is "nobr""
            "nobr" => {
                // "Reconstruct the active formatting elements, if any."
                self.reconstruct_active_formatting_elements();
                // "If the stack of open elements has a nobr element in scope, then
                // this is a parse error; run the adoption agency algorithm for the
                // token, then once again reconstruct the active formatting
                // elements, if any."
                if self.open_elements.has_in_scope(&self.tree, "nobr") {
                    self.parse_error("unexpected-start-tag-nobr");
                    let _ = self.run_adoption_agency(token);
                }
                // "Insert an HTML element for the token. Push onto the list of
                // active formatting elements that element."
                self.insert_formatting_element(token);
            }

            // "A start tag whose tag name is one of: "applet", "marquee", "object""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "Insert a marker at the end of the list of active formatting elements."
            // "Set the frameset-ok flag to "not ok"."
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.active_formatting_elements.push_marker();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "table""
            // "If the Document is not set to quirks mode, and the stack of open
            // elements has a p element in button scope, then close a p element."
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "in table"."
            "table" => {
                if self.tree.quirks_mode() != QuirksMode::Quirks {
                    self.close_p_element_in_button_scope();
                }
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InTable;
            }

            // "A start tag whose tag name is one of: "area", "br", "embed", "img",
            // "keygen", "wbr""
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.insert_void_element(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "input""
            "input" => {
                self.insert_void_element(token);
                // "If the token does not have an attribute with the name "type", or
                // if it does, but that attribute's value is not an ASCII
                // case-insensitive match for the string "hidden", then: set the
                // frameset-ok flag to "not ok"."
                if !token
                    .attribute("type")
                    .is_some_and(|value| ascii_case_insensitive_eq(value, "hidden"))
                {
                    self.frameset_ok = false;
                }
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            "param" | "source" | "track" => {
                let _ = self.insert_html_element(token);
                let _ = self.open_elements.pop();
                self.acknowledge_self_closing_flag();
            }

            // "A start tag whose tag name is "hr""
            // "If the stack of open elements has a p element in button scope, then
            // close a p element."
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            // "Set the frameset-ok flag to "not ok"."
            "hr" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
                let _ = self.open_elements.pop();
                self.acknowledge_self_closing_flag();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess it.
            // (Don't ask.)"
            "image" => {
                self.parse_error("unexpected-start-tag-image");
                let mut img = token.clone();
                img.set_tag_name("img");
                self.reprocess_token(&img);
            }

            // "A start tag whose tag name is "textarea""
            "textarea" => {
                // STEP 1: "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);
                // STEP 2: "If the next token is a U+000A LINE FEED (LF) character
                // token, then ignore that token and move on to the next one.
                // (Newlines at the start of textarea elements are ignored as an
                // authoring convenience.)"
                self.ignore_next_line_feed = true;
                // STEP 3: "Switch the tokenizer to the RCDATA state."
                self.tokenizer.switch_to(LexerState::RCDATA);
                // STEP 4: "Let the original insertion mode be the current insertion mode."
                // STEP 5: "Set the frameset-ok flag to "not ok"."
                // STEP 6: "Switch the insertion mode to "text"."
                self.frameset_ok = false;
                self.enter_text_mode();
            }

            // "A start tag whose tag name is "xmp""
            // "If the stack of open elements has a p element in button scope, then
            // close a p element."
            // "Reconstruct the active formatting elements, if any."
            // "Set the frameset-ok flag to "not ok"."
            // "Follow the generic raw text element parsing algorithm."
            "xmp" => {
                self.close_p_element_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_text_element(token, LexerState::RAWTEXT);
            }

            // "A start tag whose tag name is "iframe""
            // "Set the frameset-ok flag to "not ok"."
            // "Follow the generic raw text element parsing algorithm."
            "iframe" => {
                self.frameset_ok = false;
                self.parse_text_element(token, LexerState::RAWTEXT);
            }

            // "A start tag whose tag name is "noembed""
            // "A start tag whose tag name is "noscript", if the scripting flag is enabled"
            // "Follow the generic raw text element parsing algorithm."
            "noembed" => self.parse_text_element(token, LexerState::RAWTEXT),
            "noscript" if self.scripting => self.parse_text_element(token, LexerState::RAWTEXT),

            // "A start tag whose tag name is "select""
            "select" => {
                // "Reconstruct the active formatting elements, if any."
                self.reconstruct_active_formatting_elements();
                // "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);
                // "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption", "in
                // table body", "in row", or "in cell", then switch the insertion
                // mode to "in select in table". Otherwise, switch the insertion
                // mode to "in select"."
                self.insertion_mode = if matches!(
                    self.insertion_mode,
                    InsertionMode::InTable
                        | InsertionMode::InCaption
                        | InsertionMode::InTableBody
                        | InsertionMode::InRow
                        | InsertionMode::InCell
                ) {
                    InsertionMode::InSelectInTable
                } else {
                    InsertionMode::InSelect
                };
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            // "If the current node is an option element, then pop the current node
            // off the stack of open elements."
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            "optgroup" | "option" => {
                if self.current_node_is("option") {
                    let _ = self.open_elements.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            // "If the stack of open elements has a ruby element in scope, then
            // generate implied end tags. If the current node is not now a ruby
            // element, this is a parse error."
            // "Insert an HTML element for the token."
            "rb" | "rtc" => {
                if self.open_elements.has_in_scope(&self.tree, "ruby") {
                    self.generate_implied_end_tags();
                    if !self.current_node_is("ruby") {
                        self.parse_error("unexpected-start-tag-ruby-content");
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            // "If the stack of open elements has a ruby element in scope, then
            // generate implied end tags, except for rtc elements. If the current
            // node is not now a rtc element or a ruby element, this is a parse
            // error."
            // "Insert an HTML element for the token."
            "rp" | "rt" => {
                if self.open_elements.has_in_scope(&self.tree, "ruby") {
                    self.generate_implied_end_tags_excluding(Some("rtc"));
                    if !self.current_node_is_one_of(&["rtc", "ruby"]) {
                        self.parse_error("unexpected-start-tag-ruby-content");
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is "math""
            "math" => self.insert_foreign_root(token, Namespace::MathMl),

            // "A start tag whose tag name is "svg""
            "svg" => self.insert_foreign_root(token, Namespace::Svg),

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "frame", "head", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th"
            | "thead" | "tr" => self.parse_error("unexpected-start-tag-ignored"),

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "This element will be an ordinary element."
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }
        }
    }

    fn handle_in_body_end_tag(&mut self, name: &str, token: &Token) {
        match name {
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            "template" => self.process_using_rules_for(InsertionMode::InHead, token),

            // "An end tag whose tag name is "body""
            "body" => {
                // "If the stack of open elements does not have a body element in
                // scope, this is a parse error; ignore the token."
                if !self.open_elements.has_in_scope(&self.tree, "body") {
                    self.parse_error("unexpected-end-tag-body");
                    return;
                }
                // "Otherwise, if there is a node in the stack of open elements that
                // is not either a dd element, ... or an html element, then this is
                // a parse error."
                self.check_for_unclosed_elements("end-tag-body-with-unclosed-elements");
                // "Switch the insertion mode to "after body"."
                self.insertion_mode = InsertionMode::AfterBody;
            }

            // "An end tag whose tag name is "html""
            "html" => {
                // "If the stack of open elements does not have a body element in
                // scope, this is a parse error; ignore the token."
                if !self.open_elements.has_in_scope(&self.tree, "body") {
                    self.parse_error("unexpected-end-tag-html");
                    return;
                }
                self.check_for_unclosed_elements("end-tag-html-with-unclosed-elements");
                // "Switch the insertion mode to "after body"."
                // "Reprocess the token."
                self.insertion_mode = InsertionMode::AfterBody;
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "address", "article", "aside",
            // "blockquote", "button", "center", "details", "dialog", "dir", "div",
            // "dl", "fieldset", "figcaption", "figure", "footer", "header",
            // "hgroup", "listing", "main", "menu", "nav", "ol", "pre", "search",
            // "section", "summary", "ul""
            _ if BLOCK_END_TAGS.contains(&name) => {
                // "If the stack of open elements does not have an element in scope
                // that is an HTML element with the same tag name as that of the
                // token, then this is a parse error; ignore the token."
                if !self.open_elements.has_in_scope(&self.tree, name) {
                    self.parse_error("end-tag-without-matching-open-element");
                    return;
                }
                self.close_element_with_implied_end_tags(name);
            }

            // "An end tag whose tag name is "form""
            "form" => self.handle_form_end_tag(),

            // "An end tag whose tag name is "p""
            // "If the stack of open elements does not have a p element in button
            // scope, then this is a parse error; insert an HTML element for a "p"
            // start tag token with no attributes."
            // "Close a p element."
            "p" => {
                if !self.open_elements.has_in_button_scope(&self.tree, "p") {
                    self.parse_error("end-tag-p-without-open-p");
                    let _ = self.insert_html_element_named("p");
                }
                self.close_p_element();
            }

            // "An end tag whose tag name is "li""
            // "If the stack of open elements does not have an li element in list
            // item scope, then this is a parse error; ignore the token."
            "li" => {
                if !self.open_elements.has_in_list_item_scope(&self.tree, "li") {
                    self.parse_error("end-tag-without-matching-open-element");
                    return;
                }
                self.close_element_with_implied_end_tags(name);
            }

            // "An end tag whose tag name is one of: "dd", "dt""
            // "If the stack of open elements does not have an element in scope that
            // is an HTML element with the same tag name as that of the token, then
            // this is a parse error; ignore the token."
            "dd" | "dt" => {
                if !self.open_elements.has_in_scope(&self.tree, name) {
                    self.parse_error("end-tag-without-matching-open-element");
                    return;
                }
                self.close_element_with_implied_end_tags(name);
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            _ if HEADINGS.contains(&name) => {
                // "If the stack of open elements does not have an element in scope
                // that is an HTML element and whose tag name is one of "h1", "h2",
                // "h3", "h4", "h5", or "h6", then this is a parse error; ignore the
                // token."
                if !self
                    .open_elements
                    .has_any_in_scope_of(&self.tree, Scope::Default, HEADINGS)
                {
                    self.parse_error("end-tag-without-matching-open-element");
                    return;
                }
                // "Otherwise, run these steps: Generate implied end tags."
                self.generate_implied_end_tags();
                // "If the current node is not an HTML element with the same tag
                // name as that of the token, then this is a parse error."
                if !self.current_node_is(name) {
                    self.parse_error("end-tag-without-matching-open-element");
                }
                // "Pop elements from the stack of open elements until an HTML
                // element whose tag name is one of "h1", "h2", "h3", "h4", "h5",
                // or "h6" has been popped from the stack."
                self.pop_until_one_of(HEADINGS);
            }

            // "An end tag token whose tag name is one of: "a", "b", "big", "code",
            // "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt", "u""
            // "Run the adoption agency algorithm for the token."
            _ if is_formatting_tag(name) => {
                if self.run_adoption_agency(token) == AdoptionOutcome::RunAnyOtherEndTagSteps {
                    self.any_other_end_tag(name);
                }
            }

            // "An end tag token whose tag name is one of: "applet", "marquee", "object""
            "applet" | "marquee" | "object" => {
                // "If the stack of open elements does not have an element in scope
                // that is an HTML element with the same tag name as that of the
                // token, then this is a parse error; ignore the token."
                if !self.open_elements.has_in_scope(&self.tree, name) {
                    self.parse_error("end-tag-without-matching-open-element");
                    return;
                }
                // "Otherwise, run these steps: Generate implied end tags. If the
                // current node is not an HTML element with the same tag name as
                // that of the token, then this is a parse error. Pop elements from
                // the stack of open elements until an HTML element with the same
                // tag name as the token has been popped from the stack."
                self.close_element_with_implied_end_tags(name);
                // "Clear the list of active formatting elements up to the last marker."
                self.active_formatting_elements.clear_to_last_marker();
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as
            // described in the next entry; i.e. act as if this was a "br" start
            // tag token with no attributes, rather than the end tag token that it
            // actually is."
            "br" => {
                self.parse_error("unexpected-end-tag-br");
                self.insert_void_element(&Token::start_tag("br"));
                self.frameset_ok = false;
            }

            // "Any other end tag"
            _ => self.any_other_end_tag(name),
        }
    }

    /// Report a parse error when an element outside the allowed set is still
    /// open.
    fn check_for_unclosed_elements(&mut self, code: &str) {
        let unclosed = self.open_elements.iter().any(|node| {
            !ALLOWED_UNCLOSED_AT_END
                .iter()
                .any(|tag| self.is_html_element(node, tag))
        });
        if unclosed {
            self.parse_error(code);
        }
    }

    /// Steps 2 through 5 of the "li" and "dd"/"dt" start tag entries.
    ///
    /// "Loop: If node is an li element, then run these substeps: Generate
    /// implied end tags, except for li elements. If the current node is not an
    /// li element, then this is a parse error. Pop elements from the stack of
    /// open elements until an li element has been popped from the stack. Jump
    /// to the step labeled done below."
    fn close_open_list_item(&mut self, tags: &[&str]) {
        for index in (0..self.open_elements.len()).rev() {
            let Some(node) = self.open_elements.get(index) else {
                return;
            };
            if let Some(tag) = tags
                .iter()
                .copied()
                .find(|tag| self.is_html_element(node, tag))
            {
                self.generate_implied_end_tags_excluding(Some(tag));
                if !self.current_node_is(tag) {
                    self.parse_error("end-tag-without-matching-open-element");
                }
                self.pop_until_tag(tag);
                return;
            }

            // "If node is in the special category, but is not an address, div, or
            // p element, then jump to the step labeled done below."
            let Some(element) = self.tree.as_element(node) else {
                return;
            };
            let exempt = element.namespace == Namespace::Html
                && matches!(element.tag_name.as_str(), "address" | "div" | "p");
            if is_special(element.namespace, &element.tag_name) && !exempt {
                return;
            }

            // "Otherwise, set node to the previous entry in the stack of open
            // elements and return to the step labeled loop."
        }
    }

    /// "Generate implied end tags. If the current node is not an HTML element
    /// with the same tag name as that of the token, then this is a parse
    /// error. Pop elements from the stack of open elements until an HTML
    /// element with the same tag name as the token has been popped from the
    /// stack."
    fn close_element_with_implied_end_tags(&mut self, tag: &str) {
        self.generate_implied_end_tags_excluding(Some(tag));
        if !self.current_node_is(tag) {
            self.parse_error("end-tag-without-matching-open-element");
        }
        self.pop_until_tag(tag);
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "An end tag whose tag name is "form""
    fn handle_form_end_tag(&mut self) {
        // "If there is no template element on the stack of open elements, then
        // run these substeps:"
        if !self.open_elements.contains_tag(&self.tree, "template") {
            // STEP 1: "Let node be the element that the form element pointer is
            // set to, or null if it is not set to an element."
            // STEP 2: "Set the form element pointer to null."
            let node = self.form_element_pointer.take();

            // STEP 3: "If node is null or if the stack of open elements does not
            // have node in scope, then this is a parse error; return and ignore
            // the token."
            let Some(node) =
                node.filter(|&node| self.open_elements.has_node_in_scope(&self.tree, node))
            else {
                self.parse_error("end-tag-form-without-open-form");
                return;
            };

            // STEP 4: "Generate implied end tags."
            self.generate_implied_end_tags();

            // STEP 5: "If the current node is not node, then this is a parse error."
            if self.current_node() != Some(node) {
                self.parse_error("end-tag-form-with-open-elements");
            }

            // STEP 6: "Remove node from the stack of open elements."
            self.open_elements.remove(node);
            return;
        }

        // "If there is a template element on the stack of open elements, then
        // run these substeps instead:"
        // STEP 1: "If the stack of open elements does not have a form element in
        // scope, then this is a parse error; return and ignore the token."
        if !self.open_elements.has_in_scope(&self.tree, "form") {
            self.parse_error("end-tag-form-without-open-form");
            return;
        }
        // STEP 2: "Generate implied end tags."
        self.generate_implied_end_tags();
        // STEP 3: "If the current node is not a form element, then this is a
        // parse error."
        if !self.current_node_is("form") {
            self.parse_error("end-tag-form-with-open-elements");
        }
        // STEP 4: "Pop elements from the stack of open elements until a form
        // element has been popped from the stack."
        self.pop_until_tag("form");
    }

    /// "Reconstruct the active formatting elements, if any. Insert an HTML
    /// element for the token. Push onto the list of active formatting elements
    /// that element."
    fn insert_formatting_element(&mut self, token: &Token) {
        self.reconstruct_active_formatting_elements();
        let element = self.insert_html_element(token);
        self.push_active_formatting_element(element, token);
    }

    /// "Reconstruct the active formatting elements, if any. Insert an HTML
    /// element for the token. Immediately pop the current node off the stack
    /// of open elements. Acknowledge the token's self-closing flag, if it is
    /// set."
    fn insert_void_element(&mut self, token: &Token) {
        self.reconstruct_active_formatting_elements();
        let _ = self.insert_html_element(token);
        let _ = self.open_elements.pop();
        self.acknowledge_self_closing_flag();
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "A start tag whose tag name is "math"" and "A start tag whose tag name
    /// is "svg"".
    fn insert_foreign_root(&mut self, token: &Token, namespace: Namespace) {
        // "Reconstruct the active formatting elements, if any."
        self.reconstruct_active_formatting_elements();

        // "Adjust MathML attributes for the token. (This fixes the case of MathML
        // attributes that are not all lowercase.)" / "Adjust SVG attributes for
        // the token. (This fixes the case of SVG attributes that are not all
        // lowercase.)"
        let mut adjusted = token.clone();
        if let Some(attributes) = adjusted.attributes_mut() {
            if namespace == Namespace::Svg {
                adjust_svg_attributes(attributes);
            } else {
                adjust_mathml_attributes(attributes);
            }
        }

        // "Adjust foreign attributes for the token. (This fixes the use of
        // namespaced attributes, in particular XLink.)"
        // Qualified attribute names such as `xlink:href` are kept as-is.

        // "Insert a foreign element for the token, with MathML namespace / SVG
        // namespace and false."
        let _ = self.insert_foreign_element(&adjusted, namespace, false);

        // "If the token has its self-closing flag set, pop the current node off
        // the stack of open elements and acknowledge the token's self-closing
        // flag."
        if token.is_self_closing() {
            let _ = self.open_elements.pop();
            self.acknowledge_self_closing_flag();
        }
    }
}
