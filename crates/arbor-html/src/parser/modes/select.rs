use crate::parser::core::HTMLParser;
use crate::parser::insertion_mode::InsertionMode;
use crate::tokenizer::Token;

const TABLE_TAGS: &[&str] = &[
    "caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th",
];

impl HTMLParser {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(crate) fn handle_in_select_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => self.parse_error("unexpected-null-character"),

            // "Any other character token"
            // "Insert the token's character."
            Token::Character { data } => self.insert_character(*data),

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

                // "A start tag whose tag name is "option""
                // "If the current node is an option element, pop that node from the
                // stack of open elements."
                // "Insert an HTML element for the token."
                "option" => {
                    self.pop_current_if("option");
                    let _ = self.insert_html_element(token);
                }

                // "A start tag whose tag name is "optgroup""
                // "If the current node is an option element, pop that node from the
                // stack of open elements."
                // "If the current node is an optgroup element, pop that node from
                // the stack of open elements."
                // "Insert an HTML element for the token."
                "optgroup" => {
                    self.pop_current_if("option");
                    self.pop_current_if("optgroup");
                    let _ = self.insert_html_element(token);
                }

                // "A start tag whose tag name is "hr""
                // "If the current node is an option element, pop that node from the
                // stack of open elements."
                // "If the current node is an optgroup element, pop that node from
                // the stack of open elements."
                // "Insert an HTML element for the token. Immediately pop the current
                // node off the stack of open elements."
                // "Acknowledge the token's self-closing flag, if it is set."
                "hr" => {
                    self.pop_current_if("option");
                    self.pop_current_if("optgroup");
                    let _ = self.insert_html_element(token);
                    let _ = self.open_elements.pop();
                    self.acknowledge_self_closing_flag();
                }

                // "A start tag whose tag name is "select""
                // "Parse error."
                // "If the stack of open elements does not have a select element in
                // select scope, ignore the token. (fragment case)"
                // "Otherwise: Pop elements from the stack of open elements until a
                // select element has been popped from the stack. Reset the
                // insertion mode appropriately."
                // NOTE: "It just gets treated like an end tag."
                "select" => {
                    self.parse_error("unexpected-select-in-select");
                    let _ = self.close_select();
                }

                // "A start tag whose tag name is one of: "input", "keygen", "textarea""
                // "Parse error."
                // "If the stack of open elements does not have a select element in
                // select scope, ignore the token. (fragment case)"
                // "Otherwise: Pop elements from the stack of open elements until a
                // select element has been popped from the stack. Reset the
                // insertion mode appropriately. Reprocess the token."
                "input" | "keygen" | "textarea" => {
                    self.parse_error("unexpected-input-in-select");
                    if self.close_select() {
                        self.reprocess_token(token);
                    }
                }

                // "A start tag whose tag name is one of: "script", "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "script" | "template" => {
                    self.process_using_rules_for(InsertionMode::InHead, token);
                }

                // "Anything else"
                // "Parse error. Ignore the token."
                _ => self.parse_error("unexpected-start-tag-in-select"),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "optgroup""
                "optgroup" => {
                    // "First, if the current node is an option element, and the node
                    // immediately before it in the stack of open elements is an
                    // optgroup element, then pop the current node from the stack of
                    // open elements."
                    let len = self.open_elements.len();
                    if self.current_node_is("option")
                        && len >= 2
                        && self
                            .open_elements
                            .get(len - 2)
                            .is_some_and(|node| self.is_html_element(node, "optgroup"))
                    {
                        let _ = self.open_elements.pop();
                    }
                    // "If the current node is an optgroup element, then pop that
                    // node from the stack of open elements. Otherwise, this is a
                    // parse error; ignore the token."
                    if self.current_node_is("optgroup") {
                        let _ = self.open_elements.pop();
                    } else {
                        self.parse_error("unexpected-end-tag-optgroup");
                    }
                }

                // "An end tag whose tag name is "option""
                // "If the current node is an option element, then pop that node from
                // the stack of open elements. Otherwise, this is a parse error;
                // ignore the token."
                "option" => {
                    if self.current_node_is("option") {
                        let _ = self.open_elements.pop();
                    } else {
                        self.parse_error("unexpected-end-tag-option");
                    }
                }

                // "An end tag whose tag name is "select""
                "select" => {
                    let _ = self.close_select();
                }

                // "An end tag whose tag name is "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "template" => self.process_using_rules_for(InsertionMode::InHead, token),

                // "Anything else"
                // "Parse error. Ignore the token."
                _ => self.parse_error("unexpected-end-tag-in-select"),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),
        }
    }

    fn pop_current_if(&mut self, tag: &str) {
        if self.current_node_is(tag) {
            let _ = self.open_elements.pop();
        }
    }

    /// Close the open select element, returning whether there was one.
    ///
    /// "If the stack of open elements does not have a select element in select
    /// scope, this is a parse error; ignore the token. (fragment case)
    /// Otherwise: Pop elements from the stack of open elements until a select
    /// element has been popped from the stack. Reset the insertion mode
    /// appropriately."
    fn close_select(&mut self) -> bool {
        if !self.open_elements.has_in_select_scope(&self.tree, "select") {
            self.parse_error("end-tag-without-matching-open-element");
            return false;
        }
        self.pop_until_tag("select");
        self.reset_insertion_mode_appropriately();
        true
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(crate) fn handle_in_select_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is one of: "caption", "table", "tbody",
            // "tfoot", "thead", "tr", "td", "th""
            // "Parse error."
            // "Pop elements from the stack of open elements until a select element
            // has been popped from the stack."
            // "Reset the insertion mode appropriately."
            // "Reprocess the token."
            Token::StartTag { name, .. } if TABLE_TAGS.contains(&name.as_str()) => {
                self.parse_error("unexpected-table-element-in-select");
                self.pop_until_tag("select");
                self.reset_insertion_mode_appropriately();
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "caption", "table", "tbody",
            // "tfoot", "thead", "tr", "td", "th""
            Token::EndTag { name, .. } if TABLE_TAGS.contains(&name.as_str()) => {
                // "Parse error."
                self.parse_error("unexpected-table-end-tag-in-select");
                // "If the stack of open elements does not have an element in table
                // scope that is an HTML element with the same tag name as that of
                // the token, then ignore the token."
                if !self.open_elements.has_in_table_scope(&self.tree, name) {
                    return;
                }
                // "Otherwise: Pop elements from the stack of open elements until a
                // select element has been popped from the stack. Reset the
                // insertion mode appropriately. Reprocess the token."
                self.pop_until_tag("select");
                self.reset_insertion_mode_appropriately();
                self.reprocess_token(token);
            }

            // "Anything else"
            // "Process the token using the rules for the "in select" insertion mode."
            _ => self.process_using_rules_for(InsertionMode::InSelect, token),
        }
    }
}
