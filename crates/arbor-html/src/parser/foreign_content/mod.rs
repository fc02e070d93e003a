//! Foreign content parsing support for SVG and MathML.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

use arbor_dom::Namespace;
pub use mathml::adjust_mathml_attributes;
pub use svg::{adjust_svg_attributes, adjust_svg_tag_name};

use super::core::HTMLParser;
use super::elements::{is_html_integration_point, is_mathml_text_integration_point};
use crate::tokenizer::Token;

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "When the steps below require the user agent to adjust foreign attributes
/// for a token, then, if any of the attributes on the token match the strings
/// in the first column of the following table, let the attribute be a namespaced
/// attribute, with the prefix being the string in the second column, the local
/// name being the string in the third column, and the namespace being the
/// namespace in the fourth column."
///
/// Attributes keep their qualified name in the tree; this table recovers the
/// prefix, local name and namespace when they are needed.
const FOREIGN_ATTRIBUTE_ADJUSTMENTS: &[(&str, Option<&str>, &str, Namespace)] = &[
    ("xlink:actuate", Some("xlink"), "actuate", Namespace::XLink),
    ("xlink:arcrole", Some("xlink"), "arcrole", Namespace::XLink),
    ("xlink:href", Some("xlink"), "href", Namespace::XLink),
    ("xlink:role", Some("xlink"), "role", Namespace::XLink),
    ("xlink:show", Some("xlink"), "show", Namespace::XLink),
    ("xlink:title", Some("xlink"), "title", Namespace::XLink),
    ("xlink:type", Some("xlink"), "type", Namespace::XLink),
    ("xml:lang", Some("xml"), "lang", Namespace::Xml),
    ("xml:space", Some("xml"), "space", Namespace::Xml),
    ("xmlns", None, "xmlns", Namespace::Xmlns),
    ("xmlns:xlink", Some("xmlns"), "xlink", Namespace::Xmlns),
];

/// A namespaced attribute recognized by "adjust foreign attributes".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignAttribute {
    /// The namespace prefix, absent for `xmlns`.
    pub prefix: Option<&'static str>,
    /// The local name.
    pub local_name: &'static str,
    /// The attribute namespace.
    pub namespace: Namespace,
}

/// Look up the namespaced form of an attribute on a foreign element.
#[must_use]
pub fn foreign_attribute(name: &str) -> Option<ForeignAttribute> {
    FOREIGN_ATTRIBUTE_ADJUSTMENTS
        .iter()
        .find(|(qualified, ..)| *qualified == name)
        .map(|&(_, prefix, local_name, namespace)| ForeignAttribute {
            prefix,
            local_name,
            namespace,
        })
}

/// Start tags that break out of foreign content back into HTML.
///
/// "A start tag whose tag name is one of: "b", "big", "blockquote", "body",
/// "br", "center", "code", "dd", "div", "dl", "dt", "em", "embed", "h1", "h2",
/// "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing", "menu",
/// "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span", "strong",
/// "strike", "sub", "sup", "table", "tt", "u", "ul", "var""
const BREAKOUT_START_TAGS: &[&str] = &[
    "b",
    "big",
    "blockquote",
    "body",
    "br",
    "center",
    "code",
    "dd",
    "div",
    "dl",
    "dt",
    "em",
    "embed",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "hr",
    "i",
    "img",
    "li",
    "listing",
    "menu",
    "meta",
    "nobr",
    "ol",
    "p",
    "pre",
    "ruby",
    "s",
    "small",
    "span",
    "strong",
    "strike",
    "sub",
    "sup",
    "table",
    "tt",
    "u",
    "ul",
    "var",
];

fn is_breakout_token(token: &Token) -> bool {
    match token {
        Token::StartTag { name, .. } if name == "font" => {
            // "A start tag whose tag name is "font", if the token has any
            // attributes named "color", "face", or "size""
            ["color", "face", "size"]
                .iter()
                .any(|attr| token.has_attribute(attr))
        }
        Token::StartTag { name, .. } => BREAKOUT_START_TAGS.contains(&name.as_str()),
        // "An end tag whose tag name is "br", "p""
        Token::EndTag { name, .. } => matches!(name.as_str(), "br" | "p"),
        _ => false,
    }
}

impl HTMLParser {
    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(crate) fn process_foreign_content(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER character."
            Token::Character { data: '\0' } => {
                self.parse_error("unexpected-null-character");
                self.insert_character('\u{FFFD}');
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Insert the token's character."
            Token::Character { data } if arbor_common::infra::is_ascii_whitespace(*data) => {
                self.insert_character(*data);
            }

            // "Any other character token"
            // "Insert the token's character."
            // "Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.insert_character(*data);
                self.frameset_ok = false;
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error("unexpected-doctype"),

            _ if is_breakout_token(token) => {
                // "Parse error."
                self.parse_error("unexpected-html-element-in-foreign-content");

                // "While the current node is not a MathML text integration point,
                // an HTML integration point, or an element in the HTML namespace,
                // pop elements from the stack of open elements."
                while let Some(current) = self.current_node()
                    && self.open_elements.len() > 1
                    && !is_mathml_text_integration_point(&self.tree, current)
                    && !is_html_integration_point(&self.tree, current)
                    && self
                        .tree
                        .as_element(current)
                        .is_some_and(|element| element.namespace != Namespace::Html)
                {
                    let _ = self.open_elements.pop();
                }

                // "Reprocess the token according to the rules given in the section
                // corresponding to the current insertion mode in HTML content."
                self.process_using_rules_for(self.insertion_mode, token);
            }

            Token::StartTag { .. } => self.insert_foreign_start_tag(token),

            // "An end tag whose tag name is "script", if the current node is an SVG
            // script element"
            // "Pop the current node off the stack of open elements."
            Token::EndTag { name, .. } if name == "script" && self.current_node_is_svg_script() => {
                let _ = self.open_elements.pop();
            }

            Token::EndTag { name, .. } => self.foreign_end_tag(name, token),

            // The dispatcher never sends end-of-file here.
            Token::EndOfFile => self.process_using_rules_for(self.insertion_mode, token),
        }
    }

    /// "Any other start tag"
    fn insert_foreign_start_tag(&mut self, token: &Token) {
        let namespace = self
            .adjusted_current_node()
            .and_then(|node| self.tree.as_element(node))
            .map_or(Namespace::Html, |element| element.namespace);

        let mut adjusted = token.clone();
        match namespace {
            // "If the adjusted current node is an element in the MathML namespace,
            // adjust MathML attributes for the token."
            Namespace::MathMl => {
                if let Some(attributes) = adjusted.attributes_mut() {
                    adjust_mathml_attributes(attributes);
                }
            }
            // "If the adjusted current node is an element in the SVG namespace,
            // and the token's tag name is one of the ones in the first column of
            // the following table, change the tag name to the name given in the
            // corresponding cell in the second column."
            // "If the adjusted current node is an element in the SVG namespace,
            // adjust SVG attributes for the token."
            Namespace::Svg => {
                adjust_svg_tag_name(&mut adjusted);
                if let Some(attributes) = adjusted.attributes_mut() {
                    adjust_svg_attributes(attributes);
                }
            }
            _ => {}
        }

        // "Adjust foreign attributes for the token."
        // Qualified names are kept; see `foreign_attribute`.

        // "Insert a foreign element for the token, with adjusted current node's
        // namespace and false."
        let _ = self.insert_foreign_element(&adjusted, namespace, false);

        // "If the token has its self-closing flag set, then run the appropriate
        // steps from the following list:"
        if token.is_self_closing() {
            // "If the token's tag name is "script", and the new current node is in
            // the SVG namespace: Acknowledge the token's self-closing flag, and
            // then act as described in the steps for a "script" end tag below."
            // "Otherwise: Pop the current node off the stack of open elements and
            // acknowledge the token's self-closing flag."
            let _ = self.open_elements.pop();
            self.acknowledge_self_closing_flag();
        }
    }

    fn current_node_is_svg_script(&self) -> bool {
        self.current_node()
            .and_then(|node| self.tree.as_element(node))
            .is_some_and(|element| element.namespace == Namespace::Svg && element.tag_name == "script")
    }

    /// "Any other end tag"
    fn foreign_end_tag(&mut self, name: &str, token: &Token) {
        let Some(current) = self.current_node() else {
            return;
        };

        // STEP 1: "Initialize node to be the current node (the bottommost node of
        // the stack)."
        // STEP 2: "If node's tag name, converted to ASCII lowercase, is not the
        // same as the tag name of the token, then this is a parse error."
        if !self.tag_name_of(current).eq_ignore_ascii_case(name) {
            self.parse_error("unexpected-end-tag-in-foreign-content");
        }

        for index in (0..self.open_elements.len()).rev() {
            let Some(node) = self.open_elements.get(index) else {
                return;
            };

            // STEP 3: "Loop: If node is the topmost element in the stack of open
            // elements, then return. (fragment case)"
            if index == 0 {
                return;
            }

            // STEP 4: "If node's tag name, converted to ASCII lowercase, is the
            // same as the tag name of the token, pop elements from the stack of
            // open elements until node has been popped from the stack, and then
            // return."
            if self.tag_name_of(node).eq_ignore_ascii_case(name) {
                self.flush_pending_text();
                self.open_elements.pop_until_node_popped(node);
                return;
            }

            // STEP 5: "Set node to the previous entry in the stack of open elements."
            // STEP 6: "If node is not an element in the HTML namespace, return to
            // the step labeled loop."
            // STEP 7: "Otherwise, process the token according to the rules given
            // in the section corresponding to the current insertion mode in HTML
            // content."
            let previous_is_html = self
                .open_elements
                .get(index - 1)
                .and_then(|previous| self.tree.as_element(previous))
                .is_some_and(|element| element.namespace == Namespace::Html);
            if previous_is_html {
                self.process_using_rules_for(self.insertion_mode, token);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_attribute_lookup() {
        let href = foreign_attribute("xlink:href").unwrap();
        assert_eq!(href.prefix, Some("xlink"));
        assert_eq!(href.local_name, "href");
        assert_eq!(href.namespace, Namespace::XLink);

        let xmlns = foreign_attribute("xmlns").unwrap();
        assert_eq!(xmlns.prefix, None);
        assert_eq!(xmlns.namespace, Namespace::Xmlns);

        assert!(foreign_attribute("href").is_none());
    }

    #[test]
    fn test_breakout_tokens() {
        assert!(is_breakout_token(&Token::start_tag("div")));
        assert!(is_breakout_token(&Token::end_tag("p")));
        assert!(!is_breakout_token(&Token::start_tag("font")));
        assert!(is_breakout_token(&Token::start_tag_with_attributes(
            "font",
            &[("color", "red")]
        )));
        assert!(!is_breakout_token(&Token::start_tag("circle")));
    }
}
