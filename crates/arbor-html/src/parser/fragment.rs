//! [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)

use arbor_dom::{AttributesMap, DomTree, ElementData, Namespace, NodeId};

use super::core::{HTMLParser, ParseIssue};
use super::insertion::InsertionLocation;
use super::insertion_mode::InsertionMode;
use crate::error::HtmlError;
use crate::tokenizer::{HTMLTokenizer, LexerState};

/// The result of parsing a fragment.
///
/// The parsed nodes are the children of `root`, a synthetic `html` element
/// that is not part of the result itself.
#[derive(Debug, Clone)]
pub struct DocumentFragment {
    /// The tree that owns the parsed nodes.
    pub tree: DomTree,
    /// The synthetic root element whose children are the fragment.
    pub root: NodeId,
    /// Parse errors and warnings recorded while parsing.
    pub issues: Vec<ParseIssue>,
}

impl DocumentFragment {
    /// "Return root's children, in tree order."
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        self.tree.children(self.root)
    }
}

/// [§ 13.4](https://html.spec.whatwg.org/multipage/parsing.html#html-fragment-parsing-algorithm)
///
/// Parse `markup` as if it were the contents of the element `context` in
/// `document`.
///
/// # Errors
///
/// Returns an error if `context` is not an element of `document`.
pub fn parse_fragment(
    document: &DomTree,
    context: NodeId,
    markup: &str,
) -> Result<DocumentFragment, HtmlError> {
    Ok(HTMLParser::for_fragment(document, context, markup)?.run_fragment())
}

/// Parse `markup` in the context of a detached element named `context_tag`.
///
/// The tag may carry an html5lib-style namespace prefix: `svg path` or
/// `math mi`.
///
/// # Errors
///
/// Returns an error if the namespace prefix is not `svg` or `math`.
pub fn parse_fragment_with_context_tag(
    context_tag: &str,
    markup: &str,
) -> Result<DocumentFragment, HtmlError> {
    let (namespace, local_name) = split_context_tag(context_tag)?;
    let mut document = DomTree::new();
    let context = document.create_element(namespace, local_name, AttributesMap::new());
    parse_fragment(&document, context, markup)
}

/// Split an html5lib-style context tag into its namespace and local name.
///
/// # Errors
///
/// Returns an error if the namespace prefix is not `svg` or `math`.
pub fn split_context_tag(context_tag: &str) -> Result<(Namespace, &str), HtmlError> {
    match context_tag.split_once(' ') {
        None => Ok((Namespace::Html, context_tag)),
        Some(("svg", local_name)) => Ok((Namespace::Svg, local_name)),
        Some(("math", local_name)) => Ok((Namespace::MathMl, local_name)),
        Some(_) => Err(HtmlError::UnknownContextNamespace(context_tag.to_string())),
    }
}

/// The tokenizer state a fragment starts in, given its context element.
///
/// "Set the state of the HTML parser's tokenization stage as follows,
/// switching on the context element:"
fn lexer_state_for_context(element: &ElementData, scripting: bool) -> LexerState {
    if element.namespace != Namespace::Html {
        return LexerState::Data;
    }
    match element.tag_name.as_str() {
        // "title, textarea: Switch the tokenizer to the RCDATA state."
        "title" | "textarea" => LexerState::RCDATA,
        // "style, xmp, iframe, noembed, noframes: Switch the tokenizer to the
        // RAWTEXT state."
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => LexerState::RAWTEXT,
        // "script: Switch the tokenizer to the script data state."
        "script" => LexerState::ScriptData,
        // "noscript: If the scripting flag is enabled, switch the tokenizer to
        // the RAWTEXT state. Otherwise, leave the tokenizer in the data state."
        "noscript" if scripting => LexerState::RAWTEXT,
        // "plaintext: Switch the tokenizer to the PLAINTEXT state."
        "plaintext" => LexerState::PLAINTEXT,
        // "Any other element: Leave the tokenizer in the data state."
        _ => LexerState::Data,
    }
}

impl HTMLParser {
    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// Create a parser for the fragment parsing algorithm. Builder methods
    /// such as [`HTMLParser::with_scripting`] may be applied before calling
    /// [`HTMLParser::run_fragment`].
    ///
    /// # Errors
    ///
    /// Returns an error if `context` is not an element of `document`.
    pub fn for_fragment(
        document: &DomTree,
        context: NodeId,
        markup: &str,
    ) -> Result<Self, HtmlError> {
        if document.get(context).is_none() {
            return Err(HtmlError::NoSuchNode(context));
        }
        let context_element = document
            .as_element(context)
            .ok_or(HtmlError::ContextNotAnElement(context))?;

        // STEP 1: "Create a new Document node, and mark it as being an HTML
        // document."
        // STEP 2: "If the node document of the context element is in quirks
        // mode, then let the Document be in quirks mode. Otherwise, the node
        // document of the context element is in limited-quirks mode, then let
        // the Document be in limited-quirks mode. Otherwise, leave the Document
        // in no-quirks mode."
        let mut parser = Self::new(HTMLTokenizer::new(markup.to_string()));
        parser.tree.set_quirks_mode(document.quirks_mode());

        // The context element lives in the new tree, detached, so the parser
        // can inspect it while building the fragment.
        let context_copy = parser.tree.create_element(
            context_element.namespace,
            &context_element.tag_name,
            context_element.attrs.clone(),
        );
        parser.context_element = Some(context_copy);

        // STEP 7: "Let root be the result of creating an element given document,
        // "html", and the HTML namespace."
        // STEP 8: "Append the element root to the Document node created above."
        // STEP 9: "Set up the parser's stack of open elements so that it
        // contains just the single element root."
        let root = parser
            .tree
            .create_element(Namespace::Html, "html", AttributesMap::new());
        parser.insert_node_at(InsertionLocation::append_to(NodeId::ROOT), root);
        parser.open_elements.push(root);

        // STEP 10: "If the context element is a template element, then push
        // "in template" onto the stack of template insertion modes so that it
        // is the new current template insertion mode."
        if context_element.is_html("template") {
            parser
                .template_insertion_modes
                .push(InsertionMode::InTemplate);
        }

        // STEP 12: "Reset the parser's insertion mode appropriately."
        parser.reset_insertion_mode_appropriately();

        // STEP 13: "Set the parser's form element pointer to the nearest node
        // to the context element that is a form element (going straight up the
        // ancestor chain, and including the element itself, if it is a form
        // element), if any."
        if let Some(form) = document
            .ancestors(context)
            .find(|&node| document.is_html_element(node, "form"))
            .and_then(|node| document.as_element(node))
        {
            let form_copy =
                parser
                    .tree
                    .create_element(form.namespace, &form.tag_name, form.attrs.clone());
            parser.form_element_pointer = Some(form_copy);
        }

        Ok(parser)
    }

    /// Run a parser created by [`HTMLParser::for_fragment`] to completion.
    #[must_use]
    pub fn run_fragment(mut self) -> DocumentFragment {
        // STEP 4: "Set the state of the HTML parser's tokenization stage as
        // follows, switching on the context element:"
        if let Some(context) = self.context_element
            && let Some(element) = self.tree.as_element(context)
        {
            let state = lexer_state_for_context(element, self.scripting);
            let tag_name = element.tag_name.clone();
            self.tokenizer.switch_to(state);
            // The context element's name is the tokenizer's "last start tag"
            // so `</title>` closes an RCDATA fragment for a title context.
            self.tokenizer.set_last_start_tag(Some(&tag_name));
        }
        let root = self.open_elements.first().unwrap_or(NodeId::ROOT);

        // STEP 15: "Start the parser and let it run until it has consumed all
        // the characters just inserted into the input stream."
        self.parse();

        // STEP 16: "Return root's children, in tree order."
        let (tree, issues) = self.into_parts();
        DocumentFragment { tree, root, issues }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_tag_prefixes() {
        assert_eq!(split_context_tag("td"), Ok((Namespace::Html, "td")));
        assert_eq!(split_context_tag("svg path"), Ok((Namespace::Svg, "path")));
        assert_eq!(split_context_tag("math mi"), Ok((Namespace::MathMl, "mi")));
        assert!(split_context_tag("xul box").is_err());
    }

    #[test]
    fn test_lexer_state_for_context() {
        let element =
            |tag: &str| ElementData::new(Namespace::Html, tag.to_string(), AttributesMap::new());
        assert_eq!(lexer_state_for_context(&element("title"), false), LexerState::RCDATA);
        assert_eq!(lexer_state_for_context(&element("xmp"), false), LexerState::RAWTEXT);
        assert_eq!(lexer_state_for_context(&element("script"), false), LexerState::ScriptData);
        assert_eq!(lexer_state_for_context(&element("noscript"), false), LexerState::Data);
        assert_eq!(lexer_state_for_context(&element("noscript"), true), LexerState::RAWTEXT);
        assert_eq!(lexer_state_for_context(&element("plaintext"), false), LexerState::PLAINTEXT);
        assert_eq!(lexer_state_for_context(&element("div"), false), LexerState::Data);
    }
}
