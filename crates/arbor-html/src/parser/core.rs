use arbor_common::warning::{clear_warnings, warn_once};
use arbor_dom::{DomTree, Namespace, NodeId};

use super::elements::{is_html_integration_point, is_mathml_text_integration_point};
use super::formatting::ActiveFormattingElements;
use super::insertion::PendingText;
use super::insertion_mode::InsertionMode;
use super::open_elements::OpenElements;
use super::scripting::{AbortHandle, DocumentReadiness, NoScripting, ScriptHost};
use crate::tokenizer::{HTMLTokenizer, Token, TokenSource};

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// "This specification defines the parsing rules for HTML documents...
/// The handling of parse errors is well-defined."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// The standard error code (e.g. `unexpected-end-tag`) or a description
    /// of the recovery applied.
    pub message: String,
    /// Index of the token being processed when the issue was recorded.
    pub token_index: usize,
    /// `false` marks a warning about input the parser handles but does not
    /// model completely.
    pub is_error: bool,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The HTML parser builds a DOM tree from the tokens of a [`TokenSource`].
pub struct HTMLParser {
    /// The token source; normally an [`HTMLTokenizer`].
    pub(crate) tokenizer: Box<dyn TokenSource>,

    /// DOM tree with parent/sibling pointers.
    /// `NodeId::ROOT` (index 0) is the Document node.
    pub(crate) tree: DomTree,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(crate) insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    ///
    /// "When the insertion mode is switched to "text" or "in table text", the
    /// original insertion mode is also set."
    pub(crate) original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    ///
    /// "The current template insertion mode is the insertion mode most
    /// recently pushed onto the stack of template insertion modes."
    pub(crate) template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(crate) open_elements: OpenElements,

    /// [§ 13.2.4.4 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(crate) active_formatting_elements: ActiveFormattingElements,

    /// [§ 13.2.4.5 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#head-element-pointer)
    pub(crate) head_element_pointer: Option<NodeId>,

    /// [§ 13.2.4.5 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#form-element-pointer)
    ///
    /// "The form element pointer points to the last form element that was opened
    /// and whose end tag has not yet been seen."
    pub(crate) form_element_pointer: Option<NodeId>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#concept-frag-parse-context)
    ///
    /// The context element when parsing a fragment. It lives in `tree`,
    /// detached from the document.
    pub(crate) context_element: Option<NodeId>,

    /// [§ 13.2.4.6 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    ///
    /// "The scripting flag is set to "enabled" if scripting was enabled for the
    /// Document with which the parser is associated when the parser was created."
    pub(crate) scripting: bool,

    /// [§ 13.2.4.6](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    ///
    /// "The frameset-ok flag is set to "ok" when the parser is created. It is
    /// set to "not ok" after certain tokens are seen."
    pub(crate) frameset_ok: bool,

    /// [§ 13.2.6.1 Foster parenting](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(crate) foster_parenting: bool,

    /// "If the next token is a U+000A LINE FEED (LF) character token, then
    /// ignore that token and move on to the next one."
    pub(crate) ignore_next_line_feed: bool,

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    pub(crate) pending_table_character_tokens: Vec<char>,

    /// Whether the self-closing flag of the start tag being processed was
    /// acknowledged.
    pub(crate) self_closing_acknowledged: bool,

    /// Character data waiting to be written into a text node.
    pub(crate) pending_text: Option<PendingText>,
    pub(crate) text_coalescing: bool,

    /// [§ 4.8.5](https://html.spec.whatwg.org/multipage/iframe-embed-object.html#an-iframe-srcdoc-document)
    pub(crate) iframe_srcdoc: bool,

    pub(crate) script_host: Box<dyn ScriptHost>,

    /// [§ 13.2.1](https://html.spec.whatwg.org/multipage/parsing.html#script-nesting-level)
    ///
    /// "The script nesting level, which must be initially set to zero"
    pub(crate) script_nesting_level: usize,

    /// [§ 13.2.1](https://html.spec.whatwg.org/multipage/parsing.html#parser-pause-flag)
    ///
    /// "...and a parser pause flag, which must be initially set to false."
    pub(crate) parser_pause_flag: bool,

    pub(crate) abort_handle: AbortHandle,
    pub(crate) readiness: DocumentReadiness,

    /// Whether we've stopped parsing.
    pub(crate) stopped: bool,

    /// Parse issues (errors and warnings) encountered during parsing.
    issues: Vec<ParseIssue>,

    /// Index of the token currently being processed.
    token_index: usize,

    /// If true, each distinct parse error is echoed through `warn_once`.
    report_errors: bool,
}

impl HTMLParser {
    /// Create a parser that pulls tokens from `source`.
    #[must_use]
    pub fn new<S: TokenSource + 'static>(source: S) -> Self {
        // DomTree::new() creates the Document node at NodeId::ROOT
        Self {
            tokenizer: Box::new(source),
            tree: DomTree::new(),
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            open_elements: OpenElements::new(),
            active_formatting_elements: ActiveFormattingElements::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            context_element: None,
            scripting: false,
            frameset_ok: true,
            foster_parenting: false,
            ignore_next_line_feed: false,
            pending_table_character_tokens: Vec::new(),
            self_closing_acknowledged: false,
            pending_text: None,
            text_coalescing: true,
            iframe_srcdoc: false,
            script_host: Box::new(NoScripting),
            script_nesting_level: 0,
            parser_pause_flag: false,
            abort_handle: AbortHandle::default(),
            readiness: DocumentReadiness::Loading,
            stopped: false,
            issues: Vec::new(),
            token_index: 0,
            report_errors: false,
        }
    }

    /// Create a parser over a string of markup.
    #[must_use]
    pub fn from_html(html: &str) -> Self {
        Self::new(HTMLTokenizer::new(html.to_string()))
    }

    /// Set the scripting flag.
    #[must_use]
    pub const fn with_scripting(mut self, enabled: bool) -> Self {
        self.scripting = enabled;
        self
    }

    /// Install the collaborator that prepares and executes scripts.
    #[must_use]
    pub fn with_script_host(mut self, host: Box<dyn ScriptHost>) -> Self {
        self.script_host = host;
        self
    }

    /// Echo each distinct parse error once through the warning channel.
    ///
    /// Errors already reported for an earlier document are forgotten.
    #[must_use]
    pub fn with_error_reporting(mut self) -> Self {
        clear_warnings();
        self.report_errors = true;
        self
    }

    /// Write every character straight into its text node instead of
    /// accumulating runs of characters first.
    #[must_use]
    pub const fn without_text_coalescing(mut self) -> Self {
        self.text_coalescing = false;
        self
    }

    /// Mark the document as an iframe srcdoc document.
    #[must_use]
    pub const fn with_iframe_srcdoc(mut self, srcdoc: bool) -> Self {
        self.iframe_srcdoc = srcdoc;
        self
    }

    /// A handle that aborts this parser from outside, e.g. from a script host.
    #[must_use]
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort_handle.clone()
    }

    /// Get all parse issues (errors and warnings) encountered during parsing.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.insertion_mode
    }

    /// Whether the parser has stopped (end of file or abort).
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Run the parser and return the DOM tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the `DomTree` and any parse issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        self.parse();
        self.into_parts()
    }

    /// Run the parser starting in `initial_mode` rather than "initial".
    #[must_use]
    pub fn run_with_mode(mut self, initial_mode: InsertionMode) -> DomTree {
        self.insertion_mode = initial_mode;
        self.parse();
        self.into_parts().0
    }

    /// Run until the token source is exhausted and the end has completed.
    pub fn parse(&mut self) {
        self.run_tokenizer_loop();
        if !self.stopped {
            // A token source that ran dry without an end-of-file token.
            self.dispatch(Token::new_eof());
        }
    }

    /// Split the parser into its tree and the recorded issues.
    #[must_use]
    pub fn into_parts(mut self) -> (DomTree, Vec<ParseIssue>) {
        self.flush_pending_text();
        self.collect_tokenizer_errors();
        (self.tree, self.issues)
    }

    /// [§ 13.2.1 Overview of the parsing model](https://html.spec.whatwg.org/multipage/parsing.html#overview-of-the-parsing-model)
    ///
    /// Pull tokens and hand each to the tree construction stage until the
    /// source has nothing more to give right now, the parser pauses, or
    /// parsing stops.
    pub(crate) fn run_tokenizer_loop(&mut self) {
        loop {
            if self.abort_handle.is_aborted() {
                if !self.stopped {
                    self.abort();
                }
                return;
            }
            if self.stopped || self.parser_pause_flag {
                return;
            }
            let token = self.tokenizer.next_token();
            self.collect_tokenizer_errors();
            let Some(token) = token else {
                return;
            };
            self.dispatch(token);
            self.token_index += 1;
        }
    }

    /// Handle one token from the token source.
    pub(crate) fn dispatch(&mut self, token: Token) {
        // [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
        // "If the next token is a U+000A LINE FEED (LF) character token, then
        // ignore that token and move on to the next one."
        if std::mem::take(&mut self.ignore_next_line_feed)
            && matches!(token, Token::Character { data: '\n' })
        {
            return;
        }

        self.self_closing_acknowledged = false;
        self.process_token(&token);

        // [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#acknowledge-self-closing-flag)
        // "When a start tag token is emitted with its self-closing flag set, if
        // the flag is not acknowledged when it is processed by the tree
        // construction stage, that is a parse error."
        if token.is_self_closing() && !self.self_closing_acknowledged {
            self.parse_error("non-void-html-element-start-tag-with-trailing-solidus");
        }

        // [§ 13.2.5.42](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
        // CDATA sections are only recognized in foreign content.
        let foreign = self
            .adjusted_current_node()
            .and_then(|node| self.tree.as_element(node))
            .is_some_and(|element| element.namespace != Namespace::Html);
        self.tokenizer.set_allow_cdata(foreign);
    }

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must follow
    /// the appropriate steps from the following list, known as the tree
    /// construction dispatcher:"
    pub(crate) fn process_token(&mut self, token: &Token) {
        log::trace!("[Parser] {} <- {token}", self.insertion_mode);
        if self.uses_html_rules(token) {
            // "Process the token according to the rules given in the section
            // corresponding to the current insertion mode in HTML content."
            self.process_using_rules_for(self.insertion_mode, token);
        } else {
            // "Otherwise: Process the token according to the rules given in
            // the section for parsing tokens in foreign content."
            self.process_foreign_content(token);
        }
    }

    /// The dispatcher's first list: the cases where the token is processed
    /// with the rules of the current insertion mode.
    fn uses_html_rules(&self, token: &Token) -> bool {
        // "If the stack of open elements is empty"
        let Some(node) = self.adjusted_current_node() else {
            return true;
        };
        let Some(element) = self.tree.as_element(node) else {
            return true;
        };
        // "If the adjusted current node is an element in the HTML namespace"
        if element.namespace == Namespace::Html {
            return true;
        }
        let is_start_tag = matches!(token, Token::StartTag { .. });
        let is_character = matches!(token, Token::Character { .. });

        // "If the adjusted current node is a MathML text integration point and
        // the token is a start tag whose tag name is neither "mglyph" nor
        // "malignmark""
        // "If the adjusted current node is a MathML text integration point and
        // the token is a character token"
        if is_mathml_text_integration_point(&self.tree, node)
            && ((is_start_tag && !token.is_start_tag_named(&["mglyph", "malignmark"]))
                || is_character)
        {
            return true;
        }

        // "If the adjusted current node is a MathML annotation-xml element and
        // the token is a start tag whose tag name is "svg""
        if element.namespace == Namespace::MathMl
            && element.tag_name == "annotation-xml"
            && token.is_start_tag_named(&["svg"])
        {
            return true;
        }

        // "If the adjusted current node is an HTML integration point and the
        // token is a start tag"
        // "If the adjusted current node is an HTML integration point and the
        // token is a character token"
        if is_html_integration_point(&self.tree, node) && (is_start_tag || is_character) {
            return true;
        }

        // "If the token is an end-of-file token"
        token.is_eof()
    }

    /// "Process the token using the rules for the X insertion mode."
    pub(crate) fn process_using_rules_for(&mut self, mode: InsertionMode, token: &Token) {
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// "Reprocess the token" in the current insertion mode.
    pub(crate) fn reprocess_token(&mut self, token: &Token) {
        self.process_token(token);
    }

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#acknowledge-self-closing-flag)
    ///
    /// "...the self-closing flag is acknowledged."
    pub(crate) const fn acknowledge_self_closing_flag(&mut self) {
        self.self_closing_acknowledged = true;
    }

    /// Record a parse error by its standard code.
    pub(crate) fn parse_error(&mut self, code: &str) {
        log::debug!(
            "[Parser] parse error '{code}' in {} at token {}",
            self.insertion_mode,
            self.token_index
        );
        if self.report_errors {
            warn_once("HTML Parser", &format!("parse error: {code}"));
        }
        self.issues.push(ParseIssue {
            message: code.to_string(),
            token_index: self.token_index,
            is_error: true,
        });
    }

    /// Record a parse warning (for recoverable situations the parser does not
    /// model completely).
    ///
    /// Logs via arbor-common's warning system and stores the issue for later retrieval.
    pub(crate) fn parse_warning(&mut self, message: &str) {
        warn_once("HTML Parser", message);
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
            is_error: false,
        });
    }

    fn collect_tokenizer_errors(&mut self) {
        for code in self.tokenizer.take_parse_errors() {
            if self.report_errors {
                warn_once("HTML Tokenizer", &format!("parse error: {code}"));
            }
            self.issues.push(ParseIssue {
                message: code.to_string(),
                token_index: self.token_index,
                is_error: true,
            });
        }
    }

    // =========================================================================
    // Node queries
    // =========================================================================

    /// "The current node is the bottommost node in this stack of open elements."
    pub(crate) fn current_node(&self) -> Option<NodeId> {
        self.open_elements.current()
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise,
    /// the adjusted current node is the current node."
    pub(crate) fn adjusted_current_node(&self) -> Option<NodeId> {
        match self.context_element {
            Some(context) if self.open_elements.len() == 1 => Some(context),
            _ => self.current_node(),
        }
    }

    /// Whether the current node is an HTML element named `tag`.
    pub(crate) fn current_node_is(&self, tag: &str) -> bool {
        self.open_elements.current_is(&self.tree, tag)
    }

    /// Whether the current node is an HTML element with one of `tags`.
    pub(crate) fn current_node_is_one_of(&self, tags: &[&str]) -> bool {
        self.open_elements.current_is_one_of(&self.tree, tags)
    }

    /// The local name of an element, or the empty string for other nodes.
    pub(crate) fn tag_name_of(&self, node: NodeId) -> &str {
        self.tree
            .as_element(node)
            .map_or("", |element| element.tag_name.as_str())
    }

    /// Whether `node` is an HTML element named `tag`.
    pub(crate) fn is_html_element(&self, node: NodeId, tag: &str) -> bool {
        self.tree.is_html_element(node, tag)
    }

    /// Whether the parser was created for the fragment parsing algorithm.
    pub(crate) const fn is_fragment_case(&self) -> bool {
        self.context_element.is_some()
    }
}
