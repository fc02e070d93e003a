//! Script collaboration and the end of parsing.
//!
//! [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
//! [§ 13.2.7 The end](https://html.spec.whatwg.org/multipage/parsing.html#the-end)
//! [§ 8.4.3 document.write()](https://html.spec.whatwg.org/multipage/dynamic-markup-insertion.html#document.write())
//!
//! Script fetching and execution live outside the parser. The parser calls
//! into a [`ScriptHost`] at the points where the standard prepares or
//! executes a script, or spins the event loop, and drains any
//! `document.write` text the host queued while a script ran.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arbor_dom::{DomTree, NodeId};
use strum_macros::Display;

use super::core::HTMLParser;
use super::insertion_mode::InsertionMode;

/// Nested `document.write` invocations deeper than this are dropped.
pub const MAX_SCRIPT_NESTING_LEVEL: usize = 32;

/// [§ 3.1.4 Current document readiness](https://html.spec.whatwg.org/multipage/dom.html#current-document-readiness)
///
/// "Each Document has a current document readiness, a string, initially
/// "complete"." The parser moves a parser-created document through
/// "loading", "interactive" and "complete".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DocumentReadiness {
    /// "loading"
    #[strum(serialize = "loading")]
    Loading,
    /// "interactive"
    #[strum(serialize = "interactive")]
    Interactive,
    /// "complete"
    #[strum(serialize = "complete")]
    Complete,
}

/// The conditions the parser waits for when the standard says "spin the
/// event loop until ...".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BlockingPoint {
    /// "...until the parser's Document has no style sheet that is blocking
    /// scripts and the script's ready to be parser-executed becomes true."
    ParsingBlockingScript(NodeId),
    /// "...until the first script in the list of scripts that will execute
    /// when the document has finished parsing has its ready to be
    /// parser-executed set to true and the parser's Document has no style
    /// sheet that is blocking scripts."
    DeferredScript(NodeId),
    /// "...until the set of scripts that will execute as soon as possible and
    /// the list of scripts that will execute in order as soon as possible are
    /// empty."
    AsapScripts,
    /// "...until there is nothing that delays the load event in the Document."
    LoadEvent,
}

/// The script and event-loop collaborator of the parser.
///
/// Every method has a default that behaves like a document with no scripts,
/// so hosts only override what they model.
pub trait ScriptHost {
    /// [§ 4.12.1.1 Prepare the script element](https://html.spec.whatwg.org/multipage/scripting.html#prepare-the-script-element)
    ///
    /// Called for a `</script>` end tag with the script nesting level already
    /// incremented. The host may run the script immediately, queue
    /// `document.write` text, or make the script the pending parsing-blocking
    /// script.
    fn prepare_script(&mut self, tree: &mut DomTree, script: NodeId) {
        let _ = (tree, script);
    }

    /// [§ 4.12.1.1 Execute the script element](https://html.spec.whatwg.org/multipage/scripting.html#execute-the-script-element)
    fn execute_script(&mut self, tree: &mut DomTree, script: NodeId) {
        let _ = (tree, script);
    }

    /// Take the next chunk of text a running script passed to
    /// `document.write`, if any.
    fn take_document_write(&mut self) -> Option<String> {
        None
    }

    /// Whether the document has a pending parsing-blocking script.
    fn has_pending_parsing_blocking_script(&self) -> bool {
        false
    }

    /// "Let the script be the pending parsing-blocking script. Set the
    /// pending parsing-blocking script to null."
    fn take_pending_parsing_blocking_script(&mut self) -> Option<NodeId> {
        None
    }

    /// The script's "ready to be parser-executed" flag.
    fn is_ready_to_be_parser_executed(&self, script: NodeId) -> bool {
        let _ = script;
        true
    }

    /// Whether the document "has a style sheet that is blocking scripts".
    fn has_style_sheet_that_is_blocking_scripts(&self) -> bool {
        false
    }

    /// Remove and return the first entry of "the list of scripts that will
    /// execute when the document has finished parsing".
    fn take_script_to_execute_when_parsing_finished(&mut self) -> Option<NodeId> {
        None
    }

    /// "Spin the event loop until" the condition described by `point` holds.
    ///
    /// The host runs its own tasks here. It may abort the parser through an
    /// [`AbortHandle`].
    fn spin_until(&mut self, point: BlockingPoint) {
        let _ = point;
    }

    /// "Update the current document readiness to ..."
    fn document_ready_state_changed(&mut self, readiness: DocumentReadiness) {
        let _ = readiness;
    }
}

/// A host for documents without scripting support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScripting;

impl ScriptHost for NoScripting {}

/// A cloneable handle that aborts a parser from outside it, typically from a
/// [`ScriptHost`] while the parser is spinning the event loop.
///
/// [§ 13.2.7 Abort a parser](https://html.spec.whatwg.org/multipage/parsing.html#abort-a-parser)
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    aborted: Arc<AtomicBool>,
}

impl AbortHandle {
    /// Request that the parser abort.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    /// Whether an abort was requested.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Script end tags
// =============================================================================

impl HTMLParser {
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    ///
    /// "An end tag whose tag name is "script""
    pub(super) fn handle_script_end_tag(&mut self) {
        // STEP 1: "Let script be the current node (which will be a script element)."
        let Some(script) = self.open_elements.pop() else {
            return;
        };
        self.flush_pending_text();

        // STEP 2: "Pop the current node off the stack of open elements."
        // STEP 3: "Switch the insertion mode to the original insertion mode."
        self.insertion_mode = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody);

        // STEP 4: "Let the old insertion point have the same value as the
        // current insertion point. Let the insertion point be just before the
        // next input character."
        self.tokenizer.store_insertion_point();
        self.tokenizer.mark_insertion_point();

        // STEP 5: "Increment the parser's script nesting level by one."
        self.script_nesting_level += 1;

        // STEP 6: "...prepare the script element script. This might cause some
        // script to execute, which might cause new characters to be inserted
        // into the tokenizer..."
        self.script_host.prepare_script(&mut self.tree, script);
        self.process_document_writes();

        // STEP 7: "Decrement the parser's script nesting level by one. If the
        // parser's script nesting level is zero, then set the parser pause
        // flag to false."
        self.leave_script_nesting_level();

        // STEP 8: "Let the insertion point have the value of the old insertion point."
        self.tokenizer.restore_insertion_point();

        // STEP 9: "At this stage, if the pending parsing-blocking script is not null, then:"
        if !self.script_host.has_pending_parsing_blocking_script() {
            return;
        }
        if self.script_nesting_level > 0 {
            // "If the script nesting level is not zero: Set the parser pause
            // flag to true, and abort the processing of any nested
            // invocations of the tokenizer, yielding control back to the
            // caller."
            self.parser_pause_flag = true;
            return;
        }
        self.run_pending_parsing_blocking_scripts();
    }

    /// "Otherwise: While the pending parsing-blocking script is not null: ..."
    fn run_pending_parsing_blocking_scripts(&mut self) {
        while let Some(script) = self.script_host.take_pending_parsing_blocking_script() {
            // "Block the tokenizer for this instance of the HTML parser, such
            // that the event loop will not run tasks that invoke the tokenizer."
            self.tokenizer.set_blocked(true);

            // "If the parser's Document has a style sheet that is blocking
            // scripts or the script's ready to be parser-executed is false:
            // spin the event loop until ..."
            if self.script_host.has_style_sheet_that_is_blocking_scripts()
                || !self.script_host.is_ready_to_be_parser_executed(script)
            {
                self.script_host
                    .spin_until(BlockingPoint::ParsingBlockingScript(script));
            }

            // "If this parser has been aborted in the meantime, return."
            if self.abort_handle.is_aborted() {
                self.abort();
                return;
            }

            // "Unblock the tokenizer for this instance of the HTML parser..."
            self.tokenizer.set_blocked(false);

            // "Let the insertion point be just before the next input character."
            self.tokenizer.mark_insertion_point();

            // "Increment the parser's script nesting level by one (it should
            // be zero before this step, so this sets it to one)."
            self.script_nesting_level += 1;

            // "Execute the script element the script."
            self.script_host.execute_script(&mut self.tree, script);
            self.process_document_writes();

            // "Decrement the parser's script nesting level by one..."
            self.leave_script_nesting_level();

            // "Let the insertion point be undefined again."
            self.tokenizer.clear_insertion_point();
        }
    }

    fn leave_script_nesting_level(&mut self) {
        self.script_nesting_level = self.script_nesting_level.saturating_sub(1);
        if self.script_nesting_level == 0 {
            self.parser_pause_flag = false;
        }
    }

    /// Feed every chunk the host queued through `document.write`.
    fn process_document_writes(&mut self) {
        while let Some(text) = self.script_host.take_document_write() {
            self.document_write(&text);
        }
    }

    /// [§ 8.4.3 document.write()](https://html.spec.whatwg.org/multipage/dynamic-markup-insertion.html#document-write-steps)
    ///
    /// "Insert input into the input stream just before the insertion point.
    /// If there is no pending parsing-blocking script, have the HTML parser
    /// process the characters that were inserted, one at a time, processing
    /// resulting tokens as they are emitted, and stopping when the tokenizer
    /// reaches the insertion point or when the processing of the tokenizer is
    /// aborted by the tree construction stage."
    pub(super) fn document_write(&mut self, text: &str) {
        if self.stopped || !self.tokenizer.is_insertion_point_defined() {
            // Writing into a closed input stream would implicitly reopen the
            // document, which replaces it wholesale.
            self.parse_warning("document-write-without-insertion-point");
            return;
        }
        if self.script_nesting_level > MAX_SCRIPT_NESTING_LEVEL {
            self.parse_warning("document-write-nesting-too-deep");
            return;
        }
        self.tokenizer.insert_at_insertion_point(text);
        if self.script_host.has_pending_parsing_blocking_script() {
            return;
        }
        log::trace!(
            "[Parser] nested tokenizer run at script nesting level {}",
            self.script_nesting_level
        );
        self.run_tokenizer_loop();
    }
}

// =============================================================================
// The end
// =============================================================================

impl HTMLParser {
    /// [§ 13.2.7 The end](https://html.spec.whatwg.org/multipage/parsing.html#the-end)
    ///
    /// "Once the user agent stops parsing the document, the user agent must
    /// run the following steps:"
    pub(super) fn stop_parsing(&mut self) {
        if self.stopped {
            return;
        }
        log::debug!("[Parser] stop parsing");
        self.flush_pending_text();
        self.stopped = true;

        // STEP 1: "Set the insertion point to undefined."
        self.tokenizer.clear_insertion_point();

        // STEP 2: "Update the current document readiness to "interactive"."
        self.set_readiness(DocumentReadiness::Interactive);

        // STEP 3: "Pop all the nodes off the stack of open elements."
        self.open_elements.clear();

        // STEP 4: "While the list of scripts that will execute when the
        // document has finished parsing is not empty: spin the event loop
        // until the first script in the list ... execute the script element
        // ... remove the first script element from the list."
        while let Some(script) = self
            .script_host
            .take_script_to_execute_when_parsing_finished()
        {
            self.script_host
                .spin_until(BlockingPoint::DeferredScript(script));
            if self.abort_handle.is_aborted() {
                self.finish_abort();
                return;
            }
            self.script_host.execute_script(&mut self.tree, script);
        }

        // STEP 5: "Spin the event loop until the set of scripts that will
        // execute as soon as possible and the list of scripts that will
        // execute in order as soon as possible are empty."
        self.script_host.spin_until(BlockingPoint::AsapScripts);
        if self.abort_handle.is_aborted() {
            self.finish_abort();
            return;
        }

        // STEP 6: "Spin the event loop until there is nothing that delays the
        // load event in the Document."
        self.script_host.spin_until(BlockingPoint::LoadEvent);
        if self.abort_handle.is_aborted() {
            self.finish_abort();
            return;
        }

        // STEP 7: "Update the current document readiness to "complete"."
        self.set_readiness(DocumentReadiness::Complete);
    }

    /// [§ 13.2.7 Abort a parser](https://html.spec.whatwg.org/multipage/parsing.html#abort-a-parser)
    ///
    /// "1. Throw away any pending content in the input stream, and discard any
    /// future content that would have been added to it.
    ///  2. Stop the speculative HTML parser for this HTML parser.
    ///  3. Update the current document readiness to "interactive".
    ///  4. Pop all the nodes off the stack of open elements.
    ///  5. Update the current document readiness to "complete"."
    pub fn abort(&mut self) {
        log::debug!("[Parser] abort");
        self.abort_handle.abort();
        self.flush_pending_text();
        self.stopped = true;
        self.tokenizer.clear_insertion_point();
        self.tokenizer.set_blocked(true);
        if self.readiness != DocumentReadiness::Complete {
            self.set_readiness(DocumentReadiness::Interactive);
        }
        self.finish_abort();
    }

    fn finish_abort(&mut self) {
        self.open_elements.clear();
        self.set_readiness(DocumentReadiness::Complete);
    }

    fn set_readiness(&mut self, readiness: DocumentReadiness) {
        if self.readiness == readiness {
            return;
        }
        self.readiness = readiness;
        self.script_host.document_ready_state_changed(readiness);
    }

    /// The current document readiness.
    #[must_use]
    pub const fn readiness(&self) -> DocumentReadiness {
        self.readiness
    }
}
