//! Integration tests for the parser's collaboration with a script host.
//!
//! [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
//! [§ 13.2.7 The end](https://html.spec.whatwg.org/multipage/parsing.html#the-end)

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use arbor_dom::{DomTree, NodeId};
use arbor_html::parser::{
    AbortHandle, BlockingPoint, DocumentReadiness, MAX_SCRIPT_NESTING_LEVEL, ScriptHost,
};
use arbor_html::{HTMLParser, dump_tree};

/// Everything a host observed, shared with the test after the parser is
/// consumed.
#[derive(Default)]
struct Journal {
    events: Vec<String>,
    readiness: Vec<DocumentReadiness>,
    prepared: usize,
}

type SharedJournal = Rc<RefCell<Journal>>;

fn src_of(tree: &DomTree, script: NodeId) -> String {
    tree.as_element(script)
        .and_then(|element| element.attribute("src"))
        .unwrap_or("inline")
        .to_string()
}

/// Queues `markup` through `document.write` from the first script prepared.
struct WriteOnce {
    markup: Option<String>,
    queued: VecDeque<String>,
}

impl ScriptHost for WriteOnce {
    fn prepare_script(&mut self, _tree: &mut DomTree, _script: NodeId) {
        if let Some(markup) = self.markup.take() {
            self.queued.push_back(markup);
        }
    }

    fn take_document_write(&mut self) -> Option<String> {
        self.queued.pop_front()
    }
}

#[test]
fn test_document_write_inserts_at_insertion_point() {
    let host = WriteOnce {
        markup: Some("<p>w".to_string()),
        queued: VecDeque::new(),
    };
    let tree = HTMLParser::from_html("<script></script>after")
        .with_script_host(Box::new(host))
        .run();
    assert_eq!(
        dump_tree(&tree),
        "| <html>\n|   <head>\n|     <script>\n|   <body>\n|     <p>\n|       \"wafter\"\n"
    );
}

/// Every script writes another script.
struct WritesScripts {
    journal: SharedJournal,
    queued: VecDeque<String>,
}

impl ScriptHost for WritesScripts {
    fn prepare_script(&mut self, _tree: &mut DomTree, _script: NodeId) {
        self.journal.borrow_mut().prepared += 1;
        self.queued.push_back("<script></script>".to_string());
    }

    fn take_document_write(&mut self) -> Option<String> {
        self.queued.pop_front()
    }
}

#[test]
fn test_runaway_document_write_is_cut_off() {
    let journal = SharedJournal::default();
    let host = WritesScripts {
        journal: Rc::clone(&journal),
        queued: VecDeque::new(),
    };
    let (_, issues) = HTMLParser::from_html("<script></script>")
        .with_script_host(Box::new(host))
        .run_with_issues();

    assert_eq!(journal.borrow().prepared, MAX_SCRIPT_NESTING_LEVEL + 1);
    let warning = issues
        .iter()
        .find(|issue| issue.message == "document-write-nesting-too-deep")
        .unwrap();
    assert!(!warning.is_error);
}

/// Records readiness changes and event loop spins, and treats scripts with a
/// `defer` attribute as deferred.
struct Recorder {
    journal: SharedJournal,
    names: HashMap<NodeId, String>,
    deferred: VecDeque<NodeId>,
    abort_at: Option<(BlockingPoint, AbortHandle)>,
}

impl Recorder {
    fn new(journal: &SharedJournal) -> Self {
        Self {
            journal: Rc::clone(journal),
            names: HashMap::new(),
            deferred: VecDeque::new(),
            abort_at: None,
        }
    }

    fn name(&self, script: NodeId) -> &str {
        self.names.get(&script).map_or("?", String::as_str)
    }
}

impl ScriptHost for Recorder {
    fn prepare_script(&mut self, tree: &mut DomTree, script: NodeId) {
        let _ = self.names.insert(script, src_of(tree, script));
        let deferred = tree
            .as_element(script)
            .is_some_and(|element| element.attribute("defer").is_some());
        if deferred {
            self.deferred.push_back(script);
        }
    }

    fn execute_script(&mut self, _tree: &mut DomTree, script: NodeId) {
        let event = format!("execute {}", self.name(script));
        self.journal.borrow_mut().events.push(event);
    }

    fn take_script_to_execute_when_parsing_finished(&mut self) -> Option<NodeId> {
        self.deferred.pop_front()
    }

    fn spin_until(&mut self, point: BlockingPoint) {
        let event = match point {
            BlockingPoint::ParsingBlockingScript(script) => {
                format!("spin blocking {}", self.name(script))
            }
            BlockingPoint::DeferredScript(script) => {
                format!("spin deferred {}", self.name(script))
            }
            BlockingPoint::AsapScripts => "spin asap".to_string(),
            BlockingPoint::LoadEvent => "spin load".to_string(),
        };
        self.journal.borrow_mut().events.push(event);
        if let Some((abort_point, handle)) = &self.abort_at
            && *abort_point == point
        {
            handle.abort();
        }
    }

    fn document_ready_state_changed(&mut self, readiness: DocumentReadiness) {
        self.journal.borrow_mut().readiness.push(readiness);
    }
}

#[test]
fn test_readiness_moves_to_interactive_then_complete() {
    let journal = SharedJournal::default();
    let mut parser =
        HTMLParser::from_html("<p>x").with_script_host(Box::new(Recorder::new(&journal)));
    assert_eq!(parser.readiness(), DocumentReadiness::Loading);

    parser.parse();

    assert_eq!(parser.readiness(), DocumentReadiness::Complete);
    assert!(parser.is_stopped());
    assert_eq!(
        journal.borrow().readiness,
        vec![DocumentReadiness::Interactive, DocumentReadiness::Complete]
    );
    assert_eq!(journal.borrow().events, vec!["spin asap", "spin load"]);
}

#[test]
fn test_deferred_scripts_run_in_order_after_parsing() {
    let journal = SharedJournal::default();
    let _ = HTMLParser::from_html(
        "<script defer src=a></script><script src=inline></script><script defer src=b></script><p>x",
    )
    .with_script_host(Box::new(Recorder::new(&journal)))
    .run();

    assert_eq!(
        journal.borrow().events,
        vec![
            "spin deferred a",
            "execute a",
            "spin deferred b",
            "execute b",
            "spin asap",
            "spin load",
        ]
    );
}

#[test]
fn test_abort_while_waiting_for_asap_scripts() {
    let journal = SharedJournal::default();
    let parser = HTMLParser::from_html("<p>x");
    let mut host = Recorder::new(&journal);
    host.abort_at = Some((BlockingPoint::AsapScripts, parser.abort_handle()));
    let tree = parser.with_script_host(Box::new(host)).run();

    assert_eq!(journal.borrow().events, vec!["spin asap"]);
    assert_eq!(
        journal.borrow().readiness,
        vec![DocumentReadiness::Interactive, DocumentReadiness::Complete]
    );
    assert!(dump_tree(&tree).contains("<p>"));
}

#[test]
fn test_abort_before_parsing_discards_input() {
    let mut parser = HTMLParser::from_html("<p>x");
    parser.abort_handle().abort();
    parser.parse();

    assert!(parser.is_stopped());
    assert_eq!(parser.readiness(), DocumentReadiness::Complete);
    let (tree, _) = parser.into_parts();
    assert_eq!(dump_tree(&tree), "");
}

/// Makes the first script a parsing-blocking script that is not yet ready,
/// and has it write markup when it finally executes.
struct BlockingScript {
    journal: SharedJournal,
    pending: Option<NodeId>,
    seen_first: bool,
    write_on_execute: Option<String>,
    queued: VecDeque<String>,
    abort_while_blocked: Option<AbortHandle>,
}

impl BlockingScript {
    fn new(journal: &SharedJournal) -> Self {
        Self {
            journal: Rc::clone(journal),
            pending: None,
            seen_first: false,
            write_on_execute: None,
            queued: VecDeque::new(),
            abort_while_blocked: None,
        }
    }
}

impl ScriptHost for BlockingScript {
    fn prepare_script(&mut self, _tree: &mut DomTree, script: NodeId) {
        if !self.seen_first {
            self.seen_first = true;
            self.pending = Some(script);
        }
    }

    fn execute_script(&mut self, _tree: &mut DomTree, _script: NodeId) {
        self.journal.borrow_mut().events.push("execute".to_string());
        if let Some(markup) = self.write_on_execute.take() {
            self.queued.push_back(markup);
        }
    }

    fn take_document_write(&mut self) -> Option<String> {
        self.queued.pop_front()
    }

    fn has_pending_parsing_blocking_script(&self) -> bool {
        self.pending.is_some()
    }

    fn take_pending_parsing_blocking_script(&mut self) -> Option<NodeId> {
        self.pending.take()
    }

    fn is_ready_to_be_parser_executed(&self, _script: NodeId) -> bool {
        false
    }

    fn spin_until(&mut self, point: BlockingPoint) {
        if let BlockingPoint::ParsingBlockingScript(_) = point {
            self.journal.borrow_mut().events.push("spin blocking".to_string());
            if let Some(handle) = &self.abort_while_blocked {
                handle.abort();
            }
        }
    }
}

#[test]
fn test_parsing_blocking_script_runs_before_the_rest_of_the_input() {
    let journal = SharedJournal::default();
    let mut host = BlockingScript::new(&journal);
    host.write_on_execute = Some("<b>x</b>".to_string());
    let tree = HTMLParser::from_html("<script></script><i>y")
        .with_script_host(Box::new(host))
        .run();

    assert_eq!(journal.borrow().events, vec!["spin blocking", "execute"]);
    assert_eq!(
        dump_tree(&tree),
        "| <html>\n|   <head>\n|     <script>\n|   <body>\n|     <b>\n|       \"x\"\n|     <i>\n|       \"y\"\n"
    );
}

#[test]
fn test_abort_while_blocked_on_a_script() {
    let journal = SharedJournal::default();
    let parser = HTMLParser::from_html("<script></script><p>never");
    let mut host = BlockingScript::new(&journal);
    host.abort_while_blocked = Some(parser.abort_handle());
    let mut parser = parser.with_script_host(Box::new(host));
    parser.parse();

    assert_eq!(journal.borrow().events, vec!["spin blocking"]);
    assert_eq!(parser.readiness(), DocumentReadiness::Complete);
    let (tree, _) = parser.into_parts();
    assert_eq!(dump_tree(&tree), "| <html>\n|   <head>\n|     <script>\n");
}
