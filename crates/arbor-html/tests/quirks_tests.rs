//! Integration tests for document modes chosen from the DOCTYPE.
//!
//! [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)

use arbor_dom::QuirksMode;
use arbor_html::{HTMLParser, dump_tree, parse_document};

fn mode_of(markup: &str) -> QuirksMode {
    parse_document(markup).0.quirks_mode()
}

#[test]
fn test_html5_doctype_is_no_quirks() {
    assert_eq!(mode_of("<!DOCTYPE html>"), QuirksMode::NoQuirks);
    assert_eq!(mode_of("<!doctype HTML>"), QuirksMode::NoQuirks);
}

#[test]
fn test_missing_doctype_is_quirks() {
    assert_eq!(mode_of("<p>x"), QuirksMode::Quirks);
}

#[test]
fn test_iframe_srcdoc_without_doctype_is_no_quirks() {
    let (tree, issues) = HTMLParser::from_html("<p>x")
        .with_iframe_srcdoc(true)
        .run_with_issues();
    assert_eq!(tree.quirks_mode(), QuirksMode::NoQuirks);
    assert!(!issues.iter().any(|issue| issue.message == "missing-doctype"));
}

#[test]
fn test_html401_frameset_public_id() {
    assert_eq!(
        mode_of(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Frameset//EN">"#),
        QuirksMode::Quirks
    );
    assert_eq!(
        mode_of(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Frameset//EN" "http://www.w3.org/TR/html4/frameset.dtd">"#
        ),
        QuirksMode::LimitedQuirks
    );
}

#[test]
fn test_xhtml_transitional_is_limited_quirks() {
    assert_eq!(
        mode_of(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "x">"#),
        QuirksMode::LimitedQuirks
    );
}

#[test]
fn test_quirky_public_ids() {
    assert_eq!(mode_of(r#"<!DOCTYPE html PUBLIC "HTML">"#), QuirksMode::Quirks);
    assert_eq!(
        mode_of(r#"<!DOCTYPE html PUBLIC "-//W3O//DTD W3 HTML Strict 3.0//EN//">"#),
        QuirksMode::Quirks
    );
}

#[test]
fn test_doctype_name_other_than_html_is_quirks() {
    assert_eq!(mode_of("<!DOCTYPE foo>"), QuirksMode::Quirks);
}

#[test]
fn test_table_in_paragraph_depends_on_mode() {
    // No-quirks: "If the Document is not set to quirks mode, and the stack of
    // open elements has a p element in button scope, then close a p element."
    assert_eq!(
        dump_tree(&parse_document("<!DOCTYPE html><p><table>").0),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <p>\n|     <table>\n"
    );
    assert_eq!(
        dump_tree(&parse_document("<p><table>").0),
        "| <html>\n|   <head>\n|   <body>\n|     <p>\n|       <table>\n"
    );
}

#[test]
fn test_doctype_after_start_is_ignored() {
    let (tree, issues) = parse_document("<!DOCTYPE html><p><!DOCTYPE html>");
    assert_eq!(
        dump_tree(&tree),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <p>\n"
    );
    assert!(issues.iter().any(|issue| issue.is_error));
}
