//! Integration tests for the fragment parsing algorithm.
//!
//! [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)

use arbor_dom::{AttributesMap, DomTree, Namespace, NodeId};
use arbor_html::error::HtmlError;
use arbor_html::{
    HTMLParser, dump_fragment, parse_document, parse_fragment, parse_fragment_with_context_tag,
};

fn fragment_dump(context_tag: &str, markup: &str) -> String {
    let fragment = parse_fragment_with_context_tag(context_tag, markup).unwrap();
    dump_fragment(&fragment)
}

#[test]
fn test_title_context_is_rcdata() {
    assert_eq!(fragment_dump("title", "&amp;"), "| \"&\"\n");
    assert_eq!(fragment_dump("title", "<b>x</b>"), "| \"<b>x</b>\"\n");
}

#[test]
fn test_textarea_context_ends_at_matching_end_tag() {
    assert_eq!(fragment_dump("textarea", "a</textarea>b"), "| \"ab\"\n");
}

#[test]
fn test_div_context() {
    assert_eq!(
        fragment_dump("div", "<p>a<p>b"),
        "| <p>\n|   \"a\"\n| <p>\n|   \"b\"\n"
    );
}

#[test]
fn test_cell_context_uses_body_rules() {
    assert_eq!(fragment_dump("td", "<p>x"), "| <p>\n|   \"x\"\n");
}

#[test]
fn test_row_context() {
    assert_eq!(fragment_dump("tr", "<td>a"), "| <td>\n|   \"a\"\n");
}

#[test]
fn test_template_context() {
    assert_eq!(fragment_dump("template", "<td>x"), "| <td>\n|   \"x\"\n");
}

#[test]
fn test_select_context() {
    assert_eq!(
        fragment_dump("select", "<option>a<option>b"),
        "| <option>\n|   \"a\"\n| <option>\n|   \"b\"\n"
    );
}

#[test]
fn test_svg_context_inserts_foreign_elements() {
    assert_eq!(fragment_dump("svg path", "<circle/>"), "| <svg circle>\n");
}

#[test]
fn test_math_context_breakout() {
    assert_eq!(fragment_dump("math mi", "<b>x"), "| <b>\n|   \"x\"\n");
}

#[test]
fn test_fragment_root_is_not_in_result() {
    let fragment = parse_fragment_with_context_tag("div", "a<i>b</i>").unwrap();
    assert_eq!(fragment.children().len(), 2);
    assert_eq!(fragment.tree.as_text(fragment.children()[0]), Some("a"));
    let root = fragment.tree.as_element(fragment.root).unwrap();
    assert!(root.is_html("html"));
}

#[test]
fn test_form_ancestor_of_context_sets_form_pointer() {
    let mut document = DomTree::new();
    let form = document.create_element(Namespace::Html, "form", AttributesMap::new());
    let div = document.create_element(Namespace::Html, "div", AttributesMap::new());
    document.append_child(NodeId::ROOT, form);
    document.append_child(form, div);

    let fragment = parse_fragment(&document, div, "<form><input>").unwrap();
    assert_eq!(dump_fragment(&fragment), "| <input>\n");
}

#[test]
fn test_noscript_context_depends_on_scripting_flag() {
    let mut document = DomTree::new();
    let noscript = document.create_element(Namespace::Html, "noscript", AttributesMap::new());

    let scripted = HTMLParser::for_fragment(&document, noscript, "<b>")
        .unwrap()
        .with_scripting(true)
        .run_fragment();
    assert_eq!(dump_fragment(&scripted), "| \"<b>\"\n");

    let unscripted = HTMLParser::for_fragment(&document, noscript, "<b>")
        .unwrap()
        .run_fragment();
    assert_eq!(dump_fragment(&unscripted), "| <b>\n");
}

#[test]
fn test_fragment_inherits_quirks_mode() {
    let (document, _) = parse_document("<p>x");
    let body = document.body().unwrap();
    let fragment = parse_fragment(&document, body, "<p><table>").unwrap();
    assert_eq!(dump_fragment(&fragment), "| <p>\n|   <table>\n");
}

#[test]
fn test_unknown_context_node_is_an_error() {
    let document = DomTree::new();
    assert_eq!(
        parse_fragment(&document, NodeId(999), "x").unwrap_err(),
        HtmlError::NoSuchNode(NodeId(999))
    );
}

#[test]
fn test_text_context_is_an_error() {
    let (document, _) = parse_document("<p>x");
    let p = document.first_child(document.body().unwrap()).unwrap();
    let text = document.first_child(p).unwrap();
    assert_eq!(
        parse_fragment(&document, text, "x").unwrap_err(),
        HtmlError::ContextNotAnElement(text)
    );
}

#[test]
fn test_unknown_context_namespace_is_an_error() {
    assert_eq!(
        parse_fragment_with_context_tag("xul box", "x").unwrap_err(),
        HtmlError::UnknownContextNamespace("xul box".to_string())
    );
}
