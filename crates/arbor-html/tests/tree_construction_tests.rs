//! Integration tests for tree construction in HTML content.

use arbor_dom::{DomTree, NodeId, NodeType, QuirksMode};
use arbor_html::{HTMLParser, dump_tree, parse_document};

/// Helper to parse HTML and return the DOM tree
fn parse(html: &str) -> DomTree {
    parse_document(html).0
}

/// Parse and render in the html5lib tree format.
fn dump(html: &str) -> String {
    dump_tree(&parse(html))
}

/// Parse and return the recorded parse error codes.
fn errors(html: &str) -> Vec<String> {
    parse_document(html)
        .1
        .into_iter()
        .filter(|issue| issue.is_error)
        .map(|issue| issue.message)
        .collect()
}

/// Depth-first search for the first element named `tag`.
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if tree.as_element(from).is_some_and(|data| data.tag_name == tag) {
        return Some(from);
    }
    tree.children(from)
        .iter()
        .find_map(|&child| find_element(tree, child, tag))
}

fn text_content(tree: &DomTree, id: NodeId) -> String {
    match tree.get(id).map(|node| &node.node_type) {
        Some(NodeType::Text(data)) => data.clone(),
        _ => tree
            .children(id)
            .iter()
            .map(|&child| text_content(tree, child))
            .collect(),
    }
}

const BODY_PREFIX: &str = "| <html>\n|   <head>\n|   <body>\n";

/// The dump of a doctype-less document with its `html`, empty `head` and
/// `body` lines removed.
fn body_dump(html: &str) -> String {
    let full = dump(html);
    match full.strip_prefix(BODY_PREFIX) {
        Some(rest) => rest.to_string(),
        None => panic!("unexpected document shape:\n{full}"),
    }
}

#[test]
fn test_document_node_owns_the_html_element() {
    let tree = parse("<!DOCTYPE html><html><head></head><body></body></html>");
    assert!(matches!(
        tree.get(NodeId::ROOT).map(|node| &node.node_type),
        Some(NodeType::Document)
    ));
    let html = tree.document_element().unwrap();
    assert!(tree.as_element(html).unwrap().is_html("html"));
    assert_eq!(tree.body().and_then(|body| tree.parent(body)), Some(html));
}

#[test]
fn test_text_comments_and_nesting() {
    assert_eq!(
        body_dump("<body>Hello<!-- note --><div><p>Text</p></div></body>"),
        "|     \"Hello\"\n|     <!--  note  -->\n|     <div>\n|       <p>\n|         \"Text\"\n"
    );
}

#[test]
fn test_attributes_are_listed_sorted() {
    assert_eq!(
        body_dump(r#"<div id="main" class="container" data-x='single quoted'></div>"#),
        "|     <div>\n|       class=\"container\"\n|       data-x=\"single quoted\"\n|       id=\"main\"\n"
    );
}

#[test]
fn test_void_elements_do_not_nest() {
    assert_eq!(
        body_dump(r#"<input type="text" disabled /><br>x"#),
        "|     <input>\n|       disabled=\"\"\n|       type=\"text\"\n|     <br>\n|     \"x\"\n"
    );
}

#[test]
fn test_head_elements() {
    assert_eq!(
        dump(r#"<head><meta charset="UTF-8"><title>My <test> Page</title></head>"#),
        "| <html>\n|   <head>\n|     <meta>\n|       charset=\"UTF-8\"\n|     <title>\n|       \"My <test> Page\"\n|   <body>\n"
    );
}

#[test]
fn test_adjacent_characters_share_one_text_node() {
    let tree = parse("<body>  hello  world  </body>");
    let body = tree.body().unwrap();
    assert_eq!(tree.children(body).len(), 1);
    assert_eq!(text_content(&tree, body), "  hello  world  ");
}

#[test]
fn test_simple_html_file() {
    let html = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <!-- This is a comment -->
    <title>Test</title>
</head>
<body class="main" id="content">
    <div data-value='single quoted'>Hello</div>
</body>
</html>"#;
    assert_eq!(
        dump(html),
        concat!(
            "| <!DOCTYPE html>\n",
            "| <html>\n",
            "|   lang=\"en\"\n",
            "|   <head>\n",
            "|     \"\n    \"\n",
            "|     <meta>\n",
            "|       charset=\"UTF-8\"\n",
            "|     \"\n    \"\n",
            "|     <!--  This is a comment  -->\n",
            "|     \"\n    \"\n",
            "|     <title>\n",
            "|       \"Test\"\n",
            "|     \"\n\"\n",
            "|   \"\n\"\n",
            "|   <body>\n",
            "|     class=\"main\"\n",
            "|     id=\"content\"\n",
            "|     \"\n    \"\n",
            "|     <div>\n",
            "|       data-value=\"single quoted\"\n",
            "|       \"Hello\"\n",
            "|     \"\n\n\"\n",
        )
    );
}

// ---------------------------------------------------------------------------
// Raw text and RCDATA elements
// ---------------------------------------------------------------------------

#[test]
fn test_style_content_is_raw_text() {
    let tree = parse("<head><style>body { color: red; }<div>not a tag</div></style>");
    let style = find_element(&tree, tree.root(), "style").unwrap();
    assert_eq!(
        text_content(&tree, style),
        "body { color: red; }<div>not a tag</div>"
    );
    assert!(find_element(&tree, tree.root(), "div").is_none());
}

// ---------------------------------------------------------------------------
// Implied end tags and scope checks in "in body"
//
// [§ 13.2.6.4.7 "in body"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
// ---------------------------------------------------------------------------

#[test]
fn test_paragraph_closes_paragraph() {
    assert_eq!(
        body_dump("<p>first<p>second"),
        "|     <p>\n|       \"first\"\n|     <p>\n|       \"second\"\n"
    );
}

#[test]
fn test_list_items_close_each_other() {
    assert_eq!(
        body_dump("<ul><li>A<li>B</ul>"),
        "|     <ul>\n|       <li>\n|         \"A\"\n|       <li>\n|         \"B\"\n"
    );
}

#[test]
fn test_dd_and_dt_close_each_other() {
    assert_eq!(
        body_dump("<dl><dt>T<dd>D<dt>T2</dl>"),
        "|     <dl>\n|       <dt>\n|         \"T\"\n|       <dd>\n|         \"D\"\n|       <dt>\n|         \"T2\"\n"
    );
}

#[test]
fn test_nested_lists_stay_nested() {
    assert_eq!(
        body_dump("<ul><li>A<ul><li>B</li></ul></li></ul>"),
        "|     <ul>\n|       <li>\n|         \"A\"\n|         <ul>\n|           <li>\n|             \"B\"\n"
    );
}

#[test]
fn test_stray_list_end_tags_are_ignored() {
    // "If the stack of open elements does not have an li element in list
    // item scope, then this is a parse error; ignore the token."
    assert_eq!(body_dump("</li>a</ol>b"), "|     \"ab\"\n");
    let codes = errors("<!DOCTYPE html><body></li></ol>");
    assert_eq!(codes.len(), 2);
}

// ---------------------------------------------------------------------------
// Whole-document shapes in the html5lib tree format
// ---------------------------------------------------------------------------

#[test]
fn test_dump_of_minimal_document() {
    assert_eq!(
        dump("<!DOCTYPE html><html><head></head><body></body></html>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n"
    );
}

#[test]
fn test_missing_structure_is_implied() {
    assert_eq!(
        dump("Hello"),
        "| <html>\n|   <head>\n|   <body>\n|     \"Hello\"\n"
    );
    assert!(errors("Hello").contains(&"missing-doctype".to_string()));
}

#[test]
fn test_comment_before_doctype_belongs_to_document() {
    assert_eq!(
        dump("<!--x--><!DOCTYPE html>"),
        "| <!-- x -->\n| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n"
    );
}

#[test]
fn test_comment_after_html_end_tag() {
    assert_eq!(
        dump("<!DOCTYPE html></html><!--x-->"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n| <!-- x -->\n"
    );
}

#[test]
fn test_doctype_with_identifiers() {
    let html = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#;
    assert!(dump(html).starts_with(
        "| <!DOCTYPE html \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">\n"
    ));
}

#[test]
fn test_stray_end_p_inserts_empty_paragraph() {
    // [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    //
    // "If the stack of open elements does not have a p element in button
    // scope, then this is a parse error; insert an HTML element for a "p"
    // start tag token with no attributes."
    let html = "<html><body>a<b>b</p>c";
    assert_eq!(
        dump(html),
        "| <html>\n|   <head>\n|   <body>\n|     \"a\"\n|     <b>\n|       \"b\"\n|       <p>\n|       \"c\"\n"
    );
    assert!(errors(html).contains(&"end-tag-p-without-open-p".to_string()));
}

#[test]
fn test_nested_headings_close_each_other() {
    assert_eq!(
        dump("<!DOCTYPE html><h1><h2>x"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <h1>\n|     <h2>\n|       \"x\"\n"
    );
}

#[test]
fn test_image_start_tag_becomes_img() {
    assert_eq!(
        dump("<!DOCTYPE html><image src=a>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <img>\n|       src=\"a\"\n"
    );
}

#[test]
fn test_end_br_acts_as_start_br() {
    assert_eq!(
        dump("<!DOCTYPE html><p></br>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <p>\n|       <br>\n"
    );
    assert!(errors("<!DOCTYPE html><p></br>").contains(&"unexpected-end-tag-br".to_string()));
}

#[test]
fn test_leading_newline_in_pre_and_textarea_is_dropped() {
    assert_eq!(
        dump("<!DOCTYPE html><pre>\nfoo</pre>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <pre>\n|       \"foo\"\n"
    );
    assert_eq!(
        dump("<!DOCTYPE html><textarea>\nbar</textarea>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <textarea>\n|       \"bar\"\n"
    );
}

#[test]
fn test_only_first_newline_in_pre_is_dropped() {
    assert_eq!(
        dump("<!DOCTYPE html><pre>\n\nfoo</pre>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <pre>\n|       \"\nfoo\"\n"
    );
}

#[test]
fn test_template_contents_in_head() {
    assert_eq!(
        dump("<!DOCTYPE html><template><p>x</p></template>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|     <template>\n|       content\n|         <p>\n|           \"x\"\n|   <body>\n"
    );
}

#[test]
fn test_template_children_live_in_contents() {
    let tree = parse("<!DOCTYPE html><body><template><b>x</b></template>");
    let template = find_element(&tree, NodeId::ROOT, "template").unwrap();
    assert!(tree.children(template).is_empty());
    let contents = tree.template_contents(template).unwrap();
    let b = find_element(&tree, contents, "b").unwrap();
    assert_eq!(text_content(&tree, b), "x");
}

#[test]
fn test_frameset_document() {
    assert_eq!(
        dump("<!DOCTYPE html><frameset><frame></frameset>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <frameset>\n|     <frame>\n"
    );
}

#[test]
fn test_frameset_ignored_after_content() {
    // "If the frameset-ok flag is set to "not ok", ignore the token."
    assert_eq!(
        dump("<!DOCTYPE html><p>x<frameset>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <p>\n|       \"x\"\n"
    );
}

#[test]
fn test_ruby_children_close_each_other() {
    assert_eq!(
        dump("<!DOCTYPE html><ruby>a<rt>b<rp>c</ruby>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <ruby>\n|       \"a\"\n|       <rt>\n|         \"b\"\n|       <rp>\n|         \"c\"\n"
    );
    assert!(errors("<!DOCTYPE html><ruby>a<rt>b<rp>c</ruby>").is_empty());
}

#[test]
fn test_form_inside_form_is_ignored() {
    let html = "<!DOCTYPE html><form><form><input></form>";
    assert_eq!(
        dump(html),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <form>\n|       <input>\n"
    );
    assert!(errors(html).contains(&"unexpected-start-tag-form".to_string()));
}

#[test]
fn test_form_owner_is_recorded() {
    let tree = parse("<!DOCTYPE html><form id=f><div><input></div></form>");
    let form = find_element(&tree, NodeId::ROOT, "form").unwrap();
    let input = find_element(&tree, NodeId::ROOT, "input").unwrap();
    assert_eq!(tree.as_element(input).unwrap().form_owner, Some(form));
}

#[test]
fn test_self_closing_non_void_is_a_parse_error() {
    assert!(
        errors("<!DOCTYPE html><div/>")
            .contains(&"non-void-html-element-start-tag-with-trailing-solidus".to_string())
    );
    assert!(errors("<!DOCTYPE html><br/>").is_empty());
}

#[test]
fn test_unclosed_elements_at_eof_are_closed() {
    assert_eq!(
        dump("<!DOCTYPE html><div><span>x"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <div>\n|       <span>\n|         \"x\"\n"
    );
}

#[test]
fn test_body_attributes_merge_into_existing_body() {
    let tree = parse("<!DOCTYPE html><body a=1><body a=2 b=3>");
    let body = tree.body().unwrap();
    let data = tree.as_element(body).unwrap();
    assert_eq!(data.attribute("a"), Some("1"));
    assert_eq!(data.attribute("b"), Some("3"));
}

#[test]
fn test_quirks_mode_is_recorded_on_tree() {
    assert_eq!(parse("<!DOCTYPE html>").quirks_mode(), QuirksMode::NoQuirks);
    assert_eq!(parse("<p>").quirks_mode(), QuirksMode::Quirks);
}

// ---------------------------------------------------------------------------
// Text coalescing
// ---------------------------------------------------------------------------

#[test]
fn test_character_references_coalesce_with_text() {
    assert_eq!(
        dump("<!DOCTYPE html>a&amp;b"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     \"a&b\"\n"
    );
}

#[test]
fn test_coalescing_matches_per_character_insertion() {
    let inputs = [
        "<!DOCTYPE html><p>one <b>two</b> three</p>",
        "<table>x<tr><td>y</td></tr>z</table>",
        "<!DOCTYPE html><a>1<div>2</a>3</div>",
        "<title>t</title><pre>\nx</pre><!--c-->tail",
        "<select>a<option>b</select>c",
    ];
    for input in inputs {
        let coalesced = dump_tree(&HTMLParser::from_html(input).run());
        let direct = dump_tree(&HTMLParser::from_html(input).without_text_coalescing().run());
        assert_eq!(coalesced, direct, "trees differ for {input:?}");
    }
}

// ---------------------------------------------------------------------------
// Robustness
// ---------------------------------------------------------------------------

#[test]
fn test_deep_nesting_terminates() {
    let html = "<div>".repeat(500) + "x";
    let tree = parse(&html);
    let body = tree.body().unwrap();
    assert_eq!(text_content(&tree, body), "x");
}

#[test]
fn test_garbage_input_still_produces_document() {
    let tree = parse("</html></body></head><</>>&&#;<!><![CDATA[");
    let html = tree.document_element().unwrap();
    assert!(tree.is_html_element(html, "html"));
    assert!(tree.body().is_some());
}
