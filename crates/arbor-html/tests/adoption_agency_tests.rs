//! Integration tests for the adoption agency algorithm and the list of
//! active formatting elements.
//!
//! [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)

use arbor_dom::{DomTree, NodeId};
use arbor_html::parser::ADOPTION_AGENCY_OUTER_LOOP_LIMIT;
use arbor_html::{dump_tree, parse_document};

/// Helper to parse HTML and return the DOM tree
fn parse(html: &str) -> DomTree {
    parse_document(html).0
}

fn dump(html: &str) -> String {
    dump_tree(&parse(html))
}

const PREFIX: &str = "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n";

/// The dump of everything inside `<body>`, re-indented to start at column 0.
fn body_dump(markup: &str) -> String {
    let full = dump(&format!("<!DOCTYPE html>{markup}"));
    let Some(body) = full.strip_prefix(PREFIX) else {
        panic!("unexpected document shape:\n{full}");
    };
    body.lines()
        .map(|line| format!("| {}\n", &line[6..]))
        .collect()
}

fn find_all_elements(tree: &DomTree, from: NodeId, tag: &str) -> Vec<NodeId> {
    let mut result = Vec::new();
    if tree.as_element(from).is_some_and(|data| data.tag_name == tag) {
        result.push(from);
    }
    for &child_id in tree.children(from) {
        result.extend(find_all_elements(tree, child_id, tag));
    }
    result
}

#[test]
fn test_misnested_inline_is_split() {
    // The </b> has no furthest block, so <b> is popped and <i> is
    // reconstructed for "Z".
    assert_eq!(
        body_dump("<p><b>X<i>Y</b>Z</i></p>"),
        "| <p>\n|   <b>\n|     \"X\"\n|     <i>\n|       \"Y\"\n|   <i>\n|     \"Z\"\n"
    );
}

#[test]
fn test_no_furthest_block_pops_to_formatting_element() {
    assert_eq!(
        body_dump("<p><b><i>text</b></p>"),
        "| <p>\n|   <b>\n|     <i>\n|       \"text\"\n"
    );
}

#[test]
fn test_formatting_is_reconstructed_in_next_paragraph() {
    // The implied </p> takes <b> off the stack but not off the list.
    assert_eq!(
        body_dump("<p><b>bold</p><p>still bold</p></b>"),
        "| <p>\n|   <b>\n|     \"bold\"\n| <p>\n|   <b>\n|     \"still bold\"\n"
    );
}

#[test]
fn test_well_nested_formatting_is_untouched() {
    assert_eq!(
        body_dump("<p><b>bold <i>bold-italic</i> bold</b></p>"),
        "| <p>\n|   <b>\n|     \"bold \"\n|     <i>\n|       \"bold-italic\"\n|     \" bold\"\n"
    );
}

#[test]
fn test_end_tag_behind_special_element_is_ignored() {
    assert_eq!(
        body_dump("<span><div>text</span></div>"),
        "| <span>\n|   <div>\n|     \"text\"\n"
    );
}

#[test]
fn test_nested_anchor_closes_the_first() {
    assert_eq!(
        body_dump(r#"<a href="1">first<a href="2">second</a>"#),
        "| <a>\n|   href=\"1\"\n|   \"first\"\n| <a>\n|   href=\"2\"\n|   \"second\"\n"
    );
}

#[test]
fn test_anchor_split_across_block() {
    assert_eq!(
        dump("<!DOCTYPE html><a href=1>A<div>B</a>C"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <a>\n|       href=\"1\"\n|       \"A\"\n|     <div>\n|       <a>\n|         href=\"1\"\n|         \"B\"\n|       \"C\"\n"
    );
}

#[test]
fn test_bold_split_across_paragraph() {
    assert_eq!(
        dump("<!DOCTYPE html><b>1<p>2</b>3</p>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <b>\n|       \"1\"\n|     <p>\n|       <b>\n|         \"2\"\n|       \"3\"\n"
    );
}

#[test]
fn test_noahs_ark_reconstructs_at_most_three_identical_elements() {
    assert_eq!(
        dump("<!DOCTYPE html><p><b><b><b><b><p>x"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <p>\n|       <b>\n|         <b>\n|           <b>\n|             <b>\n|     <p>\n|       <b>\n|         <b>\n|           <b>\n|             \"x\"\n"
    );
}

#[test]
fn test_noahs_ark_distinguishes_attributes() {
    let tree = parse("<!DOCTYPE html><p><b class=x><b class=x><b class=x><b class=y><p>x");
    let body = tree.body().unwrap();
    let second_p = tree.children(body)[1];
    assert_eq!(find_all_elements(&tree, second_p, "b").len(), 4);
}

#[test]
fn test_adoption_agency_outer_loop_is_bounded() {
    assert_eq!(ADOPTION_AGENCY_OUTER_LOOP_LIMIT, 8);

    // Eight passes each clone <b> into the next <div>; the last two <div>s
    // stay under the eighth clone.
    assert_eq!(
        body_dump(&format!("<b>{}</b>x", "<div>".repeat(10))),
        concat!(
            "| <b>\n",
            "| <div>\n",
            "|   <b>\n",
            "|   <div>\n",
            "|     <b>\n",
            "|     <div>\n",
            "|       <b>\n",
            "|       <div>\n",
            "|         <b>\n",
            "|         <div>\n",
            "|           <b>\n",
            "|           <div>\n",
            "|             <b>\n",
            "|             <div>\n",
            "|               <b>\n",
            "|               <div>\n",
            "|                 <b>\n",
            "|                   <div>\n",
            "|                     <div>\n",
            "|                       \"x\"\n",
        )
    );

    let html = format!("{}{}", "<a><div>".repeat(12), "</a>".repeat(12));
    let tree = parse(&html);
    assert!(tree.body().is_some());
}

#[test]
fn test_markers_scope_formatting_elements() {
    // The cell's marker keeps the outer <b> from being reconstructed inside it.
    assert_eq!(
        dump("<!DOCTYPE html><b><table><td>x</table>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <b>\n|       <table>\n|         <tbody>\n|           <tr>\n|             <td>\n|               \"x\"\n"
    );
}

#[test]
fn test_nobr_inside_nobr_runs_adoption_agency() {
    assert_eq!(
        dump("<!DOCTYPE html><nobr>a<nobr>b"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <nobr>\n|       \"a\"\n|     <nobr>\n|       \"b\"\n"
    );
}
