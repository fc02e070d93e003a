//! Integration tests for SVG and MathML content.
//!
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

use arbor_dom::Namespace;
use arbor_html::parser::foreign_attribute;
use arbor_html::{dump_tree, parse_document};

const PREFIX: &str = "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n";

fn body_dump(markup: &str) -> String {
    let (tree, _) = parse_document(&format!("<!DOCTYPE html>{markup}"));
    let dump = dump_tree(&tree);
    dump.strip_prefix(PREFIX)
        .map(str::to_string)
        .unwrap_or_else(|| panic!("unexpected document shape:\n{dump}"))
}

#[test]
fn test_html_integration_point_uses_html_rules() {
    assert_eq!(
        body_dump("<svg><foreignObject><p>"),
        "|     <svg svg>\n|       <svg foreignObject>\n|         <p>\n"
    );
}

#[test]
fn test_svg_tag_and_attribute_case_is_adjusted() {
    assert_eq!(
        body_dump("<svg viewbox='0 0 1 1'><clippath><lineargradient/></clippath></svg>"),
        "|     <svg svg>\n|       viewBox=\"0 0 1 1\"\n|       <svg clipPath>\n|         <svg linearGradient>\n"
    );
}

#[test]
fn test_foreign_attributes_are_namespaced() {
    assert_eq!(
        body_dump("<svg><a xlink:href='#a' xml:lang=en/></svg>"),
        "|     <svg svg>\n|       <svg a>\n|         xlink href=\"#a\"\n|         xml lang=\"en\"\n"
    );
}

#[test]
fn test_foreign_attribute_lookup() {
    let attr = foreign_attribute("xlink:href").unwrap();
    assert_eq!(attr.prefix, Some("xlink"));
    assert_eq!(attr.local_name, "href");
    assert_eq!(attr.namespace, Namespace::XLink);
    assert!(foreign_attribute("href").is_none());
}

#[test]
fn test_mathml_definitionurl_is_adjusted() {
    assert_eq!(
        body_dump("<math definitionurl=x></math>"),
        "|     <math math>\n|       definitionURL=\"x\"\n"
    );
}

#[test]
fn test_mathml_text_integration_point() {
    assert_eq!(
        body_dump("<math><mi><b>x</b></mi></math>"),
        "|     <math math>\n|       <math mi>\n|         <b>\n|           \"x\"\n"
    );
}

#[test]
fn test_mglyph_in_text_integration_point_stays_mathml() {
    assert_eq!(
        body_dump("<math><mi><mglyph></mi></math>"),
        "|     <math math>\n|       <math mi>\n|         <math mglyph>\n"
    );
}

#[test]
fn test_annotation_xml_html_integration_point() {
    assert_eq!(
        body_dump("<math><annotation-xml encoding='text/html'><div>x</div></annotation-xml></math>"),
        "|     <math math>\n|       <math annotation-xml>\n|         encoding=\"text/html\"\n|         <div>\n|           \"x\"\n"
    );
}

#[test]
fn test_annotation_xml_accepts_svg() {
    assert_eq!(
        body_dump("<math><annotation-xml><svg><circle/></svg></annotation-xml></math>"),
        "|     <math math>\n|       <math annotation-xml>\n|         <svg svg>\n|           <svg circle>\n"
    );
}

#[test]
fn test_breakout_start_tag_leaves_foreign_content() {
    assert_eq!(
        body_dump("<svg><g><b>x"),
        "|     <svg svg>\n|       <svg g>\n|     <b>\n|       \"x\"\n"
    );
}

#[test]
fn test_font_breaks_out_only_with_presentational_attributes() {
    assert_eq!(
        body_dump("<svg><font color=red>"),
        "|     <svg svg>\n|     <font>\n|       color=\"red\"\n"
    );
    assert_eq!(
        body_dump("<svg><font>"),
        "|     <svg svg>\n|       <svg font>\n"
    );
}

#[test]
fn test_end_br_and_p_break_out() {
    assert_eq!(
        body_dump("<svg></p>"),
        "|     <svg svg>\n|     <p>\n"
    );
}

#[test]
fn test_cdata_section_in_svg() {
    assert_eq!(
        body_dump("<svg><![CDATA[a<b]]></svg>"),
        "|     <svg svg>\n|       \"a<b\"\n"
    );
}

#[test]
fn test_cdata_in_html_is_a_comment() {
    assert_eq!(
        body_dump("<div><![CDATA[x]]></div>"),
        "|     <div>\n|       <!-- [CDATA[x]] -->\n"
    );
}

#[test]
fn test_self_closing_foreign_elements_are_acknowledged() {
    let (_, issues) = parse_document("<!DOCTYPE html><svg><path/><circle /></svg>");
    assert!(
        !issues
            .iter()
            .any(|issue| issue.message == "non-void-html-element-start-tag-with-trailing-solidus")
    );
}

#[test]
fn test_foreign_end_tags_match_case_insensitively() {
    assert_eq!(
        body_dump("<svg><foreignObject></FOREIGNOBJECT>x</svg>y"),
        "|     <svg svg>\n|       <svg foreignObject>\n|       \"x\"\n|     \"y\"\n"
    );
}

#[test]
fn test_null_in_foreign_content_is_replaced() {
    assert_eq!(
        body_dump("<svg>a\u{0}b</svg>"),
        "|     <svg svg>\n|       \"a\u{FFFD}b\"\n"
    );
}

#[test]
fn test_svg_script_end_tag() {
    assert_eq!(
        body_dump("<svg><script>x</script></svg>"),
        "|     <svg svg>\n|       <svg script>\n|         \"x\"\n"
    );
}
