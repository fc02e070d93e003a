//! Element categories used by tree construction.
//!
//! [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#special)

use arbor_common::infra::ascii_case_insensitive_eq;
use arbor_dom::{DomTree, Namespace, NodeId};

/// [§ 13.2.4.3 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// "The following elements have varying levels of special parsing rules:
/// HTML's address, applet, area, article, aside, base, basefont, bgsound,
/// blockquote, body, br, button, caption, center, col, colgroup, dd, details,
/// dir, div, dl, dt, embed, fieldset, figcaption, figure, footer, form, frame,
/// frameset, h1, h2, h3, h4, h5, h6, head, header, hgroup, hr, html, iframe,
/// img, input, keygen, li, link, listing, main, marquee, menu, meta, nav,
/// noembed, noframes, noscript, object, ol, p, param, plaintext, pre, script,
/// search, section, select, source, style, summary, table, tbody, td,
/// template, textarea, tfoot, th, thead, title, tr, track, ul, wbr, xmp;
/// MathML mi, MathML mo, MathML mn, MathML ms, MathML mtext, and MathML
/// annotation-xml; and SVG foreignObject, SVG desc, and SVG title."
#[must_use]
pub fn is_special(namespace: Namespace, tag: &str) -> bool {
    match namespace {
        Namespace::Html => matches!(
            tag,
            "address"
                | "applet"
                | "area"
                | "article"
                | "aside"
                | "base"
                | "basefont"
                | "bgsound"
                | "blockquote"
                | "body"
                | "br"
                | "button"
                | "caption"
                | "center"
                | "col"
                | "colgroup"
                | "dd"
                | "details"
                | "dir"
                | "div"
                | "dl"
                | "dt"
                | "embed"
                | "fieldset"
                | "figcaption"
                | "figure"
                | "footer"
                | "form"
                | "frame"
                | "frameset"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "head"
                | "header"
                | "hgroup"
                | "hr"
                | "html"
                | "iframe"
                | "img"
                | "input"
                | "keygen"
                | "li"
                | "link"
                | "listing"
                | "main"
                | "marquee"
                | "menu"
                | "meta"
                | "nav"
                | "noembed"
                | "noframes"
                | "noscript"
                | "object"
                | "ol"
                | "p"
                | "param"
                | "plaintext"
                | "pre"
                | "script"
                | "search"
                | "section"
                | "select"
                | "source"
                | "style"
                | "summary"
                | "table"
                | "tbody"
                | "td"
                | "template"
                | "textarea"
                | "tfoot"
                | "th"
                | "thead"
                | "title"
                | "tr"
                | "track"
                | "ul"
                | "wbr"
                | "xmp"
        ),
        Namespace::MathMl => {
            matches!(tag, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml")
        }
        Namespace::Svg => matches!(tag, "foreignObject" | "desc" | "title"),
        _ => false,
    }
}

/// [§ 13.2.4.3 Formatting](https://html.spec.whatwg.org/multipage/parsing.html#formatting)
///
/// "The following HTML elements are those that end up in the list of active
/// formatting elements: a, b, big, code, em, font, i, nobr, s, small, strike,
/// strong, tt, and u."
#[must_use]
pub fn is_formatting_tag(tag: &str) -> bool {
    matches!(
        tag,
        "a" | "b"
            | "big"
            | "code"
            | "em"
            | "font"
            | "i"
            | "nobr"
            | "s"
            | "small"
            | "strike"
            | "strong"
            | "tt"
            | "u"
    )
}

/// [§ 13.2.6.2 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
///
/// "...while the current node is a dd element, a dt element, an li element,
/// an optgroup element, an option element, a p element, an rb element, an rp
/// element, an rt element, or an rtc element..."
#[must_use]
pub fn has_implied_end_tag(tag: &str) -> bool {
    matches!(
        tag,
        "dd" | "dt" | "li" | "optgroup" | "option" | "p" | "rb" | "rp" | "rt" | "rtc"
    )
}

/// [§ 13.2.6.3 Generate all implied end tags thoroughly](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
#[must_use]
pub fn has_implied_end_tag_thoroughly(tag: &str) -> bool {
    has_implied_end_tag(tag)
        || matches!(
            tag,
            "caption" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
        )
}

/// [§ 4.10.2 Categories](https://html.spec.whatwg.org/multipage/forms.html#form-associated-element)
///
/// "Form-associated elements: button, fieldset, input, object, output,
/// select, textarea, img."
#[must_use]
pub fn is_form_associated(tag: &str) -> bool {
    matches!(
        tag,
        "button" | "fieldset" | "input" | "object" | "output" | "select" | "textarea" | "img"
    )
}

/// "Listed elements: button, fieldset, input, object, output, select, textarea."
#[must_use]
pub fn is_listed(tag: &str) -> bool {
    is_form_associated(tag) && tag != "img"
}

/// [§ 13.2.6 MathML text integration point](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
///
/// "A node is a MathML text integration point if it is one of the following
/// elements: A MathML mi element, A MathML mo element, A MathML mn element,
/// A MathML ms element, A MathML mtext element."
#[must_use]
pub fn is_mathml_text_integration_point(tree: &DomTree, node: NodeId) -> bool {
    tree.as_element(node).is_some_and(|element| {
        element.namespace == Namespace::MathMl
            && matches!(element.tag_name.as_str(), "mi" | "mo" | "mn" | "ms" | "mtext")
    })
}

/// [§ 13.2.6 HTML integration point](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
///
/// "A node is an HTML integration point if it is one of the following elements:
/// - A MathML annotation-xml element whose start tag token had an attribute
///   with the name "encoding" whose value was an ASCII case-insensitive match
///   for the string "text/html"
/// - A MathML annotation-xml element whose start tag token had an attribute
///   with the name "encoding" whose value was an ASCII case-insensitive match
///   for the string "application/xhtml+xml"
/// - An SVG foreignObject element
/// - An SVG desc element
/// - An SVG title element"
#[must_use]
pub fn is_html_integration_point(tree: &DomTree, node: NodeId) -> bool {
    let Some(element) = tree.as_element(node) else {
        return false;
    };
    match element.namespace {
        Namespace::MathMl => {
            element.tag_name == "annotation-xml"
                && element.attribute("encoding").is_some_and(|encoding| {
                    ascii_case_insensitive_eq(encoding, "text/html")
                        || ascii_case_insensitive_eq(encoding, "application/xhtml+xml")
                })
        }
        Namespace::Svg => matches!(element.tag_name.as_str(), "foreignObject" | "desc" | "title"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_dom::AttributesMap;

    #[test]
    fn test_special_is_namespace_aware() {
        assert!(is_special(Namespace::Html, "div"));
        assert!(!is_special(Namespace::Svg, "div"));
        assert!(is_special(Namespace::Svg, "foreignObject"));
        assert!(is_special(Namespace::MathMl, "mtext"));
        assert!(!is_special(Namespace::Html, "span"));
    }

    #[test]
    fn test_formatting_tags() {
        for tag in ["a", "b", "nobr", "tt", "u"] {
            assert!(is_formatting_tag(tag), "{tag}");
        }
        assert!(!is_formatting_tag("span"));
        assert!(!is_formatting_tag("div"));
    }

    #[test]
    fn test_annotation_xml_encoding() {
        let mut tree = DomTree::new();
        let mut attrs = AttributesMap::new();
        let _ = attrs.insert("encoding".to_string(), "Text/HTML".to_string());
        let html = tree.create_element(Namespace::MathMl, "annotation-xml", attrs);
        let plain = tree.create_element(Namespace::MathMl, "annotation-xml", AttributesMap::new());

        assert!(is_html_integration_point(&tree, html));
        assert!(!is_html_integration_point(&tree, plain));
    }
}
