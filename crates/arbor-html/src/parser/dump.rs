//! Human-readable and test-oriented renderings of a parsed tree.

use std::fmt::Write as _;

use arbor_dom::{DomTree, ElementData, Namespace, NodeId, NodeType};
use owo_colors::OwoColorize;

use super::foreign_content::foreign_attribute;
use super::fragment::DocumentFragment;

/// Print the tree rooted at `id` to stdout, one node per line, indented two
/// spaces per level.
///
/// Spaces inside text are shown as `·` and newlines as `\n` so whitespace-only
/// text nodes stay visible.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document => {
            println!("{prefix}{}", "Document".bold());
        }
        NodeType::DocumentFragment => {
            println!("{prefix}{}", "#document-fragment".bold());
        }
        NodeType::DocumentType(doctype) => {
            println!("{prefix}{}", format!("<!DOCTYPE {}>", doctype.name).dimmed());
        }
        NodeType::Element(data) => {
            let name = qualified_tag_name(data);
            if data.attrs.is_empty() {
                println!("{prefix}<{}>", name.cyan());
            } else {
                let attrs: Vec<String> = sorted_attributes(data)
                    .into_iter()
                    .map(|(k, v)| {
                        if v.is_empty() {
                            k.yellow().to_string()
                        } else {
                            format!("{}=\"{v}\"", k.yellow())
                        }
                    })
                    .collect();
                println!("{prefix}<{} {}>", name.cyan(), attrs.join(" "));
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            println!("{prefix}{}", format!("\"{display}\"").green());
        }
        NodeType::Comment(data) => {
            println!("{prefix}{}", format!("<!-- {data} -->").dimmed());
        }
    }
    if let Some(contents) = tree.template_contents(id) {
        print_tree(tree, contents, indent + 1);
    }
    for &child_id in tree.children(id) {
        print_tree(tree, child_id, indent + 1);
    }
}

/// Render the document in the html5lib-tests tree format.
///
/// ```text
/// | <!DOCTYPE html>
/// | <html>
/// |   <head>
/// |   <body>
/// |     <svg svg>
/// |       xlink href="#a"
/// ```
#[must_use]
pub fn dump_tree(tree: &DomTree) -> String {
    let mut out = String::new();
    for &child in tree.children(tree.root()) {
        dump_node(tree, child, 0, &mut out);
    }
    out
}

/// Render a fragment's nodes in the html5lib-tests tree format, with the
/// fragment's top-level nodes at depth zero.
#[must_use]
pub fn dump_fragment(fragment: &DocumentFragment) -> String {
    let mut out = String::new();
    for &child in fragment.children() {
        dump_node(&fragment.tree, child, 0, &mut out);
    }
    out
}

fn dump_node(tree: &DomTree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    match &node.node_type {
        NodeType::Document | NodeType::DocumentFragment => {}
        NodeType::DocumentType(doctype) => {
            if doctype.public_id.is_empty() && doctype.system_id.is_empty() {
                let _ = writeln!(out, "| {indent}<!DOCTYPE {}>", doctype.name);
            } else {
                let _ = writeln!(
                    out,
                    "| {indent}<!DOCTYPE {} \"{}\" \"{}\">",
                    doctype.name, doctype.public_id, doctype.system_id
                );
            }
        }
        NodeType::Element(data) => {
            let _ = writeln!(out, "| {indent}<{}>", qualified_tag_name(data));
            let attr_indent = "  ".repeat(depth + 1);
            for (name, value) in sorted_attributes(data) {
                let _ = writeln!(out, "| {attr_indent}{name}=\"{value}\"");
            }
        }
        NodeType::Text(data) => {
            let _ = writeln!(out, "| {indent}\"{data}\"");
        }
        NodeType::Comment(data) => {
            let _ = writeln!(out, "| {indent}<!-- {data} -->");
        }
    }

    // Template contents are shown as a `content` pseudo-node.
    if let Some(contents) = tree.template_contents(id) {
        let _ = writeln!(out, "| {}content", "  ".repeat(depth + 1));
        for &child in tree.children(contents) {
            dump_node(tree, child, depth + 2, out);
        }
    }
    for &child in tree.children(id) {
        dump_node(tree, child, depth + 1, out);
    }
}

/// `svg path`, `math mi`, or just the local name for HTML elements.
fn qualified_tag_name(data: &ElementData) -> String {
    match data.namespace {
        Namespace::Html => data.tag_name.clone(),
        namespace => format!("{} {}", namespace.prefix(), data.tag_name),
    }
}

/// Attributes as `(display name, value)` pairs sorted by display name.
///
/// On foreign elements, adjusted attributes such as `xlink:href` display as
/// `xlink href`.
fn sorted_attributes(data: &ElementData) -> Vec<(String, &str)> {
    let mut attrs: Vec<(String, &str)> = data
        .attrs
        .iter()
        .map(|(name, value)| {
            let display = match foreign_attribute(name) {
                Some(attr) if data.namespace != Namespace::Html => match attr.prefix {
                    Some(prefix) => format!("{prefix} {}", attr.local_name),
                    None => attr.local_name.to_string(),
                },
                _ => name.clone(),
            };
            (display, value.as_str())
        })
        .collect();
    attrs.sort_by(|a, b| a.0.cmp(&b.0));
    attrs
}

#[cfg(test)]
mod tests {
    use arbor_dom::AttributesMap;

    use super::*;

    #[test]
    fn test_dump_nested_elements_and_text() {
        let mut tree = DomTree::new();
        let html = tree.create_element(Namespace::Html, "html", AttributesMap::new());
        let body = tree.create_element(Namespace::Html, "body", AttributesMap::new());
        let text = tree.create_text("hi");
        let comment = tree.create_comment("c");
        tree.append_child(NodeId::ROOT, html);
        tree.append_child(html, body);
        tree.append_child(body, text);
        tree.append_child(body, comment);

        assert_eq!(
            dump_tree(&tree),
            "| <html>\n|   <body>\n|     \"hi\"\n|     <!-- c -->\n"
        );
    }

    #[test]
    fn test_dump_sorts_attributes_and_prefixes_namespaces() {
        let mut tree = DomTree::new();
        let mut attrs = AttributesMap::new();
        let _ = attrs.insert("xlink:href".to_string(), "#a".to_string());
        let _ = attrs.insert("viewBox".to_string(), "0 0 1 1".to_string());
        let svg = tree.create_element(Namespace::Svg, "svg", attrs);
        tree.append_child(NodeId::ROOT, svg);

        assert_eq!(
            dump_tree(&tree),
            "| <svg svg>\n|   viewBox=\"0 0 1 1\"\n|   xlink href=\"#a\"\n"
        );
    }

    #[test]
    fn test_dump_html_element_keeps_colon_attribute_names() {
        let mut tree = DomTree::new();
        let mut attrs = AttributesMap::new();
        let _ = attrs.insert("xlink:href".to_string(), "x".to_string());
        let div = tree.create_element(Namespace::Html, "div", attrs);
        tree.append_child(NodeId::ROOT, div);

        assert_eq!(dump_tree(&tree), "| <div>\n|   xlink:href=\"x\"\n");
    }
}
