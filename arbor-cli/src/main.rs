//! Arbor CLI
//!
//! Parse an HTML document or fragment and print the tree the parser built.
//!
//! Set `RUST_LOG=arbor_html=trace` to follow every token through the
//! insertion modes.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use arbor_dom::{AttributesMap, DomTree, NodeId};
use arbor_html::parser::split_context_tag;
use arbor_html::{
    DocumentFragment, HTMLParser, ParseIssue, dump_fragment, dump_tree, print_tree,
};
use clap::Parser;

/// Arbor: WHATWG HTML tree construction from the command line
#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the tree for a file
    arbor ./index.html

    # Parse inline markup
    arbor --html '<p>One<p>Two'

    # Parse a fragment as the contents of a <tr>
    arbor --fragment tr --html '<td>cell'

    # Foreign context elements take an html5lib-style prefix
    arbor --fragment 'svg g' --html '<circle/>'

    # html5lib-tests tree format, with parse errors
    arbor --dump --issues --html '<table>x</table>'

    # JSON tree
    arbor --json --html '<b>bold</b>'
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE", conflicts_with = "html")]
    path: Option<PathBuf>,

    /// Parse this markup instead of reading a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Parse as a fragment in the context of this element (`td`, `svg path`)
    #[arg(long, value_name = "CONTEXT")]
    fragment: Option<String>,

    /// Print the tree as JSON
    #[arg(long, conflicts_with = "dump")]
    json: bool,

    /// Print the tree in the html5lib-tests format
    #[arg(long)]
    dump: bool,

    /// Parse with the scripting flag enabled
    #[arg(long)]
    scripting: bool,

    /// Echo each distinct parse error to stderr as it is found
    #[arg(long)]
    report_errors: bool,

    /// List parse errors and warnings after the tree
    #[arg(long)]
    issues: bool,
}

/// The result of a run: a whole document, or a fragment.
enum Parsed {
    Document(DomTree, Vec<ParseIssue>),
    Fragment(DocumentFragment),
}

impl Parsed {
    fn tree(&self) -> &DomTree {
        match self {
            Self::Document(tree, _) => tree,
            Self::Fragment(fragment) => &fragment.tree,
        }
    }

    fn issues(&self) -> &[ParseIssue] {
        match self {
            Self::Document(_, issues) => issues,
            Self::Fragment(fragment) => &fragment.issues,
        }
    }

    /// The nodes to print: the document node, or the fragment's top-level
    /// nodes.
    fn roots(&self) -> Vec<NodeId> {
        match self {
            Self::Document(tree, _) => vec![tree.root()],
            Self::Fragment(fragment) => fragment.children().to_vec(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let markup = load_markup(&cli)?;
    let parsed = parse(&cli, &markup)?;
    log::debug!(
        "parsed {} bytes into {} nodes with {} issues",
        markup.len(),
        parsed.tree().len(),
        parsed.issues().len()
    );

    if cli.json {
        print_json(&parsed)?;
    } else if cli.dump {
        match &parsed {
            Parsed::Document(tree, _) => print!("{}", dump_tree(tree)),
            Parsed::Fragment(fragment) => print!("{}", dump_fragment(fragment)),
        }
    } else {
        println!("=== DOM Tree ===");
        for root in parsed.roots() {
            print_tree(parsed.tree(), root, 0);
        }
    }

    if cli.issues {
        print_issues(parsed.issues());
    }
    Ok(())
}

/// Read the markup from `--html` or the file argument.
fn load_markup(cli: &Cli) -> Result<String> {
    if let Some(ref html) = cli.html {
        Ok(html.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    } else {
        anyhow::bail!("expected a file path or --html")
    }
}

fn parse(cli: &Cli, markup: &str) -> Result<Parsed> {
    let Some(ref context_tag) = cli.fragment else {
        let mut parser = HTMLParser::from_html(markup).with_scripting(cli.scripting);
        if cli.report_errors {
            parser = parser.with_error_reporting();
        }
        let (tree, issues) = parser.run_with_issues();
        return Ok(Parsed::Document(tree, issues));
    };

    // The context element is the only node of a scratch document.
    let (namespace, local_name) = split_context_tag(context_tag)
        .with_context(|| format!("invalid --fragment context {context_tag:?}"))?;
    let mut document = DomTree::new();
    let context = document.create_element(namespace, local_name, AttributesMap::new());

    let mut parser = HTMLParser::for_fragment(&document, context, markup)?
        .with_scripting(cli.scripting);
    if cli.report_errors {
        parser = parser.with_error_reporting();
    }
    Ok(Parsed::Fragment(parser.run_fragment()))
}

fn print_json(parsed: &Parsed) -> Result<()> {
    let tree = parsed.tree();
    let json = match parsed {
        Parsed::Document(..) => serde_json::to_string_pretty(&tree.view(tree.root())),
        Parsed::Fragment(fragment) => {
            let nodes: Vec<_> = fragment
                .children()
                .iter()
                .map(|&id| tree.view(id))
                .collect();
            serde_json::to_string_pretty(&nodes)
        }
    }
    .context("failed to serialize the tree")?;
    println!("{json}");
    Ok(())
}

fn print_issues(issues: &[ParseIssue]) {
    println!("\n=== Parse Issues ===");
    for issue in issues {
        let kind = if issue.is_error { "error" } else { "warning" };
        println!("  - {kind} at token {}: {}", issue.token_index, issue.message);
    }
}
