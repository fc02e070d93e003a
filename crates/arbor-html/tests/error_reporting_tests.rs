//! Integration tests for parse error recording and echoing.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)

use arbor_common::warning::has_warned;
use arbor_html::{HTMLParser, parse_document};

const NULL_CHARACTER: &str = "parse error: unexpected-null-character";

// Both halves share the global warning set, so they run in one test.
#[test]
fn test_tokenizer_errors_are_echoed_only_when_reporting() {
    let (_, issues) = parse_document("a\0b");
    assert!(
        issues
            .iter()
            .any(|issue| issue.is_error && issue.message == "unexpected-null-character")
    );
    assert!(!has_warned("HTML Tokenizer", NULL_CHARACTER));

    let (_, issues) = HTMLParser::from_html("a\0b")
        .with_error_reporting()
        .run_with_issues();
    assert!(
        issues
            .iter()
            .any(|issue| issue.message == "unexpected-null-character")
    );
    assert!(has_warned("HTML Tokenizer", NULL_CHARACTER));
}
