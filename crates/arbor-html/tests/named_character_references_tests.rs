//! Integration tests for the named character reference table.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html#named-character-references)

use arbor_html::tokenizer::named_character_references::{
    any_entity_has_prefix, longest_match, lookup_entity,
};

fn chars(input: &str) -> Vec<char> {
    input.chars().collect()
}

#[test]
fn test_lookup_with_and_without_semicolon() {
    assert_eq!(lookup_entity("amp;"), Some("&"));
    assert_eq!(lookup_entity("nbsp;"), Some("\u{00A0}"));
    // Legacy names are listed without the semicolon too.
    assert_eq!(lookup_entity("lt"), Some("<"));
    assert_eq!(lookup_entity("notin"), None);
    assert_eq!(lookup_entity(""), None);
}

#[test]
fn test_prefix_queries() {
    assert!(any_entity_has_prefix("no"));
    assert!(any_entity_has_prefix("notin"));
    assert!(!any_entity_has_prefix("ampx"));
}

#[test]
fn test_longest_match_prefers_the_longer_name() {
    assert_eq!(longest_match(&chars("notin;")), Some((6, "\u{2209}")));
    assert_eq!(longest_match(&chars("amp;rest")), Some((4, "&")));
}

#[test]
fn test_longest_match_falls_back_to_legacy_prefix() {
    // "&notit;" is not a reference, but its legacy prefix "not" is.
    assert_eq!(longest_match(&chars("notit;")), Some((3, "\u{00AC}")));
}

#[test]
fn test_longest_match_without_any_name() {
    assert_eq!(longest_match(&chars("xyz;")), None);
    assert_eq!(longest_match(&chars("\u{00E9}t\u{00E9}")), None);
    assert_eq!(longest_match(&[]), None);
}
