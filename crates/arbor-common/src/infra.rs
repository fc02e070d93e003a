//! String primitives from the [Infra Standard](https://infra.spec.whatwg.org/).

/// [§ 4.6 Code points](https://infra.spec.whatwg.org/#ascii-whitespace)
///
/// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR,
/// or U+0020 SPACE."
#[must_use]
pub const fn is_ascii_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

/// [§ 4.7 Strings](https://infra.spec.whatwg.org/#ascii-case-insensitive)
///
/// "A string A is an ASCII case-insensitive match for a string B, if the
/// ASCII lowercase of A is the ASCII lowercase of B."
#[must_use]
pub fn ascii_case_insensitive_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// ASCII case-insensitive "starts with", used by the quirks-mode tables
/// where a public identifier must begin with one of a fixed set of prefixes.
#[must_use]
pub fn starts_with_ignore_ascii_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_includes_form_feed_but_not_vertical_tab() {
        assert!(is_ascii_whitespace('\x0C'));
        assert!(!is_ascii_whitespace('\x0B'));
    }

    #[test]
    fn test_prefix_match_ignores_case() {
        assert!(starts_with_ignore_ascii_case(
            "-//w3c//dtd html 4.01 frameset//en",
            "-//W3C//DTD HTML 4.01 Frameset//"
        ));
        assert!(!starts_with_ignore_ascii_case("-//W3C", "-//W3C//DTD"));
    }

    #[test]
    fn test_prefix_match_does_not_split_multibyte_characters() {
        assert!(!starts_with_ignore_ascii_case("é-//", "-/"));
    }
}
