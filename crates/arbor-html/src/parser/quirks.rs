//! DOCTYPE classification for the "initial" insertion mode.
//!
//! [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)

use arbor_common::infra::{ascii_case_insensitive_eq, starts_with_ignore_ascii_case};
use arbor_dom::QuirksMode;

use crate::tokenizer::Token;

/// "The public identifier starts with: ..."
const QUIRKY_PUBLIC_ID_PREFIXES: &[&str] = &[
    "+//Silmaril//dtd html Pro v0r11 19970101//",
    "-//AS//DTD HTML 3.0 asWedit + extensions//",
    "-//AdvaSoft Ltd//DTD HTML 3.0 asWedit + extensions//",
    "-//IETF//DTD HTML 2.0 Level 1//",
    "-//IETF//DTD HTML 2.0 Level 2//",
    "-//IETF//DTD HTML 2.0 Strict Level 1//",
    "-//IETF//DTD HTML 2.0 Strict Level 2//",
    "-//IETF//DTD HTML 2.0 Strict//",
    "-//IETF//DTD HTML 2.0//",
    "-//IETF//DTD HTML 2.1E//",
    "-//IETF//DTD HTML 3.0//",
    "-//IETF//DTD HTML 3.2 Final//",
    "-//IETF//DTD HTML 3.2//",
    "-//IETF//DTD HTML 3//",
    "-//IETF//DTD HTML Level 0//",
    "-//IETF//DTD HTML Level 1//",
    "-//IETF//DTD HTML Level 2//",
    "-//IETF//DTD HTML Level 3//",
    "-//IETF//DTD HTML Strict Level 0//",
    "-//IETF//DTD HTML Strict Level 1//",
    "-//IETF//DTD HTML Strict Level 2//",
    "-//IETF//DTD HTML Strict Level 3//",
    "-//IETF//DTD HTML Strict//",
    "-//IETF//DTD HTML//",
    "-//Metrius//DTD Metrius Presentational//",
    "-//Microsoft//DTD Internet Explorer 2.0 HTML Strict//",
    "-//Microsoft//DTD Internet Explorer 2.0 HTML//",
    "-//Microsoft//DTD Internet Explorer 2.0 Tables//",
    "-//Microsoft//DTD Internet Explorer 3.0 HTML Strict//",
    "-//Microsoft//DTD Internet Explorer 3.0 HTML//",
    "-//Microsoft//DTD Internet Explorer 3.0 Tables//",
    "-//Netscape Comm. Corp.//DTD HTML//",
    "-//Netscape Comm. Corp.//DTD Strict HTML//",
    "-//O'Reilly and Associates//DTD HTML 2.0//",
    "-//O'Reilly and Associates//DTD HTML Extended 1.0//",
    "-//O'Reilly and Associates//DTD HTML Extended Relaxed 1.0//",
    "-//SQ//DTD HTML 2.0 HoTMetaL + extensions//",
    "-//SoftQuad Software//DTD HoTMetaL PRO 6.0::19990601::extensions to HTML 4.0//",
    "-//SoftQuad//DTD HoTMetaL PRO 4.0::19971010::extensions to HTML 4.0//",
    "-//Spyglass//DTD HTML 2.0 Extended//",
    "-//Sun Microsystems Corp.//DTD HotJava HTML//",
    "-//Sun Microsystems Corp.//DTD HotJava Strict HTML//",
    "-//W3C//DTD HTML 3 1995-03-24//",
    "-//W3C//DTD HTML 3.2 Draft//",
    "-//W3C//DTD HTML 3.2 Final//",
    "-//W3C//DTD HTML 3.2//",
    "-//W3C//DTD HTML 3.2S Draft//",
    "-//W3C//DTD HTML 4.0 Frameset//",
    "-//W3C//DTD HTML 4.0 Transitional//",
    "-//W3C//DTD HTML Experimental 19960712//",
    "-//W3C//DTD HTML Experimental 970421//",
    "-//W3C//DTD W3 HTML//",
    "-//W3O//DTD W3 HTML 3.0//",
    "-//WebTechs//DTD Mozilla HTML 2.0//",
    "-//WebTechs//DTD Mozilla HTML//",
];

/// "The public identifier is set to: ..."
const QUIRKY_PUBLIC_IDS: &[&str] = &[
    "-//W3O//DTD W3 HTML Strict 3.0//EN//",
    "-/W3C/DTD HTML 4.0 Transitional/EN",
    "HTML",
];

/// "The system identifier is set to: ..."
const QUIRKY_SYSTEM_ID: &str = "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";

/// HTML 4.01 Frameset and Transitional: quirks without a system identifier,
/// limited quirks with one.
const HTML401_PUBLIC_ID_PREFIXES: &[&str] = &[
    "-//W3C//DTD HTML 4.01 Frameset//",
    "-//W3C//DTD HTML 4.01 Transitional//",
];

/// "The public identifier starts with: "-//W3C//DTD XHTML 1.0 Frameset//",
/// "-//W3C//DTD XHTML 1.0 Transitional//""
const LIMITED_QUIRKS_PUBLIC_ID_PREFIXES: &[&str] = &[
    "-//W3C//DTD XHTML 1.0 Frameset//",
    "-//W3C//DTD XHTML 1.0 Transitional//",
];

fn starts_with_any(id: &str, prefixes: &[&str]) -> bool {
    prefixes
        .iter()
        .any(|prefix| starts_with_ignore_ascii_case(id, prefix))
}

/// Classify a DOCTYPE token into a document mode.
///
/// "...if the document is not an iframe srcdoc document, and the parser
/// cannot change the mode flag is false, and the DOCTYPE token matches one of
/// the conditions in the following list, then set the Document to quirks
/// mode..."
///
/// Non-DOCTYPE tokens classify as [`QuirksMode::NoQuirks`].
#[must_use]
pub fn quirks_mode_for_doctype(token: &Token) -> QuirksMode {
    let Token::Doctype {
        name,
        public_identifier,
        system_identifier,
        force_quirks,
    } = token
    else {
        return QuirksMode::NoQuirks;
    };
    let public_id = public_identifier.as_deref();
    let system_id = system_identifier.as_deref();

    // "The force-quirks flag is set to on."
    // "The name is not "html"."
    if *force_quirks || name.as_deref() != Some("html") {
        return QuirksMode::Quirks;
    }

    if let Some(public_id) = public_id {
        if QUIRKY_PUBLIC_IDS
            .iter()
            .any(|id| ascii_case_insensitive_eq(public_id, id))
            || starts_with_any(public_id, QUIRKY_PUBLIC_ID_PREFIXES)
        {
            return QuirksMode::Quirks;
        }
        // "The system identifier is missing and the public identifier starts with: ..."
        if system_id.is_none() && starts_with_any(public_id, HTML401_PUBLIC_ID_PREFIXES) {
            return QuirksMode::Quirks;
        }
    }

    if system_id.is_some_and(|id| ascii_case_insensitive_eq(id, QUIRKY_SYSTEM_ID)) {
        return QuirksMode::Quirks;
    }

    // "Otherwise, if the document is not an iframe srcdoc document, and the
    // parser cannot change the mode flag is false, and the DOCTYPE token
    // matches one of the conditions in the following list, then set the
    // Document to limited-quirks mode"
    if let Some(public_id) = public_id
        && (starts_with_any(public_id, LIMITED_QUIRKS_PUBLIC_ID_PREFIXES)
            || (system_id.is_some() && starts_with_any(public_id, HTML401_PUBLIC_ID_PREFIXES)))
    {
        return QuirksMode::LimitedQuirks;
    }

    QuirksMode::NoQuirks
}

/// "If the DOCTYPE token's name is not "html", or the token's public
/// identifier is not missing, or the token's system identifier is neither
/// missing nor "about:legacy-compat", then there is a parse error."
#[must_use]
pub fn is_doctype_parse_error(token: &Token) -> bool {
    let Token::Doctype {
        name,
        public_identifier,
        system_identifier,
        ..
    } = token
    else {
        return false;
    };
    name.as_deref() != Some("html")
        || public_identifier.is_some()
        || system_identifier
            .as_deref()
            .is_some_and(|id| id != "about:legacy-compat")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctype(name: &str, public_id: Option<&str>, system_id: Option<&str>) -> Token {
        Token::Doctype {
            name: Some(name.to_string()),
            public_identifier: public_id.map(str::to_string),
            system_identifier: system_id.map(str::to_string),
            force_quirks: false,
        }
    }

    #[test]
    fn test_html5_doctype_is_no_quirks() {
        let token = doctype("html", None, None);
        assert_eq!(quirks_mode_for_doctype(&token), QuirksMode::NoQuirks);
        assert!(!is_doctype_parse_error(&token));
    }

    #[test]
    fn test_html401_frameset_depends_on_system_id() {
        let public = Some("-//W3C//DTD HTML 4.01 Frameset//EN");
        assert_eq!(
            quirks_mode_for_doctype(&doctype("html", public, None)),
            QuirksMode::Quirks
        );
        assert_eq!(
            quirks_mode_for_doctype(&doctype(
                "html",
                public,
                Some("http://www.w3.org/TR/html4/frameset.dtd")
            )),
            QuirksMode::LimitedQuirks
        );
    }

    #[test]
    fn test_public_id_html_is_quirks() {
        assert_eq!(
            quirks_mode_for_doctype(&doctype("html", Some("HTML"), None)),
            QuirksMode::Quirks
        );
        assert_eq!(
            quirks_mode_for_doctype(&doctype("html", Some("html"), None)),
            QuirksMode::Quirks
        );
    }

    #[test]
    fn test_xhtml_transitional_is_limited_quirks() {
        let token = doctype("html", Some("-//W3C//DTD XHTML 1.0 Transitional//EN"), None);
        assert_eq!(quirks_mode_for_doctype(&token), QuirksMode::LimitedQuirks);
    }

    #[test]
    fn test_force_quirks_and_wrong_name() {
        let mut token = doctype("html", None, None);
        token.set_force_quirks();
        assert_eq!(quirks_mode_for_doctype(&token), QuirksMode::Quirks);
        assert_eq!(
            quirks_mode_for_doctype(&doctype("svg", None, None)),
            QuirksMode::Quirks
        );
    }

    #[test]
    fn test_ibm_system_id_is_quirks() {
        let token = doctype("html", None, Some(QUIRKY_SYSTEM_ID));
        assert_eq!(quirks_mode_for_doctype(&token), QuirksMode::Quirks);
    }

    #[test]
    fn test_legacy_compat_is_not_an_error() {
        let token = doctype("html", None, Some("about:legacy-compat"));
        assert!(!is_doctype_parse_error(&token));
    }
}
