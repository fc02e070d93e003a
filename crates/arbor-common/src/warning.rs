//! Parser warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the tokenizer and tree builder to surface parse errors when error
//! reporting is enabled, and to flag behavior that is deliberately not modeled.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a parse problem or an unmodeled feature (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("HTML Parser", "unexpected-end-tag </p>");
/// ```
pub fn warn_once(component: &str, message: &str) {
    if !should_print(component, message) {
        return;
    }
    eprintln!(
        "{}",
        format!("[arbor {component}] ⚠ {message}").yellow()
    );
}

/// Records `component`/`message` in the dedup set, returning true the first
/// time the pair is seen.
fn should_print(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key)
}

/// Whether `warn_once(component, message)` has printed since the last
/// [`clear_warnings`].
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

/// Clear all recorded warnings (call before parsing a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_message_is_only_reported_once() {
        assert!(should_print("Test dedup", "first"));
        assert!(!should_print("Test dedup", "first"));
        assert!(should_print("Test dedup", "second"));
    }

    #[test]
    fn test_has_warned_tracks_printed_messages() {
        assert!(!has_warned("Test lookup", "message"));
        warn_once("Test lookup", "message");
        assert!(has_warned("Test lookup", "message"));
        assert!(!has_warned("Test lookup", "other"));
    }
}
