//! Errors returned by the public parsing API.
//!
//! Parse errors in the markup itself are never returned as `Err`; they are
//! recorded as [`ParseIssue`](crate::ParseIssue)s and parsing recovers.

use arbor_dom::NodeId;
use thiserror::Error;

/// Error type for API misuse that prevents a parse from starting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HtmlError {
    /// The node id does not belong to the given document.
    #[error("node {0:?} does not exist in the document")]
    NoSuchNode(NodeId),
    /// A fragment was requested with a context node that is not an element.
    #[error("fragment context {0:?} is not an element")]
    ContextNotAnElement(NodeId),
    /// A context tag such as `svg path` named an unknown namespace prefix.
    #[error("unknown namespace prefix in context tag {0:?}")]
    UnknownContextNamespace(String),
}
