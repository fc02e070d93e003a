//! Common utilities for the arbor HTML parser.
//!
//! This crate provides shared infrastructure used by the parser crates:
//! - **Warning System** - colored, deduplicated terminal diagnostics
//! - **Infra** - the string primitives of the [Infra Standard](https://infra.spec.whatwg.org/)

pub mod infra;
pub mod warning;
