//! # Poem Site
//!
//! A minimal static site generator for a directory of poems and slide decks.
//! The filesystem is the data source: every markdown poem becomes a sibling
//! HTML page, and a single index page links all poems and slide decks.
//!
//! # Architecture: Two-Phase Pipeline
//!
//! ```text
//! 1. Convert   resources/poems/**/*.md   →  sibling *.html pages
//! 2. Index     poems/**/*.html + slides/**/*.js  →  index.html
//! ```
//!
//! Phase 2 reads what phase 1 wrote, so the phases never overlap. See
//! [`pipeline`] for failure semantics.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`walk`] | Recursive directory listing, nested and flattened |
//! | [`naming`] | `NNN title` filename convention parser |
//! | [`render`] | Markdown → standalone HTML page |
//! | [`links`] | Poem and slide link collection, relative URLs |
//! | [`index`] | Aggregate index page |
//! | [`pipeline`] | Phase sequencing and build reports |
//! | [`config`] | `poem-site.toml` loading and [`config::Layout`] resolution |
//! | [`types`] | Values passed between phases (`Conversion`, `LinkEntry`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Deterministic Order
//!
//! Directory entries are sorted by file name during the walk. The index lists
//! poems in path order, then slide decks in path order, and rebuilding an
//! unchanged tree produces byte-identical files.
//!
//! ## Maud Over String Concatenation
//!
//! Pages are assembled with [Maud](https://maud.lambda.xyz/). Titles and link
//! targets are escaped on interpolation; only the rendered markdown fragment
//! is inserted verbatim.
//!
//! ## Explicit Layout
//!
//! Roots are never process-wide constants. Every phase takes a
//! [`config::Layout`] of absolute paths resolved from a project root, so the
//! whole pipeline can run against a temporary directory.

pub mod config;
pub mod index;
pub mod links;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod types;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;
