//! Value types passed between pipeline phases.
//!
//! Nothing here is persisted: conversions are consumed by the writer in
//! phase 1 and link entries by the index builder in phase 2.

use serde::Serialize;
use std::path::PathBuf;

/// Outcome of rendering one markdown source.
///
/// `html` is empty when the source no longer existed at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub source: PathBuf,
    /// Page title derived from the file name
    pub title: String,
    pub html: String,
}

impl Conversion {
    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

/// One entry of the aggregate index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEntry {
    /// Display label
    pub title: String,
    /// URL relative to the project root, `/`-separated
    pub link: String,
    pub kind: LinkKind,
}

/// Where a link entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Poem,
    Slide,
}
