//! Two-phase build driver.
//!
//! ```text
//! 1. Convert   poems/**/*.md  →  poems/**/*.html   (sibling pages)
//! 2. Index     poems/**/*.html + slides/**/*.js  →  index.html
//! ```
//!
//! Phase 2 reads the pages phase 1 wrote, so phase 1 always finishes (every
//! write included) before phase 2 starts. Conversions inside phase 1 are
//! independent and run in parallel on the rayon pool.
//!
//! A file that fails to convert or write does not stop the build. The index
//! is still produced from whatever pages exist, and [`run`] then reports
//! [`PipelineError::ConvertFailures`]. Nothing is retried.

use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::Layout;
use crate::index::{self, IndexError};
use crate::links::{self, LinkError};
use crate::render::{self, MARKDOWN_EXTENSION, RenderError};
use crate::types::LinkEntry;
use crate::walk::{self, WalkError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Walk error: {0}")]
    Walk(#[from] WalkError),
    #[error("Link error: {0}")]
    Links(#[from] LinkError),
    #[error("Index error: {0}")]
    Index(#[from] IndexError),
    #[error("{} poem(s) failed to convert", .0.len())]
    ConvertFailures(Vec<ConvertFailure>),
}

/// Why a single conversion failed.
#[derive(Error, Debug)]
pub enum ConvertFailureKind {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug)]
pub struct ConvertFailure {
    pub source: PathBuf,
    pub error: ConvertFailureKind,
}

/// One written page.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedPage {
    pub source: PathBuf,
    pub title: String,
    pub output: PathBuf,
    /// The source vanished before rendering and an empty page was written.
    pub empty: bool,
}

#[derive(Debug, Default)]
pub struct ConvertReport {
    pub pages: Vec<ConvertedPage>,
    pub failures: Vec<ConvertFailure>,
}

impl ConvertReport {
    pub fn empty_count(&self) -> usize {
        self.pages.iter().filter(|p| p.empty).count()
    }
}

#[derive(Debug)]
pub struct IndexReport {
    pub path: PathBuf,
    pub links: Vec<LinkEntry>,
}

#[derive(Debug)]
pub struct BuildReport {
    pub convert: ConvertReport,
    pub index: IndexReport,
}

/// Phase 1: render every markdown file under the poems root next to its source.
///
/// Only a traversal failure aborts the phase. Per-file failures are collected
/// in the report.
pub fn convert_poems(layout: &Layout) -> Result<ConvertReport, PipelineError> {
    let sources = walk::list_files_with_extension(&layout.poems_root, MARKDOWN_EXTENSION)?;
    tracing::debug!(count = sources.len(), root = %layout.poems_root.display(), "found markdown sources");

    let outcomes: Vec<Result<ConvertedPage, ConvertFailure>> = sources
        .par_iter()
        .map(|source| {
            convert_one(source, layout.prefix_width).map_err(|error| ConvertFailure {
                source: source.clone(),
                error,
            })
        })
        .collect();

    let mut report = ConvertReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(page) => report.pages.push(page),
            Err(failure) => {
                tracing::error!(source = %failure.source.display(), error = %failure.error, "conversion failed");
                report.failures.push(failure);
            }
        }
    }
    Ok(report)
}

fn convert_one(
    source: &std::path::Path,
    prefix_width: usize,
) -> Result<ConvertedPage, ConvertFailureKind> {
    let conversion = render::convert(source, prefix_width)?;
    let output = render::html_path_for(&conversion.source);
    fs::write(&output, conversion.html.as_bytes()).map_err(|source| {
        ConvertFailureKind::Write {
            path: output.clone(),
            source,
        }
    })?;
    tracing::info!(output = %output.display(), "wrote page");
    Ok(ConvertedPage {
        empty: conversion.is_empty(),
        source: conversion.source,
        title: conversion.title,
        output,
    })
}

/// Phase 2: collect poem and slide links and write the aggregate index.
pub fn build_index(layout: &Layout) -> Result<IndexReport, PipelineError> {
    let links = links::collect_links(layout)?;
    index::write_index(&links, layout.index_title.as_deref(), &layout.index_path)?;
    Ok(IndexReport {
        path: layout.index_path.clone(),
        links,
    })
}

/// Both phases in order.
///
/// The index is built even when some conversions failed; those failures are
/// returned afterwards. The `build` command calls [`convert_poems`] and
/// [`build_index`] itself so it can print each phase's report as it finishes;
/// it follows the same order and failure rule as this function.
pub fn run(layout: &Layout) -> Result<BuildReport, PipelineError> {
    let mut convert = convert_poems(layout)?;
    let index = build_index(layout)?;
    if !convert.failures.is_empty() {
        return Err(PipelineError::ConvertFailures(std::mem::take(
            &mut convert.failures,
        )));
    }
    Ok(BuildReport { convert, index })
}
