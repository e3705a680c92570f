//! CLI output formatting for both pipeline phases.
//!
//! Output is a content inventory: each entity is listed by positional index
//! and title, with its file shown on an indented line below.
//!
//! ## Convert
//!
//! ```text
//! Poems
//! 001 The Road → resources/poems/001 The Road.html
//! 002 Gone → resources/poems/002 Gone.html
//!     Source missing, wrote empty page
//!
//! Converted 2 poems (1 empty), 0 failed
//! ```
//!
//! ## Index
//!
//! ```text
//! Index → index.html
//! 001 The Road
//!     resources/poems/001 The Road.html
//! 002 talk (slides)
//!     resources/slides/deckA/index.html#talk
//! ```
//!
//! Each phase has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use std::path::Path;

use crate::links::relative_url;
use crate::pipeline::{ConvertReport, IndexReport};
use crate::types::{LinkEntry, LinkKind};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

pub fn format_convert_output(report: &ConvertReport, project_root: &Path) -> Vec<String> {
    let mut lines = vec!["Poems".to_string()];
    for (idx, page) in report.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} → {}",
            format_index(idx + 1),
            page.title,
            relative_url(project_root, &page.output)
        ));
        if page.empty {
            lines.push(format!("{}Source missing, wrote empty page", indent(1)));
        }
    }
    for failure in &report.failures {
        lines.push(format!(
            "FAILED {}",
            relative_url(project_root, &failure.source)
        ));
        lines.push(format!("{}{}", indent(1), failure.error));
    }
    lines.push(String::new());

    let empty = report.empty_count();
    let converted = plural(report.pages.len(), "poem");
    if empty > 0 {
        lines.push(format!(
            "Converted {converted} ({empty} empty), {} failed",
            report.failures.len()
        ));
    } else {
        lines.push(format!(
            "Converted {converted}, {} failed",
            report.failures.len()
        ));
    }
    lines
}

pub fn print_convert_output(report: &ConvertReport, project_root: &Path) {
    for line in format_convert_output(report, project_root) {
        println!("{}", line);
    }
}

/// Entity lines for a list of links, without a header.
pub fn format_links(links: &[LinkEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    for (idx, entry) in links.iter().enumerate() {
        let suffix = match entry.kind {
            LinkKind::Poem => "",
            LinkKind::Slide => " (slides)",
        };
        lines.push(format!("{} {}{}", format_index(idx + 1), entry.title, suffix));
        lines.push(format!("{}{}", indent(1), entry.link));
    }
    lines
}

pub fn format_index_output(report: &IndexReport, project_root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Index → {}",
        relative_url(project_root, &report.path)
    )];
    lines.extend(format_links(&report.links));
    lines.push(String::new());
    lines.push(format!("Indexed {}", plural(report.links.len(), "link")));
    lines
}

pub fn print_index_output(report: &IndexReport, project_root: &Path) {
    for line in format_index_output(report, project_root) {
        println!("{}", line);
    }
}
