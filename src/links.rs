//! Link collection for the aggregate index.
//!
//! Two sources feed the index, poems first:
//!
//! - **Poems**: every `.html` file under the poems root. The title is the
//!   stem with its ordering prefix removed; the link is the file's path
//!   relative to the project root.
//! - **Slides**: every `.js` file under the slides root. The title is the bare
//!   stem; the link points at the `index.html` in the same directory with an
//!   anchor named after the script (`deckA/index.html#talk`).
//!
//! Links are always `/`-separated, whatever the host platform.

use std::path::{Component, Path};
use thiserror::Error;

use crate::config::Layout;
use crate::render::{HTML_EXTENSION, poem_title};
use crate::types::{LinkEntry, LinkKind};
use crate::walk::{self, WalkError};

pub const SLIDE_EXTENSION: &str = "js";
pub const SLIDE_INDEX: &str = "index.html";

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Walk error: {0}")]
    Walk(#[from] WalkError),
}

/// Poem page links under `poems_root`.
pub fn collect_poem_links(
    poems_root: &Path,
    project_root: &Path,
    prefix_width: usize,
) -> Result<Vec<LinkEntry>, LinkError> {
    let pages = walk::list_files_with_extension(poems_root, HTML_EXTENSION)?;
    Ok(pages
        .iter()
        .map(|page| LinkEntry {
            title: poem_title(page, prefix_width),
            link: relative_url(project_root, page),
            kind: LinkKind::Poem,
        })
        .collect())
}

/// Slide deck links under `slides_root`.
pub fn collect_slide_links(
    slides_root: &Path,
    project_root: &Path,
) -> Result<Vec<LinkEntry>, LinkError> {
    let scripts = walk::list_files_with_extension(slides_root, SLIDE_EXTENSION)?;
    Ok(scripts
        .iter()
        .map(|script| {
            let name = script
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let deck_dir = script.parent().unwrap_or(project_root);
            let dir = relative_url(project_root, deck_dir);
            let link = if dir.is_empty() {
                format!("{SLIDE_INDEX}#{name}")
            } else {
                format!("{dir}/{SLIDE_INDEX}#{name}")
            };
            LinkEntry {
                title: name,
                link,
                kind: LinkKind::Slide,
            }
        })
        .collect())
}

/// Every index entry for a layout: poems, then slides.
pub fn collect_links(layout: &Layout) -> Result<Vec<LinkEntry>, LinkError> {
    let mut links = collect_poem_links(
        &layout.poems_root,
        &layout.project_root,
        layout.prefix_width,
    )?;
    links.extend(collect_slide_links(
        &layout.slides_root,
        &layout.project_root,
    )?);
    tracing::debug!(count = links.len(), "collected links");
    Ok(links)
}

/// `/`-separated path leading from directory `base` to `target`.
///
/// Both paths should be absolute. When `target` lies outside `base`, the
/// result climbs with `..` segments. Equal paths give an empty string.
pub fn relative_url(base: &Path, target: &Path) -> String {
    let base: Vec<Component> = base.components().filter(|c| *c != Component::CurDir).collect();
    let target: Vec<Component> = target
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();

    let shared = base
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    segments.extend(std::iter::repeat_n("..".to_string(), base.len() - shared));
    segments.extend(
        target[shared..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().to_string()),
    );
    segments.join("/")
}
