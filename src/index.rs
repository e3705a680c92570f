//! Aggregate index page.
//!
//! Renders every [`LinkEntry`] as a list item opening in a new browsing
//! context and writes the page to the layout's index path, replacing any
//! previous file.

use maud::{Markup, html};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::render::document;
use crate::types::LinkEntry;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The `<div><ul>…</ul></div>` block listing all entries.
pub fn render_link_list(links: &[LinkEntry]) -> Markup {
    html! {
        div {
            ul {
                @for entry in links {
                    li {
                        a href=(entry.link) target="_blank" { (entry.title) }
                    }
                }
            }
        }
    }
}

/// Full index document.
pub fn render_index(links: &[LinkEntry], title: Option<&str>) -> Markup {
    document(title, render_link_list(links))
}

/// Render and write the index to `path`, creating parent directories.
pub fn write_index(
    links: &[LinkEntry],
    title: Option<&str>,
    path: &Path,
) -> Result<(), IndexError> {
    let html = render_index(links, title).into_string();
    let write = |path: &Path| -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html.as_bytes())
    };
    write(path).map_err(|source| IndexError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), links = links.len(), "wrote index");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LinkKind;
    use tempfile::TempDir;

    fn entry(title: &str, link: &str) -> LinkEntry {
        LinkEntry {
            title: title.into(),
            link: link.into(),
            kind: LinkKind::Poem,
        }
    }

    #[test]
    fn empty_links_render_empty_list() {
        let html = render_index(&[], None).into_string();
        assert!(html.contains("<body><div><ul></ul></div></body>"));
    }

    #[test]
    fn entries_open_in_new_context() {
        let html = render_link_list(&[entry("talk", "deckA/index.html#talk")]).into_string();
        assert_eq!(
            html,
            r#"<div><ul><li><a href="deckA/index.html#talk" target="_blank">talk</a></li></ul></div>"#
        );
    }

    #[test]
    fn entries_keep_order() {
        let html = render_link_list(&[entry("B", "b.html"), entry("A", "a.html")]).into_string();
        let b = html.find("b.html").unwrap();
        let a = html.find("a.html").unwrap();
        assert!(b < a);
    }

    #[test]
    fn title_and_link_are_escaped() {
        let html = render_link_list(&[entry("R&D", "a\"b.html")]).into_string();
        assert!(html.contains("R&amp;D"));
        assert!(html.contains(r#"href="a&quot;b.html""#));
    }

    #[test]
    fn optional_title() {
        let html = render_index(&[], Some("Poems")).into_string();
        assert!(html.contains("<title>Poems</title>"));
    }

    #[test]
    fn write_index_overwrites_and_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("public/index.html");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "stale").unwrap();

        write_index(&[entry("x", "x.html")], None, &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(written.contains("x.html"));

        let nested = tmp.path().join("a/b/index.html");
        write_index(&[], None, &nested).unwrap();
        assert!(nested.exists());
    }
}
