//! End-to-end builds against temporary project trees.

use poem_site::config::{Layout, SiteConfig};
use poem_site::pipeline::{self, PipelineError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> (TempDir, Layout) {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("resources/poems")).unwrap();
    fs::create_dir_all(tmp.path().join("resources/slides")).unwrap();
    let layout = Layout::resolve(tmp.path(), &SiteConfig::default()).unwrap();
    (tmp, layout)
}

/// Every regular file under `root`, sorted, with its contents.
fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files = Vec::new();
    let mut dirs = vec![root.to_path_buf()];
    while let Some(dir) = dirs.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                dirs.push(path);
            } else {
                let content = fs::read(&path).unwrap();
                files.push((path, content));
            }
        }
    }
    files.sort();
    files
}

#[test]
fn road_poem_scenario() {
    let (tmp, layout) = project();
    write(
        tmp.path(),
        "resources/poems/001 The Road.md",
        "# A Title\n\nSome text.",
    );

    pipeline::run(&layout).unwrap();

    let page = fs::read_to_string(tmp.path().join("resources/poems/001 The Road.html")).unwrap();
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<title>The Road</title>"));
    assert!(page.contains("<h1>A Title</h1>"));
    assert!(page.contains("<p>Some text.</p>"));

    let index = fs::read_to_string(tmp.path().join("index.html")).unwrap();
    assert!(index.contains(
        r#"<li><a href="resources/poems/001 The Road.html" target="_blank">The Road</a></li>"#
    ));
}

#[test]
fn slide_deck_scenario() {
    let (tmp, layout) = project();
    write(tmp.path(), "resources/slides/deckA/index.html", "<html></html>");
    write(tmp.path(), "resources/slides/deckA/talk.js", "");

    let report = pipeline::run(&layout).unwrap();

    assert_eq!(report.index.links.len(), 1);
    assert_eq!(report.index.links[0].title, "talk");
    assert_eq!(
        report.index.links[0].link,
        "resources/slides/deckA/index.html#talk"
    );
    let index = fs::read_to_string(&layout.index_path).unwrap();
    assert!(index.contains(r##"href="resources/slides/deckA/index.html#talk""##));
}

#[test]
fn empty_roots_write_empty_list() {
    let (_tmp, layout) = project();

    let report = pipeline::run(&layout).unwrap();

    assert!(report.convert.pages.is_empty());
    assert!(report.index.links.is_empty());
    let index = fs::read_to_string(&layout.index_path).unwrap();
    assert!(index.contains("<ul></ul>"));
}

#[test]
fn every_markdown_file_gets_a_sibling_page() {
    let (tmp, layout) = project();
    write(tmp.path(), "resources/poems/001 a.md", "a");
    write(tmp.path(), "resources/poems/x/002 b.md", "b");
    write(tmp.path(), "resources/poems/x/y/z/003 c.md", "c");
    write(tmp.path(), "resources/poems/notes.txt", "ignored");

    let report = pipeline::run(&layout).unwrap();

    assert_eq!(report.convert.pages.len(), 3);
    for rel in ["001 a", "x/002 b", "x/y/z/003 c"] {
        let page = tmp.path().join(format!("resources/poems/{rel}.html"));
        assert!(page.exists(), "missing {}", page.display());
    }
    assert!(!tmp.path().join("resources/poems/notes.html").exists());
    let titles: Vec<&str> = report
        .index
        .links
        .iter()
        .map(|l| l.title.as_str())
        .collect();
    assert_eq!(titles, vec!["a", "b", "c"]);
}

#[test]
fn second_run_is_byte_identical() {
    let (tmp, layout) = project();
    write(tmp.path(), "resources/poems/001 One.md", "# One\n\nfirst");
    write(tmp.path(), "resources/poems/b/002 Two.md", "*two*");
    write(tmp.path(), "resources/slides/d/index.html", "");
    write(tmp.path(), "resources/slides/d/s1.js", "");
    write(tmp.path(), "resources/slides/d/s2.js", "");

    pipeline::run(&layout).unwrap();
    let first = snapshot(tmp.path());
    pipeline::run(&layout).unwrap();
    let second = snapshot(tmp.path());

    assert_eq!(first, second);
}

#[test]
fn missing_poems_root_aborts_before_writing_index() {
    let (tmp, layout) = project();
    fs::remove_dir_all(tmp.path().join("resources/poems")).unwrap();

    let err = pipeline::run(&layout).unwrap_err();

    let walk = match err {
        PipelineError::Walk(walk) => walk,
        other => panic!("expected walk error, got {other:?}"),
    };
    assert_eq!(walk.kind(), io::ErrorKind::NotFound);
    assert!(!layout.index_path.exists());
}

#[test]
fn missing_slides_root_aborts_index() {
    let (tmp, layout) = project();
    fs::remove_dir_all(tmp.path().join("resources/slides")).unwrap();

    let err = pipeline::run(&layout).unwrap_err();
    assert!(matches!(err, PipelineError::Links(_)));
    assert!(!layout.index_path.exists());
}

#[test]
fn custom_layout_from_config_file() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "poem-site.toml",
        "poems_dir = \"verse\"\nslides_dir = \"decks\"\nindex_file = \"public/index.html\"\nindex_title = \"Verse\"\n",
    );
    write(tmp.path(), "verse/010 Tide.md", "tide");
    fs::create_dir_all(tmp.path().join("decks")).unwrap();

    let (layout, _) = Layout::load(tmp.path()).unwrap();
    pipeline::run(&layout).unwrap();

    let index = fs::read_to_string(tmp.path().join("public/index.html")).unwrap();
    assert!(index.contains("<title>Verse</title>"));
    assert!(index.contains(r#"href="verse/010 Tide.html""#));
    assert!(index.contains(">Tide</a>"));
}
