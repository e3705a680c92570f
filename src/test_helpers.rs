//! Shared test utilities.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (tmp, layout) = setup_fixtures();
//! let report = pipeline::run(&layout).unwrap();
//!
//! let talk = find_link(&report.index.links, "talk");
//! assert_eq!(talk.link, "resources/slides/deckA/index.html#talk");
//! ```

use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::config::{Layout, SiteConfig};
use crate::types::LinkEntry;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and resolve the default layout there.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> (TempDir, Layout) {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    let layout = Layout::resolve(tmp.path(), &SiteConfig::default()).unwrap();
    (tmp, layout)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Read `rel` under the fixture root. Panics if missing.
pub fn read(tmp: &TempDir, rel: &str) -> String {
    let path = tmp.path().join(rel);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

// =========================================================================
// Log capture
// =========================================================================

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return everything logged at
/// warn level or above, without ANSI colors.
pub fn capture_warnings(f: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = captured.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}

// =========================================================================
// Link lookups, panicking with a clear message on miss
// =========================================================================

/// Find a link entry by title. Panics if not found.
pub fn find_link<'a>(links: &'a [LinkEntry], title: &str) -> &'a LinkEntry {
    links.iter().find(|l| l.title == title).unwrap_or_else(|| {
        let titles: Vec<&str> = links.iter().map(|l| l.title.as_str()).collect();
        panic!("link '{title}' not found. Available: {titles:?}")
    })
}
