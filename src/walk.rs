//! Recursive directory listing.
//!
//! [`read_tree`] materializes the whole tree under a root as a nested
//! [`Listing`]: directories become `Dir` nodes holding their entries, files
//! become leaves. [`Listing::flatten`] turns that back into a flat list of file
//! paths, which is what every pipeline phase actually consumes.
//!
//! The walk is iterative and depth-first (`walkdir`), with one owned
//! accumulator per open directory level. Entries are sorted by file name so
//! repeated runs over the same tree produce the same order.
//!
//! Symbolic links are not followed; they appear as leaves.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    /// The I/O error kind behind this failure (`NotFound`, `PermissionDenied`, ...).
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            WalkError::Io { source, .. } => source.kind(),
        }
    }

    fn from_walkdir(err: walkdir::Error, root: &Path) -> Self {
        let path = err.path().unwrap_or(root).to_path_buf();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other("directory walk failed"));
        WalkError::Io { path, source }
    }
}

/// A directory tree as read from disk.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    File(PathBuf),
    Dir { path: PathBuf, entries: Vec<Listing> },
}

impl Listing {
    /// All file paths in this tree, at any depth, in listing order.
    pub fn flatten(self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Listing::File(path) => files.push(path),
                // Reversed so the stack pops entries in listing order
                Listing::Dir { entries, .. } => pending.extend(entries.into_iter().rev()),
            }
        }
        files
    }

    pub fn path(&self) -> &Path {
        match self {
            Listing::File(path) => path,
            Listing::Dir { path, .. } => path,
        }
    }
}

/// Read the full tree under `root`.
///
/// Fails if `root` (or any directory below it) cannot be read. A missing root
/// reports [`io::ErrorKind::NotFound`].
pub fn read_tree(root: &Path) -> Result<Listing, WalkError> {
    let mut walker = WalkDir::new(root).sort_by_file_name().into_iter();

    // The root entry comes first; it must be a readable directory.
    let root_entry = match walker.next() {
        Some(entry) => entry.map_err(|e| WalkError::from_walkdir(e, root))?,
        None => {
            return Err(WalkError::Io {
                path: root.to_path_buf(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }
    };
    if !root_entry.file_type().is_dir() {
        return Err(WalkError::Io {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        });
    }

    // stack[d] holds the entries collected so far for the open directory at depth d
    let mut stack: Vec<(PathBuf, Vec<Listing>)> = vec![(root_entry.into_path(), Vec::new())];

    for entry in walker {
        let entry = entry.map_err(|e| WalkError::from_walkdir(e, root))?;
        close_levels(&mut stack, entry.depth());

        if entry.file_type().is_dir() {
            stack.push((entry.into_path(), Vec::new()));
        } else if let Some((_, entries)) = stack.last_mut() {
            entries.push(Listing::File(entry.into_path()));
        }
    }

    close_levels(&mut stack, 1);
    let (path, entries) = stack.pop().unwrap_or_else(|| (root.to_path_buf(), Vec::new()));
    Ok(Listing::Dir { path, entries })
}

/// Fold finished directory levels into their parents until `depth` levels remain.
fn close_levels(stack: &mut Vec<(PathBuf, Vec<Listing>)>, depth: usize) {
    while stack.len() > depth {
        let Some((path, entries)) = stack.pop() else {
            break;
        };
        match stack.last_mut() {
            Some((_, parent)) => parent.push(Listing::Dir { path, entries }),
            None => {
                stack.push((path, entries));
                break;
            }
        }
    }
}

/// Flat list of every file under `root`.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>, WalkError> {
    let files = read_tree(root)?.flatten();
    tracing::debug!(root = %root.display(), count = files.len(), "listed files");
    Ok(files)
}

/// Files under `root` whose name ends with `.{extension}` (case-sensitive).
pub fn list_files_with_extension(root: &Path, extension: &str) -> Result<Vec<PathBuf>, WalkError> {
    Ok(list_files(root)?
        .into_iter()
        .filter(|p| has_extension(p, extension))
        .collect())
}

pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|e| e == extension)
}
