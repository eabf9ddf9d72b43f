use crate::error::ScanError;
use crate::ports::{DiagnosticPort, FileSystemPort};
use ignore::{Walk, WalkBuilder};
use std::path::{Path, PathBuf};

/// Walks the whole tree: hidden files and ignore files are not special,
/// symlinks are neither followed nor yielded.
pub struct FileSystemAdapter;

impl FileSystemAdapter {
    pub fn new() -> Self {
        Self
    }

    fn build_walker(root: &Path) -> Walk {
        let mut builder = WalkBuilder::new(root);
        builder.standard_filters(false);
        builder.follow_links(false);
        builder.build()
    }
}

impl Default for FileSystemAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemPort for FileSystemAdapter {
    fn regular_files<'a>(
        &'a self,
        root: &Path,
        diagnostics: &'a dyn DiagnosticPort,
    ) -> Box<dyn Iterator<Item = PathBuf> + 'a> {
        let walker = Self::build_walker(root);

        Box::new(walker.filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    diagnostics.report(walk_error(err));
                    return None;
                }
            };

            // file_type() is lstat-based here since links are not followed
            match entry.file_type() {
                Some(file_type) if file_type.is_file() => Some(entry.into_path()),
                _ => None,
            }
        }))
    }
}

fn walk_error(err: ignore::Error) -> ScanError {
    let path = error_path(&err).map(Path::to_path_buf);
    ScanError::traversal(path, err.to_string())
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.as_path()),
        _ => None,
    }
}
