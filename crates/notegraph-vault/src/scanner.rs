//! Disk-backed file-tree enumeration.

use notegraph_core::{Error, FileEntry, Result};
use std::cmp::Ordering;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Enumerate `root` as a nested [`FileEntry`] tree.
///
/// Directories come before files at each level, then entries sort by
/// case-insensitive name. Symlinks are not followed. Dot-files and
/// dot-directories are skipped unless `include_hidden` is set. Unreadable
/// entries below the root are logged and skipped.
pub fn scan_file_tree(root: &Path, include_hidden: bool) -> Result<Vec<FileEntry>> {
    if !root.is_dir() {
        return Err(Error::invalid_path(format!(
            "Vault root is not a directory: {}",
            root.display()
        )));
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by(directories_first)
        .into_iter()
        .filter_entry(|e| include_hidden || !is_hidden(e));

    // frames[d] collects the children at depth d + 1
    let mut frames: Vec<Vec<FileEntry>> = vec![Vec::new()];
    let mut count = 0usize;

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        while frames.len() > entry.depth() {
            close_frame(&mut frames);
        }

        let Some(siblings) = frames.last_mut() else {
            continue;
        };
        if entry.file_type().is_dir() {
            siblings.push(FileEntry::directory(entry.path(), Vec::new()));
            frames.push(Vec::new());
        } else {
            siblings.push(FileEntry::file(entry.path()));
            count += 1;
        }
    }

    while frames.len() > 1 {
        close_frame(&mut frames);
    }

    log::debug!("Scanned {}: {} files", root.display(), count);
    Ok(frames.pop().unwrap_or_default())
}

/// Attach the innermost frame to the directory that opened it.
fn close_frame(frames: &mut Vec<Vec<FileEntry>>) {
    let children = frames.pop().unwrap_or_default();
    if let Some(dir) = frames.last_mut().and_then(|siblings| siblings.last_mut()) {
        dir.children = Some(children);
    }
}

fn directories_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.file_type()
        .is_dir()
        .cmp(&a.file_type().is_dir())
        .then_with(|| {
            a.file_name()
                .to_string_lossy()
                .to_lowercase()
                .cmp(&b.file_name().to_string_lossy().to_lowercase())
        })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}
