//! Content access seam.
//!
//! The engine never touches the disk itself; graph construction, backlink
//! extraction and cross-document anchor lookups read text through a
//! [`ContentSource`] supplied by the caller.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reads the text of a document by path.
pub trait ContentSource {
    /// Return the full text of `path`, or an error if it cannot be read.
    fn read_content(&self, path: &Path) -> Result<String>;
}

impl ContentSource for HashMap<PathBuf, String> {
    fn read_content(&self, path: &Path) -> Result<String> {
        self.get(path)
            .cloned()
            .ok_or_else(|| Error::file_not_found(path))
    }
}

impl<T: ContentSource + ?Sized> ContentSource for &T {
    fn read_content(&self, path: &Path) -> Result<String> {
        (**self).read_content(path)
    }
}

impl<T: ContentSource + ?Sized> ContentSource for Arc<T> {
    fn read_content(&self, path: &Path) -> Result<String> {
        (**self).read_content(path)
    }
}

/// Adapts a closure into a [`ContentSource`].
///
/// ```
/// use notegraph_core::{ContentSource, Error, FnSource};
/// use std::path::Path;
///
/// let source = FnSource(|path: &Path| {
///     if path.ends_with("a.md") {
///         Ok("[[b]]".to_string())
///     } else {
///         Err(Error::file_not_found(path))
///     }
/// });
/// assert!(source.read_content(Path::new("/v/a.md")).is_ok());
/// assert!(source.read_content(Path::new("/v/z.md")).is_err());
/// ```
pub struct FnSource<F>(pub F);

impl<F> ContentSource for FnSource<F>
where
    F: Fn(&Path) -> Result<String>,
{
    fn read_content(&self, path: &Path) -> Result<String> {
        (self.0)(path)
    }
}
