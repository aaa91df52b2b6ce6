//! Shared helpers for path handling and serialization across notegraph crates.

use crate::models::NOTE_EXTENSION;
use crate::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Generic JSON serialization with consistent error handling
pub fn to_json_string<T: serde::Serialize + ?Sized>(data: &T, context: &str) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| Error::other(format!("Failed to serialize {} as JSON: {}", context, e)))
}

/// Vault-rooted path of `path` with `/` separators.
///
/// Paths outside `vault_root` are returned whole, so every entry still gets a
/// stable key.
///
/// ```
/// use notegraph_core::utils::relative_path_string;
/// use std::path::Path;
///
/// let rel = relative_path_string(Path::new("/vault"), Path::new("/vault/daily/2024.md"));
/// assert_eq!(rel, "daily/2024.md");
/// ```
pub fn relative_path_string(vault_root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(vault_root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Strip a trailing `.md` (any case) from a name or relative path.
pub fn strip_note_extension(name: &str) -> &str {
    let suffix_len = NOTE_EXTENSION.len() + 1;
    if name.len() > suffix_len {
        let split = name.len() - suffix_len;
        if name.is_char_boundary(split) {
            let (stem, ext) = name.split_at(split);
            if ext.eq_ignore_ascii_case(".md") {
                return stem;
            }
        }
    }
    name
}

/// Ensure a target ends in `.md`.
pub fn with_note_extension(target: &str) -> String {
    if strip_note_extension(target).len() == target.len() {
        format!("{}.{}", target, NOTE_EXTENSION)
    } else {
        target.to_string()
    }
}

/// Join a vault-relative, `/`-separated target onto the vault root.
///
/// `..` steps back within the target but never above the root.
///
/// ```
/// use notegraph_core::utils::join_vault_path;
/// use std::path::{Path, PathBuf};
///
/// let root = Path::new("/vault");
/// assert_eq!(join_vault_path(root, "a/../b.md"), PathBuf::from("/vault/b.md"));
/// assert_eq!(join_vault_path(root, "../../x.md"), PathBuf::from("/vault/x.md"));
/// ```
pub fn join_vault_path(vault_root: &Path, relative: &str) -> PathBuf {
    let mut parts: Vec<&str> = Vec::new();
    for part in relative.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            part => parts.push(part),
        }
    }
    parts
        .into_iter()
        .fold(vault_root.to_path_buf(), |acc, part| acc.join(part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_stays_under_vault_root() {
        let root = Path::new("/vault");
        assert_eq!(join_vault_path(root, "../x.md"), PathBuf::from("/vault/x.md"));
        assert_eq!(
            join_vault_path(root, "notes/../../../etc/passwd"),
            PathBuf::from("/vault/etc/passwd")
        );
        assert_eq!(
            join_vault_path(root, "a/./b/../c.md"),
            PathBuf::from("/vault/a/c.md")
        );
        assert!(join_vault_path(root, "..").starts_with(root));
    }

    #[test]
    fn test_relative_path_outside_root() {
        let rel = relative_path_string(Path::new("/vault"), Path::new("/elsewhere/a.md"));
        assert_eq!(rel, "elsewhere/a.md");
    }

    #[test]
    fn test_strip_note_extension() {
        assert_eq!(strip_note_extension("Note.md"), "Note");
        assert_eq!(strip_note_extension("Note.MD"), "Note");
        assert_eq!(strip_note_extension("photo.png"), "photo.png");
        assert_eq!(strip_note_extension(".md"), ".md");
        assert_eq!(strip_note_extension("Café.md"), "Café");
    }

    #[test]
    fn test_with_note_extension() {
        assert_eq!(with_note_extension("New Note"), "New Note.md");
        assert_eq!(with_note_extension("done.md"), "done.md");
    }

    #[test]
    fn test_join_vault_path() {
        let path = join_vault_path(Path::new("/vault"), "./projects/Plan.md");
        assert_eq!(path, PathBuf::from("/vault/projects/Plan.md"));
    }

    #[test]
    fn test_to_json_string() {
        let json = to_json_string(&vec!["a", "b"], "list").unwrap();
        assert!(json.contains("\"a\""));
    }
}
