//! Link and embed target resolution against the indexes.
//!
//! A miss is never an error: the caller gets `exists: false` plus a
//! proposed creation path.

use crate::index::{Index, IndexKind, VaultIndex, normalize_name};
use notegraph_core::utils::{join_vault_path, with_note_extension};
use notegraph_core::{FileType, ResolvedReference};
use notegraph_parser::split_target;
use std::path::{Path, PathBuf};

/// Resolve a wikilink target (`Note`, `folder/Note#Heading|alias`, ...).
///
/// - empty name (`#Heading`, `#^id`): the current document
/// - contains a path separator: exact vault-relative lookup
/// - otherwise: normalized-name lookup, ambiguity broken by locality
pub fn resolve(
    target: &str,
    current_path: &Path,
    index: &Index,
    vault_root: &Path,
) -> ResolvedReference {
    let parts = split_target(target);
    let name = parts.name.as_str();

    if name.is_empty() {
        return ResolvedReference::found(current_path);
    }

    if name.contains(['/', '\\']) {
        resolve_relative(name, index, vault_root)
    } else {
        resolve_by_name(name, current_path, index, vault_root)
    }
}

/// Resolve an embed target. Note embeds go through [`resolve`]; anything
/// with a non-note extension is looked up in the asset index.
pub fn resolve_embed(
    target: &str,
    current_path: &Path,
    index: &VaultIndex,
    vault_root: &Path,
) -> ResolvedReference {
    let parts = split_target(target);
    let file_type = FileType::from_target(&parts.name);

    let lookup = match file_type {
        FileType::Note => &index.notes,
        _ => &index.assets,
    };
    resolve(target, current_path, lookup, vault_root).with_file_type(file_type)
}

fn resolve_relative(name: &str, index: &Index, vault_root: &Path) -> ResolvedReference {
    let normalized = name.replace('\\', "/");
    let key = normalized.trim_start_matches("./").trim_start_matches('/');

    let candidates: Vec<String> = match index.kind() {
        IndexKind::Notes => vec![with_note_extension(key), key.to_string()],
        IndexKind::Assets => vec![key.to_string()],
    };

    if let Some(path) = candidates.iter().find_map(|c| index.lookup_relative(c)) {
        return ResolvedReference::found(path);
    }

    log::debug!("Unresolved relative target: {}", name);
    ResolvedReference::missing(join_vault_path(vault_root, &candidates[0]))
}

fn resolve_by_name(
    name: &str,
    current_path: &Path,
    index: &Index,
    vault_root: &Path,
) -> ResolvedReference {
    match index.lookup_name(&normalize_name(name)) {
        [] => {
            let file_name = match index.kind() {
                IndexKind::Notes => with_note_extension(name),
                IndexKind::Assets => name.to_string(),
            };
            ResolvedReference::missing(vault_root.join(file_name))
        }
        [only] => ResolvedReference::found(only),
        bucket => ResolvedReference::found(pick_nearest(bucket, current_path)),
    }
}

/// Prefer a candidate in the current document's folder, then the shortest
/// path; the first candidate wins a tie.
fn pick_nearest<'a>(bucket: &'a [PathBuf], current_path: &Path) -> &'a PathBuf {
    let current_dir = current_path.parent();
    bucket
        .iter()
        .find(|candidate| candidate.parent() == current_dir)
        .or_else(|| {
            bucket
                .iter()
                .min_by_key(|candidate| candidate.to_string_lossy().chars().count())
        })
        .unwrap_or(&bucket[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use notegraph_core::FileEntry;

    fn root() -> PathBuf {
        PathBuf::from("/vault")
    }

    fn vault_index() -> VaultIndex {
        let tree = vec![
            FileEntry::file("/vault/My Note.md"),
            FileEntry::file("/vault/Topic.md"),
            FileEntry::directory(
                "/vault/folder",
                vec![
                    FileEntry::directory(
                        "/vault/folder/a",
                        vec![
                            FileEntry::file("/vault/folder/a/Dog.md"),
                            FileEntry::file("/vault/folder/a/x.md"),
                        ],
                    ),
                    FileEntry::directory(
                        "/vault/folder/b",
                        vec![FileEntry::file("/vault/folder/b/Dog.md")],
                    ),
                ],
            ),
            FileEntry::directory(
                "/vault/deep",
                vec![
                    FileEntry::directory(
                        "/vault/deep/er",
                        vec![FileEntry::file("/vault/deep/er/Cat.md")],
                    ),
                    FileEntry::file("/vault/deep/Cat.md"),
                ],
            ),
            FileEntry::directory(
                "/vault/img",
                vec![FileEntry::file("/vault/img/photo.png")],
            ),
        ];
        VaultIndex::build(&tree, &root())
    }

    fn here() -> PathBuf {
        PathBuf::from("/vault/Topic.md")
    }

    #[test]
    fn test_resolve_by_name_is_separator_insensitive() {
        let index = vault_index();
        for target in ["My Note", "my-note", "MY_NOTE", "My Note.md", "My Note#Intro|alias"] {
            let r = resolve(target, &here(), &index.notes, &root());
            assert!(r.exists, "{} should resolve", target);
            assert_eq!(r.path, PathBuf::from("/vault/My Note.md"));
        }
    }

    #[test]
    fn test_missing_name_proposes_root_file() {
        let index = vault_index();
        let r = resolve("Brand New", &here(), &index.notes, &root());
        assert!(!r.exists);
        assert_eq!(r.path, PathBuf::from("/vault/Brand New.md"));
    }

    #[test]
    fn test_relative_path_with_and_without_extension() {
        let index = vault_index();
        let expected = PathBuf::from("/vault/folder/b/Dog.md");
        for target in ["folder/b/Dog", "folder/b/Dog.md", "./folder/b/Dog", "/folder/b/Dog"] {
            let r = resolve(target, &here(), &index.notes, &root());
            assert!(r.exists, "{} should resolve", target);
            assert_eq!(r.path, expected);
        }
    }

    #[test]
    fn test_relative_miss_proposes_path_under_root() {
        let index = vault_index();
        let r = resolve("projects/Plan", &here(), &index.notes, &root());
        assert!(!r.exists);
        assert_eq!(r.path, PathBuf::from("/vault/projects/Plan.md"));
    }

    #[test]
    fn test_relative_lookup_is_case_sensitive() {
        let index = vault_index();
        assert!(!resolve("Folder/b/dog", &here(), &index.notes, &root()).exists);
    }

    #[test]
    fn test_ambiguity_prefers_current_folder() {
        let index = vault_index();
        let current = PathBuf::from("/vault/folder/a/x.md");
        let r = resolve("Dog", &current, &index.notes, &root());
        assert_eq!(r.path, PathBuf::from("/vault/folder/a/Dog.md"));

        let current = PathBuf::from("/vault/folder/b/y.md");
        let r = resolve("Dog", &current, &index.notes, &root());
        assert_eq!(r.path, PathBuf::from("/vault/folder/b/Dog.md"));
    }

    #[test]
    fn test_ambiguity_falls_back_to_shortest_path() {
        let index = vault_index();
        let r = resolve("Cat", &here(), &index.notes, &root());
        assert_eq!(r.path, PathBuf::from("/vault/deep/Cat.md"));
    }

    #[test]
    fn test_ambiguity_tie_keeps_first_candidate() {
        let index = vault_index();
        let r = resolve("Dog", &here(), &index.notes, &root());
        assert_eq!(r.path, PathBuf::from("/vault/folder/a/Dog.md"));
    }

    #[test]
    fn test_same_document_anchor_resolves_to_current() {
        let index = vault_index();
        for target in ["#Heading", "#^block", "  #Heading"] {
            let r = resolve(target, &here(), &index.notes, &root());
            assert!(r.exists);
            assert_eq!(r.path, here());
        }
    }

    #[test]
    fn test_missing_relative_target_stays_in_vault() {
        let index = vault_index();
        let r = resolve("../../outside/Plan", &here(), &index.notes, &root());
        assert!(!r.exists);
        assert_eq!(r.path, PathBuf::from("/vault/outside/Plan.md"));
    }

    #[test]
    fn test_embed_image_from_asset_index() {
        let index = vault_index();
        let r = resolve_embed("photo.png", &here(), &index, &root());
        assert!(r.exists);
        assert_eq!(r.path, PathBuf::from("/vault/img/photo.png"));
        assert_eq!(r.file_type, Some(FileType::Image));

        let r = resolve_embed("img/photo.png|300", &here(), &index, &root());
        assert!(r.exists);
    }

    #[test]
    fn test_embed_missing_asset_keeps_extension() {
        let index = vault_index();
        let r = resolve_embed("clip.mp4", &here(), &index, &root());
        assert!(!r.exists);
        assert_eq!(r.path, PathBuf::from("/vault/clip.mp4"));
        assert_eq!(r.file_type, Some(FileType::Video));
    }

    #[test]
    fn test_embed_note_with_dotted_name() {
        let index = vault_index();
        let r = resolve_embed("Meeting v1.2 notes", &here(), &index, &root());
        assert_eq!(r.file_type, Some(FileType::Note));
        assert_eq!(r.path, PathBuf::from("/vault/Meeting v1.2 notes.md"));

        let r = resolve_embed("Report v1.2", &here(), &index, &root());
        assert!(!r.exists);
        assert_eq!(r.file_type, Some(FileType::Note));
        assert_eq!(r.path, PathBuf::from("/vault/Report v1.2.md"));

        let r = resolve_embed("My Note#Intro", &here(), &index, &root());
        assert!(r.exists);
        assert_eq!(r.file_type, Some(FileType::Note));
    }
}
