//! Subcommand execution against an opened vault

use crate::cli::Command;
use anyhow::{Context, bail};
use notegraph_vault::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Output of `embed`: the resolution, plus the embedded text for notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedOutput {
    pub reference: ResolvedReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<AnchorContent>,
}

/// Open the vault at `vault` (tilde-expanded, current directory when absent)
/// with the configuration at `config`, if any.
pub fn open_engine(vault: Option<&str>, config: Option<&str>) -> anyhow::Result<VaultEngine> {
    let root = PathBuf::from(shellexpand::tilde(vault.unwrap_or(".")).into_owned());
    let root = root
        .canonicalize()
        .with_context(|| format!("Vault directory not found: {}", root.display()))?;

    let config = match config {
        Some(path) => {
            let path = PathBuf::from(shellexpand::tilde(path).into_owned());
            EngineConfig::from_yaml_file(&path)?
        }
        None => EngineConfig::default(),
    };

    let engine = VaultEngine::open(&root, config)?;
    log::info!(
        "Opened vault {} ({} notes, {} assets)",
        root.display(),
        engine.notes().len(),
        engine.assets().len()
    );
    Ok(engine)
}

/// Run one subcommand and return its JSON result.
pub async fn execute(engine: &VaultEngine, command: &Command) -> anyhow::Result<Value> {
    let source = engine.content_source();

    let value = match command {
        Command::Resolve { target, from } => {
            let from = vault_path(engine, from);
            serde_json::to_value(engine.resolve_link(target, &from))?
        }
        Command::Embed { target, from } => {
            let from = vault_path(engine, from);
            let reference = engine.resolve_embed(target, &from);
            let content = if reference.exists && reference.file_type == Some(FileType::Note) {
                Some(engine.anchor_content(target, &from, &source)?)
            } else {
                None
            };
            serde_json::to_value(EmbedOutput { reference, content })?
        }
        Command::Anchors { note } => {
            let path = indexed_note(engine, note)?;
            let anchors = engine.document_anchors(&path, &source)?;
            serde_json::to_value(anchors.as_ref())?
        }
        Command::Graph { center, depth } => {
            let full = current_graph(engine).await?;
            match center {
                Some(center) => {
                    let center = indexed_note(engine, center)?;
                    serde_json::to_value(engine.local_graph(&center, &full, *depth))?
                }
                None => serde_json::to_value(full.as_ref())?,
            }
        }
        Command::Backlinks { note } => {
            let path = indexed_note(engine, note)?;
            let graph = current_graph(engine).await?;
            serde_json::to_value(engine.backlinks(&path, &graph, &source))?
        }
        Command::Stats => {
            let graph = current_graph(engine).await?;
            serde_json::to_value(engine.stats(&graph))?
        }
    };
    Ok(value)
}

/// Build the full graph on the blocking pool and wait for it.
async fn current_graph(engine: &VaultEngine) -> anyhow::Result<Arc<Graph>> {
    let refresher = GraphRefresher::new();
    let published = engine
        .spawn_graph_refresh(&refresher, engine.content_source())
        .await
        .context("Graph build task failed")?;
    if !published {
        bail!("Graph build was not published");
    }
    Ok(refresher.current().await)
}

fn vault_path(engine: &VaultEngine, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        engine.vault_root().join(path)
    }
}

fn indexed_note(engine: &VaultEngine, note: &Path) -> anyhow::Result<PathBuf> {
    let path = vault_path(engine, note);
    if !engine.notes().contains(&path) {
        return Err(Error::file_not_found(path).into());
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn vault() -> (TempDir, VaultEngine) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.md"), "# A\n[[b]]").unwrap();
        fs::write(temp.path().join("b.md"), "# B").unwrap();
        let engine = open_engine(temp.path().to_str(), None).unwrap();
        (temp, engine)
    }

    #[test]
    fn test_relative_paths_are_vault_rooted() {
        let (_temp, engine) = vault();
        assert_eq!(
            vault_path(&engine, Path::new("daily/x.md")),
            engine.vault_root().join("daily/x.md")
        );
        assert_eq!(vault_path(&engine, Path::new("/abs.md")), PathBuf::from("/abs.md"));
    }

    #[test]
    fn test_unknown_note_is_an_error() {
        let (_temp, engine) = vault();
        assert!(indexed_note(&engine, Path::new("a.md")).is_ok());
        let err = indexed_note(&engine, Path::new("zzz.md")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_missing_vault_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        assert!(open_engine(missing.to_str(), None).is_err());
    }

    #[tokio::test]
    async fn test_stats_command() {
        let (_temp, engine) = vault();
        let value = execute(&engine, &Command::Stats).await.unwrap();
        assert_eq!(value["total_notes"], 2);
        assert_eq!(value["resolved_links"], 1);
    }
}
