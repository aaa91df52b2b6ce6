//! Subcommands run end to end against a temporary vault

use notegraph::{Command, execute, open_engine};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn create_test_vault() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    write(root, "index.md", "# Index\n\n[[note1]], [[note2]] and ![[diagram.png]]");
    write(root, "note1.md", "# Note 1\n\nThis links to [[note2#Details]]");
    write(
        root,
        "note2.md",
        "# Note 2\n\nThis links back to [[note1]].\n\n## Details\nFine print ^fine\n",
    );
    write(root, "misc/loose.md", "Mentions note1 without linking.");
    write(root, "img/diagram.png", "png");
    temp_dir
}

fn engine(temp_dir: &TempDir) -> notegraph::VaultEngine {
    open_engine(temp_dir.path().to_str(), None).expect("Failed to open vault")
}

#[tokio::test]
async fn test_resolve_command() {
    let temp_dir = create_test_vault();
    let engine = engine(&temp_dir);

    let command = Command::Resolve {
        target: "note2#Details".into(),
        from: PathBuf::from("index.md"),
    };
    let value = execute(&engine, &command).await.unwrap();
    assert_eq!(value["exists"], true);
    assert!(value["path"].as_str().unwrap().ends_with("note2.md"));
    assert!(value.get("file_type").is_none());

    let missing = Command::Resolve {
        target: "Later".into(),
        from: PathBuf::from("misc/loose.md"),
    };
    let value = execute(&engine, &missing).await.unwrap();
    assert_eq!(value["exists"], false);
}

#[tokio::test]
async fn test_embed_command() {
    let temp_dir = create_test_vault();
    let engine = engine(&temp_dir);

    let image = Command::Embed {
        target: "diagram.png".into(),
        from: PathBuf::from("index.md"),
    };
    let value = execute(&engine, &image).await.unwrap();
    assert_eq!(value["reference"]["exists"], true);
    assert_eq!(value["reference"]["file_type"], "image");
    assert!(value.get("content").is_none());

    let section = Command::Embed {
        target: "note2#Details".into(),
        from: PathBuf::from("index.md"),
    };
    let value = execute(&engine, &section).await.unwrap();
    assert_eq!(value["reference"]["file_type"], "note");
    assert_eq!(value["content"]["Found"], "Fine print ^fine");

    let block = Command::Embed {
        target: "note2#^fine".into(),
        from: PathBuf::from("index.md"),
    };
    let value = execute(&engine, &block).await.unwrap();
    assert_eq!(value["content"]["Found"], "Fine print");
}

#[tokio::test]
async fn test_anchors_command() {
    let temp_dir = create_test_vault();
    let engine = engine(&temp_dir);

    let command = Command::Anchors {
        note: PathBuf::from("note2.md"),
    };
    let value = execute(&engine, &command).await.unwrap();
    let headings: Vec<&str> = value["headings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["text"].as_str().unwrap())
        .collect();
    assert_eq!(headings, vec!["Note 2", "Details"]);
    assert_eq!(value["blocks"][0]["id"], "fine");

    let unknown = Command::Anchors {
        note: PathBuf::from("nope.md"),
    };
    assert!(execute(&engine, &unknown).await.is_err());
}

#[tokio::test]
async fn test_graph_commands() {
    let temp_dir = create_test_vault();
    let engine = engine(&temp_dir);

    let full = execute(
        &engine,
        &Command::Graph {
            center: None,
            depth: 1,
        },
    )
    .await
    .unwrap();
    assert_eq!(full["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(full["edges"].as_array().unwrap().len(), 4);

    let local = execute(
        &engine,
        &Command::Graph {
            center: Some(PathBuf::from("misc/loose.md")),
            depth: 2,
        },
    )
    .await
    .unwrap();
    assert_eq!(local["nodes"].as_array().unwrap().len(), 1);
    assert!(local["edges"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_backlinks_and_stats_commands() {
    let temp_dir = create_test_vault();
    let engine = engine(&temp_dir);

    let backlinks = execute(
        &engine,
        &Command::Backlinks {
            note: PathBuf::from("note1.md"),
        },
    )
    .await
    .unwrap();
    let linked = backlinks["linked"].as_array().unwrap();
    assert_eq!(linked.len(), 2);
    let unlinked = backlinks["unlinked"].as_array().unwrap();
    assert_eq!(unlinked.len(), 1);
    assert_eq!(unlinked[0]["line_number"], 1);

    let stats = execute(&engine, &Command::Stats).await.unwrap();
    assert_eq!(stats["total_notes"], 4);
    assert_eq!(stats["resolved_links"], 4);
    assert!(stats["broken_links"].as_array().unwrap().is_empty());
    assert_eq!(stats["orphaned_notes"].as_array().unwrap().len(), 1);
}
