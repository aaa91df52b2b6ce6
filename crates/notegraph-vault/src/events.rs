//! Vault change notifications fed to [`VaultEngine::apply_event`].
//!
//! Change detection itself lives with the host; these are the events it
//! reports.
//!
//! [`VaultEngine::apply_event`]: crate::VaultEngine::apply_event

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A file-system change inside the vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VaultEvent {
    /// A file or directory was created
    Created { path: PathBuf },
    /// A file's content changed
    Modified { path: PathBuf },
    /// A file or directory was deleted
    Deleted { path: PathBuf },
    /// A file or directory moved
    Renamed { from: PathBuf, to: PathBuf },
}

impl VaultEvent {
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::Created { path: path.into() }
    }

    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self::Modified { path: path.into() }
    }

    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self::Deleted { path: path.into() }
    }

    pub fn renamed(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self::Renamed {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Get the primary path affected by this event
    pub fn path(&self) -> &Path {
        match self {
            Self::Created { path } | Self::Modified { path } | Self::Deleted { path } => path,
            Self::Renamed { to, .. } => to,
        }
    }

    /// Whether the event can change the set of indexed files
    pub fn changes_index(&self) -> bool {
        !matches!(self, Self::Modified { .. })
    }
}
