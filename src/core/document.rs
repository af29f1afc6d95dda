//! YAML document holding the project forest

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::forest::Forest;

/// Default document location, relative to the working directory
pub const DEFAULT_DOCUMENT: &str = "project_tree_hierarchical.yaml";

/// Error type for document I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("could not serialize project tree: {0}")]
    Serialize(#[source] serde_yaml::Error),
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// The file a forest is loaded from and saved to
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the forest.
    ///
    /// A missing file gives the default single-root document; an empty one
    /// gives an empty forest.
    pub fn load(&self) -> Result<Forest, StoreError> {
        if !self.path.exists() {
            tracing::info!(
                "No document at {}, starting from the default tree",
                self.path.display()
            );
            return Ok(Forest::default_document());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let mut forest = parse(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        let repaired = forest.repair_ids();
        if repaired > 0 {
            tracing::warn!(
                "{} nodes in {} had a missing or repeated id",
                repaired,
                self.path.display()
            );
        }

        tracing::info!(
            "Loaded {} nodes from {}",
            forest.len(),
            self.path.display()
        );
        Ok(forest)
    }

    /// Write the complete forest, replacing the file
    pub fn save(&self, forest: &Forest) -> Result<(), StoreError> {
        let content = render(forest).map_err(StoreError::Serialize)?;
        fs::write(&self.path, content).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!("Saved project tree to {}", self.path.display());
        Ok(())
    }
}

/// Parse document text. Blank text and a bare `null` are an empty forest.
pub fn parse(content: &str) -> Result<Forest, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(Forest::default());
    }
    let forest: Option<Forest> = serde_yaml::from_str(content)?;
    Ok(forest.unwrap_or_default())
}

/// Render a forest as document text
pub fn render(forest: &Forest) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(forest)
}
