//! Application configuration management

use std::path::PathBuf;

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::document::DEFAULT_DOCUMENT;

const MAX_RECENT_DOCUMENTS: usize = 10;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Project document opened at startup
    pub document_path: PathBuf,
    /// Recently opened documents, most recent first
    pub recent_documents: Vec<PathBuf>,
    /// UI settings
    pub ui: UiConfig,
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Width of the tree panel
    pub tree_panel_width: f32,
    /// How long success messages stay in the status bar, in seconds
    pub status_message_secs: f64,
    /// How long error messages stay in the status bar, in seconds
    pub error_message_secs: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from(DEFAULT_DOCUMENT),
            recent_documents: Vec::new(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tree_panel_width: 420.0,
            status_message_secs: 3.0,
            error_message_secs: 5.0,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "treedesk", "TreeDesk")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Make `path` the current document and move it to the front of the
    /// recent list
    pub fn open_document(&mut self, path: PathBuf) {
        self.recent_documents.retain(|p| p != &path);
        self.recent_documents.insert(0, path.clone());
        self.recent_documents.truncate(MAX_RECENT_DOCUMENTS);
        self.document_path = path;
    }
}
