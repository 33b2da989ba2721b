//! Persisted login session, the CLI's stand-in for the browser's token slot.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub token: String,
}

impl Session {
    pub fn load(path: &Path) -> Result<Option<Session>> {
        if !path.exists() {
            debug!("No session file at {}", path.display());
            return Ok(None);
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        let session = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse session file: {}", path.display()))?;
        Ok(Some(session))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self).context("Failed to serialize session")?;
        fs::write(path, raw)
            .with_context(|| format!("Failed to write session file: {}", path.display()))?;
        debug!("Saved session for {}", self.username);
        Ok(())
    }

    pub fn clear(path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
        }
        Ok(())
    }
}
