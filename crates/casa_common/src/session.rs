//! Signed-in session state.
//!
//! Login stores the backend identity here so later commands know who is
//! asking. One file, TOML, under the XDG state directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub token: String,
}

impl Session {
    /// Discover the session file path.
    ///
    /// Priority:
    /// 1. $CASA_SESSION_FILE environment variable (explicit override)
    /// 2. $XDG_STATE_HOME/casa/session.toml
    /// 3. ~/.local/state/casa/session.toml
    pub fn discover_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("CASA_SESSION_FILE") {
            return Some(PathBuf::from(path));
        }

        if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
            return Some(PathBuf::from(xdg_state).join("casa").join("session.toml"));
        }

        if let Ok(home) = std::env::var("HOME") {
            return Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("casa")
                    .join("session.toml"),
            );
        }

        None
    }

    /// Load the stored session, if any.
    pub fn load() -> Result<Option<Session>> {
        let Some(path) = Self::discover_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let session: Session = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(session))
    }

    /// Persist the session, replacing any previous one.
    pub fn save(&self) -> Result<()> {
        let path = Self::discover_path().context("Cannot determine state directory")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let toml_string = toml::to_string_pretty(self).context("Failed to serialize session")?;
        fs::write(&path, toml_string)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Remove the stored session. Returns whether one existed.
    pub fn clear() -> Result<bool> {
        let Some(path) = Self::discover_path() else {
            return Ok(false);
        };
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
        Ok(true)
    }
}
