//! Settings and session file locations.

use anyhow::{Context, Result};
use shared::session_store::{FileSessionStore, MemorySessionStore, SessionStore};
use shared::settings::ClientSettings;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Overrides `base_url` from settings.json.
pub const BASE_URL_ENV: &str = "HR_ASSISTANT_BASE_URL";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com.local", "HR Assistant", "HrAssistant")
}

pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|proj| proj.config_dir().join("settings.json"))
}

pub fn session_path() -> Option<PathBuf> {
    project_dirs().map(|proj| proj.data_dir().join("session.json"))
}

pub fn load_settings_from(path: &Path) -> Result<ClientSettings> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

fn apply_env_override(settings: &mut ClientSettings, base_url: Option<String>) {
    if let Some(url) = base_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
        settings.base_url = url;
    }
}

/// Settings from disk, falling back to defaults when missing or unreadable.
pub fn load_settings_or_default() -> ClientSettings {
    let mut settings = match config_path() {
        Some(path) if path.exists() => load_settings_from(&path).unwrap_or_else(|e| {
            tracing::warn!("ignoring settings file: {:#}", e);
            ClientSettings::default()
        }),
        _ => ClientSettings::default(),
    };
    apply_env_override(&mut settings, std::env::var(BASE_URL_ENV).ok());
    settings
}

/// File-backed token storage, or process-local when there is no home dir.
pub fn session_store() -> Arc<dyn SessionStore> {
    match session_path() {
        Some(path) => Arc::new(FileSessionStore::new(path)),
        None => {
            tracing::warn!("no data directory available, session will not persist");
            Arc::new(MemorySessionStore::new())
        }
    }
}
