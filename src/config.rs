use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::error::{Result, SiteError};

/// Environment switch for the reduced-motion preference.
pub const REDUCED_MOTION_ENV: &str = "VITRINE_REDUCED_MOTION";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub reduced_motion: bool,
    pub tick_ms: u64,
    pub content_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            tick_ms: 50,
            content_path: None,
        }
    }
}

impl Settings {
    /// Reduced motion is on if either the saved settings or the
    /// environment ask for it.
    pub fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion || env_requests_reduced_motion(std::env::var(REDUCED_MOTION_ENV).ok())
    }
}

fn env_requests_reduced_motion(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::trim),
        Some("1") | Some("true") | Some("reduce")
    )
}

pub trait SettingsStore {
    fn load(&self) -> Settings;
    fn save(&self, settings: &Settings) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::settings_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Settings {
        let Ok(bytes) = fs::read(&self.path) else {
            return Settings::default();
        };
        match serde_json::from_slice::<Settings>(&bytes) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable settings");
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
        }
        let data = serde_json::to_vec_pretty(settings)?;
        fs::write(&self.path, data).map_err(|e| SiteError::io(&self.path, e))
    }
}
