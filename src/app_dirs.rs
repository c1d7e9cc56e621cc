use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn settings_path() -> PathBuf {
        match ProjectDirs::from("", "", "vitrine") {
            Some(pd) => pd.config_dir().join("settings.json"),
            None => PathBuf::from("vitrine_settings.json"),
        }
    }

    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("vitrine");
            Some(state_dir.join("vitrine.log"))
        } else {
            ProjectDirs::from("", "", "vitrine")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("vitrine.log"))
        }
    }
}
