use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `<data dir>/<namespace>.json`
    pub fn prefs_path(namespace: &str) -> Option<PathBuf> {
        ProjectDirs::from("", "", "fastwatch")
            .map(|proj_dirs| proj_dirs.data_dir().join(format!("{}.json", namespace)))
    }

    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("fastwatch");
            Some(state_dir.join("fastwatch.log"))
        } else {
            ProjectDirs::from("", "", "fastwatch")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("fastwatch.log"))
        }
    }
}
