use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where the trace log goes; stdout belongs to the TUI.
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("termo");
            Some(state_dir.join("termo.log"))
        } else {
            ProjectDirs::from("", "", "termo")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("termo.log"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_named_after_the_app() {
        if let Some(path) = AppDirs::log_path() {
            assert!(path.ends_with("termo/termo.log"));
        }
    }
}
