//! Path utilities: expand ~ in configured store paths.

use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// `expand_tilde` as a string, the form rusqlite paths are kept in.
pub fn resolve(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}
