use std::path::PathBuf;

/// Default settings file: `~/.config/gcvm/gcvm.toml`
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gcvm")
        .join("gcvm.toml")
}

/// gcloud's own configuration directory.
///
/// `$CLOUDSDK_CONFIG` when set, otherwise `~/.config/gcloud/`.
pub fn gcloud_config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("CLOUDSDK_CONFIG").filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".config")
        .join("gcloud")
}
