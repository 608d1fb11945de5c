use std::ffi::OsString;
use std::path::PathBuf;

const APP_DIR: &str = "userctl";
const CONFIG_FILE: &str = "config.toml";

/// `$XDG_CONFIG_HOME/userctl`, falling back to `$HOME/.config/userctl`.
pub fn get_config_dir() -> PathBuf {
    config_dir_from(
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

pub fn get_config_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILE)
}

fn config_dir_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    // Relative XDG values are invalid and ignored.
    let base = xdg_config_home
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .unwrap_or_else(|| {
            home.filter(|h| !h.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
    base.join(APP_DIR)
}
