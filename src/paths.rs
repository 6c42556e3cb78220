// paths.rs - Config and data directory discovery
use std::path::PathBuf;

const APP_DIR: &str = "writeonly";

pub fn get_config_dir() -> PathBuf {
    let config_home = dirs::config_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config")
    });
    config_home.join(APP_DIR)
}

pub fn find_config_file() -> Option<PathBuf> {
    let config_dir = get_config_dir();
    let paths = vec![
        config_dir.join("config.toml"),
        dirs::home_dir()?.join(".writeonly").join("config.toml"),
    ];

    paths.into_iter().find(|p| p.exists())
}

/// Where the session store, exports and log live unless overridden
pub fn get_data_dir() -> PathBuf {
    let data_home = dirs::data_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".local").join("share")
    });
    data_home.join(APP_DIR)
}
