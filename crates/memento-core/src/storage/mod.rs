//! Persistence: TOML settings and the key-value state store.

pub mod kv;
mod settings;

pub use settings::Settings;

use std::path::PathBuf;

/// Returns `~/.config/memento[-dev]/` based on MEMENTO_ENV.
///
/// Set MEMENTO_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MEMENTO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("memento-dev")
    } else {
        base_dir.join("memento")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
