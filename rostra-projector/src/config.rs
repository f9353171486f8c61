use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Client configuration for reaching the assembly server.
#[derive(Debug, Clone)]
pub struct ControlConfig {
    pub server_url: String,
    pub access_token: Option<String>,
}

/// Raw TOML file structure for `~/.config/rostra/config.toml`.
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    server_url: Option<String>,
    access_token: Option<String>,
}

/// Default config file location.
fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .expect("could not determine config directory")
        .join("rostra")
        .join("config.toml")
}

impl ControlConfig {
    /// Load configuration from file and environment variables.
    ///
    /// `ROSTRA_SERVER_URL` and `ROSTRA_ACCESS_TOKEN` override file values.
    /// A missing file is fine as long as the environment supplies a server
    /// URL; a missing server URL is an error.
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        let path = path.cloned().unwrap_or_else(default_config_path);

        let file: ConfigFile = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config: {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("parsing config: {}", path.display()))?
        } else {
            ConfigFile::default()
        };

        let server_url = std::env::var("ROSTRA_SERVER_URL")
            .ok()
            .or(file.server_url);
        let access_token = std::env::var("ROSTRA_ACCESS_TOKEN")
            .ok()
            .or(file.access_token);

        let Some(server_url) = server_url else {
            bail!(
                "no server URL configured; set server_url in {} or ROSTRA_SERVER_URL",
                path.display()
            );
        };

        Ok(Self {
            server_url,
            access_token,
        })
    }
}
