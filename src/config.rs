use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

const CONFIG_PATH_REL_HOME: &str = ".config/tagguard/config.toml";
const CONFIG_PATH_ENV: &str = "TAGGUARD_CONFIG";
const TOKEN_ENV: &str = "DISCORD_BOT_TOKEN";

/// Bot configuration
#[derive(Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub auto_kick: AutoKick,
    pub purge: Purge,
    pub mention_notify: MentionNotify,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct General {
    pub command_prefix: String,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AutoKick {
    pub enabled: bool,
    /// Give Discord time to write the audit log entry before looking for it.
    pub audit_log_delay_ms: u64,
    pub audit_log_lookback: u8,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Purge {
    pub confirmation_lifetime_secs: u64,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MentionNotify {
    pub enabled: bool,
    pub utc_offset_minutes: i32,
    pub timezone_label: String,
    pub max_content_chars: usize,
    pub image_url: Option<String>,
}

impl Default for General {
    fn default() -> Self {
        Self {
            command_prefix: "!".to_owned(),
        }
    }
}

impl Default for AutoKick {
    fn default() -> Self {
        Self {
            enabled: true,
            audit_log_delay_ms: 1000,
            audit_log_lookback: 5,
        }
    }
}

impl Default for Purge {
    fn default() -> Self {
        Self {
            confirmation_lifetime_secs: 5,
        }
    }
}

impl Default for MentionNotify {
    fn default() -> Self {
        Self {
            enabled: true,
            // India Standard Time
            utc_offset_minutes: 5 * 60 + 30,
            timezone_label: "IST".to_owned(),
            max_content_chars: 1024,
            image_url: Some("https://media.giphy.com/media/Nx0rz3jtxtEre/giphy.gif".to_owned()),
        }
    }
}

impl Config {
    fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        dirs::home_dir()
            .map(|p| p.join(CONFIG_PATH_REL_HOME))
            .ok_or(anyhow!("Could not find home directory"))
    }

    /// Load the configuration file, falling back to defaults if there is none.
    pub async fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(anyhow!(
                    "Could not open configuration at `{}`: {}",
                    path.to_string_lossy(),
                    e
                ))
            }
        };

        let mut contents = String::new();
        file.read_to_string(&mut contents).await.map_err(|e| {
            anyhow!(
                "Could not read configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        Self::parse(&contents).map_err(|e| {
            anyhow!(
                "Could not parse configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;

        if config.general.command_prefix.is_empty() {
            return Err(anyhow!("`general.command_prefix` must not be empty"));
        }

        Ok(config)
    }

    /// The Discord token is only ever read from the environment.
    pub fn discord_token() -> Result<String> {
        match std::env::var(TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(anyhow!("{} not found in environment variables", TOKEN_ENV)),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.general.command_prefix
    }
}
