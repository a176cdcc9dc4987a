mod channels;
mod defaults;


pub use channels::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::NostraError;
use defaults::*;

/// Environment variable that overrides the WhatsApp access token.
pub const TOKEN_ENV: &str = "NOSTRA_WHATSAPP_TOKEN";

/// Top-level Nostra configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub nostra: NostraConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub campaign: CampaignConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NostraConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for NostraConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Contact and history database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Rows shown by `history` when no limit is given.
    #[serde(default = "default_history_limit")]
    pub history_limit: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            history_limit: default_history_limit(),
        }
    }
}

/// How the progress counter advances.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressMode {
    /// Every contact handled (sent, failed, invalid or skipped) counts.
    #[default]
    Processed,
    /// Only successful deliveries count.
    SentOnly,
}

/// Campaign defaults. CLI flags override the mode switches per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Lower bound of the pause between two deliveries, in seconds.
    #[serde(default = "default_min_delay")]
    pub min_delay_secs: u64,
    /// Upper bound of the pause between two deliveries, in seconds.
    #[serde(default = "default_max_delay")]
    pub max_delay_secs: u64,
    #[serde(default)]
    pub progress_mode: ProgressMode,
    /// Only send to the first selected contact.
    #[serde(default = "default_true")]
    pub test_mode: bool,
    /// Skip numbers that already have a successful send on record.
    #[serde(default = "default_true")]
    pub check_history: bool,
    /// Message template file. Empty = built-in template.
    #[serde(default)]
    pub template_path: String,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: default_min_delay(),
            max_delay_secs: default_max_delay(),
            progress_mode: ProgressMode::default(),
            test_mode: true,
            check_history: true,
            template_path: String::new(),
        }
    }
}

impl Config {
    /// Reject settings the campaign worker cannot honour.
    pub fn validate(&self) -> Result<(), NostraError> {
        if self.campaign.min_delay_secs > self.campaign.max_delay_secs {
            return Err(NostraError::Config(format!(
                "campaign.min_delay_secs ({}) is greater than campaign.max_delay_secs ({})",
                self.campaign.min_delay_secs, self.campaign.max_delay_secs
            )));
        }
        if self.store.history_limit <= 0 {
            return Err(NostraError::Config(
                "store.history_limit must be positive".into(),
            ));
        }
        if let Some(ref wa) = self.channel.whatsapp {
            if wa.enabled && !wa.has_credentials() {
                return Err(NostraError::Config(format!(
                    "WhatsApp is enabled but phone_number_id or access_token is empty. \
                     Set them in config.toml or the token in {TOKEN_ENV}."
                )));
            }
        }
        Ok(())
    }

    /// Apply environment overrides.
    fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.channel
                    .whatsapp
                    .get_or_insert_with(WhatsAppConfig::default)
                    .access_token = token;
            }
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Parse configuration from TOML text.
pub fn from_toml_str(content: &str) -> Result<Config, NostraError> {
    toml::from_str(content).map_err(|e| NostraError::Config(format!("failed to parse config: {e}")))
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, NostraError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NostraError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        from_toml_str(&content)?
    } else {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    config.apply_env();
    config.validate()?;
    Ok(config)
}
