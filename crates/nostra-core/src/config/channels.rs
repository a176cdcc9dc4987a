use serde::{Deserialize, Serialize};

use super::defaults::*;

/// Channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    pub whatsapp: Option<WhatsAppConfig>,
}

/// WhatsApp Cloud API channel config.
///
/// The access token can be left empty here and supplied through the
/// `NOSTRA_WHATSAPP_TOKEN` environment variable instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Business phone number ID assigned by Meta.
    #[serde(default)]
    pub phone_number_id: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base: default_api_base(),
            phone_number_id: String::new(),
            access_token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WhatsAppConfig {
    /// Whether both credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.phone_number_id.trim().is_empty() && !self.access_token.trim().is_empty()
    }
}
