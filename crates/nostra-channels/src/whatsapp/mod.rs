//! WhatsApp Cloud API (Meta Graph API) channel.
//!
//! Each message is a `POST {api_base}/{phone_number_id}/messages` with a
//! bearer token. Delivery is attempted once; failures are reported to the
//! caller, never retried here.

mod channel;
mod send;

#[cfg(test)]
mod tests;

use nostra_core::{config::WhatsAppConfig, error::NostraError};
use std::time::Duration;

/// WhatsApp channel backed by the Cloud API.
pub struct CloudApiChannel {
    pub(super) config: WhatsAppConfig,
    pub(super) client: reqwest::Client,
}

impl CloudApiChannel {
    /// Create a new channel from config.
    pub fn new(config: WhatsAppConfig) -> Result<Self, NostraError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NostraError::Delivery(format!("failed to build http client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Messages endpoint for the configured business number.
    pub(super) fn messages_url(&self) -> String {
        format!(
            "{}/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.phone_number_id
        )
    }
}
