//! DeliveryChannel trait implementation for WhatsApp.

use super::send::{recipient, split_message, TextMessage, MAX_BODY_LEN};
use super::CloudApiChannel;
use async_trait::async_trait;
use nostra_core::{error::NostraError, traits::DeliveryChannel};
use tracing::debug;

impl CloudApiChannel {
    /// Post one text chunk.
    async fn post_text(&self, to: &str, body: &str) -> Result<(), NostraError> {
        let resp = self
            .client
            .post(self.messages_url())
            .bearer_auth(&self.config.access_token)
            .json(&TextMessage::new(to, body))
            .send()
            .await
            .map_err(|e| NostraError::Delivery(format!("whatsapp request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(NostraError::Delivery(format!(
                "whatsapp api error {status}: {text}"
            )));
        }

        debug!("whatsapp: delivered {} bytes to {to}", body.len());
        Ok(())
    }
}

#[async_trait]
impl DeliveryChannel for CloudApiChannel {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn send(&self, phone: &str, body: &str) -> Result<(), NostraError> {
        let to = recipient(phone);
        if to.is_empty() {
            return Err(NostraError::Delivery("empty recipient".into()));
        }
        for chunk in split_message(body, MAX_BODY_LEN) {
            self.post_text(to, chunk).await?;
        }
        Ok(())
    }

    async fn is_available(&self) -> bool {
        self.config.has_credentials()
    }
}
