use crate::{error::NostraError, history::SendRecord};
use async_trait::async_trait;
use std::collections::HashSet;

/// Outbound delivery channel.
///
/// Every transport (WhatsApp Cloud API, dry run, ...) implements this trait.
/// The campaign worker only knows "attempt delivery of a body to a number".
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Deliver `body` to a normalized `+569...` number.
    async fn send(&self, phone: &str, body: &str) -> Result<(), NostraError>;

    /// Check if the channel is configured and reachable.
    async fn is_available(&self) -> bool {
        true
    }
}

/// Send history as seen by a campaign: read prior successes, append outcomes.
#[async_trait]
pub trait SendHistory: Send + Sync {
    /// Normalized phones with at least one successful send.
    async fn successful_phones(&self) -> Result<HashSet<String>, NostraError>;

    /// Append one outcome.
    async fn record_send(&self, record: &SendRecord) -> Result<(), NostraError>;
}
