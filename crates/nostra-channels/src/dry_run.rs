//! Dry-run channel: renders and logs, never sends.

use async_trait::async_trait;
use nostra_core::{error::NostraError, traits::DeliveryChannel};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Channel that logs every message instead of delivering it.
#[derive(Debug, Default)]
pub struct DryRunChannel {
    sent: AtomicUsize,
}

impl DryRunChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages "sent" so far.
    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DeliveryChannel for DryRunChannel {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn send(&self, phone: &str, body: &str) -> Result<(), NostraError> {
        self.sent.fetch_add(1, Ordering::Relaxed);
        info!("dry-run: would send {} chars to {phone}", body.chars().count());
        info!("dry-run body:\n{body}");
        Ok(())
    }
}
