use async_trait::async_trait;
use nostra_core::{error::NostraError, history::SendRecord, traits::SendHistory};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// History view for dry runs: reads prior successes, discards new records.
///
/// A dry run must not mark numbers as contacted, or the next live run would
/// skip them.
pub struct ReadOnlyHistory {
    inner: Arc<dyn SendHistory>,
}

impl ReadOnlyHistory {
    pub fn new(inner: Arc<dyn SendHistory>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl SendHistory for ReadOnlyHistory {
    async fn successful_phones(&self) -> Result<HashSet<String>, NostraError> {
        self.inner.successful_phones().await
    }

    async fn record_send(&self, record: &SendRecord) -> Result<(), NostraError> {
        debug!(
            "dry-run: not recording {} for {}",
            record.outcome, record.phone
        );
        Ok(())
    }
}
