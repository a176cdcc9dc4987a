//! Events flowing from the campaign worker to its observer.

use nostra_core::history::SendOutcome;

/// What the worker did with one contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactOutcome {
    /// Position in the selection (0-based).
    pub index: usize,
    pub company_name: String,
    /// Normalized number, or the digits-only input if invalid.
    pub phone: String,
    pub city: String,
    pub outcome: SendOutcome,
}

/// Totals for one campaign run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignSummary {
    /// Contacts the run would process (1 in test mode).
    pub total: usize,
    /// Final value of the progress counter.
    pub processed: usize,
    pub sent: usize,
    pub failed: usize,
    pub invalid: usize,
    pub skipped: usize,
    /// Whether the run stopped on request before covering every contact.
    pub cancelled: bool,
}

impl CampaignSummary {
    /// Contacts that reached a recorded outcome.
    pub fn handled(&self) -> usize {
        self.sent + self.failed + self.invalid + self.skipped
    }

    pub(super) fn count(&mut self, outcome: SendOutcome) {
        match outcome {
            SendOutcome::Success => self.sent += 1,
            SendOutcome::Error => self.failed += 1,
            SendOutcome::InvalidNumber => self.invalid += 1,
            SendOutcome::SkippedAlreadySent => self.skipped += 1,
        }
    }
}

/// One notification from the worker. The observer never blocks the worker.
#[derive(Debug, Clone, PartialEq)]
pub enum CampaignEvent {
    Started { total: usize },
    Log(String),
    Contact(ContactOutcome),
    Progress { processed: usize, total: usize },
    /// Terminal event, emitted exactly once however the run ended.
    Finished(CampaignSummary),
}
