//! Campaign worker: one sequential send pass over a contact selection.
//!
//! The worker runs on its own task and reports through an unbounded event
//! channel, so a slow observer never stalls delivery. Cancellation is
//! cooperative and only takes effect between contacts.

mod cancel;
mod events;
mod pacing;
mod read_only;

pub use cancel::CancelToken;
pub use events::{CampaignEvent, CampaignSummary, ContactOutcome};
pub use pacing::DelayPolicy;
pub use read_only::ReadOnlyHistory;

use nostra_core::{
    config::{CampaignConfig, ProgressMode},
    contact::Contact,
    history::{SendOutcome, SendRecord},
    phone::{self, PhoneCheck},
    template,
    traits::{DeliveryChannel, SendHistory},
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Per-run switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignOptions {
    /// Only the first contact of the selection is processed.
    pub test_mode: bool,
    /// Skip numbers with a prior successful send.
    pub check_history: bool,
    pub delay: DelayPolicy,
    pub progress_mode: ProgressMode,
}

impl CampaignOptions {
    pub fn from_config(cfg: &CampaignConfig) -> Self {
        Self {
            test_mode: cfg.test_mode,
            check_history: cfg.check_history,
            delay: DelayPolicy::from_config(cfg),
            progress_mode: cfg.progress_mode,
        }
    }
}

impl Default for CampaignOptions {
    fn default() -> Self {
        Self::from_config(&CampaignConfig::default())
    }
}

/// A running campaign as seen by its observer.
pub struct CampaignHandle {
    pub events: mpsc::UnboundedReceiver<CampaignEvent>,
    pub cancel: CancelToken,
    pub join: JoinHandle<CampaignSummary>,
}

/// Drives delivery for one campaign.
pub struct CampaignWorker {
    channel: Arc<dyn DeliveryChannel>,
    history: Arc<dyn SendHistory>,
    options: CampaignOptions,
}

impl CampaignWorker {
    pub fn new(
        channel: Arc<dyn DeliveryChannel>,
        history: Arc<dyn SendHistory>,
        options: CampaignOptions,
    ) -> Self {
        Self {
            channel,
            history,
            options,
        }
    }

    /// Spawn the worker on a background task.
    pub fn start(self, contacts: Vec<Contact>, template: String) -> CampaignHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let span = info_span!("campaign", run_id = %Uuid::new_v4());
        let join = tokio::spawn(
            async move { self.run(&contacts, &template, &token, &tx).await }.instrument(span),
        );
        CampaignHandle {
            events: rx,
            cancel,
            join,
        }
    }

    /// Run the campaign to completion on the current task.
    ///
    /// Always emits [`CampaignEvent::Finished`] last, whether the pass
    /// covered every contact, was cancelled or could not start.
    pub async fn run(
        &self,
        contacts: &[Contact],
        template: &str,
        cancel: &CancelToken,
        events: &mpsc::UnboundedSender<CampaignEvent>,
    ) -> CampaignSummary {
        let opts = self.options;
        let selection = if opts.test_mode {
            &contacts[..contacts.len().min(1)]
        } else {
            contacts
        };
        let total = selection.len();
        let mut summary = CampaignSummary {
            total,
            ..Default::default()
        };

        info!(
            "campaign: {total} contact(s) via {} (test_mode={}, check_history={})",
            self.channel.name(),
            opts.test_mode,
            opts.check_history
        );
        if !opts.test_mode && !opts.delay.is_zero() {
            let (min, max) = opts.delay.bounds();
            debug!(
                "campaign: pausing {}-{}s between deliveries",
                min.as_secs_f64(),
                max.as_secs_f64()
            );
        }
        emit(events, CampaignEvent::Started { total });

        let already_sent = if opts.check_history {
            match self.history.successful_phones().await {
                Ok(set) => set,
                Err(e) => {
                    // No deliveries without the history.
                    warn!("campaign: cannot load send history: {e}");
                    emit(
                        events,
                        CampaignEvent::Log(format!("cannot load send history: {e}")),
                    );
                    emit(events, CampaignEvent::Finished(summary.clone()));
                    return summary;
                }
            }
        } else {
            HashSet::new()
        };

        for (index, contact) in selection.iter().enumerate() {
            if cancel.is_cancelled() {
                info!("campaign: cancelled after {index} of {total} contact(s)");
                summary.cancelled = true;
                break;
            }

            let check = phone::normalize(&contact.phone);
            let outcome = match &check {
                PhoneCheck::Valid(number) if opts.check_history && already_sent.contains(number) => {
                    debug!("campaign: {number} already received a message, skipping");
                    SendOutcome::SkippedAlreadySent
                }
                PhoneCheck::Invalid(digits) => {
                    warn!(
                        "campaign: invalid number '{digits}' for {}",
                        contact.company_name
                    );
                    SendOutcome::InvalidNumber
                }
                PhoneCheck::Valid(number) => self.deliver(number, template, contact, events).await,
            };

            self.record(contact, check.as_str(), outcome, events).await;

            summary.count(outcome);
            let advances = match opts.progress_mode {
                ProgressMode::Processed => true,
                ProgressMode::SentOnly => outcome == SendOutcome::Success,
            };
            if advances {
                summary.processed += 1;
            }

            emit(
                events,
                CampaignEvent::Contact(ContactOutcome {
                    index,
                    company_name: contact.company_name.clone(),
                    phone: check.as_str().to_string(),
                    city: contact.city.clone(),
                    outcome,
                }),
            );
            emit(
                events,
                CampaignEvent::Progress {
                    processed: summary.processed,
                    total,
                },
            );

            let attempted = matches!(outcome, SendOutcome::Success | SendOutcome::Error);
            let is_last = index + 1 >= total;
            if attempted
                && !opts.test_mode
                && !is_last
                && !opts.delay.is_zero()
                && !cancel.is_cancelled()
            {
                let pause = opts.delay.sample();
                debug!("campaign: pausing {:.1}s", pause.as_secs_f64());
                tokio::select! {
                    _ = tokio::time::sleep(pause) => {}
                    _ = cancel.cancelled() => {
                        debug!("campaign: pause interrupted by cancellation");
                    }
                }
            }
        }

        info!(
            "campaign: finished (sent={}, failed={}, invalid={}, skipped={}, cancelled={})",
            summary.sent, summary.failed, summary.invalid, summary.skipped, summary.cancelled
        );
        emit(events, CampaignEvent::Finished(summary.clone()));
        summary
    }

    async fn deliver(
        &self,
        number: &str,
        template: &str,
        contact: &Contact,
        events: &mpsc::UnboundedSender<CampaignEvent>,
    ) -> SendOutcome {
        let body = template::render(template, contact);
        match self.channel.send(number, &body).await {
            Ok(()) => {
                info!("campaign: sent to {} ({number})", contact.company_name);
                SendOutcome::Success
            }
            Err(e) => {
                warn!(
                    "campaign: delivery to {} ({number}) failed: {e}",
                    contact.company_name
                );
                emit(
                    events,
                    CampaignEvent::Log(format!(
                        "delivery to {} ({number}) failed: {e}",
                        contact.company_name
                    )),
                );
                SendOutcome::Error
            }
        }
    }

    async fn record(
        &self,
        contact: &Contact,
        phone: &str,
        outcome: SendOutcome,
        events: &mpsc::UnboundedSender<CampaignEvent>,
    ) {
        let record = SendRecord::now(&contact.company_name, phone, &contact.city, outcome);
        if let Err(e) = self.history.record_send(&record).await {
            warn!("campaign: failed to record {outcome} for {phone}: {e}");
            emit(
                events,
                CampaignEvent::Log(format!("failed to record {outcome} for {phone}: {e}")),
            );
        }
    }
}

/// The observer may have gone away; the run continues regardless.
fn emit(events: &mpsc::UnboundedSender<CampaignEvent>, event: CampaignEvent) {
    let _ = events.send(event);
}
