use super::{load_template, open_store};
use crate::campaign::{
    CampaignEvent, CampaignHandle, CampaignOptions, CampaignSummary, CampaignWorker,
    ReadOnlyHistory,
};
use nostra_channels::{CloudApiChannel, DryRunChannel};
use nostra_core::{
    config::Config,
    contact::ContactFilter,
    history::SendOutcome,
    template,
    traits::{DeliveryChannel, SendHistory},
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Command-line overrides for one `send` run.
#[derive(Debug, Clone, Default)]
pub struct SendArgs {
    pub filter: ContactFilter,
    pub template: Option<PathBuf>,
    /// `Some` when `--test-mode` or `--all` was given.
    pub test_mode: Option<bool>,
    pub no_check_history: bool,
    pub dry_run: bool,
}

impl SendArgs {
    pub(crate) fn options(&self, cfg: &Config) -> CampaignOptions {
        let mut options = CampaignOptions::from_config(&cfg.campaign);
        if let Some(test_mode) = self.test_mode {
            options.test_mode = test_mode;
        }
        if self.no_check_history {
            options.check_history = false;
        }
        options
    }
}

/// Pick the delivery channel for this run.
pub(crate) async fn build_channel(
    cfg: &Config,
    dry_run: bool,
) -> anyhow::Result<Arc<dyn DeliveryChannel>> {
    if dry_run {
        return Ok(Arc::new(DryRunChannel::new()));
    }

    let Some(wa) = cfg.channel.whatsapp.as_ref().filter(|wa| wa.enabled) else {
        anyhow::bail!(
            "No delivery channel enabled. Enable [channel.whatsapp] in config.toml \
             or use --dry-run."
        );
    };
    let channel = CloudApiChannel::new(wa.clone())?;
    if !channel.is_available().await {
        anyhow::bail!(
            "WhatsApp is enabled but phone_number_id or access_token is empty. \
             Set them in config.toml or the NOSTRA_WHATSAPP_TOKEN env var."
        );
    }
    Ok(Arc::new(channel))
}

/// `nostra send`: run one campaign over the selection with live progress.
pub async fn send(cfg: &Config, args: SendArgs) -> anyhow::Result<()> {
    let template_text = load_template(args.template.as_deref(), &cfg.campaign)?;
    let unknown = template::unknown_placeholders(&template_text);
    if !unknown.is_empty() {
        warn!("template has unknown placeholders: {}", unknown.join(", "));
        println!(
            "Warning: these placeholders will be sent as-is: {}",
            unknown.join(", ")
        );
    }

    let store = open_store(cfg).await?;
    let contacts = store.filtered_contacts(&args.filter).await?;
    if contacts.is_empty() {
        anyhow::bail!("No contacts match the selected filters. Run `nostra filters` to see options.");
    }

    let channel = build_channel(cfg, args.dry_run).await?;
    let history: Arc<dyn SendHistory> = if args.dry_run {
        Arc::new(ReadOnlyHistory::new(Arc::new(store.clone())))
    } else {
        Arc::new(store.clone())
    };
    let options = args.options(cfg);

    println!(
        "Sending to {} contact(s) via {}{}{}",
        if options.test_mode { 1 } else { contacts.len() },
        channel.name(),
        if options.test_mode {
            " (test mode: first contact only)"
        } else {
            ""
        },
        if options.check_history {
            ""
        } else {
            " (history check off)"
        },
    );
    println!("Press Ctrl-C to stop after the current contact.\n");

    let worker = CampaignWorker::new(channel, history, options);
    let handle = worker.start(contacts, template_text);

    match observe(handle, forward_interrupts()).await? {
        RunEnd::Completed(summary) => {
            print_summary(&summary);
            Ok(())
        }
        RunEnd::Aborted => std::process::exit(130),
    }
}

/// How an observed run ended.
#[derive(Debug)]
pub(crate) enum RunEnd {
    Completed(CampaignSummary),
    /// A second interrupt arrived before the run wound down.
    Aborted,
}

/// One message per Ctrl-C, from a single signal listener.
fn forward_interrupts() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Print events until the run ends.
///
/// The first interrupt stops the run after the current contact. A second one
/// abandons it.
pub(crate) async fn observe(
    mut handle: CampaignHandle,
    mut interrupts: mpsc::UnboundedReceiver<()>,
) -> anyhow::Result<RunEnd> {
    let mut stopping = false;

    loop {
        tokio::select! {
            event = handle.events.recv() => match event {
                Some(event) => print_event(&event),
                None => break,
            },
            Some(()) = interrupts.recv() => {
                if stopping {
                    println!("\nAborting.");
                    handle.join.abort();
                    return Ok(RunEnd::Aborted);
                }
                stopping = true;
                println!("\nStopping after the current contact... (Ctrl-C again to abort)");
                handle.cancel.cancel();
            }
        }
    }

    Ok(RunEnd::Completed(handle.join.await?))
}

fn print_event(event: &CampaignEvent) {
    match event {
        CampaignEvent::Started { total } => println!("Campaign started: {total} contact(s)"),
        CampaignEvent::Log(msg) => println!("  ! {msg}"),
        CampaignEvent::Contact(c) => {
            let label = match c.outcome {
                SendOutcome::Success => "sent",
                SendOutcome::Error => "FAILED",
                SendOutcome::InvalidNumber => "invalid number",
                SendOutcome::SkippedAlreadySent => "already sent, skipped",
            };
            println!(
                "  #{} {} ({}) <{}> {label}",
                c.index + 1,
                c.company_name,
                c.city,
                c.phone
            );
        }
        CampaignEvent::Progress { processed, total } => println!("  [{processed}/{total}]"),
        CampaignEvent::Finished(_) => {}
    }
}

fn print_summary(s: &CampaignSummary) {
    println!();
    if s.cancelled {
        println!("Campaign stopped: {} of {} contact(s) handled", s.handled(), s.total);
    } else {
        println!("Campaign finished: {} contact(s)", s.total);
    }
    println!("  sent:    {}", s.sent);
    println!("  failed:  {}", s.failed);
    println!("  invalid: {}", s.invalid);
    println!("  skipped: {}", s.skipped);
    println!("  progress: {}/{}", s.processed, s.total);
}
