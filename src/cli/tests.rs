use super::send::{build_channel, observe, RunEnd};
use super::*;
use crate::campaign::{CampaignHandle, CampaignOptions, CampaignWorker, CancelToken, DelayPolicy};
use async_trait::async_trait;
use nostra_core::config::{ProgressMode, WhatsAppConfig};
use nostra_core::contact::Contact;
use nostra_core::error::NostraError;
use nostra_core::history::SendRecord;
use nostra_core::traits::{DeliveryChannel, SendHistory};
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[test]
fn test_default_template_uses_known_placeholders() {
    assert!(nostra_core::template::unknown_placeholders(DEFAULT_TEMPLATE).is_empty());
    assert!(!nostra_core::template::placeholders(DEFAULT_TEMPLATE).is_empty());
}

#[test]
fn test_load_template_prefers_explicit_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "Hola [Razón social]").unwrap();
    let campaign = CampaignConfig {
        template_path: "/nonexistent/template.txt".into(),
        ..Default::default()
    };

    let text = load_template(Some(file.path()), &campaign).unwrap();
    assert_eq!(text, "Hola [Razón social]");
}

#[test]
fn test_load_template_from_config_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "Estimado [Nombre contacto]").unwrap();
    let campaign = CampaignConfig {
        template_path: file.path().to_string_lossy().to_string(),
        ..Default::default()
    };

    assert_eq!(
        load_template(None, &campaign).unwrap(),
        "Estimado [Nombre contacto]"
    );
}

#[test]
fn test_load_template_falls_back_to_builtin() {
    let text = load_template(None, &CampaignConfig::default()).unwrap();
    assert_eq!(text, DEFAULT_TEMPLATE);
}

#[test]
fn test_load_template_rejects_missing_and_empty() {
    let campaign = CampaignConfig::default();
    assert!(load_template(Some(Path::new("/nonexistent/t.txt")), &campaign).is_err());

    let file = tempfile::NamedTempFile::new().unwrap();
    let err = load_template(Some(file.path()), &campaign).unwrap_err();
    assert!(err.to_string().contains("empty"));
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("Ñuñoa", 10), "Ñuñoa");
    assert_eq!(truncate("Ferretería del Sur", 6), "Ferre…");
}

#[test]
fn test_send_args_override_config() {
    let cfg = Config::default();
    assert!(cfg.campaign.test_mode);

    let args = SendArgs {
        test_mode: Some(false),
        no_check_history: true,
        ..Default::default()
    };
    let options = args.options(&cfg);
    assert!(!options.test_mode);
    assert!(!options.check_history);

    let options = SendArgs::default().options(&cfg);
    assert!(options.test_mode);
    assert!(options.check_history);
}

#[tokio::test]
async fn test_build_channel_dry_run() {
    let channel = build_channel(&Config::default(), true).await.unwrap();
    assert_eq!(channel.name(), "dry-run");
}

#[tokio::test]
async fn test_build_channel_requires_enabled_whatsapp() {
    let mut cfg = Config::default();
    assert!(build_channel(&cfg, false).await.is_err());

    cfg.channel.whatsapp = Some(WhatsAppConfig {
        enabled: true,
        phone_number_id: "1234567890".into(),
        access_token: "token".into(),
        ..Default::default()
    });
    let channel = build_channel(&cfg, false).await.unwrap();
    assert_eq!(channel.name(), "whatsapp");
}

/// Holds every delivery until `release` is cancelled.
struct HeldChannel {
    release: CancelToken,
}

#[async_trait]
impl DeliveryChannel for HeldChannel {
    fn name(&self) -> &str {
        "held"
    }

    async fn send(&self, _phone: &str, _body: &str) -> Result<(), NostraError> {
        self.release.cancelled().await;
        Ok(())
    }
}

struct NoHistory;

#[async_trait]
impl SendHistory for NoHistory {
    async fn successful_phones(&self) -> Result<HashSet<String>, NostraError> {
        Ok(HashSet::new())
    }

    async fn record_send(&self, _record: &SendRecord) -> Result<(), NostraError> {
        Ok(())
    }
}

fn start_held(release: CancelToken) -> CampaignHandle {
    let options = CampaignOptions {
        test_mode: false,
        check_history: false,
        delay: DelayPolicy::none(),
        progress_mode: ProgressMode::Processed,
    };
    let contacts = ["912345678", "987654321", "956781234"]
        .into_iter()
        .map(|phone| Contact {
            company_name: format!("Empresa {phone}"),
            phone: phone.to_string(),
            ..Default::default()
        })
        .collect();
    CampaignWorker::new(Arc::new(HeldChannel { release }), Arc::new(NoHistory), options)
        .start(contacts, "Hola [Razón social]".to_string())
}

#[tokio::test]
async fn test_second_interrupt_aborts_stuck_delivery() {
    // Never released: the first delivery hangs.
    let handle = start_held(CancelToken::new());
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(()).unwrap();
    tx.send(()).unwrap();

    let end = tokio::time::timeout(Duration::from_secs(2), observe(handle, rx))
        .await
        .expect("a second interrupt should end the run")
        .unwrap();
    assert!(matches!(end, RunEnd::Aborted), "{end:?}");
}

#[tokio::test]
async fn test_single_interrupt_stops_after_current_contact() {
    let release = CancelToken::new();
    let handle = start_held(release.clone());

    // Deliveries resume once the run has been asked to stop.
    let cancel = handle.cancel.clone();
    tokio::spawn(async move {
        cancel.cancelled().await;
        release.cancel();
    });

    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(()).unwrap();

    let end = tokio::time::timeout(Duration::from_secs(2), observe(handle, rx))
        .await
        .expect("run should wind down")
        .unwrap();
    match end {
        RunEnd::Completed(summary) => {
            assert!(summary.cancelled);
            assert!(summary.processed <= 1, "{summary:?}");
        }
        RunEnd::Aborted => panic!("one interrupt must not abort"),
    }
}

#[tokio::test]
async fn test_run_completes_without_interrupts() {
    let release = CancelToken::new();
    release.cancel();
    let handle = start_held(release);

    // Sender kept alive so the interrupt branch stays pending.
    let (_tx, rx) = mpsc::unbounded_channel::<()>();
    let end = tokio::time::timeout(Duration::from_secs(2), observe(handle, rx))
        .await
        .expect("run should finish")
        .unwrap();
    match end {
        RunEnd::Completed(summary) => {
            assert!(!summary.cancelled);
            assert_eq!(summary.sent, 3);
        }
        RunEnd::Aborted => panic!("nothing asked for an abort"),
    }
}
