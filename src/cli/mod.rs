//! Subcommand handlers. Each one loads what it needs and prints to stdout.

mod contacts;
mod send;
mod status;

pub use contacts::{contacts, filters, history, import};
pub use send::{send, SendArgs};
pub use status::status;

use nostra_core::config::{shellexpand, CampaignConfig, Config};
use nostra_store::Store;
use std::path::{Path, PathBuf};

/// Message used when neither the command line nor the config names a file.
pub(crate) const DEFAULT_TEMPLATE: &str = include_str!("../../assets/default_template.txt");

pub(crate) async fn open_store(cfg: &Config) -> anyhow::Result<Store> {
    Ok(Store::new(&cfg.store).await?)
}

/// Resolve the message template: `--template`, then `campaign.template_path`,
/// then the built-in text.
pub(crate) fn load_template(
    explicit: Option<&Path>,
    campaign: &CampaignConfig,
) -> anyhow::Result<String> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None if !campaign.template_path.trim().is_empty() => {
            Some(PathBuf::from(shellexpand(campaign.template_path.trim())))
        }
        None => None,
    };

    let Some(path) = path else {
        return Ok(DEFAULT_TEMPLATE.to_string());
    };
    let text = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("cannot read template {}: {e}", path.display()))?;
    if text.trim().is_empty() {
        anyhow::bail!("template {} is empty", path.display());
    }
    Ok(text)
}

/// Cut `s` to at most `max` characters for table output.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests;
