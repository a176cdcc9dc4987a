use super::open_store;
use crate::logging;
use nostra_core::config::{shellexpand, Config};

/// `nostra status`: configuration, database and channel overview.
pub async fn status(cfg: &Config, config_path: &str) -> anyhow::Result<()> {
    println!("{} status\n", cfg.nostra.name);
    println!("Config: {config_path}");
    println!("Logs:   {}", logging::logs_dir(&cfg.nostra.data_dir).display());
    println!("DB:     {}", shellexpand(&cfg.store.db_path));

    let store = open_store(cfg).await?;
    let size = store.db_size().await?;
    println!("        {:.1} KiB", size as f64 / 1024.0);
    println!();

    println!("Contacts: {}", store.contact_count().await?);
    let counts = store.history_counts().await?;
    if counts.is_empty() {
        println!("History:  empty");
    } else {
        println!("History:");
        for (outcome, n) in counts {
            println!("  {:<22} {n}", outcome.as_str());
        }
    }
    println!();

    let c = &cfg.campaign;
    println!(
        "Campaign: delay {}-{}s, progress {:?}, test_mode={}, check_history={}",
        c.min_delay_secs, c.max_delay_secs, c.progress_mode, c.test_mode, c.check_history
    );

    match cfg.channel.whatsapp {
        Some(ref wa) => println!(
            "  whatsapp: {}",
            if wa.enabled && wa.has_credentials() {
                "configured"
            } else if wa.enabled {
                "enabled but missing phone_number_id or access_token"
            } else {
                "disabled"
            }
        ),
        None => println!("  whatsapp: not configured"),
    }
    Ok(())
}
