mod campaign;
mod cli;
mod logging;

use clap::{Args, Parser, Subcommand};
use nostra_core::{config, contact::ContactFilter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "nostra",
    version,
    about = "Nostra: WhatsApp outreach to an imported contact list"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the contact list with a CSV export of the contact sheet.
    Import {
        /// CSV file with a header row.
        file: PathBuf,
    },
    /// List contacts matching the filters.
    Contacts {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show the values available for each filter.
    Filters,
    /// Show the most recent send records.
    History {
        /// Number of records (default: store.history_limit).
        #[arg(short, long)]
        limit: Option<i64>,
    },
    /// Send the template to the selected contacts.
    Send {
        #[command(flatten)]
        filter: FilterArgs,
        /// Message template file (default: campaign.template_path or built-in).
        #[arg(short, long)]
        template: Option<PathBuf>,
        /// Only send to the first selected contact.
        #[arg(long, conflicts_with = "all")]
        test_mode: bool,
        /// Send to every selected contact, even if test_mode is set in config.
        #[arg(long)]
        all: bool,
        /// Also send to numbers that already received a message.
        #[arg(long)]
        no_check_history: bool,
        /// Render and log messages without delivering or recording them.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show configuration, database and channel status.
    Status,
}

/// Recipient selection flags. Matching is case-insensitive.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    commune: Option<String>,
    #[arg(long)]
    business_type: Option<String>,
}

impl From<FilterArgs> for ContactFilter {
    fn from(f: FilterArgs) -> Self {
        Self {
            city: f.city,
            commune: f.commune,
            business_type: f.business_type,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _log_guard = logging::init(
        &logging::logs_dir(&cfg.nostra.data_dir),
        &cfg.nostra.log_level,
    )?;

    match cli.command {
        Commands::Import { file } => cli::import(&cfg, &file).await?,
        Commands::Contacts { filter } => cli::contacts(&cfg, &filter.into()).await?,
        Commands::Filters => cli::filters(&cfg).await?,
        Commands::History { limit } => cli::history(&cfg, limit).await?,
        Commands::Send {
            filter,
            template,
            test_mode,
            all,
            no_check_history,
            dry_run,
        } => {
            let test_mode = match (test_mode, all) {
                (true, _) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            };
            cli::send(
                &cfg,
                cli::SendArgs {
                    filter: filter.into(),
                    template,
                    test_mode,
                    no_check_history,
                    dry_run,
                },
            )
            .await?
        }
        Commands::Status => cli::status(&cfg, &cli.config).await?,
    }

    Ok(())
}
