use super::{open_store, truncate};
use chrono::Local;
use nostra_core::{
    config::Config,
    contact::{Column, ContactFilter, FilterColumn},
    error::NostraError,
    phone,
};
use nostra_store::import_file;
use std::path::Path;

/// `nostra import <file>`: replace the contact list with the sheet's rows.
pub async fn import(cfg: &Config, file: &Path) -> anyhow::Result<()> {
    if !file.is_file() {
        anyhow::bail!("file not found: {}", file.display());
    }
    let store = open_store(cfg).await?;

    let report = match import_file(&store, file).await {
        Ok(report) => report,
        Err(NostraError::ImportColumnsMissing(missing)) => {
            let expected: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
            anyhow::bail!(
                "the sheet is missing required columns: {}\nExpected headers: {}",
                missing.join(", "),
                expected.join(", ")
            );
        }
        Err(e) => return Err(e.into()),
    };

    println!(
        "Imported {} contact(s) from {}",
        report.rows,
        file.display()
    );
    if report.skipped_blank > 0 {
        println!("Skipped {} blank row(s)", report.skipped_blank);
    }
    Ok(())
}

/// `nostra contacts`: list the current selection.
pub async fn contacts(cfg: &Config, filter: &ContactFilter) -> anyhow::Result<()> {
    let store = open_store(cfg).await?;
    let list = store.filtered_contacts(filter).await?;
    if list.is_empty() {
        println!("No contacts match.");
        return Ok(());
    }

    println!(
        "{:<32} {:<14} {:<18} {:<18} GIRO",
        "RAZÓN SOCIAL", "TELÉFONO", "COMUNA", "CIUDAD"
    );
    let mut invalid = 0;
    for c in &list {
        let check = phone::normalize(&c.phone);
        let shown = if check.is_valid() {
            check.as_str().to_string()
        } else {
            invalid += 1;
            format!("!{}", c.phone.trim())
        };
        println!(
            "{:<32} {:<14} {:<18} {:<18} {}",
            truncate(&c.company_name, 32),
            truncate(&shown, 14),
            truncate(&c.commune, 18),
            truncate(&c.city, 18),
            c.business_type
        );
    }

    println!();
    println!("{} contact(s)", list.len());
    if invalid > 0 {
        println!("{invalid} with an invalid phone number (marked with !)");
    }
    Ok(())
}

/// `nostra filters`: distinct values available for each filter.
pub async fn filters(cfg: &Config) -> anyhow::Result<()> {
    let store = open_store(cfg).await?;
    let sections = [
        ("Cities (--city)", FilterColumn::City),
        ("Communes (--commune)", FilterColumn::Commune),
        ("Business types (--business-type)", FilterColumn::BusinessType),
    ];
    for (i, (label, column)) in sections.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        let values = store.distinct_values(column).await?;
        println!("{label}: {}", values.len());
        for v in values {
            println!("  {v}");
        }
    }
    Ok(())
}

/// `nostra history`: most recent send records, newest first.
pub async fn history(cfg: &Config, limit: Option<i64>) -> anyhow::Result<()> {
    let limit = limit.unwrap_or(cfg.store.history_limit);
    if limit <= 0 {
        anyhow::bail!("--limit must be positive");
    }
    let store = open_store(cfg).await?;
    let records = store.recent_history(limit).await?;
    if records.is_empty() {
        println!("No messages sent yet.");
        return Ok(());
    }

    for r in &records {
        println!(
            "{}  {:<20} {:<14} {:<32} {}",
            r.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
            r.outcome.as_str(),
            r.phone,
            truncate(&r.company_name, 32),
            r.city
        );
    }
    Ok(())
}
