//! Append-only send history.

use super::Store;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use nostra_core::{
    error::NostraError,
    history::{SendOutcome, SendRecord},
    traits::SendHistory,
};
use std::collections::HashSet;

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, NostraError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| NostraError::Storage(format!("bad timestamp '{raw}': {e}")))
}

impl Store {
    /// Append one history entry.
    pub async fn record_send(&self, record: &SendRecord) -> Result<(), NostraError> {
        // Fixed-width UTC timestamps sort lexically in time order.
        let sent_at = record
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Micros, true);
        sqlx::query(
            "INSERT INTO send_history (sent_at, company_name, phone, city, outcome) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&sent_at)
        .bind(&record.company_name)
        .bind(&record.phone)
        .bind(&record.city)
        .bind(record.outcome.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| NostraError::Storage(format!("record send: {e}")))?;
        Ok(())
    }

    /// Phones with at least one successful send.
    pub async fn successful_phones(&self) -> Result<HashSet<String>, NostraError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT phone FROM send_history WHERE outcome = ?")
                .bind(SendOutcome::Success.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| NostraError::Storage(format!("successful phones: {e}")))?;
        Ok(rows.into_iter().map(|(p,)| p).collect())
    }

    /// Most recent history entries, newest first.
    pub async fn recent_history(&self, limit: i64) -> Result<Vec<SendRecord>, NostraError> {
        let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
            "SELECT sent_at, company_name, phone, city, outcome FROM send_history \
             ORDER BY sent_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NostraError::Storage(format!("recent history: {e}")))?;

        rows.into_iter()
            .map(|(sent_at, company_name, phone, city, outcome)| {
                Ok(SendRecord {
                    timestamp: parse_timestamp(&sent_at)?,
                    company_name,
                    phone,
                    city,
                    outcome: outcome.parse()?,
                })
            })
            .collect()
    }

    /// Number of history entries per outcome, most frequent first.
    pub async fn history_counts(&self) -> Result<Vec<(SendOutcome, i64)>, NostraError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT outcome, COUNT(*) AS n FROM send_history \
             GROUP BY outcome ORDER BY n DESC, outcome ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NostraError::Storage(format!("history counts: {e}")))?;

        rows.into_iter()
            .map(|(outcome, n)| Ok((outcome.parse()?, n)))
            .collect()
    }
}

#[async_trait]
impl SendHistory for Store {
    async fn successful_phones(&self) -> Result<HashSet<String>, NostraError> {
        Store::successful_phones(self).await
    }

    async fn record_send(&self, record: &SendRecord) -> Result<(), NostraError> {
        Store::record_send(self, record).await
    }
}
