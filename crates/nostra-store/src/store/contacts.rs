//! Contact list: wholesale replacement on import, listing and filtering.

use super::Store;
use nostra_core::{
    contact::{Contact, ContactFilter, FilterColumn},
    error::NostraError,
};
use std::collections::BTreeSet;
use tracing::debug;

type ContactRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
);

fn from_row(row: ContactRow) -> Contact {
    let (company_name, tax_id, business_type, address, commune, city, contact_name, phone) = row;
    Contact {
        company_name,
        tax_id,
        business_type,
        address,
        commune,
        city,
        contact_name,
        phone,
    }
}

impl Store {
    /// Replace the whole contact list in one transaction.
    ///
    /// Returns the number of contacts written.
    pub async fn replace_contacts(&self, contacts: &[Contact]) -> Result<usize, NostraError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| NostraError::Storage(format!("begin import: {e}")))?;

        sqlx::query("DELETE FROM contacts")
            .execute(&mut *tx)
            .await
            .map_err(|e| NostraError::Storage(format!("clear contacts: {e}")))?;

        for c in contacts {
            sqlx::query(
                "INSERT INTO contacts \
                 (company_name, tax_id, business_type, address, commune, city, contact_name, phone) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&c.company_name)
            .bind(&c.tax_id)
            .bind(&c.business_type)
            .bind(&c.address)
            .bind(&c.commune)
            .bind(&c.city)
            .bind(&c.contact_name)
            .bind(&c.phone)
            .execute(&mut *tx)
            .await
            .map_err(|e| NostraError::Storage(format!("insert contact: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| NostraError::Storage(format!("commit import: {e}")))?;

        debug!("replaced contact list with {} rows", contacts.len());
        Ok(contacts.len())
    }

    /// All contacts in import order.
    pub async fn all_contacts(&self) -> Result<Vec<Contact>, NostraError> {
        let rows: Vec<ContactRow> = sqlx::query_as(
            "SELECT company_name, tax_id, business_type, address, commune, city, contact_name, phone \
             FROM contacts ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NostraError::Storage(format!("list contacts: {e}")))?;
        Ok(rows.into_iter().map(from_row).collect())
    }

    /// Contacts matching the filter, in import order.
    ///
    /// Matching happens in Rust so that case folding covers accented letters
    /// (SQLite's `LOWER` only folds ASCII).
    pub async fn filtered_contacts(
        &self,
        filter: &ContactFilter,
    ) -> Result<Vec<Contact>, NostraError> {
        let all = self.all_contacts().await?;
        if filter.is_empty() {
            return Ok(all);
        }
        Ok(all.into_iter().filter(|c| filter.matches(c)).collect())
    }

    /// Number of stored contacts.
    pub async fn contact_count(&self) -> Result<i64, NostraError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| NostraError::Storage(format!("count contacts: {e}")))?;
        Ok(count)
    }

    /// Sorted, lowercased, non-empty distinct values of a filter column.
    pub async fn distinct_values(&self, column: FilterColumn) -> Result<Vec<String>, NostraError> {
        let sql = format!(
            "SELECT {col} FROM contacts WHERE {col} != ''",
            col = column.db_column()
        );
        let rows: Vec<(String,)> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| NostraError::Storage(format!("distinct {}: {e}", column.db_column())))?;

        let values: BTreeSet<String> = rows
            .into_iter()
            .map(|(v,)| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .collect();
        Ok(values.into_iter().collect())
    }
}
