//! Send history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NostraError;

/// What happened to one contact during a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendOutcome {
    Success,
    Error,
    InvalidNumber,
    SkippedAlreadySent,
}

impl SendOutcome {
    /// Label persisted in the history table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::InvalidNumber => "invalid_number",
            Self::SkippedAlreadySent => "skipped_already_sent",
        }
    }
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SendOutcome {
    type Err = NostraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "invalid_number" => Ok(Self::InvalidNumber),
            "skipped_already_sent" => Ok(Self::SkippedAlreadySent),
            other => Err(NostraError::Storage(format!(
                "unknown send outcome '{other}'"
            ))),
        }
    }
}

/// One append-only history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRecord {
    pub timestamp: DateTime<Utc>,
    pub company_name: String,
    /// Normalized number, or the digits-only input for invalid numbers.
    pub phone: String,
    pub city: String,
    pub outcome: SendOutcome,
}

impl SendRecord {
    /// New record stamped with the current time.
    pub fn now(company_name: &str, phone: &str, city: &str, outcome: SendOutcome) -> Self {
        Self {
            timestamp: Utc::now(),
            company_name: company_name.to_string(),
            phone: phone.to_string(),
            city: city.to_string(),
            outcome,
        }
    }
}
