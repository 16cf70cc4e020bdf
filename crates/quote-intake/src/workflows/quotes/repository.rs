use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ConsignmentType, MoveType, QuoteId};
use super::normalizer::QuoteRow;

/// A quote row as the sink returned it after the insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredQuote {
    pub id: QuoteId,
    pub created_at: DateTime<Utc>,
    /// Lifecycle tag such as `pending` or `contacted`, owned by whoever works the lead.
    pub status: String,
    #[serde(flatten)]
    pub row: QuoteRow,
}

impl StoredQuote {
    pub fn summary(&self) -> SubmissionSummary {
        SubmissionSummary {
            id: self.id,
            first_name: self.row.first_name.clone(),
            last_name: self.row.last_name.clone(),
            email: self.row.email.clone(),
            phone: self.row.phone.clone(),
            move_type: self.row.move_type,
            consignment_type: self.row.consignment_type,
            move_date: self.row.move_date.clone(),
            created_at: self.created_at,
            status: self.status.clone(),
        }
    }
}

/// Columns shown in the admin submissions listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub id: QuoteId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub move_type: MoveType,
    pub consignment_type: ConsignmentType,
    pub move_date: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

/// Hosted table the quotes are written to. Assigns `id`, `created_at` and `status`.
#[async_trait]
pub trait QuoteSink: Send + Sync {
    async fn insert(&self, row: QuoteRow) -> Result<StoredQuote, SinkError>;
    /// Every stored quote, in whatever order the sink keeps them.
    async fn submissions(&self) -> Result<Vec<StoredQuote>, SinkError>;
}

/// Sink failure. The message is shown to the caller exactly as the sink worded it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Unavailable(String),
}

impl SinkError {
    pub fn message(&self) -> &str {
        match self {
            SinkError::Rejected(message) | SinkError::Unavailable(message) => message,
        }
    }
}
