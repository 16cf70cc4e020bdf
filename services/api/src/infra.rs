use async_trait::async_trait;
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use quote_intake::workflows::quotes::{QuoteId, QuoteRow, QuoteSink, SinkError, StoredQuote};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local stand-in for the hosted quote table.
#[derive(Clone)]
pub(crate) struct InMemoryQuoteSink {
    records: Arc<Mutex<Vec<StoredQuote>>>,
    initial_status: String,
}

impl InMemoryQuoteSink {
    pub(crate) fn new(initial_status: impl Into<String>) -> Self {
        Self {
            records: Arc::default(),
            initial_status: initial_status.into(),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<StoredQuote>>, SinkError> {
        self.records
            .lock()
            .map_err(|_| SinkError::Unavailable("quote store lock poisoned".to_string()))
    }
}

#[async_trait]
impl QuoteSink for InMemoryQuoteSink {
    async fn insert(&self, row: QuoteRow) -> Result<StoredQuote, SinkError> {
        let stored = StoredQuote {
            id: QuoteId(Uuid::new_v4()),
            created_at: Utc::now(),
            status: self.initial_status.clone(),
            row,
        };
        self.lock()?.push(stored.clone());
        Ok(stored)
    }

    async fn submissions(&self) -> Result<Vec<StoredQuote>, SinkError> {
        Ok(self.lock()?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_intake::workflows::quotes::{normalize, validate, QuoteSubmission};

    fn row() -> QuoteRow {
        let submission: QuoteSubmission = serde_json::from_value(serde_json::json!({
            "quote_option": "type_list",
            "item_list": "Fridge, washing machine",
            "move_type": "within_sa",
            "nearest_branch": "Johannesburg",
            "consignment_type": "few_items",
            "move_date": "2024-07-01",
            "first_name": "Sipho",
            "last_name": "Khumalo",
            "phone": "011 555 0100",
            "email": "sipho@example.com",
            "collection_city": "Johannesburg",
            "collection_province": "Gauteng",
            "collection_country": "ZA",
            "collection_location_type": "apartment",
            "delivery_city": "Polokwane",
            "delivery_province": "Limpopo",
            "delivery_country": "ZA",
            "delivery_location_type": "house"
        }))
        .expect("form deserializes");
        normalize(&validate(&submission).expect("valid form"))
    }

    #[tokio::test]
    async fn insert_assigns_identity_and_configured_status() {
        let sink = InMemoryQuoteSink::new("new_lead");

        let first = sink.insert(row()).await.expect("insert");
        let second = sink.insert(row()).await.expect("insert");

        assert_ne!(first.id, second.id);
        assert_eq!(first.status, "new_lead");
        assert!(second.created_at >= first.created_at);
        assert_eq!(sink.submissions().await.expect("listing").len(), 2);
    }
}
